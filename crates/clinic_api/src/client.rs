// --- File: crates/clinic_api/src/client.rs ---
//! HTTP client for the clinic backend.
//!
//! Every request goes through [`ApiClient::execute`], which adds the JSON
//! content type and the bearer token, and turns non-success responses into
//! [`ClinicError`]s carrying the server's own message when it sent one.

use crate::session::SessionContext;
use clinic_common::{
    AdminAppointment, AdminAppointmentService, AdminAppointmentUpdate, AdminNewAppointment,
    AdminSearchQuery, Appointment, AppointmentService, AppointmentStatus, AuthService, BoxFuture,
    CatalogService, ClinicError, ClinicService, LoginRequest, LoginResponse, NewAppointment, Page,
    Patient, RegisterRequest, SortOrder,
};
use clinic_config::ApiConfig;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Shown when login fails without a server message.
pub const LOGIN_FAILED: &str = "Credenciales incorrectas o error de conexion";
const REGISTER_FAILED: &str = "Error al registrar. Verifique los datos";
const LOAD_SERVICES_FAILED: &str = "Error al cargar servicios";
const CREATE_FAILED: &str = "Error al agendar la cita";
const LOAD_APPOINTMENTS_FAILED: &str = "Error al cargar citas";
const CANCEL_FAILED: &str = "Error al cancelar la cita";
const STATUS_FAILED: &str = "Error al cambiar el estado";
const UPDATE_FAILED: &str = "Error al actualizar la cita";
const LOAD_PATIENTS_FAILED: &str = "Error al cargar pacientes";

/// Creates a reqwest client with the given timeout.
pub fn create_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Pulls a human readable message out of an error response body.
///
/// Accepts a bare JSON string, an object with `message` or `error`, or any
/// other non-empty text as-is.
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(message)) => Some(message),
        Ok(serde_json::Value::Object(fields)) => ["message", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| Some(body.to_string())),
        _ => Some(body.to_string()),
    }
}

/// Appends a urlencoded query to a path, leaving it bare when empty.
fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, ClinicError> {
    let encoded = serde_urlencoded::to_string(query)
        .map_err(|e| ClinicError::InternalError(format!("encoding query: {}", e)))?;
    if encoded.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, encoded))
    }
}

pub(crate) fn search_path(query: &AdminSearchQuery) -> Result<String, ClinicError> {
    with_query("/citas/admin", query)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionContext>) -> Result<Self, ClinicError> {
        let http = create_client(config.timeout_secs)?;
        Ok(Self::with_client(http, &config.base_url, session))
    }

    pub fn with_client(http: Client, base_url: &str, session: Arc<SessionContext>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}{}", method, self.base_url, path);
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(header::CONTENT_TYPE, "application/json");
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<Response, ClinicError> {
        self.dispatch(builder, fallback, true).await
    }

    /// Sends the request and maps failures to [`ClinicError`].
    ///
    /// A 401 drops the stored session only when `authenticated` is set; a
    /// rejected sign-in attempt leaves the current session in place.
    async fn dispatch(
        &self,
        builder: RequestBuilder,
        fallback: &str,
        authenticated: bool,
    ) -> Result<Response, ClinicError> {
        let response = builder.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            ClinicError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body).unwrap_or_else(|| fallback.to_string());
        error!("Backend answered {}: {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED => {
                if !authenticated {
                    return Err(ClinicError::AuthError(message));
                }
                if let Err(e) = self.session.clear() {
                    warn!("Failed to clear rejected session: {}", e);
                }
                Err(ClinicError::AuthError(message))
            }
            StatusCode::FORBIDDEN => Err(ClinicError::ForbiddenError(message)),
            StatusCode::CONFLICT => Err(ClinicError::ConflictError(message)),
            _ => Err(ClinicError::ApiError {
                status: status.as_u16(),
                message,
            }),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClinicError> {
        let response = self.execute(builder, fallback).await?;
        Ok(response.json::<T>().await?)
    }
}

impl AuthService for ApiClient {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, LoginResponse, ClinicError> {
        Box::pin(async move {
            let builder = self.request(Method::POST, "/auth/login").json(&request);
            let response = self.dispatch(builder, LOGIN_FAILED, false).await?;
            Ok(response.json::<LoginResponse>().await?)
        })
    }

    fn register(&self, request: RegisterRequest) -> BoxFuture<'_, (), ClinicError> {
        Box::pin(async move {
            let builder = self.request(Method::POST, "/auth/register").json(&request);
            self.execute(builder, REGISTER_FAILED).await?;
            Ok(())
        })
    }
}

impl CatalogService for ApiClient {
    fn list_services(&self) -> BoxFuture<'_, Vec<ClinicService>, ClinicError> {
        Box::pin(async move {
            let builder = self.request(Method::GET, "/servicios");
            self.fetch(builder, LOAD_SERVICES_FAILED).await
        })
    }

    fn list_patients(&self) -> BoxFuture<'_, Vec<Patient>, ClinicError> {
        Box::pin(async move {
            let builder = self.request(Method::GET, "/usuarios/pacientes");
            self.fetch(builder, LOAD_PATIENTS_FAILED).await
        })
    }
}

impl AppointmentService for ApiClient {
    fn create_appointment(
        &self,
        request: NewAppointment,
    ) -> BoxFuture<'_, Appointment, ClinicError> {
        Box::pin(async move {
            let builder = self.request(Method::POST, "/citas").json(&request);
            self.fetch(builder, CREATE_FAILED).await
        })
    }

    fn my_appointments(&self, order: SortOrder) -> BoxFuture<'_, Vec<Appointment>, ClinicError> {
        Box::pin(async move {
            let path = with_query("/citas/mis-citas", &[("orden", order.as_str())])?;
            let builder = self.request(Method::GET, &path);
            self.fetch(builder, LOAD_APPOINTMENTS_FAILED).await
        })
    }

    fn cancel_appointment(&self, appointment_id: i64) -> BoxFuture<'_, (), ClinicError> {
        Box::pin(async move {
            let path = format!("/citas/{}/cancelar", appointment_id);
            let builder = self.request(Method::PUT, &path);
            self.execute(builder, CANCEL_FAILED).await?;
            Ok(())
        })
    }
}

impl AdminAppointmentService for ApiClient {
    fn search_appointments(
        &self,
        query: AdminSearchQuery,
    ) -> BoxFuture<'_, Page<AdminAppointment>, ClinicError> {
        Box::pin(async move {
            let path = search_path(&query)?;
            let builder = self.request(Method::GET, &path);
            self.fetch(builder, LOAD_APPOINTMENTS_FAILED).await
        })
    }

    fn change_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> BoxFuture<'_, (), ClinicError> {
        Box::pin(async move {
            let path = format!("/citas/admin/{}/estado", appointment_id);
            let builder = self.request(Method::PATCH, &path).json(&status);
            self.execute(builder, STATUS_FAILED).await?;
            Ok(())
        })
    }

    fn update_appointment(
        &self,
        appointment_id: i64,
        update: AdminAppointmentUpdate,
    ) -> BoxFuture<'_, AdminAppointment, ClinicError> {
        Box::pin(async move {
            let path = format!("/citas/admin/{}", appointment_id);
            let builder = self.request(Method::PUT, &path).json(&update);
            self.fetch(builder, UPDATE_FAILED).await
        })
    }

    fn book_for_patient(
        &self,
        request: AdminNewAppointment,
    ) -> BoxFuture<'_, AdminAppointment, ClinicError> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, "/citas/admin/agendar")
                .json(&request);
            self.fetch(builder, CREATE_FAILED).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_sources() {
        assert_eq!(
            extract_error_message("\"Horario ocupado\"").as_deref(),
            Some("Horario ocupado")
        );
        assert_eq!(
            extract_error_message(r#"{"message":"Token vencido","error":"x"}"#).as_deref(),
            Some("Token vencido")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"Bad Request"}"#).as_deref(),
            Some("Bad Request")
        );
        assert_eq!(
            extract_error_message("upstream exploded").as_deref(),
            Some("upstream exploded")
        );
        assert_eq!(extract_error_message("   "), None);
    }

    #[test]
    fn test_search_path_skips_unset_filters() {
        let path = search_path(&AdminSearchQuery::page(2, 10)).unwrap();
        assert_eq!(path, "/citas/admin?page=2&size=10");
    }

    #[test]
    fn test_search_path_encodes_filters() {
        let query = AdminSearchQuery {
            status: Some(AppointmentStatus::Pending),
            q: Some("ana maria".to_string()),
            service_id: Some(3),
            ..AdminSearchQuery::page(0, 20)
        };
        let path = search_path(&query).unwrap();
        assert_eq!(
            path,
            "/citas/admin?page=0&size=20&estado=PENDIENTE&q=ana+maria&servicioId=3"
        );
    }

    #[test]
    fn test_day_search_path() {
        let query = AdminSearchQuery::for_day("2025-05-05".parse().unwrap(), 500);
        let path = search_path(&query).unwrap();
        assert_eq!(
            path,
            "/citas/admin?page=0&size=500&desde=2025-05-05T00%3A00&hasta=2025-05-05T23%3A59"
        );
    }
}
