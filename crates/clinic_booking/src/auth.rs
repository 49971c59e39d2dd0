// --- File: crates/clinic_booking/src/auth.rs ---
use crate::context::ClinicContext;
use clinic_api::{Session, LOGIN_FAILED};
use clinic_common::logging::log_result;
use clinic_common::{validation_error, AuthService, ClinicError, LoginRequest, RegisterRequest};
use tracing::{info, warn};

const MISSING_FIELDS: &str = "Completa todos los campos requeridos";

/// Sign in and persist the session.
///
/// Failures carry the backend's message when it sent one and the generic
/// credentials message otherwise, always as an authentication error.
pub async fn login(
    ctx: &ClinicContext,
    email: &str,
    password: &str,
) -> Result<Session, ClinicError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(validation_error(MISSING_FIELDS));
    }

    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let response = ctx.backend.login(request).await.map_err(|err| {
        warn!("Login failed: {}", err);
        ClinicError::AuthError(login_message(&err))
    })?;

    let session = Session::from_login(response)?;
    ctx.session.establish(session.clone())?;
    Ok(session)
}

fn login_message(err: &ClinicError) -> String {
    match err {
        ClinicError::ApiError { message, .. }
        | ClinicError::AuthError(message)
        | ClinicError::ForbiddenError(message)
        | ClinicError::ConflictError(message) => message.clone(),
        _ => LOGIN_FAILED.to_string(),
    }
}

/// Create a patient account. The caller signs in separately afterwards.
pub async fn register(ctx: &ClinicContext, request: RegisterRequest) -> Result<(), ClinicError> {
    let required = [
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(validation_error(MISSING_FIELDS));
    }

    let email = request.email.clone();
    ctx.backend.register(request).await?;
    info!("Registered new patient account {}", email);
    Ok(())
}

pub fn logout(ctx: &ClinicContext) -> Result<(), ClinicError> {
    let email = ctx.session.current().map(|session| session.email);
    log_result(
        ctx.session.clear(),
        &format!("Signed out {}", email.as_deref().unwrap_or("anonymous session")),
        "Failed to clear the stored session",
    )
}
