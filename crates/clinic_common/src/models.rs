// --- File: crates/clinic_common/src/models.rs ---
//! Wire models for the clinic appointment API.
//!
//! The backend speaks JSON with Spanish camelCase keys; the Rust side uses
//! English names and maps them with serde renames.

use clinic_slots::{split_timestamp, CalendarDate, TimeSlot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "CONFIRMADA")]
    Confirmed,
    #[serde(rename = "COMPLETADA")]
    Completed,
    #[serde(rename = "CANCELADA")]
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDIENTE",
            AppointmentStatus::Confirmed => "CONFIRMADA",
            AppointmentStatus::Completed => "COMPLETADA",
            AppointmentStatus::Cancelled => "CANCELADA",
        }
    }

    /// Patients may only cancel appointments that have not happened or
    /// been cancelled yet.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_wire().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown appointment status '{}'", s))
    }
}

/// Server-side ordering of a patient's appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// A bookable clinic service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicService {
    #[serde(rename = "servicioId")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "costo", default)]
    pub cost: f64,
    #[serde(rename = "duracionMinutos", default)]
    pub duration_minutes: i64,
}

/// An appointment as seen by the patient who owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "citaId")]
    pub id: i64,
    #[serde(rename = "fechaHora")]
    pub scheduled_at: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "servicio", default)]
    pub service: Option<ClinicService>,
}

impl Appointment {
    /// The day and start time, when the timestamp is well formed.
    pub fn schedule(&self) -> Option<(CalendarDate, TimeSlot)> {
        split_timestamp(&self.scheduled_at)
    }
}

/// An appointment row in the administrator listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAppointment {
    #[serde(rename = "citaId")]
    pub id: i64,
    #[serde(rename = "fechaHora")]
    pub scheduled_at: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "pacienteNombre", default)]
    pub patient_name: String,
    #[serde(rename = "servicioNombre", default)]
    pub service_name: String,
}

impl AdminAppointment {
    pub fn schedule(&self) -> Option<(CalendarDate, TimeSlot)> {
        split_timestamp(&self.scheduled_at)
    }
}

/// A registered patient, as listed for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "usuarioId")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl Patient {
    pub fn display_name(&self) -> String {
        format!("{} {} - {}", self.first_name, self.last_name, self.email)
    }
}

/// One page of a server-side paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A patient booking for themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    #[serde(rename = "servicioId")]
    pub service_id: i64,
    #[serde(rename = "fechaHora")]
    pub scheduled_at: String,
    #[serde(rename = "notas")]
    pub notes: String,
}

/// An administrator booking on a patient's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNewAppointment {
    #[serde(rename = "pacienteId")]
    pub patient_id: i64,
    #[serde(rename = "servicioId")]
    pub service_id: i64,
    #[serde(rename = "fechaHora")]
    pub scheduled_at: String,
    #[serde(rename = "notas")]
    pub notes: String,
}

/// Administrator edit of an existing appointment. `None` leaves a field as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAppointmentUpdate {
    #[serde(rename = "servicioId")]
    pub service_id: Option<i64>,
    #[serde(rename = "fechaHora")]
    pub scheduled_at: Option<String>,
    #[serde(rename = "notas")]
    pub notes: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
}

/// Filters for the administrator appointment search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminSearchQuery {
    pub page: u32,
    pub size: u32,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(rename = "servicioId", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    #[serde(rename = "desde", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "hasta", skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl AdminSearchQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            status: None,
            q: None,
            service_id: None,
            from: None,
            until: None,
        }
    }

    /// Every appointment on one day, as used for occupied-slot lookups.
    pub fn for_day(date: CalendarDate, size: u32) -> Self {
        Self {
            from: Some(format!("{}T00:00", date)),
            until: Some(format!("{}T23:59", date)),
            ..Self::page(0, size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_appointment_from_wire() {
        let appointment: Appointment = serde_json::from_value(json!({
            "citaId": 7,
            "fechaHora": "2025-05-05T14:00:00",
            "estado": "CONFIRMADA",
            "notas": null,
            "servicio": { "servicioId": 2, "nombre": "Limpieza", "costo": 25.5, "duracionMinutos": 30 }
        }))
        .unwrap();

        assert_eq!(appointment.id, 7);
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert!(appointment.status.is_cancellable());
        assert_eq!(appointment.service.as_ref().map(|s| s.duration_minutes), Some(30));
        let (day, time) = appointment.schedule().unwrap();
        assert_eq!(day.to_string(), "2025-05-05");
        assert_eq!(time.label(), "14:00");
    }

    #[test]
    fn test_admin_update_serializes_nulls() {
        let update = AdminAppointmentUpdate {
            service_id: None,
            scheduled_at: Some("2025-05-06T09:00:00".to_string()),
            notes: String::new(),
            status: AppointmentStatus::Completed,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "servicioId": null,
                "fechaHora": "2025-05-06T09:00:00",
                "notas": "",
                "estado": "COMPLETADA"
            })
        );
    }

    #[test]
    fn test_day_query_bounds() {
        let query = AdminSearchQuery::for_day(CalendarDate::parse("2025-05-05").unwrap(), 500);
        assert_eq!(query.from.as_deref(), Some("2025-05-05T00:00"));
        assert_eq!(query.until.as_deref(), Some("2025-05-05T23:59"));
        assert_eq!(query.size, 500);
        assert_eq!(query.status, None);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "cancelada".parse::<AppointmentStatus>(),
            Ok(AppointmentStatus::Cancelled)
        );
        assert!("TODOS".parse::<AppointmentStatus>().is_err());
        assert!(!AppointmentStatus::Completed.is_cancellable());
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
    }
}
