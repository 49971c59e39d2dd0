// --- File: crates/clinic_common/src/services.rs ---
//! Service abstractions for the clinic backend.
//!
//! Workflows depend on these traits instead of the HTTP client so they can be
//! exercised against in-memory implementations.

use crate::error::ClinicError;
use crate::models::{
    AdminAppointment, AdminAppointmentUpdate, AdminNewAppointment, AdminSearchQuery, Appointment,
    AppointmentStatus, ClinicService, LoginRequest, LoginResponse, NewAppointment, Page, Patient,
    RegisterRequest, SortOrder,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Authentication against the backend.
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a bearer token and role.
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, LoginResponse, ClinicError>;

    /// Create a patient account. Does not establish a session.
    fn register(&self, request: RegisterRequest) -> BoxFuture<'_, (), ClinicError>;
}

/// Read-only reference data.
pub trait CatalogService: Send + Sync {
    /// The bookable services.
    fn list_services(&self) -> BoxFuture<'_, Vec<ClinicService>, ClinicError>;

    /// All registered patients. Administrator only.
    fn list_patients(&self) -> BoxFuture<'_, Vec<Patient>, ClinicError>;
}

/// Operations a patient performs on their own appointments.
pub trait AppointmentService: Send + Sync {
    fn create_appointment(
        &self,
        request: NewAppointment,
    ) -> BoxFuture<'_, Appointment, ClinicError>;

    fn my_appointments(&self, order: SortOrder) -> BoxFuture<'_, Vec<Appointment>, ClinicError>;

    fn cancel_appointment(&self, appointment_id: i64) -> BoxFuture<'_, (), ClinicError>;
}

/// Administrator operations over every appointment.
pub trait AdminAppointmentService: Send + Sync {
    /// Paged search with optional filters.
    fn search_appointments(
        &self,
        query: AdminSearchQuery,
    ) -> BoxFuture<'_, Page<AdminAppointment>, ClinicError>;

    fn change_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> BoxFuture<'_, (), ClinicError>;

    fn update_appointment(
        &self,
        appointment_id: i64,
        update: AdminAppointmentUpdate,
    ) -> BoxFuture<'_, AdminAppointment, ClinicError>;

    fn book_for_patient(
        &self,
        request: AdminNewAppointment,
    ) -> BoxFuture<'_, AdminAppointment, ClinicError>;
}

/// Every backend capability the front end uses, behind one handle.
pub trait ClinicBackend:
    AuthService + CatalogService + AppointmentService + AdminAppointmentService
{
}

impl<T> ClinicBackend for T where
    T: AuthService + CatalogService + AppointmentService + AdminAppointmentService
{
}

/// Shared handle to a backend implementation.
pub type SharedBackend = Arc<dyn ClinicBackend>;
