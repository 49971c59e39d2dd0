// --- File: crates/clinic_common/src/lib.rs ---
pub mod clock;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    auth_error, config_error, forbidden, internal_error, not_found, validation_error, ClinicError,
    Context, HttpStatusCode,
};
pub use models::*;
pub use services::{
    AdminAppointmentService, AppointmentService, AuthService, BoxFuture, CatalogService,
    ClinicBackend, SharedBackend,
};
