// --- File: crates/clinic_booking/src/lib.rs ---
pub mod admin_booking;
pub mod admin_edit;
pub mod admin_panel;
pub mod auth;
pub mod booking;
pub mod context;
pub mod guard;
pub mod load_state;
pub mod my_appointments;
pub mod pagination;

pub use admin_booking::AdminBookingForm;
pub use admin_edit::{AdminEdit, EditForm};
pub use admin_panel::{AdminFilters, AdminPanel};
pub use booking::BookingForm;
pub use context::ClinicContext;
pub use guard::{guard, require, GuardDecision, Route, RouteAccess};
pub use load_state::LoadState;
pub use my_appointments::{MyAppointments, StatusFilter};
