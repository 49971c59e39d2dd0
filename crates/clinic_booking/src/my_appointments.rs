// --- File: crates/clinic_booking/src/my_appointments.rs ---
//! The patient's appointment list.
//!
//! Ordering happens at the backend; status filtering and paging are local.
//! Pages here are one-based.

use crate::context::ClinicContext;
use crate::guard::Route;
use crate::load_state::LoadState;
use crate::pagination::{page_count, page_window};
use clinic_common::{
    validation_error, Appointment, AppointmentService, AppointmentStatus, ClinicError, SortOrder,
};
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Everything except cancelled appointments.
    Active,
    Only(AppointmentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AppointmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status != AppointmentStatus::Cancelled,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TODOS" => Ok(StatusFilter::All),
            "ACTIVAS" => Ok(StatusFilter::Active),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("TODOS"),
            StatusFilter::Active => f.write_str("ACTIVAS"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

pub struct MyAppointments {
    ctx: ClinicContext,
    order: SortOrder,
    filter: StatusFilter,
    page: u32,
    appointments: LoadState<Vec<Appointment>>,
}

impl MyAppointments {
    pub fn open(ctx: ClinicContext) -> Result<Self, ClinicError> {
        ctx.require(Route::MyAppointments)?;
        Ok(Self {
            ctx,
            order: SortOrder::Asc,
            filter: StatusFilter::All,
            page: 1,
            appointments: LoadState::Idle,
        })
    }

    pub async fn reload(&mut self) {
        self.appointments = LoadState::Loading;
        let result = self.ctx.backend.my_appointments(self.order).await;
        self.appointments = LoadState::from_result(result);
        self.clamp_page();
    }

    pub fn state(&self) -> &LoadState<Vec<Appointment>> {
        &self.appointments
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Change the server-side order. Goes back to page one and reloads.
    pub async fn set_order(&mut self, order: SortOrder) {
        self.order = order;
        self.page = 1;
        self.reload().await;
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn filtered(&self) -> Vec<&Appointment> {
        self.appointments
            .value()
            .map(|all| {
                all.iter()
                    .filter(|appointment| self.filter.matches(appointment.status))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn total_pages(&self) -> u32 {
        page_count(self.filtered().len(), PAGE_SIZE)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Appointments on the current page.
    pub fn page_items(&self) -> Vec<&Appointment> {
        let start = (self.page.saturating_sub(1) as usize) * PAGE_SIZE;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect()
    }

    /// Jump to a page. Out-of-range pages are ignored.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        page_window(self.page.saturating_sub(1), self.total_pages())
            .into_iter()
            .map(|page| page + 1)
            .collect()
    }

    /// Cancel one of the listed appointments, then reload the list.
    pub async fn cancel(&mut self, appointment_id: i64) -> Result<(), ClinicError> {
        let status = self
            .appointments
            .value()
            .and_then(|all| all.iter().find(|a| a.id == appointment_id))
            .map(|appointment| appointment.status);
        match status {
            Some(status) if !status.is_cancellable() => {
                return Err(validation_error(format!(
                    "No se puede cancelar una cita {}",
                    status
                )));
            }
            None if self.appointments.value().is_some() => {
                return Err(validation_error("Cita no encontrada"));
            }
            _ => {}
        }

        self.ctx.backend.cancel_appointment(appointment_id).await?;
        info!("Cancelled appointment {}", appointment_id);
        self.reload().await;
        Ok(())
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        if self.page > total {
            self.page = total;
        }
        if self.page == 0 {
            self.page = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing() {
        assert_eq!("todos".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("ACTIVAS".parse::<StatusFilter>(), Ok(StatusFilter::Active));
        assert_eq!(
            "COMPLETADA".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(AppointmentStatus::Completed))
        );
        assert!("ARCHIVADA".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_active_excludes_cancelled_only() {
        assert!(StatusFilter::Active.matches(AppointmentStatus::Pending));
        assert!(StatusFilter::Active.matches(AppointmentStatus::Completed));
        assert!(!StatusFilter::Active.matches(AppointmentStatus::Cancelled));
        assert!(StatusFilter::All.matches(AppointmentStatus::Cancelled));
    }
}
