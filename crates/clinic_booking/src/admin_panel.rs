// --- File: crates/clinic_booking/src/admin_panel.rs ---
//! Administrator listing of every appointment, paged at the backend.
//!
//! Pages are zero-based. Any filter change returns to the first page; the
//! caller reloads when it is done adjusting filters.

use crate::context::ClinicContext;
use crate::guard::Route;
use crate::load_state::LoadState;
use crate::pagination::page_window;
use chrono::NaiveDateTime;
use clinic_common::{
    validation_error, AdminAppointment, AdminAppointmentService, AdminSearchQuery,
    AppointmentStatus, CatalogService, ClinicError, ClinicService, Page,
};
use tracing::info;

pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Format of the `desde`/`hasta` bounds.
const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminFilters {
    /// `None` lists every status.
    pub status: Option<AppointmentStatus>,
    pub text: String,
    pub service_id: Option<i64>,
    pub from: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

pub struct AdminPanel {
    ctx: ClinicContext,
    page: u32,
    size: u32,
    filters: AdminFilters,
    results: LoadState<Page<AdminAppointment>>,
    services: LoadState<Vec<ClinicService>>,
}

impl AdminPanel {
    pub fn open(ctx: ClinicContext) -> Result<Self, ClinicError> {
        ctx.require(Route::AdminPanel)?;
        Ok(Self {
            ctx,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            filters: AdminFilters::default(),
            results: LoadState::Idle,
            services: LoadState::Idle,
        })
    }

    /// The search the current page and filters translate to.
    pub fn query(&self) -> AdminSearchQuery {
        let text = self.filters.text.trim();
        AdminSearchQuery {
            status: self.filters.status,
            q: (!text.is_empty()).then(|| text.to_string()),
            service_id: self.filters.service_id,
            from: self
                .filters
                .from
                .map(|at| at.format(BOUND_FORMAT).to_string()),
            until: self
                .filters
                .until
                .map(|at| at.format(BOUND_FORMAT).to_string()),
            ..AdminSearchQuery::page(self.page, self.size)
        }
    }

    pub async fn reload(&mut self) {
        self.results = LoadState::Loading;
        let result = self.ctx.backend.search_appointments(self.query()).await;
        self.results = LoadState::from_result(result);
    }

    /// Services for the service filter. A failure only empties that filter.
    pub async fn reload_services(&mut self) {
        self.services = LoadState::Loading;
        let result = self.ctx.backend.list_services().await;
        self.services = LoadState::from_result(result);
    }

    pub fn results(&self) -> &LoadState<Page<AdminAppointment>> {
        &self.results
    }

    pub fn services(&self) -> &LoadState<Vec<ClinicService>> {
        &self.services
    }

    pub fn filters(&self) -> &AdminFilters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_status(&mut self, status: Option<AppointmentStatus>) {
        self.filters.status = status;
        self.page = 0;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.filters.text = text.into();
        self.page = 0;
    }

    pub fn set_service(&mut self, service_id: Option<i64>) {
        self.filters.service_id = service_id;
        self.page = 0;
    }

    pub fn set_range(&mut self, from: Option<NaiveDateTime>, until: Option<NaiveDateTime>) {
        self.filters.from = from;
        self.filters.until = until;
        self.page = 0;
    }

    pub fn set_page_size(&mut self, size: u32) -> Result<(), ClinicError> {
        if !PAGE_SIZES.contains(&size) {
            return Err(validation_error(format!(
                "Tamaño de página no permitido: {}",
                size
            )));
        }
        self.size = size;
        self.page = 0;
        Ok(())
    }

    /// Pages reported by the last search, at least one.
    pub fn total_pages(&self) -> u32 {
        self.results
            .value()
            .map(|page| page.total_pages)
            .unwrap_or(0)
            .max(1)
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        page_window(self.page, self.total_pages())
    }

    pub fn go_to(&mut self, page: u32) -> bool {
        if page < self.total_pages() && page != self.page {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn previous(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages() - 1)
    }

    /// Move an appointment to a new status, then refresh the listing.
    pub async fn change_status(
        &mut self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<(), ClinicError> {
        self.ctx
            .backend
            .change_status(appointment_id, status)
            .await?;
        info!("Appointment {} moved to {}", appointment_id, status);
        self.reload().await;
        Ok(())
    }
}
