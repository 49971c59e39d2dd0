// --- File: crates/clinic_booking/src/admin_edit.rs ---
use crate::context::ClinicContext;
use crate::guard::Route;
use crate::load_state::LoadState;
use chrono::NaiveDateTime;
use clinic_common::{
    not_found, validation_error, AdminAppointment, AdminAppointmentService,
    AdminAppointmentUpdate, AdminSearchQuery, AppointmentStatus, CatalogService, ClinicError,
    ClinicService,
};
use tracing::info;

/// The edit view looks its appointment up in one large search page.
pub const LOOKUP_SIZE: u32 = 1000;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Editable fields, prefilled from the stored appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub scheduled_at: Option<NaiveDateTime>,
    /// `None` keeps the current service.
    pub service_id: Option<i64>,
    pub notes: String,
    pub status: AppointmentStatus,
}

pub struct AdminEdit {
    ctx: ClinicContext,
    appointment_id: i64,
    appointment: LoadState<AdminAppointment>,
    services: LoadState<Vec<ClinicService>>,
    form: Option<EditForm>,
}

impl AdminEdit {
    pub fn open(ctx: ClinicContext, appointment_id: i64) -> Result<Self, ClinicError> {
        ctx.require(Route::AdminEdit)?;
        Ok(Self {
            ctx,
            appointment_id,
            appointment: LoadState::Idle,
            services: LoadState::Idle,
            form: None,
        })
    }

    pub async fn reload(&mut self) {
        self.appointment = LoadState::Loading;
        let found = self.find_appointment().await;
        if let Ok(appointment) = &found {
            self.form = Some(EditForm {
                scheduled_at: parse_timestamp(&appointment.scheduled_at),
                service_id: None,
                notes: appointment.notes.clone().unwrap_or_default(),
                status: appointment.status,
            });
        }
        self.appointment = LoadState::from_result(found);

        let services = self.ctx.backend.list_services().await;
        self.services = LoadState::from_result(services);
    }

    async fn find_appointment(&self) -> Result<AdminAppointment, ClinicError> {
        let page = self
            .ctx
            .backend
            .search_appointments(AdminSearchQuery::page(0, LOOKUP_SIZE))
            .await?;
        page.content
            .into_iter()
            .find(|appointment| appointment.id == self.appointment_id)
            .ok_or_else(|| not_found("Cita no encontrada"))
    }

    pub fn appointment(&self) -> &LoadState<AdminAppointment> {
        &self.appointment
    }

    pub fn services(&self) -> &LoadState<Vec<ClinicService>> {
        &self.services
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.form.as_mut()
    }

    /// Send the edit. A changed date/time must lie in the future; an
    /// unchanged one is sent as absent so past appointments can still have
    /// their status or notes corrected.
    pub async fn save(&mut self) -> Result<AdminAppointment, ClinicError> {
        let form = self
            .form
            .clone()
            .ok_or_else(|| not_found("Cita no encontrada"))?;
        let original = self.appointment.value().and_then(|a| parse_timestamp(&a.scheduled_at));

        let new_schedule = form.scheduled_at.filter(|at| Some(*at) != original);
        if let Some(at) = new_schedule {
            if at < self.ctx.now() {
                return Err(validation_error("La fecha/hora debe ser futura"));
            }
        }

        let update = AdminAppointmentUpdate {
            service_id: form.service_id,
            scheduled_at: new_schedule.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            notes: form.notes,
            status: form.status,
        };
        let saved = self
            .ctx
            .backend
            .update_appointment(self.appointment_id, update)
            .await?;
        info!("Updated appointment {}", self.appointment_id);
        self.appointment = LoadState::Loaded(saved.clone());
        Ok(saved)
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    clinic_slots::split_timestamp(raw).map(|(date, time)| date.at(time))
}
