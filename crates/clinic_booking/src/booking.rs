// --- File: crates/clinic_booking/src/booking.rs ---
//! The patient's own booking form.
//!
//! Slot lists are recomputed from the engine on every read, never cached, so
//! they always reflect the current clock and the current selection.

use crate::context::ClinicContext;
use crate::guard::Route;
use crate::load_state::LoadState;
use clinic_common::{
    validation_error, Appointment, AppointmentService, CatalogService, ClinicError, ClinicService,
    NewAppointment,
};
use clinic_slots::{
    booking_timestamp, classify_day, filter_past_slots, generate_slots, validate_candidate,
    BookingHorizon, CalendarDate, DayKind, TimeSlot,
};
use tracing::info;

pub struct BookingForm {
    ctx: ClinicContext,
    services: LoadState<Vec<ClinicService>>,
    service_id: Option<i64>,
    date: Option<CalendarDate>,
    time: Option<TimeSlot>,
    notes: String,
    warning: Option<String>,
}

impl BookingForm {
    pub fn open(ctx: ClinicContext) -> Result<Self, ClinicError> {
        ctx.require(Route::Book)?;
        Ok(Self {
            ctx,
            services: LoadState::Idle,
            service_id: None,
            date: None,
            time: None,
            notes: String::new(),
            warning: None,
        })
    }

    pub async fn reload(&mut self) {
        self.services = LoadState::Loading;
        let result = self.ctx.backend.list_services().await;
        self.services = LoadState::from_result(result);
    }

    pub fn services(&self) -> &LoadState<Vec<ClinicService>> {
        &self.services
    }

    pub fn horizon(&self) -> BookingHorizon {
        self.ctx.horizon()
    }

    /// Start times still bookable on the selected date.
    pub fn available_slots(&self) -> Vec<TimeSlot> {
        match self.date {
            Some(date) => {
                let slots = generate_slots(date, &self.ctx.policy);
                filter_past_slots(&slots, date, self.ctx.now(), &self.ctx.policy)
            }
            None => Vec::new(),
        }
    }

    pub fn select_service(&mut self, service_id: i64) {
        self.service_id = Some(service_id);
    }

    /// Pick a day inside the booking horizon. A selected time the new day no
    /// longer offers is dropped.
    pub fn set_date(&mut self, date: CalendarDate) -> Result<(), ClinicError> {
        let horizon = self.horizon();
        if !horizon.contains(date) {
            return Err(validation_error(format!(
                "Selecciona una fecha entre {} y {}",
                horizon.first, horizon.last
            )));
        }
        self.date = Some(date);
        if let Some(time) = self.time {
            if !self.available_slots().contains(&time) {
                self.time = None;
            }
        }
        self.refresh_warning();
        Ok(())
    }

    pub fn set_time(&mut self, time: TimeSlot) {
        self.time = Some(time);
        self.refresh_warning();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn date(&self) -> Option<CalendarDate> {
        self.date
    }

    pub fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    /// Live hint shown while the form is edited.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    fn refresh_warning(&mut self) {
        self.warning = match (self.date, self.time) {
            (Some(date), Some(time)) => {
                validate_candidate(date, time, self.ctx.now(), &self.ctx.policy)
                    .err()
                    .map(|rejection| rejection.to_string())
            }
            (Some(date), None) if classify_day(date) == DayKind::Weekend => Some(format!(
                "Fin de semana: solo previa coordinación por {}.",
                self.ctx.policy.contact_channel()
            )),
            _ => None,
        };
    }

    /// Validate and send the booking. The form is cleared on success.
    pub async fn submit(&mut self) -> Result<Appointment, ClinicError> {
        let service_id = self
            .service_id
            .ok_or_else(|| validation_error("Por favor selecciona un servicio"))?;
        let date = self
            .date
            .ok_or_else(|| validation_error("Por favor selecciona una fecha"))?;
        let time = self
            .time
            .ok_or_else(|| validation_error("Por favor selecciona una hora"))?;

        validate_candidate(date, time, self.ctx.now(), &self.ctx.policy)?;

        let request = NewAppointment {
            service_id,
            scheduled_at: booking_timestamp(date, time),
            notes: self.notes.clone(),
        };
        info!(
            "Booking service {} at {}",
            request.service_id, request.scheduled_at
        );
        let created = self.ctx.backend.create_appointment(request).await?;

        self.service_id = None;
        self.date = None;
        self.time = None;
        self.notes.clear();
        self.warning = None;
        Ok(created)
    }
}
