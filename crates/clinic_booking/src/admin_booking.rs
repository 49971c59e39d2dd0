// --- File: crates/clinic_booking/src/admin_booking.rs ---
//! Booking on a patient's behalf.
//!
//! Unlike the patient form, the administrator sees every slot of the day,
//! with the ones already taken marked as occupied.

use crate::context::ClinicContext;
use crate::guard::Route;
use crate::load_state::LoadState;
use clinic_common::{
    validation_error, AdminAppointment, AdminAppointmentService, AdminNewAppointment,
    AdminSearchQuery, AppointmentStatus, CatalogService, ClinicError, ClinicService, Patient,
};
use clinic_slots::{
    annotate_slots, booking_timestamp, filter_occupied, filter_past_slots, generate_slots,
    marker_from_timestamp, validate_candidate, CalendarDate, SlotOption, TimeSlot,
};
use tracing::{info, warn};

/// Upper bound on appointments fetched to mark a day's occupied slots.
pub const DAY_LOOKUP_SIZE: u32 = 500;

pub struct AdminBookingForm {
    ctx: ClinicContext,
    patients: LoadState<Vec<Patient>>,
    services: LoadState<Vec<ClinicService>>,
    patient_id: Option<i64>,
    service_id: Option<i64>,
    date: CalendarDate,
    time: Option<TimeSlot>,
    notes: String,
    occupied: Vec<String>,
}

impl AdminBookingForm {
    /// Open the form on today's date.
    pub fn open(ctx: ClinicContext) -> Result<Self, ClinicError> {
        ctx.require(Route::AdminBook)?;
        let date = ctx.today();
        Ok(Self {
            ctx,
            patients: LoadState::Idle,
            services: LoadState::Idle,
            patient_id: None,
            service_id: None,
            date,
            time: None,
            notes: String::new(),
            occupied: Vec::new(),
        })
    }

    /// Load patients, services and the selected day's occupied slots.
    pub async fn reload(&mut self) {
        self.patients = LoadState::Loading;
        self.services = LoadState::Loading;
        let patients = self.ctx.backend.list_patients().await;
        let services = self.ctx.backend.list_services().await;
        self.patients = LoadState::from_result(patients);
        self.services = LoadState::from_result(services);
        self.refresh_occupied().await;
    }

    /// Re-read which start times are taken on the selected date.
    ///
    /// Cancelled appointments free their slot. A failed lookup leaves no
    /// slot marked, and the submission check at the backend still applies.
    pub async fn refresh_occupied(&mut self) {
        let query = AdminSearchQuery::for_day(self.date, DAY_LOOKUP_SIZE);
        self.occupied = match self.ctx.backend.search_appointments(query).await {
            Ok(page) => occupied_markers(&page.content),
            Err(err) => {
                warn!("Could not load occupied slots for {}: {}", self.date, err);
                Vec::new()
            }
        };
    }

    pub fn patients(&self) -> &LoadState<Vec<Patient>> {
        &self.patients
    }

    pub fn services(&self) -> &LoadState<Vec<ClinicService>> {
        &self.services
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    pub fn occupied(&self) -> &[String] {
        &self.occupied
    }

    /// Upcoming slots of the selected date with their occupancy.
    pub fn slot_options(&self) -> Vec<SlotOption> {
        let slots = generate_slots(self.date, &self.ctx.policy);
        let upcoming = filter_past_slots(&slots, self.date, self.ctx.now(), &self.ctx.policy);
        annotate_slots(&upcoming, &self.occupied)
    }

    pub fn select_patient(&mut self, patient_id: i64) {
        self.patient_id = Some(patient_id);
    }

    pub fn select_service(&mut self, service_id: i64) {
        self.service_id = Some(service_id);
    }

    /// Switch day, reload its occupied slots and drop a time it cannot offer.
    pub async fn set_date(&mut self, date: CalendarDate) {
        self.date = date;
        self.refresh_occupied().await;
        if let Some(time) = self.time {
            let offered = self
                .slot_options()
                .iter()
                .any(|option| option.slot == time && option.is_selectable());
            if !offered {
                self.time = None;
            }
        }
    }

    pub fn set_time(&mut self, time: TimeSlot) {
        self.time = Some(time);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub async fn submit(&mut self) -> Result<AdminAppointment, ClinicError> {
        let (patient_id, service_id, time) = match (self.patient_id, self.service_id, self.time) {
            (Some(patient), Some(service), Some(time)) => (patient, service, time),
            _ => return Err(validation_error("Completa todos los campos requeridos")),
        };

        if filter_occupied(&[time], &self.occupied).is_empty() {
            return Err(validation_error(format!(
                "El horario {} ya está ocupado",
                time
            )));
        }
        validate_candidate(self.date, time, self.ctx.now(), &self.ctx.policy)?;

        let request = AdminNewAppointment {
            patient_id,
            service_id,
            scheduled_at: booking_timestamp(self.date, time),
            notes: self.notes.clone(),
        };
        info!(
            "Booking service {} for patient {} at {}",
            request.service_id, request.patient_id, request.scheduled_at
        );
        let created = self.ctx.backend.book_for_patient(request).await?;

        self.time = None;
        self.notes.clear();
        self.refresh_occupied().await;
        Ok(created)
    }
}

/// Start-time markers claimed by the non-cancelled appointments of a day.
pub fn occupied_markers(appointments: &[AdminAppointment]) -> Vec<String> {
    appointments
        .iter()
        .filter(|appointment| appointment.status != AppointmentStatus::Cancelled)
        .filter_map(|appointment| marker_from_timestamp(&appointment.scheduled_at))
        .map(|time| time.label())
        .collect()
}
