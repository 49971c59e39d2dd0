// --- File: crates/clinic_booking/src/context.rs ---
use crate::guard::{require, Route};
use chrono::NaiveDateTime;
use clinic_api::{Session, SessionContext};
use clinic_common::{config_error, ClinicError, Clock, SharedBackend, SystemClock};
use clinic_config::AppConfig;
use clinic_slots::{booking_horizon, BookingHorizon, CalendarDate, SlotPolicy};
use std::sync::Arc;
use tracing::debug;

/// Everything a workflow needs: the backend, the session, the clock and the
/// clinic's slot policy.
#[derive(Clone)]
pub struct ClinicContext {
    pub backend: SharedBackend,
    pub session: Arc<SessionContext>,
    pub clock: Arc<dyn Clock>,
    pub policy: SlotPolicy,
    pub horizon_months: u32,
}

impl ClinicContext {
    pub fn new(
        backend: SharedBackend,
        session: Arc<SessionContext>,
        clock: Arc<dyn Clock>,
        policy: SlotPolicy,
        horizon_months: u32,
    ) -> Self {
        Self {
            backend,
            session,
            clock,
            policy,
            horizon_months,
        }
    }

    /// Wire a context from configuration, using the wall clock in the clinic
    /// time zone.
    pub fn from_config(
        config: &AppConfig,
        backend: SharedBackend,
        session: Arc<SessionContext>,
    ) -> Result<Self, ClinicError> {
        let clock = SystemClock::from_zone_name(&config.clinic.time_zone)?;
        debug!("Clinic clock running in {}", clock.time_zone());
        let policy = config
            .clinic
            .slot_policy()
            .map_err(|e| config_error(format!("invalid clinic hours: {}", e)))?;
        Ok(Self::new(
            backend,
            session,
            Arc::new(clock),
            policy,
            config.clinic.booking_horizon_months,
        ))
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    /// Dates a booking form offers, from today.
    pub fn horizon(&self) -> BookingHorizon {
        booking_horizon(self.today(), self.horizon_months)
    }

    pub fn require(&self, route: Route) -> Result<Session, ClinicError> {
        require(&self.session, route)
    }
}
