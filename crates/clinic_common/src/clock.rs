// --- File: crates/clinic_common/src/clock.rs ---
//! The single source of "now" for scheduling decisions.
//!
//! Slot filtering and validation compare against the clinic's wall-clock
//! time, so the current instant is always converted into the clinic time zone
//! before it reaches the slot engine.

use crate::error::{config_error, ClinicError};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clinic_slots::CalendarDate;

pub trait Clock: Send + Sync {
    /// Current local date-time in the clinic's time zone.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> CalendarDate {
        CalendarDate::new(self.now().date())
    }
}

/// Wall clock in a fixed IANA time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build from a zone name such as `America/Guayaquil`.
    pub fn from_zone_name(name: &str) -> Result<Self, ClinicError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| config_error(format!("unknown time zone '{}'", name)))?;
        Ok(Self::new(tz))
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
