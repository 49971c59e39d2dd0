// --- File: crates/clinic_slots/src/model.rs ---
//! Value types used by the slot availability engine.
//!
//! Everything here is immutable once constructed. Dates carry no time of day,
//! and times carry no date; the engine combines them only when it needs to
//! compare a candidate against the current wall-clock time.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Errors raised while building engine values from raw input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),
    #[error("Invalid slot policy: {0}")]
    InvalidPolicy(String),
}

/// Whether the clinic operates on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayKind {
    Business,
    Weekend,
}

/// A calendar day with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses an ISO `YYYY-MM-DD` day.
    pub fn parse(input: &str) -> Result<Self, SlotError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| SlotError::InvalidDate(input.to_string()))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn add_months(&self, months: u32) -> Self {
        Self(
            self.0
                .checked_add_months(Months::new(months))
                .unwrap_or(NaiveDate::MAX),
        )
    }

    /// Combines this day with a time of day.
    pub fn at(&self, time: TimeSlot) -> NaiveDateTime {
        self.0.and_time(time.to_naive_time())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDate {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A time of day at minute precision, rendered as `HH:MM`.
///
/// Generated slots are always aligned to the policy step, but arbitrary
/// values are representable so free-form input can be validated too.
/// Ordering is chronological, which also matches the ordering of the
/// fixed-width labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    minutes: u16,
}

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: (hour * 60 + minute) as u16,
            })
        } else {
            None
        }
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Parses `HH:MM` or `HH:MM:SS`. Seconds are accepted and dropped.
    pub fn parse(input: &str) -> Result<Self, SlotError> {
        let trimmed = input.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(Self::from)
            .map_err(|_| SlotError::InvalidTime(input.to_string()))
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl From<NaiveTime> for TimeSlot {
    fn from(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

impl FromStr for TimeSlot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// The business rule shared by slot generation and candidate validation.
///
/// Both sides must be handed the same policy value, otherwise the list shown
/// to the user and the check applied at submission can disagree. Every
/// policy, deserialised ones included, goes through [`SlotPolicy::new`], so
/// the step is never zero and the window is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSlotPolicy")]
pub struct SlotPolicy {
    /// First bookable start of the day.
    pub(crate) opens: TimeSlot,
    /// Closing boundary. Exclusive unless `include_closing_slot` is set.
    pub(crate) closes: TimeSlot,
    /// Slot granularity in minutes.
    pub(crate) step_minutes: u16,
    /// Offer the closing boundary itself as a final slot.
    pub(crate) include_closing_slot: bool,
    /// Out-of-band channel named when weekend bookings are refused.
    pub(crate) contact_channel: String,
}

/// Unchecked wire shape of [`SlotPolicy`].
#[derive(Deserialize)]
struct RawSlotPolicy {
    opens: TimeSlot,
    closes: TimeSlot,
    step_minutes: u16,
    include_closing_slot: bool,
    contact_channel: String,
}

impl TryFrom<RawSlotPolicy> for SlotPolicy {
    type Error = SlotError;

    fn try_from(raw: RawSlotPolicy) -> Result<Self, Self::Error> {
        SlotPolicy::new(
            raw.opens,
            raw.closes,
            raw.step_minutes,
            raw.include_closing_slot,
            raw.contact_channel,
        )
    }
}

impl SlotPolicy {
    pub fn new(
        opens: TimeSlot,
        closes: TimeSlot,
        step_minutes: u16,
        include_closing_slot: bool,
        contact_channel: impl Into<String>,
    ) -> Result<Self, SlotError> {
        if step_minutes == 0 || step_minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidPolicy(format!(
                "step of {} minutes is out of range",
                step_minutes
            )));
        }
        if opens >= closes {
            return Err(SlotError::InvalidPolicy(format!(
                "opening time {} must precede closing time {}",
                opens, closes
            )));
        }
        Ok(Self {
            opens,
            closes,
            step_minutes,
            include_closing_slot,
            contact_channel: contact_channel.into(),
        })
    }

    pub fn opens(&self) -> TimeSlot {
        self.opens
    }

    pub fn closes(&self) -> TimeSlot {
        self.closes
    }

    pub fn step_minutes(&self) -> u16 {
        self.step_minutes
    }

    pub fn include_closing_slot(&self) -> bool {
        self.include_closing_slot
    }

    pub fn contact_channel(&self) -> &str {
        &self.contact_channel
    }

    /// Whether a time of day falls inside operating hours.
    pub fn within_hours(&self, time: TimeSlot) -> bool {
        if self.include_closing_slot {
            time >= self.opens && time <= self.closes
        } else {
            time >= self.opens && time < self.closes
        }
    }

    /// Rounds a time down to the start of the slot it falls in.
    ///
    /// The grid is anchored at `opens`; anything earlier maps to `opens`.
    pub fn floor_to_step(&self, time: TimeSlot) -> TimeSlot {
        let opens = self.opens.minutes_since_midnight();
        let step = self.step_minutes.max(1);
        let elapsed = time.minutes_since_midnight().saturating_sub(opens);
        TimeSlot {
            minutes: opens + elapsed - elapsed % step,
        }
    }
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            opens: TimeSlot { minutes: 8 * 60 },
            closes: TimeSlot { minutes: 20 * 60 },
            step_minutes: 30,
            include_closing_slot: false,
            contact_channel: "WhatsApp".to_string(),
        }
    }
}

/// A slot as shown in a selector, with its occupancy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotOption {
    pub slot: TimeSlot,
    pub occupied: bool,
}

impl SlotOption {
    pub fn is_selectable(&self) -> bool {
        !self.occupied
    }

    pub fn display_label(&self) -> String {
        if self.occupied {
            format!("{} (ocupada)", self.slot)
        } else {
            self.slot.label()
        }
    }
}

/// Inclusive range of days a booking form lets the user pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingHorizon {
    pub first: CalendarDate,
    pub last: CalendarDate,
}

impl BookingHorizon {
    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.first && date <= self.last
    }
}
