// --- File: crates/clinic_slots/src/logic.rs ---
use crate::model::{BookingHorizon, CalendarDate, DayKind, SlotOption, SlotPolicy, TimeSlot};
use chrono::{NaiveDateTime, Weekday};
use std::collections::HashSet;
use tracing::debug;

// --- Error Handling ---
use thiserror::Error;

/// Reasons a candidate date/time is refused at submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotRejection {
    #[error("No puedes agendar citas en fechas u horarios pasados")]
    PastDateTime,
    #[error(
        "Los fines de semana trabajamos con previa cita agendada por {channel}. Por favor, contáctanos para coordinar tu cita."
    )]
    WeekendUnavailable { channel: String },
    #[error("El horario de atención es de Lunes a Viernes de {opens} a {closes}")]
    OutsideBusinessHours { opens: TimeSlot, closes: TimeSlot },
}

// --- Day Classification ---

/// Saturday and Sunday are weekend days; every other day is a business day.
pub fn classify_day(date: CalendarDate) -> DayKind {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayKind::Weekend,
        _ => DayKind::Business,
    }
}

// --- Slot Generation ---

/// Produces every bookable start time for `date`, in ascending order.
///
/// Weekend days yield nothing; weekend bookings are arranged out of band.
pub fn generate_slots(date: CalendarDate, policy: &SlotPolicy) -> Vec<TimeSlot> {
    if classify_day(date) == DayKind::Weekend {
        return Vec::new();
    }

    let opens = policy.opens.minutes_since_midnight();
    let closes = policy.closes.minutes_since_midnight();
    let mut slots: Vec<TimeSlot> = (opens..closes)
        .step_by(usize::from(policy.step_minutes.max(1)))
        .filter_map(TimeSlot::from_minutes)
        .collect();

    if policy.include_closing_slot {
        slots.push(policy.closes);
    }
    slots
}

// --- Slot Filtering ---

/// Drops slots that already started on the current day.
///
/// The current time is rounded down to the start of the slot it falls in,
/// so the slot that is in progress stays bookable. Any other day is returned untouched.
pub fn filter_past_slots(
    slots: &[TimeSlot],
    date: CalendarDate,
    now: NaiveDateTime,
    policy: &SlotPolicy,
) -> Vec<TimeSlot> {
    if date.naive() != now.date() {
        return slots.to_vec();
    }
    let boundary = policy.floor_to_step(TimeSlot::from(now.time()));
    slots.iter().copied().filter(|slot| *slot >= boundary).collect()
}

/// Normalises an occupied marker (`HH:MM` or `HH:MM:SS`) to a slot.
pub fn normalize_marker(marker: &str) -> Option<TimeSlot> {
    TimeSlot::parse(marker).ok()
}

fn occupied_set<I>(occupied: I) -> HashSet<TimeSlot>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    occupied
        .into_iter()
        .filter_map(|marker| normalize_marker(marker.as_ref()))
        .collect()
}

/// Removes slots claimed by an existing appointment.
///
/// Markers that do not correspond to any slot, or cannot be parsed, are
/// ignored.
pub fn filter_occupied<I>(slots: &[TimeSlot], occupied: I) -> Vec<TimeSlot>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let taken = occupied_set(occupied);
    slots
        .iter()
        .copied()
        .filter(|slot| !taken.contains(slot))
        .collect()
}

/// Flags occupied slots instead of removing them, for selectors that show
/// them disabled.
pub fn annotate_slots<I>(slots: &[TimeSlot], occupied: I) -> Vec<SlotOption>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let taken = occupied_set(occupied);
    slots
        .iter()
        .map(|slot| SlotOption {
            slot: *slot,
            occupied: taken.contains(slot),
        })
        .collect()
}

/// The slots actually offerable: generate, drop past, drop occupied.
pub fn effective_availability<I>(
    date: CalendarDate,
    occupied: I,
    now: NaiveDateTime,
    policy: &SlotPolicy,
) -> Vec<TimeSlot>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let generated = generate_slots(date, policy);
    let upcoming = filter_past_slots(&generated, date, now, policy);
    let available = filter_occupied(&upcoming, occupied);
    debug!(
        "Effective availability for {}: {} generated, {} upcoming, {} free",
        date,
        generated.len(),
        upcoming.len(),
        available.len()
    );
    available
}

// --- Submission Validation ---

/// Checks a candidate booking independently of any displayed slot list.
///
/// Free-form entry is possible in some flows, so this encodes the same
/// business rule as [`generate_slots`] rather than trusting the list.
pub fn validate_candidate(
    date: CalendarDate,
    time: TimeSlot,
    now: NaiveDateTime,
    policy: &SlotPolicy,
) -> Result<(), SlotRejection> {
    if date.at(time) <= now {
        return Err(SlotRejection::PastDateTime);
    }
    if classify_day(date) == DayKind::Weekend {
        return Err(SlotRejection::WeekendUnavailable {
            channel: policy.contact_channel.clone(),
        });
    }
    if !policy.within_hours(time) {
        return Err(SlotRejection::OutsideBusinessHours {
            opens: policy.opens,
            closes: policy.closes,
        });
    }
    Ok(())
}

// --- Timestamp Helpers ---

/// Splits an appointment timestamp (`YYYY-MM-DDTHH:MM[:SS]`) into its day
/// and time of day.
pub fn split_timestamp(timestamp: &str) -> Option<(CalendarDate, TimeSlot)> {
    let trimmed = timestamp.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    Some((CalendarDate::new(parsed.date()), TimeSlot::from(parsed.time())))
}

/// The occupied marker an appointment timestamp claims.
pub fn marker_from_timestamp(timestamp: &str) -> Option<TimeSlot> {
    split_timestamp(timestamp).map(|(_, time)| time)
}

/// Formats a booking timestamp the way the appointment API expects it.
pub fn booking_timestamp(date: CalendarDate, time: TimeSlot) -> String {
    format!("{}T{}:00", date, time)
}

/// The days a booking form may offer, from `today` through `months` ahead.
pub fn booking_horizon(today: CalendarDate, months: u32) -> BookingHorizon {
    BookingHorizon {
        first: today,
        last: today.add_months(months),
    }
}
