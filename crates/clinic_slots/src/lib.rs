// --- File: crates/clinic_slots/src/lib.rs ---
// Declare modules within this crate
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod model;

pub use logic::{
    annotate_slots, booking_horizon, booking_timestamp, classify_day, effective_availability,
    filter_occupied, filter_past_slots, generate_slots, marker_from_timestamp, normalize_marker,
    split_timestamp, validate_candidate, SlotRejection,
};
pub use model::{
    BookingHorizon, CalendarDate, DayKind, SlotError, SlotOption, SlotPolicy, TimeSlot,
};
