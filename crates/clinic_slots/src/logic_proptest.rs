#[cfg(test)]
mod tests {
    use crate::logic::{
        classify_day, effective_availability, filter_occupied, filter_past_slots, generate_slots,
        validate_candidate,
    };
    use crate::model::{CalendarDate, DayKind, SlotPolicy, TimeSlot};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    // Helper function to build a date from an offset around a fixed anchor
    fn date_from_offset(offset_days: i64) -> CalendarDate {
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        CalendarDate::new(anchor + Duration::days(offset_days))
    }

    // Helper function to build a wall-clock instant on a given day
    fn instant(date: CalendarDate, minute_of_day: u16) -> NaiveDateTime {
        date.at(TimeSlot::from_minutes(minute_of_day).unwrap())
    }

    fn policy_strategy() -> impl Strategy<Value = SlotPolicy> {
        any::<bool>().prop_map(|include_closing_slot| SlotPolicy {
            include_closing_slot,
            ..SlotPolicy::default()
        })
    }

    fn marker_strategy() -> impl Strategy<Value = String> {
        (0u16..24, prop::sample::select(vec![0u16, 15, 30, 45]), any::<bool>()).prop_map(
            |(hour, minute, with_seconds)| {
                if with_seconds {
                    format!("{:02}:{:02}:00", hour, minute)
                } else {
                    format!("{:02}:{:02}", hour, minute)
                }
            },
        )
    }

    proptest! {
        // Weekend days never produce slots, business days always produce the full day
        #[test]
        fn test_generated_slot_count_matches_day_kind(
            offset in 0..730i64,
            policy in policy_strategy(),
        ) {
            let date = date_from_offset(offset);
            let slots = generate_slots(date, &policy);
            match classify_day(date) {
                DayKind::Weekend => prop_assert!(slots.is_empty()),
                DayKind::Business => {
                    let expected = if policy.include_closing_slot { 25 } else { 24 };
                    prop_assert_eq!(slots.len(), expected);
                }
            }
        }

        // Generated slots stay inside the window and are strictly ascending
        #[test]
        fn test_generated_slots_within_window(
            offset in 0..730i64,
            policy in policy_strategy(),
        ) {
            let slots = generate_slots(date_from_offset(offset), &policy);
            for slot in &slots {
                prop_assert!(policy.within_hours(*slot), "slot {} outside window", slot);
                prop_assert_eq!(slot.minutes_since_midnight() % policy.step_minutes, 0);
            }
            for pair in slots.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }

        // Occupied filtering is an order-preserving set difference
        #[test]
        fn test_filter_occupied_is_set_difference(
            offset in 0..730i64,
            markers in prop::collection::vec(marker_strategy(), 0..12),
        ) {
            let slots = generate_slots(date_from_offset(offset), &SlotPolicy::default());
            let free = filter_occupied(&slots, &markers);

            prop_assert!(free.iter().all(|slot| slots.contains(slot)));
            let taken: Vec<TimeSlot> = markers
                .iter()
                .filter_map(|m| TimeSlot::parse(m).ok())
                .collect();
            for slot in &slots {
                prop_assert_eq!(free.contains(slot), !taken.contains(slot));
            }
            let positions: Vec<usize> = free
                .iter()
                .filter_map(|slot| slots.iter().position(|s| s == slot))
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        // Filtering past slots never invents slots and never keeps one before the boundary
        #[test]
        fn test_filter_past_slots_is_subset(
            offset in 0..730i64,
            minute_of_day in 0u16..1440,
        ) {
            let policy = SlotPolicy::default();
            let date = date_from_offset(offset);
            let slots = generate_slots(date, &policy);
            let now = instant(date, minute_of_day);
            let kept = filter_past_slots(&slots, date, now, &policy);

            prop_assert!(kept.iter().all(|slot| slots.contains(slot)));
            let opens = policy.opens().minutes_since_midnight();
            let elapsed = minute_of_day.saturating_sub(opens);
            let boundary = opens + elapsed - elapsed % policy.step_minutes();
            for slot in &kept {
                prop_assert!(slot.minutes_since_midnight() >= boundary);
            }
        }

        // Every offered slot that is still in the future passes submission validation
        #[test]
        fn test_effective_slots_validate(
            offset in 0..730i64,
            days_ahead in 0..3i64,
            minute_of_day in 0u16..1440,
            markers in prop::collection::vec(marker_strategy(), 0..6),
            policy in policy_strategy(),
        ) {
            let today = date_from_offset(offset);
            let now = instant(today, minute_of_day);
            let date = date_from_offset(offset + days_ahead);

            for slot in effective_availability(date, &markers, now, &policy) {
                if date.at(slot) > now {
                    prop_assert_eq!(validate_candidate(date, slot, now, &policy), Ok(()));
                }
            }
        }
    }
}
