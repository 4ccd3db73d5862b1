//! Growth-rate classification for mention counts between two periods.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::{RisingMention, RisingStatus};

pub const HOT_VELOCITY: f64 = 1.0;
pub const HOT_MIN_COUNT: i64 = 3;
pub const RISING_VELOCITY: f64 = 0.5;
pub const NEW_MIN_COUNT: i64 = 2;

/// Returns the velocity and status for one name. `previous == 0` means the
/// name was not seen in the earlier period.
pub fn classify(current: i64, previous: i64) -> (f64, Option<RisingStatus>) {
    if previous == 0 {
        return (current as f64, Some(RisingStatus::New));
    }

    let velocity = (current - previous) as f64 / previous as f64;
    let status = if velocity > HOT_VELOCITY && current >= HOT_MIN_COUNT {
        Some(RisingStatus::Hot)
    } else if velocity > RISING_VELOCITY {
        Some(RisingStatus::Rising)
    } else {
        None
    };
    (velocity, status)
}

/// Whether a classified name belongs in the rising list. A single sighting
/// of a new name is noise.
pub fn is_reported(status: RisingStatus, current: i64) -> bool {
    match status {
        RisingStatus::New => current >= NEW_MIN_COUNT,
        RisingStatus::Hot | RisingStatus::Rising => true,
    }
}

/// Compares `current` against `previous` for every name in `current`,
/// keeps reported entries and orders them by velocity, highest first.
/// Equal velocities are ordered by name.
pub fn rank_rising(
    entity_type: &str,
    current: &HashMap<String, i64>,
    previous: &HashMap<String, i64>,
    limit: usize,
) -> Vec<RisingMention> {
    let mut results: Vec<RisingMention> = current
        .iter()
        .filter_map(|(name, &current_count)| {
            let previous_count = previous.get(name).copied().unwrap_or(0);
            let (velocity, status) = classify(current_count, previous_count);
            let status = status.filter(|s| is_reported(*s, current_count))?;
            Some(RisingMention {
                name: name.clone(),
                entity_type: entity_type.to_string(),
                current_count,
                previous_count,
                velocity,
                status,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.velocity
            .partial_cmp(&a.velocity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
        pairs
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn more_than_doubling_with_three_mentions_is_hot() {
        let (velocity, status) = classify(8, 3);
        assert!((velocity - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(status, Some(RisingStatus::Hot));
    }

    #[test]
    fn exact_doubling_is_rising_not_hot() {
        let (velocity, status) = classify(2, 1);
        assert!((velocity - HOT_VELOCITY).abs() < 1e-9);
        assert_eq!(status, Some(RisingStatus::Rising));

        let (_, status) = classify(5, 2);
        assert_eq!(status, Some(RisingStatus::Hot));
    }

    #[test]
    fn moderate_growth_is_rising() {
        let (velocity, status) = classify(7, 4);
        assert!((velocity - 0.75).abs() < 1e-9);
        assert_eq!(status, Some(RisingStatus::Rising));
    }

    #[test]
    fn thresholds_are_exclusive() {
        // exactly 0.5
        assert_eq!(classify(6, 4).1, None);
        // exactly 1.0 with enough mentions
        assert_eq!(classify(8, 4).1, Some(RisingStatus::Rising));
    }

    #[test]
    fn flat_or_falling_has_no_status() {
        assert_eq!(classify(4, 4).1, None);
        let (velocity, status) = classify(1, 4);
        assert!(velocity < 0.0);
        assert_eq!(status, None);
    }

    #[test]
    fn unseen_names_are_new_with_raw_velocity() {
        assert_eq!(classify(4, 0), (4.0, Some(RisingStatus::New)));
        assert_eq!(classify(1, 0), (1.0, Some(RisingStatus::New)));
        assert!(is_reported(RisingStatus::New, 4));
        assert!(!is_reported(RisingStatus::New, 1));
    }

    #[test]
    fn ranking_filters_sorts_and_truncates() {
        let current = counts(&[
            ("Hot Person", 8),
            ("Rising Person", 7),
            ("New Person", 4),
            ("Lonely Newcomer", 1),
            ("Flat Person", 5),
        ]);
        let previous = counts(&[
            ("Hot Person", 3),
            ("Rising Person", 4),
            ("Flat Person", 5),
            ("Gone Person", 9),
        ]);

        let ranked = rank_rising("PERSON", &current, &previous, 10);
        let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["New Person", "Hot Person", "Rising Person"]);
        assert!(ranked.iter().all(|m| m.entity_type == "PERSON"));
        assert_eq!(ranked[1].previous_count, 3);
        assert_eq!(ranked[1].current_count, 8);

        let top = rank_rising("PERSON", &current, &previous, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].status, RisingStatus::New);
    }

    #[test]
    fn equal_velocities_order_by_name() {
        let current = counts(&[("Zed", 3), ("Amy", 3)]);
        let ranked = rank_rising("PERSON", &current, &HashMap::new(), 10);
        assert_eq!(ranked[0].name, "Amy");
        assert_eq!(ranked[1].name, "Zed");
    }
}
