//! CAD120 dataset vocabulary.
//!
//! Activity and sub-activity lists are sorted so that indexes are stable
//! across runs.

/// Subjects present in the corrected labeling release.
pub const SUBJECTS: [&str; 4] = ["Subject1", "Subject3", "Subject4", "Subject5"];

/// Super-activities, sorted.
pub const ACTIVITIES: [&str; 10] = [
    "arranging_objects",
    "cleaning_objects",
    "having_meal",
    "making_cereal",
    "microwaving_food",
    "picking_objects",
    "stacking_objects",
    "taking_food",
    "taking_medicine",
    "unstacking_objects",
];

/// Sub-activity labels, sorted.
pub const SUB_ACTIVITIES: [&str; 10] = [
    "cleaning",
    "closing",
    "drinking",
    "eating",
    "moving",
    "null",
    "opening",
    "placing",
    "pouring",
    "reaching",
];

/// Index of a super-activity in [`ACTIVITIES`].
pub fn activity_index(name: &str) -> Option<usize> {
    ACTIVITIES.binary_search(&name).ok()
}

/// Index of a sub-activity in [`SUB_ACTIVITIES`].
pub fn sub_activity_index(name: &str) -> Option<usize> {
    SUB_ACTIVITIES.binary_search(&name).ok()
}

/// Default subject list as owned strings.
pub fn default_subjects() -> Vec<String> {
    SUBJECTS.iter().map(|s| s.to_string()).collect()
}

/// Default activity list as owned strings.
pub fn default_activities() -> Vec<String> {
    ACTIVITIES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_sorted() {
        assert!(ACTIVITIES.windows(2).all(|w| w[0] < w[1]));
        assert!(SUB_ACTIVITIES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_indexes() {
        assert_eq!(activity_index("arranging_objects"), Some(0));
        assert_eq!(activity_index("unstacking_objects"), Some(9));
        assert_eq!(sub_activity_index("reaching"), Some(9));
        assert_eq!(sub_activity_index("null"), Some(5));
        assert_eq!(sub_activity_index("juggling"), None);
    }
}
