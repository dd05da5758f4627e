use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Unseen,
    SeenAt(usize),
}

/// All lines of one file that share a duplication key, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: String,
    pub lines: Vec<usize>,
}

/// File-scoped record of which key was first seen on which line. Once a key
/// repeats, its group keeps every line that carried it, the first one
/// included. Lines must be observed in ascending order.
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    first_seen: HashMap<String, usize>,
    group_slots: HashMap<String, usize>,
    groups: Vec<DuplicateGroup>,
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: String, line: usize) -> Observation {
        let Some(&first_line) = self.first_seen.get(&key) else {
            self.first_seen.insert(key, line);
            return Observation::Unseen;
        };

        match self.group_slots.get(&key) {
            Some(&slot) => self.groups[slot].lines.push(line),
            None => {
                self.group_slots.insert(key.clone(), self.groups.len());
                self.groups.push(DuplicateGroup {
                    key,
                    lines: vec![first_line, line],
                });
            }
        }
        Observation::SeenAt(first_line)
    }

    /// Repeated keys in the order their first repeat was observed.
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_is_unseen() {
        let mut tracker = DuplicateTracker::new();
        assert_eq!(tracker.observe("08-01-2025 payment".into(), 1), Observation::Unseen);
        assert_eq!(tracker.observe("09-01-2025 payment".into(), 2), Observation::Unseen);
        assert!(tracker.into_groups().is_empty());
    }

    #[test]
    fn test_repeat_recovers_original_line() {
        let mut tracker = DuplicateTracker::new();
        tracker.observe("k".into(), 2);
        tracker.observe("other".into(), 3);
        assert_eq!(tracker.observe("k".into(), 5), Observation::SeenAt(2));
        assert_eq!(tracker.observe("k".into(), 9), Observation::SeenAt(2));

        assert_eq!(
            tracker.into_groups(),
            vec![DuplicateGroup {
                key: "k".into(),
                lines: vec![2, 5, 9]
            }]
        );
    }

    #[test]
    fn test_groups_follow_first_repeat_order() {
        let mut tracker = DuplicateTracker::new();
        tracker.observe("a".into(), 1);
        tracker.observe("b".into(), 2);
        tracker.observe("b".into(), 3);
        tracker.observe("a".into(), 4);

        let groups = tracker.into_groups();
        assert_eq!(
            groups,
            vec![
                DuplicateGroup {
                    key: "b".into(),
                    lines: vec![2, 3]
                },
                DuplicateGroup {
                    key: "a".into(),
                    lines: vec![1, 4]
                },
            ]
        );
    }
}
