use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::error::SessionError;

/// An ordered list of activities, immutable once constructed.
///
/// The progress cursor lives in the session controller; a `Sequence` is
/// only the content being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    id: String,
    title: String,
    activities: Vec<Activity>,
}

impl Sequence {
    /// Validates that the sequence is non-empty and that activity ids are
    /// unique within it.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        activities: Vec<Activity>,
    ) -> Result<Self, SessionError> {
        if activities.is_empty() {
            return Err(SessionError::EmptySequence);
        }
        let mut seen = HashSet::new();
        for activity in &activities {
            if !seen.insert(activity.id.as_str()) {
                return Err(SessionError::DuplicateActivityId(activity.id.clone()));
            }
        }
        Ok(Self {
            id: id.into(),
            title: title.into(),
            activities,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.activities.iter().map(|a| a.duration_secs).sum()
    }

    /// Cumulative seconds up to (but not including) `index`.
    pub fn cumulative_secs(&self, index: usize) -> u64 {
        self.activities
            .iter()
            .take(index)
            .map(|a| a.duration_secs)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityKind, ActivityPayload, Tone};

    fn activity(id: &str, duration_secs: u64) -> Activity {
        Activity {
            id: id.into(),
            kind: ActivityKind::Focus,
            title: format!("activity {id}"),
            description: String::new(),
            duration_secs,
            tone: Tone::Neutral,
            payload: ActivityPayload::None,
        }
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let err = Sequence::new("s", "Empty", vec![]).unwrap_err();
        assert_eq!(err, SessionError::EmptySequence);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err =
            Sequence::new("s", "Dup", vec![activity("a", 10), activity("a", 20)]).unwrap_err();
        assert_eq!(err, SessionError::DuplicateActivityId("a".into()));
    }

    #[test]
    fn total_and_cumulative_duration() {
        let seq = Sequence::new(
            "s",
            "Three",
            vec![activity("a", 30), activity("b", 45), activity("c", 30)],
        )
        .unwrap();
        assert_eq!(seq.total_duration_secs(), 105);
        assert_eq!(seq.cumulative_secs(0), 0);
        assert_eq!(seq.cumulative_secs(2), 75);
        assert_eq!(seq.cumulative_secs(3), 105);
    }
}
