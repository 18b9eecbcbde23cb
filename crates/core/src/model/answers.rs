use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::test::Test;

/// Selected option per answered question.
///
/// Unanswered questions are absent. Entries are never removed once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<QuestionId, String>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `question`. Returns `true` when the stored value changed.
    pub fn set(&mut self, question: QuestionId, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.0.get(&question) == Some(&value) {
            return false;
        }
        self.0.insert(question, value);
        true
    }

    #[must_use]
    pub fn get(&self, question: QuestionId) -> Option<&str> {
        self.0.get(&question).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, question: QuestionId) -> bool {
        self.0.contains_key(&question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.0.iter().map(|(id, value)| (*id, value.as_str()))
    }

    /// Drop entries whose question is not part of `test`.
    ///
    /// Returns the ids that were removed.
    pub fn retain_known(&mut self, test: &Test) -> Vec<QuestionId> {
        let unknown: Vec<QuestionId> = self
            .0
            .keys()
            .copied()
            .filter(|id| !test.contains_question(*id))
            .collect();
        for id in &unknown {
            self.0.remove(id);
        }
        unknown
    }
}

impl FromIterator<(QuestionId, String)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (QuestionId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Question positions marked for review. Session-local.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlaggedSet(BTreeSet<usize>);

impl FlaggedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `index`. Returns `true` if the index is now flagged.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.0.remove(&index) {
            false
        } else {
            self.0.insert(index);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, TestId};

    #[test]
    fn last_write_wins_per_question() {
        let mut answers = AnswerMap::new();
        assert!(answers.set(QuestionId::new(1), "A"));
        assert!(answers.set(QuestionId::new(2), "C"));
        assert!(answers.set(QuestionId::new(1), "B"));
        assert!(!answers.set(QuestionId::new(1), "B"));

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(QuestionId::new(1)), Some("B"));
        assert_eq!(answers.get(QuestionId::new(3)), None);
    }

    #[test]
    fn json_uses_question_ids_as_keys() {
        let mut answers = AnswerMap::new();
        answers.set(QuestionId::new(5), "Paris");
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"5":"Paris"}"#);

        let back: AnswerMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, answers);
    }

    #[test]
    fn retain_known_drops_foreign_questions() {
        let test = Test::new(
            TestId::new(1),
            "T",
            "S",
            1,
            vec![Question::new(QuestionId::new(1), "Q", None, vec!["A".into()]).unwrap()],
        )
        .unwrap();
        let mut answers: AnswerMap = [
            (QuestionId::new(1), "A".to_string()),
            (QuestionId::new(99), "Z".to_string()),
        ]
        .into_iter()
        .collect();

        let removed = answers.retain_known(&test);
        assert_eq!(removed, vec![QuestionId::new(99)]);
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn toggle_is_symmetric() {
        let mut flags = FlaggedSet::new();
        assert!(flags.toggle(3));
        assert!(flags.contains(3));
        assert!(!flags.toggle(3));
        assert!(flags.is_empty());
    }
}
