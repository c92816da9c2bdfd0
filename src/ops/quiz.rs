use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::data_item::DataItem;
use crate::model::doc::Doc;

/// How a quiz question was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizOutcome {
    Pass,
    Fail,
}

/// Transient quiz state: which tags are in scope and which question is on
/// screen. Never persisted; the caller discards it when the quiz closes.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    /// User-chosen quiz scope
    pub selected_tags: Vec<String>,
    /// The question currently shown, if any
    pub current: Option<Doc<DataItem>>,
}

impl QuizSession {
    pub fn new() -> Self {
        QuizSession::default()
    }

    /// Questions eligible for selection: items of question kind whose
    /// tags intersect the selected tags.
    ///
    /// Inclusive OR semantics, unlike the screen filter's AND: any one
    /// selected tag qualifies an item. An empty selection intersects
    /// nothing, so the pool is empty.
    pub fn pool<'a>(&self, items: &'a [Doc<DataItem>]) -> Vec<&'a Doc<DataItem>> {
        items
            .iter()
            .filter(|doc| doc.data.kind.is_question())
            .filter(|doc| self.selected_tags.iter().any(|tag| doc.data.has_tag(tag)))
            .collect()
    }

    /// Replace the tag selection. The caller re-draws afterwards.
    pub fn select_tags(&mut self, tags: Vec<String>) {
        self.selected_tags = tags;
    }

    /// Draw the next question: a uniformly random pick from the pool.
    /// Repeats are allowed; an empty pool clears the current question.
    pub fn advance(&mut self, items: &[Doc<DataItem>], rng: &mut impl Rng) {
        let pool = self.pool(items);
        self.current = if pool.is_empty() {
            None
        } else {
            Some(pool[rng.gen_range(0..pool.len())].clone())
        };
    }

    /// Take the current question as an answered one.
    ///
    /// Returns the (id, outcome) pair the caller hands to the store,
    /// which owns the counter update; the selector itself never does I/O.
    pub fn answer(&mut self, outcome: QuizOutcome) -> Option<(String, QuizOutcome)> {
        self.current.take().map(|doc| (doc.id, outcome))
    }
}

/// Apply an answer to an item's counters (the store-side half of
/// `QuizSession::answer`).
pub fn apply_answer(item: &mut DataItem, outcome: QuizOutcome) {
    match outcome {
        QuizOutcome::Pass => item.quizz_ok = Some(item.quizz_ok.unwrap_or(0) + 1),
        QuizOutcome::Fail => item.quizz_ko = Some(item.quizz_ko.unwrap_or(0) + 1),
    }
}
