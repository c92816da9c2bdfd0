pub mod json_store;

pub use json_store::JsonStore;

use std::path::PathBuf;

use crate::model::data_item::DataItem;
use crate::model::doc::Doc;
use crate::model::preference::UserPreference;
use crate::model::screen::Screen;
use crate::model::session::Session;
use crate::ops::quiz::QuizOutcome;

/// Error type for store operations.
///
/// Store failures never panic through the core logic; callers report them
/// and leave the in-memory state as it was.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no document with id {0}")]
    NotFound(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The persistence collaborator: flat collections of documents with
/// store-assigned ids and owner-scoped reads.
///
/// Fetches return only documents owned by the session's viewer emails; a
/// session with no viewers reads nothing. Writes are owner-agnostic here,
/// ownership policy sits with the caller.
pub trait Store {
    fn fetch_data_items(&self, session: &Session) -> Result<Vec<Doc<DataItem>>, StoreError>;
    fn fetch_screens(&self, session: &Session) -> Result<Vec<Doc<Screen>>, StoreError>;

    /// Add a new item; returns the assigned id.
    fn add_data_item(&mut self, item: &DataItem) -> Result<String, StoreError>;
    fn update_data_item(&mut self, id: &str, item: &DataItem) -> Result<(), StoreError>;
    fn delete_data_item(&mut self, id: &str) -> Result<(), StoreError>;

    /// Add a new screen; returns the assigned id.
    fn add_screen(&mut self, screen: &Screen) -> Result<String, StoreError>;
    fn update_screen(&mut self, id: &str, screen: &Screen) -> Result<(), StoreError>;
    fn delete_screen(&mut self, id: &str) -> Result<(), StoreError>;

    /// The session user's stored preference, if any.
    fn fetch_preference(&self, session: &Session)
    -> Result<Option<Doc<UserPreference>>, StoreError>;
    /// Create or replace the preference document for its owner.
    fn save_preference(&mut self, pref: &UserPreference) -> Result<(), StoreError>;

    /// Bump the pass/fail counter of a question item.
    fn record_quiz_answer(&mut self, id: &str, outcome: QuizOutcome) -> Result<(), StoreError>;
}
