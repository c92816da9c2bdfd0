use serde::{Deserialize, Serialize};

/// A stored document together with its store-assigned id.
///
/// Ids are opaque strings minted by the store when a document is first
/// added; they never change afterwards. The document body itself never
/// contains its own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doc<T> {
    pub id: String,
    pub data: T,
}

impl<T> Doc<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Doc {
            id: id.into(),
            data,
        }
    }
}
