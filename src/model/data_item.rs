use chrono::Local;
use serde::{Deserialize, Serialize};

/// What kind of content a data item holds.
///
/// The kind drives both input validation (numeric items must carry a
/// number) and how the item is displayed (questions get quiz affordances).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Short free text
    Text,
    /// Multi-line free text
    Longtext,
    /// A URL or file reference
    Link,
    /// A numeric fact; eligible for per-tag aggregation
    Numeric,
    /// A question eligible for the quiz pool
    Question,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Text,
        ItemKind::Longtext,
        ItemKind::Link,
        ItemKind::Numeric,
        ItemKind::Question,
    ];

    /// The lowercase name used on the wire and on the command line
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Longtext => "longtext",
            ItemKind::Link => "link",
            ItemKind::Numeric => "numeric",
            ItemKind::Question => "question",
        }
    }

    pub fn from_name(s: &str) -> Option<ItemKind> {
        ItemKind::ALL.into_iter().find(|k| k.name() == s)
    }

    pub fn is_numeric(self) -> bool {
        self == ItemKind::Numeric
    }

    pub fn is_question(self) -> bool {
        self == ItemKind::Question
    }
}

/// The content field of a data item: free text, or a number when the
/// item kind is numeric. Untagged so stored documents keep their plain
/// string-or-number shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value; `None` for text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => {
                // Whole numbers print without a trailing ".0"
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
        }
    }
}

/// A single tagged record: note, numeric fact, link or question.
///
/// Tags keep their insertion order; duplicates are not rejected at write
/// time, the tag index dedups on read. Field names follow the stored
/// document shape (camelCase, `type` for the kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    /// `YYYY-MM-DD`, stamped when the item is created
    pub creation_date: String,
    pub tags: Vec<String>,
    /// Optional title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field1: Option<String>,
    /// Content: text, or a number when `kind` is numeric
    pub field2: Value,
    /// Opaque image reference (carried through, never interpreted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub owner_email: String,
    /// Quiz pass counter (questions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quizz_ok: Option<u32>,
    /// Quiz fail counter (questions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quizz_ko: Option<u32>,
}

impl DataItem {
    /// Create a new item stamped with today's date.
    pub fn new(kind: ItemKind, field2: Value, tags: Vec<String>, owner_email: String) -> Self {
        DataItem {
            creation_date: today_str(),
            tags,
            field1: None,
            field2,
            image: None,
            images: Vec::new(),
            kind,
            owner_email,
            quizz_ok: None,
            quizz_ko: None,
        }
    }

    /// Does this item carry the given tag?
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Today's date as `YYYY-MM-DD`
pub fn today_str() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trips_as_plain_json() {
        let n: Value = serde_json::from_str("42.5").unwrap();
        assert_eq!(n, Value::Number(42.5));
        let s: Value = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(s, Value::Text("hello".into()));
        assert_eq!(serde_json::to_string(&n).unwrap(), "42.5");
    }

    #[test]
    fn item_serializes_with_stored_field_names() {
        let mut item = DataItem::new(
            ItemKind::Question,
            Value::Text("What is ownership?".into()),
            vec!["rust".into()],
            "a@b.c".into(),
        );
        item.quizz_ok = Some(3);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "question");
        assert_eq!(json["ownerEmail"], "a@b.c");
        assert_eq!(json["quizzOk"], 3);
        // Unset options are omitted entirely
        assert!(json.get("field1").is_none());
        assert!(json.get("quizzKo").is_none());
        assert!(json.get("images").is_none());
    }

    #[test]
    fn item_deserializes_numeric_field2() {
        let json = r#"{
            "creationDate": "2026-01-15",
            "tags": ["math", "easy"],
            "field2": 3,
            "type": "numeric",
            "ownerEmail": "a@b.c"
        }"#;
        let item: DataItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Numeric);
        assert_eq!(item.field2.as_number(), Some(3.0));
        assert!(item.images.is_empty());
    }
}
