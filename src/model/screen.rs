use serde::{Deserialize, Serialize};

/// Layout direction of a screen or row/column container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    /// The opposite direction
    pub fn flipped(self) -> FlexDirection {
        match self {
            FlexDirection::Row => FlexDirection::Column,
            FlexDirection::Column => FlexDirection::Row,
        }
    }

    /// What a child of a container with this direction is called in the UI
    pub fn child_label(self) -> &'static str {
        match self {
            FlexDirection::Row => "column",
            FlexDirection::Column => "row",
        }
    }
}

/// Leaf layout node: a tag query plus display weight.
///
/// The tag list is the filter query for the items shown in this slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub flex: f64,
    pub name: String,
    pub tags: Vec<String>,
}

impl Default for Section {
    fn default() -> Self {
        Section {
            flex: 1.0,
            name: String::new(),
            tags: Vec::new(),
        }
    }
}

/// Mid-level layout node: an ordered run of sections laid out in one
/// direction. Stored documents call the child list `rowsColumns` at every
/// level, and that wire name is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowColumn {
    pub flex: f64,
    pub flex_direction: FlexDirection,
    pub name: String,
    #[serde(rename = "rowsColumns")]
    pub sections: Vec<Section>,
}

impl Default for RowColumn {
    fn default() -> Self {
        RowColumn {
            flex: 1.0,
            flex_direction: FlexDirection::Column,
            name: String::new(),
            sections: vec![Section::default()],
        }
    }
}

/// A named, user-owned layout tree.
///
/// Depth is fixed: Screen → RowColumn → Section. Structural invariants
/// (at least one RowColumn, at least one Section per RowColumn) are
/// enforced by the edit transforms in `ops::screen_ops`, which also keep
/// indices compact after removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub flex_direction: FlexDirection,
    pub name: String,
    pub rows_columns: Vec<RowColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl Screen {
    /// A fresh screen: one column-direction RowColumn holding one empty
    /// section, everything at flex 1.
    pub fn new(name: impl Into<String>) -> Self {
        Screen {
            flex_direction: FlexDirection::Row,
            name: name.into(),
            rows_columns: vec![RowColumn::default()],
            owner_email: None,
        }
    }

    pub fn row_column(&self, row: usize) -> Option<&RowColumn> {
        self.rows_columns.get(row)
    }

    pub fn section(&self, row: usize, section: usize) -> Option<&Section> {
        self.rows_columns.get(row)?.sections.get(section)
    }
}
