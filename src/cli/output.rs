use serde::Serialize;

use crate::model::data_item::DataItem;
use crate::model::doc::Doc;
use crate::model::screen::Screen;
use crate::ops::compose::ScreenView;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub item: &'a DataItem,
}

#[derive(Serialize)]
pub struct ItemListJson<'a> {
    pub items: Vec<ItemJson<'a>>,
}

#[derive(Serialize)]
pub struct TagsJson {
    pub tags: Vec<String>,
}

#[derive(Serialize)]
pub struct ScreenSummaryJson<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<&'a str>,
    pub rows_columns: usize,
    pub sections: usize,
}

#[derive(Serialize)]
pub struct ScreenListJson<'a> {
    pub screens: Vec<ScreenSummaryJson<'a>>,
}

pub fn screen_summary<'a>(doc: &'a Doc<Screen>) -> ScreenSummaryJson<'a> {
    ScreenSummaryJson {
        id: &doc.id,
        name: &doc.data.name,
        owner: doc.data.owner_email.as_deref(),
        rows_columns: doc.data.rows_columns.len(),
        sections: doc.data.rows_columns.iter().map(|rc| rc.sections.len()).sum(),
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).expect("serializable output"));
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One-line item summary: `id  [kind] title · content  #tags`
pub fn item_line(doc: &Doc<DataItem>) -> String {
    let item = &doc.data;
    let mut line = format!("{}  [{}]", doc.id, item.kind.name());
    if let Some(title) = &item.field1 {
        line.push_str(&format!(" {} ·", title));
    }
    line.push(' ');
    line.push_str(&item.field2.display());
    for tag in &item.tags {
        line.push_str(&format!(" #{}", tag));
    }
    if item.kind.is_question() {
        let ok = item.quizz_ok.unwrap_or(0);
        let ko = item.quizz_ko.unwrap_or(0);
        if ok + ko > 0 {
            line.push_str(&format!("  ({ok} pass / {ko} fail)"));
        }
    }
    line
}

pub fn print_items(items: &[&Doc<DataItem>]) {
    if items.is_empty() {
        println!("no items");
        return;
    }
    for doc in items {
        println!("{}", item_line(doc));
    }
}

/// Indented tree dump of a composed screen
pub fn print_screen_view(view: &ScreenView) {
    println!(
        "{} ({:?})",
        if view.name.is_empty() { "(unnamed)" } else { view.name },
        view.flex_direction
    );
    for (row_idx, rc) in view.rows_columns.iter().enumerate() {
        let name = if rc.name.is_empty() { "" } else { rc.name };
        println!("  [{}] {} ({:?}, flex {})", row_idx, name, rc.flex_direction, rc.flex);
        for (section_idx, section) in rc.sections.iter().enumerate() {
            let tags = if section.section.tags.is_empty() {
                "(all items)".to_string()
            } else {
                section
                    .section
                    .tags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            let name = if section.section.name.is_empty() {
                String::new()
            } else {
                format!("{} ", section.section.name)
            };
            println!(
                "    [{}.{}] {}{}: {} item(s)",
                row_idx,
                section_idx,
                name,
                tags,
                section.items.len()
            );
            for doc in &section.items {
                println!("      {}", item_line(doc));
            }
            if let Some(series) = &section.series {
                println!("      totals:");
                for slice in series {
                    println!("        {}: {}", slice.label, slice.value);
                }
            }
        }
    }
}
