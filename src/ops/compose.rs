use indexmap::IndexMap;

use crate::model::data_item::DataItem;
use crate::model::doc::Doc;
use crate::model::screen::{FlexDirection, Screen, Section};
use crate::ops::tags::filter_by_tags;

/// One bucket of the numeric aggregation series
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// A section leaf resolved against the data collection
#[derive(Debug)]
pub struct SectionView<'a> {
    pub section: &'a Section,
    /// Items whose tags contain every section tag
    pub items: Vec<&'a Doc<DataItem>>,
    /// Aggregation series, present only when the section matched
    /// something and everything it matched is numeric
    pub series: Option<Vec<Slice>>,
}

#[derive(Debug)]
pub struct RowColumnView<'a> {
    pub flex: f64,
    pub flex_direction: FlexDirection,
    pub name: &'a str,
    pub sections: Vec<SectionView<'a>>,
}

/// A whole screen resolved against the data collection. Pure layout
/// logic; drawing it is the TUI's problem.
#[derive(Debug)]
pub struct ScreenView<'a> {
    pub flex_direction: FlexDirection,
    pub name: &'a str,
    pub rows_columns: Vec<RowColumnView<'a>>,
}

/// Walk the screen tree and fill every section leaf with the items its
/// tag query matches. Deterministic given identical input ordering.
pub fn compose<'a>(screen: &'a Screen, items: &'a [Doc<DataItem>]) -> ScreenView<'a> {
    let rows_columns = screen
        .rows_columns
        .iter()
        .map(|rc| RowColumnView {
            flex: rc.flex,
            flex_direction: rc.flex_direction,
            name: &rc.name,
            sections: rc
                .sections
                .iter()
                .map(|section| compose_section(section, items))
                .collect(),
        })
        .collect();

    ScreenView {
        flex_direction: screen.flex_direction,
        name: &screen.name,
        rows_columns,
    }
}

fn compose_section<'a>(section: &'a Section, items: &'a [Doc<DataItem>]) -> SectionView<'a> {
    let matched = filter_by_tags(items, &section.tags);
    let all_numeric = !matched.is_empty() && matched.iter().all(|doc| doc.data.kind.is_numeric());
    let series = all_numeric.then(|| aggregate_numeric(&section.tags, &matched));

    SectionView {
        section,
        items: matched,
        series,
    }
}

/// Group numeric items by the tags left over once the section's own query
/// tags are removed, summing `field2` per group.
///
/// The last residual tag (in stored order) names an item's bucket; items
/// with no residual tags do not contribute. Bucket order is first-seen.
pub fn aggregate_numeric(section_tags: &[String], items: &[&Doc<DataItem>]) -> Vec<Slice> {
    let mut buckets: IndexMap<String, f64> = IndexMap::new();

    for doc in items {
        let bucket = doc
            .data
            .tags
            .iter()
            .rev()
            .find(|tag| !section_tags.contains(tag));
        if let Some(label) = bucket {
            let value = doc.data.field2.as_number().unwrap_or(0.0);
            *buckets.entry(label.clone()).or_insert(0.0) += value;
        }
    }

    buckets
        .into_iter()
        .map(|(label, value)| Slice { label, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data_item::{ItemKind, Value};

    fn numeric(id: &str, tags: &[&str], value: f64) -> Doc<DataItem> {
        Doc::new(
            id,
            DataItem::new(
                ItemKind::Numeric,
                Value::Number(value),
                tags.iter().map(|t| t.to_string()).collect(),
                "a@b.c".into(),
            ),
        )
    }

    fn note(id: &str, tags: &[&str]) -> Doc<DataItem> {
        Doc::new(
            id,
            DataItem::new(
                ItemKind::Text,
                Value::Text("a note".into()),
                tags.iter().map(|t| t.to_string()).collect(),
                "a@b.c".into(),
            ),
        )
    }

    fn screen_with_tags(tags: &[&str]) -> Screen {
        let mut screen = Screen::new("view");
        screen.rows_columns[0].sections[0].tags =
            tags.iter().map(|t| t.to_string()).collect();
        screen
    }

    #[test]
    fn section_series_buckets_by_residual_tag() {
        let items = vec![
            numeric("1", &["math", "easy"], 3.0),
            numeric("2", &["math", "hard"], 7.0),
        ];
        let screen = screen_with_tags(&["math"]);

        let view = compose(&screen, &items);
        let section = &view.rows_columns[0].sections[0];
        assert_eq!(section.items.len(), 2);
        assert_eq!(
            section.series.as_deref(),
            Some(
                &[
                    Slice {
                        label: "easy".into(),
                        value: 3.0
                    },
                    Slice {
                        label: "hard".into(),
                        value: 7.0
                    }
                ][..]
            )
        );
    }

    #[test]
    fn same_bucket_sums() {
        let items = vec![
            numeric("1", &["spend", "food"], 10.0),
            numeric("2", &["spend", "food"], 2.5),
            numeric("3", &["spend", "rent"], 800.0),
        ];
        let series = aggregate_numeric(
            &["spend".to_string()],
            &items.iter().collect::<Vec<_>>(),
        );
        assert_eq!(
            series,
            vec![
                Slice {
                    label: "food".into(),
                    value: 12.5
                },
                Slice {
                    label: "rent".into(),
                    value: 800.0
                }
            ]
        );
    }

    #[test]
    fn last_residual_tag_names_the_bucket() {
        // Two residual tags: the later one in stored order wins
        let items = vec![numeric("1", &["spend", "food", "snacks"], 4.0)];
        let series = aggregate_numeric(
            &["spend".to_string()],
            &items.iter().collect::<Vec<_>>(),
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "snacks");
    }

    #[test]
    fn items_with_no_residual_tags_are_skipped() {
        let items = vec![
            numeric("1", &["spend"], 99.0),
            numeric("2", &["spend", "rent"], 800.0),
        ];
        let series = aggregate_numeric(
            &["spend".to_string()],
            &items.iter().collect::<Vec<_>>(),
        );
        assert_eq!(
            series,
            vec![Slice {
                label: "rent".into(),
                value: 800.0
            }]
        );
    }

    #[test]
    fn mixed_kinds_suppress_the_series() {
        let items = vec![
            numeric("1", &["math", "easy"], 3.0),
            note("2", &["math", "hard"]),
        ];
        let screen = screen_with_tags(&["math"]);
        let view = compose(&screen, &items);
        assert!(view.rows_columns[0].sections[0].series.is_none());
    }

    #[test]
    fn empty_match_has_no_series() {
        let items = vec![numeric("1", &["math"], 3.0)];
        let screen = screen_with_tags(&["chemistry"]);
        let view = compose(&screen, &items);
        let section = &view.rows_columns[0].sections[0];
        assert!(section.items.is_empty());
        assert!(section.series.is_none());
    }

    #[test]
    fn untagged_section_shows_everything() {
        let items = vec![note("1", &["math"]), note("2", &[])];
        let screen = screen_with_tags(&[]);
        let view = compose(&screen, &items);
        assert_eq!(view.rows_columns[0].sections[0].items.len(), 2);
    }
}
