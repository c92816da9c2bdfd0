use crate::model::data_item::DataItem;
use crate::model::doc::Doc;

/// Collect every distinct tag across `items`, in first-seen order (item
/// order, then tag order within an item), skipping tags already in
/// `exclude`. Used for tag autocomplete, where the excluded tags are the
/// ones already selected.
pub fn distinct_tags(items: &[Doc<DataItem>], exclude: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for doc in items {
        for tag in &doc.data.tags {
            if !tags.iter().any(|t| t == tag) && !exclude.iter().any(|t| t == tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

/// Select the items whose tag set contains **every** query tag.
///
/// An empty query means "no filter": all items come back unchanged. Input
/// order is preserved; no matches is an empty list, never an error.
pub fn filter_by_tags<'a>(items: &'a [Doc<DataItem>], query: &[String]) -> Vec<&'a Doc<DataItem>> {
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|doc| query.iter().all(|tag| doc.data.has_tag(tag)))
        .collect()
}
