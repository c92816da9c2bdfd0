use crate::model::screen::{RowColumn, Screen, Section};

/// Error type for structural screen edits.
///
/// A rejected edit leaves the input untouched; callers treat it as a
/// no-op and report the reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("a screen keeps at least one row/column")]
    LastRowColumn,
    #[error("a row/column keeps at least one section")]
    LastSection,
    #[error("no row/column at index {0}")]
    RowOutOfBounds(usize),
    #[error("no section at index {section} in row/column {row}")]
    SectionOutOfBounds { row: usize, section: usize },
}

/// Which flexDirection a flip targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipTarget {
    Screen,
    RowColumn(usize),
}

fn check_row(screen: &Screen, row: usize) -> Result<(), EditError> {
    if row >= screen.rows_columns.len() {
        return Err(EditError::RowOutOfBounds(row));
    }
    Ok(())
}

fn check_section(screen: &Screen, row: usize, section: usize) -> Result<(), EditError> {
    check_row(screen, row)?;
    if section >= screen.rows_columns[row].sections.len() {
        return Err(EditError::SectionOutOfBounds { row, section });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Structural transforms
//
// Every transform takes the current tree by reference and returns a new
// tree; the caller swaps it in once the edit is accepted. No in-place
// mutation across edits.
// ---------------------------------------------------------------------------

/// Insert a fresh default row/column immediately after `after`.
pub fn insert_row_column(screen: &Screen, after: usize) -> Result<Screen, EditError> {
    check_row(screen, after)?;
    let mut next = screen.clone();
    next.rows_columns.insert(after + 1, RowColumn::default());
    Ok(next)
}

/// Insert a fresh default section into row/column `row`, immediately
/// after section `after`.
pub fn insert_section(screen: &Screen, row: usize, after: usize) -> Result<Screen, EditError> {
    check_section(screen, row, after)?;
    let mut next = screen.clone();
    next.rows_columns[row].sections.insert(after + 1, Section::default());
    Ok(next)
}

/// Remove the row/column at `row`. Rejected if it is the only one.
pub fn remove_row_column(screen: &Screen, row: usize) -> Result<Screen, EditError> {
    check_row(screen, row)?;
    if screen.rows_columns.len() == 1 {
        return Err(EditError::LastRowColumn);
    }
    let mut next = screen.clone();
    next.rows_columns.remove(row);
    Ok(next)
}

/// Remove the section at (`row`, `section`). Rejected if it is the only
/// section in that row/column.
pub fn remove_section(screen: &Screen, row: usize, section: usize) -> Result<Screen, EditError> {
    check_section(screen, row, section)?;
    if screen.rows_columns[row].sections.len() == 1 {
        return Err(EditError::LastSection);
    }
    let mut next = screen.clone();
    next.rows_columns[row].sections.remove(section);
    Ok(next)
}

/// Toggle row↔column on the screen itself or on one row/column.
pub fn flip_direction(screen: &Screen, target: FlipTarget) -> Result<Screen, EditError> {
    let mut next = screen.clone();
    match target {
        FlipTarget::Screen => {
            next.flex_direction = next.flex_direction.flipped();
        }
        FlipTarget::RowColumn(row) => {
            check_row(screen, row)?;
            next.rows_columns[row].flex_direction =
                next.rows_columns[row].flex_direction.flipped();
        }
    }
    Ok(next)
}

/// Set the name of a row/column, or of one of its sections when
/// `section` is given.
pub fn rename(
    screen: &Screen,
    row: usize,
    section: Option<usize>,
    name: &str,
) -> Result<Screen, EditError> {
    let mut next = screen.clone();
    match section {
        None => {
            check_row(screen, row)?;
            next.rows_columns[row].name = name.to_string();
        }
        Some(section) => {
            check_section(screen, row, section)?;
            next.rows_columns[row].sections[section].name = name.to_string();
        }
    }
    Ok(next)
}

/// Replace the tag query of the section at (`row`, `section`).
pub fn set_section_tags(
    screen: &Screen,
    row: usize,
    section: usize,
    tags: Vec<String>,
) -> Result<Screen, EditError> {
    check_section(screen, row, section)?;
    let mut next = screen.clone();
    next.rows_columns[row].sections[section].tags = tags;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::screen::FlexDirection;

    /// The default one-row, one-section screen
    fn sample_screen() -> Screen {
        Screen::new("study")
    }

    /// A screen with two rows of two sections, with distinguishable names
    fn wide_screen() -> Screen {
        let screen = sample_screen();
        let screen = insert_row_column(&screen, 0).unwrap();
        let screen = insert_section(&screen, 0, 0).unwrap();
        let screen = insert_section(&screen, 1, 0).unwrap();
        let screen = rename(&screen, 0, None, "top").unwrap();
        let screen = rename(&screen, 1, None, "bottom").unwrap();
        rename(&screen, 0, Some(1), "right").unwrap()
    }

    #[test]
    fn insert_section_appends_a_default_after_index() {
        let screen = sample_screen();
        let next = insert_section(&screen, 0, 0).unwrap();

        assert_eq!(next.rows_columns[0].sections.len(), 2);
        assert_eq!(next.rows_columns[0].sections[1], Section::default());
        // Input untouched
        assert_eq!(screen.rows_columns[0].sections.len(), 1);
    }

    #[test]
    fn insert_then_remove_restores_the_original() {
        let screen = wide_screen();

        let grown = insert_section(&screen, 1, 1).unwrap();
        assert_eq!(remove_section(&grown, 1, 2).unwrap(), screen);

        let grown = insert_row_column(&screen, 0).unwrap();
        assert_eq!(remove_row_column(&grown, 1).unwrap(), screen);
    }

    #[test]
    fn default_screen_grows_and_shrinks_back() {
        // One RowColumn with one empty Section
        let screen = sample_screen();

        let grown = insert_section(&screen, 0, 0).unwrap();
        assert_eq!(grown.rows_columns[0].sections.len(), 2);
        assert_eq!(grown.rows_columns[0].sections[1], Section::default());

        let back = remove_section(&grown, 0, 1).unwrap();
        assert_eq!(back, screen);
    }

    #[test]
    fn removing_the_last_section_is_rejected() {
        let screen = sample_screen();
        assert_eq!(remove_section(&screen, 0, 0), Err(EditError::LastSection));
    }

    #[test]
    fn removing_the_last_row_column_is_rejected() {
        let screen = sample_screen();
        assert_eq!(remove_row_column(&screen, 0), Err(EditError::LastRowColumn));
    }

    #[test]
    fn removal_compacts_indices() {
        let screen = wide_screen();
        let next = remove_section(&screen, 0, 0).unwrap();

        assert_eq!(next.rows_columns[0].sections.len(), 1);
        // The survivor moved down to index 0
        assert_eq!(next.rows_columns[0].sections[0].name, "right");

        let next = remove_row_column(&screen, 0).unwrap();
        assert_eq!(next.rows_columns.len(), 1);
        assert_eq!(next.rows_columns[0].name, "bottom");
    }

    #[test]
    fn flip_is_its_own_inverse() {
        let screen = wide_screen();

        let once = flip_direction(&screen, FlipTarget::Screen).unwrap();
        assert_eq!(once.flex_direction, FlexDirection::Column);
        assert_eq!(flip_direction(&once, FlipTarget::Screen).unwrap(), screen);

        let once = flip_direction(&screen, FlipTarget::RowColumn(1)).unwrap();
        assert_eq!(once.rows_columns[1].flex_direction, FlexDirection::Row);
        assert_eq!(
            flip_direction(&once, FlipTarget::RowColumn(1)).unwrap(),
            screen
        );
    }

    #[test]
    fn rename_targets_the_right_level() {
        let screen = wide_screen();

        let next = rename(&screen, 1, None, "notes").unwrap();
        assert_eq!(next.rows_columns[1].name, "notes");

        let next = rename(&screen, 0, Some(0), "left").unwrap();
        assert_eq!(next.rows_columns[0].sections[0].name, "left");
    }

    #[test]
    fn set_section_tags_replaces_the_query() {
        let screen = sample_screen();
        let next =
            set_section_tags(&screen, 0, 0, vec!["math".into(), "easy".into()]).unwrap();
        assert_eq!(next.rows_columns[0].sections[0].tags, vec!["math", "easy"]);
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let screen = sample_screen();
        assert_eq!(
            insert_row_column(&screen, 5),
            Err(EditError::RowOutOfBounds(5))
        );
        assert_eq!(
            insert_section(&screen, 0, 3),
            Err(EditError::SectionOutOfBounds { row: 0, section: 3 })
        );
        assert_eq!(
            rename(&screen, 2, None, "x"),
            Err(EditError::RowOutOfBounds(2))
        );
        assert_eq!(
            flip_direction(&screen, FlipTarget::RowColumn(9)),
            Err(EditError::RowOutOfBounds(9))
        );
    }
}
