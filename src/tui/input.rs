use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::quiz::QuizOutcome;
use crate::ops::screen_ops::{self, FlipTarget};

use super::app::{App, Prompt, PromptKind, View};

/// Top-level key dispatch. Prompts capture everything; the quiz popup
/// captures everything else; edit-mode keys only apply inside a screen.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    app.status = None;

    if app.prompt.is_some() {
        handle_prompt_key(app, key);
        return;
    }
    if app.quiz_open {
        handle_quiz_key(app, key);
        return;
    }
    if app.edit.is_some() {
        handle_edit_key(app, key);
        return;
    }
    handle_browse_key(app, key);
}

// ---------------------------------------------------------------------------
// Browse mode
// ---------------------------------------------------------------------------

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab | KeyCode::Char(']') => app.next_view(),
        KeyCode::BackTab | KeyCode::Char('[') => app.prev_view(),
        KeyCode::Char('z') => app.toggle_quiz(),
        KeyCode::Char('e') => app.enter_edit(),
        KeyCode::Char('c') => open_prompt(app, PromptKind::NewScreen, String::new()),
        KeyCode::Char('d') => app.toggle_theme(),
        KeyCode::Char('R') => {
            app.refresh();
            app.set_status("reloaded");
        }
        KeyCode::Up => app.library_scroll = app.library_scroll.saturating_sub(1),
        KeyCode::Down => {
            if app.view == View::Library && app.library_scroll + 1 < app.items.len() {
                app.library_scroll += 1;
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Edit mode
// ---------------------------------------------------------------------------

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    let Some(edit) = &app.edit else { return };
    let draft = edit.draft.clone();
    let (row, section) = (app.sel_row, app.sel_section);

    match key.code {
        KeyCode::Esc => {
            app.leave_edit();
            app.set_status("edit cancelled");
        }
        KeyCode::Char('s') => app.save_edit(),

        // Selection movement
        KeyCode::Left => {
            app.sel_section = app.sel_section.saturating_sub(1);
        }
        KeyCode::Right => {
            app.sel_section += 1;
            app.clamp_selection();
        }
        KeyCode::Up => {
            app.sel_row = app.sel_row.saturating_sub(1);
            app.clamp_selection();
        }
        KeyCode::Down => {
            app.sel_row += 1;
            app.clamp_selection();
        }

        // Structure
        KeyCode::Char('a') => app.apply_edit(screen_ops::insert_section(&draft, row, section)),
        KeyCode::Char('A') => app.apply_edit(screen_ops::insert_row_column(&draft, row)),
        KeyCode::Char('x') => app.apply_edit(screen_ops::remove_section(&draft, row, section)),
        KeyCode::Char('X') => app.apply_edit(screen_ops::remove_row_column(&draft, row)),
        KeyCode::Char('f') => {
            app.apply_edit(screen_ops::flip_direction(&draft, FlipTarget::RowColumn(row)))
        }
        KeyCode::Char('F') => app.apply_edit(screen_ops::flip_direction(&draft, FlipTarget::Screen)),

        // Prompted edits, pre-filled with the current value
        KeyCode::Char('n') => {
            let current = draft.rows_columns[row].name.clone();
            open_prompt(app, PromptKind::RenameRowColumn, current);
        }
        KeyCode::Char('N') => {
            let current = draft.rows_columns[row].sections[section].name.clone();
            open_prompt(app, PromptKind::RenameSection, current);
        }
        KeyCode::Char('t') => {
            let current = draft.rows_columns[row].sections[section].tags.join(" ");
            open_prompt(app, PromptKind::SectionTags, current);
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Quiz popup
// ---------------------------------------------------------------------------

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('z') | KeyCode::Char('q') => app.toggle_quiz(),
        KeyCode::Char('t') => {
            let current = app.quiz.selected_tags.join(" ");
            open_prompt(app, PromptKind::QuizTags, current);
        }
        KeyCode::Char('y') => app.answer_quiz(QuizOutcome::Pass),
        KeyCode::Char('n') => app.answer_quiz(QuizOutcome::Fail),
        KeyCode::Char(' ') | KeyCode::Enter => app.next_question(),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Text prompt
// ---------------------------------------------------------------------------

fn open_prompt(app: &mut App, kind: PromptKind, buffer: String) {
    app.prompt = Some(Prompt { kind, buffer });
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.prompt = None;
        }
        KeyCode::Backspace => {
            if let Some(prompt) = &mut app.prompt {
                prompt.buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = &mut app.prompt {
                prompt.buffer.push(c);
            }
        }
        KeyCode::Enter => {
            if let Some(prompt) = app.prompt.take() {
                commit_prompt(app, prompt);
            }
        }
        _ => {}
    }
}

fn commit_prompt(app: &mut App, prompt: Prompt) {
    let text = prompt.buffer.trim().to_string();
    let tags = || -> Vec<String> {
        text.split_whitespace()
            .map(|t| t.to_string())
            .collect()
    };

    match prompt.kind {
        PromptKind::NewScreen => app.create_screen(&text),
        PromptKind::QuizTags => app.set_quiz_tags(tags()),
        PromptKind::RenameRowColumn => {
            if let Some(edit) = &app.edit {
                let result = screen_ops::rename(&edit.draft, app.sel_row, None, &text);
                app.apply_edit(result);
            }
        }
        PromptKind::RenameSection => {
            if let Some(edit) = &app.edit {
                let result =
                    screen_ops::rename(&edit.draft, app.sel_row, Some(app.sel_section), &text);
                app.apply_edit(result);
            }
        }
        PromptKind::SectionTags => {
            if let Some(edit) = &app.edit {
                let result =
                    screen_ops::set_section_tags(&edit.draft, app.sel_row, app.sel_section, tags());
                app.apply_edit(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::session::Session;
    use crate::store::JsonStore;
    use crossterm::event::KeyModifiers;

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let app = App::new(store, Session::signed_in("a@b.c")).unwrap();
        (dir, app)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn q_quits_from_browse() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn prompt_collects_text_and_esc_cancels() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('c'));
        assert!(app.prompt.is_some());

        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.prompt.as_ref().unwrap().buffer, "hi");

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        // Cancelled prompt created nothing
        assert!(app.screens.is_empty());
    }

    #[test]
    fn create_screen_via_prompt_and_edit_it() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('c'));
        for c in "study".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screens.len(), 1);
        assert_eq!(app.view, View::Screen(0));

        // Owner can enter edit mode and grow the tree
        press(&mut app, KeyCode::Char('e'));
        assert!(app.edit.is_some());
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(
            app.edit.as_ref().unwrap().draft.rows_columns[0].sections.len(),
            2
        );

        // Removing below the minimum is a rejected no-op
        press(&mut app, KeyCode::Char('X'));
        assert!(app.status.as_ref().unwrap().starts_with("rejected"));
        assert_eq!(app.edit.as_ref().unwrap().draft.rows_columns.len(), 1);

        // Save persists the draft
        press(&mut app, KeyCode::Char('s'));
        assert!(app.edit.is_none());
        assert_eq!(app.screens[0].data.rows_columns[0].sections.len(), 2);
    }

    #[test]
    fn quiz_popup_swallows_keys() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('z'));
        assert!(app.quiz_open);

        // 'q' closes the quiz rather than the app
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.quiz_open);
        assert!(!app.should_quit);
    }
}
