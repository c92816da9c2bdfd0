use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::load_env;
use crate::model::data_item::DataItem;
use crate::model::doc::Doc;
use crate::model::preference::{ThemeMode, UserPreference};
use crate::model::screen::Screen;
use crate::model::session::Session;
use crate::ops::quiz::{QuizOutcome, QuizSession};
use crate::ops::screen_ops::EditError;
use crate::store::{JsonStore, Store};

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All visible items, unfiltered
    Library,
    /// A screen (index into `screens`)
    Screen(usize),
}

/// A screen being edited: the draft tree replaces the stored one on save.
/// Edits go through the pure transforms; a rejected edit leaves the draft
/// as it was.
#[derive(Debug, Clone)]
pub struct EditState {
    pub screen_id: String,
    pub draft: Screen,
}

/// What a text prompt is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Name for a brand-new screen
    NewScreen,
    /// Rename the selected row/column
    RenameRowColumn,
    /// Rename the selected section
    RenameSection,
    /// Space-separated tag query for the selected section
    SectionTags,
    /// Space-separated quiz scope tags
    QuizTags,
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

/// Main application state
pub struct App {
    pub store: JsonStore,
    pub session: Session,
    pub theme: Theme,
    pub theme_mode: ThemeMode,

    pub items: Vec<Doc<DataItem>>,
    pub screens: Vec<Doc<Screen>>,

    pub view: View,
    pub library_scroll: usize,

    /// Present while edit mode is active
    pub edit: Option<EditState>,
    /// Selected (row, section) for edit-mode operations
    pub sel_row: usize,
    pub sel_section: usize,

    pub quiz_open: bool,
    pub quiz: QuizSession,

    pub prompt: Option<Prompt>,
    /// One-line feedback shown in the status row
    pub status: Option<String>,
    pub should_quit: bool,

    pub rng: SmallRng,
}

impl App {
    pub fn new(store: JsonStore, session: Session) -> Result<Self, Box<dyn std::error::Error>> {
        let items = store.fetch_data_items(&session)?;
        let screens = store.fetch_screens(&session)?;
        let theme_mode = store
            .fetch_preference(&session)?
            .map(|pref| pref.data.light_dark_mode)
            .unwrap_or_default();

        Ok(App {
            store,
            session,
            theme: Theme::from_mode(theme_mode),
            theme_mode,
            items,
            screens,
            view: View::Library,
            library_scroll: 0,
            edit: None,
            sel_row: 0,
            sel_section: 0,
            quiz_open: false,
            quiz: QuizSession::new(),
            prompt: None,
            status: None,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        })
    }

    /// Re-fetch both collections. A fetch failure keeps the in-memory
    /// state unchanged and reports in the status row.
    pub fn refresh(&mut self) {
        match self.store.fetch_data_items(&self.session) {
            Ok(items) => self.items = items,
            Err(e) => self.set_status(format!("load failed: {e}")),
        }
        match self.store.fetch_screens(&self.session) {
            Ok(screens) => self.screens = screens,
            Err(e) => self.set_status(format!("load failed: {e}")),
        }
        if let View::Screen(idx) = self.view
            && idx >= self.screens.len()
        {
            self.view = View::Library;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// The stored screen doc for the current view
    pub fn current_screen(&self) -> Option<&Doc<Screen>> {
        match self.view {
            View::Screen(idx) => self.screens.get(idx),
            View::Library => None,
        }
    }

    /// The tree to display: the edit draft when editing, else the stored
    /// screen.
    pub fn visible_tree(&self) -> Option<&Screen> {
        if let Some(edit) = &self.edit {
            return Some(&edit.draft);
        }
        self.current_screen().map(|doc| &doc.data)
    }

    /// Cycle through Library and all screens
    pub fn next_view(&mut self) {
        self.leave_edit();
        self.view = match self.view {
            View::Library if self.screens.is_empty() => View::Library,
            View::Library => View::Screen(0),
            View::Screen(idx) if idx + 1 < self.screens.len() => View::Screen(idx + 1),
            View::Screen(_) => View::Library,
        };
    }

    pub fn prev_view(&mut self) {
        self.leave_edit();
        self.view = match self.view {
            View::Library if self.screens.is_empty() => View::Library,
            View::Library => View::Screen(self.screens.len() - 1),
            View::Screen(0) => View::Library,
            View::Screen(idx) => View::Screen(idx - 1),
        };
    }

    // -- edit mode ----------------------------------------------------------

    /// Enter edit mode on the current screen; owner only.
    pub fn enter_edit(&mut self) {
        let Some(doc) = self.current_screen() else {
            self.set_status("select a screen to edit");
            return;
        };
        if !self.session.can_edit_screen(&doc.data) {
            self.set_status("only the owner may edit this screen");
            return;
        }
        self.edit = Some(EditState {
            screen_id: doc.id.clone(),
            draft: doc.data.clone(),
        });
        self.sel_row = 0;
        self.sel_section = 0;
        self.set_status("editing: s save · esc cancel");
    }

    pub fn leave_edit(&mut self) {
        self.edit = None;
    }

    /// Swap in the result of a structural transform, or report the
    /// rejection. The draft stays valid either way.
    pub fn apply_edit(&mut self, result: Result<Screen, EditError>) {
        match result {
            Ok(next) => {
                if let Some(edit) = &mut self.edit {
                    edit.draft = next;
                }
                self.clamp_selection();
            }
            Err(e) => self.set_status(format!("rejected: {e}")),
        }
    }

    /// Keep the edit selection inside the draft tree
    pub fn clamp_selection(&mut self) {
        if let Some(edit) = &self.edit {
            let rows = edit.draft.rows_columns.len();
            self.sel_row = self.sel_row.min(rows.saturating_sub(1));
            let sections = edit.draft.rows_columns[self.sel_row].sections.len();
            self.sel_section = self.sel_section.min(sections.saturating_sub(1));
        }
    }

    /// Persist the draft. On failure the store keeps its previous
    /// contents and edit mode stays active.
    pub fn save_edit(&mut self) {
        let Some(edit) = self.edit.clone() else {
            return;
        };
        match self.store.update_screen(&edit.screen_id, &edit.draft) {
            Ok(()) => {
                self.edit = None;
                self.refresh();
                self.set_status("screen saved");
            }
            Err(e) => self.set_status(format!("save failed: {e}")),
        }
    }

    /// Create a screen owned by the session user and jump to it.
    pub fn create_screen(&mut self, name: &str) {
        let Some(user) = self.session.user_email.clone() else {
            self.set_status("sign in first (mn init --email ...)");
            return;
        };
        if name.is_empty() {
            self.set_status("screen name cannot be empty");
            return;
        }
        let mut screen = Screen::new(name);
        screen.owner_email = Some(user);
        match self.store.add_screen(&screen) {
            Ok(id) => {
                self.refresh();
                if let Some(idx) = self.screens.iter().position(|doc| doc.id == id) {
                    self.view = View::Screen(idx);
                }
                self.set_status(format!("created screen '{name}'"));
            }
            Err(e) => self.set_status(format!("create failed: {e}")),
        }
    }

    // -- quiz ---------------------------------------------------------------

    /// Toggle the quiz popup. Opening draws a question; closing discards
    /// the transient session state.
    pub fn toggle_quiz(&mut self) {
        self.quiz_open = !self.quiz_open;
        if self.quiz_open {
            self.quiz.advance(&self.items, &mut self.rng);
        } else {
            self.quiz = QuizSession::new();
        }
    }

    /// Replace the quiz scope and re-draw.
    pub fn set_quiz_tags(&mut self, tags: Vec<String>) {
        self.quiz.select_tags(tags);
        self.quiz.advance(&self.items, &mut self.rng);
    }

    /// Record the answer for the current question, then draw the next.
    /// A failed write keeps the counters untouched.
    pub fn answer_quiz(&mut self, outcome: QuizOutcome) {
        if let Some((id, outcome)) = self.quiz.answer(outcome) {
            match self.store.record_quiz_answer(&id, outcome) {
                Ok(()) => self.refresh(),
                Err(e) => self.set_status(format!("answer not recorded: {e}")),
            }
        }
        self.quiz.advance(&self.items, &mut self.rng);
    }

    /// Skip to another random question without answering
    pub fn next_question(&mut self) {
        self.quiz.advance(&self.items, &mut self.rng);
    }

    // -- theme --------------------------------------------------------------

    /// Flip light/dark and persist it as the user preference.
    pub fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.flipped();
        self.theme = Theme::from_mode(self.theme_mode);
        if let Some(user) = self.session.user_email.clone() {
            let pref = UserPreference {
                owner_email: user,
                light_dark_mode: self.theme_mode,
            };
            if let Err(e) = self.store.save_preference(&pref) {
                self.set_status(format!("preference not saved: {e}"));
            }
        }
    }
}

/// Run the TUI against the given store directory.
pub fn run(store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (store, session) = load_env(store_dir)?;
    let mut app = App::new(store, session)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
