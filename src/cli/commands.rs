use clap::{Args, Parser, Subcommand, builder::PossibleValue};

use crate::model::data_item::ItemKind;
use crate::ops::quiz::QuizOutcome;

#[derive(Parser)]
#[command(name = "mn", about = concat!("[~] mneme v", env!("CARGO_PKG_VERSION"), " - tag it, screen it, quiz yourself"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different store directory
    #[arg(short = 'C', long = "store-dir", global = true)]
    pub store_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a store directory and sign in
    Init(InitArgs),
    /// Add a data item
    Add(AddArgs),
    /// List data items, optionally tag-filtered
    List(ListArgs),
    /// List distinct tags across all visible items
    Tags(TagsArgs),
    /// Permanently delete a data item
    Rm(RmArgs),
    /// List all visible screens
    Screens,
    /// Create, inspect or edit a screen
    Screen(ScreenArgs),
    /// Quiz yourself on question items
    Quiz(QuizCmd),
}

// ---------------------------------------------------------------------------
// Init / item args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Email to sign in as (owner of everything created here)
    #[arg(long)]
    pub email: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item content; must be a number for --kind numeric
    pub value: String,
    /// Optional title
    #[arg(long)]
    pub title: Option<String>,
    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Kind of item
    #[arg(long, default_value = "text")]
    pub kind: ItemKind,
}

#[derive(Args)]
pub struct ListArgs {
    /// Keep only items carrying every given tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct TagsArgs {
    /// Tag to leave out of the listing (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Document id of the item to delete
    pub id: String,
}

// ---------------------------------------------------------------------------
// Screen args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ScreenArgs {
    /// Screen name
    pub name: String,
    #[command(subcommand)]
    pub action: ScreenAction,
}

#[derive(Subcommand)]
pub enum ScreenAction {
    /// Create a new screen with one default row and section
    New,
    /// Show the screen's layout with matched items per section
    Show,
    /// Delete the screen
    Delete,
    /// Insert a new row/column after the given index
    AddRow {
        #[arg(long, default_value_t = 0)]
        after: usize,
    },
    /// Insert a new section into a row/column after the given index
    AddSection {
        #[arg(long)]
        row: usize,
        #[arg(long, default_value_t = 0)]
        after: usize,
    },
    /// Remove a row/column (rejected for the last one)
    RmRow {
        #[arg(long)]
        row: usize,
    },
    /// Remove a section (rejected for the last one in its row/column)
    RmSection {
        #[arg(long)]
        row: usize,
        #[arg(long)]
        section: usize,
    },
    /// Flip the screen's direction, or one row/column's with --row
    Flip {
        #[arg(long)]
        row: Option<usize>,
    },
    /// Rename a row/column, or a section with --section
    Rename {
        #[arg(long)]
        row: usize,
        #[arg(long)]
        section: Option<usize>,
        name: String,
    },
    /// Replace a section's tag query
    Tags {
        #[arg(long)]
        row: usize,
        #[arg(long)]
        section: usize,
        tags: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Quiz args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct QuizCmd {
    #[command(subcommand)]
    pub action: QuizAction,
}

#[derive(Subcommand)]
pub enum QuizAction {
    /// Pick a random question from the tag-scoped pool
    Next {
        /// Tag in scope; any one qualifies a question (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Record a pass/fail outcome for a question
    Answer { id: String, outcome: QuizOutcome },
}

// clap surfaces for model enums live here so the model stays CLI-free

impl clap::ValueEnum for ItemKind {
    fn value_variants<'a>() -> &'a [Self] {
        &ItemKind::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.name()))
    }
}

impl clap::ValueEnum for QuizOutcome {
    fn value_variants<'a>() -> &'a [Self] {
        &[QuizOutcome::Pass, QuizOutcome::Fail]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(match self {
            QuizOutcome::Pass => "pass",
            QuizOutcome::Fail => "fail",
        }))
    }
}
