use std::env;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::config::{Config, UserConfig};
use crate::model::data_item::{DataItem, ItemKind, Value};
use crate::model::doc::Doc;
use crate::model::screen::Screen;
use crate::model::session::Session;
use crate::ops::compose::compose;
use crate::ops::quiz::QuizSession;
use crate::ops::screen_ops::{self, FlipTarget};
use crate::ops::tags::{distinct_tags, filter_by_tags};
use crate::store::{JsonStore, Store};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Where the store lives: `-C` flag, then `$MNEME_DIR`, then `~/.mneme`.
pub fn resolve_store_dir(flag: Option<&str>) -> PathBuf {
    if let Some(dir) = flag {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = env::var("MNEME_DIR") {
        return PathBuf::from(dir);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".mneme")
}

/// Open the store and build the session from its config.
pub fn load_env(store_dir: &Path) -> Result<(JsonStore, Session), Box<dyn std::error::Error>> {
    let store = JsonStore::open(store_dir)?;
    let config = Config::load(store_dir)?;
    let session = Session {
        user_email: config.user.email,
        view_as: config.user.view_as,
    };
    Ok((store, session))
}

fn require_user(session: &Session) -> Result<String, Box<dyn std::error::Error>> {
    session
        .user_email
        .clone()
        .ok_or_else(|| "not signed in (run `mn init --email you@example.com`)".into())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let store_dir = resolve_store_dir(cli.store_dir.as_deref());

    match cli.command {
        None => unreachable!("main launches the TUI when no subcommand is given"),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, &store_dir),
            Commands::Add(args) => cmd_add(args, &store_dir, json),
            Commands::List(args) => cmd_list(args, &store_dir, json),
            Commands::Tags(args) => cmd_tags(args, &store_dir, json),
            Commands::Rm(args) => cmd_rm(args, &store_dir),
            Commands::Screens => cmd_screens(&store_dir, json),
            Commands::Screen(args) => cmd_screen(args, &store_dir, json),
            Commands::Quiz(args) => match args.action {
                QuizAction::Next { tags } => cmd_quiz_next(tags, &store_dir, json),
                QuizAction::Answer { id, outcome } => cmd_quiz_answer(id, outcome, &store_dir),
            },
        },
    }
}

// ---------------------------------------------------------------------------
// Init / items
// ---------------------------------------------------------------------------

pub fn cmd_init(args: InitArgs, store_dir: &Path) -> CmdResult {
    JsonStore::open(store_dir)?;
    let config = Config {
        user: UserConfig {
            email: Some(args.email.clone()),
            view_as: None,
        },
    };
    config.save(store_dir)?;
    println!(
        "initialized store in {} as {}",
        store_dir.display(),
        args.email
    );
    Ok(())
}

fn cmd_add(args: AddArgs, store_dir: &Path, json: bool) -> CmdResult {
    let (mut store, session) = load_env(store_dir)?;
    let user = require_user(&session)?;

    let field2 = match args.kind {
        ItemKind::Numeric => {
            let n: f64 = args
                .value
                .parse()
                .map_err(|_| format!("numeric items need a numeric value, got '{}'", args.value))?;
            Value::Number(n)
        }
        _ => Value::Text(args.value),
    };

    // Exact duplicate tags on the command line are dropped
    let mut tags: Vec<String> = Vec::new();
    for tag in args.tags {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let mut item = DataItem::new(args.kind, field2, tags, user);
    item.field1 = args.title;

    let id = store.add_data_item(&item)?;
    if json {
        print_json(&serde_json::json!({ "id": id }));
    } else {
        println!("added {}", id);
    }
    Ok(())
}

fn cmd_list(args: ListArgs, store_dir: &Path, json: bool) -> CmdResult {
    let (store, session) = load_env(store_dir)?;
    let items = store.fetch_data_items(&session)?;
    let shown = filter_by_tags(&items, &args.tags);

    if json {
        print_json(&ItemListJson {
            items: shown
                .iter()
                .map(|doc| ItemJson {
                    id: &doc.id,
                    item: &doc.data,
                })
                .collect(),
        });
    } else {
        print_items(&shown);
    }
    Ok(())
}

fn cmd_tags(args: TagsArgs, store_dir: &Path, json: bool) -> CmdResult {
    let (store, session) = load_env(store_dir)?;
    let items = store.fetch_data_items(&session)?;
    let tags = distinct_tags(&items, &args.exclude);

    if json {
        print_json(&TagsJson { tags });
    } else if tags.is_empty() {
        println!("no tags");
    } else {
        for tag in tags {
            println!("{}", tag);
        }
    }
    Ok(())
}

fn cmd_rm(args: RmArgs, store_dir: &Path) -> CmdResult {
    let (mut store, session) = load_env(store_dir)?;
    let user = require_user(&session)?;

    // Only the owner's items are deletable
    let items = store.fetch_data_items(&Session::signed_in(user))?;
    if !items.iter().any(|doc| doc.id == args.id) {
        return Err(format!("no item of yours with id {}", args.id).into());
    }
    store.delete_data_item(&args.id)?;
    println!("deleted {}", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn cmd_screens(store_dir: &Path, json: bool) -> CmdResult {
    let (store, session) = load_env(store_dir)?;
    let screens = store.fetch_screens(&session)?;

    if json {
        print_json(&ScreenListJson {
            screens: screens.iter().map(screen_summary).collect(),
        });
    } else if screens.is_empty() {
        println!("no screens");
    } else {
        for doc in &screens {
            let sections: usize = doc.data.rows_columns.iter().map(|rc| rc.sections.len()).sum();
            println!(
                "{}  {} ({} row/column(s), {} section(s))",
                doc.id, doc.data.name, doc.data.rows_columns.len(), sections
            );
        }
    }
    Ok(())
}

fn find_screen(screens: &[Doc<Screen>], name: &str) -> Option<Doc<Screen>> {
    screens.iter().find(|doc| doc.data.name == name).cloned()
}

fn cmd_screen(args: ScreenArgs, store_dir: &Path, json: bool) -> CmdResult {
    let (mut store, session) = load_env(store_dir)?;
    let screens = store.fetch_screens(&session)?;

    if let ScreenAction::New = args.action {
        let user = require_user(&session)?;
        if find_screen(&screens, &args.name).is_some() {
            return Err(format!("screen '{}' already exists", args.name).into());
        }
        let mut screen = Screen::new(&args.name);
        screen.owner_email = Some(user);
        let id = store.add_screen(&screen)?;
        if json {
            print_json(&serde_json::json!({ "id": id }));
        } else {
            println!("created screen '{}' ({})", args.name, id);
        }
        return Ok(());
    }

    let doc = find_screen(&screens, &args.name)
        .ok_or_else(|| format!("no screen named '{}'", args.name))?;

    if let ScreenAction::Show = args.action {
        let items = store.fetch_data_items(&session)?;
        let view = compose(&doc.data, &items);
        if json {
            print_json(&serde_json::json!({ "id": doc.id, "screen": doc.data }));
        } else {
            print_screen_view(&view);
        }
        return Ok(());
    }

    // Everything below mutates; owner only
    if !session.can_edit_screen(&doc.data) {
        return Err(format!("only the owner may edit screen '{}'", args.name).into());
    }

    if let ScreenAction::Delete = args.action {
        store.delete_screen(&doc.id)?;
        println!("deleted screen '{}'", args.name);
        return Ok(());
    }

    let next = match args.action {
        ScreenAction::AddRow { after } => screen_ops::insert_row_column(&doc.data, after),
        ScreenAction::AddSection { row, after } => {
            screen_ops::insert_section(&doc.data, row, after)
        }
        ScreenAction::RmRow { row } => screen_ops::remove_row_column(&doc.data, row),
        ScreenAction::RmSection { row, section } => {
            screen_ops::remove_section(&doc.data, row, section)
        }
        ScreenAction::Flip { row } => screen_ops::flip_direction(
            &doc.data,
            row.map_or(FlipTarget::Screen, FlipTarget::RowColumn),
        ),
        ScreenAction::Rename { row, section, name } => {
            screen_ops::rename(&doc.data, row, section, &name)
        }
        ScreenAction::Tags { row, section, tags } => {
            screen_ops::set_section_tags(&doc.data, row, section, tags)
        }
        ScreenAction::New | ScreenAction::Show | ScreenAction::Delete => unreachable!(),
    };

    match next {
        Ok(screen) => {
            store.update_screen(&doc.id, &screen)?;
            println!("updated screen '{}'", args.name);
            Ok(())
        }
        // The stored screen is untouched; report why
        Err(e) => Err(format!("edit rejected: {}", e).into()),
    }
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

fn cmd_quiz_next(tags: Vec<String>, store_dir: &Path, json: bool) -> CmdResult {
    let (store, session) = load_env(store_dir)?;
    let items = store.fetch_data_items(&session)?;

    let mut quiz = QuizSession::new();
    quiz.select_tags(tags);
    let mut rng = SmallRng::from_entropy();
    quiz.advance(&items, &mut rng);

    match &quiz.current {
        Some(doc) => {
            if json {
                print_json(&ItemJson {
                    id: &doc.id,
                    item: &doc.data,
                });
            } else {
                println!("{}", item_line(doc));
                println!("answer with: mn quiz answer {} pass|fail", doc.id);
            }
        }
        None => {
            if json {
                print_json(&serde_json::json!({ "question": null }));
            } else {
                println!("no questions match the selected tags");
            }
        }
    }
    Ok(())
}

fn cmd_quiz_answer(
    id: String,
    outcome: crate::ops::quiz::QuizOutcome,
    store_dir: &Path,
) -> CmdResult {
    let (mut store, _session) = load_env(store_dir)?;
    store.record_quiz_answer(&id, outcome)?;
    println!(
        "recorded {} for {}",
        match outcome {
            crate::ops::quiz::QuizOutcome::Pass => "pass",
            crate::ops::quiz::QuizOutcome::Fail => "fail",
        },
        id
    );
    Ok(())
}
