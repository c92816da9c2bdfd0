use clap::Parser;
use mneme::cli::commands::{Cli, Commands};
use mneme::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let store_dir = handlers::resolve_store_dir(cli.store_dir.as_deref());

    match cli.command {
        None => {
            // No subcommand: launch the TUI
            if let Err(e) = mneme::tui::run(&store_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            if let Err(e) = handlers::cmd_init(args, &store_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
