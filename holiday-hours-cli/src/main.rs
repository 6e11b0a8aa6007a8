mod api;
mod cli;
mod config;
mod schedule;
mod sync;

use anyhow::Result;
use clap::Parser;
use colored::*;

use cli::{App, Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli).await {
        let code = cli::exit_code_for(&err);
        eprintln!("\n❌ {} {:#}\n", format!("[{}] Error:", code).red(), err);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.testing {
        config.test_mode = true;
    }

    match cli.command {
        Some(Commands::Hours) => {
            let schedule = cli::commands::load_schedule(&config)?;
            println!("{}", schedule.render_table());
        }
        Some(Commands::Summary) => {
            App::start(config).await?.print_summary();
        }
        Some(Commands::Update { target, dry_run }) => {
            cli::menu::print_banner(config.test_mode);
            App::start(config).await?.update(target, dry_run).await?;
        }
        Some(Commands::RemoveAll { yes }) => {
            let mut app = App::start(config).await?;
            if yes || cli::menu::confirm_remove_all()? {
                app.remove_all().await?;
            }
        }
        Some(Commands::Inspect { target }) => {
            App::start(config).await?.inspect(target)?;
        }
        None => {
            cli::menu::print_banner(config.test_mode);
            let mut app = App::start(config).await?;
            cli::menu::run(&mut app).await?;
            println!("{}\n\nHave a great day!\n", "Shutting down...".green());
        }
    }

    Ok(())
}
