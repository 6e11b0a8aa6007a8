//! Interactive menu shown when no subcommand is given

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Select};
use std::io::IsTerminal;

use super::{App, InspectTarget, UpdateTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    Hours,
    UpdateArs,
    UpdateCqs,
    UpdateAllAndQuit,
    Advanced,
    Exit,
}

const MAIN_CHOICES: [(MainChoice, &str); 6] = [
    (MainChoice::Hours, "Display holiday hours configuration"),
    (MainChoice::UpdateArs, "Update Auto Receptionists"),
    (MainChoice::UpdateCqs, "Update Call Queues"),
    (MainChoice::UpdateAllAndQuit, "Update All and Quit"),
    (MainChoice::Advanced, "Advanced Operations Menu"),
    (MainChoice::Exit, "Exit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvancedChoice {
    Refresh,
    InspectAr,
    InspectCq,
    RemoveAll,
    Back,
}

const ADVANCED_CHOICES: [(AdvancedChoice, &str); 5] = [
    (AdvancedChoice::Refresh, "Refresh Zoom account information"),
    (AdvancedChoice::InspectAr, "Print test auto receptionist object"),
    (AdvancedChoice::InspectCq, "Print test call queue object"),
    (AdvancedChoice::RemoveAll, "REMOVE All Holiday Hours"),
    (AdvancedChoice::Back, "Go Back"),
];

/// Run the main menu until the user exits
pub async fn run(app: &mut App) -> Result<()> {
    if !(std::io::stdin().is_terminal() && std::io::stdout().is_terminal()) {
        anyhow::bail!(
            "Interactive mode requires a terminal. Use a subcommand for scripting (see --help)."
        );
    }

    loop {
        print_banner(app.test_mode());
        app.print_summary();

        match select("Main Menu: Choose an option", &MAIN_CHOICES)? {
            MainChoice::Hours => {
                app.reload_schedule()?;
                println!("\nHoliday Hours:\n");
                println!("{}\n", app.schedule().render_table());
            }
            MainChoice::UpdateArs => app.update(UpdateTarget::Ars, false).await?,
            MainChoice::UpdateCqs => app.update(UpdateTarget::Cqs, false).await?,
            MainChoice::UpdateAllAndQuit => {
                app.update(UpdateTarget::All, false).await?;
                return Ok(());
            }
            MainChoice::Advanced => advanced(app).await?,
            MainChoice::Exit => return Ok(()),
        }
    }
}

async fn advanced(app: &mut App) -> Result<()> {
    match select("Advanced:", &ADVANCED_CHOICES)? {
        AdvancedChoice::Refresh => app.refresh().await?,
        AdvancedChoice::InspectAr => app.inspect(InspectTarget::Ar)?,
        AdvancedChoice::InspectCq => app.inspect(InspectTarget::Cq)?,
        AdvancedChoice::RemoveAll => {
            if confirm_remove_all()? {
                app.remove_all().await?;
            }
        }
        AdvancedChoice::Back => {}
    }
    Ok(())
}

/// Ask before deleting every holiday
pub fn confirm_remove_all() -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "{} every holiday from all external auto receptionists and call queues?",
            "REMOVE".red().bold()
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn select<T: Copy>(prompt: &str, choices: &[(T, &str)]) -> Result<T> {
    let labels: Vec<&str> = choices.iter().map(|(_, label)| *label).collect();
    let index = Select::new()
        .with_prompt(prompt.yellow().to_string())
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read menu selection")?;
    Ok(choices[index].0)
}

pub fn print_banner(test_mode: bool) {
    println!();
    println!("{}", "Holiday Hours".bold());
    if test_mode {
        println!("{}", "!!!  TESTING MODE ENABLED  !!!".yellow().bold());
    }
    println!();
}
