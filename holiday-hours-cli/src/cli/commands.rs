//! Command handlers
//!
//! [`App`] holds the loaded schedule, the API client and the most recent
//! account data. Subcommands and the interactive menu both drive it.

use anyhow::{Context, Result};
use colored::*;
use log::warn;
use std::io::Write;
use std::sync::Arc;

use super::{InspectTarget, Stage, UpdateTarget};
use crate::api::{
    ClientCredentialsAuth, Pacer, PhoneClient, PhoneEntity, StaticToken, TokenProvider,
};
use crate::config::Config;
use crate::schedule::DesiredSchedule;
use crate::sync::{
    self, PhoneData, ReconcileEvent, ReconcileOptions, ReconcileReport, RemoteMutator,
};

pub const UPDATE_ARS_LABEL: &str = "Updating Auto Receptionists";
pub const UPDATE_CQS_LABEL: &str = "Updating Call Queues";

/// Load the schedule configured for this run
pub fn load_schedule(config: &Config) -> Result<DesiredSchedule> {
    DesiredSchedule::load(&config.hours_file).context(Stage::LoadHours)
}

pub struct App {
    config: Config,
    schedule: DesiredSchedule,
    client: PhoneClient,
    pacer: Pacer,
    data: PhoneData,
}

impl App {
    /// Load the schedule, obtain a token and fetch account data
    pub async fn start(config: Config) -> Result<Self> {
        let schedule = load_schedule(&config)?;
        println!(
            "{} Loaded {} holiday(s) from {}",
            "✔".green(),
            schedule.len(),
            config.hours_file.display()
        );
        if schedule.is_empty() {
            warn!("The holiday schedule is empty; updates will only delete holidays");
        }

        let client = connect(&config).await.context(Stage::Connect)?;
        println!("{} Checked Zoom access token", "✔".green());

        let pacer = Pacer::new(config.pacing.clone());
        let mut app = Self {
            config,
            schedule,
            client,
            pacer,
            data: PhoneData::default(),
        };
        app.refresh().await?;
        Ok(app)
    }

    /// Replace the account data with a fresh fetch. On failure the previous
    /// data is kept and the error is returned.
    pub async fn refresh(&mut self) -> Result<()> {
        println!("Grabbing Zoom account information...");
        self.data = PhoneData::refresh(&self.client)
            .await
            .context(Stage::Refresh)?;
        println!("{} Grabbed Zoom account information", "✔".green());
        Ok(())
    }

    /// Re-read the schedule file
    pub fn reload_schedule(&mut self) -> Result<()> {
        self.schedule = load_schedule(&self.config)?;
        Ok(())
    }

    pub fn schedule(&self) -> &DesiredSchedule {
        &self.schedule
    }

    pub fn test_mode(&self) -> bool {
        self.config.test_mode
    }

    pub fn print_summary(&self) {
        let summary = self.data.summary();
        println!("{}", format!("{} Account Details", "Zoom".blue()).bold().underline());
        summary_line("Phone sites:", format!("Phone {}:", "sites".green()), summary.sites);
        summary_line(
            "Auto Receptionists:",
            "Auto Receptionists:".to_string(),
            summary.auto_receptionists,
        );
        summary_line(
            "Ext Auto Receptionists:",
            format!("{} Auto Receptionists:", "Ext".red()),
            summary.external_auto_receptionists,
        );
        summary_line("Call queues:", "Call queues:".to_string(), summary.call_queues);
        summary_line(
            "Ext Call queues:",
            format!("{} Call queues:", "Ext".red()),
            summary.external_call_queues,
        );
        println!();
    }

    /// Reconcile the chosen external collection(s)
    pub async fn update(&mut self, target: UpdateTarget, dry_run: bool) -> Result<()> {
        if dry_run {
            self.print_plan(target);
            return Ok(());
        }

        match target {
            UpdateTarget::Ars => {
                self.reconcile(UPDATE_ARS_LABEL, |d| &d.external_auto_receptionists)
                    .await?;
            }
            UpdateTarget::Cqs => {
                self.reconcile(UPDATE_CQS_LABEL, |d| &d.external_call_queues)
                    .await?;
            }
            UpdateTarget::All => {
                self.reconcile(UPDATE_ARS_LABEL, |d| &d.external_auto_receptionists)
                    .await?;
                self.refresh().await?;
                self.reconcile(UPDATE_CQS_LABEL, |d| &d.external_call_queues)
                    .await?;
            }
        }
        Ok(())
    }

    async fn reconcile(
        &self,
        label: &str,
        select: impl Fn(&PhoneData) -> &Vec<PhoneEntity>,
    ) -> Result<ReconcileReport> {
        let mutator = RemoteMutator::new(&self.client, &self.pacer);
        let options = ReconcileOptions {
            test_mode: self.config.test_mode,
        };

        let report = sync::reconcile(
            &self.schedule,
            select(&self.data),
            label,
            &mutator,
            options,
            print_progress,
        )
        .await
        .context(Stage::Run)?;

        print_report(&report);
        Ok(report)
    }

    /// Delete every holiday on every external entity, then refresh
    pub async fn remove_all(&mut self) -> Result<()> {
        let mutator = RemoteMutator::new(&self.client, &self.pacer);
        let report = sync::remove_all(self.data.combined_external(), &mutator, print_progress)
            .await
            .context(Stage::Run)?;
        print_report(&report);
        self.refresh().await
    }

    /// Pretty-print the first external entity of a collection
    pub fn inspect(&self, target: InspectTarget) -> Result<()> {
        let entity = match target {
            InspectTarget::Ar => self.data.external_auto_receptionists.first(),
            InspectTarget::Cq => self.data.external_call_queues.first(),
        };

        match entity {
            Some(entity) => {
                let json = serde_json::to_string_pretty(entity)
                    .context("Failed to format entity as JSON")?;
                println!("{}", json);
            }
            None => println!("{}", "No external entity of that kind.".yellow()),
        }
        Ok(())
    }

    fn print_plan(&self, target: UpdateTarget) {
        let collections: Vec<(&str, &Vec<PhoneEntity>)> = match target {
            UpdateTarget::Ars => vec![(UPDATE_ARS_LABEL, &self.data.external_auto_receptionists)],
            UpdateTarget::Cqs => vec![(UPDATE_CQS_LABEL, &self.data.external_call_queues)],
            UpdateTarget::All => vec![
                (UPDATE_ARS_LABEL, &self.data.external_auto_receptionists),
                (UPDATE_CQS_LABEL, &self.data.external_call_queues),
            ],
        };

        for (label, entities) in collections {
            println!("{} {}", label.bold(), "(dry run)".dimmed());
            let limit = if self.config.test_mode { 1 } else { entities.len() };
            for entity in entities.iter().take(limit) {
                let plan = sync::plan_entity(&self.schedule, entity);
                println!("  {}", entity.display_name().cyan());
                if plan.is_empty() {
                    println!("    {}", "up to date".dimmed());
                }
                for operation in &plan {
                    println!("    {}", operation);
                }
            }
            println!();
        }
    }
}

/// Build the token provider and client, and verify the credentials work
async fn connect(config: &Config) -> Result<PhoneClient> {
    let tokens: Arc<dyn TokenProvider> = match &config.access_token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(ClientCredentialsAuth::new(
            reqwest::Client::new(),
            config.oauth_base_url.clone(),
            config.credentials()?,
        )),
    };
    let client = PhoneClient::new(config.api_base_url.clone(), tokens)?;
    client.verify_token().await?;
    Ok(client)
}

/// Pad on the visible label; escape codes in `styled` would skew `{:<28}`
fn summary_line(plain: &str, styled: String, value: usize) {
    let padding = 28usize.saturating_sub(plain.chars().count());
    println!("  {}{}{}", styled, " ".repeat(padding), value);
}

fn print_progress(event: ReconcileEvent<'_>) {
    match event {
        ReconcileEvent::Entity {
            label,
            index,
            total,
        } => {
            print!("\r{} {} / {}", label, index, total);
            let _ = std::io::stdout().flush();
        }
        ReconcileEvent::Finished { label, pause } => {
            println!("\r{} {}", "✔".green(), label);
            if pause.is_zero() {
                println!("\nUpdate complete.\n");
            } else {
                println!(
                    "\nUpdate complete.  Continuing in {} seconds.\n",
                    pause.as_secs_f64().round()
                );
            }
        }
    }
}

/// Print a one-line summary of a finished report
pub fn print_report(report: &ReconcileReport) {
    let counts = report.counts();
    println!(
        "{}: {} / {} entities, {} operation(s): {} added, {} updated, {} deleted",
        report.label,
        report.entities_processed,
        report.entities_total,
        counts.total(),
        counts.adds.to_string().green(),
        counts.updates.to_string().yellow(),
        counts.deletes.to_string().red()
    );
}
