//! Holiday reconciliation engine
//!
//! For each target entity, two passes are planned against the holidays that
//! were fetched before the run:
//!
//! 1. every existing remote holiday is kept (exact match on name, from and
//!    to anywhere in the schedule), updated to the first schedule row with
//!    the same name, or deleted when no row carries its name;
//! 2. every schedule row whose name no existing remote holiday carries is
//!    added.
//!
//! Pass 2 looks at the same pre-run snapshot as pass 1. The local entity is
//! never modified, so after a run the in-memory data is stale until the next
//! refresh.

use anyhow::Result;
use log::{debug, info};
use std::time::Duration;

use super::mutator::RemoteMutator;
use crate::api::{HolidayOperation, OperationCounts, PhoneEntity};
use crate::schedule::DesiredSchedule;

/// Options that change which entities are touched
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Only the first entity is processed; the rest are skipped without calls
    pub test_mode: bool,
}

/// Progress notifications emitted while a collection is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileEvent<'a> {
    /// About to process entity `index` (1-based) of `total`
    Entity {
        label: &'a str,
        index: usize,
        total: usize,
    },
    /// Every entity is done; the completion pause starts now
    Finished { label: &'a str, pause: Duration },
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub label: String,
    pub entities_total: usize,
    pub entities_processed: usize,
    /// Every applied operation, in issue order
    pub operations: Vec<HolidayOperation>,
}

impl ReconcileReport {
    pub fn new(label: impl Into<String>, entities_total: usize) -> Self {
        Self {
            label: label.into(),
            entities_total,
            ..Default::default()
        }
    }

    pub fn counts(&self) -> OperationCounts {
        OperationCounts::tally(&self.operations)
    }
}

/// Plan the operations for one entity: pass 1 then pass 2, in order
pub fn plan_entity(schedule: &DesiredSchedule, entity: &PhoneEntity) -> Vec<HolidayOperation> {
    let mut plan = Vec::new();
    let existing = entity.holiday_hours.as_deref();

    for remote in existing.unwrap_or_default() {
        if schedule.contains_exact(remote) {
            continue;
        }

        match schedule.first_named(&remote.name) {
            None => plan.push(HolidayOperation::delete(
                &entity.extension_id,
                &remote.id,
                &remote.name,
            )),
            Some(row) => plan.push(HolidayOperation::update(
                &entity.extension_id,
                &remote.id,
                &remote.name,
                &row.from,
                &row.to,
            )),
        }
    }

    for row in schedule.rows() {
        let already_present =
            existing.is_some_and(|holidays| holidays.iter().any(|h| h.name == row.name));
        if !already_present {
            plan.push(HolidayOperation::add(
                &entity.extension_id,
                &row.name,
                &row.from,
                &row.to,
            ));
        }
    }

    plan
}

/// Bring every entity in `targets` in line with `schedule`.
///
/// Entities are processed strictly one after another; the first failed call
/// aborts the run, leaving earlier entities reconciled and later ones
/// untouched.
pub async fn reconcile(
    schedule: &DesiredSchedule,
    targets: &[PhoneEntity],
    label: &str,
    mutator: &RemoteMutator<'_>,
    options: ReconcileOptions,
    mut progress: impl FnMut(ReconcileEvent<'_>),
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::new(label, targets.len());

    for (index, entity) in targets.iter().enumerate() {
        if options.test_mode && index > 0 {
            debug!("Test mode: skipping {} remaining entities", targets.len() - index);
            break;
        }

        progress(ReconcileEvent::Entity {
            label,
            index: index + 1,
            total: targets.len(),
        });

        let plan = plan_entity(schedule, entity);
        debug!(
            "{}: {} operation(s) planned for {}",
            label,
            plan.len(),
            entity.display_name()
        );

        for operation in plan {
            mutator.apply(&operation).await?;
            report.operations.push(operation);
        }

        report.entities_processed += 1;
        mutator.entity_done().await;
    }

    let counts = report.counts();
    info!(
        "{} complete: {} entities, {} add, {} update, {} delete",
        label, report.entities_processed, counts.adds, counts.updates, counts.deletes
    );
    debug!("{}: pacing so far {:?}", label, mutator.pacer().stats());

    progress(ReconcileEvent::Finished {
        label,
        pause: mutator.pacer().completion_pause(),
    });
    mutator.finish().await;

    Ok(report)
}
