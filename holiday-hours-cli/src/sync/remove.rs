//! Bulk holiday removal
//!
//! Deletes every holiday currently attached to the given entities. The
//! desired schedule is not consulted and no per-call pause is applied.

use anyhow::Result;
use log::info;

use super::mutator::RemoteMutator;
use super::reconcile::{ReconcileEvent, ReconcileReport};
use crate::api::{HolidayOperation, PhoneEntity};

pub const REMOVE_ALL_LABEL: &str = "Removing all holidays from ARs and CQs";

pub async fn remove_all<'e>(
    entities: impl ExactSizeIterator<Item = &'e PhoneEntity>,
    mutator: &RemoteMutator<'_>,
    mut progress: impl FnMut(ReconcileEvent<'_>),
) -> Result<ReconcileReport> {
    let total = entities.len();
    let mut report = ReconcileReport::new(REMOVE_ALL_LABEL, total);

    for (index, entity) in entities.enumerate() {
        progress(ReconcileEvent::Entity {
            label: REMOVE_ALL_LABEL,
            index: index + 1,
            total,
        });

        for holiday in entity.holiday_hours.iter().flatten() {
            let operation =
                HolidayOperation::delete(&entity.extension_id, &holiday.id, &holiday.name);
            mutator.apply_unpaced(&operation).await?;
            report.operations.push(operation);
        }
        report.entities_processed += 1;
    }

    info!(
        "Removed {} holiday(s) from {} entities",
        report.operations.len(),
        report.entities_processed
    );

    progress(ReconcileEvent::Finished {
        label: REMOVE_ALL_LABEL,
        pause: mutator.pacer().completion_pause(),
    });
    mutator.finish().await;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PacingConfig, Pacer, RemoteHoliday};
    use crate::sync::mutator::tests::RecordingEndpoint;

    fn entity(extension_id: &str, holiday_ids: Option<&[&str]>) -> PhoneEntity {
        PhoneEntity {
            id: extension_id.to_string(),
            name: None,
            extension_id: extension_id.to_string(),
            phone_numbers: Some(Vec::new()),
            holiday_hours: holiday_ids.map(|ids| {
                ids.iter()
                    .map(|id| RemoteHoliday {
                        id: id.to_string(),
                        name: format!("Holiday {}", id),
                        from: "2024-01-01".to_string(),
                        to: "2024-01-02".to_string(),
                    })
                    .collect()
            }),
            extra: Default::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_delete_per_remote_holiday_without_call_pauses() {
        let endpoint = RecordingEndpoint::default();
        let pacer = Pacer::new(PacingConfig::default());
        let mutator = RemoteMutator::new(&endpoint, &pacer);
        let entities = vec![
            entity("ar1", Some(&["h1", "h2"])),
            entity("ar2", None),
            entity("cq1", Some(&["h3"])),
        ];

        let report = remove_all(entities.iter(), &mutator, |_| {}).await.unwrap();

        assert_eq!(
            report.operations,
            vec![
                HolidayOperation::delete("ar1", "h1", "Holiday h1"),
                HolidayOperation::delete("ar1", "h2", "Holiday h2"),
                HolidayOperation::delete("cq1", "h3", "Holiday h3"),
            ]
        );
        assert_eq!(endpoint.calls().len(), 3);
        assert_eq!(report.entities_processed, 3);

        let stats = pacer.stats();
        assert_eq!(stats.call_pauses, 0);
        assert_eq!(stats.entity_pauses, 0);
        assert_eq!(stats.completion_pauses, 1);
    }

    #[tokio::test]
    async fn test_failure_aborts_removal() {
        let endpoint = RecordingEndpoint::failing_on(1);
        let pacer = Pacer::new(PacingConfig::disabled());
        let mutator = RemoteMutator::new(&endpoint, &pacer);
        let entities = vec![entity("ar1", Some(&["h1", "h2", "h3"]))];

        assert!(remove_all(entities.iter(), &mutator, |_| {}).await.is_err());
        assert_eq!(endpoint.calls().len(), 1);
    }
}
