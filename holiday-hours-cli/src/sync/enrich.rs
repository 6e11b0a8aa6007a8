//! Per-entity holiday enrichment
//!
//! Turns an extension's call-handling settings into the typed holiday list
//! the reconciler works on.

use anyhow::{Context, Result};
use log::debug;

use crate::api::constants::HOLIDAY_SUB_SETTING;
use crate::api::models::{CallHandlingSettings, HolidayWindow};
use crate::api::{PhoneClient, PhoneEntity, RemoteHoliday};

/// Extract holiday entries from call-handling settings.
///
/// Returns `None` when the server reports no holiday entries, so "never had
/// any" stays distinct from an empty list. Only the `holiday` sub-setting
/// contributes fields; an entry without one keeps empty name/from/to.
pub fn holidays_from_settings(settings: &CallHandlingSettings) -> Result<Option<Vec<RemoteHoliday>>> {
    if settings.holiday_hours.is_empty() {
        return Ok(None);
    }

    let mut holidays = Vec::with_capacity(settings.holiday_hours.len());
    for entry in &settings.holiday_hours {
        let mut window = HolidayWindow::default();
        for detail in &entry.details {
            if detail.sub_setting_type == HOLIDAY_SUB_SETTING {
                window = serde_json::from_value(detail.settings.clone()).with_context(|| {
                    format!("Malformed holiday settings for holiday {}", entry.holiday_id)
                })?;
            }
        }

        holidays.push(RemoteHoliday {
            id: entry.holiday_id.clone(),
            name: window.name,
            from: window.from,
            to: window.to,
        });
    }

    Ok(Some(holidays))
}

/// Fetch and attach the holiday hours of one entity
pub async fn enrich_entity(client: &PhoneClient, entity: &mut PhoneEntity) -> Result<()> {
    let settings = client.call_handling_settings(&entity.extension_id).await?;
    entity.holiday_hours = holidays_from_settings(&settings)
        .with_context(|| format!("Failed to read holidays of extension {}", entity.extension_id))?;

    debug!(
        "Extension {} has {} holiday(s)",
        entity.extension_id,
        entity.holiday_hours.as_ref().map_or(0, Vec::len)
    );
    Ok(())
}

/// Enrich every entity in order; the first failure aborts
pub async fn enrich_all(client: &PhoneClient, entities: &mut [PhoneEntity]) -> Result<()> {
    for entity in entities.iter_mut() {
        enrich_entity(client, entity).await?;
    }
    Ok(())
}
