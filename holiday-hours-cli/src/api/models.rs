//! Zoom Phone data models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A phone site. Only counted, never reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An auto receptionist or call queue as returned by the listing endpoints,
/// optionally enriched with its current holiday hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneEntity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub extension_id: String,
    /// Present only when the entity is reachable through a public number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<Value>>,
    /// `None` means enrichment found no holiday entries at all.
    /// `Some(vec![])` is never produced by enrichment but is a valid state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_hours: Option<Vec<RemoteHoliday>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PhoneEntity {
    /// Whether the entity has a PSTN number and is therefore a reconciliation target
    pub fn is_external(&self) -> bool {
        self.phone_numbers.is_some()
    }

    /// Display name, falling back to the extension id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.extension_id)
    }
}

/// A holiday window as it currently exists on a remote entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHoliday {
    /// Opaque remote identifier, required for update and delete
    pub id: String,
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Response of `GET /phone/extension/{id}/call_handling/settings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallHandlingSettings {
    #[serde(default)]
    pub holiday_hours: Vec<HolidayHoursEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HolidayHoursEntry {
    pub holiday_id: String,
    #[serde(default)]
    pub details: Vec<SettingDetail>,
}

/// One sub-setting block. `settings` is left untyped because its shape
/// depends on `sub_setting_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingDetail {
    pub sub_setting_type: String,
    #[serde(default)]
    pub settings: Value,
}

/// The `settings` object of a `holiday` sub-setting
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayWindow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// Request body shared by the add and update calls
#[derive(Debug, Serialize)]
pub struct HolidaySettingRequest<S: Serialize> {
    pub settings: S,
    pub sub_setting_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NewHoliday<'a> {
    pub name: &'a str,
    pub from: &'a str,
    pub to: &'a str,
}

#[derive(Debug, Serialize)]
pub struct HolidayWindowPatch<'a> {
    pub holiday_id: &'a str,
    pub from: &'a str,
    pub to: &'a str,
}

/// Access token response from the OAuth endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_without_phone_numbers_is_internal() {
        let entity: PhoneEntity = serde_json::from_value(json!({
            "id": "cq1",
            "name": "Support",
            "extension_id": "ext1",
            "extension_number": 1001
        }))
        .unwrap();

        assert!(!entity.is_external());
        assert!(entity.holiday_hours.is_none());
        assert_eq!(entity.extra.get("extension_number"), Some(&json!(1001)));
    }

    #[test]
    fn test_entity_with_empty_phone_numbers_is_external() {
        let entity: PhoneEntity = serde_json::from_value(json!({
            "id": "ar1",
            "extension_id": "ext2",
            "phone_numbers": []
        }))
        .unwrap();

        assert!(entity.is_external());
        assert_eq!(entity.display_name(), "ext2");
    }

    #[test]
    fn test_add_request_body_shape() {
        let body = HolidaySettingRequest {
            settings: NewHoliday {
                name: "Christmas",
                from: "2024-12-25",
                to: "2024-12-26",
            },
            sub_setting_type: "holiday",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "settings": {"name": "Christmas", "from": "2024-12-25", "to": "2024-12-26"},
                "sub_setting_type": "holiday"
            })
        );
    }

    #[test]
    fn test_settings_missing_holiday_hours_defaults_empty() {
        let settings: CallHandlingSettings =
            serde_json::from_value(json!({"business_hours": []})).unwrap();
        assert!(settings.holiday_hours.is_empty());
    }
}
