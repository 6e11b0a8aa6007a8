//! Zoom Phone API constants

/// Default REST base URL for the Zoom API
pub const API_BASE_URL: &str = "https://api.zoom.us/v2";

/// Default OAuth base URL used for client-credentials token exchange
pub const OAUTH_BASE_URL: &str = "https://zoom.us/oauth";

/// Page size requested from every paginated listing endpoint
pub const PAGE_SIZE: u32 = 300;

/// Sub-setting discriminator for holiday entries in call-handling settings
pub const HOLIDAY_SUB_SETTING: &str = "holiday";

/// A cursor-paginated listing endpoint and the key its items are returned under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    pub path: &'static str,
    pub items_key: &'static str,
}

pub const SITES: Listing = Listing {
    path: "/phone/sites",
    items_key: "sites",
};

pub const AUTO_RECEPTIONISTS: Listing = Listing {
    path: "/phone/auto_receptionists",
    items_key: "auto_receptionists",
};

pub const CALL_QUEUES: Listing = Listing {
    path: "/phone/call_queues",
    items_key: "call_queues",
};

/// Path of an extension's call-handling settings
pub fn call_handling_settings_path(extension_id: &str) -> String {
    format!("/phone/extension/{}/call_handling/settings", extension_id)
}

/// Path used to add, patch and delete an extension's holiday sub-settings
pub fn holiday_hours_path(extension_id: &str) -> String {
    format!("{}/holiday_hours", call_handling_settings_path(extension_id))
}
