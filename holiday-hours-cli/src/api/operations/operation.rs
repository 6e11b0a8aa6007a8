//! Core operation types for holiday sub-setting mutations

use std::fmt;

use crate::sync::HolidayEndpoint;

/// A single mutating call against an extension's holiday hours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayOperation {
    /// Create a new holiday sub-setting
    Add {
        extension_id: String,
        name: String,
        from: String,
        to: String,
    },
    /// Replace the window of an existing holiday. `name` is kept for
    /// reporting only and is never sent.
    Update {
        extension_id: String,
        holiday_id: String,
        name: String,
        from: String,
        to: String,
    },
    /// Remove a holiday sub-setting by its remote id
    Delete {
        extension_id: String,
        holiday_id: String,
        name: String,
    },
}

impl HolidayOperation {
    /// Create a new Add operation
    pub fn add(
        extension_id: impl Into<String>,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::Add {
            extension_id: extension_id.into(),
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new Update operation
    pub fn update(
        extension_id: impl Into<String>,
        holiday_id: impl Into<String>,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::Update {
            extension_id: extension_id.into(),
            holiday_id: holiday_id.into(),
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new Delete operation
    pub fn delete(
        extension_id: impl Into<String>,
        holiday_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::Delete {
            extension_id: extension_id.into(),
            holiday_id: holiday_id.into(),
            name: name.into(),
        }
    }

    /// Get the extension this operation targets
    pub fn extension_id(&self) -> &str {
        match self {
            Self::Add { extension_id, .. } => extension_id,
            Self::Update { extension_id, .. } => extension_id,
            Self::Delete { extension_id, .. } => extension_id,
        }
    }

    /// Get the holiday name this operation concerns
    pub fn name(&self) -> &str {
        match self {
            Self::Add { name, .. } => name,
            Self::Update { name, .. } => name,
            Self::Delete { name, .. } => name,
        }
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> &'static str {
        match self {
            Self::Add { .. } => "POST",
            Self::Update { .. } => "PATCH",
            Self::Delete { .. } => "DELETE",
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// Execute this operation as a single call against the endpoint
    pub async fn execute(&self, endpoint: &dyn HolidayEndpoint) -> anyhow::Result<()> {
        match self {
            Self::Add {
                extension_id,
                name,
                from,
                to,
            } => endpoint.add_holiday(extension_id, name, from, to).await,
            Self::Update {
                extension_id,
                holiday_id,
                from,
                to,
                ..
            } => endpoint.update_holiday(extension_id, holiday_id, from, to).await,
            Self::Delete {
                extension_id,
                holiday_id,
                ..
            } => endpoint.delete_holiday(extension_id, holiday_id).await,
        }
    }
}

impl fmt::Display for HolidayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { name, from, to, .. } => write!(f, "add '{}' {} -> {}", name, from, to),
            Self::Update {
                holiday_id,
                name,
                from,
                to,
                ..
            } => write!(f, "update '{}' ({}) to {} -> {}", name, holiday_id, from, to),
            Self::Delete {
                holiday_id, name, ..
            } => write!(f, "delete '{}' ({})", name, holiday_id),
        }
    }
}

/// Per-type tally of a list of operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    pub adds: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl OperationCounts {
    pub fn tally<'a>(operations: impl IntoIterator<Item = &'a HolidayOperation>) -> Self {
        let mut counts = Self::default();
        for op in operations {
            match op {
                HolidayOperation::Add { .. } => counts.adds += 1,
                HolidayOperation::Update { .. } => counts.updates += 1,
                HolidayOperation::Delete { .. } => counts.deletes += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.adds + self.updates + self.deletes
    }
}
