//! Remote mutations with pacing
//!
//! [`HolidayEndpoint`] is the three-call surface the reconciler needs;
//! [`RemoteMutator`] issues operations through it and owns every pause
//! between them.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::api::{HolidayOperation, Pacer};

#[async_trait]
pub trait HolidayEndpoint: Send + Sync {
    async fn add_holiday(&self, extension_id: &str, name: &str, from: &str, to: &str) -> Result<()>;

    /// Replace the window of an existing holiday; the name is not resent
    async fn update_holiday(
        &self,
        extension_id: &str,
        holiday_id: &str,
        from: &str,
        to: &str,
    ) -> Result<()>;

    async fn delete_holiday(&self, extension_id: &str, holiday_id: &str) -> Result<()>;
}

pub struct RemoteMutator<'a> {
    endpoint: &'a dyn HolidayEndpoint,
    pacer: &'a Pacer,
}

impl<'a> RemoteMutator<'a> {
    pub fn new(endpoint: &'a dyn HolidayEndpoint, pacer: &'a Pacer) -> Self {
        Self { endpoint, pacer }
    }

    pub fn pacer(&self) -> &Pacer {
        self.pacer
    }

    /// Issue one operation, then wait the per-call delay
    pub async fn apply(&self, operation: &HolidayOperation) -> Result<()> {
        self.apply_unpaced(operation).await?;
        self.pacer.after_call().await;
        Ok(())
    }

    /// Issue one operation without any pause afterwards
    pub async fn apply_unpaced(&self, operation: &HolidayOperation) -> Result<()> {
        debug!(
            "{} ({}) holiday '{}' on extension {}",
            operation.operation_type(),
            operation.http_method(),
            operation.name(),
            operation.extension_id()
        );
        operation.execute(self.endpoint).await
    }

    /// All calls for one entity are done
    pub async fn entity_done(&self) {
        self.pacer.after_entity().await;
    }

    /// A whole collection is done
    pub async fn finish(&self) {
        self.pacer.on_complete().await;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::PacingConfig;
    use std::sync::Mutex;

    /// Records every call; optionally fails on the n-th call
    #[derive(Default)]
    pub(crate) struct RecordingEndpoint {
        pub calls: Mutex<Vec<HolidayOperation>>,
        pub fail_on_call: Option<usize>,
    }

    impl RecordingEndpoint {
        pub(crate) fn failing_on(call: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        pub(crate) fn calls(&self) -> Vec<HolidayOperation> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, op: HolidayOperation) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            if self.fail_on_call == Some(calls.len()) {
                anyhow::bail!("{} {} failed with status 429", op.http_method(), op.extension_id());
            }
            calls.push(op);
            Ok(())
        }
    }

    #[async_trait]
    impl HolidayEndpoint for RecordingEndpoint {
        async fn add_holiday(&self, extension_id: &str, name: &str, from: &str, to: &str) -> Result<()> {
            self.record(HolidayOperation::add(extension_id, name, from, to))
        }

        async fn update_holiday(
            &self,
            extension_id: &str,
            holiday_id: &str,
            from: &str,
            to: &str,
        ) -> Result<()> {
            // The name never reaches the wire
            self.record(HolidayOperation::update(extension_id, holiday_id, "", from, to))
        }

        async fn delete_holiday(&self, extension_id: &str, holiday_id: &str) -> Result<()> {
            self.record(HolidayOperation::delete(extension_id, holiday_id, ""))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_pauses_but_unpaced_does_not() {
        let endpoint = RecordingEndpoint::default();
        let pacer = Pacer::new(PacingConfig::default());
        let mutator = RemoteMutator::new(&endpoint, &pacer);

        mutator
            .apply(&HolidayOperation::delete("ext", "h1", "Old"))
            .await
            .unwrap();
        mutator
            .apply_unpaced(&HolidayOperation::delete("ext", "h2", "Older"))
            .await
            .unwrap();

        assert_eq!(endpoint.calls().len(), 2);
        assert_eq!(pacer.stats().call_pauses, 1);
    }

    #[tokio::test]
    async fn test_failed_call_skips_pause() {
        let endpoint = RecordingEndpoint::failing_on(0);
        let pacer = Pacer::new(PacingConfig::default());
        let mutator = RemoteMutator::new(&endpoint, &pacer);

        let result = mutator
            .apply(&HolidayOperation::add("ext", "Christmas", "a", "b"))
            .await;

        assert!(result.is_err());
        assert_eq!(pacer.stats().call_pauses, 0);
    }
}
