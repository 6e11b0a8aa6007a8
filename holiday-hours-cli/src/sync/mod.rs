//! Account data refresh and holiday synchronisation

pub mod collector;
pub mod enrich;
pub mod mutator;
pub mod reconcile;
pub mod remove;

pub use collector::collect_all;
pub use mutator::{HolidayEndpoint, RemoteMutator};
pub use reconcile::{ReconcileEvent, ReconcileOptions, ReconcileReport, plan_entity, reconcile};
pub use remove::remove_all;

use anyhow::{Context, Result};
use log::info;

use crate::api::constants::{AUTO_RECEPTIONISTS, CALL_QUEUES, SITES};
use crate::api::{PhoneClient, PhoneEntity, Site};

/// Everything fetched in one refresh. Replaced wholesale on the next refresh.
#[derive(Debug, Clone, Default)]
pub struct PhoneData {
    pub sites: Vec<Site>,
    pub auto_receptionists: Vec<PhoneEntity>,
    pub call_queues: Vec<PhoneEntity>,
    pub external_auto_receptionists: Vec<PhoneEntity>,
    pub external_call_queues: Vec<PhoneEntity>,
}

/// Counts shown in the account overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSummary {
    pub sites: usize,
    pub auto_receptionists: usize,
    pub external_auto_receptionists: usize,
    pub call_queues: usize,
    pub external_call_queues: usize,
}

impl PhoneData {
    /// Fetch sites, call queues and auto receptionists, enrich the latter two
    /// with their holiday hours and derive the external subsets.
    pub async fn refresh(client: &PhoneClient) -> Result<Self> {
        let sites: Vec<Site> = collect_all(client, SITES).await?;

        let mut call_queues: Vec<PhoneEntity> = collect_all(client, CALL_QUEUES).await?;
        enrich::enrich_all(client, &mut call_queues)
            .await
            .context("Failed to load call queue holidays")?;

        let mut auto_receptionists: Vec<PhoneEntity> =
            collect_all(client, AUTO_RECEPTIONISTS).await?;
        enrich::enrich_all(client, &mut auto_receptionists)
            .await
            .context("Failed to load auto receptionist holidays")?;

        let data = Self::from_parts(sites, auto_receptionists, call_queues);
        info!(
            "Loaded {} sites, {} auto receptionists, {} call queues",
            data.sites.len(),
            data.auto_receptionists.len(),
            data.call_queues.len()
        );
        Ok(data)
    }

    /// Assemble data from already fetched collections
    pub fn from_parts(
        sites: Vec<Site>,
        auto_receptionists: Vec<PhoneEntity>,
        call_queues: Vec<PhoneEntity>,
    ) -> Self {
        let external = |entities: &[PhoneEntity]| -> Vec<PhoneEntity> {
            entities.iter().filter(|e| e.is_external()).cloned().collect()
        };

        Self {
            external_auto_receptionists: external(&auto_receptionists),
            external_call_queues: external(&call_queues),
            sites,
            auto_receptionists,
            call_queues,
        }
    }

    /// External auto receptionists followed by external call queues
    pub fn combined_external(&self) -> impl ExactSizeIterator<Item = &PhoneEntity> {
        self.external_auto_receptionists
            .iter()
            .chain(self.external_call_queues.iter())
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            sites: self.sites.len(),
            auto_receptionists: self.auto_receptionists.len(),
            external_auto_receptionists: self.external_auto_receptionists.len(),
            call_queues: self.call_queues.len(),
            external_call_queues: self.external_call_queues.len(),
        }
    }
}
