// Port definitions for the alerting engine
// These traits define the boundaries between the engine and its collaborators

use anyhow::Result;
use preorder_core::{DeliveryError, ItemDetails};

/// Port for the catalog provider that supplies tracked items
/// Allows swapping between the live store client and test fixtures
#[async_trait::async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetch the current item snapshot. Called exactly once per run.
    /// Items without a preorder window are valid and simply never alert.
    async fn fetch_items(&self, fill_preorder_period: bool) -> Result<Vec<ItemDetails>>;
}

/// Port for the chat delivery collaborator
/// Abstracts the details of message transmission (Discord REST, mock, etc.)
#[async_trait::async_trait]
pub trait DeliveryPort: Send + Sync {
    /// Block until the collaborator's connection is established.
    /// Returns the identity it is logged in as. The dispatch caller awaits
    /// this before any delivery.
    async fn ready(&self) -> Result<String>;

    /// Send one rendered alert to a channel. Bodies for one channel must
    /// land in order within a single call.
    async fn deliver(
        &self,
        channel_id: u64,
        header: &str,
        bodies: &[String],
    ) -> Result<(), DeliveryError>;
}
