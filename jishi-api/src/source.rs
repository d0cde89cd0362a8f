use async_trait::async_trait;

use crate::client::JishiClient;
use crate::error::Result;
use crate::models::ZoneGroup;

/// Anything that can produce the current zone snapshot
///
/// The sync engine depends on this rather than on [`JishiClient`] so tests
/// can script the snapshots it sees.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    async fn fetch_zones(&self) -> Result<Vec<ZoneGroup>>;
}

#[async_trait]
impl ZoneSource for JishiClient {
    async fn fetch_zones(&self) -> Result<Vec<ZoneGroup>> {
        self.zones().await
    }
}

#[async_trait]
impl<T: ZoneSource + ?Sized> ZoneSource for std::sync::Arc<T> {
    async fn fetch_zones(&self) -> Result<Vec<ZoneGroup>> {
        (**self).fetch_zones().await
    }
}
