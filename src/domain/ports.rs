use crate::domain::model::{Device, PrefixEntry, PrefixListHandle};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The management-platform seam. The production implementation talks to the
/// Prisma SASE REST API; tests substitute an in-memory fake.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn login(&self) -> Result<()>;

    /// Resolve a site name to its platform id. `Ok(None)` when the tenant has
    /// no site by that name.
    async fn find_site_id(&self, name: &str) -> Result<Option<String>>;

    async fn list_devices(&self, site_id: &str) -> Result<Vec<Device>>;

    async fn get_prefix_list(
        &self,
        device: &Device,
        name: &str,
    ) -> Result<Option<PrefixListHandle>>;

    async fn create_prefix_list(
        &self,
        device: &Device,
        name: &str,
        entries: &[PrefixEntry],
    ) -> Result<()>;

    async fn update_prefix_list(
        &self,
        device: &Device,
        existing: &PrefixListHandle,
        name: &str,
        entries: &[PrefixEntry],
    ) -> Result<()>;
}
