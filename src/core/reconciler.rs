use crate::domain::model::{Device, PrefixListDefinition};
use crate::domain::ports::PlatformClient;
use crate::utils::error::Result;

/// One target that could not be brought in line. `device` is `None` when the
/// failure happened before a device was in play (site lookup, device listing).
#[derive(Debug, Clone)]
pub struct TargetFailure {
    pub prefix_list: String,
    pub site: String,
    pub device: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.device {
            Some(device) => write!(
                f,
                "prefix list '{}' at site '{}', device '{}': {}",
                self.prefix_list, self.site, device, self.reason
            ),
            None => write!(
                f,
                "prefix list '{}' at site '{}': {}",
                self.prefix_list, self.site, self.reason
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<TargetFailure>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Applied {
    Created,
    Updated,
}

/// Drives every (definition, site, device) target to the desired state:
/// update the prefix list in place when it already exists on the device,
/// create it otherwise. Failures are accumulated, never fatal; one bad site
/// or device must not block the rest.
pub struct Reconciler<'a, C: PlatformClient> {
    client: &'a C,
}

impl<'a, C: PlatformClient> Reconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn apply_all(&self, definitions: &[PrefixListDefinition]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for def in definitions {
            for site_name in &def.target_sites {
                tracing::info!(
                    "Applying prefix list '{}' to site '{}'",
                    def.name,
                    site_name
                );
                self.apply_to_site(def, site_name, &mut report).await;
            }
        }
        report
    }

    async fn apply_to_site(
        &self,
        def: &PrefixListDefinition,
        site_name: &str,
        report: &mut ReconcileReport,
    ) {
        let site_id = match self.client.find_site_id(site_name).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!("Target site '{}' not found in tenant", site_name);
                report.failures.push(TargetFailure {
                    prefix_list: def.name.clone(),
                    site: site_name.to_string(),
                    device: None,
                    reason: "site not found in tenant".to_string(),
                });
                return;
            }
            Err(e) => {
                report.failures.push(TargetFailure {
                    prefix_list: def.name.clone(),
                    site: site_name.to_string(),
                    device: None,
                    reason: e.to_string(),
                });
                return;
            }
        };

        let devices = match self.client.list_devices(&site_id).await {
            Ok(devices) => devices,
            Err(e) => {
                report.failures.push(TargetFailure {
                    prefix_list: def.name.clone(),
                    site: site_name.to_string(),
                    device: None,
                    reason: format!("could not list devices: {}", e),
                });
                return;
            }
        };

        if devices.is_empty() {
            tracing::info!("No devices found at site '{}'", site_name);
            return;
        }

        for device in &devices {
            match self.apply_to_device(def, device).await {
                Ok(Applied::Created) => report.created += 1,
                Ok(Applied::Updated) => report.updated += 1,
                Err(e) => {
                    tracing::error!(
                        "Failed to apply '{}' on device '{}': {}",
                        def.name,
                        device.name,
                        e
                    );
                    report.failures.push(TargetFailure {
                        prefix_list: def.name.clone(),
                        site: site_name.to_string(),
                        device: Some(device.name.clone()),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn apply_to_device(&self, def: &PrefixListDefinition, device: &Device) -> Result<Applied> {
        tracing::debug!(
            "Checking device '{}' for prefix list '{}'",
            device.name,
            def.name
        );
        match self.client.get_prefix_list(device, &def.name).await? {
            Some(existing) => {
                tracing::info!(
                    "  Prefix list '{}' exists on '{}'. Updating...",
                    def.name,
                    device.name
                );
                self.client
                    .update_prefix_list(device, &existing, &def.name, &def.entries)
                    .await?;
                Ok(Applied::Updated)
            }
            None => {
                tracing::info!(
                    "  Prefix list '{}' does not exist on '{}'. Creating...",
                    def.name,
                    device.name
                );
                self.client
                    .create_prefix_list(device, &def.name, &def.entries)
                    .await?;
                Ok(Applied::Created)
            }
        }
    }
}
