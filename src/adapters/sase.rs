use crate::config::settings::Settings;
use crate::domain::model::{Device, PrefixEntry, PrefixListHandle};
use crate::domain::ports::PlatformClient;
use crate::utils::error::{IonError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_API_BASE: &str = "https://api.sase.paloaltonetworks.com";
const DEFAULT_AUTH_BASE: &str = "https://auth.apps.paloaltonetworks.com";
const SITES_PATH: &str = "/sdwan/v4.11/api/sites";
const ELEMENTS_PATH: &str = "/sdwan/v3.1/api/elements";

/// Prisma SASE client. Logs in with OAuth2 client credentials scoped to the
/// tenant services group, then drives the SD-WAN REST API with a bearer token.
pub struct SaseClient {
    http: Client,
    settings: Settings,
    api_base: String,
    auth_base: String,
    token: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct Items<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct SiteItem {
    id: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ElementItem {
    id: String,
    name: String,
    site_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl SaseClient {
    pub fn new(settings: Settings) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let api_base = settings
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let auth_base = settings
            .auth_base
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTH_BASE.to_string());
        Ok(Self {
            http,
            settings,
            api_base,
            auth_base,
            token: RwLock::new(None),
        })
    }

    async fn bearer(&self) -> Result<String> {
        self.token
            .read()
            .await
            .clone()
            .ok_or_else(|| IonError::LoginError {
                message: "not logged in".to_string(),
            })
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        Err(IonError::PlatformError {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.bearer().await?;
        let resp = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<()> {
        let token = self.bearer().await?;
        tracing::debug!("{} {} payload: {}", method, path, payload);
        let resp = self
            .http
            .request(method, format!("{}{}", self.api_base, path))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    fn prefixlists_path(device: &Device) -> String {
        format!(
            "/sdwan/v15.0/api/sites/{}/elements/{}/routing_prefixlists",
            device.site_id, device.id
        )
    }
}

#[async_trait]
impl PlatformClient for SaseClient {
    async fn login(&self) -> Result<()> {
        let scope = format!("tsg_id:{}", self.settings.tsg_id);
        let resp = self
            .http
            .post(format!("{}/oauth2/access_token", self.auth_base))
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            return Err(IonError::LoginError {
                message: format!("status {}: {}", status.as_u16(), message),
            });
        }

        let token: TokenResponse = resp.json().await?;
        *self.token.write().await = Some(token.access_token);
        tracing::info!("Logged in (tsg {})", self.settings.tsg_id);
        Ok(())
    }

    async fn find_site_id(&self, name: &str) -> Result<Option<String>> {
        let sites: Items<SiteItem> = self.get_json(SITES_PATH).await?;
        Ok(sites
            .items
            .into_iter()
            .find(|site| site.name == name)
            .map(|site| site.id))
    }

    async fn list_devices(&self, site_id: &str) -> Result<Vec<Device>> {
        // Elements are listed tenant-wide; membership is their site_id field.
        let elements: Items<ElementItem> = self.get_json(ELEMENTS_PATH).await?;
        Ok(elements
            .items
            .into_iter()
            .filter(|element| element.site_id.as_deref() == Some(site_id))
            .map(|element| Device {
                id: element.id,
                name: element.name,
                site_id: site_id.to_string(),
            })
            .collect())
    }

    async fn get_prefix_list(
        &self,
        device: &Device,
        name: &str,
    ) -> Result<Option<PrefixListHandle>> {
        let lists: Items<serde_json::Value> =
            self.get_json(&Self::prefixlists_path(device)).await?;
        for list in lists.items {
            if list.get("name").and_then(|v| v.as_str()) == Some(name) {
                let id = list
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| IonError::UnexpectedResponseError {
                        message: format!("prefix list '{}' has no id field", name),
                    })?
                    .to_string();
                return Ok(Some(PrefixListHandle { id, body: list }));
            }
        }
        Ok(None)
    }

    async fn create_prefix_list(
        &self,
        device: &Device,
        name: &str,
        entries: &[PrefixEntry],
    ) -> Result<()> {
        let payload = json!({
            "name": name,
            "description": managed_description(name),
            "tags": serde_json::Value::Null,
            "auto_generated": false,
            "prefix_filter_list": prefix_filter_list(entries),
        });
        self.send_json(
            reqwest::Method::POST,
            &Self::prefixlists_path(device),
            &payload,
        )
        .await
    }

    async fn update_prefix_list(
        &self,
        device: &Device,
        existing: &PrefixListHandle,
        name: &str,
        entries: &[PrefixEntry],
    ) -> Result<()> {
        // Base the payload on the fetched object so _etag and vendor fields
        // this tool does not model travel back unchanged.
        let mut payload = existing.body.clone();
        payload["description"] = json!(managed_description(name));
        payload["prefix_filter_list"] = prefix_filter_list(entries);
        let path = format!("{}/{}", Self::prefixlists_path(device), existing.id);
        self.send_json(reqwest::Method::PUT, &path, &payload).await
    }
}

fn managed_description(name: &str) -> String {
    format!("Prefix list '{}'. Managed by script.", name)
}

// Platform entry order is 10, 20, 30... leaving room for manual inserts.
fn prefix_filter_list(entries: &[PrefixEntry]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            json!({
                "order": (i as u64 + 1) * 10,
                "permit": true,
                "prefix": entry.network,
                "ipv6_prefix": serde_json::Value::Null,
                "ge": entry.ge,
                "le": entry.le,
            })
        })
        .collect();
    serde_json::Value::Array(items)
}
