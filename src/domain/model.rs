use serde::{Deserialize, Serialize};

/// One CIDR matcher inside a prefix list. `ge`/`le` are the minimum/maximum
/// prefix length bounds used by route filtering; 0 means unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixEntry {
    pub network: String,
    #[serde(default)]
    pub ge: u32,
    #[serde(default)]
    pub le: u32,
}

/// A named prefix list together with the sites it must be applied to.
/// Built by the row grouper from consecutive CSV rows; `target_sites` keeps
/// first-seen order with duplicates removed, `entries` keeps file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixListDefinition {
    pub name: String,
    pub target_sites: Vec<String>,
    pub entries: Vec<PrefixEntry>,
}

/// A device (element) living at a site. Prefix-list API paths need both the
/// site and the element id; `name` is only used for logs and failure reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub site_id: String,
}

/// A prefix list as it currently exists on a device. `body` is the raw vendor
/// object, kept opaque so an update can send back `_etag` and any fields this
/// tool does not model.
#[derive(Debug, Clone)]
pub struct PrefixListHandle {
    pub id: String,
    pub body: serde_json::Value,
}
