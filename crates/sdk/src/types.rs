use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub item_count: u64,
    #[serde(default)]
    pub storage_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: Uuid,
    pub name: String,
    pub directory_id: Uuid,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub storage_id: Option<String>,
    #[serde(default)]
    pub soft_deleted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub storage_classes: Vec<StorageClassRef>,
    #[serde(default)]
    pub piece_id: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub on_chain_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassRef {
    pub storage_class_name: String,
}

/// One directory level: its immediate sub-directories and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryContents {
    #[serde(default)]
    pub directories: Vec<Directory>,
    #[serde(default)]
    pub files: Vec<File>,
}

/// Generic acknowledgement for mutations whose response carries no
/// resource body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Replication state of one backing network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicationStatus {
    Replicated,
    #[serde(rename = "In Progress")]
    InProgress,
    /// Network has no live integration yet.
    Pending,
}

/// Per-network replication leg with its typed metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkReplication<M> {
    pub links: Vec<Url>,
    pub status: ReplicationStatus,
    pub metadata: Option<M>,
}

/// Backing network without a live integration: links only, never probed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderReplication {
    pub links: Vec<Url>,
    pub status: ReplicationStatus,
}

impl Default for PlaceholderReplication {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            status: ReplicationStatus::Pending,
        }
    }
}

/// Composite replication view across the fixed set of backing networks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Replications {
    pub ipfs: NetworkReplication<IpfsMetadata>,
    pub sia: NetworkReplication<SiaMetadata>,
    pub filecoin: PlaceholderReplication,
    pub filefilego: PlaceholderReplication,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpfsMetadata {
    pub cid: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub pin_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiaMetadata {
    pub object: SiaObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiaObject {
    /// Empty until the object finishes replicating.
    #[serde(rename = "eTag", default)]
    pub e_tag: String,
    #[serde(default)]
    pub mod_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub key: Option<String>,
}
