use bytes::Bytes;
use futures::future;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::{ApiError, ErrorResponse};
use crate::scope::Scope;
use crate::types::{
    File, IpfsMetadata, NetworkReplication, OpStatus, PlaceholderReplication, ReplicationStatus,
    Replications, SiaMetadata,
};

/// File operations: reads, multipart uploads, mutation and the
/// cross-network replication view.
#[derive(Debug, Clone)]
pub struct FileOps {
    client: ApiClient,
    scope: Scope,
    /// Credential subject, part of the Sia metadata path.
    subject_id: String,
}

impl FileOps {
    pub(crate) fn new(client: ApiClient, scope: Scope, subject_id: String) -> Self {
        Self {
            client,
            scope,
            subject_id,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<File, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        self.client.call(GetFileRequest { id }).await
    }

    pub async fn list(&self) -> Result<Vec<File>, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        self.client.call(ListFilesRequest).await
    }

    pub async fn upload(&self, params: UploadParams) -> Result<UploadedFile, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "UPLOAD_FILE is not allowed.")?;
        self.client.call(UploadRequest { params }).await
    }

    /// Upload many files concurrently. Each input gets its own request
    /// and its own outcome; one failure does not block the siblings, and
    /// completion order is not significant.
    pub async fn bulk_upload(
        &self,
        files: Vec<UploadParams>,
    ) -> Result<Vec<Result<UploadedFile, ErrorResponse>>, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "UPLOAD_FILES is not allowed.")?;
        let uploads = files.into_iter().map(|params| {
            let client = self.client.clone();
            async move {
                client
                    .call(UploadRequest { params })
                    .await
                    .map_err(|err| err.descriptor())
            }
        });
        Ok(future::join_all(uploads).await)
    }

    pub async fn delete(&self, id: Uuid) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::DELETE_FILE, "DELETE_FILE is not allowed.")?;
        self.client.call(DeleteFileRequest { id }).await
    }

    /// Rename is delete+recreate server-side, hence the conjunction.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::UPLOAD_FILE | Scope::DELETE_FILE,
            "RENAME_FILE is not allowed.",
        )?;
        self.client
            .call(UpdateFileRequest {
                id,
                body: UpdateFileBody {
                    name: Some(name.to_string()),
                    ..UpdateFileBody::default()
                },
            })
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        add_storage_classes: Option<Vec<String>>,
        remove_storage_classes: Option<Vec<String>>,
    ) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::UPLOAD_FILE | Scope::DELETE_FILE,
            "UPDATE_FILE is not allowed.",
        )?;
        self.client
            .call(UpdateFileRequest {
                id,
                body: UpdateFileBody {
                    name,
                    add_storage_classes,
                    remove_storage_classes,
                },
            })
            .await
    }

    /// Aggregate size in bytes of every file owned by the caller.
    pub async fn total_size(&self) -> Result<u64, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        let response: TotalSizeResponse = self.client.call(TotalSizeRequest).await?;
        Ok(response.total_size)
    }

    /// Replication status across the fixed set of backing networks.
    ///
    /// The content-addressed leg is always served from the edge gateways.
    /// The object-storage leg counts as replicated once its metadata
    /// probe comes back with a non-empty eTag. The remaining networks
    /// have no live integration and stay pending.
    pub async fn get_replications(&self, cid: &str) -> Result<Replications, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;

        let hosts = self.client.hosts();
        let ipfs_links: Vec<Url> = hosts
            .edge_gateways
            .iter()
            .filter_map(|gateway| gateway.join(&format!("gw/{cid}")).ok())
            .collect();
        let sia_links = vec![hosts
            .sia
            .join(&format!("/open/object/meta/{}/{}", self.subject_id, cid))?];

        let ipfs_metadata = self.probe_ipfs(cid).await;
        let sia_metadata = self.probe_sia(cid).await;
        let sia_status = match &sia_metadata {
            Some(metadata) if !metadata.object.e_tag.is_empty() => ReplicationStatus::Replicated,
            _ => ReplicationStatus::InProgress,
        };

        Ok(Replications {
            ipfs: NetworkReplication {
                links: ipfs_links,
                status: ReplicationStatus::Replicated,
                metadata: ipfs_metadata,
            },
            sia: NetworkReplication {
                links: sia_links,
                status: sia_status,
                metadata: sia_metadata,
            },
            filecoin: PlaceholderReplication::default(),
            filefilego: PlaceholderReplication::default(),
        })
    }

    /// Content-network metadata for a cid. Probe failures are logged and
    /// lowered to `None`; only the capability check is fatal.
    pub async fn ipfs_metadata(&self, cid: &str) -> Result<Option<IpfsMetadata>, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        Ok(self.probe_ipfs(cid).await)
    }

    /// Object-storage metadata for a cid, keyed by the credential subject.
    pub async fn sia_metadata(&self, cid: &str) -> Result<Option<SiaMetadata>, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        Ok(self.probe_sia(cid).await)
    }

    async fn probe_ipfs(&self, cid: &str) -> Option<IpfsMetadata> {
        match self.client.call(IpfsMetadataRequest { cid: cid.to_string() }).await {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                tracing::warn!(cid, "IPFS metadata probe failed: {err}");
                None
            }
        }
    }

    async fn probe_sia(&self, cid: &str) -> Option<SiaMetadata> {
        let request = SiaMetadataRequest {
            subject_id: self.subject_id.clone(),
            cid: cid.to_string(),
        };
        match self.client.call(request).await {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                tracing::warn!(cid, "Sia metadata probe failed: {err}");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GetFileRequest {
    id: Uuid,
}

impl ApiRequest for GetFileRequest {
    type Response = File;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join(&format!("/files/{}", self.id)).unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ListFilesRequest;

impl ApiRequest for ListFilesRequest {
    type Response = Vec<File>;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join("/files/").unwrap())
    }
}

/// One file to upload. `content_type` falls back to octet-stream when
/// absent or invalid.
#[derive(Debug, Clone)]
pub struct UploadParams {
    pub name: String,
    pub content: Bytes,
    pub content_type: Option<String>,
    pub directory_id: Uuid,
    pub storage_classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: u16,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub cid: Option<String>,
    pub directory_id: Uuid,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug)]
struct UploadRequest {
    params: UploadParams,
}

impl ApiRequest for UploadRequest {
    type Response = UploadedFile;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        let UploadParams {
            name,
            content,
            content_type,
            directory_id,
            storage_classes,
        } = self.params;

        let mut part = Part::bytes(content.to_vec()).file_name(name.clone());
        if let Some(content_type) = &content_type {
            if let Ok(typed) = Part::bytes(content.to_vec())
                .file_name(name.clone())
                .mime_str(content_type)
            {
                part = typed;
            }
        }

        let mut form = Form::new()
            .text("name", name)
            .part("file", part)
            .text("directoryId", directory_id.to_string());
        if !storage_classes.is_empty() {
            form = form.text(
                "storageClasses",
                serde_json::to_string(&storage_classes).unwrap_or_default(),
            );
        }

        client.post(hosts.api.join("/files/upload").unwrap()).multipart(form)
    }
}

#[derive(Debug, Clone, Serialize)]
struct DeleteFileRequest {
    id: Uuid,
}

impl ApiRequest for DeleteFileRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.delete(hosts.api.join(&format!("/files/{}", self.id)).unwrap())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFileBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    add_storage_classes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remove_storage_classes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateFileRequest {
    id: Uuid,
    body: UpdateFileBody,
}

impl ApiRequest for UpdateFileRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .put(hosts.api.join(&format!("/files/{}", self.id)).unwrap())
            .json(&self.body)
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TotalSizeRequest;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalSizeResponse {
    pub total_size: u64,
}

impl ApiRequest for TotalSizeRequest {
    type Response = TotalSizeResponse;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join("/files/total-size").unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct IpfsMetadataRequest {
    cid: String,
}

impl ApiRequest for IpfsMetadataRequest {
    type Response = IpfsMetadata;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join(&format!("/files/metadata/{}", self.cid)).unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct SiaMetadataRequest {
    subject_id: String,
    cid: String,
}

impl ApiRequest for SiaMetadataRequest {
    type Response = SiaMetadata;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        let path = format!("/open/object/meta/{}/{}", self.subject_id, self.cid);
        client.get(hosts.sia.join(&path).unwrap())
    }
}
