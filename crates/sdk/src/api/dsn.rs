use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::scope::Scope;
use crate::types::{OpStatus, SiaMetadata};

/// Direct operations against the decentralized storage networks.
#[derive(Debug, Clone)]
pub struct DsnOps {
    client: ApiClient,
    scope: Scope,
}

/// Which networks an upload should replicate to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReplicateTo {
    #[serde(rename = "SIA")]
    pub sia: bool,
}

impl DsnOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    /// Kick off a sync of existing content into the selected networks.
    pub async fn sync(&self, replicate_to: ReplicateTo) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "UPLOAD_FILE is not allowed.")?;
        self.client.call(SyncRequest { replicate_to }).await
    }

    /// Upload a file straight to the networks, bypassing the directory tree.
    pub async fn upload(
        &self,
        file_name: &str,
        content: Bytes,
        file_path: Option<String>,
        replicate_to: Option<ReplicateTo>,
    ) -> Result<DsnUpload, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "UPLOAD_FILE is not allowed.")?;
        self.client
            .call(DsnUploadRequest {
                file_name: file_name.to_string(),
                content,
                file_path,
                replicate_to,
            })
            .await
    }

    pub async fn metadata(&self, cid: &str, replicate_to: ReplicateTo) -> Result<DsnMetadata, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        self.client
            .call(DsnMetadataRequest {
                cid: cid.to_string(),
                replicate_to,
            })
            .await
    }
}

#[derive(Debug, Clone, Serialize)]
struct SyncRequest {
    #[serde(flatten)]
    replicate_to: ReplicateTo,
}

impl ApiRequest for SyncRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.post(hosts.api.join("/dsns/sync").unwrap()).json(&self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsnUpload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub cid: Option<String>,
}

#[derive(Debug)]
struct DsnUploadRequest {
    file_name: String,
    content: Bytes,
    file_path: Option<String>,
    replicate_to: Option<ReplicateTo>,
}

impl ApiRequest for DsnUploadRequest {
    type Response = DsnUpload;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        let part = Part::bytes(self.content.to_vec()).file_name(self.file_name);
        let mut form = Form::new().part("file", part);
        if let Some(file_path) = self.file_path {
            form = form.text("filePath", file_path);
        }
        if let Some(replicate_to) = self.replicate_to {
            form = form.text(
                "replicateTo",
                serde_json::to_string(&replicate_to).unwrap_or_default(),
            );
        }
        client.post(hosts.api.join("/dsns/upload").unwrap()).multipart(form)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsnMetadata {
    #[serde(rename = "SIA", default)]
    pub sia: Option<SiaMetadata>,
}

#[derive(Debug, Clone, Serialize)]
struct DsnMetadataRequest {
    cid: String,
    replicate_to: ReplicateTo,
}

impl ApiRequest for DsnMetadataRequest {
    type Response = DsnMetadata;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .post(hosts.api.join(&format!("/dsns/metadata/{}", self.cid)).unwrap())
            .json(&self.replicate_to)
    }
}
