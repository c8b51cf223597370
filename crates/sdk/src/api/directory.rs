use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::scope::Scope;
use crate::types::{Directory, DirectoryContents, OpStatus};

/// Directory operations against the REST surface.
#[derive(Debug, Clone)]
pub struct DirectoryOps {
    client: ApiClient,
    scope: Scope,
}

impl DirectoryOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    /// List a directory's immediate contents. `None` reads the root.
    pub async fn contents(&self, id: Option<Uuid>) -> Result<DirectoryContents, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DIRECTORY is not allowed.")?;
        self.client.call(ContentsRequest { id }).await
    }

    /// Path-based lookup: each `/`-separated segment of `path` becomes a
    /// repeated `segment[]` query parameter.
    pub async fn get_by_segment(&self, path: &str) -> Result<SegmentLookup, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DIRECTORY is not allowed.")?;
        self.client
            .call(SegmentRequest {
                path: path.to_string(),
            })
            .await
    }

    pub async fn create(&self, params: CreateDirectoryRequest) -> Result<Directory, ApiError> {
        self.scope
            .enforce(Scope::CREATE_DIRECTORY, "CREATE_DIRECTORY is not allowed.")?;
        self.client.call(params).await
    }

    /// Rename is modeled server-side as delete+recreate, so it demands
    /// both directory mutation bits.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::CREATE_DIRECTORY | Scope::DELETE_DIRECTORY,
            "UPDATE_DIRECTORY is not allowed.",
        )?;
        self.client
            .call(UpdateDirectoryRequest {
                id,
                body: UpdateDirectoryBody {
                    name: Some(name.to_string()),
                    ..UpdateDirectoryBody::default()
                },
            })
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        storage_class: Option<String>,
    ) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::CREATE_DIRECTORY | Scope::DELETE_DIRECTORY,
            "UPDATE_DIRECTORY is not allowed.",
        )?;
        self.client
            .call(UpdateDirectoryRequest {
                id,
                body: UpdateDirectoryBody {
                    name: Some(name.to_string()),
                    storage_class,
                    ..UpdateDirectoryBody::default()
                },
            })
            .await
    }

    /// Move directories and/or files under a new parent in one call.
    /// Both lists are independently omittable.
    pub async fn move_items(
        &self,
        id: Uuid,
        directory_ids: Vec<Uuid>,
        file_ids: Option<Vec<Uuid>>,
    ) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::CREATE_DIRECTORY | Scope::DELETE_DIRECTORY,
            "UPDATE_DIRECTORY is not allowed.",
        )?;
        self.client
            .call(UpdateDirectoryRequest {
                id,
                body: UpdateDirectoryBody {
                    directory_ids_to_move: Some(directory_ids),
                    file_ids_to_move: file_ids,
                    ..UpdateDirectoryBody::default()
                },
            })
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::DELETE_DIRECTORY, "DELETE_DIRECTORY is not allowed.")?;
        self.client.call(DeleteDirectoryRequest { id }).await
    }

    /// Aggregate size in bytes of everything under the directory.
    pub async fn total_size(&self, id: Uuid) -> Result<u64, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DIRECTORY is not allowed.")?;
        let response: SizeResponse = self.client.call(SizeRequest { id }).await?;
        Ok(response.total_size)
    }

    /// Fetch the directory as a zip archive.
    pub async fn get_zip(&self, id: Uuid) -> Result<Bytes, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DIRECTORY is not allowed.")?;
        let url = self.client.hosts().api.join(&format!("/directory/{id}/zip"))?;
        let response = self.client.http_client().get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiClient::remote_error(response).await);
        }
        Ok(response.bytes().await?)
    }

    /// Stream the directory's zip archive to `dest_dir` under a
    /// timestamped file name, returning the written path.
    pub async fn download(&self, id: Uuid, name: &str, dest_dir: &Path) -> Result<PathBuf, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DIRECTORY is not allowed.")?;
        let url = self.client.hosts().api.join(&format!("/directory/{id}/zip"))?;
        let response = self.client.http_client().get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiClient::remote_error(response).await);
        }

        let path = dest_dir.join(format!("{name}-{}.zip", Utc::now().timestamp_millis()));
        let mut out = tokio::fs::File::create(&path).await?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            out.write_all(&chunk?).await?;
        }
        out.flush().await?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ContentsRequest {
    id: Option<Uuid>,
}

impl ApiRequest for ContentsRequest {
    type Response = DirectoryContents;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        let path = match self.id {
            Some(id) => format!("/directory/{id}"),
            None => "/directory/".to_string(),
        };
        client.get(hosts.api.join(&path).unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct SegmentRequest {
    path: String,
}

impl ApiRequest for SegmentRequest {
    type Response = SegmentLookup;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        let mut url = hosts.api.join("/directory").unwrap();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("segment[]", segment);
        }
        client.get(url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentLookup {
    pub directories: DirectoryRef,
    #[serde(default)]
    pub directory_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_directory_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl ApiRequest for CreateDirectoryRequest {
    type Response = Directory;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.post(hosts.api.join("/directory/create").unwrap()).json(&self)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDirectoryBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    directory_ids_to_move: Option<Vec<Uuid>>,
    #[serde(rename = "moveFiles", skip_serializing_if = "Option::is_none")]
    file_ids_to_move: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateDirectoryRequest {
    id: Uuid,
    body: UpdateDirectoryBody,
}

impl ApiRequest for UpdateDirectoryRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .put(hosts.api.join(&format!("/directory/{}", self.id)).unwrap())
            .json(&self.body)
    }
}

#[derive(Debug, Clone, Serialize)]
struct DeleteDirectoryRequest {
    id: Uuid,
}

impl ApiRequest for DeleteDirectoryRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.delete(hosts.api.join(&format!("/directory/{}", self.id)).unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct SizeRequest {
    id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizeResponse {
    total_size: u64,
}

impl ApiRequest for SizeRequest {
    type Response = SizeResponse;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join(&format!("/directory/{}/size", self.id)).unwrap())
    }
}
