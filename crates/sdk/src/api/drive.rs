use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::scope::Scope;
use crate::types::{Directory, DirectoryContents, OpStatus};

/// Drive operations. A drive is a top-level directory; the capability
/// requirements mirror the directory family.
#[derive(Debug, Clone)]
pub struct DriveOps {
    client: ApiClient,
    scope: Scope,
}

impl DriveOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    pub async fn list(&self) -> Result<Vec<Directory>, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "LIST_ALL_DRIVES is not allowed.")?;
        self.client.call(ListDrivesRequest).await
    }

    pub async fn contents(&self, id: Uuid) -> Result<DirectoryContents, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "VIEW_DRIVE_CONTENTS is not allowed.")?;
        self.client.call(DriveContentsRequest { id }).await
    }

    pub async fn create(&self, name: &str, storage_class: Option<String>) -> Result<Directory, ApiError> {
        self.scope
            .enforce(Scope::CREATE_DIRECTORY, "CREATE_DRIVE is not allowed.")?;
        self.client
            .call(CreateDriveRequest {
                name: name.to_string(),
                storage_class,
            })
            .await
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::CREATE_DIRECTORY | Scope::DELETE_DIRECTORY,
            "UPDATE_DRIVE is not allowed.",
        )?;
        self.client
            .call(UpdateDriveRequest {
                id,
                body: UpdateDriveBody {
                    name: Some(name.to_string()),
                    ..UpdateDriveBody::default()
                },
            })
            .await
    }

    /// Move directories and/or files into the drive.
    pub async fn move_to(
        &self,
        drive_id: Uuid,
        directory_ids: Vec<Uuid>,
        file_ids: Option<Vec<Uuid>>,
    ) -> Result<OpStatus, ApiError> {
        self.scope.enforce(
            Scope::CREATE_DIRECTORY | Scope::DELETE_DIRECTORY,
            "UPDATE_DRIVE is not allowed.",
        )?;
        self.client
            .call(UpdateDriveRequest {
                id: drive_id,
                body: UpdateDriveBody {
                    directory_ids_to_move: Some(directory_ids),
                    file_ids_to_move: file_ids,
                    ..UpdateDriveBody::default()
                },
            })
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::DELETE_DIRECTORY, "DELETE_DRIVE is not allowed.")?;
        self.client.call(DeleteDriveRequest { id }).await
    }

    pub async fn size(&self, id: Uuid) -> Result<u64, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DRIVE is not allowed.")?;
        let response: DriveSizeResponse = self.client.call(DriveSizeRequest { id }).await?;
        Ok(response.total_size)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ListDrivesRequest;

impl ApiRequest for ListDrivesRequest {
    type Response = Vec<Directory>;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join("/drives").unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct DriveContentsRequest {
    id: Uuid,
}

impl ApiRequest for DriveContentsRequest {
    type Response = DirectoryContents;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join(&format!("/drives/{}/contents", self.id)).unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDriveRequest {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
}

impl ApiRequest for CreateDriveRequest {
    type Response = Directory;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.post(hosts.api.join("/drives/create").unwrap()).json(&self)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDriveBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    directory_ids_to_move: Option<Vec<Uuid>>,
    #[serde(rename = "moveFiles", skip_serializing_if = "Option::is_none")]
    file_ids_to_move: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateDriveRequest {
    id: Uuid,
    body: UpdateDriveBody,
}

impl ApiRequest for UpdateDriveRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .put(hosts.api.join(&format!("/drives/{}", self.id)).unwrap())
            .json(&self.body)
    }
}

#[derive(Debug, Clone, Serialize)]
struct DeleteDriveRequest {
    id: Uuid,
}

impl ApiRequest for DeleteDriveRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.delete(hosts.api.join(&format!("/drives/{}", self.id)).unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
struct DriveSizeRequest {
    id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveSizeResponse {
    total_size: u64,
}

impl ApiRequest for DriveSizeRequest {
    type Response = DriveSizeResponse;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join(&format!("/drives/{}/size", self.id)).unwrap())
    }
}
