use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::scope::Scope;
use crate::types::OpStatus;

/// Sharing controls for a single file, served by the web-app host.
#[derive(Debug, Clone)]
pub struct FileAccessOps {
    client: ApiClient,
    scope: Scope,
}

/// Visibility of a shared file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecureSharing {
    Public,
    Password,
    Restricted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAccessInfo {
    #[serde(default)]
    pub secure_sharing: Option<SecureSharing>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub password_set: bool,
}

impl FileAccessOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    pub async fn read(&self, file_id: Uuid, cid: &str) -> Result<FileAccessInfo, ApiError> {
        self.scope
            .enforce(Scope::READ_FILE, "READ_FILE is not allowed.")?;
        self.client
            .call(ReadAccessRequest {
                file_id,
                cid: cid.to_string(),
            })
            .await
    }

    /// Grant access to an email and/or set a sharing password.
    pub async fn add(
        &self,
        file_id: Uuid,
        cid: &str,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "ADD_FILE_ACCESS is not allowed.")?;
        self.client
            .call(AddAccessRequest {
                file_id,
                cid: cid.to_string(),
                body: AddAccessBody { email, password },
            })
            .await
    }

    /// Revoke one grantee, or every grantee when `delete_all` is set.
    pub async fn delete(
        &self,
        file_id: Uuid,
        cid: &str,
        email: String,
        delete_all: Option<bool>,
    ) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "DELETE_FILE_ACCESS is not allowed.")?;
        self.client
            .call(DeleteAccessRequest {
                file_id,
                cid: cid.to_string(),
                body: DeleteAccessBody { email, delete_all },
            })
            .await
    }

    pub async fn update(
        &self,
        file_id: Uuid,
        cid: &str,
        secure_sharing: SecureSharing,
    ) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "UPDATE_FILE_ACCESS is not allowed.")?;
        self.client
            .call(UpdateAccessRequest {
                file_id,
                cid: cid.to_string(),
                body: UpdateAccessBody { secure_sharing },
            })
            .await
    }

    pub async fn verify_password(
        &self,
        file_id: Uuid,
        cid: &str,
        password: String,
    ) -> Result<OpStatus, ApiError> {
        self.scope
            .enforce(Scope::UPLOAD_FILE, "UPDATE_FILE_ACCESS is not allowed.")?;
        self.client
            .call(VerifyPasswordRequest {
                file_id,
                cid: cid.to_string(),
                body: VerifyPasswordBody { password },
            })
            .await
    }
}

fn access_url(hosts: &Hosts, file_id: Uuid, cid: &str) -> url::Url {
    hosts
        .web_app
        .join(&format!("/api/file-access/{file_id}/{cid}"))
        .unwrap()
}

#[derive(Debug, Clone, Serialize)]
struct ReadAccessRequest {
    file_id: Uuid,
    cid: String,
}

impl ApiRequest for ReadAccessRequest {
    type Response = FileAccessInfo;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(access_url(hosts, self.file_id, &self.cid))
    }
}

#[derive(Debug, Clone, Serialize)]
struct AddAccessBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct AddAccessRequest {
    file_id: Uuid,
    cid: String,
    body: AddAccessBody,
}

impl ApiRequest for AddAccessRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .post(access_url(hosts, self.file_id, &self.cid))
            .json(&self.body)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccessBody {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete_all: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct DeleteAccessRequest {
    file_id: Uuid,
    cid: String,
    body: DeleteAccessBody,
}

impl ApiRequest for DeleteAccessRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .delete(access_url(hosts, self.file_id, &self.cid))
            .json(&self.body)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccessBody {
    secure_sharing: SecureSharing,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateAccessRequest {
    file_id: Uuid,
    cid: String,
    body: UpdateAccessBody,
}

impl ApiRequest for UpdateAccessRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .put(access_url(hosts, self.file_id, &self.cid))
            .json(&self.body)
    }
}

#[derive(Debug, Clone, Serialize)]
struct VerifyPasswordBody {
    password: String,
}

#[derive(Debug, Clone, Serialize)]
struct VerifyPasswordRequest {
    file_id: Uuid,
    cid: String,
    body: VerifyPasswordBody,
}

impl ApiRequest for VerifyPasswordRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        let url = hosts
            .web_app
            .join(&format!("/api/file-access/password/{}/{}", self.file_id, self.cid))
            .unwrap();
        client.post(url).json(&self.body)
    }
}
