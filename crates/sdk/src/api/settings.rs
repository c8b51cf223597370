use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::types::OpStatus;

/// User settings on the web-app host. Account-level reads and writes,
/// deliberately outside the capability scope: the requirement table has
/// no row for them.
#[derive(Debug, Clone)]
pub struct SettingsOps {
    client: ApiClient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub is_secure_mode: Option<bool>,
    #[serde(default)]
    pub encryption_key: Option<String>,
}

impl SettingsOps {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn read(&self) -> Result<Settings, ApiError> {
        self.client.call(ReadSettingsRequest).await
    }

    pub async fn update(
        &self,
        node: Option<String>,
        encryption_key: Option<String>,
        is_secure_mode: Option<bool>,
    ) -> Result<Settings, ApiError> {
        self.client
            .call(UpdateSettingsRequest {
                node,
                encryption_key,
                is_secure_mode,
            })
            .await
    }

    pub async fn read_encryption_key(&self) -> Result<EncryptionKey, ApiError> {
        self.client.call(ReadEncryptionKeyRequest).await
    }

    pub async fn verify_encryption_key(&self, encryption_key: String) -> Result<OpStatus, ApiError> {
        self.client
            .call(VerifyEncryptionKeyRequest { encryption_key })
            .await
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReadSettingsRequest;

impl ApiRequest for ReadSettingsRequest {
    type Response = Settings;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.web_app.join("/api/user/settings").unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encryption_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_secure_mode: Option<bool>,
}

impl ApiRequest for UpdateSettingsRequest {
    type Response = Settings;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .put(hosts.web_app.join("/api/user/settings").unwrap())
            .json(&self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKey {
    #[serde(default)]
    pub encryption_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ReadEncryptionKeyRequest;

impl ApiRequest for ReadEncryptionKeyRequest {
    type Response = EncryptionKey;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.web_app.join("/api/user/settings/encryption-key").unwrap())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyEncryptionKeyRequest {
    encryption_key: String,
}

impl ApiRequest for VerifyEncryptionKeyRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .post(hosts.web_app.join("/api/user/settings/encryption-key").unwrap())
            .json(&self)
    }
}
