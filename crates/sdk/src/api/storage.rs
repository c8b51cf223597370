use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::scope::Scope;

/// Storage quota snapshot from the web-app host.
#[derive(Debug, Clone)]
pub struct StorageOps {
    client: ApiClient,
    scope: Scope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    #[serde(default)]
    pub capacity: Option<u64>,
    #[serde(default)]
    pub used: Option<u64>,
}

impl StorageOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    pub async fn read(&self) -> Result<StorageUsage, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "READ_DIRECTORY is not allowed.")?;
        self.client.call(ReadStorageRequest).await
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReadStorageRequest;

impl ApiRequest for ReadStorageRequest {
    type Response = StorageUsage;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.web_app.join("/api/storage").unwrap())
    }
}
