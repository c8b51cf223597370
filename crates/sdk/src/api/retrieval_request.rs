use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::scope::Scope;

/// Requests to pull a file back out of a decentralized storage network.
#[derive(Debug, Clone)]
pub struct RetrievalRequestOps {
    client: ApiClient,
    scope: Scope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub dsn: String,
    pub file_id: Uuid,
    #[serde(default)]
    pub status: Option<String>,
}

impl RetrievalRequestOps {
    pub(crate) fn new(client: ApiClient, scope: Scope) -> Self {
        Self { client, scope }
    }

    pub async fn create(&self, dsn: &str, file_id: Uuid) -> Result<RetrievalRequest, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "RETRIEVAL_REQUESTS is not allowed.")?;
        self.client
            .call(CreateRetrievalRequest {
                dsn: dsn.to_string(),
                file_id,
            })
            .await
    }

    pub async fn list(&self) -> Result<Vec<RetrievalRequest>, ApiError> {
        self.scope
            .enforce(Scope::READ_DIRECTORY, "RETRIEVAL_REQUESTS is not allowed.")?;
        self.client.call(ListRetrievalRequests).await
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRetrievalRequest {
    dsn: String,
    file_id: Uuid,
}

impl ApiRequest for CreateRetrievalRequest {
    type Response = RetrievalRequest;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .post(hosts.api.join("/retrieval-requests/create").unwrap())
            .json(&self)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ListRetrievalRequests;

impl ApiRequest for ListRetrievalRequests {
    type Response = Vec<RetrievalRequest>;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(hosts.api.join("/retrieval-requests").unwrap())
    }
}
