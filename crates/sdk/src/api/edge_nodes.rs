use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::{ApiClient, ApiRequest};
use crate::config::Hosts;
use crate::error::ApiError;
use crate::types::OpStatus;

/// Per-user edge gateway management. Like settings, an account-level
/// surface with no capability requirement.
#[derive(Debug, Clone)]
pub struct EdgeNodeOps {
    client: ApiClient,
}

impl EdgeNodeOps {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The user's custom edge nodes merged with the configured defaults.
    pub async fn read(&self) -> Result<Vec<Url>, ApiError> {
        let response: CustomEdgeNodes = self.client.call(ReadEdgeNodesRequest).await?;
        let mut nodes: Vec<Url> = Vec::new();
        for node in response.custom_edge_nodes {
            match Url::parse(&node) {
                Ok(url) => nodes.push(url),
                Err(err) => tracing::warn!(%node, "skipping unparsable custom edge node: {err}"),
            }
        }
        nodes.extend(self.client.hosts().edge_gateways.iter().cloned());
        Ok(nodes)
    }

    pub async fn add(&self, edge_node: Url) -> Result<OpStatus, ApiError> {
        self.client
            .call(AddEdgeNodeRequest {
                edge_node: edge_node.to_string(),
            })
            .await
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReadEdgeNodesRequest;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomEdgeNodes {
    #[serde(default)]
    custom_edge_nodes: Vec<String>,
}

impl ApiRequest for ReadEdgeNodesRequest {
    type Response = CustomEdgeNodes;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client.get(
            hosts
                .web_app
                .join("/api/user/settings/custom-edge-nodes")
                .unwrap(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddEdgeNodeRequest {
    edge_node: String,
}

impl ApiRequest for AddEdgeNodeRequest {
    type Response = OpStatus;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder {
        client
            .post(
                hosts
                    .web_app
                    .join("/api/user/settings/custom-edge-nodes")
                    .unwrap(),
            )
            .json(&self)
    }
}
