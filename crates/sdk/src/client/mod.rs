#[allow(clippy::module_inception)]
mod client;

pub use client::ApiClient;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::Hosts;

/// One remote operation: a payload that knows how to shape its own
/// request against the configured hosts.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, hosts: &Hosts, client: &Client) -> RequestBuilder;
}
