use std::sync::Arc;

use crate::api::{
    DirectoryOps, DriveOps, DsnOps, EdgeNodeOps, ExportOps, FileAccessOps, FileOps, ListenerOps,
    RetrievalRequestOps, SettingsOps, StorageOps,
};
use crate::client::ApiClient;
use crate::config::Hosts;
use crate::credential::ApiKey;
use crate::error::ApiError;
use crate::realtime::Listener;
use crate::scope::Scope;

/// Construction parameters for [`Stowage`].
#[derive(Debug, Clone)]
pub struct StowageConfig {
    pub api_key: String,
    pub hosts: Hosts,
}

impl StowageConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            hosts: Hosts::default(),
        }
    }

    pub fn with_hosts(mut self, hosts: Hosts) -> Self {
        self.hosts = hosts;
        self
    }
}

/// Client session: the parsed credential plus one instance of every
/// operation group, all sharing a single HTTP client and realtime
/// channel handle. Lives for the application lifetime; the realtime
/// channel is torn down explicitly via `listeners.disconnect()`.
#[derive(Debug)]
pub struct Stowage {
    api_key: ApiKey,
    pub directory: DirectoryOps,
    pub drive: DriveOps,
    pub file: FileOps,
    pub file_access: FileAccessOps,
    pub settings: SettingsOps,
    pub edge_nodes: EdgeNodeOps,
    pub storage: StorageOps,
    pub retrieval_request: RetrievalRequestOps,
    pub dsn: DsnOps,
    pub export: ExportOps,
    pub listeners: ListenerOps,
}

impl Stowage {
    /// Parse the credential and assemble the session.
    ///
    /// A key that does not decompose into its expected fields, or whose
    /// scope segment is not a base-10 integer, is rejected here; no
    /// operation ever sees a half-parsed credential.
    pub fn init(config: StowageConfig) -> Result<Self, ApiError> {
        let api_key: ApiKey = config.api_key.parse()?;
        let scope = api_key.scope();

        let client = ApiClient::new(config.hosts, api_key.token())?;
        let listener = Arc::new(Listener::new(
            &client.hosts().api,
            api_key.token().to_string(),
        )?);

        let directory = DirectoryOps::new(client.clone(), scope);
        let file = FileOps::new(client.clone(), scope, api_key.subject_id().to_string());
        let listeners = ListenerOps::new(listener, directory.clone(), file.clone());

        Ok(Self {
            directory,
            drive: DriveOps::new(client.clone(), scope),
            file,
            file_access: FileAccessOps::new(client.clone(), scope),
            settings: SettingsOps::new(client.clone()),
            edge_nodes: EdgeNodeOps::new(client.clone()),
            storage: StorageOps::new(client.clone(), scope),
            retrieval_request: RetrievalRequestOps::new(client.clone(), scope),
            dsn: DsnOps::new(client.clone(), scope),
            export: ExportOps::new(client, scope),
            listeners,
            api_key,
        })
    }

    pub fn scope(&self) -> Scope {
        self.api_key.scope()
    }

    pub fn subject_id(&self) -> &str {
        self.api_key.subject_id()
    }
}
