/**
 * Operation groups: one module per resource family
 *  (directories, drives, files, sharing, settings,
 *  retrieval requests, DSN replication, export),
 *  each guarded by the capability scope.
 */
pub mod api;
/**
 * Shared HTTP plumbing: the `ApiRequest` trait and the
 *  `ApiClient` that dispatches every remote call with
 *  bearer authentication and uniform error mapping.
 */
pub mod client;
/**
 * Host configuration injected into every operation group.
 */
pub mod config;
/**
 * API key decoding. A key is a dot-separated token carrying
 *  the application id, permission scope, subject id and secret.
 */
pub mod credential;
pub mod error;
/**
 * Realtime notification channel. A WebSocket connection that
 *  relays server-side change events back to the SDK so callers
 *  can re-fetch fresh state.
 */
pub mod realtime;
/**
 * Permission scope bitmask and the capability check that runs
 *  in front of every guarded operation.
 */
pub mod scope;
mod sdk;
pub mod types;

pub use sdk::{Stowage, StowageConfig};

pub mod prelude {
    pub use crate::client::{ApiClient, ApiRequest};
    pub use crate::config::Hosts;
    pub use crate::credential::{ApiKey, CredentialError};
    pub use crate::error::{ApiError, ErrorResponse};
    pub use crate::realtime::{Listener, RealtimeError};
    pub use crate::scope::Scope;
    pub use crate::sdk::{Stowage, StowageConfig};
    pub use crate::types::{Directory, DirectoryContents, File, OpStatus};
}
