pub mod directory;
pub mod drive;
pub mod dsn;
pub mod edge_nodes;
pub mod export;
pub mod file;
pub mod file_access;
pub mod listeners;
pub mod retrieval_request;
pub mod settings;
pub mod storage;

pub use directory::DirectoryOps;
pub use drive::DriveOps;
pub use dsn::DsnOps;
pub use edge_nodes::EdgeNodeOps;
pub use export::ExportOps;
pub use file::FileOps;
pub use file_access::FileAccessOps;
pub use listeners::ListenerOps;
pub use retrieval_request::RetrievalRequestOps;
pub use settings::SettingsOps;
pub use storage::StorageOps;
