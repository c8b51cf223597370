mod listener;

pub use listener::{EventHandler, Listener, RealtimeError};

/// Event names exchanged on the realtime channel.
pub mod events {
    /// Client announces interest in directory mutations.
    pub const DIRECTORY_INITIALIZE: &str = "directory:initialize";
    /// Server signals a directory-tree mutation.
    pub const DIRECTORY_CHANGE: &str = "directory:change";
    /// Client announces interest in total-size updates.
    pub const TOTAL_SIZE_INITIALIZE: &str = "total-size:initialize";
    /// Server signals an aggregate-size change.
    pub const TOTAL_SIZE_CHANGE: &str = "total-size:change";
}
