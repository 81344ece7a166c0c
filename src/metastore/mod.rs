pub mod names;
pub use names::*;

pub mod schema;
pub use schema::*;

pub mod topic;
pub use topic::*;

pub mod serde_option;
pub use serde_option::*;

pub mod data_source;
pub use data_source::*;

pub mod memory_meta_store;
pub use memory_meta_store::*;

pub trait MetaStore {
    /// Resolve a source name (already normalised) to its catalog entry, if
    /// one is registered.
    fn data_source(&self, name: &SourceName) -> Option<DataSource>;
}
