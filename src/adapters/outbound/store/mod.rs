/// Metadata store adapters backing the `MetadataStore` port
mod in_memory_store;
mod json_file_store;

pub use in_memory_store::InMemoryMetadataStore;
pub use json_file_store::JsonFileMetadataStore;
