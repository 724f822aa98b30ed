//! Storage and configuration backends for the Purposely engine.

pub mod config_service;
pub mod json_file_store;
pub mod memory_store;
pub mod paths;

pub use config_service::ConfigService;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
