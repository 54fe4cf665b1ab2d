//! Services
//!
//! - [`file_store`] - upload storage behind the [`FileStore`] trait

pub mod file_store;

pub use file_store::{FileMetadata, FileStore, LocalFileStore, MAX_FILE_SIZE};
