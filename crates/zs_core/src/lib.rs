pub mod archive;
pub mod error;
pub mod models;
pub mod types;

pub use archive::ArchiveGateway;
pub use error::{Error, Result};
pub use models::CompletionModel;
pub use types::{Article, SearchHit, SearchMode, SearchResults};
