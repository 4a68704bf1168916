pub mod directory;
pub mod memory;

pub use directory::{ArchiveConfig, DirectoryArchive};
pub use memory::InMemoryArchive;
