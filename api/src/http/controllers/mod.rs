pub mod archive;

pub use archive as ArchiveController;
