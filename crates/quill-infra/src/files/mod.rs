//! File store implementations.

mod local;

pub use local::LocalFileStore;
