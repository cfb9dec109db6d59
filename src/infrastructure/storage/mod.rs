//! Recording storage adapters

mod fs_store;

pub use fs_store::FsRecordingStore;
