//! Output location domain module

mod directory;
mod options;

pub use directory::Directory;
pub use options::RecordingOptions;
