pub mod constants;
pub mod filename;
pub mod progress;
pub mod workspace;

pub use constants::*;
pub use filename::{parse_fragment_filename, period_label};
pub use progress::ProgressReporter;
pub use workspace::DataDirs;
