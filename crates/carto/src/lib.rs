pub mod options;
pub mod orchestrator;
pub mod panes;

pub use options::MapOptions;
pub use orchestrator::*;
pub use panes::PaneRegistry;
