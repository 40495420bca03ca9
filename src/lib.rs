pub mod config;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod process;

pub use config::{Config, NodeSelection, Theme};
pub use error::{PcmError, Result};
