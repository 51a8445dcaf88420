pub mod config;
pub mod engine;
pub mod error;
pub mod net;
pub mod render;
pub mod transform;

pub use config::VizConfig;
pub use engine::pipeline::{NeoEngine, PipelineResult};
pub use error::{NeoError, Result};
