//! `NeoApp`: the interactive chart window.
//!
//! Methods are split across the sibling sub-modules:
//!
//! - `loading`: background fetch and next-approach polling
//! - `toolbar`: reload controls and status line
//! - `chart`: painter surface and click handling

pub mod chart;
pub mod loading;
pub mod toolbar;

use std::sync::{mpsc, Arc};

use neo_viz::net::api::ApproachSource;
use neo_viz::net::lookahead::NextApproachLoader;
use neo_viz::render::scene::Scene;
use neo_viz::render::tooltip::TooltipState;
use neo_viz::{PipelineResult, Result, VizConfig};

/// Primary load result plus the source the lookahead pool should reuse.
pub type LoadOutcome = Result<(PipelineResult, Arc<dyn ApproachSource>)>;

pub struct NeoApp {
    pub config: VizConfig,
    pub result: Option<PipelineResult>,
    pub scene: Option<Scene>,
    pub error: Option<String>,
    pub loading: bool,
    pub fetch_rx: Option<mpsc::Receiver<LoadOutcome>>,
    pub lookahead: Option<NextApproachLoader>,
    pub tooltips: TooltipState,
}

impl NeoApp {
    pub fn new(config: VizConfig) -> Self {
        Self {
            config,
            result: None,
            scene: None,
            error: None,
            loading: false,
            fetch_rx: None,
            lookahead: None,
            tooltips: TooltipState::new(),
        }
    }
}
