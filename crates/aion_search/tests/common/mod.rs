//! Shared fixtures for the search integration tests.

#![allow(dead_code)]

use aion_search::{
    ClockEdgeId, ExceptionId, ExceptionKind, ExceptionStates, MatcherState, MinMax, PathApIndex,
    PathRef, PinId, SearchConfig, SearchContext,
};
use std::cmp::Ordering;
use std::sync::Once;

/// A tiny stand-in for the network and path layer.
pub struct TestNetwork {
    pub config: SearchConfig,
    edge_names: Vec<String>,
    pin_names: Vec<String>,
}

impl TestNetwork {
    pub fn new(config: SearchConfig) -> Self {
        let edge_names = ["clk^", "clkv", "gclk^", "gclkv"]
            .into_iter()
            .map(String::from)
            .collect();
        let pin_names = ["top/clk", "top/gclk", "div/Q", "u1/Z"]
            .into_iter()
            .map(String::from)
            .collect();
        Self {
            config,
            edge_names,
            pin_names,
        }
    }

    pub fn with_crpr(enabled: bool) -> Self {
        let mut config = SearchConfig::default();
        config.crpr.enabled = enabled;
        Self::new(config)
    }
}

impl SearchContext for TestNetwork {
    fn crpr_active(&self) -> bool {
        self.config.crpr_active()
    }

    fn clock_uncertainty_enabled(&self) -> bool {
        self.config.clock_uncertainty_enabled()
    }

    fn path_cmp(&self, a: Option<PathRef>, b: Option<PathRef>) -> Ordering {
        a.cmp(&b)
    }

    fn path_ap_min_max(&self, index: PathApIndex) -> MinMax {
        if index.as_raw() % 2 == 0 {
            MinMax::Min
        } else {
            MinMax::Max
        }
    }

    fn clock_edge_name(&self, edge: ClockEdgeId) -> &str {
        self.edge_names
            .get(edge.as_raw() as usize)
            .map_or("?", String::as_str)
    }

    fn pin_path_name(&self, pin: PinId) -> &str {
        self.pin_names
            .get(pin.as_raw() as usize)
            .map_or("?", String::as_str)
    }

    fn path_pin(&self, path: PathRef) -> PinId {
        PinId::from_raw(path.vertex.as_raw())
    }
}

pub fn state(id: u32, kind: ExceptionKind) -> MatcherState {
    MatcherState::new(ExceptionId::from_raw(id), kind, 0)
}

pub fn staged(states: &[MatcherState]) -> ExceptionStates<MatcherState> {
    let mut staging = ExceptionStates::new();
    for s in states {
        staging.insert(*s);
    }
    staging
}

static INIT_LOGGING: Once = Once::new();

/// Installs a test subscriber once; honors `RUST_LOG`.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
