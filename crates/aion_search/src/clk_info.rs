//! Clock-derivation context attached to every path identity.
//!
//! A [`ClkInfo`] records which clock edge launched a path, where the clock
//! entered the design, how its latency was derived and which analysis point
//! it belongs to. Millions of paths share a handful of these, so the hash is
//! computed once at construction and all time values take part in identity
//! at the quantized resolution of [`aion_common::hash`].

use crate::context::SearchContext;
use crate::ids::{ClockEdgeId, PathApIndex, PathRef, PinId, VertexId};
use crate::transition::{MinMax, RiseFall};
use aion_common::{quantize_time, QuantizedHasher};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Min/max clock uncertainty annotated on a clock, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockUncertainties {
    /// Uncertainty applied to min (hold) analysis.
    pub min: Option<f64>,
    /// Uncertainty applied to max (setup) analysis.
    pub max: Option<f64>,
}

impl ClockUncertainties {
    /// Creates an uncertainty pair.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Returns the uncertainty for one analysis mode, if annotated.
    pub fn value(&self, min_max: MinMax) -> Option<f64> {
        match min_max {
            MinMax::Min => self.min,
            MinMax::Max => self.max,
        }
    }

    fn ticks(&self) -> (Option<i64>, Option<i64>) {
        (self.min.map(quantize_time), self.max.map(quantize_time))
    }
}

/// Construction inputs for a [`ClkInfo`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ClkInfoParts {
    /// Launching clock edge; `None` for unclocked paths.
    pub clk_edge: Option<ClockEdgeId>,
    /// Pin where the clock is defined.
    pub clk_src: Option<PinId>,
    /// Whether the clock latency is propagated rather than ideal.
    pub is_propagated: bool,
    /// Source pin of the generated clock, if any.
    pub gen_clk_src: Option<PinId>,
    /// Whether this path is a generated clock's source path.
    pub is_gen_clk_src_path: bool,
    /// Active sense of a pulse clock; `None` for ordinary clocks.
    pub pulse_clk_sense: Option<RiseFall>,
    /// Clock insertion delay in seconds.
    pub insertion: f64,
    /// Clock latency in seconds.
    pub latency: f64,
    /// Annotated clock uncertainties.
    pub uncertainties: Option<ClockUncertainties>,
    /// Analysis point the path belongs to.
    pub path_ap_index: PathApIndex,
    /// Clock path used for pessimism removal. Kept only for propagated clocks.
    pub crpr_clk_path: Option<PathRef>,
}

/// Immutable clock-derivation context of a path.
#[derive(Clone, Debug)]
pub struct ClkInfo {
    clk_edge: Option<ClockEdgeId>,
    clk_src: Option<PinId>,
    gen_clk_src: Option<PinId>,
    crpr_clk_path: Option<PathRef>,
    uncertainties: Option<ClockUncertainties>,
    insertion: f64,
    latency: f64,
    is_propagated: bool,
    is_gen_clk_src_path: bool,
    is_pulse_clk: bool,
    pulse_clk_sense: u8,
    path_ap_index: PathApIndex,
    crpr_hashed: bool,
    hash: u64,
}

impl ClkInfo {
    /// Builds a context and computes its hash.
    ///
    /// The CRPR clock path is dropped for ideal clocks, and uncertainties are
    /// dropped when `ctx` reports them disabled. The CRPR setting of `ctx` is
    /// recorded; `equal` and `compare` must be called under the same setting.
    pub fn new(parts: ClkInfoParts, ctx: &impl SearchContext) -> Self {
        let mut info = Self {
            clk_edge: parts.clk_edge,
            clk_src: parts.clk_src,
            gen_clk_src: parts.gen_clk_src,
            crpr_clk_path: parts.crpr_clk_path.filter(|_| parts.is_propagated),
            uncertainties: parts
                .uncertainties
                .filter(|_| ctx.clock_uncertainty_enabled()),
            insertion: parts.insertion,
            latency: parts.latency,
            is_propagated: parts.is_propagated,
            is_gen_clk_src_path: parts.is_gen_clk_src_path,
            is_pulse_clk: parts.pulse_clk_sense.is_some(),
            pulse_clk_sense: parts.pulse_clk_sense.map_or(0, RiseFall::index),
            path_ap_index: parts.path_ap_index,
            crpr_hashed: ctx.crpr_active(),
            hash: 0,
        };
        info.hash = info.find_hash();
        info
    }

    // The CRPR vertex only contributes while CRPR is active, matching the
    // fields `equal` looks at.
    fn find_hash(&self) -> u64 {
        let mut hasher = QuantizedHasher::new();
        hasher
            .mix(&self.clk_edge)
            .mix(&self.clk_src)
            .mix(&self.gen_clk_src);
        if self.crpr_hashed {
            hasher.mix(&self.crpr_clk_vertex());
        }
        if let Some(uncertainties) = &self.uncertainties {
            hasher.mix(&uncertainties.min).mix(&uncertainties.max);
        }
        hasher
            .mix(&self.latency)
            .mix(&self.insertion)
            .mix(&self.is_propagated)
            .mix(&self.is_gen_clk_src_path)
            .mix(&self.is_pulse_clk)
            .mix(&self.pulse_clk_sense)
            .mix(&self.path_ap_index);
        hasher.finish()
    }

    /// The hash computed at construction.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Whether CRPR was active when the hash was computed.
    pub fn crpr_hashed(&self) -> bool {
        self.crpr_hashed
    }

    /// Launching clock edge.
    pub fn clk_edge(&self) -> Option<ClockEdgeId> {
        self.clk_edge
    }

    /// Pin where the clock is defined.
    pub fn clk_src(&self) -> Option<PinId> {
        self.clk_src
    }

    /// Generated clock source pin.
    pub fn gen_clk_src(&self) -> Option<PinId> {
        self.gen_clk_src
    }

    /// Whether the clock latency is propagated.
    pub fn is_propagated(&self) -> bool {
        self.is_propagated
    }

    /// Whether this is a generated clock's source path.
    pub fn is_gen_clk_src_path(&self) -> bool {
        self.is_gen_clk_src_path
    }

    /// Whether the clock is a pulse clock.
    pub fn is_pulse_clk(&self) -> bool {
        self.is_pulse_clk
    }

    /// Active sense of a pulse clock.
    pub fn pulse_clk_sense(&self) -> Option<RiseFall> {
        if self.is_pulse_clk {
            RiseFall::from_index(self.pulse_clk_sense)
        } else {
            None
        }
    }

    /// Raw pulse sense index; zero for ordinary clocks.
    pub fn pulse_clk_sense_index(&self) -> u8 {
        self.pulse_clk_sense
    }

    /// Clock insertion delay in seconds.
    pub fn insertion(&self) -> f64 {
        self.insertion
    }

    /// Clock latency in seconds.
    pub fn latency(&self) -> f64 {
        self.latency
    }

    /// Annotated clock uncertainties.
    pub fn uncertainties(&self) -> Option<&ClockUncertainties> {
        self.uncertainties.as_ref()
    }

    /// Analysis point index.
    pub fn path_ap_index(&self) -> PathApIndex {
        self.path_ap_index
    }

    /// Clock path used for pessimism removal.
    pub fn crpr_clk_path(&self) -> Option<PathRef> {
        self.crpr_clk_path
    }

    /// Vertex of the CRPR clock path.
    pub fn crpr_clk_vertex(&self) -> Option<VertexId> {
        self.crpr_clk_path.map(|path| path.vertex)
    }

    /// Returns `true` when the CRPR clock path's tag carries a filter exception.
    pub fn refs_filter(&self, ctx: &impl SearchContext) -> bool {
        self.crpr_clk_path
            .is_some_and(|path| ctx.path_is_filter(path))
    }

    /// Field-wise equality.
    ///
    /// The CRPR clock path only participates while `ctx` reports CRPR active.
    /// Time values compare at hash resolution, so `a.equal(b)` implies
    /// `a.hash() == b.hash()` as long as both were built under the CRPR
    /// setting `ctx` reports. Debug builds assert that.
    pub fn equal(&self, other: &ClkInfo, ctx: &impl SearchContext) -> bool {
        self.debug_check_crpr(other, ctx);
        self.clk_edge == other.clk_edge
            && self.path_ap_index == other.path_ap_index
            && self.clk_src == other.clk_src
            && self.gen_clk_src == other.gen_clk_src
            && (!ctx.crpr_active() || ctx.path_equal(self.crpr_clk_path, other.crpr_clk_path))
            && self.uncertainty_ticks() == other.uncertainty_ticks()
            && quantize_time(self.insertion) == quantize_time(other.insertion)
            && quantize_time(self.latency) == quantize_time(other.latency)
            && self.is_propagated == other.is_propagated
            && self.is_gen_clk_src_path == other.is_gen_clk_src_path
            && self.is_pulse_clk == other.is_pulse_clk
            && self.pulse_clk_sense == other.pulse_clk_sense
    }

    /// Total order over contexts.
    ///
    /// Keys in order: clock edge (unclocked first), analysis point, clock
    /// source pin, generated clock source pin, CRPR clock path (only while
    /// CRPR is active), uncertainties, insertion, latency, propagated,
    /// generated clock source path, pulse clock, pulse sense.
    pub fn compare(&self, other: &ClkInfo, ctx: &impl SearchContext) -> Ordering {
        self.debug_check_crpr(other, ctx);
        self.clk_edge
            .cmp(&other.clk_edge)
            .then(self.path_ap_index.cmp(&other.path_ap_index))
            .then(self.clk_src.cmp(&other.clk_src))
            .then(self.gen_clk_src.cmp(&other.gen_clk_src))
            .then_with(|| {
                if ctx.crpr_active() {
                    ctx.path_cmp(self.crpr_clk_path, other.crpr_clk_path)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| self.uncertainty_ticks().cmp(&other.uncertainty_ticks()))
            .then(quantize_time(self.insertion).cmp(&quantize_time(other.insertion)))
            .then(quantize_time(self.latency).cmp(&quantize_time(other.latency)))
            .then(self.is_propagated.cmp(&other.is_propagated))
            .then(self.is_gen_clk_src_path.cmp(&other.is_gen_clk_src_path))
            .then(self.is_pulse_clk.cmp(&other.is_pulse_clk))
            .then(self.pulse_clk_sense.cmp(&other.pulse_clk_sense))
    }

    fn debug_check_crpr(&self, other: &ClkInfo, ctx: &impl SearchContext) {
        debug_assert_eq!(
            self.crpr_hashed,
            ctx.crpr_active(),
            "ClkInfo hashed under a different CRPR setting than the comparison context"
        );
        debug_assert_eq!(
            other.crpr_hashed,
            ctx.crpr_active(),
            "ClkInfo hashed under a different CRPR setting than the comparison context"
        );
    }

    fn uncertainty_ticks(&self) -> Option<(Option<i64>, Option<i64>)> {
        self.uncertainties.as_ref().map(ClockUncertainties::ticks)
    }

    /// Human-readable summary for diagnostics, e.g.
    /// `max/0 clk^ clk_src top/clk crpr_pin u1/Z genclk`.
    pub fn describe(&self, ctx: &impl SearchContext) -> String {
        let mut result = format!(
            "{}/{}",
            ctx.path_ap_min_max(self.path_ap_index),
            self.path_ap_index.as_raw()
        );
        result.push(' ');
        match self.clk_edge {
            Some(edge) => result.push_str(ctx.clock_edge_name(edge)),
            None => result.push_str("unclocked"),
        }
        if let Some(pin) = self.clk_src {
            result.push_str(" clk_src ");
            result.push_str(ctx.pin_path_name(pin));
        }
        if let Some(path) = self.crpr_clk_path {
            result.push_str(" crpr_pin ");
            result.push_str(ctx.pin_path_name(ctx.path_pin(path)));
        }
        if self.is_gen_clk_src_path {
            result.push_str(" genclk");
        }
        result
    }
}
