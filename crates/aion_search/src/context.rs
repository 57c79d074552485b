//! The seam between path identities and the rest of the timing engine.
//!
//! Clock-derivation contexts need a handful of answers they cannot compute
//! themselves: whether CRPR is active, how two CRPR clock paths order, and
//! names for diagnostics. The path/tag layer supplies them through
//! [`SearchContext`], passed explicitly to every operation that needs it.

use crate::ids::{ClockEdgeId, PathApIndex, PathRef, PinId};
use crate::transition::MinMax;
use std::cmp::Ordering;

/// Engine state consulted when building, comparing and describing
/// clock-derivation contexts.
pub trait SearchContext {
    /// Returns `true` when clock reconvergence pessimism removal is active.
    ///
    /// CRPR clock paths only take part in identity while this holds.
    fn crpr_active(&self) -> bool;

    /// Returns `true` when clock uncertainties are annotated on paths.
    ///
    /// When disabled, contexts are built without uncertainties.
    fn clock_uncertainty_enabled(&self) -> bool {
        true
    }

    /// Total order over (possibly absent) paths. Absent sorts first.
    fn path_cmp(&self, a: Option<PathRef>, b: Option<PathRef>) -> Ordering;

    /// Path equality, consistent with [`path_cmp`](Self::path_cmp).
    fn path_equal(&self, a: Option<PathRef>, b: Option<PathRef>) -> bool {
        self.path_cmp(a, b) == Ordering::Equal
    }

    /// Returns `true` when the path's tag carries a filter exception.
    fn path_is_filter(&self, _path: PathRef) -> bool {
        false
    }

    /// The min/max mode of an analysis point.
    fn path_ap_min_max(&self, index: PathApIndex) -> MinMax;

    /// Name of a clock edge, e.g. `clk^`.
    fn clock_edge_name(&self, edge: ClockEdgeId) -> &str;

    /// Hierarchical path name of a pin.
    fn pin_path_name(&self, pin: PinId) -> &str;

    /// The pin of the vertex a path is stored on.
    fn path_pin(&self, path: PathRef) -> PinId;
}
