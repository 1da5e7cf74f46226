//! Per-call metrics for [`Simulation::advance`](crate::Simulation::advance).

/// Work done and wall-clock time spent by one `advance` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceMetrics {
    /// Outer steps taken (recorded steps, or settle steps).
    pub steps: u64,
    /// Internal integration sub-steps taken in total.
    pub substeps: u64,
    /// Reaction updates performed.
    pub reactions_evaluated: u64,
    /// Equation evaluations performed.
    pub equations_evaluated: u64,
    /// History rows appended.
    pub rows_recorded: u64,
    /// Wall-clock time for the whole call, in microseconds.
    pub total_us: u64,
    /// Whether the call ran in settle mode.
    pub settle: bool,
}
