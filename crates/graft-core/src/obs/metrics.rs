//! Process-local metrics state.
//!
//! Nothing outside `obs` writes here directly; all instrumentation goes
//! through the sink boundary.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static STATE: RefCell<MetricsState> = RefCell::new(MetricsState::default());
}

///
/// MetricsState
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsState {
    pub ops: OpMetrics,
    pub tables: BTreeMap<String, TableMetrics>,
}

///
/// OpMetrics
///

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct OpMetrics {
    pub synth_runs: u64,
    pub synth_fields: u64,
    pub plan_calls: u64,
    pub plan_failures: u64,
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub unique_violations: u64,
}

///
/// TableMetrics
///

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TableMetrics {
    pub plan_calls: u64,
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub unique_violations: u64,
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsState) -> R) -> R {
    STATE.with_borrow_mut(f)
}

/// Copy of the current metrics state.
#[must_use]
pub fn snapshot() -> MetricsState {
    STATE.with_borrow(Clone::clone)
}

/// Reset all counters; test isolation only.
pub fn reset() {
    STATE.with_borrow_mut(|m| *m = MetricsState::default());
}
