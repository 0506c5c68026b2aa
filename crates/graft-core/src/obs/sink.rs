//! Metrics sink boundary.
//!
//! Core planning and execution logic MUST NOT depend on `obs::metrics`
//! directly. All instrumentation flows through [`MetricsEvent`] and
//! [`MetricsSink`]; this module is the only bridge to the global state.

use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    SynthFinish {
        fields: u64,
    },
    PlanOk {
        table: String,
        primary_key_target: bool,
    },
    PlanFailed {
        table: String,
    },
    RowInserted {
        table: String,
    },
    RowUpdated {
        table: String,
    },
    UniqueViolation {
        table: String,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.
///

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::SynthFinish { fields } => {
                m.ops.synth_runs = m.ops.synth_runs.saturating_add(1);
                m.ops.synth_fields = m.ops.synth_fields.saturating_add(fields);
            }
            MetricsEvent::PlanOk { table, .. } => {
                m.ops.plan_calls = m.ops.plan_calls.saturating_add(1);
                let entry = m.tables.entry(table).or_default();
                entry.plan_calls = entry.plan_calls.saturating_add(1);
            }
            MetricsEvent::PlanFailed { table } => {
                m.ops.plan_calls = m.ops.plan_calls.saturating_add(1);
                m.ops.plan_failures = m.ops.plan_failures.saturating_add(1);
                let entry = m.tables.entry(table).or_default();
                entry.plan_calls = entry.plan_calls.saturating_add(1);
            }
            MetricsEvent::RowInserted { table } => {
                m.ops.rows_inserted = m.ops.rows_inserted.saturating_add(1);
                let entry = m.tables.entry(table).or_default();
                entry.rows_inserted = entry.rows_inserted.saturating_add(1);
            }
            MetricsEvent::RowUpdated { table } => {
                m.ops.rows_updated = m.ops.rows_updated.saturating_add(1);
                let entry = m.tables.entry(table).or_default();
                entry.rows_updated = entry.rows_updated.saturating_add(1);
            }
            MetricsEvent::UniqueViolation { table } => {
                m.ops.unique_violations = m.ops.unique_violations.saturating_add(1);
                let entry = m.tables.entry(table).or_default();
                entry.unique_violations = entry.unique_violations.saturating_add(1);
            }
        });
    }
}

/// Record an event through the installed sink.
pub(crate) fn record(event: MetricsEvent) {
    // clone the handle out so a recording sink may itself record
    let scoped = SINK_OVERRIDE.with_borrow(Clone::clone);

    match scoped {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Install a scoped sink override for the duration of `f`.
///
/// The previous sink (if any) is restored on exit; overrides are
/// thread-local and intended for tests.
pub fn with_override<R>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> R) -> R {
    let previous = SINK_OVERRIDE.with_borrow_mut(|slot| slot.replace(sink));
    let result = f();
    SINK_OVERRIDE.with_borrow_mut(|slot| *slot = previous);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Capture(RefCell<Vec<MetricsEvent>>);

    impl MetricsSink for Capture {
        fn record(&self, event: MetricsEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    #[test]
    fn override_captures_and_global_state_is_untouched() {
        metrics::reset();
        let capture = Rc::new(Capture(RefCell::new(Vec::new())));

        with_override(capture.clone(), || {
            record(MetricsEvent::PlanOk {
                table: "bikes".to_string(),
                primary_key_target: true,
            });
        });

        assert_eq!(capture.0.borrow().len(), 1);
        assert_eq!(metrics::snapshot().ops.plan_calls, 0);
    }

    #[test]
    fn global_sink_accumulates_counters() {
        metrics::reset();

        record(MetricsEvent::RowInserted { table: "roles".to_string() });
        record(MetricsEvent::RowUpdated { table: "roles".to_string() });
        record(MetricsEvent::UniqueViolation { table: "roles".to_string() });

        let snap = metrics::snapshot();
        assert_eq!(snap.ops.rows_inserted, 1);
        assert_eq!(snap.ops.rows_updated, 1);
        assert_eq!(snap.ops.unique_violations, 1);
        assert_eq!(snap.tables["roles"].rows_inserted, 1);
        metrics::reset();
    }
}
