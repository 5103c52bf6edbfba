//! Week-over-week metric math.
//!
//! Everything here is a pure function of its inputs and total over finite
//! values: zero denominators produce 0 (or 100 for a change from nothing),
//! never NaN or infinity.

use serde::Serialize;

use crate::model::PeriodMetrics;

/// `num / den * 100`, or 0 when `den` is not positive.
#[must_use]
pub fn rate(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den * 100.0
    } else {
        0.0
    }
}

/// `num / den`, or 0 when `den` is not positive.
#[must_use]
pub fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Percentage change from `prev` to `curr`.
///
/// A change from 0 is clamped: 0 when `curr` is also 0, otherwise exactly 100.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn pct_change(curr: f64, prev: f64) -> f64 {
    if prev == 0.0 {
        if curr == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (curr - prev) / prev * 100.0
    }
}

/// Percentage change of every tracked field between two periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    pub spend_pct: f64,
    pub impressions_pct: f64,
    pub clicks_pct: f64,
    pub ctr_pct: f64,
    pub cpc_pct: f64,
}

impl ChangeSet {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn between(current: &PeriodMetrics, previous: &PeriodMetrics) -> Self {
        Self {
            spend_pct: pct_change(current.spend_f64(), previous.spend_f64()),
            impressions_pct: pct_change(current.impressions as f64, previous.impressions as f64),
            clicks_pct: pct_change(current.clicks as f64, previous.clicks as f64),
            ctr_pct: pct_change(current.ctr(), previous.ctr()),
            cpc_pct: pct_change(current.cpc(), previous.cpc()),
        }
    }
}

/// Current and previous period side by side with their derived changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsComparison {
    pub current: PeriodMetrics,
    pub previous: PeriodMetrics,
    pub changes: ChangeSet,
}

impl MetricsComparison {
    #[must_use]
    pub fn new(current: PeriodMetrics, previous: PeriodMetrics) -> Self {
        Self {
            changes: ChangeSet::between(&current, &previous),
            current,
            previous,
        }
    }
}
