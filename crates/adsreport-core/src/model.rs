use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app_config::RunConfig;
use crate::dates::DateRange;

/// An advertiser account the weekly run reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub slug: String,
    pub account_id: String,
    pub active: bool,
}

/// Raw totals for one client over one 7-day period.
///
/// CTR and CPC are derived on demand and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub spend: Decimal,
    pub impressions: u64,
    pub clicks: u64,
}

impl PeriodMetrics {
    #[must_use]
    pub fn new(spend: Decimal, impressions: u64, clicks: u64) -> Self {
        Self {
            spend,
            impressions,
            clicks,
        }
    }

    #[must_use]
    pub fn spend_f64(&self) -> f64 {
        self.spend.to_f64().unwrap_or(0.0)
    }

    /// Click-through rate in percent; 0 when there were no impressions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ctr(&self) -> f64 {
        crate::metrics::rate(self.clicks as f64, self.impressions as f64)
    }

    /// Cost per click; 0 when there were no clicks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cpc(&self) -> f64 {
        crate::metrics::ratio(self.spend_f64(), self.clicks as f64)
    }
}

/// Per-period metrics keyed by client display name.
pub type WeekMetrics = HashMap<String, PeriodMetrics>;

/// Everything one weekly run needs, loaded from the spreadsheet or a snapshot file.
#[derive(Debug, Clone)]
pub struct RunInput {
    pub config: RunConfig,
    pub clients: Vec<Client>,
    pub dates: DateRange,
    pub this_week: WeekMetrics,
    pub previous_week: WeekMetrics,
}

impl RunInput {
    /// Active clients in list order.
    pub fn active_clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter().filter(|c| c.active)
    }

    /// Looks up both periods for `client`.
    ///
    /// Returns `None` when there is no current-period row; a missing
    /// previous-period row falls back to all zeros.
    #[must_use]
    pub fn metrics_for(&self, client: &Client) -> Option<(PeriodMetrics, PeriodMetrics)> {
        let current = self.this_week.get(&client.name)?;
        let previous = self
            .previous_week
            .get(&client.name)
            .copied()
            .unwrap_or_default();
        Some((*current, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_and_cpc_are_zero_without_denominators() {
        let m = PeriodMetrics::new(Decimal::new(12_50, 2), 0, 0);
        assert!(m.ctr().abs() < f64::EPSILON);
        assert!(m.cpc().abs() < f64::EPSILON);
    }

    #[test]
    fn ctr_is_percentage_and_cpc_is_plain_ratio() {
        let m = PeriodMetrics::new(Decimal::from(500), 10_000, 300);
        assert!((m.ctr() - 3.0).abs() < 1e-9);
        assert!((m.cpc() - 500.0 / 300.0).abs() < 1e-9);
    }

    #[test]
    fn ctr_without_impressions_is_zero_even_with_clicks() {
        let m = PeriodMetrics::new(Decimal::ZERO, 0, 10);
        assert!(m.ctr().abs() < f64::EPSILON);
    }
}
