//! The metric source port and an in-memory implementation.
//!
//! Metrics are produced outside the control loop and are append-only. The
//! loop only ever asks for per-name averages over a trailing window ending
//! now.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use plasticity_types::{AgentId, Metric, MetricAverage};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::MetricError;

/// Read-only access to time-windowed business metrics.
pub trait MetricSource: Send + Sync {
    /// Average value per metric name for rows of `agent_id` whose window
    /// ends within the trailing `window`. Names with no rows are absent.
    fn query(
        &self,
        agent_id: AgentId,
        window: TimeDelta,
    ) -> impl Future<Output = Result<Vec<MetricAverage>, MetricError>> + Send;
}

/// A metric source backed by an in-process list of rows.
#[derive(Debug, Default)]
pub struct InMemoryMetricSource {
    rows: RwLock<Vec<Metric>>,
}

impl InMemoryMetricSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a metric row.
    pub async fn record(&self, metric: Metric) {
        self.rows.write().await.push(metric);
    }

    /// Averages for rows of `agent_id` with `period_end` in
    /// `(now - window, now]`, sorted by metric name.
    pub async fn averages_at(
        &self,
        agent_id: AgentId,
        window: TimeDelta,
        now: DateTime<Utc>,
    ) -> Vec<MetricAverage> {
        let since = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let rows = self.rows.read().await;

        let mut totals: BTreeMap<&str, (Decimal, u32)> = BTreeMap::new();
        for row in rows
            .iter()
            .filter(|r| r.agent_id == agent_id && r.period_end > since && r.period_end <= now)
        {
            let entry = totals.entry(row.metric_name.as_str()).or_insert((Decimal::ZERO, 0));
            entry.0 = entry.0.saturating_add(row.value);
            entry.1 = entry.1.saturating_add(1);
        }

        totals
            .into_iter()
            .map(|(name, (sum, count))| {
                let avg = sum.checked_div(Decimal::from(count)).unwrap_or(Decimal::ZERO);
                MetricAverage::new(name, avg)
            })
            .collect()
    }
}

impl MetricSource for InMemoryMetricSource {
    async fn query(
        &self,
        agent_id: AgentId,
        window: TimeDelta,
    ) -> Result<Vec<MetricAverage>, MetricError> {
        Ok(self.averages_at(agent_id, window, Utc::now()).await)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn row(agent_id: AgentId, name: &str, value: Decimal, end: DateTime<Utc>) -> Metric {
        Metric {
            agent_id,
            metric_name: name.to_owned(),
            value,
            period_start: end - TimeDelta::hours(1),
            period_end: end,
        }
    }

    #[tokio::test]
    async fn averages_rows_inside_window() {
        let source = InMemoryMetricSource::new();
        let agent = AgentId::new();
        let now = Utc::now();
        source.record(row(agent, "revenue_growth", dec!(10), now - TimeDelta::hours(2))).await;
        source.record(row(agent, "revenue_growth", dec!(20), now - TimeDelta::hours(5))).await;
        source.record(row(agent, "market_share", dec!(4), now)).await;

        let averages = source.averages_at(agent, TimeDelta::hours(24), now).await;
        assert_eq!(
            averages,
            vec![
                MetricAverage::new("market_share", dec!(4)),
                MetricAverage::new("revenue_growth", dec!(15)),
            ]
        );
    }

    #[tokio::test]
    async fn excludes_old_rows_and_other_agents() {
        let source = InMemoryMetricSource::new();
        let agent = AgentId::new();
        let other = AgentId::new();
        let now = Utc::now();
        source.record(row(agent, "cost_efficiency", dec!(99), now - TimeDelta::hours(30))).await;
        source.record(row(other, "cost_efficiency", dec!(5), now)).await;

        let averages = source.averages_at(agent, TimeDelta::hours(24), now).await;
        assert!(averages.is_empty());
    }

    #[tokio::test]
    async fn window_boundary_is_exclusive_at_start() {
        let source = InMemoryMetricSource::new();
        let agent = AgentId::new();
        let now = Utc::now();
        source.record(row(agent, "innovation_index", dec!(7), now - TimeDelta::hours(24))).await;
        source.record(row(agent, "innovation_index", dec!(3), now - TimeDelta::hours(23))).await;

        let averages = source.averages_at(agent, TimeDelta::hours(24), now).await;
        assert_eq!(averages[0].value, dec!(3));
    }
}
