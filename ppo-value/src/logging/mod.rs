use std::collections::BTreeMap;

/// One record of named scalar diagnostics.
pub type Metrics = BTreeMap<String, f64>;

/// Sink for training diagnostics. Writers never read records back.
pub trait MetricLogger {
    fn log(&mut self, metrics: &Metrics);
}

impl<L: MetricLogger + ?Sized> MetricLogger for &mut L {
    fn log(&mut self, metrics: &Metrics) {
        (**self).log(metrics)
    }
}

/// Keeps every record in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct MetricHistory {
    records: Vec<Metrics>,
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Metrics] {
        &self.records
    }

    pub fn last(&self) -> Option<&Metrics> {
        self.records.last()
    }

    /// Values of `key` across all records that contain it.
    pub fn series(&self, key: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| record.get(key).copied())
            .collect()
    }
}

impl MetricLogger for MetricHistory {
    fn log(&mut self, metrics: &Metrics) {
        self.records.push(metrics.clone());
    }
}

/// Forwards records to the `log` facade under the `metrics` target.
#[derive(Debug, Clone)]
pub struct LogMetricLogger {
    level: log::Level,
}

impl LogMetricLogger {
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LogMetricLogger {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl MetricLogger for LogMetricLogger {
    fn log(&mut self, metrics: &Metrics) {
        let line = metrics
            .iter()
            .map(|(key, value)| format!("{key}={value:.6}"))
            .collect::<Vec<_>>()
            .join(" ");
        log::log!(target: "metrics", self.level, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    fn record(pairs: &[(&str, f64)]) -> Metrics {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_metric_history() {
        let mut history = MetricHistory::new();
        assert!(history.last().is_none());

        history.log(&record(&[("ValFuncLoss", 0.5), ("ExplainedVarNew", 0.1)]));
        history.log(&record(&[("ValFuncLoss", 0.25)]));
        fn log_through<L: MetricLogger>(mut logger: L, metrics: &Metrics) {
            logger.log(metrics);
        }
        log_through(
            &mut history,
            &record(&[("ValFuncLoss", 0.125), ("ExplainedVarNew", 0.9)]),
        );

        assert_eq!(history.records().len(), 3);
        let expected = expect![[r#"
            [
                0.5,
                0.25,
                0.125,
            ]
        "#]];
        expected.assert_debug_eq(&history.series("ValFuncLoss"));
        assert_eq!(history.series("ExplainedVarNew"), vec![0.1, 0.9]);
        assert_eq!(history.last().unwrap()["ExplainedVarNew"], 0.9);
    }
}
