//! Runtime column with median imputation.

use crate::traits::FeatureEncoder;
use data_loader::CatalogRecord;
use tracing::debug;

/// Emits the runtime as-is (scaling happens later), filling gaps with the
/// corpus median of known runtimes, or 0 when no runtime is known at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeEncoder {
    fill_value: f64,
}

impl RuntimeEncoder {
    pub fn fit(records: &[CatalogRecord]) -> Self {
        let known: Vec<f64> = records.iter().filter_map(|r| r.runtime).collect();
        let fill_value = median(known).unwrap_or(0.0);
        debug!("Runtime imputation value: {}", fill_value);
        Self { fill_value }
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }
}

/// Median; the mean of the two middle values for an even count
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(values[mid - 1] / 2.0 + values[mid] / 2.0)
    } else {
        Some(values[mid])
    }
}

impl FeatureEncoder for RuntimeEncoder {
    fn name(&self) -> &str {
        "RuntimeEncoder"
    }

    fn column_names(&self) -> Vec<String> {
        vec!["runtime".to_string()]
    }

    fn width(&self) -> usize {
        1
    }

    fn encode_into(&self, record: &CatalogRecord, out: &mut [f64]) {
        out[0] = record.runtime.unwrap_or(self.fill_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::record;

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![100.0, 90.0, 80.0, 120.0]), Some(95.0));
        assert_eq!(median(vec![1e308, 1e308]), Some(1e308));
    }

    #[test]
    fn test_missing_runtime_gets_median() {
        let records = vec![
            record(1, &[], Some(90.0), "en"),
            record(2, &[], None, "en"),
            record(3, &[], Some(120.0), "en"),
            record(4, &[], Some(100.0), "en"),
        ];
        let encoder = RuntimeEncoder::fit(&records);
        assert_eq!(encoder.fill_value(), 100.0);

        let mut out = [0.0];
        encoder.encode_into(&records[1], &mut out);
        assert_eq!(out, [100.0]);
        encoder.encode_into(&records[0], &mut out);
        assert_eq!(out, [90.0]);
    }

    #[test]
    fn test_no_known_runtime_imputes_zero() {
        let records = vec![record(1, &[], None, "en"), record(2, &[], None, "en")];
        let encoder = RuntimeEncoder::fit(&records);

        let mut out = [5.0];
        encoder.encode_into(&records[0], &mut out);
        assert_eq!(out, [0.0]);
    }
}
