//! Per-day records and the chart payload served to the front end.

use chrono::NaiveDate;
use serde::Serialize;

use crate::range::display_label;

/// Value sent for days without data. Indistinguishable from a real zero.
pub const SENTINEL: u64 = 0;

pub const DATASET_LABEL: &str = "Last Month Listeners";
pub const BORDER_COLOR: &str = "rgba(75, 192, 192, 1)";

/// One day of the series. `value` is `None` when nothing usable was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricRecord {
    pub date: NaiveDate,
    pub value: Option<u64>,
}

impl MetricRecord {
    pub fn new(date: NaiveDate, value: Option<u64>) -> Self {
        Self { date, value }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, value: None }
    }
}

/// Chart.js-style line dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    pub border_color: String,
    pub fill: bool,
}

/// Body of `GET /chart-data`.
///
/// Only constructible from records, so `labels` and `datasets[0].data`
/// always have the same length and order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    labels: Vec<String>,
    datasets: Vec<Dataset>,
}

impl ChartPayload {
    /// Build from records already in ascending date order.
    pub fn from_records(records: &[MetricRecord]) -> Self {
        let (labels, data) = records
            .iter()
            .map(|r| (display_label(r.date), r.value.unwrap_or(SENTINEL)))
            .unzip();

        Self {
            labels,
            datasets: vec![Dataset {
                label: DATASET_LABEL.to_string(),
                data,
                border_color: BORDER_COLOR.to_string(),
                fill: false,
            }],
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Values of the listener dataset.
    pub fn data(&self) -> &[u64] {
        self.datasets.first().map(|d| d.data.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn missing_values_become_sentinel() {
        let p = ChartPayload::from_records(&[
            MetricRecord::new(d(2024, 3, 27), Some(100)),
            MetricRecord::missing(d(2024, 3, 28)),
        ]);
        assert_eq!(p.labels(), ["27-03-2024", "28-03-2024"]);
        assert_eq!(p.data(), [100, SENTINEL]);
    }

    #[test]
    fn wire_shape() {
        let p = ChartPayload::from_records(&[MetricRecord::new(d(2024, 1, 5), Some(3))]);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            json!({
                "labels": ["05-01-2024"],
                "datasets": [{
                    "label": "Last Month Listeners",
                    "data": [3],
                    "borderColor": "rgba(75, 192, 192, 1)",
                    "fill": false
                }]
            })
        );
    }

    #[test]
    fn empty_records() {
        let p = ChartPayload::from_records(&[]);
        assert!(p.labels().is_empty());
        assert!(p.data().is_empty());
        assert_eq!(p.datasets().len(), 1);
    }
}
