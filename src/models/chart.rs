//! Chart planning models
//!
//! Inputs (records, hallmarks, plan options) deserialize from the protocol JSON
//! document; outputs (series, axis groups) serialize into the declarative chart
//! configuration handed to a renderer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::utils::format::{to_k, to_percent};

/// One time-indexed row of chart data: a date plus one raw value per stack
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartRecord {
    #[serde(deserialize_with = "de_timestamp")]
    pub date: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl ChartRecord {
    pub fn new(date: i64) -> Self {
        ChartRecord {
            date,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style helper used by callers assembling records in code
    pub fn with(mut self, stack: &str, value: f64) -> Self {
        self.values.insert(stack.to_string(), serde_json::json!(value));
        self
    }

    /// Usable value for a stack
    ///
    /// Numbers and numeric strings count; absent, null, zero and NaN do not.
    pub fn value(&self, stack: &str) -> Option<f64> {
        let number = match self.values.get(stack)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;

        if number == 0.0 || number.is_nan() {
            None
        } else {
            Some(number)
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.date, 0).unwrap_or_default()
    }
}

/// Dated event annotation, deserialized from `[timestamp, "label"]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Hallmark(#[serde(deserialize_with = "de_timestamp")] pub i64, pub String);

impl Hallmark {
    pub fn new(date: i64, label: &str) -> Self {
        Hallmark(date, label.to_string())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

/// A plotted value: a number or the "no data" sentinel (serialized as `"-"`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesValue {
    Number(f64),
    Missing,
}

impl SeriesValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            SeriesValue::Number(v) => Some(v),
            SeriesValue::Missing => None,
        }
    }
}

impl Serialize for SeriesValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SeriesValue::Number(v) => serializer.serialize_f64(*v),
            SeriesValue::Missing => serializer.serialize_str("-"),
        }
    }
}

/// `[timestamp_ms, value]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint(
    #[serde(with = "chrono::serde::ts_milliseconds")] pub DateTime<Utc>,
    pub SeriesValue,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Translucent color the line-series gradient fades into
    pub fn gradient_base(self) -> &'static str {
        match self {
            Theme::Dark => "rgba(0, 0, 0, 0.2)",
            Theme::Light => "rgba(255, 255, 255, 0.2)",
        }
    }

    pub fn label_color(self) -> &'static str {
        match self {
            Theme::Dark => "rgba(255, 255, 255, 1)",
            Theme::Light => "rgba(0, 0, 0, 1)",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// Vertical gradient from `top` (offset 0) to `bottom` (offset 1)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub top: String,
    pub bottom: String,
}

/// Area fill of a line series; `color` is None when a custom legend owns styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStyle {
    pub color: Option<Gradient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLabel {
    pub color: String,
    pub font_family: String,
    pub font_size: u32,
    pub font_weight: u32,
}

/// Vertical anchor of a marker endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAnchor {
    Zero,
    Max,
}

impl Serialize for MarkerAnchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MarkerAnchor::Zero => serializer.serialize_u32(0),
            MarkerAnchor::Max => serializer.serialize_str("max"),
        }
    }
}

/// One endpoint of a hallmark marker line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub x_axis: DateTime<Utc>,
    pub y_axis: MarkerAnchor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<MarkerLabel>,
    /// Pixel offset of the label end, staggered so labels do not overlap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MarkLine {
    pub data: Vec<[Marker; 2]>,
}

/// One configured chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesType,
    pub y_axis_index: usize,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
    pub mark_line: MarkLine,
    pub data: Vec<SeriesPoint>,
}

/// Axis label formatting attached to an axis group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AxisFormatter {
    Default,
    Compact {
        #[serde(skip_serializing_if = "Option::is_none")]
        suffix: Option<String>,
    },
    Percent,
}

impl AxisFormatter {
    pub fn format(&self, value: f64) -> String {
        match self {
            AxisFormatter::Default => to_k(value),
            AxisFormatter::Compact { suffix: Some(suffix) } => format!("{} {}", to_k(value), suffix),
            AxisFormatter::Compact { suffix: None } => to_k(value),
            AxisFormatter::Percent => to_percent(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLine {
    pub color: Option<String>,
}

/// A materialized Y axis shared by compatible stacks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisGroup {
    /// Member stack names joined with `+`
    pub id: String,
    pub index: usize,
    pub offset: u32,
    pub formatter: AxisFormatter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_line: Option<AxisLine>,
}

/// Everything the planner needs besides the stacks and records
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Explicit per-stack color overrides
    pub stack_colors: BTreeMap<String, String>,
    pub hallmarks: Vec<Hallmark>,
    pub is_cumulative: bool,
    pub custom_legend_name: Option<String>,
    pub theme: Theme,
    /// Base chart color; hashed from the title when absent
    pub color: Option<String>,
    pub title: String,
    pub unlock_token_symbol: String,
}

/// Declarative chart configuration produced by the planner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPlan {
    pub series: Vec<Series>,
    pub axis_groups: Vec<AxisGroup>,
    pub legend_visible: bool,
}

impl ChartPlan {
    pub fn axis(&self, index: usize) -> Option<&AxisGroup> {
        self.axis_groups.iter().find(|a| a.index == index)
    }
}

/// Accept unix timestamps as numbers or numeric strings
pub(crate) fn de_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| serde::de::Error::custom("timestamp out of range")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
        other => Err(serde::de::Error::custom(format!("invalid timestamp: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_value_treats_zero_and_null_as_absent() {
        let record: ChartRecord = serde_json::from_str(
            r#"{"date": "1650000000", "TVL": 0, "Fees": null, "Volume": "12.5", "Mcap": 3}"#,
        )
        .unwrap();

        assert_eq!(record.date, 1_650_000_000);
        assert_eq!(record.value("TVL"), None);
        assert_eq!(record.value("Fees"), None);
        assert_eq!(record.value("Volume"), Some(12.5));
        assert_eq!(record.value("Mcap"), Some(3.0));
        assert_eq!(record.value("Revenue"), None);
    }

    #[test]
    fn test_series_point_serializes_as_pair() {
        let ts = DateTime::from_timestamp(1000, 0).unwrap();
        let json = serde_json::to_string(&SeriesPoint(ts, SeriesValue::Missing)).unwrap();
        assert_eq!(json, r#"[1000000,"-"]"#);
        let json = serde_json::to_string(&SeriesPoint(ts, SeriesValue::Number(2.5))).unwrap();
        assert_eq!(json, "[1000000,2.5]");
    }

    #[test]
    fn test_hallmark_from_pair() {
        let hallmarks: Vec<Hallmark> = serde_json::from_str(r#"[[1000, "Launch"]]"#).unwrap();
        assert_eq!(hallmarks[0], Hallmark::new(1000, "Launch"));
    }

    #[test]
    fn test_formatters() {
        assert_eq!(AxisFormatter::Default.format(2500.0), "2.5K");
        let unlocks = AxisFormatter::Compact {
            suffix: Some("ARB".to_string()),
        };
        assert_eq!(unlocks.format(1_000_000.0), "1M ARB");
        assert_eq!(AxisFormatter::Percent.format(3.5), "3.5%");
    }
}
