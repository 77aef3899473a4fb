//! Protocol document consumed by the CLI

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::chart::{ChartRecord, Hallmark};
use super::tvl::HistoricalSection;
use crate::utils::errors::ChartError;

/// Already-fetched protocol data: chart records plus TVL breakdowns
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolData {
    pub name: String,
    #[serde(default)]
    pub chart_data: Vec<ChartRecord>,
    /// Stacks to chart; derived from the records when absent
    #[serde(default)]
    pub stacks: Option<Vec<String>>,
    #[serde(default)]
    pub stack_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub hallmarks: Vec<Hallmark>,
    #[serde(default)]
    pub unlock_token_symbol: String,
    #[serde(default)]
    pub tvl_by_chain: Vec<(String, f64)>,
    #[serde(default)]
    pub tvl_breakdowns: BTreeMap<String, f64>,
    #[serde(default)]
    pub historical_chain_tvls: BTreeMap<String, HistoricalSection>,
}

impl ProtocolData {
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let raw = std::fs::read_to_string(path)?;
        let data = Self::from_json(&raw)?;
        tracing::debug!(
            "Loaded protocol '{}' from {} ({} records, {} chain entries)",
            data.name,
            path.display(),
            data.chart_data.len(),
            data.tvl_by_chain.len()
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let data = ProtocolData::from_json(
            r#"{
                "name": "Example",
                "chartData": [{"date": 1000, "TVL": 5}],
                "hallmarks": [[1000, "Launch"]],
                "tvlByChain": [["ethereum", 100], ["ethereum-staking", 20]],
                "tvlBreakdowns": {"Ethereum": 100, "staking": 20},
                "historicalChainTvls": {"Ethereum": {"tvl": [{"date": 1000, "totalLiquidityUSD": 100}]}}
            }"#,
        )
        .unwrap();

        assert_eq!(data.name, "Example");
        assert!(data.stacks.is_none());
        assert_eq!(data.chart_data.len(), 1);
        assert_eq!(data.tvl_by_chain[1], ("ethereum-staking".to_string(), 20.0));
        assert_eq!(data.historical_chain_tvls["Ethereum"].latest(), Some(100.0));
    }

    #[test]
    fn test_malformed_document_is_json_error() {
        let err = ProtocolData::from_json("{\"name\": 3}").unwrap_err();
        assert!(matches!(err, ChartError::Json(_)));
    }
}
