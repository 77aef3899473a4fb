//! TVL breakdown models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::chart::de_timestamp;

/// Optional TVL categories a user can fold into the totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraTvlKey {
    Staking,
    Pool2,
    Borrowed,
    DoubleCounted,
    LiquidStaking,
    Vesting,
    GovTokens,
}

impl ExtraTvlKey {
    pub const ALL: [ExtraTvlKey; 7] = [
        ExtraTvlKey::Staking,
        ExtraTvlKey::Pool2,
        ExtraTvlKey::Borrowed,
        ExtraTvlKey::DoubleCounted,
        ExtraTvlKey::LiquidStaking,
        ExtraTvlKey::Vesting,
        ExtraTvlKey::GovTokens,
    ];

    /// Settings key, as it appears in breakdown names
    pub fn key(self) -> &'static str {
        match self {
            ExtraTvlKey::Staking => "staking",
            ExtraTvlKey::Pool2 => "pool2",
            ExtraTvlKey::Borrowed => "borrowed",
            ExtraTvlKey::DoubleCounted => "doublecounted",
            ExtraTvlKey::LiquidStaking => "liquidstaking",
            ExtraTvlKey::Vesting => "vesting",
            ExtraTvlKey::GovTokens => "govtokens",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtraTvlKey::Staking => "Staking",
            ExtraTvlKey::Pool2 => "Pool2",
            ExtraTvlKey::Borrowed => "Borrows",
            ExtraTvlKey::DoubleCounted => "Double Count",
            ExtraTvlKey::LiquidStaking => "Liquid Staking",
            ExtraTvlKey::Vesting => "Vesting",
            ExtraTvlKey::GovTokens => "Gov Tokens",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            ExtraTvlKey::Staking => "Include governance tokens staked in the protocol",
            ExtraTvlKey::Pool2 => "Include staked lp tokens where one of the coins in the pair is the governance token",
            ExtraTvlKey::Borrowed => "Include borrowed coins in lending protocols",
            ExtraTvlKey::DoubleCounted => "Include TVL of protocols which TVL feeds into another protocol",
            ExtraTvlKey::LiquidStaking => "Include TVL of liquid staking protocols",
            ExtraTvlKey::Vesting => "Include tokens that are not circulating or not owned by the protocol",
            ExtraTvlKey::GovTokens => "Include governance tokens held in the treasury",
        }
    }

    /// Exact (case-sensitive) key lookup
    pub fn from_key(key: &str) -> Option<ExtraTvlKey> {
        ExtraTvlKey::ALL.iter().copied().find(|k| k.key() == key)
    }
}

/// Current toggle state of every extra TVL category; missing keys are off
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTvlToggles(BTreeMap<String, bool>);

impl ExtraTvlToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ExtraTvlKey, enabled: bool) -> Self {
        self.set(key, enabled);
        self
    }

    pub fn set(&mut self, key: ExtraTvlKey, enabled: bool) {
        self.0.insert(key.key().to_string(), enabled);
    }

    /// Case-insensitive lookup by category name; unknown names are disabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(&name.to_lowercase()).copied().unwrap_or(false)
    }

    /// Whether a section name (any case) is one of the toggleable categories
    pub fn is_toggleable(name: &str) -> bool {
        ExtraTvlKey::from_key(&name.to_lowercase()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// One dated snapshot of a historical TVL section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvlSnapshot {
    #[serde(deserialize_with = "de_timestamp")]
    pub date: i64,
    #[serde(rename = "totalLiquidityUSD")]
    pub total_liquidity_usd: f64,
}

/// Historical series for one breakdown section
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HistoricalSection {
    #[serde(default)]
    pub tvl: Vec<TvlSnapshot>,
}

impl HistoricalSection {
    pub fn latest(&self) -> Option<f64> {
        self.tvl.last().map(|s| s.total_liquidity_usd)
    }
}

/// A toggleable category shown as its own row beside the chain table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraTvlRow {
    pub key: ExtraTvlKey,
    pub label: &'static str,
    pub help: &'static str,
    pub amount: f64,
    pub enabled: bool,
}

/// Result of folding a per-chain breakdown with the current toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvlAggregate {
    pub total: f64,
    /// Chains in first-seen order
    pub per_chain: Vec<(String, f64)>,
    pub extra_rows: Vec<ExtraTvlRow>,
}

impl TvlAggregate {
    pub fn chain(&self, name: &str) -> Option<f64> {
        self.per_chain.iter().find(|(c, _)| c == name).map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_are_case_insensitive() {
        let toggles = ExtraTvlToggles::new().with(ExtraTvlKey::LiquidStaking, true);
        assert!(toggles.is_enabled("liquidstaking"));
        assert!(toggles.is_enabled("LiquidStaking"));
        assert!(!toggles.is_enabled("staking"));
        assert!(!toggles.is_enabled("unknown"));
    }

    #[test]
    fn test_key_lookup() {
        for key in ExtraTvlKey::ALL {
            assert_eq!(ExtraTvlKey::from_key(key.key()), Some(key));
        }
        assert_eq!(ExtraTvlKey::from_key("Staking"), None);
        assert!(ExtraTvlToggles::is_toggleable("Staking"));
        assert!(!ExtraTvlToggles::is_toggleable("Ethereum"));
    }

    #[test]
    fn test_historical_latest() {
        let section: HistoricalSection = serde_json::from_str(
            r#"{"tvl": [{"date": 1, "totalLiquidityUSD": 10}, {"date": "2", "totalLiquidityUSD": 25.5}]}"#,
        )
        .unwrap();
        assert_eq!(section.latest(), Some(25.5));
        assert_eq!(HistoricalSection::default().latest(), None);
    }
}
