//! Metric stacks that can be requested on a protocol chart

use serde::{Deserialize, Serialize};

/// A known chartable metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stack {
    #[serde(rename = "TVL")]
    Tvl,
    Mcap,
    #[serde(rename = "FDV")]
    Fdv,
    Borrowed,
    Staking,
    #[serde(rename = "Token Price")]
    TokenPrice,
    #[serde(rename = "Token Volume")]
    TokenVolume,
    #[serde(rename = "Token Liquidity")]
    TokenLiquidity,
    #[serde(rename = "Bridge Deposits")]
    BridgeDeposits,
    #[serde(rename = "Bridge Withdrawals")]
    BridgeWithdrawals,
    Volume,
    Fees,
    Revenue,
    Unlocks,
    #[serde(rename = "Active Users")]
    ActiveUsers,
    #[serde(rename = "New Users")]
    NewUsers,
    Transactions,
    #[serde(rename = "Gas Used")]
    GasUsed,
    #[serde(rename = "Median APY")]
    MedianApy,
    #[serde(rename = "USD Inflows")]
    UsdInflows,
    #[serde(rename = "Total Proposals")]
    TotalProposals,
    #[serde(rename = "Successful Proposals")]
    SuccessfulProposals,
    #[serde(rename = "Max Votes")]
    MaxVotes,
    Treasury,
}

impl Stack {
    pub const ALL: [Stack; 24] = [
        Stack::Tvl,
        Stack::Mcap,
        Stack::Fdv,
        Stack::Borrowed,
        Stack::Staking,
        Stack::TokenPrice,
        Stack::TokenVolume,
        Stack::TokenLiquidity,
        Stack::BridgeDeposits,
        Stack::BridgeWithdrawals,
        Stack::Volume,
        Stack::Fees,
        Stack::Revenue,
        Stack::Unlocks,
        Stack::ActiveUsers,
        Stack::NewUsers,
        Stack::Transactions,
        Stack::GasUsed,
        Stack::MedianApy,
        Stack::UsdInflows,
        Stack::TotalProposals,
        Stack::SuccessfulProposals,
        Stack::MaxVotes,
        Stack::Treasury,
    ];

    /// Display name, also the key used in chart records and color maps
    pub fn name(self) -> &'static str {
        match self {
            Stack::Tvl => "TVL",
            Stack::Mcap => "Mcap",
            Stack::Fdv => "FDV",
            Stack::Borrowed => "Borrowed",
            Stack::Staking => "Staking",
            Stack::TokenPrice => "Token Price",
            Stack::TokenVolume => "Token Volume",
            Stack::TokenLiquidity => "Token Liquidity",
            Stack::BridgeDeposits => "Bridge Deposits",
            Stack::BridgeWithdrawals => "Bridge Withdrawals",
            Stack::Volume => "Volume",
            Stack::Fees => "Fees",
            Stack::Revenue => "Revenue",
            Stack::Unlocks => "Unlocks",
            Stack::ActiveUsers => "Active Users",
            Stack::NewUsers => "New Users",
            Stack::Transactions => "Transactions",
            Stack::GasUsed => "Gas Used",
            Stack::MedianApy => "Median APY",
            Stack::UsdInflows => "USD Inflows",
            Stack::TotalProposals => "Total Proposals",
            Stack::SuccessfulProposals => "Successful Proposals",
            Stack::MaxVotes => "Max Votes",
            Stack::Treasury => "Treasury",
        }
    }

    /// Look up a stack by its exact display name
    pub fn from_name(name: &str) -> Option<Stack> {
        Stack::ALL.iter().copied().find(|s| s.name() == name)
    }

    /// Flow metrics drawn as bars unless the view is cumulative
    pub fn is_bar_eligible(self) -> bool {
        matches!(
            self,
            Stack::TokenVolume
                | Stack::BridgeDeposits
                | Stack::BridgeWithdrawals
                | Stack::Volume
                | Stack::Fees
                | Stack::Revenue
                | Stack::Unlocks
                | Stack::ActiveUsers
                | Stack::NewUsers
                | Stack::Transactions
                | Stack::GasUsed
                | Stack::UsdInflows
                | Stack::TotalProposals
                | Stack::SuccessfulProposals
                | Stack::MaxVotes
        )
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
