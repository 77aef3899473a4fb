use protocol_charts::config::Config;
use protocol_charts::models::{ProtocolData, TvlAggregate};
use protocol_charts::services::settings_service::{self, FileSettings};
use protocol_charts::services::tvl_service;
use protocol_charts::utils::format::format_usd;
use protocol_charts::utils::{Align, Table};
use tracing::info;

use super::load_protocol;

/// `tvl <protocol.json>`
pub fn execute(args: &[&str], config: &Config) -> Result<(), String> {
    let path = args.first().map(std::path::PathBuf::from);
    let data = load_protocol(path.as_ref())?;

    let settings = FileSettings::open(&config.settings_path).map_err(|e| e.to_string())?;
    let toggles = settings_service::extra_tvl_toggles(&settings);

    let aggregate = tvl_service::aggregate(&data.tvl_by_chain, &toggles);
    let headline = tvl_service::headline_tvl(&data.tvl_breakdowns, &data.historical_chain_tvls, &toggles);

    info!(
        "💰 {}: {} chain(s), {} extra categor(ies)",
        data.name,
        aggregate.per_chain.len(),
        aggregate.extra_rows.len()
    );

    println!("{}", render_report(&data, &aggregate, headline));
    Ok(())
}

fn render_report(data: &ProtocolData, aggregate: &TvlAggregate, headline: f64) -> String {
    let mut out = format!("{} - Total Value Locked: {}\n\n", data.name, format_usd(headline));

    let mut chains = Table::new(vec!["Chain", "TVL"]).align(1, Align::Right);
    for (chain, amount) in &aggregate.per_chain {
        chains.add_row(vec![chain.clone(), format_usd(*amount)]);
    }
    if chains.is_empty() {
        out.push_str("No per-chain breakdown\n");
    } else {
        out.push_str(&chains.render());
        out.push('\n');
    }

    if !aggregate.extra_rows.is_empty() {
        let mut extras = Table::new(vec!["", "Category", "Amount", "Description"]).align(2, Align::Right);
        for row in &aggregate.extra_rows {
            extras.add_row(vec![
                if row.enabled { "[x]" } else { "[ ]" }.to_string(),
                row.label.to_string(),
                format_usd(row.amount),
                row.help.to_string(),
            ]);
        }
        out.push('\n');
        out.push_str(&extras.render());
        out.push('\n');
    }

    for (label, section) in [("Staked", "staking"), ("Borrowed", "borrowed")] {
        if let Some(amount) = tvl_service::latest_section_amount(&data.historical_chain_tvls, section) {
            out.push_str(&format!("{}: {}\n", label, format_usd(amount)));
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol_charts::models::{ExtraTvlKey, ExtraTvlToggles};

    #[test]
    fn test_render_report() {
        let data = ProtocolData::from_json(
            r#"{
                "name": "Demo",
                "tvlByChain": [["Ethereum", 100], ["Ethereum-staking", 20], ["staking", 20]],
                "historicalChainTvls": {"staking": {"tvl": [{"date": 1, "totalLiquidityUSD": 20}]}}
            }"#,
        )
        .unwrap();
        let toggles = ExtraTvlToggles::new().with(ExtraTvlKey::Staking, true);
        let aggregate = tvl_service::aggregate(&data.tvl_by_chain, &toggles);

        let report = render_report(&data, &aggregate, 120.0);

        assert!(report.starts_with("Demo - Total Value Locked: $120"));
        assert!(report.contains("Ethereum"));
        assert!(report.contains("[x]"));
        assert!(report.ends_with("Staked: $20.00"));
        assert!(!report.contains("Borrowed:"));
    }
}
