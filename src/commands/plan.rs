use protocol_charts::config::Config;
use protocol_charts::services::chart_service;
use tracing::info;

use super::{load_protocol, ChartArgs};

/// `plan <protocol.json> [--cumulative | --group-by <view>] [--stacks A,B] [--custom-legend NAME]`
///
/// Prints the chart configuration as JSON.
pub fn execute(args: &[&str], config: &Config) -> Result<(), String> {
    let chart_args = ChartArgs::parse(args)?;
    let data = load_protocol(chart_args.positional.first())?;

    let stacks = chart_args.stacks_for(&data);
    let options = chart_args.plan_options(&data, config);
    let plan = chart_service::plan(&stacks, &data.chart_data, &options);

    info!(
        "📊 Planned {} series on {} axis group(s) for {}",
        plan.series.len(),
        plan.axis_groups.len(),
        data.name
    );

    let json = serde_json::to_string_pretty(&plan).map_err(|e| e.to_string())?;
    println!("{}", json);

    Ok(())
}
