use protocol_charts::config::Config;
use protocol_charts::services::chart_service;
use protocol_charts::services::render_service::ChartHost;
use tracing::info;

use super::{load_protocol, ChartArgs};

/// `render <protocol.json> <out.png> [plan flags]`
pub fn execute(args: &[&str], config: &Config) -> Result<(), String> {
    let chart_args = ChartArgs::parse(args)?;
    let data = load_protocol(chart_args.positional.first())?;
    let output = chart_args
        .positional
        .get(1)
        .cloned()
        .ok_or("Missing output PNG path")?;

    let stacks = chart_args.stacks_for(&data);
    let options = chart_args.plan_options(&data, config);
    let plan = chart_service::plan(&stacks, &data.chart_data, &options);

    let mut host = ChartHost::new(output.clone(), (config.width, config.height), config.theme, &data.name);
    host.render(plan).map_err(|e| e.to_string())?;
    host.dispose();

    info!("🖼️ Rendered {} to {}", data.name, output.display());
    Ok(())
}
