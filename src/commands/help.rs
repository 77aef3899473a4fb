const USAGE: &str = "\
protocol-charts - plan and render protocol dashboard charts

USAGE:
    protocol-charts <COMMAND> [ARGS]

CHARTS:
    plan <protocol.json> [FLAGS]              Print the chart configuration as JSON
    render <protocol.json> <out.png> [FLAGS]  Draw the chart to a PNG

    FLAGS:
        --stacks A,B,C          Stacks to chart (default: document list, then record keys)
        --cumulative            Cumulative view: bar metrics draw as lines
        --group-by <view>       Same as --cumulative when <view> is 'cumulative'
        --custom-legend <NAME>  Series are user-defined categories; no gradients

TVL:
    tvl <protocol.json>       Per-chain TVL, extra categories and headline total
    toggle                    List the extra TVL toggles
    toggle <key> [on|off]     Set a toggle (flips it when no value is given)

ENVIRONMENT:
    CHART_THEME             light | dark (default light)
    CHART_WIDTH             PNG width in pixels (default 1024)
    CHART_HEIGHT            PNG height in pixels (default 768)
    DEFI_SETTINGS_PATH      Toggle file (default defi-settings.json)
    RUST_LOG                Log filter";

pub fn execute() -> Result<(), String> {
    println!("{}", USAGE);
    Ok(())
}
