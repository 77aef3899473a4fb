pub mod help;
pub mod plan;
pub mod render;
pub mod toggle;
pub mod tvl;

use std::path::PathBuf;

use protocol_charts::config::Config;
use protocol_charts::models::{PlanOptions, ProtocolData};
use protocol_charts::services::chart_service;
use tracing::debug;

/// Dispatch one CLI invocation (`args` excludes the program name)
pub fn handle_command(args: &[String], config: &Config) -> Result<(), String> {
    let Some(command) = args.first() else {
        return help::execute();
    };
    let args: Vec<&str> = args[1..].iter().map(String::as_str).collect();

    debug!("Dispatching command '{}' with {} argument(s)", command, args.len());

    match command.as_str() {
        "plan" => plan::execute(&args, config),
        "render" | "draw" => render::execute(&args, config),
        "tvl" => tvl::execute(&args, config),
        "toggle" | "settings" => toggle::execute(&args, config),
        "help" | "--help" | "-h" => help::execute(),
        other => Err(format!("Unknown command '{}'. Run `protocol-charts help` for usage.", other)),
    }
}

/// Flags shared by `plan` and `render`
#[derive(Debug, Default, PartialEq)]
pub struct ChartArgs {
    pub positional: Vec<PathBuf>,
    pub group_by: Option<String>,
    pub stacks: Option<Vec<String>>,
    pub custom_legend: Option<String>,
}

impl ChartArgs {
    pub fn parse(args: &[&str]) -> Result<Self, String> {
        let mut parsed = ChartArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match *arg {
                "--cumulative" => parsed.group_by = Some("cumulative".to_string()),
                "--group-by" => parsed.group_by = Some(next_value(&mut iter, arg)?.to_string()),
                "--stacks" => {
                    let stacks: Vec<String> = next_value(&mut iter, arg)?
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    if stacks.is_empty() {
                        return Err("--stacks needs at least one stack name".to_string());
                    }
                    parsed.stacks = Some(stacks);
                }
                "--custom-legend" => parsed.custom_legend = Some(next_value(&mut iter, arg)?.to_string()),
                flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
                path => parsed.positional.push(PathBuf::from(path)),
            }
        }

        Ok(parsed)
    }

    /// Requested stacks: the flag, then the document's list, then whatever the records carry
    pub fn stacks_for(&self, data: &ProtocolData) -> Vec<String> {
        self.stacks
            .clone()
            .or_else(|| data.stacks.clone())
            .unwrap_or_else(|| chart_service::default_stacks(&data.chart_data))
    }

    pub fn plan_options(&self, data: &ProtocolData, config: &Config) -> PlanOptions {
        PlanOptions {
            stack_colors: data.stack_colors.clone(),
            hallmarks: data.hallmarks.clone(),
            is_cumulative: chart_service::is_cumulative_view(self.group_by.as_deref()),
            custom_legend_name: self.custom_legend.clone(),
            theme: config.theme,
            color: data.color.clone(),
            title: data.name.clone(),
            unlock_token_symbol: data.unlock_token_symbol.clone(),
        }
    }
}

fn next_value<'a>(iter: &mut std::slice::Iter<'_, &'a str>, flag: &str) -> Result<&'a str, String> {
    iter.next().copied().ok_or_else(|| format!("{} needs a value", flag))
}

/// Load the protocol document named by the first positional argument
pub fn load_protocol(path: Option<&PathBuf>) -> Result<ProtocolData, String> {
    let path = path.ok_or("Missing protocol JSON path")?;
    ProtocolData::load(path).map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_args() {
        let args = ChartArgs::parse(&[
            "protocol.json",
            "--cumulative",
            "--stacks",
            "TVL, Fees,,Volume",
            "--custom-legend",
            "Chain",
        ])
        .unwrap();

        assert_eq!(args.positional, vec![PathBuf::from("protocol.json")]);
        assert_eq!(args.group_by.as_deref(), Some("cumulative"));
        assert_eq!(
            args.stacks,
            Some(vec!["TVL".to_string(), "Fees".to_string(), "Volume".to_string()])
        );
        assert_eq!(args.custom_legend.as_deref(), Some("Chain"));
    }

    #[test]
    fn test_parse_chart_args_errors() {
        assert!(ChartArgs::parse(&["--stacks"]).is_err());
        assert!(ChartArgs::parse(&["--stacks", ","]).is_err());
        assert!(ChartArgs::parse(&["--bogus"]).is_err());
    }

    #[test]
    fn test_stacks_fallback_order() {
        let data = ProtocolData::from_json(
            r#"{"name":"Demo","chartData":[{"date":1,"TVL":5,"Fees":1}],"stacks":["Fees"]}"#,
        )
        .unwrap();

        let explicit = ChartArgs::parse(&["--stacks", "Volume"]).unwrap();
        assert_eq!(explicit.stacks_for(&data), vec!["Volume".to_string()]);

        let none = ChartArgs::default();
        assert_eq!(none.stacks_for(&data), vec!["Fees".to_string()]);

        let derived = ProtocolData {
            stacks: None,
            ..data
        };
        assert_eq!(none.stacks_for(&derived), vec!["TVL".to_string(), "Fees".to_string()]);
    }

    #[test]
    fn test_plan_options_from_document() {
        let data = ProtocolData::from_json(r##"{"name":"Demo","color":"#ff0000","unlockTokenSymbol":"DMO"}"##).unwrap();
        let args = ChartArgs::parse(&["--group-by", "daily"]).unwrap();
        let options = args.plan_options(&data, &Config::default());

        assert!(!options.is_cumulative);
        assert_eq!(options.title, "Demo");
        assert_eq!(options.color.as_deref(), Some("#ff0000"));
        assert_eq!(options.unlock_token_symbol, "DMO");
    }

    #[test]
    fn test_unknown_command() {
        let err = handle_command(&["frobnicate".to_string()], &Config::default()).unwrap_err();
        assert!(err.contains("frobnicate"));
    }
}
