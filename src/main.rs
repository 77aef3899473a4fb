use protocol_charts::config::Config;
use protocol_charts::utils::extract_clean_error;
use tracing::{debug, error, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod commands;

fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    match "protocol_charts=debug".parse::<Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Invalid default log directive: {}", e),
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📈 protocol-charts v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    debug!("Using {:?}", config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().cloned().unwrap_or_else(|| "help".to_string());

    if let Err(e) = commands::handle_command(&args, &config) {
        error!("❌ Error executing command {}: {}", command, extract_clean_error(&e));
        std::process::exit(1);
    }
}
