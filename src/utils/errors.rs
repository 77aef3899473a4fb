use thiserror::Error;

/// Errors raised at the fallible edges of the crate (files, settings, rendering)
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Display prefixes of the `ChartError` variants
const ERROR_PREFIXES: [&str; 5] = [
    "I/O error: ",
    "JSON error: ",
    "Render failed: ",
    "Invalid configuration: ",
    "Invalid input: ",
];

/// Strip a `ChartError` variant prefix so the message reads cleanly in CLI output
///
/// "Invalid input: unknown toggle 'foo'" becomes "unknown toggle 'foo'";
/// any other message is returned unchanged.
pub fn extract_clean_error(error_msg: &str) -> String {
    ERROR_PREFIXES
        .iter()
        .find_map(|prefix| error_msg.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_else(|| error_msg.to_string())
}
