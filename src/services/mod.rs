pub mod chart_service;
pub mod render_service;
pub mod settings_service;
pub mod tvl_service;
