//! Chart planning and TVL aggregation for protocol dashboards
//!
//! - [`services::chart_service::plan`] maps requested metric stacks onto shared
//!   Y axes and produces a declarative chart configuration.
//! - [`services::tvl_service::aggregate`] and [`services::tvl_service::headline_tvl`]
//!   fold TVL breakdowns with the user's extra-TVL toggles.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use models::{ChartPlan, PlanOptions, Stack, Theme, TvlAggregate};
pub use services::chart_service::plan;
pub use services::tvl_service::{aggregate, headline_tvl};
pub use utils::ChartError;
