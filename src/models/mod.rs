//! Data models for chart planning and TVL aggregation
//!
//! Inputs deserialize from the protocol JSON document; outputs serialize into the
//! chart configuration and TVL summaries rendered by the commands.

pub mod chart;
pub mod protocol;
pub mod stack;
pub mod tvl;

// Re-export commonly used types for convenience
pub use chart::{
    AreaStyle, AxisFormatter, AxisGroup, AxisLine, ChartPlan, ChartRecord, Gradient, Hallmark,
    MarkLine, Marker, MarkerAnchor, MarkerLabel, PlanOptions, Series, SeriesPoint, SeriesType,
    SeriesValue, Theme,
};
pub use protocol::ProtocolData;
pub use stack::Stack;
pub use tvl::{ExtraTvlKey, ExtraTvlRow, ExtraTvlToggles, HistoricalSection, TvlAggregate, TvlSnapshot};
