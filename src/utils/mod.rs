pub mod errors;
pub mod format;
pub mod table;

pub use errors::{extract_clean_error, ChartError};
pub use table::{Align, Table};
