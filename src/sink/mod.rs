//! Result Sink Module
//!
//! Turns final totals into something a human or a plotting tool can read.
//!
//! - **`table`**: The `period , magnitude` text table, one row per candidate period.
//! - **`report`**: The one-line throughput figure printed after the reduction.
//!
//! A sink failure never touches the computed totals; it is returned to the caller,
//! which reports it once the run is otherwise complete.

pub mod report;
pub mod table;

pub use report::Performance;
pub use table::{DEFAULT_TABLE_PATH, ResultRow, ResultSink, SinkError, write_table};
