//! Descriptive, diagnostic, and sustainability computations over the loaded
//! frames. Everything here is a pure function from frames to summaries; the
//! orchestration in [`crate::report`] decides what gets printed and plotted.

pub mod describe;
pub mod manufacturing;
pub mod procurement;
pub mod revenue;
pub mod stats;
