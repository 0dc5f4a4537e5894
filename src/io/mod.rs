//! IO adapters for the workbook inputs.

pub mod excel_read;
