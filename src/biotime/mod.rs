pub mod client;
pub mod source;

pub use client::{BiotimeClient, BiotimeError};
pub use source::{AttendanceSource, TransactionQuery};
