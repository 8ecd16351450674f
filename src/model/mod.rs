pub mod attendance;
pub mod employee;
pub mod page;
pub mod transaction;
