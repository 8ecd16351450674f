pub mod period;
pub mod punch_time;
