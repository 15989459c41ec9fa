pub mod quote;
pub mod schedule;
pub mod situation;
pub mod urgency;
