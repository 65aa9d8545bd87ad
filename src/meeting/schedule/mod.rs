//! Update scheduling policy.

pub mod policy;

pub use policy::{SchedulePolicy, UpdateCheck, should_update_summary};
