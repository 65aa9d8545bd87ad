//! Response parsing: JSON extraction, decoding and repair.

pub mod extract;
pub mod summary_parser;

pub use extract::extract_json_block;
pub use summary_parser::{
    parse_meeting_summary, parse_meeting_summary_with, parse_meeting_summary_with_repair,
    parse_meeting_summary_with_repair_and_limits,
};
