pub mod domain;
pub mod ports;

pub use domain::{
    is_allowed_duration, Achievement, NewResult, NewText, TestResult, Text, ALLOWED_DURATIONS,
};
pub use ports::{PortError, PortResult, TextStore};
