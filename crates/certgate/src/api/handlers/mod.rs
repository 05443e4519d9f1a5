//! API request handlers

pub mod gateway;
pub mod health;

pub use gateway::{dispatch, AppState, MAX_BODY_BYTES};
pub use health::{method_not_allowed, run_self_test};
