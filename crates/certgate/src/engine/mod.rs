//! CA engine implementations shipped with the gateway
//!
//! The real CA lives elsewhere. What is here is enough to run and probe the
//! gateway on its own: an in-memory engine and a self-test that drives any
//! engine end to end.

pub mod memory;
pub mod self_test;

pub use memory::MemoryEngine;
pub use self_test::EngineSelfTest;
