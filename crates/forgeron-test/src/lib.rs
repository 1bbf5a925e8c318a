//! Test harnesses for the forgeron service.
//!
//! Provides `TestForge` for full-stack integration tests: it boots the
//! built `forgeron` binary against a fixture makefile and drives it over
//! HTTP.

#[cfg(test)]
mod cli;
pub mod forge;
#[cfg(test)]
mod service;

pub use forge::{TestError, TestForge};
