//! Integration test crate for cliplog.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every cliplog crate to verify they work together.

#[cfg(test)]
mod annotate;

#[cfg(test)]
mod jobs;

#[cfg(test)]
mod pipeline;
