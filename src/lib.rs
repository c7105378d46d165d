//! Floodgate - Sliding-Window Rate Limiting
//!
//! This crate implements a per-key sliding-window rate limiter for request
//! admission control. Each key tracks an ordered log of admitted request
//! times; a request is admitted while fewer than the policy's maximum fall
//! within the most recent window. State is in-memory and per-process, and
//! callers supply the key and policy with every check.

pub mod limiter;
pub mod config;
pub mod error;
