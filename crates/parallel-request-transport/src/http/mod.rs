//! HTTP transport implementation
//!
//! Provides the reqwest-backed transport: client construction per batch and
//! the per-request adapter that implements the Transport trait.

pub mod adapter;
pub mod client;

pub use client::HttpTransport;
