//! # Bandsync Core
//!
//! Domain types and logic shared by the Bandsync service crates: the
//! availability grid representation, the aggregation engine that folds
//! member grids into per-cell counts and contributor lists, and the error
//! taxonomy used across the API and storage layers.
//!
//! This crate performs no I/O; persistence lives in `bandsync-db` and the
//! HTTP surface in `bandsync-api`.

/// Aggregation engine and display-window helpers
pub mod aggregate;
/// Error types shared across the workspace
pub mod errors;
/// Domain models and request/response types
pub mod models;
