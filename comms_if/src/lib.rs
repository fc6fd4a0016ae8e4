//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Requests and responses exchanged with the navigation executable
pub mod nav;

/// Network module
pub mod net;
