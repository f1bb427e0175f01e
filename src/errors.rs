//! Error Types
//!
//! This module defines the error types used by the layer system.
//!
//! # Overview
//!
//! The error taxonomy is intentionally small. Most operations are infallible:
//! - Lookups on absent layers, indices or handles return `None`.
//! - Removing something that is not present is a silent no-op.
//!
//! The only failure is a caller contract violation, reported through
//! [`LayerError`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_layers::errors::Result;
//!
//! fn release(layer: &mut Layer) -> Result<()> {
//!     layer.decrement_counter()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The error type for the layer system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    // ========================================================================
    // Usage Errors
    // ========================================================================
    /// `decrement_counter` was called on a layer whose enable counter is
    /// already zero. This always indicates unbalanced enable/disable calls
    /// in the caller.
    #[error("Enable counter underflow on layer '{name}' (id: {layer_id})")]
    CounterUnderflow {
        /// Process-unique id of the layer
        layer_id: u32,
        /// Layer name at the time of the failure
        name: String,
    },
}

/// Alias for `Result<T, LayerError>`.
pub type Result<T> = std::result::Result<T, LayerError>;
