//! Bridge error types.
//!
//! Every failure is deterministic given the same guest binary and inputs,
//! so nothing here is retried: errors surface to the immediate caller
//! with a human-readable cause.

/// Top-level error type for the bridge crate.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Wasmtime engine, compilation, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Guest ABI validation failed (missing exports, bad imports, etc.).
    #[error("validation error: {0}")]
    Validation(String),

    /// A required export was absent or had the wrong shape at bind time.
    #[error("can not find export {0}")]
    MissingExport(&'static str),

    /// Guest memory access out of bounds or a malformed descriptor.
    #[error("cannot read memory")]
    Marshal,

    /// The permission string exceeds what a 32-bit guest can address.
    #[error("string too large for guest memory ({0} bytes)")]
    StringTooLarge(usize),

    /// The guest (or a nested data callback) trapped during the call.
    #[error("calling guest: {0}")]
    GuestTrap(String),

    /// The decision function returned something other than 0 or 1.
    #[error("unexpected return code: {0}")]
    UnexpectedReturnCode(i32),

    /// `evaluate` was called after `shutdown`.
    #[error("bridge is shut down")]
    ShutDown,
}
