//! Data source trait — the host-side lookup surface for the guest callback.

/// Read-only lookup into the key/value data source.
///
/// Implementations must be immutable after construction: the bridge may
/// consult the source from whichever thread currently holds the guest
/// lock, and two bridges may share one source concurrently.
///
/// The returned bytes are an already-serialized value payload; the
/// bridge passes them through to the guest verbatim.
pub trait DataSource: Send + Sync {
    /// Look up a key. `None` means absent (the callback substitutes the
    /// literal text `null`).
    fn get(&self, key: &str) -> Option<Vec<u8>>;
}
