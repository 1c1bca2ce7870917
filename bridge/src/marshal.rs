//! String marshalling across the host/guest boundary.
//!
//! Two distinct wire encodings exist and are not interchangeable:
//!
//! - **Host → guest** ([`copy_string_in`]): the host allocates
//!   `len + 1` bytes through the guest's own `malloc`, writes the UTF-8
//!   bytes followed by a single zero byte, and hands over the start
//!   pointer. The recipient knows the extent out of band (from the call
//!   signature or the terminator).
//! - **Guest → host** ([`read_descriptor`]): the guest passes a pointer
//!   to an 8-byte record already resident in its memory — a little-endian
//!   u32 data pointer at `[0,4)` and a little-endian u32 length at
//!   `[4,8)`. The host reads exactly `length` bytes from the inner
//!   pointer; this form carries embedded NUL bytes without loss.
//!
//! Ownership of a [`GuestBuffer`] is directional: a buffer the host
//! allocates to pass an argument in is freed by the host right after the
//! call returns; a buffer produced for the guest (the callback's return
//! value) transfers to the guest and the host never frees it.

use wasmtime::{AsContextMut, Memory, TypedFunc};

use crate::error::BridgeError;
use crate::memory;

/// A region of guest memory obtained from the guest allocator.
///
/// `len` is the full allocation size (string bytes plus the terminator
/// for host→guest transfers) and is what must be handed back to the
/// guest's `free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestBuffer {
    pub ptr: i32,
    pub len: i32,
}

/// Copy `bytes` into guest memory as a NUL-terminated string.
///
/// Allocates through the guest's exported `malloc`, so the returned
/// buffer lives on the guest heap. The caller decides what happens to
/// it: free it after the call for arguments, or leave it to the guest
/// for transferred values.
pub fn copy_string_in<S: AsContextMut>(
    mut store: S,
    mem: &Memory,
    malloc: &TypedFunc<i32, i32>,
    bytes: &[u8],
) -> Result<GuestBuffer, BridgeError> {
    let len = i32::try_from(bytes.len() + 1)
        .map_err(|_| BridgeError::StringTooLarge(bytes.len()))?;

    let ptr = malloc
        .call(&mut store, len)
        .map_err(|e| BridgeError::GuestTrap(format!("calling malloc: {e:#}")))?;

    let terminator_ptr = ptr
        .checked_add(bytes.len() as i32)
        .ok_or(BridgeError::Marshal)?;
    let data = mem.data_mut(&mut store);
    memory::write_bytes(data, ptr, bytes)?;
    memory::write_bytes(data, terminator_ptr, &[0])?;

    Ok(GuestBuffer { ptr, len })
}

/// Decode a (pointer, length) descriptor into the string it points at.
///
/// `mem` is the guest's full linear memory and `desc_ptr` the guest
/// pointer to the 8-byte record. Any read outside linear memory is a
/// marshalling fault that aborts the current evaluation.
pub fn read_descriptor(mem: &[u8], desc_ptr: i32) -> Result<String, BridgeError> {
    let ptr = memory::read_i32(mem, desc_ptr)?;
    let len_ptr = desc_ptr.checked_add(4).ok_or(BridgeError::Marshal)?;
    let len = memory::read_i32(mem, len_ptr)?;

    let bytes = memory::read_bytes(mem, ptr, len)?;
    String::from_utf8(bytes).map_err(|_| BridgeError::Marshal)
}
