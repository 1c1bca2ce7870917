//! Host function registration via the Wasmtime linker.
//!
//! The guest imports exactly one host function, `app::getData`. It is
//! invoked synchronously from inside the guest's own execution, on the
//! same logical call and under the same bridge lock as the enclosing
//! evaluation. A marshalling failure here returns `Err`, which traps the
//! guest and aborts only the enclosing evaluation — a host-side fault is
//! never allowed to cross the boundary undefined.

use std::sync::Arc;

use anyhow::anyhow;
use wasmtime::{Caller, Linker, TypedFunc};

use warden_datasource::DataSource;

use crate::error::BridgeError;
use crate::marshal;

/// Per-instance state held in the Wasmtime `Store`.
///
/// Carries the data source the callback resolves keys against. The
/// source is shared by reference and immutable after load.
pub struct HostState {
    pub source: Arc<dyn DataSource>,
}

impl HostState {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

/// Register the `app` host module with the linker.
pub fn register_host_functions(linker: &mut Linker<HostState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "app",
        "getData",
        |mut caller: Caller<'_, HostState>, key_ptr: i32| -> anyhow::Result<i32> {
            let mem = caller
                .get_export("memory")
                .and_then(|e| e.into_memory())
                .ok_or_else(|| anyhow!("no memory export"))?;

            // The key arrives as a (pointer, length) descriptor.
            let key = marshal::read_descriptor(mem.data(&caller), key_ptr)?;

            let value = caller
                .data()
                .source
                .get(&key)
                .unwrap_or_else(|| b"null".to_vec());
            log::debug!("getData: key={:?} -> {} bytes", key, value.len());

            let malloc: TypedFunc<i32, i32> = caller
                .get_export("malloc")
                .and_then(|e| e.into_func())
                .ok_or_else(|| anyhow!("can not find function malloc"))?
                .typed(&caller)?;

            // The value buffer transfers to the guest; the host never
            // frees it.
            let buf = marshal::copy_string_in(&mut caller, &mem, &malloc, &value)?;
            Ok(buf.ptr)
        },
    )?;
    Ok(())
}
