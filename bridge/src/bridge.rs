//! Guest bridge — Wasmtime engine, module loading, and permission checks.
//!
//! [`PermissionBridge`] is the main entry point. It owns exactly one
//! guest instance for its lifetime, serializes every call into it behind
//! one exclusive lock, and exposes a single typed operation,
//! [`PermissionBridge::evaluate`].

use std::sync::{Arc, Mutex, PoisonError};

use wasmtime::{Engine, Linker, Memory, Module, Store, TypedFunc};

use warden_datasource::DataSource;

use crate::error::BridgeError;
use crate::host::{register_host_functions, HostState};
use crate::marshal;
use crate::validation::validate_module;

/// The immutable triple identifying one permission check.
///
/// Identifiers are unsigned; the guest receives their raw 32 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionQuery {
    pub subject_id: u32,
    pub context_id: u32,
    pub permission: String,
}

/// The two meaningful outcomes of a permission check.
///
/// The full result of [`PermissionBridge::evaluate`] is the tri-state
/// `Result<Decision, BridgeError>` — it is never collapsed to a plain
/// boolean, because the guest's raw return encoding has more possible
/// values than the two meaningful outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    Denied,
}

impl Decision {
    pub fn is_granted(self) -> bool {
        matches!(self, Decision::Granted)
    }
}

/// The loaded, instantiated guest with its cached entry points.
///
/// Guest memory and call state are not safe for concurrent use, so this
/// lives behind the bridge's mutex and is only reachable while holding it.
struct GuestInstance {
    store: Store<HostState>,
    memory: Memory,
    has_perm: TypedFunc<(i32, i32, i32), i32>,
    malloc: TypedFunc<i32, i32>,
    free: TypedFunc<(i32, i32), ()>,
}

impl GuestInstance {
    fn evaluate(&mut self, query: &PermissionQuery) -> Result<Decision, BridgeError> {
        // Host→guest transfer of the permission name. This buffer is
        // host-owned: it must be handed back to the guest allocator on
        // every exit path below.
        let arg = marshal::copy_string_in(
            &mut self.store,
            &self.memory,
            &self.malloc,
            query.permission.as_bytes(),
        )?;

        let outcome = self.has_perm.call(
            &mut self.store,
            (query.subject_id as i32, query.context_id as i32, arg.ptr),
        );

        if let Err(e) = self.free.call(&mut self.store, (arg.ptr, arg.len)) {
            log::warn!("releasing argument buffer: {:#}", e);
        }

        let code = outcome.map_err(|e| BridgeError::GuestTrap(format!("{:#}", e)))?;
        log::debug!(
            "hasPerm(subject={}, context={}, {:?}) -> {}",
            query.subject_id,
            query.context_id,
            query.permission,
            code
        );

        match code {
            1 => Ok(Decision::Granted),
            0 => Ok(Decision::Denied),
            other => Err(BridgeError::UnexpectedReturnCode(other)),
        }
    }
}

/// Hosts one guest module instance and answers permission checks with it.
///
/// All calls — including every nested `getData` callback they trigger —
/// are serialized end to end behind one lock. Running two bridges over
/// the same (read-only) data source is safe; sharing one guest instance
/// without this lock is not.
pub struct PermissionBridge {
    inner: Mutex<Option<GuestInstance>>,
}

impl std::fmt::Debug for PermissionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionBridge").finish_non_exhaustive()
    }
}

impl PermissionBridge {
    /// Compile, validate, and instantiate the guest module, binding the
    /// `app::getData` callback and resolving the required entry points.
    pub fn new(wasm_bytes: &[u8], source: Arc<dyn DataSource>) -> Result<Self, BridgeError> {
        let engine = Engine::default();
        let module = Module::new(&engine, wasm_bytes)?;
        validate_module(&module)?;

        let mut store = Store::new(&engine, HostState::new(source));
        let mut linker = Linker::new(&engine);
        register_host_functions(&mut linker)?;

        let instance = linker.instantiate(&mut store, &module)?;

        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or(BridgeError::MissingExport("memory"))?;
        let has_perm = instance.get_typed_func::<(i32, i32, i32), i32>(&mut store, "hasPerm")?;
        let malloc = instance.get_typed_func::<i32, i32>(&mut store, "malloc")?;
        let free = instance.get_typed_func::<(i32, i32), ()>(&mut store, "free")?;

        Ok(Self {
            inner: Mutex::new(Some(GuestInstance {
                store,
                memory,
                has_perm,
                malloc,
                free,
            })),
        })
    }

    /// Run one permission check.
    ///
    /// Marshals the permission name into guest memory, invokes the
    /// guest's decision function, releases the argument buffer
    /// regardless of the call outcome, and interprets the returned
    /// integer (`1` granted, `0` denied, anything else an error).
    pub fn evaluate(&self, query: &PermissionQuery) -> Result<Decision, BridgeError> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let guest = guard.as_mut().ok_or(BridgeError::ShutDown)?;
        guest.evaluate(query)
    }

    /// Release the guest instance and all backing resources.
    ///
    /// Idempotent, and safe to call at any point; subsequent
    /// [`evaluate`](Self::evaluate) calls report an error.
    pub fn shutdown(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            log::debug!("guest instance released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_datasource::MemSource;

    #[test]
    fn test_rejects_invalid_wasm() {
        let result = PermissionBridge::new(&[0xde, 0xad], Arc::new(MemSource::new()));
        assert!(matches!(result, Err(BridgeError::Wasmtime(_))));
    }

    #[test]
    fn test_rejects_module_without_abi() {
        let result = PermissionBridge::new(b"(module)", Arc::new(MemSource::new()));
        assert!(matches!(result, Err(BridgeError::Validation(_))));
    }

    #[test]
    fn test_decision_is_granted() {
        assert!(Decision::Granted.is_granted());
        assert!(!Decision::Denied.is_granted());
    }
}
