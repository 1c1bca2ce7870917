//! `warden-bridge` — Wasmtime-based host bridge for the Warden
//! permission guest.
//!
//! This crate embeds a compiled guest module inside the host process and
//! uses it to answer one yes/no permission question at a time. It owns:
//!
//! - **The call contract:** `hasPerm(subject, context, permission) -> i32`
//!   against a guest exporting `hasPerm`, `malloc`, `free`, and `memory`
//! - **String marshalling:** NUL-terminated host→guest transfers and
//!   descriptor-based guest→host transfers
//! - **The data callback:** `app::getData`, resolving keys against a
//!   read-only [`warden_datasource::DataSource`] and handing values back
//!   on the guest heap
//! - **Call serialization:** one exclusive lock around the guest
//!   instance, covering nested callback work
//!
//! The primary entry point is [`PermissionBridge::evaluate`].

pub mod bridge;
pub mod error;
pub mod host;
pub mod marshal;
pub mod memory;
pub mod validation;

pub use bridge::{Decision, PermissionBridge, PermissionQuery};
pub use error::BridgeError;
