//! Guest module validation — ABI compatibility checks.
//!
//! Validates that a compiled guest module meets the Warden ABI before
//! instantiation:
//!
//! 1. Linear memory exported as `memory`
//! 2. Required exports present with correct signatures
//!    (`hasPerm`, `malloc`, `free`)
//! 3. All imports are functions from the `app` host module

use wasmtime::{ExternType, Module, ValType};

use crate::error::BridgeError;

/// Check if a ValType is i32.
fn is_i32(vt: &ValType) -> bool {
    matches!(vt, ValType::I32)
}

/// Expected export: (name, param_count_of_i32, result_count_of_i32).
/// All params and results are i32 in the Warden ABI.
const REQUIRED_EXPORTS: &[(&str, usize, usize)] = &[
    ("hasPerm", 3, 1),
    ("malloc", 1, 1),
    ("free", 2, 0),
];

/// Allowed import module name.
const ALLOWED_IMPORT_MODULE: &str = "app";

/// Validate that a guest module meets Warden ABI requirements.
pub fn validate_module(module: &Module) -> Result<(), BridgeError> {
    validate_exports(module)?;
    validate_imports(module)?;
    Ok(())
}

/// Check that all required exports are present with correct signatures.
fn validate_exports(module: &Module) -> Result<(), BridgeError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == "memory" && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(BridgeError::Validation(
            "module must export 'memory'".into(),
        ));
    }

    for &(name, expected_param_count, expected_result_count) in REQUIRED_EXPORTS {
        let export = module
            .exports()
            .find(|e| e.name() == name)
            .ok_or_else(|| {
                BridgeError::Validation(format!("missing required export: {}", name))
            })?;

        let func_ty = match export.ty() {
            ExternType::Func(ft) => ft,
            _ => {
                return Err(BridgeError::Validation(format!(
                    "export '{}' must be a function",
                    name
                )));
            }
        };

        let params: Vec<ValType> = func_ty.params().collect();
        let results: Vec<ValType> = func_ty.results().collect();

        if params.len() != expected_param_count || !params.iter().all(is_i32) {
            return Err(BridgeError::Validation(format!(
                "export '{}' has wrong param signature: expected {} i32 params, got {} params",
                name,
                expected_param_count,
                params.len()
            )));
        }

        if results.len() != expected_result_count || !results.iter().all(is_i32) {
            return Err(BridgeError::Validation(format!(
                "export '{}' has wrong result signature: expected {} i32 results, got {} results",
                name,
                expected_result_count,
                results.len()
            )));
        }
    }

    Ok(())
}

/// Check that all imports are functions from the `app` module.
fn validate_imports(module: &Module) -> Result<(), BridgeError> {
    for import in module.imports() {
        let module_name = import.module();

        if module_name != ALLOWED_IMPORT_MODULE {
            return Err(BridgeError::Validation(format!(
                "import from unknown module '{}' (only '{}' allowed): {}",
                module_name,
                ALLOWED_IMPORT_MODULE,
                import.name()
            )));
        }

        if !matches!(import.ty(), ExternType::Func(_)) {
            return Err(BridgeError::Validation(format!(
                "non-function import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }
    }

    Ok(())
}
