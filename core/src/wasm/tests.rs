//! Tests for the WASM engine and module instance

use super::*;
use crate::error::BridgeError;
use crate::runtime::RuntimeConfig;
use crate::test_utils::{WAT_MALLOC, call_export, instantiate, try_instantiate};

// ============================================================================
// BridgeEngine Tests
// ============================================================================

#[test]
fn test_engine_creation() {
    let engine = BridgeEngine::new();
    assert!(engine.is_ok());
}

#[test]
fn test_engine_load_invalid_module() {
    let engine = BridgeEngine::new().unwrap();
    let result = engine.load_module(b"not valid wasm");
    assert!(result.is_err());
}

#[test]
fn test_engine_load_valid_module() {
    let engine = BridgeEngine::new().unwrap();
    let wasm = wat::parse_str("(module)").unwrap();
    assert!(engine.load_module(&wasm).is_ok());
}

#[test]
fn test_memory_minimum_above_limit_is_rejected() {
    let config = RuntimeConfig {
        ram_limit: 2 * 65536,
        ..RuntimeConfig::default()
    };
    let err = try_instantiate(r#"(module (memory (export "memory") 3))"#, &config)
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "linear memory `memory` starts at 3 pages; it requires 196608 bytes, over the 131072 byte RAM limit"
    );
}

#[test]
fn test_memory_growth_is_capped() {
    let config = RuntimeConfig {
        ram_limit: 2 * 65536,
        ..RuntimeConfig::default()
    };
    let mut module = try_instantiate(
        r#"(module
            (memory (export "memory") 1)
            (func (export "grow") (param i32) (result i32)
                (memory.grow (local.get 0))))"#,
        &config,
    )
    .unwrap();

    let grown: i32 = call_export(&mut module, "grow", 1).unwrap();
    assert_eq!(grown, 1);
    let refused: i32 = call_export(&mut module, "grow", 1).unwrap();
    assert_eq!(refused, -1);
    assert_eq!(module.memory_bytes().unwrap().len(), 2 * 65536);
}

// ============================================================================
// ModuleInstance Tests
// ============================================================================

#[test]
fn test_instance_without_any_exports() {
    let mut module = instantiate("(module)");
    assert!(!module.context().has_strlen());
    assert_eq!(module.scroll_param(), None);

    // Every lifecycle export is optional
    module.init().unwrap();
    module.resize(10, 10).unwrap();
    module.draw().unwrap();
    module.key_down(65).unwrap();
    module.scroll(1.0).unwrap();

    // Memory access needs an exported memory
    let err = module.read_memory(0, 1).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BridgeError>(),
        Some(&BridgeError::MissingMemory)
    );
}

#[test]
fn test_instance_records_strlen_export() {
    let module = instantiate(
        r#"(module
            (memory (export "memory") 1)
            (func (export "strlen") (param i32) (result i32) (i32.const 0)))"#,
    );
    assert!(module.context().has_strlen());
}

#[test]
fn test_export_with_wrong_signature_fails_instantiation() {
    let err = try_instantiate(
        r#"(module (func (export "resize") (param f32 f32)))"#,
        &RuntimeConfig::default(),
    )
    .err()
    .unwrap();
    assert!(format!("{err:#}").contains("Export 'resize' has an unexpected signature"));
}

#[test]
fn test_scroll_with_two_params_is_rejected() {
    let err = try_instantiate(
        r#"(module (func (export "scroll") (param f32 f32)))"#,
        &RuntimeConfig::default(),
    )
    .err()
    .unwrap();
    assert!(err.to_string().contains("Export 'scroll' must take one numeric parameter"));
}

#[test]
fn test_scroll_with_result_is_rejected() {
    let result = try_instantiate(
        r#"(module (func (export "scroll") (param f64) (result i32) (i32.const 0)))"#,
        &RuntimeConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_scroll_param_types_are_detected() {
    for (ty, expected) in [
        ("f32", ScrollParam::F32),
        ("f64", ScrollParam::F64),
        ("i32", ScrollParam::I32),
    ] {
        let module = instantiate(&format!(
            r#"(module (func (export "scroll") (param {ty})))"#
        ));
        assert_eq!(module.scroll_param(), Some(expected));
    }
}

#[test]
fn test_init_trap_propagates() {
    let mut module = instantiate(r#"(module (func (export "init") unreachable))"#);
    let err = module.init().unwrap_err();
    assert_eq!(err.to_string(), "WASM init() failed");
}

#[test]
fn test_call_without_trampoline() {
    let mut module = instantiate("(module)");
    let err = module.call(0, 0).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BridgeError>(),
        Some(&BridgeError::MissingExport("call"))
    );
}

// ============================================================================
// Staging
// ============================================================================

fn allocator_module() -> String {
    format!(
        r#"(module
            (memory (export "memory") 1)
            (global $heap (mut i32) (i32.const 1024))
            {WAT_MALLOC})"#
    )
}

#[test]
fn test_stage_bytes_appends_nul() {
    let mut module = instantiate(&allocator_module());

    let first = module.stage_bytes(b"abc").unwrap();
    let second = module.stage_bytes(b"").unwrap();

    assert_eq!(first, 1024);
    assert_eq!(module.read_memory(first, 4).unwrap(), b"abc\0");
    // Bump allocator rounds up to 8
    assert_eq!(second, 1032);
    assert_eq!(module.read_memory(second, 1).unwrap(), b"\0");
}

#[test]
fn test_staging_requires_malloc() {
    let mut module = instantiate(r#"(module (memory (export "memory") 1))"#);
    let err = module.stage_bytes(b"abc").unwrap_err();
    assert_eq!(
        err.downcast_ref::<BridgeError>(),
        Some(&BridgeError::MissingExport("malloc"))
    );
}

#[test]
fn test_null_malloc_result_is_an_error() {
    let mut module = instantiate(
        r#"(module
            (memory (export "memory") 1)
            (func (export "malloc") (param i32) (result i32) (i32.const 0)))"#,
    );
    let err = module.malloc(16).unwrap_err();
    assert_eq!(err.to_string(), "WASM malloc(16) returned null");
}

#[test]
fn test_write_past_memory_end_is_out_of_bounds() {
    let mut module = instantiate(r#"(module (memory (export "memory") 1))"#);
    let err = module.write_memory(65534, b"abc").unwrap_err();
    assert_eq!(
        err.downcast_ref::<BridgeError>(),
        Some(&BridgeError::OutOfBounds {
            offset: 65534,
            len: 3,
            size: 65536
        })
    );

    module.write_memory(65533, b"abc").unwrap();
    assert_eq!(module.read_memory(65533, 3).unwrap(), b"abc");
}
