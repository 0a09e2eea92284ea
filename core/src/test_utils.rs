//! Shared test utilities for unit tests

use anyhow::{Result, anyhow};
use wasmtime::{Linker, WasmParams, WasmResults};

use crate::ffi::register_bridge_ffi;
use crate::gl::HeadlessGl;
use crate::runtime::RuntimeConfig;
use crate::wasm::{BridgeContext, BridgeEngine, ModuleInstance};

/// C-style `strlen` in WAT, counting its calls in the `$strlen_calls` global
///
/// Modules that splice this in must declare
/// `(global $strlen_calls (mut i32) (i32.const 0))`.
pub const WAT_STRLEN: &str = r#"
    (func $strlen (export "strlen") (param $p i32) (result i32)
        (local $n i32)
        (global.set $strlen_calls (i32.add (global.get $strlen_calls) (i32.const 1)))
        (block $done
            (loop $scan
                (br_if $done (i32.eqz (i32.load8_u (i32.add (local.get $p) (local.get $n)))))
                (local.set $n (i32.add (local.get $n) (i32.const 1)))
                (br $scan)))
        (local.get $n))
    (func (export "strlen_calls") (result i32) (global.get $strlen_calls))
"#;

/// Bump allocator `malloc` in WAT, starting at `$heap`
///
/// Modules that splice this in must declare `(global $heap (mut i32) ...)`.
pub const WAT_MALLOC: &str = r#"
    (func (export "malloc") (param $size i32) (result i32)
        (local $ptr i32)
        (local.set $ptr (global.get $heap))
        (global.set $heap (i32.and
            (i32.add (i32.add (global.get $heap) (local.get $size)) (i32.const 7))
            (i32.const -8)))
        (local.get $ptr))
"#;

/// Linker with every bridge import registered
pub fn bridge_linker(engine: &BridgeEngine) -> Linker<BridgeContext<HeadlessGl>> {
    let mut linker = Linker::new(engine.engine());
    register_bridge_ffi(&mut linker).unwrap();
    linker
}

/// Instantiate WAT text against a headless context
pub fn try_instantiate(wat: &str, config: &RuntimeConfig) -> Result<ModuleInstance<HeadlessGl>> {
    let engine = BridgeEngine::new()?;
    let wasm = wat::parse_str(wat)?;
    let module = engine.load_module(&wasm)?;
    let linker = bridge_linker(&engine);
    ModuleInstance::new(&engine, &module, &linker, HeadlessGl::new(), config)
}

pub fn instantiate(wat: &str) -> ModuleInstance<HeadlessGl> {
    try_instantiate(wat, &RuntimeConfig::default()).unwrap()
}

/// Call any export of the module by name
pub fn call_export<P: WasmParams, R: WasmResults>(
    module: &mut ModuleInstance<HeadlessGl>,
    name: &str,
    params: P,
) -> Result<R> {
    let func = module
        .get_func(name)
        .ok_or_else(|| anyhow!("missing export '{}'", name))?;
    let typed = func.typed::<P, R>(module.store())?;
    typed.call(module.store_mut(), params)
}

/// Little-endian i32 values as a WAT data string
pub fn wat_i32s(values: &[i32]) -> String {
    values
        .iter()
        .flat_map(|value| value.to_le_bytes())
        .map(|byte| format!("\\{:02x}", byte))
        .collect()
}
