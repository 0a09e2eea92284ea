//! A loaded and instantiated module

use std::time::Instant;

use anyhow::{Context, Result};
use fcsim_shared::abi;
use wasmtime::{
    Func, Instance, Linker, Memory, Module, Store, TypedFunc, Val, ValType, WasmParams,
    WasmResults,
};

use super::context::BridgeContext;
use super::engine::BridgeEngine;
use crate::error::BridgeError;
use crate::gl::GlApi;
use crate::memory::read_bytes;
use crate::runtime::RuntimeConfig;

/// Parameter type the module declared for `scroll`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollParam {
    F32,
    F64,
    /// Integer builds receive the delta truncated toward zero
    I32,
}

impl ScrollParam {
    fn from_val_type(ty: &ValType) -> Option<Self> {
        match ty {
            ValType::F32 => Some(Self::F32),
            ValType::F64 => Some(Self::F64),
            ValType::I32 => Some(Self::I32),
            _ => None,
        }
    }

    fn value(self, delta: f64) -> Val {
        match self {
            Self::F32 => Val::F32((delta as f32).to_bits()),
            Self::F64 => Val::F64(delta.to_bits()),
            Self::I32 => Val::I32(delta as i32),
        }
    }
}

/// Exports the host calls; all optional until something needs them
struct ModuleExports {
    init: Option<TypedFunc<(), ()>>,
    resize: Option<TypedFunc<(i32, i32), ()>>,
    draw: Option<TypedFunc<(), ()>>,
    key_down: Option<TypedFunc<i32, ()>>,
    key_up: Option<TypedFunc<i32, ()>>,
    button_down: Option<TypedFunc<i32, ()>>,
    button_up: Option<TypedFunc<i32, ()>>,
    move_to: Option<TypedFunc<(i32, i32), ()>>,
    scroll: Option<(Func, ScrollParam)>,
    call: Option<TypedFunc<(u32, u32), ()>>,
    malloc: Option<TypedFunc<u32, u32>>,
    read_xml: Option<TypedFunc<(u32, u32), i32>>,
    sim_new: Option<TypedFunc<u32, u32>>,
}

impl ModuleExports {
    fn resolve<G: GlApi>(store: &mut Store<BridgeContext<G>>, instance: &Instance) -> Result<Self> {
        Ok(Self {
            init: typed_export(store, instance, abi::EXPORT_INIT)?,
            resize: typed_export(store, instance, abi::EXPORT_RESIZE)?,
            draw: typed_export(store, instance, abi::EXPORT_DRAW)?,
            key_down: typed_export(store, instance, abi::EXPORT_KEY_DOWN)?,
            key_up: typed_export(store, instance, abi::EXPORT_KEY_UP)?,
            button_down: typed_export(store, instance, abi::EXPORT_BUTTON_DOWN)?,
            button_up: typed_export(store, instance, abi::EXPORT_BUTTON_UP)?,
            move_to: typed_export(store, instance, abi::EXPORT_MOVE)?,
            scroll: scroll_export(store, instance)?,
            call: typed_export(store, instance, abi::EXPORT_CALL)?,
            malloc: typed_export(store, instance, abi::EXPORT_MALLOC)?,
            read_xml: typed_export(store, instance, abi::EXPORT_READ_XML)?,
            sim_new: typed_export(store, instance, abi::EXPORT_SIM_NEW)?,
        })
    }
}

/// Look up an optional export; present with the wrong signature is an error
fn typed_export<G: GlApi, P: WasmParams, R: WasmResults>(
    store: &mut Store<BridgeContext<G>>,
    instance: &Instance,
    name: &'static str,
) -> Result<Option<TypedFunc<P, R>>> {
    match instance.get_func(&mut *store, name) {
        None => Ok(None),
        Some(func) => func
            .typed::<P, R>(&*store)
            .map(Some)
            .with_context(|| format!("Export '{}' has an unexpected signature", name)),
    }
}

fn scroll_export<G: GlApi>(
    store: &mut Store<BridgeContext<G>>,
    instance: &Instance,
) -> Result<Option<(Func, ScrollParam)>> {
    let Some(func) = instance.get_func(&mut *store, abi::EXPORT_SCROLL) else {
        return Ok(None);
    };
    let ty = func.ty(&*store);
    let params: Vec<ValType> = ty.params().collect();
    let param = match params.as_slice() {
        [only] if ty.results().len() == 0 => ScrollParam::from_val_type(only),
        _ => None,
    };
    match param {
        Some(param) => Ok(Some((func, param))),
        None => anyhow::bail!(
            "Export '{}' must take one numeric parameter and return nothing",
            abi::EXPORT_SCROLL
        ),
    }
}

/// Call an export if the module has it
fn call_optional<G: GlApi, P: WasmParams, R: WasmResults>(
    store: &mut Store<BridgeContext<G>>,
    func: Option<&TypedFunc<P, R>>,
    name: &'static str,
    params: P,
) -> Result<()> {
    if let Some(func) = func {
        func.call(store, params)
            .with_context(|| format!("WASM {}() failed", name))?;
    }
    Ok(())
}

/// One instantiated module and the store it runs in
pub struct ModuleInstance<G: GlApi> {
    store: Store<BridgeContext<G>>,
    instance: Instance,
    exports: ModuleExports,
}

impl<G: GlApi> ModuleInstance<G> {
    /// Instantiate `module` against the bridge imports in `linker`
    pub fn new(
        engine: &BridgeEngine,
        module: &Module,
        linker: &Linker<BridgeContext<G>>,
        gl: G,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        BridgeEngine::validate_module_memory(module, config.ram_limit)?;

        let mut store = Store::new(engine.engine(), BridgeContext::new(gl, config));
        store.limiter(|ctx| &mut ctx.limits);

        let instance = linker
            .instantiate(&mut store, module)
            .context("Failed to instantiate WASM module")?;

        let memory = instance.get_memory(&mut store, abi::EXPORT_MEMORY);
        if memory.is_none() {
            tracing::warn!("Module exports no '{}'", abi::EXPORT_MEMORY);
        }
        store.data_mut().memory = memory;
        store.data_mut().strlen = typed_export(&mut store, &instance, abi::EXPORT_STRLEN)?;

        let exports = ModuleExports::resolve(&mut store, &instance)?;
        tracing::debug!(
            "Module instantiated (strlen: {}, trampoline: {})",
            store.data().has_strlen(),
            exports.call.is_some()
        );

        Ok(Self {
            store,
            instance,
            exports,
        })
    }

    pub fn init(&mut self) -> Result<()> {
        call_optional(&mut self.store, self.exports.init.as_ref(), abi::EXPORT_INIT, ())
    }

    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        call_optional(
            &mut self.store,
            self.exports.resize.as_ref(),
            abi::EXPORT_RESIZE,
            (width, height),
        )
    }

    pub fn draw(&mut self) -> Result<()> {
        call_optional(&mut self.store, self.exports.draw.as_ref(), abi::EXPORT_DRAW, ())
    }

    pub fn key_down(&mut self, code: i32) -> Result<()> {
        call_optional(&mut self.store, self.exports.key_down.as_ref(), abi::EXPORT_KEY_DOWN, code)
    }

    pub fn key_up(&mut self, code: i32) -> Result<()> {
        call_optional(&mut self.store, self.exports.key_up.as_ref(), abi::EXPORT_KEY_UP, code)
    }

    pub fn button_down(&mut self, code: i32) -> Result<()> {
        call_optional(
            &mut self.store,
            self.exports.button_down.as_ref(),
            abi::EXPORT_BUTTON_DOWN,
            code,
        )
    }

    pub fn button_up(&mut self, code: i32) -> Result<()> {
        call_optional(
            &mut self.store,
            self.exports.button_up.as_ref(),
            abi::EXPORT_BUTTON_UP,
            code,
        )
    }

    /// Pointer position in surface pixels
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        call_optional(&mut self.store, self.exports.move_to.as_ref(), abi::EXPORT_MOVE, (x, y))
    }

    /// Forward an already scaled wheel value
    pub fn scroll(&mut self, delta: f64) -> Result<()> {
        if let Some((func, param)) = &self.exports.scroll {
            func.call(&mut self.store, &[param.value(delta)], &mut [])
                .with_context(|| format!("WASM {}() failed", abi::EXPORT_SCROLL))?;
        }
        Ok(())
    }

    /// Parameter type of the module's `scroll`, if exported
    pub fn scroll_param(&self) -> Option<ScrollParam> {
        self.exports.scroll.as_ref().map(|(_, param)| *param)
    }

    /// Invoke the module's indirect-call trampoline
    pub fn call(&mut self, function_index: u32, argument: u32) -> Result<()> {
        let call = self
            .exports
            .call
            .as_ref()
            .ok_or(BridgeError::MissingExport(abi::EXPORT_CALL))?;
        call.call(&mut self.store, (function_index, argument))
            .with_context(|| format!("WASM call({}, {}) failed", function_index, argument))
    }

    /// Deliver every timer tick due at `now`. Returns the number delivered.
    pub fn fire_timers(&mut self, now: Instant) -> Result<usize> {
        self.store.data_mut().timers.advance(now);
        let mut fired = 0;
        while let Some(tick) = self.store.data_mut().timers.pop_due() {
            tracing::trace!("Timer {} fired", tick.id);
            self.call(tick.function_index, tick.argument)
                .with_context(|| format!("Timer {} callback failed", tick.id))?;
            fired += 1;
        }
        Ok(fired)
    }

    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.store.data().timers.next_deadline()
    }

    /// Allocate `size` bytes with the module's own allocator
    pub fn malloc(&mut self, size: u32) -> Result<u32> {
        let malloc = self
            .exports
            .malloc
            .as_ref()
            .ok_or(BridgeError::MissingExport(abi::EXPORT_MALLOC))?;
        let ptr = malloc
            .call(&mut self.store, size)
            .with_context(|| format!("WASM malloc({}) failed", size))?;
        if ptr == 0 {
            anyhow::bail!("WASM malloc({}) returned null", size);
        }
        Ok(ptr)
    }

    /// Copy `bytes` into fresh module memory followed by a NUL
    pub fn stage_bytes(&mut self, bytes: &[u8]) -> Result<u32> {
        let len = u32::try_from(bytes.len() + 1).context("Staged payload exceeds 4GB")?;
        let ptr = self.malloc(len)?;
        self.write_memory(ptr, bytes)?;
        self.write_memory(ptr + len - 1, &[0])?;
        Ok(ptr)
    }

    fn memory(&self) -> Result<Memory> {
        Ok(self.store.data().memory.ok_or(BridgeError::MissingMemory)?)
    }

    pub fn read_memory(&self, offset: u32, len: u32) -> Result<Vec<u8>> {
        read_bytes(self.memory()?, &self.store, offset, len)
    }

    pub fn write_memory(&mut self, offset: u32, bytes: &[u8]) -> Result<()> {
        let memory = self.memory()?;
        memory
            .write(&mut self.store, offset as usize, bytes)
            .map_err(|_| BridgeError::OutOfBounds {
                offset: offset as u64,
                len: bytes.len() as u64,
                size: memory.data_size(&self.store) as u64,
            })?;
        Ok(())
    }

    /// Current linear memory contents
    pub fn memory_bytes(&self) -> Result<&[u8]> {
        Ok(self.memory()?.data(&self.store))
    }

    /// Look up any exported function by name
    pub fn get_func(&mut self, name: &str) -> Option<Func> {
        self.instance.get_func(&mut self.store, name)
    }

    pub(crate) fn read_xml_export(&self) -> Option<TypedFunc<(u32, u32), i32>> {
        self.exports.read_xml.clone()
    }

    pub(crate) fn sim_new_export(&self) -> Option<TypedFunc<u32, u32>> {
        self.exports.sim_new.clone()
    }

    pub fn store(&self) -> &Store<BridgeContext<G>> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<BridgeContext<G>> {
        &mut self.store
    }

    pub fn context(&self) -> &BridgeContext<G> {
        self.store.data()
    }

    pub fn context_mut(&mut self) -> &mut BridgeContext<G> {
        self.store.data_mut()
    }

    pub fn gl(&self) -> &G {
        &self.store.data().gl
    }

    pub fn gl_mut(&mut self) -> &mut G {
        &mut self.store.data_mut().gl
    }
}
