//! Compilation of fcsim modules

use anyhow::{Context, Result};
use fcsim_shared::WASM_PAGE_SIZE;
use wasmtime::{Engine, ExternType, MemoryType, Module};

/// wasmtime engine shared by every module the host loads
pub struct BridgeEngine {
    engine: Engine,
}

impl BridgeEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: Engine::default(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile wasm bytes or WAT text
    pub fn load_module(&self, bytes: &[u8]) -> Result<Module> {
        Module::new(&self.engine, bytes).context("Failed to compile fcsim module")
    }

    /// Refuse modules whose initial linear memory already exceeds `ram_limit`
    ///
    /// Growth beyond the limit is handled later by the store limiter.
    pub fn validate_module_memory(module: &Module, ram_limit: usize) -> Result<()> {
        let memories = module.exports().filter_map(|export| match export.ty() {
            ExternType::Memory(ty) => Some((export.name(), ty)),
            _ => None,
        });

        for (name, ty) in memories {
            let initial = initial_bytes(&ty);
            if initial > ram_limit as u64 {
                anyhow::bail!(
                    "linear memory `{}` starts at {} pages; it requires {} bytes, over the {} byte RAM limit",
                    name,
                    ty.minimum(),
                    initial,
                    ram_limit
                );
            }
            if ty.maximum().is_none() {
                tracing::debug!("linear memory `{}` is unbounded, capped at {} bytes", name, ram_limit);
            }
        }
        Ok(())
    }
}

fn initial_bytes(ty: &MemoryType) -> u64 {
    ty.minimum().saturating_mul(WASM_PAGE_SIZE as u64)
}
