//! WASM runtime wrapper
//!
//! Provides abstractions over wasmtime for loading and running the module.
//!
//! # Key Types
//!
//! - [`BridgeEngine`] - Shared WASM engine (one per application)
//! - [`ModuleInstance`] - Loaded and instantiated module with its exports
//! - [`BridgeContext`] - Store data every host import works against

mod context;
mod engine;
mod instance;

#[cfg(test)]
mod tests;

pub use context::BridgeContext;
pub use engine::BridgeEngine;
pub use instance::{ModuleInstance, ScrollParam};
