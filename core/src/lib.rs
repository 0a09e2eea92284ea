//! fcsim Core - host bridge for the sandboxed fcsim module
//!
//! The module is compiled to wasm and draws through a WebGL-style import
//! surface. This crate provides that surface on top of a native graphics
//! context and drives the module frame by frame.
//!
//! # Architecture
//!
//! - [`BridgeEngine`] / [`ModuleInstance`] - wasmtime engine and one loaded module
//! - [`ffi`] - imports the module links against (GL calls, timers, diagnostics)
//! - [`GlApi`] - the native graphics boundary, with a [`HeadlessGl`] recorder
//! - [`FrameDriver`] - init, resize, draw, input and timer delivery
//! - [`scene`] - decode a loaded design into drawable shapes
//! - [`app`] - winit event loop, configuration and logging

pub mod app;
pub mod diagnostics;
pub mod error;
pub mod ffi;
pub mod format;
pub mod gl;
pub mod handles;
pub mod input;
pub mod memory;
pub mod runtime;
pub mod scene;
#[cfg(test)]
pub mod test_utils;
pub mod timer;
pub mod wasm;

pub use diagnostics::{DiagnosticLine, DiagnosticSource, Diagnostics};
pub use error::BridgeError;
pub use ffi::register_bridge_ffi;
pub use format::{FormatIssue, Formatted, format_packed};
pub use gl::{GlApi, GlCall, HeadlessGl};
pub use handles::{Handle, HandleTable};
pub use memory::MemoryView;
pub use runtime::{DriverState, FrameDriver, RuntimeConfig, SurfaceSize};
pub use scene::{DebugScene, FilledShape, LoadedDesign, Shape};
pub use timer::{TimerId, TimerQueue, TimerTick};
pub use wasm::{BridgeContext, BridgeEngine, ModuleInstance, ScrollParam};
