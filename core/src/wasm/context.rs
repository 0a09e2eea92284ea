//! Store data for one module instance

use wasmtime::{Memory, StoreLimits, StoreLimitsBuilder, TypedFunc};

use crate::diagnostics::Diagnostics;
use crate::gl::GlApi;
use crate::handles::HandleTable;
use crate::runtime::RuntimeConfig;
use crate::timer::TimerQueue;

/// Everything host imports can reach while the module runs
///
/// Lives inside the `wasmtime::Store`, so imports see it through their
/// `Caller` and it is never shared across threads.
pub struct BridgeContext<G: GlApi> {
    /// Linear memory (set after instantiation)
    pub memory: Option<Memory>,

    /// The module's own `strlen`, used for NUL-terminated strings
    pub(crate) strlen: Option<TypedFunc<u32, u32>>,

    /// Native objects the module refers to by handle
    pub handles: HandleTable<Option<G::Object>>,

    /// Native graphics context
    pub gl: G,

    pub timers: TimerQueue,
    pub diagnostics: Diagnostics,

    pub(crate) limits: StoreLimits,
}

impl<G: GlApi> BridgeContext<G> {
    pub fn new(gl: G, config: &RuntimeConfig) -> Self {
        Self {
            memory: None,
            strlen: None,
            handles: HandleTable::new(),
            gl,
            timers: TimerQueue::new(config.min_timer_interval()),
            diagnostics: Diagnostics::new(config.diagnostic_history),
            limits: StoreLimitsBuilder::new()
                .memory_size(config.ram_limit)
                .build(),
        }
    }

    /// Whether the module exports `strlen`
    pub fn has_strlen(&self) -> bool {
        self.strlen.is_some()
    }
}
