//! Repeating timer imports

use wasmtime::Caller;

use crate::gl::GlApi;
use crate::wasm::BridgeContext;

/// Schedule `call(func, arg)` every `delay_ms` milliseconds
pub(super) fn set_interval<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    func: u32,
    delay_ms: i32,
    arg: u32,
) -> u32 {
    let id = caller.data_mut().timers.start(func, delay_ms, arg);
    tracing::debug!("Timer {} started (function {}, every {}ms)", id, func, delay_ms);
    id
}

/// Unknown or already cleared ids are ignored
pub(super) fn clear_interval<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, id: u32) {
    if caller.data_mut().timers.cancel(id) {
        tracing::debug!("Timer {} cleared", id);
    }
}
