//! Diagnostic output from the module

use anyhow::Result;
use wasmtime::Caller;

use crate::diagnostics::DiagnosticSource;
use crate::format::format_packed;
use crate::gl::GlApi;
use crate::memory::{MemoryView, decode_utf8, linear_memory};
use crate::wasm::BridgeContext;

/// Print `len` bytes of UTF-8 text at `ptr`
pub(super) fn print_slice<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, ptr: u32, len: u32) -> Result<()> {
    let text = decode_utf8(&caller, ptr, len)?;
    caller.data_mut().diagnostics.push(DiagnosticSource::Slice, text);
    Ok(())
}

/// Render a format string against a packed argument buffer
///
/// Returns the number of bytes produced, like the C function it stands in for.
pub(super) fn printf<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, format: u32, args: u32) -> Result<i32> {
    let memory = linear_memory(&caller)?;
    let formatted = {
        let view = MemoryView::new(memory.data(&caller));
        format_packed(view.tail(format)?, view.tail(args)?)?
    };

    for issue in &formatted.issues {
        tracing::warn!("printf: {}", issue);
    }
    let written = i32::try_from(formatted.text.len()).unwrap_or(i32::MAX);
    caller
        .data_mut()
        .diagnostics
        .push(DiagnosticSource::Formatted, formatted.text);
    Ok(written)
}
