//! Graphics imports: objects, buffers, vertex state, uniforms and draws
//!
//! Object arguments arrive as handles and are resolved through the
//! [`HandleTable`](crate::handles::HandleTable). Buffer arguments are sliced
//! out of linear memory for the duration of the native call only.

use anyhow::Result;
use wasmtime::Caller;

use crate::error::BridgeError;
use crate::gl::GlApi;
use crate::memory::{MemoryView, linear_memory};
use crate::wasm::BridgeContext;

/// Reject negative sizes the module passed for a byte range
pub(super) fn byte_len(function: &'static str, size: i32) -> Result<u32, BridgeError> {
    u32::try_from(size).map_err(|_| BridgeError::malformed(function, format!("negative size {}", size)))
}

// ============================================================================
// Object lifecycle
// ============================================================================

pub(super) fn create_buffer<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>) -> u32 {
    let ctx = caller.data_mut();
    let buffer = ctx.gl.create_buffer();
    ctx.handles.register(buffer)
}

pub(super) fn create_texture<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>) -> u32 {
    let ctx = caller.data_mut();
    let texture = ctx.gl.create_texture();
    ctx.handles.register(texture)
}

pub(super) fn create_program<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>) -> u32 {
    let ctx = caller.data_mut();
    let program = ctx.gl.create_program();
    ctx.handles.register(program)
}

pub(super) fn create_shader<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, shader_type: u32) -> u32 {
    let ctx = caller.data_mut();
    let shader = ctx.gl.create_shader(shader_type);
    ctx.handles.register(shader)
}

/// The handle stays allocated; only the native object goes away
pub(super) fn delete_buffer<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, buffer: u32) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.delete_buffer(handles.resolve_object(buffer)?);
    Ok(())
}

pub(super) fn delete_program<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, program: u32) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.delete_program(handles.resolve_object(program)?);
    Ok(())
}

pub(super) fn delete_shader<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, shader: u32) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.delete_shader(handles.resolve_object(shader)?);
    Ok(())
}

// ============================================================================
// Programs
// ============================================================================

pub(super) fn compile_shader<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, shader: u32) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.compile_shader(handles.resolve_object(shader)?);
    Ok(())
}

pub(super) fn attach_shader<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    program: u32,
    shader: u32,
) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.attach_shader(handles.resolve_object(program)?, handles.resolve_object(shader)?);
    Ok(())
}

pub(super) fn link_program<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, program: u32) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.link_program(handles.resolve_object(program)?);
    Ok(())
}

pub(super) fn use_program<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, program: u32) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.use_program(handles.resolve_object(program)?);
    Ok(())
}

// ============================================================================
// Buffers
// ============================================================================

pub(super) fn bind_buffer<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    target: u32,
    buffer: u32,
) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.bind_buffer(target, handles.resolve_object(buffer)?);
    Ok(())
}

/// Upload `size` bytes at `data` to the buffer bound to `target`
pub(super) fn buffer_data<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    target: u32,
    size: i32,
    data: u32,
    usage: u32,
) -> Result<()> {
    let size = byte_len("glBufferData", size)?;
    let memory = linear_memory(&caller)?;
    let (bytes, ctx) = memory.data_and_store_mut(&mut caller);
    let view = MemoryView::new(bytes).window(data, size)?;
    ctx.gl.buffer_data(target, view.bytes(), usage);
    Ok(())
}

pub(super) fn buffer_sub_data<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    target: u32,
    offset: i32,
    size: i32,
    data: u32,
) -> Result<()> {
    let size = byte_len("glBufferSubData", size)?;
    let memory = linear_memory(&caller)?;
    let (bytes, ctx) = memory.data_and_store_mut(&mut caller);
    let view = MemoryView::new(bytes).window(data, size)?;
    ctx.gl.buffer_sub_data(target, offset, view.bytes());
    Ok(())
}

// ============================================================================
// Vertex state
// ============================================================================

pub(super) fn enable_vertex_attrib_array<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, index: u32) {
    caller.data_mut().gl.enable_vertex_attrib_array(index);
}

pub(super) fn disable_vertex_attrib_array<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, index: u32) {
    caller.data_mut().gl.disable_vertex_attrib_array(index);
}

pub(super) fn vertex_attrib_pointer<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    index: u32,
    size: i32,
    data_type: u32,
    normalized: i32,
    stride: i32,
    offset: i32,
) {
    caller
        .data_mut()
        .gl
        .vertex_attrib_pointer(index, size, data_type, normalized != 0, stride, offset);
}

// ============================================================================
// Uniforms
// ============================================================================

pub(super) fn uniform_2f<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    location: u32,
    x: f32,
    y: f32,
) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.uniform_2f(handles.resolve_object(location)?, x, y);
    Ok(())
}

pub(super) fn uniform_3f<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    location: u32,
    x: f32,
    y: f32,
    z: f32,
) -> Result<()> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.uniform_3f(handles.resolve_object(location)?, x, y, z);
    Ok(())
}

// ============================================================================
// Draws and frame state
// ============================================================================

pub(super) fn draw_arrays<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, mode: u32, first: i32, count: i32) {
    caller.data_mut().gl.draw_arrays(mode, first, count);
}

pub(super) fn draw_elements<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    mode: u32,
    count: i32,
    element_type: u32,
    offset: i32,
) {
    caller
        .data_mut()
        .gl
        .draw_elements(mode, count, element_type, offset);
}

pub(super) fn clear<G: GlApi>(mut caller: Caller<'_, BridgeContext<G>>, mask: u32) {
    caller.data_mut().gl.clear(mask);
}

pub(super) fn clear_color<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
) {
    caller.data_mut().gl.clear_color(red, green, blue, alpha);
}

/// The host owns the viewport; module requests are ignored
pub(super) fn viewport<G: GlApi>(_caller: Caller<'_, BridgeContext<G>>, x: i32, y: i32, width: i32, height: i32) {
    tracing::trace!("Ignoring module viewport request ({}, {}, {}x{})", x, y, width, height);
}
