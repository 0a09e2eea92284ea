//! Shader source assembly and program queries

use anyhow::Result;
use fcsim_shared::abi::LENGTHS_UNKNOWN;
use wasmtime::Caller;

use super::gl::byte_len;
use crate::error::BridgeError;
use crate::gl::GlApi;
use crate::memory::{MemoryView, c_str_len, decode_cstring, linear_memory, write_bytes};
use crate::wasm::BridgeContext;

/// Join `count` source fragments into one string
///
/// `strings_ptr` points at `count` little-endian fragment pointers. With
/// [`LENGTHS_UNKNOWN`] every fragment is NUL-terminated; otherwise
/// `lengths_ptr` points at `count` little-endian i32 lengths and a negative
/// entry marks that fragment as NUL-terminated.
pub(crate) fn assemble_shader_source<G: GlApi>(
    caller: &mut Caller<'_, BridgeContext<G>>,
    count: i32,
    strings_ptr: u32,
    lengths_ptr: u32,
) -> Result<String> {
    let count = byte_len("glShaderSource", count)?;
    let table_len = count
        .checked_mul(4)
        .ok_or_else(|| BridgeError::malformed("glShaderSource", format!("count {} too large", count)))?;

    // Pointer and length tables are copied out before strlen runs module code
    let (pointers, explicit) = {
        let memory = linear_memory(caller)?;
        let view = MemoryView::new(memory.data(&*caller));
        let table = view.window(strings_ptr, table_len)?;
        let pointers = (0..count)
            .map(|i| table.read_u32(i * 4))
            .collect::<Result<Vec<u32>, BridgeError>>()?;
        let explicit = if lengths_ptr == LENGTHS_UNKNOWN {
            None
        } else {
            let lengths = view.window(lengths_ptr, table_len)?;
            Some(
                (0..count)
                    .map(|i| lengths.read_i32(i * 4))
                    .collect::<Result<Vec<i32>, BridgeError>>()?,
            )
        };
        (pointers, explicit)
    };

    let mut lengths = Vec::with_capacity(pointers.len());
    for (i, &ptr) in pointers.iter().enumerate() {
        let len = match explicit.as_ref().map(|lengths| lengths[i]) {
            Some(len) if len >= 0 => len as u32,
            _ => c_str_len(caller, ptr)?,
        };
        lengths.push(len);
    }

    let memory = linear_memory(caller)?;
    let view = MemoryView::new(memory.data(&*caller));
    let mut source = String::new();
    for (ptr, len) in pointers.into_iter().zip(lengths) {
        source.push_str(&view.window(ptr, len)?.decode_utf8());
    }
    Ok(source)
}

pub(super) fn shader_source<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    shader: u32,
    count: i32,
    strings_ptr: u32,
    lengths_ptr: u32,
) -> Result<()> {
    let source = assemble_shader_source(&mut caller, count, strings_ptr, lengths_ptr)?;
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    gl.shader_source(handles.resolve_object(shader)?, &source);
    Ok(())
}

pub(super) fn get_shader_parameter<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    shader: u32,
    pname: u32,
) -> Result<i32> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    Ok(gl.get_shader_parameter(handles.resolve_object(shader)?, pname))
}

pub(super) fn get_program_parameter<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    program: u32,
    pname: u32,
) -> Result<i32> {
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    Ok(gl.get_program_parameter(handles.resolve_object(program)?, pname))
}

/// Copy the native info log into a module buffer of `buf_size` bytes
///
/// At most `buf_size - 1` bytes are written, then a NUL. The byte count
/// without the NUL goes to `length_ptr` unless it is 0.
pub(super) fn get_shader_info_log<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    shader: u32,
    buf_size: i32,
    length_ptr: u32,
    log_ptr: u32,
) -> Result<()> {
    let log = {
        let BridgeContext { handles, gl, .. } = caller.data_mut();
        gl.get_shader_info_log(handles.resolve_object(shader)?)
    };

    let capacity = byte_len("glGetShaderInfoLog", buf_size)? as usize;
    let written = log.len().min(capacity.saturating_sub(1));
    if capacity > 0 {
        let mut bytes = log.as_bytes()[..written].to_vec();
        bytes.push(0);
        write_bytes(&mut caller, log_ptr, &bytes)?;
    }
    if length_ptr != 0 {
        write_bytes(&mut caller, length_ptr, &(written as i32).to_le_bytes())?;
    }
    Ok(())
}

pub(super) fn get_attrib_location<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    program: u32,
    name_ptr: u32,
) -> Result<i32> {
    let name = decode_cstring(&mut caller, name_ptr)?;
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    Ok(gl.get_attrib_location(handles.resolve_object(program)?, &name))
}

/// A missing uniform still gets a handle, holding a null location
pub(super) fn get_uniform_location<G: GlApi>(
    mut caller: Caller<'_, BridgeContext<G>>,
    program: u32,
    name_ptr: u32,
) -> Result<u32> {
    let name = decode_cstring(&mut caller, name_ptr)?;
    let BridgeContext { handles, gl, .. } = caller.data_mut();
    let location = gl.get_uniform_location(handles.resolve_object(program)?, &name);
    Ok(handles.register(location))
}
