//! Host functions imported by the module
//!
//! Everything is registered under the `env` namespace. An import that
//! returns `Err` traps, which aborts the module call in progress.

mod diag;
mod gl;
mod shader;
mod timer;


use anyhow::Result;
use fcsim_shared::abi::{
    IMPORT_CLEAR_INTERVAL, IMPORT_MODULE, IMPORT_PRINT_SLICE, IMPORT_PRINTF, IMPORT_SET_INTERVAL,
};
use wasmtime::Linker;

use crate::gl::GlApi;
use crate::wasm::BridgeContext;

/// Register every bridge import with the linker
pub fn register_bridge_ffi<G: GlApi>(linker: &mut Linker<BridgeContext<G>>) -> Result<()> {
    register_gl_ffi(linker)?;

    // Host services
    linker.func_wrap(IMPORT_MODULE, IMPORT_SET_INTERVAL, timer::set_interval)?;
    linker.func_wrap(IMPORT_MODULE, IMPORT_CLEAR_INTERVAL, timer::clear_interval)?;
    linker.func_wrap(IMPORT_MODULE, IMPORT_PRINT_SLICE, diag::print_slice)?;
    linker.func_wrap(IMPORT_MODULE, IMPORT_PRINTF, diag::printf)?;

    Ok(())
}

/// Register the graphics imports
fn register_gl_ffi<G: GlApi>(linker: &mut Linker<BridgeContext<G>>) -> Result<()> {
    let env = IMPORT_MODULE;

    // Object lifecycle
    linker.func_wrap(env, "glCreateBuffer", gl::create_buffer)?;
    linker.func_wrap(env, "glCreateTexture", gl::create_texture)?;
    linker.func_wrap(env, "glCreateProgram", gl::create_program)?;
    linker.func_wrap(env, "glCreateShader", gl::create_shader)?;
    linker.func_wrap(env, "glDeleteBuffer", gl::delete_buffer)?;
    linker.func_wrap(env, "glDeleteProgram", gl::delete_program)?;
    linker.func_wrap(env, "glDeleteShader", gl::delete_shader)?;

    // Shaders and programs
    linker.func_wrap(env, "glShaderSource", shader::shader_source)?;
    linker.func_wrap(env, "glCompileShader", gl::compile_shader)?;
    linker.func_wrap(env, "glAttachShader", gl::attach_shader)?;
    linker.func_wrap(env, "glLinkProgram", gl::link_program)?;
    linker.func_wrap(env, "glUseProgram", gl::use_program)?;
    linker.func_wrap(env, "glGetShaderParameter", shader::get_shader_parameter)?;
    linker.func_wrap(env, "glGetProgramParameter", shader::get_program_parameter)?;
    linker.func_wrap(env, "glGetShaderInfoLog", shader::get_shader_info_log)?;
    linker.func_wrap(env, "glGetAttribLocation", shader::get_attrib_location)?;
    linker.func_wrap(env, "glGetUniformLocation", shader::get_uniform_location)?;

    // Buffers
    linker.func_wrap(env, "glBindBuffer", gl::bind_buffer)?;
    linker.func_wrap(env, "glBufferData", gl::buffer_data)?;
    linker.func_wrap(env, "glBufferSubData", gl::buffer_sub_data)?;

    // Vertex state
    linker.func_wrap(env, "glEnableVertexAttribArray", gl::enable_vertex_attrib_array)?;
    linker.func_wrap(env, "glDisableVertexAttribArray", gl::disable_vertex_attrib_array)?;
    linker.func_wrap(env, "glVertexAttribPointer", gl::vertex_attrib_pointer)?;

    // Uniforms
    linker.func_wrap(env, "glUniform2f", gl::uniform_2f)?;
    linker.func_wrap(env, "glUniform3f", gl::uniform_3f)?;

    // Draws and frame state
    linker.func_wrap(env, "glDrawArrays", gl::draw_arrays)?;
    linker.func_wrap(env, "glDrawElements", gl::draw_elements)?;
    linker.func_wrap(env, "glViewport", gl::viewport)?;
    linker.func_wrap(env, "glClear", gl::clear)?;
    linker.func_wrap(env, "glClearColor", gl::clear_color)?;

    Ok(())
}
