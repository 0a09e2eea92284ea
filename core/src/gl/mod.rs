//! Native graphics API boundary
//!
//! The module drives a WebGL-style immediate API. [`GlApi`] is that surface as
//! the host sees it: one method per native call, object parameters already
//! resolved from handles, buffer parameters already sliced out of linear
//! memory. Implementations delegate to a real context; [`HeadlessGl`] records
//! calls instead.
//!
//! The bridge never interprets results (compile status and friends). That is
//! left to the module through the query calls.

mod headless;

pub use headless::{GlCall, HeadlessGl};

/// The native graphics context a module draws through
///
/// Object parameters are `Option` because a native creation call may yield a
/// null object, which still gets a handle.
pub trait GlApi: 'static {
    /// Native object type (buffer, shader, program, texture, uniform location)
    type Object;

    // Object lifecycle
    fn create_buffer(&mut self) -> Option<Self::Object>;
    fn create_texture(&mut self) -> Option<Self::Object>;
    fn create_program(&mut self) -> Option<Self::Object>;
    fn create_shader(&mut self, shader_type: u32) -> Option<Self::Object>;
    fn delete_buffer(&mut self, buffer: Option<&Self::Object>);
    fn delete_program(&mut self, program: Option<&Self::Object>);
    fn delete_shader(&mut self, shader: Option<&Self::Object>);

    // Shaders and programs
    fn shader_source(&mut self, shader: Option<&Self::Object>, source: &str);
    fn compile_shader(&mut self, shader: Option<&Self::Object>);
    fn attach_shader(&mut self, program: Option<&Self::Object>, shader: Option<&Self::Object>);
    fn link_program(&mut self, program: Option<&Self::Object>);
    fn use_program(&mut self, program: Option<&Self::Object>);
    fn get_shader_parameter(&mut self, shader: Option<&Self::Object>, pname: u32) -> i32;
    fn get_program_parameter(&mut self, program: Option<&Self::Object>, pname: u32) -> i32;
    fn get_shader_info_log(&mut self, shader: Option<&Self::Object>) -> String;
    fn get_attrib_location(&mut self, program: Option<&Self::Object>, name: &str) -> i32;
    fn get_uniform_location(
        &mut self,
        program: Option<&Self::Object>,
        name: &str,
    ) -> Option<Self::Object>;

    // Buffers
    fn bind_buffer(&mut self, target: u32, buffer: Option<&Self::Object>);
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]);

    // Vertex state
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    // Uniforms
    fn uniform_2f(&mut self, location: Option<&Self::Object>, x: f32, y: f32);
    fn uniform_3f(&mut self, location: Option<&Self::Object>, x: f32, y: f32, z: f32);

    // Draw submission and frame state
    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);
    fn draw_elements(&mut self, mode: u32, count: i32, element_type: u32, offset: i32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear(&mut self, mask: u32);
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
}
