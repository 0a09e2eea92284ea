//! Headless graphics backend
//!
//! Records every native call instead of rendering. Objects are small integer
//! ids starting at 1 so they can never be confused with module handles in
//! assertions.

use hashbrown::{HashMap, HashSet};

use super::GlApi;

/// One recorded native call
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateBuffer(u32),
    CreateTexture(u32),
    CreateProgram(u32),
    CreateShader { shader_type: u32, id: u32 },
    DeleteBuffer(Option<u32>),
    DeleteProgram(Option<u32>),
    DeleteShader(Option<u32>),
    ShaderSource { shader: Option<u32>, source: String },
    CompileShader(Option<u32>),
    AttachShader { program: Option<u32>, shader: Option<u32> },
    LinkProgram(Option<u32>),
    UseProgram(Option<u32>),
    GetAttribLocation { program: Option<u32>, name: String },
    GetUniformLocation { program: Option<u32>, name: String },
    BindBuffer { target: u32, buffer: Option<u32> },
    BufferData { target: u32, data: Vec<u8>, usage: u32 },
    BufferSubData { target: u32, offset: i32, data: Vec<u8> },
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    Uniform2f { location: Option<u32>, x: f32, y: f32 },
    Uniform3f { location: Option<u32>, x: f32, y: f32, z: f32 },
    DrawArrays { mode: u32, first: i32, count: i32 },
    DrawElements { mode: u32, count: i32, element_type: u32, offset: i32 },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    Clear(u32),
    ClearColor([f32; 4]),
}

/// Recording [`GlApi`] implementation
#[derive(Debug)]
pub struct HeadlessGl {
    calls: Vec<GlCall>,
    next_id: u32,
    /// Value returned by every shader/program parameter query
    pub parameter_value: i32,
    /// Log returned by `get_shader_info_log`
    pub info_log: String,
    /// Attribute locations by name; unknown names resolve to -1
    pub attrib_locations: HashMap<String, i32>,
    /// Uniform names that resolve to a null location
    pub missing_uniforms: HashSet<String>,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_id: 1,
            parameter_value: 1,
            info_log: String::new(),
            attrib_locations: HashMap::new(),
            missing_uniforms: HashSet::new(),
        }
    }

    /// Every call recorded so far, oldest first
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self, call: GlCall) {
        self.calls.push(call);
    }
}

impl Default for HeadlessGl {
    fn default() -> Self {
        Self::new()
    }
}

impl GlApi for HeadlessGl {
    type Object = u32;

    fn create_buffer(&mut self) -> Option<u32> {
        let id = self.allocate();
        self.record(GlCall::CreateBuffer(id));
        Some(id)
    }

    fn create_texture(&mut self) -> Option<u32> {
        let id = self.allocate();
        self.record(GlCall::CreateTexture(id));
        Some(id)
    }

    fn create_program(&mut self) -> Option<u32> {
        let id = self.allocate();
        self.record(GlCall::CreateProgram(id));
        Some(id)
    }

    fn create_shader(&mut self, shader_type: u32) -> Option<u32> {
        let id = self.allocate();
        self.record(GlCall::CreateShader { shader_type, id });
        Some(id)
    }

    fn delete_buffer(&mut self, buffer: Option<&u32>) {
        self.record(GlCall::DeleteBuffer(buffer.copied()));
    }

    fn delete_program(&mut self, program: Option<&u32>) {
        self.record(GlCall::DeleteProgram(program.copied()));
    }

    fn delete_shader(&mut self, shader: Option<&u32>) {
        self.record(GlCall::DeleteShader(shader.copied()));
    }

    fn shader_source(&mut self, shader: Option<&u32>, source: &str) {
        self.record(GlCall::ShaderSource {
            shader: shader.copied(),
            source: source.to_string(),
        });
    }

    fn compile_shader(&mut self, shader: Option<&u32>) {
        self.record(GlCall::CompileShader(shader.copied()));
    }

    fn attach_shader(&mut self, program: Option<&u32>, shader: Option<&u32>) {
        self.record(GlCall::AttachShader {
            program: program.copied(),
            shader: shader.copied(),
        });
    }

    fn link_program(&mut self, program: Option<&u32>) {
        self.record(GlCall::LinkProgram(program.copied()));
    }

    fn use_program(&mut self, program: Option<&u32>) {
        self.record(GlCall::UseProgram(program.copied()));
    }

    fn get_shader_parameter(&mut self, _shader: Option<&u32>, _pname: u32) -> i32 {
        self.parameter_value
    }

    fn get_program_parameter(&mut self, _program: Option<&u32>, _pname: u32) -> i32 {
        self.parameter_value
    }

    fn get_shader_info_log(&mut self, _shader: Option<&u32>) -> String {
        self.info_log.clone()
    }

    fn get_attrib_location(&mut self, program: Option<&u32>, name: &str) -> i32 {
        self.record(GlCall::GetAttribLocation {
            program: program.copied(),
            name: name.to_string(),
        });
        self.attrib_locations.get(name).copied().unwrap_or(-1)
    }

    fn get_uniform_location(&mut self, program: Option<&u32>, name: &str) -> Option<u32> {
        self.record(GlCall::GetUniformLocation {
            program: program.copied(),
            name: name.to_string(),
        });
        if self.missing_uniforms.contains(name) {
            None
        } else {
            Some(self.allocate())
        }
    }

    fn bind_buffer(&mut self, target: u32, buffer: Option<&u32>) {
        self.record(GlCall::BindBuffer {
            target,
            buffer: buffer.copied(),
        });
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.record(GlCall::BufferData {
            target,
            data: data.to_vec(),
            usage,
        });
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        self.record(GlCall::BufferSubData {
            target,
            offset,
            data: data.to_vec(),
        });
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.record(GlCall::DisableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn uniform_2f(&mut self, location: Option<&u32>, x: f32, y: f32) {
        self.record(GlCall::Uniform2f {
            location: location.copied(),
            x,
            y,
        });
    }

    fn uniform_3f(&mut self, location: Option<&u32>, x: f32, y: f32, z: f32) {
        self.record(GlCall::Uniform3f {
            location: location.copied(),
            x,
            y,
            z,
        });
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn draw_elements(&mut self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.record(GlCall::DrawElements {
            mode,
            count,
            element_type,
            offset,
        });
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear(&mut self, mask: u32) {
        self.record(GlCall::Clear(mask));
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(GlCall::ClearColor([red, green, blue, alpha]));
    }
}
