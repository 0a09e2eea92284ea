//! Module ABI symbol names
//!
//! The module is compiled separately and cannot be changed, so these names are
//! fixed. Imports all live in the [`IMPORT_MODULE`] namespace.

/// Namespace every host import is registered under.
pub const IMPORT_MODULE: &str = "env";

/// Name of the exported linear memory.
pub const EXPORT_MEMORY: &str = "memory";

// Lifecycle and event exports
pub const EXPORT_INIT: &str = "init";
pub const EXPORT_RESIZE: &str = "resize";
pub const EXPORT_DRAW: &str = "draw";
pub const EXPORT_KEY_DOWN: &str = "key_down";
pub const EXPORT_KEY_UP: &str = "key_up";
pub const EXPORT_BUTTON_DOWN: &str = "button_down";
pub const EXPORT_BUTTON_UP: &str = "button_up";
pub const EXPORT_MOVE: &str = "move";
pub const EXPORT_SCROLL: &str = "scroll";

/// Generic indirect-call trampoline: `call(function_index, argument)`.
pub const EXPORT_CALL: &str = "call";

// Utility exports used while staging data
pub const EXPORT_MALLOC: &str = "malloc";
pub const EXPORT_STRLEN: &str = "strlen";

// Design loading exports (debug renderer build)
pub const EXPORT_READ_XML: &str = "fcsim_read_xml";
pub const EXPORT_SIM_NEW: &str = "fcsim_new";

/// Graphics imports, in the order the host registers them.
pub const GL_IMPORTS: &[&str] = &[
    "glAttachShader",
    "glBindBuffer",
    "glBufferData",
    "glBufferSubData",
    "glClear",
    "glClearColor",
    "glCompileShader",
    "glCreateBuffer",
    "glCreateProgram",
    "glCreateShader",
    "glCreateTexture",
    "glDeleteBuffer",
    "glDeleteProgram",
    "glDeleteShader",
    "glDisableVertexAttribArray",
    "glDrawArrays",
    "glDrawElements",
    "glEnableVertexAttribArray",
    "glGetAttribLocation",
    "glGetProgramParameter",
    "glGetShaderInfoLog",
    "glGetShaderParameter",
    "glGetUniformLocation",
    "glLinkProgram",
    "glShaderSource",
    "glUniform2f",
    "glUniform3f",
    "glUseProgram",
    "glVertexAttribPointer",
    "glViewport",
];

// Host service imports
pub const IMPORT_SET_INTERVAL: &str = "set_interval";
pub const IMPORT_CLEAR_INTERVAL: &str = "clear_interval";
pub const IMPORT_PRINT_SLICE: &str = "print_slice";
pub const IMPORT_PRINTF: &str = "printf";

/// Value of the shader lengths pointer meaning "every fragment is NUL-terminated".
pub const LENGTHS_UNKNOWN: u32 = 0;
