//! Engine input code space
//!
//! The module was written against X11 key codes and button numbers. Anything
//! the host cannot place in this space is sent as [`NEUTRAL`], which the
//! module ignores.

/// Code for any input the module does not know about.
pub const NEUTRAL: i32 = 0;

pub const KEY_SPACE: i32 = 65;
pub const KEY_R: i32 = 27;
pub const KEY_M: i32 = 58;
pub const KEY_S: i32 = 39;
pub const KEY_D: i32 = 40;
pub const KEY_U: i32 = 30;
pub const KEY_W: i32 = 25;
pub const KEY_C: i32 = 54;
pub const KEY_SHIFT_LEFT: i32 = 50;
pub const KEY_CONTROL_LEFT: i32 = 37;

/// Primary (left) mouse button.
pub const BUTTON_PRIMARY: i32 = 1;

/// Multiplier applied to a wheel delta before it reaches the module.
///
/// Deltas use the browser convention (positive = scrolled toward the user),
/// so a negative factor makes "scroll up" positive for the module.
pub const WHEEL_SCALE: f64 = -0.02;

/// Pixels a single wheel line is worth when the platform reports lines.
pub const PIXELS_PER_LINE: f64 = 100.0;
