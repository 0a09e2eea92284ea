//! Native input to engine code translation
//!
//! Pure table lookups from winit identifiers into the module's input code
//! space. Unknown input maps to [`input::NEUTRAL`] so the module can ignore it
//! without the host filtering events.

use fcsim_shared::input;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Static key table, native code to engine code
const KEY_CODES: &[(KeyCode, i32)] = &[
    (KeyCode::Space, input::KEY_SPACE),
    (KeyCode::KeyR, input::KEY_R),
    (KeyCode::KeyM, input::KEY_M),
    (KeyCode::KeyS, input::KEY_S),
    (KeyCode::KeyD, input::KEY_D),
    (KeyCode::KeyU, input::KEY_U),
    (KeyCode::KeyW, input::KEY_W),
    (KeyCode::KeyC, input::KEY_C),
    (KeyCode::ShiftLeft, input::KEY_SHIFT_LEFT),
    (KeyCode::ControlLeft, input::KEY_CONTROL_LEFT),
];

/// Engine code for a key
pub fn key_code(code: KeyCode) -> i32 {
    KEY_CODES
        .iter()
        .find(|(native, _)| *native == code)
        .map(|(_, engine)| *engine)
        .unwrap_or(input::NEUTRAL)
}

/// Engine code for a physical key, including keys winit could not identify
pub fn physical_key_code(key: PhysicalKey) -> i32 {
    match key {
        PhysicalKey::Code(code) => key_code(code),
        PhysicalKey::Unidentified(_) => input::NEUTRAL,
    }
}

/// Engine code for a mouse button
pub fn mouse_code(button: MouseButton) -> i32 {
    match button {
        MouseButton::Left => input::BUTTON_PRIMARY,
        _ => input::NEUTRAL,
    }
}

/// Value passed to the module's `scroll` export
///
/// `delta_y` uses the browser convention: pixels, positive when the wheel
/// moves toward the user.
pub fn wheel_delta(delta_y: f64) -> f64 {
    input::WHEEL_SCALE * delta_y
}

/// Convert a winit wheel event to a browser-convention pixel delta
///
/// winit reports positive values for movement away from the user, so the
/// sign flips. Line deltas count [`input::PIXELS_PER_LINE`] pixels per line.
pub fn scroll_delta_y(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -(lines as f64) * input::PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(position) => -position.y,
    }
}
