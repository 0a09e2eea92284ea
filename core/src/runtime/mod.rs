//! Frame orchestration
//!
//! The [`FrameDriver`] owns the module instance and is the only thing that
//! calls into it: frame ticks, input events and timer pumps all go through
//! here, one at a time, so the module is never reentered.

use std::time::Instant;

use anyhow::Result;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::PhysicalKey;

use crate::error::BridgeError;
use crate::gl::GlApi;
use crate::input::{mouse_code, physical_key_code, scroll_delta_y, wheel_delta};
use crate::wasm::ModuleInstance;

mod config;


pub use config::RuntimeConfig;

/// Drawable surface size in pixels
pub type SurfaceSize = (u32, u32);

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No module call made yet
    Idle,
    /// `init` ran; frames are being drawn
    Running,
}

/// Drives one module instance frame by frame
pub struct FrameDriver<G: GlApi> {
    module: ModuleInstance<G>,
    state: DriverState,
    /// Last size the module was told about
    surface: Option<SurfaceSize>,
    frames: u64,
}

impl<G: GlApi> FrameDriver<G> {
    pub fn new(module: ModuleInstance<G>) -> Self {
        Self {
            module,
            state: DriverState::Idle,
            surface: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn surface(&self) -> Option<SurfaceSize> {
        self.surface
    }

    /// Frames drawn since start
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Initialize the module and tell it the initial surface size
    ///
    /// Starting twice is a no-op.
    pub fn start(&mut self, size: SurfaceSize) -> Result<()> {
        if self.state == DriverState::Running {
            return Ok(());
        }
        tracing::debug!("Starting module at {}x{}", size.0, size.1);
        self.module.init()?;
        self.apply_size(size)?;
        self.state = DriverState::Running;
        Ok(())
    }

    /// One frame: resize if the surface changed, then draw
    pub fn frame(&mut self, size: SurfaceSize) -> Result<()> {
        self.ensure_running()?;
        if self.surface != Some(size) {
            self.apply_size(size)?;
        }
        self.module.draw()?;
        self.frames += 1;
        Ok(())
    }

    fn apply_size(&mut self, (width, height): SurfaceSize) -> Result<()> {
        tracing::debug!("Surface resized to {}x{}", width, height);
        self.surface = Some((width, height));
        let (width, height) = (clamp_dimension(width), clamp_dimension(height));
        self.module.gl_mut().viewport(0, 0, width, height);
        self.module.resize(width, height)
    }

    fn ensure_running(&self) -> Result<(), BridgeError> {
        match self.state {
            DriverState::Running => Ok(()),
            DriverState::Idle => Err(BridgeError::NotStarted),
        }
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn key_down(&mut self, key: PhysicalKey) -> Result<()> {
        self.ensure_running()?;
        self.module.key_down(physical_key_code(key))
    }

    pub fn key_up(&mut self, key: PhysicalKey) -> Result<()> {
        self.ensure_running()?;
        self.module.key_up(physical_key_code(key))
    }

    pub fn button_down(&mut self, button: MouseButton) -> Result<()> {
        self.ensure_running()?;
        self.module.button_down(mouse_code(button))
    }

    pub fn button_up(&mut self, button: MouseButton) -> Result<()> {
        self.ensure_running()?;
        self.module.button_up(mouse_code(button))
    }

    /// Pointer position relative to the surface origin
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> Result<()> {
        self.ensure_running()?;
        self.module.move_to(x as i32, y as i32)
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) -> Result<()> {
        self.ensure_running()?;
        self.module.scroll(wheel_delta(scroll_delta_y(delta)))
    }

    // ------------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------------

    /// Deliver every timer tick due at `now`
    pub fn pump_timers(&mut self, now: Instant) -> Result<usize> {
        self.module.fire_timers(now)
    }

    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.module.next_timer_deadline()
    }

    pub fn module(&self) -> &ModuleInstance<G> {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut ModuleInstance<G> {
        &mut self.module
    }
}

/// Surface sizes beyond i32 never happen in practice; saturate rather than wrap
fn clamp_dimension(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
