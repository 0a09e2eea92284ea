//! Windowed event loop
//!
//! Creates the window, binds a native graphics object to it, instantiates the
//! module and feeds it frames, input and timer ticks. Everything runs on the
//! event loop thread.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use wasmtime::Linker;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use super::config::Config;
use crate::ffi::register_bridge_ffi;
use crate::gl::GlApi;
use crate::runtime::{FrameDriver, SurfaceSize};
use crate::wasm::{BridgeEngine, ModuleInstance};

/// Provides the native graphics object for a window.
///
/// Implement this for whatever GL binding the host links against. The event
/// loop calls [`create`](GraphicsFactory::create) once the window exists and
/// [`present`](GraphicsFactory::present) after every drawn frame.
pub trait GraphicsFactory {
    type Gl: GlApi;

    /// Bind a graphics context to `window`.
    fn create(&mut self, window: Arc<Window>) -> Result<Self::Gl>;

    /// Show the frame the module just drew.
    fn present(&mut self, gl: &mut Self::Gl) -> Result<()>;
}

/// winit application driving one module instance
pub struct BridgeApp<F: GraphicsFactory> {
    factory: F,
    config: Config,
    engine: BridgeEngine,
    wasm: Vec<u8>,
    window: Option<Arc<Window>>,
    driver: Option<FrameDriver<F::Gl>>,
    /// First fatal error; the loop exits once set
    error: Option<anyhow::Error>,
}

impl<F: GraphicsFactory> BridgeApp<F> {
    pub fn new(factory: F, config: Config, wasm: Vec<u8>) -> Result<Self> {
        Ok(Self {
            factory,
            config,
            engine: BridgeEngine::new()?,
            wasm,
            window: None,
            driver: None,
            error: None,
        })
    }

    fn instantiate(&mut self, window: Arc<Window>) -> Result<FrameDriver<F::Gl>> {
        let gl = self
            .factory
            .create(window.clone())
            .context("Failed to create graphics context")?;

        let module = self.engine.load_module(&self.wasm)?;
        let mut linker = Linker::new(self.engine.engine());
        register_bridge_ffi(&mut linker)?;
        let instance =
            ModuleInstance::new(&self.engine, &module, &linker, gl, &self.config.runtime)?;

        let mut driver = FrameDriver::new(instance);
        driver.start(surface_size(&window))?;
        Ok(driver)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{:#}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(driver)) = (&self.window, &mut self.driver) else {
            return Ok(());
        };
        driver.frame(surface_size(window))?;
        self.factory.present(driver.module_mut().gl_mut())?;
        window.request_redraw();
        Ok(())
    }
}

impl<F: GraphicsFactory> ApplicationHandler for BridgeApp<F> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Failed to create window"));
                return;
            }
        };

        match self.instantiate(window.clone()) {
            Ok(driver) => {
                tracing::info!("Module started");
                self.driver = Some(driver);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let result = match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(_) => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                Ok(())
            }
            WindowEvent::RedrawRequested => self.redraw(),
            event => match &mut self.driver {
                Some(driver) => forward_input(driver, &event),
                None => Ok(()),
            },
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(driver) = &mut self.driver else {
            return;
        };
        if let Err(e) = driver.pump_timers(Instant::now()) {
            self.fail(event_loop, e);
            return;
        }
        match driver.next_timer_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

/// Route native input events to the module
fn forward_input<G: GlApi>(driver: &mut FrameDriver<G>, event: &WindowEvent) -> Result<()> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => match event.state {
            ElementState::Pressed => driver.key_down(event.physical_key),
            ElementState::Released => driver.key_up(event.physical_key),
        },
        WindowEvent::MouseInput { state, button, .. } => match state {
            ElementState::Pressed => driver.button_down(*button),
            ElementState::Released => driver.button_up(*button),
        },
        WindowEvent::CursorMoved { position, .. } => driver.pointer_moved(position.x, position.y),
        WindowEvent::MouseWheel { delta, .. } => driver.wheel(*delta),
        _ => Ok(()),
    }
}

fn surface_size(window: &Window) -> SurfaceSize {
    let size = window.inner_size();
    (size.width, size.height)
}

/// Load the configured module and run it in a window until it closes.
///
/// Returns the first fatal error the module or the graphics backend raised.
pub fn run<F: GraphicsFactory>(config: Config, factory: F) -> Result<()> {
    let wasm = read_module(&config.module.path)?;
    let event_loop = EventLoop::new()?;

    let mut app = BridgeApp::new(factory, config, wasm)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn read_module(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read module {}", path.display()))
}
