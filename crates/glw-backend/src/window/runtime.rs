use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::error::BackendError;
use crate::platform::{self, Platform};
use crate::render::{FrameTarget, Renderer, WgpuApi};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// RGBA color the surface is cleared to before each frame.
    pub clear_color: [f32; 4],
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glw".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            clear_color: [0.1, 0.1, 0.12, 1.0],
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.commands.push(Command::SetClearColor(rgba));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetClearColor([f32; 4]),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` until the window closes or the app asks to exit.
    ///
    /// Fatal backend errors (video subsystem, window, GPU) end the run and are
    /// returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = platform::initialize().context("failed to initialize platform")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowSession {
    platform: Platform,

    #[borrows(platform)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything tied to the open window.
///
/// The renderer is declared first so its GPU objects drop before the surface.
struct WindowEntry {
    renderer: Renderer<WgpuApi>,
    session: WindowSession,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    clear_color: [f32; 4],
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        let clear_color = config.clear_color;
        Self {
            config,
            gpu_init,
            app,
            window: None,
            clear_color,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.request_exit();
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .map_err(BackendError::Window)?;

        let gpu_init = self.gpu_init.clone();
        let session = WindowSessionTryBuilder {
            platform: Platform::new(window),
            gpu_builder: |platform| {
                pollster::block_on(Gpu::new(platform.window(), gpu_init))
                    .map_err(|e| BackendError::Gpu(format!("{e:#}")))
            },
        }
        .try_build()?;

        let api = session.with_gpu(|gpu| {
            WgpuApi::new(gpu.device().clone(), gpu.queue().clone(), gpu.surface_format())
        });
        let mut renderer = Renderer::create(api).context("failed to create renderer")?;
        renderer.set_display_metrics(session.borrow_platform().display_metrics());

        Ok(WindowEntry { renderer, session })
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetClearColor(rgba) => self.clear_color = rgba,
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    /// Drives one frame: acquire, clear, let the app draw, present.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let clear = self.clear_color;
        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;
        let mut surface_fatal = false;

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };
        let WindowEntry { renderer, session } = entry;

        session.with_mut(|fields| {
            let platform: &Platform = fields.platform;

            let mut frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    if fields.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                        surface_fatal = true;
                    }
                    return;
                }
            };

            clear_frame(&mut frame, clear);

            let GpuFrame {
                surface_texture,
                view,
                encoder,
                size,
            } = frame;
            renderer.api_mut().attach_frame(FrameTarget { encoder, view, size });

            let metrics = platform.display_metrics();
            renderer.set_display_metrics(metrics);

            {
                let mut ctx = FrameCtx {
                    platform,
                    renderer: &mut *renderer,
                    logical_size: metrics.logical,
                    runtime: &mut runtime_ctx,
                };
                app_control = app.on_frame(&mut ctx);
            }

            match renderer.api_mut().detach_frame() {
                Some(target) => {
                    platform.window().pre_present_notify();
                    fields.gpu.submit(surface_texture, target.encoder);
                }
                None => log::error!("frame target went missing; frame dropped"),
            }
        });

        if surface_fatal {
            self.fail(event_loop, BackendError::Gpu("surface lost beyond recovery".into()).into());
            return;
        }

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
        }
        self.apply_commands(event_loop, runtime_ctx);
    }
}

fn clear_frame(frame: &mut GpuFrame, rgba: [f32; 4]) {
    let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("glw clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &frame.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color {
                    r: rgba[0] as f64,
                    g: rgba[1] as f64,
                    b: rgba[2] as f64,
                    a: rgba[3] as f64,
                }),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => {
                self.fail(event_loop, e.context("failed to create initial window"));
                return;
            }
        };

        let control = self
            .app
            .on_start(entry.session.borrow_platform(), &mut entry.renderer);
        entry.session.borrow_platform().window().request_redraw();
        self.window = Some(entry);

        if control == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the GUI rebuilds its mesh every frame.
        if let Some(entry) = &self.window {
            entry.session.borrow_platform().window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            return;
        };

        if self.app.on_window_event(entry.session.borrow_platform(), &event) == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                // Drops renderer, surface, cursors and window in that order.
                self.window = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.session.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.session.borrow_platform().window().request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.session.borrow_platform().window().inner_size();
                entry.session.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.session.borrow_platform().window().request_redraw();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
