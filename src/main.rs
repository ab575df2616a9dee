//! Raywalk - windowed host for the first-person controller
//!
//! Drawing is left to whatever render sink is plugged in; this host only
//! shows the published pose in the window title.

use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use raywalk::controller::{ControllerConfig, FrameLoop, FrameReport, RenderSink};
use raywalk::core::{camera::CameraPose, input::InputState, logging};
use raywalk::world::{LevelDescription, PendingWorld};

/// Writes the pose into the window title
struct TitleSink {
    window: Arc<Window>,
}

impl RenderSink for TitleSink {
    fn publish(&mut self, pose: &CameraPose) {
        self.window.set_title(&format!(
            "Raywalk | pos ({:.2}, {:.2}, {:.2}) yaw {:.2} pitch {:.2} | Tab=mouse, WASD=move, Space=jump, arrows=look, Enter/click=fire",
            pose.position.x, pose.position.y, pose.position.z, pose.yaw, pose.pitch
        ));
    }
}

/// Logs the pose every `every` frames
struct LogSink {
    every: u64,
    frame: u64,
}

impl RenderSink for LogSink {
    fn publish(&mut self, pose: &CameraPose) {
        self.frame += 1;
        if self.frame % self.every == 0 {
            log::info!(
                "Frame {}: pos ({:.3}, {:.3}, {:.3}) yaw {:.3} pitch {:.3}",
                self.frame, pose.position.x, pose.position.y, pose.position.z, pose.yaw, pose.pitch
            );
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    sink: Option<TitleSink>,
    input: InputState,
    frame_loop: FrameLoop<PendingWorld>,
    cursor_grabbed: bool,
}

impl App {
    fn new(config: &ControllerConfig, world: PendingWorld) -> Self {
        Self {
            window: None,
            sink: None,
            input: InputState::new(),
            frame_loop: FrameLoop::new(config, world),
            cursor_grabbed: false,
        }
    }

    fn toggle_cursor_grab(&mut self) {
        if let Some(window) = &self.window {
            self.cursor_grabbed = !self.cursor_grabbed;

            if self.cursor_grabbed {
                window.set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
                    .ok();
                window.set_cursor_visible(false);
            } else {
                window.set_cursor_grab(CursorGrabMode::None).ok();
                window.set_cursor_visible(true);
            }

            self.input.set_pointer_captured(self.cursor_grabbed);
        }
    }

    fn redraw(&mut self) {
        self.frame_loop.world_mut().poll();

        if let Some(sink) = &mut self.sink {
            let report = self.frame_loop.tick(&self.input, sink);
            log_report(&report);
        }

        self.input.end_frame();

        // Reschedule for the next refresh
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Raywalk")
            .with_inner_size(PhysicalSize::new(960, 540));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        self.sink = Some(TitleSink { window: window.clone() });
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Resized to {}x{}", size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => {
                            if self.cursor_grabbed {
                                self.toggle_cursor_grab();
                            } else {
                                event_loop.exit();
                            }
                        }
                        PhysicalKey::Code(KeyCode::Tab) => self.toggle_cursor_grab(),
                        _ => {}
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if state.is_pressed() && button == winit::event::MouseButton::Left && !self.cursor_grabbed {
                    self.toggle_cursor_grab();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }
}

fn log_report(report: &FrameReport) {
    log::trace!(
        "Frame {}: {:?}, {} jumps, {} contacts",
        report.frame,
        report.state,
        report.jumps_remaining,
        report.contacts.map_or(0, |c| c.contacts().count())
    );
}

fn main() {
    logging::init();
    log::info!("Raywalk starting...");

    let args: Vec<String> = std::env::args().collect();

    if has_flag(&args, "--dump-demo-level") {
        match LevelDescription::demo().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize demo level: {e}"),
        }
        return;
    }

    let config = load_config(parse_path_arg(&args, "--config", "-c"));
    let world = load_world(parse_path_arg(&args, "--level", "-l"));

    if has_flag(&args, "--headless") {
        let frames = parse_frames_arg(&args).unwrap_or(600);
        run_headless(&config, world, frames);
        return;
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new(&config, world);

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
    }
}

/// Run the controller without a window and no input
fn run_headless(config: &ControllerConfig, world: PendingWorld, frames: u64) {
    log::info!("Running {} headless frames", frames);

    let mut frame_loop = FrameLoop::new(config, world);
    let mut input = InputState::new();
    let mut sink = LogSink { every: 60, frame: 0 };

    let mut last = None;
    for _ in 0..frames {
        frame_loop.world_mut().poll();
        let report = frame_loop.tick(&input, &mut sink);
        log_report(&report);
        input.end_frame();
        last = Some(report);
    }

    if let Some(report) = last {
        let p = report.pose.position;
        log::info!(
            "Finished: pos ({:.3}, {:.3}, {:.3}), {:?}, {} jumps left",
            p.x, p.y, p.z, report.state, report.jumps_remaining
        );
    }
}

/// Config from file, or defaults when absent or unreadable
fn load_config(path: Option<PathBuf>) -> ControllerConfig {
    let Some(path) = path else {
        return ControllerConfig::default();
    };

    match ControllerConfig::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from: {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Ignoring config {}: {e}; using defaults", path.display());
            ControllerConfig::default()
        }
    }
}

/// Level file loaded in the background, or the built-in demo level
fn load_world(path: Option<PathBuf>) -> PendingWorld {
    if let Some(path) = path {
        return PendingWorld::spawn_load(path);
    }

    match LevelDescription::demo().build() {
        Ok(world) => PendingWorld::ready(world),
        Err(e) => {
            log::error!("Error building demo level: {e}");
            PendingWorld::empty()
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Parse a path argument given as `--long <path>` or `-s <path>`
fn parse_path_arg(args: &[String], long: &str, short: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == long || args[i] == short {
            if let Some(value) = args.get(i + 1) {
                return Some(PathBuf::from(value));
            }
        }
    }
    None
}

/// Parse --frames argument (headless frame count)
fn parse_frames_arg(args: &[String]) -> Option<u64> {
    for i in 0..args.len() {
        if args[i] == "--frames" || args[i] == "-n" {
            if let Some(count) = args.get(i + 1) {
                return count.parse().ok();
            }
        }
    }
    None
}
