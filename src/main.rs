use std::any::Any;
use std::env;
use std::f32::consts::PI;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use log::info;
use pollster::block_on;
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use prism::{
    deg_to_rad, Camera, ClipPlanes, FrameUniforms, Mat4, Point3, Renderer, Vec3, View, ViewSize,
};

const USAGE: &str = "Usage: prism [--frames N]";

fn main() {
    env_logger::init();

    let options = match CliOptions::parse() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    if options.show_help {
        println!("{USAGE}");
        return;
    }

    if let Err(err) = run(options) {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> Result<()> {
    let view = View {
        size: ViewSize {
            width: 1024.0,
            height: 768.0,
        },
        fov_y_radians: (2.0 * PI) / 5.0,
        planes: ClipPlanes {
            near: 1.0,
            far: 100.0,
        },
    };

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let mut event_loop =
        event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;

    let window = WindowBuilder::new()
        .with_title("Prism")
        .with_inner_size(LogicalSize::new(
            f64::from(view.size.width),
            f64::from(view.size.height),
        ))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|err| WindowInitError::from_error("window", err))?;

    let renderer = block_on(Renderer::new(window))?;
    let camera = Camera::new(
        Point3::new(0.0, 0.0, 4.0),
        Point3::origin(),
        Vec3::UNIT_Y,
        view,
    );

    let mut app = App {
        renderer,
        camera,
        frame: 0,
        frame_limit: options.frames,
        last_error: None,
    };

    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        if let Err(err) = app.process_event(&event, control_flow) {
            app.last_error = Some(err);
            control_flow.set_exit();
        }
    });

    if let Some(err) = app.last_error {
        return Err(err);
    }

    Ok(())
}

struct App {
    renderer: Renderer,
    camera: Camera,
    frame: u32,
    frame_limit: Option<u32>,
    last_error: Option<anyhow::Error>,
}

impl App {
    fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed
                            && input.virtual_keycode == Some(VirtualKeyCode::Escape)
                        {
                            control_flow.set_exit();
                        }
                    }
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        self.renderer.resize(**new_inner_size);
                    }
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.renderer.window_id() => {
                self.advance_frame()?;
                if let Some(limit) = self.frame_limit {
                    if self.frame >= limit {
                        control_flow.set_exit();
                    }
                }
            }
            Event::MainEventsCleared => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    /// Advances the frame counter, orbits the camera and draws the scene.
    fn advance_frame(&mut self) -> Result<()> {
        self.frame = self.frame.wrapping_add(1);

        let orbit_angle = deg_to_rad((self.frame % 360) as f32);
        self.camera.rotate(Vec3::new(0.0, orbit_angle, 0.0));

        let model_matrix = Mat4::identity();
        let mvp = self.camera.view_projection_matrix() * model_matrix;
        self.renderer.write_uniforms(&FrameUniforms::new(
            &mvp,
            self.frame,
            deg_to_rad(self.frame as f32),
        ));

        if let Err(err) = self.renderer.render() {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("surface timeout; retrying next frame");
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            stage,
            message: panic_message(panic),
        }
    }

    fn from_error(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("unknown argument: {0}\n{USAGE}")]
    UnknownArgument(String),
    #[error("invalid frame count: {0}\n{USAGE}")]
    InvalidFrameCount(String),
    #[error("missing value for --frames\n{USAGE}")]
    MissingFrameCount,
}

struct CliOptions {
    frames: Option<u32>,
    show_help: bool,
}

impl CliOptions {
    fn parse() -> Result<Self, CliError> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut args = args;
        let mut frames = None;
        let mut show_help = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => {
                    let value = args.next().ok_or(CliError::MissingFrameCount)?;
                    frames = Some(
                        value
                            .parse::<u32>()
                            .map_err(|_| CliError::InvalidFrameCount(value))?,
                    );
                }
                "--help" => show_help = true,
                _ => return Err(CliError::UnknownArgument(arg)),
            }
        }
        Ok(Self { frames, show_help })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions, CliError> {
        CliOptions::parse_from(args.iter().map(|arg| (*arg).to_string()))
    }

    #[test]
    fn no_arguments_means_run_forever() {
        let options = parse(&[]).expect("parse");
        assert_eq!(options.frames, None);
        assert!(!options.show_help);
    }

    #[test]
    fn frames_takes_a_count() {
        let options = parse(&["--frames", "120"]).expect("parse");
        assert_eq!(options.frames, Some(120));
    }

    #[test]
    fn frames_without_a_value_is_an_error() {
        assert!(matches!(
            parse(&["--frames"]),
            Err(CliError::MissingFrameCount)
        ));
    }

    #[test]
    fn non_numeric_frames_are_rejected() {
        assert!(matches!(
            parse(&["--frames", "lots"]),
            Err(CliError::InvalidFrameCount(value)) if value == "lots"
        ));
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(matches!(
            parse(&["--bogus"]),
            Err(CliError::UnknownArgument(arg)) if arg == "--bogus"
        ));
    }
}
