use std::thread;
use std::time;

use log::{info, warn};
use nalgebra as na;
use na::{point, vector, Matrix4, Vector3};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use tiny_pipeline::export::{write_color_image, write_depth_bmp};
use tiny_pipeline::model::Mesh;
use tiny_pipeline::{FrameTarget, Lighting, Pipeline, TransformContext, Uniforms};

/// Execution parameters of the viewer.
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub print_fps: bool,
    pub max_fps: u32,
    pub asset_path: String,
    pub depth_path: Option<String>,
    pub color_path: Option<String>,
    pub export_every_frame: bool,
    pub frames: u32, // 0 means run until Escape is pressed.
    pub workers: usize,
    pub light_gain: f32,
    pub model_rotation: Vector3<f32>, // Initial orientation of the model, degrees.
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape) && event.input.state.is_released() {
            return true;
        }
    }

    return false;
}

/// Spin angles in degrees (around y, around x) after `passed_time` seconds.
/// The model starts almost unrotated and turns 144 and 28.8 degrees per second.
fn spin_angles(passed_time: f32) -> (f32, f32) {
    return (
        std::f32::consts::FRAC_PI_3 + 144.0 * passed_time,
        0.37 + 28.8 * passed_time,
    );
}

/// Model matrix, spinning around y and slowly tumbling around x.
fn model_matrix(angle_y_deg: f32, angle_x_deg: f32) -> Matrix4<f32> {
    let translation = Matrix4::new_translation(&vector![-0.05, -0.09, 0.0]);
    let scale = Matrix4::new_scaling(0.15);
    let rotation_x = Matrix4::from_axis_angle(&Vector3::x_axis(), angle_x_deg.to_radians());
    let rotation_y = Matrix4::from_axis_angle(&Vector3::y_axis(), angle_y_deg.to_radians());
    return translation * scale * rotation_x * rotation_y;
}

/// Camera placed at (0, 0, -5) looking at the origin.
fn view_matrix() -> Matrix4<f32> {
    return Matrix4::look_at_rh(&point![0.0, 0.0, -5.0], &point![0.0, 0.0, 0.0], &Vector3::y());
}

fn projection_matrix(width: u32, height: u32) -> Matrix4<f32> {
    let fovy = 20.0_f32.to_radians();
    let aspect = width as f32 / height as f32;
    return Matrix4::new_perspective(aspect, fovy, 0.1, 100.0);
}

/// Maps [-1, 1] device coordinates onto the pixel grid, z onto [-0.25, 0.75].
fn viewport_matrix(width: u32, height: u32) -> Matrix4<f32> {
    let scale = Matrix4::new_nonuniform_scaling(&vector![width as f32 / 2.0, height as f32 / 2.0, 0.5]);
    let translation = Matrix4::new_translation(&vector![1.0, 1.0, 0.5]);
    return scale * translation;
}

/// Loads the model, then renders it frame after frame into a window until Escape is released or
/// the frame limit is hit.
pub fn run(params: Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = Mesh::load(&params.asset_path)?;
    mesh.rotate(params.model_rotation);
    let vertex_array = mesh.vertex_array()?;
    if vertex_array.is_empty() {
        warn!("{} has no triangles, frames will stay empty", params.asset_path);
    }

    let pipeline = Pipeline::new().with_workers(params.workers);
    let mut frame_target = FrameTarget::new(params.width, params.height);
    let lighting = Lighting::new(vector![0.5, 0.5, 1.0], params.light_gain);
    info!("rendering with {} worker(s)", pipeline.workers());

    let window_options: WindowOptions = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("output", window_options)?;
    let event_channel = window.event_channel()?;

    let frame_duration = time::Duration::from_secs_f32(1.0 / params.max_fps.max(1) as f32);
    let time_begin = time::Instant::now();
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    let mut frames_rendered: u32 = 0;
    let mut exit = false;
    while !exit {
        let frame_begin = time::Instant::now();
        let passed_time = frame_begin.duration_since(time_begin).as_secs_f32();

        let (angle_y, angle_x) = spin_angles(passed_time);
        let transform = TransformContext {
            model: model_matrix(angle_y, angle_x),
            view: view_matrix(),
            projection: projection_matrix(params.width, params.height),
            viewport: viewport_matrix(params.width, params.height),
        };
        let uniforms = Uniforms::new(transform, lighting);

        // Clearing z-buffer and resetting rendered data to the clear color.
        frame_target.begin_frame();
        pipeline.render(&vertex_array, &uniforms, &mut frame_target)?;
        frames_rendered += 1;

        let render_data = frame_target.as_rgb_data();
        let image_data = ImageView::new(ImageInfo::rgb8(params.width, params.height), &render_data);
        window.set_image("image", image_data)?;

        // Unloading all the garbage from event channel, that has piled up, looking for exit event.
        exit = event_channel
            .try_iter()
            .map(|window_event| is_exit_event(window_event))
            .fold(false, |was_exit_event, is_exit_event| was_exit_event || is_exit_event);
        if params.frames != 0 && frames_rendered >= params.frames {
            exit = true;
        }

        if params.export_every_frame || exit {
            if let Some(depth_path) = &params.depth_path {
                write_depth_bmp(&frame_target, depth_path)?;
            }
            if let Some(color_path) = &params.color_path {
                write_color_image(&frame_target, color_path)?;
            }
        }

        if params.print_fps {
            // Counting frames to printout stats every seconds.
            frame_counter += 1;
            if time::Instant::now()
                .duration_since(frame_counter_time_begin)
                .as_secs_f32() > 1.0 {
                println!("FPS --- {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }

        if let Some(rest) = frame_duration.checked_sub(frame_begin.elapsed()) {
            thread::sleep(rest);
        }
    }

    return Ok(());
}
