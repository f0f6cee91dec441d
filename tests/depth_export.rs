//! Depth and color export after rendering a frame

use std::path::PathBuf;

use nalgebra::vector;
use tiny_pipeline::export::{write_color_image, write_depth_bmp, DepthExport};
use tiny_pipeline::model::Mesh;
use tiny_pipeline::{FrameTarget, Pipeline, Uniforms};

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("tiny_pipeline_{}_{}", std::process::id(), name));
    return path;
}

#[test]
fn sloped_triangle_exports_depth() {
    let points = [vector![0.0, 0.0, 0.0], vector![12.0, 0.0, 0.5], vector![0.0, 12.0, 1.0]];
    let mut target = FrameTarget::new(16, 16);
    Pipeline::new().render(&points, &Uniforms::default(), &mut target).unwrap();

    let path = temp_path("sloped.bmp");
    let result = write_depth_bmp(&target, &path).unwrap();
    match result {
        DepthExport::Written { min, max } => {
            assert!(min.abs() < 1e-5);
            assert!((max - 1.0).abs() < 1e-5);
        }
        DepthExport::Degenerate => panic!("sloped triangle should not be degenerate"),
    }

    let image = image::open(&path).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (16, 16));
    // Nearest vertex is black, untouched corner is white.
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(15, 15).0, [255, 255, 255]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn flat_frame_is_not_written() {
    let points = [vector![0.0, 0.0, 0.3], vector![8.0, 0.0, 0.3], vector![0.0, 8.0, 0.3]];
    let mut target = FrameTarget::new(16, 16);
    Pipeline::new().render(&points, &Uniforms::default(), &mut target).unwrap();

    let path = temp_path("flat.bmp");
    assert_eq!(write_depth_bmp(&target, &path).unwrap(), DepthExport::Degenerate);
    assert!(!path.exists());

    let empty = FrameTarget::new(4, 4);
    assert_eq!(write_depth_bmp(&empty, &path).unwrap(), DepthExport::Degenerate);
    assert!(!path.exists());
}

#[test]
fn obj_to_color_image() {
    let obj = "\
v 1 1 0
v 14 1 0
v 14 14 0
v 1 14 0
f 1 2 3 4
";
    let mesh = Mesh::from_reader(obj.as_bytes()).unwrap();
    let vertex_array = mesh.vertex_array().unwrap();
    assert_eq!(vertex_array.len(), 6);

    let mut target = FrameTarget::new(16, 16);
    let stats = Pipeline::new().render(&vertex_array, &Uniforms::default(), &mut target).unwrap();
    assert_eq!(stats.triangles, 2);

    let path = temp_path("quad.png");
    write_color_image(&target, &path).unwrap();
    let image = image::open(&path).unwrap().to_rgb8();
    assert_eq!(image.get_pixel(7, 7).0, [255, 255, 255]);
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
    std::fs::remove_file(&path).unwrap();
}
