mod app;

use std::env;

use nalgebra::vector;

const WIDTH: u32  = 500;
const HEIGHT: u32 = 500;

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, Box<dyn std::error::Error>> {
    let raw = args.get(i + 1).ok_or(format!("missing value after {}", args[i]))?;
    return raw.parse::<T>().map_err(|_| format!("bad value for {}: {}", args[i], raw).into());
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Default values.
    let mut params = app::Params {
        width: WIDTH,
        height: HEIGHT,
        print_fps: false,
        max_fps: 144,
        asset_path: String::from("assets/prism.obj"),
        depth_path: None,
        color_path: None,
        export_every_frame: false,
        frames: 0,
        workers: 1,
        light_gain: 10.0,
        model_rotation: vector![125.0, 120.0, 50.0],
    };

    let args: Vec<String> = env::args().collect();
    for i in 1..args.len() {
        match args[i].as_str() {
            "-p" => { params.asset_path = parse_value(&args, i)?; }
            "-o" => { params.depth_path = Some(parse_value(&args, i)?); }
            "-c" => { params.color_path = Some(parse_value(&args, i)?); }
            "-w" => { params.workers = parse_value(&args, i)?; }
            "-g" => { params.light_gain = parse_value(&args, i)?; }
            "-n" => { params.frames = parse_value(&args, i)?; }
            "-f" => { params.print_fps = true; }
            "-e" => { params.export_every_frame = true; }
            _ => ()
        }
    }

    app::run(params)?;

    return Ok(());
}
