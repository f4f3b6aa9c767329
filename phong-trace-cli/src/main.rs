mod camera;
mod logger;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use phong_trace_core::{trace_debug_ray, PointLight, V2, V3};
use phong_trace_obj::load_scene_mesh;

use crate::camera::PerspectiveCamera;

#[derive(Parser)]
#[command(name = "phong-trace", about = "Renders a triangle mesh with BVH-accelerated Phong raytracing")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Renders the full image and writes it out as a PPM file.
    Render(RenderArgs),
    /// Traces a single pixel's ray and reports its reflection chain,
    /// without rendering the full image.
    DebugRay(DebugRayArgs),
}

#[derive(Clone, ValueEnum)]
enum Background {
    Red,
    Green,
    Blue,
    White,
    Black,
}

impl Background {
    fn color(&self) -> V3 {
        match self {
            Background::Red => V3(1.0, 0.0, 0.0),
            Background::Green => V3(0.0, 1.0, 0.0),
            Background::Blue => V3(0.0, 0.0, 1.0),
            Background::White => V3(1.0, 1.0, 1.0),
            Background::Black => V3::ZERO,
        }
    }
}

fn parse_vec3(s: &str) -> Result<V3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let [x, y, z] = match parts.as_slice() {
        [x, y, z] => [x, y, z],
        _ => return Err(format!("expected \"x,y,z\", got \"{s}\"")),
    };
    let parse = |s: &str| s.trim().parse::<f32>().map_err(|_| format!("not a number: \"{s}\""));
    Ok(V3(parse(x)?, parse(y)?, parse(z)?))
}

#[derive(clap::Args)]
struct SceneArgs {
    /// Path to the .obj mesh to render.
    obj_path: PathBuf,

    /// Output image width in pixels.
    #[arg(long, default_value_t = 800)]
    width: i64,

    /// Output image height in pixels.
    #[arg(long, default_value_t = 600)]
    height: i64,

    /// Vertical field of view, in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Camera position, as "x,y,z".
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,10")]
    eye: V3,

    /// Point the camera looks toward, as "x,y,z".
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    look_at: V3,

    /// Background color returned for rays that hit nothing.
    #[arg(long, value_enum, default_value = "black")]
    background: Background,

    /// Adds a point light at the camera's eye position, in addition to
    /// any lights defined in the mesh's material data.
    #[arg(long)]
    add_light_at_eye: bool,
}

impl SceneArgs {
    fn load_scene(&self) -> anyhow::Result<phong_trace_core::Scene> {
        let mesh = load_scene_mesh(&self.obj_path)?;
        let mut lights = Vec::new();
        if self.add_light_at_eye {
            lights.push(PointLight::new(self.eye));
        }
        let scene = phong_trace_core::Scene::build(mesh.faces, mesh.materials, lights, self.background.color())?;
        Ok(scene)
    }

    fn build_camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::new(self.eye, self.look_at, self.fov, self.width as f32, self.height as f32)
    }
}

#[derive(clap::Args)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Where to write the rendered PPM image.
    #[arg(long, default_value = "out.ppm")]
    output: PathBuf,

    /// Number of worker threads to render with.
    #[arg(long, default_value_t = 4)]
    threads: u32,
}

#[derive(clap::Args)]
struct DebugRayArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Pixel column to trace.
    #[arg(long)]
    x: usize,

    /// Pixel row to trace.
    #[arg(long)]
    y: usize,
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = Arc::new(args.scene.load_scene()?);
    let camera: Arc<dyn phong_trace_core::Camera + Send + Sync> = Arc::new(args.scene.build_camera());

    log::info!(
        "rendering {}x{} with {} threads",
        args.scene.width,
        args.scene.height,
        args.threads
    );
    let image = render::render_parallel(scene, camera, args.scene.width, args.scene.height, args.threads)?;

    let file = std::fs::File::create(&args.output)?;
    image.write_ppm(std::io::BufWriter::new(file))?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}

fn run_debug_ray(args: DebugRayArgs) -> anyhow::Result<()> {
    let scene = args.scene.load_scene()?;
    let camera = args.scene.build_camera();

    let probe = trace_debug_ray(&scene, &camera, V2::new(args.x as f32, args.y as f32));
    if probe.hit_points.is_empty() {
        println!("pixel ({}, {}): no hit (background)", args.x, args.y);
        return Ok(());
    }
    println!("pixel ({}, {}): {} hit(s)", args.x, args.y, probe.hit_points.len());
    for (bounce, point) in probe.hit_points.iter().enumerate() {
        println!("  bounce {bounce}: ({:.4}, {:.4}, {:.4})", point.x(), point.y(), point.z());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    logger::init(level).expect("logger already initialized");

    match cli.command {
        Command::Render(args) => run_render(args),
        Command::DebugRay(args) => run_debug_ray(args),
    }
}
