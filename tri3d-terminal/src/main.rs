/// TRI3D Terminal Demo - Rotating mesh
///
/// Renders a mesh file (or a built-in cube) with the TRI3D pipeline.
/// Controls:
///   - W/S / Up/Down: Move away from / towards the viewer
///   - A/D / Left/Right: Move sideways
///   - M: Toggle wireframe/solid
///   - R: Reload the mesh
///   - Q/ESC: Quit
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Error;
use tracing_subscriber::EnvFilter;
use tri3d_core::{CubeObject, MeshObject, Pose, RenderConfig, RenderMode, SceneObject};
use tri3d_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(version, about = "Render a triangle mesh in the terminal")]
struct Args {
    /// Mesh file with `v x y z` and `f a b c` records. Uses a cube if omitted.
    mesh: Option<PathBuf>,

    /// TOML file with render settings
    #[arg(short, long, env = "TRI3D_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the configured render mode
    #[arg(short, long)]
    mode: Option<RenderMode>,

    /// Initial distance from the viewer along z
    #[arg(short, long, default_value_t = 3.0)]
    distance: f32,
}

fn main() -> Result<(), Error> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }

    let pose = Pose::at(0.0, 0.0, args.distance);
    let object: Box<dyn SceneObject> = match &args.mesh {
        Some(path) => {
            let object = MeshObject::load(path).with_pose(pose);
            tracing::info!(
                path = %path.display(),
                triangles = object.mesh().count(),
                "loaded mesh"
            );
            Box::new(object)
        }
        None => Box::new(CubeObject::new(1.0).with_pose(pose)),
    };

    let mut app = TerminalApp::new(object, &config)?;
    app.run()?;

    Ok(())
}
