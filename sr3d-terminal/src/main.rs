/// SR3D Terminal Viewer
///
/// Renders a mesh file (or a UV sphere) with the software rasterizer.
/// Run with `--help` for options and controls.
use anyhow::{bail, Context, Result};
use clap::Parser;
use sr3d_core::{load_mesh, save_mesh, Mesh, XYZSTNOP_DIM};
use sr3d_terminal::{AppConfig, TerminalApp};

fn load(config: &AppConfig) -> Result<Mesh> {
    let mesh = match &config.mesh {
        Some(path) => load_mesh(path)
            .with_context(|| format!("failed to load mesh from {}", path.display()))?,
        None => {
            let (lat_num, long_num) = config.sphere_resolution();
            Mesh::sphere(1.0, lat_num, long_num)
        }
    };
    if mesh.attr_dim() != XYZSTNOP_DIM {
        bail!(
            "mesh has {} attributes per vertex; the viewer needs {} (XYZ ST NOP)",
            mesh.attr_dim(),
            XYZSTNOP_DIM
        );
    }
    Ok(mesh)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = AppConfig::parse();

    let mesh = load(&config)?;
    log::info!(
        "displaying {} triangles over {} vertices",
        mesh.tri_num(),
        mesh.vert_num()
    );

    if let Some(path) = &config.save {
        save_mesh(&mesh, path)
            .with_context(|| format!("failed to save mesh to {}", path.display()))?;
        log::info!("saved mesh to {}", path.display());
    }

    let mut app = if config.once {
        TerminalApp::with_size(mesh, &config, 80, 40)
    } else {
        TerminalApp::new(mesh, &config).context("failed to query the terminal size")?
    };
    if config.once {
        app.print_frame(&mut std::io::stdout())?;
    } else {
        app.run()?;
    }
    Ok(())
}
