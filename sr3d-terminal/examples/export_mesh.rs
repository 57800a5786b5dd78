/// Example: write the built-in meshes in the text mesh format
///
/// Usage: cargo run --example export_mesh -- [output-directory]
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use sr3d_core::{load_mesh, save_mesh, Mesh};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(env::temp_dir);

    for (name, mesh) in [
        ("cube.mesh", Mesh::cube(2.0)),
        ("sphere.mesh", Mesh::sphere(1.0, 16, 32)),
    ] {
        let path = dir.join(name);
        save_mesh(&mesh, &path)?;
        let reloaded = load_mesh(&path)?;
        println!(
            "{}: {} triangles, {} vertices",
            path.display(),
            reloaded.tri_num(),
            reloaded.vert_num()
        );
    }
    Ok(())
}
