/// Command-line configuration for the terminal viewer
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Which shipped shader draws the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ShadingMode {
    /// Textured diffuse plus Blinn-Phong specular under one directional light.
    #[default]
    Phong,
    /// Texture color only.
    Unlit,
}

impl ShadingMode {
    pub fn toggled(self) -> Self {
        match self {
            ShadingMode::Phong => ShadingMode::Unlit,
            ShadingMode::Unlit => ShadingMode::Phong,
        }
    }
}

/// SR3D terminal viewer arguments.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "sr3d-terminal",
    about = "Software-rasterized 3D meshes in the terminal",
    long_about = "Renders a mesh with a CPU rasterizer and prints it with true-color glyphs.\n\n\
        Without a mesh file a UV sphere is shown.\n\
        \n\
        CONTROLS:\n\
          WASD / arrows  rotate\n\
          E / R          roll\n\
          + / -          zoom\n\
          T              switch shader\n\
          P              switch perspective / orthographic\n\
          Space          pause the automatic spin\n\
          Q / Esc        quit",
    version
)]
pub struct AppConfig {
    /// Mesh file in the text mesh format (attribute layout XYZ ST NOP).
    pub mesh: Option<PathBuf>,

    /// Target frames per second.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Shader used for the first frame.
    #[arg(long, default_value = "phong", value_enum)]
    pub shading: ShadingMode,

    /// Latitude bands of the default sphere; longitude bands are twice this.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(3..=512))]
    pub sphere: u32,

    /// Write the displayed mesh to this path before starting.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Render a single frame to stdout and exit (no raw mode).
    #[arg(long)]
    pub once: bool,
}

impl AppConfig {
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    pub fn sphere_resolution(&self) -> (usize, usize) {
        let lat_num = self.sphere as usize;
        (lat_num, lat_num * 2)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mesh: None,
            fps: 30,
            shading: ShadingMode::Phong,
            sphere: 16,
            save: None,
            once: false,
        }
    }
}
