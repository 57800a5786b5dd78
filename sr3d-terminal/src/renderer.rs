/// Glyph output of a software-rendered framebuffer
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sr3d_core::{
    DepthBuffer, Framebuffer, Mesh, MeshRenderer, RenderStats, Shader, Texture, Viewport,
    FAR_DEPTH,
};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Rec. 709 luma of a linear RGB color
fn luminance(rgb: [f64; 3]) -> f64 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

/// Pick the ramp character for a shaded pixel
pub fn glyph_for(rgb: [f64; 3]) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let level = luminance(rgb).clamp(0.0, 1.0) * last as f64;
    LUMINOSITY_RAMP[(level.round() as usize).min(last)]
}

fn to_color(rgb: [f64; 3]) -> Color {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(rgb[0]),
        g: channel(rgb[1]),
        b: channel(rgb[2]),
    }
}

/// Renders meshes into character cells, one pixel per cell
pub struct TerminalRenderer {
    framebuffer: Framebuffer,
    depth: DepthBuffer,
    renderer: MeshRenderer,
}

impl TerminalRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
            renderer: MeshRenderer::new(Viewport::new(width, height)),
        }
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width()
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.framebuffer.resize(width, height);
        self.depth.resize(width, height);
        self.renderer.set_viewport(Viewport::new(width, height));
    }

    pub fn clear(&mut self) {
        self.framebuffer.clear([0.0; 3]);
        self.depth.reset_to_far();
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        shader: &dyn Shader,
        uniforms: &[f64],
        textures: &[&Texture],
    ) -> RenderStats {
        self.renderer.render(
            mesh,
            shader,
            uniforms,
            textures,
            &mut self.depth,
            &mut self.framebuffer,
        )
    }

    /// The character shown at a cell; `y` counts rows from the bottom
    pub fn glyph(&self, x: usize, y: usize) -> char {
        if self.depth.get(x, y) == FAR_DEPTH {
            return ' ';
        }
        self.framebuffer.pixel(x, y).map_or(' ', glyph_for)
    }

    /// Queue the frame, top row first, with one newline-separated line per row
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let height = self.height();
        for y in (0..height).rev() {
            for x in 0..self.width() {
                let c = self.glyph(x, y);
                if c != ' ' {
                    if let Some(rgb) = self.framebuffer.pixel(x, y) {
                        writer.queue(SetForegroundColor(to_color(rgb)))?;
                    }
                }
                writer.queue(Print(c))?;
            }
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// The frame as plain text, top row first
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width() + 1) * self.height());
        for y in (0..self.height()).rev() {
            text.extend((0..self.width()).map(|x| self.glyph(x, y)));
            text.push('\n');
        }
        text
    }
}
