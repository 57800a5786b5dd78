/// Terminal viewer for the SR3D software rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use sr3d_core::{
    Camera, Mesh, ModelTransform, RenderStats, SceneUniforms, Shader, Texture, PhongShader,
    UnlitShader,
};

pub mod config;
pub mod renderer;

pub use config::{AppConfig, ShadingMode};
pub use renderer::TerminalRenderer;

/// Character cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 0.5;
const ROTATE_STEP: f64 = 0.1;
const ZOOM_STEP: f64 = 1.1;

impl ShadingMode {
    pub fn shader(self) -> &'static dyn Shader {
        match self {
            ShadingMode::Phong => &PhongShader,
            ShadingMode::Unlit => &UnlitShader,
        }
    }
}

/// Scale and offset that fit the mesh's positions in a sphere of radius `radius`
/// around the origin
pub fn fit_to_radius(mesh: &Mesh, radius: f64) -> ModelTransform {
    let mut transform = ModelTransform::new();
    if mesh.attr_dim() < 3 || mesh.vert_num() == 0 {
        return transform;
    }
    let positions = || mesh.vertices().map(|v| Vector3::new(v[0], v[1], v[2]));
    let (min, max) = positions().fold(
        (Vector3::repeat(f64::INFINITY), Vector3::repeat(f64::NEG_INFINITY)),
        |(min, max), p| (min.inf(&p), max.sup(&p)),
    );
    let center = (min + max) / 2.0;
    let extent = positions().map(|p| (p - center).norm()).fold(0.0, f64::max);
    if extent > 0.0 && extent.is_finite() {
        transform.scale = radius / extent;
    }
    transform.translation = -center * transform.scale;
    transform
}

/// The viewer's scene: everything one frame needs, plus loop state
pub struct TerminalApp {
    mesh: Mesh,
    textures: Vec<Texture>,
    camera: Camera,
    transform: ModelTransform,
    shading: ShadingMode,
    renderer: TerminalRenderer,
    frame_time: Duration,
    running: bool,
    paused: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    stats: RenderStats,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(mesh, config, width as usize, height as usize))
    }

    pub fn with_size(mesh: Mesh, config: &AppConfig, width: usize, height: usize) -> Self {
        let mut transform = fit_to_radius(&mesh, 1.5);
        transform.rotate(0.3, 0.3, 0.0);
        let texture = Texture::checkerboard(64, 8, [0.9, 0.35, 0.2], [0.95, 0.9, 0.8]);

        let mut app = Self {
            mesh,
            textures: vec![texture],
            camera: Camera::new(width, height),
            transform,
            shading: config.shading,
            renderer: TerminalRenderer::new(width, height),
            frame_time: config.frame_time(),
            running: true,
            paused: false,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: RenderStats::default(),
        };
        app.resize(width, height);
        app
    }

    pub fn shading(&self) -> ShadingMode {
        self.shading
    }

    pub fn renderer(&self) -> &TerminalRenderer {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    /// Render one frame and print it without touching the terminal mode
    pub fn print_frame<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.render_frame();
        writer.write_all(self.renderer.to_text().as_bytes())?;
        writer.flush()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if !self.paused {
                self.transform.rotate(0.01, 0.015, 0.0);
            }
            self.render_frame();
            self.present()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.renderer.resize(width, height);
        self.camera.set_aspect(width, height);
        self.camera.aspect *= CELL_ASPECT;
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code)
            }
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.transform.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.transform.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.transform.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.transform.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => self.transform.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => self.transform.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.zoom(ZOOM_STEP),
            KeyCode::Char('t') => {
                self.shading = self.shading.toggled();
                log::debug!("shading: {:?}", self.shading);
            }
            KeyCode::Char('p') => self.camera.toggle_mode(),
            KeyCode::Char(' ') => self.paused = !self.paused,
            _ => {}
        }
    }

    fn zoom(&mut self, factor: f64) {
        let offset = (self.camera.position - self.camera.target) * factor;
        if offset.norm() > self.camera.near {
            self.camera.position = self.camera.target + offset;
        }
    }

    /// Draw the mesh into the renderer's buffers
    pub fn render_frame(&mut self) -> RenderStats {
        let scene = SceneUniforms::new(&self.camera, &self.transform)
            .with_light_direction(Vector3::new(-0.4, 0.6, 1.0));
        let uniforms = scene.to_uniforms();
        let textures: Vec<&Texture> = self.textures.iter().collect();

        self.renderer.clear();
        self.stats = self
            .renderer
            .render_mesh(&self.mesh, self.shading.shader(), &uniforms, &textures);
        self.stats
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SR3D | FPS: {:.1} | {:?} | {}/{} tris | T=Shader P=Projection +/-=Zoom Space=Pause Q=Quit",
                self.fps,
                self.shading,
                self.stats.triangles_rasterized,
                self.stats.triangles_submitted,
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_fit_to_radius() {
        let mesh = Mesh::sphere(4.0, 6, 12);
        let transform = fit_to_radius(&mesh, 1.0);
        assert!((transform.scale - 0.25).abs() < 1e-9);
        assert!(transform.translation.norm() < 1e-9);
    }

    #[test]
    fn test_frame_renders_default_sphere() {
        let mut app = TerminalApp::with_size(Mesh::sphere(1.0, 8, 16), &AppConfig::default(), 40, 20);
        let stats = app.render_frame();
        assert_eq!(stats.triangles_submitted, 8 * 16 * 2);
        assert!(stats.fragments_written > 0);

        let mut out = Vec::new();
        app.print_frame(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 20);
        assert!(text.chars().any(|c| c != ' ' && c != '\n'));
    }

    #[test]
    fn test_keys_switch_shader_and_quit() {
        let mut app = TerminalApp::with_size(Mesh::cube(2.0), &AppConfig::default(), 10, 10);
        assert_eq!(app.shading(), ShadingMode::Phong);
        app.handle_event(key('t'));
        assert_eq!(app.shading(), ShadingMode::Unlit);
        app.handle_event(key('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_resize_event() {
        let mut app = TerminalApp::with_size(Mesh::cube(2.0), &AppConfig::default(), 10, 10);
        app.handle_event(Event::Resize(30, 12));
        assert_eq!(app.renderer().width(), 30);
        assert_eq!(app.renderer().height(), 12);
        assert!((app.camera.aspect - 30.0 / 12.0 * CELL_ASPECT).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_stays_outside_near_plane() {
        let mut app = TerminalApp::with_size(Mesh::cube(2.0), &AppConfig::default(), 10, 10);
        for _ in 0..200 {
            app.handle_event(key('+'));
        }
        let distance = (app.camera.position - app.camera.target).norm();
        assert!(distance > app.camera.near);
    }
}
