/// Terminal host for the TRI3D pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tri3d_core::{
    FrameBuffers, FrameStats, Nudge, RenderConfig, RenderContext, RenderMode, SceneObject,
};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u32 = 2;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    object: Box<dyn SceneObject>,
    context: RenderContext,
    buffers: FrameBuffers,
    renderer: AsciiRenderer,
    translate_step: f32,
    running: bool,
    last_frame: Instant,
    last_fps_update: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
    status: Option<String>,
}

impl TerminalApp {
    pub fn new(object: Box<dyn SceneObject>, config: &RenderConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut context = RenderContext::new(config, 1.0);
        context.resize(width as u32, height as u32 * CELL_ASPECT);

        Ok(Self {
            object,
            context,
            buffers: FrameBuffers::with_capacity(config.max_vertices),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            translate_step: config.translate_step,
            running: true,
            last_frame: Instant::now(),
            last_fps_update: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
            status: None,
        })
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

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        self.last_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            let elapsed = (frame_start - self.last_frame).as_secs_f32();
            self.last_frame = frame_start;
            self.render(elapsed)?;

            // Frame timing
            self.frame_count += 1;
            let spent = frame_start.elapsed();
            if spent < target_frame_time {
                std::thread::sleep(target_frame_time - spent);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_update).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_update).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_update = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.context
                    .resize(width as u32, height as u32 * CELL_ASPECT);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('m') => {
                self.context.mode = match self.context.mode {
                    RenderMode::Wireframe => RenderMode::Solid,
                    RenderMode::Solid => RenderMode::Wireframe,
                };
            }
            KeyCode::Char('r') => {
                self.object.reload();
            }
            KeyCode::Up => Nudge::Forward.apply(self.object.pose_mut(), self.translate_step),
            KeyCode::Down => Nudge::Back.apply(self.object.pose_mut(), self.translate_step),
            KeyCode::Left => Nudge::Left.apply(self.object.pose_mut(), self.translate_step),
            KeyCode::Right => Nudge::Right.apply(self.object.pose_mut(), self.translate_step),
            KeyCode::Char(c) => {
                if let Some(nudge) = Nudge::from_key(c) {
                    nudge.apply(self.object.pose_mut(), self.translate_step);
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, elapsed: f32) -> io::Result<()> {
        self.buffers.reset();
        self.renderer.clear();

        match self.object.render(&self.context, elapsed, &mut self.buffers) {
            Ok(stats) => {
                self.stats = stats;
                self.status = None;
                self.renderer.render_buffers(&self.buffers, self.context.mode);
            }
            Err(error) => {
                self.status = Some(error.to_string());
            }
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let pose = self.object.pose();
        let overlay = match &self.status {
            Some(status) => format!("TRI3D | {} | {}", self.object.name(), status),
            None => format!(
                "TRI3D | {} | FPS: {:.1} | tris {}/{} | pos ({:.1}, {:.1}, {:.1}) | WASD/Arrows=Move M=Mode R=Reload Q=Quit",
                self.object.name(),
                self.fps,
                self.stats.emitted,
                self.stats.processed,
                pose.x,
                pose.y,
                pose.z,
            ),
        };
        let color = if self.status.is_some() {
            Color::Red
        } else {
            Color::Yellow
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(color),
            Print(overlay),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
