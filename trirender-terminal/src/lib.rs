/// Terminal host for the trirender viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use trirender_core::{FrameRenderer, Scene};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Runs the load-then-render cycle in the terminal.
///
/// Every pass through the loop renders exactly one frame. Without a frame
/// cap the loop never sleeps.
pub struct TerminalApp {
    scene: Scene,
    frames: FrameRenderer,
    renderer: AsciiRenderer,
    frame_cap: Option<Duration>,
    running: bool,
    last_sample: Instant,
    sampled_frames: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, zoom: f32, max_fps: Option<u32>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene,
            frames: FrameRenderer::new(zoom),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_cap: max_fps
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            running: true,
            last_sample: Instant::now(),
            sampled_frames: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::info!(
            "rendering {} triangles at {}x{}",
            self.scene.total_triangles(),
            self.renderer.width(),
            self.renderer.height()
        );

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        log::info!("stopped after {} frames", self.frames.frames());

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }

            self.frames.render_frame(&self.scene, &mut self.renderer);
            self.draw()?;

            if let Some(target) = self.frame_cap {
                let elapsed = frame_start.elapsed();
                if elapsed < target {
                    std::thread::sleep(target - elapsed);
                }
            }

            self.sample_fps();
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                // Raw mode swallows SIGINT
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.running = false
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn sample_fps(&mut self) {
        self.sampled_frames += 1;
        let now = Instant::now();
        let elapsed = now - self.last_sample;
        if elapsed.as_secs() >= 1 {
            self.fps = self.sampled_frames as f32 / elapsed.as_secs_f32();
            self.sampled_frames = 0;
            self.last_sample = now;
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Status line overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "TriangleRender | {} triangles | angle {:.0} | FPS: {:.1} | Q=Quit",
                self.scene.total_triangles(),
                self.frames.view().rotation.angle,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
