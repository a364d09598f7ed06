/// Interactive terminal room viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use roomview_core::{
    pick, FurnitureId, FurnitureType, ModelCache, OrbitCamera, RenderSettings, Room,
    SceneRenderer, Vec3,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod config;
pub mod loader;
pub mod renderer;

pub use config::AppConfig;
pub use loader::ObjDirectoryLoader;
pub use renderer::{CellCanvas, CELL_HEIGHT, CELL_WIDTH};

/// Keyboard orbit step in degrees.
const ORBIT_STEP: f64 = 10.0;
/// Keyboard move step in centimeters.
const MOVE_STEP: f64 = 10.0;
/// Keyboard rotate step in degrees.
const ROTATE_STEP: f64 = 15.0;

const HELP: &str = "Drag=orbit/move Wheel=zoom Arrows=orbit R/T/F/S=views 1-9=add Tab=select IJKL=move ,.=turn X=del M=mode A=ascii B/G/N/C=toggles Q=quit";

/// A drag in progress, tracked in cells.
#[derive(Debug, Clone, Copy)]
struct Drag {
    col: u16,
    row: u16,
    target: Option<FurnitureId>,
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    room: Room,
    camera: OrbitCamera,
    models: ModelCache,
    renderer: SceneRenderer,
    canvas: CellCanvas,
    selected: Option<FurnitureId>,
    drag: Option<Drag>,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Builds an app drawing into a `cols` x `rows` cell canvas.
    pub fn new(
        room: Room,
        settings: RenderSettings,
        models: ModelCache,
        ascii: bool,
        cols: u16,
        rows: u16,
    ) -> Self {
        Self {
            room,
            camera: OrbitCamera::new(),
            models,
            renderer: SceneRenderer::new(settings),
            canvas: CellCanvas::new(usize::from(cols), usize::from(rows), ascii),
            selected: None,
            drag: None,
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn canvas(&self) -> &CellCanvas {
        &self.canvas
    }

    pub fn selected(&self) -> Option<FurnitureId> {
        self.selected
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        info!(
            width = self.room.width(),
            length = self.room.length(),
            height = self.room.height(),
            models = self.models.len(),
            "viewer started"
        );

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            if self.dirty {
                self.render()?;
                self.dirty = false;
                self.frame_count += 1;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("viewer stopped");
        Ok(())
    }

    /// Applies one input event to the scene or camera.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                self.canvas.resize(usize::from(cols), usize::from(rows));
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        self.dirty = true;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('r') => self.camera.reset(),
            KeyCode::Char('t') => self.camera.top_view(),
            KeyCode::Char('f') => self.camera.front_view(),
            KeyCode::Char('s') => self.camera.side_view(),
            KeyCode::Left => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Right => self.camera.orbit(ORBIT_STEP, 0.0),
            KeyCode::Up => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::Down => self.camera.orbit(0.0, -ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.set_zoom_steps(-1),
            KeyCode::Char('-') => self.camera.set_zoom_steps(1),
            KeyCode::Char('m') => {
                let on = self.camera.toggle_rotate_mode();
                debug!(rotate_mode = on, "drag mode changed");
            }
            KeyCode::Char('b') => toggle(&mut self.renderer.settings_mut().show_boundary),
            KeyCode::Char('g') => toggle(&mut self.renderer.settings_mut().show_grid),
            KeyCode::Char('n') => toggle(&mut self.renderer.settings_mut().show_labels),
            KeyCode::Char('a') => {
                let ascii = !self.canvas.is_ascii();
                self.canvas.set_ascii(ascii);
            }
            KeyCode::Char('c') => {
                let has_ceiling = !self.room.has_ceiling();
                self.room.set_has_ceiling(has_ceiling);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.add_furniture(FurnitureType::ALL[index]);
            }
            KeyCode::Tab => self.select_next(),
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected.take() {
                    self.room.remove_furniture(id);
                }
            }
            KeyCode::Char('X') => {
                self.room.clear_furniture();
                self.selected = None;
            }
            KeyCode::Char(',') => self.rotate_selected(-ROTATE_STEP),
            KeyCode::Char('.') => self.rotate_selected(ROTATE_STEP),
            KeyCode::Char('i') => self.move_selected(Vec3::new(0.0, 0.0, -MOVE_STEP)),
            KeyCode::Char('k') => self.move_selected(Vec3::new(0.0, 0.0, MOVE_STEP)),
            KeyCode::Char('j') => self.move_selected(Vec3::new(-MOVE_STEP, 0.0, 0.0)),
            KeyCode::Char('l') => self.move_selected(Vec3::new(MOVE_STEP, 0.0, 0.0)),
            KeyCode::PageUp => self.move_selected(Vec3::new(0.0, MOVE_STEP, 0.0)),
            KeyCode::PageDown => self.move_selected(Vec3::new(0.0, -MOVE_STEP, 0.0)),
            _ => self.dirty = false,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let at = CellCanvas::cell_center(mouse.column, mouse.row);
                let hit = pick(
                    at,
                    self.room.furniture_list(),
                    &self.camera,
                    self.canvas.viewport(),
                );
                self.selected = hit;
                self.drag = Some(Drag {
                    col: mouse.column,
                    row: mouse.row,
                    target: hit,
                });
                self.dirty = true;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.drag else {
                    return;
                };
                let dx = (f64::from(mouse.column) - f64::from(drag.col)) * CELL_WIDTH;
                let dy = (f64::from(mouse.row) - f64::from(drag.row)) * CELL_HEIGHT;
                match drag.target {
                    Some(id) if !self.camera.rotate_mode() => {
                        self.room.drag_furniture(id, dx, dy, &self.camera);
                    }
                    _ => self.camera.orbit(-dx, -dy),
                }
                self.drag = Some(Drag {
                    col: mouse.column,
                    row: mouse.row,
                    ..drag
                });
                self.dirty = true;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag = None;
            }
            MouseEventKind::ScrollUp => {
                self.camera.set_zoom_steps(-1);
                self.dirty = true;
            }
            MouseEventKind::ScrollDown => {
                self.camera.set_zoom_steps(1);
                self.dirty = true;
            }
            _ => {}
        }
    }

    /// Adds a piece of the given type standing on the floor at the room
    /// center, and selects it.
    pub fn add_furniture(&mut self, kind: FurnitureType) -> FurnitureId {
        let height = kind.default_dimension().height;
        let name = display_name(kind);
        let id = self.room.add_furniture(name, kind, Vec3::new(0.0, height / 2.0, 0.0));
        self.selected = Some(id);
        self.dirty = true;
        id
    }

    fn select_next(&mut self) {
        let list = self.room.furniture_list();
        if list.is_empty() {
            self.selected = None;
            return;
        }
        let next = match self.selected.and_then(|id| list.iter().position(|f| f.id == id)) {
            Some(i) => (i + 1) % list.len(),
            None => 0,
        };
        self.selected = Some(list[next].id);
    }

    fn move_selected(&mut self, delta: Vec3) {
        if let Some(id) = self.selected {
            self.room.move_furniture(id, delta);
        }
    }

    fn rotate_selected(&mut self, degrees: f64) {
        if let Some(id) = self.selected {
            self.room.rotate_furniture(id, degrees);
        }
    }

    fn status_line(&self) -> String {
        let selected = self
            .selected
            .and_then(|id| self.room.furniture(id))
            .map(|f| format!("{} ({:.0}, {:.0}, {:.0})", f.name, f.position.x, f.position.y, f.position.z))
            .unwrap_or_else(|| "none".to_string());
        let mode = if self.camera.rotate_mode() { "rotate" } else { "move" };
        format!(
            "Roomview | {} | zoom {:.2} | drag: {} | selected: {} | FPS: {:.1}",
            self.camera.view_label(),
            self.camera.zoom(),
            mode,
            selected,
            self.fps
        )
    }

    /// Renders the scene into the cell canvas without touching the terminal.
    pub fn draw_scene(&mut self) {
        let snapshot = self.room.snapshot();
        let frame = self.renderer.render(
            &snapshot,
            self.selected,
            &self.camera,
            self.canvas.viewport(),
            &self.models,
        );
        frame.replay(&mut self.canvas);
        debug!(
            drawn = frame.stats.facets_drawn,
            culled = frame.stats.facets_culled,
            skipped = frame.stats.faces_skipped,
            "frame"
        );
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_scene();

        // Output to terminal
        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        let rows = self.canvas.rows() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            cursor::MoveTo(0, rows.saturating_sub(1)),
            SetForegroundColor(Color::Grey),
            Print(HELP),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn toggle(flag: &mut bool) {
    *flag = !*flag;
}

/// "bookshelf" -> "Bookshelf"
fn display_name(kind: FurnitureType) -> String {
    let name = kind.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
