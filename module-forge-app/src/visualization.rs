use colored::{Color, Colorize};
use std::io::{self, Write};
use std::sync::Arc;
use wfc_core::{Grid, Placement};
use wfc_rules::{ModuleCatalog, ModuleId, ModuleState, Rotation};

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// What a scene looks like so far: the placements received, by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    cells: Grid<Option<ModuleState>>,
    placed: usize,
}

impl SceneFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Grid::new(width, height),
            placed: 0,
        }
    }

    /// Records a placement; placements outside the frame are ignored.
    pub fn place(&mut self, placement: &Placement) {
        if let Some(cell) = self.cells.get_mut(placement.x, placement.y) {
            if cell.replace(placement.state).is_none() {
                self.placed += 1;
            }
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<ModuleState> {
        self.cells.get(x, y).copied().flatten()
    }

    pub const fn width(&self) -> usize {
        self.cells.width
    }

    pub const fn height(&self) -> usize {
        self.cells.height
    }

    pub const fn placed(&self) -> usize {
        self.placed
    }

    pub fn is_complete(&self) -> bool {
        self.placed == self.cells.len()
    }
}

/// Trait for types that can show a scene while it is being collapsed.
pub trait Visualizer {
    /// Displays or updates the visualization for `frame`.
    fn display_state(&mut self, frame: &SceneFrame) -> Result<(), anyhow::Error>;
}

/// Draws each slot as an arrow pointing along its rotation, colored by
/// module. The void module is blank and empty slots are dots.
pub struct TerminalVisualizer {
    catalog: Arc<ModuleCatalog>,
    void_module: Option<ModuleId>,
}

impl TerminalVisualizer {
    pub fn new(catalog: Arc<ModuleCatalog>) -> Self {
        let void_module = catalog.void_module();
        Self {
            catalog,
            void_module,
        }
    }

    const fn arrow(rotation: Rotation) -> &'static str {
        match rotation {
            Rotation::Up => "↑",
            Rotation::Left => "←",
            Rotation::Down => "↓",
            Rotation::Right => "→",
        }
    }

    fn cell(&self, state: Option<ModuleState>) -> String {
        match state {
            None => "·".dimmed().to_string(),
            Some(state) if Some(state.module) == self.void_module => " ".to_string(),
            Some(state) => Self::arrow(state.rotation)
                .color(PALETTE[state.module.0 % PALETTE.len()])
                .bold()
                .to_string(),
        }
    }

    /// The frame as text, top row first.
    pub fn render(&self, frame: &SceneFrame) -> String {
        let mut out = String::new();
        for y in (0..frame.height()).rev() {
            for x in 0..frame.width() {
                out.push_str(&self.cell(frame.get(x, y)));
            }
            out.push('\n');
        }
        out
    }

    /// One line per non-void module: its arrow color and name.
    pub fn legend(&self) -> String {
        self.catalog
            .ids()
            .filter(|&id| Some(id) != self.void_module)
            .filter_map(|id| {
                let name = self.catalog.name(id)?;
                let swatch = "■".color(PALETTE[id.0 % PALETTE.len()]);
                Some(format!("{swatch} {name}\n"))
            })
            .collect()
    }
}

impl Visualizer for TerminalVisualizer {
    fn display_state(&mut self, frame: &SceneFrame) -> Result<(), anyhow::Error> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(
            out,
            "--- {}/{} slots placed ---",
            frame.placed(),
            frame.width() * frame.height()
        )?;
        out.write_all(self.render(frame).as_bytes())?;
        if frame.is_complete() {
            out.write_all(self.legend().as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }
}
