use anyhow::Result;
use module_forge_app::visualization::{SceneFrame, TerminalVisualizer, Visualizer};
use std::sync::Arc;
use wfc_core::Placement;
use wfc_rules::{ModuleCatalog, ModuleId, ModuleState, Rotation};

fn catalog() -> Arc<ModuleCatalog> {
    Arc::new(ModuleCatalog::new(["void", "wall", "floor"]).unwrap())
}

fn placement(module: usize, rotation: Rotation, x: usize, y: usize) -> Placement {
    Placement {
        state: ModuleState::new(ModuleId(module), rotation),
        x,
        y,
    }
}

#[test]
fn test_frame_counts_distinct_slots() {
    let mut frame = SceneFrame::new(2, 2);
    frame.place(&placement(1, Rotation::Up, 0, 0));
    frame.place(&placement(2, Rotation::Left, 0, 0));
    frame.place(&placement(1, Rotation::Up, 5, 5)); // outside, ignored
    assert_eq!(frame.placed(), 1);
    assert_eq!(
        frame.get(0, 0),
        Some(ModuleState::new(ModuleId(2), Rotation::Left))
    );
    assert!(!frame.is_complete());
}

#[test]
fn test_terminal_render_plain() {
    colored::control::set_override(false);
    let visualizer = TerminalVisualizer::new(catalog());
    let mut frame = SceneFrame::new(3, 2);
    frame.place(&placement(1, Rotation::Left, 0, 0));
    frame.place(&placement(0, Rotation::Up, 1, 0));
    frame.place(&placement(2, Rotation::Down, 2, 1));

    // Top row first; void is blank, unplaced slots are dots.
    assert_eq!(visualizer.render(&frame), "··↓\n← ·\n");
    assert_eq!(visualizer.legend(), "■ wall\n■ floor\n");
}

#[test]
fn test_terminal_visualizer_display_empty_frame() -> Result<()> {
    let mut visualizer = TerminalVisualizer::new(catalog());
    visualizer.display_state(&SceneFrame::new(0, 0))?;
    Ok(())
}
