//! Handles the setup of the visualization thread based on configuration.

use crate::config::{Settings, VisualizationMode};
use crate::visualization::{SceneFrame, TerminalVisualizer, Visualizer};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use wfc_core::Placement;
use wfc_rules::ModuleCatalog;

const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub enum VizMessage {
    /// A slot collapsed.
    Placed(Placement),
    /// A new attempt starts from an empty grid.
    Reset,
    /// The run is over; draw the last frame and stop.
    Finished,
}

/// Sets up the visualization thread based on the application configuration.
///
/// Returns a tuple containing an optional Sender channel for sending placements
/// and an optional JoinHandle for the spawned visualization thread.
pub fn setup_visualization(
    settings: &Settings,
    catalog: Arc<ModuleCatalog>,
) -> (Option<Sender<VizMessage>>, Option<thread::JoinHandle<()>>) {
    match settings.visualization_mode {
        VisualizationMode::None => (None, None),
        VisualizationMode::Terminal => {
            let (tx, rx): (Sender<VizMessage>, Receiver<VizMessage>) = mpsc::channel();
            let (width, height) = (settings.width, settings.height);
            let redraw_interval = settings
                .report_interval()
                .ok()
                .flatten()
                .unwrap_or(DEFAULT_REDRAW_INTERVAL);

            log::info!("Starting visualization thread, redrawing every {redraw_interval:?}");
            let handle = thread::spawn(move || {
                let mut visualizer = TerminalVisualizer::new(catalog);
                let mut frame = SceneFrame::new(width, height);
                let mut last_draw = Instant::now();

                while let Ok(message) = rx.recv() {
                    match message {
                        VizMessage::Placed(placement) => {
                            frame.place(&placement);
                            if last_draw.elapsed() >= redraw_interval {
                                if let Err(e) = visualizer.display_state(&frame) {
                                    log::error!("Failed to display scene: {e}");
                                }
                                last_draw = Instant::now();
                            }
                        }
                        VizMessage::Reset => frame = SceneFrame::new(width, height),
                        VizMessage::Finished => {
                            if let Err(e) = visualizer.display_state(&frame) {
                                log::error!("Failed to display scene: {e}");
                            }
                            break;
                        }
                    }
                }
                log::info!("Visualization thread terminated");
            });

            (Some(tx), Some(handle))
        }
    }
}
