//! Handles loading the catalog, compiling rules and running the fill.

use crate::{
    config::{BoundaryArg, OutputFormat, Settings},
    error::AppError,
    output,
    progress::{self, ConsoleProgressReporter, ProgressReporter},
    setup::visualization::VizMessage,
};
use log::{error, info, warn};
use std::sync::{atomic::AtomicBool, mpsc::Sender, Arc, Mutex};
use std::time::Duration;
use wfc_core::{
    run, BoundaryMode, DomainSizeEntropyCalculator, LocalPropagator, RunSummary, SceneSink,
    WaveGrid, WfcConfig, WfcError,
};
use wfc_rules::{compile_rules, loader::load_from_file, AdjacencyRuleSet, ModuleCatalog, ModuleState};

/// Result of a successful fill.
#[derive(Debug)]
pub struct FillOutcome {
    pub grid: WaveGrid,
    pub summary: RunSummary,
    /// Runs started, including the successful one.
    pub attempts: u32,
}

/// Forwards placements to the visualization thread, if there is one.
struct ForwardingScene<'a> {
    viz_tx: Option<&'a Sender<VizMessage>>,
    placed: usize,
}

impl SceneSink for ForwardingScene<'_> {
    fn instantiate(&mut self, state: ModuleState, x: usize, y: usize) {
        self.placed += 1;
        if let Some(tx) = self.viz_tx {
            if tx
                .send(VizMessage::Placed(wfc_core::Placement { state, x, y }))
                .is_err()
            {
                warn!("Visualization channel closed; no further frames will be drawn.");
                self.viz_tx = None;
            }
        }
    }
}

/// Loads the catalog named in `settings` and compiles its adjacency rules.
pub fn load_catalog(settings: &Settings) -> Result<(ModuleCatalog, AdjacencyRuleSet), AppError> {
    let path = settings
        .catalog
        .as_deref()
        .ok_or_else(|| AppError::Config("No module catalog given".to_string()))?;
    info!("Loading module catalog from: {}", path.display());
    let geometry = load_from_file(path)?;
    let rules = compile_rules(geometry.catalog(), &geometry)?;
    info!(
        "Catalog loaded: {} modules, {} rules",
        geometry.catalog().len(),
        rules.num_rules()
    );
    Ok((geometry.into_catalog(), rules))
}

/// Resolves the configured boundary against the catalog.
pub fn boundary_mode(settings: &Settings, catalog: &ModuleCatalog) -> Result<BoundaryMode, AppError> {
    match settings.boundary {
        BoundaryArg::Void => {
            BoundaryMode::void_named(catalog, &settings.void_module).map_err(AppError::from)
        }
        BoundaryArg::Open => Ok(BoundaryMode::Open),
    }
}

/// Fills a fresh grid, retrying after contradictions up to
/// `settings.max_attempts` times. Attempt `n` uses seed `seed + n` when a
/// seed is configured.
pub fn run_fill(
    settings: &Settings,
    catalog: Arc<ModuleCatalog>,
    rules: Arc<AdjacencyRuleSet>,
    viz_tx: Option<&Sender<VizMessage>>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<FillOutcome, AppError> {
    let boundary = boundary_mode(settings, &catalog)?;
    let propagator = LocalPropagator::new(boundary);
    let entropy_calculator = DomainSizeEntropyCalculator::new(settings.selection);
    let report_interval = settings.report_interval()?;
    info!(
        "Filling {}x{} grid: boundary {boundary:?}, selection {:?}",
        settings.width, settings.height, settings.selection
    );

    let mut last_error = None;
    for attempt in 0..settings.max_attempts {
        let mut grid = WaveGrid::new(settings.width, settings.height);
        grid.bind(Arc::clone(&catalog), Arc::clone(&rules));

        let reporter: Arc<Mutex<ConsoleProgressReporter>> = Arc::new(Mutex::new(
            ConsoleProgressReporter::new(report_interval.unwrap_or(Duration::MAX)),
        ));
        let mut builder = WfcConfig::builder().shutdown_signal(Arc::clone(&shutdown_signal));
        if report_interval.is_some() {
            builder = builder.progress_callback(progress::progress_callback(reporter.clone()));
        }
        if let Some(seed) = settings.seed {
            builder = builder.seed(seed.wrapping_add(u64::from(attempt)));
        }
        let config = builder.build();

        if let Some(tx) = viz_tx {
            // A closed channel is reported by the scene on the first placement.
            let _ = tx.send(VizMessage::Reset);
        }
        let mut scene = ForwardingScene { viz_tx, placed: 0 };

        match run(&mut grid, &propagator, &entropy_calculator, &mut scene, &config) {
            Ok(summary) => {
                if let Ok(mut reporter) = reporter.lock() {
                    reporter.finish(&summary)?;
                }
                info!(
                    "Attempt {} succeeded: {} slots placed",
                    attempt + 1,
                    scene.placed
                );
                return Ok(FillOutcome {
                    grid,
                    summary,
                    attempts: attempt + 1,
                });
            }
            Err(e) => {
                if let Ok(mut reporter) = reporter.lock() {
                    reporter.fail(&e)?;
                }
                if matches!(e, WfcError::Interrupted) {
                    return Err(AppError::Cancelled);
                }
                if !e.is_contradiction() {
                    return Err(e.into());
                }
                warn!(
                    "Attempt {}/{} hit a contradiction: {e}",
                    attempt + 1,
                    settings.max_attempts
                );
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(last) if settings.max_attempts > 1 => Err(AppError::AttemptsExhausted {
            attempts: settings.max_attempts,
            last,
        }),
        Some(last) => Err(last.into()),
        None => Err(AppError::Config("max_attempts must be at least 1".to_string())),
    }
}

/// Runs the whole pipeline for `settings` and writes the grid out.
pub fn run_standard_mode(
    settings: &Settings,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<FillOutcome, AppError> {
    let (catalog, rules) = load_catalog(settings)?;
    let catalog = Arc::new(catalog);
    let rules = Arc::new(rules);

    let (viz_tx, viz_handle) =
        crate::setup::visualization::setup_visualization(settings, Arc::clone(&catalog));
    let result = run_fill(
        settings,
        Arc::clone(&catalog),
        rules,
        viz_tx.as_ref(),
        shutdown_signal,
    );

    if let Some(tx) = viz_tx {
        let _ = tx.send(VizMessage::Finished);
    }
    if let Some(handle) = viz_handle {
        if handle.join().is_err() {
            error!("Visualization thread panicked");
        }
    }

    let outcome = result?;
    info!(
        "Fill finished after {} attempt(s), seed {}, {} iterations in {:?}",
        outcome.attempts, outcome.summary.seed, outcome.summary.iterations, outcome.summary.elapsed
    );

    match &settings.output_path {
        Some(path) => {
            output::save_grid_to_file(&outcome.grid, &catalog, settings.output_format, path)
                .map_err(|e| AppError::Output(format!("{e:#}")))?;
        }
        None => {
            let text = match settings.output_format {
                OutputFormat::Text => output::format_grid_text(&outcome.grid, &catalog),
                OutputFormat::Csv => {
                    let mut buffer = Vec::new();
                    output::write_grid_csv(&outcome.grid, &catalog, &mut buffer)
                        .map(|()| String::from_utf8_lossy(&buffer).into_owned())
                }
            }
            .map_err(|e| AppError::Output(format!("{e:#}")))?;
            print!("{text}");
        }
    }

    Ok(outcome)
}
