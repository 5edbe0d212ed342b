use crate::{
    entropy::{DomainSizeEntropyCalculator, EntropyCalculator},
    grid::WaveGrid,
    propagator::{ConstraintPropagator, LocalPropagator},
    scene::SceneSink,
    BoundaryMode, ProgressInfo, WfcError,
};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wfc_rules::ModuleState;

/// Alias for the complex progress callback function type.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) -> Result<(), WfcError> + Send + Sync>;

/// Configuration options for the WFC runner.
pub struct WfcConfig {
    pub progress_callback: Option<ProgressCallback>,
    pub shutdown_signal: Arc<AtomicBool>,
    /// Seed for slot choice and tie-breaking; drawn from entropy when `None`.
    pub seed: Option<u64>,
}

impl WfcConfig {
    /// Creates a new builder for `WfcConfig`.
    pub fn builder() -> WfcConfigBuilder {
        WfcConfigBuilder::default()
    }
}

impl Default for WfcConfig {
    fn default() -> Self {
        Self {
            progress_callback: None,
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            seed: None,
        }
    }
}

impl std::fmt::Debug for WfcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WfcConfig")
            .field("progress_callback", &self.progress_callback.is_some())
            .field("shutdown_signal", &self.shutdown_signal)
            .field("seed", &self.seed)
            .finish()
    }
}

/// Builder for `WfcConfig`.
#[derive(Default)]
pub struct WfcConfigBuilder {
    progress_callback: Option<ProgressCallback>,
    shutdown_signal: Option<Arc<AtomicBool>>,
    seed: Option<u64>,
}

impl WfcConfigBuilder {
    /// Sets the progress callback function, called after every collapse.
    #[must_use]
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Provides an external shutdown signal.
    /// If not provided, a new signal will be created.
    #[must_use]
    pub fn shutdown_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = Some(signal);
        self
    }

    /// Sets the seed for the random number generator.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the `WfcConfig` instance.
    pub fn build(self) -> WfcConfig {
        WfcConfig {
            progress_callback: self.progress_callback,
            shutdown_signal: self
                .shutdown_signal
                .unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            seed: self.seed,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// The seed actually used; replaying it reproduces the run.
    pub seed: u64,
    /// Slots collapsed by the loop, excluding those fixed beforehand.
    pub iterations: u64,
    pub collapsed_cells: usize,
    pub elapsed: Duration,
}

/// Runs the collapse loop until every slot holds a state.
///
/// 1. **Initialization**: rejects slots whose domain is already empty and
///    hands slots fixed before the run to `scene`.
/// 2. **Observation**: selects the uncollapsed slot with the lowest entropy.
/// 3. **Propagation**: narrows that slot against its collapsed neighbors
///    and the boundary.
/// 4. **Collapse**: picks one remaining state uniformly at random and
///    reports it to `scene`.
///
/// There is no backtracking; the first contradiction ends the run.
///
/// # Errors
///
/// * `WfcError::NotBound` if the grid was never bound.
/// * `WfcError::Contradiction` if a slot starts with an empty domain.
/// * `WfcError::Propagation` if a slot is left without a legal state.
/// * `WfcError::Interrupted` if the shutdown signal is raised.
/// * Whatever the progress callback returns.
pub fn run(
    grid: &mut WaveGrid,
    propagator: &dyn ConstraintPropagator,
    entropy_calculator: &dyn EntropyCalculator,
    scene: &mut dyn SceneSink,
    config: &WfcConfig,
) -> Result<RunSummary, WfcError> {
    grid.require_binding()?;
    let start_time = Instant::now();
    let total_cells = grid.len();
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(
        "Starting WFC run on {}x{} grid with seed {seed}...",
        grid.width(),
        grid.height()
    );

    let mut collapsed_cells_count = 0;
    for slot in grid.slots().iter() {
        if let Some(state) = slot.state() {
            scene.instantiate(state, slot.x, slot.y);
            collapsed_cells_count += 1;
        } else if slot.entropy() == 0 {
            error!("Initial contradiction found at ({}, {})", slot.x, slot.y);
            return Err(WfcError::Contradiction(slot.x, slot.y));
        }
    }
    debug!("Initial state: {collapsed_cells_count}/{total_cells} slots collapsed.");

    let mut iterations = 0;
    loop {
        if config.shutdown_signal.load(Ordering::Relaxed) {
            warn!("Shutdown signal received, stopping WFC run prematurely.");
            return Err(WfcError::Interrupted);
        }

        let collapsed = perform_iteration(
            grid,
            propagator,
            entropy_calculator,
            &mut rng,
            iterations + 1,
        )
        .inspect_err(|e| error!("WFC run failed after {iterations} iterations: {e}"))?;
        let Some((x, y, state)) = collapsed else {
            break;
        };

        iterations += 1;
        collapsed_cells_count += 1;
        scene.instantiate(state, x, y);

        if let Some(ref callback) = config.progress_callback {
            callback(ProgressInfo {
                collapsed_cells: collapsed_cells_count,
                total_cells,
                elapsed_time: start_time.elapsed(),
                iterations,
                last_collapsed: Some((x, y, state)),
            })?;
        }
    }

    let elapsed = start_time.elapsed();
    info!("WFC run finished in {elapsed:?} after {iterations} iterations.");
    Ok(RunSummary {
        seed,
        iterations,
        collapsed_cells: collapsed_cells_count,
        elapsed,
    })
}

/// Fills a bound grid with the default strategy: void boundary when the
/// catalog has a void module (open otherwise), first-minimum selection.
pub fn fill(
    grid: &mut WaveGrid,
    scene: &mut dyn SceneSink,
    seed: Option<u64>,
) -> Result<RunSummary, WfcError> {
    let boundary_mode = BoundaryMode::for_catalog(&grid.require_binding()?.catalog);
    if boundary_mode == BoundaryMode::Open {
        warn!("Catalog has no void module; grid edges are left unconstrained.");
    }
    let config = WfcConfig {
        seed,
        ..WfcConfig::default()
    };
    run(
        grid,
        &LocalPropagator::new(boundary_mode),
        &DomainSizeEntropyCalculator::default(),
        scene,
        &config,
    )
}

/// Performs a single iteration: observe, propagate, collapse.
fn perform_iteration(
    grid: &mut WaveGrid,
    propagator: &dyn ConstraintPropagator,
    entropy_calculator: &dyn EntropyCalculator,
    rng: &mut StdRng,
    iteration: u64,
) -> Result<Option<(usize, usize, ModuleState)>, WfcError> {
    let entropy_grid = entropy_calculator.calculate_entropy(grid);
    let Some((x, y)) = entropy_calculator.select_lowest_entropy_cell(&entropy_grid, rng) else {
        return Ok(None);
    };
    debug!("Iter {iteration}: lowest entropy slot at ({x}, {y})");

    propagator.propagate(grid, x, y)?;

    let candidates = grid.possible_states(x, y)?;
    let &state = candidates
        .choose(rng)
        .ok_or(WfcError::Contradiction(x, y))?;
    let index = grid
        .index(x, y)
        .ok_or_else(|| WfcError::GridError(format!("Slot ({x}, {y}) out of bounds")))?;
    grid.collapse(index, state)?;

    debug!(
        "Iter {iteration}: collapsed ({x}, {y}) to {state} out of {} candidates",
        candidates.len()
    );
    Ok(Some((x, y, state)))
}
