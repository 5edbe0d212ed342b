use crate::config::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use wfc_core::WaveGrid;
use wfc_rules::{ModuleCatalog, Rotation};

#[derive(Debug, Serialize)]
struct PlacementRecord<'a> {
    x: usize,
    y: usize,
    module: &'a str,
    rotation: Rotation,
}

/// Renders the collapsed grid as text: one line per row, top row (highest
/// `y`) first, cells as space-separated `name@Rotation` labels.
pub fn format_grid_text(grid: &WaveGrid, catalog: &ModuleCatalog) -> Result<String> {
    let mut text = String::new();
    for y in (0..grid.height()).rev() {
        let row = (0..grid.width())
            .map(|x| {
                grid.collapsed_state(x, y)
                    .map(|state| catalog.label(state))
                    .with_context(|| format!("Slot ({x}, {y}) is not collapsed, cannot save"))
            })
            .collect::<Result<Vec<_>>>()?;
        text.push_str(&row.join(" "));
        text.push('\n');
    }
    Ok(text)
}

/// Writes one CSV record per slot in row-major order.
pub fn write_grid_csv<W: Write>(grid: &WaveGrid, catalog: &ModuleCatalog, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for slot in grid.slots().iter() {
        let state = slot
            .state()
            .with_context(|| format!("Slot ({}, {}) is not collapsed, cannot save", slot.x, slot.y))?;
        csv_writer.serialize(PlacementRecord {
            x: slot.x,
            y: slot.y,
            module: catalog.name(state.module).unwrap_or("?"),
            rotation: state.rotation,
        })?;
    }
    csv_writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Saves the final collapsed grid to a file in the requested format.
pub fn save_grid_to_file(
    grid: &WaveGrid,
    catalog: &ModuleCatalog,
    format: OutputFormat,
    output_path: &Path,
) -> Result<()> {
    log::info!("Saving {format:?} grid to {}...", output_path.display());

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut writer = io::BufWriter::new(file);
    match format {
        OutputFormat::Text => writer.write_all(format_grid_text(grid, catalog)?.as_bytes())?,
        OutputFormat::Csv => write_grid_csv(grid, catalog, &mut writer)?,
    }
    writer
        .flush()
        .context("Failed to flush writer for output file")?;

    log::info!("Successfully saved grid to {}", output_path.display());
    Ok(())
}
