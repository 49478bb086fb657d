//! Layout output file.
//!
//! The layout is written in the same whitespace format the text instance
//! reader accepts: plate vertex count and vertices, the number of placed
//! pieces, then each placed polygon as its vertex count followed by one
//! `x y` line per vertex. Writing a layout and reading it back as an
//! instance yields the plate and the placed outlines.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ignest_d2::{Boundary2D, SolveResult};

/// Writes the layout of `result` on `plate`.
pub fn write_layout<W: Write>(mut out: W, plate: &Boundary2D, result: &SolveResult) -> std::io::Result<()> {
    let exterior = plate.exterior();
    writeln!(out, "{}", exterior.len())?;
    for (x, y) in &exterior {
        writeln!(out, "{} {}", x, y)?;
    }

    writeln!(out, "{}", result.polygons.len())?;
    for polygon in &result.polygons {
        writeln!(out, "{}", polygon.len())?;
        for (x, y) in polygon {
            writeln!(out, "{} {}", x, y)?;
        }
    }
    out.flush()
}

/// Writes the layout to a file, replacing it if present.
pub fn save_layout(path: &Path, plate: &Boundary2D, result: &SolveResult) -> std::io::Result<()> {
    let file = File::create(path)?;
    write_layout(BufWriter::new(file), plate, result)?;
    log::debug!("layout with {} pieces written to {}", result.polygons.len(), path.display());
    Ok(())
}
