//! CSV rendering of a recorded history.

use std::io::{self, Write};

use tracing::warn;

use taukin_core::MolId;
use taukin_engine::{Model, Simulation};

/// Resolve requested column names against `model`.
///
/// An empty request selects every molecule in id order. Unknown names
/// are logged and dropped.
pub fn select_columns(model: &Model, requested: &[String]) -> Vec<(String, MolId)> {
    if requested.iter().all(|n| n.trim().is_empty()) {
        return model
            .molecules()
            .iter()
            .map(|(id, m)| (m.name().to_string(), id))
            .collect();
    }
    requested
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter_map(|name| match model.mol_id(name) {
            Some(id) => Some((name.to_string(), id)),
            None => {
                warn!(molecule = name, "unknown molecule in plot list, skipped");
                None
            }
        })
        .collect()
}

/// Write `time,<col>...` followed by one line per history row.
///
/// Concentrations are divided by `scale` so they are reported in the
/// description's own unit.
pub fn write_csv<W: Write>(
    out: &mut W,
    sim: &Simulation,
    columns: &[(String, MolId)],
    scale: f64,
) -> io::Result<()> {
    write!(out, "time")?;
    for (name, _) in columns {
        write!(out, ",{name}")?;
    }
    writeln!(out)?;

    let history = sim.history();
    for (t, row) in history.times().zip(history.rows()) {
        write!(out, "{t}")?;
        for &(_, id) in columns {
            write!(out, ",{}", row[id.index()] / scale)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
