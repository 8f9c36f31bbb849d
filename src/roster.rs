// Roster loading from the league's player CSV.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One roster row, ready for import into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Roster CSV row. Admins keep phone numbers and notes in the same
/// sheet; extra columns are silently ignored via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawRosterRow {
    name: String,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for result in reader.deserialize::<RawRosterRow>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim().to_string();
                if name.is_empty() {
                    warn!("skipping roster row with empty name");
                    continue;
                }
                // The round-set invariant needs distinct players, so a
                // repeated name keeps its first row only.
                if !seen.insert(name.clone()) {
                    warn!("duplicate roster entry for '{}', keeping first", name);
                    continue;
                }
                entries.push(RosterEntry { name });
            }
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
            }
        }
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load the league roster from a CSV file with a `name` header column.
/// Blank and duplicate names are skipped with a warning; an empty final
/// roster is an error.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let entries = load_roster_from_reader(file).map_err(|e| RosterError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if entries.is_empty() {
        return Err(RosterError::Validation(format!(
            "no roster entries loaded from {}",
            path.display()
        )));
    }

    Ok(entries)
}
