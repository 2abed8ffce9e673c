use crate::domain::model::{PrefixEntry, PrefixListDefinition};
use crate::utils::error::{IonError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

const REQUIRED_HEADERS: [&str; 3] = ["target_sites", "prefixlist_name", "prefixes"];

/// One raw CSV row. The `ge`/`le` columns may be missing from the file
/// entirely, which is the same as every row leaving them blank.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    target_sites: String,
    #[serde(default)]
    prefixlist_name: String,
    #[serde(default)]
    prefixes: String,
    #[serde(default)]
    ge: String,
    #[serde(default)]
    le: String,
}

/// Grouping is stateful row-by-row parsing: a row with both `target_sites`
/// and `prefixlist_name` set opens a definition, rows with both blank append
/// to the one currently open.
enum GrouperState {
    NoOpenDefinition,
    DefinitionOpen(PrefixListDefinition),
}

pub fn load_definitions(path: &Path) -> Result<Vec<PrefixListDefinition>> {
    let file = std::fs::File::open(path)?;
    group_rows(file)
}

/// Consumes CSV text and produces fully-formed prefix-list definitions, in
/// file order. Structural problems abort with a `ConfigError` naming the row.
pub fn group_rows<R: Read>(input: R) -> Result<Vec<PrefixListDefinition>> {
    // Flexible: short rows are the same as rows with trailing blanks.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers()?.clone();
    for required in REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(IonError::ConfigError {
                row: 1,
                message: format!("missing required column '{}'", required),
            });
        }
    }

    let mut definitions = Vec::new();
    let mut state = GrouperState::NoOpenDefinition;

    for (index, record) in reader.deserialize::<RawRow>().enumerate() {
        let row_number = index as u64 + 2;
        let row = record?;

        let sites = row.target_sites.trim();
        let name = row.prefixlist_name.trim();

        match (sites.is_empty(), name.is_empty()) {
            // Header row: opens a new definition, emitting the previous one.
            (false, false) => {
                if let GrouperState::DefinitionOpen(def) =
                    std::mem::replace(&mut state, GrouperState::NoOpenDefinition)
                {
                    definitions.push(close_definition(def)?);
                }
                state = GrouperState::DefinitionOpen(PrefixListDefinition {
                    name: name.to_string(),
                    target_sites: split_sites(sites),
                    entries: Vec::new(),
                });
            }
            // Continuation row: only legal while a definition is open.
            (true, true) => {
                if matches!(state, GrouperState::NoOpenDefinition) {
                    return Err(IonError::ConfigError {
                        row: row_number,
                        message: "continuation row before any prefix list was opened".to_string(),
                    });
                }
            }
            (true, false) => {
                return Err(IonError::ConfigError {
                    row: row_number,
                    message: format!(
                        "prefixlist_name '{}' given but target_sites is blank",
                        name
                    ),
                });
            }
            (false, true) => {
                return Err(IonError::ConfigError {
                    row: row_number,
                    message: format!("target_sites '{}' given but prefixlist_name is blank", sites),
                });
            }
        }

        if let GrouperState::DefinitionOpen(def) = &mut state {
            let ge = parse_bound(&row.ge);
            let le = parse_bound(&row.le);
            for network in row.prefixes.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                def.entries.push(PrefixEntry {
                    network: network.to_string(),
                    ge,
                    le,
                });
            }
        }
    }

    if let GrouperState::DefinitionOpen(def) = state {
        definitions.push(close_definition(def)?);
    }

    Ok(definitions)
}

fn close_definition(def: PrefixListDefinition) -> Result<PrefixListDefinition> {
    if def.entries.is_empty() {
        return Err(IonError::EmptyPrefixListError { name: def.name });
    }
    Ok(def)
}

/// Split a comma-separated site cell, trimming whitespace and dropping
/// duplicates while keeping first-seen order.
fn split_sites(raw: &str) -> Vec<String> {
    let mut sites: Vec<String> = Vec::new();
    for site in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !sites.iter().any(|seen| seen == site) {
            sites.push(site.to_string());
        }
    }
    sites
}

// Blank and non-numeric cells both collapse to 0, matching the platform's
// "unset" value for ge/le.
fn parse_bound(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}
