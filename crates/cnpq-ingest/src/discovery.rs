//! Raw ledger discovery.
//!
//! Each annual export keeps a recognizable fragment in its file name. The
//! fragments are matched case-insensitively against the CSV files of the raw
//! folder; the first match in filename order wins.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use cnpq_model::SourceYear;
use regex::Regex;

use crate::error::{IngestError, Result};

static PATTERN_2022: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)relatorio").expect("valid regex"));
static PATTERN_2023: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dados-de-pagamento-2023-pda").expect("valid regex"));
static PATTERN_2024: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)20250204").expect("valid regex"));

fn pattern_for(year: SourceYear) -> &'static Regex {
    match year {
        SourceYear::Y2022 => &PATTERN_2022,
        SourceYear::Y2023 => &PATTERN_2023,
        SourceYear::Y2024 => &PATTERN_2024,
    }
}

/// Located ledger files, one per source year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFiles {
    pub y2022: PathBuf,
    pub y2023: PathBuf,
    pub y2024: PathBuf,
}

impl RawFiles {
    /// Path of the ledger for `year`.
    pub fn get(&self, year: SourceYear) -> &Path {
        match year {
            SourceYear::Y2022 => &self.y2022,
            SourceYear::Y2023 => &self.y2023,
            SourceYear::Y2024 => &self.y2024,
        }
    }

    /// Iterate `(year, path)` in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceYear, &Path)> {
        SourceYear::ALL.into_iter().map(|year| (year, self.get(year)))
    }
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Year a file name belongs to. Patterns are tried in 2022, 2023, 2024
/// order, so a name matching several is claimed by the earliest year only.
fn classify(name: &str) -> Option<SourceYear> {
    SourceYear::ALL
        .into_iter()
        .find(|year| pattern_for(*year).is_match(name))
}

/// Locate the three annual ledgers inside `dir`.
///
/// Each file is classified once; the first file (by name) of a year wins.
/// Fails with [`IngestError::MissingSourceFiles`] naming every year that has
/// no matching file.
pub fn discover_raw_files(dir: &Path) -> Result<RawFiles> {
    let files = list_files(dir)?;

    let mut slots: [Option<PathBuf>; 3] = [None, None, None];
    for path in files {
        let Some(year) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(classify)
        else {
            continue;
        };
        let slot = &mut slots[year_slot(year)];
        if slot.is_none() {
            tracing::debug!(year = %year, path = %path.display(), "ledger located");
            *slot = Some(path);
        }
    }

    match slots {
        [Some(y2022), Some(y2023), Some(y2024)] => Ok(RawFiles {
            y2022,
            y2023,
            y2024,
        }),
        _ => Err(IngestError::MissingSourceFiles {
            dir: dir.to_path_buf(),
            missing: SourceYear::ALL
                .into_iter()
                .filter(|year| slots[year_slot(*year)].is_none())
                .collect(),
        }),
    }
}

fn year_slot(year: SourceYear) -> usize {
    match year {
        SourceYear::Y2022 => 0,
        SourceYear::Y2023 => 1,
        SourceYear::Y2024 => 2,
    }
}
