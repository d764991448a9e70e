//! Sample news datasets served to the UI.
//!
//! Three CSV files (`fake.csv`, `real.csv`, `manual_testing.csv`) live in a
//! data directory. A missing or unreadable file yields an empty dataset.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One CSV row keyed by header name.
pub type DatasetRow = BTreeMap<String, String>;

/// The bundled datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Fake,
    Real,
    ManualTesting,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [Self::Fake, Self::Real, Self::ManualTesting];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Fake => "fake",
            Self::Real => "real",
            Self::ManualTesting => "manual_testing",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }
}

/// All three datasets; every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Datasets {
    pub fake: Vec<DatasetRow>,
    pub real: Vec<DatasetRow>,
    pub manual_testing: Vec<DatasetRow>,
}

impl Datasets {
    fn slot(&mut self, kind: DatasetKind) -> &mut Vec<DatasetRow> {
        match kind {
            DatasetKind::Fake => &mut self.fake,
            DatasetKind::Real => &mut self.real,
            DatasetKind::ManualTesting => &mut self.manual_testing,
        }
    }
}

/// Parse CSV content with a header row.
///
/// Quoted fields may contain commas. Whitespace around fields is trimmed,
/// blank lines are skipped, short rows are padded with empty strings and
/// extra fields are dropped. Invalid UTF-8 is replaced with U+FFFD.
pub fn parse_csv(content: &[u8]) -> Result<Vec<DatasetRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers: Vec<String> = reader.byte_headers()?.iter().map(lossy).collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        // A whitespace-only line trims down to one empty field
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let row = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record.get(idx).map(lossy).unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Reads datasets from a directory on every request.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load one dataset. Missing files are not an error.
    pub async fn load(&self, kind: DatasetKind) -> truthscan_common::Result<Vec<DatasetRow>> {
        let path = self.dir.join(kind.file_name());

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Dataset file not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        parse_csv(&content).map_err(|e| {
            truthscan_common::Error::Internal(format!("{}: {e}", path.display()))
        })
    }

    /// Load every dataset, logging and emptying any that fail.
    pub async fn load_all(&self) -> Datasets {
        let mut datasets = Datasets::default();

        for kind in DatasetKind::ALL {
            let rows = match self.load(kind).await {
                Ok(rows) => rows,
                Err(e) => {
                    error!(dataset = kind.name(), error = %e, "Failed to read dataset");
                    Vec::new()
                }
            };
            *datasets.slot(kind) = rows;
        }

        info!(
            fake = datasets.fake.len(),
            real = datasets.real.len(),
            manual_testing = datasets.manual_testing.len(),
            "Datasets loaded"
        );

        datasets
    }
}
