//! Link manifest loading.
//!
//! A manifest is a table with a header row, read from CSV or from the first
//! worksheet of an Excel/OpenDocument workbook. Three columns matter: a
//! grouping key (e.g. region), a record key (e.g. year or category), and the
//! resource locator. Other columns are ignored.

mod error;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, warn};

pub use error::ManifestError;

/// File extensions read as workbooks; everything else is CSV.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Header names of the columns a manifest must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestColumns {
    pub group: String,
    pub key: String,
    pub url: String,
}

impl Default for ManifestColumns {
    fn default() -> Self {
        Self {
            group: "Oblast".to_string(),
            key: "Year".to_string(),
            url: "Link".to_string(),
        }
    }
}

/// One usable manifest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// 1-based line (or worksheet row) number in the source file.
    pub line: u64,
    pub group: String,
    pub key: String,
    pub url: String,
}

/// Rows read from a manifest plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct Manifest {
    pub rows: Vec<ManifestRow>,
    /// Line numbers of rows without a locator.
    pub skipped: Vec<u64>,
}

impl Manifest {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Adds one data record; cells are trimmed and a missing locator skips it.
    fn push_record<S: AsRef<str>>(&mut self, line: u64, cells: &[S], indices: &ColumnIndices) {
        let cell = |idx: usize| {
            cells
                .get(idx)
                .map_or("", |value| value.as_ref().trim())
                .to_string()
        };

        let url = cell(indices.url);
        if url.is_empty() {
            warn!(line, "skipping manifest row without a link");
            self.skipped.push(line);
            return;
        }

        self.rows.push(ManifestRow {
            line,
            group: cell(indices.group),
            key: cell(indices.key),
            url,
        });
    }
}

/// Positions of the configured columns in the header row.
struct ColumnIndices {
    group: usize,
    key: usize,
    url: usize,
}

impl ColumnIndices {
    fn locate<S: AsRef<str>>(
        headers: &[S],
        columns: &ManifestColumns,
    ) -> Result<Self, ManifestError> {
        let position = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);

        if let (Some(group), Some(key), Some(url)) = (
            position(columns.group.as_str()),
            position(columns.key.as_str()),
            position(columns.url.as_str()),
        ) {
            return Ok(Self { group, key, url });
        }

        let missing = [
            columns.group.as_str(),
            columns.key.as_str(),
            columns.url.as_str(),
        ]
        .into_iter()
        .filter(|name| position(name).is_none())
        .map(str::to_string)
        .collect();
        Err(ManifestError::MissingColumns {
            missing,
            available: headers.iter().map(|h| h.as_ref().trim().to_string()).collect(),
        })
    }
}

/// Whether `path` is read as a workbook rather than CSV.
#[must_use]
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Loads a manifest, choosing the reader by file extension.
///
/// # Errors
///
/// Returns [`ManifestError`] if the file cannot be opened, is not a valid
/// CSV file or workbook, or lacks one of the configured columns.
pub fn load_manifest(path: &Path, columns: &ManifestColumns) -> Result<Manifest, ManifestError> {
    let manifest = if is_workbook(path) {
        load_workbook(path, columns)?
    } else {
        let file = File::open(path).map_err(|e| ManifestError::io(path, e))?;
        parse_manifest(file, columns)?
    };
    debug!(
        path = %path.display(),
        rows = manifest.len(),
        skipped = manifest.skipped.len(),
        "manifest loaded"
    );
    Ok(manifest)
}

/// Parses manifest CSV from any reader.
///
/// Cell values are trimmed. Rows whose locator cell is empty are skipped
/// with a warning; short rows are tolerated.
///
/// # Errors
///
/// Returns [`ManifestError`] for malformed CSV or missing columns.
pub fn parse_manifest<R: Read>(
    reader: R,
    columns: &ManifestColumns,
) -> Result<Manifest, ManifestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let indices = ColumnIndices::locate(&headers, columns)?;

    let mut manifest = Manifest::default();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let cells: Vec<&str> = record.iter().collect();
        manifest.push_record(line, &cells, &indices);
    }

    Ok(manifest)
}

/// Reads the first worksheet of a workbook.
///
/// The first non-empty row is the header. Numeric cells are rendered without
/// a trailing `.0`, so a year stored as a number reads as `2021`.
///
/// # Errors
///
/// Returns [`ManifestError`] if the workbook cannot be read, has no
/// worksheet, or lacks one of the configured columns.
pub fn load_workbook(path: &Path, columns: &ManifestColumns) -> Result<Manifest, ManifestError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ManifestError::workbook(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ManifestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| ManifestError::workbook(path, e))?;

    let first_row = range.start().map_or(0, |(row, _)| u64::from(row));
    let mut rows = range.rows().map(|cells| {
        cells.iter().map(cell_text).collect::<Vec<String>>()
    });

    let headers = rows.next().unwrap_or_default();
    let indices = ColumnIndices::locate(&headers, columns)?;

    let mut manifest = Manifest::default();
    // Worksheet rows are 1-based; the header sits at `first_row + 1`.
    for (offset, cells) in (2..).zip(rows) {
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        manifest.push_record(first_row + offset, &cells, &indices);
    }

    Ok(manifest)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
Oblast,Year,Link,Notes
Akmola,2021,https://stat.example/a/2021,first
Akmola, 2022 ,https://stat.example/a/2022,
Almaty,2021,,missing link
Almaty,2022,https://stat.example/b/2022,\"quoted, note\"
";

    #[test]
    fn test_parse_manifest_reads_configured_columns() {
        let manifest = parse_manifest(SAMPLE.as_bytes(), &ManifestColumns::default()).unwrap();

        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.rows[0].group, "Akmola");
        assert_eq!(manifest.rows[0].key, "2021");
        assert_eq!(manifest.rows[0].url, "https://stat.example/a/2021");
        assert_eq!(manifest.rows[1].key, "2022", "cells are trimmed");
        assert_eq!(manifest.rows[2].group, "Almaty");
    }

    #[test]
    fn test_parse_manifest_skips_rows_without_link() {
        let manifest = parse_manifest(SAMPLE.as_bytes(), &ManifestColumns::default()).unwrap();
        assert_eq!(manifest.skipped, vec![4]);
        assert_eq!(manifest.rows[0].line, 2);
    }

    #[test]
    fn test_parse_manifest_custom_columns() {
        let csv = "Oblast,Type,Link\nKostanay,Budget,https://x.example/k\n";
        let columns = ManifestColumns {
            key: "Type".to_string(),
            ..ManifestColumns::default()
        };
        let manifest = parse_manifest(csv.as_bytes(), &columns).unwrap();
        assert_eq!(manifest.rows[0].key, "Budget");
    }

    #[test]
    fn test_parse_manifest_missing_columns() {
        let csv = "Region,Year\nAkmola,2021\n";
        let result = parse_manifest(csv.as_bytes(), &ManifestColumns::default());
        match result {
            Err(ManifestError::MissingColumns { missing, available }) => {
                assert_eq!(missing, vec!["Oblast".to_string(), "Link".to_string()]);
                assert_eq!(available, vec!["Region".to_string(), "Year".to_string()]);
            }
            other => panic!("Expected MissingColumns, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_manifest_tolerates_short_rows() {
        let csv = "Oblast,Year,Link\nAkmola\nAtyrau,2020,https://x.example/a\n";
        let manifest = parse_manifest(csv.as_bytes(), &ManifestColumns::default()).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.skipped.len(), 1);
    }

    #[test]
    fn test_load_manifest_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sources.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let manifest = load_manifest(&path, &ManifestColumns::default()).unwrap();
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_manifest(
            &temp_dir.path().join("absent.csv"),
            &ManifestColumns::default(),
        );
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }

    fn write_sources_workbook(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Oblast", "Year", "Link", "Notes"].into_iter().enumerate() {
            sheet
                .write_string(0, u16::try_from(col).unwrap(), header)
                .unwrap();
        }
        sheet.write_string(1, 0, " Akmola ").unwrap();
        sheet.write_number(1, 1, 2021).unwrap();
        sheet.write_string(1, 2, "https://stat.example/a/2021").unwrap();
        sheet.write_string(2, 0, "Almaty").unwrap();
        sheet.write_number(2, 1, 2022).unwrap();
        sheet.write_string(2, 3, "no link yet").unwrap();
        sheet.write_string(3, 0, "Atyrau").unwrap();
        sheet.write_string(3, 1, "2020").unwrap();
        sheet.write_string(3, 2, "https://stat.example/c/2020").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_is_workbook_by_extension() {
        assert!(is_workbook(Path::new("Investments_sources.xlsx")));
        assert!(is_workbook(Path::new("legacy.XLS")));
        assert!(!is_workbook(Path::new("sources.csv")));
        assert!(!is_workbook(Path::new("sources")));
    }

    #[test]
    fn test_load_manifest_reads_first_worksheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Investments_sources.xlsx");
        write_sources_workbook(&path);

        let manifest = load_manifest(&path, &ManifestColumns::default()).unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.rows[0].group, "Akmola", "cells are trimmed");
        assert_eq!(manifest.rows[0].key, "2021", "numeric years have no decimals");
        assert_eq!(manifest.rows[0].url, "https://stat.example/a/2021");
        assert_eq!(manifest.rows[0].line, 2);
        assert_eq!(manifest.rows[1].key, "2020");
        assert_eq!(manifest.rows[1].line, 4);
        assert_eq!(manifest.skipped, vec![3]);
    }

    #[test]
    fn test_load_workbook_missing_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Other_controls_sources.xlsx");
        write_sources_workbook(&path);
        let columns = ManifestColumns {
            key: "Type".to_string(),
            ..ManifestColumns::default()
        };

        match load_manifest(&path, &columns) {
            Err(ManifestError::MissingColumns { missing, available }) => {
                assert_eq!(missing, vec!["Type".to_string()]);
                assert_eq!(available, vec!["Oblast", "Year", "Link", "Notes"]);
            }
            other => panic!("Expected MissingColumns, got: {other:?}"),
        }
    }

    #[test]
    fn test_load_workbook_rejects_non_workbook_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.xlsx");
        std::fs::write(&path, SAMPLE).unwrap();

        let result = load_manifest(&path, &ManifestColumns::default());
        assert!(matches!(result, Err(ManifestError::Workbook { .. })), "{result:?}");
    }
}
