use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::{Cursor, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{Error, Result};

/// Path that makes [`Model::load`] read comma separated text from stdin.
pub const STDIN_PATH: &str = "-";

const NULL_MARKER: &str = "∅";
const NEWLINE_MARKER: &str = " ↵ ";

/// On-disk layout of a table, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Delimited(u8),
    Parquet,
    Arrow,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Format::Delimited(b',')),
            "tsv" | "tab" => Ok(Format::Delimited(b'\t')),
            "parquet" | "pq" => Ok(Format::Parquet),
            "arrow" | "ipc" | "feather" => Ok(Format::Arrow),
            _ => Err(Error::UnknownFileType),
        }
    }

    fn scan(self, path: &Path) -> PolarsResult<LazyFrame> {
        let path = PlPath::Local(path.into());
        match self {
            Format::Delimited(separator) => LazyCsvReader::new(path)
                .with_has_header(true)
                .with_separator(separator)
                .finish(),
            Format::Parquet => LazyFrame::scan_parquet(path, ScanArgsParquet::default()),
            Format::Arrow => LazyFrame::scan_ipc(
                path,
                polars::io::ipc::IpcScanOptions,
                UnifiedScanArgs::default(),
            ),
        }
    }
}

/// Checks that `path` (after `~` expansion) is a readable regular file.
fn resolve(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(shellexpand::tilde(path).into_owned());
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound,
        ErrorKind::PermissionDenied => Error::PermissionDenied,
        _ => Error::Io(e),
    })?;
    if !metadata.is_file() {
        return Err(Error::LoadingFailed(format!("{} is not a file", path.display())));
    }
    debug!("Resolved {} ({} bytes)", path.display(), metadata.len());
    Ok(path)
}

fn display_value(value: Option<&str>) -> String {
    match value {
        Some(s) => s.replace("\r\n", NEWLINE_MARKER).replace('\n', NEWLINE_MARKER),
        None => NULL_MARKER.to_string(),
    }
}

fn column_text(column: &polars::prelude::Column) -> PolarsResult<Vec<String>> {
    let text = column.cast(&DataType::String)?;
    Ok(text.str()?.into_iter().map(display_value).collect())
}

/// Table text in row-major order, ready to be handed to [`crate::table::render`].
#[derive(Debug, Default)]
pub struct Model {
    source: String,
    header: Vec<String>,
    body: Vec<Vec<String>>,
}

impl Model {
    /// Loads a CSV, TSV, Parquet or Arrow IPC file, or CSV from stdin for [`STDIN_PATH`].
    pub fn load(path: &str) -> Result<Self> {
        if path == STDIN_PATH {
            return Self::from_reader(std::io::stdin().lock(), b',', "<stdin>");
        }
        let path = resolve(path)?;
        let format = Format::from_path(&path)?;
        let df = format.scan(&path)?.collect()?;
        Self::from_frame(&df, &path.display().to_string())
    }

    /// Reads delimited text with a header line.
    pub fn from_reader<R: Read>(mut reader: R, separator: u8, source: &str) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_separator(separator))
            .into_reader_with_file_handle(Cursor::new(buf))
            .finish()?;
        Self::from_frame(&df, source)
    }

    pub fn from_frame(df: &DataFrame, source: &str) -> Result<Self> {
        let start_time = Instant::now();
        // Columns are stringified in parallel, then turned into rows.
        let columns = df
            .get_columns()
            .par_iter()
            .map(column_text)
            .collect::<PolarsResult<Vec<_>>>()?;
        let header = df.get_column_names().iter().map(|n| n.to_string()).collect();
        let model = Self::from_columns(source, header, columns);

        info!(
            "Prepared {} rows x {} columns from {source} in {}ms",
            model.nrows(),
            model.header.len(),
            start_time.elapsed().as_millis()
        );
        Ok(model)
    }

    /// Builds rows from columns; shorter columns leave empty cells at the bottom.
    fn from_columns(source: &str, header: Vec<String>, columns: Vec<Vec<String>>) -> Self {
        let nrows = columns.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();
        let body = (0..nrows)
            .map(|_| cells.iter_mut().map(|c| c.next().unwrap_or_default()).collect())
            .collect();
        Self {
            source: source.to_string(),
            header,
            body,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn column_names(&self) -> &[String] {
        &self.header
    }

    pub fn nrows(&self) -> usize {
        self.body.len()
    }

    /// Puts column `order[i]` at position `i`. Columns not named in `order` are dropped.
    pub fn reorder_columns(&mut self, order: &[usize]) {
        fn permute(row: &mut Vec<String>, order: &[usize]) {
            let mut taken: Vec<Option<String>> = row.drain(..).map(Some).collect();
            *row = order
                .iter()
                .map(|&i| taken.get_mut(i).and_then(Option::take).unwrap_or_default())
                .collect();
        }
        permute(&mut self.header, order);
        for row in &mut self.body {
            permute(row, order);
        }
    }

    /// Rows to render, led by the column names when `with_header` is set.
    pub fn rows(&self, with_header: bool) -> Vec<&[String]> {
        let header = with_header.then_some(self.header.as_slice());
        header
            .into_iter()
            .chain(self.body.iter().map(Vec::as_slice))
            .collect()
    }
}
