//! Rubric loader.
//!
//! Reads a rubric (CSV, TSV or a spreadsheet workbook) into a
//! [`RubricTable`] and precomputes one embedding per criterion description
//! with a single batched call to the injected [`Embedder`].
//!
//! Recognised columns (header names are trimmed and lower-cased, any subset
//! may be present):
//! - `criterion_id`, `criterion_name`, `description`, `keywords`
//! - `min_words` / `max_words` (older rubrics: `min_word` / `max_word`)
//! - `weight`

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use speechscore_embed::Embedder;
use tracing::{debug, info, instrument};

use crate::criterion::{RubricCriterion, RubricTable, DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS};
use crate::error::RubricLoadError;
use crate::normalise::{non_blank, parse_keywords, parse_weight, parse_word_bound};

const KNOWN_COLUMNS: &[&str] = &[
    "criterion_id",
    "criterion_name",
    "description",
    "keywords",
    "min_words",
    "max_words",
    "weight",
    "min_word",
    "max_word",
];

/// Extensions read through the spreadsheet backend.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    criterion_id: Option<usize>,
    criterion_name: Option<usize>,
    description: Option<usize>,
    keywords: Option<usize>,
    min_words: Option<usize>,
    max_words: Option<usize>,
    weight: Option<usize>,
}

impl ColumnMap {
    fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, RubricLoadError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_ref().trim_start_matches('\u{feff}').trim().to_lowercase(), i))
            .collect();

        if !KNOWN_COLUMNS.iter().any(|c| index.contains_key(*c)) {
            return Err(RubricLoadError::NoCriteriaColumns {
                found: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            });
        }

        let col = |name: &str| index.get(name).copied();
        let map = Self {
            criterion_id: col("criterion_id"),
            criterion_name: col("criterion_name"),
            description: col("description"),
            keywords: col("keywords"),
            min_words: col("min_words").or_else(|| col("min_word")),
            max_words: col("max_words").or_else(|| col("max_word")),
            weight: col("weight"),
        };
        if col("min_words").is_none() && col("min_word").is_some() {
            debug!("Using legacy min_word column as min_words");
        }
        if col("max_words").is_none() && col("max_word").is_some() {
            debug!("Using legacy max_word column as max_words");
        }
        Ok(map)
    }
}

/// Load a rubric from `path`.
///
/// Spreadsheet extensions (see [`WORKBOOK_EXTENSIONS`]) are read from their
/// first worksheet, `.tsv` / `.tab` files tab-delimited, everything else as
/// CSV.
pub fn load_rubric(path: impl AsRef<Path>, embedder: &dyn Embedder) -> Result<RubricTable, RubricLoadError> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);

    info!(path = %path.display(), "Loading rubric");
    match extension.as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => load_rubric_from_workbook(path, embedder),
        Some("tsv" | "tab") => load_rubric_from_reader(File::open(path)?, b'\t', embedder),
        _ => load_rubric_from_reader(File::open(path)?, b',', embedder),
    }
}

/// Load a rubric from any reader with a header row.
#[instrument(skip(reader, embedder))]
pub fn load_rubric_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
    embedder: &dyn Embedder,
) -> Result<RubricTable, RubricLoadError> {
    let start = Instant::now();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let header_cells: Vec<&str> = headers.iter().collect();
    let columns = ColumnMap::from_headers(&header_cells)?;

    let mut criteria = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let cells: Vec<&str> = record.iter().collect();
        criteria.push(parse_row(&cells, row, &columns));
    }

    finish_table(criteria, embedder, start)
}

/// Load a rubric from the first worksheet of a spreadsheet workbook.
///
/// The first row of the used range is the header. Rows whose cells are all
/// blank are skipped.
#[instrument(skip(path, embedder), fields(path = %path.display()))]
pub fn load_rubric_from_workbook(path: &Path, embedder: &dyn Embedder) -> Result<RubricTable, RubricLoadError> {
    let start = Instant::now();
    // a missing file is an I/O failure like for delimited sources
    std::fs::metadata(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(RubricLoadError::NoWorksheet)??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    let columns = ColumnMap::from_headers(&headers)?;

    let criteria = rows
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .enumerate()
        .map(|(row, cells)| parse_row(&cells, row, &columns))
        .collect();

    finish_table(criteria, embedder, start)
}

/// Text of one worksheet cell; numbers render without a trailing `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Embed every description in one batch and freeze the table.
fn finish_table(
    mut criteria: Vec<RubricCriterion>,
    embedder: &dyn Embedder,
    start: Instant,
) -> Result<RubricTable, RubricLoadError> {
    let descriptions: Vec<String> = criteria.iter().map(|c| c.description.clone()).collect();
    if !descriptions.is_empty() {
        let embeddings = embedder.embed_batch(&descriptions)?;
        if embeddings.len() != criteria.len() {
            return Err(RubricLoadError::EmbeddingCount {
                expected: criteria.len(),
                got: embeddings.len(),
            });
        }
        for (criterion, embedding) in criteria.iter_mut().zip(embeddings) {
            criterion.description_embedding = embedding;
        }
    }

    let table = RubricTable::new(criteria);
    info!(
        criteria = table.len(),
        total_weight = table.total_weight(),
        "Rubric loaded in {:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(table)
}

/// Build one criterion; `row` is 0-based.
fn parse_row<S: AsRef<str>>(cells: &[S], row: usize, columns: &ColumnMap) -> RubricCriterion {
    let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(|c| c.as_ref());

    let description = cell(columns.description).unwrap_or_default().to_string();
    let criterion_id = non_blank(cell(columns.criterion_id))
        .map(str::to_string)
        .unwrap_or_else(|| format!("C{}", row + 1));
    let criterion_name = non_blank(cell(columns.criterion_name))
        .map(str::to_string)
        .unwrap_or_else(|| description.clone());

    let min_words = word_bound(cell(columns.min_words), DEFAULT_MIN_WORDS, row, "min_words");
    let max_words = word_bound(cell(columns.max_words), DEFAULT_MAX_WORDS, row, "max_words");

    let weight_cell = cell(columns.weight);
    let weight = parse_weight(weight_cell);
    if let Some(raw) = non_blank(weight_cell) {
        if raw.parse::<f64>().ok() != Some(weight) {
            debug!(row = row + 1, raw, "Unusable weight, defaulting to {}", weight);
        }
    }

    RubricCriterion {
        criterion_id,
        criterion_name,
        keywords: parse_keywords(cell(columns.keywords)),
        description,
        min_words,
        max_words,
        weight,
        description_embedding: Vec::new(),
    }
}

fn word_bound(raw: Option<&str>, default: u32, row: usize, column: &str) -> u32 {
    match (parse_word_bound(raw), non_blank(raw)) {
        (Some(n), _) => n,
        (None, Some(bad)) => {
            debug!(row = row + 1, column, raw = bad, "Unusable word bound, defaulting to {}", default);
            default
        }
        (None, None) => default,
    }
}
