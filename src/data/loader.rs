use super::model::{Dataset, Graph};
use super::transform::RowTransform;
use crate::error::{ResourceKind, Result};

// ---------------------------------------------------------------------------
// Format – how a fetched body becomes a dataset
// ---------------------------------------------------------------------------

/// Parsing strategy of a loader.
pub trait Format: Clone + Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    /// Used to pick the error message when the fetch is not successful.
    fn kind(&self) -> ResourceKind;

    fn parse(&self, body: &str) -> Result<Self::Output>;

    /// One-line description for the load-completion log.
    fn describe(output: &Self::Output) -> String;
}

/// Delimited text (tab or comma) with a header row.
#[derive(Debug, Clone)]
pub struct Delimited {
    pub delimiter: u8,
    pub transform: RowTransform,
}

impl Delimited {
    pub fn tsv(transform: RowTransform) -> Self {
        Self { delimiter: b'\t', transform }
    }

    pub fn csv(transform: RowTransform) -> Self {
        Self { delimiter: b',', transform }
    }
}

impl Format for Delimited {
    type Output = Dataset;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Table
    }

    fn parse(&self, body: &str) -> Result<Dataset> {
        parse_delimited(body, self.delimiter, &self.transform)
    }

    fn describe(output: &Dataset) -> String {
        format!("{} rows", output.len())
    }
}

/// JSON graph document, kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphJson;

impl Format for GraphJson {
    type Output = Graph;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Graph
    }

    fn parse(&self, body: &str) -> Result<Graph> {
        parse_graph(body)
    }

    fn describe(output: &Graph) -> String {
        format!("{} nodes, {} links", output.node_count(), output.link_count())
    }
}

// ---------------------------------------------------------------------------
// Delimited parser
// ---------------------------------------------------------------------------

/// Parse a delimited body whose first line is the header.
///
/// Every row goes through `transform`. Ragged rows are accepted: cells
/// beyond the header are dropped, and missing cells are left out of the
/// row, so declared numeric fields come out absent (NaN).
pub fn parse_delimited(body: &str, delimiter: u8, transform: &RowTransform) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let pairs = headers.iter().map(String::as_str).zip(row.iter());
        records.push(transform.apply(pairs));
    }

    Ok(Dataset {
        records,
        column_names: headers,
    })
}

// ---------------------------------------------------------------------------
// Graph parser
// ---------------------------------------------------------------------------

/// Expected shape:
///
/// ```json
/// { "nodes": [ {...}, ... ], "links": [ {...}, ... ] }
/// ```
///
/// Node and link objects are not inspected.
pub fn parse_graph(body: &str) -> Result<Graph> {
    Ok(serde_json::from_str(body)?)
}
