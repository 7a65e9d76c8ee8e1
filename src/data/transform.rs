use super::model::{FieldValue, Record};

// ---------------------------------------------------------------------------
// Field coercion rules
// ---------------------------------------------------------------------------

/// How a declared column is coerced. Undeclared columns stay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Ratings and other fractional values.
    Float,
    /// Counts and years. Parsed the same way as `Float`; the split only
    /// documents intent.
    Integer,
    /// Comma-separated list, each piece trimmed.
    List,
}

/// Per-dataset row transform: copies every column of the row, then
/// overwrites the declared subset with coerced values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowTransform {
    fields: Vec<(String, FieldKind)>,
}

impl RowTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a coerced column. Builder style.
    pub fn with(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self.fields.push((name.to_string(), kind));
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }

    /// Build a record from `(column, raw)` pairs.
    ///
    /// Declared columns missing from the row are still emitted (NaN or an
    /// empty list), so a declared numeric field is always present.
    pub fn apply<'a, I>(&self, row: I) -> Record
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Record::default();
        for (name, raw) in row {
            let value = match self.kind_of(name) {
                Some(kind) => coerce(raw, kind),
                None => FieldValue::Text(raw.to_string()),
            };
            record.fields.insert(name.to_string(), value);
        }
        for (name, kind) in &self.fields {
            if !record.fields.contains_key(name) {
                record.fields.insert(name.clone(), coerce("", *kind));
            }
        }
        record
    }

    // -- Transforms for the application's files --

    /// `title_oscar.tsv`, ratings and oscar counts only.
    pub fn oscar_summary() -> Self {
        Self::new()
            .with("averageRating", FieldKind::Float)
            .with("numVotes", FieldKind::Integer)
            .with("oscarNominations", FieldKind::Integer)
            .with("oscarWins", FieldKind::Integer)
    }

    /// `title_oscar.tsv` with year, runtime and genres.
    pub fn oscar_full() -> Self {
        Self::oscar_summary()
            .with("startYear", FieldKind::Integer)
            .with("runtimeMinutes", FieldKind::Integer)
            .with("genres", FieldKind::List)
    }

    /// `title_oscar_con_country.tsv`.
    pub fn oscar_with_country() -> Self {
        Self::oscar_full().with("country_origin", FieldKind::List)
    }

    /// `world_imdb_movies_top_movies_per_year.csv`.
    pub fn imdb_top_per_year() -> Self {
        Self::new()
            .with("rating_imdb", FieldKind::Float)
            .with("vote", FieldKind::Integer)
            .with("year", FieldKind::Integer)
            .with("win", FieldKind::Integer)
            .with("nomination", FieldKind::Integer)
            .with("oscar", FieldKind::Integer)
            .with("genre", FieldKind::List)
            .with("country_origin", FieldKind::List)
    }

    /// `radial_people.csv`: one row per person/movie credit.
    pub fn radial_people() -> Self {
        Self::new()
            .with("year", FieldKind::Integer)
            .with("averageRating", FieldKind::Float)
            .with("numVotes", FieldKind::Integer)
            .with("oscarNominations", FieldKind::Integer)
            .with("oscarWins", FieldKind::Integer)
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Coerce one raw cell.
pub fn coerce(raw: &str, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Float | FieldKind::Integer => FieldValue::Number(parse_number(raw)),
        FieldKind::List => FieldValue::List(split_list(raw)),
    }
}

/// Empty or unparsable input yields NaN, never 0.
///
/// Only decimal literals are numbers: `inf`, `NaN` and hex spellings are
/// absent like any other text.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() || !s.bytes().all(is_decimal_literal_byte) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn is_decimal_literal_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')
}

/// `"Drama, Comedy"` → `["Drama", "Comedy"]`, `""` → `[]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
