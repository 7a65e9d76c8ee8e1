//! The application's datasets, one memoized loader each.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::Loader;
use crate::config::Config;
use crate::data::loader::{Delimited, GraphJson};
use crate::data::model::{Dataset, Graph};
use crate::data::transform::RowTransform;
use crate::error::Result;
use crate::source::ResourceSource;

pub const TITLE_OSCAR_TSV: &str = "title_oscar.tsv";
pub const TITLE_OSCAR_COUNTRY_TSV: &str = "title_oscar_con_country.tsv";
pub const TOP_MOVIES_PER_YEAR_CSV: &str = "world_imdb_movies_top_movies_per_year.csv";
pub const RADIAL_PEOPLE_CSV: &str = "radial_people.csv";
pub const PROJECT_GRAPH_JSON: &str = "graph_for_project_sin_country.json";
pub const PROJECT_GRAPH_COUNTRY_JSON: &str = "graph_for_project.json";
pub const FULL_GRAPH_JSON: &str = "graph_full_cleaned.json";
pub const PERSON_GRAPH_JSON: &str = "graphic_person.json";

// ---------------------------------------------------------------------------
// DatasetId
// ---------------------------------------------------------------------------

/// Names every dataset the catalog can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetId {
    MoviesLastMovies,
    MoviesFullData,
    MoviesWithCountry,
    TopMoviesPerYear,
    RadialPeople,
    ProjectGraph,
    ProjectGraphWithCountry,
    FullGraph,
    PersonGraph,
}

impl DatasetId {
    pub const ALL: [DatasetId; 9] = [
        DatasetId::MoviesLastMovies,
        DatasetId::MoviesFullData,
        DatasetId::MoviesWithCountry,
        DatasetId::TopMoviesPerYear,
        DatasetId::RadialPeople,
        DatasetId::ProjectGraph,
        DatasetId::ProjectGraphWithCountry,
        DatasetId::FullGraph,
        DatasetId::PersonGraph,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatasetId::MoviesLastMovies => "movies-last",
            DatasetId::MoviesFullData => "movies-full",
            DatasetId::MoviesWithCountry => "movies-country",
            DatasetId::TopMoviesPerYear => "top-per-year",
            DatasetId::RadialPeople => "radial-people",
            DatasetId::ProjectGraph => "project-graph",
            DatasetId::ProjectGraphWithCountry => "project-graph-country",
            DatasetId::FullGraph => "full-graph",
            DatasetId::PersonGraph => "person-graph",
        }
    }

    pub fn file(&self) -> &'static str {
        match self {
            DatasetId::MoviesLastMovies | DatasetId::MoviesFullData => TITLE_OSCAR_TSV,
            DatasetId::MoviesWithCountry => TITLE_OSCAR_COUNTRY_TSV,
            DatasetId::TopMoviesPerYear => TOP_MOVIES_PER_YEAR_CSV,
            DatasetId::RadialPeople => RADIAL_PEOPLE_CSV,
            DatasetId::ProjectGraph => PROJECT_GRAPH_JSON,
            DatasetId::ProjectGraphWithCountry => PROJECT_GRAPH_COUNTRY_JSON,
            DatasetId::FullGraph => FULL_GRAPH_JSON,
            DatasetId::PersonGraph => PERSON_GRAPH_JSON,
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for DatasetId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DatasetId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = DatasetId::ALL.iter().map(|id| id.name()).collect();
                format!("unknown dataset '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Size of a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSummary {
    Table { rows: usize, columns: usize },
    Graph { nodes: usize, links: usize },
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSummary::Table { rows, columns } => write!(f, "{rows} rows x {columns} columns"),
            DatasetSummary::Graph { nodes, links } => write!(f, "{nodes} nodes, {links} links"),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetCatalog
// ---------------------------------------------------------------------------

enum Slot<'a> {
    Table(&'a Loader<Delimited>),
    Graph(&'a Loader<GraphJson>),
}

/// Owns one memoized loader per dataset. Create it once and share it
/// (e.g. behind an `Arc`); the caches live as long as the catalog.
pub struct DatasetCatalog {
    movies_last_movies: Loader<Delimited>,
    movies_full_data: Loader<Delimited>,
    movies_with_country: Loader<Delimited>,
    top_movies_per_year: Loader<Delimited>,
    radial_people: Loader<Delimited>,
    project_graph: Loader<GraphJson>,
    project_graph_with_country: Loader<GraphJson>,
    full_graph: Loader<GraphJson>,
    person_graph: Loader<GraphJson>,
}

impl DatasetCatalog {
    /// Catalog reading through the source the config points at.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, config.source())
    }

    pub fn new(config: &Config, source: Arc<dyn ResourceSource>) -> Self {
        let table = |id: DatasetId, format: Delimited| {
            Loader::new(config.locator(id.file()), format, Arc::clone(&source))
        };
        let graph =
            |id: DatasetId| Loader::new(config.locator(id.file()), GraphJson, Arc::clone(&source));

        Self {
            movies_last_movies: table(
                DatasetId::MoviesLastMovies,
                Delimited::tsv(RowTransform::oscar_summary()),
            ),
            movies_full_data: table(
                DatasetId::MoviesFullData,
                Delimited::tsv(RowTransform::oscar_full()),
            ),
            movies_with_country: table(
                DatasetId::MoviesWithCountry,
                Delimited::tsv(RowTransform::oscar_with_country()),
            ),
            top_movies_per_year: table(
                DatasetId::TopMoviesPerYear,
                Delimited::csv(RowTransform::imdb_top_per_year()),
            ),
            radial_people: table(
                DatasetId::RadialPeople,
                Delimited::csv(RowTransform::radial_people()),
            ),
            project_graph: graph(DatasetId::ProjectGraph),
            project_graph_with_country: graph(DatasetId::ProjectGraphWithCountry),
            full_graph: graph(DatasetId::FullGraph),
            person_graph: graph(DatasetId::PersonGraph),
        }
    }

    /// Oscar titles with ratings and oscar counts coerced.
    pub async fn movies_last_movies(&self) -> Result<Arc<Dataset>> {
        self.movies_last_movies.load().await
    }

    /// Oscar titles with year, runtime and genre list as well.
    pub async fn movies_full_data(&self) -> Result<Arc<Dataset>> {
        self.movies_full_data.load().await
    }

    pub async fn movies_with_country(&self) -> Result<Arc<Dataset>> {
        self.movies_with_country.load().await
    }

    pub async fn top_movies_per_year(&self) -> Result<Arc<Dataset>> {
        self.top_movies_per_year.load().await
    }

    /// Person/movie credits feeding the radial view.
    pub async fn radial_people(&self) -> Result<Arc<Dataset>> {
        self.radial_people.load().await
    }

    /// Movie/person graph without country data.
    pub async fn project_graph(&self) -> Result<Arc<Graph>> {
        self.project_graph.load().await
    }

    pub async fn project_graph_with_country(&self) -> Result<Arc<Graph>> {
        self.project_graph_with_country.load().await
    }

    pub async fn full_graph(&self) -> Result<Arc<Graph>> {
        self.full_graph.load().await
    }

    /// Person-to-person collaboration graph.
    pub async fn person_graph(&self) -> Result<Arc<Graph>> {
        self.person_graph.load().await
    }

    fn slot(&self, id: DatasetId) -> Slot<'_> {
        match id {
            DatasetId::MoviesLastMovies => Slot::Table(&self.movies_last_movies),
            DatasetId::MoviesFullData => Slot::Table(&self.movies_full_data),
            DatasetId::MoviesWithCountry => Slot::Table(&self.movies_with_country),
            DatasetId::TopMoviesPerYear => Slot::Table(&self.top_movies_per_year),
            DatasetId::RadialPeople => Slot::Table(&self.radial_people),
            DatasetId::ProjectGraph => Slot::Graph(&self.project_graph),
            DatasetId::ProjectGraphWithCountry => Slot::Graph(&self.project_graph_with_country),
            DatasetId::FullGraph => Slot::Graph(&self.full_graph),
            DatasetId::PersonGraph => Slot::Graph(&self.person_graph),
        }
    }

    /// Locator the dataset is fetched from.
    pub fn locator(&self, id: DatasetId) -> &str {
        match self.slot(id) {
            Slot::Table(loader) => loader.locator(),
            Slot::Graph(loader) => loader.locator(),
        }
    }

    /// Load (or reuse) a dataset and report its size.
    pub async fn summary(&self, id: DatasetId) -> Result<DatasetSummary> {
        match self.slot(id) {
            Slot::Table(loader) => {
                let ds = loader.load().await?;
                Ok(DatasetSummary::Table {
                    rows: ds.len(),
                    columns: ds.column_names.len(),
                })
            }
            Slot::Graph(loader) => {
                let g = loader.load().await?;
                Ok(DatasetSummary::Graph {
                    nodes: g.node_count(),
                    links: g.link_count(),
                })
            }
        }
    }

    pub fn is_cached(&self, id: DatasetId) -> bool {
        match self.slot(id) {
            Slot::Table(loader) => loader.cached().is_some(),
            Slot::Graph(loader) => loader.cached().is_some(),
        }
    }

    pub fn invalidate(&self, id: DatasetId) {
        match self.slot(id) {
            Slot::Table(loader) => loader.invalidate(),
            Slot::Graph(loader) => loader.invalidate(),
        }
    }

    /// Drop every cached dataset.
    pub fn invalidate_all(&self) {
        for id in DatasetId::ALL {
            self.invalidate(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_names_round_trip_through_from_str() {
        for id in DatasetId::ALL {
            assert_eq!(id.name().parse::<DatasetId>().unwrap(), id);
        }
        let err = "nope".parse::<DatasetId>().unwrap_err();
        assert!(err.contains("person-graph"));
    }

    #[test]
    fn both_title_oscar_variants_share_a_file() {
        assert_eq!(DatasetId::MoviesLastMovies.file(), DatasetId::MoviesFullData.file());
        assert_eq!(DatasetId::ProjectGraph.file(), "graph_for_project_sin_country.json");
    }

    #[test]
    fn locators_use_the_configured_data_dir() {
        let config = Config::default();
        let catalog = DatasetCatalog::from_config(&config);
        assert_eq!(catalog.locator(DatasetId::FullGraph), "data/graph_full_cleaned.json");
        assert_eq!(
            catalog.locator(DatasetId::TopMoviesPerYear),
            "data/world_imdb_movies_top_movies_per_year.csv"
        );
        assert!(!catalog.is_cached(DatasetId::FullGraph));
    }

    #[test]
    fn summary_display() {
        assert_eq!(
            DatasetSummary::Table { rows: 3, columns: 9 }.to_string(),
            "3 rows x 9 columns"
        );
        assert_eq!(
            DatasetSummary::Graph { nodes: 5, links: 4 }.to_string(),
            "5 nodes, 4 links"
        );
    }
}
