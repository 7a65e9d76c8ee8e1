//! Writes a small deterministic copy of every CineDive data file so the
//! loaders can be tried without the real exports:
//!
//! ```text
//! cargo run --bin generate_sample -- static
//! cargo run -- --base static --twice
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Value};

use cinedive::catalog::{
    FULL_GRAPH_JSON, PERSON_GRAPH_JSON, PROJECT_GRAPH_COUNTRY_JSON, PROJECT_GRAPH_JSON,
    RADIAL_PEOPLE_CSV, TITLE_OSCAR_COUNTRY_TSV, TITLE_OSCAR_TSV, TOP_MOVIES_PER_YEAR_CSV,
};
use cinedive::config::DEFAULT_DATA_DIR;

const GENRES: [&str; 8] = [
    "Drama", "Comedy", "Crime", "Romance", "War", "Biography", "Musical", "Thriller",
];
const COUNTRIES: [&str; 6] = ["US", "GB", "FR", "IT", "JP", "KR"];
const ROLES: [&str; 4] = ["director", "writer", "actor", "actress"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// 1..=max distinct picks, in `items` order.
    fn pick_some<'a>(&mut self, items: &[&'a str], max: usize) -> Vec<&'a str> {
        let n = 1 + self.below(max as u64) as usize;
        let chosen: BTreeSet<usize> = (0..n)
            .map(|_| self.below(items.len() as u64) as usize)
            .collect();
        chosen.into_iter().map(|i| items[i]).collect()
    }
}

struct Movie {
    id: String,
    title: String,
    year: u32,
    runtime: Option<u32>,
    genres: Vec<&'static str>,
    countries: Vec<&'static str>,
    rating: f64,
    votes: Option<u64>,
    nominations: u32,
    wins: u32,
}

struct Credit {
    person: usize,
    movie: usize,
    role: &'static str,
}

fn generate_movies(rng: &mut SimpleRng, count: usize) -> Vec<Movie> {
    (0..count)
        .map(|i| {
            let nominations = rng.below(12) as u32;
            Movie {
                id: format!("tt{:07}", 100_000 + i * 37),
                title: format!("Sample Feature {}", i + 1),
                year: 1950 + rng.below(74) as u32,
                // a few rows with empty cells exercise the absent-number path
                runtime: (i % 9 != 4).then(|| 80 + rng.below(120) as u32),
                genres: rng.pick_some(&GENRES, 3),
                countries: rng.pick_some(&COUNTRIES, 2),
                rating: 5.0 + rng.below(45) as f64 / 10.0,
                votes: (i % 7 != 3).then(|| 1_000 + rng.below(2_000_000)),
                nominations,
                wins: rng.below(nominations as u64 + 1) as u32,
            }
        })
        .collect()
}

fn generate_credits(rng: &mut SimpleRng, movies: &[Movie], people: usize) -> Vec<Credit> {
    let mut credits = Vec::new();
    for movie in 0..movies.len() {
        let mut seen = BTreeSet::new();
        for _ in 0..4 {
            let person = rng.below(people as u64) as usize;
            if seen.insert(person) {
                credits.push(Credit {
                    person,
                    movie,
                    role: rng.pick(&ROLES),
                });
            }
        }
    }
    credits
}

fn person_id(i: usize) -> String {
    format!("nm{:07}", 500 + i)
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn write_title_oscar(path: &Path, movies: &[Movie], with_country: bool) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "tconst", "primaryTitle", "startYear", "runtimeMinutes", "genres",
        "averageRating", "numVotes", "oscarNominations", "oscarWins",
    ];
    if with_country {
        header.push("country_origin");
    }
    w.write_record(&header)?;

    for m in movies {
        let mut row = vec![
            m.id.clone(),
            m.title.clone(),
            m.year.to_string(),
            opt(m.runtime),
            m.genres.join(","),
            format!("{:.1}", m.rating),
            opt(m.votes),
            m.nominations.to_string(),
            m.wins.to_string(),
        ];
        if with_country {
            row.push(m.countries.join(","));
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

fn write_top_per_year(path: &Path, movies: &[Movie]) -> Result<()> {
    let mut best: BTreeMap<u32, &Movie> = BTreeMap::new();
    for m in movies {
        let entry = best.entry(m.year).or_insert(m);
        if m.rating > entry.rating {
            *entry = m;
        }
    }

    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "id", "title", "year", "genre", "country_origin", "rating_imdb", "vote", "win",
        "nomination", "oscar",
    ])?;
    for m in best.values() {
        w.write_record([
            m.id.clone(),
            m.title.clone(),
            m.year.to_string(),
            m.genres.join(", "),
            m.countries.join(", "),
            format!("{:.1}", m.rating),
            opt(m.votes),
            (m.wins * 2).to_string(),
            (m.nominations * 2).to_string(),
            m.wins.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_radial_people(path: &Path, movies: &[Movie], credits: &[Credit]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "personId", "personName", "movieId", "movieTitle", "year", "averageRating",
        "numVotes", "oscarNominations", "oscarWins", "role",
    ])?;
    for c in credits {
        let m = &movies[c.movie];
        w.write_record([
            person_id(c.person),
            format!("Person {}", c.person + 1),
            m.id.clone(),
            m.title.clone(),
            m.year.to_string(),
            format!("{:.1}", m.rating),
            opt(m.votes),
            m.nominations.to_string(),
            m.wins.to_string(),
            c.role.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Movie and person nodes, person → movie credit links.
fn project_graph(movies: &[Movie], credits: &[Credit], people: usize, with_country: bool) -> Value {
    let mut nodes: Vec<Value> = movies
        .iter()
        .map(|m| {
            let mut node = json!({
                "id": m.id,
                "type": "movie",
                "title": m.title,
                "year": m.year,
                "genres": m.genres,
                "averageRating": m.rating,
                "numVotes": m.votes,
                "oscarNominations": m.nominations,
                "oscarWins": m.wins,
            });
            if with_country {
                node["country_origin"] = json!(m.countries.join(","));
            }
            node
        })
        .collect();
    nodes.extend((0..people).map(|p| {
        json!({ "id": person_id(p), "type": "person", "name": format!("Person {}", p + 1) })
    }));

    let links: Vec<Value> = credits
        .iter()
        .map(|c| {
            json!({
                "source": person_id(c.person),
                "target": movies[c.movie].id,
                "role": c.role,
                "year": movies[c.movie].year,
            })
        })
        .collect();

    json!({ "nodes": nodes, "links": links })
}

/// Person nodes linked when they share a movie.
fn person_graph(movies: &[Movie], credits: &[Credit], people: usize) -> Value {
    let mut roles: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();
    let mut cast: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for c in credits {
        roles.entry(c.person).or_default().insert(c.role);
        cast.entry(c.movie).or_default().push(c.person);
    }

    let nodes: Vec<Value> = (0..people)
        .filter(|p| roles.contains_key(p))
        .map(|p| {
            let kinds: Vec<&str> = roles[&p].iter().copied().collect();
            json!({ "id": person_id(p), "name": format!("Person {}", p + 1), "type": kinds.join(", ") })
        })
        .collect();

    let mut pairs: BTreeMap<(usize, usize), BTreeSet<&str>> = BTreeMap::new();
    for (movie, members) in &cast {
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                let key = ((*a).min(*b), (*a).max(*b));
                pairs.entry(key).or_default().insert(movies[*movie].title.as_str());
            }
        }
    }
    let links: Vec<Value> = pairs
        .into_iter()
        .map(|((a, b), films)| {
            json!({ "source": person_id(a), "target": person_id(b), "filmes": films })
        })
        .collect();

    json!({ "nodes": nodes, "links": links })
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("static"));
    let data = out.join(DEFAULT_DATA_DIR);
    std::fs::create_dir_all(&data).with_context(|| format!("creating {}", data.display()))?;

    let mut rng = SimpleRng::new(42);
    let people = 40;
    let movies = generate_movies(&mut rng, 60);
    let credits = generate_credits(&mut rng, &movies, people);

    write_title_oscar(&data.join(TITLE_OSCAR_TSV), &movies, false)?;
    write_title_oscar(&data.join(TITLE_OSCAR_COUNTRY_TSV), &movies, true)?;
    write_top_per_year(&data.join(TOP_MOVIES_PER_YEAR_CSV), &movies)?;
    write_radial_people(&data.join(RADIAL_PEOPLE_CSV), &movies, &credits)?;

    let full = project_graph(&movies, &credits, people, true);
    write_json(&data.join(PROJECT_GRAPH_JSON), &project_graph(&movies, &credits, people, false))?;
    write_json(&data.join(PROJECT_GRAPH_COUNTRY_JSON), &full)?;
    write_json(&data.join(FULL_GRAPH_JSON), &full)?;
    write_json(&data.join(PERSON_GRAPH_JSON), &person_graph(&movies, &credits, people))?;

    println!(
        "Wrote {} movies, {} credits to {}",
        movies.len(),
        credits.len(),
        data.display()
    );
    Ok(())
}
