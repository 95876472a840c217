//! # YAML Film Repository
//!
//! The whole film catalog lives in a single `films.yaml` at the root of the
//! data directory, kept sorted by name.

use anyhow::{Context, Result};
use log::{debug, info};
use shared::Film;
use std::fs;

use super::connection::{write_atomically, DataDirectory};
use crate::storage::FilmStorage;

#[derive(Debug, Clone)]
pub struct FilmRepository {
    connection: DataDirectory,
}

impl FilmRepository {
    pub fn new(connection: DataDirectory) -> Self {
        Self { connection }
    }

    fn read_films(&self) -> Result<Vec<Film>> {
        let path = self.connection.films_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let yaml_content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&yaml_content).with_context(|| format!("Malformed film catalog {}", path.display()))
    }

    fn write_films(&self, mut films: Vec<Film>) -> Result<()> {
        films.sort_by(|a, b| a.name.cmp(&b.name));
        let yaml_content = serde_yaml::to_string(&films)?;
        write_atomically(&self.connection.films_file(), &yaml_content)
    }
}

impl FilmStorage for FilmRepository {
    fn list_films(&self) -> Result<Vec<Film>> {
        let mut films = self.read_films()?;
        films.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Loaded {} films", films.len());
        Ok(films)
    }

    fn save_film(&self, film: &Film) -> Result<()> {
        let mut films = self.read_films()?;
        match films.iter_mut().find(|f| f.name == film.name) {
            Some(existing) => *existing = film.clone(),
            None => films.push(film.clone()),
        }
        self.write_films(films)?;
        info!("Saved film '{}' at {:.2}/m²", film.name, film.price_per_square_meter);
        Ok(())
    }

    fn delete_film(&self, name: &str) -> Result<bool> {
        let films = self.read_films()?;
        let before = films.len();
        let remaining: Vec<Film> = films.into_iter().filter(|f| f.name != name).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.write_films(remaining)?;
        info!("Deleted film '{}'", name);
        Ok(true)
    }
}
