//! JSON document store for tournaments.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::generator::PairingGenerator;
use crate::models::{Tournament, TournamentError, TournamentId};

/// Short description of a stored tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub players: usize,
    pub rounds: usize,
    pub rounds_paired: usize,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            created_at: t.created_at,
            players: t.players().len(),
            rounds: t.round_count(),
            rounds_paired: t.rounds().iter().filter(|r| !r.is_empty()).count(),
        }
    }
}

/// Reads and writes tournaments in the data directory.
///
/// Loaded tournaments are bound to the store's generator.
#[derive(Debug, Clone)]
pub struct TournamentStore {
    config: StorageConfig,
    generator: Option<Arc<dyn PairingGenerator>>,
}

impl TournamentStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            generator: None,
        }
    }

    /// Bind every loaded tournament to `generator`.
    pub fn with_generator(mut self, generator: Arc<dyn PairingGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    fn path_for(&self, id: &TournamentId) -> PathBuf {
        self.config
            .tournaments_dir()
            .join(format!("{}.json", id.as_str()))
    }

    /// Write the tournament, replacing any previous version.
    pub fn save(&self, tournament: &Tournament) -> Result<PathBuf, StorageError> {
        let path = self.path_for(&tournament.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Stage in a sibling file, then rename over the target.
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, tournament)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;

        info!("Saved tournament {} to {:?}", tournament.id, path);
        Ok(path)
    }

    /// Load a tournament by ID.
    pub fn load(&self, id: &TournamentId) -> Result<Tournament, StorageError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let mut tournament = self.read(&path)?;
        if let Some(generator) = &self.generator {
            tournament.set_generator(generator.clone());
        }

        debug!("Loaded tournament {} from {:?}", id, path);
        Ok(tournament)
    }

    fn read(&self, path: &Path) -> Result<Tournament, StorageError> {
        let reader = BufReader::new(File::open(path)?);
        let tournament: Tournament = serde_json::from_reader(reader)?;

        if tournament.round_count() == 0 {
            return Err(StorageError::Invalid {
                path: path.to_path_buf(),
                source: TournamentError::InvalidInput("tournament has no rounds".to_string()),
            });
        }
        if tournament.players().len() % 2 != 0 {
            return Err(StorageError::Invalid {
                path: path.to_path_buf(),
                source: TournamentError::InvalidInput("odd number of players".to_string()),
            });
        }

        Ok(tournament)
    }

    /// Summaries of every stored tournament, oldest first.
    ///
    /// Unreadable documents are skipped with a warning.
    pub fn list(&self) -> Result<Vec<TournamentSummary>, StorageError> {
        let dir = self.config.tournaments_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match self.read(&path) {
                Ok(tournament) => summaries.push(TournamentSummary::from(&tournament)),
                Err(e) => warn!("Skipping {:?}: {}", path, e),
            }
        }

        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        debug!("Listed {} tournaments in {:?}", summaries.len(), dir);
        Ok(summaries)
    }

    /// Remove a stored tournament.
    pub fn delete(&self, id: &TournamentId) -> Result<(), StorageError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        fs::remove_file(&path)?;
        info!("Deleted tournament {}", id);
        Ok(())
    }
}
