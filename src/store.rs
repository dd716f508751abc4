//! Append-only persistence for the uptime log

use crate::errors::{ReporterError, Result};
use crate::observation::Observation;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The persisted uptime log: a flat JSON array of observation records.
///
/// Exclusively owned by the monitoring process. Records keep their append
/// order; there is no delete, compaction, or rotation, so the log grows
/// without bound.
#[derive(Debug)]
pub struct UptimeStore {
    path: PathBuf,
    records: Vec<Observation>,
}

impl UptimeStore {
    /// Load the store from disk.
    ///
    /// A missing file yields an empty store. A file that exists but fails
    /// to parse yields [`ReporterError::CorruptStore`]; the caller must
    /// treat that as fatal and the file is left untouched.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            debug!("No uptime log at {}, starting empty", path.display());
            return Ok(Self {
                path,
                records: Vec::new(),
            });
        }

        let raw = fs::read_to_string(&path)?;
        let records: Vec<Observation> = serde_json::from_str(&raw).map_err(|e| {
            ReporterError::CorruptStore(format!("{}: {}", path.display(), e))
        })?;

        debug!(
            "Loaded {} records from uptime log {}",
            records.len(),
            path.display()
        );

        Ok(Self { path, records })
    }

    /// Append one record and persist the full sequence atomically
    pub fn append(&mut self, observation: Observation) -> Result<()> {
        self.records.push(observation);
        self.persist()?;

        info!(
            "Appended observation, uptime log now holds {} records",
            self.records.len()
        );
        Ok(())
    }

    // Full-sequence rewrite through a sibling temp file, renamed into
    // place. Single writer process assumed.
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
