//! Output artifact writing
//!
//! This module renders extracted records to pretty-printed JSON files and
//! writes the companion CSV enumerating every roll number a run attempted.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::StudentRecord;

/// JSON/CSV artifact writer rooted at an output directory
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    /// Create a writer, creating the output directory if needed
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write one batch scope's records as `results_{scope}.json`
    ///
    /// An all-failure batch still produces an artifact holding an empty
    /// array.
    pub fn write_batch(&self, scope: &str, records: &[StudentRecord]) -> Result<PathBuf> {
        self.write_json(&format!("results_{scope}.json"), &records)
    }

    /// Write a whole run's aggregate as `results.json`
    pub fn write_run(&self, records: &[StudentRecord]) -> Result<PathBuf> {
        self.write_json("results.json", &records)
    }

    /// Write a single student's record as `{roll}_result.json`
    pub fn write_student(&self, record: &StudentRecord) -> Result<PathBuf> {
        self.write_json(&format!("{}_result.json", record.roll_number), record)
    }

    /// Write the attempted roll numbers as one quoted comma-separated CSV row
    pub fn write_roll_csv(&self, rolls: &[String]) -> Result<PathBuf> {
        let row = rolls
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(",");

        let path = self.output_dir.join("roll_numbers.csv");
        fs::write(&path, format!("{row}\n"))
            .with_context(|| format!("Failed to write roll CSV: {}", path.display()))?;
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, filename: &str, value: &T) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize records")?;

        let path = self.output_dir.join(filename);
        fs::write(&path, json)
            .with_context(|| format!("Failed to write JSON artifact: {}", path.display()))?;
        Ok(path)
    }
}
