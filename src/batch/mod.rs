//! Sequential batch orchestration
//!
//! Drives roll sequences through fetch → extract → persist, one roll at a
//! time, with a randomized pacing delay between consecutive fetches. A
//! batch is best effort: a failed fetch or extraction contributes no record
//! and never halts the run.

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::crawler::ResultFetcher;
use crate::models::StudentRecord;
use crate::parser::ResultExtractor;
use crate::roll;
use crate::storage::ResultWriter;

/// Pacing profile for a run
///
/// Department batches breathe 1-3 s between fetches; year-wide and
/// all-years sweeps stretch to 2-5 s since they hammer the portal far
/// longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pace {
    Batch,
    Sweep,
}

/// Counters for one run
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchStats {
    /// Rolls attempted
    pub attempted: usize,

    /// Pages fetched successfully
    pub fetched: usize,

    /// Records extracted successfully
    pub extracted: usize,
}

/// Sequential batch runner
///
/// Processing is strictly one-roll-at-a-time: fetch, then extract, then the
/// next roll. Rolls share no mutable state, so per-roll task isolation can
/// parallelize this later without touching the extractor.
pub struct BatchRunner {
    fetcher: ResultFetcher,
    extractor: ResultExtractor,
    writer: ResultWriter,
    config: Config,
    rng: ChaCha8Rng,
}

impl BatchRunner {
    /// Create a runner from configuration
    ///
    /// A seed makes pacing jitter and User-Agent rotation deterministic.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, HTTP client construction, or an
    /// uncreatable output directory
    pub fn new(config: Config, seed: Option<u64>) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let fetcher = match seed {
            Some(seed) => ResultFetcher::with_seed(&config.fetch, seed),
            None => ResultFetcher::new(&config.fetch),
        }
        .context("Failed to create HTTP client")?;

        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            fetcher,
            extractor: ResultExtractor::new(),
            writer: ResultWriter::new(&config.output.dir)?,
            config,
            rng,
        })
    }

    /// Fetch and persist one student's result
    ///
    /// Returns the written artifact path, or `None` when the portal has no
    /// data for the roll.
    pub async fn run_student(&mut self, roll: &str) -> Result<Option<std::path::PathBuf>> {
        info!(roll = %roll, "Fetching single student result");

        match self.process_roll(roll).await {
            Some(record) => {
                let path = self.writer.write_student(&record)?;
                info!(roll = %roll, path = %path.display(), "Result written");
                Ok(Some(path))
            }
            None => {
                info!(roll = %roll, "No result available");
                Ok(None)
            }
        }
    }

    /// Run one department for one year
    ///
    /// Writes `results_{year}{dept}.json` plus the roll-number CSV for the
    /// attempted sequence.
    pub async fn run_department(&mut self, year: &str, dept: &str) -> Result<BatchStats> {
        let mut stats = BatchStats::default();
        let records = self.scrape_department(year, dept, Pace::Batch, &mut stats).await?;
        self.writer.write_batch(&format!("{year}{dept}"), &records)?;
        self.writer.write_roll_csv(&roll::generate_rolls(year, dept))?;

        info!(
            year = %year,
            dept = %dept,
            attempted = stats.attempted,
            extracted = stats.extracted,
            "Department batch complete"
        );
        Ok(stats)
    }

    /// Run all departments for one year
    pub async fn run_year(&mut self, year: &str) -> Result<BatchStats> {
        self.run_sweep(&[year.to_string()]).await
    }

    /// Run all years, all departments
    pub async fn run_all(&mut self) -> Result<BatchStats> {
        let years: Vec<String> = roll::YEARS.iter().map(|y| y.to_string()).collect();
        self.run_sweep(&years).await
    }

    /// Sweep the given years across every department
    ///
    /// Writes one per-scope artifact per (year, dept), a whole-run
    /// aggregate, and the CSV of every roll attempted.
    async fn run_sweep(&mut self, years: &[String]) -> Result<BatchStats> {
        let mut stats = BatchStats::default();
        let mut aggregate: Vec<StudentRecord> = Vec::new();
        let mut attempted: Vec<String> = Vec::new();

        for year in years {
            for dept in roll::DEPARTMENTS {
                let records = self.scrape_department(year, dept, Pace::Sweep, &mut stats).await?;
                self.writer.write_batch(&format!("{year}{dept}"), &records)?;
                attempted.extend(roll::generate_rolls(year, dept));
                aggregate.extend(records);
            }
        }

        self.writer.write_run(&aggregate)?;
        self.writer.write_roll_csv(&attempted)?;

        info!(
            attempted = stats.attempted,
            extracted = stats.extracted,
            "Sweep complete"
        );
        Ok(stats)
    }

    /// Scrape one (year, dept) sequence, collecting successful records
    async fn scrape_department(
        &mut self,
        year: &str,
        dept: &str,
        pace: Pace,
        stats: &mut BatchStats,
    ) -> Result<Vec<StudentRecord>> {
        let rolls = roll::generate_rolls(year, dept);
        let total = rolls.len();
        let mut records = Vec::new();

        for (i, roll) in rolls.iter().enumerate() {
            if i > 0 {
                self.pace(pace).await;
            }

            info!(roll = %roll, progress = format!("{}/{total}", i + 1), "Processing");
            stats.attempted += 1;

            let Some(html) = self.fetcher.fetch_result(roll).await else {
                continue;
            };
            stats.fetched += 1;

            match self.extractor.extract(&html) {
                Ok(record) => {
                    stats.extracted += 1;
                    records.push(record);
                }
                Err(err) => {
                    debug!(roll = %roll, reason = %err, "Page did not match result template");
                }
            }
        }

        Ok(records)
    }

    /// Fetch and extract one roll; failures are logged, never propagated
    async fn process_roll(&self, roll: &str) -> Option<StudentRecord> {
        let html = self.fetcher.fetch_result(roll).await?;

        match self.extractor.extract(&html) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(roll = %roll, reason = %err, "Page did not match result template");
                None
            }
        }
    }

    /// Blocking pacing wait between consecutive fetches
    async fn pace(&mut self, pace: Pace) {
        let (min, max) = match pace {
            Pace::Batch => (self.config.pacing.batch_min_ms, self.config.pacing.batch_max_ms),
            Pace::Sweep => (self.config.pacing.sweep_min_ms, self.config.pacing.sweep_max_ms),
        };

        if max == 0 {
            return;
        }

        let delay = if min == max {
            min
        } else {
            self.rng.gen_range(min..=max)
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}
