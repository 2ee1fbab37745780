use crate::cli::Config;
use crate::clip_name::ClipId;
use crate::error::ClipResult;
use crate::locate::locate_clip;
use crate::merge_log::{read_pairings, MergeLog};
use crate::ops::{self, ClipOp};

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{info, warn, Level};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MergePair {
    pub primary: ClipId,
    pub secondary: ClipId,
    pub sound_level: Option<f32>,
}

#[derive(Deserialize)]
struct MergeRow {
    primary: u32,
    secondary: u32,
    sound_level: Option<f32>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Outcome {
    Written,
    Skipped,
    Failed,
}

impl Summary {
    fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Summary {
        outcomes.into_iter().fold(Summary::default(), |mut summary, outcome| {
            match outcome {
                Outcome::Written => summary.written += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
            summary
        })
    }
}

// csv with a `primary,secondary,sound_level` header; an empty level falls back to the command default
pub fn read_merge_plan(path: &Path) -> ClipResult<Vec<MergePair>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut pairs = Vec::new();
    for row in reader.deserialize() {
        let row: MergeRow = row?;
        pairs.push(MergePair {
            primary: ClipId(row.primary),
            secondary: ClipId(row.secondary),
            sound_level: row.sound_level,
        });
    }
    Ok(pairs)
}

// per-item info lines already report progress and would tear through a drawn bar
fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    if tracing::enabled!(Level::INFO) {
        return ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::hidden());
    }
    let style = ProgressStyle::with_template("{msg} [{elapsed_precise}] [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style).with_message(message)
}

pub fn run_merge_plan(config: &Config, pairs: &[MergePair], default_level: f32, skip_logged: bool) -> Result<Summary> {
    let start = time::Instant::now();
    let logged: HashSet<(ClipId, ClipId)> = if skip_logged {
        read_pairings(&config.merge_log)
            .with_context(|| format!("failed to read merge log {}", config.merge_log.display()))?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };
    let log = Mutex::new(
        MergeLog::open(&config.merge_log)
            .with_context(|| format!("failed to open merge log {}", config.merge_log.display()))?,
    );

    // a pair listed twice in the plan is only merged once
    let unique = pairs.iter().unique_by(|pair| (pair.primary, pair.secondary)).collect_vec();
    let duplicates = pairs.len() - unique.len();

    info!("Merging {} pairs using {} threads", unique.len(), rayon::current_num_threads());
    let bar = progress_bar(unique.len(), "merging");

    let outcomes: Vec<Outcome> = unique
        .par_iter()
        .map(|pair| {
            let outcome = merge_pair(config, pair, default_level, &logged, &log, &bar);
            bar.inc(1);
            outcome
        })
        .collect();
    bar.finish_and_clear();

    let mut summary = Summary::from_outcomes(outcomes);
    summary.skipped += duplicates;
    info!(?summary, elapsed = ?start.elapsed(), "merge plan finished");
    Ok(summary)
}

fn merge_pair(
    config: &Config,
    pair: &MergePair,
    default_level: f32,
    logged: &HashSet<(ClipId, ClipId)>,
    log: &Mutex<MergeLog>,
    bar: &ProgressBar,
) -> Outcome {
    if logged.contains(&(pair.primary, pair.secondary)) {
        bar.suspend(|| info!(primary = %pair.primary, secondary = %pair.secondary, "already merged, skipping"));
        return Outcome::Skipped;
    }

    let level = pair.sound_level.unwrap_or(default_level);
    let recorded = ops::merge_clips(config, pair.primary, pair.secondary, level).and_then(|_| {
        let mut log = log.lock().unwrap_or_else(PoisonError::into_inner);
        log.record(pair.primary, pair.secondary)
    });

    match recorded {
        Ok(()) => Outcome::Written,
        Err(e) => {
            bar.suspend(|| warn!(primary = %pair.primary, secondary = %pair.secondary, error = %e, "merge failed"));
            Outcome::Failed
        }
    }
}

pub fn for_each_clip(config: &Config, clips: &[ClipId], op: &ClipOp) -> Summary {
    let start = time::Instant::now();
    // a clip listed twice would only be written twice
    let unique = clips.iter().copied().unique().collect_vec();
    let duplicates = clips.len() - unique.len();

    info!("Processing {} clips using {} threads", unique.len(), rayon::current_num_threads());
    let bar = progress_bar(unique.len(), "processing");

    let outcomes: Vec<Outcome> = unique
        .par_iter()
        .map(|&clip| {
            let result = locate_clip(&config.clips_dir, clip, &config.clip_suffix).and_then(|path| op.run(config, &path));
            bar.inc(1);
            match result {
                Ok(_) => Outcome::Written,
                Err(e) => {
                    bar.suspend(|| warn!(%clip, ?op, error = %e, "clip failed"));
                    Outcome::Failed
                }
            }
        })
        .collect();
    bar.finish_and_clear();

    let mut summary = Summary::from_outcomes(outcomes);
    summary.skipped += duplicates;
    info!(?summary, elapsed = ?start.elapsed(), "clip list finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_merge_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "primary,secondary,sound_level\n95,12,0.5\n95, 40,\n3,12,2\n").unwrap();

        let pairs = read_merge_plan(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                MergePair { primary: ClipId(95), secondary: ClipId(12), sound_level: Some(0.5) },
                MergePair { primary: ClipId(95), secondary: ClipId(40), sound_level: None },
                MergePair { primary: ClipId(3), secondary: ClipId(12), sound_level: Some(2.0) },
            ]
        );
    }

    #[test]
    fn test_read_merge_plan_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        fs::write(&path, "primary,secondary,sound_level\nninety,12,0.5\n").unwrap();
        assert!(read_merge_plan(&path).is_err());
    }

    #[test]
    fn test_logged_and_duplicate_pairs_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(dir.path(), dir.path());
        fs::write(&config.merge_log, "95,12\n3,12\n").unwrap();

        let pairs = [
            MergePair { primary: ClipId(95), secondary: ClipId(12), sound_level: None },
            MergePair { primary: ClipId(3), secondary: ClipId(12), sound_level: Some(0.3) },
            MergePair { primary: ClipId(95), secondary: ClipId(12), sound_level: None },
        ];
        let summary = run_merge_plan(&config, &pairs, 1.0, true).unwrap();
        assert_eq!(summary, Summary { written: 0, skipped: 3, failed: 0 });

        // skipping never appends to the log
        assert_eq!(fs::read_to_string(&config.merge_log).unwrap(), "95,12\n3,12\n");
    }

    #[test]
    fn test_failed_pairs_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(dir.path(), dir.path());

        let pairs = [
            MergePair { primary: ClipId(1), secondary: ClipId(2), sound_level: None },
            MergePair { primary: ClipId(3), secondary: ClipId(4), sound_level: Some(-1.0) },
        ];
        let summary = run_merge_plan(&config, &pairs, 1.0, false).unwrap();
        assert_eq!(summary, Summary { written: 0, skipped: 0, failed: 2 });
        assert_eq!(fs::read_to_string(&config.merge_log).unwrap(), "");
    }

    #[test]
    fn test_for_each_clip_counts_missing_clips() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(dir.path(), &dir.path().join("out"));

        let summary = for_each_clip(&config, &[ClipId(1), ClipId(2)], &ClipOp::Detach);
        assert_eq!(summary, Summary { written: 0, skipped: 0, failed: 2 });
    }

    #[test]
    fn test_for_each_clip_skips_repeated_clips() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(dir.path(), &dir.path().join("out"));

        let clips = [ClipId(1), ClipId(2), ClipId(1), ClipId(1)];
        let summary = for_each_clip(&config, &clips, &ClipOp::Detach);
        assert_eq!(summary, Summary { written: 0, skipped: 2, failed: 2 });
    }

    #[test]
    fn test_progress_bar_hides_behind_info_logs() {
        let subscriber = tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let bar = progress_bar(3, "processing");
            assert!(bar.is_hidden());
            assert_eq!(bar.length(), Some(3));
        });

        let subscriber = tracing_subscriber::fmt().with_max_level(Level::WARN).with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let bar = progress_bar(3, "processing");
            assert_eq!(bar.length(), Some(3));
            assert_eq!(bar.message(), "processing");
        });
    }
}
