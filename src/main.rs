mod audio;
mod batch;
mod cli;
mod clip_name;
mod error;
mod locate;
mod merge_log;
mod ops;
mod probe;
mod utils;
mod video;

use cli::{Cli, Commands};
use ops::ClipOp;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clip_augment=info")))
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads.unwrap_or(1))
        .build_global()
        .context("failed to build thread pool")?;

    if !matches!(cli.command, Commands::Pairings) {
        utils::ensure_ffmpeg()?;
        ffmpeg_next::init().context("failed to initialize ffmpeg")?;
    }

    match cli.command {
        Commands::Augment { clip, audio, sound_level, output } => {
            ops::augment_clip(&config, &clip, &audio, sound_level, output)
                .with_context(|| format!("failed to augment {} with {}", clip.display(), audio.display()))?;
        }
        Commands::Merge { primary, secondary, sound_level } => {
            let mut log = merge_log::MergeLog::open(&config.merge_log)?;
            ops::merge_audio(&config, primary, secondary, sound_level, &mut log)
                .with_context(|| format!("failed to merge clip {secondary} into clip {primary}"))?;
            info!("Recorded pairing in {}", log.path().display());
        }
        Commands::MergeBatch { plan, sound_level, skip_logged } => {
            let pairs = batch::read_merge_plan(&plan)
                .with_context(|| format!("failed to read merge plan {}", plan.display()))?;
            let summary = batch::run_merge_plan(&config, &pairs, sound_level, skip_logged)?;
            info!("{} merged, {} skipped, {} failed", summary.written, summary.skipped, summary.failed);
            if summary.failed > 0 {
                bail!("{} of {} merges failed", summary.failed, pairs.len());
            }
        }
        Commands::Replace { clip, audio } => {
            ops::replace_audio(&config, &clip, &audio)
                .with_context(|| format!("failed to replace audio of {}", clip.display()))?;
        }
        Commands::Detach { clips } => run_clip_list(&config, &clips, ClipOp::Detach)?,
        Commands::Equalize { clips, target_peak } => run_clip_list(&config, &clips, ClipOp::Equalize { target_peak })?,
        Commands::Resize { clips, height, crop } => run_clip_list(&config, &clips, ClipOp::Resize { height, crop })?,
        Commands::Pairings => {
            for (primary, secondary) in merge_log::read_pairings(&config.merge_log)? {
                println!("{primary} {secondary}");
            }
        }
    }

    Ok(())
}

fn run_clip_list(config: &cli::Config, clips: &[clip_name::ClipId], op: ClipOp) -> Result<()> {
    let summary = batch::for_each_clip(config, clips, &op);
    info!("{} written, {} failed", summary.written, summary.failed);
    if summary.failed > 0 {
        bail!("{} of {} clips failed", summary.failed, clips.len());
    }
    Ok(())
}
