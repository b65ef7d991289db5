//! CLI Command Implementations

use std::path::Path;

use log::info;
use sha2::{Digest, Sha256};

use crate::cli::EditArgs;
use crate::config::EngineConfig;
use crate::engine::{export_wav, import_wav, EditOutcome, EditSession, FadeKind};
use crate::error::Result;

/// Load the engine configuration, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            info!("Loading config: {}", path.display());
            EngineConfig::from_json_file(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Decode a WAV file into a fresh session labelled after the file name
pub fn load_session(input: &Path, config: &EngineConfig) -> Result<EditSession> {
    info!("Loading audio: {}", input.display());

    let buffer = import_wav(input)?;
    let label = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    EditSession::with_config(buffer, label, config.clone())
}

/// Apply `--start/--end`; a missing bound defaults to the buffer edge
fn apply_selection(session: &mut EditSession, args: &EditArgs) -> Result<()> {
    if args.start.is_none() && args.end.is_none() {
        return Ok(());
    }
    let start = args.start.unwrap_or(0.0);
    let end = args.end.unwrap_or_else(|| session.duration_secs());
    session.set_selection(start, end)
}

/// Print the session snapshot as JSON.
pub fn info(input: &Path, config: &EngineConfig) -> Result<()> {
    let session = load_session(input, config)?;
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}

/// Which session operation an editing command runs
#[derive(Debug, Clone, Copy)]
pub enum EditCommand {
    Trim,
    Delete,
    Split { at: Option<f64> },
    Normalize,
    Fade(FadeKind),
}

/// Run one edit and write the whole resulting composite.
pub fn edit(command: EditCommand, args: &EditArgs, config: &EngineConfig) -> Result<()> {
    let mut session = load_session(&args.input, config)?;
    apply_selection(&mut session, args)?;

    let outcome = match command {
        EditCommand::Trim => session.trim_to_selection()?,
        EditCommand::Delete => session.delete_selection()?,
        EditCommand::Split { at } => {
            if let Some(at) = at {
                session.set_playhead(at);
            }
            session.split_at_cursor()?
        }
        EditCommand::Normalize => {
            if let Some(gain) = session.normalize_gain() {
                info!("Normalize gain: {:.4}", gain);
            }
            session.normalize()?
        }
        EditCommand::Fade(kind) => session.apply_fade(kind)?,
    };

    if outcome == EditOutcome::Unchanged {
        println!("No change: {:?} left the audio untouched", command);
    }

    for clip in session.clips() {
        println!("  {:<24} {:>10.3}s  {}", clip.label(), clip.duration_secs(), clip.id());
    }

    let bytes = export_wav(session.composite(), &args.output)?;
    report_written(&args.output, &bytes, session.duration_secs());
    Ok(())
}

/// Export the selected range without editing.
pub fn export(args: &EditArgs, config: &EngineConfig) -> Result<()> {
    let mut session = load_session(&args.input, config)?;
    apply_selection(&mut session, args)?;

    let bytes = session.export_range()?;
    std::fs::write(&args.output, &bytes)?;
    report_written(&args.output, &bytes, session.export_buffer().duration_secs());
    Ok(())
}

fn report_written(path: &Path, bytes: &[u8], duration_secs: f64) {
    let digest = Sha256::digest(bytes);
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    println!("Wrote: {} ({:.3}s)", path.display(), duration_secs);
    println!("SHA-256: {}", hex);
}
