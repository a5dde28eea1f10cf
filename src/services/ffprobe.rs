//! FFprobe service for reading episode durations.

use crate::models::media::ScannedFile;
use crate::Result;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// FFprobe output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

/// FFprobe format information.
#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Check if ffprobe is installed.
pub fn is_installed() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Version number from the first line of `ffprobe -version`.
pub fn get_version() -> Result<String> {
    let output = Command::new("ffprobe").arg("-version").output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("unknown");
    let version = first_line
        .strip_prefix("ffprobe version ")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or(first_line);

    Ok(version.to_string())
}

/// Whole minutes from ffprobe's JSON output, rounded to nearest.
pub fn parse_duration_minutes(json: &[u8]) -> Result<Option<u32>> {
    let output: FfprobeOutput = serde_json::from_slice(json)?;
    let minutes = output
        .format
        .duration
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| (secs / 60.0).round() as u32);
    Ok(minutes)
}

/// Read a file's duration in minutes.
pub async fn probe_duration_minutes(path: &Path) -> Result<Option<u32>> {
    let output = tokio::process::Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(crate::Error::other(format!("ffprobe failed for: {:?}", path)));
    }

    parse_duration_minutes(&output.stdout)
}

/// Fill in durations for files that lack one, `concurrency` probes at a time.
///
/// Failures leave the duration unknown.
pub async fn probe_durations(files: &mut [ScannedFile], concurrency: usize, progress: Option<&ProgressBar>) {
    let pending: Vec<(usize, std::path::PathBuf)> = files
        .iter()
        .enumerate()
        .filter(|(_, f)| f.duration.is_none())
        .map(|(i, f)| (i, f.path.clone()))
        .collect();

    let results: Vec<(usize, Option<u32>)> = stream::iter(pending)
        .map(|(i, path)| async move {
            let duration = match probe_duration_minutes(&path).await {
                Ok(duration) => duration,
                Err(e) => {
                    tracing::warn!("Could not probe {:?}: {}", path, e);
                    None
                }
            };
            if let Some(pb) = progress {
                pb.inc(1);
            }
            (i, duration)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for (i, duration) in results {
        files[i].duration = duration;
    }
}
