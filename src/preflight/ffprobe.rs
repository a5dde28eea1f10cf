//! FFprobe preflight check.

use super::CheckResult;
use crate::services::ffprobe;

/// Check that ffprobe can supply file durations.
///
/// A missing ffprobe only weakens duration confidence, unless duration
/// pairing was requested: then every untitled file would pair blind.
pub fn check(duration_pairing: bool) -> CheckResult {
    if !ffprobe::is_installed() {
        let hint = "Install FFmpeg (sudo apt install ffmpeg) or pass --no-probe";
        return if duration_pairing {
            CheckResult::warn("ffprobe", "not found, duration pairing will run without file durations", hint)
        } else {
            CheckResult::warn("ffprobe", "not found, durations will be unknown", hint)
        };
    }

    let version = ffprobe::get_version().unwrap_or_else(|_| "unknown version".to_string());
    CheckResult::ok("ffprobe", &format!("installed ({}), durations will be probed", version))
}
