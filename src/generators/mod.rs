//! Destination naming conventions.

pub mod filename;
pub mod folder;

use crate::models::plan::EpisodeSpan;
use std::path::{Path, PathBuf};

/// Maps a resolved episode span to a destination path under a library root.
pub trait NamingConvention: Send + Sync {
    fn destination(
        &self,
        root: &Path,
        show: &str,
        season: u32,
        span: &EpisodeSpan,
        title: &str,
        extension: &str,
    ) -> PathBuf;
}

/// Plex layout: `Show/Season NN/Show - SxxEyy - Title.ext`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlexNaming;

impl NamingConvention for PlexNaming {
    fn destination(
        &self,
        root: &Path,
        show: &str,
        season: u32,
        span: &EpisodeSpan,
        title: &str,
        extension: &str,
    ) -> PathBuf {
        root.join(folder::show_folder(show))
            .join(folder::season_folder(season))
            .join(filename::episode_filename(show, season, span, title, extension))
    }
}
