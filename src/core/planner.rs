//! Plan builder and conflict detector.
//!
//! Groups scanned files by show and season, resolves every file against
//! its season, assigns destinations through a naming convention and
//! finally marks colliding destinations as conflicts.

use super::confidence::{self, Verdict, REASON_NO_CATALOG};
use super::matcher::{Matcher, SeasonIndex};
use super::span::{declared_match, duration_confidence, duration_walk, Resolution, SpanAssigner};
use crate::core::assistant::DisambiguationAssistant;
use crate::generators::{NamingConvention, PlexNaming};
use crate::models::catalog::{show_key, Catalog, CatalogSet};
use crate::models::config::{Config, MatchThresholds, PlanModes};
use crate::models::matching::{MatchMethod, MatchResult};
use crate::models::media::ScannedFile;
use crate::models::plan::{EpisodeSpan, PlanStatus, RenamePlan, RenamePlanItem};
use crate::Result;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Matching and confidence thresholds.
    pub thresholds: MatchThresholds,
    /// Mode flags.
    pub modes: PlanModes,
    /// Files resolved concurrently within a season.
    pub concurrency: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            thresholds: MatchThresholds::default(),
            modes: PlanModes::default(),
            concurrency: 4,
        }
    }
}

impl From<&Config> for PlannerConfig {
    fn from(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds,
            modes: config.modes,
            concurrency: config.concurrency.0.max(1),
        }
    }
}

/// Builds rename plans.
pub struct Planner {
    config: PlannerConfig,
    matcher: Matcher,
    naming: Arc<dyn NamingConvention>,
}

impl Planner {
    /// Create a planner with Plex naming and no assistant.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            matcher: Matcher::new(),
            naming: Arc::new(PlexNaming),
        }
    }

    /// Consult `assistant` when local matching fails.
    pub fn with_assistant(mut self, assistant: Arc<dyn DisambiguationAssistant>, timeout: Duration) -> Self {
        self.matcher = Matcher::with_assistant(assistant, timeout);
        self
    }

    pub fn with_naming(mut self, naming: Arc<dyn NamingConvention>) -> Self {
        self.naming = naming;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Build the plan for `files`, placing destinations under `root`.
    ///
    /// Never fails: files that cannot be resolved become MANUAL items and
    /// group-level problems are listed in `errors`.
    pub async fn build_plan(&self, files: &[ScannedFile], catalogs: &CatalogSet, root: &Path) -> RenamePlan {
        let mut plan = RenamePlan::new(root.to_path_buf());
        let mut items = Vec::with_capacity(files.len());

        for ((_, season), group) in group_files(files) {
            let show = group[0].show.as_str();
            match catalogs.get(show).filter(|c| !c.season(season).is_empty()) {
                Some(catalog) => {
                    items.extend(self.plan_season(season, &group, catalog, root).await);
                }
                None => {
                    let message = format!("no canonical data for {} season {}", show, season);
                    tracing::warn!("{} ({} files)", message, group.len());
                    plan.errors.push(message);
                    items.extend(group.iter().map(|file| {
                        unresolved_item(file, Verdict::manual(REASON_NO_CATALOG, 0.0))
                    }));
                }
            }
        }

        let mut items = detect_conflicts(items);
        items.sort_by(|a, b| a.source.cmp(&b.source));
        plan.items = items;

        let summary = plan.summary();
        tracing::info!(
            "Planned {} files: {} auto, {} manual, {} conflict",
            summary.total,
            summary.auto,
            summary.manual,
            summary.conflict
        );
        plan
    }

    /// Resolve the files of one show season.
    async fn plan_season(
        &self,
        season: u32,
        files: &[&ScannedFile],
        catalog: &Catalog,
        root: &Path,
    ) -> Vec<RenamePlanItem> {
        let thresholds = &self.config.thresholds;
        let episodes = catalog.season(season);
        let index = SeasonIndex::new(episodes);
        let assigner = SpanAssigner::new(&self.matcher, thresholds, &self.config.modes);

        let mut resolutions: Vec<Resolution> = stream::iter(files.iter().enumerate())
            .map(|(position, file)| assigner.assign(file, &index, position))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let untitled: Vec<usize> = resolutions
            .iter()
            .enumerate()
            .filter(|(_, r)| matches!(r, Resolution::Untitled))
            .map(|(i, _)| i)
            .collect();

        if !untitled.is_empty() {
            match self.config.modes.max_duration {
                Some(max_duration) => {
                    let claimed: HashSet<u32> = resolutions
                        .iter()
                        .filter_map(Resolution::matched)
                        .filter(|m| confidence::is_auto(m, thresholds))
                        .flat_map(|m| m.matched_episodes.iter().map(|e| e.episode))
                        .collect();
                    let free: Vec<_> = episodes
                        .iter()
                        .filter(|e| !claimed.contains(&e.episode))
                        .cloned()
                        .collect();
                    let mut steps = duration_walk(&free, max_duration).into_iter();

                    for i in untitled {
                        resolutions[i] = match steps.next() {
                            Some(step) => {
                                let score = duration_confidence(files[i].duration, &step, thresholds);
                                Resolution::Span(MatchResult::many(step, MatchMethod::Duration, score))
                            }
                            None => Resolution::Unmatched,
                        };
                    }
                }
                None => {
                    for i in untitled {
                        resolutions[i] = declared_match(files[i], &index, thresholds.declared_untitled)
                            .map(Resolution::Span)
                            .unwrap_or(Resolution::Unmatched);
                    }
                }
            }
        }

        files
            .iter()
            .zip(resolutions)
            .map(|(file, resolution)| self.build_item(file, &catalog.show, resolution, root))
            .collect()
    }

    /// Turn a resolution into a plan item.
    fn build_item(&self, file: &ScannedFile, show: &str, resolution: Resolution, root: &Path) -> RenamePlanItem {
        let verdict = confidence::assess(&resolution, &self.config.thresholds);

        let result = match resolution {
            Resolution::Span(result) if result.is_match() => result,
            _ => return unresolved_item(file, verdict),
        };

        let numbers = result.matched_episodes.iter().map(|e| e.episode);
        let span = match (numbers.clone().min(), numbers.max()) {
            (Some(start), Some(end)) => EpisodeSpan { start, end },
            _ => return unresolved_item(file, verdict),
        };
        let season = result.matched_episodes[0].season;
        let title = result
            .matched_episodes
            .iter()
            .map(|e| e.title.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" & ");

        let destination = self
            .naming
            .destination(root, show, season, &span, &title, &file.extension);

        RenamePlanItem {
            source: file.path.clone(),
            destination,
            show: show.to_string(),
            season: Some(season),
            episode_span: Some(span),
            episode_title: (!title.is_empty()).then_some(title),
            status: verdict.status,
            reason: verdict.reason,
            confidence: verdict.confidence,
            method: result.method,
        }
    }
}

/// Group files by (show, season), each group in path order.
fn group_files(files: &[ScannedFile]) -> BTreeMap<(String, u32), Vec<&ScannedFile>> {
    let mut groups: BTreeMap<(String, u32), Vec<&ScannedFile>> = BTreeMap::new();
    for file in files {
        groups
            .entry((show_key(&file.show), file.season()))
            .or_default()
            .push(file);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.path.cmp(&b.path));
    }
    groups
}

/// An item that stays where it is.
fn unresolved_item(file: &ScannedFile, verdict: Verdict) -> RenamePlanItem {
    RenamePlanItem {
        source: file.path.clone(),
        destination: file.path.clone(),
        show: file.show.clone(),
        season: file.declared_season,
        episode_span: None,
        episode_title: None,
        status: verdict.status,
        reason: verdict.reason,
        confidence: verdict.confidence,
        method: MatchMethod::None,
    }
}

/// Mark every item whose destination collides, ignoring case, with
/// another item's destination.
pub fn detect_conflicts(items: Vec<RenamePlanItem>) -> Vec<RenamePlanItem> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, item) in items.iter().enumerate() {
        groups
            .entry(item.destination.to_string_lossy().to_lowercase())
            .or_default()
            .push(i);
    }

    let mut colliding: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for members in groups.values().filter(|m| m.len() > 1) {
        for &i in members {
            let mut others: Vec<String> = members
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| items[j].source.display().to_string())
                .collect();
            others.sort();
            colliding.insert(i, others);
        }
    }

    if !colliding.is_empty() {
        tracing::warn!("{} plan items have conflicting destinations", colliding.len());
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match colliding.remove(&i) {
            Some(others) => {
                let reason = format!("destination conflict with {}", others.join(", "));
                item.into_conflict(reason)
            }
            None => item,
        })
        .collect()
}

/// Whether every AUTO destination is unique ignoring case.
pub fn auto_destinations_unique(plan: &RenamePlan) -> bool {
    let mut seen = HashSet::new();
    plan.items_with_status(PlanStatus::Auto)
        .all(|item| seen.insert(item.destination.to_string_lossy().to_lowercase()))
}

/// Save a plan to a JSON file.
pub fn save_plan(plan: &RenamePlan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Plan saved to {:?}", path);
    Ok(())
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<RenamePlan> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| crate::Error::InvalidPlanFile(format!("{}: {}", path.display(), e)))
}

/// Get the default plan output path.
/// Saves to target directory if provided, otherwise to source directory.
pub fn default_plan_path(source: &Path, target: Option<&Path>) -> PathBuf {
    let filename = format!("plan_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    target.unwrap_or(source).join(filename)
}
