//! Release aggregation for a single build.
//!
//! Given a build and every deployment of a project, finds the releases that
//! shipped the build and reduces each release to one pill per environment,
//! carrying the status badge of that environment's latest deployment.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::approval::{approval_icon, ApprovalIcon};
use crate::domain::{Build, Deployment, ReleaseReference};
use crate::status::{resolve_deployment_badge, StatusBadge};

/// How the "latest" deployment of an environment is chosen.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LatestRule {
    /// Lowest deployment id wins.
    #[default]
    LowestId,
    /// Most recent `queued_on` wins; deployments without a timestamp rank
    /// below timestamped ones and fall back to lowest id among themselves.
    Newest,
}

/// Knobs for [`render_build_releases`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Report every release that shipped the build, not just the first one.
    pub all_releases: bool,
    pub latest: LatestRule,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            all_releases: true,
            latest: LatestRule::LowestId,
        }
    }
}

/// One environment of a release, as of its latest deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentPill {
    pub environment_id: u32,
    pub environment_name: String,
    pub deployment_id: u32,
    pub web_link: Option<String>,
    pub badge: StatusBadge,
    pub approval: Option<ApprovalIcon>,
}

/// A release heading with its environment pills, ordered by environment id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseSection {
    pub release_id: u32,
    pub release_name: String,
    pub web_link: Option<String>,
    pub environments: Vec<EnvironmentPill>,
}

/// Outcome of aggregating a build's releases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "sections", rename_all = "snake_case")]
pub enum BuildReleases {
    /// No release shipped the build (or there was no build).
    NotDeployed,
    Releases(Vec<ReleaseSection>),
}

impl BuildReleases {
    pub fn sections(&self) -> &[ReleaseSection] {
        match self {
            BuildReleases::NotDeployed => &[],
            BuildReleases::Releases(sections) => sections,
        }
    }
}

/// Aggregate `deployments` into per-release sections for `build`.
pub fn render_build_releases(
    build: Option<&Build>,
    deployments: &[Deployment],
    options: &AggregateOptions,
) -> BuildReleases {
    let Some(build) = build else {
        return BuildReleases::NotDeployed;
    };

    let shipped: Vec<&Deployment> = deployments
        .iter()
        .filter(|d| d.release.ships_build(build.id))
        .collect();
    let releases = distinct_releases(&shipped);

    debug!(
        build_id = %build.id,
        deployments = shipped.len(),
        releases = releases.len(),
        "aggregating build releases"
    );

    let mut sections = Vec::new();
    for release in releases {
        let section = release_section(release, &shipped, options.latest);
        if !section.environments.is_empty() {
            sections.push(section);
        }
        if !options.all_releases {
            break;
        }
    }

    if sections.is_empty() {
        BuildReleases::NotDeployed
    } else {
        BuildReleases::Releases(sections)
    }
}

/// Releases in first-seen order, deduplicated by id.
fn distinct_releases<'a>(deployments: &[&'a Deployment]) -> Vec<&'a ReleaseReference> {
    let mut releases: Vec<&ReleaseReference> = Vec::new();
    for dep in deployments {
        if !releases.iter().any(|r| r.id == dep.release.id) {
            releases.push(&dep.release);
        }
    }
    releases
}

fn release_section(
    release: &ReleaseReference,
    shipped: &[&Deployment],
    rule: LatestRule,
) -> ReleaseSection {
    let mut release_deploys: Vec<&Deployment> = shipped
        .iter()
        .copied()
        .filter(|d| d.release.id == release.id)
        .collect();
    release_deploys.sort_by_key(|d| d.release_environment.id);

    let mut seen: Vec<&str> = Vec::new();
    let mut environments = Vec::new();
    for dep in &release_deploys {
        let name = dep.release_environment.name.as_str();
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let candidates = release_deploys
            .iter()
            .copied()
            .filter(|d| d.release_environment.name == name);
        if let Some(latest) = select_latest(candidates, rule) {
            environments.push(environment_pill(latest));
        }
    }

    ReleaseSection {
        release_id: release.id,
        release_name: release.name.clone(),
        web_link: release.links.web_href().map(str::to_string),
        environments,
    }
}

fn select_latest<'a>(
    candidates: impl Iterator<Item = &'a Deployment>,
    rule: LatestRule,
) -> Option<&'a Deployment> {
    match rule {
        LatestRule::LowestId => candidates.min_by_key(|d| d.id),
        LatestRule::Newest => candidates.max_by_key(|d| (d.queued_on, Reverse(d.id))),
    }
}

fn environment_pill(deployment: &Deployment) -> EnvironmentPill {
    let environment = &deployment.release_environment;
    EnvironmentPill {
        environment_id: environment.id,
        environment_name: environment.name.clone(),
        deployment_id: deployment.id,
        web_link: environment.links.web_href().map(str::to_string),
        badge: resolve_deployment_badge(deployment.deployment_status),
        approval: approval_icon(deployment, environment.id),
    }
}
