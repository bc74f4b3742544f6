use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::GeoPoint;

/// Photos required per milestone batch (one per inspection point)
pub const PHOTOS_PER_BATCH: usize = 4;

/// Project lifecycle as the platform API names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStage {
    #[serde(rename = "Project Allocated")]
    Allocated,
    #[serde(rename = "Foundation Laid")]
    FoundationLaid,
    #[serde(rename = "Construction Mid-Phase")]
    MidPhase,
    #[serde(rename = "Finishing Touches")]
    FinishingTouches,
    #[serde(rename = "Completed & Verified")]
    Completed,
    #[serde(rename = "Halted")]
    Halted,
}

impl ProjectStage {
    /// Ordered lifecycle, excluding `Halted`
    pub const LIFECYCLE: [ProjectStage; 5] = [
        ProjectStage::Allocated,
        ProjectStage::FoundationLaid,
        ProjectStage::MidPhase,
        ProjectStage::FinishingTouches,
        ProjectStage::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStage::Allocated => "Project Allocated",
            ProjectStage::FoundationLaid => "Foundation Laid",
            ProjectStage::MidPhase => "Construction Mid-Phase",
            ProjectStage::FinishingTouches => "Finishing Touches",
            ProjectStage::Completed => "Completed & Verified",
            ProjectStage::Halted => "Halted",
        }
    }

    /// The three stages between allocation and completion
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            ProjectStage::FoundationLaid | ProjectStage::MidPhase | ProjectStage::FinishingTouches
        )
    }

    pub fn next(&self) -> Option<ProjectStage> {
        let index = Self::LIFECYCLE.iter().position(|s| s == self)?;
        Self::LIFECYCLE.get(index + 1).copied()
    }
}

impl fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LIFECYCLE
            .iter()
            .chain(std::iter::once(&ProjectStage::Halted))
            .find(|stage| stage.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown project stage: {}", s))
    }
}

/// Statuses an official may move a project to from `current`.
///
/// Normally: stay, advance one step, or halt. A halted project, or one with
/// a status we do not recognise, may be moved to any lifecycle stage.
pub fn available_transitions(current: &str) -> Vec<ProjectStage> {
    let stage = match current.parse::<ProjectStage>() {
        Ok(stage) if stage != ProjectStage::Halted => stage,
        _ => return ProjectStage::LIFECYCLE.to_vec(),
    };

    let mut options = vec![stage];
    if let Some(next) = stage.next() {
        options.push(next);
    }
    options.push(ProjectStage::Halted);
    options
}

/// Project fields the contractor view reads from the platform API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub project_name: String,
    pub status: String,
    #[serde(default)]
    pub village_name: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub start_point: Option<GeoPoint>,
    #[serde(default)]
    pub end_point: Option<GeoPoint>,
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
    #[serde(default)]
    pub milestones: Vec<serde_json::Value>,
}

impl ProjectSummary {
    pub fn stage(&self) -> Option<ProjectStage> {
        self.status.parse().ok()
    }

    pub fn stage_gate(&self) -> StageGate {
        StageGate::new(self.images.len(), self.milestones.len())
    }

    /// Route endpoints, when the official has set both
    pub fn route(&self) -> Option<(GeoPoint, GeoPoint)> {
        Some((self.start_point?, self.end_point?))
    }
}

/// How many photo batches a contractor may still submit.
///
/// One batch of [`PHOTOS_PER_BATCH`] photos is due per milestone, and at
/// least one milestone always counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageGate {
    pub completed_batches: usize,
    pub milestones: usize,
}

impl StageGate {
    pub fn new(uploaded_images: usize, milestones: usize) -> Self {
        Self {
            completed_batches: uploaded_images / PHOTOS_PER_BATCH,
            milestones: milestones.max(1),
        }
    }

    /// Locked once every current milestone has its batch
    pub fn is_locked(&self) -> bool {
        self.completed_batches >= self.milestones
    }

    /// Stage number the next batch is filed under (1-based)
    pub fn next_stage_number(&self) -> usize {
        self.completed_batches + 1
    }
}
