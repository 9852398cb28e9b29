//! Event type definitions for progress reporting.

use crate::core::crop::CropKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while building a collage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Crop loading events
    Load(LoadEvent),
    /// Similarity matching events
    Match(MatchEvent),
    /// Coloring and ordering events
    Color(ColorEvent),
    /// Canvas placement events
    Layout(LayoutEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while loading crop records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadEvent {
    /// Loading has started for this many parent images
    Started { total_parents: usize },
    /// Crops of one kind were loaded for one parent image
    ParentLoaded {
        parent: PathBuf,
        kind: CropKind,
        crops: usize,
        completed: usize,
    },
    /// Loading finished
    Completed { faces: usize, objects: usize },
}

/// Events while matching one kind of crop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Matching has started for this many crops
    Started { kind: CropKind, total_items: usize },
    /// Matching finished
    Completed {
        kind: CropKind,
        pairs: usize,
        items: usize,
    },
}

/// Events while grouping and ordering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColorEvent {
    /// Colors were assigned
    Colored { colored_ids: usize },
    /// The placement walk was computed
    Walked { visited: usize, total_nodes: usize },
}

/// Events while placing images on the canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayoutEvent {
    /// Images were packed; those that did not fit are left out
    Arranged {
        offered: usize,
        placed: usize,
        links: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline stopped on an error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Loading,
    Matching,
    Coloring,
    Arranging,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Loading => write!(f, "Loading crops"),
            PipelinePhase::Matching => write!(f, "Matching"),
            PipelinePhase::Coloring => write!(f, "Coloring"),
            PipelinePhase::Arranging => write!(f, "Arranging"),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Parent images considered
    pub parents: usize,
    /// Crops loaded, all kinds
    pub crops_loaded: usize,
    /// Crops referenced by at least one pair
    pub linked_items: usize,
    /// Surviving pairs, all kinds
    pub pairs: usize,
    /// Images placed on the canvas
    pub placed: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Load(LoadEvent::ParentLoaded {
            parent: PathBuf::from("/images/beach.jpg"),
            kind: CropKind::Faces,
            crops: 3,
            completed: 1,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Load(LoadEvent::ParentLoaded { crops, kind, .. }) => {
                assert_eq!(crops, 3);
                assert_eq!(kind, CropKind::Faces);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn phase_display_is_readable() {
        assert_eq!(PipelinePhase::Loading.to_string(), "Loading crops");
        assert_eq!(PipelinePhase::Arranging.to_string(), "Arranging");
    }
}
