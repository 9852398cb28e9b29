//! Pipeline execution implementation.

use crate::core::coloring::{ClusterColorAssigner, Color, GroupingMode, Palette};
use crate::core::comparator::{CoarseComparator, DistanceFunction, PerceptualDistance};
use crate::core::crop::{CropItem, CropKind};
use crate::core::layout::{
    Arranger, CanvasConfig, DimensionProbe, ImageDimensionProbe, Link, Packer, Placement,
    ShelfPacker,
};
use crate::core::matcher::{MatchOutput, Pair, PairFilter, SimilarityMatcher};
use crate::core::source::{sample_parent_images, CropSource, DirectoryCropSource};
use crate::core::walker::ConnectivityWalker;
use crate::error::CollageError;
use crate::events::{
    null_sender, ColorEvent, Event, EventSender, LayoutEvent, LoadEvent, MatchEvent,
    PipelineEvent, PipelinePhase, PipelineSummary,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Matching settings for one kind of crop
pub struct MatchStage {
    pub kind: CropKind,
    /// Distances at or below this are similar
    pub threshold: f64,
    /// Identifier prefix, unique per stage
    pub prefix: String,
    pub distance: Box<dyn DistanceFunction>,
}

impl MatchStage {
    /// Stage using the kind's default prefix
    pub fn new(kind: CropKind, threshold: f64, distance: Box<dyn DistanceFunction>) -> Self {
        Self {
            kind,
            threshold,
            prefix: kind.default_prefix().to_string(),
            distance,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Everything needed to draw a collage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollagePlan {
    /// Surviving pairs, all kinds
    pub pairs: Vec<Pair>,
    /// Items referenced by at least one pair
    pub items: BTreeMap<String, CropItem>,
    /// Cluster color per linked id
    pub colors: BTreeMap<String, Color>,
    /// Hub-first visitation order
    pub ordering: Vec<String>,
    pub placements: Vec<Placement>,
    pub links: Vec<Link>,
    pub stats: PipelineSummary,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl CollagePlan {
    /// True when no similar crops were found
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Builder for a collage pipeline
pub struct CollagePipelineBuilder {
    parents: Vec<PathBuf>,
    sample: Option<usize>,
    source: Option<Box<dyn CropSource>>,
    stages: Vec<MatchStage>,
    coarse: Option<Box<dyn CoarseComparator>>,
    filter: PairFilter,
    palette: Palette,
    grouping: GroupingMode,
    canvas: CanvasConfig,
    packer: Option<Box<dyn Packer>>,
    probe: Option<Box<dyn DimensionProbe>>,
    seed: Option<u64>,
}

impl CollagePipelineBuilder {
    pub fn new() -> Self {
        Self {
            parents: Vec::new(),
            sample: None,
            source: None,
            stages: Vec::new(),
            coarse: None,
            filter: PairFilter::default(),
            palette: Palette::default(),
            grouping: GroupingMode::default(),
            canvas: CanvasConfig::default(),
            packer: None,
            probe: None,
            seed: None,
        }
    }

    /// Parent images to draw crops from
    pub fn parents(mut self, parents: Vec<PathBuf>) -> Self {
        self.parents = parents;
        self
    }

    /// Use a random subset of at most `n` parents
    pub fn sample(mut self, n: usize) -> Self {
        self.sample = Some(n);
        self
    }

    /// Where crop records come from (default: `data/` in the working directory)
    pub fn source(mut self, source: Box<dyn CropSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Add a matching stage; stages run in the order added
    pub fn stage(mut self, stage: MatchStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Whole-image comparator for the pair filter (default: perceptual hash)
    pub fn coarse(mut self, coarse: Box<dyn CoarseComparator>) -> Self {
        self.coarse = Some(coarse);
        self
    }

    pub fn coarse_threshold(mut self, threshold: f64) -> Self {
        self.filter = PairFilter::new(threshold);
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn canvas(mut self, canvas: CanvasConfig) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn packer(mut self, packer: Box<dyn Packer>) -> Self {
        self.packer = Some(packer);
        self
    }

    pub fn probe(mut self, probe: Box<dyn DimensionProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Fix the RNG seed; unseeded runs draw from OS entropy
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> CollagePipeline {
        CollagePipeline {
            parents: self.parents,
            sample: self.sample,
            source: self
                .source
                .unwrap_or_else(|| Box::new(DirectoryCropSource::new("data"))),
            stages: self.stages,
            coarse: self
                .coarse
                .unwrap_or_else(|| Box::new(PerceptualDistance::default())),
            filter: self.filter,
            assigner: ClusterColorAssigner::new(self.palette).with_mode(self.grouping),
            canvas: self.canvas,
            packer: self.packer.unwrap_or_else(|| Box::new(ShelfPacker)),
            probe: self.probe.unwrap_or_else(|| Box::new(ImageDimensionProbe)),
            seed: self.seed,
        }
    }
}

impl Default for CollagePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The crop collage pipeline
pub struct CollagePipeline {
    parents: Vec<PathBuf>,
    sample: Option<usize>,
    source: Box<dyn CropSource>,
    stages: Vec<MatchStage>,
    coarse: Box<dyn CoarseComparator>,
    filter: PairFilter,
    assigner: ClusterColorAssigner,
    canvas: CanvasConfig,
    packer: Box<dyn Packer>,
    probe: Box<dyn DimensionProbe>,
    seed: Option<u64>,
}

impl CollagePipeline {
    /// Create a new pipeline builder
    pub fn builder() -> CollagePipelineBuilder {
        CollagePipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<CollagePlan, CollageError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    ///
    /// Any source or comparator failure aborts the run; an
    /// [`PipelineEvent::Error`] is sent before the error is returned.
    pub fn run_with_events(&self, events: &EventSender) -> Result<CollagePlan, CollageError> {
        self.execute(events).map_err(|e| {
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
            e
        })
    }

    fn execute(&self, events: &EventSender) -> Result<CollagePlan, CollageError> {
        let start_time = Instant::now();
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Loading
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Loading,
        }));

        let parents = match self.sample {
            Some(n) => sample_parent_images(&self.parents, n, &mut rng),
            None => self.parents.clone(),
        };
        events.send(Event::Load(LoadEvent::Started {
            total_parents: parents.len(),
        }));

        let mut loaded: Vec<Vec<CropItem>> = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let mut items = Vec::new();
            for (completed, parent) in parents.iter().enumerate() {
                let crops = self.source.load(parent, stage.kind)?;
                events.send(Event::Load(LoadEvent::ParentLoaded {
                    parent: parent.clone(),
                    kind: stage.kind,
                    crops: crops.len(),
                    completed: completed + 1,
                }));
                items.extend(crops);
            }
            loaded.push(items);
        }

        let count_kind = |kind: CropKind| -> usize {
            self.stages
                .iter()
                .zip(&loaded)
                .filter(|(stage, _)| stage.kind == kind)
                .map(|(_, items)| items.len())
                .sum()
        };
        let faces = count_kind(CropKind::Faces);
        let objects = count_kind(CropKind::Objects);
        events.send(Event::Load(LoadEvent::Completed { faces, objects }));
        info!(parents = parents.len(), faces, objects, "loaded crops");

        let mut stats = PipelineSummary {
            parents: parents.len(),
            crops_loaded: loaded.iter().map(Vec::len).sum(),
            ..PipelineSummary::default()
        };

        // Phase 2: Matching
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Matching,
        }));

        let mut merged = MatchOutput::default();
        for (stage, items) in self.stages.iter().zip(&loaded) {
            events.send(Event::Match(MatchEvent::Started {
                kind: stage.kind,
                total_items: items.len(),
            }));

            let matcher = SimilarityMatcher::new(stage.threshold)
                .with_prefix(stage.prefix.as_str())
                .with_filter(self.filter);
            let output = matcher.match_items(items, stage.distance.as_ref(), self.coarse.as_ref())?;

            events.send(Event::Match(MatchEvent::Completed {
                kind: stage.kind,
                pairs: output.pairs.len(),
                items: output.items.len(),
            }));
            merged.merge(output);
        }

        stats.pairs = merged.pairs.len();
        stats.linked_items = merged.items.len();

        if merged.is_empty() {
            warn!("no similar crops found, nothing to arrange");
            return Ok(self.finish(merged, CollagePlan::default(), stats, start_time, events));
        }

        // Phase 3: Coloring
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Coloring,
        }));

        let colors = self.assigner.assign(&merged.pairs, &mut rng);
        events.send(Event::Color(ColorEvent::Colored {
            colored_ids: colors.len(),
        }));

        let ordering =
            ConnectivityWalker::new().walk(merged.pairs.iter().map(|pair| (pair.a(), pair.b())));
        events.send(Event::Color(ColorEvent::Walked {
            visited: ordering.len(),
            total_nodes: merged.items.len(),
        }));

        // Phase 4: Arranging
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Arranging,
        }));

        let arranger = Arranger {
            canvas: self.canvas,
            packer: self.packer.as_ref(),
            probe: self.probe.as_ref(),
        };
        let arrangement =
            arranger.arrange(&ordering, &merged.items, &merged.pairs, &colors, &mut rng)?;
        stats.placed = arrangement.placements.len();
        events.send(Event::Layout(LayoutEvent::Arranged {
            offered: merged.items.len(),
            placed: arrangement.placements.len(),
            links: arrangement.links.len(),
        }));

        let plan = CollagePlan {
            colors,
            ordering,
            placements: arrangement.placements,
            links: arrangement.links,
            ..CollagePlan::default()
        };
        Ok(self.finish(merged, plan, stats, start_time, events))
    }

    fn finish(
        &self,
        matched: MatchOutput,
        mut plan: CollagePlan,
        mut stats: PipelineSummary,
        start_time: Instant,
        events: &EventSender,
    ) -> CollagePlan {
        let duration_ms = start_time.elapsed().as_millis() as u64;
        stats.duration_ms = duration_ms;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: stats.clone(),
        }));
        info!(
            pairs = stats.pairs,
            placed = stats.placed,
            duration_ms,
            "collage plan complete"
        );

        plan.pairs = matched.pairs;
        plan.items = matched.items;
        plan.stats = stats;
        plan.duration_ms = duration_ms;
        plan
    }
}
