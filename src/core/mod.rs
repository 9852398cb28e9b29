//! # Core Module
//!
//! The collage engine, independent of how results are drawn or shown.
//!
//! ## Modules
//! - `crop` - Crop records and bounding boxes
//! - `source` - Loads crop records for parent images
//! - `comparator` - Distance capabilities injected into matching
//! - `matcher` - Finds and filters similar crop pairs
//! - `coloring` - Groups linked crops and picks cluster colors
//! - `walker` - Orders linked crops hub first
//! - `layout` - Places parent images on the canvas
//! - `pipeline` - Orchestrates the full workflow

pub mod coloring;
pub mod comparator;
pub mod crop;
pub mod layout;
pub mod matcher;
pub mod pipeline;
pub mod source;
pub mod walker;

// Re-export commonly used types
pub use coloring::{ClusterColorAssigner, Color, GroupingMode, Palette};
pub use crop::{BoundingBox, CropItem, CropKind};
pub use matcher::{Pair, PairFilter, SimilarityMatcher};
pub use pipeline::{CollagePipeline, CollagePlan, MatchStage};
pub use walker::ConnectivityWalker;
