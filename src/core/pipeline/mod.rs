//! # Pipeline Module
//!
//! Orchestrates a full collage run.
//!
//! ## Pipeline Stages
//! 1. **Load** - Read face and object crops for every sampled parent image
//! 2. **Match** - Find similar crops per kind and merge the results
//! 3. **Color** - Group linked ids and pick a color per group
//! 4. **Arrange** - Walk the link graph and place images on the canvas
//!
//! ## Randomness
//! One seeded RNG drives sampling, colors and jitter in that order, so a
//! fixed seed reproduces a plan exactly.

mod executor;

pub use executor::{CollagePipeline, CollagePipelineBuilder, CollagePlan, MatchStage};
