//! # Error Module
//!
//! Error types for the crop collage builder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, sizes, what went wrong
//! - **No local recovery** - comparator failures reach the caller unchanged

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum CollageError {
    #[error("Crop source error: {0}")]
    Source(#[from] SourceError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors that occur while loading crop records
///
/// A parent image with no records is not an error; these cover records
/// that exist but cannot be read.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read crop records at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid crop records in {path}: {reason}")]
    InvalidRecords { path: PathBuf, reason: String },
}

/// Errors raised by the injected distance and coarse comparators
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Distance computation failed: {0}")]
    DistanceFailed(String),

    #[error("Distance matrix is {actual}x{actual} but {expected} items were compared")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Distance matrix is not square: row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Coarse comparison of {path_a} and {path_b} failed: {reason}")]
    CoarseFailed {
        path_a: PathBuf,
        path_b: PathBuf,
        reason: String,
    },

    #[error("Failed to hash image {path}: {reason}")]
    HashFailed { path: PathBuf, reason: String },
}

/// Errors that occur while arranging the collage
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read image dimensions for {path}: {reason}")]
    DimensionsUnavailable { path: PathBuf, reason: String },

    #[error("Item {id} is referenced by a pair but missing from the item map")]
    UnknownItem { id: String },

    #[error("Packer returned {actual} positions for {expected} images")]
    PackerMismatch { expected: usize, actual: usize },
}

/// Errors in configuration files and values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Palette must contain at least one color")]
    EmptyPalette,

    #[error("Invalid color {value:?}: expected #rrggbb")]
    InvalidColor { value: String },

    #[error("Invalid {name} threshold: {value} (must be a non-negative number)")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Invalid canvas {field}: {value} (must be greater than 0 and at most 1)")]
    InvalidCanvas { field: &'static str, value: f64 },

    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, CollageError>;
