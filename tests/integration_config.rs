//! Integration tests for config files and parent image discovery.

use assert_fs::prelude::*;
use crop_collage::config::CollageConfig;
use crop_collage::core::coloring::{Color, GroupingMode};
use crop_collage::core::source::{discover_parent_images, sample_parent_images};
use crop_collage::error::{ConfigError, SourceError};
use predicates::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;

#[test]
fn config_file_overrides_defaults() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("config.json");
    file.write_str(
        r##"{
            "palette": ["#112233", "#445566"],
            "object_threshold": 0.1,
            "grouping": "disjoint-set",
            "canvas": { "width": 800, "height": 600, "shakiness": 0 }
        }"##,
    )
    .unwrap();

    let config = CollageConfig::load(file.path()).unwrap();

    assert_eq!(
        config.palette.colors(),
        &[Color::rgb(0x11, 0x22, 0x33), Color::rgb(0x44, 0x55, 0x66)]
    );
    assert_eq!(config.object_threshold, 0.1);
    assert_eq!(config.grouping, GroupingMode::DisjointSet);
    assert_eq!(config.canvas.width, 800);
    assert_eq!(config.canvas.shakiness, 0.0);
    assert_eq!(config.canvas.max_fraction, 0.3);
}

#[test]
fn config_round_trips_through_json() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("config.json");
    let config = CollageConfig {
        seed: Some(99),
        ..CollageConfig::default()
    };
    file.write_str(&serde_json::to_string_pretty(&config).unwrap())
        .unwrap();

    file.assert(predicate::str::contains("\"seed\": 99"));
    assert_eq!(CollageConfig::load(file.path()).unwrap(), config);
}

#[test]
fn bad_color_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("config.json");
    file.write_str(r#"{ "palette": ["red"] }"#).unwrap();

    let result = CollageConfig::load(file.path());

    assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
}

#[test]
fn discovery_lists_only_images_in_order() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("b.jpg").touch().unwrap();
    dir.child("a.PNG").touch().unwrap();
    dir.child("notes.txt").touch().unwrap();
    dir.child("nested").create_dir_all().unwrap();
    dir.child("nested/c.jpg").touch().unwrap();

    let images = discover_parent_images(dir.path()).unwrap();

    let names: Vec<String> = images
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.jpg"]);
}

#[test]
fn discovery_of_missing_directory_fails() {
    let result = discover_parent_images(Path::new("/nonexistent/images"));
    assert!(matches!(result, Err(SourceError::DirectoryNotFound { .. })));
}

#[test]
fn sampling_is_seeded() {
    let dir = assert_fs::TempDir::new().unwrap();
    for i in 0..20 {
        dir.child(format!("{:02}.jpg", i)).touch().unwrap();
    }
    let images = discover_parent_images(dir.path()).unwrap();

    let first = sample_parent_images(&images, 5, &mut SmallRng::seed_from_u64(3));
    let second = sample_parent_images(&images, 5, &mut SmallRng::seed_from_u64(3));

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0] < w[1]));
}
