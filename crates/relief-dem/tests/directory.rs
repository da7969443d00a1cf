//! Integration tests for the directory-backed raster source.

use relief_dem::{DemError, RasterSource, RgbRaster, TileCoord, TileDirectory};
use std::fs;
use tempfile::TempDir;

fn write_tile(root: &TempDir, coord: TileCoord, size: u32) {
    let dir = TileDirectory::new(root.path());
    let path = dir.tile_path(coord);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbRaster::from_elevation_fn(size, |col, _| f64::from(col))
        .save_png(&path)
        .unwrap();
}

#[test]
fn test_discover_finds_nested_tiles() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let a = TileCoord::new(12, 655, 1407).unwrap();
    let b = TileCoord::new(12, 656, 1407).unwrap();
    let c = TileCoord::new(11, 327, 703).unwrap();
    for coord in [a, b, c] {
        write_tile(&root, coord, 4);
    }
    // Noise that must be ignored
    fs::write(root.path().join("README.txt"), "not a tile").unwrap();
    fs::create_dir_all(root.path().join("12/notes")).unwrap();
    fs::write(root.path().join("12/notes/draft.png"), "x").unwrap();

    let tiles = TileDirectory::new(root.path()).discover().unwrap();
    assert_eq!(tiles, vec![c, a, b]);
}

#[test]
fn test_load_missing_tile_is_none() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let dir = TileDirectory::new(root.path());
    let coord = TileCoord::new(10, 1, 1).unwrap();
    assert!(dir.load(coord).unwrap().is_none());
}

#[test]
fn test_load_present_tile() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let coord = TileCoord::new(10, 1, 1).unwrap();
    write_tile(&root, coord, 6);

    let raster = TileDirectory::new(root.path())
        .load(coord)
        .unwrap()
        .expect("tile should be present");
    assert_eq!(raster.dimensions(), (6, 6));
    assert!((raster.elevation(5, 0) - 5.0).abs() < 1e-6);
}

#[test]
fn test_load_corrupt_tile_is_error() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let coord = TileCoord::new(10, 1, 1).unwrap();
    let dir = TileDirectory::new(root.path());
    let path = dir.tile_path(coord);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"garbage").unwrap();

    assert!(matches!(dir.load(coord), Err(DemError::ImageDecode { .. })));
}

#[test]
fn test_discover_missing_root_is_io_error() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let dir = TileDirectory::new(root.path().join("does-not-exist"));
    assert!(matches!(dir.discover(), Err(DemError::Io(_))));
}
