//! End-to-end tests for the `relief` binary.
//!
//! Fixture tiles are generated as Terrain-RGB PNGs in a temporary directory,
//! then the built binary is run against them.

use std::path::Path;
use std::process::{Command, Output};

use relief_dem::{RgbRaster, TileCoord};
use serde_json::Value;
use tempfile::TempDir;

const SIZE: u32 = 32;
const PEAK: f64 = 2000.0;

fn relief_bin() -> &'static str {
    env!("CARGO_BIN_EXE_relief")
}

/// Write a 3x3 block of tiles around `center`, together holding one cone.
fn write_cone(root: &Path, center: TileCoord) {
    let size = SIZE as f64;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let coord = center.neighbor(dx, dy).unwrap();
            let raster = RgbRaster::from_elevation_fn(SIZE, |col, row| {
                let gx = dx as f64 * size + col as f64 - size / 2.0;
                let gy = dy as f64 * size + row as f64 - size / 2.0;
                (PEAK - 40.0 * (gx * gx + gy * gy).sqrt()).max(0.0)
            });
            let path = coord.path_in(root, "png");
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            raster.save_png(&path).unwrap();
        }
    }
}

fn run_relief(args: &[&str]) -> Output {
    Command::new(relief_bin())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to run relief binary")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "relief failed:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn read_geojson(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).expect("output is not valid JSON")
}

#[test]
fn test_cli_writes_geojson_pyramid() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let center = TileCoord::new(12, 655, 1407).unwrap();
    write_cone(input.path(), center);

    let result = run_relief(&[
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
        "-s",
        "32",
        "-t",
        "3",
        "-l",
        "terrain",
    ]);
    assert_success(&result);

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("9 written"), "unexpected summary: {}", stdout);

    let path = center.path_in(output.path(), "geojson");
    assert!(path.is_file(), "missing {}", path.display());
    let doc = read_geojson(&path);
    assert_eq!(doc["type"], "FeatureCollection");

    let features = doc["features"].as_array().unwrap();
    let lines: Vec<&Value> = features
        .iter()
        .filter(|f| f["geometry"]["type"] == "LineString")
        .collect();
    assert!(!lines.is_empty(), "center tile should carry contours");
    for feature in features {
        assert_eq!(feature["tippecanoe"]["layer"], "terrain");
    }
    for line in lines {
        let ele = line["properties"]["ele"].as_i64().unwrap();
        assert_eq!(ele % 50, 0, "z12 contours fall on 50 m steps");
        assert!(ele >= 0 && ele < PEAK as i64);
        assert_eq!(line["properties"]["index"], (ele / 50) % 10);
    }
}

#[test]
fn test_cli_skips_existing_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let center = TileCoord::new(12, 655, 1407).unwrap();
    write_cone(input.path(), center);

    let args = [
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
        "-s",
        "32",
        "--no-hulls",
    ];
    assert_success(&run_relief(&args));

    let second = run_relief(&args);
    assert_success(&second);
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("9 skipped"), "unexpected summary: {}", stdout);

    let mut overwrite = args.to_vec();
    overwrite.push("-w");
    let third = run_relief(&overwrite);
    assert_success(&third);
    let stdout = String::from_utf8_lossy(&third.stdout);
    assert!(stdout.contains("9 written"), "unexpected summary: {}", stdout);
}

#[test]
fn test_cli_feet_and_fixed_interval() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let center = TileCoord::new(12, 655, 1407).unwrap();
    write_cone(input.path(), center);

    assert_success(&run_relief(&[
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
        "-s",
        "32",
        "-u",
        "feet",
        "--interval",
        "500",
        "--no-smooth",
    ]));

    let doc = read_geojson(&center.path_in(output.path(), "geojson"));
    let levels: Vec<i64> = doc["features"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|f| f["geometry"]["type"] == "LineString")
        .map(|f| f["properties"]["ele"].as_i64().unwrap())
        .collect();
    assert!(!levels.is_empty());
    assert!(levels.iter().all(|ele| ele % 500 == 0));
    // The peak is ~6562 ft, so feet levels run above the metric peak.
    assert!(levels.iter().any(|&ele| ele > PEAK as i64));
}

#[test]
fn test_cli_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("relief.yaml");
    std::fs::write(&config, "workers: [1, 2").unwrap();

    let result = run_relief(&["-c", config.to_str().unwrap()]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("relief.yaml"), "stderr: {}", stderr);
}

#[test]
fn test_cli_missing_input_root() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let result = run_relief(&["-i", missing.to_str().unwrap(), "-o", dir.path().to_str().unwrap()]);
    assert!(!result.status.success());
}
