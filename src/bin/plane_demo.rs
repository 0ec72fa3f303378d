use nalgebra::Vector3;
use plane_detector::config::{self, RuntimeConfig};
use plane_detector::{CameraIntrinsics, OrganizedCloud, TileParams, TilePlaneExtractor};
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = match env::args().nth(1) {
        Some(path) => config::load_config(Path::new(&path))?,
        None => RuntimeConfig::default(),
    };
    let camera = config.camera.unwrap_or_default();

    // Synthetic floor + back-wall scene in front of the camera.
    let cloud = synthetic_room(640, 480, &camera);

    let mut extractor = TilePlaneExtractor::new(config.tile_params.clone(), camera)
        .map_err(|e| format!("Setup failed: {e}"))?;
    let result = extractor
        .process(&cloud, None)
        .map_err(|e| format!("Segmentation failed: {e}"))?;

    println!(
        "planes={} latency_ms={:.3}",
        result.planes.len(),
        result.latency_ms
    );
    for (i, plane) in result.planes.iter().enumerate() {
        println!(
            "  plane {}: n=({:+.3}, {:+.3}, {:+.3}) d={:+.4} pixels={}",
            i + 1,
            plane.normal.x,
            plane.normal.y,
            plane.normal.z,
            plane.offset,
            plane.point_count
        );
    }

    if let Some(path) = &config.output.json_out {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        println!("JSON result written to {}", path.display());
    }
    Ok(())
}

/// Ray-cast a floor plane (y = 0.8 m below the optical axis) against a back
/// wall at z = 3 m; whichever surface a pixel ray hits first wins.
fn synthetic_room(w: usize, h: usize, camera: &CameraIntrinsics) -> OrganizedCloud {
    let max_range = TileParams::default().max_distance;
    OrganizedCloud::from_fn(w, h, |x, y| {
        let dir = Vector3::new(
            (x as f32 - camera.cx) / camera.fx,
            (y as f32 - camera.cy) / camera.fy,
            1.0,
        );
        let t_wall = 3.0f32;
        let t_floor = if dir.y > 1e-3 { 0.8 / dir.y } else { f32::MAX };
        let t = t_wall.min(t_floor);
        let p = dir * t;
        if p.z > max_range {
            Vector3::new(f32::NAN, f32::NAN, f32::NAN)
        } else {
            p
        }
    })
}
