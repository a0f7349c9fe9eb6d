use std::f64::consts::PI;

use flatmap_render::Projector;
use flatmap_shared::Point;

/// Pixel size of one tile; the world is `256 * 2^zoom` pixels wide.
const TILE_SIZE: f64 = 256.0;

/// Web Mercator projection at a fixed zoom level, the same pixel space map
/// tiles use. Latitudes near the poles blow up; inputs are expected within
/// the usual ±85° Mercator bounds.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    world: f64,
}

impl WebMercator {
    pub fn new(zoom: u8) -> Self {
        Self {
            world: TILE_SIZE * 2.0_f64.powi(i32::from(zoom)),
        }
    }

    /// Side length of the projected world square in pixels.
    pub fn world_size(&self) -> f64 {
        self.world
    }
}

impl Projector for WebMercator {
    fn project(&self, latitude: f64, longitude: f64) -> Point {
        let x = (longitude + 180.0) / 360.0 * self.world;
        let lat_rad = latitude.to_radians();
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * self.world;
        Point { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_island_is_world_center() {
        let proj = WebMercator::new(2);
        let p = proj.project(0.0, 0.0);
        assert!((p.x - 512.0).abs() < 1e-9);
        assert!((p.y - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_maps_linearly() {
        let proj = WebMercator::new(0);
        assert!((proj.project(0.0, -180.0).x - 0.0).abs() < 1e-9);
        assert!((proj.project(0.0, 180.0).x - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let proj = WebMercator::new(1);
        let berlin = proj.project(52.52, 13.4);
        let rome = proj.project(41.9, 12.5);
        assert!(berlin.y < rome.y);
    }

    #[test]
    fn test_zoom_doubles_world() {
        assert!((WebMercator::new(3).world_size() - 2048.0).abs() < 1e-9);
        assert!((WebMercator::new(4).world_size() - 4096.0).abs() < 1e-9);
    }
}
