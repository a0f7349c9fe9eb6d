use crate::models::Point;

/// Approximate a regular n-gon around `center`.
///
/// Vertices are emitted starting at `rotation` degrees and stepping by
/// `round(360 / sides)` whole degrees, up to and including the last angle
/// `<= 360 + rotation`. Because the step is rounded, the loop closes near
/// but not exactly at the start when `360 / sides` is non-integral; that
/// low-precision tessellation is the intended visual shape and downstream
/// code depends on the exact point count it produces.
///
/// Non-finite `radius` or `center` coordinates propagate NaN into the
/// output rather than failing.
pub fn create_ngon(center: Point, sides: u32, radius: f64, rotation: f64) -> Vec<Point> {
    let step = (360.0 / f64::from(sides)).round();
    if step <= 0.0 {
        // round(360/sides) hits zero past 720 sides; a single vertex is the
        // only sane output there.
        return vec![vertex_at(center, radius, rotation)];
    }

    let mut coords = Vec::new();
    let mut angle = rotation;
    while angle <= 360.0 + rotation {
        coords.push(vertex_at(center, radius, angle));
        angle += step;
    }
    coords
}

fn vertex_at(center: Point, radius: f64, angle_deg: f64) -> Point {
    let theta = angle_deg.to_radians();
    Point {
        x: center.x + radius * theta.cos(),
        y: center.y + radius * theta.sin(),
    }
}
