use flatmap_shared::geometry::create_ngon;
use flatmap_shared::scale::LinearScale;
use flatmap_shared::{Flat, Point};

use crate::error::DrawError;

/// Fixed polygon rotation: the first vertex points straight up.
const MARKER_ROTATION_DEG: f64 = 270.0;

/// Map-viewport coordinate transform, owned by the host. Must be cheap to
/// call and idempotent for a fixed viewport state.
pub trait Projector {
    fn project(&self, latitude: f64, longitude: f64) -> Point;
}

impl<F> Projector for F
where
    F: Fn(f64, f64) -> Point,
{
    fn project(&self, latitude: f64, longitude: f64) -> Point {
        self(latitude, longitude)
    }
}

/// Per-flat render data, rebuilt from scratch every render cycle and
/// discarded once the diff has consumed it.
#[derive(Debug, Clone)]
pub struct MarkerDescriptor {
    pub flat: Flat,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Ngon outline; meaningless when the flat renders as a circle.
    pub polygon: Vec<Point>,
}

impl MarkerDescriptor {
    /// Single-room flats render as a circle primitive, everything else as a
    /// polygon path.
    pub fn is_circle(&self) -> bool {
        self.flat.rooms == 1
    }
}

/// Project one flat and derive its marker geometry.
///
/// Rejects non-finite projector output; NaN inside the scale or geometry
/// math itself is deliberately not defended against.
pub fn build_descriptor(
    flat: &Flat,
    projector: &impl Projector,
    size_scale: &LinearScale,
) -> Result<MarkerDescriptor, DrawError> {
    let point = projector.project(flat.latitude, flat.longitude);
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(DrawError::NonFiniteProjection { id: flat.id });
    }

    let radius = size_scale.scale(flat.size);
    let sides = (f64::from(flat.rooms) + 1.0).ceil() as u32;
    let polygon = create_ngon(point, sides, radius, MARKER_ROTATION_DEG);

    Ok(MarkerDescriptor {
        flat: flat.clone(),
        x: point.x,
        y: point.y,
        radius,
        polygon,
    })
}

/// SVG path data for a polygon outline: `M` to the first point, `L` to the
/// rest. The loop is left open the same way the ngon generator leaves it.
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push(cmd);
        d.push_str(&format!("{},{}", p.x, p.y));
    }
    d
}
