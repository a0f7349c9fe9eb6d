//! Marker rendering pipeline for the flat map.
//!
//! The pipeline takes a collection of [`Flat`](flatmap_shared::Flat) records
//! and reconciles them against a retained [`Scene`]: one visual element per
//! flat id, created on first appearance, updated in place while the id stays
//! present, removed when it disappears. Geometry and colors are derived from
//! the shared scale functions; the host owns the projector, the scene, and
//! the interaction callbacks.

mod error;
pub mod layer;
pub mod marker;
pub mod scene;
pub mod svg;

pub use error::DrawError;
pub use layer::{Callbacks, EventOutcome, MarkerLayer, PointerEvent};
pub use marker::{MarkerDescriptor, Projector};
pub use scene::{ElementId, PrimitiveKind, Scene};
pub use svg::SvgScene;
