use serde::{Deserialize, Serialize};

/// Screen-space point, after map projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One real-estate unit as delivered by the data store.
///
/// The collection is validated upstream; this type carries the record as-is.
/// `id` is the identity the renderer keys on and must be stable across renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flat {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Floor area, positive.
    pub size: f64,
    /// Room count, >= 1.
    pub rooms: u32,
    /// Asking price, positive.
    pub price: f64,
}

impl Flat {
    pub fn price_per_area(&self) -> f64 {
        self.price / self.size
    }
}

/// Closed numeric interval. Invariant: `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

/// Host-supplied rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    /// Domain bounds for the price-per-area color scale.
    pub price_per_area: Domain,
}
