use crate::models::Domain;

/// Linear domain-to-range mapping. Values outside the domain extrapolate;
/// there is no clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

/// Default size-to-radius scale: 10 m² maps to 20 px, 200 m² to 50 px.
pub const SIZE_TO_RADIUS: LinearScale = LinearScale {
    domain: [10.0, 200.0],
    range: [20.0, 50.0],
};

impl LinearScale {
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain[0]) / (self.domain[1] - self.domain[0]);
        self.range[0] + t * (self.range[1] - self.range[0])
    }
}

/// The RdYlGn diverging swatch (ColorBrewer 11-class), red to green.
const RD_YL_GN: [[u8; 3]; 11] = [
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

/// Sample the RdYlGn ramp at `t` in [0, 1] (clamped), piecewise-linear
/// between swatch stops. Returns a lowercase `#rrggbb` string.
pub fn diverging_color(t: f64) -> String {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let pos = t * (RD_YL_GN.len() - 1) as f64;
    let i = (pos.floor() as usize).min(RD_YL_GN.len() - 2);
    let frac = pos - i as f64;

    let lo = RD_YL_GN[i];
    let hi = RD_YL_GN[i + 1];
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;

    format!(
        "#{:02x}{:02x}{:02x}",
        channel(lo[0], hi[0]),
        channel(lo[1], hi[1]),
        channel(lo[2], hi[2])
    )
}

/// Fill color for a price-per-area value.
///
/// The domain is applied reversed, `[max, min]`: the most expensive flats
/// land on the red end of the ramp, the cheapest on the green end.
pub fn price_color(value: f64, domain: Domain) -> String {
    let span = domain.min - domain.max;
    let t = if span == 0.0 {
        0.5
    } else {
        (value - domain.max) / span
    };
    diverging_color(t)
}
