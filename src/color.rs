use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generators
// ---------------------------------------------------------------------------

/// Anchor stops of the viridis colour map, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Anchor stops of the plasma colour map, deep blue to yellow.
const PLASMA: [(u8, u8, u8); 5] = [
    (0x0d, 0x08, 0x87),
    (0x7e, 0x03, 0xa8),
    (0xcc, 0x47, 0x78),
    (0xf8, 0x95, 0x40),
    (0xf0, 0xf9, 0x21),
];

fn to_rgb(rgb: Srgb) -> RGBColor {
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_rgb(rgb)
        })
        .collect()
}

/// Sample `n` colours evenly along a piecewise-linear gradient,
/// interpolating in linear RGB.
fn sample_gradient(stops: &[(u8, u8, u8)], n: usize) -> Vec<RGBColor> {
    let stops: Vec<LinSrgb> = stops
        .iter()
        .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
        .collect();
    let segments = stops.len() - 1;

    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let pos = t * segments as f32;
            let seg = (pos.floor() as usize).min(segments - 1);
            let local = pos - seg as f32;
            let mixed = stops[seg].mix(stops[seg + 1], local);
            to_rgb(Srgb::from_linear(mixed))
        })
        .collect()
}

/// `n` colours from the viridis map.
pub fn viridis(n: usize) -> Vec<RGBColor> {
    sample_gradient(&VIRIDIS, n)
}

/// `n` colours from the plasma map.
pub fn plasma(n: usize) -> Vec<RGBColor> {
    sample_gradient(&PLASMA, n)
}

// ---------------------------------------------------------------------------
// Color mapping: category key → RGBColor
// ---------------------------------------------------------------------------

/// Maps the keys of a categorical axis to colours, in key order.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, RGBColor>,
    default_color: RGBColor,
}

impl<K: Ord + Clone> ColorMap<K> {
    /// Pair each key with the palette colour at the same position.
    pub fn new(keys: impl IntoIterator<Item = K>, palette: Vec<RGBColor>) -> Self {
        let mapping = keys.into_iter().zip(palette).collect();
        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a key.
    pub fn color_for(&self, key: &K) -> RGBColor {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }

    /// Return the legend entries (key → colour) in key order.
    pub fn legend_entries(&self) -> Vec<(K, RGBColor)> {
        self.mapping.iter().map(|(k, c)| (k.clone(), *c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_hues_are_distinct() {
        let p = generate_palette(12);
        assert_eq!(p.len(), 12);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn gradients_hit_their_end_stops() {
        let v = viridis(4);
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], RGBColor(0x44, 0x01, 0x54));
        assert_eq!(v[3], RGBColor(0xfd, 0xe7, 0x25));

        let p = plasma(12);
        assert_eq!(p[0], RGBColor(0x0d, 0x08, 0x87));
        assert_eq!(p[11], RGBColor(0xf0, 0xf9, 0x21));
        assert_eq!(plasma(1).len(), 1);
        assert!(viridis(0).is_empty());
    }

    #[test]
    fn color_map_falls_back_to_gray() {
        let map = ColorMap::new([2016, 2017], viridis(2));
        assert_eq!(map.color_for(&2016), RGBColor(0x44, 0x01, 0x54));
        assert_eq!(map.color_for(&1999), RGBColor(128, 128, 128));
        let keys: Vec<i32> = map.legend_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![2016, 2017]);
    }
}
