use jotter_core::{IterationField, ReferenceField};
use rayon::prelude::*;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

const LUT_SIZE: usize = 256;

/// A named colormap backed by a gradient lookup table.
///
/// Values are normalized to `[0, 1]` over the minimum and maximum of the
/// data being colored, then looked up in the table. A constant field maps
/// entirely to the low end.
#[derive(Clone)]
pub struct Colormap {
    pub name: &'static str,
    lut: Vec<[u8; 4]>,
}

impl Colormap {
    fn new(name: &'static str, stops: &[(f64, [u8; 3])]) -> Self {
        Self {
            name,
            lut: gradient_lut(stops),
        }
    }

    /// Look up a builtin colormap by name (case-insensitive).
    pub fn by_name(name: &str) -> crate::Result<Self> {
        builtin_colormaps()
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RenderError::UnknownColormap(name.to_string()))
    }

    /// Color for a normalized position. Out-of-range input is clamped and
    /// NaN maps to the low end.
    pub fn color(&self, t: f64) -> [u8; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let idx = (t * (LUT_SIZE - 1) as f64).round() as usize;
        self.lut[idx.min(LUT_SIZE - 1)]
    }

    /// Colorize an iteration field into an RGBA buffer.
    pub fn colorize_field(&self, field: &IterationField) -> RenderBuffer {
        self.colorize_values(field.width(), field.height(), field.data())
    }

    /// Colorize the reference raster into an RGBA buffer.
    pub fn colorize_reference(&self, field: &ReferenceField) -> RenderBuffer {
        self.colorize_values(field.width(), field.height(), field.values())
    }

    fn colorize_values<T>(&self, width: u32, height: u32, values: &[T]) -> RenderBuffer
    where
        T: Copy + Into<f64> + Sync,
    {
        let (lo, hi) = values
            .iter()
            .map(|&v| Into::<f64>::into(v))
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let span = hi - lo;

        let mut pixels = vec![0u8; values.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(values.par_iter())
            .for_each(|(pixel, &v)| {
                let t = if span > 0.0 {
                    (Into::<f64>::into(v) - lo) / span
                } else {
                    0.0
                };
                pixel.copy_from_slice(&self.color(t));
            });

        RenderBuffer {
            width,
            height,
            pixels,
        }
    }
}

impl Default for Colormap {
    fn default() -> Self {
        viridis()
    }
}

impl std::fmt::Debug for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Colormap").field("name", &self.name).finish()
    }
}

/// Build a gradient LUT by interpolating between color stops.
fn gradient_lut(stops: &[(f64, [u8; 3])]) -> Vec<[u8; 4]> {
    (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / (LUT_SIZE - 1) as f64;
            let mut lo = 0;
            for (j, &(pos, _)) in stops.iter().enumerate() {
                if pos <= t {
                    lo = j;
                }
            }
            let hi = (lo + 1).min(stops.len() - 1);
            let (lo_t, lo_c) = stops[lo];
            let (hi_t, hi_c) = stops[hi];
            let frac = if (hi_t - lo_t).abs() < 1e-10 {
                0.0
            } else {
                ((t - lo_t) / (hi_t - lo_t)).clamp(0.0, 1.0)
            };
            let inv = 1.0 - frac;
            [
                (lo_c[0] as f64 * inv + hi_c[0] as f64 * frac).round() as u8,
                (lo_c[1] as f64 * inv + hi_c[1] as f64 * frac).round() as u8,
                (lo_c[2] as f64 * inv + hi_c[2] as f64 * frac).round() as u8,
                255,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Builtin colormaps
// ---------------------------------------------------------------------------

pub fn builtin_colormaps() -> Vec<Colormap> {
    vec![
        viridis(),
        plasma(),
        inferno(),
        magma(),
        twilight(),
        twilight_shifted(),
        greys(),
        gray(),
        hot(),
    ]
}

fn viridis() -> Colormap {
    Colormap::new(
        "viridis",
        &[
            (0.0, [68, 1, 84]),
            (0.25, [59, 82, 139]),
            (0.5, [33, 145, 140]),
            (0.75, [94, 201, 98]),
            (1.0, [253, 231, 37]),
        ],
    )
}

fn plasma() -> Colormap {
    Colormap::new(
        "plasma",
        &[
            (0.0, [13, 8, 135]),
            (0.25, [126, 3, 168]),
            (0.5, [204, 71, 120]),
            (0.75, [248, 149, 64]),
            (1.0, [240, 249, 33]),
        ],
    )
}

fn inferno() -> Colormap {
    Colormap::new(
        "inferno",
        &[
            (0.0, [0, 0, 4]),
            (0.25, [87, 16, 110]),
            (0.5, [188, 55, 84]),
            (0.75, [249, 142, 9]),
            (1.0, [252, 255, 164]),
        ],
    )
}

fn magma() -> Colormap {
    Colormap::new(
        "magma",
        &[
            (0.0, [0, 0, 4]),
            (0.25, [81, 18, 124]),
            (0.5, [183, 55, 121]),
            (0.75, [252, 137, 97]),
            (1.0, [252, 253, 191]),
        ],
    )
}

fn twilight() -> Colormap {
    Colormap::new(
        "twilight",
        &[
            (0.0, [226, 217, 226]),
            (0.25, [94, 128, 190]),
            (0.5, [47, 20, 55]),
            (0.75, [178, 92, 75]),
            (1.0, [226, 217, 226]),
        ],
    )
}

// Cyclic: dark at both ends, light in the middle.
fn twilight_shifted() -> Colormap {
    Colormap::new(
        "twilight_shifted",
        &[
            (0.0, [47, 20, 55]),
            (0.25, [94, 128, 190]),
            (0.5, [226, 217, 226]),
            (0.75, [178, 92, 75]),
            (1.0, [47, 20, 55]),
        ],
    )
}

fn greys() -> Colormap {
    Colormap::new("Greys", &[(0.0, [255, 255, 255]), (1.0, [0, 0, 0])])
}

fn gray() -> Colormap {
    Colormap::new("gray", &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])])
}

fn hot() -> Colormap {
    Colormap::new(
        "hot",
        &[
            (0.0, [11, 0, 0]),
            (0.375, [255, 0, 0]),
            (0.75, [255, 255, 0]),
            (1.0, [255, 255, 255]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Colormap::by_name("VIRIDIS").unwrap().name, "viridis");
        assert_eq!(Colormap::by_name("greys").unwrap().name, "Greys");
        assert!(matches!(
            Colormap::by_name("rainbow-unicorn"),
            Err(RenderError::UnknownColormap(_))
        ));
    }

    #[test]
    fn names_are_unique() {
        let maps = builtin_colormaps();
        for (i, a) in maps.iter().enumerate() {
            for b in &maps[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name));
            }
        }
    }

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        let gray = Colormap::by_name("gray").unwrap();
        assert_eq!(gray.color(0.0), [0, 0, 0, 255]);
        assert_eq!(gray.color(1.0), [255, 255, 255, 255]);
        assert_eq!(gray.color(-3.0), gray.color(0.0));
        assert_eq!(gray.color(f64::NAN), gray.color(0.0));
        assert_eq!(gray.color(7.0), gray.color(1.0));
    }

    #[test]
    fn field_is_normalized_min_to_max() {
        let field = IterationField::from_raw(3, 1, 10, vec![2, 6, 10]).unwrap();
        let buf = Colormap::by_name("gray").unwrap().colorize_field(&field);
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(buf.pixel(2, 0), Some([255, 255, 255, 255]));
        let mid = buf.pixel(1, 0).unwrap();
        assert!((126..=129).contains(&mid[0]));
    }

    #[test]
    fn constant_field_maps_to_low_end() {
        let field = IterationField::from_raw(2, 2, 0, vec![0; 4]).unwrap();
        let cmap = Colormap::default();
        let buf = cmap.colorize_field(&field);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(buf.pixel(x, y), Some(cmap.color(0.0)));
            }
        }
    }

    #[test]
    fn reference_colorizes_to_same_size() {
        let field = ReferenceField::new(4, 3, (0..12).map(f64::from).collect()).unwrap();
        let buf = Colormap::by_name("twilight_shifted")
            .unwrap()
            .colorize_reference(&field);
        assert_eq!((buf.width, buf.height), (4, 3));
        assert_eq!(buf.pixels.len(), 4 * 3 * 4);
    }
}
