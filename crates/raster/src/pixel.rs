//! CPU rasterization of backdrop frames.
//!
//! [`Pixmap`] implements [`Surface`] with premultiplied RGBA `f32` pixels and
//! source-over blending, with one pixel of coverage antialiasing on circle
//! and line edges. Always available (no feature gate) so stats-only hosts can
//! rasterize without pulling in `image`.

use backdrop_core::{Rgba, Surface};
use glam::DVec2;

/// Premultiplied RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<[f32; 4]>,
}

impl Pixmap {
    /// A fully transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Premultiplied `[r, g, b, a]` at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        (x < self.width && y < self.height).then(|| self.data[self.index(x, y)])
    }

    /// Composites over an opaque `background` into RGBA8 bytes.
    ///
    /// Length is `width * height * 4`; alpha is always 255.
    pub fn to_rgba8(&self, background: Rgba) -> Vec<u8> {
        let bg = [background.r, background.g, background.b].map(|c| f32::from(c) / 255.0);
        self.data
            .iter()
            .flat_map(|&[r, g, b, a]| {
                let over = |src: f32, dst: f32| {
                    ((src + dst * (1.0 - a)).clamp(0.0, 1.0) * 255.0).round() as u8
                };
                [over(r, bg[0]), over(g, bg[1]), over(b, bg[2]), 255u8]
            })
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel index ranges overlapping `[lo, hi]` on each axis, clipped.
    fn span(&self, lo: DVec2, hi: DVec2) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let clip = |v: f64, max: u32| v.clamp(0.0, f64::from(max)) as u32;
        let xs = clip(lo.x.floor(), self.width)..clip(hi.x.ceil(), self.width);
        let ys = clip(lo.y.floor(), self.height)..clip(hi.y.ceil(), self.height);
        (!xs.is_empty() && !ys.is_empty()).then_some((xs, ys))
    }

    /// Source-over blend of `color` at `coverage` into one pixel.
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let a = (color.a * coverage).clamp(0.0, 1.0) as f32;
        if a <= 0.0 {
            return;
        }
        let src = [color.r, color.g, color.b].map(|c| f32::from(c) / 255.0 * a);
        let i = self.index(x, y);
        let dst = &mut self.data[i];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s + *d * (1.0 - a);
        }
        dst[3] = a + dst[3] * (1.0 - a);
    }

    /// Coverage of a pixel whose center is `distance` from a shape edge at
    /// `extent`: full inside, linear over one pixel, zero beyond.
    fn coverage(extent: f64, distance: f64) -> f64 {
        (extent + 0.5 - distance).clamp(0.0, 1.0)
    }
}

impl Surface for Pixmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Pixmap::new(width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let lo = DVec2::new(x, y);
        let hi = lo + DVec2::new(width, height);
        if let Some((xs, ys)) = self.span(lo, hi) {
            for py in ys {
                let row = self.index(0, py);
                self.data[row + xs.start as usize..row + xs.end as usize].fill([0.0; 4]);
            }
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let reach = DVec2::splat(radius + 1.0);
        let Some((xs, ys)) = self.span(center - reach, center + reach) else {
            return;
        };
        for py in ys {
            for px in xs.clone() {
                let p = DVec2::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let coverage = Self::coverage(radius, p.distance(center));
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, line_width: f64) {
        let half = line_width / 2.0;
        let reach = DVec2::splat(half + 1.0);
        let Some((xs, ys)) = self.span(from.min(to) - reach, from.max(to) + reach) else {
            return;
        };
        let seg = to - from;
        let len_sq = seg.length_squared();
        for py in ys {
            for px in xs.clone() {
                let p = DVec2::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let coverage = Self::coverage(half, p.distance(from + seg * t));
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
    const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    #[test]
    fn new_pixmap_is_transparent() {
        let p = Pixmap::new(4, 3);
        assert_eq!(p.pixel(3, 2), Some([0.0; 4]));
        assert_eq!(p.pixel(4, 0), None);
    }

    #[test]
    fn to_rgba8_correct_length_and_opaque() {
        let p = Pixmap::new(8, 4);
        let buf = p.to_rgba8(BLACK);
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn opaque_circle_covers_center() {
        let mut p = Pixmap::new(20, 20);
        p.fill_circle(DVec2::new(10.0, 10.0), 4.0, WHITE);
        assert_eq!(p.pixel(10, 10), Some([1.0; 4]));
        assert_eq!(p.pixel(0, 0), Some([0.0; 4]));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut p = Pixmap::new(10, 10);
        let c = WHITE.with_alpha(0.5);
        p.fill_circle(DVec2::new(5.0, 5.0), 3.0, c);
        p.fill_circle(DVec2::new(5.0, 5.0), 3.0, c);
        let [r, _, _, a] = p.pixel(5, 5).unwrap();
        assert!((a - 0.75).abs() < 1e-6, "alpha {a}");
        assert!((r - 0.75).abs() < 1e-6, "red {r}");
    }

    #[test]
    fn horizontal_line_marks_its_row_only() {
        let mut p = Pixmap::new(20, 10);
        p.stroke_line(DVec2::new(2.0, 5.5), DVec2::new(18.0, 5.5), WHITE, 1.0);
        assert!(p.pixel(10, 5).unwrap()[3] > 0.9);
        assert_eq!(p.pixel(10, 2).unwrap()[3], 0.0);
        assert_eq!(p.pixel(10, 8).unwrap()[3], 0.0);
    }

    #[test]
    fn clear_rect_erases_region() {
        let mut p = Pixmap::new(10, 10);
        p.fill_circle(DVec2::new(5.0, 5.0), 10.0, WHITE);
        p.clear_rect(0.0, 0.0, 5.0, 10.0);
        assert_eq!(p.pixel(2, 5), Some([0.0; 4]));
        assert!(p.pixel(7, 5).unwrap()[3] > 0.0);
    }

    #[test]
    fn shapes_outside_are_clipped() {
        let mut p = Pixmap::new(10, 10);
        p.fill_circle(DVec2::new(-50.0, -50.0), 2.0, WHITE);
        p.stroke_line(DVec2::new(-5.0, 20.0), DVec2::new(30.0, 20.0), WHITE, 0.5);
        assert!(p.to_rgba8(BLACK).chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn resize_discards_content() {
        let mut p = Pixmap::new(10, 10);
        p.fill_circle(DVec2::new(5.0, 5.0), 3.0, WHITE);
        p.resize(4, 4);
        assert_eq!((p.width(), p.height()), (4, 4));
        assert_eq!(p.pixel(2, 2), Some([0.0; 4]));
    }

    #[test]
    fn zero_size_pixmap_accepts_drawing() {
        let mut p = Pixmap::new(0, 0);
        p.clear_rect(0.0, 0.0, 0.0, 0.0);
        p.fill_circle(DVec2::ZERO, 1.0, WHITE);
        assert!(p.to_rgba8(BLACK).is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pixels_stay_in_unit_range(
                shapes in proptest::collection::vec(
                    (0.0_f64..32.0, 0.0_f64..32.0, 0.0_f64..32.0, 0.0_f64..32.0, 0.0_f64..1.0),
                    1..20,
                ),
            ) {
                let mut p = Pixmap::new(32, 32);
                for (x0, y0, x1, y1, a) in shapes {
                    p.fill_circle(DVec2::new(x0, y0), 2.0, WHITE.with_alpha(a));
                    p.stroke_line(DVec2::new(x0, y0), DVec2::new(x1, y1), WHITE.with_alpha(a), 0.5);
                }
                for y in 0..32 {
                    for x in 0..32 {
                        let px = p.pixel(x, y).unwrap();
                        prop_assert!(px.iter().all(|c| (0.0..=1.0 + 1e-6).contains(c)), "{px:?}");
                        prop_assert!(px[0] <= px[3] + 1e-6, "not premultiplied: {px:?}");
                    }
                }
            }
        }
    }
}
