//! Viewport fit
//!
//! Maps the simulated positions into `[padding, dimension - padding]` on
//! both axes with one uniform scale. The scaled content is centred on any
//! axis it does not fill, so a single node lands on the canvas centre.

use super::types::Point;

/// Floor for the used extent on each axis before dividing by it
const MIN_EXTENT: f64 = 1.0;

/// Axis-aligned bounds of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of all points; `None` when empty
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Uniform scale plus translation applied to every position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub origin: Point,
}

impl ViewportFit {
    /// Fit `bounds` into a `width × height` canvas with `padding` on every
    /// side. Padding is capped at half the canvas so tiny canvases still
    /// yield a non-negative drawing area.
    pub fn compute(bounds: Bounds, width: f64, height: f64, padding: f64) -> Self {
        let pad_x = padding.min(width / 2.0);
        let pad_y = padding.min(height / 2.0);
        let avail_w = (width - 2.0 * pad_x).max(0.0);
        let avail_h = (height - 2.0 * pad_y).max(0.0);

        let used_w = bounds.width().max(MIN_EXTENT);
        let used_h = bounds.height().max(MIN_EXTENT);
        let scale = (avail_w / used_w).min(avail_h / used_h);

        Self {
            scale,
            offset_x: pad_x + (avail_w - bounds.width() * scale) / 2.0,
            offset_y: pad_y + (avail_h - bounds.height() * scale) / 2.0,
            origin: Point::new(bounds.min_x, bounds.min_y),
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.offset_x + (p.x - self.origin.x) * self.scale,
            self.offset_y + (p.y - self.origin.y) * self.scale,
        )
    }
}

/// Fit positions into the canvas. Returns the transformed points and the
/// fit used, or `None` for an empty input.
pub fn fit_to_viewport(
    positions: &[Point],
    width: f64,
    height: f64,
    padding: f64,
) -> Option<(Vec<Point>, ViewportFit)> {
    let bounds = Bounds::of(positions)?;
    let fit = ViewportFit::compute(bounds, width, height, padding);
    Some((positions.iter().map(|p| fit.apply(*p)).collect(), fit))
}
