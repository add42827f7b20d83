use crate::figure::Scale;
use itertools::Itertools;
use itertools::MinMaxResult;

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Rect {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            x: (x.0.min(x.1), x.0.max(x.1)),
            y: (y.0.min(y.1), y.0.max(y.1)),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.0 >= self.x.0 && point.0 <= self.x.1 && point.1 >= self.y.0 && point.1 <= self.y.1
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    if t == 0.0 {
        a
    } else if t == 1.0 {
        b
    } else {
        (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
    }
}

/// Liang-Barsky. Endpoints inside the rectangle are returned unchanged.
pub fn clip_segment(a: Point, b: Point, rect: &Rect) -> Option<(Point, Point)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, a.0 - rect.x.0),
        (dx, rect.x.1 - a.0),
        (-dy, a.1 - rect.y.0),
        (dy, rect.y.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some((lerp(a, b, t0), lerp(a, b, t1)))
}

/// Split a polyline into the runs that lie inside `rect`.
pub fn clip_polyline(points: &[Point], rect: &Rect) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    for (&a, &b) in points.iter().tuple_windows() {
        let Some((start, end)) = clip_segment(a, b, rect) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.last() == Some(&start) => run.push(end),
            _ => runs.push(vec![start, end]),
        }
    }
    runs
}

/**
 * Cut a polyline into dashes.
 *
 * `pattern` alternates on and off lengths, in the same unit as the points, and must have an
 * even number of entries. An empty pattern leaves the polyline whole.
 */
pub fn dash_segments(points: &[Point], pattern: &[f64]) -> Vec<Vec<Point>> {
    if pattern.is_empty() || pattern.iter().all(|d| *d <= 0.0) {
        return if points.len() >= 2 {
            vec![points.to_vec()]
        } else {
            Vec::new()
        };
    }

    let mut dashes = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut index = 0;
    let mut remaining = pattern[0];

    for (&a, &b) in points.iter().tuple_windows() {
        let length = (b.0 - a.0).hypot(b.1 - a.1);
        let mut travelled = 0.0;
        while travelled < length {
            let step = remaining.min(length - travelled);
            if index % 2 == 0 {
                if current.is_empty() {
                    current.push(lerp(a, b, travelled / length));
                }
                current.push(lerp(a, b, (travelled + step) / length));
            }
            travelled += step;
            remaining -= step;
            if remaining <= 0.0 {
                if !current.is_empty() {
                    dashes.push(std::mem::take(&mut current));
                }
                index = (index + 1) % pattern.len();
                remaining = pattern[index];
            }
        }
    }
    if current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

/**
 * Axis limits in data space.
 *
 * Explicit limits win. Otherwise the extent of `values` (those the scale can represent)
 * padded by 5% on each side, measured in the scale's own space.
 */
pub fn resolve_limits(
    scale: Scale,
    explicit: Option<(f64, f64)>,
    values: impl IntoIterator<Item = f64>,
) -> (f64, f64) {
    if let Some(limits) = explicit {
        return limits;
    }
    let (lo, hi) = match values
        .into_iter()
        .filter_map(|v| scale.forward(v))
        .filter(|v| v.is_finite())
        .minmax()
    {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let (lo, hi) = if lo == hi {
        let half = match scale {
            Scale::Log2 => 1.0,
            Scale::Linear if lo == 0.0 => 1.0,
            Scale::Linear => lo.abs() * 0.05,
        };
        (lo - half, hi + half)
    } else {
        (lo, hi)
    };
    let margin = (hi - lo) * 0.05;
    (scale.inverse(lo - margin), scale.inverse(hi + margin))
}

/// Index of the candidate covering the fewest points; the first one on ties.
pub fn least_crowded(candidates: &[Rect], points: &[Point]) -> Option<usize> {
    candidates
        .iter()
        .map(|rect| points.iter().filter(|p| rect.contains(**p)).count())
        .position_min()
}
