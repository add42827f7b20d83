/**
 * Roofline bounds.
 *
 * A roofline is described by a memory bandwidth ceiling `B` (GB/s) and a compute ceiling `F`
 * (GFLOP/s). The attainable performance at arithmetic intensity `x` (FLOP/byte) is
 * `min(F, B * x)`, and the two regimes meet at the ridge point `x* = F / B`.
 */

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roofline {
    pub bandwidth: f64,
    pub peak: f64,
}

impl Roofline {
    pub const fn new(bandwidth: f64, peak: f64) -> Self {
        Self { bandwidth, peak }
    }

    /// Same bandwidth, compute ceiling divided by `factor` (e.g. scalar vs vector peak).
    pub fn scaled_peak(self, factor: f64) -> Self {
        Self::new(self.bandwidth, self.peak / factor)
    }

    pub fn ridge_point(&self) -> f64 {
        self.peak / self.bandwidth
    }

    pub fn bound(&self, intensity: f64) -> f64 {
        self.peak.min(self.bandwidth * intensity)
    }

    /// Trace the bound over `domain` (sorted ascending), with the ridge point spliced in at
    /// its sorted position so that the line bends exactly at the knee.
    pub fn curve(&self, domain: &[f64]) -> Vec<(f64, f64)> {
        let ridge = self.ridge_point();
        let index = domain.partition_point(|x| *x < ridge);
        let already_present = domain.get(index).is_some_and(|x| *x == ridge);

        let mut points = Vec::with_capacity(domain.len() + 1);
        points.extend(domain[..index].iter().map(|x| (*x, self.bound(*x))));
        // B * (F / B) is not always F once rounded.
        points.push((ridge, self.peak));
        let rest = if already_present { index + 1 } else { index };
        points.extend(domain[rest..].iter().map(|x| (*x, self.bound(*x))));
        points
    }
}

/// `2^lo, 2^(lo+1), ..., 2^hi`
pub fn pow2_domain(lo_exp: i32, hi_exp: i32) -> Vec<f64> {
    (lo_exp..=hi_exp).map(|n| 2f64.powi(n)).collect()
}
