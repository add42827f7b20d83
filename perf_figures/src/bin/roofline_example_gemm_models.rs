use chart_model::{Marker, Roofline, Series, pow2_domain};
use perf_figures::{FigureError, cli, init_logging, roofline_axes, save};

const STREAM_TRIAD: f64 = 12.0; // GB/s
const PEAK_FLOPS: f64 = 48.0; // GFLOP/s

/// Measured GFLOP/s of the naive 1000 x 1000 GEMM.
const ORIGINAL: f64 = 1.831;
const ORIGINAL_INTENSITY: f64 = 21.32;

const FLOPS: f64 = 2e9;
/// Each of the three matrices moved once.
const PERFECT_CACHE_BYTES: f64 = 8.0 * 3.0 * 1e6;
/// Every operand reloaded for every multiply-add.
const PESSIMAL_CACHE_BYTES: f64 = 8.0 * 3.0 * 1e9;

fn main() -> Result<(), FigureError> {
    init_logging();
    let output = cli::output_path();

    let mut figure = roofline_axes((-4, 7), (-3, 6));
    figure.add_roofline(&Roofline::new(STREAM_TRIAD, PEAK_FLOPS), &pow2_domain(-4, 7));
    figure
        .add_series(Series::point(ORIGINAL_INTENSITY, ORIGINAL, Marker::Circle).label("Original"))
        .add_series(
            Series::point(FLOPS / PERFECT_CACHE_BYTES, ORIGINAL, Marker::TriangleRight)
                .label("Perfect cache (original)"),
        )
        .add_series(
            Series::point(FLOPS / PESSIMAL_CACHE_BYTES, ORIGINAL, Marker::TriangleLeft)
                .label("Pessimal cache (original)"),
        );

    save(&figure, output)
}
