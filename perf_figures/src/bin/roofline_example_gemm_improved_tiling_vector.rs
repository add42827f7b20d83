use chart_model::{Marker, Roofline, Series, pow2_domain};
use perf_figures::{FigureError, cli, init_logging, roofline_axes, save};

const STREAM_TRIAD: f64 = 12.0; // GB/s
const PEAK_FLOPS: f64 = 46.4; // GFLOP/s

const FLOPS: f64 = 2e9;
const PERFECT_CACHE_BYTES: f64 = 8.0 * 3.0 * 1e6;

/// (name, measured arithmetic intensity, GFLOP/s) of each GEMM variant.
const VARIANTS: [(&str, f64, f64); 3] = [
    ("Original", 21.32, 1.831),
    ("Tiling", 27.0, 7.6),
    ("Tiling + vectorise", 38.0, 19.5),
];

fn main() -> Result<(), FigureError> {
    init_logging();
    let output = cli::output_path();

    let mut figure = roofline_axes((-4, 7), (-3, 6));
    figure.add_roofline(&Roofline::new(STREAM_TRIAD, PEAK_FLOPS), &pow2_domain(-4, 7));

    for (name, intensity, gflops) in VARIANTS {
        let perfect_cache = format!("Perfect cache ({})", name.to_lowercase());
        figure
            .add_series(Series::point(intensity, gflops, Marker::Circle).label(name))
            .add_series(
                Series::point(FLOPS / PERFECT_CACHE_BYTES, gflops, Marker::TriangleRight)
                    .label(perfect_cache),
            );
    }

    save(&figure, output)
}
