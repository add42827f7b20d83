use chart_model::{
    Axis, Color, Figure, FigureStyle, Legend, LineStyle, Marker, ReferenceLine, Series,
};
use perf_figures::{FigureError, cli, init_logging, save};

// MFLOP/s the reduction could reach streaming from each level at 2.9 GHz.
const CLOCK_GHZ: f64 = 2.9;
const L1_PEAK: f64 = CLOCK_GHZ * 8.0 * 1e3;
const L2_PEAK: f64 = CLOCK_GHZ * 8.0 * 27.0 / 32.0 * 1e3;
const L3_PEAK: f64 = CLOCK_GHZ * 8.0 * 12.0 / 32.0 * 1e3;
const RAM_PEAK: f64 = CLOCK_GHZ * 8.0 * 4.5 / 32.0 * 1e3;

/// (vector size in bytes, MFLOP/s) of the AVX reduction.
const SIMD: [(f64, f64); 22] = [
    (1e3, 20934.77),
    (2e3, 23240.25),
    (4e3, 22471.22),
    (8e3, 21988.17),
    (16e3, 22216.43),
    (32e3, 21881.05),
    (64e3, 17130.67),
    (96e3, 17975.12),
    (128e3, 17291.29),
    (160e3, 17507.30),
    (192e3, 14476.12),
    (224e3, 12656.81),
    (256e3, 11854.84),
    (512e3, 8585.19),
    (1e6, 8607.97),
    (2e6, 8609.45),
    (4e6, 8615.55),
    (8e6, 8622.28),
    (16e6, 8624.76),
    (32e6, 6814.45),
    (64e6, 3190.88),
    (128e6, 3153.69),
];

fn main() -> Result<(), FigureError> {
    init_logging();
    let output = cli::output_path();

    let mut figure = Figure::new(
        Axis::log2().label("Vector size [Bytes]"),
        Axis::linear().label("Performance [MFlops/s]"),
    )
    .with_style(FigureStyle::compact())
    .with_legend(Legend::Inside);

    figure.add_series(Series::line(SIMD).marker(Marker::Circle).label("SIMD (AVX)"));
    for (peak, color, style, label) in [
        (L1_PEAK, Color::RED, LineStyle::Dashed, "L1 Peak"),
        (L2_PEAK, Color::BLACK, LineStyle::Dotted, "L2 Peak"),
        (L3_PEAK, Color::MAGENTA, LineStyle::Solid, "L3 Peak"),
        (RAM_PEAK, Color::BROWN, LineStyle::DashDot, "RAM Peak"),
    ] {
        figure.add_reference_line(ReferenceLine::new(peak, color, style).label(label));
    }

    save(&figure, output)
}
