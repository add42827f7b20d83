use chart_model::{Annotation, HAlign, Marker, Roofline, Series, VAlign, pow2_domain};
use itertools::Itertools;
use perf_figures::{FigureError, cli, init_logging, roofline_axes, save};

const STREAM_TRIAD: f64 = 11.6; // GB/s
const PEAK_FLOPS: f64 = 46.4; // GFLOP/s

/// (rows, columns, MFLOP/s) of the dense matrix-vector product.
type Measurement = (u32, u32, f64);

const O0: [Measurement; 7] = [
    (1000, 10000, 587.24),
    (2500, 10000, 587.02),
    (5000, 10000, 578.34),
    (10000, 10000, 576.25),
    (25000, 10000, 583.59),
    (50000, 10000, 587.02),
    (100000, 10000, 585.00),
];

const O3: [Measurement; 7] = [
    (1000, 10000, 3236.0),
    (2500, 10000, 2828.0),
    (5000, 10000, 2804.0),
    (10000, 10000, 2815.0),
    (25000, 10000, 1964.0),
    (50000, 10000, 1949.0),
    (100000, 10000, 1949.0),
];

const O3_BLOCKED: [Measurement; 7] = [
    (1000, 10000, 3157.0),
    (2500, 10000, 2848.0),
    (5000, 10000, 2909.0),
    (10000, 10000, 2808.0),
    (25000, 10000, 2808.0),
    (50000, 10000, 2838.0),
    (100000, 10000, 2870.0),
];

/// FLOPs per byte of `y = A x` for a `rows x columns` matrix of doubles: `2rc` flops against
/// `rc + r + 2c` doubles moved.
fn arithmetic_intensity(rows: u32, columns: u32) -> f64 {
    let (r, c) = (rows as f64, columns as f64);
    2.0 * c * r / (8.0 * (2.0 * c + r + r * c))
}

/// Intensity always comes from the matrix shape of the unoptimised runs.
fn measurements(intensity: &[f64], data: &[Measurement]) -> Vec<(f64, f64)> {
    intensity
        .iter()
        .zip_eq(data)
        .map(|(x, (_, _, mflops))| (*x, mflops * 1e-3))
        .collect()
}

fn main() -> Result<(), FigureError> {
    init_logging();
    let output = cli::output_path();

    let mut figure =
        roofline_axes((-4, 0), (-3, 3)).with_title("Hamilton node single-core roofline");

    let domain = pow2_domain(-6, 8);
    let roofline = Roofline::new(STREAM_TRIAD, PEAK_FLOPS);
    for factor in [1.0, 2.0, 4.0, 16.0] {
        figure.add_roofline(&roofline.scaled_peak(factor), &domain);
    }

    let ceilings = [
        (format!("2 AVX FMA/cycle: {:.0} Gflop/s", PEAK_FLOPS), 1.0),
        (format!("1 AVX FMA/cycle {:.0} Gflop/s", PEAK_FLOPS / 2.0), 2.0),
        (
            format!("1 AVX MUL or 1 AVX ADD/cycle {:.0} Gflop/s", PEAK_FLOPS / 4.0),
            4.0,
        ),
    ];
    figure.add_annotation(
        Annotation::new(
            format!("Triad BW {:.0} GB/s", STREAM_TRIAD),
            2f64.powf(-2.8),
            STREAM_TRIAD * 2f64.powf(-2.3),
        )
        .rotation(20.0),
    );
    for (text, factor) in ceilings {
        figure.add_annotation(
            Annotation::new(text, 2f64.powf(7.5), PEAK_FLOPS * 1.15 / factor)
                .align(HAlign::Right, VAlign::Bottom),
        );
    }
    figure.add_annotation(
        Annotation::new(
            format!("1 scalar op/cycle {:.0} Gflop/s", PEAK_FLOPS / 16.0),
            1.0,
            PEAK_FLOPS * 1.15 / 16.0,
        )
        .align(HAlign::Right, VAlign::Bottom),
    );

    let intensity: Vec<f64> = O0
        .iter()
        .map(|(rows, columns, _)| arithmetic_intensity(*rows, *columns))
        .collect();
    figure
        .add_series(Series::scatter(measurements(&intensity, &O0), Marker::Circle).label("O0"))
        .add_series(
            Series::scatter(measurements(&intensity, &O3), Marker::TriangleRight).label("O3"),
        )
        .add_series(
            Series::scatter(measurements(&intensity, &O3_BLOCKED), Marker::TriangleRight)
                .label("O3 blocked"),
        );

    save(&figure, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_from_shape() {
        let expected = 2e7 / (8.0 * (20000.0 + 1000.0 + 1e7));
        assert!((arithmetic_intensity(1000, 10000) - expected).abs() < 1e-15);
        assert!((arithmetic_intensity(1000, 10000) - 0.24948).abs() < 1e-4);
    }

    #[test]
    fn intensity_approaches_quarter() {
        let intensity: Vec<f64> = O0
            .iter()
            .map(|(rows, columns, _)| arithmetic_intensity(*rows, *columns))
            .collect();
        assert!(intensity.iter().tuple_windows().all(|(a, b)| a < b));
        assert!(intensity.iter().all(|x| *x < 0.25));
    }

    #[test]
    fn throughput_in_gflops() {
        let intensity = [0.2; 7];
        let points = measurements(&intensity, &O3);
        assert_eq!(points[0].0, 0.2);
        assert!((points[0].1 - 3.236).abs() < 1e-12);
        assert_eq!(points.len(), 7);
    }
}
