use chart_model::{
    Annotation, Figure, HAlign, LineStyle, Marker, Roofline, Series, VAlign, pow2_domain,
};
use perf_figures::{FigureError, cli, init_logging, roofline_axes, save};

const STREAM_TRIAD: f64 = 11.6; // GB/s
const PEAK_FLOPS: f64 = 46.4; // GFLOP/s

fn figure() -> Figure {
    let mut figure =
        roofline_axes((-6, 8), (-3, 7)).with_title("Hamilton node single-core roofline");

    let domain = pow2_domain(-6, 8);
    let roofline = Roofline::new(STREAM_TRIAD, PEAK_FLOPS);
    for factor in [1.0, 16.0] {
        figure.add_roofline(&roofline.scaled_peak(factor), &domain);
    }

    figure
        .add_annotation(
            Annotation::new(
                format!("Triad BW {:.0} GB/s", STREAM_TRIAD),
                2f64.powf(-2.8),
                STREAM_TRIAD * 2f64.powf(-2.3),
            )
            .rotation(37.0),
        )
        .add_annotation(
            Annotation::new(
                format!("Best case vectorised: {:.0} Gflop/s", PEAK_FLOPS),
                2f64.powf(7.5),
                PEAK_FLOPS * 1.15,
            )
            .align(HAlign::Right, VAlign::Bottom),
        )
        .add_annotation(
            Annotation::new(
                format!("Scalar code: {:.0} Gflop/s", PEAK_FLOPS / 16.0),
                2f64.powf(7.5),
                PEAK_FLOPS * 1.15 / 16.0,
            )
            .align(HAlign::Right, VAlign::Bottom),
        );

    // single points, but the legend handles still carry a line through the marker
    for (label, x, y, marker) in [
        ("Code A", 2.0 / 32.0, 0.72, Marker::Circle),
        ("Code B", 1.0, 5.0, Marker::TriangleRight),
        ("Code C", 16.0, 0.83, Marker::TriangleLeft),
    ] {
        figure.add_series(
            Series::point(x, y, marker)
                .line_style(LineStyle::Solid)
                .label(label),
        );
    }
    figure
}

fn main() -> Result<(), FigureError> {
    init_logging();
    let output = cli::output_path();
    save(&figure(), output)
}
