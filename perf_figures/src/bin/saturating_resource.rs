use chart_model::{Axis, Figure, Marker, Series};
use perf_figures::{FigureError, cli, init_logging, save};

/// (cores, performance): throughput levels off once a shared resource is exhausted.
const DATA: [(f64, f64); 8] = [
    (1.0, 3.0),
    (2.0, 6.0),
    (3.0, 8.0),
    (4.0, 9.0),
    (5.0, 9.4),
    (6.0, 9.5),
    (7.0, 9.55),
    (8.0, 9.56),
];

fn main() -> Result<(), FigureError> {
    init_logging();
    let output = cli::output_path();

    let mut figure = Figure::new(
        Axis::linear().label("Cores"),
        Axis::linear().label("Performance (arbitrary units)"),
    );
    figure.add_series(Series::line(DATA).marker(Marker::Circle));

    save(&figure, output)
}
