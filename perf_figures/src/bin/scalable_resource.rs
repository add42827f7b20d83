use chart_model::{Axis, Figure, Marker, Series};
use perf_figures::{FigureError, cli, init_logging, save};

const DATA: [(f64, f64); 8] = [
    (1.0, 1.5),
    (2.0, 3.0),
    (3.0, 4.5),
    (4.0, 6.0),
    (5.0, 7.5),
    (6.0, 9.0),
    (7.0, 10.5),
    (8.0, 12.0),
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
