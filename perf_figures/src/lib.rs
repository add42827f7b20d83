#![deny(unsafe_code)]

/*!
Figure generators for performance engineering slides.

Each binary in `src/bin` builds one [`chart_model::Figure`] from literal measurements and hands it
to [`save`], which picks a back end from the output extension.
*/

use chart_model::{Axis, Figure, Legend};
use log::{error, info};
use std::path::Path;

pub mod backend;
pub mod cli;
mod error;

pub use backend::Format;
pub use error::FigureError;

/// `RUST_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Log-log roofline axes over `2^x.0 ..= 2^x.1` and `2^y.0 ..= 2^y.1`, legend above in two columns.
pub fn roofline_axes(x: (i32, i32), y: (i32, i32)) -> Figure {
    Figure::new(
        Axis::log2()
            .label("Arithmetic intensity [FLOPs/byte]")
            .limits(2f64.powi(x.0), 2f64.powi(x.1)),
        Axis::log2()
            .label("Double precision GFLOPs/s")
            .limits(2f64.powi(y.0), 2f64.powi(y.1)),
    )
    .with_legend(Legend::Above { columns: 2 })
}

pub fn save(figure: &Figure, output: impl AsRef<Path>) -> Result<(), FigureError> {
    let output = output.as_ref();
    let format = Format::from_path(output)?;
    info!("Rendering {} with the {} back end", output.display(), format);
    format.backend().render(figure, output).map_err(|e| {
        error!("Failed to render {}: {}", output.display(), e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_model::{Marker, Series};

    #[test]
    fn unsupported_extension_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("figure.gif");
        let figure = Figure::new(Axis::linear(), Axis::linear());
        let result = save(&figure, &output);
        assert!(matches!(result, Err(FigureError::UnsupportedFormat(_))));
        assert!(!output.exists());
    }

    #[test]
    fn tex_source_written() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("figure.tex");
        let mut figure = Figure::new(Axis::linear(), Axis::linear());
        figure.add_series(Series::point(1.0, 2.0, Marker::Circle).label("Point"));
        save(&figure, &output).unwrap();
        let source = std::fs::read_to_string(&output).unwrap();
        assert!(source.contains("\\begin{axis}"));
        assert!(!source.contains("legend entries"));
    }

    #[test]
    fn roofline_axes_limits() {
        let figure = roofline_axes((-4, 7), (-3, 6));
        assert_eq!(figure.x_limits(), (0.0625, 128.0));
        assert_eq!(figure.y_limits(), (0.125, 64.0));
        assert_eq!(figure.legend, Legend::Above { columns: 2 });
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("figure.tex");
        let figure = Figure::new(Axis::linear(), Axis::linear());
        assert!(matches!(save(&figure, &output), Err(FigureError::Io { .. })));
    }
}
