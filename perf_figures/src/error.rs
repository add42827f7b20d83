use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("no back end renders {} (expected png, bmp, jpg, svg, tex or pdf)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("drawing failed: {0}")]
    Render(String),
    #[error("LaTeX compilation failed: {0}")]
    Latex(String),
}

// plotters errors are generic over the drawing back end; only the message is kept.
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for FigureError {
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        FigureError::Render(error.to_string())
    }
}
