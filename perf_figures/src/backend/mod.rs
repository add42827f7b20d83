use crate::FigureError;
use chart_model::Figure;
use std::fmt::{Display, Formatter};
use std::path::Path;

mod canvas;
mod pgf;

pub use canvas::{CanvasBackend, CanvasKind};
pub use pgf::PgfBackend;

pub trait Backend {
    fn render(&self, figure: &Figure, output: &Path) -> Result<(), FigureError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Bmp,
    Jpeg,
    Svg,
    Tex,
    Pdf,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, FigureError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("png") => Ok(Format::Png),
            Some("bmp") => Ok(Format::Bmp),
            Some("jpg") | Some("jpeg") => Ok(Format::Jpeg),
            Some("svg") => Ok(Format::Svg),
            Some("tex") => Ok(Format::Tex),
            Some("pdf") => Ok(Format::Pdf),
            _ => Err(FigureError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Format::Png | Format::Bmp | Format::Jpeg => {
                Box::new(CanvasBackend::new(CanvasKind::Bitmap))
            }
            Format::Svg => Box::new(CanvasBackend::new(CanvasKind::Svg)),
            Format::Tex => Box::new(PgfBackend::source()),
            Format::Pdf => Box::new(PgfBackend::compiled()),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Png => "PNG",
            Format::Bmp => "BMP",
            Format::Jpeg => "JPEG",
            Format::Svg => "SVG",
            Format::Tex => "pgfplots",
            Format::Pdf => "PDF",
        };
        write!(f, "{}", name)
    }
}
