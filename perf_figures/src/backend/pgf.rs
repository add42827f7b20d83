use crate::FigureError;
use crate::backend::Backend;
use chart_model::{
    Annotation, Color, Corner, Figure, HAlign, Legend, LineStyle, Marker, Scale, Series, VAlign,
};
use log::{debug, info};
use pgfplots::axis::plot::coordinate::Coordinate2D;
use pgfplots::axis::plot::{Plot2D, PlotKey};
use pgfplots::axis::{Axis, AxisKey};
use pgfplots::{Engine, Picture};
use std::path::Path;

/**
 * pgfplots output.
 *
 * Log axes are left to pgfplots (`xmode=log, log basis x=2`), so coordinates are written in
 * data space. `.tex` gets the standalone source, `.pdf` additionally goes through pdflatex.
 */
pub struct PgfBackend {
    compile: bool,
}

impl PgfBackend {
    pub fn source() -> Self {
        Self { compile: false }
    }

    pub fn compiled() -> Self {
        Self { compile: true }
    }
}

impl Backend for PgfBackend {
    fn render(&self, figure: &Figure, output: &Path) -> Result<(), FigureError> {
        let picture = picture(figure);
        if !self.compile {
            return std::fs::write(output, picture.standalone_string()).map_err(|source| {
                FigureError::Io {
                    path: output.to_path_buf(),
                    source,
                }
            });
        }

        let folder = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let jobname = output
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| FigureError::UnsupportedFormat(output.to_path_buf()))?;
        let pdf = picture
            .to_pdf(folder, jobname, Engine::PdfLatex)
            .map_err(|e| FigureError::Latex(format!("{:?}", e)))?;
        info!("pdflatex produced {}", pdf.display());
        finish_pdf(&pdf, output)
    }
}

/// pdflatex leaves `<jobname>.aux` and `<jobname>.log` next to its output, and always writes a
/// lower case `.pdf`.
fn finish_pdf(produced: &Path, output: &Path) -> Result<(), FigureError> {
    for extension in ["aux", "log"] {
        let side_file = produced.with_extension(extension);
        match std::fs::remove_file(&side_file) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                debug!("Could not remove {}: {}", side_file.display(), e);
            }
            _ => {}
        }
    }
    if produced != output {
        std::fs::rename(produced, output).map_err(|source| FigureError::Io {
            path: output.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

pub fn picture(figure: &Figure) -> Picture {
    let mut axis = Axis::new();
    if let Some(title) = &figure.title {
        axis.set_title(escape(title).as_str());
    }
    for key in axis_keys(figure) {
        axis.add_key(AxisKey::Custom(key));
    }

    let colors = figure.series_colors();
    for index in figure.drawing_order() {
        let series = &figure.series[index];
        axis.plots.push(series_plot(figure, series, colors[index]));
    }

    let (x_lo, x_hi) = figure.x_limits();
    for line in &figure.reference_lines {
        let mut plot = Plot2D::new();
        plot.coordinates = vec![
            Coordinate2D::from((x_lo, line.y)),
            Coordinate2D::from((x_hi, line.y)),
        ];
        plot.add_key(PlotKey::Custom(format!(
            "{}, {}, line width={}pt, no markers{}",
            color_key(line.color),
            dash_key(line.style),
            figure.style.line_width,
            if line.label.is_some() { "" } else { ", forget plot" },
        )));
        axis.plots.push(plot);
    }

    let rect = figure.plot_rect();
    for annotation in &figure.annotations {
        let inside = figure
            .to_plot_space(annotation.at)
            .is_some_and(|p| rect.contains(p));
        if !inside {
            debug!("Annotation {:?} lies outside the axes", annotation.text);
            continue;
        }
        axis.add_key(AxisKey::Custom(format!(
            "after end axis/.append code={{{}}}",
            annotation_node(figure, annotation)
        )));
    }

    Picture::from(axis)
}

fn axis_keys(figure: &Figure) -> Vec<String> {
    let style = &figure.style;
    let mut keys = vec![
        format!("width={}in, height={}in", style.size.0, style.size.1),
        format!(
            "font=\\fontsize{{{0}}}{{{1}}}\\selectfont",
            style.font_size,
            style.font_size * 1.2
        ),
        String::from("tick align=outside, tick pos=left, axis on top"),
    ];

    for (name, axis, (lo, hi)) in [
        ("x", &figure.x_axis, figure.x_limits()),
        ("y", &figure.y_axis, figure.y_limits()),
    ] {
        if let Some(label) = &axis.label {
            keys.push(format!("{}label={{{}}}", name, escape(label)));
        }
        if axis.scale == Scale::Log2 {
            keys.push(format!("{0}mode=log, log basis {0}=2", name));
        }
        keys.push(format!("{0}min={1}, {0}max={2}", name, lo, hi));
    }

    let labels: Vec<String> = figure
        .legend_entries()
        .into_iter()
        .map(|entry| format!("{{{}}}", escape(&entry.label)))
        .collect();
    if !labels.is_empty() {
        match figure.legend {
            Legend::Hidden => {}
            Legend::Above { columns } => {
                // transposed, so pgfplots fills columns first and counts rows here
                let rows = labels.len().div_ceil(columns.max(1));
                keys.push(format!(
                    "legend style={{at={{(0.5,1.03)}}, anchor=south, draw=none, legend columns={}, /tikz/every even column/.append style={{column sep=1em}}}}, transpose legend",
                    rows
                ));
                keys.push(format!("legend entries={{{}}}", labels.join(",")));
            }
            Legend::Inside => {
                let position = match figure.legend_corner(0.4, 0.35) {
                    Corner::UpperRight => "north east",
                    Corner::UpperLeft => "north west",
                    Corner::LowerLeft => "south west",
                    Corner::LowerRight => "south east",
                };
                keys.push(format!("legend pos={}", position));
                keys.push(format!("legend entries={{{}}}", labels.join(",")));
            }
        }
    }
    keys
}

fn series_plot(figure: &Figure, series: &Series, color: Color) -> Plot2D {
    let mut plot = Plot2D::new();
    plot.coordinates = series
        .points
        .iter()
        .map(|p| Coordinate2D::from(*p))
        .collect();

    let mut keys = vec![
        color_key(color),
        format!("line width={}pt", figure.series_width(series)),
    ];
    match series.line {
        Some(line) => keys.push(String::from(dash_key(line))),
        None => keys.push(String::from("only marks")),
    }
    match series.marker {
        Some(marker) => {
            keys.push(String::from(mark_key(marker)));
            keys.push(format!("mark size={}pt", figure.style.marker_size / 2.0));
        }
        None => keys.push(String::from("no markers")),
    }
    if series.label.is_none() {
        keys.push(String::from("forget plot"));
    }
    plot.add_key(PlotKey::Custom(keys.join(", ")));
    plot
}

fn annotation_node(figure: &Figure, annotation: &Annotation) -> String {
    let anchor = match (annotation.v_align, annotation.h_align) {
        (VAlign::Bottom, HAlign::Left) => "south west",
        (VAlign::Bottom, HAlign::Center) => "south",
        (VAlign::Bottom, HAlign::Right) => "south east",
        (VAlign::Center, HAlign::Left) => "west",
        (VAlign::Center, HAlign::Center) => "center",
        (VAlign::Center, HAlign::Right) => "east",
        (VAlign::Top, HAlign::Left) => "north west",
        (VAlign::Top, HAlign::Center) => "north",
        (VAlign::Top, HAlign::Right) => "north east",
    };
    let mut options = vec![format!("anchor={}", anchor), String::from("inner sep=2pt")];
    if annotation.rotation != 0.0 {
        options.push(format!("rotate={}", annotation.rotation));
    }
    if annotation.boxed {
        options.push(format!(
            "fill={}, fill opacity={}, text opacity=1",
            xcolor(figure.style.annotation_fill),
            figure.style.annotation_opacity
        ));
    }
    format!(
        "\\node[{}] at (axis cs:{},{}) {{{}}};",
        options.join(", "),
        annotation.at.0,
        annotation.at.1,
        escape(&annotation.text)
    )
}

fn xcolor(color: Color) -> String {
    format!(
        "{{rgb,255:red,{};green,{};blue,{}}}",
        color.r, color.g, color.b
    )
}

fn color_key(color: Color) -> String {
    format!("color={}", xcolor(color))
}

fn dash_key(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Solid => "solid",
        LineStyle::Dashed => "dashed",
        LineStyle::Dotted => "dotted",
        LineStyle::DashDot => "dashdotted",
    }
}

fn mark_key(marker: Marker) -> &'static str {
    match marker {
        Marker::Circle => "mark=*",
        Marker::TriangleRight => "mark=triangle*, mark options={rotate=-90}",
        Marker::TriangleLeft => "mark=triangle*, mark options={rotate=90}",
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_model::{Axis as FigureAxis, ReferenceLine, Roofline, pow2_domain};

    fn roofline_figure() -> Figure {
        let mut figure = Figure::new(
            FigureAxis::log2().label("Arithmetic intensity [FLOPs/byte]").limits(0.0625, 128.0),
            FigureAxis::log2().limits(0.125, 64.0),
        )
        .with_legend(Legend::Above { columns: 2 });
        figure.add_roofline(&Roofline::new(12.0, 48.0), &pow2_domain(-4, 7));
        figure
            .add_series(Series::point(21.32, 1.831, Marker::Circle).label("Original"))
            .add_series(
                Series::point(0.0833, 1.831, Marker::TriangleLeft).label("Pessimal cache"),
            )
            .add_annotation(Annotation::new("100% of 46 Gflop/s", 1.0, 50.0))
            .add_annotation(Annotation::new("off the chart", 1024.0, 50.0));
        figure
    }

    #[test]
    fn pdf_side_files_removed() {
        let dir = tempfile::tempdir().unwrap();
        let produced = dir.path().join("roofline.pdf");
        for name in ["roofline.pdf", "roofline.aux", "roofline.log", "roofline.tex"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        finish_pdf(&produced, &produced).unwrap();
        assert!(produced.exists());
        assert!(!dir.path().join("roofline.aux").exists());
        assert!(!dir.path().join("roofline.log").exists());
        assert!(dir.path().join("roofline.tex").exists());
    }

    #[test]
    fn pdf_renamed_to_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let produced = dir.path().join("roofline.pdf");
        let output = dir.path().join("Roofline-final.PDF");
        std::fs::write(&produced, b"%PDF").unwrap();
        finish_pdf(&produced, &output).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"%PDF");
        assert!(!produced.exists());
    }

    #[test]
    fn escapes_tex() {
        assert_eq!(escape("100% & $x_1$"), "100\\% \\& \\$x\\_1\\$");
        assert_eq!(escape("Tiling + vectorise"), "Tiling + vectorise");
    }

    #[test]
    fn source_contents() {
        let source = picture(&roofline_figure()).standalone_string();
        assert!(source.contains("xmode=log, log basis x=2"));
        assert!(source.contains("ymode=log, log basis y=2"));
        assert!(source.contains("xmin=0.0625, xmax=128"));
        assert!(source.contains("legend entries={{Original},{Pessimal cache}}"));
        assert!(source.contains("transpose legend"));
        assert!(source.contains("forget plot"));
        assert!(source.contains("mark options={rotate=90}"));
        assert!(source.contains("100\\% of 46 Gflop/s"));
        assert!(!source.contains("off the chart"));
    }

    #[test]
    fn reference_lines_span_axis() {
        let x_axis = FigureAxis::log2().limits(1024.0, 2048.0);
        let mut figure = Figure::new(x_axis, FigureAxis::linear()).with_legend(Legend::Inside);
        figure.add_series(Series::line([(1024.0, 1.0), (2048.0, 2.0)]).label("SIMD (AVX)"));
        figure.add_reference_line(
            ReferenceLine::new(3.0, Color::RED, LineStyle::Dashed).label("L1 Peak"),
        );
        let source = picture(&figure).standalone_string();
        assert!(source.contains("dashed"));
        assert!(source.contains("legend pos="));
        assert!(source.contains("legend entries={{SIMD (AVX)},{L1 Peak}}"));
    }
}
