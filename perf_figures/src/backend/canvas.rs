use crate::FigureError;
use crate::backend::Backend;
use chart_model::geometry::{clip_polyline, dash_segments};
use chart_model::{
    Annotation, Corner, Figure, FigureStyle, HAlign, Legend, LegendEntry, LineStyle, Marker, Point,
    Rect, Scale, VAlign,
};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const FONT_FAMILY: &str = "sans-serif";
const LEGEND_BORDER: RGBColor = RGBColor(204, 204, 204);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasKind {
    Bitmap,
    Svg,
}

/**
 * plotters output, raster or SVG.
 *
 * The mesh is built over plotting space (exponents on log axes). Everything else is drawn in
 * pixels on the root area, so dashes keep their length whatever the axis scales.
 */
pub struct CanvasBackend {
    kind: CanvasKind,
}

impl CanvasBackend {
    pub fn new(kind: CanvasKind) -> Self {
        Self { kind }
    }
}

impl Backend for CanvasBackend {
    fn render(&self, figure: &Figure, output: &Path) -> Result<(), FigureError> {
        let size = figure.style.pixel_size();
        match self.kind {
            CanvasKind::Bitmap => {
                // no alpha channel
                let root = BitMapBackend::new(output, size).into_drawing_area();
                root.fill(&WHITE)?;
                draw(figure, &root)?;
                root.present()?;
            }
            CanvasKind::Svg => {
                let root = SVGBackend::new(output, size).into_drawing_area();
                if !figure.style.transparent {
                    root.fill(&WHITE)?;
                }
                draw(figure, &root)?;
                root.present()?;
            }
        }
        Ok(())
    }
}

/************
 * Geometry *
 ************/

/// Where the axes rectangle landed in pixels.
#[derive(Debug, Clone, Copy)]
struct Frame {
    rect: Rect,
    /// Left, right.
    x: (f64, f64),
    /// Bottom, top: pixel rows grow downwards.
    y: (f64, f64),
}

impl Frame {
    fn to_pixel(&self, point: Point) -> Point {
        (
            interpolate(self.rect.x, self.x, point.0),
            interpolate(self.rect.y, self.y, point.1),
        )
    }

    fn width(&self) -> f64 {
        self.x.1 - self.x.0
    }

    fn height(&self) -> f64 {
        self.y.0 - self.y.1
    }
}

fn interpolate(from: (f64, f64), to: (f64, f64), value: f64) -> f64 {
    let span = from.1 - from.0;
    let t = if span == 0.0 {
        0.5
    } else {
        (value - from.0) / span
    };
    to.0 + (to.1 - to.0) * t
}

fn to_backend(point: Point) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}

fn stroke_pixels(style: &FigureStyle, points: f64) -> u32 {
    style.points_to_pixels(points).round().max(1.0) as u32
}

fn rgb(color: chart_model::Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn font(style: &FigureStyle, scale: f64) -> FontDesc<'static> {
    (FONT_FAMILY, style.points_to_pixels(style.font_size * scale)).into_font()
}

/*********
 * Ticks *
 *********/

/// Log axes live in exponent space, so integral positions are powers of two.
fn tick_label(scale: Scale, value: f64) -> String {
    match scale {
        Scale::Log2 => {
            let exponent = value.round();
            if (value - exponent).abs() > 1e-6 {
                String::new()
            } else {
                format!("2^{}", exponent as i64)
            }
        }
        Scale::Linear => {
            let rounded = (value * 1e6).round() / 1e6;
            if rounded == 0.0 {
                String::from("0")
            } else {
                format!("{}", rounded)
            }
        }
    }
}

fn tick_count(scale: Scale, (lo, hi): (f64, f64)) -> usize {
    match scale {
        Scale::Log2 => ((hi.floor() - lo.ceil()).max(0.0) as usize + 1).clamp(2, 16),
        Scale::Linear => 10,
    }
}

/**********
 * Legend *
 **********/

/// Entries fill the legend column by column.
#[derive(Debug, Clone, PartialEq)]
struct LegendLayout {
    rows: usize,
    handle: f64,
    gap: f64,
    spacing: f64,
    row_height: f64,
    label_widths: Vec<f64>,
}

impl LegendLayout {
    fn measure<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        text: &TextStyle,
        entries: &[LegendEntry],
        columns: usize,
        style: &FigureStyle,
    ) -> Result<Self, FigureError> {
        let columns = columns.clamp(1, entries.len().max(1));
        let rows = entries.len().div_ceil(columns).max(1);
        let mut label_widths = vec![0.0; entries.len().div_ceil(rows)];
        for (index, entry) in entries.iter().enumerate() {
            let (width, _) = area.estimate_text_size(&entry.label, text)?;
            let column = index / rows;
            label_widths[column] = f64::max(label_widths[column], width as f64);
        }
        let font_px = style.points_to_pixels(style.font_size);
        Ok(Self {
            rows,
            handle: 2.0 * font_px,
            gap: 0.5 * font_px,
            spacing: font_px,
            row_height: 1.4 * font_px,
            label_widths,
        })
    }

    fn column_width(&self, column: usize) -> f64 {
        self.handle + self.gap + self.label_widths[column]
    }

    fn width(&self) -> f64 {
        let columns = self.label_widths.len();
        (0..columns).map(|c| self.column_width(c)).sum::<f64>()
            + self.spacing * columns.saturating_sub(1) as f64
    }

    fn height(&self) -> f64 {
        self.rows as f64 * self.row_height
    }

    /// Top left corner of entry `index`'s cell.
    fn cell(&self, origin: Point, index: usize) -> Point {
        let (column, row) = (index / self.rows, index % self.rows);
        let x = (0..column)
            .map(|c| self.column_width(c) + self.spacing)
            .sum::<f64>();
        (origin.0 + x, origin.1 + row as f64 * self.row_height)
    }
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    layout: &LegendLayout,
    entries: &[LegendEntry],
    origin: Point,
    text: &TextStyle,
    style: &FigureStyle,
) -> Result<(), FigureError> {
    let radius = style.points_to_pixels(style.marker_size) / 2.0;
    for (index, entry) in entries.iter().enumerate() {
        let (x, y) = layout.cell(origin, index);
        let middle = y + layout.row_height / 2.0;
        let color = rgb(entry.color);
        if let Some(line) = entry.line {
            let handle = [(x, middle), (x + layout.handle, middle)];
            draw_polyline(area, &handle, line, stroke_pixels(style, entry.line_width), color)?;
        }
        if let Some(marker) = entry.marker {
            draw_marker(area, (x + layout.handle / 2.0, middle), marker, radius, color)?;
        }
        let (_, height) = area.estimate_text_size(&entry.label, text)?;
        let label = (x + layout.handle + layout.gap, middle - height as f64 / 2.0);
        area.draw_text(&entry.label, text, to_backend(label))?;
    }
    Ok(())
}

/***********
 * Drawing *
 ***********/

fn draw<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), FigureError> {
    let style = &figure.style;
    let font_px = style.points_to_pixels(style.font_size);
    let text = TextStyle::from(font(style, 1.0)).color(&BLACK);
    let entries = figure.legend_entries();

    let mut legend_above = None;
    let body = match figure.legend {
        Legend::Above { columns } if !entries.is_empty() => {
            let layout = LegendLayout::measure(root, &text, &entries, columns, style)?;
            let strip = layout.height() + font_px;
            legend_above = Some(layout);
            root.split_vertically(strip.round() as i32).1
        }
        _ => root.clone(),
    };

    let rect = figure.plot_rect();
    debug!(
        "Axes limits x {:?}, y {:?}",
        figure.x_limits(),
        figure.y_limits()
    );
    let has_x_label = figure.x_axis.label.is_some();
    let has_y_label = figure.y_axis.label.is_some();
    let mut builder = ChartBuilder::on(&body);
    builder
        .margin((font_px * 0.6).round() as i32)
        .x_label_area_size((font_px * if has_x_label { 3.2 } else { 1.8 }).round() as i32)
        .y_label_area_size((font_px * if has_y_label { 4.5 } else { 3.0 }).round() as i32);
    if let Some(title) = &figure.title {
        builder.caption(title, font(style, 1.0));
    }
    let mut chart = builder.build_cartesian_2d(rect.x.0..rect.x.1, rect.y.0..rect.y.1)?;

    let x_scale = figure.x_axis.scale;
    let y_scale = figure.y_axis.scale;
    let x_format = |value: &f64| tick_label(x_scale, *value);
    let y_format = |value: &f64| tick_label(y_scale, *value);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(tick_count(x_scale, rect.x))
        .y_labels(tick_count(y_scale, rect.y))
        .x_label_formatter(&x_format)
        .y_label_formatter(&y_format)
        .label_style(font(style, 0.85))
        .axis_desc_style(font(style, 1.0));
    if let Some(label) = &figure.x_axis.label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &figure.y_axis.label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()?;

    let (pixels_x, pixels_y) = chart.plotting_area().get_pixel_range();
    let frame = Frame {
        rect,
        x: (pixels_x.start as f64, pixels_x.end as f64),
        y: (pixels_y.end as f64, pixels_y.start as f64),
    };

    draw_series(figure, root, &frame)?;
    draw_reference_lines(figure, root, &frame)?;
    for annotation in &figure.annotations {
        let Some(anchor) = figure
            .to_plot_space(annotation.at)
            .filter(|p| rect.contains(*p))
        else {
            debug!("Annotation {:?} lies outside the axes", annotation.text);
            continue;
        };
        if annotation.rotation != 0.0 {
            debug!("Annotation {:?} drawn unrotated", annotation.text);
        }
        draw_annotation(root, annotation, frame.to_pixel(anchor), &text, style)?;
    }

    if let Some(layout) = legend_above {
        let (width, _) = root.dim_in_pixel();
        let origin = ((width as f64 - layout.width()) / 2.0, font_px / 2.0);
        draw_legend(root, &layout, &entries, origin, &text, style)?;
    } else if figure.legend == Legend::Inside && !entries.is_empty() {
        let layout = LegendLayout::measure(root, &text, &entries, 1, style)?;
        let pad = font_px / 2.0;
        let (width, height) = (layout.width() + 2.0 * pad, layout.height() + 2.0 * pad);
        let corner = figure.legend_corner(width / frame.width(), height / frame.height());
        let left = match corner {
            Corner::UpperLeft | Corner::LowerLeft => frame.x.0 + pad,
            Corner::UpperRight | Corner::LowerRight => frame.x.1 - pad - width,
        };
        let top = match corner {
            Corner::UpperLeft | Corner::UpperRight => frame.y.1 + pad,
            Corner::LowerLeft | Corner::LowerRight => frame.y.0 - pad - height,
        };
        let corners = [to_backend((left, top)), to_backend((left + width, top + height))];
        root.draw(&Rectangle::new(corners, WHITE.mix(0.8).filled()))?;
        root.draw(&Rectangle::new(corners, LEGEND_BORDER.stroke_width(1)))?;
        draw_legend(root, &layout, &entries, (left + pad, top + pad), &text, style)?;
    }
    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    figure: &Figure,
    area: &DrawingArea<DB, Shift>,
    frame: &Frame,
) -> Result<(), FigureError> {
    let style = &figure.style;
    let radius = style.points_to_pixels(style.marker_size) / 2.0;
    let colors = figure.series_colors();
    for index in figure.drawing_order() {
        let series = &figure.series[index];
        let color = rgb(colors[index]);
        let points: Vec<Point> = series
            .points
            .iter()
            .filter_map(|p| figure.to_plot_space(*p))
            .collect();
        if let Some(line) = series.line {
            let width = stroke_pixels(style, figure.series_width(series));
            for run in clip_polyline(&points, &frame.rect) {
                let pixels: Vec<Point> = run.iter().map(|p| frame.to_pixel(*p)).collect();
                draw_polyline(area, &pixels, line, width, color)?;
            }
        }
        if let Some(marker) = series.marker {
            for point in points.iter().filter(|p| frame.rect.contains(**p)) {
                draw_marker(area, frame.to_pixel(*point), marker, radius, color)?;
            }
        }
    }
    Ok(())
}

fn draw_reference_lines<DB: DrawingBackend>(
    figure: &Figure,
    area: &DrawingArea<DB, Shift>,
    frame: &Frame,
) -> Result<(), FigureError> {
    let width = stroke_pixels(&figure.style, figure.style.line_width);
    for line in &figure.reference_lines {
        let y = figure
            .y_axis
            .scale
            .forward(line.y)
            .filter(|y| (frame.rect.y.0..=frame.rect.y.1).contains(y));
        let Some(y) = y else {
            debug!("Reference line at {} lies outside the axes", line.y);
            continue;
        };
        let pixels = [
            frame.to_pixel((frame.rect.x.0, y)),
            frame.to_pixel((frame.rect.x.1, y)),
        ];
        draw_polyline(area, &pixels, line.style, width, rgb(line.color))?;
    }
    Ok(())
}

fn draw_polyline<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    pixels: &[Point],
    line: LineStyle,
    width: u32,
    color: RGBColor,
) -> Result<(), FigureError> {
    let pattern: Vec<f64> = line
        .dash_pattern()
        .iter()
        .map(|length| length * width as f64)
        .collect();
    for dash in dash_segments(pixels, &pattern) {
        let dash: Vec<(i32, i32)> = dash.into_iter().map(to_backend).collect();
        area.draw(&PathElement::new(dash, color.stroke_width(width)))?;
    }
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    center: Point,
    marker: Marker,
    radius: f64,
    color: RGBColor,
) -> Result<(), FigureError> {
    let (x, y) = center;
    let direction = match marker {
        Marker::Circle => {
            let size = radius.round() as i32;
            area.draw(&Circle::new(to_backend(center), size, color.filled()))?;
            return Ok(());
        }
        Marker::TriangleRight => 1.0,
        Marker::TriangleLeft => -1.0,
    };
    let half_height = radius * 3f64.sqrt() / 2.0;
    let vertices = vec![
        to_backend((x + direction * radius, y)),
        to_backend((x - direction * radius / 2.0, y - half_height)),
        to_backend((x - direction * radius / 2.0, y + half_height)),
    ];
    area.draw(&Polygon::new(vertices, color.filled()))?;
    Ok(())
}

fn draw_annotation<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    annotation: &Annotation,
    anchor: Point,
    text: &TextStyle,
    style: &FigureStyle,
) -> Result<(), FigureError> {
    let (width, height) = area.estimate_text_size(&annotation.text, text)?;
    let (width, height) = (width as f64, height as f64);
    let left = match annotation.h_align {
        HAlign::Left => anchor.0,
        HAlign::Center => anchor.0 - width / 2.0,
        HAlign::Right => anchor.0 - width,
    };
    let top = match annotation.v_align {
        VAlign::Top => anchor.1,
        VAlign::Center => anchor.1 - height / 2.0,
        VAlign::Bottom => anchor.1 - height,
    };
    if annotation.boxed {
        let pad = style.points_to_pixels(3.0);
        let fill = rgb(style.annotation_fill).mix(style.annotation_opacity);
        let corners = [
            to_backend((left - pad, top - pad)),
            to_backend((left + width + pad, top + height + pad)),
        ];
        area.draw(&Rectangle::new(corners, fill.filled()))?;
    }
    area.draw_text(&annotation.text, text, to_backend((left, top)))?;
    Ok(())
}
