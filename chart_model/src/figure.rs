use crate::geometry::{Point, Rect, least_crowded, resolve_limits};
use crate::roofline::Roofline;
use crate::style::{Color, FigureStyle, HAlign, LineStyle, Marker, VAlign, cycle_color};

/********
 * Axes *
 ********/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log2,
}

impl Scale {
    /// Data space to plotting space. `None` for values a log axis cannot show.
    pub fn forward(self, value: f64) -> Option<f64> {
        match self {
            Scale::Linear => Some(value),
            Scale::Log2 if value > 0.0 => Some(value.log2()),
            Scale::Log2 => None,
        }
    }

    pub fn inverse(self, value: f64) -> f64 {
        match self {
            Scale::Linear => value,
            Scale::Log2 => value.exp2(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub scale: Scale,
    pub label: Option<String>,
    pub limits: Option<(f64, f64)>,
}

impl Axis {
    pub fn linear() -> Self {
        Self {
            scale: Scale::Linear,
            label: None,
            limits: None,
        }
    }

    pub fn log2() -> Self {
        Self {
            scale: Scale::Log2,
            ..Self::linear()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn limits(mut self, lo: f64, hi: f64) -> Self {
        self.limits = Some((lo, hi));
        self
    }
}

/**********
 * Series *
 **********/

/// Series on the background layer are drawn before everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Data,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<Point>,
    pub marker: Option<Marker>,
    pub line: Option<LineStyle>,
    pub color: Option<Color>,
    pub line_width: Option<f64>,
    pub layer: Layer,
}

impl Series {
    /// Markers only, no connecting line.
    pub fn scatter(points: impl IntoIterator<Item = Point>, marker: Marker) -> Self {
        Self {
            label: None,
            points: points.into_iter().collect(),
            marker: Some(marker),
            line: None,
            color: None,
            line_width: None,
            layer: Layer::Data,
        }
    }

    pub fn point(x: f64, y: f64, marker: Marker) -> Self {
        Self::scatter([(x, y)], marker)
    }

    pub fn line(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            marker: None,
            line: Some(LineStyle::Solid),
            ..Self::scatter(points, Marker::Circle)
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn line_style(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn width(mut self, points: f64) -> Self {
        self.line_width = Some(points);
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }
}

/// Horizontal line across the whole x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: Option<String>,
    pub color: Color,
    pub style: LineStyle,
}

impl ReferenceLine {
    pub fn new(y: f64, color: Color, style: LineStyle) -> Self {
        Self {
            y,
            label: None,
            color,
            style,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Text anchored at a data coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub at: Point,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub boxed: bool,
}

impl Annotation {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            at: (x, y),
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            rotation: 0.0,
            boxed: true,
        }
    }

    pub fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn boxed(mut self, boxed: bool) -> Self {
        self.boxed = boxed;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legend {
    Hidden,
    /// Shared legend above the axes, entries filled column by column.
    Above { columns: usize },
    /// Inside the axes, in the corner covering the fewest data points.
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// What a legend needs to draw one handle.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub marker: Option<Marker>,
    pub line: Option<LineStyle>,
    pub line_width: f64,
}

/**********
 * Figure *
 **********/

const REFERENCE_SAMPLES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
    pub annotations: Vec<Annotation>,
    pub legend: Legend,
    pub style: FigureStyle,
}

impl Figure {
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            title: None,
            x_axis,
            y_axis,
            series: Vec::new(),
            reference_lines: Vec::new(),
            annotations: Vec::new(),
            legend: Legend::Hidden,
            style: FigureStyle::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    pub fn with_style(mut self, style: FigureStyle) -> Self {
        self.style = style;
        self
    }

    pub fn add_series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    /// Grey, unlabelled, beneath the data.
    pub fn add_roofline(&mut self, roofline: &Roofline, domain: &[f64]) -> &mut Self {
        let width = self.style.roofline_width;
        self.add_series(
            Series::line(roofline.curve(domain))
                .color(Color::GREY)
                .width(width)
                .layer(Layer::Background),
        )
    }

    pub fn add_reference_line(&mut self, line: ReferenceLine) -> &mut Self {
        self.reference_lines.push(line);
        self
    }

    pub fn add_annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Color of every series, in insertion order; series without one take the next cycle color.
    pub fn series_colors(&self) -> Vec<Color> {
        let mut next = 0;
        self.series
            .iter()
            .map(|series| {
                series.color.unwrap_or_else(|| {
                    next += 1;
                    cycle_color(next - 1)
                })
            })
            .collect()
    }

    pub fn series_width(&self, series: &Series) -> f64 {
        series.line_width.unwrap_or(self.style.line_width)
    }

    /// Series indices in drawing order: background layer first, insertion order within a layer.
    pub fn drawing_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.series.len()).collect();
        order.sort_by_key(|index| self.series[*index].layer);
        order
    }

    /// Labelled series in drawing order, then labelled reference lines.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        let colors = self.series_colors();
        let series = self.drawing_order().into_iter().filter_map(|index| {
            let series = &self.series[index];
            series.label.as_ref().map(|label| LegendEntry {
                label: label.clone(),
                color: colors[index],
                marker: series.marker,
                line: series.line,
                line_width: self.series_width(series),
            })
        });
        let lines = self.reference_lines.iter().filter_map(|line| {
            line.label.as_ref().map(|label| LegendEntry {
                label: label.clone(),
                color: line.color,
                marker: None,
                line: Some(line.style),
                line_width: self.style.line_width,
            })
        });
        series.chain(lines).collect()
    }

    pub fn x_limits(&self) -> (f64, f64) {
        resolve_limits(
            self.x_axis.scale,
            self.x_axis.limits,
            self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)),
        )
    }

    pub fn y_limits(&self) -> (f64, f64) {
        let points = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        let lines = self.reference_lines.iter().map(|l| l.y);
        resolve_limits(self.y_axis.scale, self.y_axis.limits, points.chain(lines))
    }

    /// Data space to plotting space, where both axes are linear.
    pub fn to_plot_space(&self, point: Point) -> Option<Point> {
        Some((
            self.x_axis.scale.forward(point.0)?,
            self.y_axis.scale.forward(point.1)?,
        ))
    }

    /// Plotting space points a legend should not cover: series vertices, and samples along
    /// the reference lines.
    pub fn occupied_points(&self) -> Vec<Point> {
        let rect = self.plot_rect();
        let vertices = self
            .series
            .iter()
            .flat_map(|series| series.points.iter().filter_map(|p| self.to_plot_space(*p)));
        let samples = self
            .reference_lines
            .iter()
            .filter_map(|line| self.y_axis.scale.forward(line.y))
            .flat_map(|y| {
                (0..=REFERENCE_SAMPLES).map(move |i| {
                    let t = i as f64 / REFERENCE_SAMPLES as f64;
                    (rect.x.0 + (rect.x.1 - rect.x.0) * t, y)
                })
            });
        vertices.chain(samples).collect()
    }

    /// Corner for a legend box spanning the given fractions of the axes.
    pub fn legend_corner(&self, width_fraction: f64, height_fraction: f64) -> Corner {
        let rect = self.plot_rect();
        let width = (rect.x.1 - rect.x.0) * width_fraction;
        let height = (rect.y.1 - rect.y.0) * height_fraction;
        let (left, right) = ((rect.x.0, rect.x.0 + width), (rect.x.1 - width, rect.x.1));
        let (bottom, top) = ((rect.y.0, rect.y.0 + height), (rect.y.1 - height, rect.y.1));
        let corners = [
            (Corner::UpperRight, Rect::new(right, top)),
            (Corner::UpperLeft, Rect::new(left, top)),
            (Corner::LowerLeft, Rect::new(left, bottom)),
            (Corner::LowerRight, Rect::new(right, bottom)),
        ];
        let boxes: Vec<Rect> = corners.iter().map(|(_, rect)| *rect).collect();
        least_crowded(&boxes, &self.occupied_points())
            .map(|index| corners[index].0)
            .unwrap_or(Corner::UpperRight)
    }

    /// The axes rectangle, in plotting space.
    pub fn plot_rect(&self) -> Rect {
        let (x_lo, x_hi) = self.x_limits();
        let (y_lo, y_hi) = self.y_limits();
        let x_scale = self.x_axis.scale;
        let y_scale = self.y_axis.scale;
        // Limits come from representable values, or are literal and positive on log axes.
        Rect::new(
            (
                x_scale.forward(x_lo).unwrap_or(f64::MIN),
                x_scale.forward(x_hi).unwrap_or(f64::MAX),
            ),
            (
                y_scale.forward(y_lo).unwrap_or(f64::MIN),
                y_scale.forward(y_hi).unwrap_or(f64::MAX),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roofline::pow2_domain;

    fn roofline_figure() -> Figure {
        let mut figure = Figure::new(
            Axis::log2().label("Arithmetic intensity").limits(2f64.powi(-6), 2f64.powi(8)),
            Axis::log2().limits(2f64.powi(-3), 2f64.powi(7)),
        )
        .with_legend(Legend::Above { columns: 2 });
        let domain = pow2_domain(-6, 8);
        let roofline = Roofline::new(11.6, 46.4);
        figure
            .add_roofline(&roofline, &domain)
            .add_roofline(&roofline.scaled_peak(16.0), &domain);
        figure
            .add_series(Series::point(2.0 / 32.0, 0.72, Marker::Circle).label("Code A"))
            .add_series(Series::point(1.0, 5.0, Marker::TriangleRight).label("Code B"));
        figure
    }

    #[test]
    fn rooflines_do_not_consume_cycle() {
        let figure = roofline_figure();
        let colors = figure.series_colors();
        assert_eq!(colors[0], Color::GREY);
        assert_eq!(colors[1], Color::GREY);
        assert_eq!(colors[2], cycle_color(0));
        assert_eq!(colors[3], cycle_color(1));
    }

    #[test]
    fn background_drawn_first() {
        let mut figure = Figure::new(Axis::linear(), Axis::linear());
        figure.add_series(Series::point(1.0, 1.0, Marker::Circle));
        figure.add_roofline(&Roofline::new(1.0, 1.0), &[0.5, 2.0]);
        figure.add_series(Series::point(2.0, 1.0, Marker::Circle));
        assert_eq!(figure.drawing_order(), vec![1, 0, 2]);
    }

    #[test]
    fn legend_skips_unlabelled() {
        let mut figure = roofline_figure();
        figure.add_reference_line(
            ReferenceLine::new(3.0, Color::RED, LineStyle::Dashed).label("L1 Peak"),
        );
        figure.add_reference_line(ReferenceLine::new(2.0, Color::BLACK, LineStyle::Dotted));
        let labels: Vec<String> = figure.legend_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Code A", "Code B", "L1 Peak"]);
    }

    #[test]
    fn roofline_series_style() {
        let figure = roofline_figure();
        let roof = &figure.series[0];
        assert_eq!(roof.layer, Layer::Background);
        assert_eq!(figure.series_width(roof), 2.0);
        assert_eq!(roof.line, Some(LineStyle::Solid));
        assert_eq!(roof.marker, None);
        assert!(roof.points.contains(&(4.0, 46.4)));
    }

    #[test]
    fn plot_space_is_exponents() {
        let figure = roofline_figure();
        let rect = figure.plot_rect();
        assert_eq!(rect.x, (-6.0, 8.0));
        assert_eq!(rect.y, (-3.0, 7.0));
        assert_eq!(figure.to_plot_space((0.25, 8.0)), Some((-2.0, 3.0)));
        assert_eq!(figure.to_plot_space((0.0, 8.0)), None);
    }

    #[test]
    fn legend_avoids_data() {
        let square = || (Axis::linear().limits(0.0, 10.0), Axis::linear().limits(0.0, 10.0));
        let (x, y) = square();
        let mut falling = Figure::new(x, y);
        falling.add_series(Series::line((0..=10).map(|i| (i as f64, 10.0 - i as f64))));
        assert_eq!(falling.legend_corner(0.3, 0.3), Corner::UpperRight);

        let (x, y) = square();
        let mut rising = Figure::new(x, y);
        rising.add_series(Series::line((0..=10).map(|i| (i as f64, i as f64))));
        assert_eq!(rising.legend_corner(0.3, 0.3), Corner::UpperLeft);

        // a peak line across the top pushes the legend down
        rising.add_reference_line(ReferenceLine::new(9.5, Color::RED, LineStyle::Dashed));
        assert_eq!(rising.legend_corner(0.3, 0.3), Corner::LowerRight);
    }

    #[test]
    fn reference_lines_widen_y() {
        let mut figure = Figure::new(Axis::log2(), Axis::linear());
        figure.add_series(Series::line([(1e3, 10.0), (1e6, 20.0)]));
        figure.add_reference_line(ReferenceLine::new(100.0, Color::RED, LineStyle::Dashed));
        let (_, y_hi) = figure.y_limits();
        assert!(y_hi > 100.0);
        let (x_lo, x_hi) = figure.x_limits();
        assert!(x_lo < 1e3 && x_hi > 1e6);
    }
}
