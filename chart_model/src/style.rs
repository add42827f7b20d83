/*********
 * Color *
 *********/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const BROWN: Color = Color::rgb(165, 42, 42);
}

/// Colors handed out, in order, to series that do not pick one.
pub const COLOR_CYCLE: [Color; 10] = [
    Color::rgb(31, 119, 180),
    Color::rgb(255, 127, 14),
    Color::rgb(44, 160, 44),
    Color::rgb(214, 39, 40),
    Color::rgb(148, 103, 189),
    Color::rgb(140, 86, 75),
    Color::rgb(227, 119, 194),
    Color::rgb(127, 127, 127),
    Color::rgb(188, 189, 34),
    Color::rgb(23, 190, 207),
];

pub fn cycle_color(index: usize) -> Color {
    COLOR_CYCLE[index % COLOR_CYCLE.len()]
}

/*****************
 * Marks & lines *
 *****************/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    TriangleRight,
    TriangleLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// On/off lengths, in multiples of the line width. Empty for a solid line.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[3.7, 1.6],
            LineStyle::Dotted => &[1.0, 1.65],
            LineStyle::DashDot => &[6.4, 1.6, 1.0, 1.6],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/*********
 * Style *
 *********/

/**
 * Figure wide rendering parameters.
 *
 * Sizes are in typographic points (1/72 in), except `size` which is in inches.
 * Back ends turn points into pixels with `dpi`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    pub size: (f64, f64),
    pub dpi: f64,
    pub font_size: f64,
    pub marker_size: f64,
    pub line_width: f64,
    pub roofline_width: f64,
    pub annotation_fill: Color,
    pub annotation_opacity: f64,
    pub transparent: bool,
}

impl FigureStyle {
    /// Smaller text and marks, for figures that keep the plotting library defaults.
    pub fn compact() -> Self {
        Self {
            size: (6.4, 4.8),
            font_size: 10.0,
            marker_size: 6.0,
            ..Self::default()
        }
    }

    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.size.0 * self.dpi).round() as u32,
            (self.size.1 * self.dpi).round() as u32,
        )
    }
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            size: (9.0, 5.0),
            dpi: 100.0,
            font_size: 16.0,
            marker_size: 12.0,
            line_width: 1.5,
            roofline_width: 2.0,
            annotation_fill: Color::WHITE,
            annotation_opacity: 0.5,
            transparent: true,
        }
    }
}
