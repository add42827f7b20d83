#![deny(unsafe_code)]

/*!
Back end agnostic description of performance figures.

A [`Figure`] is filled in with series, reference lines and annotations, then handed to a
renderer. Everything here is plain computation: roofline bounds, axis limits, clipping and
dash layout in plotting space.
*/

pub mod figure;
pub mod geometry;
pub mod roofline;
pub mod style;

pub use figure::{
    Annotation, Axis, Corner, Figure, Layer, Legend, LegendEntry, ReferenceLine, Scale, Series,
};
pub use geometry::{Point, Rect};
pub use roofline::{Roofline, pow2_domain};
pub use style::{Color, FigureStyle, HAlign, LineStyle, Marker, VAlign};
