use foundation::color::Color;
use foundation::math::Vec2;
use scene::{FieldId, FootprintId};

/// Layers in paint order; later layers draw over earlier ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Background,
    Graticule,
    Localization,
    Sources,
    Galaxies,
    Instrument,
    Observations,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Graticule => "graticule",
            LayerKind::Localization => "localization",
            LayerKind::Sources => "sources",
            LayerKind::Galaxies => "galaxies",
            LayerKind::Instrument => "instrument",
            LayerKind::Observations => "observations",
        }
    }
}

/// Screen-space geometry in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Disk { center: Vec2, radius: f64 },
    Polyline { points: Vec<Vec2> },
    /// Filled with the even-odd rule.
    Polygon { rings: Vec<Vec<Vec2>> },
    /// `anchor` is the left end of the text, vertically centered.
    Text {
        anchor: Vec2,
        text: String,
        font_size_px: f64,
    },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub fill_opacity: f64,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Style {
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            fill_opacity: 1.0,
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub const fn stroke(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            fill_opacity: 1.0,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    pub const fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub const fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::stroke(Color::BLACK, 1.0)
    }
}

/// What a stationary click on a primitive acts upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Field(FieldId),
    Footprint(FootprintId),
    Link(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub layer: LayerKind,
    pub shape: Shape,
    pub style: Style,
    /// Hidden primitives stay in the frame but are neither painted nor hit.
    pub visible: bool,
    pub title: Option<String>,
    pub hit: Option<HitTarget>,
}

impl Primitive {
    pub fn new(layer: LayerKind, shape: Shape, style: Style) -> Self {
        Self {
            layer,
            shape,
            style,
            visible: true,
            title: None,
            hit: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_hit(mut self, hit: HitTarget) -> Self {
        self.hit = Some(hit);
        self
    }

    /// Link target of hyperlinked labels.
    pub fn href(&self) -> Option<&str> {
        match &self.hit {
            Some(HitTarget::Link(url)) => Some(url),
            _ => None,
        }
    }

    /// Every screen point of the shape, for bounds checks.
    pub fn points(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Disk { center, .. } => vec![*center],
            Shape::Polyline { points } => points.clone(),
            Shape::Polygon { rings } => rings.concat(),
            Shape::Text { anchor, .. } => vec![*anchor],
        }
    }
}
