//! Visual style attributes copied between elements and table cells.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// 24-bit RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const GRAY: Color = Color(0x808080);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0xFF_FFFF)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillStyle {
    pub visible: bool,
    pub color: Color,
    /// 0.0 is opaque, 1.0 fully transparent.
    pub transparency: f64,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::rgb(0x44, 0x72, 0xC4),
            transparency: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub visible: bool,
    pub color: Color,
    pub weight: f64,
    pub dash: DashStyle,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::rgb(0x2F, 0x52, 0x8F),
            weight: 1.0,
            dash: DashStyle::Solid,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub name: SmolStr,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: SmolStr::new_static("Calibri"),
            size: 18.0,
            bold: false,
            italic: false,
            underline: false,
            color: Color::BLACK,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text-frame insets in points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    pub const fn uniform(v: f64) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 7.2,
            top: 3.6,
            right: 7.2,
            bottom: 3.6,
        }
    }
}

/// Full style of an element or table cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub fill: FillStyle,
    pub line: LineStyle,
    pub font: FontStyle,
    pub alignment: Alignment,
    pub margins: Margins,
}

/// One independently writable slice of a [`Style`].
#[derive(Clone, Debug, PartialEq)]
pub enum StylePart {
    Fill(FillStyle),
    Line(LineStyle),
    Font(FontStyle),
    Alignment(Alignment),
    Margins(Margins),
}

impl StylePart {
    pub fn name(&self) -> &'static str {
        match self {
            StylePart::Fill(_) => "fill",
            StylePart::Line(_) => "line",
            StylePart::Font(_) => "font",
            StylePart::Alignment(_) => "alignment",
            StylePart::Margins(_) => "margins",
        }
    }

    /// Writes this part into `style`.
    pub fn apply_to(self, style: &mut Style) {
        match self {
            StylePart::Fill(fill) => style.fill = fill,
            StylePart::Line(line) => style.line = line,
            StylePart::Font(font) => style.font = font,
            StylePart::Alignment(alignment) => style.alignment = alignment,
            StylePart::Margins(margins) => style.margins = margins,
        }
    }
}

impl Style {
    /// Splits the style into the parts copied for a cell or element.
    ///
    /// Font and alignment only travel with non-empty text.
    pub fn parts(&self, with_text_format: bool) -> Vec<StylePart> {
        let mut parts = Vec::with_capacity(5);
        if with_text_format {
            parts.push(StylePart::Font(self.font.clone()));
            parts.push(StylePart::Alignment(self.alignment));
        }
        parts.push(StylePart::Fill(self.fill.clone()));
        parts.push(StylePart::Line(self.line.clone()));
        parts.push(StylePart::Margins(self.margins));
        parts
    }
}
