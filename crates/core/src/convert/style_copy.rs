//! Attribute-by-attribute copying between elements and table cells.
//!
//! Cells and free elements are different host entities, so a style is moved
//! one [`StylePart`] at a time and a rejected part does not stop the others.
//! Element-to-element copies use the host's bulk clone when the host says it
//! can do it.

use smallvec::SmallVec;

use crate::error::Result;
use crate::host::{StyleTarget, Surface};
use crate::model::{Style, StylePart};

/// Names of the style parts the host rejected.
pub type RejectedParts = SmallVec<[&'static str; 4]>;

/// Writes each part to `dst`, logging and collecting the ones that fail.
pub fn apply_parts<S: Surface + ?Sized>(
    surface: &mut S,
    dst: StyleTarget,
    parts: Vec<StylePart>,
) -> RejectedParts {
    let mut rejected = RejectedParts::new();
    for part in parts {
        let name = part.name();
        if let Err(err) = surface.set_style_part(dst, part) {
            tracing::warn!(%dst, part = name, %err, "style attribute not copied");
            rejected.push(name);
        }
    }
    rejected
}

/// Copies `style` onto `dst`. Font and alignment are only copied when
/// `with_text_format` is set.
pub fn copy_style<S: Surface + ?Sized>(
    surface: &mut S,
    style: &Style,
    src: StyleTarget,
    dst: StyleTarget,
    with_text_format: bool,
) -> RejectedParts {
    if let (StyleTarget::Element(a), StyleTarget::Element(b)) = (src, dst)
        && surface.can_bulk_clone_style(a, b)
    {
        match surface.clone_style(a, b) {
            Ok(()) => return RejectedParts::new(),
            Err(err) => tracing::debug!(%err, "bulk style clone failed, copying attributes"),
        }
    }
    apply_parts(surface, dst, style.parts(with_text_format))
}

/// Copies text, then style, from `src` to `dst`.
///
/// Reading the source or writing the text is an error for the whole unit;
/// individual style attributes are best-effort.
pub fn copy_text_and_style<S: Surface + ?Sized>(
    surface: &mut S,
    src: StyleTarget,
    dst: StyleTarget,
) -> Result<RejectedParts> {
    let text = surface.text(src)?;
    let style = surface.style(src)?;
    surface.set_text(dst, &text)?;
    Ok(copy_style(surface, &style, src, dst, !text.is_empty()))
}

/// Copies the parts a new row or column inherits from its neighbour:
/// fill, line and font.
pub fn copy_cell_format<S: Surface + ?Sized>(
    surface: &mut S,
    src: StyleTarget,
    dst: StyleTarget,
) -> Result<RejectedParts> {
    let style = surface.style(src)?;
    let parts = vec![
        StylePart::Fill(style.fill.clone()),
        StylePart::Line(style.line.clone()),
        StylePart::Font(style.font.clone()),
    ];
    Ok(apply_parts(surface, dst, parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::host::MemorySurface;
    use crate::model::Color;

    #[test]
    fn empty_text_keeps_target_font() {
        let mut s = MemorySurface::new();
        let t = s.add_table(0.0, 0.0, &[20.0], &[20.0]);
        let cell = StyleTarget::Cell {
            table: t,
            row: 0,
            col: 0,
        };
        let mut style = s.style(cell).unwrap();
        style.font.color = Color(0xFF0000);
        style.fill.color = Color(0x00FF00);
        s.set_style_part(cell, StylePart::Font(style.font.clone())).unwrap();
        s.set_style_part(cell, StylePart::Fill(style.fill.clone())).unwrap();

        let dst = s.add_shape(Geometry::new(0.0, 0.0, 20.0, 20.0));
        let rejected = copy_text_and_style(&mut s, cell, StyleTarget::Element(dst)).unwrap();
        assert!(rejected.is_empty());
        let got = s.style(StyleTarget::Element(dst)).unwrap();
        assert_eq!(got.fill.color, Color(0x00FF00));
        assert_eq!(got.font.color, Color::BLACK);
    }

    #[test]
    fn rejected_parts_are_reported() {
        let mut s = MemorySurface::new();
        let src = s.add_text(Geometry::new(0.0, 0.0, 20.0, 20.0), "x");
        let t = s.add_table(0.0, 0.0, &[20.0], &[20.0]);
        let cell = StyleTarget::Cell {
            table: t,
            row: 0,
            col: 0,
        };
        s.faults_mut().style.insert(cell);
        let rejected = copy_text_and_style(&mut s, StyleTarget::Element(src), cell).unwrap();
        assert_eq!(rejected.len(), 5);
        assert_eq!(s.text(cell).unwrap(), "x");
    }
}
