use crate::error::CalcError;
use crate::overlay::OverlayEntry;
use egui::{Align2, Color32, FontId, Painter, Pos2, Vec2};

/// Display sink for overlay markup.
///
/// The sequencer re-notifies the sink with the whole sequence whenever it
/// grows; `clear` is the reset path. Keeping this behind a trait leaves the
/// actual typesetter swappable (and lets tests record calls).
pub trait TypesetSink {
    fn typeset(&mut self, entries: &[OverlayEntry]) -> Result<(), CalcError>;
    fn clear(&mut self);
}

/// Markup wrapper produced by the sequencer: `\(\LARGE{expr = value}\)`.
const MARKUP_PREFIX: &str = "\\(\\LARGE{";
const MARKUP_SUFFIX: &str = "}\\)";

const OVERLAY_FONT_SIZE: f32 = 22.0;
const OVERLAY_COLOR: Color32 = Color32::DARK_BLUE;

/// Extracts the display text from a markup string.
fn display_text(markup: &str) -> Result<String, CalcError> {
    markup
        .strip_prefix(MARKUP_PREFIX)
        .and_then(|rest| rest.strip_suffix(MARKUP_SUFFIX))
        .map(str::to_owned)
        .ok_or_else(|| CalcError::Render(format!("unrecognized markup: {markup}")))
}

/// Paints overlay entries as text via the egui painter, standing in for an
/// external typesetting renderer. Malformed markup is logged and skipped so
/// one bad entry cannot poison the rest of the sequence.
#[derive(Debug, Default)]
pub struct EguiTypesetter {
    lines: Vec<(String, Pos2)>,
}

impl EguiTypesetter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the typeset lines, offset into the canvas rect.
    pub fn paint(&self, painter: &Painter, canvas_origin: Vec2) {
        for (text, anchor) in &self.lines {
            painter.text(
                *anchor + canvas_origin,
                Align2::LEFT_TOP,
                text,
                FontId::proportional(OVERLAY_FONT_SIZE),
                OVERLAY_COLOR,
            );
        }
    }
}

impl TypesetSink for EguiTypesetter {
    fn typeset(&mut self, entries: &[OverlayEntry]) -> Result<(), CalcError> {
        self.lines.clear();
        for entry in entries {
            match display_text(&entry.markup) {
                Ok(text) => self.lines.push((text, entry.anchor)),
                Err(err) => log::warn!("skipping overlay entry: {err}"),
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_strips_the_markup_wrapper() {
        assert_eq!(
            display_text("\\(\\LARGE{x + 2 = 7}\\)").unwrap(),
            "x + 2 = 7"
        );
    }

    #[test]
    fn malformed_markup_is_a_render_error() {
        let err = display_text("$$x = 1$$").unwrap_err();
        assert!(matches!(err, CalcError::Render(_)));
    }

    #[test]
    fn typesetter_skips_bad_entries_and_keeps_the_rest() {
        let mut typesetter = EguiTypesetter::new();
        let entries = vec![
            OverlayEntry {
                markup: "\\(\\LARGE{2+2 = 4}\\)".to_owned(),
                anchor: Pos2::new(10.0, 10.0),
            },
            OverlayEntry {
                markup: "not markup".to_owned(),
                anchor: Pos2::new(10.0, 34.0),
            },
        ];
        typesetter.typeset(&entries).unwrap();
        assert_eq!(typesetter.lines.len(), 1);
        assert_eq!(typesetter.lines[0].0, "2+2 = 4");
    }

    #[test]
    fn clear_empties_the_typeset_lines() {
        let mut typesetter = EguiTypesetter::new();
        typesetter
            .typeset(&[OverlayEntry {
                markup: "\\(\\LARGE{1 = 1}\\)".to_owned(),
                anchor: Pos2::new(0.0, 0.0),
            }])
            .unwrap();
        typesetter.clear();
        assert!(typesetter.lines.is_empty());
    }
}
