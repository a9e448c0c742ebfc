//! Text measurement, truncation, wrapping, and multi-line text blocks.

use crate::canvas::Canvas;
use crate::error::ChartResult;
use crate::geom::{HorizontalAlignment, Point, RectangleAnchor, Size2D};
use crate::paint::{FontSpec, Paint};

/// Measures strings for layout. Every [`Canvas`] is also a measurer, so layout
/// can run against the same metrics that drawing will use.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64;

    fn line_height(&self, font: &FontSpec) -> f64 {
        (font.size * 1.2).ceil()
    }
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring
/// without a registered font).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        estimate_text_width(text, font)
    }
}

pub fn estimate_text_width(text: &str, font: &FontSpec) -> f64 {
    let factor = if font.bold { 0.65 } else { 0.60 };
    (text.chars().count() as f64 * font.size * factor).ceil()
}

/// Truncate to fit `max_width` and add a single ellipsis if needed.
pub fn truncate_to_width(
    text: &str,
    font: &FontSpec,
    max_width: f64,
    m: &dyn TextMeasurer,
) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}");
        if m.text_width(&next, font) > max_width {
            if !out.is_empty() {
                if m.text_width(&format!("{out}…"), font) <= max_width {
                    out.push('…');
                } else if out.chars().count() > 1 {
                    out.pop();
                    out.push('…');
                }
            }
            return out;
        }
        out = next;
    }
    out
}

/// Wrap text to fit within `max_width`, breaking on word boundaries where possible.
/// Explicit newlines always start a new line. An infinite width never wraps.
pub fn wrap_text_to_width(
    text: &str,
    font: &FontSpec,
    max_width: f64,
    m: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    for para in text.split('\n') {
        if !max_width.is_finite() || m.text_width(para, font) <= max_width {
            lines.push(para.to_string());
            continue;
        }
        wrap_paragraph(para, font, max_width, m, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    para: &str,
    font: &FontSpec,
    max_width: f64,
    m: &dyn TextMeasurer,
    lines: &mut Vec<String>,
) {
    let mut cur = String::new();
    for word in para.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if m.text_width(&candidate, font) <= max_width {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
            if m.text_width(word, font) <= max_width {
                cur = word.to_string();
                continue;
            }
        }
        // Single long word: hard-break by characters
        let mut buf = String::new();
        for ch in word.chars() {
            let cand = format!("{buf}{ch}");
            if m.text_width(&cand, font) > max_width && !buf.is_empty() {
                lines.push(std::mem::replace(&mut buf, ch.to_string()));
            } else {
                buf = cand;
            }
        }
        cur = buf;
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: FontSpec,
    pub paint: Paint,
}

/// Lines of text laid out as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    lines: Vec<TextLine>,
    alignment: HorizontalAlignment,
}

impl TextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `text` under `max_width` and keep at most `max_lines` lines; a cut
    /// final line ends in an ellipsis.
    pub fn create(
        text: &str,
        font: &FontSpec,
        paint: Paint,
        max_width: f64,
        max_lines: Option<usize>,
        m: &dyn TextMeasurer,
    ) -> TextBlock {
        let mut wrapped = wrap_text_to_width(text, font, max_width, m);
        if let Some(limit) = max_lines
            && wrapped.len() > limit
        {
            wrapped.truncate(limit.max(1));
            if let Some(last) = wrapped.last_mut() {
                let marked = format!("{last}…");
                *last = if max_width.is_finite() {
                    truncate_to_width(&marked, font, max_width, m)
                } else {
                    marked
                };
            }
        }
        let mut block = TextBlock::new();
        for line in wrapped {
            block.add_line(line, font.clone(), paint);
        }
        block
    }

    pub fn add_line(&mut self, text: impl Into<String>, font: FontSpec, paint: Paint) {
        self.lines.push(TextLine {
            text: text.into(),
            font,
            paint,
        });
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text.is_empty())
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = alignment;
    }

    /// Unrotated size: widest line by the sum of line heights.
    pub fn calculate_dimensions(&self, m: &dyn TextMeasurer) -> Size2D {
        self.lines.iter().fold(Size2D::ZERO, |acc, l| {
            Size2D::new(
                acc.width.max(m.text_width(&l.text, &l.font)),
                acc.height + m.line_height(&l.font),
            )
        })
    }

    /// Draw so that `anchor` of the (unrotated) block lands on `(x, y)`, then
    /// rotate the whole block by `angle` radians about that point.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        anchor: RectangleAnchor,
        angle: f64,
    ) -> ChartResult<()> {
        let size = self.calculate_dimensions(canvas.as_measurer());
        let frame = anchor.create_rectangle(size, 0.0, 0.0);
        let (sin, cos) = angle.sin_cos();
        let (line_anchor, lx) = match self.alignment {
            HorizontalAlignment::Left => (RectangleAnchor::Left, frame.min_x()),
            HorizontalAlignment::Center => (RectangleAnchor::Center, frame.center_x()),
            HorizontalAlignment::Right => (RectangleAnchor::Right, frame.max_x()),
        };
        let mut ly = frame.min_y();
        for line in &self.lines {
            let h = canvas.line_height(&line.font);
            let local = Point::new(lx, ly + h / 2.0);
            let px = x + local.x * cos - local.y * sin;
            let py = y + local.x * sin + local.y * cos;
            if !line.text.is_empty() {
                canvas.draw_text(&line.text, px, py, &line.font, &line.paint, line_anchor, angle)?;
            }
            ly += h;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let f = FontSpec::sans(10.0);
        // 6px per char
        let lines = wrap_text_to_width("alpha beta gamma", &f, 66.0, &HeuristicTextMeasurer);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn infinite_width_keeps_paragraphs() {
        let f = FontSpec::sans(10.0);
        let lines = wrap_text_to_width("a b\nc", &f, f64::INFINITY, &HeuristicTextMeasurer);
        assert_eq!(lines, vec!["a b", "c"]);
    }

    #[test]
    fn max_lines_adds_ellipsis() {
        let f = FontSpec::sans(10.0);
        let tb = TextBlock::create(
            "one two three four",
            &f,
            crate::paint::BLACK,
            30.0,
            Some(2),
            &HeuristicTextMeasurer,
        );
        assert_eq!(tb.lines().len(), 2);
        assert!(tb.lines()[1].text.ends_with('…'));
    }
}
