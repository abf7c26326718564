//! Content-stream interpretation: a simplified PDF text state machine that
//! turns a page's operations into positioned [`Span`]s.
//!
//! Only the text-related operators are interpreted; graphics operators are
//! ignored. Glyph metrics are not available at this layer, so span widths
//! are estimated from the font size.

use outline_core::{Rect, Span, FLAG_BOLD};

use crate::backend::{Op, PageId, PdfBackend, Value};
use crate::scrub::scrub_text;
use crate::LayoutError;

/// Approximate character width as a fraction of font size when no glyph
/// metrics are available. 0.5 suits most proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Mutable state tracked while walking a page's content stream.
struct TextState {
    /// Current font resource key (`/F1`-style).
    font_key: Vec<u8>,
    /// Resolved base-font name for the current font.
    font_name: String,
    font_size: f32,
    /// Style flags derived from the base-font name.
    flags: u32,
    text_matrix: [f32; 6],
    /// Set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Tz value as a factor (percent / 100).
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            flags: 0,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Effective font size accounting for the text matrix vertical scale:
    /// `font_size * sqrt(b^2 + d^2)`.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Translate the line matrix (Td / TD / T* semantics) and reset the text
    /// matrix to it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    /// Apply `Tf`: set font, size, and name-derived style flags.
    fn set_font(&mut self, key: Vec<u8>, base_font: &str, size: f32) {
        self.font_key = key;
        self.font_size = size;
        self.font_name = base_font.to_string();
        self.flags = if base_font.to_uppercase().contains("BOLD") {
            FLAG_BOLD
        } else {
            0
        };
    }

    /// Estimated rendered width of `text` under the current state.
    fn estimate_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    /// Advance past rendered `text`, including character and word spacing.
    fn advance_after_show(&mut self, text: &str) {
        let mut dx: f32 = 0.0;
        for ch in text.chars() {
            dx += self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale + self.char_spacing;
            if ch == ' ' {
                dx += self.word_spacing;
            }
        }
        self.advance_x(dx);
    }

    /// Build a span for `text` starting at `(x, y)` in the current style.
    fn make_span(&self, text: String, x: f32, y: f32) -> Span {
        let size = self.effective_font_size();
        let width = self.estimate_width(&text);
        Span {
            text,
            size,
            font: self.font_name.clone(),
            flags: self.flags,
            bbox: Rect::new(x, y, x + width, y + size),
        }
    }
}

/// Decode a `Str` operand via the backend's font-aware decoder, then scrub.
fn decode_operand(
    operand: &Value,
    backend: &dyn PdfBackend,
    page: PageId,
    font_key: &[u8],
) -> String {
    match operand {
        Value::Str(bytes) => {
            let decoded = backend.decode_text(page, font_key, bytes);
            let decoded = if decoded.is_empty() {
                crate::backend::decode_string_bytes(bytes)
            } else {
                decoded
            };
            scrub_text(&decoded)
        }
        _ => String::new(),
    }
}

/// Walk one page's content stream and produce its flat span list.
///
/// Interpreted operators: BT/ET, Tf, Tm, Td, TD, T*, TL, Tc, Tw, Tz, Ts,
/// Tj, TJ, `'`, and `"`. Everything else is skipped.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page: PageId,
) -> Result<Vec<Span>, LayoutError> {
    let raw = backend.page_content(page)?;
    let ops = backend.decode_content(&raw)?;
    let fonts = backend.page_fonts(page).unwrap_or_default();

    let mut state = TextState::default();
    let mut spans: Vec<Span> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            // Font state is kept across text objects; some producers set the
            // font once and reuse it.
            "ET" => {}

            "Tf" => {
                if op.operands.len() >= 2 {
                    let key = match &op.operands[0] {
                        Value::Name(n) => n.clone(),
                        Value::Str(s) => s.clone(),
                        _ => continue,
                    };
                    let size = op.operands[1].as_number().unwrap_or(0.0);
                    let base = fonts
                        .iter()
                        .find(|f| f.key == key)
                        .and_then(|f| f.base_font.clone())
                        .unwrap_or_else(|| String::from_utf8_lossy(&key).into_owned());
                    state.set_font(key, &base, size);
                }
            }

            "Tm" => {
                let vals: Vec<f32> = op
                    .operands
                    .iter()
                    .take(6)
                    .filter_map(Value::as_number)
                    .collect();
                if vals.len() == 6 {
                    state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
                    state.line_matrix = state.text_matrix;
                }
            }
            "Td" => {
                if let [tx, ty] = numbers(&op.operands, 2)[..] {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // Equivalent to: -ty TL ; tx ty Td
                if let [tx, ty] = numbers(&op.operands, 2)[..] {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(v) = first_number(op) {
                    state.leading = v;
                }
            }

            "Tc" => {
                if let Some(v) = first_number(op) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = first_number(op) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = first_number(op) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = first_number(op) {
                    state.text_rise = v;
                }
            }

            "Tj" => {
                if let Some(operand) = op.operands.first() {
                    show_string(operand, backend, page, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(Value::Array(elements)) = op.operands.first() {
                    show_array(elements, backend, page, &mut state, &mut spans);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(operand) = op.operands.first() {
                    show_string(operand, backend, page, &mut state, &mut spans);
                }
            }
            "\"" => {
                // aw ac string: set Tw and Tc, move to next line, show.
                if op.operands.len() >= 3 {
                    if let Some(aw) = op.operands[0].as_number() {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = op.operands[1].as_number() {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    show_string(&op.operands[2], backend, page, &mut state, &mut spans);
                }
            }

            _ => {}
        }
    }

    Ok(spans)
}

/// Collect the first `n` numeric operands, or an empty vec if fewer exist.
fn numbers(operands: &[Value], n: usize) -> Vec<f32> {
    if operands.len() < n {
        return Vec::new();
    }
    let vals: Vec<f32> = operands.iter().take(n).filter_map(Value::as_number).collect();
    if vals.len() == n {
        vals
    } else {
        Vec::new()
    }
}

fn first_number(op: &Op) -> Option<f32> {
    op.operands.first().and_then(Value::as_number)
}

/// Emit one span for a `Tj`/`'`/`"` string operand and advance the cursor.
fn show_string(
    operand: &Value,
    backend: &dyn PdfBackend,
    page: PageId,
    state: &mut TextState,
    spans: &mut Vec<Span>,
) {
    let text = decode_operand(operand, backend, page, &state.font_key);
    if text.is_empty() {
        return;
    }
    let span = state.make_span(text.clone(), state.x(), state.y() + state.text_rise);
    spans.push(span);
    state.advance_after_show(&text);
}

/// Process a `TJ` array: strings to render interleaved with kerning
/// adjustments in thousandths of a text-space unit. Large rightward
/// adjustments are treated as word gaps.
fn show_array(
    elements: &[Value],
    backend: &dyn PdfBackend,
    page: PageId,
    state: &mut TextState,
    spans: &mut Vec<Span>,
) {
    let mut buffer = String::new();
    let mut start_x = state.x();
    let start_y = state.y() + state.text_rise;

    for element in elements {
        match element {
            Value::Str(_) => {
                let fragment = decode_operand(element, backend, page, &state.font_key);
                if buffer.is_empty() {
                    start_x = state.x();
                }
                buffer.push_str(&fragment);
                state.advance_after_show(&fragment);
            }
            other => {
                if let Some(adjustment) = other.as_number() {
                    // Negative adjustment moves the cursor right.
                    let dx = -adjustment / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buffer.is_empty() {
                        buffer.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    let trimmed = buffer.trim_end();
    if !trimmed.is_empty() {
        let span = state.make_span(trimmed.to_string(), start_x, start_y);
        spans.push(span);
    }
}
