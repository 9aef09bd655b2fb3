//! Printable Bingo cards as a minimal PDF document.
//!
//! One landscape A4 page per card, drawn with the standard Helvetica fonts
//! so nothing has to be embedded.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::state::{
    card_engine::grid_coordinates,
    game::{CARD_CELLS, Card, CardId, GRID_SIZE},
};

const PAGE_WIDTH: f32 = 842.0;
const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 40.0;
const TITLE_Y: f32 = 548.0;
const HEADER_HEIGHT: f32 = 32.0;
const GRID_TOP: f32 = 500.0;
const GRID_BOTTOM: f32 = 56.0;
const FOOTER_Y: f32 = 30.0;
const CELL_PADDING: f32 = 6.0;
const ARTIST_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 9.0;
// Rough Helvetica advance width as a share of the font size.
const GLYPH_WIDTH: f32 = 0.52;
const HEADER_LETTERS: [&str; 5] = ["B", "I", "N", "G", "O"];

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const REGULAR_FONT_ID: usize = 3;
const BOLD_FONT_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

/// Render `cards` in order, one page each.
pub fn render(cards: &IndexMap<CardId, Card>) -> Vec<u8> {
    let mut writer = PdfWriter::default();
    let page_ids: Vec<usize> = (0..cards.len())
        .map(|index| FIRST_PAGE_ID + index * 2)
        .collect();

    writer.object(
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").as_bytes(),
    );
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    writer.object(
        PAGES_ID,
        format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>",
            page_ids.len()
        )
        .as_bytes(),
    );
    writer.object(REGULAR_FONT_ID, font_dictionary("Helvetica").as_bytes());
    writer.object(BOLD_FONT_ID, font_dictionary("Helvetica-Bold").as_bytes());

    for ((card_id, card), page_id) in cards.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        writer.object(
            *page_id,
            format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 {REGULAR_FONT_ID} 0 R /F2 {BOLD_FONT_ID} 0 R >> >> \
                 /Contents {content_id} 0 R >>"
            )
            .as_bytes(),
        );
        writer.stream(content_id, &page_content(card_id, card));
    }

    writer.finish(CATALOG_ID)
}

fn font_dictionary(base_font: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>")
}

fn page_content(card_id: &str, card: &Card) -> Vec<u8> {
    let mut content = Content::default();
    let grid_width = PAGE_WIDTH - 2.0 * MARGIN;
    let columns = f32::from(GRID_SIZE);
    let cell_width = grid_width / columns;
    let cell_height = (GRID_TOP - GRID_BOTTOM) / columns;

    content.text("F2", 24.0, MARGIN, TITLE_Y, "Music Bingo");

    for (column, letter) in HEADER_LETTERS.iter().enumerate() {
        let x = MARGIN + column as f32 * cell_width + cell_width / 2.0 - 8.0;
        content.text("F2", 22.0, x, GRID_TOP + 8.0, letter);
    }
    content.op(&format!(
        "{MARGIN} {GRID_TOP} m {} {GRID_TOP} l S",
        MARGIN + grid_width
    ));
    content.op(&format!(
        "{MARGIN} {} m {} {} l S",
        GRID_TOP + HEADER_HEIGHT,
        MARGIN + grid_width,
        GRID_TOP + HEADER_HEIGHT
    ));

    for (position, track) in card.tracks.iter().take(CARD_CELLS).enumerate() {
        let position = position as u8;
        let (row, column) = grid_coordinates(position);
        let x = MARGIN + f32::from(column) * cell_width;
        let y = GRID_TOP - f32::from(row + 1) * cell_height;

        if card.matches.contains(&position) {
            content.op(&format!(
                "0.85 g {x} {y} {cell_width} {cell_height} re f 0 g"
            ));
        }
        content.op(&format!("{x} {y} {cell_width} {cell_height} re S"));

        let usable = cell_width - 2.0 * CELL_PADDING;
        let mut line_y = y + cell_height - CELL_PADDING - ARTIST_SIZE;
        for line in wrap(&track.artist, chars_fitting(usable, ARTIST_SIZE), 2) {
            content.text("F2", ARTIST_SIZE, x + CELL_PADDING, line_y, &line);
            line_y -= ARTIST_SIZE + 2.0;
        }
        line_y -= 4.0;
        for line in wrap(&track.name, chars_fitting(usable, TITLE_SIZE), 3) {
            content.text("F1", TITLE_SIZE, x + CELL_PADDING, line_y, &line);
            line_y -= TITLE_SIZE + 2.0;
        }
    }

    content.text("F1", 10.0, MARGIN, FOOTER_Y, &format!("Card {card_id}"));
    content.bytes
}

fn chars_fitting(width: f32, font_size: f32) -> usize {
    (width / (font_size * GLYPH_WIDTH)).floor().max(1.0) as usize
}

/// Greedy word wrap into at most `max_lines` lines of `max_chars`
/// characters, ellipsising what does not fit.
fn wrap(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut truncated = false;

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        if word.chars().count() > max_chars {
            word = word.chars().take(max_chars).collect();
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
            continue;
        }
        if lines.len() + 1 == max_lines {
            truncated = true;
            break;
        }
        lines.push(std::mem::replace(&mut current, word));
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if truncated {
        if let Some(last) = lines.last_mut() {
            let keep = max_chars.saturating_sub(3);
            if last.chars().count() > keep {
                *last = last.chars().take(keep).collect();
            }
            last.push_str("...");
        }
    }
    lines
}

/// Single-byte WinAnsi string literal, escaped for a content stream.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            ' '..='~' => out.push(c as u8),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out.push(b')');
    out
}

#[derive(Default)]
struct Content {
    bytes: Vec<u8>,
}

impl Content {
    fn op(&mut self, op: &str) {
        self.bytes.extend_from_slice(op.as_bytes());
        self.bytes.push(b'\n');
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.bytes
            .extend_from_slice(format!("BT /{font} {size} Tf {x:.2} {y:.2} Td ").as_bytes());
        self.bytes.extend_from_slice(&encode_text(text));
        self.bytes.extend_from_slice(b" Tj ET\n");
    }
}

#[derive(Default)]
struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn start(&mut self) {
        if self.buffer.is_empty() {
            self.buffer.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.start();
        self.offsets.push((id, self.buffer.len()));
        self.buffer
            .extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, data: &[u8]) {
        let mut body = format!("<< /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(id, &body);
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        self.start();
        self.offsets.sort_unstable();
        let size = self.offsets.last().map_or(0, |(id, _)| *id) + 1;
        let xref_offset = self.buffer.len();

        let mut table = format!("xref\n0 {size}\n0000000000 65535 f \n");
        let mut next = 1;
        for (id, offset) in &self.offsets {
            while next < *id {
                table.push_str("0000000000 65535 f \n");
                next += 1;
            }
            let _ = writeln!(table, "{offset:010} 00000 n ");
            next += 1;
        }
        let _ = writeln!(
            table,
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF"
        );
        self.buffer.extend_from_slice(table.as_bytes());
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::tests::tracks;

    fn sample_cards(count: usize) -> IndexMap<CardId, Card> {
        (0..count)
            .map(|index| {
                let mut card = Card::new(tracks(CARD_CELLS));
                card.matches.insert(0);
                (format!("card{index:04}"), card)
            })
            .collect()
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    #[test]
    fn document_has_one_page_per_card() {
        let pdf = render(&sample_cards(3));
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(contains(&pdf, "/Count 3"));
        assert!(contains(&pdf, "(Card card0002)"));
        assert!(contains(&pdf, "0.85 g"));
    }

    #[test]
    fn startxref_points_at_the_cross_reference_table() {
        let pdf = render(&sample_cards(1));
        let text = String::from_utf8_lossy(&pdf);
        let offset: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|line| line.parse().ok())
            .unwrap();
        assert!(pdf[offset..].starts_with(b"xref\n0 7\n"));
    }

    #[test]
    fn text_is_escaped_and_latin1_encoded() {
        assert_eq!(encode_text("a(b)c\\"), b"(a\\(b\\)c\\\\)".to_vec());
        assert_eq!(encode_text("Beyoncé"), b"(Beyonc\xe9)".to_vec());
        assert_eq!(encode_text("東京"), b"(??)".to_vec());
    }

    #[test]
    fn wrap_respects_width_and_line_budget() {
        assert_eq!(wrap("Bohemian Rhapsody", 10, 3), vec!["Bohemian", "Rhapsody"]);
        let lines = wrap("one two three four five six seven", 9, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("..."));
        assert!(lines.iter().all(|line| line.chars().count() <= 9));
        assert!(wrap("", 10, 2).is_empty());
    }
}
