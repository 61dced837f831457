//! Character encoding breakdown, helps debugging incorrectly rendered characters.

use imgui::{TableColumnSetup, TableFlags, Ui};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedChar {
    pub ch: char,
    utf8: [u8; 4],
    len: usize,
}

impl EncodedChar {
    pub fn new(ch: char) -> Self {
        let mut utf8 = [0; 4];
        let len = ch.encode_utf8(&mut utf8).len();
        Self { ch, utf8, len }
    }

    pub fn code_point(&self) -> u32 {
        self.ch as u32
    }

    pub fn utf8(&self) -> &[u8] {
        &self.utf8[..self.len]
    }

    /// `U+XXXX` notation.
    pub fn code_point_label(&self) -> String {
        format!("U+{:04X}", self.code_point())
    }

    /// Space separated hex bytes, like `C5 9B`.
    pub fn bytes_label(&self) -> String {
        self.utf8()
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for EncodedChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {} [{}]", self.ch, self.code_point_label(), self.bytes_label())
    }
}

pub fn describe(text: &str) -> Vec<EncodedChar> {
    text.chars().map(EncodedChar::new).collect()
}

/// Draws one row per character of `text`.
pub fn encoding_table(ui: &Ui, id: &str, text: &str) {
    let columns = [
        TableColumnSetup::new("Glyph"),
        TableColumnSetup::new("Codepoint"),
        TableColumnSetup::new("Bytes"),
    ];
    if let Some(_table) =
        ui.begin_table_header_with_flags(id, columns, TableFlags::BORDERS | TableFlags::ROW_BG)
    {
        for encoded in describe(text) {
            ui.table_next_column();
            ui.text(encoded.ch.to_string());
            ui.table_next_column();
            ui.text(encoded.code_point_label());
            ui.table_next_column();
            ui.text(encoded.bytes_label());
        }
    }
}
