//! Resolved positions inside a source file.
//!
//! A [`SourceLocation`] carries the file path, a 1-based line, a 1-based column counted in
//! UTF-16 code units and the byte offset. Paths are stored with `/` separators regardless of the
//! host platform.

use std::fmt;
use std::path::MAIN_SEPARATOR;

use rowan::TextSize;
use tower_lsp::lsp_types::Position;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    file_path: String,
    line: u32,
    column: u32,
    offset: u32,
}

impl SourceLocation {
    /// Location of byte `offset` in `source`.
    ///
    /// Returns `None` when the offset is past the end or not on a character boundary.
    pub fn from_offset(
        file_path: &str,
        source: &str,
        offset: TextSize,
    ) -> Option<Self> {
        let offset_usize = usize::from(offset);
        if offset_usize > source.len() || !source.is_char_boundary(offset_usize) {
            return None;
        }
        let before = &source[..offset_usize];
        let line_start = before.rfind('\n').map_or(0, |index| index + 1);
        let line = before.matches('\n').count() as u32 + 1;
        let column = source[line_start..offset_usize].encode_utf16().count() as u32 + 1;
        Some(Self {
            file_path: normalize_separators(file_path),
            line,
            column,
            offset: u32::from(offset),
        })
    }

    /// Location for a 1-based `line` and 1-based UTF-16 `column`.
    ///
    /// Columns past the end of the line clamp to the line end; lines past the end of the source
    /// yield `None`.
    pub fn from_line_column(
        file_path: &str,
        source: &str,
        line: u32,
        column: u32,
    ) -> Option<Self> {
        if line == 0 || column == 0 {
            return None;
        }
        let line_start = if line == 1 {
            0
        } else {
            source
                .match_indices('\n')
                .nth(line as usize - 2)
                .map(|(index, _)| index + 1)?
        };
        let line_text = source[line_start..].split('\n').next().unwrap_or_default();
        let mut utf16 = 1u32;
        let mut byte = 0usize;
        for ch in line_text.chars() {
            if utf16 >= column {
                break;
            }
            utf16 += ch.len_utf16() as u32;
            byte += ch.len_utf8();
        }
        Some(Self {
            file_path: normalize_separators(file_path),
            line,
            column: utf16,
            offset: (line_start + byte) as u32,
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn offset(&self) -> TextSize {
        TextSize::from(self.offset)
    }

    /// Zero-based LSP position.
    pub fn to_position(&self) -> Position {
        Position::new(self.line - 1, self.column - 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if !self.file_path.is_empty() {
            write!(f, "{}, ", self.file_path)?;
        }
        write!(
            f,
            "line: {}, column: {}, offset: {}",
            self.line, self.column, self.offset
        )
    }
}

/// Convert host path separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
#[path = "../tests/src/source_location_tests.rs"]
mod tests;
