use rowan::{TextRange, TextSize};
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, TextEdit, Url};

use crate::quickfix::change::{ChangeError, ChangeSet};
use crate::syntax::helpers::text_size;

// ── Document ────────────────────────────────────────────────────────────────

/// Snapshot of a single open text document.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    /// Full source text (always kept up-to-date).
    pub text: String,
    /// Document version as reported by the client.
    pub version: i32,
    /// Line start byte offsets, rebuilt on every mutation.
    line_offsets: Vec<usize>,
}

impl Document {
    pub fn new(
        uri: Url,
        text: String,
        version: i32,
    ) -> Self {
        let line_offsets = Self::compute_line_offsets(&text);
        Self {
            uri,
            text,
            version,
            line_offsets,
        }
    }

    // ── queries ─────────────────────────────────────────────────────────

    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Full text of a 0-based line without its line terminator.
    pub fn line_text(
        &self,
        line: usize,
    ) -> Option<&str> {
        let start = *self.line_offsets.get(line)?;
        let end = self.line_offsets.get(line + 1).copied().unwrap_or(self.text.len());
        let slice = &self.text[start..end];
        Some(slice.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Byte offset of an LSP `Position` (UTF-16 columns). `None` for lines past the end.
    pub fn offset_of(
        &self,
        pos: Position,
    ) -> Option<usize> {
        let line = pos.line as usize;
        let line_start = *self.line_offsets.get(line)?;
        let line_end = self.line_offsets.get(line + 1).copied().unwrap_or(self.text.len());
        let line_text = &self.text[line_start..line_end];

        let mut utf16_offset: u32 = 0;
        let mut byte_offset = line_start;
        for ch in line_text.chars() {
            if utf16_offset >= pos.character || ch == '\n' {
                break;
            }
            utf16_offset += ch.len_utf16() as u32;
            byte_offset += ch.len_utf8();
        }
        Some(byte_offset)
    }

    pub fn position_of(
        &self,
        offset: usize,
    ) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(ins) => ins.saturating_sub(1),
        };
        let line_start = self.line_offsets[line];
        let character = self.text[line_start..offset]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum::<u32>();
        Position {
            line: line as u32,
            character,
        }
    }

    pub fn text_range_of(
        &self,
        range: Range,
    ) -> Option<TextRange> {
        let start = self.offset_of(range.start)?;
        let end = self.offset_of(range.end)?;
        Some(TextRange::new(text_size(start.min(end)), text_size(start.max(end))))
    }

    pub fn lsp_range_of(
        &self,
        range: TextRange,
    ) -> Range {
        Range {
            start: self.position_of(usize::from(range.start())),
            end: self.position_of(usize::from(range.end())),
        }
    }

    pub fn len(&self) -> TextSize {
        text_size(self.text.len())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// LSP edits equivalent to `change`, validated against the current text.
    pub fn text_edits_for(
        &self,
        change: &ChangeSet,
    ) -> Result<Vec<TextEdit>, ChangeError> {
        Ok(change
            .sorted_edits(&self.text)?
            .into_iter()
            .map(|edit| TextEdit {
                range: self.lsp_range_of(edit.range),
                new_text: edit.new_text.clone(),
            })
            .collect())
    }

    // ── mutations ───────────────────────────────────────────────────────

    /// Replace the full content and bump version.
    pub fn set_content(
        &mut self,
        text: String,
        version: i32,
    ) {
        self.text = text;
        self.version = version;
        self.line_offsets = Self::compute_line_offsets(&self.text);
    }

    /// Apply a list of incremental or full-content changes and bump version.
    pub fn apply_changes(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        for change in changes {
            if let Some(range) = change.range {
                if let (Some(start), Some(end)) = (self.offset_of(range.start), self.offset_of(range.end)) {
                    let (start, end) = (start.min(end), start.max(end));
                    self.text.replace_range(start..end, &change.text);
                    self.line_offsets = Self::compute_line_offsets(&self.text);
                }
            } else {
                self.text = change.text;
                self.line_offsets = Self::compute_line_offsets(&self.text);
            }
        }
        self.version = version;
    }

    /// Apply a quick-fix change set computed against this document's current text.
    ///
    /// Nothing is modified when the change set is invalid.
    pub fn apply_change_set(
        &mut self,
        change: &ChangeSet,
        version: i32,
    ) -> Result<(), ChangeError> {
        let text = change.apply(&self.text)?;
        self.set_content(text, version);
        Ok(())
    }

    // ── internal helpers ────────────────────────────────────────────────

    fn compute_line_offsets(text: &str) -> Vec<usize> {
        let mut offsets = vec![0usize];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(i + 1);
            }
        }
        offsets
    }
}

#[cfg(test)]
#[path = "../../tests/src/document/text_document_tests.rs"]
mod tests;
