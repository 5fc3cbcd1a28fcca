use std::fmt;

use rowan::{TextRange, TextSize};

/// Replace the bytes in `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub range: TextRange,
    pub new_text: String,
}

/// Edits a quick fix makes to the document it was computed for.
///
/// Ranges are byte ranges into the snapshot text. Edits may be recorded in any order; they must
/// not overlap. Insertions at the same offset are applied in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    edits: Vec<SourceEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    OutOfBounds { range: TextRange, len: usize },
    NotCharBoundary { offset: TextSize },
    Overlapping { first: TextRange, second: TextRange },
}

impl fmt::Display for ChangeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::OutOfBounds { range, len } => {
                write!(f, "edit range {range:?} exceeds document length {len}")
            },
            Self::NotCharBoundary { offset } => {
                write!(f, "edit offset {offset:?} is not on a character boundary")
            },
            Self::Overlapping { first, second } => {
                write!(f, "edit ranges {first:?} and {second:?} overlap")
            },
        }
    }
}

impl std::error::Error for ChangeError {}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(
        &mut self,
        range: TextRange,
        new_text: impl Into<String>,
    ) {
        self.edits.push(SourceEdit {
            range,
            new_text: new_text.into(),
        });
    }

    pub fn insert(
        &mut self,
        offset: TextSize,
        text: impl Into<String>,
    ) {
        self.replace(TextRange::empty(offset), text);
    }

    pub fn delete(
        &mut self,
        range: TextRange,
    ) {
        self.replace(range, String::new());
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Edits in recording order.
    pub fn edits(&self) -> &[SourceEdit] {
        &self.edits
    }

    /// Edits ordered by position, checked against `text`.
    pub fn sorted_edits(
        &self,
        text: &str,
    ) -> Result<Vec<&SourceEdit>, ChangeError> {
        let mut sorted: Vec<&SourceEdit> = self.edits.iter().collect();
        sorted.sort_by_key(|edit| (edit.range.start(), edit.range.end()));

        for edit in &sorted {
            let end = usize::from(edit.range.end());
            if end > text.len() {
                return Err(ChangeError::OutOfBounds {
                    range: edit.range,
                    len: text.len(),
                });
            }
            for offset in [edit.range.start(), edit.range.end()] {
                if !text.is_char_boundary(usize::from(offset)) {
                    return Err(ChangeError::NotCharBoundary { offset });
                }
            }
        }
        for pair in sorted.windows(2) {
            if pair[1].range.start() < pair[0].range.end() {
                return Err(ChangeError::Overlapping {
                    first: pair[0].range,
                    second: pair[1].range,
                });
            }
        }
        Ok(sorted)
    }

    /// The text after applying every edit to `text`.
    pub fn apply(
        &self,
        text: &str,
    ) -> Result<String, ChangeError> {
        let sorted = self.sorted_edits(text)?;
        let mut result = String::with_capacity(text.len());
        let mut cursor = 0usize;
        for edit in sorted {
            let start = usize::from(edit.range.start());
            result.push_str(&text[cursor..start]);
            result.push_str(&edit.new_text);
            cursor = usize::from(edit.range.end());
        }
        result.push_str(&text[cursor..]);
        Ok(result)
    }
}

#[cfg(test)]
#[path = "../../tests/src/quickfix/change_tests.rs"]
mod tests;
