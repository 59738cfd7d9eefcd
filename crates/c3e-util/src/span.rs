//! Source locations.
//!
//! Every token carries a `Span` (line/column, 1-based) so diagnostics can
//! point at the offending source text. There is no multi-file source map:
//! one compilation reads exactly one source file.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileId(pub usize);

impl FileId {
    pub const DUMMY: FileId = FileId(usize::MAX);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    pub const DUMMY: Span = Span {
        line: 0,
        column: 0,
        file_id: FileId::DUMMY,
    };

    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            file_id: FileId::DUMMY,
        }
    }

    #[inline]
    pub fn with_file(file_id: FileId, line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            file_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_span_has_no_position() {
        assert_eq!(Span::DUMMY.line, 0);
        assert_eq!(Span::DUMMY.column, 0);
    }

    #[test]
    fn new_preserves_line_and_column() {
        let s = Span::new(3, 7);
        assert_eq!(s.line, 3);
        assert_eq!(s.column, 7);
    }
}
