//! Character-at-a-time source cursor with line/column tracking.

pub struct Cursor<'a> {
    chars: std::str::Chars<'a>,
    peeked: Option<char>,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
            peeked: None,
            line: 1,
            column: 1,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn peek(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    pub fn peek_second(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = match self.peeked.take() {
            Some(c) => Some(c),
            None => self.chars.next(),
        };
        if let Some(c) = c {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    pub fn eat_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut c = Cursor::new("ab\ncd");
        assert_eq!((c.line(), c.column()), (1, 1));
        c.bump();
        assert_eq!((c.line(), c.column()), (1, 2));
        c.bump();
        c.bump(); // consumes '\n'
        assert_eq!((c.line(), c.column()), (2, 1));
    }

    #[test]
    fn eat_if_only_consumes_on_match() {
        let mut c = Cursor::new("==");
        assert!(c.eat_if('='));
        assert!(c.eat_if('='));
        assert!(!c.eat_if('='));
    }
}
