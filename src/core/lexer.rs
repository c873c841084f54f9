use std::cmp::Ordering;
use std::fmt::Display;
use std::iter::Peekable;

/// A line/column marker into a source text. Lines start at 1, columns at 0.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Position {
    line: usize,
    col: usize,
}

impl Position {
    /// Creates a new `Position` at line 1, col 0.
    pub fn new() -> Self {
        Self { line: 1, col: 0 }
    }

    /// Creates a `Position` at a particular `line`:`col`.
    pub fn place(line: usize, col: usize) -> Self {
        Self {
            line: line,
            col: col,
        }
    }

    /// Increments the column counter by 1.
    pub fn next_col(&mut self) {
        self.col += 1;
    }

    /// Increments the line counter by 1 and resets the column counter.
    pub fn next_line(&mut self) {
        self.line += 1;
        self.col = 0;
    }

    /// Advances the marker over `c`, dropping to the next line on a newline.
    pub fn step(&mut self, c: &char) {
        self.next_col();
        if c == &'\n' {
            self.next_line();
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(match self.line.cmp(&other.line) {
            Ordering::Equal => self.col.cmp(&other.col),
            ord => ord,
        })
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A unit of lexical meaning paired with the position of its first character.
#[derive(Debug, PartialEq, Clone)]
pub struct Token<T> {
    position: Position,
    ttype: T,
}

impl<T> Token<T> {
    /// Creates a new token.
    pub fn new(ttype: T, loc: Position) -> Self {
        Self {
            position: loc,
            ttype: ttype,
        }
    }

    /// References the inner token type.
    pub fn as_type(&self) -> &T {
        &self.ttype
    }

    /// Transforms the token into its type.
    pub fn take(self) -> T {
        self.ttype
    }

    /// Returns the position in the text where the token was captured.
    pub fn locate(&self) -> &Position {
        &self.position
    }

    /// Splits the token into its position and type.
    pub fn decouple(self) -> (Position, T) {
        (self.position, self.ttype)
    }

    /// Transforms the token into its `Position`.
    pub fn into_position(self) -> Position {
        self.position
    }
}

/// An error produced while capturing a token, located at the character that
/// stopped the capture.
#[derive(Debug, PartialEq)]
pub struct TokenError<T: Display> {
    position: Position,
    err: T,
}

impl<T: Display> TokenError<T> {
    pub fn new(err: T, loc: Position) -> Self {
        Self {
            position: loc,
            err: err,
        }
    }

    pub fn locate(&self) -> &Position {
        &self.position
    }

    pub fn as_err(&self) -> &T {
        &self.err
    }
}

impl<T: Display> Display for TokenError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.position, self.err)
    }
}

/// Keeps the current position in the contents as characters are consumed.
pub struct Cursor<T>
where
    T: Iterator<Item = char>,
{
    contents: Peekable<T>,
    loc: Position,
}

impl<T> Cursor<T>
where
    T: Iterator<Item = char>,
{
    /// Creates a new `Cursor` over `s` with an initial position (1, 0).
    pub fn new(s: T) -> Self {
        Self {
            loc: Position::new(),
            contents: s.peekable(),
        }
    }

    /// Takes the next char in the iterator and steps the `Position` marker
    /// accordingly, if a char exists.
    pub fn consume(&mut self) -> Option<char> {
        if let Some(c) = self.contents.next() {
            self.loc.step(&c);
            Some(c)
        } else {
            None
        }
    }

    /// References the next char in the iterator, if it exists.
    pub fn peek(&mut self) -> Option<&char> {
        self.contents.peek()
    }

    /// Access the position of the most recently consumed character.
    pub fn locate(&self) -> &Position {
        &self.loc
    }
}

pub trait Tokenize {
    type TokenType;
    type Err;

    fn tokenize(
        s: &str,
        standard: crate::core::lang::LanguageStandard,
    ) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>>
    where
        Self::Err: Display;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_position() {
        let mut pos = Position::new();
        assert_eq!(pos, Position::place(1, 0));
        pos.next_col();
        assert_eq!(pos, Position::place(1, 1));
        pos.next_line();
        assert_eq!(pos, Position::place(2, 0));
        pos.step(&'a');
        assert_eq!(pos, Position::place(2, 1));
        pos.step(&'\n');
        assert_eq!(pos, Position::place(3, 0));
    }

    #[test]
    fn cursor_tracks_location() {
        let mut cur = Cursor::new("ab\nc".chars());
        assert_eq!(cur.consume(), Some('a'));
        assert_eq!(cur.locate(), &Position::place(1, 1));
        assert_eq!(cur.peek(), Some(&'b'));
        assert_eq!(cur.consume(), Some('b'));
        assert_eq!(cur.consume(), Some('\n'));
        assert_eq!(cur.locate(), &Position::place(2, 0));
        assert_eq!(cur.consume(), Some('c'));
        assert_eq!(cur.consume(), None);
    }
}
