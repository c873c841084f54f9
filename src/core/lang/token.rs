use super::error::LangError;
use super::keyword::Keyword;
use super::operator::Operator;
use super::tokenizer::char_set;
use super::LanguageStandard;
use crate::core::lexer::Cursor;
use std::fmt::Display;

/// The three identifier spellings of the language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Basic(String),
    /// Introduced with `\` and terminated by whitespace.
    Escaped(String),
    /// A system task/function name introduced with `$`.
    System(String),
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(id) => id.as_ref(),
            Self::Escaped(id) => id.as_ref(),
            Self::System(id) => id.as_ref(),
        }
    }

    pub fn is_system(&self) -> bool {
        match self {
            Self::System(_) => true,
            _ => false,
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic(id) => write!(f, "{}", id),
            Self::Escaped(id) => write!(f, "\\{}", id),
            Self::System(id) => write!(f, "${}", id),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Comment {
    OneLine(String),
    Block(String),
}

impl Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneLine(c) => write!(f, "//{}", c),
            Self::Block(c) => write!(f, "/*{}*/", c),
        }
    }
}

/// Lexical elements of preprocessed Verilog text. Numbers keep their raw
/// spelling; value extraction goes through `lang::number` on demand.
#[derive(Debug, PartialEq, Clone)]
pub enum VerilogToken {
    Comment(Comment),
    Operator(Operator),
    Number(String),
    Identifier(Identifier),
    Keyword(Keyword),
    StringLiteral(String),
    Directive(String),
    Eof,
}

impl Display for VerilogToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comment(c) => write!(f, "{}", c),
            Self::Operator(o) => write!(f, "{}", o),
            Self::Number(n) => write!(f, "{}", n),
            Self::Identifier(i) => write!(f, "{}", i),
            Self::Keyword(k) => write!(f, "{}", k),
            Self::StringLiteral(s) => write!(f, "\"{}\"", s),
            Self::Directive(d) => write!(f, "`{}", d),
            Self::Eof => Ok(()),
        }
    }
}

impl VerilogToken {
    /// Checks if the token is the particular keyword `kw`.
    pub fn check_keyword(&self, kw: &Keyword) -> bool {
        match self {
            Self::Keyword(k) => k == kw,
            _ => false,
        }
    }

    /// Checks if the token is the particular operator `op`.
    pub fn check_delimiter(&self, op: &Operator) -> bool {
        match self {
            Self::Operator(o) => o == op,
            _ => false,
        }
    }

    pub fn is_eof(&self) -> bool {
        match self {
            Self::Eof => true,
            _ => false,
        }
    }

    pub fn is_comment(&self) -> bool {
        match self {
            Self::Comment(_) => true,
            _ => false,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn take_identifier(self) -> Option<Identifier> {
        match self {
            Self::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn as_delimiter(&self) -> Option<&Operator> {
        match self {
            Self::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&str> {
        match self {
            Self::Directive(d) => Some(d.as_ref()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(n) => Some(n.as_ref()),
            _ => None,
        }
    }
}

impl VerilogToken {
    /// Collects characters while `eval` accepts them, starting from the
    /// optional already-consumed `c0`.
    pub fn consume_value_pattern(
        train: &mut Cursor<impl Iterator<Item = char>>,
        c0: Option<char>,
        eval: fn(&char) -> bool,
    ) -> String {
        let mut word = match c0 {
            Some(c) => String::from(c),
            None => String::new(),
        };
        while let Some(c) = train.peek() {
            if eval(c) == true {
                word.push(train.consume().unwrap());
            } else {
                break;
            }
        }
        word
    }

    /// Captures a keyword, basic identifier, or system identifier. Assumes
    /// `c0` (a letter, underscore, or `$`) was the last consumed character.
    /// Keyword classification honors `standard`; words reserved only by a
    /// later revision stay identifiers.
    pub fn consume_word(
        train: &mut Cursor<impl Iterator<Item = char>>,
        c0: char,
        standard: LanguageStandard,
    ) -> Result<Self, LangError> {
        let word = Self::consume_value_pattern(train, Some(c0), char_set::is_identifier_character);
        if c0 == char_set::DOLLAR_SIGN {
            return Ok(Self::Identifier(Identifier::System(
                word[1..].to_string(),
            )));
        }
        match Keyword::match_keyword(&word) {
            Some(kw) if kw.is_reserved_in(standard) == true => Ok(Self::Keyword(kw)),
            _ => Ok(Self::Identifier(Identifier::Basic(word))),
        }
    }

    /// Captures an escaped identifier. Assumes the `\` was the last consumed
    /// character; collection stops at the first whitespace.
    pub fn consume_escaped_identifier(
        train: &mut Cursor<impl Iterator<Item = char>>,
    ) -> Result<Self, LangError> {
        let word = Self::consume_value_pattern(train, None, char_set::is_not_whitespace);
        match word.is_empty() {
            true => Err(LangError::InvalidChar('\\')),
            false => Ok(Self::Identifier(Identifier::Escaped(word))),
        }
    }

    /// Captures a compiler directive name. Assumes the backtick was the last
    /// consumed character and requires the name to follow immediately.
    pub fn consume_directive(
        train: &mut Cursor<impl Iterator<Item = char>>,
    ) -> Result<Self, LangError> {
        let word = Self::consume_value_pattern(train, None, char_set::is_identifier_character);
        match word.is_empty() {
            true => Err(LangError::EmptyDirective),
            false => Ok(Self::Directive(word)),
        }
    }

    /// Captures a string literal. Assumes the opening `"` was the last
    /// consumed character. Escaped characters are kept verbatim.
    pub fn consume_str_literal(
        train: &mut Cursor<impl Iterator<Item = char>>,
    ) -> Result<Self, LangError> {
        let mut value = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::ESC {
                value.push(c);
                match train.consume() {
                    Some(d) => value.push(d),
                    None => return Err(LangError::UnclosedLiteral('"')),
                }
            } else if c == char_set::DOUBLE_QUOTE {
                return Ok(Self::StringLiteral(value));
            } else {
                value.push(c);
            }
        }
        Err(LangError::UnclosedLiteral('"'))
    }

    /// Collects a `//` comment up to (not including) the end of line.
    /// Assumes the first `/` was consumed and the next char is `/`.
    pub fn consume_oneline_comment(
        train: &mut Cursor<impl Iterator<Item = char>>,
    ) -> Result<Self, LangError> {
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.peek() {
            if char_set::is_newline(c) == true {
                break;
            }
            note.push(train.consume().unwrap());
        }
        Ok(Self::Comment(Comment::OneLine(note)))
    }

    /// Collects a `/* */` comment. Assumes the first `/` was consumed and
    /// the next char is `*`. Block comments do not nest.
    pub fn consume_block_comment(
        train: &mut Cursor<impl Iterator<Item = char>>,
    ) -> Result<Self, LangError> {
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::STAR {
                if train.peek() == Some(&char_set::FWD_SLASH) {
                    train.consume();
                    return Ok(Self::Comment(Comment::Block(note)));
                }
            }
            note.push(c);
        }
        Err(LangError::UnclosedBlockComment)
    }

    /// Captures an operator/punctuation sequence by greedily extending the
    /// match one character at a time.
    pub fn consume_operator(
        train: &mut Cursor<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<Self, LangError> {
        let mut op_buf = String::from(c0);
        if Operator::transform(&op_buf).is_none() {
            return Err(LangError::InvalidSequence(op_buf));
        }
        while let Some(c) = train.peek() {
            let mut attempt = op_buf.clone();
            attempt.push(*c);
            match Operator::transform(&attempt) {
                Some(_) => {
                    train.consume();
                    op_buf = attempt;
                }
                None => break,
            }
        }
        // guaranteed to match; every extension was validated
        Ok(Self::Operator(Operator::transform(&op_buf).unwrap()))
    }

    /// Captures an integer literal, a based constant, or a tolerated
    /// real/time constant, keeping the raw spelling. Assumes `c0` (a digit
    /// or `'`) was the last consumed character.
    pub fn consume_number(
        train: &mut Cursor<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<Self, LangError> {
        let mut number = String::new();

        if c0 != char_set::SINGLE_QUOTE {
            number.push_str(&Self::consume_value_pattern(
                train,
                Some(c0),
                char_set::is_digit_or_underscore,
            ));
            // real constants keep their fraction and exponent
            if train.peek() == Some(&char_set::DOT) {
                number.push(train.consume().unwrap());
                number.push_str(&Self::consume_value_pattern(
                    train,
                    None,
                    char_set::is_digit_or_underscore,
                ));
            }
            if train.peek().is_some_and(|c| c == &'e' || c == &'E') {
                number.push(train.consume().unwrap());
                if train.peek().is_some_and(|c| c == &'+' || c == &'-') {
                    number.push(train.consume().unwrap());
                }
                number.push_str(&Self::consume_value_pattern(
                    train,
                    None,
                    char_set::is_digit_or_underscore,
                ));
                return Ok(Self::Number(number));
            }
            // time units ride along with the literal (1ns, 10ps)
            let unit = Self::consume_value_pattern(train, None, char_set::is_letter);
            if unit.is_empty() == false {
                number.push_str(&unit);
                return Ok(Self::Number(number));
            }
            match train.peek() {
                Some(&char_set::SINGLE_QUOTE) => {
                    number.push(train.consume().unwrap());
                }
                _ => return Ok(Self::Number(number)),
            }
        } else {
            number.push(c0);
        }

        // based constant: optional signedness, base specifier, digits
        if train.peek().is_some_and(|c| c == &'s' || c == &'S') {
            number.push(train.consume().unwrap());
        }
        match train.consume() {
            Some(c) => match c {
                'b' | 'B' | 'o' | 'O' | 'd' | 'D' | 'h' | 'H' => number.push(c),
                _ => return Err(LangError::InvalidBaseSpecifier(c)),
            },
            None => return Err(LangError::MissingBaseSpecifier),
        }
        // whitespace may separate the base from its digits
        while train.peek().is_some_and(|c| c == &' ' || c == &'\t') {
            train.consume();
        }
        let digits =
            Self::consume_value_pattern(train, None, char_set::is_based_constant_character);
        match digits.is_empty() {
            true => Err(LangError::EmptyBasedNumber),
            false => {
                number.push_str(&digits);
                Ok(Self::Number(number))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_number(s: &str) -> Result<VerilogToken, LangError> {
        let mut train = Cursor::new(s.chars());
        let c0 = train.consume().unwrap();
        VerilogToken::consume_number(&mut train, c0)
    }

    #[test]
    fn ut_capture_based_constants() {
        assert_eq!(
            capture_number("8'hFF").unwrap(),
            VerilogToken::Number("8'hFF".to_string())
        );
        assert_eq!(
            capture_number("'h 837FF").unwrap(),
            VerilogToken::Number("'h837FF".to_string())
        );
        assert_eq!(
            capture_number("16'sd5").unwrap(),
            VerilogToken::Number("16'sd5".to_string())
        );
        assert!(capture_number("8'q0").is_err());
    }

    #[test]
    fn ut_capture_time_and_real() {
        assert_eq!(
            capture_number("1ns").unwrap(),
            VerilogToken::Number("1ns".to_string())
        );
        assert_eq!(
            capture_number("1.30e-2").unwrap(),
            VerilogToken::Number("1.30e-2".to_string())
        );
    }

    #[test]
    fn ut_capture_word_respects_standard() {
        let mut train = Cursor::new("ogic x".chars());
        let t = VerilogToken::consume_word(&mut train, 'l', LanguageStandard::V2001).unwrap();
        assert_eq!(
            t,
            VerilogToken::Identifier(Identifier::Basic("logic".to_string()))
        );

        let mut train = Cursor::new("ogic x".chars());
        let t = VerilogToken::consume_word(&mut train, 'l', LanguageStandard::Sv2017).unwrap();
        assert_eq!(t, VerilogToken::Keyword(Keyword::Logic));
    }
}
