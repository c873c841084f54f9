use super::error::LangError;
use super::token::VerilogToken;
use super::LanguageStandard;
use crate::core::lexer::{Cursor, Token, TokenError, Tokenize};

pub mod char_set {
    pub const DOUBLE_QUOTE: char = '\"';
    pub const STAR: char = '*';
    pub const FWD_SLASH: char = '/';
    pub const SINGLE_QUOTE: char = '\'';
    pub const UNDER_SCORE: char = '_';
    pub const DOLLAR_SIGN: char = '$';
    pub const GRAVE_ACCENT: char = '`';
    pub const ESC: char = '\\';
    pub const DOT: char = '.';

    /// Checks if `c` is an ascii letter.
    pub fn is_letter(c: &char) -> bool {
        c.is_ascii_alphabetic()
    }

    pub fn is_digit(c: &char) -> bool {
        c.is_ascii_digit()
    }

    pub fn is_newline(c: &char) -> bool {
        c == &'\n'
    }

    /// The set \[a-z]\[A-Z]\[0-9]\[_]\[$] allowed in identifiers after the
    /// first character.
    pub fn is_identifier_character(c: &char) -> bool {
        c.is_ascii_alphanumeric() || c == &UNDER_SCORE || c == &DOLLAR_SIGN
    }

    pub fn is_digit_or_underscore(c: &char) -> bool {
        is_digit(c) || c == &UNDER_SCORE
    }

    /// Digits legal after a base specifier, including unknowns.
    pub fn is_based_constant_character(c: &char) -> bool {
        c.is_ascii_hexdigit() || c == &UNDER_SCORE || matches!(*c, 'x' | 'X' | 'z' | 'Z' | '?')
    }

    // space, nbsp, and the format effectors (ht, vt, cr, lf)
    pub fn is_whitespace(c: &char) -> bool {
        c == &'\u{0020}'
            || c == &'\u{00A0}'
            || c == &'\u{0009}'
            || c == &'\u{000B}'
            || c == &'\u{000D}'
            || c == &'\u{000A}'
    }

    pub fn is_not_whitespace(c: &char) -> bool {
        is_whitespace(c) == false
    }
}

/// Performs lexical analysis over preprocessed Verilog text, producing
/// positioned tokens. Keyword classification depends on the language
/// standard the tokenizer was asked to honor.
#[derive(Debug, PartialEq)]
pub struct VerilogTokenizer {
    tokens: Vec<Result<Token<VerilogToken>, TokenError<LangError>>>,
}

impl Tokenize for VerilogTokenizer {
    type TokenType = VerilogToken;
    type Err = LangError;

    fn tokenize(
        s: &str,
        standard: LanguageStandard,
    ) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> {
        let mut train = Cursor::new(s.chars());
        let mut tokens: Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> = Vec::new();
        while let Some(c) = train.consume() {
            if char_set::is_whitespace(&c) == true {
                continue;
            }
            let tk_loc = train.locate().clone();
            let next = train.peek().copied();
            let captured = if char_set::is_letter(&c) == true
                || c == char_set::UNDER_SCORE
                || c == char_set::DOLLAR_SIGN
            {
                VerilogToken::consume_word(&mut train, c, standard)
            } else if c == char_set::ESC {
                VerilogToken::consume_escaped_identifier(&mut train)
            } else if c == char_set::DOUBLE_QUOTE {
                VerilogToken::consume_str_literal(&mut train)
            } else if char_set::is_digit(&c) == true {
                VerilogToken::consume_number(&mut train, c)
            } else if c == char_set::SINGLE_QUOTE
                && next.is_some_and(|d| {
                    char_set::is_based_constant_character(&d)
                        || matches!(d, 's' | 'S' | 'o' | 'O' | 'b' | 'B' | 'd' | 'D' | 'h' | 'H')
                })
            {
                VerilogToken::consume_number(&mut train, c)
            } else if c == char_set::FWD_SLASH && next == Some(char_set::FWD_SLASH) {
                VerilogToken::consume_oneline_comment(&mut train)
            } else if c == char_set::FWD_SLASH && next == Some(char_set::STAR) {
                VerilogToken::consume_block_comment(&mut train)
            } else if c == char_set::GRAVE_ACCENT {
                VerilogToken::consume_directive(&mut train)
            } else {
                VerilogToken::consume_operator(&mut train, c)
            };
            tokens.push(match captured {
                Ok(tk) => Ok(Token::new(tk, tk_loc)),
                Err(e) => Err(TokenError::new(e, train.locate().clone())),
            });
        }
        let mut tk_loc = train.locate().clone();
        tk_loc.next_col();
        tokens.push(Ok(Token::new(VerilogToken::Eof, tk_loc)));
        tokens
    }
}

impl VerilogTokenizer {
    /// Tokenizes `s`, holding on to both tokens and capture errors.
    pub fn from_source_code(s: &str, standard: LanguageStandard) -> Self {
        Self {
            tokens: Self::tokenize(s, standard),
        }
    }

    /// Transforms the results into tokens, silently dropping errors and
    /// comments.
    pub fn into_tokens(self) -> Vec<Token<VerilogToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f {
                Ok(t) => match t.as_type().is_comment() {
                    true => None,
                    false => Some(t),
                },
                Err(_) => None,
            })
            .collect()
    }

    /// Transforms the results into tokens, keeping comments but dropping
    /// errors.
    pub fn into_tokens_all(self) -> Vec<Token<VerilogToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| f.ok())
            .collect()
    }

    /// References the capture errors encountered during analysis.
    pub fn errors(&self) -> Vec<&TokenError<LangError>> {
        self.tokens.iter().filter_map(|f| f.as_ref().err()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::keyword::Keyword;
    use super::super::operator::Operator;
    use super::super::token::Identifier;
    use super::*;
    use crate::core::lexer::Position;

    fn kinds(s: &str) -> Vec<VerilogToken> {
        VerilogTokenizer::from_source_code(s, LanguageStandard::Sv2017)
            .into_tokens()
            .into_iter()
            .map(|t| t.take())
            .collect()
    }

    #[test]
    fn ut_module_header() {
        let tokens = kinds("module top(clk);");
        assert_eq!(
            tokens,
            vec![
                VerilogToken::Keyword(Keyword::Module),
                VerilogToken::Identifier(Identifier::Basic("top".to_string())),
                VerilogToken::Operator(Operator::ParenL),
                VerilogToken::Identifier(Identifier::Basic("clk".to_string())),
                VerilogToken::Operator(Operator::ParenR),
                VerilogToken::Operator(Operator::Terminator),
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn ut_comments_are_skipped() {
        let tokens = kinds("a // one\n/* two */ b");
        assert_eq!(
            tokens,
            vec![
                VerilogToken::Identifier(Identifier::Basic("a".to_string())),
                VerilogToken::Identifier(Identifier::Basic("b".to_string())),
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn ut_directive_and_system_id() {
        let tokens = kinds("`line 3 \"top.v\" 0\n$display");
        assert_eq!(
            tokens,
            vec![
                VerilogToken::Directive("line".to_string()),
                VerilogToken::Number("3".to_string()),
                VerilogToken::StringLiteral("top.v".to_string()),
                VerilogToken::Number("0".to_string()),
                VerilogToken::Identifier(Identifier::System("display".to_string())),
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn ut_positions() {
        let tokens: Vec<Token<VerilogToken>> =
            VerilogTokenizer::from_source_code("a\n  b", LanguageStandard::Sv2017).into_tokens();
        assert_eq!(tokens[0].locate(), &Position::place(1, 1));
        assert_eq!(tokens[1].locate(), &Position::place(2, 3));
    }

    #[test]
    fn ut_escaped_identifier() {
        let tokens = kinds("\\bus+a clk");
        assert_eq!(
            tokens,
            vec![
                VerilogToken::Identifier(Identifier::Escaped("bus+a".to_string())),
                VerilogToken::Identifier(Identifier::Basic("clk".to_string())),
                VerilogToken::Eof,
            ]
        );
    }

    #[test]
    fn ut_operators_longest_match() {
        let tokens = kinds("a <<<= b === c");
        assert_eq!(
            tokens,
            vec![
                VerilogToken::Identifier(Identifier::Basic("a".to_string())),
                VerilogToken::Operator(Operator::Expr("<<<=")),
                VerilogToken::Identifier(Identifier::Basic("b".to_string())),
                VerilogToken::Operator(Operator::Expr("===")),
                VerilogToken::Identifier(Identifier::Basic("c".to_string())),
                VerilogToken::Eof,
            ]
        );
    }
}
