use std::fmt::Display;

/// The punctuation the structural recognizer steers by, each with its own
/// variant. Everything else the language calls an operator never influences
/// module/port/instance shape here; those spellings only have to survive
/// round-trips into range and net-expression text, so they share the
/// `Expr` catch-all instead of a name each.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Operator {
    ParenL,
    ParenR,
    BrackL,
    BrackR,
    BraceL,
    BraceR,
    AttrL,
    AttrR,
    Comma,
    Terminator,
    Colon,
    Dot,
    Pound,
    Assign,
    Plus,
    Minus,
    Mult,
    Div,
    Expr(&'static str),
}

/// Operator spellings with no structural role. The tokenizer extends its
/// match one character at a time, so every prefix of a spelling listed here
/// must itself be a valid operator; sequences without that property (such
/// as `<->`) are left to lex as their parts.
const EXPR_SPELLINGS: &[&str] = &[
    "**", "%", "<", ">", "<=", ">=", "!", "&&", "||", "==", "!=", "===", "!==", "==?", "!=?",
    "~", "&", "|", "^", "^~", "~^", "~&", "~|", "<<", ">>", "<<<", ">>>", "?", "'", "@", "++",
    "--", "->", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "<<<=", ">>>=",
    "::",
];

impl Operator {
    /// Attempts to match the character sequence `s` to an operator.
    pub fn transform(s: &str) -> Option<Self> {
        Some(match s {
            "(" => Self::ParenL,
            ")" => Self::ParenR,
            "[" => Self::BrackL,
            "]" => Self::BrackR,
            "{" => Self::BraceL,
            "}" => Self::BraceR,
            "(*" => Self::AttrL,
            "*)" => Self::AttrR,
            "," => Self::Comma,
            ";" => Self::Terminator,
            ":" => Self::Colon,
            "." => Self::Dot,
            "#" => Self::Pound,
            "=" => Self::Assign,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Mult,
            "/" => Self::Div,
            _ => Self::Expr(EXPR_SPELLINGS.iter().find(|op| **op == s)?),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ParenL => "(",
            Self::ParenR => ")",
            Self::BrackL => "[",
            Self::BrackR => "]",
            Self::BraceL => "{",
            Self::BraceR => "}",
            Self::AttrL => "(*",
            Self::AttrR => "*)",
            Self::Comma => ",",
            Self::Terminator => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Pound => "#",
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::Expr(s) => s,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_transform() {
        assert_eq!(Operator::transform("("), Some(Operator::ParenL));
        assert_eq!(Operator::transform("(*"), Some(Operator::AttrL));
        assert_eq!(Operator::transform("<<<="), Some(Operator::Expr("<<<=")));
        assert_eq!(Operator::transform("$"), None);
        assert_eq!(Operator::transform("<-"), None);
    }

    #[test]
    fn ut_every_prefix_is_an_operator() {
        // the greedy matcher depends on this holding for the whole table
        for op in EXPR_SPELLINGS {
            for end in 1..op.len() {
                assert!(
                    Operator::transform(&op[..end]).is_some(),
                    "prefix {} of {} does not match",
                    &op[..end],
                    op
                );
            }
        }
    }

    #[test]
    fn ut_round_trip_spelling() {
        for s in ["(", "*)", ";", "===", ">>>=", "::", "'"] {
            assert_eq!(Operator::transform(s).unwrap().as_str(), s);
        }
    }
}
