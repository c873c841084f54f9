use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LangError {
    #[error("invalid number literal \"{0}\"")]
    InvalidNumber(String),
    #[error("missing closing sequence for block comment (*/)")]
    UnclosedBlockComment,
    #[error("invalid character {0}")]
    InvalidChar(char),
    #[error("invalid sequence {0}")]
    InvalidSequence(String),
    #[error("expecting closing delimiter {0}")]
    UnclosedLiteral(char),
    #[error("expecting base specifier for based constant")]
    MissingBaseSpecifier,
    #[error("invalid base specifier {0}")]
    InvalidBaseSpecifier(char),
    #[error("expecting digits after base specifier")]
    EmptyBasedNumber,
    #[error("invalid digit {0} for base {1}")]
    InvalidDigit(char, u32),
    #[error("expecting identifier characters immediately after ` directive prefix")]
    EmptyDirective,
    #[error("malformed bus range \"{0}\"")]
    InvalidBusRange(String),
    #[error("unknown language standard \"{0}\"")]
    UnknownStandard(String),
}
