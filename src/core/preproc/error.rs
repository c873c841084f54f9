use crate::core::source::{Origin, SourceError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PreprocError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{0}: nested includes exceed the depth limit of {1}")]
    IncludeDepthExceeded(Origin, usize),
    #[error("{0}: `{1} was never closed with `endif")]
    UnterminatedIfdef(Origin, String),
    #[error("{0}: `endif without a matching `ifdef/`ifndef")]
    DanglingEndif(Origin),
    #[error("{0}: `{1} without a matching `ifdef/`ifndef")]
    DanglingElse(Origin, String),
    #[error("{0}: macro `{1} expects {2} argument(s) but was given {3}")]
    MacroArity(Origin, String, usize, usize),
    #[error("{0}: malformed `{1} directive")]
    Malformed(Origin, String),
}
