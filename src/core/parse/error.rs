use crate::core::source::Origin;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("{0}: expecting {1}")]
    Expecting(Origin, String),
    #[error("{0}: module declaration is incomplete")]
    ModuleIncomplete(Origin),
}
