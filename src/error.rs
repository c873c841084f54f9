use crate::core::netlist::NetlistError;
use crate::core::preproc::error::PreprocError;
use crate::core::source::SourceError;
use std::path::PathBuf;
use thiserror::Error;

pub const EXIT_OK: i32 = 0;
pub const EXIT_PREPROC: i32 = 1;
pub const EXIT_IO: i32 = 2;
pub const EXIT_USAGE: i32 = 3;
pub const EXIT_LINK: i32 = 4;

/// The CLI-facing error type: everything the binaries can hit, each mapped
/// onto the documented exit codes.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Preproc(#[from] PreprocError),
    #[error(transparent)]
    Netlist(#[from] NetlistError),
    #[error("failed to write {0:?}: {1}")]
    OutputWrite(PathBuf, String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Preproc(e) => preproc_code(e),
            Self::Netlist(NetlistError::Preproc(e)) => preproc_code(e),
            Self::Netlist(_) => EXIT_PREPROC,
            Self::OutputWrite(..) => EXIT_IO,
        }
    }
}

fn preproc_code(e: &PreprocError) -> i32 {
    match e {
        PreprocError::Source(SourceError::Io(..)) => EXIT_IO,
        _ => EXIT_PREPROC,
    }
}
