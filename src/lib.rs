//! Reading Verilog and SystemVerilog: a preprocessor faithful to the
//! language's macro and conditional-compilation rules, a structural parser
//! that emits callback events instead of a full AST, and a netlist that
//! links module hierarchy, ports, nets, and cells across files.

pub mod core;
pub mod diagnostic;
pub mod error;

pub use crate::core::lang::LanguageStandard;
pub use crate::core::netlist::Netlist;
pub use crate::core::parse::{Parser, ParserHandler, PinBinding, PortDirection};
pub use crate::core::preproc::Preproc;
pub use crate::core::source::Origin;
