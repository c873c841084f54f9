use crate::core::source::Origin;
use colored::Colorize;
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Warning => "warning",
                Self::Error => "error",
            }
        )
    }
}

/// The recoverable findings the preprocessor, parser, and linker can report
/// without aborting a translation unit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DiagnosticKind {
    MacroRedefinition,
    UnknownDirective,
    MalformedDirective,
    DuplicateModule,
    UnresolvedSubmodule,
    UnknownPort,
    PortArity,
    MixedBinding,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MacroRedefinition
            | Self::UnknownDirective
            | Self::MalformedDirective
            | Self::DuplicateModule
            | Self::UnresolvedSubmodule
            | Self::UnknownPort
            | Self::PortArity
            | Self::MixedBinding => Severity::Warning,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    origin: Option<Origin>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind: kind,
            message: message.into(),
            origin: None,
        }
    }

    pub fn at(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Renders the diagnostic for stderr with a colored severity tag.
    pub fn render(&self) -> String {
        let tag = match self.severity() {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        match &self.origin {
            Some(o) => format!("{}: {}: {}", tag, o, self.message),
            None => format!("{}: {}", tag, self.message),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            Some(o) => write!(f, "{}: {}: {}", self.severity(), o, self.message),
            None => write!(f, "{}: {}", self.severity(), self.message),
        }
    }
}

/// Accumulates diagnostics for one preprocessor/parser/netlist instance so
/// callers decide when and how to surface them.
#[derive(Debug, PartialEq, Clone)]
pub struct DiagnosticSink {
    items: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind() == kind).count()
    }

    /// Takes every accumulated diagnostic, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }

    /// Merges another sink's findings into this one.
    pub fn absorb(&mut self, mut other: DiagnosticSink) {
        self.items.append(&mut other.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_accumulates_and_counts() {
        let mut sink = DiagnosticSink::new();
        sink.push(Diagnostic::new(DiagnosticKind::UnknownDirective, "`foo"));
        sink.push(
            Diagnostic::new(DiagnosticKind::DuplicateModule, "module m")
                .at(Origin::new("a.v", 4)),
        );
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count_of(DiagnosticKind::DuplicateModule), 1);
        let items = sink.drain();
        assert_eq!(items.len(), 2);
        assert!(sink.is_empty());
        assert_eq!(items[1].to_string(), "warning: a.v:4: module m");
    }
}
