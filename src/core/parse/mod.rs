pub mod error;

use crate::core::lang::keyword::Keyword;
use crate::core::lang::operator::Operator;
use crate::core::lang::token::VerilogToken;
use crate::core::lang::tokenizer::VerilogTokenizer;
use crate::core::lang::LanguageStandard;
use crate::core::lexer::Token;
use crate::core::source::Origin;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use error::ParseError;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Direction of a module port.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PortDirection {
    Input,
    Output,
    Inout,
    Ref,
}

impl PortDirection {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Inout => "inout",
            Self::Ref => "ref",
        }
    }

    fn from_keyword(kw: &Keyword) -> Option<Self> {
        match kw {
            Keyword::Input => Some(Self::Input),
            Keyword::Output => Some(Self::Output),
            Keyword::Inout => Some(Self::Inout),
            Keyword::Ref => Some(Self::Ref),
            _ => None,
        }
    }
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a pin (or parameter override) attaches to its target: by port name
/// or by position.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum PinBinding {
    Named(String),
    Positional(usize),
}

/// The structural events the recognizer emits, in source order. Every
/// method has an empty default so consumers override only what they need.
///
/// For a module the order is: `module_begin`, header parameter/port events,
/// body events as encountered, `module_end`. For an instance: `cell_begin`,
/// `cell_parameter`* (overrides), `pin`*, `cell_end`.
pub trait ParserHandler {
    fn module_begin(&mut self, _name: &str, _loc: &Origin) {}
    /// A port from the header or a body direction declaration. `direction`
    /// is `None` for a non-ANSI header name whose direction arrives later.
    fn port(
        &mut self,
        _name: &str,
        _direction: Option<PortDirection>,
        _range: Option<&str>,
        _net_type: Option<&str>,
        _loc: &Origin,
    ) {
    }
    fn signal_declaration(&mut self, _kind: &str, _name: &str, _range: Option<&str>, _loc: &Origin) {
    }
    fn parameter(&mut self, _name: &str, _default_text: &str, _loc: &Origin) {}
    fn cell_begin(&mut self, _instance: &str, _submodule: &str, _loc: &Origin) {}
    fn cell_parameter(&mut self, _binding: &PinBinding, _value_text: &str, _loc: &Origin) {}
    fn pin(&mut self, _binding: &PinBinding, _net_expr: &str, _loc: &Origin) {}
    fn cell_end(&mut self, _instance: &str, _loc: &Origin) {}
    fn module_end(&mut self, _name: &str, _loc: &Origin) {}
}

type TokenStream = Peekable<IntoIter<Token<VerilogToken>>>;
type Statement = Vec<Token<VerilogToken>>;

/// Tracks which file and line the token stream is currently attributed to,
/// folding in the `` `line `` markers the preprocessor left behind.
struct Provenance {
    file: String,
    adjust: i64,
}

impl Provenance {
    fn new(origin: &str) -> Self {
        Self {
            file: origin.to_string(),
            adjust: 0,
        }
    }

    fn origin_of(&self, token: &Token<VerilogToken>) -> Origin {
        let line = (token.locate().line() as i64 + self.adjust).max(1) as usize;
        Origin::new(self.file.clone(), line)
    }

    /// Applies a `` `line <n> "<file>" <level> `` marker whose directive
    /// token sat on physical line `marker_line`.
    fn apply_marker(&mut self, declared: usize, file: String, marker_line: usize) {
        self.adjust = declared as i64 - (marker_line as i64 + 1);
        self.file = file;
    }
}

/// The structural recognizer. It detects modules, ports, signals,
/// parameters, and instances, emitting events through a `ParserHandler`;
/// everything else is skipped at statement granularity.
pub struct Parser {
    standard: LanguageStandard,
    diagnostics: DiagnosticSink,
}

impl Parser {
    pub fn new(standard: LanguageStandard) -> Self {
        Self {
            standard: standard,
            diagnostics: DiagnosticSink::new(),
        }
    }

    pub fn standard(&self) -> LanguageStandard {
        self.standard
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }

    /// Parses preprocessed text, attributing provenance to `origin` until a
    /// line marker says otherwise, and drives `handler` with the structure
    /// found.
    pub fn parse(
        &mut self,
        text: &str,
        origin: &str,
        handler: &mut dyn ParserHandler,
    ) -> Result<(), ParseError> {
        let tokens = VerilogTokenizer::from_source_code(text, self.standard).into_tokens();
        let mut stream: TokenStream = tokens.into_iter().peekable();
        let mut prov = Provenance::new(origin);

        while let Some(t) = stream.next() {
            if t.as_type().is_eof() == true {
                break;
            }
            if let Some(name) = t.as_type().as_directive() {
                let marker_line = t.locate().line();
                let name = name.to_string();
                Self::take_directive_operands(&mut stream, &mut prov, &name, marker_line);
            } else if t.as_type().check_keyword(&Keyword::Module)
                || t.as_type().check_keyword(&Keyword::Macromodule)
            {
                let loc = prov.origin_of(&t);
                self.parse_module(&mut stream, &mut prov, loc, handler)?;
            }
            // anything else at the global scope is not structural
        }
        Ok(())
    }

    /// Consumes the rest of a directive's operands (same physical line) and
    /// applies `line` markers to the provenance state.
    fn take_directive_operands(
        stream: &mut TokenStream,
        prov: &mut Provenance,
        name: &str,
        marker_line: usize,
    ) {
        let mut operands: Vec<VerilogToken> = Vec::new();
        while let Some(t) = stream.peek() {
            if t.locate().line() != marker_line || t.as_type().is_eof() == true {
                break;
            }
            operands.push(stream.next().unwrap().take());
        }
        if name == "line" {
            let declared = operands
                .get(0)
                .and_then(|t| t.as_number())
                .and_then(|n| n.parse::<usize>().ok());
            let file = operands.get(1).and_then(|t| match t {
                VerilogToken::StringLiteral(s) => Some(s.clone()),
                _ => None,
            });
            if let (Some(declared), Some(file)) = (declared, file) {
                prov.apply_marker(declared, file, marker_line);
            }
        }
    }

    fn parse_module(
        &mut self,
        stream: &mut TokenStream,
        prov: &mut Provenance,
        loc: Origin,
        handler: &mut dyn ParserHandler,
    ) -> Result<(), ParseError> {
        let name = match stream.next() {
            Some(t) => match t.take().take_identifier() {
                Some(id) => id.to_string(),
                None => return Err(ParseError::ModuleIncomplete(loc)),
            },
            None => return Err(ParseError::ModuleIncomplete(loc)),
        };
        handler.module_begin(&name, &loc);
        self.parse_module_header(stream, prov, handler, &loc)?;
        self.parse_module_body(stream, prov, handler, &name, &loc)?;
        Ok(())
    }

    /// Parses the optional `#( ... )` parameter list and `( ... )` port list
    /// of a module declaration, through the closing `;`.
    fn parse_module_header(
        &mut self,
        stream: &mut TokenStream,
        prov: &mut Provenance,
        handler: &mut dyn ParserHandler,
        module_loc: &Origin,
    ) -> Result<(), ParseError> {
        while let Some(t) = stream.next() {
            if t.as_type().is_eof() == true {
                return Err(ParseError::ModuleIncomplete(module_loc.clone()));
            } else if let Some(name) = t.as_type().as_directive() {
                let name = name.to_string();
                let line = t.locate().line();
                Self::take_directive_operands(stream, prov, &name, line);
            } else if t.as_type().check_delimiter(&Operator::Pound) == true {
                match stream.next() {
                    Some(p) if p.as_type().check_delimiter(&Operator::ParenL) == true => {
                        let group = gather_group(stream, Operator::ParenL, Operator::ParenR);
                        self.emit_header_parameters(&group, prov, handler);
                    }
                    _ => {
                        return Err(ParseError::Expecting(
                            module_loc.clone(),
                            "( after #".to_string(),
                        ))
                    }
                }
            } else if t.as_type().check_delimiter(&Operator::ParenL) == true {
                let group = gather_group(stream, Operator::ParenL, Operator::ParenR);
                self.emit_header_ports(&group, prov, handler);
            } else if t.as_type().check_delimiter(&Operator::Terminator) == true {
                return Ok(());
            }
        }
        Err(ParseError::ModuleIncomplete(module_loc.clone()))
    }

    /// Walks the module body statement by statement until `endmodule`.
    fn parse_module_body(
        &mut self,
        stream: &mut TokenStream,
        prov: &mut Provenance,
        handler: &mut dyn ParserHandler,
        module_name: &str,
        module_loc: &Origin,
    ) -> Result<(), ParseError> {
        while let Some(t) = stream.next() {
            if t.as_type().is_eof() == true {
                return Err(ParseError::Expecting(
                    module_loc.clone(),
                    "endmodule".to_string(),
                ));
            }
            if t.as_type().check_keyword(&Keyword::Endmodule) == true {
                handler.module_end(module_name, &prov.origin_of(&t));
                return Ok(());
            }
            if let Some(name) = t.as_type().as_directive() {
                let name = name.to_string();
                let line = t.locate().line();
                Self::take_directive_operands(stream, prov, &name, line);
                continue;
            }
            // empty statements and attribute groups carry no structure
            if t.as_type().check_delimiter(&Operator::Terminator) == true {
                continue;
            }
            if t.as_type().check_delimiter(&Operator::AttrL) == true {
                while let Some(n) = stream.next() {
                    if n.as_type().check_delimiter(&Operator::AttrR) || n.as_type().is_eof() {
                        break;
                    }
                }
                continue;
            }
            // container constructs are skipped to their matching end keyword
            if let Some(kw) = t.as_type().as_keyword() {
                let closer = match kw {
                    Keyword::Function => Some(Keyword::Endfunction),
                    Keyword::Task => Some(Keyword::Endtask),
                    Keyword::Generate => Some(Keyword::Endgenerate),
                    Keyword::Specify => Some(Keyword::Endspecify),
                    _ => None,
                };
                if let Some(closer) = closer {
                    while let Some(n) = stream.next() {
                        if n.as_type().check_keyword(&closer) || n.as_type().is_eof() {
                            break;
                        }
                    }
                    continue;
                }
            }

            let stmt = gather_statement(t, stream);
            self.handle_statement(&stmt, prov, handler);
        }
        Err(ParseError::Expecting(
            module_loc.clone(),
            "endmodule".to_string(),
        ))
    }

    /// Recognizes one gathered statement as a port declaration, signal
    /// declaration, parameter, or instance; anything else is dropped.
    fn handle_statement(
        &mut self,
        stmt: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        let first = match stmt.first() {
            Some(t) => t,
            None => return,
        };
        if let Some(kw) = first.as_type().as_keyword() {
            if PortDirection::from_keyword(kw).is_some() {
                self.emit_port_declaration(stmt, prov, handler);
                return;
            }
            if kw.is_net_type() == true
                || kw == &Keyword::Integer
                || kw == &Keyword::Real
                || kw == &Keyword::Time
                || kw == &Keyword::Genvar
            {
                self.emit_signal_declaration(stmt, prov, handler);
                return;
            }
            if kw == &Keyword::Parameter {
                self.emit_parameters(stmt, prov, handler);
                return;
            }
            return;
        }
        if first.as_type().as_identifier().is_some() {
            self.try_instance(stmt, prov, handler);
        }
    }

    /// Emits `parameter` events out of a `#( ... )` header group, which may
    /// mix `parameter` keywords, types, ranges, and defaults.
    fn emit_header_parameters(
        &mut self,
        group: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        let mut i = 0;
        while i < group.len() {
            let t = &group[i];
            if let Some(id) = t.as_type().as_identifier() {
                let next_is_assign = group
                    .get(i + 1)
                    .is_some_and(|n| n.as_type().check_delimiter(&Operator::Assign));
                if next_is_assign == true {
                    let loc = prov.origin_of(t);
                    let name = id.to_string();
                    // take the default text through the next depth-0 comma
                    let mut j = i + 2;
                    let mut depth = 0;
                    let mut default: Statement = Vec::new();
                    while j < group.len() {
                        let d = &group[j];
                        if let Some(op) = d.as_type().as_delimiter() {
                            match op {
                                Operator::ParenL | Operator::BrackL | Operator::BraceL => depth += 1,
                                Operator::ParenR | Operator::BrackR | Operator::BraceR => depth -= 1,
                                Operator::Comma | Operator::Terminator if depth == 0 => break,
                                _ => (),
                            }
                        }
                        default.push(d.clone());
                        j += 1;
                    }
                    handler.parameter(&name, &tokens_text(&default), &loc);
                    i = j;
                    continue;
                }
            }
            i += 1;
        }
    }

    /// Emits `port` events out of a module header `( ... )` group, covering
    /// both ANSI declarations and plain non-ANSI name lists.
    fn emit_header_ports(
        &mut self,
        group: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        let mut direction: Option<PortDirection> = None;
        let mut net_type: Option<String> = None;
        let mut range: Option<String> = None;
        let mut i = 0;
        while i < group.len() {
            let t = &group[i];
            if let Some(kw) = t.as_type().as_keyword() {
                if let Some(d) = PortDirection::from_keyword(kw) {
                    // a fresh declaration resets the inherited attributes
                    direction = Some(d);
                    net_type = None;
                    range = None;
                } else if kw.is_net_type() == true || kw == &Keyword::Integer {
                    net_type = Some(kw.to_string());
                }
                // signed and the like carry no port-level meaning here
                i += 1;
                continue;
            }
            if t.as_type().check_delimiter(&Operator::BrackL) == true {
                let (text, j) = gather_bracket_text(group, i);
                range = Some(match range {
                    Some(prior) => format!("{}{}", prior, text),
                    None => text,
                });
                i = j;
                continue;
            }
            if let Some(id) = t.as_type().as_identifier() {
                let next = group.get(i + 1).map(|n| n.as_type());
                let is_name = match next {
                    None => true,
                    Some(n) => {
                        n.check_delimiter(&Operator::Comma)
                            || n.check_delimiter(&Operator::Assign)
                            || n.check_delimiter(&Operator::BrackL)
                            || n.check_delimiter(&Operator::Terminator)
                    }
                };
                if is_name == true {
                    handler.port(
                        &id.to_string(),
                        direction,
                        range.as_deref(),
                        net_type.as_deref(),
                        &prov.origin_of(t),
                    );
                    // swallow an unpacked range and a default value
                    let mut j = i + 1;
                    if group
                        .get(j)
                        .is_some_and(|n| n.as_type().check_delimiter(&Operator::BrackL))
                    {
                        let (_, k) = gather_bracket_text(group, j);
                        j = k;
                    }
                    if group
                        .get(j)
                        .is_some_and(|n| n.as_type().check_delimiter(&Operator::Assign))
                    {
                        let mut depth = 0;
                        while j < group.len() {
                            if let Some(op) = group[j].as_type().as_delimiter() {
                                match op {
                                    Operator::ParenL | Operator::BrackL | Operator::BraceL => {
                                        depth += 1
                                    }
                                    Operator::ParenR | Operator::BrackR | Operator::BraceR => {
                                        depth -= 1
                                    }
                                    Operator::Comma if depth == 0 => break,
                                    _ => (),
                                }
                            }
                            j += 1;
                        }
                    }
                    i = j;
                    continue;
                }
                // an identifier followed by another word is a data type
                net_type = Some(id.to_string());
                i += 1;
                continue;
            }
            if t.as_type().check_delimiter(&Operator::Comma) == true {
                // the inherited attributes persist across the comma
                i += 1;
                continue;
            }
            i += 1;
        }
    }

    /// Emits `port` events for a body-scope `direction [type] [range] name
    /// {, name};` declaration.
    fn emit_port_declaration(
        &mut self,
        stmt: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        // the statement reads exactly like a header port run
        self.emit_header_ports(stmt, prov, handler);
    }

    /// Emits `signal_declaration` events for `kind [signed] [range] name
    /// [= init] {, name [= init]};`.
    fn emit_signal_declaration(
        &mut self,
        stmt: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        let kind = match stmt.first().and_then(|t| t.as_type().as_keyword()) {
            Some(kw) => kw.to_string(),
            None => return,
        };
        let mut range: Option<String> = None;
        let mut i = 1;
        let mut seen_name = false;
        while i < stmt.len() {
            let t = &stmt[i];
            if t.as_type().check_delimiter(&Operator::BrackL) == true {
                let (text, j) = gather_bracket_text(stmt, i);
                // a range after the first name is an unpacked dimension
                if seen_name == false {
                    range = Some(match range {
                        Some(prior) => format!("{}{}", prior, text),
                        None => text,
                    });
                }
                i = j;
                continue;
            }
            if let Some(id) = t.as_type().as_identifier() {
                handler.signal_declaration(
                    &kind,
                    &id.to_string(),
                    range.as_deref(),
                    &prov.origin_of(t),
                );
                seen_name = true;
                i += 1;
                continue;
            }
            if t.as_type().check_delimiter(&Operator::Assign) == true {
                // skip the initializer to the next depth-0 comma
                let mut depth = 0;
                while i < stmt.len() {
                    if let Some(op) = stmt[i].as_type().as_delimiter() {
                        match op {
                            Operator::ParenL | Operator::BrackL | Operator::BraceL => depth += 1,
                            Operator::ParenR | Operator::BrackR | Operator::BraceR => depth -= 1,
                            Operator::Comma if depth == 0 => break,
                            _ => (),
                        }
                    }
                    i += 1;
                }
                continue;
            }
            i += 1;
        }
    }

    /// Emits `parameter` events for `parameter [type] [range] NAME = text
    /// {, NAME = text};`.
    fn emit_parameters(
        &mut self,
        stmt: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        self.emit_header_parameters(stmt, prov, handler);
    }

    /// Attempts to read the statement as one or more module instantiations:
    /// `Submod [#(overrides)] inst ( bindings ) {, inst ( bindings )};`.
    /// Statements that do not fit the shape are silently skipped.
    fn try_instance(
        &mut self,
        stmt: &Statement,
        prov: &Provenance,
        handler: &mut dyn ParserHandler,
    ) {
        let mut i = 0;
        let submod = match stmt.get(i).and_then(|t| t.as_type().as_identifier()) {
            Some(id) => id.to_string(),
            None => return,
        };
        i += 1;

        // optional parameter override group
        let mut overrides: Option<Statement> = None;
        if stmt
            .get(i)
            .is_some_and(|t| t.as_type().check_delimiter(&Operator::Pound))
        {
            i += 1;
            if stmt
                .get(i)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::ParenL))
                == false
            {
                return;
            }
            let (group, j) = slice_group(stmt, i);
            overrides = Some(group);
            i = j;
        }

        // one or more instances
        loop {
            let (inst_token, inst) = match stmt.get(i) {
                Some(t) => match t.as_type().as_identifier() {
                    Some(id) => (t, id.to_string()),
                    None => return,
                },
                None => return,
            };
            i += 1;
            // optional instance array range
            if stmt
                .get(i)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::BrackL))
            {
                let (_, j) = gather_bracket_text(stmt, i);
                i = j;
            }
            if stmt
                .get(i)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::ParenL))
                == false
            {
                return;
            }
            let (pins, j) = slice_group(stmt, i);
            i = j;

            let loc = prov.origin_of(inst_token);
            handler.cell_begin(&inst, &submod, &loc);
            if let Some(group) = &overrides {
                self.emit_bindings(group, prov, true, &inst, handler);
            }
            self.emit_bindings(&pins, prov, false, &inst, handler);
            handler.cell_end(&inst, &loc);

            match stmt.get(i) {
                Some(t) if t.as_type().check_delimiter(&Operator::Comma) == true => {
                    i += 1;
                }
                _ => break,
            }
        }
    }

    /// Splits a `( ... )` group into comma-separated binding items and emits
    /// `cell_parameter` or `pin` events. Named and positional styles are
    /// exclusive per group; mixing them reports `MixedBinding`.
    fn emit_bindings(
        &mut self,
        group: &Statement,
        prov: &Provenance,
        as_parameters: bool,
        instance: &str,
        handler: &mut dyn ParserHandler,
    ) {
        if group.is_empty() == true {
            return;
        }
        let mut items: Vec<Statement> = Vec::new();
        let mut cur: Statement = Vec::new();
        let mut depth = 0;
        for t in group {
            if let Some(op) = t.as_type().as_delimiter() {
                match op {
                    Operator::ParenL | Operator::BrackL | Operator::BraceL => depth += 1,
                    Operator::ParenR | Operator::BrackR | Operator::BraceR => depth -= 1,
                    Operator::Comma if depth == 0 => {
                        items.push(std::mem::take(&mut cur));
                        continue;
                    }
                    _ => (),
                }
            }
            cur.push(t.clone());
        }
        items.push(cur);

        let mut saw_named = false;
        let mut saw_positional = false;
        let mut position = 0;
        for item in &items {
            // a wildcard connection (.*) binds nothing explicit
            if item.len() == 2
                && item[0].as_type().check_delimiter(&Operator::Dot)
                && item[1].as_type().check_delimiter(&Operator::Mult)
            {
                continue;
            }
            if item
                .first()
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::Dot))
            {
                saw_named = true;
                let name_token = match item.get(1) {
                    Some(t) => t,
                    None => continue,
                };
                let name = match name_token.as_type().as_identifier() {
                    Some(id) => id.to_string(),
                    None => continue,
                };
                let loc = prov.origin_of(name_token);
                // `.name` with no parens is shorthand for `.name(name)`
                let expr = match item.get(2) {
                    Some(t) if t.as_type().check_delimiter(&Operator::ParenL) == true => {
                        tokens_text(&item[3..item.len().saturating_sub(1)].to_vec())
                    }
                    _ => name.clone(),
                };
                let binding = PinBinding::Named(name);
                match as_parameters {
                    true => handler.cell_parameter(&binding, &expr, &loc),
                    false => handler.pin(&binding, &expr, &loc),
                }
            } else {
                saw_positional = true;
                let loc = item
                    .first()
                    .map(|t| prov.origin_of(t))
                    .unwrap_or_else(|| Origin::new(prov.file.clone(), 0));
                let binding = PinBinding::Positional(position);
                let expr = tokens_text(item);
                match as_parameters {
                    true => handler.cell_parameter(&binding, &expr, &loc),
                    false => handler.pin(&binding, &expr, &loc),
                }
            }
            position += 1;
        }
        if saw_named == true && saw_positional == true {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MixedBinding,
                    format!(
                        "instance \"{}\" mixes named and positional bindings",
                        instance
                    ),
                )
                .at(group
                    .first()
                    .map(|t| prov.origin_of(t))
                    .unwrap_or_else(|| Origin::new(prov.file.clone(), 0))),
            );
        }
    }
}

/// Gathers tokens through the matching close of a group whose opener was
/// already consumed. The closing token is consumed but not included.
fn gather_group(stream: &mut TokenStream, open: Operator, close: Operator) -> Statement {
    let mut group: Statement = Vec::new();
    let mut depth = 0;
    while let Some(t) = stream.next() {
        if t.as_type().is_eof() == true {
            break;
        }
        if t.as_type().check_delimiter(&open) == true {
            depth += 1;
        } else if t.as_type().check_delimiter(&close) == true {
            if depth == 0 {
                break;
            }
            depth -= 1;
        }
        group.push(t);
    }
    group
}

/// Collects one statement starting from `init`: tokens through the first
/// `;` outside parens/brackets and outside `begin`/`end`-style blocks, or
/// through the token that closes the outermost block.
fn gather_statement(init: Token<VerilogToken>, stream: &mut TokenStream) -> Statement {
    let mut stmt: Statement = vec![init];
    let mut group_depth = 0;
    let mut block_depth = 0;
    loop {
        let next_is_end = match stream.peek() {
            Some(t) => {
                t.as_type().is_eof()
                    || (block_depth == 0
                        && group_depth == 0
                        && t.as_type().check_keyword(&Keyword::Endmodule))
            }
            None => true,
        };
        if next_is_end == true {
            break;
        }
        let t = stream.next().unwrap();
        if let Some(op) = t.as_type().as_delimiter() {
            match op {
                Operator::ParenL | Operator::BrackL | Operator::BraceL => group_depth += 1,
                Operator::ParenR | Operator::BrackR | Operator::BraceR => group_depth -= 1,
                Operator::Terminator if group_depth <= 0 && block_depth == 0 => {
                    stmt.push(t);
                    break;
                }
                _ => (),
            }
            stmt.push(t);
            continue;
        }
        if let Some(kw) = t.as_type().as_keyword() {
            match kw {
                Keyword::Begin | Keyword::Fork | Keyword::Case | Keyword::Casex
                | Keyword::Casez => block_depth += 1,
                Keyword::End
                | Keyword::Join
                | Keyword::JoinAny
                | Keyword::JoinNone
                | Keyword::Endcase => {
                    block_depth -= 1;
                    stmt.push(t);
                    if block_depth <= 0 {
                        break;
                    }
                    continue;
                }
                _ => (),
            }
        }
        stmt.push(t);
    }
    stmt
}

/// Reads a `[ ... ]` run starting at index `at` (which must be `[`),
/// returning its text including brackets and the index just past `]`.
/// Bounds that are constant arithmetic (macro-expanded sizes like `32-1`)
/// fold to their value so a range reads `[31:0]` rather than `[32-1:0]`.
fn gather_bracket_text(stmt: &Statement, at: usize) -> (String, usize) {
    let mut depth = 0;
    let mut i = at;
    let mut tokens: Statement = Vec::new();
    while i < stmt.len() {
        let t = &stmt[i];
        tokens.push(t.clone());
        if t.as_type().check_delimiter(&Operator::BrackL) == true {
            depth += 1;
        } else if t.as_type().check_delimiter(&Operator::BrackR) == true {
            depth -= 1;
            if depth == 0 {
                let text = fold_bracket(&tokens).unwrap_or_else(|| tokens_text(&tokens));
                return (text, i + 1);
            }
        }
        i += 1;
    }
    (tokens_text(&tokens), i)
}

/// Attempts to reduce a `[ ... ]` token run to `[msb:lsb]` (or `[bit]`)
/// with numeric bounds. Bounds referencing parameters stay textual.
fn fold_bracket(tokens: &Statement) -> Option<String> {
    if tokens.len() < 3 {
        return None;
    }
    let inner = &tokens[1..tokens.len() - 1];
    let mut parts: Vec<Vec<&VerilogToken>> = vec![Vec::new()];
    let mut depth = 0;
    for t in inner {
        if let Some(op) = t.as_type().as_delimiter() {
            match op {
                Operator::ParenL | Operator::BrackL => depth += 1,
                Operator::ParenR | Operator::BrackR => depth -= 1,
                Operator::Colon if depth == 0 => {
                    parts.push(Vec::new());
                    continue;
                }
                _ => (),
            }
        }
        parts.last_mut().unwrap().push(t.as_type());
    }
    match parts.len() {
        1 => Some(format!("[{}]", eval_const(&parts[0])?)),
        2 => Some(format!(
            "[{}:{}]",
            eval_const(&parts[0])?,
            eval_const(&parts[1])?
        )),
        _ => None,
    }
}

/// Evaluates `+ - * /` arithmetic over integer literals and parentheses.
/// Anything else (identifiers, unknown digits) bails out.
fn eval_const(tokens: &[&VerilogToken]) -> Option<i64> {
    struct P<'a> {
        tokens: &'a [&'a VerilogToken],
        i: usize,
    }
    impl<'a> P<'a> {
        fn peek_op(&self) -> Option<&Operator> {
            self.tokens.get(self.i).and_then(|t| t.as_delimiter())
        }
        fn expr(&mut self) -> Option<i64> {
            let mut acc = self.term()?;
            loop {
                match self.peek_op() {
                    Some(Operator::Plus) => {
                        self.i += 1;
                        acc += self.term()?;
                    }
                    Some(Operator::Minus) => {
                        self.i += 1;
                        acc -= self.term()?;
                    }
                    _ => return Some(acc),
                }
            }
        }
        fn term(&mut self) -> Option<i64> {
            let mut acc = self.factor()?;
            loop {
                match self.peek_op() {
                    Some(Operator::Mult) => {
                        self.i += 1;
                        acc *= self.factor()?;
                    }
                    Some(Operator::Div) => {
                        self.i += 1;
                        let d = self.factor()?;
                        if d == 0 {
                            return None;
                        }
                        acc /= d;
                    }
                    _ => return Some(acc),
                }
            }
        }
        fn factor(&mut self) -> Option<i64> {
            match self.tokens.get(self.i)? {
                VerilogToken::Number(n) => {
                    self.i += 1;
                    match crate::core::lang::number_value(n) {
                        Ok((v, false)) => Some(v as i64),
                        _ => None,
                    }
                }
                t if t.check_delimiter(&Operator::Minus) => {
                    self.i += 1;
                    Some(-self.factor()?)
                }
                t if t.check_delimiter(&Operator::Plus) => {
                    self.i += 1;
                    self.factor()
                }
                t if t.check_delimiter(&Operator::ParenL) => {
                    self.i += 1;
                    let v = self.expr()?;
                    match self.peek_op() {
                        Some(Operator::ParenR) => {
                            self.i += 1;
                            Some(v)
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        }
    }
    let mut p = P {
        tokens: tokens,
        i: 0,
    };
    let v = p.expr()?;
    match p.i == tokens.len() {
        true => Some(v),
        false => None,
    }
}

/// Returns the tokens inside a `( ... )` group starting at `at` (which must
/// be `(`) and the index just past the matching `)`.
fn slice_group(stmt: &Statement, at: usize) -> (Statement, usize) {
    let mut depth = 0;
    let mut i = at;
    let mut group: Statement = Vec::new();
    while i < stmt.len() {
        let t = &stmt[i];
        if t.as_type().check_delimiter(&Operator::ParenL) == true {
            depth += 1;
            if depth > 1 {
                group.push(t.clone());
            }
        } else if t.as_type().check_delimiter(&Operator::ParenR) == true {
            depth -= 1;
            if depth == 0 {
                return (group, i + 1);
            }
            group.push(t.clone());
        } else if depth >= 1 {
            group.push(t.clone());
        }
        i += 1;
    }
    (group, i)
}

/// Renders tokens back to compact source text: word-like neighbors get a
/// single separating space, punctuation packs tight.
fn tokens_text(tokens: &Statement) -> String {
    let mut result = String::new();
    let mut prev_wordish = false;
    for t in tokens {
        let wordish = match t.as_type() {
            VerilogToken::Identifier(_)
            | VerilogToken::Keyword(_)
            | VerilogToken::Number(_)
            | VerilogToken::StringLiteral(_) => true,
            _ => false,
        };
        if prev_wordish == true && wordish == true {
            result.push(' ');
        }
        result.push_str(&t.as_type().to_string());
        prev_wordish = wordish;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every event as a readable line for assertions.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ParserHandler for Recorder {
        fn module_begin(&mut self, name: &str, loc: &Origin) {
            self.events.push(format!("module_begin {} @{}", name, loc));
        }
        fn port(
            &mut self,
            name: &str,
            direction: Option<PortDirection>,
            range: Option<&str>,
            net_type: Option<&str>,
            _loc: &Origin,
        ) {
            self.events.push(format!(
                "port {} dir={} range={} type={}",
                name,
                direction.map(|d| d.to_string()).unwrap_or("?".to_string()),
                range.unwrap_or("-"),
                net_type.unwrap_or("-"),
            ));
        }
        fn signal_declaration(
            &mut self,
            kind: &str,
            name: &str,
            range: Option<&str>,
            _loc: &Origin,
        ) {
            self.events
                .push(format!("signal {} {} range={}", kind, name, range.unwrap_or("-")));
        }
        fn parameter(&mut self, name: &str, default_text: &str, _loc: &Origin) {
            self.events.push(format!("parameter {} = {}", name, default_text));
        }
        fn cell_begin(&mut self, instance: &str, submodule: &str, _loc: &Origin) {
            self.events.push(format!("cell_begin {} of {}", instance, submodule));
        }
        fn cell_parameter(&mut self, binding: &PinBinding, value: &str, _loc: &Origin) {
            self.events.push(format!("cell_param {:?} = {}", binding, value));
        }
        fn pin(&mut self, binding: &PinBinding, net_expr: &str, _loc: &Origin) {
            self.events.push(format!("pin {:?} = {}", binding, net_expr));
        }
        fn cell_end(&mut self, instance: &str, _loc: &Origin) {
            self.events.push(format!("cell_end {}", instance));
        }
        fn module_end(&mut self, name: &str, _loc: &Origin) {
            self.events.push(format!("module_end {}", name));
        }
    }

    fn run(text: &str) -> Vec<String> {
        let mut parser = Parser::new(LanguageStandard::Sv2017);
        let mut rec = Recorder::default();
        parser.parse(text, "test.v", &mut rec).unwrap();
        rec.events
    }

    #[test]
    fn ansi_module_with_ports() {
        let events = run(
            "module counter (input clk, input rst, output reg [31:0] count);\nendmodule\n",
        );
        assert_eq!(
            events,
            vec![
                "module_begin counter @test.v:1",
                "port clk dir=input range=- type=-",
                "port rst dir=input range=- type=-",
                "port count dir=output range=[31:0] type=reg",
                "module_end counter",
            ]
        );
    }

    #[test]
    fn constant_ranges_fold() {
        let events = run("module m (output reg [32-1:0] count, input [2*(4)-1:0] sel);\nendmodule\n");
        assert_eq!(events[1], "port count dir=output range=[31:0] type=reg");
        assert_eq!(events[2], "port sel dir=input range=[7:0] type=-");
    }

    #[test]
    fn non_ansi_ports_get_direction_in_body() {
        let events = run("module m(a, b);\n  input a;\n  output [7:0] b;\nendmodule\n");
        assert_eq!(
            events,
            vec![
                "module_begin m @test.v:1",
                "port a dir=? range=- type=-",
                "port b dir=? range=- type=-",
                "port a dir=input range=- type=-",
                "port b dir=output range=[7:0] type=-",
                "module_end m",
            ]
        );
    }

    #[test]
    fn signals_parameters_and_skipped_statements() {
        let events = run(
            "module m;\n  parameter WIDTH = 8, DEPTH = 2 * WIDTH;\n  wire [3:0] a, b;\n  reg r = 1'b0;\n  always @(posedge clk) begin\n    r <= a;\n  end\n  assign b = a;\nendmodule\n",
        );
        assert_eq!(
            events,
            vec![
                "module_begin m @test.v:1",
                "parameter WIDTH = 8",
                "parameter DEPTH = 2*WIDTH",
                "signal wire a range=[3:0]",
                "signal wire b range=[3:0]",
                "signal reg r range=-",
                "module_end m",
            ]
        );
    }

    #[test]
    fn instances_named_and_positional() {
        let events = run(
            "module top;\n  sub u0 (.clk(c), .d(bus[3:0]), .q());\n  sub u1 (a, , b);\nendmodule\n",
        );
        assert_eq!(
            events,
            vec![
                "module_begin top @test.v:1",
                "cell_begin u0 of sub",
                "pin Named(\"clk\") = c",
                "pin Named(\"d\") = bus[3:0]",
                "pin Named(\"q\") = ",
                "cell_end u0",
                "cell_begin u1 of sub",
                "pin Positional(0) = a",
                "pin Positional(1) = ",
                "pin Positional(2) = b",
                "cell_end u1",
                "module_end top",
            ]
        );
    }

    #[test]
    fn instance_with_parameter_overrides() {
        let events =
            run("module top;\n  fifo #(.WIDTH(8), .DEPTH(16)) f0 (.clk(clk));\nendmodule\n");
        assert_eq!(
            events,
            vec![
                "module_begin top @test.v:1",
                "cell_begin f0 of fifo",
                "cell_param Named(\"WIDTH\") = 8",
                "cell_param Named(\"DEPTH\") = 16",
                "pin Named(\"clk\") = clk",
                "cell_end f0",
                "module_end top",
            ]
        );
    }

    #[test]
    fn two_instances_in_one_statement() {
        let events = run("module top;\n  inv u1 (a), u2 (b);\nendmodule\n");
        assert_eq!(
            events,
            vec![
                "module_begin top @test.v:1",
                "cell_begin u1 of inv",
                "pin Positional(0) = a",
                "cell_end u1",
                "cell_begin u2 of inv",
                "pin Positional(0) = b",
                "cell_end u2",
                "module_end top",
            ]
        );
    }

    #[test]
    fn mixed_binding_is_reported() {
        let mut parser = Parser::new(LanguageStandard::Sv2017);
        let mut rec = Recorder::default();
        parser
            .parse(
                "module top;\n  sub u0 (.clk(c), d);\nendmodule\n",
                "test.v",
                &mut rec,
            )
            .unwrap();
        assert_eq!(
            parser.diagnostics().count_of(DiagnosticKind::MixedBinding),
            1
        );
    }

    #[test]
    fn line_markers_update_provenance() {
        let events = run(
            "`line 1 \"inc.vh\" 1\nmodule from_inc;\nendmodule\n`line 5 \"test.v\" 2\nmodule after;\nendmodule\n",
        );
        assert_eq!(events[0], "module_begin from_inc @inc.vh:1");
        assert_eq!(events[2], "module_begin after @test.v:5");
    }

    #[test]
    fn unresolved_shapes_are_skipped() {
        let events = run(
            "module m;\n  typedef logic [7:0] byte_t;\n  byte_t data;\n  initial $display(\"hi\");\nendmodule\n",
        );
        assert_eq!(events, vec!["module_begin m @test.v:1", "module_end m"]);
    }
}
