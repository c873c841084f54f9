pub mod cell;
pub mod module;

use crate::core::lang::LanguageStandard;
use crate::core::parse::error::ParseError;
use crate::core::parse::{Parser, ParserHandler, PinBinding, PortDirection};
use crate::core::preproc::error::PreprocError;
use crate::core::preproc::Preproc;
use crate::core::source::Origin;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use cell::{Cell, Pin};
use module::{Module, ModuleId, PinRef};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NetlistError {
    #[error(transparent)]
    Preproc(#[from] PreprocError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("the netlist is frozen once link() has completed")]
    NetlistFrozen,
}

/// Accumulates parser events into `Module` entities for one translation
/// unit. Events arriving outside a module are dropped.
struct NetlistBuilder {
    modules: Vec<Module>,
}

impl NetlistBuilder {
    fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    fn into_modules(self) -> Vec<Module> {
        self.modules
    }

    fn current(&mut self) -> Option<&mut Module> {
        self.modules.last_mut()
    }
}

impl ParserHandler for NetlistBuilder {
    fn module_begin(&mut self, name: &str, loc: &Origin) {
        self.modules.push(Module::new(name, loc.clone()));
    }

    fn port(
        &mut self,
        name: &str,
        direction: Option<PortDirection>,
        range: Option<&str>,
        net_type: Option<&str>,
        loc: &Origin,
    ) {
        if let Some(m) = self.current() {
            m.add_port(name, direction, range, net_type, loc);
        }
    }

    fn signal_declaration(&mut self, kind: &str, name: &str, range: Option<&str>, loc: &Origin) {
        if let Some(m) = self.current() {
            m.declare_net(name, Some(kind), range, loc);
        }
    }

    fn parameter(&mut self, name: &str, default_text: &str, _loc: &Origin) {
        if let Some(m) = self.current() {
            m.add_parameter(name, default_text);
        }
    }

    fn cell_begin(&mut self, instance: &str, submodule: &str, loc: &Origin) {
        if let Some(m) = self.current() {
            m.push_cell(Cell::new(instance, submodule, loc.clone()));
        }
    }

    fn cell_parameter(&mut self, binding: &PinBinding, value_text: &str, _loc: &Origin) {
        if let Some(m) = self.current() {
            if let Some(c) = m.cells_mut().last_mut() {
                c.add_parameter_override(binding.clone(), value_text);
            }
        }
    }

    fn pin(&mut self, binding: &PinBinding, net_expr: &str, loc: &Origin) {
        if let Some(m) = self.current() {
            if let Some(c) = m.cells_mut().last_mut() {
                c.add_pin(Pin::new(binding.clone(), net_expr, loc.clone()));
            }
        }
    }
}

/// The design database: every module read so far, plus the linker that
/// resolves cells to definitions, pins to ports, and names to nets. The
/// netlist owns all storage; cross-references are indices filled in by
/// `link()`, after which the netlist is frozen for querying.
#[derive(Debug)]
pub struct Netlist {
    standard: LanguageStandard,
    preproc: Preproc,
    modules: Vec<Module>,
    index: HashMap<String, ModuleId>,
    files_read: Vec<String>,
    diagnostics: DiagnosticSink,
    linked: bool,
}

impl Netlist {
    pub fn new(standard: LanguageStandard) -> Self {
        Self {
            standard: standard,
            preproc: Preproc::new(standard),
            modules: Vec::new(),
            index: HashMap::new(),
            files_read: Vec::new(),
            diagnostics: DiagnosticSink::new(),
            linked: false,
        }
    }

    pub fn with_defines(mut self, defines: Vec<(String, String)>) -> Self {
        self.preproc = self.preproc.with_defines(defines);
        self
    }

    pub fn with_include_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.preproc = self.preproc.with_include_paths(paths);
        self
    }

    pub fn undefine(&mut self, name: &str) {
        self.preproc.undefine(name);
    }

    pub fn standard(&self) -> LanguageStandard {
        self.standard
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn files_read(&self) -> &Vec<String> {
        &self.files_read
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    /// Reads, preprocesses, and parses one source file, adding its modules
    /// to the database.
    pub fn read_file(&mut self, path: &str) -> Result<(), NetlistError> {
        if self.linked == true {
            return Err(NetlistError::NetlistFrozen);
        }
        let expanded = self.preproc.preprocess_file(path)?;
        self.ingest(&expanded, path)
    }

    /// Reads in-memory source text under the given origin name.
    pub fn read_str(&mut self, text: &str, origin: &str) -> Result<(), NetlistError> {
        if self.linked == true {
            return Err(NetlistError::NetlistFrozen);
        }
        let expanded = self.preproc.preprocess_str(text, origin)?;
        self.ingest(&expanded, origin)
    }

    fn ingest(&mut self, expanded: &str, origin: &str) -> Result<(), NetlistError> {
        for d in self.preproc.take_diagnostics() {
            self.diagnostics.push(d);
        }
        let mut parser = Parser::new(self.standard);
        let mut builder = NetlistBuilder::new();
        parser.parse(expanded, origin, &mut builder)?;
        for d in parser.take_diagnostics() {
            self.diagnostics.push(d);
        }
        self.modules.append(&mut builder.into_modules());
        self.files_read.push(origin.to_string());
        Ok(())
    }

    /// Resolves cross-module references: duplicate pruning, cell-to-module
    /// linking, pin-to-port matching, net lookup (with implicit creation
    /// where `` `default_nettype `` permits), and instantiation marking.
    /// Always completes; recoverable findings land in the diagnostic sink.
    pub fn link(&mut self) -> Result<(), NetlistError> {
        if self.linked == true {
            return Err(NetlistError::NetlistFrozen);
        }

        // duplicate check: the first definition wins
        let mut index: HashMap<String, ModuleId> = HashMap::new();
        let mut keep: Vec<Module> = Vec::new();
        for m in self.modules.drain(..) {
            match index.get(m.name()) {
                Some(first) => {
                    let first_origin = keep[first.0].origin().clone();
                    self.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::DuplicateModule,
                            format!(
                                "module \"{}\" already defined at {}; keeping the first",
                                m.name(),
                                first_origin
                            ),
                        )
                        .at(m.origin().clone()),
                    );
                }
                None => {
                    index.insert(m.name().to_string(), ModuleId(keep.len()));
                    keep.push(m);
                }
            }
        }
        self.modules = keep;
        self.index = index;

        // cell resolution
        let mut resolutions: Vec<(usize, usize, Option<ModuleId>)> = Vec::new();
        for (mi, m) in self.modules.iter().enumerate() {
            for (ci, c) in m.cells().iter().enumerate() {
                resolutions.push((mi, ci, self.index.get(c.submodule_name()).copied()));
            }
        }
        for (mi, ci, target) in &resolutions {
            match target {
                Some(t) => {
                    self.modules[*mi].cells_mut()[*ci].resolve(*t);
                    self.modules[t.0].mark_instantiated();
                }
                None => {
                    let (sub, inst, origin) = {
                        let c = &self.modules[*mi].cells()[*ci];
                        (
                            c.submodule_name().to_string(),
                            c.instance().to_string(),
                            c.origin().clone(),
                        )
                    };
                    self.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::UnresolvedSubmodule,
                            format!("module \"{}\" not found for cell \"{}\"", sub, inst),
                        )
                        .at(origin),
                    );
                }
            }
        }

        // pin and net resolution
        let implicit_kind = match self.preproc.default_nettype() {
            "none" => None,
            kind => match self.standard.allows_implicit_nets() {
                true => Some(kind.to_string()),
                false => None,
            },
        };
        for (mi, ci, target) in resolutions {
            let port_info: Option<Vec<(String, PortDirection)>> = target.map(|t| {
                self.modules[t.0]
                    .ports()
                    .iter()
                    .map(|p| (p.name().to_string(), p.direction_or_default()))
                    .collect()
            });
            let pin_count = self.modules[mi].cells()[ci].pins().len();
            for pi in 0..pin_count {
                let (binding, net_expr, origin) = {
                    let p = &self.modules[mi].cells()[ci].pins()[pi];
                    (p.binding().clone(), p.net_expr().to_string(), p.origin().clone())
                };
                let mut direction: Option<PortDirection> = None;
                if let Some(ports) = &port_info {
                    let position = match &binding {
                        PinBinding::Named(n) => {
                            let pos = ports.iter().position(|(pn, _)| pn == n);
                            if pos.is_none() {
                                let inst =
                                    self.modules[mi].cells()[ci].instance().to_string();
                                self.diagnostics.push(
                                    Diagnostic::new(
                                        DiagnosticKind::UnknownPort,
                                        format!(
                                            "cell \"{}\" binds unknown port \"{}\"",
                                            inst, n
                                        ),
                                    )
                                    .at(origin.clone()),
                                );
                            }
                            pos
                        }
                        PinBinding::Positional(k) => match *k < ports.len() {
                            true => Some(*k),
                            false => {
                                let inst =
                                    self.modules[mi].cells()[ci].instance().to_string();
                                self.diagnostics.push(
                                    Diagnostic::new(
                                        DiagnosticKind::PortArity,
                                        format!(
                                            "cell \"{}\" has more connections than \"{}\" has ports",
                                            inst,
                                            self.modules[mi].cells()[ci].submodule_name()
                                        ),
                                    )
                                    .at(origin.clone()),
                                );
                                None
                            }
                        },
                    };
                    if let Some(pos) = position {
                        direction = Some(ports[pos].1);
                        self.modules[mi].cells_mut()[ci].pins_mut()[pi].resolve_port(pos);
                    }
                }
                // net lookup happens for every pin, resolved cell or not
                if let Some(net_name) = net_expr_name(&net_expr) {
                    let net_name = net_name.to_string();
                    let id = match self.modules[mi].net_id(&net_name) {
                        Some(id) => Some(id),
                        None => implicit_kind
                            .as_ref()
                            .map(|kind| self.modules[mi].implicit_net(&net_name, kind, &origin)),
                    };
                    if let Some(id) = id {
                        self.modules[mi].cells_mut()[ci].pins_mut()[pi].resolve_net(id);
                        let pref = PinRef { cell: ci, pin: pi };
                        match direction {
                            Some(PortDirection::Output) => {
                                self.modules[mi].net_mut(id).add_driver(pref)
                            }
                            Some(PortDirection::Inout) => {
                                self.modules[mi].net_mut(id).add_driver(pref);
                                self.modules[mi].net_mut(id).add_reader(pref);
                            }
                            _ => self.modules[mi].net_mut(id).add_reader(pref),
                        }
                    }
                }
            }
        }

        self.linked = true;
        Ok(())
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        match self.linked {
            true => self.index.get(name).map(|id| &self.modules[id.0]),
            false => self.modules.iter().find(|m| m.name() == name),
        }
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    /// All modules in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Modules never instantiated by any other module, in declaration
    /// order. Meaningful after `link()`.
    pub fn top_modules(&self) -> Vec<&Module> {
        self.modules
            .iter()
            .filter(|m| m.is_instantiated() == false)
            .collect()
    }

    /// Writes a readable summary of every module for debugging.
    pub fn dump(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        writeln!(writer, "Netlist Dump:")?;
        writeln!(writer, "=============")?;
        for m in &self.modules {
            writeln!(writer)?;
            writeln!(writer, "Module: {}  ({})", m.name(), m.origin())?;
            writeln!(writer, "  Ports: {}", m.ports().len())?;
            for p in m.ports() {
                let dir = p
                    .direction()
                    .map(|d| d.to_string())
                    .unwrap_or("?".to_string());
                match p.range() {
                    Some(r) => writeln!(writer, "    {} {} {}", dir, r, p.name())?,
                    None => writeln!(writer, "    {} {}", dir, p.name())?,
                }
            }
            writeln!(writer, "  Nets: {}", m.nets().len())?;
            for n in m.nets() {
                let implicit = match n.is_declared() {
                    true => "",
                    false => "  (implicit)",
                };
                match n.range() {
                    Some(r) => {
                        writeln!(writer, "    {} {} {}{}", n.kind(), r, n.name(), implicit)?
                    }
                    None => writeln!(writer, "    {} {}{}", n.kind(), n.name(), implicit)?,
                }
            }
            writeln!(writer, "  Cells: {}", m.cells().len())?;
            for c in m.cells() {
                let resolved = match c.submodule() {
                    Some(_) => "",
                    None => "  (unresolved)",
                };
                writeln!(writer, "    {} ({}){}", c.instance(), c.submodule_name(), resolved)?;
            }
        }
        Ok(())
    }

    /// Regenerates Verilog source text for the whole netlist.
    pub fn verilog_text(&self) -> String {
        let mut out = String::new();
        for m in &self.modules {
            out.push_str(&format!("module {} (", m.name()));
            let names: Vec<&str> = m.ports().iter().map(|p| p.name()).collect();
            if names.is_empty() == false {
                out.push_str("\n  ");
                out.push_str(&names.join(", "));
                out.push('\n');
            }
            out.push_str(");\n");
            for p in m.ports() {
                let dir = p.direction_or_default().to_string();
                out.push_str("  ");
                out.push_str(&dir);
                if let Some(t) = p.net_type() {
                    if t != "wire" {
                        out.push(' ');
                        out.push_str(t);
                    }
                }
                if let Some(r) = p.range() {
                    out.push(' ');
                    out.push_str(r);
                }
                out.push(' ');
                out.push_str(p.name());
                out.push_str(";\n");
            }
            let internal: Vec<&module::Net> = m
                .nets()
                .iter()
                .filter(|n| m.find_port(n.name()).is_none())
                .collect();
            if internal.is_empty() == false {
                out.push('\n');
                for n in internal {
                    out.push_str("  ");
                    out.push_str(n.kind());
                    if let Some(r) = n.range() {
                        out.push(' ');
                        out.push_str(r);
                    }
                    out.push(' ');
                    out.push_str(n.name());
                    out.push_str(";\n");
                }
            }
            for c in m.cells() {
                out.push('\n');
                out.push_str(&format!("  {} {} (", c.submodule_name(), c.instance()));
                let pins: Vec<String> = c
                    .pins()
                    .iter()
                    .map(|p| match p.binding() {
                        PinBinding::Named(n) => format!("    .{}({})", n, p.net_expr()),
                        PinBinding::Positional(_) => format!("    {}", p.net_expr()),
                    })
                    .collect();
                if pins.is_empty() == false {
                    out.push('\n');
                    out.push_str(&pins.join(",\n"));
                    out.push('\n');
                    out.push_str("  ");
                }
                out.push_str(");\n");
            }
            out.push_str("endmodule\n\n");
        }
        out
    }
}

/// Extracts the leading net identifier of a pin expression of the shape
/// `identifier [ '[' ... ']' ]`. Composite expressions (concatenations,
/// literals) yield nothing and leave the pin unresolved.
fn net_expr_name(expr: &str) -> Option<&str> {
    let s = expr.trim();
    let first = s.chars().next()?;
    if first.is_ascii_alphabetic() == false && first != '_' {
        return None;
    }
    let end = s
        .char_indices()
        .find(|(_, c)| {
            (c.is_ascii_alphanumeric() || *c == '_' || *c == '$') == false
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let rest = s[end..].trim_start();
    match rest.is_empty() || rest.starts_with('[') {
        true => Some(&s[..end]),
        false => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(text: &str) -> Netlist {
        let mut netlist = Netlist::new(LanguageStandard::Sv2017);
        netlist.read_str(text, "test.v").unwrap();
        netlist.link().unwrap();
        netlist
    }

    #[test]
    fn links_cells_and_marks_instantiated() {
        let netlist = linked(
            "module sub (input a, output y);\nendmodule\nmodule top;\n  wire n0, n1;\n  sub u0 (.a(n0), .y(n1));\nendmodule\n",
        );
        let top = netlist.find_module("top").unwrap();
        let cell = &top.cells()[0];
        assert!(cell.submodule().is_some());
        assert_eq!(cell.pins()[0].resolved_port(), Some(0));
        assert_eq!(cell.pins()[1].resolved_port(), Some(1));
        let tops: Vec<&str> = netlist.top_modules().iter().map(|m| m.name()).collect();
        assert_eq!(tops, vec!["top"]);
        // n1 is driven by the output pin, n0 read by the input pin
        let n1 = top.find_net("n1").unwrap();
        assert_eq!(n1.driven_by().len(), 1);
        let n0 = top.find_net("n0").unwrap();
        assert_eq!(n0.read_by().len(), 1);
    }

    #[test]
    fn unresolved_cell_is_first_class() {
        let netlist = linked("module top;\n  wire x;\n  unknown_sub u0 (.a(x));\nendmodule\n");
        let top = netlist.find_module("top").unwrap();
        assert_eq!(top.cells()[0].submodule(), None);
        assert_eq!(
            netlist
                .diagnostics()
                .count_of(DiagnosticKind::UnresolvedSubmodule),
            1
        );
        // linking still completed
        assert_eq!(netlist.is_linked(), true);
    }

    #[test]
    fn duplicate_module_first_wins() {
        let netlist = linked(
            "module m (input a);\nendmodule\nmodule m (input a, input b);\nendmodule\n",
        );
        assert_eq!(netlist.find_module("m").unwrap().ports().len(), 1);
        assert_eq!(
            netlist.diagnostics().count_of(DiagnosticKind::DuplicateModule),
            1
        );
    }

    #[test]
    fn unknown_port_and_arity_diagnostics() {
        let netlist = linked(
            "module sub (input a);\nendmodule\nmodule top;\n  wire x, y;\n  sub u0 (.nope(x));\n  sub u1 (x, y);\nendmodule\n",
        );
        assert_eq!(netlist.diagnostics().count_of(DiagnosticKind::UnknownPort), 1);
        assert_eq!(netlist.diagnostics().count_of(DiagnosticKind::PortArity), 1);
    }

    #[test]
    fn implicit_nets_follow_default_nettype() {
        let netlist = linked(
            "module sub (input a);\nendmodule\nmodule top;\n  sub u0 (.a(ghost));\nendmodule\n",
        );
        let top = netlist.find_module("top").unwrap();
        let ghost = top.find_net("ghost").unwrap();
        assert_eq!(ghost.is_declared(), false);
        assert_eq!(ghost.kind(), "wire");

        let netlist = linked(
            "`default_nettype none\nmodule sub (input a);\nendmodule\nmodule top;\n  sub u0 (.a(ghost));\nendmodule\n",
        );
        let top = netlist.find_module("top").unwrap();
        assert!(top.find_net("ghost").is_none());
        assert_eq!(top.cells()[0].pins()[0].resolved_net(), None);
    }

    #[test]
    fn frozen_after_link() {
        let mut netlist = Netlist::new(LanguageStandard::Sv2017);
        netlist.read_str("module m;\nendmodule\n", "test.v").unwrap();
        netlist.link().unwrap();
        assert_eq!(
            netlist.read_str("module n;\nendmodule\n", "test.v"),
            Err(NetlistError::NetlistFrozen)
        );
        assert_eq!(netlist.link(), Err(NetlistError::NetlistFrozen));
    }

    #[test]
    fn dump_and_verilog_text_render() {
        let netlist = linked(
            "module sub (input a, output y);\nendmodule\nmodule top;\n  wire n;\n  sub u0 (.a(n), .y());\nendmodule\n",
        );
        let mut buf: Vec<u8> = Vec::new();
        netlist.dump(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Module: top"));
        assert!(text.contains("u0 (sub)"));

        let v = netlist.verilog_text();
        assert!(v.contains("module sub ("));
        assert!(v.contains(".a(n)"));
        assert!(v.contains("endmodule"));
    }

    #[test]
    fn net_expr_names() {
        assert_eq!(net_expr_name("clk"), Some("clk"));
        assert_eq!(net_expr_name(" bus[3:0] "), Some("bus"));
        assert_eq!(net_expr_name("{a, b}"), None);
        assert_eq!(net_expr_name("8'h00"), None);
        assert_eq!(net_expr_name(""), None);
    }
}
