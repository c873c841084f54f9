use crate::core::parse::PortDirection;
use crate::core::source::Origin;
use std::collections::HashMap;

/// Index of a module within its owning `Netlist`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ModuleId(pub(crate) usize);

/// Index of a net within its owning `Module`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct NetId(pub(crate) usize);

/// Points back at one pin of one cell inside the same module; used by nets
/// to record their drivers and readers without owning anything.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct PinRef {
    pub cell: usize,
    pub pin: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Port {
    name: String,
    direction: Option<PortDirection>,
    net_type: Option<String>,
    range: Option<String>,
    net: Option<NetId>,
    origin: Origin,
}

impl Port {
    pub fn new(name: impl Into<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            direction: None,
            net_type: None,
            range: None,
            net: None,
            origin: origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared direction; a port only seen in a non-ANSI header has
    /// none yet.
    pub fn direction(&self) -> Option<PortDirection> {
        self.direction
    }

    /// The direction used for connectivity when nothing was declared.
    pub fn direction_or_default(&self) -> PortDirection {
        self.direction.unwrap_or(PortDirection::Input)
    }

    pub fn net_type(&self) -> Option<&str> {
        self.net_type.as_deref()
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    /// The owned net inside the same module that backs this port.
    pub fn net(&self) -> Option<NetId> {
        self.net
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Fills in attributes a later declaration supplies, never overwriting
    /// ones already known.
    pub fn inherit(
        &mut self,
        direction: Option<PortDirection>,
        range: Option<&str>,
        net_type: Option<&str>,
    ) {
        if self.direction.is_none() {
            self.direction = direction;
        }
        if self.range.is_none() {
            self.range = range.map(|r| r.to_string());
        }
        if self.net_type.is_none() {
            self.net_type = net_type.map(|t| t.to_string());
        }
    }

    pub(crate) fn attach_net(&mut self, net: NetId) {
        self.net = Some(net);
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Net {
    name: String,
    kind: String,
    range: Option<String>,
    declared: bool,
    driven_by: Vec<PinRef>,
    read_by: Vec<PinRef>,
    origin: Origin,
}

impl Net {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            range: None,
            declared: true,
            driven_by: Vec::new(),
            read_by: Vec::new(),
            origin: origin,
        }
    }

    /// Marks the net as one the linker invented for an undeclared name.
    pub fn implicit(mut self) -> Self {
        self.declared = false;
        self
    }

    pub fn with_range(mut self, range: Option<&str>) -> Self {
        self.range = range.map(|r| r.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn driven_by(&self) -> &Vec<PinRef> {
        &self.driven_by
    }

    pub fn read_by(&self) -> &Vec<PinRef> {
        &self.read_by
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub(crate) fn refine(&mut self, kind: Option<&str>, range: Option<&str>) {
        if let Some(kind) = kind {
            self.kind = kind.to_string();
        }
        if range.is_some() {
            self.range = range.map(|r| r.to_string());
        }
        self.declared = true;
    }

    pub(crate) fn add_driver(&mut self, pin: PinRef) {
        self.driven_by.push(pin);
    }

    pub(crate) fn add_reader(&mut self, pin: PinRef) {
        self.read_by.push(pin);
    }
}

use super::cell::Cell;

/// One declared module: ordered ports (declaration order is the positional
/// binding order), owned nets, owned cells, and interface parameters.
#[derive(Debug, PartialEq, Clone)]
pub struct Module {
    name: String,
    origin: Origin,
    ports: Vec<Port>,
    nets: Vec<Net>,
    net_index: HashMap<String, NetId>,
    cells: Vec<Cell>,
    parameters: Vec<(String, String)>,
    instantiated: bool,
}

impl Module {
    pub fn new(name: impl Into<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            origin: origin,
            ports: Vec::new(),
            nets: Vec::new(),
            net_index: HashMap::new(),
            cells: Vec::new(),
            parameters: Vec::new(),
            instantiated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn ports(&self) -> &Vec<Port> {
        &self.ports
    }

    pub fn nets(&self) -> &Vec<Net> {
        &self.nets
    }

    pub fn cells(&self) -> &Vec<Cell> {
        &self.cells
    }

    pub fn parameters(&self) -> &Vec<(String, String)> {
        &self.parameters
    }

    pub fn is_instantiated(&self) -> bool {
        self.instantiated
    }

    pub fn find_port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name() == name)
    }

    pub fn port_position(&self, name: &str) -> Option<usize> {
        self.ports.iter().position(|p| p.name() == name)
    }

    pub fn find_net(&self, name: &str) -> Option<&Net> {
        self.net_index.get(name).map(|id| &self.nets[id.0])
    }

    pub fn net_id(&self, name: &str) -> Option<NetId> {
        self.net_index.get(name).copied()
    }

    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.0]
    }

    pub fn find_cell(&self, instance: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.instance() == instance)
    }

    /// Declares or refines a port. A name seen twice (non-ANSI header plus
    /// body declaration) merges into one port, keeping header order.
    pub fn add_port(
        &mut self,
        name: &str,
        direction: Option<PortDirection>,
        range: Option<&str>,
        net_type: Option<&str>,
        origin: &Origin,
    ) {
        match self.ports.iter_mut().find(|p| p.name() == name) {
            Some(port) => port.inherit(direction, range, net_type),
            None => {
                let mut port = Port::new(name, origin.clone());
                port.inherit(direction, range, net_type);
                self.ports.push(port);
            }
        }
        // every port is backed by a net of the same name
        let net = self.declare_net(name, net_type, range, origin);
        if let Some(port) = self.ports.iter_mut().find(|p| p.name() == name) {
            port.attach_net(net);
        }
    }

    /// Declares a net, or refines the existing net of the same name. A
    /// `None` kind leaves an already-known kind alone (new nets fall back
    /// to `wire`).
    pub fn declare_net(
        &mut self,
        name: &str,
        kind: Option<&str>,
        range: Option<&str>,
        origin: &Origin,
    ) -> NetId {
        match self.net_index.get(name) {
            Some(id) => {
                self.nets[id.0].refine(kind, range);
                *id
            }
            None => {
                let id = NetId(self.nets.len());
                self.nets
                    .push(Net::new(name, kind.unwrap_or("wire"), origin.clone()).with_range(range));
                self.net_index.insert(name.to_string(), id);
                id
            }
        }
    }

    /// Creates an implicit net for a name the source never declared.
    pub(crate) fn implicit_net(&mut self, name: &str, kind: &str, origin: &Origin) -> NetId {
        match self.net_index.get(name) {
            Some(id) => *id,
            None => {
                let id = NetId(self.nets.len());
                self.nets.push(Net::new(name, kind, origin.clone()).implicit());
                self.net_index.insert(name.to_string(), id);
                id
            }
        }
    }

    pub fn add_parameter(&mut self, name: &str, default_text: &str) {
        match self.parameters.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = default_text.to_string(),
            None => self
                .parameters
                .push((name.to_string(), default_text.to_string())),
        }
    }

    pub(crate) fn push_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }

    pub(crate) fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.0]
    }

    pub(crate) fn mark_instantiated(&mut self) {
        self.instantiated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> Origin {
        Origin::new("m.v", 1)
    }

    #[test]
    fn port_merge_keeps_header_order() {
        let mut m = Module::new("m", here());
        m.add_port("a", None, None, None, &here());
        m.add_port("b", None, None, None, &here());
        m.add_port("a", Some(PortDirection::Input), None, None, &here());
        m.add_port("b", Some(PortDirection::Output), Some("[7:0]"), None, &here());
        assert_eq!(m.ports().len(), 2);
        assert_eq!(m.ports()[0].name(), "a");
        assert_eq!(m.ports()[0].direction(), Some(PortDirection::Input));
        assert_eq!(m.ports()[1].range(), Some("[7:0]"));
        // backing nets came along
        assert!(m.find_net("a").is_some());
        assert_eq!(m.find_net("b").unwrap().range(), Some("[7:0]"));
    }

    #[test]
    fn implicit_nets_are_flagged() {
        let mut m = Module::new("m", here());
        let declared = m.declare_net("d", Some("wire"), None, &here());
        let implicit = m.implicit_net("i", "wire", &here());
        assert_eq!(m.net(declared).is_declared(), true);
        assert_eq!(m.net(implicit).is_declared(), false);
    }
}
