use super::module::{ModuleId, NetId};
use crate::core::parse::PinBinding;
use crate::core::source::Origin;

/// One port-to-net binding on a cell. The weak references are absent until
/// `link()` fills them in; an unresolved pin is a first-class state.
#[derive(Debug, PartialEq, Clone)]
pub struct Pin {
    binding: PinBinding,
    net_expr: String,
    resolved_port: Option<usize>,
    resolved_net: Option<NetId>,
    origin: Origin,
}

impl Pin {
    pub fn new(binding: PinBinding, net_expr: impl Into<String>, origin: Origin) -> Self {
        Self {
            binding: binding,
            net_expr: net_expr.into(),
            resolved_port: None,
            resolved_net: None,
            origin: origin,
        }
    }

    pub fn binding(&self) -> &PinBinding {
        &self.binding
    }

    /// The textual net expression; empty for an open (`()` or `,,`) slot.
    pub fn net_expr(&self) -> &str {
        &self.net_expr
    }

    /// The position of the bound port in the submodule's port list, once
    /// the linker has matched it.
    pub fn resolved_port(&self) -> Option<usize> {
        self.resolved_port
    }

    /// The net inside the enclosing module this pin attaches to, once the
    /// linker has looked it up.
    pub fn resolved_net(&self) -> Option<NetId> {
        self.resolved_net
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub(crate) fn resolve_port(&mut self, position: usize) {
        self.resolved_port = Some(position);
    }

    pub(crate) fn resolve_net(&mut self, net: NetId) {
        self.resolved_net = Some(net);
    }
}

/// An instantiation of a module inside another module. The submodule
/// reference stays `None` for black boxes the netlist never saw.
#[derive(Debug, PartialEq, Clone)]
pub struct Cell {
    instance: String,
    submodule_name: String,
    submodule: Option<ModuleId>,
    parameter_overrides: Vec<(PinBinding, String)>,
    pins: Vec<Pin>,
    origin: Origin,
}

impl Cell {
    pub fn new(
        instance: impl Into<String>,
        submodule_name: impl Into<String>,
        origin: Origin,
    ) -> Self {
        Self {
            instance: instance.into(),
            submodule_name: submodule_name.into(),
            submodule: None,
            parameter_overrides: Vec::new(),
            pins: Vec::new(),
            origin: origin,
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn submodule_name(&self) -> &str {
        &self.submodule_name
    }

    /// The linked module definition, or `None` when unresolved.
    pub fn submodule(&self) -> Option<ModuleId> {
        self.submodule
    }

    pub fn parameter_overrides(&self) -> &Vec<(PinBinding, String)> {
        &self.parameter_overrides
    }

    pub fn pins(&self) -> &Vec<Pin> {
        &self.pins
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub(crate) fn add_parameter_override(&mut self, binding: PinBinding, value: &str) {
        self.parameter_overrides.push((binding, value.to_string()));
    }

    pub(crate) fn add_pin(&mut self, pin: Pin) {
        self.pins.push(pin);
    }

    pub(crate) fn resolve(&mut self, target: ModuleId) {
        self.submodule = Some(target);
    }

    pub(crate) fn pins_mut(&mut self) -> &mut Vec<Pin> {
        &mut self.pins
    }
}
