use crate::core::source::Origin;
use std::collections::HashMap;

/// A `` `define `` record. Object-like macros have no parameter list;
/// function-like macros carry their parameter names in declaration order.
#[derive(Debug, PartialEq, Clone)]
pub struct Define {
    name: String,
    params: Option<Vec<String>>,
    body: String,
    defined_at: Origin,
    predefined: bool,
}

impl Define {
    pub fn new(name: impl Into<String>, body: impl Into<String>, defined_at: Origin) -> Self {
        Self {
            name: name.into(),
            params: None,
            body: body.into(),
            defined_at: defined_at,
            predefined: false,
        }
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Marks the macro as seeded from outside the source text (`-D` flags,
    /// library defaults) so tooling can tell it apart from source defines.
    pub fn predefined(mut self) -> Self {
        self.predefined = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn params(&self) -> Option<&Vec<String>> {
        self.params.as_ref()
    }

    pub fn is_function_like(&self) -> bool {
        self.params.is_some()
    }

    pub fn arity(&self) -> usize {
        match &self.params {
            Some(p) => p.len(),
            None => 0,
        }
    }

    pub fn defined_at(&self) -> &Origin {
        &self.defined_at
    }

    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    /// Renders the macro back as a `` `define `` source line.
    pub fn to_define_line(&self) -> String {
        let mut line = format!("`define {}", self.name);
        if let Some(params) = &self.params {
            line.push('(');
            line.push_str(&params.join(", "));
            line.push(')');
        }
        if self.body.is_empty() == false {
            line.push(' ');
            line.push_str(&self.body);
        }
        line
    }
}

/// What `DefineTable::define` observed about the incoming record.
#[derive(Debug, PartialEq)]
pub enum DefineOutcome {
    New,
    /// Redefinition with an identical parameter list and body; kept silent.
    Identical,
    /// Redefinition with a different shape; carries the prior definition
    /// site so a warning can point at both.
    Redefined(Origin),
}

/// The macro table: name lookups plus stable insertion order so dumps come
/// out the way definitions were seen.
#[derive(Debug, PartialEq, Clone)]
pub struct DefineTable {
    map: HashMap<String, Define>,
    order: Vec<String>,
}

impl DefineTable {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn define(&mut self, def: Define) -> DefineOutcome {
        match self.map.get(def.name()) {
            Some(existing) => {
                let outcome = match existing.body == def.body && existing.params == def.params {
                    true => DefineOutcome::Identical,
                    false => DefineOutcome::Redefined(existing.defined_at.clone()),
                };
                self.map.insert(def.name.clone(), def);
                outcome
            }
            None => {
                self.order.push(def.name.clone());
                self.map.insert(def.name.clone(), def);
                DefineOutcome::New
            }
        }
    }

    /// Removes `name`. Undefining an unknown name is a no-op.
    pub fn undefine(&mut self, name: &str) -> bool {
        match self.map.remove(name) {
            Some(_) => {
                self.order.retain(|n| n != name);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Define> {
        self.map.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Iterates definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Define> {
        self.order.iter().filter_map(|n| self.map.get(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize) -> Origin {
        Origin::new("test.v", line)
    }

    #[test]
    fn redefinition_outcomes() {
        let mut table = DefineTable::new();
        assert_eq!(
            table.define(Define::new("W", "32", at(1))),
            DefineOutcome::New
        );
        assert_eq!(
            table.define(Define::new("W", "32", at(5))),
            DefineOutcome::Identical
        );
        assert_eq!(
            table.define(Define::new("W", "64", at(9))),
            DefineOutcome::Redefined(at(1))
        );
        assert_eq!(table.get("W").unwrap().body(), "64");
    }

    #[test]
    fn undefine_unknown_is_noop() {
        let mut table = DefineTable::new();
        assert_eq!(table.undefine("NOPE"), false);
        table.define(Define::new("A", "", at(1)));
        assert_eq!(table.undefine("A"), true);
        assert_eq!(table.is_defined("A"), false);
    }

    #[test]
    fn ordered_iteration_and_render() {
        let mut table = DefineTable::new();
        table.define(Define::new("B", "2", at(1)));
        table.define(Define::new("A", "1", at(2)));
        table.define(Define::new("MAX", "(a > b) ? a : b", at(3)).with_params(vec![
            "a".to_string(),
            "b".to_string(),
        ]));
        let lines: Vec<String> = table.iter().map(|d| d.to_define_line()).collect();
        assert_eq!(
            lines,
            vec![
                "`define B 2",
                "`define A 1",
                "`define MAX(a, b) (a > b) ? a : b",
            ]
        );
    }
}
