//! Interned symbols shared by the parser driver and the evaluator.
//!
//! Every distinct name maps to exactly one [`Symbol`] for the life of the
//! table. Nodes refer to symbols through copyable [`SymbolId`] handles, so a
//! function body may mention its own name without owning it.

use super::ast::Node;
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A user function: formal parameters plus the body evaluated with them bound.
///
/// Parameters and body only ever exist together.
#[derive(Debug, PartialEq)]
pub struct Function {
    params: Vec<SymbolId>,
    body: Node,
}

impl Function {
    pub fn new(params: Vec<SymbolId>, body: Node) -> Function {
        Function { params, body }
    }

    pub fn params(&self) -> &[SymbolId] {
        &self.params
    }

    pub fn body(&self) -> &Node {
        &self.body
    }
}

#[derive(Debug)]
pub struct Symbol {
    name: String,
    value: f64,
    // Rc so a call can keep evaluating the body while the table is borrowed mutably.
    function: Option<Rc<Function>>,
}

impl Symbol {
    fn new(name: &str) -> Symbol {
        Symbol {
            name: name.to_owned(),
            value: 0.0,
            function: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn function(&self) -> Option<&Rc<Function>> {
        self.function.as_ref()
    }

    pub fn is_function(&self) -> bool {
        self.function.is_some()
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Returns the symbol for `name`, creating it with value `0.0` on first use.
    pub fn lookup_or_create(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol::new(name));
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    /// Binds `params` and `body` to `id`, dropping any previous definition.
    ///
    /// Duplicate parameter names are not rejected.
    pub fn define(&mut self, id: SymbolId, params: Vec<SymbolId>, body: Node) {
        let symbol = &mut self[id];
        tracing::debug!(
            name = %symbol.name,
            params = params.len(),
            redefined = symbol.function.is_some(),
            "define function"
        );
        symbol.function = Some(Rc::new(Function::new(params, body)));
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}

impl IndexMut<SymbolId> for SymbolTable {
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }
}
