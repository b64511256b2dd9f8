use super::ast::{BuiltinFn, Node, Statement};
use super::error::ErrorKind;
use super::output::Output;
use super::printer::format_g;
use super::symbol::{SymbolId, SymbolTable};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// Owns the symbol table and the output sink that evaluation writes to.
#[derive(Debug, Default)]
pub struct Interpreter {
    symbols: SymbolTable,
    output: Output,
}

impl Interpreter {
    pub fn new(output: Output) -> Interpreter {
        Interpreter {
            symbols: SymbolTable::new(),
            output,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.output
    }

    pub fn lookup_or_create(&mut self, name: &str) -> SymbolId {
        self.symbols.lookup_or_create(name)
    }

    pub fn define(&mut self, name: SymbolId, params: Vec<SymbolId>, body: Node) {
        self.symbols.define(name, params, body);
    }

    pub fn value(&self, id: SymbolId) -> f64 {
        self.symbols[id].value()
    }

    pub fn evaluate(&mut self, node: &Node) -> f64 {
        node.evaluate(self)
    }

    /// Runs one top-level item, emitting `Defined <name>` or `= <result>`.
    pub fn execute(&mut self, stmt: Statement, dump_ast: bool) -> Option<f64> {
        match stmt {
            Statement::Define(name, params, body) => {
                self.define(name, params, body);
                let msg = format!("Defined {}", self.symbols[name].name());
                self.output.println(&msg);
                None
            }
            Statement::Expr(node) => {
                if dump_ast {
                    node.print(&self.symbols, 0, &mut self.output);
                }
                let v = node.evaluate(self);
                self.output.println(&format!("= {}", format_g(v)));
                Some(v)
            }
        }
    }

    pub(crate) fn report(&mut self, kind: ErrorKind) {
        tracing::warn!(error = %kind, "evaluation error");
        self.output.error(&kind.to_string());
    }

    fn call(&mut self, id: SymbolId, args: Option<&Node>) -> f64 {
        let function = match self.symbols[id].function() {
            Some(function) => Rc::clone(function),
            None => {
                let name = self.symbols[id].name().to_owned();
                self.report(ErrorKind::UndefinedFunction(name));
                return 0.0;
            }
        };

        // Arguments see the caller's bindings, so all of them are evaluated
        // before any parameter changes. Extra arguments are ignored.
        let params = function.params();
        let mut values = Vec::with_capacity(params.len());
        let mut rest = args;
        for _ in params {
            match rest {
                Some(Node::Sequence(first, second)) => {
                    values.push(first.evaluate(self));
                    rest = Some(&**second);
                }
                Some(last) => {
                    values.push(last.evaluate(self));
                    rest = None;
                }
                None => {
                    let name = self.symbols[id].name().to_owned();
                    self.report(ErrorKind::TooFewArguments(name));
                    return 0.0;
                }
            }
        }

        let mut scope = Bindings::bind(self, params, &values);
        function.body().evaluate(&mut scope)
    }
}

/// Dynamic-scope parameter bindings for one user function call.
///
/// Dropping the guard puts every saved value back, last binding first, on
/// every exit path including unwinding.
struct Bindings<'a> {
    interp: &'a mut Interpreter,
    saved: Vec<(SymbolId, f64)>,
}

impl<'a> Bindings<'a> {
    fn bind(interp: &'a mut Interpreter, params: &[SymbolId], values: &[f64]) -> Bindings<'a> {
        let mut saved = Vec::with_capacity(params.len());
        for (&param, &value) in params.iter().zip(values) {
            let symbol = &mut interp.symbols[param];
            tracing::trace!(name = symbol.name(), old = symbol.value(), new = value, "bind");
            saved.push((param, symbol.value()));
            symbol.set_value(value);
        }
        Bindings { interp, saved }
    }
}

impl Deref for Bindings<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Interpreter {
        self.interp
    }
}

impl DerefMut for Bindings<'_> {
    fn deref_mut(&mut self) -> &mut Interpreter {
        self.interp
    }
}

impl Drop for Bindings<'_> {
    fn drop(&mut self) {
        for &(param, value) in self.saved.iter().rev() {
            tracing::trace!(name = self.interp.symbols[param].name(), value, "restore");
            self.interp.symbols[param].set_value(value);
        }
    }
}

impl Node {
    pub fn evaluate(&self, interp: &mut Interpreter) -> f64 {
        match self {
            Node::Number(n) => *n,
            Node::SymbolRef(s) => interp.symbols[*s].value(),
            Node::Assign(s, v) => {
                let v = v.evaluate(interp);
                interp.symbols[*s].set_value(v);
                v
            }
            Node::Binary(op, l, r) => {
                let l = l.evaluate(interp);
                let r = r.evaluate(interp);
                op.apply(l, r)
            }
            Node::Compare(op, l, r) => {
                let l = l.evaluate(interp);
                let r = r.evaluate(interp);
                if op.apply(l, r) {
                    1.0
                } else {
                    0.0
                }
            }
            Node::Sequence(first, second) => {
                first.evaluate(interp);
                second.evaluate(interp)
            }
            Node::Unary(op, operand) => op.apply(operand.evaluate(interp)),
            Node::Builtin(func, arg) => {
                let v = arg.evaluate(interp);
                match func {
                    BuiltinFn::Sqrt => v.sqrt(),
                    BuiltinFn::Exp => v.exp(),
                    BuiltinFn::Log => v.ln(),
                    BuiltinFn::Print => {
                        interp.output.println(&format!("= {}", format_g(v)));
                        v
                    }
                }
            }
            Node::Call(s, args) => interp.call(*s, args.as_deref()),
            Node::If(cond, then, els) => {
                let branch = if cond.evaluate(interp) != 0.0 {
                    then
                } else {
                    els
                };
                match branch {
                    Some(branch) => branch.evaluate(interp),
                    None => 0.0,
                }
            }
            Node::While(cond, body) => {
                let mut v = 0.0;
                if let Some(body) = body {
                    while cond.evaluate(interp) != 0.0 {
                        v = body.evaluate(interp);
                    }
                }
                v
            }
        }
    }
}
