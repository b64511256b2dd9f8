use super::symbol::{SymbolId, SymbolTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    Ne,
    Eq,
    Ge,
    Le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Abs,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFn {
    Sqrt,
    Exp,
    Log,
    Print,
}

impl BinaryOp {
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
        }
    }
}

impl CompareOp {
    pub fn apply(self, l: f64, r: f64) -> bool {
        match self {
            CompareOp::Gt => l > r,
            CompareOp::Lt => l < r,
            CompareOp::Ne => l != r,
            CompareOp::Eq => l == r,
            CompareOp::Ge => l >= r,
            CompareOp::Le => l <= r,
        }
    }
}

impl UnaryOp {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::Abs => v.abs(),
            UnaryOp::Neg => -v,
        }
    }
}

impl BuiltinFn {
    pub fn from_name(name: &str) -> Option<BuiltinFn> {
        match name {
            "sqrt" => Some(BuiltinFn::Sqrt),
            "exp" => Some(BuiltinFn::Exp),
            "log" => Some(BuiltinFn::Log),
            "print" => Some(BuiltinFn::Print),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinFn::Sqrt => "sqrt",
            BuiltinFn::Exp => "exp",
            BuiltinFn::Log => "log",
            BuiltinFn::Print => "print",
        }
    }
}

/// An owned expression or statement tree.
///
/// `S` is how symbols are named: the parser produces `Node<String>`, which
/// [`Node::resolve`] turns into the `Node<SymbolId>` the evaluator runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<S = SymbolId> {
    Number(f64),
    SymbolRef(S),
    Assign(S, Box<Node<S>>),
    Binary(BinaryOp, Box<Node<S>>, Box<Node<S>>),
    Compare(CompareOp, Box<Node<S>>, Box<Node<S>>),
    /// Evaluates the first child for effect and yields the second.
    /// Chains statement lists and call arguments.
    Sequence(Box<Node<S>>, Box<Node<S>>),
    Unary(UnaryOp, Box<Node<S>>),
    Builtin(BuiltinFn, Box<Node<S>>),
    Call(S, Option<Box<Node<S>>>),
    If(Box<Node<S>>, Option<Box<Node<S>>>, Option<Box<Node<S>>>),
    While(Box<Node<S>>, Option<Box<Node<S>>>),
}

impl<S> Node<S> {
    pub fn number(value: f64) -> Node<S> {
        Node::Number(value)
    }

    pub fn symbol_ref(symbol: S) -> Node<S> {
        Node::SymbolRef(symbol)
    }

    pub fn assign(symbol: S, value: Node<S>) -> Node<S> {
        Node::Assign(symbol, Box::new(value))
    }

    pub fn binary(op: BinaryOp, l: Node<S>, r: Node<S>) -> Node<S> {
        Node::Binary(op, Box::new(l), Box::new(r))
    }

    pub fn compare(op: CompareOp, l: Node<S>, r: Node<S>) -> Node<S> {
        Node::Compare(op, Box::new(l), Box::new(r))
    }

    pub fn sequence(first: Node<S>, second: Node<S>) -> Node<S> {
        Node::Sequence(Box::new(first), Box::new(second))
    }

    pub fn unary(op: UnaryOp, operand: Node<S>) -> Node<S> {
        Node::Unary(op, Box::new(operand))
    }

    pub fn builtin(func: BuiltinFn, arg: Node<S>) -> Node<S> {
        Node::Builtin(func, Box::new(arg))
    }

    pub fn call(symbol: S, args: Option<Node<S>>) -> Node<S> {
        Node::Call(symbol, args.map(Box::new))
    }

    pub fn if_(cond: Node<S>, then: Option<Node<S>>, els: Option<Node<S>>) -> Node<S> {
        Node::If(Box::new(cond), then.map(Box::new), els.map(Box::new))
    }

    pub fn while_(cond: Node<S>, body: Option<Node<S>>) -> Node<S> {
        Node::While(Box::new(cond), body.map(Box::new))
    }

    /// Right-nests `nodes` into `Sequence`s; `None` when empty.
    pub fn chain(nodes: Vec<Node<S>>) -> Option<Node<S>> {
        nodes.into_iter().rev().fold(None, |rest, node| {
            Some(match rest {
                Some(rest) => Node::sequence(node, rest),
                None => node,
            })
        })
    }

    pub fn map_symbols<T, F>(self, f: &mut F) -> Node<T>
    where
        F: FnMut(S) -> T,
    {
        match self {
            Node::Number(n) => Node::Number(n),
            Node::SymbolRef(s) => Node::SymbolRef(f(s)),
            Node::Assign(s, v) => {
                let s = f(s);
                Node::Assign(s, Box::new(v.map_symbols(f)))
            }
            Node::Binary(op, l, r) => {
                let l = l.map_symbols(f);
                Node::Binary(op, Box::new(l), Box::new(r.map_symbols(f)))
            }
            Node::Compare(op, l, r) => {
                let l = l.map_symbols(f);
                Node::Compare(op, Box::new(l), Box::new(r.map_symbols(f)))
            }
            Node::Sequence(a, b) => {
                let a = a.map_symbols(f);
                Node::Sequence(Box::new(a), Box::new(b.map_symbols(f)))
            }
            Node::Unary(op, n) => Node::Unary(op, Box::new(n.map_symbols(f))),
            Node::Builtin(func, n) => Node::Builtin(func, Box::new(n.map_symbols(f))),
            Node::Call(s, args) => {
                let s = f(s);
                Node::Call(s, args.map(|a| Box::new(a.map_symbols(f))))
            }
            Node::If(c, t, e) => {
                let c = c.map_symbols(f);
                let t = t.map(|t| Box::new(t.map_symbols(f)));
                Node::If(Box::new(c), t, e.map(|e| Box::new(e.map_symbols(f))))
            }
            Node::While(c, body) => {
                let c = c.map_symbols(f);
                Node::While(Box::new(c), body.map(|b| Box::new(b.map_symbols(f))))
            }
        }
    }
}

impl<S: AsRef<str>> Node<S> {
    /// Interns every symbol name, creating missing symbols.
    pub fn resolve(self, symbols: &mut SymbolTable) -> Node {
        self.map_symbols(&mut |name: S| symbols.lookup_or_create(name.as_ref()))
    }
}

/// A top-level item produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<S = SymbolId> {
    Define(S, Vec<S>, Node<S>),
    Expr(Node<S>),
}

impl<S: AsRef<str>> Statement<S> {
    pub fn resolve(self, symbols: &mut SymbolTable) -> Statement {
        match self {
            Statement::Define(name, params, body) => {
                let name = symbols.lookup_or_create(name.as_ref());
                let params = params
                    .iter()
                    .map(|p| symbols.lookup_or_create(p.as_ref()))
                    .collect();
                Statement::Define(name, params, body.resolve(symbols))
            }
            Statement::Expr(e) => Statement::Expr(e.resolve(symbols)),
        }
    }
}
