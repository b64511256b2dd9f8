//! Indented tree dumps and C-style `%g` number formatting.

use super::ast::{BinaryOp, CompareOp, Node, UnaryOp};
use super::output::Output;
use super::symbol::SymbolTable;
use std::fmt::{self, Write};

const PRECISION: usize = 4;
const WIDTH: usize = 4;

/// Formats `v` the way `printf("%4.4g", v)` does.
pub fn format_g(v: f64) -> String {
    format!("{:>width$}", general(v, PRECISION), width = WIDTH)
}

fn general(v: f64, precision: usize) -> String {
    if v.is_nan() {
        return "nan".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    // Rounding to `precision` digits can bump the exponent, so take it from the rounded form.
    let sci = format!("{:.*e}", precision - 1, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, v)).to_owned()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn binary_label(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "'+'",
        BinaryOp::Sub => "'-'",
        BinaryOp::Mul => "'*'",
        BinaryOp::Div => "'/'",
    }
}

fn compare_label(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Gt => "greater than",
        CompareOp::Lt => "less than",
        CompareOp::Ne => "not equal",
        CompareOp::Eq => "equal",
        CompareOp::Ge => "greater than or equal",
        CompareOp::Le => "less than or equal",
    }
}

fn unary_label(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Abs => "absolute value of",
        UnaryOp::Neg => "negative of",
    }
}

/// Display adapter rendering a resolved tree, two spaces per level.
pub struct Dump<'a> {
    node: &'a Node,
    symbols: &'a SymbolTable,
    level: usize,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_tree(self.node, self.symbols, self.level, f)
    }
}

fn line<W: Write>(out: &mut W, level: usize, label: fmt::Arguments) -> fmt::Result {
    writeln!(out, "{:indent$}{}", "", label, indent = 2 * level)
}

fn write_tree<W: Write>(node: &Node, symbols: &SymbolTable, level: usize, out: &mut W) -> fmt::Result {
    match node {
        Node::Number(n) => line(out, level, format_args!("number:{}", format_g(*n))),
        Node::SymbolRef(s) => line(
            out,
            level,
            format_args!("symbol reference:{}", symbols[*s].name()),
        ),
        Node::Assign(s, v) => {
            line(out, level, format_args!("{} =", symbols[*s].name()))?;
            write_tree(v, symbols, level + 1, out)
        }
        Node::Binary(op, l, r) => {
            line(out, level, format_args!("{}", binary_label(*op)))?;
            write_tree(l, symbols, level + 1, out)?;
            write_tree(r, symbols, level + 1, out)
        }
        Node::Compare(op, l, r) => {
            line(out, level, format_args!("{}", compare_label(*op)))?;
            write_tree(l, symbols, level + 1, out)?;
            write_tree(r, symbols, level + 1, out)
        }
        Node::Sequence(first, second) => {
            line(out, level, format_args!("list"))?;
            write_tree(first, symbols, level + 1, out)?;
            write_tree(second, symbols, level + 1, out)
        }
        Node::Unary(op, operand) => {
            line(out, level, format_args!("{}", unary_label(*op)))?;
            write_tree(operand, symbols, level + 1, out)
        }
        Node::Builtin(func, arg) => {
            line(out, level, format_args!("{}", func.name()))?;
            write_tree(arg, symbols, level + 1, out)
        }
        Node::Call(s, args) => {
            line(
                out,
                level,
                format_args!("User defined function call:{}", symbols[*s].name()),
            )?;
            line(out, level, format_args!("Arguments:"))?;
            match args {
                Some(args) => write_tree(args, symbols, level + 1, out),
                None => Ok(()),
            }
        }
        Node::If(cond, then, els) => {
            line(out, level, format_args!("if statement"))?;
            write_block(out, symbols, level, "condition:", Some(cond.as_ref()))?;
            write_block(out, symbols, level, "true block:", then.as_deref())?;
            write_block(out, symbols, level, "else block:", els.as_deref())
        }
        Node::While(cond, body) => {
            line(out, level, format_args!("while statement"))?;
            write_block(out, symbols, level, "condition:", Some(cond.as_ref()))?;
            write_block(out, symbols, level, "true block:", body.as_deref())
        }
    }
}

fn write_block<W: Write>(
    out: &mut W,
    symbols: &SymbolTable,
    level: usize,
    label: &str,
    node: Option<&Node>,
) -> fmt::Result {
    match node {
        Some(node) => {
            line(out, level, format_args!("{}", label))?;
            write_tree(node, symbols, level + 1, out)
        }
        None => Ok(()),
    }
}

impl Node {
    pub fn dump<'a>(&'a self, symbols: &'a SymbolTable, level: usize) -> Dump<'a> {
        Dump {
            node: self,
            symbols,
            level,
        }
    }

    /// Writes the indented tree to `out`, one line per node label.
    pub fn print(&self, symbols: &SymbolTable, level: usize, out: &mut Output) {
        for line in self.dump(symbols, level).to_string().lines() {
            out.println(line);
        }
    }
}
