use super::ast::{BuiltinFn, CompareOp};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Let,
    If,
    Then,
    Else,
    While,
    Do,
    Builtin(BuiltinFn),
    Cmp(CompareOp),
    Ident(String),
    Number(f64),
    Kwd(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Let => write!(f, "let"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::Do => write!(f, "do"),
            Token::Builtin(func) => write!(f, "{}", func.name()),
            Token::Cmp(op) => write!(f, "{}", cmp_symbol(*op)),
            Token::Ident(id) => write!(f, "{}", id),
            Token::Number(n) => write!(f, "{}", n),
            Token::Kwd(c) => write!(f, "{}", c),
        }
    }
}

fn cmp_symbol(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Gt => ">",
        CompareOp::Lt => "<",
        CompareOp::Ne => "<>",
        CompareOp::Eq => "==",
        CompareOp::Ge => ">=",
        CompareOp::Le => "<=",
    }
}
