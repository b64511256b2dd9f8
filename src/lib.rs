//! A small tree-walking calculator language.
//!
//! Numbers, variables, comparisons, `if`/`while`, the builtins `sqrt`, `exp`,
//! `log` and `print`, and user functions whose parameters are bound with
//! dynamic scope.

pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
mod lexer;
pub mod output;
mod parser;
pub mod printer;
pub mod symbol;
mod token;
pub mod toplevel;

pub use ast::{Node, Statement};
pub use error::{Error, ErrorKind};
pub use eval::Interpreter;
pub use output::Output;
pub use symbol::{Symbol, SymbolId, SymbolTable};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
