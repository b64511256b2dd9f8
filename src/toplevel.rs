use super::ast::Statement;
use super::config::Config;
use super::error::{Error, ErrorKind};
use super::eval::Interpreter;
use super::lexer;
use super::output::Output;
use super::parser;
use failure::ResultExt;
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Write};

/// Lexes and parses one input line into top-level items.
pub fn parse_line(line: &str) -> Result<Vec<Statement<String>>, Error> {
    let tokens = lexer::tokenize(line)?;
    parser::parse(&tokens)
}

impl Interpreter {
    /// Runs every item on `line` in order.
    ///
    /// A lex or parse error is reported and the rest of the line is dropped.
    pub fn run_line(&mut self, line: &str, dump_ast: bool) {
        match parse_line(line) {
            Ok(items) => {
                for item in items {
                    let stmt = item.resolve(self.symbols_mut());
                    self.execute(stmt, dump_ast);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected input line");
                self.output_mut().error(&e.to_string());
            }
        }
    }
}

/// Reads lines from `input` until end of file, printing `prompt` before each.
pub fn run<R: BufRead>(
    interp: &mut Interpreter,
    mut input: R,
    prompt: Option<&str>,
    dump_ast: bool,
) -> Result<(), Error> {
    loop {
        if let Some(prompt) = prompt {
            print!("{}", prompt);
            stdout().flush().context(ErrorKind::Io)?;
        }
        let mut line = String::new();
        if input.read_line(&mut line).context(ErrorKind::Io)? == 0 {
            break;
        }
        interp.run_line(&line, dump_ast);
    }
    Ok(())
}

pub fn main_loop(config: &Config) -> Result<(), Error> {
    let mut interp = Interpreter::new(Output::Stdout);
    match &config.script {
        Some(path) => {
            let file = File::open(path).context(ErrorKind::Io)?;
            run(&mut interp, BufReader::new(file), None, config.dump_ast)
        }
        None => {
            let stdin = stdin();
            let input = stdin.lock();
            run(&mut interp, input, Some(&config.prompt), config.dump_ast)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn session(src: &str) -> Vec<String> {
        let mut interp = Interpreter::new(Output::buffer());
        run(&mut interp, Cursor::new(src), None, false).unwrap();
        interp.output_mut().take_lines()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            session("1 + 2 * 3\n(1 + 2) * 3\n-|-4\n10 / 4\n"),
            vec!["=    7", "=    9", "=   -4", "=  2.5"]
        );
    }

    #[test]
    fn test_recursive_sum() {
        let lines = session(
            "n = 7\n\
             let f(n) = if n < 1 then 0; else n + f(n - 1);;\n\
             f(5)\n\
             n\n",
        );
        assert_eq!(lines, vec!["=    7", "Defined f", "=   15", "=    7"]);
    }

    #[test]
    fn test_while_and_print() {
        let lines = session(
            "i = 0\n\
             while i < 3 do i = i + 1; print(i * 10);\n",
        );
        assert_eq!(lines, vec!["=    0", "=   10", "=   20", "=   30", "=   30"]);
    }

    #[test]
    fn test_newton_sqrt() {
        let lines = session(
            "let avg(a, b) = (a + b) / 2;\n\
             let sq(n) = e = 1; while |((t = n / e) - e) > .001 do e = avg(e, t);;\n\
             sq(10)\n\
             sqrt(10)\n",
        );
        assert_eq!(lines, vec!["Defined avg", "Defined sq", "= 3.162", "= 3.162"]);
    }

    #[test]
    fn test_errors_are_reported() {
        let lines = session(
            "g(1)\n\
             let h(a, b) = a + b;\n\
             a = 3\n\
             h(1)\n\
             a\n\
             1 + )\n\
             2 $ 3\n\
             log(0)\n",
        );
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "error: call to undefined function:g");
        assert_eq!(lines[1], "=    0");
        assert_eq!(lines[2], "Defined h");
        assert_eq!(lines[3], "=    3");
        assert_eq!(lines[4], "error: too few args in call to h");
        assert_eq!(lines[5], "=    0");
        assert_eq!(lines[6], "=    3");
        assert!(lines[7].starts_with("error: syntax error: "), "{}", lines[7]);
        assert!(lines[8].starts_with("error: lex error: "), "{}", lines[8]);
        assert_eq!(lines[9], "= -inf");
    }

    #[test]
    fn test_redefine() {
        let lines = session(
            "let f(x) = x * 2;\n\
             f(4)\n\
             let f(x, y) = x - y;\n\
             f(4, 1)\n",
        );
        assert_eq!(lines, vec!["Defined f", "=    8", "Defined f", "=    3"]);
    }

    #[test]
    fn test_dump_ast() {
        let mut interp = Interpreter::new(Output::buffer());
        interp.run_line("x = 2 * y", true);
        assert_eq!(
            interp.output_mut().take_lines(),
            vec![
                "x =",
                "  '*'",
                "    number:   2",
                "    symbol reference:y",
                "=    0"
            ]
        );
    }

    #[test]
    fn test_parse_line() {
        let items = parse_line("let f() = 1;; f()").unwrap();
        assert_eq!(items.len(), 2);
        assert!(parse_line("let").is_err());
    }
}
