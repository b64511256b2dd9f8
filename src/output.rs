//! Where evaluation output goes.
//!
//! Results and `print` output go to stdout and diagnostics to stderr, or
//! everything is captured line by line for tests.

#[derive(Debug)]
pub enum Output {
    Stdout,
    Buffer(Vec<String>),
}

impl Default for Output {
    fn default() -> Self {
        Output::Stdout
    }
}

impl Output {
    pub fn buffer() -> Output {
        Output::Buffer(Vec::new())
    }

    pub fn println(&mut self, msg: &str) {
        match self {
            Output::Stdout => println!("{}", msg),
            Output::Buffer(lines) => lines.push(msg.to_owned()),
        }
    }

    /// Emits a one-line diagnostic prefixed with `error: `.
    pub fn error(&mut self, msg: &str) {
        match self {
            Output::Stdout => eprintln!("error: {}", msg),
            Output::Buffer(lines) => lines.push(format!("error: {}", msg)),
        }
    }

    /// Drains captured lines; always empty for stdout.
    pub fn take_lines(&mut self) -> Vec<String> {
        match self {
            Output::Stdout => Vec::new(),
            Output::Buffer(lines) => std::mem::take(lines),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_buffer() {
        let mut out = Output::buffer();
        out.println("= 1");
        out.error("too few args in call to f");
        assert_eq!(
            out.take_lines(),
            vec!["= 1".to_owned(), "error: too few args in call to f".to_owned()]
        );
        assert!(out.take_lines().is_empty());
    }
}
