use super::error::{Error, ErrorKind};
use std::path::PathBuf;

pub const USAGE: &str = "calc [-d|--dump-ast] [-p|--prompt <text>] [script]";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    /// Print each statement tree before evaluating it.
    pub dump_ast: bool,
    /// Read statements from this file instead of stdin.
    pub script: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "> ".to_owned(),
            dump_ast: false,
            script: None,
        }
    }
}

impl Config {
    /// Builds a config from command-line arguments, program name excluded.
    pub fn from_args<I, S>(args: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-d" | "--dump-ast" => config.dump_ast = true,
                "-p" | "--prompt" => {
                    config.prompt = args
                        .next()
                        .ok_or_else(|| ErrorKind::Usage(format!("{} needs an argument", arg)))?;
                }
                "-h" | "--help" => return Err(ErrorKind::Usage(USAGE.to_owned()).into()),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ErrorKind::Usage(format!("unknown option {}", flag)).into());
                }
                _ if config.script.is_some() => {
                    return Err(ErrorKind::Usage("only one script may be given".to_owned()).into());
                }
                path => config.script = Some(PathBuf::from(path)),
            }
        }

        Ok(config)
    }
}
