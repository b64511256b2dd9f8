use super::ast::{BuiltinFn, CompareOp};
use super::error::{Error, ErrorKind};
use super::token::Token;
use combine::error::{ParseError, StreamError};
use combine::parser::char::{alpha_num, digit, letter, newline, space, string};
use combine::parser::choice::or;
use combine::parser::repeat::take_until;
use combine::parser::{EasyParser, Parser};
use combine::stream::{Stream, StreamErrorFor};
use combine::{
    attempt, choice, eof, many, many1, one_of, parser, skip_many, skip_many1, token,
};

fn number<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many1(choice((digit(), token('.'))))
        .and_then(|ns: String| ns.parse::<f64>().map_err(StreamErrorFor::<Input>::other))
        .map(Token::Number)
}

fn keyword(id: &str) -> Token {
    match id {
        "let" => Token::Let,
        "if" => Token::If,
        "then" => Token::Then,
        "else" => Token::Else,
        "while" => Token::While,
        "do" => Token::Do,
        id => match BuiltinFn::from_name(id) {
            Some(func) => Token::Builtin(func),
            None => Token::Ident(id.to_owned()),
        },
    }
}

fn ident<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (letter(), many(or(alpha_num(), token('_')))).map(|(c, rest): (char, String)| {
        let mut id = c.to_string();
        id.push_str(&rest);
        keyword(&id)
    })
}

fn operator<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let cmp = choice((
        attempt(string("==")).map(|_| CompareOp::Eq),
        attempt(string("<>")).map(|_| CompareOp::Ne),
        attempt(string(">=")).map(|_| CompareOp::Ge),
        attempt(string("<=")).map(|_| CompareOp::Le),
        token('>').map(|_| CompareOp::Gt),
        token('<').map(|_| CompareOp::Lt),
    ))
    .map(Token::Cmp);

    or(cmp, one_of("+-*/|=(),;".chars()).map(Token::Kwd))
}

fn comment<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    skip_many1((
        token('#'),
        take_until::<Vec<_>, _, _>(or(newline().map(|_| ()), eof())),
    ))
}

fn lex_<Input>() -> impl Parser<Input, Output = Option<Token>>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    skip_many(space()).with(choice((
        number().map(Some),
        ident().map(Some),
        operator().map(Some),
        comment().with(lex()),
        eof().map(|_| None),
    )))
}

parser! {
    pub(crate) fn lex[Input]()(Input) -> Option<Token>
        where [Input: Stream<Token=char>]
    {
        lex_()
    }
}

/// Splits one input line into tokens.
pub(crate) fn tokenize(line: &str) -> Result<Vec<Token>, Error> {
    let mut buf = line;
    let mut tokens = Vec::new();
    loop {
        match lex().easy_parse(buf) {
            Ok((Some(token), rest)) => {
                buf = rest;
                tokens.push(token);
            }
            Ok(_) => break,
            Err(e) => {
                let e = e.map_position(|p| p.translate_position(line));
                return Err(Error::from(ErrorKind::Lex(one_line(&e.to_string()))));
            }
        }
    }
    Ok(tokens)
}

fn one_line(msg: &str) -> String {
    msg.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
