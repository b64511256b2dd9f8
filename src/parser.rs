use super::ast::{BinaryOp, CompareOp, Node, Statement, UnaryOp};
use super::error::{Error, ErrorKind};
use super::token::Token;
use combine::easy;
use combine::error::ParseError;
use combine::parser::repeat::chainl1;
pub(crate) use combine::parser::{EasyParser, Parser};
use combine::stream::Stream;
use combine::{attempt, between, choice, many, optional, parser, satisfy_map, sep_by, token};
use std::fmt;

type Expr = Node<String>;

fn ident<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy_map(|t| match t {
        Token::Ident(id) => Some(id),
        _ => None,
    })
}

fn args<Input>() -> impl Parser<Input, Output = Option<Expr>>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    sep_by(expr(), token(Token::Kwd(','))).map(|aa: Vec<Expr>| Node::chain(aa))
}

fn primary<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    use super::token::Token::*;
    let number = satisfy_map(|t| match t {
        Number(n) => Some(Node::number(n)),
        _ => None,
    });

    let paren = between(token(Kwd('(')), token(Kwd(')')), expr());

    let builtin = (
        satisfy_map(|t| match t {
            Builtin(func) => Some(func),
            _ => None,
        }),
        between(token(Kwd('(')), token(Kwd(')')), expr()),
    )
        .map(|(func, arg)| Node::builtin(func, arg));

    // `name(...)` calls, a bare `name` reads the symbol.
    let call_or_ref = (
        ident(),
        optional(between(token(Kwd('(')), token(Kwd(')')), args())),
    )
        .map(|(id, aa)| match aa {
            Some(aa) => Node::call(id, aa),
            None => Node::symbol_ref(id),
        });

    choice((number, paren, builtin, call_or_ref))
}

fn unary_<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    choice((
        token(Token::Kwd('|'))
            .with(unary())
            .map(|e| Node::unary(UnaryOp::Abs, e)),
        token(Token::Kwd('-'))
            .with(unary())
            .map(|e| Node::unary(UnaryOp::Neg, e)),
        primary(),
    ))
}

parser! {
    fn unary[Input]()(Input) -> Expr
        where [Input: Stream<Token=Token>]
    {
        unary_()
    }
}

fn mul<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let op = satisfy_map(|t| match t {
        Token::Kwd('*') => Some(BinaryOp::Mul),
        Token::Kwd('/') => Some(BinaryOp::Div),
        _ => None,
    });
    chainl1(unary(), op.map(|op| move |l, r| Node::binary(op, l, r)))
}

fn add<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let op = satisfy_map(|t| match t {
        Token::Kwd('+') => Some(BinaryOp::Add),
        Token::Kwd('-') => Some(BinaryOp::Sub),
        _ => None,
    });
    chainl1(mul(), op.map(|op| move |l, r| Node::binary(op, l, r)))
}

fn assignment_<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let assign = (attempt((ident(), token(Token::Kwd('=')))), assignment())
        .map(|((id, _), v)| Node::assign(id, v));
    choice((assign, add()))
}

parser! {
    fn assignment[Input]()(Input) -> Expr
        where [Input: Stream<Token=Token>]
    {
        assignment_()
    }
}

fn compare_op<Input>() -> impl Parser<Input, Output = CompareOp>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy_map(|t| match t {
        Token::Cmp(op) => Some(op),
        _ => None,
    })
}

fn expr_<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (assignment(), optional((compare_op(), assignment()))).map(|(l, rest)| match rest {
        Some((op, r)) => Node::compare(op, l, r),
        None => l,
    })
}

parser! {
    fn expr[Input]()(Input) -> Expr
        where [Input: Stream<Token=Token>]
    {
        expr_()
    }
}

fn parse_if<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    use super::token::Token::*;

    (
        token(If),
        expr(),
        token(Then),
        list(),
        optional(token(Else).with(list())),
    )
        .map(|(_, c, _, t, e)| Node::if_(c, t, e.flatten()))
}

fn parse_while<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    use super::token::Token::*;

    (token(While), expr(), token(Do), list()).map(|(_, c, _, body)| Node::while_(c, body))
}

fn statement_<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    choice((parse_if(), parse_while(), expr()))
}

parser! {
    fn statement[Input]()(Input) -> Expr
        where [Input: Stream<Token=Token>]
    {
        statement_()
    }
}

/// `stmt ;` repeated; an empty list is an absent block.
fn list<Input>() -> impl Parser<Input, Output = Option<Expr>>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    many(statement().skip(token(Token::Kwd(';')))).map(|ss: Vec<Expr>| Node::chain(ss))
}

fn list1<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    (statement().skip(token(Token::Kwd(';'))), list()).map(|(first, rest)| match rest {
        Some(rest) => Node::sequence(first, rest),
        None => first,
    })
}

fn params<Input>() -> impl Parser<Input, Output = Vec<String>>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    use super::token::Token::*;

    between(
        token(Kwd('(')),
        token(Kwd(')')),
        sep_by(ident(), token(Kwd(','))),
    )
}

pub(crate) fn definition<Input>() -> impl Parser<Input, Output = Statement<String>>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    use super::token::Token::*;

    (token(Let), ident(), params(), token(Kwd('=')), list1())
        .map(|(_, name, params, _, body)| Statement::Define(name, params, body))
}

pub(crate) fn toplevel<Input>() -> impl Parser<Input, Output = Statement<String>>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    choice((definition(), statement().map(Statement::Expr)))
}

/// Parses every top-level item in `tokens`, skipping stray `;`.
pub(crate) fn parse(tokens: &[Token]) -> Result<Vec<Statement<String>>, Error> {
    let mut ts = tokens;
    let mut items = Vec::new();

    while !ts.is_empty() {
        match ts[0] {
            Token::Kwd(';') => ts = &ts[1..],
            _ => match toplevel().easy_parse(ts) {
                Ok((item, rest)) => {
                    items.push(item);
                    ts = rest;
                }
                Err(e) => return Err(Error::from(ErrorKind::Parse(describe(&e.errors)))),
            },
        }
    }

    Ok(items)
}

fn describe<R: fmt::Debug>(errors: &[easy::Error<Token, R>]) -> String {
    let info = |info: &easy::Info<Token, R>| match info {
        easy::Info::Token(t) => format!("`{}`", t),
        easy::Info::Range(r) => format!("{:?}", r),
        easy::Info::Static(s) => s.to_string(),
        easy::Info::Owned(s) => s.clone(),
    };

    let mut unexpected = Vec::new();
    let mut expected = Vec::new();
    for error in errors {
        match error {
            easy::Error::Unexpected(i) => unexpected.push(info(i)),
            easy::Error::Expected(i) => expected.push(info(i)),
            easy::Error::Message(i) => unexpected.push(info(i)),
            easy::Error::Other(e) => unexpected.push(e.to_string()),
        }
    }

    let mut msg = match unexpected.first() {
        Some(u) => format!("unexpected {}", u),
        None => "unexpected input".to_owned(),
    };
    if !expected.is_empty() {
        msg.push_str(&format!(", expected {}", expected.join(" or ")));
    }
    msg
}

#[cfg(test)]
mod test {

    use super::super::lexer::tokenize;
    use super::super::token::Token::*;
    use super::*;
    use combine::any;
    use pretty_assertions::assert_eq;

    fn lex_tokens(s: &str) -> Vec<Token> {
        tokenize(s).unwrap()
    }

    fn name(s: &str) -> String {
        s.to_owned()
    }

    fn parse_expr(s: &str) -> Expr {
        let tokens = lex_tokens(s);
        let (e, rest) = expr().easy_parse(tokens.as_slice()).unwrap();
        assert!(rest.is_empty(), "unparsed tokens: {:?}", rest);
        e
    }

    #[test]
    fn test_parser_token() {
        assert_eq!(any().parse(vec![Let].as_slice()).map(|x| x.0), Ok(Let));

        assert_eq!(
            token(Ident("hoge".to_owned()))
                .parse(vec![Ident("hoge".to_owned())].as_slice())
                .map(|x| x.0),
            Ok(Ident("hoge".to_owned()))
        );
    }

    #[test]
    fn test_primary() {
        {
            let tokens = vec![Token::Number(1.0)];
            assert_eq!(
                primary().parse(tokens.as_slice()).map(|x| x.0),
                Ok(Node::number(1.0))
            );
        }

        {
            let tokens = vec![Token::Ident("y".to_owned())];
            assert_eq!(
                primary().parse(tokens.as_slice()).map(|x| x.0),
                Ok(Node::symbol_ref(name("y")))
            );
        }
    }

    #[test]
    fn test_expr() {
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            Node::binary(
                BinaryOp::Add,
                Node::number(1.0),
                Node::binary(BinaryOp::Mul, Node::number(2.0), Node::number(3.0))
            )
        );

        assert_eq!(
            parse_expr("(1 + 2) / 3"),
            Node::binary(
                BinaryOp::Div,
                Node::binary(BinaryOp::Add, Node::number(1.0), Node::number(2.0)),
                Node::number(3.0)
            )
        );

        assert_eq!(
            parse_expr("8 - 2 - 1"),
            Node::binary(
                BinaryOp::Sub,
                Node::binary(BinaryOp::Sub, Node::number(8.0), Node::number(2.0)),
                Node::number(1.0)
            )
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            parse_expr("-|x - 1"),
            Node::binary(
                BinaryOp::Sub,
                Node::unary(
                    UnaryOp::Neg,
                    Node::unary(UnaryOp::Abs, Node::symbol_ref(name("x")))
                ),
                Node::number(1.0)
            )
        );
    }

    #[test]
    fn test_assign_and_compare() {
        assert_eq!(
            parse_expr("a = b = 1 + 2"),
            Node::assign(
                name("a"),
                Node::assign(
                    name("b"),
                    Node::binary(BinaryOp::Add, Node::number(1.0), Node::number(2.0))
                )
            )
        );

        assert_eq!(
            parse_expr("x = 3 > 2"),
            Node::compare(
                CompareOp::Gt,
                Node::assign(name("x"), Node::number(3.0)),
                Node::number(2.0)
            )
        );

        assert_eq!(
            parse_expr("n <> 1"),
            Node::compare(CompareOp::Ne, Node::symbol_ref(name("n")), Node::number(1.0))
        );
    }

    #[test]
    fn test_call() {
        assert_eq!(
            parse_expr("foo(y, 4.0, z)"),
            Node::call(
                name("foo"),
                Some(Node::sequence(
                    Node::symbol_ref(name("y")),
                    Node::sequence(Node::number(4.0), Node::symbol_ref(name("z")))
                ))
            )
        );
        assert_eq!(parse_expr("foo()"), Node::call(name("foo"), None));
        assert_eq!(
            parse_expr("sqrt(2) + print(x)"),
            Node::binary(
                BinaryOp::Add,
                Node::builtin(crate::ast::BuiltinFn::Sqrt, Node::number(2.0)),
                Node::builtin(crate::ast::BuiltinFn::Print, Node::symbol_ref(name("x")))
            )
        );
    }

    #[test]
    fn test_args() {
        let tokens = lex_tokens("y, 4.0");
        assert_eq!(
            args().parse(tokens.as_slice()).map(|x| x.0),
            Ok(Some(Node::sequence(
                Node::symbol_ref(name("y")),
                Node::number(4.0)
            )))
        );
    }

    #[test]
    fn test_if() {
        let tokens = lex_tokens("if x > 1 then y = 1; z = 2; else y = 0;");
        assert_eq!(
            statement().parse(tokens.as_slice()).map(|x| x.0),
            Ok(Node::if_(
                Node::compare(CompareOp::Gt, Node::symbol_ref(name("x")), Node::number(1.0)),
                Some(Node::sequence(
                    Node::assign(name("y"), Node::number(1.0)),
                    Node::assign(name("z"), Node::number(2.0))
                )),
                Some(Node::assign(name("y"), Node::number(0.0)))
            ))
        );

        let tokens = lex_tokens("if 0 then");
        assert_eq!(
            statement().parse(tokens.as_slice()).map(|x| x.0),
            Ok(Node::if_(Node::number(0.0), None, None))
        );
    }

    #[test]
    fn test_while() {
        let tokens = lex_tokens("while i < 3 do i = i + 1;");
        assert_eq!(
            statement().parse(tokens.as_slice()).map(|x| x.0),
            Ok(Node::while_(
                Node::compare(CompareOp::Lt, Node::symbol_ref(name("i")), Node::number(3.0)),
                Some(Node::assign(
                    name("i"),
                    Node::binary(BinaryOp::Add, Node::symbol_ref(name("i")), Node::number(1.0))
                ))
            ))
        );
    }

    #[test]
    fn test_definition() {
        let tokens = lex_tokens("let avg(a, b) = (a + b) / 2;");
        assert_eq!(
            definition().parse(tokens.as_slice()).map(|x| x.0),
            Ok(Statement::Define(
                name("avg"),
                vec![name("a"), name("b")],
                Node::binary(
                    BinaryOp::Div,
                    Node::binary(
                        BinaryOp::Add,
                        Node::symbol_ref(name("a")),
                        Node::symbol_ref(name("b"))
                    ),
                    Node::number(2.0)
                )
            ))
        );

        let tokens = lex_tokens("let f(n) = if n < 1 then 0; else n + f(n - 1);;");
        let items = parse(&tokens).unwrap();
        assert_eq!(items.len(), 1);
        match &items[0] {
            Statement::Define(f, params, Node::If(..)) => {
                assert_eq!(f, "f");
                assert_eq!(params, &vec![name("n")]);
            }
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_parse_items() {
        let tokens = lex_tokens("x = 1; ; y = x + 1");
        assert_eq!(
            parse(&tokens).unwrap(),
            vec![
                Statement::Expr(Node::assign(name("x"), Node::number(1.0))),
                Statement::Expr(Node::assign(
                    name("y"),
                    Node::binary(BinaryOp::Add, Node::symbol_ref(name("x")), Node::number(1.0))
                )),
            ]
        );
        assert_eq!(parse(&[]).unwrap(), vec![]);
    }

    #[test]
    fn test_parse_error() {
        let tokens = lex_tokens("1 + )");
        let e = parse(&tokens).unwrap_err();
        match e.kind() {
            ErrorKind::Parse(msg) => assert!(msg.starts_with("unexpected"), "{}", msg),
            kind => panic!("unexpected error kind {:?}", kind),
        }

        let tokens = lex_tokens("let f(x) =");
        assert!(parse(&tokens).is_err());
    }
}
