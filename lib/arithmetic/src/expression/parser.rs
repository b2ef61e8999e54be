use nom::IResult;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, one_of, space0},
    combinator::{cut, map, map_res, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, preceded, tuple},
};

use crate::config::Limits;
use crate::error::EvalError;
use crate::value::Number;

use super::{Expr, Operator};

fn parse_exponent(i: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(i)
}

fn parse_number(i: &str) -> IResult<&str, Number> {
    let fractional = alt((
        recognize(tuple((digit1, char('.'), opt(digit1), opt(parse_exponent)))),
        recognize(tuple((char('.'), digit1, opt(parse_exponent)))),
        recognize(pair(digit1, parse_exponent)),
    ));

    alt((
        map_res(fractional, |digit_str: &str| {
            digit_str.parse().map(Number::Float)
        }),
        // Integers too wide for an i64 degrade to floats
        map_res(digit1, |digit_str: &str| {
            digit_str
                .parse()
                .map(Number::Int)
                .or_else(|_| digit_str.parse().map(Number::Float))
        }),
    ))(i)
}

fn parse_additive(i: &str) -> IResult<&str, Operator> {
    alt((
        value(Operator::Add, char('+')),
        value(Operator::Subtract, char('-')),
    ))(i)
}

fn parse_multiplicative(i: &str) -> IResult<&str, Operator> {
    alt((
        value(Operator::Multiply, char('*')),
        value(Operator::Divide, char('/')),
        value(Operator::Modulo, char('%')),
    ))(i)
}

/// A parsed subtree and the number of levels it occupies
type Node = (Expr, usize);

type ParseErr<'a> = nom::Err<Error<&'a str>>;

/// Recursive descent parser that fails once the tree would be more than
/// `max_depth` levels deep
///
/// Parentheses, unary minus and every binary operator each add a level.
/// `depth` counts the levels already opened above the subtree being parsed,
/// and a returned height never takes `depth + height` past `max_depth`
struct Grammar {
    max_depth: usize,
}

impl Grammar {
    fn descend<'a>(&self, i: &'a str, depth: usize) -> Result<usize, ParseErr<'a>> {
        if depth >= self.max_depth {
            return Err(nom::Err::Failure(Error::new(i, ErrorKind::TooLarge)));
        }
        Ok(depth + 1)
    }

    /// Height of a node placed over children at most `height` levels deep
    fn climb<'a>(&self, i: &'a str, depth: usize, height: usize) -> Result<usize, ParseErr<'a>> {
        self.descend(i, depth + height)?;
        Ok(height + 1)
    }

    // Chains fold to the left, so each operator raises the whole chain by one
    fn fold<'a>(
        &self,
        i: &'a str,
        depth: usize,
        init: Node,
        rest: Vec<(Operator, Node)>,
    ) -> IResult<&'a str, Node> {
        let node = rest.into_iter().try_fold(
            init,
            |(l, lh), (op, (r, rh))| -> Result<Node, ParseErr<'a>> {
                let height = self.climb(i, depth, lh.max(rh))?;
                Ok((Expr::binary(op, l, r), height))
            },
        )?;
        Ok((i, node))
    }

    fn parse_sum<'a>(&self, i: &'a str, depth: usize) -> IResult<&'a str, Node> {
        let (i, init) = self.parse_product(i, depth)?;
        let (i, rest) = many0(pair(
            preceded(space0, parse_additive),
            cut(|i: &'a str| self.parse_product(i, depth)),
        ))(i)?;

        self.fold(i, depth, init, rest)
    }

    fn parse_product<'a>(&self, i: &'a str, depth: usize) -> IResult<&'a str, Node> {
        let (i, init) = self.parse_unary(i, depth)?;
        let (i, rest) = many0(pair(
            preceded(space0, parse_multiplicative),
            cut(|i: &'a str| self.parse_unary(i, depth)),
        ))(i)?;

        self.fold(i, depth, init, rest)
    }

    fn parse_unary<'a>(&self, i: &'a str, depth: usize) -> IResult<&'a str, Node> {
        let (i, minus) = opt(preceded(space0, char('-')))(i)?;
        if minus.is_none() {
            return self.parse_power(i, depth);
        }

        let depth = self.descend(i, depth)?;
        let (i, (operand, height)) = cut(|i: &'a str| self.parse_unary(i, depth))(i)?;
        Ok((i, (operand.negate(), height + 1)))
    }

    // `**` binds tighter than unary minus on its left but accepts one on its right,
    // so `-2**2` is -4 and `2**-1` is 0.5
    fn parse_power<'a>(&self, i: &'a str, depth: usize) -> IResult<&'a str, Node> {
        let (i, (base, base_height)) = self.parse_atom(i, depth)?;
        let (i, op) = opt(preceded(space0, tag("**")))(i)?;
        if op.is_none() {
            return Ok((i, (base, base_height)));
        }

        let inner = self.descend(i, depth)?;
        let (i, (exponent, exponent_height)) = cut(|i: &'a str| self.parse_unary(i, inner))(i)?;
        let height = self.climb(i, depth, base_height.max(exponent_height))?;
        Ok((i, (Expr::binary(Operator::Power, base, exponent), height)))
    }

    fn parse_atom<'a>(&self, i: &'a str, depth: usize) -> IResult<&'a str, Node> {
        let (i, _) = space0(i)?;
        let (i, open) = opt(char('('))(i)?;
        if open.is_none() {
            return map(parse_number, |v| (Expr::Literal(v), 0))(i);
        }

        let depth = self.descend(i, depth)?;
        let (i, (expr, height)) = cut(|i: &'a str| self.parse_sum(i, depth))(i)?;
        let (i, _) = cut(preceded(space0, char(')')))(i)?;
        Ok((i, (expr, height + 1)))
    }
}

pub fn parse(i: &str, limits: &Limits) -> Result<Expr, EvalError> {
    let grammar = Grammar {
        max_depth: limits.max_depth,
    };

    match grammar.parse_sum(i, 0) {
        Ok((remaining, (expr, _))) if remaining.trim().is_empty() => Ok(expr),
        Ok((remaining, _)) => Err(EvalError::UnsupportedSyntax(remaining.trim().into())),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => {
            Err(EvalError::TooComplex)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(EvalError::UnsupportedSyntax(e.input.into()))
        }
        Err(nom::Err::Incomplete(_)) => Err(EvalError::UnsupportedSyntax(Default::default())),
    }
}
