//! Row predicate expressions.
//!
//! Grammar:
//!
//! ```text
//! expr       := and_expr (("or" | "|") and_expr)*
//! and_expr   := unary (("and" | "&") unary)*
//! unary      := ("not" | "~") unary | primary
//! primary    := "(" expr ")" | comparison
//! comparison := column op literal
//!             | column "in" list
//!             | column "not" "in" list
//! op         := "==" | "!=" | "<=" | ">=" | "<" | ">"
//! literal    := "text" | 'text' | integer | float | true | false | bareword
//! list       := "[" literal ("," literal)* "]"
//! ```
//!
//! Comparing a list-valued column against a scalar tests its elements:
//! `vlanList == 10` holds when 10 is a member.

use crate::error::{NetlensError, NetlensResult};
use crate::table::{Record, Value};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, not, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use std::cmp::Ordering;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// Parsed predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        column: String,
        op: CmpOp,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parses an expression string.
    pub fn parse(input: &str) -> NetlensResult<Expr> {
        match all_consuming(ws(or_expr))(input) {
            Ok((_, expr)) => Ok(expr),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let message = if e.input.is_empty() {
                    "unexpected end of expression".to_string()
                } else {
                    format!("syntax error at '{}'", e.input)
                };
                Err(NetlensError::query_expr(input, message))
            }
            Err(nom::Err::Incomplete(_)) => {
                Err(NetlensError::query_expr(input, "incomplete expression"))
            }
        }
    }

    /// Column names referenced by this expression, in order of appearance.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Compare { column, .. } | Expr::In { column, .. } => out.push(column),
            Expr::Not(inner) => inner.collect_columns(out),
            Expr::And(a, b) | Expr::Or(a, b) => {
                a.collect_columns(out);
                b.collect_columns(out);
            }
        }
    }

    /// Evaluates the predicate against a row. Missing columns read as null.
    pub fn matches<R: Record + ?Sized>(&self, row: &R) -> bool {
        match self {
            Expr::Compare { column, op, value } => {
                compare(&row.field(column).unwrap_or(Value::Null), *op, value)
            }
            Expr::In {
                column,
                values,
                negated,
            } => {
                let field = row.field(column).unwrap_or(Value::Null);
                let found = values.iter().any(|v| compare(&field, CmpOp::Eq, v));
                found != *negated
            }
            Expr::Not(inner) => !inner.matches(row),
            Expr::And(a, b) => a.matches(row) && b.matches(row),
            Expr::Or(a, b) => a.matches(row) || b.matches(row),
        }
    }
}

fn compare(field: &Value, op: CmpOp, literal: &Value) -> bool {
    if let Value::List(items) = field {
        return match op {
            CmpOp::Ne => !items.iter().any(|i| compare(i, CmpOp::Eq, literal)),
            _ => items.iter().any(|i| compare(i, op, literal)),
        };
    }
    match field.partial_cmp_value(literal) {
        Some(ordering) => op.holds(ordering),
        None => op == CmpOp::Ne,
    }
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters allowed in an unquoted literal such as `swp1` or `10.0.0.1/31`.
fn is_bare_char(c: char) -> bool {
    is_ident_char(c) || "-./:".contains(c)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), not(satisfy(is_ident_char)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

fn cmp_op(input: &str) -> IResult<&str, CmpOp> {
    alt((
        value(CmpOp::Eq, tag("==")),
        value(CmpOp::Ne, tag("!=")),
        value(CmpOp::Le, tag("<=")),
        value(CmpOp::Ge, tag(">=")),
        value(CmpOp::Lt, tag("<")),
        value(CmpOp::Gt, tag(">")),
    ))(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = terminated(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        not(satisfy(is_bare_char)),
    )(input)?;
    let parsed = if text.contains('.') {
        text.parse::<f64>().ok().map(Value::Float)
    } else {
        text.parse::<i64>().ok().map(Value::Int)
    };
    match parsed {
        Some(v) => Ok((rest, v)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn quoted(input: &str) -> IResult<&str, Value> {
    map(
        alt((
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        )),
        |s: &str| Value::Str(s.to_string()),
    )(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        quoted,
        number,
        value(Value::Bool(true), keyword("true")),
        value(Value::Bool(false), keyword("false")),
        map(take_while1(is_bare_char), |s: &str| Value::Str(s.to_string())),
    ))(input)
}

fn list(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(
        ws(char('[')),
        separated_list0(ws(char(',')), ws(literal)),
        ws(char(']')),
    )(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, column) = ws(identifier)(input)?;
    alt((
        map(
            preceded(pair(keyword("not"), ws(keyword("in"))), list),
            move |values| Expr::In {
                column: column.to_string(),
                values,
                negated: true,
            },
        ),
        map(preceded(keyword("in"), list), move |values| Expr::In {
            column: column.to_string(),
            values,
            negated: false,
        }),
        map(pair(ws(cmp_op), ws(literal)), move |(op, value)| {
            Expr::Compare {
                column: column.to_string(),
                op,
                value,
            }
        }),
    ))(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((delimited(ws(char('(')), or_expr, ws(char(')'))), comparison))(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(alt((keyword("not"), tag("~")))), unary), |e| {
            Expr::Not(Box::new(e))
        }),
        primary,
    ))(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(ws(alt((keyword("and"), tag("&")))), unary))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |acc, e| Expr::And(Box::new(acc), Box::new(e)));
    Ok((input, expr))
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(alt((keyword("or"), tag("|")))), and_expr))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |acc, e| Expr::Or(Box::new(acc), Box::new(e)));
    Ok((input, expr))
}
