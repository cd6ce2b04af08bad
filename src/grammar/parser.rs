//! Parser for the grammar-definition text format.
//!
//! The surface syntax, with whitespace (including newlines) between any
//! two tokens:
//!
//! ```text
//! Grammar := Rule+
//! Rule    := Identifier "=" Alt ("--" Label)? ("|" Alt ("--" Label)?)*
//! Alt     := Term+
//! Term    := "~"? Primary ("*" | "+" | "?")?
//! Primary := StringLiteral | Identifier | "(" Alt ("|" Alt)* ")"
//! ```
//!
//! A rule ends where the next `Identifier "="` begins, so an identifier is
//! only a reference when it is not followed by `=`. The identifiers
//! `letter`, `digit` and `end` resolve to built-in terminals.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{all_consuming, not, opt, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::grammar::{Builtin, Expr, Rule};

pub fn grammar(input: &str) -> IResult<&str, Vec<Rule>> {
    all_consuming(terminated(many1(rule), multispace0))(input)
}

fn rule(input: &str) -> IResult<&str, Rule> {
    let (rem, name) = preceded(multispace0, identifier)(input)?;
    let (rem, _) = preceded(multispace0, char('='))(rem)?;
    let (rem, expr) = alternation(rem)?;
    Ok((
        rem,
        Rule {
            name: name.to_owned(),
            expr,
        },
    ))
}

/// Rule-level alternation, where each alternative may carry a `-- label`
/// suffix. Labels are documentation only and are dropped here.
fn alternation(input: &str) -> IResult<&str, Expr> {
    let (rem, mut alts) = separated_list1(
        preceded(multispace0, char('|')),
        terminated(alternative, opt(label)),
    )(input)?;
    let expr = match alts.len() {
        1 => alts.remove(0),
        _ => Expr::Choice(alts),
    };
    Ok((rem, expr))
}

fn label(input: &str) -> IResult<&str, &str> {
    preceded(
        preceded(multispace0, tag("--")),
        preceded(multispace0, identifier),
    )(input)
}

fn alternative(input: &str) -> IResult<&str, Expr> {
    let (rem, mut terms) = many1(term)(input)?;
    let expr = match terms.len() {
        1 => terms.remove(0),
        _ => Expr::Sequence(terms),
    };
    Ok((rem, expr))
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (rem, _) = multispace0(input)?;
    let (rem, negated) = opt(char('~'))(rem)?;
    let (rem, prim) = preceded(multispace0, primary)(rem)?;
    // Negation binds tighter than repetition: ~x* iterates the
    // zero-width lookahead.
    let prim = if negated.is_some() {
        Expr::Not(Box::new(prim))
    } else {
        prim
    };
    let (rem, rep) = opt(preceded(multispace0, one_of("*+?")))(rem)?;
    let expr = match rep {
        Some('*') => Expr::Repeat(Box::new(prim), 0, None),
        Some('+') => Expr::Repeat(Box::new(prim), 1, None),
        Some('?') => Expr::Repeat(Box::new(prim), 0, Some(1)),
        _ => prim,
    };
    Ok((rem, expr))
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((literal, group, reference))(input)
}

fn literal(input: &str) -> IResult<&str, Expr> {
    let (rem, text) = preceded(char('"'), terminated(take_until("\""), char('"')))(input)?;
    Ok((rem, Expr::Literal(text.to_owned())))
}

/// Parenthesized alternation. Labels are not permitted inside groups.
fn group(input: &str) -> IResult<&str, Expr> {
    let (rem, _) = char('(')(input)?;
    let (rem, mut alts) = separated_list1(preceded(multispace0, char('|')), alternative)(rem)?;
    let (rem, _) = preceded(multispace0, char(')'))(rem)?;
    let expr = match alts.len() {
        1 => alts.remove(0),
        _ => Expr::Choice(alts),
    };
    Ok((rem, expr))
}

/// A bare identifier: a built-in terminal name or a rule reference. An
/// identifier followed by `=` is the next rule's name, not a reference.
fn reference(input: &str) -> IResult<&str, Expr> {
    let (rem, name) = terminated(identifier, not(preceded(multispace0, char('='))))(input)?;
    let expr = match Builtin::from_name(name) {
        Some(b) => Expr::Terminal(b),
        None => Expr::RuleRef(name.to_owned()),
    };
    Ok((rem, expr))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}
