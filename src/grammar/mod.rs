//! Grammar data model and builder.
//!
//! A [`Grammar`] is built once from grammar-definition text (via
//! [`FromStr`]) and is immutable afterwards; it may be shared read-only
//! across any number of match calls. Building validates the grammar
//! eagerly: every reference must resolve, rule names must be unique, and
//! built-in terminal names may not be redefined.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

mod error;
mod parser;

pub use error::Error;

/// Built-in terminals recognized by the matcher without a rule lookup.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Builtin {
    /// One ASCII digit, `0` through `9`.
    Digit,
    /// One ASCII letter, either case.
    Letter,
    /// Zero-width end-of-input assertion.
    End,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "digit" => Some(Builtin::Digit),
            "letter" => Some(Builtin::Letter),
            "end" => Some(Builtin::End),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Digit => "digit",
            Builtin::Letter => "letter",
            Builtin::End => "end",
        }
    }
}

/// The body of a rule: a parsing expression.
///
/// Repetition bounds are `(min, max)` with `None` meaning unbounded; the
/// surface operators map to `*` = `(0, None)`, `+` = `(1, None)` and
/// `?` = `(0, Some(1))`.
#[derive(PartialEq, Eq, Debug)]
pub enum Expr {
    /// Exact, case-sensitive text.
    Literal(String),
    /// A built-in character class or assertion.
    Terminal(Builtin),
    /// All parts in order, failing atomically.
    Sequence(Vec<Expr>),
    /// Ordered alternatives; the first success commits.
    Choice(Vec<Expr>),
    /// Greedy repetition of the inner expression.
    Repeat(Box<Expr>, u32, Option<u32>),
    /// Negative lookahead; zero-width either way.
    Not(Box<Expr>),
    /// Deferral to another named rule.
    RuleRef(String),
}

impl Expr {
    /// True for expressions that render without surrounding parentheses.
    fn is_primary(&self) -> bool {
        matches!(self, Expr::Literal(_) | Expr::Terminal(_) | Expr::RuleRef(_))
    }
}

fn fmt_operand(f: &mut fmt::Formatter, e: &Expr) -> fmt::Result {
    if e.is_primary() {
        write!(f, "{}", e)
    } else {
        write!(f, "({})", e)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(s) => write!(f, "\"{}\"", s),
            Expr::Terminal(b) => write!(f, "{}", b.name()),
            Expr::RuleRef(name) => write!(f, "{}", name),
            Expr::Sequence(items) => {
                let mut sep = "";
                for item in items {
                    write!(f, "{}", sep)?;
                    match item {
                        Expr::Choice(_) | Expr::Sequence(_) => write!(f, "({})", item)?,
                        _ => write!(f, "{}", item)?,
                    }
                    sep = " ";
                }
                Ok(())
            }
            Expr::Choice(alts) => {
                let mut sep = "";
                for alt in alts {
                    write!(f, "{}", sep)?;
                    match alt {
                        Expr::Choice(_) => write!(f, "({})", alt)?,
                        _ => write!(f, "{}", alt)?,
                    }
                    sep = " | ";
                }
                Ok(())
            }
            Expr::Not(inner) => {
                write!(f, "~")?;
                fmt_operand(f, inner)
            }
            Expr::Repeat(inner, min, max) => match (*min, *max) {
                (0, None) => {
                    fmt_operand(f, inner)?;
                    write!(f, "*")
                }
                (1, None) => {
                    fmt_operand(f, inner)?;
                    write!(f, "+")
                }
                (0, Some(1)) => {
                    fmt_operand(f, inner)?;
                    write!(f, "?")
                }
                // Bounds the surface syntax can't spell directly are
                // spelled out as repeated operands.
                (min, max) => {
                    // A (0, 0) range matches only nothing and a range with
                    // max below min matches never; render each as its
                    // zero-width equivalent so the output stays parseable.
                    if let Some(max) = max {
                        if max < min {
                            return write!(f, "~\"\"");
                        }
                        if max == 0 {
                            return write!(f, "\"\"");
                        }
                    }
                    let mut sep = "";
                    for _ in 0..min {
                        write!(f, "{}", sep)?;
                        fmt_operand(f, inner)?;
                        sep = " ";
                    }
                    match max {
                        None => {
                            write!(f, "{}", sep)?;
                            fmt_operand(f, inner)?;
                            write!(f, "*")
                        }
                        Some(max) => {
                            for _ in min..max {
                                write!(f, "{}", sep)?;
                                fmt_operand(f, inner)?;
                                write!(f, "?")?;
                                sep = " ";
                            }
                            Ok(())
                        }
                    }
                }
            },
        }
    }
}

/// A named production rule. Alternative labels (`-- label`) are parsed and
/// discarded; they carry no matching semantics.
#[derive(PartialEq, Eq, Debug)]
pub struct Rule {
    pub name: String,
    pub expr: Expr,
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.expr)
    }
}

/// An immutable set of rules with a designated start rule (the first one
/// declared).
#[derive(PartialEq, Eq, Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
}

impl Grammar {
    /// Validate a set of rules and build the lookup table. Rules keep their
    /// declaration order; the first rule is the start rule.
    pub fn new(rules: Vec<Rule>) -> Result<Grammar, Error> {
        if rules.is_empty() {
            return Err(Error::Empty);
        }
        let mut index = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            if Builtin::from_name(&rule.name).is_some() {
                return Err(Error::ReservedName(rule.name.clone()));
            }
            if index.insert(rule.name.clone(), i).is_some() {
                return Err(Error::DuplicateRule(rule.name.clone()));
            }
        }
        for rule in &rules {
            check_refs(&rule.name, &rule.expr, &index)?;
        }
        Ok(Grammar { rules, index })
    }

    /// Look up a rule body by name.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.index.get(name).map(|&i| &self.rules[i].expr)
    }

    /// Name of the first declared rule.
    pub fn start(&self) -> &str {
        &self.rules[0].name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

fn check_refs(rule: &str, expr: &Expr, index: &HashMap<String, usize>) -> Result<(), Error> {
    match expr {
        Expr::Literal(_) | Expr::Terminal(_) => Ok(()),
        Expr::RuleRef(name) => {
            if index.contains_key(name) {
                Ok(())
            } else {
                Err(Error::UnknownReference {
                    rule: rule.to_owned(),
                    name: name.clone(),
                })
            }
        }
        Expr::Sequence(items) | Expr::Choice(items) => {
            for item in items {
                check_refs(rule, item, index)?;
            }
            Ok(())
        }
        Expr::Repeat(inner, _, _) | Expr::Not(inner) => check_refs(rule, inner, index),
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, rules) = parser::grammar(s)?;
        Grammar::new(rules)
    }
}
