//! Recursive-descent evaluation of a grammar against a candidate string.
//!
//! Evaluation threads a byte-offset cursor through the expression tree.
//! Each construct reports success as an advanced cursor and failure as
//! `None`; failures propagate by return value only, so a choice can retry
//! its next alternative from its saved entry cursor. A match call holds no
//! state beyond that cursor and the native call stack.

use anyhow::{anyhow, Result};

use crate::grammar::{Builtin, Expr, Grammar};

/// Default bound on rule-recursion depth. Generous for any reasonably
/// sized grammar; grammars that recurse without consuming input run into
/// it and fail closed instead of hanging.
pub const DEFAULT_DEPTH_LIMIT: usize = 1024;

/// Matches candidate strings against one immutable [`Grammar`]. Cheap to
/// construct; holds only a borrow of the grammar.
pub struct Matcher<'g> {
    grammar: &'g Grammar,
    depth_limit: usize,
}

impl<'g> Matcher<'g> {
    pub fn new(grammar: &'g Grammar) -> Matcher<'g> {
        Matcher {
            grammar,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    /// Like [`Matcher::new`] with an explicit recursion budget. Exceeding
    /// the budget makes the attempt evaluate to no-match, never a panic.
    pub fn with_depth_limit(grammar: &'g Grammar, depth_limit: usize) -> Matcher<'g> {
        Matcher {
            grammar,
            depth_limit,
        }
    }

    /// Whether `start` consumes `input` in full, from the first byte to
    /// exactly the last. Errors only if `start` is not a declared rule;
    /// every matching outcome, however deep the failure, is the boolean.
    pub fn matches(&self, start: &str, input: &str) -> Result<bool> {
        let expr = self
            .grammar
            .get(start)
            .ok_or_else(|| anyhow!("unknown start rule: {}", start))?;
        Ok(match self.eval(expr, input, 0, 0) {
            Some(end) => end == input.len(),
            None => false,
        })
    }

    /// Evaluate `expr` at byte offset `at`, returning the cursor after the
    /// consumed text. `depth` counts rule descents toward the budget.
    fn eval(&self, expr: &Expr, input: &str, at: usize, depth: usize) -> Option<usize> {
        match expr {
            Expr::Literal(s) => {
                let end = at + s.len();
                if input.get(at..end) == Some(s.as_str()) {
                    Some(end)
                } else {
                    None
                }
            }
            Expr::Terminal(Builtin::Digit) => eat_char(input, at, |c| c.is_ascii_digit()),
            Expr::Terminal(Builtin::Letter) => eat_char(input, at, |c| c.is_ascii_alphabetic()),
            Expr::Terminal(Builtin::End) => {
                if at == input.len() {
                    Some(at)
                } else {
                    None
                }
            }
            Expr::Sequence(items) => {
                let mut cur = at;
                for item in items {
                    cur = self.eval(item, input, cur, depth)?;
                }
                Some(cur)
            }
            // First success commits; later alternatives are never tried.
            Expr::Choice(alts) => alts.iter().find_map(|alt| self.eval(alt, input, at, depth)),
            Expr::Repeat(inner, min, max) => {
                let mut cur = at;
                let mut count: u32 = 0;
                while max.map_or(true, |m| count < m) {
                    match self.eval(inner, input, cur, depth) {
                        Some(next) => {
                            count += 1;
                            // A zero-width success would repeat forever;
                            // count it once and stop.
                            if next == cur {
                                break;
                            }
                            cur = next;
                        }
                        None => break,
                    }
                }
                if count >= *min {
                    Some(cur)
                } else {
                    None
                }
            }
            Expr::Not(inner) => match self.eval(inner, input, at, depth) {
                Some(_) => None,
                None => Some(at),
            },
            Expr::RuleRef(name) => {
                if depth >= self.depth_limit {
                    return None;
                }
                self.eval(self.grammar.get(name)?, input, at, depth + 1)
            }
        }
    }
}

/// Consume one character at `at` satisfying `pred`.
fn eat_char(input: &str, at: usize, pred: impl Fn(char) -> bool) -> Option<usize> {
    let c = input[at..].chars().next()?;
    if pred(c) {
        Some(at + c.len_utf8())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> Grammar {
        text.parse().unwrap()
    }

    fn run(grammar: &Grammar, start: &str, input: &str) -> bool {
        Matcher::new(grammar).matches(start, input).unwrap()
    }

    #[test]
    fn committed_choice_never_retries() {
        let g = build("r = \"a\" | \"ab\"");
        assert!(run(&g, "r", "a"));
        // "a" succeeds and commits, leaving "b" unconsumed against the
        // full-string anchor.
        assert!(!run(&g, "r", "ab"));
    }

    #[test]
    fn choice_tries_alternatives_in_order() {
        let g = build("r = \"ab\" | \"a\"");
        assert!(run(&g, "r", "ab"));
        assert!(run(&g, "r", "a"));
    }

    #[test]
    fn full_string_anchoring() {
        let g = build("r = letter digit");
        assert!(run(&g, "r", "a1"));
        assert!(!run(&g, "r", "a1 "));
        assert!(!run(&g, "r", " a1"));
        assert!(!run(&g, "r", "a12"));
        assert!(!run(&g, "r", "a"));
    }

    #[test]
    fn letter_accepts_both_cases_only_ascii() {
        let g = build("r = letter");
        assert!(run(&g, "r", "a"));
        assert!(run(&g, "r", "Z"));
        assert!(!run(&g, "r", "1"));
        assert!(!run(&g, "r", "π"));
    }

    #[test]
    fn literal_is_case_sensitive() {
        let g = build("r = \"Ab\"");
        assert!(run(&g, "r", "Ab"));
        assert!(!run(&g, "r", "ab"));
        assert!(!run(&g, "r", "AB"));
    }

    #[test]
    fn end_is_zero_width() {
        let g = build("r = \"a\" end");
        assert!(run(&g, "r", "a"));
        assert!(!run(&g, "r", "ab"));
    }

    #[test]
    fn negative_lookahead_consumes_nothing() {
        let g = build("r = ~\"a\" letter");
        assert!(run(&g, "r", "b"));
        assert!(!run(&g, "r", "a"));
    }

    #[test]
    fn sequence_fails_atomically() {
        // If the sequence leaked partial consumption, the second
        // alternative would start mid-string and fail.
        let g = build("r = \"ab\" \"c\" | \"abd\"");
        assert!(run(&g, "r", "abd"));
    }

    #[test]
    fn repetition_bounds() {
        let g = build("r = digit digit? digit?");
        assert!(run(&g, "r", "1"));
        assert!(run(&g, "r", "12"));
        assert!(run(&g, "r", "123"));
        assert!(!run(&g, "r", ""));
        assert!(!run(&g, "r", "1234"));
    }

    #[test]
    fn zero_width_repetition_terminates() {
        let g = build("r = (\"x\"?)* \"y\"");
        assert!(run(&g, "r", "y"));
        assert!(run(&g, "r", "xy"));
        assert!(!run(&g, "r", "z"));
    }

    #[test]
    fn repeated_negation_is_zero_width() {
        // ~"o"* is (~"o")*: a lookahead iterated zero-width, so only the
        // empty string is consumed in full.
        let g = build("r = ~\"o\"*");
        assert!(run(&g, "r", ""));
        assert!(!run(&g, "r", "o"));
        assert!(!run(&g, "r", "x"));
    }

    #[test]
    fn unknown_start_rule_is_an_error() {
        let g = build("r = \"a\"");
        assert!(Matcher::new(&g).matches("nope", "a").is_err());
    }

    #[test]
    fn depth_budget_fails_closed() {
        // Consumption-free left recursion; without the budget this would
        // never return.
        let g = build("r = r \"a\"");
        assert!(!Matcher::with_depth_limit(&g, 64)
            .matches("r", "aaa")
            .unwrap());
    }

    #[test]
    fn deterministic_and_grammar_untouched() {
        let g = build("r = \"a\"+");
        let before = g.to_string();
        assert_eq!(run(&g, "r", "aaa"), run(&g, "r", "aaa"));
        assert_eq!(run(&g, "r", "b"), run(&g, "r", "b"));
        assert_eq!(before, g.to_string());
    }
}
