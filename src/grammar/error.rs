use std::error;
use std::fmt::{self, Display};

/// Errors raised while building a grammar from text. All of these are
/// detected eagerly at build time; a successfully built grammar never
/// fails during matching.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The grammar text itself is malformed.
    Syntax(String),
    /// A rule body refers to a name that is neither a declared rule nor a
    /// built-in terminal.
    UnknownReference { rule: String, name: String },
    /// Two rules share a name.
    DuplicateRule(String),
    /// A rule tries to redefine a built-in terminal name.
    ReservedName(String),
    /// The grammar text declares no rules at all.
    Empty,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(s) => write!(f, "failed to parse grammar: {}", s),
            Error::UnknownReference { rule, name } => {
                write!(f, "rule '{}' refers to undeclared rule '{}'", rule, name)
            }
            Error::DuplicateRule(name) => write!(f, "rule '{}' declared more than once", name),
            Error::ReservedName(name) => {
                write!(f, "'{}' is a built-in terminal and may not be redefined", name)
            }
            Error::Empty => write!(f, "grammar declares no rules"),
        }
    }
}

impl error::Error for Error {}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Error {
        Error::Syntax(format!("{:?}", err))
    }
}
