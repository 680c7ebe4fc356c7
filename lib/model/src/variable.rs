use std::cell::Cell;
use std::fmt::{Display, Formatter};

/// A variable of the algebra.
///
/// Distinguished variables are the ones written by the user (`?x`). Non-distinguished variables
/// (`??x`) are introduced internally, for example for blank nodes in patterns or for the
/// intermediate nodes of a property path sequence. They never appear in the output of the
/// operator that introduced them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
    distinguished: bool,
}

impl Variable {
    /// Creates a new distinguished variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distinguished: true,
        }
    }

    /// Creates a new non-distinguished variable.
    pub fn non_distinguished(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distinguished: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_distinguished(&self) -> bool {
        self.distinguished
    }

    /// Converts the variable into an oxrdf variable. Used when handing results to serializers.
    pub fn to_oxrdf(&self) -> oxrdf::Variable {
        oxrdf::Variable::new_unchecked(self.name.clone())
    }
}

impl From<oxrdf::Variable> for Variable {
    fn from(value: oxrdf::Variable) -> Self {
        Self::new(value.into_string())
    }
}

impl From<&oxrdf::Variable> for Variable {
    fn from(value: &oxrdf::Variable) -> Self {
        Self::new(value.as_str())
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.distinguished {
            write!(f, "?{}", self.name)
        } else {
            write!(f, "??{}", self.name)
        }
    }
}

/// Hands out fresh non-distinguished variables.
///
/// Every generator is scoped to one execution. The names are derived from a generation counter
/// and a prefix, so two generators with different prefixes never collide. The names start with
/// `#`, which the SSE reader and SPARQL never accept in a variable name.
#[derive(Debug)]
pub struct VariableGenerator {
    prefix: &'static str,
    next: Cell<u64>,
}

impl VariableGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: Cell::new(0),
        }
    }

    /// Returns a variable that has not been handed out by this generator before.
    pub fn fresh(&self) -> Variable {
        let id = self.next.get();
        self.next.set(id + 1);
        Variable::non_distinguished(format!("#{}{id}", self.prefix))
    }
}

impl Default for VariableGenerator {
    fn default() -> Self {
        Self::new("_")
    }
}
