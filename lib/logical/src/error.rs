use rdf_algebra_model::Variable;
use thiserror::Error;

/// An error while reading the SSE notation of an algebra expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (at byte {position})")]
pub struct SseParseError {
    message: String,
    position: usize,
}

impl SseParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The byte offset in the input at which the error was detected.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A structural error in an operator tree. Detected before evaluation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error(
        "The operands of {operator} share non-distinguished variables: {}",
        format_variables(.variables)
    )]
    SharedNonDistinguishedVariables {
        operator: &'static str,
        variables: Vec<Variable>,
    },
    #[error("{operator} expects at least one operand")]
    NoOperands { operator: &'static str },
    #[error("The table row binds the undeclared variable {0}")]
    UndeclaredTableVariable(Variable),
    #[error("The variable {0} is projected more than once")]
    DuplicateProjection(Variable),
    #[error("Unsupported construct: {0}")]
    Unsupported(String),
}

fn format_variables(variables: &[Variable]) -> String {
    variables
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
