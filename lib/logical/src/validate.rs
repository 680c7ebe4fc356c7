use crate::error::ValidationError;
use crate::{Algebra, Expression, Query, Update, UpdateOperation};
use rdf_algebra_model::Variable;

/// Checks the structural rules of an operator tree.
///
/// - The two operands of join, leftjoin, minus and union must not share a non-distinguished
///   variable (a blank node label or a `??` variable).
/// - Table rows only bind declared variables.
/// - A projection lists each variable at most once.
///
/// Patterns nested in `EXISTS` expressions are checked as well.
pub fn validate(algebra: &Algebra) -> Result<(), ValidationError> {
    match algebra {
        Algebra::Join { left, right }
        | Algebra::LeftJoin { left, right, .. }
        | Algebra::Minus { left, right }
        | Algebra::Union { left, right } => {
            let left_variables = left.non_distinguished_variables();
            let shared = right
                .non_distinguished_variables()
                .into_iter()
                .filter(|variable| left_variables.contains(variable))
                .collect::<Vec<_>>();
            if !shared.is_empty() {
                return Err(ValidationError::SharedNonDistinguishedVariables {
                    operator: algebra.name(),
                    variables: shared,
                });
            }
        }
        Algebra::Table { variables, rows } => {
            for row in rows {
                if let Some(variable) = row.variables().find(|v| !variables.contains(v)) {
                    return Err(ValidationError::UndeclaredTableVariable(variable.clone()));
                }
            }
        }
        Algebra::Project { variables, .. } => {
            let mut seen = Vec::<&Variable>::with_capacity(variables.len());
            for variable in variables {
                if seen.contains(&variable) {
                    return Err(ValidationError::DuplicateProjection(variable.clone()));
                }
                seen.push(variable);
            }
        }
        _ => {}
    }

    for expression in algebra.expressions() {
        validate_expression(expression)?;
    }
    algebra.children().into_iter().try_for_each(validate)
}

fn validate_expression(expression: &Expression) -> Result<(), ValidationError> {
    if let Expression::Exists(pattern) = expression {
        validate(pattern)?;
    }
    expression
        .children()
        .into_iter()
        .try_for_each(validate_expression)
}

/// Validates the pattern of a query.
pub fn validate_query(query: &Query) -> Result<(), ValidationError> {
    validate(query.pattern())
}

/// Validates the patterns of all `DELETE/INSERT` operations of an update.
pub fn validate_update(update: &Update) -> Result<(), ValidationError> {
    fn validate_operation(operation: &UpdateOperation) -> Result<(), ValidationError> {
        match operation {
            UpdateOperation::DeleteInsert { pattern, .. } => validate(pattern),
            UpdateOperation::With { operation, .. } | UpdateOperation::Using { operation, .. } => {
                validate_operation(operation)
            }
            _ => Ok(()),
        }
    }
    update.operations.iter().try_for_each(validate_operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse_algebra;

    fn check(input: &str) -> Result<(), ValidationError> {
        validate(&parse_algebra(input).unwrap())
    }

    #[test]
    fn shared_blank_nodes_across_a_join_are_rejected() {
        let error = check(
            "(join (bgp (triple _:b <http://e/p> ?x)) (bgp (triple _:b <http://e/q> ?y)))",
        )
        .unwrap_err();
        assert_eq!(
            error,
            ValidationError::SharedNonDistinguishedVariables {
                operator: "join",
                variables: vec![Variable::non_distinguished("_:b")],
            }
        );
    }

    #[test]
    fn shared_non_distinguished_variables_are_rejected_in_union_and_minus() {
        assert!(
            check("(union (bgp (triple ??v <http://e/p> 1)) (bgp (triple ??v <http://e/p> 2)))")
                .is_err()
        );
        assert!(check(
            "(minus (bgp (triple ?s <http://e/p> ??v)) (bgp (triple ?s <http://e/q> ??v)))"
        )
        .is_err());
    }

    #[test]
    fn distinct_blank_nodes_are_accepted() {
        assert!(check(
            "(leftjoin (bgp (triple _:a <http://e/p> ?x)) (bgp (triple _:b <http://e/q> ?x)))"
        )
        .is_ok());
    }

    #[test]
    fn nested_exists_patterns_are_checked() {
        assert!(check(
            "(filter
               (exists (join (bgp (triple _:b <http://e/p> ?x)) (bgp (triple _:b <http://e/q> ?x))))
               (table unit))"
        )
        .is_err());
    }

    #[test]
    fn duplicate_projections_are_rejected() {
        assert_eq!(
            check("(project (?x ?x) (table unit))"),
            Err(ValidationError::DuplicateProjection(Variable::new("x")))
        );
    }

    #[test]
    fn undeclared_table_variables_are_rejected() {
        assert_eq!(
            check("(table (vars ?x) (row (?y 1)))"),
            Err(ValidationError::UndeclaredTableVariable(Variable::new("y")))
        );
    }
}
