use super::Evaluator;
use crate::context::ExecutionContext;
use crate::error::QueryEvaluationError;
use rdf_algebra_common::Queryable;
use rdf_algebra_functions::comparison::EqualSparqlOp;
use rdf_algebra_functions::dispatch_binary;
use rdf_algebra_logical::{scalar, Expression};
use rdf_algebra_model::{EvalError, EvalResult, Literal, Solution, Term};

/// Evaluates expressions against single solutions.
///
/// The inner [EvalResult] carries the SPARQL errors of the expression (type errors, unbound
/// variables, ...) that the calling operator turns into `false` or an unbound value. The outer
/// [Result] carries errors that abort the query, e.g., a storage error inside `EXISTS`.
pub trait ExpressionEvaluator {
    fn evaluate(
        &self,
        expression: &Expression,
        solution: &Solution,
    ) -> Result<EvalResult<Term>, QueryEvaluationError>;

    /// Evaluates `expression` and computes the effective boolean value of the result.
    fn effective_boolean_value(
        &self,
        expression: &Expression,
        solution: &Solution,
    ) -> Result<EvalResult<bool>, QueryEvaluationError> {
        Ok(self
            .evaluate(expression, solution)?
            .and_then(|term| scalar::effective_boolean_value(&term)))
    }
}

/// The [ExpressionEvaluator] of an operator. `EXISTS` patterns are evaluated by the evaluator in
/// the context of the operator.
pub(super) struct OperatorExpressionEvaluator<'e, 'a, Q: ?Sized> {
    evaluator: &'e Evaluator<'a, Q>,
    context: &'e ExecutionContext,
}

impl<'a, Q: Queryable + ?Sized> Evaluator<'a, Q> {
    pub(super) fn expression_evaluator<'e>(
        &'e self,
        context: &'e ExecutionContext,
    ) -> OperatorExpressionEvaluator<'e, 'a, Q> {
        OperatorExpressionEvaluator {
            evaluator: self,
            context,
        }
    }
}

impl<Q: Queryable + ?Sized> ExpressionEvaluator for OperatorExpressionEvaluator<'_, '_, Q> {
    fn evaluate(
        &self,
        expression: &Expression,
        solution: &Solution,
    ) -> Result<EvalResult<Term>, QueryEvaluationError> {
        Ok(match expression {
            Expression::Variable(variable) => match solution.get(variable) {
                Some(term) => Ok(term.clone()),
                None => EvalError::expected(),
            },
            Expression::Term(term) => Ok(term.clone()),
            Expression::Bound(variable) => Ok(boolean(solution.contains(variable))),
            Expression::Or(lhs, rhs) => {
                let lhs = self.effective_boolean_value(lhs, solution)?;
                if lhs == Ok(true) {
                    return Ok(Ok(boolean(true)));
                }
                let rhs = self.effective_boolean_value(rhs, solution)?;
                scalar::or(lhs, rhs).map(boolean)
            }
            Expression::And(lhs, rhs) => {
                let lhs = self.effective_boolean_value(lhs, solution)?;
                if lhs == Ok(false) {
                    return Ok(Ok(boolean(false)));
                }
                let rhs = self.effective_boolean_value(rhs, solution)?;
                scalar::and(lhs, rhs).map(boolean)
            }
            Expression::If(condition, if_true, if_false) => {
                match self.effective_boolean_value(condition, solution)? {
                    Ok(true) => self.evaluate(if_true, solution)?,
                    Ok(false) => self.evaluate(if_false, solution)?,
                    Err(error) => Err(error),
                }
            }
            Expression::Coalesce(args) => {
                for arg in args {
                    if let Ok(term) = self.evaluate(arg, solution)? {
                        return Ok(Ok(term));
                    }
                }
                EvalError::expected()
            }
            Expression::In(needle, haystack) => self.evaluate_in(needle, haystack, solution)?,
            Expression::Exists(pattern) => {
                let context = self.context.with_bindings(solution.clone());
                let solutions = self.evaluator.execute(pattern, &context)?;
                Ok(boolean(!solutions.is_empty()))
            }
            strict => {
                let children = strict.children();
                let mut args = Vec::with_capacity(children.len());
                for child in children {
                    match self.evaluate(child, solution)? {
                        Ok(term) => args.push(term),
                        Err(error) => return Ok(Err(error)),
                    }
                }
                match scalar::apply_strict(strict, &args, self.evaluator.functions()) {
                    Some(result) => result,
                    None => {
                        return QueryEvaluationError::internal(format!(
                            "No evaluation rule for {strict}"
                        ))
                    }
                }
            }
        })
    }
}

impl<Q: Queryable + ?Sized> OperatorExpressionEvaluator<'_, '_, Q> {
    /// `needle IN (a, b, ...)` is `needle = a || needle = b || ...`: `true` wins over errors.
    fn evaluate_in(
        &self,
        needle: &Expression,
        haystack: &[Expression],
        solution: &Solution,
    ) -> Result<EvalResult<Term>, QueryEvaluationError> {
        let needle = match self.evaluate(needle, solution)? {
            Ok(needle) => needle,
            Err(error) => return Ok(Err(error)),
        };
        let mut error = None;
        for candidate in haystack {
            let equal = self
                .evaluate(candidate, solution)?
                .and_then(|candidate| dispatch_binary(&EqualSparqlOp, &[needle.clone(), candidate]))
                .and_then(|equal| scalar::effective_boolean_value(&equal));
            match equal {
                Ok(true) => return Ok(Ok(boolean(true))),
                Ok(false) => {}
                Err(e) => error = Some(e),
            }
        }
        Ok(match error {
            Some(error) => Err(error),
            None => Ok(boolean(false)),
        })
    }
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DatasetView;
    use rdf_algebra_functions::FunctionContext;
    use rdf_algebra_logical::parse_expression;
    use rdf_algebra_model::Variable;
    use rdf_algebra_storage::MemoryStore;

    fn evaluate(expression: &str, solution: &Solution) -> EvalResult<Term> {
        let store = MemoryStore::new();
        let evaluator = Evaluator::new(&store, DatasetView::default(), FunctionContext::default());
        let context = evaluator.root_context(16, Solution::new());
        evaluator
            .expression_evaluator(&context)
            .evaluate(&parse_expression(expression).unwrap(), solution)
            .unwrap()
    }

    fn x_is_one() -> Solution {
        [(Variable::new("x"), Term::from(Literal::from(1)))]
            .into_iter()
            .collect()
    }

    #[test]
    fn connectives_absorb_errors() {
        let solution = x_is_one();
        assert_eq!(evaluate("(|| (> ?unbound 1) (= ?x 1))", &solution), Ok(boolean(true)));
        assert_eq!(evaluate("(&& (> ?unbound 1) (= ?x 2))", &solution), Ok(boolean(false)));
        assert!(evaluate("(&& (> ?unbound 1) (= ?x 1))", &solution).is_err());
    }

    #[test]
    fn bound_if_and_coalesce() {
        let solution = x_is_one();
        assert_eq!(evaluate("(bound ?x)", &solution), Ok(boolean(true)));
        assert_eq!(evaluate("(bound ?y)", &solution), Ok(boolean(false)));
        assert_eq!(
            evaluate("(if (bound ?y) 1 ?x)", &solution),
            Ok(Literal::from(1).into())
        );
        assert_eq!(
            evaluate("(coalesce ?y (/ 1 0) \"z\")", &solution),
            Ok(Literal::new_simple_literal("z").into())
        );
        assert!(evaluate("(coalesce ?y)", &solution).is_err());
    }

    #[test]
    fn in_lists() {
        let solution = x_is_one();
        assert_eq!(evaluate("(in ?x 2 1)", &solution), Ok(boolean(true)));
        assert_eq!(evaluate("(in ?x 2 3)", &solution), Ok(boolean(false)));
        assert!(evaluate("(in ?x 2 ?unbound)", &solution).is_err());
        assert_eq!(evaluate("(notin ?x 2 3)", &solution), Ok(boolean(true)));
    }

    #[test]
    fn lang_matches() {
        let solution = Solution::new();
        assert_eq!(evaluate(r#"(langMatches "en-GB" "en")"#, &solution), Ok(boolean(true)));
        assert_eq!(evaluate(r#"(langMatches "fr" "en")"#, &solution), Ok(boolean(false)));
        assert_eq!(evaluate(r#"(langMatches "" "*")"#, &solution), Ok(boolean(false)));
    }

    #[test]
    fn strict_errors_propagate() {
        let solution = x_is_one();
        assert!(evaluate("(+ ?x ?unbound)", &solution).is_err());
        assert!(evaluate("(strlen ?x)", &solution).is_err());
        assert_eq!(
            evaluate("(strlen (str ?x))", &solution),
            Ok(Literal::from(1).into())
        );
    }
}
