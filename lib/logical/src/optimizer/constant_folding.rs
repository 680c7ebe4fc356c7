use crate::optimizer::OptimizerRule;
use crate::scalar::{and, apply_strict, effective_boolean_value, is_volatile, or};
use crate::transform::Transformed;
use crate::{Algebra, Expression};
use rdf_algebra_functions::FunctionContext;
use rdf_algebra_model::{Literal, Term};

/// Evaluates variable-free subexpressions of filters and extensions.
///
/// A filter whose condition folds to `true` is removed, one that folds to `false` is replaced by
/// the empty table. Volatile functions (e.g., `RAND`) and subexpressions that raise an error are
/// left untouched.
#[derive(Debug)]
pub struct ConstantFoldingRule {
    context: FunctionContext,
}

impl ConstantFoldingRule {
    pub fn new() -> Self {
        Self {
            context: FunctionContext::with_now(None, None),
        }
    }
}

impl Default for ConstantFoldingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizerRule for ConstantFoldingRule {
    fn name(&self) -> &str {
        "constant-folding"
    }

    fn rewrite(&self, algebra: Algebra) -> Transformed<Algebra> {
        algebra.transform_up(&mut |algebra| match algebra {
            Algebra::Filter { expression, inner } => {
                let folded = self.fold(expression);
                match folded.data.as_term().map(effective_boolean_value) {
                    Some(Ok(true)) => Transformed::yes(*inner),
                    Some(Ok(false)) => Transformed::yes(Algebra::empty()),
                    _ => folded.map_data(|expression| Algebra::Filter { expression, inner }),
                }
            }
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => self.fold(expression).map_data(|expression| Algebra::Extend {
                inner,
                variable,
                expression,
            }),
            other => Transformed::no(other),
        })
    }
}

impl ConstantFoldingRule {
    fn fold(&self, expression: Expression) -> Transformed<Expression> {
        let expression = self.fold_children(expression);
        if is_volatile(&expression.data) {
            return expression;
        }
        match self.evaluate_constant(&expression.data) {
            Some(term) => Transformed::yes(Expression::Term(term)),
            None => expression,
        }
    }

    fn fold_children(&self, expression: Expression) -> Transformed<Expression> {
        let mut transformed = false;
        let mut fold = |child: Box<Expression>| {
            let result = self.fold(*child);
            transformed |= result.transformed;
            Box::new(result.data)
        };
        let expression = match expression {
            Expression::Or(lhs, rhs) => Expression::Or(fold(lhs), fold(rhs)),
            Expression::And(lhs, rhs) => Expression::And(fold(lhs), fold(rhs)),
            Expression::Not(inner) => Expression::Not(fold(inner)),
            Expression::Equal(lhs, rhs) => Expression::Equal(fold(lhs), fold(rhs)),
            Expression::NotEqual(lhs, rhs) => Expression::NotEqual(fold(lhs), fold(rhs)),
            Expression::SameTerm(lhs, rhs) => Expression::SameTerm(fold(lhs), fold(rhs)),
            Expression::Greater(lhs, rhs) => Expression::Greater(fold(lhs), fold(rhs)),
            Expression::GreaterOrEqual(lhs, rhs) => {
                Expression::GreaterOrEqual(fold(lhs), fold(rhs))
            }
            Expression::Less(lhs, rhs) => Expression::Less(fold(lhs), fold(rhs)),
            Expression::LessOrEqual(lhs, rhs) => Expression::LessOrEqual(fold(lhs), fold(rhs)),
            Expression::Add(lhs, rhs) => Expression::Add(fold(lhs), fold(rhs)),
            Expression::Subtract(lhs, rhs) => Expression::Subtract(fold(lhs), fold(rhs)),
            Expression::Multiply(lhs, rhs) => Expression::Multiply(fold(lhs), fold(rhs)),
            Expression::Divide(lhs, rhs) => Expression::Divide(fold(lhs), fold(rhs)),
            Expression::UnaryPlus(inner) => Expression::UnaryPlus(fold(inner)),
            Expression::UnaryMinus(inner) => Expression::UnaryMinus(fold(inner)),
            Expression::If(test, if_true, if_false) => {
                Expression::If(fold(test), fold(if_true), fold(if_false))
            }
            Expression::In(lhs, list) => Expression::In(
                fold(lhs),
                list.into_iter().map(|item| *fold(Box::new(item))).collect(),
            ),
            Expression::Coalesce(args) => {
                Expression::Coalesce(args.into_iter().map(|arg| *fold(Box::new(arg))).collect())
            }
            Expression::FunctionCall(name, args) => Expression::FunctionCall(
                name,
                args.into_iter().map(|arg| *fold(Box::new(arg))).collect(),
            ),
            leaf @ (Expression::Variable(_)
            | Expression::Term(_)
            | Expression::Bound(_)
            | Expression::Exists(_)) => leaf,
        };
        Transformed::new(expression, transformed)
    }

    /// Computes the value of an expression whose children are constants.
    fn evaluate_constant(&self, expression: &Expression) -> Option<Term> {
        let children = expression.children();
        let args = children
            .iter()
            .map(|child| child.as_term().cloned())
            .collect::<Option<Vec<_>>>()?;
        let value = match expression {
            Expression::Or(..) | Expression::And(..) => {
                let [lhs, rhs] = args.as_slice() else {
                    return None;
                };
                let combine = if matches!(expression, Expression::Or(..)) {
                    or
                } else {
                    and
                };
                combine(effective_boolean_value(lhs), effective_boolean_value(rhs))
                    .map(|value| Literal::from(value).into())
            }
            Expression::If(..) => {
                let [test, if_true, if_false] = args.as_slice() else {
                    return None;
                };
                effective_boolean_value(test)
                    .map(|test| if test { if_true.clone() } else { if_false.clone() })
            }
            Expression::Coalesce(_) => return args.into_iter().next(),
            _ => apply_strict(expression, &args, &self.context)?,
        };
        value.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse_algebra;
    use insta::assert_snapshot;

    fn rewrite(input: &str) -> Transformed<Algebra> {
        ConstantFoldingRule::new().rewrite(parse_algebra(input).unwrap())
    }

    #[test]
    fn true_filters_are_removed() {
        let result = rewrite("(filter (&& (< 1 2) (= \"a\" \"a\")) (bgp (triple ?s ?p ?o)))");
        assert!(result.transformed);
        assert_snapshot!(result.data, @"(bgp (triple ?s ?p ?o))");
    }

    #[test]
    fn false_filters_become_empty() {
        let result = rewrite("(filter (> (strlen \"ab\") 5) (bgp (triple ?s ?p ?o)))");
        assert_snapshot!(result.data, @"(table empty)");
    }

    #[test]
    fn subexpressions_with_variables_are_folded_partially() {
        let result = rewrite("(filter (= ?x (+ 1 2)) (bgp (triple ?s ?p ?x)))");
        assert_snapshot!(result.data, @r"
        (filter (= ?x 3)
          (bgp (triple ?s ?p ?x)))
        ");
    }

    #[test]
    fn volatile_functions_and_errors_are_kept() {
        let result = rewrite("(filter (< (rand) 2) (table unit))");
        assert!(!result.transformed);
        let result = rewrite("(filter (/ 1 0) (table unit))");
        assert!(!result.transformed);
    }

    #[test]
    fn extensions_are_folded() {
        let result = rewrite("(extend ((?x (concat \"a\" \"b\"))) (table unit))");
        assert_snapshot!(result.data, @r#"
        (extend ((?x "ab"))
          (table unit))
        "#);
    }
}
