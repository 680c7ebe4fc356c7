use super::{ExpressionEvaluator, Evaluator, Solutions};
use crate::context::ExecutionContext;
use crate::error::QueryEvaluationError;
use rdf_algebra_common::Queryable;
use rdf_algebra_logical::AggregateExpression;
use rdf_algebra_model::{Literal, Solution, Term, Variable};
use rustc_hash::{FxHashMap, FxHashSet};

type GroupKey = Vec<Option<Term>>;

impl<Q: Queryable + ?Sized> Evaluator<'_, Q> {
    /// Partitions `inner` by the values of `variables` and computes the aggregates of every
    /// group. Groups are returned in the order of their first solution.
    ///
    /// Without grouping variables, an empty input forms one empty group.
    pub(super) fn evaluate_group(
        &self,
        inner: Solutions,
        variables: &[Variable],
        aggregates: &[(Variable, AggregateExpression)],
        context: &ExecutionContext,
    ) -> Result<Solutions, QueryEvaluationError> {
        let mut index = FxHashMap::<GroupKey, usize>::default();
        let mut groups: Vec<(GroupKey, Solutions)> = Vec::new();
        for solution in inner {
            let key = variables
                .iter()
                .map(|variable| solution.get(variable).cloned())
                .collect::<GroupKey>();
            let position = *index.entry(key.clone()).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            groups[position].1.push(solution);
        }
        if groups.is_empty() && variables.is_empty() {
            groups.push((Vec::new(), Vec::new()));
        }

        let evaluator = self.expression_evaluator(context);
        let mut result = Vec::with_capacity(groups.len());
        for (key, members) in groups {
            let mut output = variables
                .iter()
                .zip(key)
                .filter_map(|(variable, value)| Some((variable.clone(), value?)))
                .collect::<Solution>();
            for (variable, aggregate) in aggregates {
                if let Some(value) = aggregate_group(&evaluator, aggregate, &members)? {
                    output.insert(variable.clone(), value)?;
                }
            }
            result.push(output);
        }
        Ok(result)
    }
}

fn aggregate_group(
    evaluator: &impl ExpressionEvaluator,
    aggregate: &AggregateExpression,
    members: &[Solution],
) -> Result<Option<Term>, QueryEvaluationError> {
    let Some(expression) = &aggregate.expression else {
        // COUNT(*)
        let count = if aggregate.distinct {
            members.iter().collect::<FxHashSet<_>>().len()
        } else {
            members.len()
        };
        let count = i64::try_from(count).map_err(|_| {
            QueryEvaluationError::InternalError("COUNT(*) overflows xsd:integer".to_owned())
        })?;
        return Ok(Some(Literal::from(count).into()));
    };
    let mut accumulator = aggregate.function.create_accumulator(aggregate.distinct);
    for solution in members {
        accumulator.add(evaluator.evaluate(expression, solution)?);
    }
    Ok(accumulator.finish())
}
