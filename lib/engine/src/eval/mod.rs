//! Evaluation of operator trees.
//!
//! Every operator materializes its solution sequence before its parent consumes it. The
//! [ExecutionContext] of an operator carries its depth, its active graph and the bindings that
//! are injected into the leaves (`EXISTS` correlation and initial bindings).

mod aggregate;
mod bgp;
mod expression;
mod path;

pub use expression::ExpressionEvaluator;

use crate::context::{ActiveGraph, DatasetView, ExecutionContext};
use crate::error::QueryEvaluationError;
use rdf_algebra_common::Queryable;
use rdf_algebra_functions::FunctionContext;
use rdf_algebra_logical::pattern::NamedNodePattern;
use rdf_algebra_logical::{Algebra, OrderExpression};
use rdf_algebra_model::{
    compare_terms, NamedOrBlankNode, Solution, Term, Variable, VariableGenerator,
};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// An ordered bag of solutions.
pub type Solutions = Vec<Solution>;

/// Evaluates operator trees against a [Queryable].
///
/// An evaluator is created per query. It owns the query-wide state: the dataset, the function
/// context (e.g., the value of `NOW()`) and the generator of fresh variables.
pub struct Evaluator<'a, Q: ?Sized> {
    queryable: &'a Q,
    dataset: DatasetView,
    functions: FunctionContext,
    variables: VariableGenerator,
}

impl<'a, Q: Queryable + ?Sized> Evaluator<'a, Q> {
    pub fn new(queryable: &'a Q, dataset: DatasetView, functions: FunctionContext) -> Self {
        Self {
            queryable,
            dataset,
            functions,
            variables: VariableGenerator::new("path"),
        }
    }

    pub fn dataset(&self) -> &DatasetView {
        &self.dataset
    }

    pub fn functions(&self) -> &FunctionContext {
        &self.functions
    }

    /// Creates the context of the root operator.
    pub fn root_context(&self, max_depth: usize, bindings: Solution) -> ExecutionContext {
        ExecutionContext::new(max_depth, bindings, self.dataset.default_graph.clone())
    }

    /// Evaluates `algebra` and returns its solutions.
    pub fn execute(
        &self,
        algebra: &Algebra,
        context: &ExecutionContext,
    ) -> Result<Solutions, QueryEvaluationError> {
        let context = context.descend()?;
        let solutions = match algebra {
            Algebra::Bgp { patterns } => self.evaluate_bgp(patterns, &context)?,
            Algebra::Path {
                subject,
                path,
                object,
            } => self.evaluate_path(subject, path, object, &context)?,
            Algebra::Join { left, right } => {
                let left = self.execute(left, &context)?;
                let right = self.execute(right, &context)?;
                join(&left, &right)
            }
            Algebra::LeftJoin {
                left,
                right,
                expression,
            } => {
                let left = self.execute(left, &context)?;
                let right = self.execute(right, &context)?;
                let evaluator = self.expression_evaluator(&context);
                let mut result = Vec::new();
                for l in left {
                    let mut found = false;
                    for r in &right {
                        let Some(merged) = l.merge(r) else {
                            continue;
                        };
                        let keep = match expression {
                            Some(expression) => evaluator
                                .effective_boolean_value(expression, &merged)?
                                .unwrap_or(false),
                            None => true,
                        };
                        if keep {
                            found = true;
                            result.push(merged);
                        }
                    }
                    if !found {
                        result.push(l);
                    }
                }
                result
            }
            Algebra::Union { left, right } => {
                let mut result = self.execute(left, &context)?;
                result.extend(self.execute(right, &context)?);
                result
            }
            Algebra::Minus { left, right } => {
                let left = self.execute(left, &context)?;
                let right = self.execute(right, &context)?;
                left.into_iter()
                    .filter(|l| {
                        !right
                            .iter()
                            .any(|r| l.shares_variable_with(r) && l.is_compatible(r))
                    })
                    .collect()
            }
            Algebra::Filter { expression, inner } => {
                let inner = self.execute(inner, &context)?;
                let evaluator = self.expression_evaluator(&context);
                let mut result = Vec::with_capacity(inner.len());
                for solution in inner {
                    if evaluator
                        .effective_boolean_value(expression, &solution)?
                        .unwrap_or(false)
                    {
                        result.push(solution);
                    }
                }
                result
            }
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => {
                let inner = self.execute(inner, &context)?;
                let evaluator = self.expression_evaluator(&context);
                // A variable bound by the outer solution of an EXISTS is joined, not rebound.
                let correlated = context.bindings().contains(variable);
                let mut result = Vec::with_capacity(inner.len());
                for mut solution in inner {
                    if correlated {
                        let compatible = match evaluator.evaluate(expression, &solution)? {
                            Ok(value) => {
                                let bound = solution
                                    .get(variable)
                                    .or_else(|| context.bindings().get(variable));
                                bound == Some(&value)
                            }
                            Err(_) => true,
                        };
                        if compatible {
                            result.push(solution);
                        }
                        continue;
                    }
                    if solution.contains(variable) {
                        return Err(QueryEvaluationError::AlreadyBound(variable.clone()));
                    }
                    if let Ok(value) = evaluator.evaluate(expression, &solution)? {
                        solution.insert(variable.clone(), value)?;
                    }
                    result.push(solution);
                }
                result
            }
            Algebra::Graph { name, inner } => self.evaluate_graph(name, inner, &context)?,
            Algebra::Group {
                inner,
                variables,
                aggregates,
            } => {
                let inner = self.execute(inner, &context)?;
                self.evaluate_group(inner, variables, aggregates, &context)?
            }
            Algebra::OrderBy { inner, expressions } => {
                let inner = self.execute(inner, &context)?;
                self.evaluate_order_by(inner, expressions, &context)?
            }
            Algebra::Distinct { inner } | Algebra::Reduced { inner } => {
                distinct(self.execute(inner, &context)?)
            }
            Algebra::Project { inner, variables } => {
                // Bindings of variables that are not projected must not leak into the sub-query.
                let bindings = context.bindings().project(variables);
                let inner = self.execute(inner, &context.with_bindings(bindings))?;
                inner
                    .iter()
                    .map(|solution| solution.project(variables))
                    .collect()
            }
            Algebra::Slice {
                inner,
                start,
                length,
            } => self
                .execute(inner, &context)?
                .into_iter()
                .skip(*start)
                .take(length.unwrap_or(usize::MAX))
                .collect(),
            Algebra::Table { rows, .. } => rows
                .iter()
                .filter_map(|row| context.bindings().merge(row))
                .collect(),
            Algebra::Service { name, silent, .. } => {
                if *silent {
                    vec![context.bindings().clone()]
                } else {
                    return Err(QueryEvaluationError::UnsupportedService(name.to_string()));
                }
            }
        };
        tracing::debug!(
            operator = algebra.name(),
            depth = context.depth(),
            solutions = solutions.len(),
            "Evaluated operator"
        );
        Ok(solutions)
    }

    fn evaluate_graph(
        &self,
        name: &NamedNodePattern,
        inner: &Algebra,
        context: &ExecutionContext,
    ) -> Result<Solutions, QueryEvaluationError> {
        let variable = match name {
            NamedNodePattern::NamedNode(node) => {
                let graph = NamedOrBlankNode::from(node.clone());
                if !self.dataset.allows_named_graph(&graph) {
                    return Ok(Vec::new());
                }
                return self.execute(
                    inner,
                    &context.with_active_graph(ActiveGraph::NamedGraph(graph)),
                );
            }
            NamedNodePattern::Variable(variable) => variable,
        };

        let graphs = match &self.dataset.named_graphs {
            Some(graphs) => graphs.clone(),
            None => self.queryable.named_graphs()?,
        };
        let mut result = Vec::new();
        for graph in graphs {
            let graph_term = match &graph {
                NamedOrBlankNode::NamedNode(node) => Term::from(node.clone()),
                NamedOrBlankNode::BlankNode(node) => Term::from(node.clone()),
            };
            if context
                .bindings()
                .get(variable)
                .is_some_and(|bound| *bound != graph_term)
            {
                continue;
            }
            let inner_context = context.with_active_graph(ActiveGraph::NamedGraph(graph));
            for solution in self.execute(inner, &inner_context)? {
                result.extend(solution.with(variable.clone(), graph_term.clone()));
            }
        }
        Ok(result)
    }

    fn evaluate_order_by(
        &self,
        inner: Solutions,
        expressions: &[OrderExpression],
        context: &ExecutionContext,
    ) -> Result<Solutions, QueryEvaluationError> {
        let evaluator = self.expression_evaluator(context);
        let mut keyed = Vec::with_capacity(inner.len());
        for solution in inner {
            let mut key = Vec::with_capacity(expressions.len());
            for expression in expressions {
                key.push(evaluator.evaluate(expression.expression(), &solution)?.ok());
            }
            keyed.push((key, solution));
        }
        // `sort_by` is stable: ties keep the input order.
        keyed.sort_by(|(lhs, _), (rhs, _)| {
            for ((lhs, rhs), expression) in lhs.iter().zip(rhs).zip(expressions) {
                let ordering = compare_terms(lhs.as_ref(), rhs.as_ref());
                let ordering = match expression {
                    OrderExpression::Asc(_) => ordering,
                    OrderExpression::Desc(_) => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        Ok(keyed.into_iter().map(|(_, solution)| solution).collect())
    }

    fn fresh_variable(&self) -> Variable {
        self.variables.fresh()
    }
}

/// Nested loop join. The solutions of `right` are the inner loop.
fn join(left: &[Solution], right: &[Solution]) -> Solutions {
    left.iter()
        .flat_map(|l| right.iter().filter_map(move |r| l.merge(r)))
        .collect()
}

/// Removes duplicates, keeping the first occurrence of every solution.
fn distinct(solutions: Solutions) -> Solutions {
    let mut seen = FxHashSet::default();
    solutions
        .into_iter()
        .filter(|solution| seen.insert(solution.clone()))
        .collect()
}
