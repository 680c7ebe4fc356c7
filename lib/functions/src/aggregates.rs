//! Accumulators for the SPARQL set functions.
//!
//! An accumulator consumes the values of one group, one evaluation result per solution, and
//! produces the aggregated value. Empty groups follow these rules: `COUNT` yields 0,
//! `GROUP_CONCAT` the empty string and all other aggregates leave their variable unbound.

use crate::numeric::{AddSparqlOp, DivSparqlOp};
use crate::{BinarySparqlOp, RdfTermValueArg};
use rdf_algebra_model::{compare_terms, EvalError, EvalResult, Integer, Literal, Numeric, Term};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// The kind of aggregate function.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Sample,
    GroupConcat { separator: Option<String> },
}

impl AggregateFunction {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Sample => "sample",
            AggregateFunction::GroupConcat { .. } => "group_concat",
        }
    }

    /// Creates a fresh accumulator. With `distinct`, duplicate values are only accumulated once.
    pub fn create_accumulator(&self, distinct: bool) -> Box<dyn Accumulator> {
        let inner: Box<dyn Accumulator> = match self {
            AggregateFunction::Count => Box::new(CountAccumulator::default()),
            AggregateFunction::Sum => Box::new(SumAccumulator::default()),
            AggregateFunction::Avg => Box::new(AvgAccumulator::default()),
            AggregateFunction::Min => Box::new(ExtremumAccumulator::new(Ordering::Less)),
            AggregateFunction::Max => Box::new(ExtremumAccumulator::new(Ordering::Greater)),
            AggregateFunction::Sample => Box::new(SampleAccumulator::default()),
            AggregateFunction::GroupConcat { separator } => Box::new(GroupConcatAccumulator::new(
                separator.clone().unwrap_or_else(|| " ".to_owned()),
            )),
        };
        if distinct {
            Box::new(DistinctAccumulator::new(inner))
        } else {
            inner
        }
    }
}

impl Display for AggregateFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub trait Accumulator {
    /// Adds the evaluation result of one solution. Errors include unbound variables.
    fn add(&mut self, value: EvalResult<Term>);

    /// Returns the aggregated value or [None] if it is unbound.
    fn finish(self: Box<Self>) -> Option<Term>;
}

#[derive(Debug, Default)]
struct CountAccumulator {
    count: i64,
}

impl Accumulator for CountAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        if value.is_ok() {
            self.count += 1;
        }
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        Some(Literal::from(self.count).into())
    }
}

/// Sums numbers. Any non-numeric value turns the result into an error.
#[derive(Debug, Default)]
struct SumAccumulator {
    sum: Option<EvalResult<Numeric>>,
}

impl SumAccumulator {
    fn add_numeric(&mut self, value: EvalResult<Numeric>) {
        self.sum = Some(match (self.sum.take(), value) {
            (None, value) => value,
            (Some(Ok(sum)), Ok(value)) => AddSparqlOp.evaluate(sum, value),
            _ => Err(EvalError {}),
        });
    }
}

impl Accumulator for SumAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        self.add_numeric(value.and_then(|term| Numeric::try_from_term(&term)));
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        Some(self.sum?.ok()?.into_literal().into())
    }
}

#[derive(Debug, Default)]
struct AvgAccumulator {
    sum: SumAccumulator,
    count: i64,
}

impl Accumulator for AvgAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        self.sum.add(value);
        self.count += 1;
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        let sum = self.sum.sum?.ok()?;
        let count = Numeric::Integer(Integer::from(self.count));
        let avg = DivSparqlOp.evaluate(sum, count).ok()?;
        Some(avg.into_literal().into())
    }
}

/// `MIN` and `MAX` using the `ORDER BY` order. Errors are skipped.
#[derive(Debug)]
struct ExtremumAccumulator {
    keep: Ordering,
    current: Option<Term>,
}

impl ExtremumAccumulator {
    fn new(keep: Ordering) -> Self {
        Self {
            keep,
            current: None,
        }
    }
}

impl Accumulator for ExtremumAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        let Ok(value) = value else {
            return;
        };
        let replace = match &self.current {
            None => true,
            Some(current) => compare_terms(Some(&value), Some(current)) == self.keep,
        };
        if replace {
            self.current = Some(value);
        }
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        self.current
    }
}

#[derive(Debug, Default)]
struct SampleAccumulator {
    value: Option<Term>,
}

impl Accumulator for SampleAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        if self.value.is_none() {
            self.value = value.ok();
        }
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        self.value
    }
}

/// Concatenates the string values of the group. Blank nodes and errors turn the result into an
/// error. The language tag is kept if all values share it.
#[derive(Debug)]
struct GroupConcatAccumulator {
    separator: String,
    concat: EvalResult<String>,
    language: Option<Option<String>>,
}

impl GroupConcatAccumulator {
    fn new(separator: String) -> Self {
        Self {
            separator,
            concat: Ok(String::new()),
            language: None,
        }
    }
}

impl Accumulator for GroupConcatAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        let Ok(concat) = &mut self.concat else {
            return;
        };
        let (value, language) = match value {
            Ok(Term::Literal(literal)) => (
                literal.value().to_owned(),
                literal.language().map(ToOwned::to_owned),
            ),
            Ok(Term::NamedNode(node)) => (node.into_string(), None),
            _ => {
                self.concat = Err(EvalError {});
                return;
            }
        };

        if let Some(current) = &self.language {
            if *current != language {
                self.language = Some(None);
            }
            concat.push_str(&self.separator);
        } else {
            self.language = Some(language);
        }
        concat.push_str(&value);
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        let concat = self.concat.ok()?;
        let literal = match self.language.flatten() {
            Some(language) => Literal::new_language_tagged_literal_unchecked(concat, language),
            None => Literal::new_simple_literal(concat),
        };
        Some(literal.into())
    }
}

struct DistinctAccumulator {
    seen: FxHashSet<Option<Term>>,
    inner: Box<dyn Accumulator>,
}

impl DistinctAccumulator {
    fn new(inner: Box<dyn Accumulator>) -> Self {
        Self {
            seen: FxHashSet::default(),
            inner,
        }
    }
}

impl Accumulator for DistinctAccumulator {
    fn add(&mut self, value: EvalResult<Term>) {
        if self.seen.insert(value.as_ref().ok().cloned()) {
            self.inner.add(value);
        }
    }

    fn finish(self: Box<Self>) -> Option<Term> {
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(function: &AggregateFunction, values: &[EvalResult<Term>]) -> Option<Term> {
        let mut accumulator = function.create_accumulator(false);
        for value in values {
            accumulator.add(value.clone());
        }
        accumulator.finish()
    }

    fn int(value: i64) -> EvalResult<Term> {
        Ok(Literal::from(value).into())
    }

    #[test]
    fn empty_groups() {
        assert_eq!(
            aggregate(&AggregateFunction::Count, &[]),
            Some(Literal::from(0_i64).into())
        );
        assert_eq!(
            aggregate(&AggregateFunction::GroupConcat { separator: None }, &[]),
            Some(Literal::new_simple_literal("").into())
        );
        assert_eq!(aggregate(&AggregateFunction::Sum, &[]), None);
        assert_eq!(aggregate(&AggregateFunction::Avg, &[]), None);
        assert_eq!(aggregate(&AggregateFunction::Min, &[]), None);
        assert_eq!(aggregate(&AggregateFunction::Sample, &[]), None);
    }

    #[test]
    fn count_skips_errors() {
        assert_eq!(
            aggregate(&AggregateFunction::Count, &[int(1), Err(EvalError {}), int(2)]),
            Some(Literal::from(2_i64).into())
        );
    }

    #[test]
    fn sum_and_avg() {
        assert_eq!(
            aggregate(&AggregateFunction::Sum, &[int(1), int(2), int(3)]),
            Some(Literal::from(6_i64).into())
        );
        assert_eq!(
            aggregate(&AggregateFunction::Avg, &[int(1), int(2)]),
            Some(Numeric::Decimal("1.5".parse().unwrap()).into_literal().into())
        );
    }

    #[test]
    fn sum_with_a_string_is_unbound() {
        let string = Ok(Literal::new_simple_literal("a").into());
        assert_eq!(aggregate(&AggregateFunction::Sum, &[int(1), string]), None);
    }

    #[test]
    fn min_and_max() {
        let values = [int(3), int(1), int(2)];
        assert_eq!(aggregate(&AggregateFunction::Min, &values), int(1).ok());
        assert_eq!(aggregate(&AggregateFunction::Max, &values), int(3).ok());
    }

    #[test]
    fn group_concat_with_separator() {
        let values = [
            Ok(Literal::new_simple_literal("a").into()),
            Ok(Literal::new_simple_literal("b").into()),
        ];
        let function = AggregateFunction::GroupConcat {
            separator: Some(", ".to_owned()),
        };
        assert_eq!(
            aggregate(&function, &values),
            Some(Literal::new_simple_literal("a, b").into())
        );
    }

    #[test]
    fn distinct_count() {
        let mut accumulator = AggregateFunction::Count.create_accumulator(true);
        for value in [int(1), int(1), int(2)] {
            accumulator.add(value);
        }
        assert_eq!(accumulator.finish(), Some(Literal::from(2_i64).into()));
    }
}
