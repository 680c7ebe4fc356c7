use crate::pattern::{NamedNodePattern, TermPattern, TriplePattern};
use crate::{Expression, PropertyPath};
use rdf_algebra_functions::aggregates::AggregateFunction;
use rdf_algebra_model::{Solution, Variable};
use std::fmt::{Display, Formatter};

/// A node of the SPARQL algebra.
///
/// Every operator owns its children. Evaluating a node yields an ordered bag of solutions, see
/// the evaluator for the semantics of each variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algebra {
    /// A basic graph pattern. Blank nodes act as non-distinguished variables.
    Bgp { patterns: Vec<TriplePattern> },
    Path {
        subject: TermPattern,
        path: PropertyPath,
        object: TermPattern,
    },
    Join {
        left: Box<Algebra>,
        right: Box<Algebra>,
    },
    LeftJoin {
        left: Box<Algebra>,
        right: Box<Algebra>,
        expression: Option<Expression>,
    },
    Union {
        left: Box<Algebra>,
        right: Box<Algebra>,
    },
    Minus {
        left: Box<Algebra>,
        right: Box<Algebra>,
    },
    Filter {
        expression: Expression,
        inner: Box<Algebra>,
    },
    Extend {
        inner: Box<Algebra>,
        variable: Variable,
        expression: Expression,
    },
    Graph {
        name: NamedNodePattern,
        inner: Box<Algebra>,
    },
    Group {
        inner: Box<Algebra>,
        variables: Vec<Variable>,
        aggregates: Vec<(Variable, AggregateExpression)>,
    },
    OrderBy {
        inner: Box<Algebra>,
        expressions: Vec<OrderExpression>,
    },
    Distinct { inner: Box<Algebra> },
    Reduced { inner: Box<Algebra> },
    Project {
        inner: Box<Algebra>,
        variables: Vec<Variable>,
    },
    Slice {
        inner: Box<Algebra>,
        start: usize,
        length: Option<usize>,
    },
    /// Inline data. Every row only binds variables of `variables`.
    Table {
        variables: Vec<Variable>,
        rows: Vec<Solution>,
    },
    Service {
        name: NamedNodePattern,
        inner: Box<Algebra>,
        silent: bool,
    },
}

/// An aggregate of a [Algebra::Group] node. A missing expression counts solutions (`COUNT(*)`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AggregateExpression {
    pub function: AggregateFunction,
    pub distinct: bool,
    pub expression: Option<Expression>,
}

/// An ordering key of a [Algebra::OrderBy] node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrderExpression {
    Asc(Expression),
    Desc(Expression),
}

impl OrderExpression {
    pub fn expression(&self) -> &Expression {
        match self {
            OrderExpression::Asc(expression) | OrderExpression::Desc(expression) => expression,
        }
    }
}

impl Algebra {
    pub fn bgp(patterns: Vec<TriplePattern>) -> Self {
        Self::Bgp { patterns }
    }

    pub fn join(left: Algebra, right: Algebra) -> Self {
        Self::Join {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left_join(left: Algebra, right: Algebra, expression: Option<Expression>) -> Self {
        Self::LeftJoin {
            left: Box::new(left),
            right: Box::new(right),
            expression,
        }
    }

    pub fn union(left: Algebra, right: Algebra) -> Self {
        Self::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn minus(left: Algebra, right: Algebra) -> Self {
        Self::Minus {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn filter(expression: Expression, inner: Algebra) -> Self {
        Self::Filter {
            expression,
            inner: Box::new(inner),
        }
    }

    /// The table with a single empty row. It is the neutral element of joins.
    pub fn unit() -> Self {
        Self::Table {
            variables: Vec::new(),
            rows: vec![Solution::new()],
        }
    }

    /// The table without rows.
    pub fn empty() -> Self {
        Self::Table {
            variables: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// The lowercase SSE name of the operator.
    pub fn name(&self) -> &'static str {
        match self {
            Algebra::Bgp { .. } => "bgp",
            Algebra::Path { .. } => "path",
            Algebra::Join { .. } => "join",
            Algebra::LeftJoin { .. } => "leftjoin",
            Algebra::Union { .. } => "union",
            Algebra::Minus { .. } => "minus",
            Algebra::Filter { .. } => "filter",
            Algebra::Extend { .. } => "extend",
            Algebra::Graph { .. } => "graph",
            Algebra::Group { .. } => "group",
            Algebra::OrderBy { .. } => "order",
            Algebra::Distinct { .. } => "distinct",
            Algebra::Reduced { .. } => "reduced",
            Algebra::Project { .. } => "project",
            Algebra::Slice { .. } => "slice",
            Algebra::Table { .. } => "table",
            Algebra::Service { .. } => "service",
        }
    }

    /// Returns the direct child operators.
    pub fn children(&self) -> Vec<&Algebra> {
        match self {
            Algebra::Bgp { .. } | Algebra::Path { .. } | Algebra::Table { .. } => Vec::new(),
            Algebra::Join { left, right }
            | Algebra::LeftJoin { left, right, .. }
            | Algebra::Union { left, right }
            | Algebra::Minus { left, right } => vec![left.as_ref(), right.as_ref()],
            Algebra::Filter { inner, .. }
            | Algebra::Extend { inner, .. }
            | Algebra::Graph { inner, .. }
            | Algebra::Group { inner, .. }
            | Algebra::OrderBy { inner, .. }
            | Algebra::Distinct { inner }
            | Algebra::Reduced { inner }
            | Algebra::Project { inner, .. }
            | Algebra::Slice { inner, .. }
            | Algebra::Service { inner, .. } => vec![inner.as_ref()],
        }
    }

    /// Returns the variables that may be bound by the solutions of this node, in the order of
    /// their first occurrence. Includes non-distinguished variables.
    pub fn in_scope_variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        self.add_in_scope_variables(&mut result);
        result
    }

    fn add_in_scope_variables(&self, result: &mut Vec<Variable>) {
        fn add(result: &mut Vec<Variable>, variable: Variable) {
            if !result.contains(&variable) {
                result.push(variable);
            }
        }

        match self {
            Algebra::Bgp { patterns } => {
                for variable in patterns.iter().flat_map(TriplePattern::variables) {
                    add(result, variable);
                }
            }
            Algebra::Path {
                subject, object, ..
            } => {
                for variable in [subject.to_variable(), object.to_variable()]
                    .into_iter()
                    .flatten()
                {
                    add(result, variable);
                }
            }
            Algebra::Join { left, right }
            | Algebra::LeftJoin { left, right, .. }
            | Algebra::Union { left, right } => {
                left.add_in_scope_variables(result);
                right.add_in_scope_variables(result);
            }
            Algebra::Minus { left, .. } => left.add_in_scope_variables(result),
            Algebra::Extend {
                inner, variable, ..
            } => {
                inner.add_in_scope_variables(result);
                add(result, variable.clone());
            }
            Algebra::Graph { name, inner } => {
                if let NamedNodePattern::Variable(variable) = name {
                    add(result, variable.clone());
                }
                inner.add_in_scope_variables(result);
            }
            Algebra::Group {
                variables,
                aggregates,
                ..
            } => {
                for variable in variables.iter().chain(aggregates.iter().map(|(v, _)| v)) {
                    add(result, variable.clone());
                }
            }
            Algebra::Project { variables, .. } | Algebra::Table { variables, .. } => {
                for variable in variables {
                    add(result, variable.clone());
                }
            }
            Algebra::Filter { inner, .. }
            | Algebra::OrderBy { inner, .. }
            | Algebra::Distinct { inner }
            | Algebra::Reduced { inner }
            | Algebra::Slice { inner, .. }
            | Algebra::Service { inner, .. } => inner.add_in_scope_variables(result),
        }
    }

    /// Returns the non-distinguished variables and blank node variables that occur anywhere in
    /// this subtree, including the patterns of `EXISTS` expressions.
    pub fn non_distinguished_variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        self.add_non_distinguished_variables(&mut result);
        result
    }

    fn add_non_distinguished_variables(&self, result: &mut Vec<Variable>) {
        let add = |variable: Variable| {
            if !variable.is_distinguished() && !result.contains(&variable) {
                result.push(variable);
            }
        };
        match self {
            Algebra::Bgp { patterns } => {
                patterns.iter().flat_map(TriplePattern::variables).for_each(add);
            }
            Algebra::Path {
                subject, object, ..
            } => {
                [subject.to_variable(), object.to_variable()]
                    .into_iter()
                    .flatten()
                    .for_each(add);
            }
            _ => {}
        }
        for expression in self.expressions() {
            add_exists_non_distinguished_variables(expression, result);
        }
        for child in self.children() {
            child.add_non_distinguished_variables(result);
        }
    }

    /// Returns the expressions directly attached to this node.
    pub fn expressions(&self) -> Vec<&Expression> {
        match self {
            Algebra::LeftJoin {
                expression: Some(expression),
                ..
            }
            | Algebra::Filter { expression, .. }
            | Algebra::Extend { expression, .. } => vec![expression],
            Algebra::Group { aggregates, .. } => aggregates
                .iter()
                .filter_map(|(_, aggregate)| aggregate.expression.as_ref())
                .collect(),
            Algebra::OrderBy { expressions, .. } => {
                expressions.iter().map(OrderExpression::expression).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn add_exists_non_distinguished_variables(expression: &Expression, result: &mut Vec<Variable>) {
    if let Expression::Exists(pattern) = expression {
        pattern.add_non_distinguished_variables(result);
    }
    for child in expression.children() {
        add_exists_non_distinguished_variables(child, result);
    }
}

impl Display for Algebra {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::sse::write_algebra(f, self, Some(0))
    }
}
