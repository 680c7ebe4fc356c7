use crate::error::ValidationError;
use crate::Algebra;

/// The result of a rewrite together with whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed<T> {
    pub data: T,
    pub transformed: bool,
}

impl<T> Transformed<T> {
    pub fn new(data: T, transformed: bool) -> Self {
        Self { data, transformed }
    }

    /// The data was rewritten.
    pub fn yes(data: T) -> Self {
        Self::new(data, true)
    }

    /// The data was left untouched.
    pub fn no(data: T) -> Self {
        Self::new(data, false)
    }

    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> Transformed<U> {
        Transformed::new(f(self.data), self.transformed)
    }

    /// Applies another rewrite, keeping track of whether any of the two changed the data.
    pub fn and_then(self, f: impl FnOnce(T) -> Transformed<T>) -> Transformed<T> {
        let next = f(self.data);
        Transformed::new(next.data, self.transformed || next.transformed)
    }
}

impl Algebra {
    /// Rewrites the tree bottom-up: children are rewritten before their parent.
    ///
    /// Patterns nested in `EXISTS` expressions are not visited.
    pub fn transform_up(
        self,
        f: &mut impl FnMut(Algebra) -> Transformed<Algebra>,
    ) -> Transformed<Algebra> {
        self.map_children(&mut |child| child.transform_up(f))
            .and_then(f)
    }

    /// Applies `f` to every direct child.
    pub fn map_children(
        self,
        f: &mut impl FnMut(Algebra) -> Transformed<Algebra>,
    ) -> Transformed<Algebra> {
        let mut transformed = false;
        let mut map = |child: Box<Algebra>| {
            let result = f(*child);
            transformed |= result.transformed;
            Box::new(result.data)
        };
        let data = match self {
            Algebra::Bgp { .. } | Algebra::Path { .. } | Algebra::Table { .. } => self,
            Algebra::Join { left, right } => Algebra::Join {
                left: map(left),
                right: map(right),
            },
            Algebra::LeftJoin {
                left,
                right,
                expression,
            } => Algebra::LeftJoin {
                left: map(left),
                right: map(right),
                expression,
            },
            Algebra::Union { left, right } => Algebra::Union {
                left: map(left),
                right: map(right),
            },
            Algebra::Minus { left, right } => Algebra::Minus {
                left: map(left),
                right: map(right),
            },
            Algebra::Filter { expression, inner } => Algebra::Filter {
                expression,
                inner: map(inner),
            },
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => Algebra::Extend {
                inner: map(inner),
                variable,
                expression,
            },
            Algebra::Graph { name, inner } => Algebra::Graph {
                name,
                inner: map(inner),
            },
            Algebra::Group {
                inner,
                variables,
                aggregates,
            } => Algebra::Group {
                inner: map(inner),
                variables,
                aggregates,
            },
            Algebra::OrderBy { inner, expressions } => Algebra::OrderBy {
                inner: map(inner),
                expressions,
            },
            Algebra::Distinct { inner } => Algebra::Distinct { inner: map(inner) },
            Algebra::Reduced { inner } => Algebra::Reduced { inner: map(inner) },
            Algebra::Project { inner, variables } => Algebra::Project {
                inner: map(inner),
                variables,
            },
            Algebra::Slice {
                inner,
                start,
                length,
            } => Algebra::Slice {
                inner: map(inner),
                start,
                length,
            },
            Algebra::Service {
                name,
                inner,
                silent,
            } => Algebra::Service {
                name,
                inner: map(inner),
                silent,
            },
        };
        Transformed::new(data, transformed)
    }
}

/// Folds a list of operands into right-nested binary operators: `[a, b, c]` becomes
/// `combine(a, combine(b, c))` and a single operand is returned as is.
pub fn to_binary<T>(
    operator: &'static str,
    operands: Vec<T>,
    combine: impl Fn(T, T) -> T,
) -> Result<T, ValidationError> {
    operands
        .into_iter()
        .rev()
        .reduce(|right, left| combine(left, right))
        .ok_or(ValidationError::NoOperands { operator })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse_algebra;

    #[test]
    fn to_binary_nests_to_the_right() {
        let operands = vec!["a", "b", "c"].into_iter().map(String::from).collect();
        let result = to_binary("concat", operands, |l, r| format!("({l} {r})"));
        assert_eq!(result, Ok("(a (b c))".to_owned()));
        assert_eq!(to_binary("concat", vec![1], |l, r| l + r), Ok(1));
        assert_eq!(
            to_binary("join", Vec::<Algebra>::new(), Algebra::join),
            Err(ValidationError::NoOperands { operator: "join" })
        );
    }

    #[test]
    fn transform_up_visits_children_first() {
        let algebra =
            parse_algebra("(distinct (union (table unit) (project () (table unit))))").unwrap();
        let mut visited = Vec::new();
        let result = algebra.transform_up(&mut |node| {
            visited.push(node.name());
            match node {
                Algebra::Project { inner, .. } => Transformed::yes(*inner),
                other => Transformed::no(other),
            }
        });
        assert!(result.transformed);
        assert_eq!(visited, ["table", "table", "project", "union", "distinct"]);
        assert_eq!(
            result.data,
            parse_algebra("(distinct (union (table unit) (table unit)))").unwrap()
        );
    }
}
