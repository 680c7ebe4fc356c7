use crate::Variable;
use oxrdf::Term;
use rustc_hash::{FxHashMap, FxHasher};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// An ordered bag of solutions. Duplicates are significant until removed explicitly.
pub type SolutionSequence = Vec<Solution>;

/// A set of variable bindings, one row of a query result.
///
/// Every variable is bound at most once. Equality and hashing do not depend on the order in which
/// the bindings were added, while [Display] keeps the insertion order.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    bindings: Vec<(Variable, Term)>,
}

/// Returned when a variable that is already bound would be bound again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("The variable {0} is already bound in the solution")]
pub struct AlreadyBoundError(pub Variable);

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the term bound to `variable`, if any.
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.bindings
            .iter()
            .find_map(|(v, t)| (v == variable).then_some(t))
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.get(variable).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter().map(|(v, t)| (v, t))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.iter().map(|(v, _)| v)
    }

    /// Binds `variable` to `term`.
    ///
    /// Fails if the variable is already bound, regardless of the bound term.
    pub fn insert(&mut self, variable: Variable, term: Term) -> Result<(), AlreadyBoundError> {
        if self.contains(&variable) {
            return Err(AlreadyBoundError(variable));
        }
        self.bindings.push((variable, term));
        Ok(())
    }

    /// Binds `variable` to `term` if it is unbound. Returns `false` if the variable is already
    /// bound to a different term.
    pub fn unify(&mut self, variable: &Variable, term: &Term) -> bool {
        match self.get(variable) {
            Some(bound) => bound == term,
            None => {
                self.bindings.push((variable.clone(), term.clone()));
                true
            }
        }
    }

    /// Returns a copy of this solution with `variable` bound to `term`.
    #[must_use]
    pub fn with(&self, variable: Variable, term: Term) -> Option<Self> {
        let mut result = self.clone();
        result.unify(&variable, &term).then_some(result)
    }

    /// Removes the binding of `variable`.
    pub fn remove(&mut self, variable: &Variable) -> Option<Term> {
        let index = self.bindings.iter().position(|(v, _)| v == variable)?;
        Some(self.bindings.remove(index).1)
    }

    /// Removes all bindings of non-distinguished variables.
    pub fn remove_non_distinguished(&mut self) {
        self.bindings.retain(|(v, _)| v.is_distinguished());
    }

    /// Two solutions are compatible if every variable bound in both is bound to the same term.
    pub fn is_compatible(&self, other: &Solution) -> bool {
        self.bindings
            .iter()
            .all(|(v, t)| other.get(v).map_or(true, |o| o == t))
    }

    /// Returns `true` if at least one variable is bound in both solutions.
    pub fn shares_variable_with(&self, other: &Solution) -> bool {
        self.variables().any(|v| other.contains(v))
    }

    /// Merges two solutions. Returns [None] if they are not compatible.
    pub fn merge(&self, other: &Solution) -> Option<Self> {
        let mut result = self.clone();
        for (variable, term) in &other.bindings {
            if !result.unify(variable, term) {
                return None;
            }
        }
        Some(result)
    }

    /// Restricts the solution to the given variables. The bindings keep their order.
    #[must_use]
    pub fn project(&self, variables: &[Variable]) -> Self {
        Self {
            bindings: self
                .bindings
                .iter()
                .filter(|(v, _)| variables.contains(v))
                .cloned()
                .collect(),
        }
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .bindings
                .iter()
                .all(|(v, t)| other.get(v).is_some_and(|o| o == t))
    }
}

impl Eq for Solution {}

impl Hash for Solution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent combination of the per-binding hashes.
        let mut combined = 0_u64;
        for binding in &self.bindings {
            let mut hasher = FxHasher::default();
            binding.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        self.bindings.len().hash(state);
        combined.hash(state);
    }
}

impl FromIterator<(Variable, Term)> for Solution {
    fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
        let mut result = Self::new();
        for (variable, term) in iter {
            result.unify(&variable, &term);
        }
        result
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = (&'a Variable, &'a Term);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (Variable, Term)>,
        fn(&'a (Variable, Term)) -> (&'a Variable, &'a Term),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter().map(|(v, t)| (v, t))
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (variable, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable}: {term}")?;
        }
        f.write_str("}")
    }
}

/// Checks whether two solution sequences contain the same solutions with the same multiplicity,
/// ignoring their order.
pub fn is_same_multiset(left: &[Solution], right: &[Solution]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut counts: FxHashMap<&Solution, isize> = FxHashMap::default();
    for solution in left {
        *counts.entry(solution).or_default() += 1;
    }
    for solution in right {
        *counts.entry(solution).or_default() -= 1;
    }
    counts.values().all(|c| *c == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    fn iri(value: &str) -> Term {
        NamedNode::new_unchecked(format!("http://example.com/{value}")).into()
    }

    fn solution(bindings: &[(&str, Term)]) -> Solution {
        bindings
            .iter()
            .map(|(v, t)| (Variable::new(*v), t.clone()))
            .collect()
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = solution(&[("x", iri("a")), ("y", iri("b"))]);
        let b = solution(&[("y", iri("b")), ("x", iri("a"))]);
        assert_eq!(a, b);
        assert!(is_same_multiset(&[a], &[b]));
    }

    #[test]
    fn display_keeps_insertion_order() {
        let a = solution(&[("y", Literal::from(1_i64).into()), ("x", iri("a"))]);
        assert_eq!(
            a.to_string(),
            "{?y: \"1\"^^<http://www.w3.org/2001/XMLSchema#integer>, ?x: <http://example.com/a>}"
        );
    }

    #[test]
    fn compatible_solutions_merge() {
        let a = solution(&[("x", iri("a")), ("y", iri("b"))]);
        let b = solution(&[("x", iri("a")), ("z", iri("c"))]);
        assert!(a.is_compatible(&b));
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get(&Variable::new("z")), Some(&iri("c")));
    }

    #[test]
    fn incompatible_solutions_do_not_merge() {
        let a = solution(&[("x", iri("a"))]);
        let b = solution(&[("x", iri("b"))]);
        assert!(!a.is_compatible(&b));
        assert!(a.merge(&b).is_none());
    }

    #[test]
    fn insert_rejects_rebinding() {
        let mut a = solution(&[("x", iri("a"))]);
        assert_eq!(
            a.insert(Variable::new("x"), iri("a")),
            Err(AlreadyBoundError(Variable::new("x")))
        );
    }

    #[test]
    fn multiset_comparison_counts_duplicates() {
        let a = solution(&[("x", iri("a"))]);
        let b = solution(&[("x", iri("b"))]);
        assert!(!is_same_multiset(
            &[a.clone(), a.clone(), b.clone()],
            &[a.clone(), b.clone(), b]
        ));
        assert!(is_same_multiset(&[a.clone(), a.clone()], &[a.clone(), a]));
    }
}
