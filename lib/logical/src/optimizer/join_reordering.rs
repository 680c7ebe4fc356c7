use crate::optimizer::OptimizerRule;
use crate::pattern::TriplePattern;
use crate::transform::Transformed;
use crate::Algebra;
use rdf_algebra_model::Variable;
use rustc_hash::{FxHashMap, FxHashSet};

/// Reorders the operands of nested inner joins and the triple patterns of basic graph patterns.
///
/// The operands are first split into connected components, i.e., groups of operands that
/// (transitively) share variables. Within a component, the cheapest operand goes first and each
/// following operand is the cheapest one sharing a variable with the operands placed before it.
/// The components are then joined in the order of their first operand.
///
/// Only directly nested [Algebra::Join] nodes are reordered. Left joins, filters and other
/// operators delimit the reordering scope. For example, the following tree is reordered as a
/// whole:
///
/// ```text
/// (join
///   (join
///     (bgp ...)
///     (bgp ...))
///   (bgp ...))
/// ```
///
/// Below a [Algebra::Slice] the solution order decides which solutions are kept, so nothing is
/// reordered there unless an [Algebra::OrderBy] in between fixes the order.
#[derive(Debug, Default)]
pub struct JoinReorderingRule;

impl JoinReorderingRule {
    pub fn new() -> Self {
        Self
    }
}

impl OptimizerRule for JoinReorderingRule {
    fn name(&self) -> &str {
        "join-reordering"
    }

    fn rewrite(&self, algebra: Algebra) -> Transformed<Algebra> {
        reorder(algebra, false)
    }
}

/// Rewrites the tree bottom-up. `keep_order` is set while the solution order is observable.
fn reorder(algebra: Algebra, keep_order: bool) -> Transformed<Algebra> {
    let keep_order = match &algebra {
        Algebra::Slice { .. } => true,
        Algebra::OrderBy { .. } => false,
        _ => keep_order,
    };
    algebra
        .map_children(&mut |child| reorder(child, keep_order))
        .and_then(|algebra| match algebra {
            other if keep_order => Transformed::no(other),
            Algebra::Bgp { patterns } => reorder_bgp(patterns),
            join @ Algebra::Join { .. } => reorder_join(join),
            other => Transformed::no(other),
        })
}

fn reorder_bgp(patterns: Vec<TriplePattern>) -> Transformed<Algebra> {
    let operands = patterns
        .into_iter()
        .map(|pattern| {
            Operand::new(
                pattern.variables(),
                estimate_pattern_cardinality(&pattern),
                pattern,
            )
        })
        .collect();
    let ordered = connected_components(operands)
        .into_iter()
        .flat_map(greedy_order)
        .collect::<Vec<_>>();
    let transformed = ordered
        .windows(2)
        .any(|pair| pair[0].position > pair[1].position);

    let patterns = ordered.into_iter().map(|operand| operand.data).collect();
    Transformed::new(Algebra::Bgp { patterns }, transformed)
}

fn reorder_join(join: Algebra) -> Transformed<Algebra> {
    let original = join.clone();

    let mut leaves = Vec::new();
    collect_join_operands(join, &mut leaves);
    let operands = leaves
        .into_iter()
        .map(|leaf| Operand::new(leaf.in_scope_variables(), estimate_cardinality(&leaf), leaf))
        .collect();

    let reordered = connected_components(operands)
        .into_iter()
        .filter_map(|component| {
            greedy_order(component)
                .into_iter()
                .map(|operand| operand.data)
                .reduce(Algebra::join)
        })
        .reduce(Algebra::join);
    match reordered {
        Some(reordered) if reordered != original => Transformed::yes(reordered),
        _ => Transformed::no(original),
    }
}

fn collect_join_operands(algebra: Algebra, operands: &mut Vec<Algebra>) {
    match algebra {
        Algebra::Join { left, right } => {
            collect_join_operands(*left, operands);
            collect_join_operands(*right, operands);
        }
        other => operands.push(other),
    }
}

/// An operand of a reorderable join.
#[derive(Debug)]
struct Operand<T> {
    data: T,
    variables: FxHashSet<Variable>,
    cardinality: usize,
    /// The position in the original order.
    position: usize,
}

impl<T> Operand<T> {
    fn new(variables: Vec<Variable>, cardinality: usize, data: T) -> Self {
        Self {
            data,
            variables: variables.into_iter().collect(),
            cardinality,
            position: 0,
        }
    }
}

/// Splits the operands into groups that transitively share variables. Both the groups and their
/// members keep the original order.
fn connected_components<T>(operands: Vec<Operand<T>>) -> Vec<Vec<Operand<T>>> {
    let mut components: Vec<(FxHashSet<Variable>, Vec<Operand<T>>)> = Vec::new();
    for (position, mut operand) in operands.into_iter().enumerate() {
        operand.position = position;
        let mut variables = operand.variables.clone();
        let mut members = vec![operand];

        // Absorb every existing component that overlaps the new operand. The first overlapping
        // component keeps its place.
        let mut insert_at = components.len();
        let mut i = 0;
        while i < components.len() {
            if components[i].0.is_disjoint(&variables) {
                i += 1;
                continue;
            }
            let (other_variables, other_members) = components.remove(i);
            variables.extend(other_variables);
            members.extend(other_members);
            insert_at = insert_at.min(i);
        }
        members.sort_by_key(|member| member.position);
        components.insert(insert_at.min(components.len()), (variables, members));
    }
    components.into_iter().map(|(_, members)| members).collect()
}

/// The original positions of a component in greedy order.
fn greedy_positions<T>(component: &[Operand<T>]) -> Vec<usize> {
    let mut remaining = (0..component.len()).collect::<Vec<_>>();
    let mut used_variables = FxHashSet::default();
    let mut result = Vec::with_capacity(component.len());
    while !remaining.is_empty() {
        let connected = remaining
            .iter()
            .enumerate()
            .filter(|&(_, &i)| {
                result.is_empty() || !component[i].variables.is_disjoint(&used_variables)
            })
            .min_by_key(|&(_, &i)| component[i].cardinality)
            .map(|(slot, _)| slot);
        // Falls back to the cheapest operand if none is connected, e.g., for operands without
        // variables.
        let slot = connected.unwrap_or_else(|| {
            remaining
                .iter()
                .enumerate()
                .min_by_key(|&(_, &i)| component[i].cardinality)
                .map_or(0, |(slot, _)| slot)
        });
        let next = remaining.remove(slot);
        used_variables.extend(component[next].variables.iter().cloned());
        result.push(component[next].position);
    }
    result
}

fn greedy_order<T>(component: Vec<Operand<T>>) -> Vec<Operand<T>> {
    let positions = greedy_positions(&component);
    let mut by_position = component
        .into_iter()
        .map(|operand| (operand.position, operand))
        .collect::<FxHashMap<_, _>>();
    positions
        .into_iter()
        .filter_map(|position| by_position.remove(&position))
        .collect()
}

/// Estimates the cost of joining two operands.
fn estimate_join_cardinality(left: usize, right: usize, common_variables: usize) -> usize {
    let common_variables = u32::try_from(common_variables).unwrap_or(u32::MAX);
    left.saturating_mul(right)
        .saturating_div(1_000_usize.saturating_pow(common_variables))
}

/// Estimates the number of solutions of an operator without any statistics.
fn estimate_cardinality(algebra: &Algebra) -> usize {
    match algebra {
        Algebra::Bgp { patterns } => {
            let mut variables = FxHashSet::default();
            let mut cardinality = 1;
            for pattern in patterns {
                let pattern_variables = pattern.variables();
                let common = pattern_variables
                    .iter()
                    .filter(|variable| variables.contains(*variable))
                    .count();
                cardinality = estimate_join_cardinality(
                    cardinality,
                    estimate_pattern_cardinality(pattern),
                    common,
                );
                variables.extend(pattern_variables);
            }
            cardinality
        }
        Algebra::Join { left, right } => {
            let left_variables = left.in_scope_variables();
            let common = right
                .in_scope_variables()
                .iter()
                .filter(|variable| left_variables.contains(variable))
                .count();
            estimate_join_cardinality(
                estimate_cardinality(left),
                estimate_cardinality(right),
                common,
            )
        }
        Algebra::Table { rows, .. } => rows.len(),
        _ => usize::MAX,
    }
}

/// Estimates the cardinality of a single triple pattern from the positions that are bound.
fn estimate_pattern_cardinality(pattern: &TriplePattern) -> usize {
    match (
        pattern.subject.is_constant(),
        pattern.predicate.is_constant(),
        pattern.object.is_constant(),
    ) {
        (true, true, true) => 1,
        (true, true, false) => 10,
        (true, false, true) => 2,
        (false, true, true) => 10_000,
        (true, false, false) => 100,
        (false, false, false) => 1_000_000_000,
        (false, true, false) => 1_000_000,
        (false, false, true) => 100_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse_algebra;
    use insta::assert_snapshot;

    fn rewrite(input: &str) -> Transformed<Algebra> {
        JoinReorderingRule::new().rewrite(parse_algebra(input).unwrap())
    }

    #[test]
    fn selective_patterns_go_first() {
        let result = rewrite(
            "(bgp
               (triple ?s ?p ?o)
               (triple ?s <http://e/p> ?x)
               (triple <http://e/a> <http://e/q> ?s))",
        );
        assert!(result.transformed);
        assert_snapshot!(result.data, @"(bgp (triple <http://e/a> <http://e/q> ?s) (triple ?s <http://e/p> ?x) (triple ?s ?p ?o))");
    }

    #[test]
    fn ordered_patterns_are_kept() {
        let result =
            rewrite("(bgp (triple <http://e/a> <http://e/p> ?x) (triple ?x <http://e/p> ?y))");
        assert!(!result.transformed);
    }

    #[test]
    fn joins_are_grouped_by_shared_variables() {
        let result = rewrite(
            "(join
               (join
                 (bgp (triple ?a <http://e/p> ?b))
                 (bgp (triple ?c <http://e/q> <http://e/o>)))
               (bgp (triple ?b <http://e/r> <http://e/o2>)))",
        );
        assert!(result.transformed);
        assert_snapshot!(result.data, @r"
        (join
          (join
            (bgp (triple ?b <http://e/r> <http://e/o2>))
            (bgp (triple ?a <http://e/p> ?b)))
          (bgp (triple ?c <http://e/q> <http://e/o>)))
        ");
    }

    #[test]
    fn left_joins_are_not_reordered() {
        let result = rewrite(
            "(leftjoin
               (bgp (triple ?a <http://e/p> ?b))
               (bgp (triple <http://e/s> <http://e/p> ?b)))",
        );
        assert!(!result.transformed);
    }

    #[test]
    fn patterns_below_a_slice_keep_their_order() {
        let result = rewrite(
            "(slice 0 1
               (join
                 (bgp (triple ?s ?p ?o) (triple ?s <http://e/q> ?z))
                 (bgp (triple <http://e/a> <http://e/r> ?s))))",
        );
        assert!(!result.transformed);
    }

    #[test]
    fn patterns_below_an_ordered_slice_are_reordered() {
        let result = rewrite(
            "(slice 0 1
               (order (?z)
                 (bgp (triple ?s ?p ?o) (triple ?s <http://e/q> ?z))))",
        );
        assert!(result.transformed);
        assert_snapshot!(result.data, @r"
        (slice _ 1
          (order (?z)
            (bgp (triple ?s <http://e/q> ?z) (triple ?s ?p ?o))))
        ");
    }

    #[test]
    fn join_cost_divides_by_shared_variables() {
        assert_eq!(estimate_join_cardinality(10_000, 10_000, 1), 100_000);
        assert_eq!(estimate_join_cardinality(10, 10, 0), 100);
        assert_eq!(estimate_join_cardinality(usize::MAX, 2, 0), usize::MAX);
    }
}
