use crate::TypedValue;
use oxrdf::Term;
use std::cmp::Ordering;

/// Total order on (possibly unbound) terms used by `ORDER BY`, `MIN` and `MAX`.
///
/// Unbound values come first, followed by blank nodes, IRIs and literals. Literals are compared by
/// value where the SPARQL operators define an order (numbers, strings, dates, ...). Remaining ties
/// are broken by lexical form, datatype and language tag so that the order is total.
pub fn compare_terms(lhs: Option<&Term>, rhs: Option<&Term>) -> Ordering {
    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => compare_bound_terms(lhs, rhs),
    }
}

fn compare_bound_terms(lhs: &Term, rhs: &Term) -> Ordering {
    match (lhs, rhs) {
        (Term::BlankNode(a), Term::BlankNode(b)) => a.as_str().cmp(b.as_str()),
        (Term::BlankNode(_), _) => Ordering::Less,
        (_, Term::BlankNode(_)) => Ordering::Greater,
        (Term::NamedNode(a), Term::NamedNode(b)) => a.as_str().cmp(b.as_str()),
        (Term::NamedNode(_), _) => Ordering::Less,
        (_, Term::NamedNode(_)) => Ordering::Greater,
        (Term::Literal(a), Term::Literal(b)) => {
            let value_order = TypedValue::from_literal(a.clone())
                .partial_cmp_values(&TypedValue::from_literal(b.clone()));
            value_order.unwrap_or_else(|| {
                (a.value(), a.datatype(), a.language()).cmp(&(
                    b.value(),
                    b.datatype(),
                    b.language(),
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode};

    #[test]
    fn unbound_blank_iri_literal() {
        let blank = Term::from(BlankNode::new_unchecked("b"));
        let iri = Term::from(NamedNode::new_unchecked("http://example.com/a"));
        let literal = Term::from(Literal::from(1_i64));

        assert_eq!(compare_terms(None, Some(&blank)), Ordering::Less);
        assert_eq!(compare_terms(Some(&blank), Some(&iri)), Ordering::Less);
        assert_eq!(compare_terms(Some(&iri), Some(&literal)), Ordering::Less);
        assert_eq!(compare_terms(Some(&literal), None), Ordering::Greater);
    }

    #[test]
    fn numbers_are_compared_by_value() {
        let two = Term::from(Literal::from(2_i64));
        let ten = Term::from(Literal::from(10_i64));
        assert_eq!(compare_terms(Some(&two), Some(&ten)), Ordering::Less);
    }
}
