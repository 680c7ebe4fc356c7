//! The SPARQL S-Expression (SSE) notation of the algebra.
//!
//! The reader accepts `(prefix ((ex: <http://example.com/>)) ...)` and `(base <iri> ...)`
//! wrappers, the `a` shorthand for `rdf:type` in predicate position and bare numbers and booleans.
//! The writer produces text that the reader maps back to an equal value.

mod lexer;
mod reader;
mod writer;

pub use reader::{parse_algebra, parse_expression, parse_query, parse_update};
pub(crate) use writer::write_algebra;

use crate::error::SseParseError;
use crate::{Algebra, Expression, Query, Update};
use std::str::FromStr;

impl FromStr for Algebra {
    type Err = SseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_algebra(s)
    }
}

impl FromStr for Expression {
    type Err = SseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_expression(s)
    }
}

impl FromStr for Query {
    type Err = SseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_query(s)
    }
}

impl FromStr for Update {
    type Err = SseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_update(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::TermPattern;
    use crate::update::UpdateOperation;
    use insta::assert_snapshot;

    fn round_trip(input: &str) -> Algebra {
        let algebra = parse_algebra(input).unwrap();
        let reparsed = parse_algebra(&algebra.to_string()).unwrap();
        assert_eq!(algebra, reparsed);
        algebra
    }

    #[test]
    fn prefixes_are_expanded() {
        let algebra = round_trip(
            "(prefix ((ex: <http://example.com/>))
               (project (?s)
                 (filter (> ?o 10)
                   (bgp (triple ?s ex:p ?o) (triple ?s a ex:C)))))",
        );
        assert_snapshot!(algebra, @r"
        (project (?s)
          (filter (> ?o 10)
            (bgp (triple ?s <http://example.com/p> ?o) (triple ?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.com/C>))))
        ");
    }

    #[test]
    fn nary_join_is_right_nested() {
        let algebra = round_trip(
            "(join (bgp (triple ?a <http://e/p> ?b)) (table unit) (bgp (triple ?b <http://e/q> ?c)))",
        );
        assert_snapshot!(algebra, @r"
        (join
          (bgp (triple ?a <http://e/p> ?b))
          (join
            (table unit)
            (bgp (triple ?b <http://e/q> ?c))))
        ");
    }

    #[test]
    fn group_order_and_slice() {
        let algebra = round_trip(
            r#"(slice 1 _
                 (order ((desc ?c) ?k)
                   (group (?k) ((?c (count distinct ?v)) (?l (group_concat (separator ", ") ?v)))
                     (bgp (triple ?k <http://e/p> ?v)))))"#,
        );
        assert_snapshot!(algebra, @r#"
        (slice 1 _
          (order ((desc ?c) ?k)
            (group (?k) ((?c (count distinct ?v)) (?l (group_concat (separator ", ") ?v)))
              (bgp (triple ?k <http://e/p> ?v)))))
        "#);
    }

    #[test]
    fn tables_and_exists() {
        let algebra = round_trip(
            r#"(filter (notexists (bgp (triple ?x <http://e/p> _:b)))
                 (table (vars ?x ?y) (row (?x 1)) (row (?x "a"@en) (?y <http://e/o>))))"#,
        );
        assert_snapshot!(algebra, @r#"
        (filter (notexists (bgp (triple ?x <http://e/p> _:b)))
          (table (vars ?x ?y)
            (row (?x 1))
            (row (?x "a"@en) (?y <http://e/o>))))
        "#);
    }

    #[test]
    fn paths() {
        let algebra = round_trip(
            "(path ?s (seq (path+ <http://e/p>) (notoneof <http://e/q> (reverse <http://e/r>))) ?o)",
        );
        assert_snapshot!(algebra, @"(path ?s (seq (path+ <http://e/p>) (notoneof <http://e/q> (reverse <http://e/r>))) ?o)");
    }

    #[test]
    fn expressions_fold_nary_operators() {
        let expression = parse_expression("(+ 1 2 3)").unwrap();
        assert_snapshot!(expression, @"(+ (+ 1 2) 3)");
        let expression = parse_expression("(- ?x)").unwrap();
        assert_snapshot!(expression, @"(- ?x)");
        let expression = parse_expression(r#"(notin ?x "a" "b")"#).unwrap();
        assert_snapshot!(expression, @r#"(notin ?x "a" "b")"#);
        let expression = parse_expression("(STRLEN ?x)").unwrap();
        assert_snapshot!(expression, @"(strlen ?x)");
    }

    #[test]
    fn builtin_arity_is_checked() {
        let error = parse_expression("(strlen ?x ?y)").unwrap_err();
        assert_eq!(error.position(), 0);
        assert!(parse_expression("(unknownfn ?x)").is_err());
        assert!(parse_expression("(bound 1)").is_err());
    }

    #[test]
    fn unknown_operators_and_prefixes_fail() {
        assert!(parse_algebra("(frobnicate (table unit))").is_err());
        let error = parse_algebra("(bgp (triple ?s ex:p ?o))").unwrap_err();
        assert!(error.message().contains("ex:"));
        assert!(parse_algebra("(bgp) trailing").is_err());
    }

    #[test]
    fn query_forms() {
        let query = parse_query(
            "(construct ((triple ?s <http://e/q> ?o)) (bgp (triple ?s <http://e/p> ?o)))",
        )
        .unwrap();
        assert_snapshot!(query, @r"
        (construct ((triple ?s <http://e/q> ?o))
          (bgp (triple ?s <http://e/p> ?o)))
        ");
        let query = parse_query("(describe (<http://e/a>) (table unit))").unwrap();
        let Query::Describe { resources, .. } = &query else {
            panic!("expected a describe query");
        };
        assert!(matches!(resources[0], TermPattern::NamedNode(_)));
        assert!(matches!(
            parse_query("(bgp)").unwrap(),
            Query::Select { .. }
        ));
    }

    #[test]
    fn updates() {
        let update = parse_update(
            r#"(update
                 (insertData (triple <http://e/s> <http://e/p> "o") (graph <http://e/g> (triple <http://e/s> <http://e/p> 1)))
                 (with <http://e/g> (modify (delete (triple ?s <http://e/p> ?o)) (bgp (triple ?s <http://e/p> ?o))))
                 (clear silent all))"#,
        )
        .unwrap();
        assert_eq!(update.operations.len(), 3);
        let UpdateOperation::InsertData { data } = &update.operations[0] else {
            panic!("expected insertData");
        };
        assert_eq!(data.len(), 2);
        let reparsed = parse_update(&update.to_string()).unwrap();
        assert_eq!(update, reparsed);
        assert!(parse_update("(insertData (triple ?s <http://e/p> 1))").is_err());
    }
}
