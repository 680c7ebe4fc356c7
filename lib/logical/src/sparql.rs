//! Translation of the queries and updates produced by the `spargebra` SPARQL parser.
//!
//! The translation is purely structural. Constructs without a counterpart in the algebra (custom
//! aggregates, RDF-star terms) yield [ValidationError::Unsupported].

use crate::algebra::{AggregateExpression, OrderExpression};
use crate::error::ValidationError;
use crate::path::NegatedMember;
use crate::pattern::{GraphNamePattern, NamedNodePattern, QuadPattern, TermPattern, TriplePattern};
use crate::query::QueryDataset;
use crate::update::{GraphTarget, Update, UpdateOperation};
use crate::{Algebra, Expression, PropertyPath, Query};
use rdf_algebra_functions::aggregates::AggregateFunction;
use rdf_algebra_functions::{BuiltinName, FunctionName};
use rdf_algebra_model::{BlankNode, GraphName, NamedOrBlankNode, Quad, Solution, Term, Variable};
use spargebra::algebra as sparql;
use spargebra::term as sparql_term;

type Result<T> = std::result::Result<T, ValidationError>;

impl TryFrom<&spargebra::Query> for Query {
    type Error = ValidationError;

    fn try_from(query: &spargebra::Query) -> Result<Self> {
        Ok(match query {
            spargebra::Query::Select {
                dataset,
                pattern,
                base_iri,
            } => Query::Select {
                dataset: dataset.as_ref().map(translate_dataset),
                pattern: translate_pattern(pattern)?,
                base_iri: base_iri.clone(),
            },
            spargebra::Query::Construct {
                template,
                dataset,
                pattern,
                base_iri,
            } => Query::Construct {
                template: template
                    .iter()
                    .map(translate_triple_pattern)
                    .collect::<Result<_>>()?,
                dataset: dataset.as_ref().map(translate_dataset),
                pattern: translate_pattern(pattern)?,
                base_iri: base_iri.clone(),
            },
            // The described resources are the projected variables of the pattern.
            spargebra::Query::Describe {
                dataset,
                pattern,
                base_iri,
            } => Query::Describe {
                resources: Vec::new(),
                dataset: dataset.as_ref().map(translate_dataset),
                pattern: translate_pattern(pattern)?,
                base_iri: base_iri.clone(),
            },
            spargebra::Query::Ask {
                dataset,
                pattern,
                base_iri,
            } => Query::Ask {
                dataset: dataset.as_ref().map(translate_dataset),
                pattern: translate_pattern(pattern)?,
                base_iri: base_iri.clone(),
            },
        })
    }
}

impl TryFrom<&spargebra::Update> for Update {
    type Error = ValidationError;

    fn try_from(update: &spargebra::Update) -> Result<Self> {
        Ok(Update {
            operations: update
                .operations
                .iter()
                .map(translate_update_operation)
                .collect::<Result<_>>()?,
            base_iri: update.base_iri.clone(),
        })
    }
}

fn translate_dataset(dataset: &sparql::QueryDataset) -> QueryDataset {
    QueryDataset {
        default: dataset
            .default
            .iter()
            .map(|graph| GraphName::NamedNode(graph.clone()))
            .collect(),
        named: dataset.named.as_ref().map(|named| {
            named
                .iter()
                .map(|graph| NamedOrBlankNode::NamedNode(graph.clone()))
                .collect()
        }),
    }
}

/// Translates a graph pattern. Blank nodes become hidden variables, see [blank_node_variable].
pub fn translate_pattern(pattern: &sparql::GraphPattern) -> Result<Algebra> {
    let translate = |inner: &sparql::GraphPattern| translate_pattern(inner).map(Box::new);
    Ok(match pattern {
        sparql::GraphPattern::Bgp { patterns } => Algebra::Bgp {
            patterns: patterns
                .iter()
                .map(translate_matched_triple_pattern)
                .collect::<Result<_>>()?,
        },
        sparql::GraphPattern::Path {
            subject,
            path,
            object,
        } => Algebra::Path {
            subject: translate_matched_term_pattern(subject)?,
            path: translate_path(path),
            object: translate_matched_term_pattern(object)?,
        },
        sparql::GraphPattern::Join { left, right } => Algebra::Join {
            left: translate(left)?,
            right: translate(right)?,
        },
        sparql::GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => Algebra::LeftJoin {
            left: translate(left)?,
            right: translate(right)?,
            expression: expression.as_ref().map(translate_expression).transpose()?,
        },
        sparql::GraphPattern::Filter { expr, inner } => Algebra::Filter {
            expression: translate_expression(expr)?,
            inner: translate(inner)?,
        },
        sparql::GraphPattern::Union { left, right } => Algebra::Union {
            left: translate(left)?,
            right: translate(right)?,
        },
        sparql::GraphPattern::Graph { name, inner } => Algebra::Graph {
            name: translate_named_node_pattern(name),
            inner: translate(inner)?,
        },
        sparql::GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => Algebra::Extend {
            inner: translate(inner)?,
            variable: variable.into(),
            expression: translate_expression(expression)?,
        },
        sparql::GraphPattern::Minus { left, right } => Algebra::Minus {
            left: translate(left)?,
            right: translate(right)?,
        },
        sparql::GraphPattern::Values {
            variables,
            bindings,
        } => {
            let variables = variables.iter().map(Variable::from).collect::<Vec<_>>();
            let rows = bindings
                .iter()
                .map(|row| {
                    let mut solution = Solution::new();
                    for (variable, value) in variables.iter().zip(row) {
                        if let Some(value) = value {
                            let _ = solution.unify(variable, &translate_ground_term(value)?);
                        }
                    }
                    Ok(solution)
                })
                .collect::<Result<_>>()?;
            Algebra::Table { variables, rows }
        }
        sparql::GraphPattern::OrderBy { inner, expression } => Algebra::OrderBy {
            inner: translate(inner)?,
            expressions: expression
                .iter()
                .map(|expression| {
                    Ok(match expression {
                        sparql::OrderExpression::Asc(inner) => {
                            OrderExpression::Asc(translate_expression(inner)?)
                        }
                        sparql::OrderExpression::Desc(inner) => {
                            OrderExpression::Desc(translate_expression(inner)?)
                        }
                    })
                })
                .collect::<Result<_>>()?,
        },
        sparql::GraphPattern::Project { inner, variables } => Algebra::Project {
            inner: translate(inner)?,
            variables: variables.iter().map(Variable::from).collect(),
        },
        sparql::GraphPattern::Distinct { inner } => Algebra::Distinct {
            inner: translate(inner)?,
        },
        sparql::GraphPattern::Reduced { inner } => Algebra::Reduced {
            inner: translate(inner)?,
        },
        sparql::GraphPattern::Slice {
            inner,
            start,
            length,
        } => Algebra::Slice {
            inner: translate(inner)?,
            start: *start,
            length: *length,
        },
        sparql::GraphPattern::Group {
            inner,
            variables,
            aggregates,
        } => Algebra::Group {
            inner: translate(inner)?,
            variables: variables.iter().map(Variable::from).collect(),
            aggregates: aggregates
                .iter()
                .map(|(variable, aggregate)| {
                    Ok((Variable::from(variable), translate_aggregate(aggregate)?))
                })
                .collect::<Result<_>>()?,
        },
        sparql::GraphPattern::Service {
            name,
            inner,
            silent,
        } => Algebra::Service {
            name: translate_named_node_pattern(name),
            inner: translate(inner)?,
            silent: *silent,
        },
        #[allow(unreachable_patterns)]
        other => {
            return Err(ValidationError::Unsupported(format!(
                "graph pattern {other}"
            )))
        }
    })
}

fn translate_aggregate(aggregate: &sparql::AggregateExpression) -> Result<AggregateExpression> {
    Ok(match aggregate {
        sparql::AggregateExpression::CountSolutions { distinct } => AggregateExpression {
            function: AggregateFunction::Count,
            distinct: *distinct,
            expression: None,
        },
        sparql::AggregateExpression::FunctionCall {
            name,
            expr,
            distinct,
        } => AggregateExpression {
            function: match name {
                sparql::AggregateFunction::Count => AggregateFunction::Count,
                sparql::AggregateFunction::Sum => AggregateFunction::Sum,
                sparql::AggregateFunction::Avg => AggregateFunction::Avg,
                sparql::AggregateFunction::Min => AggregateFunction::Min,
                sparql::AggregateFunction::Max => AggregateFunction::Max,
                sparql::AggregateFunction::Sample => AggregateFunction::Sample,
                sparql::AggregateFunction::GroupConcat { separator } => {
                    AggregateFunction::GroupConcat {
                        separator: separator.clone(),
                    }
                }
                sparql::AggregateFunction::Custom(name) => {
                    return Err(ValidationError::Unsupported(format!(
                        "custom aggregate function {name}"
                    )))
                }
            },
            distinct: *distinct,
            expression: Some(translate_expression(expr)?),
        },
    })
}

fn translate_expression(expression: &sparql::Expression) -> Result<Expression> {
    let boxed = |inner: &sparql::Expression| translate_expression(inner).map(Box::new);
    let all = |args: &[sparql::Expression]| {
        args.iter()
            .map(translate_expression)
            .collect::<Result<Vec<_>>>()
    };
    Ok(match expression {
        sparql::Expression::NamedNode(node) => Expression::Term(node.clone().into()),
        sparql::Expression::Literal(literal) => Expression::Term(literal.clone().into()),
        sparql::Expression::Variable(variable) => Expression::Variable(variable.into()),
        sparql::Expression::Or(lhs, rhs) => Expression::Or(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::And(lhs, rhs) => Expression::And(boxed(lhs)?, boxed(rhs)?),
        // `!=` is parsed as the negation of `=`.
        sparql::Expression::Not(inner) => match inner.as_ref() {
            sparql::Expression::Equal(lhs, rhs) => Expression::NotEqual(boxed(lhs)?, boxed(rhs)?),
            inner => Expression::Not(boxed(inner)?),
        },
        sparql::Expression::Equal(lhs, rhs) => Expression::Equal(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::SameTerm(lhs, rhs) => Expression::SameTerm(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::Greater(lhs, rhs) => Expression::Greater(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::GreaterOrEqual(lhs, rhs) => {
            Expression::GreaterOrEqual(boxed(lhs)?, boxed(rhs)?)
        }
        sparql::Expression::Less(lhs, rhs) => Expression::Less(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::LessOrEqual(lhs, rhs) => {
            Expression::LessOrEqual(boxed(lhs)?, boxed(rhs)?)
        }
        sparql::Expression::In(lhs, list) => Expression::In(boxed(lhs)?, all(list)?),
        sparql::Expression::Add(lhs, rhs) => Expression::Add(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::Subtract(lhs, rhs) => Expression::Subtract(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::Multiply(lhs, rhs) => Expression::Multiply(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::Divide(lhs, rhs) => Expression::Divide(boxed(lhs)?, boxed(rhs)?),
        sparql::Expression::UnaryPlus(inner) => Expression::UnaryPlus(boxed(inner)?),
        sparql::Expression::UnaryMinus(inner) => Expression::UnaryMinus(boxed(inner)?),
        sparql::Expression::Exists(pattern) => {
            Expression::Exists(Box::new(translate_pattern(pattern)?))
        }
        sparql::Expression::Bound(variable) => Expression::Bound(variable.into()),
        sparql::Expression::If(test, if_true, if_false) => {
            Expression::If(boxed(test)?, boxed(if_true)?, boxed(if_false)?)
        }
        sparql::Expression::Coalesce(args) => Expression::Coalesce(all(args)?),
        sparql::Expression::FunctionCall(function, args) => {
            Expression::FunctionCall(translate_function(function)?, all(args)?)
        }
    })
}

fn translate_function(function: &sparql::Function) -> Result<FunctionName> {
    let builtin = match function {
        sparql::Function::Str => BuiltinName::Str,
        sparql::Function::Lang => BuiltinName::Lang,
        sparql::Function::LangMatches => BuiltinName::LangMatches,
        sparql::Function::Datatype => BuiltinName::Datatype,
        sparql::Function::Iri => BuiltinName::Iri,
        sparql::Function::BNode => BuiltinName::BNode,
        sparql::Function::Rand => BuiltinName::Rand,
        sparql::Function::Abs => BuiltinName::Abs,
        sparql::Function::Ceil => BuiltinName::Ceil,
        sparql::Function::Floor => BuiltinName::Floor,
        sparql::Function::Round => BuiltinName::Round,
        sparql::Function::Concat => BuiltinName::Concat,
        sparql::Function::SubStr => BuiltinName::SubStr,
        sparql::Function::StrLen => BuiltinName::StrLen,
        sparql::Function::Replace => BuiltinName::Replace,
        sparql::Function::UCase => BuiltinName::UCase,
        sparql::Function::LCase => BuiltinName::LCase,
        sparql::Function::EncodeForUri => BuiltinName::EncodeForUri,
        sparql::Function::Contains => BuiltinName::Contains,
        sparql::Function::StrStarts => BuiltinName::StrStarts,
        sparql::Function::StrEnds => BuiltinName::StrEnds,
        sparql::Function::StrBefore => BuiltinName::StrBefore,
        sparql::Function::StrAfter => BuiltinName::StrAfter,
        sparql::Function::Year => BuiltinName::Year,
        sparql::Function::Month => BuiltinName::Month,
        sparql::Function::Day => BuiltinName::Day,
        sparql::Function::Hours => BuiltinName::Hours,
        sparql::Function::Minutes => BuiltinName::Minutes,
        sparql::Function::Seconds => BuiltinName::Seconds,
        sparql::Function::Timezone => BuiltinName::Timezone,
        sparql::Function::Tz => BuiltinName::Tz,
        sparql::Function::Now => BuiltinName::Now,
        sparql::Function::Uuid => BuiltinName::Uuid,
        sparql::Function::StrUuid => BuiltinName::StrUuid,
        sparql::Function::Md5 => BuiltinName::Md5,
        sparql::Function::Sha1 => BuiltinName::Sha1,
        sparql::Function::Sha256 => BuiltinName::Sha256,
        sparql::Function::Sha384 => BuiltinName::Sha384,
        sparql::Function::Sha512 => BuiltinName::Sha512,
        sparql::Function::StrLang => BuiltinName::StrLang,
        sparql::Function::StrDt => BuiltinName::StrDt,
        sparql::Function::IsIri => BuiltinName::IsIri,
        sparql::Function::IsBlank => BuiltinName::IsBlank,
        sparql::Function::IsLiteral => BuiltinName::IsLiteral,
        sparql::Function::IsNumeric => BuiltinName::IsNumeric,
        sparql::Function::Regex => BuiltinName::Regex,
        sparql::Function::Custom(name) => return Ok(FunctionName::Custom(name.clone())),
        #[allow(unreachable_patterns)]
        other => return Err(ValidationError::Unsupported(format!("function {other}"))),
    };
    Ok(FunctionName::Builtin(builtin))
}

fn translate_path(path: &sparql::PropertyPathExpression) -> PropertyPath {
    match path {
        sparql::PropertyPathExpression::NamedNode(node) => PropertyPath::Link(node.clone()),
        sparql::PropertyPathExpression::Reverse(inner) => {
            PropertyPath::inverse(translate_path(inner))
        }
        sparql::PropertyPathExpression::Sequence(lhs, rhs) => {
            PropertyPath::sequence(translate_path(lhs), translate_path(rhs))
        }
        sparql::PropertyPathExpression::Alternative(lhs, rhs) => {
            PropertyPath::alternative(translate_path(lhs), translate_path(rhs))
        }
        sparql::PropertyPathExpression::ZeroOrMore(inner) => {
            PropertyPath::ZeroOrMore(Box::new(translate_path(inner)))
        }
        sparql::PropertyPathExpression::OneOrMore(inner) => {
            PropertyPath::OneOrMore(Box::new(translate_path(inner)))
        }
        sparql::PropertyPathExpression::ZeroOrOne(inner) => {
            PropertyPath::ZeroOrOne(Box::new(translate_path(inner)))
        }
        // The parser splits `!(^a|b)` into an alternative of a forward and a reversed set.
        sparql::PropertyPathExpression::NegatedPropertySet(members) => {
            PropertyPath::NegatedPropertySet(
                members
                    .iter()
                    .map(|member| NegatedMember::Forward(member.clone()))
                    .collect(),
            )
        }
    }
}

fn translate_triple_pattern(pattern: &sparql_term::TriplePattern) -> Result<TriplePattern> {
    Ok(TriplePattern {
        subject: translate_term_pattern(&pattern.subject)?,
        predicate: translate_named_node_pattern(&pattern.predicate),
        object: translate_term_pattern(&pattern.object)?,
    })
}

/// Translates a triple pattern of a graph pattern, as opposed to a template.
fn translate_matched_triple_pattern(
    pattern: &sparql_term::TriplePattern,
) -> Result<TriplePattern> {
    Ok(TriplePattern {
        subject: translate_matched_term_pattern(&pattern.subject)?,
        predicate: translate_named_node_pattern(&pattern.predicate),
        object: translate_matched_term_pattern(&pattern.object)?,
    })
}

fn translate_matched_term_pattern(pattern: &sparql_term::TermPattern) -> Result<TermPattern> {
    match pattern {
        sparql_term::TermPattern::BlankNode(node) => {
            Ok(TermPattern::Variable(blank_node_variable(node)))
        }
        _ => translate_term_pattern(pattern),
    }
}

/// A SPARQL blank node label is scoped to its whole group graph pattern, which the parser may
/// split into several joined patterns (e.g. around property paths). It is therefore matched as
/// a distinguished variable that the enclosing projection drops. SPARQL variable names cannot
/// contain `-`, so the name never clashes with a variable of the query.
fn blank_node_variable(node: &BlankNode) -> Variable {
    Variable::new(format!("bnode-{}", node.as_str()))
}

fn translate_term_pattern(pattern: &sparql_term::TermPattern) -> Result<TermPattern> {
    Ok(match pattern {
        sparql_term::TermPattern::NamedNode(node) => TermPattern::NamedNode(node.clone()),
        sparql_term::TermPattern::BlankNode(node) => TermPattern::BlankNode(node.clone()),
        sparql_term::TermPattern::Literal(literal) => TermPattern::Literal(literal.clone()),
        sparql_term::TermPattern::Variable(variable) => TermPattern::Variable(variable.into()),
        #[allow(unreachable_patterns)]
        other => return Err(ValidationError::Unsupported(format!("term pattern {other}"))),
    })
}

fn translate_named_node_pattern(pattern: &sparql_term::NamedNodePattern) -> NamedNodePattern {
    match pattern {
        sparql_term::NamedNodePattern::NamedNode(node) => NamedNodePattern::NamedNode(node.clone()),
        sparql_term::NamedNodePattern::Variable(variable) => {
            NamedNodePattern::Variable(variable.into())
        }
    }
}

fn translate_ground_term(term: &sparql_term::GroundTerm) -> Result<Term> {
    Ok(match term {
        sparql_term::GroundTerm::NamedNode(node) => node.clone().into(),
        sparql_term::GroundTerm::Literal(literal) => literal.clone().into(),
        #[allow(unreachable_patterns)]
        other => return Err(ValidationError::Unsupported(format!("term {other}"))),
    })
}

fn translate_graph_name(graph_name: &sparql_term::GraphName) -> GraphName {
    match graph_name {
        sparql_term::GraphName::NamedNode(node) => GraphName::NamedNode(node.clone()),
        sparql_term::GraphName::DefaultGraph => GraphName::DefaultGraph,
    }
}

fn translate_graph_name_pattern(pattern: &sparql_term::GraphNamePattern) -> GraphNamePattern {
    match pattern {
        sparql_term::GraphNamePattern::NamedNode(node) => GraphNamePattern::NamedNode(node.clone()),
        sparql_term::GraphNamePattern::DefaultGraph => GraphNamePattern::DefaultGraph,
        sparql_term::GraphNamePattern::Variable(variable) => {
            GraphNamePattern::Variable(variable.into())
        }
    }
}

fn translate_quad_pattern(pattern: &sparql_term::QuadPattern) -> Result<QuadPattern> {
    Ok(QuadPattern {
        subject: translate_term_pattern(&pattern.subject)?,
        predicate: translate_named_node_pattern(&pattern.predicate),
        object: translate_term_pattern(&pattern.object)?,
        graph_name: translate_graph_name_pattern(&pattern.graph_name),
    })
}

fn translate_ground_term_pattern(pattern: &sparql_term::GroundTermPattern) -> Result<TermPattern> {
    Ok(match pattern {
        sparql_term::GroundTermPattern::NamedNode(node) => TermPattern::NamedNode(node.clone()),
        sparql_term::GroundTermPattern::Literal(literal) => TermPattern::Literal(literal.clone()),
        sparql_term::GroundTermPattern::Variable(variable) => {
            TermPattern::Variable(variable.into())
        }
        #[allow(unreachable_patterns)]
        other => return Err(ValidationError::Unsupported(format!("term pattern {other}"))),
    })
}

fn translate_update_operation(
    operation: &spargebra::GraphUpdateOperation,
) -> Result<UpdateOperation> {
    Ok(match operation {
        spargebra::GraphUpdateOperation::InsertData { data } => UpdateOperation::InsertData {
            data: data
                .iter()
                .map(|quad| {
                    Quad::new(
                        quad.subject.clone(),
                        quad.predicate.clone(),
                        quad.object.clone(),
                        translate_graph_name(&quad.graph_name),
                    )
                })
                .collect(),
        },
        spargebra::GraphUpdateOperation::DeleteData { data } => UpdateOperation::DeleteData {
            data: data
                .iter()
                .map(|quad| {
                    let subject = match &quad.subject {
                        sparql_term::GroundSubject::NamedNode(node) => node.clone(),
                        #[allow(unreachable_patterns)]
                        other => {
                            return Err(ValidationError::Unsupported(format!(
                                "subject {other}"
                            )))
                        }
                    };
                    Ok(Quad::new(
                        subject,
                        quad.predicate.clone(),
                        translate_ground_term(&quad.object)?,
                        translate_graph_name(&quad.graph_name),
                    ))
                })
                .collect::<Result<_>>()?,
        },
        spargebra::GraphUpdateOperation::DeleteInsert {
            delete,
            insert,
            using,
            pattern,
        } => {
            let delete_insert = UpdateOperation::DeleteInsert {
                delete: delete
                    .iter()
                    .map(|pattern| {
                        Ok(QuadPattern {
                            subject: translate_ground_term_pattern(&pattern.subject)?,
                            predicate: translate_named_node_pattern(&pattern.predicate),
                            object: translate_ground_term_pattern(&pattern.object)?,
                            graph_name: translate_graph_name_pattern(&pattern.graph_name),
                        })
                    })
                    .collect::<Result<_>>()?,
                insert: insert
                    .iter()
                    .map(translate_quad_pattern)
                    .collect::<Result<_>>()?,
                pattern: Box::new(translate_pattern(pattern)?),
            };
            match using {
                Some(dataset) => UpdateOperation::Using {
                    dataset: translate_dataset(dataset),
                    operation: Box::new(delete_insert),
                },
                None => delete_insert,
            }
        }
        spargebra::GraphUpdateOperation::Load {
            silent,
            source,
            destination,
        } => UpdateOperation::Load {
            silent: *silent,
            source: source.clone(),
            destination: translate_graph_name(destination),
        },
        spargebra::GraphUpdateOperation::Clear { silent, graph } => UpdateOperation::Clear {
            silent: *silent,
            graph: translate_graph_target(graph),
        },
        spargebra::GraphUpdateOperation::Create { silent, graph } => UpdateOperation::Create {
            silent: *silent,
            graph: graph.clone(),
        },
        spargebra::GraphUpdateOperation::Drop { silent, graph } => UpdateOperation::Drop {
            silent: *silent,
            graph: translate_graph_target(graph),
        },
    })
}

fn translate_graph_target(target: &sparql::GraphTarget) -> GraphTarget {
    match target {
        sparql::GraphTarget::NamedNode(node) => GraphTarget::NamedNode(node.clone()),
        sparql::GraphTarget::DefaultGraph => GraphTarget::DefaultGraph,
        sparql::GraphTarget::NamedGraphs => GraphTarget::NamedGraphs,
        sparql::GraphTarget::AllGraphs => GraphTarget::AllGraphs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse_algebra;
    use crate::validate::validate_query;

    fn query(sparql: &str) -> Query {
        let parsed = spargebra::Query::parse(sparql, None).unwrap();
        Query::try_from(&parsed).unwrap()
    }

    #[test]
    fn select_with_filter_and_optional() {
        let query = query(
            "SELECT ?s ?w WHERE {
               ?s <http://e/p> ?v OPTIONAL { ?v <http://e/q> ?w } FILTER(?v != 2)
             }",
        );
        assert_eq!(
            query.pattern(),
            &parse_algebra(
                "(project (?s ?w)
                   (filter (!= ?v 2)
                     (leftjoin
                       (bgp (triple ?s <http://e/p> ?v))
                       (bgp (triple ?v <http://e/q> ?w)))))"
            )
            .unwrap()
        );
    }

    #[test]
    fn aggregates_and_paths() {
        let query = query(
            "SELECT (COUNT(*) AS ?c) WHERE { ?s <http://e/p>+ ?o } GROUP BY ?s",
        );
        let Query::Select { pattern, .. } = &query else {
            panic!("expected a select query");
        };
        let text = pattern.to_string();
        assert!(text.contains("(count)"), "{text}");
        assert!(text.contains("(path+ <http://e/p>)"), "{text}");
    }

    #[test]
    fn ask_and_describe() {
        assert!(matches!(
            query("ASK { <http://e/a> <http://e/p> 1 }"),
            Query::Ask { .. }
        ));
        let Query::Describe { resources, .. } = query("DESCRIBE <http://e/a>") else {
            panic!("expected a describe query");
        };
        assert!(resources.is_empty());
    }

    #[test]
    fn blank_nodes_are_shared_between_paths_and_triples() {
        let query = query("SELECT ?x ?y WHERE { _:b <http://e/p>+ ?x . _:b <http://e/r> ?y }");
        let pattern = query.pattern();
        let text = pattern.to_string();
        assert!(text.contains("(triple ?bnode-b <http://e/r> ?y)"), "{text}");
        assert!(!text.contains("_:b"), "{text}");
        assert_eq!(&parse_algebra(&text).unwrap(), pattern);
        validate_query(&query).unwrap();
    }

    #[test]
    fn template_blank_nodes_are_kept() {
        let Query::Construct { template, .. } =
            query("CONSTRUCT { _:n <http://e/p> ?o } WHERE { _:b <http://e/p> ?o }")
        else {
            panic!("expected a construct query");
        };
        assert!(matches!(template[0].subject, TermPattern::BlankNode(_)));
    }

    #[test]
    fn custom_aggregates_are_unsupported() {
        let pattern = sparql::GraphPattern::Group {
            inner: Box::new(sparql::GraphPattern::Bgp { patterns: Vec::new() }),
            variables: Vec::new(),
            aggregates: vec![(
                sparql_term::Variable::new_unchecked("a"),
                sparql::AggregateExpression::FunctionCall {
                    name: sparql::AggregateFunction::Custom(sparql_term::NamedNode::new_unchecked(
                        "http://e/agg",
                    )),
                    expr: sparql::Expression::Variable(sparql_term::Variable::new_unchecked("o")),
                    distinct: false,
                },
            )],
        };
        assert!(matches!(
            translate_pattern(&pattern),
            Err(ValidationError::Unsupported(_))
        ));
    }

    #[test]
    fn updates() {
        let parsed = spargebra::Update::parse(
            "INSERT DATA { <http://e/s> <http://e/p> 1 } ;
             DELETE { ?s <http://e/p> ?o } WHERE { ?s <http://e/p> ?o } ;
             CLEAR SILENT NAMED",
            None,
        )
        .unwrap();
        let update = Update::try_from(&parsed).unwrap();
        assert_eq!(update.operations.len(), 3);
        assert!(matches!(update.operations[0], UpdateOperation::InsertData { .. }));
        assert!(matches!(update.operations[1], UpdateOperation::DeleteInsert { .. }));
        assert_eq!(
            update.operations[2],
            UpdateOperation::Clear {
                silent: true,
                graph: GraphTarget::NamedGraphs
            }
        );
    }
}
