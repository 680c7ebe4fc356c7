use super::lexer::{parse_document, Atom, LiteralSuffix, Sexp};
use crate::algebra::{AggregateExpression, OrderExpression};
use crate::error::SseParseError;
use crate::path::NegatedMember;
use crate::pattern::{GraphNamePattern, NamedNodePattern, QuadPattern, TermPattern, TriplePattern};
use crate::query::QueryDataset;
use crate::transform::to_binary;
use crate::update::{GraphTarget, Update, UpdateOperation};
use crate::{Algebra, Expression, PropertyPath, Query};
use rdf_algebra_functions::aggregates::AggregateFunction;
use rdf_algebra_functions::{BuiltinName, FunctionName};
use rdf_algebra_model::vocab::{rdf, xsd};
use rdf_algebra_model::{
    BlankNode, Decimal, Double, GraphName, Integer, Iri, Literal, NamedNode, NamedOrBlankNode,
    Quad, Solution, Subject, Term, Variable,
};
use rustc_hash::FxHashMap;
use std::str::FromStr;

type Result<T> = std::result::Result<T, SseParseError>;

/// Reads an operator tree.
pub fn parse_algebra(input: &str) -> Result<Algebra> {
    Context::default().algebra(&parse_document(input)?)
}

/// Reads a query. A bare operator tree is a `SELECT` query.
pub fn parse_query(input: &str) -> Result<Query> {
    Context::default().query(&parse_document(input)?)
}

/// Reads an update, either `(update op...)` or a single operation.
pub fn parse_update(input: &str) -> Result<Update> {
    Context::default().update(&parse_document(input)?)
}

pub fn parse_expression(input: &str) -> Result<Expression> {
    Context::default().expression(&parse_document(input)?)
}

/// The prefixes and the base IRI in scope.
#[derive(Debug, Clone, Default)]
struct Context {
    prefixes: FxHashMap<String, String>,
    base_iri: Option<Iri<String>>,
}

/// Splits a list into its operator name and its arguments.
fn operator(sexp: &Sexp) -> Option<(&str, &[Sexp])> {
    match sexp {
        Sexp::List(items, _) => {
            let (head, args) = items.split_first()?;
            Some((head.as_symbol()?, args))
        }
        Sexp::Atom(..) => None,
    }
}

fn list<'a>(sexp: &'a Sexp, what: &str) -> Result<&'a [Sexp]> {
    match sexp {
        Sexp::List(items, _) => Ok(items),
        Sexp::Atom(..) => Err(sexp.error(format!("Expected {what}"))),
    }
}

fn check_arity(sexp: &Sexp, name: &str, args: &[Sexp], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        return Err(sexp.error(format!(
            "{name} expects {expected} operands, got {}",
            args.len()
        )));
    }
    Ok(())
}

/// Strips a leading `silent` keyword.
fn silent(args: &[Sexp]) -> (bool, &[Sexp]) {
    match args.split_first() {
        Some((first, rest)) if first.as_symbol() == Some("silent") => (true, rest),
        _ => (false, args),
    }
}

impl Context {
    /// Evaluates `(prefix ...)` and `(base ...)` wrappers and calls `inner` on the wrapped form.
    fn scoped<T>(
        &self,
        sexp: &Sexp,
        inner: impl Fn(&Context, &Sexp) -> Result<T>,
    ) -> Result<Option<T>> {
        let Some((name, args)) = operator(sexp) else {
            return Ok(None);
        };
        match name {
            "prefix" => {
                check_arity(sexp, name, args, 2, 2)?;
                let mut context = self.clone();
                for binding in list(&args[0], "a list of prefix bindings")? {
                    let items = list(binding, "a prefix binding")?;
                    let [Sexp::Atom(Atom::PrefixedName(prefix, local), _), iri] = items else {
                        return Err(binding.error("Expected a binding of the form (p: <iri>)"));
                    };
                    if !local.is_empty() {
                        return Err(binding.error("A prefix must end with ':'"));
                    }
                    let iri = self.named_node(iri)?;
                    context.prefixes.insert(prefix.clone(), iri.into_string());
                }
                inner(&context, &args[1]).map(Some)
            }
            "base" => {
                check_arity(sexp, name, args, 2, 2)?;
                let iri = self.named_node(&args[0])?;
                let mut context = self.clone();
                context.base_iri = Some(
                    Iri::parse(iri.into_string())
                        .map_err(|e| args[0].error(format!("Invalid base IRI: {e}")))?,
                );
                inner(&context, &args[1]).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn resolve_iri(&self, sexp: &Sexp, iri: &str) -> Result<NamedNode> {
        let resolved = match &self.base_iri {
            Some(base) => base.resolve(iri).map(Iri::into_inner),
            None => Iri::parse(iri.to_owned()).map(Iri::into_inner),
        };
        resolved
            .map(NamedNode::new_unchecked)
            .map_err(|e| sexp.error(format!("Invalid IRI <{iri}>: {e}")))
    }

    fn atom_named_node(&self, sexp: &Sexp, atom: &Atom) -> Result<NamedNode> {
        match atom {
            Atom::Iri(iri) => self.resolve_iri(sexp, iri),
            Atom::PrefixedName(prefix, local) => {
                let Some(namespace) = self.prefixes.get(prefix) else {
                    return Err(sexp.error(format!("Undefined prefix '{prefix}:'")));
                };
                NamedNode::new(format!("{namespace}{local}"))
                    .map_err(|e| sexp.error(format!("Invalid IRI {prefix}:{local}: {e}")))
            }
            _ => Err(sexp.error("Expected an IRI")),
        }
    }

    fn named_node(&self, sexp: &Sexp) -> Result<NamedNode> {
        match sexp {
            Sexp::Atom(atom, _) => self.atom_named_node(sexp, atom),
            Sexp::List(..) => Err(sexp.error("Expected an IRI")),
        }
    }

    fn variable(sexp: &Sexp) -> Result<Variable> {
        match sexp {
            Sexp::Atom(
                Atom::Variable {
                    name,
                    distinguished,
                },
                _,
            ) => Ok(if *distinguished {
                Variable::new(name.clone())
            } else {
                Variable::non_distinguished(name.clone())
            }),
            _ => Err(sexp.error("Expected a variable")),
        }
    }

    fn variables(sexp: &Sexp) -> Result<Vec<Variable>> {
        list(sexp, "a list of variables")?
            .iter()
            .map(Self::variable)
            .collect()
    }

    fn term(&self, sexp: &Sexp) -> Result<Term> {
        let Sexp::Atom(atom, _) = sexp else {
            return Err(sexp.error("Expected an RDF term"));
        };
        Ok(match atom {
            Atom::Iri(_) | Atom::PrefixedName(..) => self.atom_named_node(sexp, atom)?.into(),
            Atom::BlankNode(label) => BlankNode::new(label.clone())
                .map_err(|e| sexp.error(format!("Invalid blank node label: {e}")))?
                .into(),
            Atom::Literal { value, suffix } => match suffix {
                LiteralSuffix::None => Literal::new_simple_literal(value.clone()),
                LiteralSuffix::Language(language) => {
                    Literal::new_language_tagged_literal(value.clone(), language.clone())
                        .map_err(|e| sexp.error(format!("Invalid language tag: {e}")))?
                }
                LiteralSuffix::Datatype(datatype) => Literal::new_typed_literal(
                    value.clone(),
                    self.atom_named_node(sexp, datatype)?,
                ),
            }
            .into(),
            Atom::Number(number) => number_literal(sexp, number)?.into(),
            Atom::Symbol(symbol) if symbol == "true" || symbol == "false" => {
                Literal::from(symbol == "true").into()
            }
            _ => return Err(sexp.error("Expected an RDF term")),
        })
    }

    fn term_pattern(&self, sexp: &Sexp) -> Result<TermPattern> {
        match sexp {
            Sexp::Atom(Atom::Variable { .. }, _) => Ok(Self::variable(sexp)?.into()),
            _ => Ok(self.term(sexp)?.into()),
        }
    }

    fn predicate(&self, sexp: &Sexp) -> Result<NamedNodePattern> {
        match sexp {
            Sexp::Atom(Atom::Variable { .. }, _) => Ok(Self::variable(sexp)?.into()),
            Sexp::Atom(Atom::Symbol(symbol), _) if symbol == "a" => {
                Ok(rdf::TYPE.into_owned().into())
            }
            _ => Ok(self.named_node(sexp)?.into()),
        }
    }

    fn graph_name_pattern(&self, sexp: &Sexp) -> Result<NamedNodePattern> {
        match sexp {
            Sexp::Atom(Atom::Variable { .. }, _) => Ok(Self::variable(sexp)?.into()),
            _ => Ok(self.named_node(sexp)?.into()),
        }
    }

    fn triple(&self, sexp: &Sexp) -> Result<TriplePattern> {
        match operator(sexp) {
            Some(("triple", args)) => {
                check_arity(sexp, "triple", args, 3, 3)?;
                Ok(TriplePattern {
                    subject: self.term_pattern(&args[0])?,
                    predicate: self.predicate(&args[1])?,
                    object: self.term_pattern(&args[2])?,
                })
            }
            _ => Err(sexp.error("Expected (triple s p o)")),
        }
    }

    fn algebra(&self, sexp: &Sexp) -> Result<Algebra> {
        if let Some(algebra) = self.scoped(sexp, Self::algebra)? {
            return Ok(algebra);
        }
        let Some((name, args)) = operator(sexp) else {
            return Err(sexp.error("Expected an operator"));
        };
        match name {
            "bgp" => Ok(Algebra::Bgp {
                patterns: args
                    .iter()
                    .map(|arg| self.triple(arg))
                    .collect::<Result<_>>()?,
            }),
            "triple" => Ok(Algebra::Bgp {
                patterns: vec![self.triple(sexp)?],
            }),
            "path" => {
                check_arity(sexp, name, args, 3, 3)?;
                Ok(Algebra::Path {
                    subject: self.term_pattern(&args[0])?,
                    path: self.path(&args[1])?,
                    object: self.term_pattern(&args[2])?,
                })
            }
            "join" | "union" => {
                let operands = args
                    .iter()
                    .map(|arg| self.algebra(arg))
                    .collect::<Result<Vec<_>>>()?;
                let (operator, combine): (_, fn(Algebra, Algebra) -> Algebra) = if name == "join" {
                    ("join", Algebra::join)
                } else {
                    ("union", Algebra::union)
                };
                to_binary(operator, operands, combine).map_err(|e| sexp.error(e.to_string()))
            }
            "minus" => {
                check_arity(sexp, name, args, 2, 2)?;
                Ok(Algebra::minus(
                    self.algebra(&args[0])?,
                    self.algebra(&args[1])?,
                ))
            }
            "leftjoin" => {
                check_arity(sexp, name, args, 2, 3)?;
                let expression = args
                    .get(2)
                    .map(|arg| self.filter_expression(arg))
                    .transpose()?;
                Ok(Algebra::left_join(
                    self.algebra(&args[0])?,
                    self.algebra(&args[1])?,
                    expression,
                ))
            }
            "filter" => {
                check_arity(sexp, name, args, 2, 2)?;
                Ok(Algebra::filter(
                    self.filter_expression(&args[0])?,
                    self.algebra(&args[1])?,
                ))
            }
            "extend" => {
                check_arity(sexp, name, args, 2, 2)?;
                let mut result = self.algebra(&args[1])?;
                for binding in list(&args[0], "a list of bindings")? {
                    let [variable, expression] = list(binding, "a binding")? else {
                        return Err(binding.error("Expected a binding of the form (?v expr)"));
                    };
                    result = Algebra::Extend {
                        inner: Box::new(result),
                        variable: Self::variable(variable)?,
                        expression: self.expression(expression)?,
                    };
                }
                Ok(result)
            }
            "graph" => {
                check_arity(sexp, name, args, 2, 2)?;
                Ok(Algebra::Graph {
                    name: self.graph_name_pattern(&args[0])?,
                    inner: Box::new(self.algebra(&args[1])?),
                })
            }
            "group" => {
                check_arity(sexp, name, args, 2, 3)?;
                let aggregates = match args {
                    [_, aggregates, _] => list(aggregates, "a list of aggregates")?
                        .iter()
                        .map(|binding| self.aggregate_binding(binding))
                        .collect::<Result<_>>()?,
                    _ => Vec::new(),
                };
                Ok(Algebra::Group {
                    inner: Box::new(self.algebra(&args[args.len() - 1])?),
                    variables: Self::variables(&args[0])?,
                    aggregates,
                })
            }
            "order" => {
                check_arity(sexp, name, args, 2, 2)?;
                Ok(Algebra::OrderBy {
                    inner: Box::new(self.algebra(&args[1])?),
                    expressions: list(&args[0], "a list of ordering keys")?
                        .iter()
                        .map(|key| self.order_expression(key))
                        .collect::<Result<_>>()?,
                })
            }
            "distinct" | "reduced" => {
                check_arity(sexp, name, args, 1, 1)?;
                let inner = Box::new(self.algebra(&args[0])?);
                Ok(if name == "distinct" {
                    Algebra::Distinct { inner }
                } else {
                    Algebra::Reduced { inner }
                })
            }
            "project" => {
                check_arity(sexp, name, args, 2, 2)?;
                Ok(Algebra::Project {
                    inner: Box::new(self.algebra(&args[1])?),
                    variables: Self::variables(&args[0])?,
                })
            }
            "slice" => {
                check_arity(sexp, name, args, 3, 3)?;
                Ok(Algebra::Slice {
                    start: slice_bound(&args[0])?.unwrap_or(0),
                    length: slice_bound(&args[1])?,
                    inner: Box::new(self.algebra(&args[2])?),
                })
            }
            "table" => self.table(sexp, args),
            "service" => {
                let (silent, args) = silent(args);
                check_arity(sexp, name, args, 2, 2)?;
                Ok(Algebra::Service {
                    name: self.graph_name_pattern(&args[0])?,
                    inner: Box::new(self.algebra(&args[1])?),
                    silent,
                })
            }
            _ => Err(sexp.error(format!("Unknown operator '{name}'"))),
        }
    }

    fn table(&self, sexp: &Sexp, args: &[Sexp]) -> Result<Algebra> {
        match args {
            [keyword] if keyword.as_symbol() == Some("unit") => return Ok(Algebra::unit()),
            [keyword] if keyword.as_symbol() == Some("empty") => return Ok(Algebra::empty()),
            _ => {}
        }
        let Some((declaration, rows)) = args.split_first() else {
            return Err(sexp.error(
                "Expected (table unit), (table empty) or (table (vars ...) ...)",
            ));
        };
        let variables = match operator(declaration) {
            Some(("vars", variables)) => variables
                .iter()
                .map(Self::variable)
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(declaration.error("Expected (vars ...)")),
        };
        let rows = rows
            .iter()
            .map(|row| {
                let Some(("row", bindings)) = operator(row) else {
                    return Err(row.error("Expected (row ...)"));
                };
                let mut solution = Solution::new();
                for binding in bindings {
                    let [variable, value] = list(binding, "a binding")? else {
                        return Err(binding.error("Expected a binding of the form (?v term)"));
                    };
                    solution
                        .insert(Self::variable(variable)?, self.term(value)?)
                        .map_err(|e| binding.error(e.to_string()))?;
                }
                Ok(solution)
            })
            .collect::<Result<_>>()?;
        Ok(Algebra::Table { variables, rows })
    }

    fn aggregate_binding(&self, sexp: &Sexp) -> Result<(Variable, AggregateExpression)> {
        let [variable, aggregate] = list(sexp, "an aggregate binding")? else {
            return Err(sexp.error("Expected a binding of the form (?v (aggregate ...))"));
        };
        let Some((name, args)) = operator(aggregate) else {
            return Err(aggregate.error("Expected an aggregate"));
        };
        let (distinct, mut args) = match args.split_first() {
            Some((first, rest)) if first.as_symbol() == Some("distinct") => (true, rest),
            _ => (false, args),
        };
        let function = match name.to_ascii_lowercase().as_str() {
            "count" => AggregateFunction::Count,
            "sum" => AggregateFunction::Sum,
            "avg" => AggregateFunction::Avg,
            "min" => AggregateFunction::Min,
            "max" => AggregateFunction::Max,
            "sample" => AggregateFunction::Sample,
            "group_concat" => {
                let mut separator = None;
                if let Some((first, rest)) = args.split_first() {
                    if let Some(("separator", [value])) = operator(first) {
                        match self.term(value)? {
                            Term::Literal(literal) => separator = Some(literal.value().to_owned()),
                            _ => return Err(value.error("Expected a separator string")),
                        }
                        args = rest;
                    }
                }
                AggregateFunction::GroupConcat { separator }
            }
            _ => return Err(aggregate.error(format!("Unknown aggregate '{name}'"))),
        };
        let min_args = usize::from(function != AggregateFunction::Count);
        check_arity(aggregate, name, args, min_args, 1)?;
        Ok((
            Self::variable(variable)?,
            AggregateExpression {
                function,
                distinct,
                expression: args.first().map(|arg| self.expression(arg)).transpose()?,
            },
        ))
    }

    fn order_expression(&self, sexp: &Sexp) -> Result<OrderExpression> {
        match operator(sexp) {
            Some(("asc", [expression])) => Ok(OrderExpression::Asc(self.expression(expression)?)),
            Some(("desc", [expression])) => {
                Ok(OrderExpression::Desc(self.expression(expression)?))
            }
            _ => Ok(OrderExpression::Asc(self.expression(sexp)?)),
        }
    }

    fn path(&self, sexp: &Sexp) -> Result<PropertyPath> {
        let Some((name, args)) = operator(sexp) else {
            return Ok(PropertyPath::Link(self.path_link(sexp)?));
        };
        match name {
            "reverse" => {
                check_arity(sexp, name, args, 1, 1)?;
                Ok(PropertyPath::inverse(self.path(&args[0])?))
            }
            "seq" | "alt" => {
                let paths = args
                    .iter()
                    .map(|arg| self.path(arg))
                    .collect::<Result<Vec<_>>>()?;
                let combine: fn(PropertyPath, PropertyPath) -> PropertyPath = if name == "seq" {
                    PropertyPath::sequence
                } else {
                    PropertyPath::alternative
                };
                paths
                    .into_iter()
                    .reduce(combine)
                    .ok_or_else(|| sexp.error(format!("{name} expects at least one path")))
            }
            "path*" | "path+" | "path?" => {
                check_arity(sexp, name, args, 1, 1)?;
                let inner = Box::new(self.path(&args[0])?);
                Ok(match name {
                    "path*" => PropertyPath::ZeroOrMore(inner),
                    "path+" => PropertyPath::OneOrMore(inner),
                    _ => PropertyPath::ZeroOrOne(inner),
                })
            }
            "notoneof" => Ok(PropertyPath::NegatedPropertySet(
                args.iter()
                    .map(|member| match operator(member) {
                        Some(("reverse", [inner])) => {
                            Ok(NegatedMember::Inverse(self.path_link(inner)?))
                        }
                        _ => Ok(NegatedMember::Forward(self.path_link(member)?)),
                    })
                    .collect::<Result<_>>()?,
            )),
            _ => Err(sexp.error(format!("Unknown path operator '{name}'"))),
        }
    }

    fn path_link(&self, sexp: &Sexp) -> Result<NamedNode> {
        match sexp.as_symbol() {
            Some("a") => Ok(rdf::TYPE.into_owned()),
            _ => self.named_node(sexp),
        }
    }

    /// An expression or an `(exprlist ...)` conjunction.
    fn filter_expression(&self, sexp: &Sexp) -> Result<Expression> {
        match operator(sexp) {
            Some(("exprlist", args)) => args
                .iter()
                .map(|arg| self.expression(arg))
                .reduce(|lhs, rhs| Ok(Expression::and(lhs?, rhs?)))
                .unwrap_or_else(|| Err(sexp.error("exprlist expects at least one expression"))),
            _ => self.expression(sexp),
        }
    }

    fn expression(&self, sexp: &Sexp) -> Result<Expression> {
        if let Some(expression) = self.scoped(sexp, Self::expression)? {
            return Ok(expression);
        }
        let args = match sexp {
            Sexp::Atom(Atom::Variable { .. }, _) => return Ok(Self::variable(sexp)?.into()),
            Sexp::Atom(..) => return Ok(self.term(sexp)?.into()),
            Sexp::List(items, _) => items,
        };
        let Some((head, args)) = args.split_first() else {
            return Err(sexp.error("Empty expression"));
        };
        let Some(name) = head.as_symbol() else {
            let function = self.named_node(head)?;
            return Ok(Expression::FunctionCall(
                FunctionName::Custom(function),
                self.expressions(args)?,
            ));
        };

        let binary = |constructor: fn(Box<Expression>, Box<Expression>) -> Expression| {
            check_arity(sexp, name, args, 2, 2)?;
            Ok(constructor(
                Box::new(self.expression(&args[0])?),
                Box::new(self.expression(&args[1])?),
            ))
        };
        let fold = |constructor: fn(Box<Expression>, Box<Expression>) -> Expression| {
            self.expressions(args)?
                .into_iter()
                .reduce(|lhs, rhs| constructor(Box::new(lhs), Box::new(rhs)))
                .ok_or_else(|| sexp.error(format!("{name} expects at least one operand")))
        };

        match name {
            "||" | "or" => fold(Expression::Or),
            "&&" | "and" => fold(Expression::And),
            "!" | "not" => {
                check_arity(sexp, name, args, 1, 1)?;
                Ok(Expression::not(self.expression(&args[0])?))
            }
            "=" => binary(Expression::Equal),
            "!=" => binary(Expression::NotEqual),
            ">" => binary(Expression::Greater),
            ">=" => binary(Expression::GreaterOrEqual),
            "<" => binary(Expression::Less),
            "<=" => binary(Expression::LessOrEqual),
            "*" => fold(Expression::Multiply),
            "/" => binary(Expression::Divide),
            "+" | "-" if args.len() == 1 => {
                let inner = Box::new(self.expression(&args[0])?);
                Ok(if name == "+" {
                    Expression::UnaryPlus(inner)
                } else {
                    Expression::UnaryMinus(inner)
                })
            }
            "+" => fold(Expression::Add),
            "-" => fold(Expression::Subtract),
            "in" | "notin" => {
                let Some((first, list)) = args.split_first() else {
                    return Err(sexp.error(format!("{name} expects at least one operand")));
                };
                let expression =
                    Expression::In(Box::new(self.expression(first)?), self.expressions(list)?);
                Ok(if name == "in" {
                    expression
                } else {
                    Expression::not(expression)
                })
            }
            "bound" => {
                check_arity(sexp, name, args, 1, 1)?;
                let variable = Self::variable(&args[0])
                    .map_err(|_| args[0].error("bound expects a variable"))?;
                Ok(Expression::Bound(variable))
            }
            "if" => {
                check_arity(sexp, name, args, 3, 3)?;
                Ok(Expression::If(
                    Box::new(self.expression(&args[0])?),
                    Box::new(self.expression(&args[1])?),
                    Box::new(self.expression(&args[2])?),
                ))
            }
            "coalesce" => Ok(Expression::Coalesce(self.expressions(args)?)),
            "exists" | "notexists" => {
                check_arity(sexp, name, args, 1, 1)?;
                let exists = Expression::Exists(Box::new(self.algebra(&args[0])?));
                Ok(if name == "exists" {
                    exists
                } else {
                    Expression::not(exists)
                })
            }
            _ if name.eq_ignore_ascii_case("sameterm") => binary(Expression::SameTerm),
            _ => {
                let builtin = BuiltinName::from_str(name).map_err(|e| head.error(e.to_string()))?;
                let (min, max) = builtin.arity();
                check_arity(sexp, name, args, min, max.unwrap_or(usize::MAX))?;
                Ok(Expression::FunctionCall(
                    FunctionName::Builtin(builtin),
                    self.expressions(args)?,
                ))
            }
        }
    }

    fn expressions(&self, args: &[Sexp]) -> Result<Vec<Expression>> {
        args.iter().map(|arg| self.expression(arg)).collect()
    }

    fn query(&self, sexp: &Sexp) -> Result<Query> {
        if let Some(query) = self.scoped(sexp, Self::query)? {
            return Ok(query);
        }
        let base_iri = self.base_iri.clone();
        match operator(sexp) {
            Some(("ask", args)) => {
                check_arity(sexp, "ask", args, 1, 1)?;
                Ok(Query::Ask {
                    dataset: None,
                    pattern: self.algebra(&args[0])?,
                    base_iri,
                })
            }
            Some(("construct", args)) => {
                check_arity(sexp, "construct", args, 2, 2)?;
                Ok(Query::Construct {
                    template: list(&args[0], "a list of triple templates")?
                        .iter()
                        .map(|triple| self.triple(triple))
                        .collect::<Result<_>>()?,
                    dataset: None,
                    pattern: self.algebra(&args[1])?,
                    base_iri,
                })
            }
            Some(("describe", args)) => {
                check_arity(sexp, "describe", args, 2, 2)?;
                Ok(Query::Describe {
                    resources: list(&args[0], "a list of resources")?
                        .iter()
                        .map(|resource| self.term_pattern(resource))
                        .collect::<Result<_>>()?,
                    dataset: None,
                    pattern: self.algebra(&args[1])?,
                    base_iri,
                })
            }
            _ => Ok(Query::Select {
                dataset: None,
                pattern: self.algebra(sexp)?,
                base_iri,
            }),
        }
    }

    fn update(&self, sexp: &Sexp) -> Result<Update> {
        if let Some(update) = self.scoped(sexp, Self::update)? {
            return Ok(update);
        }
        let operations = match operator(sexp) {
            Some(("update", args)) => args
                .iter()
                .map(|arg| self.update_operation(arg))
                .collect::<Result<_>>()?,
            _ => vec![self.update_operation(sexp)?],
        };
        Ok(Update {
            operations,
            base_iri: self.base_iri.clone(),
        })
    }

    fn update_operation(&self, sexp: &Sexp) -> Result<UpdateOperation> {
        let Some((name, args)) = operator(sexp) else {
            return Err(sexp.error("Expected an update operation"));
        };
        let (silent, args) = silent(args);
        match name.to_ascii_lowercase().as_str() {
            "load" => {
                check_arity(sexp, name, args, 1, 2)?;
                Ok(UpdateOperation::Load {
                    silent,
                    source: self.named_node(&args[0])?,
                    destination: args
                        .get(1)
                        .map(|graph| self.graph_name(graph))
                        .transpose()?
                        .unwrap_or(GraphName::DefaultGraph),
                })
            }
            "clear" | "drop" => {
                check_arity(sexp, name, args, 1, 1)?;
                let graph = match args[0].as_symbol() {
                    Some("default") => GraphTarget::DefaultGraph,
                    Some("named") => GraphTarget::NamedGraphs,
                    Some("all") => GraphTarget::AllGraphs,
                    _ => GraphTarget::NamedNode(self.named_node(&args[0])?),
                };
                Ok(if name.eq_ignore_ascii_case("clear") {
                    UpdateOperation::Clear { silent, graph }
                } else {
                    UpdateOperation::Drop { silent, graph }
                })
            }
            "create" => {
                check_arity(sexp, name, args, 1, 1)?;
                Ok(UpdateOperation::Create {
                    silent,
                    graph: self.named_node(&args[0])?,
                })
            }
            lowercase @ ("add" | "move" | "copy") => {
                check_arity(sexp, name, args, 2, 2)?;
                let from = self.graph_name(&args[0])?;
                let to = self.graph_name(&args[1])?;
                Ok(match lowercase {
                    "add" => UpdateOperation::Add { silent, from, to },
                    "move" => UpdateOperation::Move { silent, from, to },
                    _ => UpdateOperation::Copy { silent, from, to },
                })
            }
            "insertdata" => Ok(UpdateOperation::InsertData {
                data: self.ground_quads(sexp, args)?,
            }),
            "deletedata" => Ok(UpdateOperation::DeleteData {
                data: self.ground_quads(sexp, args)?,
            }),
            "modify" => {
                let Some((pattern, templates)) = args.split_last() else {
                    return Err(sexp.error("modify expects a pattern"));
                };
                let mut delete = Vec::new();
                let mut insert = Vec::new();
                for template in templates {
                    match operator(template) {
                        Some(("delete", quads)) => delete.extend(self.quad_patterns(quads)?),
                        Some(("insert", quads)) => insert.extend(self.quad_patterns(quads)?),
                        _ => return Err(template.error("Expected (delete ...) or (insert ...)")),
                    }
                }
                Ok(UpdateOperation::DeleteInsert {
                    delete,
                    insert,
                    pattern: Box::new(self.algebra(pattern)?),
                })
            }
            "with" => {
                check_arity(sexp, name, args, 2, 2)?;
                Ok(UpdateOperation::With {
                    graph: self.named_node(&args[0])?,
                    operation: Box::new(self.update_operation(&args[1])?),
                })
            }
            "using" => {
                check_arity(sexp, name, args, 2, 3)?;
                let default = list(&args[0], "a list of graphs")?
                    .iter()
                    .map(|graph| self.graph_name(graph))
                    .collect::<Result<_>>()?;
                let named = match args {
                    [_, named, _] => match operator(named) {
                        Some(("named", graphs)) => Some(
                            graphs
                                .iter()
                                .map(|graph| Ok(self.named_node(graph)?.into()))
                                .collect::<Result<Vec<NamedOrBlankNode>>>()?,
                        ),
                        _ => return Err(named.error("Expected (named ...)")),
                    },
                    _ => None,
                };
                Ok(UpdateOperation::Using {
                    dataset: QueryDataset { default, named },
                    operation: Box::new(self.update_operation(&args[args.len() - 1])?),
                })
            }
            _ => Err(sexp.error(format!("Unknown update operation '{name}'"))),
        }
    }

    fn graph_name(&self, sexp: &Sexp) -> Result<GraphName> {
        match sexp.as_symbol() {
            Some("default") => Ok(GraphName::DefaultGraph),
            _ => Ok(self.named_node(sexp)?.into()),
        }
    }

    /// Reads `(triple ...)`, `(quad g s p o)` and `(graph g (triple ...) ...)` templates.
    fn quad_patterns(&self, args: &[Sexp]) -> Result<Vec<QuadPattern>> {
        let mut result = Vec::new();
        for arg in args {
            match operator(arg) {
                Some(("triple", _)) => {
                    result.push(QuadPattern::in_default_graph(self.triple(arg)?))
                }
                Some(("quad", [graph, subject, predicate, object])) => result.push(QuadPattern {
                    subject: self.term_pattern(subject)?,
                    predicate: self.predicate(predicate)?,
                    object: self.term_pattern(object)?,
                    graph_name: self.graph_name_template(graph)?,
                }),
                Some(("graph", [graph, triples @ ..])) => {
                    let graph_name = self.graph_name_template(graph)?;
                    for triple in triples {
                        let triple = self.triple(triple)?;
                        result.push(QuadPattern {
                            subject: triple.subject,
                            predicate: triple.predicate,
                            object: triple.object,
                            graph_name: graph_name.clone(),
                        });
                    }
                }
                _ => return Err(arg.error("Expected (triple ...), (quad ...) or (graph ...)")),
            }
        }
        Ok(result)
    }

    fn graph_name_template(&self, sexp: &Sexp) -> Result<GraphNamePattern> {
        match sexp {
            Sexp::Atom(Atom::Variable { .. }, _) => {
                Ok(GraphNamePattern::Variable(Self::variable(sexp)?))
            }
            _ if sexp.as_symbol() == Some("default") => Ok(GraphNamePattern::DefaultGraph),
            _ => Ok(GraphNamePattern::NamedNode(self.named_node(sexp)?)),
        }
    }

    fn ground_quads(&self, sexp: &Sexp, args: &[Sexp]) -> Result<Vec<Quad>> {
        self.quad_patterns(args)?
            .into_iter()
            .map(|pattern| {
                ground_quad(pattern).ok_or_else(|| sexp.error("Variables are not allowed in data"))
            })
            .collect()
    }
}

fn ground_quad(pattern: QuadPattern) -> Option<Quad> {
    let subject = match pattern.subject {
        TermPattern::NamedNode(node) => Subject::NamedNode(node),
        TermPattern::BlankNode(node) => Subject::BlankNode(node),
        TermPattern::Literal(_) | TermPattern::Variable(_) => return None,
    };
    let NamedNodePattern::NamedNode(predicate) = pattern.predicate else {
        return None;
    };
    let object: Term = match pattern.object {
        TermPattern::NamedNode(node) => node.into(),
        TermPattern::BlankNode(node) => node.into(),
        TermPattern::Literal(literal) => literal.into(),
        TermPattern::Variable(_) => return None,
    };
    let graph_name = match pattern.graph_name {
        GraphNamePattern::DefaultGraph => GraphName::DefaultGraph,
        GraphNamePattern::NamedNode(node) => node.into(),
        GraphNamePattern::Variable(_) => return None,
    };
    Some(Quad::new(subject, predicate, object, graph_name))
}

fn number_literal(sexp: &Sexp, number: &str) -> Result<Literal> {
    let invalid = || sexp.error(format!("Invalid number '{number}'"));
    let datatype = if number.contains(['e', 'E']) {
        Double::from_str(number).map_err(|_| invalid())?;
        xsd::DOUBLE
    } else if number.contains('.') {
        Decimal::from_str(number).map_err(|_| invalid())?;
        xsd::DECIMAL
    } else {
        Integer::from_str(number).map_err(|_| invalid())?;
        xsd::INTEGER
    };
    Ok(Literal::new_typed_literal(number, datatype))
}

fn slice_bound(sexp: &Sexp) -> Result<Option<usize>> {
    match sexp {
        Sexp::Atom(Atom::Symbol(symbol), _) if symbol == "_" => Ok(None),
        Sexp::Atom(Atom::Number(number), _) => number
            .parse()
            .map(Some)
            .map_err(|_| sexp.error("Expected a non-negative integer or '_'")),
        _ => Err(sexp.error("Expected a non-negative integer or '_'")),
    }
}
