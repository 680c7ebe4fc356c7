use crate::algebra::{AggregateExpression, OrderExpression};
use crate::pattern::write_term;
use crate::Algebra;
use rdf_algebra_functions::aggregates::AggregateFunction;
use rdf_algebra_model::{Literal, Variable};
use std::fmt::{Formatter, Result};

/// Writes an operator tree in SSE notation.
///
/// With `indent == None` the tree is written on a single line. Otherwise, every child operator
/// starts on a new line, indented by two spaces per nesting level.
pub(crate) fn write_algebra(
    f: &mut Formatter<'_>,
    algebra: &Algebra,
    indent: Option<usize>,
) -> Result {
    write!(f, "({}", algebra.name())?;
    match algebra {
        Algebra::Bgp { patterns } => {
            for pattern in patterns {
                write!(f, " {pattern}")?;
            }
        }
        Algebra::Path {
            subject,
            path,
            object,
        } => write!(f, " {subject} {path} {object}")?,
        Algebra::Join { left, right }
        | Algebra::Union { left, right }
        | Algebra::Minus { left, right } => {
            write_child(f, left, indent)?;
            write_child(f, right, indent)?;
        }
        Algebra::LeftJoin {
            left,
            right,
            expression,
        } => {
            write_child(f, left, indent)?;
            write_child(f, right, indent)?;
            if let Some(expression) = expression {
                write_separator(f, indent)?;
                write!(f, "{expression}")?;
            }
        }
        Algebra::Filter { expression, inner } => {
            write!(f, " {expression}")?;
            write_child(f, inner, indent)?;
        }
        Algebra::Extend {
            inner,
            variable,
            expression,
        } => {
            write!(f, " (({variable} {expression}))")?;
            write_child(f, inner, indent)?;
        }
        Algebra::Graph { name, inner } => {
            write!(f, " {name}")?;
            write_child(f, inner, indent)?;
        }
        Algebra::Group {
            inner,
            variables,
            aggregates,
        } => {
            f.write_str(" ")?;
            write_variables(f, variables)?;
            if !aggregates.is_empty() {
                f.write_str(" (")?;
                for (i, (variable, aggregate)) in aggregates.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "({variable} ")?;
                    write_aggregate(f, aggregate)?;
                    f.write_str(")")?;
                }
                f.write_str(")")?;
            }
            write_child(f, inner, indent)?;
        }
        Algebra::OrderBy { inner, expressions } => {
            f.write_str(" (")?;
            for (i, expression) in expressions.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                match expression {
                    OrderExpression::Asc(expression) => write!(f, "{expression}")?,
                    OrderExpression::Desc(expression) => write!(f, "(desc {expression})")?,
                }
            }
            f.write_str(")")?;
            write_child(f, inner, indent)?;
        }
        Algebra::Distinct { inner } | Algebra::Reduced { inner } => {
            write_child(f, inner, indent)?;
        }
        Algebra::Project { inner, variables } => {
            f.write_str(" ")?;
            write_variables(f, variables)?;
            write_child(f, inner, indent)?;
        }
        Algebra::Slice {
            inner,
            start,
            length,
        } => {
            match start {
                0 => f.write_str(" _")?,
                start => write!(f, " {start}")?,
            }
            match length {
                Some(length) => write!(f, " {length}")?,
                None => f.write_str(" _")?,
            }
            write_child(f, inner, indent)?;
        }
        Algebra::Table { variables, rows } => {
            if variables.is_empty() && rows.len() == 1 && rows[0].is_empty() {
                f.write_str(" unit")?;
            } else if variables.is_empty() && rows.is_empty() {
                f.write_str(" empty")?;
            } else {
                f.write_str(" (vars")?;
                for variable in variables {
                    write!(f, " {variable}")?;
                }
                f.write_str(")")?;
                for row in rows {
                    write_separator(f, indent)?;
                    f.write_str("(row")?;
                    // Rows are written in the order of the declared variables.
                    for variable in variables {
                        if let Some(term) = row.get(variable) {
                            write!(f, " ({variable} ")?;
                            write_term(f, term)?;
                            f.write_str(")")?;
                        }
                    }
                    f.write_str(")")?;
                }
            }
        }
        Algebra::Service {
            name,
            inner,
            silent,
        } => {
            if *silent {
                f.write_str(" silent")?;
            }
            write!(f, " {name}")?;
            write_child(f, inner, indent)?;
        }
    }
    f.write_str(")")
}

fn write_separator(f: &mut Formatter<'_>, indent: Option<usize>) -> Result {
    match indent {
        Some(level) => write!(f, "\n{:width$}", "", width = (level + 1) * 2),
        None => f.write_str(" "),
    }
}

fn write_child(f: &mut Formatter<'_>, child: &Algebra, indent: Option<usize>) -> Result {
    write_separator(f, indent)?;
    write_algebra(f, child, indent.map(|level| level + 1))
}

fn write_variables(f: &mut Formatter<'_>, variables: &[Variable]) -> Result {
    f.write_str("(")?;
    for (i, variable) in variables.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{variable}")?;
    }
    f.write_str(")")
}

fn write_aggregate(f: &mut Formatter<'_>, aggregate: &AggregateExpression) -> Result {
    write!(f, "({}", aggregate.function.name())?;
    if aggregate.distinct {
        f.write_str(" distinct")?;
    }
    if let AggregateFunction::GroupConcat {
        separator: Some(separator),
    } = &aggregate.function
    {
        write!(
            f,
            " (separator {})",
            Literal::new_simple_literal(separator.as_str())
        )?;
    }
    if let Some(expression) = &aggregate.expression {
        write!(f, " {expression}")?;
    }
    f.write_str(")")
}
