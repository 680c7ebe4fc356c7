use crate::error::QueryEvaluationError;
use oxrdfio::{RdfFormat, RdfSerializer};
use rdf_algebra_model::{Solution, Triple, Variable};
use sparesults::{
    QueryResultsFormat, QueryResultsParseError, QueryResultsParser, QueryResultsSerializer,
    ReaderQueryResultsParserOutput,
};
use std::io::{self, Read, Write};

/// Results of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResults {
    /// Results of a [SELECT](https://www.w3.org/TR/sparql11-query/#select) query.
    Solutions(QuerySolutions),
    /// Result of an [ASK](https://www.w3.org/TR/sparql11-query/#ask) query.
    Boolean(bool),
    /// Results of a [CONSTRUCT](https://www.w3.org/TR/sparql11-query/#construct) or
    /// [DESCRIBE](https://www.w3.org/TR/sparql11-query/#describe) query.
    Graph(Vec<Triple>),
}

impl QueryResults {
    /// Reads a SPARQL query results serialization.
    pub fn read(
        reader: impl Read,
        format: QueryResultsFormat,
    ) -> Result<Self, QueryResultsParseError> {
        Ok(match QueryResultsParser::from_format(format).for_reader(reader)? {
            ReaderQueryResultsParserOutput::Solutions(parser) => {
                let variables = parser
                    .variables()
                    .iter()
                    .map(Variable::from)
                    .collect::<Vec<_>>();
                let mut solutions = Vec::new();
                for solution in parser {
                    solutions.push(
                        solution?
                            .iter()
                            .map(|(variable, term)| (Variable::from(variable), term.clone()))
                            .collect(),
                    );
                }
                Self::Solutions(QuerySolutions::new(variables, solutions))
            }
            ReaderQueryResultsParserOutput::Boolean(value) => Self::Boolean(value),
        })
    }

    /// Writes the query results (solutions or boolean).
    ///
    /// Graph results are written as solutions binding `?subject`, `?predicate` and `?object`.
    pub fn write<W: Write>(
        &self,
        writer: W,
        format: QueryResultsFormat,
    ) -> Result<W, QueryEvaluationError> {
        self.write_results(writer, QueryResultsSerializer::from_format(format))
            .map_err(QueryEvaluationError::ResultsSerialization)
    }

    fn write_results<W: Write>(
        &self,
        writer: W,
        serializer: QueryResultsSerializer,
    ) -> io::Result<W> {
        match self {
            Self::Boolean(value) => serializer.serialize_boolean_to_writer(writer, *value),
            Self::Solutions(solutions) => {
                let variables = solutions
                    .variables()
                    .iter()
                    .map(Variable::to_oxrdf)
                    .collect::<Vec<_>>();
                let mut serializer =
                    serializer.serialize_solutions_to_writer(writer, variables.clone())?;
                for solution in solutions {
                    serializer.serialize(solutions.variables().iter().zip(&variables).filter_map(
                        |(variable, oxrdf_variable)| {
                            Some((oxrdf_variable.as_ref(), solution.get(variable)?.as_ref()))
                        },
                    ))?;
                }
                serializer.finish()
            }
            Self::Graph(triples) => {
                let [s, p, o] = ["subject", "predicate", "object"]
                    .map(|name| Variable::new(name).to_oxrdf());
                let mut serializer = serializer
                    .serialize_solutions_to_writer(writer, vec![s.clone(), p.clone(), o.clone()])?;
                for triple in triples {
                    serializer.serialize([
                        (s.as_ref(), triple.subject.as_ref().into()),
                        (p.as_ref(), triple.predicate.as_ref().into()),
                        (o.as_ref(), triple.object.as_ref()),
                    ])?;
                }
                serializer.finish()
            }
        }
    }

    /// Writes the graph query results.
    ///
    /// This method fails if it is called on the `Solution` or `Boolean` results.
    pub fn write_graph<W: Write>(
        &self,
        writer: W,
        format: impl Into<RdfFormat>,
    ) -> Result<W, QueryEvaluationError> {
        let Self::Graph(triples) = self else {
            return Err(QueryEvaluationError::NotAGraph);
        };
        let mut serializer = RdfSerializer::from_format(format.into()).for_writer(writer);
        for triple in triples {
            serializer
                .serialize_triple(triple)
                .map_err(QueryEvaluationError::ResultsSerialization)?;
        }
        serializer
            .finish()
            .map_err(QueryEvaluationError::ResultsSerialization)
    }
}

/// The solutions of a `SELECT` query together with the variables that may be bound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySolutions {
    variables: Vec<Variable>,
    solutions: Vec<Solution>,
}

impl QuerySolutions {
    pub fn new(variables: Vec<Variable>, solutions: Vec<Solution>) -> Self {
        Self {
            variables,
            solutions,
        }
    }

    /// The variables of the result, in the order they should be displayed.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }

    pub fn into_solutions(self) -> Vec<Solution> {
        self.solutions
    }
}

impl<'a> IntoIterator for &'a QuerySolutions {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for QuerySolutions {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::{Literal, NamedNode, Term};

    fn solutions() -> QueryResults {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let row = [(x.clone(), Term::from(Literal::from(1)))]
            .into_iter()
            .collect();
        QueryResults::Solutions(QuerySolutions::new(vec![x, y], vec![row]))
    }

    #[test]
    fn write_csv_leaves_unbound_cells_empty() {
        let output = solutions().write(Vec::new(), QueryResultsFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "x,y\r\n1,\r\n");
    }

    #[test]
    fn json_results_can_be_read_back() {
        let output = solutions().write(Vec::new(), QueryResultsFormat::Json).unwrap();
        let read = QueryResults::read(output.as_slice(), QueryResultsFormat::Json).unwrap();
        assert_eq!(read, solutions());
    }

    #[test]
    fn graphs_are_written_with_rdf_serializers() {
        let node = NamedNode::new_unchecked("http://e/s");
        let graph = QueryResults::Graph(vec![Triple::new(node.clone(), node.clone(), node)]);
        let output = graph.write_graph(Vec::new(), RdfFormat::NTriples).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "<http://e/s> <http://e/s> <http://e/s> .\n"
        );
        assert!(matches!(
            solutions().write_graph(Vec::new(), RdfFormat::NTriples),
            Err(QueryEvaluationError::NotAGraph)
        ));
    }
}
