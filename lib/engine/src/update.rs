use crate::context::{ActiveGraph, DatasetView};
use crate::error::QueryEvaluationError;
use crate::eval::Evaluator;
use crate::options::UpdateOptions;
use crate::planner::QueryPlanner;
use rdf_algebra_common::{Queryable, QueryableMut};
use rdf_algebra_functions::FunctionContext;
use rdf_algebra_logical::pattern::{GraphNamePattern, NamedNodePattern, QuadPattern, TermPattern};
use rdf_algebra_logical::{Algebra, GraphTarget, QueryDataset, Update, UpdateOperation};
use rdf_algebra_model::{
    BlankNode, GraphName, GraphNameRef, Iri, NamedNode, Quad, Solution, Subject, Term,
};
use rustc_hash::FxHashMap;

/// Executes the operations of `update` against `store`, one after another.
///
/// Execution stops at the first failing operation. Operations executed before it are not rolled
/// back.
pub fn execute_update<S: QueryableMut + ?Sized>(
    store: &S,
    update: &Update,
    options: &UpdateOptions,
) -> Result<(), QueryEvaluationError> {
    let base_iri = update
        .base_iri
        .clone()
        .or_else(|| options.query_options.base_iri.clone());
    let executor = UpdateExecutor {
        store,
        options,
        base_iri,
    };
    for operation in &update.operations {
        executor.execute(operation, &Scope::default())?;
    }
    Ok(())
}

/// The scope set by `WITH` and `USING`.
#[derive(Debug, Clone, Default)]
struct Scope {
    /// The graph of `WITH`. Replaces the default graph in templates and, without `USING`, in the
    /// pattern.
    default_graph: Option<NamedNode>,
    /// The dataset of `USING`. The pattern is evaluated against it.
    dataset: Option<QueryDataset>,
}

struct UpdateExecutor<'a, S: ?Sized> {
    store: &'a S,
    options: &'a UpdateOptions,
    base_iri: Option<Iri<String>>,
}

impl<S: QueryableMut + ?Sized> UpdateExecutor<'_, S> {
    fn execute(
        &self,
        operation: &UpdateOperation,
        scope: &Scope,
    ) -> Result<(), QueryEvaluationError> {
        tracing::debug!(operation = operation.name(), "Executing update operation");
        match operation {
            UpdateOperation::Load {
                silent,
                source,
                destination,
            } => match self.store.load(source.as_ref(), destination.as_ref()) {
                Ok(count) => {
                    tracing::debug!(source = source.as_str(), count, "Loaded document");
                    Ok(())
                }
                Err(error) if *silent => {
                    tracing::debug!(source = source.as_str(), %error, "Ignored failed load");
                    Ok(())
                }
                Err(error) => Err(error.into()),
            },
            UpdateOperation::Clear { silent, graph } => match self.clear_graphs(graph, *silent) {
                Err(error) if *silent => {
                    tracing::debug!(%error, "Ignored failed clear");
                    Ok(())
                }
                result => result,
            },
            UpdateOperation::Drop { silent, graph } => match self.drop_graphs(graph, *silent) {
                Err(error) if *silent => {
                    tracing::debug!(%error, "Ignored failed drop");
                    Ok(())
                }
                result => result,
            },
            UpdateOperation::Create { silent, graph } => {
                if self.store.create_named_graph(graph.as_ref().into())? || *silent {
                    Ok(())
                } else {
                    Err(QueryEvaluationError::GraphAlreadyExists(graph.clone()))
                }
            }
            UpdateOperation::Add { silent, from, to } => {
                if from != to && self.check_source(from, *silent)? {
                    self.copy_quads(from, to)?;
                }
                Ok(())
            }
            UpdateOperation::Copy { silent, from, to } => {
                if from != to && self.check_source(from, *silent)? {
                    self.store.clear_graph(to.as_ref())?;
                    self.copy_quads(from, to)?;
                }
                Ok(())
            }
            UpdateOperation::Move { silent, from, to } => {
                if from != to && self.check_source(from, *silent)? {
                    self.store.clear_graph(to.as_ref())?;
                    self.copy_quads(from, to)?;
                    match from {
                        GraphName::NamedNode(node) => {
                            self.store.drop_named_graph(node.as_ref().into())?;
                        }
                        GraphName::BlankNode(node) => {
                            self.store.drop_named_graph(node.as_ref().into())?;
                        }
                        GraphName::DefaultGraph => self.store.clear_graph(from.as_ref())?,
                    }
                }
                Ok(())
            }
            UpdateOperation::InsertData { data } => {
                let mut blank_nodes = FxHashMap::default();
                for quad in data {
                    let quad = rename_blank_nodes(quad, &mut blank_nodes);
                    self.store.insert(quad.as_ref())?;
                }
                Ok(())
            }
            UpdateOperation::DeleteData { data } => {
                for quad in data {
                    self.store.remove(quad.as_ref())?;
                }
                Ok(())
            }
            UpdateOperation::DeleteInsert {
                delete,
                insert,
                pattern,
            } => self.delete_insert(delete, insert, pattern, scope),
            UpdateOperation::With { graph, operation } => self.execute(
                operation,
                &Scope {
                    default_graph: Some(graph.clone()),
                    ..scope.clone()
                },
            ),
            UpdateOperation::Using { dataset, operation } => self.execute(
                operation,
                &Scope {
                    dataset: Some(dataset.clone()),
                    ..scope.clone()
                },
            ),
        }
    }

    fn clear_graphs(
        &self,
        target: &GraphTarget,
        silent: bool,
    ) -> Result<(), QueryEvaluationError> {
        match target {
            GraphTarget::NamedNode(graph) => {
                if self.store.contains_named_graph(graph.as_ref().into())? {
                    self.store.clear_graph(graph.as_ref().into())?;
                } else if !silent {
                    return Err(QueryEvaluationError::GraphDoesNotExist(graph.clone()));
                }
            }
            GraphTarget::DefaultGraph => self.store.clear_graph(GraphNameRef::DefaultGraph)?,
            GraphTarget::NamedGraphs => {
                for graph in self.store.named_graphs()? {
                    self.store.clear_graph(graph.as_ref().into())?;
                }
            }
            GraphTarget::AllGraphs => {
                self.store.clear_graph(GraphNameRef::DefaultGraph)?;
                self.clear_graphs(&GraphTarget::NamedGraphs, silent)?;
            }
        }
        Ok(())
    }

    fn drop_graphs(
        &self,
        target: &GraphTarget,
        silent: bool,
    ) -> Result<(), QueryEvaluationError> {
        match target {
            GraphTarget::NamedNode(graph) => {
                if !self.store.drop_named_graph(graph.as_ref().into())? && !silent {
                    return Err(QueryEvaluationError::GraphDoesNotExist(graph.clone()));
                }
            }
            GraphTarget::DefaultGraph => self.store.clear_graph(GraphNameRef::DefaultGraph)?,
            GraphTarget::NamedGraphs => {
                for graph in self.store.named_graphs()? {
                    self.store.drop_named_graph(graph.as_ref())?;
                }
            }
            GraphTarget::AllGraphs => {
                self.store.clear_graph(GraphNameRef::DefaultGraph)?;
                self.drop_graphs(&GraphTarget::NamedGraphs, silent)?;
            }
        }
        Ok(())
    }

    /// Whether the source graph of `ADD`, `COPY` or `MOVE` exists. A missing named graph is an
    /// error unless `silent` is set.
    fn check_source(
        &self,
        graph: &GraphName,
        silent: bool,
    ) -> Result<bool, QueryEvaluationError> {
        let exists = match graph {
            GraphName::NamedNode(node) => self.store.contains_named_graph(node.as_ref().into())?,
            GraphName::BlankNode(node) => self.store.contains_named_graph(node.as_ref().into())?,
            GraphName::DefaultGraph => true,
        };
        match (exists, graph) {
            (true, _) => Ok(true),
            (false, _) if silent => Ok(false),
            (false, GraphName::NamedNode(node)) => {
                Err(QueryEvaluationError::GraphDoesNotExist(node.clone()))
            }
            (false, _) => QueryEvaluationError::internal(format!("Unknown source graph {graph}")),
        }
    }

    fn copy_quads(&self, from: &GraphName, to: &GraphName) -> Result<(), QueryEvaluationError> {
        if let GraphName::NamedNode(node) = to {
            self.store.create_named_graph(node.as_ref().into())?;
        }
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(from.as_ref()))?
        {
            let quad = Quad::new(quad.subject, quad.predicate, quad.object, to.clone());
            self.store.insert(quad.as_ref())?;
        }
        Ok(())
    }

    /// Evaluates `pattern` first, then removes all instantiated `delete` templates and finally
    /// adds all instantiated `insert` templates.
    fn delete_insert(
        &self,
        delete: &[QuadPattern],
        insert: &[QuadPattern],
        pattern: &Algebra,
        scope: &Scope,
    ) -> Result<(), QueryEvaluationError> {
        let query_options = &self.options.query_options;
        let explanation = QueryPlanner::default().plan(pattern, query_options.optimize)?;
        let dataset = match (&scope.dataset, &scope.default_graph) {
            (Some(dataset), _) => DatasetView::new(Some(dataset), false),
            (None, Some(graph)) => DatasetView {
                default_graph: ActiveGraph::NamedGraph(graph.clone().into()),
                named_graphs: None,
            },
            (None, None) => DatasetView::new(None, query_options.default_graph_as_union),
        };
        let solutions = {
            let evaluator = Evaluator::new(
                self.store,
                dataset,
                FunctionContext::new(self.base_iri.clone()),
            );
            let context =
                evaluator.root_context(query_options.max_depth, query_options.bindings.clone());
            evaluator.execute(&explanation.optimized_algebra, &context)?
        };

        let default_graph = scope
            .default_graph
            .clone()
            .map_or(GraphName::DefaultGraph, GraphName::from);
        let mut deleted = 0;
        for solution in &solutions {
            for template in delete {
                // Blank nodes are not allowed in delete templates.
                if let Some(quad) = instantiate(template, solution, &default_graph, None) {
                    deleted += usize::from(self.store.remove(quad.as_ref())?);
                }
            }
        }
        let mut inserted = 0;
        for solution in &solutions {
            let mut blank_nodes = FxHashMap::default();
            for template in insert {
                if let Some(quad) =
                    instantiate(template, solution, &default_graph, Some(&mut blank_nodes))
                {
                    inserted += usize::from(self.store.insert(quad.as_ref())?);
                }
            }
        }
        tracing::debug!(
            solutions = solutions.len(),
            deleted,
            inserted,
            "Executed DELETE/INSERT"
        );
        Ok(())
    }
}

/// Instantiates a quad template with a solution. Returns [None] if a position is unbound or not
/// valid (e.g., a literal subject). Without a blank node map, templates with blank nodes are not
/// instantiated.
fn instantiate(
    template: &QuadPattern,
    solution: &Solution,
    default_graph: &GraphName,
    mut blank_nodes: Option<&mut FxHashMap<BlankNode, BlankNode>>,
) -> Option<Quad> {
    let mut term = |pattern: &TermPattern| match pattern {
        TermPattern::NamedNode(node) => Some(Term::from(node.clone())),
        TermPattern::Literal(literal) => Some(Term::from(literal.clone())),
        TermPattern::Variable(variable) => solution.get(variable).cloned(),
        TermPattern::BlankNode(node) => blank_nodes.as_mut().map(|blank_nodes| {
            Term::from(
                blank_nodes
                    .entry(node.clone())
                    .or_insert_with(BlankNode::default)
                    .clone(),
            )
        }),
    };
    let subject = match term(&template.subject)? {
        Term::NamedNode(node) => Subject::from(node),
        Term::BlankNode(node) => Subject::from(node),
        _ => return None,
    };
    let object = term(&template.object)?;
    let predicate = match &template.predicate {
        NamedNodePattern::NamedNode(node) => node.clone(),
        NamedNodePattern::Variable(variable) => match solution.get(variable)? {
            Term::NamedNode(node) => node.clone(),
            _ => return None,
        },
    };
    let graph_name = match &template.graph_name {
        GraphNamePattern::DefaultGraph => default_graph.clone(),
        GraphNamePattern::NamedNode(node) => node.clone().into(),
        GraphNamePattern::Variable(variable) => match solution.get(variable)? {
            Term::NamedNode(node) => node.clone().into(),
            Term::BlankNode(node) => node.clone().into(),
            _ => return None,
        },
    };
    Some(Quad::new(subject, predicate, object, graph_name))
}

/// Replaces the blank nodes of `INSERT DATA` by fresh ones. The same label is replaced by the
/// same fresh blank node within one operation.
fn rename_blank_nodes(quad: &Quad, blank_nodes: &mut FxHashMap<BlankNode, BlankNode>) -> Quad {
    let mut rename = |node: &BlankNode| {
        blank_nodes
            .entry(node.clone())
            .or_insert_with(BlankNode::default)
            .clone()
    };
    let subject = match &quad.subject {
        Subject::BlankNode(node) => Subject::from(rename(node)),
        subject => subject.clone(),
    };
    let object = match &quad.object {
        Term::BlankNode(node) => Term::from(rename(node)),
        object => object.clone(),
    };
    let graph_name = match &quad.graph_name {
        GraphName::BlankNode(node) => GraphName::from(rename(node)),
        graph_name => graph_name.clone(),
    };
    Quad::new(subject, quad.predicate.clone(), object, graph_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_common::StorageError;
    use rdf_algebra_logical::parse_update;
    use rdf_algebra_model::{
        Literal, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, QuadRef, SubjectRef, TermRef,
    };
    use rdf_algebra_storage::MemoryStore;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://e/{name}"))
    }

    fn update(store: &MemoryStore, sse: &str) -> Result<(), QueryEvaluationError> {
        execute_update(store, &parse_update(sse).unwrap(), &UpdateOptions::default())
    }

    fn graph(store: &MemoryStore, graph: GraphNameRef<'_>) -> Vec<Quad> {
        store.quads_for_pattern(None, None, None, Some(graph)).unwrap()
    }

    #[test]
    fn insert_and_delete_data() {
        let store = MemoryStore::new();
        update(
            &store,
            "(insertData
               (triple <http://e/s> <http://e/p> 1)
               (graph <http://e/g> (triple <http://e/s> <http://e/p> 2)))",
        )
        .unwrap();
        assert_eq!(graph(&store, GraphNameRef::DefaultGraph).len(), 1);
        assert_eq!(graph(&store, ex("g").as_ref().into()).len(), 1);

        update(&store, "(deleteData (triple <http://e/s> <http://e/p> 1))").unwrap();
        assert!(graph(&store, GraphNameRef::DefaultGraph).is_empty());
    }

    #[test]
    fn insert_data_renames_blank_nodes() {
        let store = MemoryStore::new();
        let data = "(insertData (triple _:b <http://e/p> 1))";
        update(&store, data).unwrap();
        update(&store, data).unwrap();
        let quads = graph(&store, GraphNameRef::DefaultGraph);
        assert_eq!(quads.len(), 2);
        assert_ne!(quads[0].subject, quads[1].subject);
    }

    #[test]
    fn delete_insert_evaluates_the_pattern_first() {
        let store = MemoryStore::new();
        update(
            &store,
            "(insertData
               (triple <http://e/a> <http://e/age> 1)
               (triple <http://e/b> <http://e/age> 2))",
        )
        .unwrap();
        update(
            &store,
            "(modify
               (delete (triple ?s <http://e/age> ?o))
               (insert (triple ?s <http://e/age> ?n))
               (extend ((?n (+ ?o 1))) (bgp (triple ?s <http://e/age> ?o))))",
        )
        .unwrap();
        let mut ages = graph(&store, GraphNameRef::DefaultGraph)
            .into_iter()
            .map(|quad| quad.object)
            .collect::<Vec<_>>();
        ages.sort_by_key(ToString::to_string);
        assert_eq!(
            ages,
            vec![Term::from(Literal::from(2)), Term::from(Literal::from(3))]
        );
    }

    #[test]
    fn with_sets_the_graph_of_templates_and_pattern() {
        let store = MemoryStore::new();
        update(
            &store,
            "(insertData (graph <http://e/g> (triple <http://e/a> <http://e/p> 1)))",
        )
        .unwrap();
        update(
            &store,
            "(with <http://e/g>
               (modify (insert (triple ?s <http://e/q> ?o)) (bgp (triple ?s <http://e/p> ?o))))",
        )
        .unwrap();
        assert_eq!(graph(&store, ex("g").as_ref().into()).len(), 2);
        assert!(graph(&store, GraphNameRef::DefaultGraph).is_empty());
    }

    #[test]
    fn graph_management() {
        let store = MemoryStore::new();
        update(&store, "(create <http://e/g>)").unwrap();
        assert!(matches!(
            update(&store, "(create <http://e/g>)"),
            Err(QueryEvaluationError::GraphAlreadyExists(_))
        ));
        update(&store, "(create silent <http://e/g>)").unwrap();

        update(&store, "(insertData (triple <http://e/a> <http://e/p> 1))").unwrap();
        update(&store, "(copy default <http://e/g>)").unwrap();
        assert_eq!(graph(&store, ex("g").as_ref().into()).len(), 1);

        update(&store, "(move <http://e/g> <http://e/h>)").unwrap();
        assert!(!store.contains_named_graph(ex("g").as_ref().into()).unwrap());
        assert_eq!(graph(&store, ex("h").as_ref().into()).len(), 1);

        assert!(matches!(
            update(&store, "(drop <http://e/g>)"),
            Err(QueryEvaluationError::GraphDoesNotExist(_))
        ));
        update(&store, "(drop silent <http://e/g>)").unwrap();
        update(&store, "(clear all)").unwrap();
        assert!(graph(&store, GraphNameRef::DefaultGraph).is_empty());
        assert!(store.contains_named_graph(ex("h").as_ref().into()).unwrap());
        update(&store, "(drop named)").unwrap();
        assert!(store.named_graphs().unwrap().is_empty());
    }

    #[test]
    fn failed_loads_are_ignored_when_silent() {
        let store = MemoryStore::new();
        assert!(matches!(
            update(&store, "(load <file:///does/not/exist.ttl>)"),
            Err(QueryEvaluationError::Storage(_))
        ));
        update(&store, "(load silent <file:///does/not/exist.ttl>)").unwrap();
    }

    /// A store whose graphs cannot be cleared or dropped.
    struct ReadOnlyGraphs(MemoryStore);

    impl Queryable for ReadOnlyGraphs {
        fn quads_for_pattern(
            &self,
            subject: Option<SubjectRef<'_>>,
            predicate: Option<NamedNodeRef<'_>>,
            object: Option<TermRef<'_>>,
            graph_name: Option<GraphNameRef<'_>>,
        ) -> Result<Vec<Quad>, StorageError> {
            self.0.quads_for_pattern(subject, predicate, object, graph_name)
        }

        fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
            self.0.named_graphs()
        }

        fn contains_named_graph(
            &self,
            graph_name: NamedOrBlankNodeRef<'_>,
        ) -> Result<bool, StorageError> {
            self.0.contains_named_graph(graph_name)
        }
    }

    impl QueryableMut for ReadOnlyGraphs {
        fn insert(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
            self.0.insert(quad)
        }

        fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
            self.0.remove(quad)
        }

        fn create_named_graph(
            &self,
            graph_name: NamedOrBlankNodeRef<'_>,
        ) -> Result<bool, StorageError> {
            self.0.create_named_graph(graph_name)
        }

        fn drop_named_graph(&self, _: NamedOrBlankNodeRef<'_>) -> Result<bool, StorageError> {
            Err(StorageError::other("read-only graph"))
        }

        fn clear_graph(&self, _: GraphNameRef<'_>) -> Result<(), StorageError> {
            Err(StorageError::other("read-only graph"))
        }

        fn load(
            &self,
            iri: NamedNodeRef<'_>,
            graph_name: GraphNameRef<'_>,
        ) -> Result<usize, StorageError> {
            self.0.load(iri, graph_name)
        }
    }

    #[test]
    fn failed_clears_and_drops_are_ignored_when_silent() {
        let store = ReadOnlyGraphs(MemoryStore::new());
        let update = |sse: &str| {
            execute_update(&store, &parse_update(sse).unwrap(), &UpdateOptions::default())
        };
        update("(insertData (graph <http://e/g> (triple <http://e/a> <http://e/p> 1)))").unwrap();

        for operation in ["(clear default)", "(clear <http://e/g>)", "(drop all)"] {
            assert!(
                matches!(update(operation), Err(QueryEvaluationError::Storage(_))),
                "{operation}"
            );
        }
        let silent = ["(clear silent default)", "(clear silent <http://e/g>)", "(drop silent all)"];
        for operation in silent {
            update(operation).unwrap();
        }
        assert!(store.contains_named_graph(ex("g").as_ref().into()).unwrap());
    }
}
