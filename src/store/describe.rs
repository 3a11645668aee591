//! Bounded graph traversals backing describe and list operations.
//!
//! All reads are explicit breadth-first expansions with a hop limit instead
//! of a query language: start from a resource, collect the triples that
//! mention it, then follow blank nodes only. This keeps a describe local to
//! one resource even inside a large shared graph.

use std::collections::{HashSet, VecDeque};

use oxigraph::model::vocab::rdf;
use oxigraph::model::{
    Graph, GraphNameRef, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, Term, TermRef,
    Triple,
};
use oxigraph::store::Store;

use crate::error::StoreError;
use crate::vocab;

/// Copy a stored quad into a result graph. Returns whether it was new.
pub(crate) fn insert_quad(graph: &mut Graph, quad: &Quad) -> bool {
    graph.insert(&Triple::new(
        quad.subject.clone(),
        quad.predicate.clone(),
        quad.object.clone(),
    ))
}

fn term_of(node: NamedOrBlankNodeRef<'_>) -> TermRef<'_> {
    match node {
        NamedOrBlankNodeRef::NamedNode(n) => TermRef::NamedNode(n),
        NamedOrBlankNodeRef::BlankNode(b) => TermRef::BlankNode(b),
    }
}

/// Expand the neighbourhood of `start` into `graph`.
///
/// Hop 0 collects every triple with `start` as subject or object. Blank
/// nodes reached there are expanded breadth-first, up to `max_hops` further
/// levels. Named resources are never expanded past their mention.
pub(crate) fn expand_into(
    store: &Store,
    start: NamedOrBlankNodeRef<'_>,
    max_hops: usize,
    graph: &mut Graph,
) -> Result<(), StoreError> {
    let mut queue: VecDeque<(NamedOrBlankNode, usize)> = VecDeque::new();
    let mut seen: HashSet<NamedOrBlankNode> = HashSet::new();
    seen.insert(start.into_owned());

    for quad in store.quads_for_pattern(Some(start), None, None, Some(GraphNameRef::DefaultGraph))
    {
        let quad = quad?;
        if let Term::BlankNode(b) = &quad.object {
            let node = NamedOrBlankNode::BlankNode(b.clone());
            if seen.insert(node.clone()) {
                queue.push_back((node, 1));
            }
        }
        insert_quad(graph, &quad);
    }
    for quad in
        store.quads_for_pattern(None, None, Some(term_of(start)), Some(GraphNameRef::DefaultGraph))
    {
        let quad = quad?;
        if let NamedOrBlankNode::BlankNode(_) = &quad.subject {
            if seen.insert(quad.subject.clone()) {
                queue.push_back((quad.subject.clone(), 1));
            }
        }
        insert_quad(graph, &quad);
    }

    while let Some((node, depth)) = queue.pop_front() {
        if depth > max_hops {
            continue;
        }
        for quad in
            store.quads_for_pattern(Some(node.as_ref()), None, None, Some(GraphNameRef::DefaultGraph))
        {
            let quad = quad?;
            if insert_quad(graph, &quad) {
                if let Term::BlankNode(b) = &quad.object {
                    let next = NamedOrBlankNode::BlankNode(b.clone());
                    if seen.insert(next.clone()) {
                        queue.push_back((next, depth + 1));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Bounded description of one resource; `NotFound` if nothing mentions it.
pub(crate) fn describe(
    store: &Store,
    uri: NamedNodeRef<'_>,
    max_hops: usize,
) -> Result<Graph, StoreError> {
    let mut graph = Graph::new();
    expand_into(store, uri.into(), max_hops, &mut graph)?;
    if graph.is_empty() {
        return Err(StoreError::NotFound {
            uri: uri.as_str().to_string(),
        });
    }
    Ok(graph)
}

/// Describe a pipeline together with its provenance dependencies.
///
/// A plain describe stops at the pipeline's own triples; rendering a
/// pipeline needs its steps, variables, used plugins, and specialized or
/// generated datasets inlined, each with its distribution sub-graph. This
/// follows exactly those named predicates one extra hop.
pub(crate) fn describe_with_dependencies(
    store: &Store,
    pipeline: NamedNodeRef<'_>,
    max_hops: usize,
) -> Result<Graph, StoreError> {
    let mut graph = describe(store, pipeline, max_hops)?;

    // Steps, variables, and generated datasets point at the pipeline.
    let mut deps: Vec<NamedOrBlankNode> = Vec::new();
    for predicate in [
        vocab::IS_STEP_OF_PLAN,
        vocab::IS_VARIABLE_OF_PLAN,
        vocab::WAS_GENERATED_BY,
    ] {
        for quad in store.quads_for_pattern(
            None,
            Some(predicate),
            Some(pipeline.into()),
            Some(GraphNameRef::DefaultGraph),
        ) {
            deps.push(quad?.subject);
        }
    }

    // Plugins hang off steps, datasets off variables.
    let mut secondary: Vec<NamedOrBlankNode> = Vec::new();
    for dep in &deps {
        for predicate in [vocab::USES_PLUGIN, vocab::SPECIALIZATION_OF] {
            for quad in store.quads_for_pattern(
                Some(dep.as_ref()),
                Some(predicate),
                None,
                Some(GraphNameRef::DefaultGraph),
            ) {
                if let Term::NamedNode(n) = quad?.object {
                    secondary.push(NamedOrBlankNode::NamedNode(n));
                }
            }
        }
    }
    deps.extend(secondary);

    for dep in deps {
        expand_into(store, dep.as_ref(), max_hops, &mut graph)?;
    }
    Ok(graph)
}

/// All triples of all subjects typed with `class`, one hop each; optionally
/// with each subject's distribution sub-graph.
pub(crate) fn list_by_type(
    store: &Store,
    class: NamedNodeRef<'_>,
    with_distributions: bool,
) -> Result<Graph, StoreError> {
    let mut graph = Graph::new();
    for quad in store.quads_for_pattern(
        None,
        Some(rdf::TYPE),
        Some(class.into()),
        Some(GraphNameRef::DefaultGraph),
    ) {
        let subject = quad?.subject;
        let mut distributions: Vec<NamedOrBlankNode> = Vec::new();
        for quad in store.quads_for_pattern(
            Some(subject.as_ref()),
            None,
            None,
            Some(GraphNameRef::DefaultGraph),
        ) {
            let quad = quad?;
            if with_distributions && quad.predicate.as_ref() == vocab::HAS_DISTRIBUTION {
                match &quad.object {
                    Term::BlankNode(b) => {
                        distributions.push(NamedOrBlankNode::BlankNode(b.clone()))
                    }
                    Term::NamedNode(n) => {
                        distributions.push(NamedOrBlankNode::NamedNode(n.clone()))
                    }
                    _ => {}
                }
            }
            insert_quad(&mut graph, &quad);
        }
        for dist in distributions {
            for quad in store.quads_for_pattern(
                Some(dist.as_ref()),
                None,
                None,
                Some(GraphNameRef::DefaultGraph),
            ) {
                insert_quad(&mut graph, &quad?);
            }
        }
    }
    Ok(graph)
}
