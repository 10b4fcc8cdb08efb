use std::fmt;
use rayon::prelude::*;
use crate::concept::ConceptInfo;
use crate::error::Result;
use crate::neighbourhood::executor::{QueryDirection, RoleDirection, TraversalExecutor};
use crate::neighbourhood::sampling::{concept_salt, Sampler};
use crate::neighbourhood::tree::NeighbourhoodTree;

/// A concept together with its lazily expanded neighbourhood
#[derive(Debug)]
pub struct ConceptWithNeighbourhood<'a> {
    pub concept: ConceptInfo,
    pub neighbourhood: Neighbourhood<'a>,
}

impl<'a> ConceptWithNeighbourhood<'a> {
    pub fn leaf(concept: ConceptInfo) -> Self {
        Self {
            concept,
            neighbourhood: Neighbourhood::empty(),
        }
    }

    /// Drain the whole structure into a `NeighbourhoodTree`
    pub fn collect(self) -> Result<NeighbourhoodTree> {
        collect_to_tree(self)
    }
}

/// The role connecting a concept to one of its sampled neighbours
#[derive(Debug)]
pub struct NeighbourRole<'a> {
    pub role_label: String,
    pub role_direction: RoleDirection,
    pub neighbour: ConceptWithNeighbourhood<'a>,
}

/// Lazy sequence of neighbour roles. Each neighbour's own neighbourhood is
/// queried only when this iterator reaches it.
pub struct Neighbourhood<'a> {
    inner: Box<dyn Iterator<Item = Result<NeighbourRole<'a>>> + 'a>,
}

impl<'a> Neighbourhood<'a> {
    pub fn new<I>(roles: I) -> Self
    where
        I: Iterator<Item = Result<NeighbourRole<'a>>> + 'a,
    {
        Self { inner: Box::new(roles) }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<'a> Iterator for Neighbourhood<'a> {
    type Item = Result<NeighbourRole<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for Neighbourhood<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neighbourhood").finish_non_exhaustive()
    }
}

/// Walks outward from a concept, sampling each depth with its own sampler.
///
/// The depth of the produced structure is bounded by the number of samplers.
#[derive(Debug)]
pub struct NeighbourhoodTraverser<E> {
    executor: E,
    samplers: Vec<Sampler>,
}

impl<E: TraversalExecutor> NeighbourhoodTraverser<E> {
    pub fn new(executor: E, samplers: Vec<Sampler>) -> Self {
        Self { executor, samplers }
    }

    pub fn max_depth(&self) -> usize {
        self.samplers.len()
    }

    pub fn samplers(&self) -> &[Sampler] {
        &self.samplers
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn traverse(&self, start: &ConceptInfo) -> Result<ConceptWithNeighbourhood<'_>> {
        self.traverse_from(start.clone(), 0)
    }

    /// Traverse and collect several start concepts in parallel, keeping input order
    pub fn collect_many(&self, starts: &[ConceptInfo]) -> Result<Vec<NeighbourhoodTree>> {
        let trees = starts
            .par_iter()
            .map(|start| -> Result<NeighbourhoodTree> { self.traverse(start)?.collect() })
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Collected {} neighbourhood trees, {} concepts in total",
            trees.len(),
            trees.iter().map(NeighbourhoodTree::node_count).sum::<usize>()
        );

        Ok(trees)
    }

    fn traverse_from<'a>(&'a self, concept: ConceptInfo, depth: usize) -> Result<ConceptWithNeighbourhood<'a>> {
        let sampler = match self.samplers.get(depth) {
            Some(sampler) => sampler,
            None => return Ok(ConceptWithNeighbourhood::leaf(concept)),
        };

        let salt = concept_salt(&concept.id, depth);
        let roles_played = self.executor.execute(QueryDirection::RolesPlayed, &concept)?;
        let sampled = if concept.is_relationship() {
            let roleplayers = self.executor.execute(QueryDirection::Roleplayers, &concept)?;
            sampler.sample_salted(salt, roles_played.chain(roleplayers))?
        } else {
            sampler.sample_salted(salt, roles_played)?
        };

        log::debug!(
            "Depth {}: sampled {} neighbours of {} ({})",
            depth,
            sampled.len(),
            concept.id,
            concept.type_label
        );

        let neighbourhood = sampled.into_iter().map(move |neighbour| -> Result<NeighbourRole<'a>> {
            Ok(NeighbourRole {
                role_label: neighbour.role_label,
                role_direction: neighbour.role_direction,
                neighbour: self.traverse_from(neighbour.neighbour, depth + 1)?,
            })
        });

        Ok(ConceptWithNeighbourhood {
            concept,
            neighbourhood: Neighbourhood::new(neighbourhood),
        })
    }
}

/// Drain a lazy neighbourhood into a concrete tree, propagating the first error
pub fn collect_to_tree(concept_with_neighbourhood: ConceptWithNeighbourhood<'_>) -> Result<NeighbourhoodTree> {
    let ConceptWithNeighbourhood { concept, neighbourhood } = concept_with_neighbourhood;

    let mut tree = NeighbourhoodTree::leaf(concept);
    for role in neighbourhood {
        let role = role?;
        tree.push(role.role_label, role.role_direction, collect_to_tree(role.neighbour)?);
    }

    Ok(tree)
}
