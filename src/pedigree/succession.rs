use crate::error::Result;
use crate::pedigree::graph::RelatednessGraph;
use crate::pedigree::propagation::RelatednessPropagator;
use crate::types::{HeirReport, Person, PropagationPolicy, ScoreEntry};
use std::collections::HashSet;
use tracing::{debug, info};

/// A pedigree together with the claimants competing for the succession.
#[derive(Debug, Default)]
pub struct Succession {
    graph: RelatednessGraph,
    claimants: Vec<String>,
    propagator: RelatednessPropagator,
}

impl Succession {
    pub fn new(policy: PropagationPolicy) -> Self {
        Self {
            graph: RelatednessGraph::new(),
            claimants: Vec::new(),
            propagator: RelatednessPropagator::new(policy),
        }
    }

    pub fn set_founder(&mut self, name: &str) -> Result<()> {
        self.graph.set_founder(name)
    }

    pub fn founder(&self) -> Option<&str> {
        self.graph.founder()
    }

    pub fn add_relationship(&mut self, child: &str, parent_a: &str, parent_b: &str) -> Result<()> {
        self.graph.add_relationship(child, parent_a, parent_b)
    }

    /// Register a claimant by name. Names absent from the pedigree are kept
    /// but can never be chosen.
    pub fn add_claimant(&mut self, name: &str) {
        self.claimants.push(name.to_string());
    }

    pub fn claimants(&self) -> &[String] {
        &self.claimants
    }

    pub fn graph(&self) -> &RelatednessGraph {
        &self.graph
    }

    pub fn policy(&self) -> PropagationPolicy {
        self.propagator.policy()
    }

    /// Run propagation if needed and return the computed graph
    pub fn compute(&mut self) -> Result<&RelatednessGraph> {
        self.propagator.propagate(&mut self.graph)?;
        Ok(&self.graph)
    }

    /// The claimant most closely related to the founder.
    ///
    /// Candidates are the graph's own vertices whose names were claimed, scanned
    /// in vertex order. Only a strictly higher coefficient replaces the current
    /// best, so ties go to the earliest vertex and a zero score never beats
    /// the "no heir found" placeholder.
    pub fn heir(&mut self) -> Result<Person> {
        self.compute()?;

        let claimed: HashSet<&str> = self.claimants.iter().map(String::as_str).collect();
        let mut heir = Person::no_heir();

        for candidate in self.graph.vertices().filter(|p| claimed.contains(p.name())) {
            debug!("Claimant {} has relatedness {}", candidate, candidate.relatedness());
            if candidate.relatedness() > heir.relatedness() {
                heir = candidate.clone();
            }
        }

        info!("Selected heir: {} ({})", heir, heir.relatedness());
        Ok(heir)
    }

    /// Heir query packaged with the context a report needs
    pub fn heir_report(&mut self) -> Result<HeirReport> {
        let heir = self.heir()?;
        let claimants_in_pedigree = self
            .claimants
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|name| self.graph.contains(name))
            .count();

        Ok(HeirReport {
            heir: heir.name().to_string(),
            relatedness: heir.relatedness(),
            founder: self.founder().map(str::to_string),
            policy: self.policy(),
            claimants: self.claimants.len(),
            claimants_in_pedigree,
        })
    }

    /// Every vertex with its computed relatedness, in vertex order
    pub fn scores(&mut self) -> Result<Vec<ScoreEntry>> {
        self.compute()?;

        let claimed: HashSet<&str> = self.claimants.iter().map(String::as_str).collect();
        Ok(self
            .graph
            .vertices()
            .map(|person| ScoreEntry {
                name: person.name().to_string(),
                relatedness: person.relatedness(),
                claimant: claimed.contains(person.name()),
            })
            .collect())
    }
}
