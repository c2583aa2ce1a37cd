//! Core types shared by the pedigree, parser and report layers
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name reported when no claimant qualifies as heir.
pub const NO_HEIR: &str = "no heir found";

/// A member of the pedigree, or a claimant to the succession.
///
/// The name is the only identity: two records with the same name are the same
/// person for equality, hashing and ordering, whatever their relatedness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    name: String,
    relatedness: f64,
}

impl Person {
    pub fn new(name: impl Into<String>, relatedness: f64) -> Self {
        Self {
            name: name.into(),
            relatedness,
        }
    }

    /// Placeholder returned by the heir query when nobody qualifies
    pub fn no_heir() -> Self {
        Self::new(NO_HEIR, 0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relatedness(&self) -> f64 {
        self.relatedness
    }

    pub(crate) fn set_relatedness(&mut self, relatedness: f64) {
        self.relatedness = relatedness;
    }

    pub(crate) fn add_relatedness(&mut self, delta: f64) {
        self.relatedness += delta;
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Person {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Whether relatedness has been propagated through a graph yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputationState {
    #[default]
    Uninitialized,
    Computed,
}

/// Algorithm used to push relatedness from the founder to descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PropagationPolicy {
    /// Single breadth-first pass. Each edge is applied when its parent is
    /// dequeued, so a child whose parents sit at different depths may pass on
    /// a partial value to its own children.
    #[default]
    BreadthFirst,
    /// Parents are fully resolved before any child propagates.
    Topological,
}

impl fmt::Display for PropagationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationPolicy::BreadthFirst => f.write_str("breadth_first"),
            PropagationPolicy::Topological => f.write_str("topological"),
        }
    }
}

/// Outcome of a heir query, ready for formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeirReport {
    pub heir: String,
    pub relatedness: f64,
    pub founder: Option<String>,
    pub policy: PropagationPolicy,
    pub claimants: usize,
    pub claimants_in_pedigree: usize,
}

/// One row of the `scores` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub relatedness: f64,
    pub claimant: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_relatedness() {
        let a = Person::new("Anne", 0.0);
        let b = Person::new("Anne", 0.75);

        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_is_by_name() {
        let mut people = vec![
            Person::new("Carl", 0.9),
            Person::new("Anne", 0.1),
            Person::new("Bert", 0.5),
        ];
        people.sort();

        let names: Vec<&str> = people.iter().map(Person::name).collect();
        assert_eq!(names, vec!["Anne", "Bert", "Carl"]);
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(Person::new("Edmund", 0.25).to_string(), "Edmund");
        assert_eq!(Person::no_heir().to_string(), NO_HEIR);
    }

    #[test]
    fn test_policy_serde_names() {
        let yaml = serde_yaml::to_string(&PropagationPolicy::Topological).unwrap();
        assert_eq!(yaml.trim(), "topological");

        let parsed: PropagationPolicy = serde_yaml::from_str("breadth_first").unwrap();
        assert_eq!(parsed, PropagationPolicy::BreadthFirst);
    }

    #[test]
    fn test_policy_cli_names_match_config() {
        use clap::ValueEnum;

        for policy in PropagationPolicy::value_variants() {
            let cli_name = policy.to_possible_value().unwrap().get_name().to_string();
            let yaml_name = serde_yaml::to_string(policy).unwrap();
            assert_eq!(cli_name, yaml_name.trim());
            assert_eq!(cli_name, policy.to_string());
        }

        assert_eq!(
            <PropagationPolicy as ValueEnum>::from_str("breadth_first", false),
            Ok(PropagationPolicy::BreadthFirst)
        );
        assert!(<PropagationPolicy as ValueEnum>::from_str("breadth-first", false).is_err());
    }
}
