pub mod graph;
pub mod propagation;
pub mod succession;

pub use graph::{GraphStatistics, RelatednessGraph};
pub use propagation::RelatednessPropagator;
pub use succession::Succession;
