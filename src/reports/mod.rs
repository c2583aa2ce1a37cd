pub mod formatters;
pub mod generator;
pub mod graphviz;

pub use formatters::{JsonFormatter, ReportFormatter, TextFormatter};
pub use generator::ReportGenerator;
pub use graphviz::GraphRenderer;
