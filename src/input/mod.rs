pub mod parser;

pub use parser::{InputParser, ParseEvent, ParsePhase};
