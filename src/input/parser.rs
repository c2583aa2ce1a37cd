use crate::error::{Result, SuccessionError};
use crate::pedigree::Succession;
use crate::types::PropagationPolicy;
use tracing::{debug, trace};

/// Which kind of line the parser expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    Bounds,
    Founder,
    Relationships,
    Claimants,
    Complete,
}

/// What consuming a line produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent {
    Consumed,
    /// The last relationship has been read; the graph will not change shape
    /// again, so this is the moment to snapshot it.
    RelationshipsComplete,
}

/// Line-oriented reader for succession input.
///
/// The input is read in four phases: a bounds line `R C`, the founder's name,
/// `R` lines of `child parent parent`, then `C` claimant names.
#[derive(Debug)]
pub struct InputParser {
    succession: Succession,
    phase: ParsePhase,
    line_number: usize,
    relationships_expected: usize,
    relationships_parsed: usize,
    claimants_expected: usize,
    claimants_parsed: usize,
}

impl InputParser {
    pub fn new(succession: Succession) -> Self {
        Self {
            succession,
            phase: ParsePhase::Bounds,
            line_number: 0,
            relationships_expected: 0,
            relationships_parsed: 0,
            claimants_expected: 0,
            claimants_parsed: 0,
        }
    }

    /// Parse a whole input held in memory
    pub fn parse_str(input: &str, policy: PropagationPolicy) -> Result<Succession> {
        let mut parser = Self::new(Succession::new(policy));
        for line in input.lines() {
            parser.parse_line(line)?;
        }
        parser.finish()
    }

    pub fn succession(&self) -> &Succession {
        &self.succession
    }

    /// Consume the next input line
    pub fn parse_line(&mut self, line: &str) -> Result<ParseEvent> {
        self.line_number += 1;
        trace!("Line {} ({:?}): {}", self.line_number, self.phase, line);

        match self.phase {
            ParsePhase::Bounds => self.parse_bounds(line),
            ParsePhase::Founder => self.parse_founder(line),
            ParsePhase::Relationships => self.parse_relationship(line),
            ParsePhase::Claimants => self.parse_claimant(line),
            ParsePhase::Complete => {
                if line.trim().is_empty() {
                    Ok(ParseEvent::Consumed)
                } else {
                    Err(SuccessionError::TrailingInput {
                        line: self.line_number,
                    })
                }
            }
        }
    }

    /// Hand over the populated succession once every declared line was read.
    pub fn finish(self) -> Result<Succession> {
        let missing = match self.phase {
            ParsePhase::Complete => return Ok(self.succession),
            ParsePhase::Bounds => "missing the bounds line".to_string(),
            ParsePhase::Founder => "missing the founder line".to_string(),
            ParsePhase::Relationships => format!(
                "read {} of {} relationships",
                self.relationships_parsed, self.relationships_expected
            ),
            ParsePhase::Claimants => format!(
                "read {} of {} claimants",
                self.claimants_parsed, self.claimants_expected
            ),
        };
        Err(SuccessionError::IncompleteInput(missing))
    }

    fn parse_bounds(&mut self, line: &str) -> Result<ParseEvent> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(SuccessionError::MalformedBounds {
                line: self.line_number,
                reason: format!("expected two counts, found {} tokens", tokens.len()),
            });
        }

        self.relationships_expected = self.parse_count(tokens[0], "relationship")?;
        self.claimants_expected = self.parse_count(tokens[1], "claimant")?;
        debug!(
            "Expecting {} relationships and {} claimants",
            self.relationships_expected, self.claimants_expected
        );

        self.phase = ParsePhase::Founder;
        Ok(ParseEvent::Consumed)
    }

    fn parse_count(&self, token: &str, what: &str) -> Result<usize> {
        token.parse().map_err(|_| SuccessionError::MalformedBounds {
            line: self.line_number,
            reason: format!("{} count '{}' is not a non-negative integer", what, token),
        })
    }

    fn parse_founder(&mut self, line: &str) -> Result<ParseEvent> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 1 {
            return Err(SuccessionError::MalformedFounder {
                line: self.line_number,
                tokens: tokens.len(),
            });
        }

        self.succession.set_founder(tokens[0])?;
        debug!("Founder: {}", tokens[0]);

        if self.relationships_expected == 0 {
            self.enter_claimants();
            return Ok(ParseEvent::RelationshipsComplete);
        }
        self.phase = ParsePhase::Relationships;
        Ok(ParseEvent::Consumed)
    }

    fn parse_relationship(&mut self, line: &str) -> Result<ParseEvent> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[child, parent_a, parent_b] = tokens.as_slice() else {
            return Err(SuccessionError::MalformedRelationship {
                line: self.line_number,
                tokens: tokens.len(),
            });
        };

        self.succession.add_relationship(child, parent_a, parent_b)?;
        self.relationships_parsed += 1;

        if self.relationships_parsed == self.relationships_expected {
            self.enter_claimants();
            return Ok(ParseEvent::RelationshipsComplete);
        }
        Ok(ParseEvent::Consumed)
    }

    fn parse_claimant(&mut self, line: &str) -> Result<ParseEvent> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 1 {
            return Err(SuccessionError::MalformedClaimant {
                line: self.line_number,
                tokens: tokens.len(),
            });
        }

        self.succession.add_claimant(tokens[0]);
        self.claimants_parsed += 1;

        if self.claimants_parsed == self.claimants_expected {
            self.phase = ParsePhase::Complete;
            debug!("Read all {} claimants", self.claimants_parsed);
        }
        Ok(ParseEvent::Consumed)
    }

    fn enter_claimants(&mut self) {
        let stats = self.succession.graph().statistics();
        debug!(
            "Pedigree complete: {} vertices, {} edges, {} roots, {} leaves",
            stats.total_vertices, stats.total_edges, stats.root_vertices, stats.leaf_vertices
        );

        self.phase = if self.claimants_expected == 0 {
            ParsePhase::Complete
        } else {
            ParsePhase::Claimants
        };
    }
}
