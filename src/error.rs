use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuccessionError {
    #[error("Malformed bounds on line {line}: {reason}")]
    MalformedBounds { line: usize, reason: String },

    #[error("Malformed founder on line {line}: expected a single name, found {tokens} tokens")]
    MalformedFounder { line: usize, tokens: usize },

    #[error("Malformed relationship on line {line}: expected `child parent parent`, found {tokens} tokens")]
    MalformedRelationship { line: usize, tokens: usize },

    #[error("Malformed claimant on line {line}: expected a single name, found {tokens} tokens")]
    MalformedClaimant { line: usize, tokens: usize },

    #[error("Unexpected input on line {line}: every declared claimant has already been read")]
    TrailingInput { line: usize },

    #[error("Input ended early: {0}")]
    IncompleteInput(String),

    #[error("No founder has been designated")]
    FounderNotSet,

    #[error("Relatedness has already been computed; the pedigree is frozen")]
    AlreadyComputed,

    #[error("Pedigree contains a cycle through '{0}'")]
    CyclicPedigree(String),

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SuccessionError>;
