use std::fmt;

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, FormatError>;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Parse Error at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("Face references material {index}, but only {count} materials are defined")]
    MaterialOutOfRange { index: usize, count: usize },
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Everything that can go wrong while reading a single token, line or block of an `.mqo` document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing 'Metasequoia Document' declaration, found \"{0}\"")]
    InvalidHeader(String),
    #[error("Unsupported text version: \"{0}\"")]
    UnsupportedVersion(String),
    #[error("Expected `{expected}`, found \"{found}\"")]
    ExpectedToken {
        expected: &'static str,
        found: String,
    },
    #[error("Expected opening quote, found \"{0}\"")]
    ExpectedQuote(String),
    #[error("Quote is not terminated by a matching {0}")]
    UnterminatedQuote(char),
    #[error("Expected `(` after argument \"{0}\"")]
    ExpectedOpenParen(String),
    #[error("Expected `)` closing argument \"{0}\"")]
    ExpectedCloseParen(String),
    #[error("Malformed number: \"{0}\"")]
    MalformedNumber(String),
    #[error("Face declares {declared} vertices, but V lists {found}")]
    VertexCountMismatch { declared: usize, found: usize },
    #[error("{block} block declares {declared} entries, but ends after {found}")]
    TruncatedBlock {
        block: &'static str,
        declared: usize,
        found: usize,
    },
    #[error("Input ends inside {0} block")]
    UnexpectedEnd(&'static str),
}

impl ParseError {
    /// Header, delimiter and quote failures; everything that is neither a number nor a face count
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            ParseError::MalformedNumber(_) | ParseError::VertexCountMismatch { .. }
        )
    }
}

/// A malformed part of the document that was skipped while parsing leniently
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based line in the source document
    pub line: usize,
    pub error: ParseError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

impl From<Diagnostic> for FormatError {
    fn from(diagnostic: Diagnostic) -> Self {
        FormatError::Parse {
            line: diagnostic.line,
            source: diagnostic.error,
        }
    }
}
