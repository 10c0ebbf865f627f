use std::error::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while loading the JSON envelope or, in
/// [strict mode](crate::DecodeMode::Strict), while decoding the `mappings`
/// string.
///
/// Lenient decoding never produces the mapping-level variants; malformed
/// segments are dropped instead (see [DecodeMode](crate::DecodeMode)).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("source map syntax error: {0}")]
    Syntax(Box<dyn Error>),
    #[error("a mapping segment is malformed: \"{0}\"")]
    MappingMalformed(String),
    #[error("a mapping references unknown source #{0}")]
    UnknownSourceReference(u32),
    #[error("a mapping references unknown name #{0}")]
    UnknownNameReference(u32),
}

impl From<simd_json::Error> for ParseError {
    fn from(value: simd_json::Error) -> Self {
        Self::Syntax(Box::new(value))
    }
}
