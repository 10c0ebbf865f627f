use std::fmt::{Debug, Formatter};

/// A line/column pair in a text artifact.
///
/// # Note
///
/// Lines are 1-based and columns are 0-based, both on the generated side and
/// in original sources, matching what most NPM tooling (`source-map`,
/// `babel`, stack traces) produces. Tools like `esbuild` count lines from 0,
/// so positions coming from elsewhere may need shifting first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<(u32, u32)> for Position {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

/// A position in a specific original source, identified by the source's
/// index in the owning map's `sources` table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SourceInfo {
    pub id: u32,
    pub position: Position,
}

impl SourceInfo {
    pub const fn new(id: u32, position: Position) -> Self {
        Self { id, position }
    }
}

/// One decoded segment of the `mappings` table.
///
/// A mapping stores indices into the owning map's `sources` and `names`
/// tables, never the strings themselves; resolve them through the map, e.g.
/// [original_source](crate::SourceMap::original_source) or
/// [original_name](crate::SourceMap::original_name).
#[derive(Clone, Eq, PartialEq)]
pub struct Mapping {
    generated: Position,
    source: Option<SourceInfo>,
    name_id: Option<u32>,
}

impl Debug for Mapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.generated.line, self.generated.column)?;
        if let Some(source_info) = self.source_info() {
            write!(
                f,
                " -> {}:{}:{}",
                source_info.id, source_info.position.line, source_info.position.column,
            )?;
            if let Some(name_id) = self.name_info() {
                write!(f, " ({name_id})")?;
            }
        }
        Ok(())
    }
}

impl Mapping {
    /// Creates a generated-only mapping (no original position, no name).
    #[inline(always)]
    pub const fn new(generated_line: u32, generated_col: u32) -> Self {
        Self {
            generated: Position {
                line: generated_line,
                column: generated_col,
            },
            source: None,
            name_id: None,
        }
    }

    #[inline(always)]
    pub const fn with_source(self, source_id: u32, source_line: u32, source_col: u32) -> Self {
        Self {
            source: Some(SourceInfo::new(
                source_id,
                Position::new(source_line, source_col),
            )),
            ..self
        }
    }

    /// Attaches a name index.
    ///
    /// A name is only representable in the encoded form alongside an original
    /// source; on a sourceless mapping it is ignored by the encoder.
    #[inline(always)]
    pub const fn with_name(self, name_id: u32) -> Self {
        Self {
            name_id: Some(name_id),
            ..self
        }
    }
}

impl Mapping {
    /// Returns the generated position of the mapping.
    #[inline]
    pub fn generated(&self) -> Position {
        self.generated
    }

    /// Returns the original source position if available.
    #[inline]
    pub fn source_info(&self) -> Option<SourceInfo> {
        self.source
    }

    /// Checks if the mapping has an original source.
    #[inline]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Returns the name index if available.
    #[inline]
    pub fn name_info(&self) -> Option<u32> {
        self.name_id
    }

    /// Checks if the mapping has a name.
    #[inline]
    pub fn has_name(&self) -> bool {
        self.name_id.is_some()
    }
}
