use crate::mappings::ItemsCount;
use crate::path;
use crate::sourcemap::raw::RawSourceMap;
use crate::{DecodeMode, Mapping, Mappings, ParseResult};
use simd_json_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::io;
use std::io::Write;

/// The mapping table in one of its two lives.
#[derive(Debug, Clone)]
enum MappingsState {
    /// Still the raw `mappings` string as loaded; written back verbatim.
    Encoded(String),
    /// Materialized entries; the string is regenerated on write.
    Decoded(Mappings),
}

/// `SourceMap` is the in-memory model of a Source Map v3 document.
///
/// # Methods
///
/// ## Parsing
///
/// You can create a `SourceMap` using [new](Self::new), [from](Self::from),
/// [from_slice](Self::from_slice) or [from_str](Self::from_str). The slice
/// and str variants take mutable references because string escapes are
/// rewritten in place during parsing. Loading rebuilds the value→index side
/// of the `sources`/`names` tables; the first occurrence of a value keeps
/// its index forever.
///
/// ## Mappings
///
/// The `mappings` string is decoded on first access through
/// [mappings](Self::mappings) / [mappings_mut](Self::mappings_mut) and
/// re-encoded (sorted) on [write](Self::write) once it has been decoded. A
/// map that is loaded and written back untouched passes the encoded string
/// through byte for byte.
///
/// ## Interning
///
/// [add_source](Self::add_source) and [add_name](Self::add_name) intern
/// strings into the tables: append-only, dedup by value, insertion order is
/// index order.
///
/// ## Resolution
///
/// [original_source](Self::original_source),
/// [original_full_source](Self::original_full_source) and
/// [original_resolved_source](Self::original_resolved_source) resolve a
/// mapping's source index to the raw table entry, the entry under
/// `sourceRoot`, and the path resolved against the directory of `file`.
/// Resolved paths are cached per source index the first time they are
/// computed and never invalidated: set `sourceRoot` and `file` before the
/// first resolution.
///
/// ## Merging
///
/// [append](Self::append) concatenates another map below this one; see its
/// documentation.
#[derive(Clone)]
pub struct SourceMap {
    version: u32,
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: MappingsState,
    decode_mode: DecodeMode,
    source_index: HashMap<String, u32>,
    name_index: HashMap<String, u32>,
    full_sources: HashMap<u32, String>,
    resolved_sources: HashMap<u32, String>,
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SourceMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SourceMap\n")?;
        f.write_str("  sources:\n")?;
        for (idx, source) in self.sources.iter().enumerate() {
            writeln!(f, "    {idx}: {source}")?;
        }
        f.write_str("  names:\n")?;
        for (idx, name) in self.names.iter().enumerate() {
            writeln!(f, "    {idx}: {name}")?;
        }
        f.write_str("  mappings:")?;
        match &self.mappings {
            MappingsState::Encoded(raw) => write!(f, " \"{raw}\" (encoded)"),
            MappingsState::Decoded(mappings) => {
                let mut last_line = 0;
                for mapping in mappings.iter() {
                    if mapping.generated().line != last_line {
                        f.write_str("\n    ")?;
                    } else {
                        f.write_str(", ")?;
                    }
                    write!(f, "{mapping:?}")?;
                    last_line = mapping.generated().line;
                }
                Ok(())
            }
        }
    }
}

impl SourceMap {
    /// Creates an empty version-3 map.
    pub fn new() -> Self {
        Self {
            version: 3,
            file: None,
            source_root: None,
            sources: Vec::new(),
            sources_content: Vec::new(),
            names: Vec::new(),
            mappings: MappingsState::Encoded(String::new()),
            decode_mode: DecodeMode::default(),
            source_index: HashMap::new(),
            name_index: HashMap::new(),
            full_sources: HashMap::new(),
            resolved_sources: HashMap::new(),
        }
    }

    /// Selects the decode mode for the not-yet-decoded `mappings` string.
    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    /// Creates a new `SourceMap` from a JSON buffer.
    #[inline]
    pub fn from(mut json: Vec<u8>) -> ParseResult<Self> {
        Self::from_slice(&mut json)
    }

    /// Creates a new `SourceMap` from a JSON buffer slice.
    ///
    /// The slice is mutable to facilitate in-place replacement of escape
    /// characters in the JSON string.
    #[inline]
    pub fn from_slice(json: &mut [u8]) -> ParseResult<Self> {
        Ok(Self::from_raw(RawSourceMap::from_slice(json)?))
    }

    /// Creates a new `SourceMap` from a JSON string; see
    /// [from_slice](Self::from_slice).
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &mut str) -> ParseResult<Self> {
        Ok(Self::from_raw(RawSourceMap::from_str(json)?))
    }

    fn from_raw(raw: RawSourceMap<'_>) -> Self {
        let sources: Vec<String> = raw
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.unwrap_or_default().to_owned())
            .collect();
        let names: Vec<String> = raw
            .names
            .unwrap_or_default()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect();
        let sources_content = raw
            .sources_content
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.map(ToOwned::to_owned))
            .collect();

        // the envelope only carries the ordered tables; rebuild the
        // value-to-index side
        let source_index = build_index(&sources);
        let name_index = build_index(&names);

        Self {
            version: raw.version.unwrap_or(0),
            file: raw.file.filter(|s| !s.is_empty()).map(ToOwned::to_owned),
            source_root: raw
                .source_root
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
            sources,
            sources_content,
            names,
            mappings: MappingsState::Encoded(raw.mappings.unwrap_or_default().to_owned()),
            decode_mode: DecodeMode::default(),
            source_index,
            name_index,
            full_sources: HashMap::new(),
            resolved_sources: HashMap::new(),
        }
    }
}

fn build_index(values: &[String]) -> HashMap<String, u32> {
    let mut index = HashMap::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        // first value wins on duplicates
        index.entry(value.clone()).or_insert(idx as u32);
    }
    index
}

impl SourceMap {
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    #[inline]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Sets the generated file name. Resolved-path caches are built against
    /// it, so set it before the first call to
    /// [original_resolved_source](Self::original_resolved_source).
    pub fn set_file(&mut self, file: impl Into<String>) {
        let file = file.into();
        self.file = (!file.is_empty()).then_some(file);
    }

    #[inline]
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// Sets the prefix applied to every source name. Same caching caveat as
    /// [set_file](Self::set_file).
    pub fn set_source_root(&mut self, source_root: impl Into<String>) {
        let source_root = source_root.into();
        self.source_root = (!source_root.is_empty()).then_some(source_root);
    }

    #[inline]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[inline]
    pub fn sources_content(&self) -> &[Option<String>] {
        &self.sources_content
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl SourceMap {
    /// Interns a source path, returning its stable index.
    ///
    /// The first insertion of a value decides its index forever; adding an
    /// already-present value returns the existing index and leaves any
    /// previously recorded content alone. An empty name is not a source and
    /// yields `None`.
    ///
    /// ```
    /// # use stitchmap::SourceMap;
    /// let mut sm = SourceMap::new();
    /// assert_eq!(sm.add_source("one.js", None), Some(0));
    /// assert_eq!(sm.add_source("two.js", Some("let x;")), Some(1));
    /// assert_eq!(sm.add_source("one.js", None), Some(0));
    /// assert_eq!(sm.add_source("", None), None);
    /// ```
    pub fn add_source(&mut self, name: &str, content: Option<&str>) -> Option<u32> {
        if name.is_empty() {
            return None;
        }
        if let Some(&idx) = self.source_index.get(name) {
            return Some(idx);
        }
        let idx = self.sources.len() as u32;
        self.sources.push(name.to_owned());
        self.source_index.insert(name.to_owned(), idx);
        if let Some(content) = content {
            // align the content table, padding the gap for sources that
            // never had any
            if self.sources_content.len() < self.sources.len() {
                self.sources_content.resize(self.sources.len(), None);
            }
            self.sources_content[idx as usize] = Some(content.to_owned());
        }
        Some(idx)
    }

    /// Interns an identifier name; same contract as
    /// [add_source](Self::add_source), minus content.
    pub fn add_name(&mut self, name: &str) -> Option<u32> {
        if name.is_empty() {
            return None;
        }
        if let Some(&idx) = self.name_index.get(name) {
            return Some(idx);
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_owned());
        self.name_index.insert(name.to_owned(), idx);
        Some(idx)
    }

    /// O(1) lookup of an interned source path.
    #[inline]
    pub fn index_for_source(&self, name: &str) -> Option<u32> {
        self.source_index.get(name).copied()
    }

    /// O(1) lookup of an interned name.
    #[inline]
    pub fn index_for_name(&self, name: &str) -> Option<u32> {
        self.name_index.get(name).copied()
    }
}

impl SourceMap {
    pub(crate) fn decode_mappings(&mut self) -> ParseResult<&mut Mappings> {
        if let MappingsState::Encoded(raw) = &self.mappings {
            let decoded = Mappings::decode(
                raw,
                ItemsCount::new(self.sources.len() as u32, self.names.len() as u32),
                self.decode_mode,
            )?;
            self.mappings = MappingsState::Decoded(decoded);
        }
        match &mut self.mappings {
            MappingsState::Decoded(mappings) => Ok(mappings),
            // replaced just above
            MappingsState::Encoded(_) => unreachable!(),
        }
    }

    /// The decoded mapping table, materialized from the encoded string on
    /// first access.
    ///
    /// In [DecodeMode::Lenient] (the default) this cannot fail; strict mode
    /// surfaces malformed segments and out-of-range references.
    pub fn mappings(&mut self) -> ParseResult<&Mappings> {
        self.decode_mappings().map(|m| &*m)
    }

    /// Mutable access to the decoded table. The string is regenerated from
    /// it on the next [write](Self::write).
    pub fn mappings_mut(&mut self) -> ParseResult<&mut Mappings> {
        self.decode_mappings()
    }

    /// Drops both the decoded entries and the encoded string.
    pub fn clear_mappings(&mut self) {
        self.mappings = MappingsState::Encoded(String::new());
    }

    /// Appends one entry to the decoded table, decoding first if needed so
    /// no previously encoded entries are lost.
    pub fn add_mapping(&mut self, mapping: Mapping) -> ParseResult<()> {
        self.decode_mappings()?.push(mapping);
        Ok(())
    }

    /// Sorts the decoded entries and returns the regenerated `mappings`
    /// string. Pure with respect to the sorted table: calling it twice
    /// without mutation yields identical strings.
    pub fn encode_mappings(&mut self) -> ParseResult<String> {
        let mappings = self.decode_mappings()?;
        mappings.sort();
        Ok(mappings.encoded())
    }
}

impl SourceMap {
    /// The raw `sources` entry for `mapping`, if it references one in range.
    pub fn original_source(&self, mapping: &Mapping) -> Option<&str> {
        let info = mapping.source_info()?;
        self.sources.get(info.id as usize).map(String::as_str)
    }

    /// The source path with `sourceRoot` applied; cached per source index on
    /// first use.
    pub fn original_full_source(&mut self, mapping: &Mapping) -> Option<&str> {
        let info = mapping.source_info()?;
        self.full_source(info.id)
    }

    /// The full source path resolved against the directory containing `file`
    /// and normalized; a path that is already absolute, or a map without a
    /// `file`, resolves to the full source unchanged. Cached per source
    /// index on first use.
    pub fn original_resolved_source(&mut self, mapping: &Mapping) -> Option<&str> {
        let info = mapping.source_info()?;
        self.resolved_source(info.id)
    }

    /// The embedded original text for `mapping`'s source, if any.
    pub fn original_source_content(&self, mapping: &Mapping) -> Option<&str> {
        let info = mapping.source_info()?;
        self.source_content(info.id)
    }

    /// The interned name `mapping` refers to, if it has one in range.
    pub fn original_name(&self, mapping: &Mapping) -> Option<&str> {
        self.name(mapping.name_info()?)
    }

    pub(crate) fn full_source(&mut self, id: u32) -> Option<&str> {
        if id as usize >= self.sources.len() {
            return None;
        }
        if self.source_root.is_none() {
            return self.sources.get(id as usize).map(String::as_str);
        }
        if !self.full_sources.contains_key(&id) {
            let root = self.source_root.as_deref().unwrap_or_default();
            let full = path::join(root, &self.sources[id as usize]);
            self.full_sources.insert(id, full);
        }
        self.full_sources.get(&id).map(String::as_str)
    }

    pub(crate) fn resolved_source(&mut self, id: u32) -> Option<&str> {
        if self.file.is_none() {
            return self.full_source(id);
        }
        if !self.resolved_sources.contains_key(&id) {
            let full = self.full_source(id)?.to_owned();
            let resolved = if path::is_abs(&full) {
                full
            } else {
                let file_dir = path::dir(self.file.as_deref().unwrap_or_default());
                path::join(&file_dir, &full)
            };
            self.resolved_sources.insert(id, resolved);
        }
        self.resolved_sources.get(&id).map(String::as_str)
    }

    pub(crate) fn source_content(&self, id: u32) -> Option<&str> {
        self.sources_content.get(id as usize)?.as_deref()
    }

    pub(crate) fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }
}

impl SourceMap {
    /// Writes the JSON envelope.
    ///
    /// `version` is written as 3 when unset, `file`/`sourceRoot` are omitted
    /// when empty, `sources` and `names` are always emitted, and `mappings`
    /// is regenerated (sorted) only if the entries were decoded — otherwise
    /// the loaded string passes through unchanged.
    pub fn write<W>(&mut self, w: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        w.write_all(br#"{"version":"#)?;
        let version = if self.version == 0 { 3 } else { self.version };
        version.json_write(w)?;

        if let Some(file) = self.file.as_deref() {
            w.write_all(br#","file":"#)?;
            file.json_write(w)?;
        }
        if let Some(source_root) = self.source_root.as_deref() {
            w.write_all(br#","sourceRoot":"#)?;
            source_root.json_write(w)?;
        }

        w.write_all(br#","sources":"#)?;
        self.sources.json_write(w)?;

        if !self.sources_content.is_empty() {
            // never emit more content entries than sources
            w.write_all(br#","sourcesContent":["#)?;
            for (idx, content) in self
                .sources_content
                .iter()
                .take(self.sources.len())
                .enumerate()
            {
                if idx != 0 {
                    w.write_all(b",")?;
                }
                content.json_write(w)?;
            }
            w.write_all(b"]")?;
        }

        w.write_all(br#","names":"#)?;
        self.names.json_write(w)?;

        w.write_all(br#","mappings":""#)?;
        match &mut self.mappings {
            MappingsState::Encoded(raw) => w.write_all(raw.as_bytes())?,
            MappingsState::Decoded(mappings) => {
                mappings.sort();
                mappings.encode(w)?;
            }
        }
        w.write_all(br#""}"#)
    }

    #[inline]
    pub fn to_vec(&mut self) -> io::Result<Vec<u8>> {
        let mut v = Vec::with_capacity(1024);
        self.write(&mut v)?;
        Ok(v)
    }

    #[inline]
    pub fn to_string(&mut self) -> io::Result<String> {
        self.to_vec()
            .map(|v| unsafe { String::from_utf8_unchecked(v) })
    }
}
