use crate::mapping::Mapping;
use crate::splitter::SegmentSplitter;
use crate::vlq::{VlqDecoder, VlqEncoder};
use crate::{ParseError, ParseResult};
use std::io;
use std::io::Write;
use std::ops::{Deref, DerefMut};

/// Controls how the decoder treats nonconformant `mappings` input.
///
/// Plenty of tools emit mildly broken mapping strings; rejecting a whole map
/// because of one bogus segment is usually worse than dropping that segment,
/// so [Lenient](Self::Lenient) is the default. In lenient mode a malformed
/// VLQ digit ends its segment at the last completed field, segments with a
/// field count other than 1/4/5 produce no mapping, a delta that would
/// overflow its running accumulator drops the segment, and out-of-range
/// source/name references are kept as-is (they resolve to `None`).
/// [Strict](Self::Strict) turns each of those into a
/// [ParseError](crate::ParseError).
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum DecodeMode {
    #[default]
    Lenient,
    Strict,
}

/// `Mappings` is the decoded mapping table, a collection of [Mapping]
/// entries in decode/insertion order.
#[derive(Debug, Clone, Default)]
pub struct Mappings(pub(crate) Vec<Mapping>);

impl Deref for Mappings {
    type Target = [Mapping];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Mappings {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Mappings {
    /// Creates a new `Mappings` from a vec of [Mapping] entries, sorted into
    /// encoding order.
    pub fn new(raw: Vec<Mapping>) -> Self {
        let mut v = Self(raw);
        v.sort();
        v
    }

    /// Sorts entries by generated line, then generated column.
    ///
    /// The sort is stable: entries sharing a generated position keep their
    /// relative order, so encoding an already-sorted table never scrambles
    /// ties.
    pub fn sort(&mut self) {
        self.0.sort_by_key(Mapping::generated)
    }

    /// Appends one entry. Encoding sorts, so insertion order is free.
    pub fn push(&mut self, mapping: Mapping) {
        self.0.push(mapping)
    }
}

/// Table sizes a strict decode validates references against.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ItemsCount {
    pub(crate) sources: u32,
    pub(crate) names: u32,
}

impl ItemsCount {
    pub fn new(sources: u32, names: u32) -> Self {
        Self { sources, names }
    }
}

impl Mappings {
    /// Encodes the table into the compact `mappings` form.
    ///
    /// Expects the entries sorted (see [sort](Self::sort)); all six running
    /// fields are delta-coded against the previous entry, `;` advances the
    /// generated line and resets the generated column, `,` separates entries
    /// on one line. A name on a sourceless entry is unrepresentable and is
    /// dropped, mirroring the decoder's segment widths.
    pub(crate) fn encode<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let mut prev_generated_line = 1;
        let mut prev_generated_col = 0;
        let mut prev_source_id = 0;
        let mut prev_source_line = 1;
        let mut prev_source_col = 0;
        let mut prev_name_id = 0;

        for (idx, mapping) in self.0.iter().enumerate() {
            let generated_pos = mapping.generated();

            if generated_pos.line > prev_generated_line {
                prev_generated_col = 0;
                while generated_pos.line > prev_generated_line {
                    writer.write_all(b";")?;
                    prev_generated_line += 1;
                }
            } else if idx != 0 {
                writer.write_all(b",")?;
            }

            let mut encoder = VlqEncoder::new(writer);

            encoder.encode(prev_generated_col, generated_pos.column)?;
            prev_generated_col = generated_pos.column;

            if let Some(source_info) = mapping.source_info() {
                encoder.encode(prev_source_id, source_info.id)?;
                prev_source_id = source_info.id;

                encoder.encode(prev_source_line, source_info.position.line)?;
                prev_source_line = source_info.position.line;

                encoder.encode(prev_source_col, source_info.position.column)?;
                prev_source_col = source_info.position.column;

                if let Some(name_id) = mapping.name_info() {
                    encoder.encode(prev_name_id, name_id)?;
                    prev_name_id = name_id;
                }
            }
        }

        Ok(())
    }

    /// Encodes into a fresh string.
    pub(crate) fn encoded(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.encode(&mut buf);
        // SAFETY: the encoder emits base64 digits and separators only
        unsafe { String::from_utf8_unchecked(buf) }
    }
}

/// The six running accumulators of the segment grammar.
///
/// Generated line/column advance with `;`; the original-side fields never
/// reset across lines. Values are kept wide because leniently decoded input
/// may push an accumulator negative before later deltas bring it back.
#[derive(Debug, Copy, Clone)]
struct DecodeState {
    generated_line: i64,
    generated_col: i64,
    source_id: i64,
    source_line: i64,
    source_col: i64,
    name_id: i64,
}

impl Default for DecodeState {
    fn default() -> Self {
        Self {
            generated_line: 1,
            generated_col: 0,
            source_id: 0,
            source_line: 1,
            source_col: 0,
            name_id: 0,
        }
    }
}

impl DecodeState {
    /// Applies a segment's deltas in field order. Returns `false` when an
    /// accumulator would overflow `i64`; fields before the offending one stay
    /// applied and the segment is treated like any other malformed one.
    fn apply(&mut self, fields: &[i64]) -> bool {
        for (idx, &delta) in fields.iter().enumerate() {
            let slot = match idx {
                0 => &mut self.generated_col,
                1 => &mut self.source_id,
                2 => &mut self.source_line,
                3 => &mut self.source_col,
                _ => &mut self.name_id,
            };
            match slot.checked_add(delta) {
                Some(value) => *slot = value,
                None => return false,
            }
        }
        true
    }

    /// Builds the mapping for a segment of the given width, or `None` when
    /// the current values are not representable (negative coordinates from
    /// bad input) and the mode allows dropping it.
    fn mapping(
        &self,
        width: usize,
        items_count: ItemsCount,
        mode: DecodeMode,
        segment: &str,
    ) -> ParseResult<Option<Mapping>> {
        let malformed = || ParseError::MappingMalformed(segment.to_owned());

        let (Some(generated_line), Some(generated_col)) =
            (to_index(self.generated_line), to_index(self.generated_col))
        else {
            return match mode {
                DecodeMode::Strict => Err(malformed()),
                DecodeMode::Lenient => Ok(None),
            };
        };
        let mut mapping = Mapping::new(generated_line, generated_col);

        if width >= 4 {
            let (Some(source_id), Some(source_line), Some(source_col)) = (
                to_index(self.source_id),
                to_index(self.source_line),
                to_index(self.source_col),
            ) else {
                return match mode {
                    DecodeMode::Strict => Err(malformed()),
                    DecodeMode::Lenient => Ok(None),
                };
            };
            if mode == DecodeMode::Strict && source_id >= items_count.sources {
                return Err(ParseError::UnknownSourceReference(source_id));
            }
            mapping = mapping.with_source(source_id, source_line, source_col);

            if width == 5 {
                let Some(name_id) = to_index(self.name_id) else {
                    return match mode {
                        DecodeMode::Strict => Err(malformed()),
                        DecodeMode::Lenient => Ok(None),
                    };
                };
                if mode == DecodeMode::Strict && name_id >= items_count.names {
                    return Err(ParseError::UnknownNameReference(name_id));
                }
                mapping = mapping.with_name(name_id);
            }
        }

        Ok(Some(mapping))
    }
}

#[inline]
fn to_index(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

impl Mappings {
    /// Decodes a `mappings` string into a table.
    ///
    /// Entries come out in encounter order; the decoder never sorts, so the
    /// table is ordered only if the input was. Segment widths 1/4/5 produce
    /// an entry. Other widths produce none, but the fields that were present
    /// still advance their accumulators, preserving compatibility with the
    /// reference decoder on sloppy input.
    pub(crate) fn decode(
        source: &str,
        items_count: ItemsCount,
        mode: DecodeMode,
    ) -> ParseResult<Self> {
        let mut mappings = Mappings::default();
        let mut state = DecodeState::default();
        let mut decoder = VlqDecoder::new();

        for (segment, ends_line) in SegmentSplitter::new(source) {
            if !segment.is_empty() {
                let fields = decoder.decode(segment, mode)?;

                if state.apply(fields) {
                    match fields.len() {
                        width @ (1 | 4 | 5) => {
                            if let Some(mapping) =
                                state.mapping(width, items_count, mode, segment)?
                            {
                                mappings.0.push(mapping);
                            }
                        }
                        _ => {
                            if mode == DecodeMode::Strict {
                                return Err(ParseError::MappingMalformed(segment.to_owned()));
                            }
                        }
                    }
                } else if mode == DecodeMode::Strict {
                    return Err(ParseError::MappingMalformed(segment.to_owned()));
                }
            }

            if ends_line {
                state.generated_line += 1;
                state.generated_col = 0;
            }
        }

        Ok(mappings)
    }
}
