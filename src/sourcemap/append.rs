use crate::{Mapping, ParseResult, SourceMap};

impl SourceMap {
    /// Concatenates `other` onto this map, shifting every copied entry down
    /// by `line_offset` generated lines.
    ///
    /// Both mapping tables are decoded first. Each copied entry's source is
    /// re-interned into this map under its *resolved* path (carrying its
    /// content along) and its name under the raw value, so tables shared
    /// between the two maps collapse to single entries and indices are
    /// rewritten accordingly. Generated columns are untouched.
    ///
    /// Nothing relates `line_offset` to the lines already mapped here; the
    /// caller composes offsets from however many lines of generated output
    /// precede `other`'s contribution.
    ///
    /// `other` is borrowed mutably because decoding its table and resolving
    /// its source paths populate caches on it.
    pub fn append(&mut self, other: &mut SourceMap, line_offset: u32) -> ParseResult<()> {
        self.decode_mappings()?;
        let copied = other.mappings()?.to_vec();

        // resolving a source path is the expensive step; runs of entries
        // referencing the same source reuse the previous translation
        let mut last_translated: Option<(u32, Option<u32>)> = None;

        for mapping in copied {
            let generated = mapping.generated();
            let mut rebuilt =
                Mapping::new(generated.line.saturating_add(line_offset), generated.column);

            if let Some(info) = mapping.source_info() {
                let source_id = match last_translated {
                    Some((from, to)) if from == info.id => to,
                    _ => {
                        let to = match other.resolved_source(info.id).map(ToOwned::to_owned) {
                            Some(resolved) => {
                                let content = other.source_content(info.id).map(ToOwned::to_owned);
                                self.add_source(&resolved, content.as_deref())
                            }
                            None => None,
                        };
                        last_translated = Some((info.id, to));
                        to
                    }
                };

                if let Some(source_id) = source_id {
                    rebuilt =
                        rebuilt.with_source(source_id, info.position.line, info.position.column);

                    let name = mapping
                        .name_info()
                        .and_then(|name_id| other.name(name_id))
                        .map(ToOwned::to_owned);
                    if let Some(name_id) = name.and_then(|name| self.add_name(&name)) {
                        rebuilt = rebuilt.with_name(name_id);
                    }
                }
            }

            self.add_mapping(rebuilt)?;
        }

        Ok(())
    }
}
