use stitchmap::{Mapping, SourceMap};

/// Builds the JSON envelope of a map with `lines * segments_per_line`
/// entries, shaped roughly like the output of a minifier.
pub fn synthetic_map(lines: u32, segments_per_line: u32) -> Vec<u8> {
    let mut sm = SourceMap::new();
    sm.set_file("app.min.js");
    let source = sm.add_source("app.js", None).unwrap();
    let name = sm.add_name("callback").unwrap();

    for line in 1..=lines {
        for segment in 0..segments_per_line {
            let mut mapping =
                Mapping::new(line, segment * 7).with_source(source, line, segment * 3);
            if segment % 5 == 0 {
                mapping = mapping.with_name(name);
            }
            sm.add_mapping(mapping).unwrap();
        }
    }

    sm.to_vec().unwrap()
}
