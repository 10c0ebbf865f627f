/// The JSON envelope as parsed, all fields optional, strings borrowed from
/// the input buffer wherever no unescaping was needed.
#[derive(Debug, simd_json_derive::Deserialize)]
#[simd_json(rename_all = "camelCase")]
pub(crate) struct RawSourceMap<'a> {
    pub version: Option<u32>,
    pub file: Option<&'a str>,
    pub source_root: Option<&'a str>,
    pub sources: Option<Vec<Option<&'a str>>>,
    pub sources_content: Option<Vec<Option<&'a str>>>,
    pub names: Option<Vec<&'a str>>,
    pub mappings: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::RawSourceMap;
    use simd_json_derive::Deserialize;

    #[test]
    fn test_parse_success() {
        let mut bytes = br#"{
    "version":3,
    "file":"min.js",
    "sourceRoot":"/the/root",
    "sources":["one.js","two.js"],
    "names":["bar","baz","n"],
    "mappings":"CAAC,IAAI,IAAM,SAAUA,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA"
}"#
        .to_vec();
        let raw = RawSourceMap::from_slice(bytes.as_mut_slice()).unwrap();
        assert_eq!(raw.version, Some(3));
        assert_eq!(raw.source_root, Some("/the/root"));
        assert_eq!(raw.sources.unwrap().len(), 2);
    }

    #[test]
    fn test_parse_error() {
        let mut bytes = br#"{
    "version":3,
    "file":"min.js",
    "sources":["one.js"]
    "names":[]
}"#
        .to_vec();
        assert!(RawSourceMap::from_slice(bytes.as_mut_slice()).is_err())
    }
}
