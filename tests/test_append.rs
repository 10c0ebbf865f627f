use stitchmap::{Mapping, SourceMap};

const TEST_FILE_A: &str = r#"{"version":3,"file":"a/min.js","sourceRoot":"/a/root","sources":["one.js","two.js"],"names":["bar","baz","n"],"mappings":"CAAC,IAAI,IAAM,SAAUA,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA"}"#;
const TEST_FILE_B: &str = r#"{"version":3,"file":"b/min.js","sourceRoot":"/b/root","sources":["three.js","four.js"],"names":["foo","foe","m"],"mappings":"CAAC,IAAI,IAAM,SAAUA,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA"}"#;
const TEST_FILE_C: &str = r#"{"version":3,"file":"c/min.js","sources":["/a/root/one.js","/a/root/two.js","/b/root/three.js","/b/root/four.js"],"names":["bar","baz","n","foo","foe","m"],"mappings":"CAAC,IAAI,IAAM,SAAUA,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA;CCDT,IAAI,IAAM,SAAUC,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA"}"#;

fn load(json: &str) -> SourceMap {
    SourceMap::from(json.as_bytes().to_vec()).unwrap()
}

#[test]
fn test_append_two_maps() {
    let mut a = load(TEST_FILE_A);
    let mut b = load(TEST_FILE_B);

    let mut c = SourceMap::new();
    c.append(&mut a, 0).unwrap();
    c.append(&mut b, 2).unwrap();
    c.set_file("c/min.js");

    assert_eq!(c.to_string().unwrap(), TEST_FILE_C);
}

#[test]
fn test_append_shifts_lines_and_unions_sources() {
    let mut a = load(
        r#"{"version":3,"sources":["one.js","two.js"],"mappings":"AAAA,ACAA"}"#,
    );
    let mut b = load(
        r#"{"version":3,"sources":["three.js","four.js"],"mappings":"AAAA;ACAA"}"#,
    );
    let b_lines: Vec<u32> = b
        .mappings()
        .unwrap()
        .iter()
        .map(|m| m.generated().line)
        .collect();

    a.append(&mut b, 2).unwrap();

    assert_eq!(a.sources(), ["one.js", "two.js", "three.js", "four.js"]);
    let mappings = a.mappings().unwrap();
    assert_eq!(mappings.len(), 4);
    for (mapping, b_line) in mappings[2..].iter().zip(b_lines) {
        assert_eq!(mapping.generated().line, b_line + 2);
    }
    assert_eq!(mappings[2].source_info().unwrap().id, 2);
    assert_eq!(mappings[3].source_info().unwrap().id, 3);
}

#[test]
fn test_append_dedups_shared_sources() {
    let mut a = load(r#"{"version":3,"sources":["one.js"],"names":["bar"],"mappings":"CAACA"}"#);
    let mut b = load(r#"{"version":3,"sources":["one.js"],"names":["bar"],"mappings":"CAACA"}"#);

    a.append(&mut b, 1).unwrap();

    assert_eq!(a.sources(), ["one.js"]);
    assert_eq!(a.names(), ["bar"]);
    let mappings = a.mappings().unwrap();
    assert_eq!(mappings.len(), 2);
    assert_eq!(mappings[1], Mapping::new(2, 1).with_source(0, 1, 1).with_name(0));
}

#[test]
fn test_append_carries_content() {
    let mut a = SourceMap::new();
    let mut b = load(
        r#"{"version":3,"sources":["one.js"],"sourcesContent":["let a;"],"mappings":"AAAA"}"#,
    );

    a.append(&mut b, 0).unwrap();

    assert_eq!(a.sources(), ["one.js"]);
    assert_eq!(a.sources_content(), [Some("let a;".to_owned())]);
}

#[test]
fn test_append_drops_unresolvable_sources() {
    let mut a = SourceMap::new();
    // references source #1 which does not exist
    let mut b = load(r#"{"version":3,"sources":["one.js"],"mappings":"CCAC"}"#);

    a.append(&mut b, 0).unwrap();

    assert!(a.sources().is_empty());
    let mappings = a.mappings().unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0], Mapping::new(1, 1));
}
