use stitchmap::{Mapping, SourceMap};

#[test]
fn test_interning() {
    let mut sm = SourceMap::new();
    assert_eq!(sm.add_source("one.js", None), Some(0));
    assert_eq!(sm.add_source("two.js", None), Some(1));
    assert_eq!(sm.add_source("one.js", None), Some(0));
    assert_eq!(sm.add_source("", None), None);
    assert_eq!(sm.sources(), ["one.js", "two.js"]);

    assert_eq!(sm.add_name("bar"), Some(0));
    assert_eq!(sm.add_name("baz"), Some(1));
    assert_eq!(sm.add_name("bar"), Some(0));
    assert_eq!(sm.add_name(""), None);

    assert_eq!(sm.index_for_source("two.js"), Some(1));
    assert_eq!(sm.index_for_source("three.js"), None);
    assert_eq!(sm.index_for_name("baz"), Some(1));
    assert_eq!(sm.index_for_name("qux"), None);
}

#[test]
fn test_interning_pads_content() {
    let mut sm = SourceMap::new();
    sm.add_source("one.js", None);
    assert!(sm.sources_content().is_empty());

    sm.add_source("two.js", Some("let b;"));
    assert_eq!(sm.sources_content(), [None, Some("let b;".to_owned())]);

    // re-adding never overwrites recorded content
    sm.add_source("two.js", Some("changed"));
    assert_eq!(sm.sources_content()[1].as_deref(), Some("let b;"));
}

#[test]
fn test_index_rebuilt_on_load() {
    let json = r#"{"version":3,"sources":["one.js","two.js","one.js"],"names":["n"]}"#;
    let mut sm = SourceMap::from(json.as_bytes().to_vec()).unwrap();
    // first occurrence of a duplicate wins its index forever
    assert_eq!(sm.index_for_source("one.js"), Some(0));
    assert_eq!(sm.index_for_source("two.js"), Some(1));
    assert_eq!(sm.index_for_name("n"), Some(0));
    assert_eq!(sm.add_source("one.js", None), Some(0));
}

#[test]
fn test_full_source() {
    let mut sm = SourceMap::new();
    sm.set_source_root("/the/root");
    sm.add_source("one.js", None);
    let mapping = Mapping::new(1, 0).with_source(0, 1, 0);

    assert_eq!(sm.original_source(&mapping), Some("one.js"));
    assert_eq!(sm.original_full_source(&mapping), Some("/the/root/one.js"));
    // no file set: resolved falls back to the full source
    assert_eq!(
        sm.original_resolved_source(&mapping),
        Some("/the/root/one.js")
    );
}

#[test]
fn test_resolved_source_relative_to_file() {
    let mut sm = SourceMap::new();
    sm.set_source_root("the/root");
    sm.set_file("c/min.js");
    sm.add_source("../one.js", None);
    sm.add_source("two.js", None);
    let first = Mapping::new(1, 0).with_source(0, 1, 0);
    let second = Mapping::new(1, 4).with_source(1, 1, 0);

    // `..` and `.` collapse during the join
    assert_eq!(sm.original_full_source(&first), Some("the/one.js"));
    assert_eq!(sm.original_resolved_source(&first), Some("c/the/one.js"));
    assert_eq!(sm.original_resolved_source(&second), Some("c/the/root/two.js"));
}

#[test]
fn test_absolute_full_source_ignores_file() {
    let mut sm = SourceMap::new();
    sm.set_source_root("/a/root");
    sm.set_file("a/min.js");
    sm.add_source("one.js", None);
    let mapping = Mapping::new(1, 0).with_source(0, 1, 0);

    assert_eq!(sm.original_resolved_source(&mapping), Some("/a/root/one.js"));
}

#[test]
fn test_resolution_caches_are_permanent() {
    let mut sm = SourceMap::new();
    sm.set_source_root("/the/root");
    sm.add_source("one.js", None);
    let mapping = Mapping::new(1, 0).with_source(0, 1, 0);
    assert_eq!(sm.original_full_source(&mapping), Some("/the/root/one.js"));

    // mutating the root after the first resolution is out of contract;
    // the cached path stays
    sm.set_source_root("/other");
    assert_eq!(sm.original_full_source(&mapping), Some("/the/root/one.js"));
}

#[test]
fn test_content_and_name_lookup() {
    let json = r#"{"version":3,"sources":["one.js"],"sourcesContent":["let a;"],"names":["bar"],"mappings":"CAACA"}"#;
    let mut sm = SourceMap::from(json.as_bytes().to_vec()).unwrap();
    let mapping = sm.mappings().unwrap()[0].clone();

    assert_eq!(sm.original_source_content(&mapping), Some("let a;"));
    assert_eq!(sm.original_name(&mapping), Some("bar"));

    let sourceless = Mapping::new(1, 0);
    assert_eq!(sm.original_source(&sourceless), None);
    assert_eq!(sm.original_source_content(&sourceless), None);
    assert_eq!(sm.original_name(&sourceless), None);
}
