//! Lexical algebra over forward-slash paths.
//!
//! Source map paths are URL-ish strings, not operating-system paths, so
//! everything here works on `/`-separated text and never touches the
//! filesystem.

pub(crate) fn is_abs(path: &str) -> bool {
    path.starts_with('/')
}

/// Normalizes a path: collapses repeated slashes and `.` elements, resolves
/// `..` against preceding elements, keeps leading `..` in relative paths and
/// drops it at the root. An empty path normalizes to `"."`.
pub(crate) fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    let rooted = is_abs(path);

    let mut elems: Vec<&str> = Vec::new();
    for elem in path.split('/') {
        match elem {
            "" | "." => {}
            ".." => {
                if elems.last().is_some_and(|last| *last != "..") {
                    elems.pop();
                } else if !rooted {
                    elems.push("..");
                }
            }
            _ => elems.push(elem),
        }
    }

    let joined = elems.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, false) => joined,
        (false, true) => ".".to_owned(),
    }
}

/// Joins two path elements with a slash and cleans the result. An empty
/// element is ignored; two empty elements join to `""`.
pub(crate) fn join(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean(b),
        (false, true) => clean(a),
        (false, false) => clean(&format!("{a}/{b}")),
    }
}

/// Returns the cleaned directory portion of `path`: everything up to the
/// final slash, or `"."` when there is none.
pub(crate) fn dir(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => clean(&path[..=idx]),
        None => ".".to_owned(),
    }
}
