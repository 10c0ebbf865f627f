use memchr::Memchr2;

/// Splits a `mappings` string into comma-delimited segments.
///
/// Each item carries the segment text plus a flag telling whether the
/// separator after it was a `;`, i.e. whether the generated line advances
/// before the next segment. The final segment reports `false`.
#[derive(Debug)]
pub(crate) struct SegmentSplitter<'a> {
    string: &'a str,
    cur_start: usize,
    memchr: Memchr2<'a>,
}

impl<'a> SegmentSplitter<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            string,
            memchr: memchr::memchr2_iter(b';', b',', string.as_bytes()),
            cur_start: 0,
        }
    }
}

impl<'a> Iterator for SegmentSplitter<'a> {
    // (segment, line advances after it)
    type Item = (&'a str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        match self.memchr.next() {
            Some(end) => {
                let ends_line = self.string.as_bytes()[end] == b';';
                let segment = &self.string[self.cur_start..end];
                self.cur_start = end + 1;
                Some((segment, ends_line))
            }
            None => {
                if self.cur_start > self.string.len() {
                    return None;
                }
                let segment = &self.string[self.cur_start..];
                self.cur_start = self.string.len() + 1;
                Some((segment, false))
            }
        }
    }
}
