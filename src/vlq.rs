use crate::{DecodeMode, ParseError, ParseResult};
use std::io;
use std::io::Write;

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_VALUES: [i8; 256] = base64_value_map();

const fn base64_value_map() -> [i8; 256] {
    let mut res = [-1i8; 256];
    // `for in` is not allowed in const fn
    let mut idx = 0;
    while idx < 64 {
        res[BASE64_CHARS[idx] as usize] = idx as i8;
        idx += 1;
    }
    res
}

/// Decodes the VLQ fields of one comma-delimited segment.
///
/// Each field is a run of base64 digits carrying 5 payload bits apiece, the
/// sixth bit marking continuation, with the sign of the value in the lowest
/// payload position.
#[derive(Debug)]
pub(crate) struct VlqDecoder {
    buf: [i64; 5],
}

impl VlqDecoder {
    pub fn new() -> Self {
        Self { buf: [0; 5] }
    }

    /// Returns the completed fields of `segment`, at most five.
    ///
    /// A byte outside the base64 alphabet consumes nothing: in lenient mode
    /// the segment ends at the last completed field (a trailing partial field
    /// is not counted), while strict mode fails. A segment carrying more than
    /// five fields decodes to an empty slice in lenient mode so the caller
    /// drops it whole.
    pub fn decode(&mut self, segment: &str, mode: DecodeMode) -> ParseResult<&[i64]> {
        let mut len = 0;

        let mut cur_value: i64 = 0;
        let mut shift = 0;

        for byte in segment.bytes() {
            let value = BASE64_VALUES[byte as usize] as i64;
            if value < 0 {
                if mode == DecodeMode::Strict {
                    return Err(ParseError::MappingMalformed(segment.to_owned()));
                }
                shift = 0;
                break;
            }

            let digit = value & 0b11111;
            let Some(shifted) = digit.checked_shl(shift) else {
                // a field wider than the accumulator cannot be meaningful
                return match mode {
                    DecodeMode::Strict => Err(ParseError::MappingMalformed(segment.to_owned())),
                    DecodeMode::Lenient => Ok(&[]),
                };
            };
            cur_value += shifted;
            shift += 5;

            if value & 0b100000 == 0 {
                if len == 5 {
                    return match mode {
                        DecodeMode::Strict => {
                            Err(ParseError::MappingMalformed(segment.to_owned()))
                        }
                        DecodeMode::Lenient => Ok(&[]),
                    };
                }

                let is_negative = (cur_value & 1) == 1;
                cur_value >>= 1;
                if is_negative {
                    cur_value = -cur_value;
                }
                self.buf[len] = cur_value;
                len += 1;
                cur_value = 0;
                shift = 0;
            }
        }

        if shift != 0 && mode == DecodeMode::Strict {
            // dangling continuation bit
            return Err(ParseError::MappingMalformed(segment.to_owned()));
        }

        Ok(&self.buf[..len])
    }
}

/// Writes delta-encoded VLQ fields into the underlying writer.
#[derive(Debug)]
pub(crate) struct VlqEncoder<'a, W>
where
    W: Write,
{
    writer: &'a mut W,
}

impl<'a, W> VlqEncoder<'a, W>
where
    W: Write,
{
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    pub fn encode(&mut self, prev: u32, cur: u32) -> io::Result<()> {
        let delta = i64::from(cur) - i64::from(prev);

        let mut value = if delta < 0 {
            (((-delta) as u64) << 1) | 1
        } else {
            (delta as u64) << 1
        };

        while value >= 32 {
            self.writer
                .write_all(&[BASE64_CHARS[(0b100000 | (value & 0b11111)) as usize]])?;
            value >>= 5;
        }
        self.writer.write_all(&[BASE64_CHARS[value as usize]])
    }
}
