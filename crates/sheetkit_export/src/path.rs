//! Dotted attribute-path resolution against records.

use crate::conf::{C_PATH_ESCAPE, C_PATH_SEPARATOR};
use crate::record::{EnumRecordValue, RecordAccess};

/// Split `path` on unescaped separators and unescape each segment.
///
/// `"a\\.b.c"` yields `["a.b", "c"]`.
pub fn split_path(path: &str) -> Vec<String> {
    let mut l_segments = Vec::new();
    let mut c_segment = String::new();
    let mut chars = path.chars().peekable();

    while let Some(chr) = chars.next() {
        match chr {
            C_PATH_ESCAPE if chars.peek() == Some(&C_PATH_SEPARATOR) => {
                c_segment.push(C_PATH_SEPARATOR);
                chars.next();
            }
            C_PATH_SEPARATOR => l_segments.push(std::mem::take(&mut c_segment)),
            _ => c_segment.push(chr),
        }
    }
    l_segments.push(c_segment);

    l_segments
}

/// Resolve `path` against `record`, yielding `Null` for anything unresolvable.
pub fn resolve_path<R>(record: &R, path: &str) -> EnumRecordValue
where
    R: RecordAccess + ?Sized,
{
    let l_segments = split_path(path);
    let Some((c_head, l_tail)) = l_segments.split_first() else {
        return EnumRecordValue::Null;
    };

    let Some(mut value) = read_segment(record, c_head) else {
        return EnumRecordValue::Null;
    };
    for c_segment in l_tail {
        match read_segment(&value, c_segment) {
            Some(value_next) => value = value_next,
            None => return EnumRecordValue::Null,
        }
    }

    value
}

fn read_segment<R>(target: &R, segment: &str) -> Option<EnumRecordValue>
where
    R: RecordAccess + ?Sized,
{
    target
        .read_member(segment)
        .filter(|value| !value.is_null())
        .or_else(|| target.read_key(segment))
        .filter(|value| !value.is_null())
}
