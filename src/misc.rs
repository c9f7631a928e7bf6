use std::os::raw::c_char;

use crate::error::{AsiError, AsiResult};

/// Read a fixed-size, NUL-padded SDK text field into an owned `String`.
///
/// Everything from the first NUL on is ignored; a field without any NUL is
/// used whole. Surrounding whitespace is trimmed.
pub fn fixed_c_string(field: &'static str, raw: &[c_char]) -> AsiResult<String> {
    let bytes: Vec<u8> = raw
        .iter()
        .map(|&c| c as u8)
        .take_while(|&b| b != 0)
        .collect();
    let text = std::str::from_utf8(&bytes).map_err(|_| AsiError::DecodeText { field })?;
    Ok(text.trim().to_string())
}

/// `ASI_BOOL` and the other int-as-bool record fields.
pub fn flag(value: i32) -> bool {
    value != 0
}

#[cfg(test)]
pub(crate) fn to_fixed<const N: usize>(text: &str) -> [c_char; N] {
    let mut out = [0 as c_char; N];
    for (slot, b) in out.iter_mut().zip(text.bytes()) {
        *slot = b as c_char;
    }
    out
}
