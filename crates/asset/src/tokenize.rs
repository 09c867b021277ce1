//! Field splitting shared by the OBJ and MTL parsers.

/// Split `text` on every occurrence of `sep`, dropping empty fields.
///
/// Contiguous separators produce no empty tokens, and a leading or trailing
/// separator yields nothing at the boundary.
pub fn tokenize(text: &str, sep: char) -> Vec<&str> {
    text.split(sep).filter(|t| !t.is_empty()).collect()
}
