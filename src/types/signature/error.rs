/// An error indicating that an input does not match the signature grammar.
///
/// The whole input is rejected; no operation returns a partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed signature {input:?} at offset {offset}: {reason}")]
pub struct MalformedSignature {
    /// The rejected input.
    pub input: String,
    /// The byte offset at which the input stopped matching the grammar.
    pub offset: usize,
    /// What was expected at [`offset`](Self::offset).
    pub reason: &'static str,
}

impl MalformedSignature {
    pub(crate) fn new(input: &str, offset: usize, reason: &'static str) -> Self {
        Self {
            input: input.to_owned(),
            offset,
            reason,
        }
    }
}
