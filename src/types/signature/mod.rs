//! Generic type and method signatures.
//!
//! A signature is a compact string over a small alphabet of sigils (see [`sigil`]). This module
//! validates signatures ([`scanner`]), parses them into a tree ([`tree`]), extracts
//! sub-signatures ([`decompose`]), builds them ([`compose`]), renders them for humans
//! ([`render`]) and strips their generic parameterization ([`erasure`]).
//!
//! Qualified names may use either `.` or `/` as qualifier separator on input. A `.` following a
//! type-argument list introduces a member type. A `$` is part of an identifier and is only
//! translated into `.` when rendering.

use std::str::FromStr;

use crate::macros::see_jvm_spec;

pub mod compose;
pub mod decompose;
pub mod erasure;
mod error;
pub mod render;
pub mod scanner;
pub mod tree;

pub use error::MalformedSignature;
pub use tree::{ParsedSignature, parse};

/// The sigils of the signature alphabet.
pub mod sigil {
    /// Starts an array dimension.
    pub const ARRAY: char = '[';
    /// Starts a resolved class type.
    pub const RESOLVED: char = 'L';
    /// Starts an unresolved class type.
    pub const UNRESOLVED: char = 'Q';
    /// Starts a type variable.
    pub const TYPE_VARIABLE: char = 'T';
    /// Terminates a class type or a type variable.
    pub const TERMINATOR: char = ';';
    /// Opens a type-argument or formal type parameter list.
    pub const GENERIC_START: char = '<';
    /// Closes a type-argument or formal type parameter list.
    pub const GENERIC_END: char = '>';
    /// Separates qualifiers in the source form and introduces member types.
    pub const DOT: char = '.';
    /// Separates qualifiers in the compiled form.
    pub const SLASH: char = '/';
    /// Separates member types in binary names.
    pub const DOLLAR: char = '$';
    /// The unbounded wildcard.
    pub const STAR: char = '*';
    /// Starts an upper-bounded wildcard.
    pub const EXTENDS: char = '+';
    /// Starts a lower-bounded wildcard.
    pub const SUPER: char = '-';
    /// Starts a capture of a wildcard.
    pub const CAPTURE: char = '!';
    /// Starts an intersection type.
    pub const INTERSECTION: char = '|';
    /// Separates bounds of formal type parameters and intersection types.
    pub const COLON: char = ':';
    /// Opens a parameter list.
    pub const PARAMETERS_START: char = '(';
    /// Closes a parameter list.
    pub const PARAMETERS_END: char = ')';
    /// Starts a thrown type.
    pub const EXCEPTION_START: char = '^';
}

/// Whether the named type of a class type signature is bound to the environment.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Resolution {
    /// The type is known to exist. Encoded with [`sigil::RESOLVED`].
    Resolved,
    /// The type is not yet bound. Encoded with [`sigil::UNRESOLVED`].
    Unresolved,
}

impl Resolution {
    /// Returns the sigil that starts a class type with this resolution.
    #[must_use]
    pub const fn sigil(self) -> char {
        match self {
            Self::Resolved => sigil::RESOLVED,
            Self::Unresolved => sigil::UNRESOLVED,
        }
    }
}

/// The kind of a signature.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, derive_more::Display)]
pub enum SignatureKind {
    /// A primitive type or `void`.
    #[display("base type")]
    BaseType,
    /// A possibly parameterized class type.
    #[display("class type")]
    ClassType,
    /// An array type.
    #[display("array type")]
    ArrayType,
    /// A reference to a type variable.
    #[display("type variable")]
    TypeVariable,
    /// A wildcard type argument.
    #[display("wildcard")]
    Wildcard,
    /// A capture of a wildcard.
    #[display("capture")]
    Capture,
    /// An intersection type.
    #[display("intersection type")]
    Intersection,
    /// A method signature.
    #[display("method")]
    Method,
    /// A formal type parameter.
    #[display("type parameter")]
    TypeParameter,
    /// The signature of a class declaration.
    #[display("class declaration")]
    ClassDeclaration,
}

/// An owned, validated signature.
#[doc = see_jvm_spec!(4, 7, 9, 1)]
///
/// Equality, ordering and hashing are structural on the signature text.
/// ```
/// use typesig::types::signature::{Signature, SignatureKind};
///
/// let sig: Signature = "[[Ljava.lang.String;".parse()?;
/// assert_eq!(sig.kind(), SignatureKind::ArrayType);
/// assert!(sig.starts_with("[["));
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, derive_more::Display, derive_more::Deref,
)]
#[display("{text}")]
pub struct Signature {
    #[deref(forward)]
    text: String,
    kind: SignatureKind,
}

impl Signature {
    /// Returns the signature text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the kind of the signature.
    #[must_use]
    pub const fn kind(&self) -> SignatureKind {
        self.kind
    }

    /// Consumes the signature and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Parses the signature into its tree.
    /// # Errors
    /// Never fails for a [`Signature`] constructed through its public API; the [`Result`] is kept
    /// so that callers can use `?` uniformly with [`parse`].
    pub fn parse_tree(&self) -> Result<ParsedSignature<'_>, MalformedSignature> {
        parse(&self.text)
    }

    /// Wraps text the codec itself produced.
    pub(crate) fn from_parts(text: String, kind: SignatureKind) -> Self {
        Self { text, kind }
    }
}

impl FromStr for Signature {
    type Err = MalformedSignature;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let kind = parse(text)?.kind();
        Ok(Self::from_parts(text.to_owned(), kind))
    }
}

impl TryFrom<&str> for Signature {
    type Error = MalformedSignature;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl TryFrom<String> for Signature {
    type Error = MalformedSignature;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let kind = parse(&text)?.kind();
        Ok(Self::from_parts(text, kind))
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.text
    }
}
