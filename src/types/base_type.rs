//! Primitive codes of the signature grammar.
use std::fmt::Display;

use crate::macros::see_jvm_spec;

/// A primitive type, or the `void` marker.
#[doc = see_jvm_spec!(4, 3)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum BaseType {
    /// The `boolean` type.
    Boolean,
    /// The `char` type.
    Char,
    /// The `float` type.
    Float,
    /// The `double` type.
    Double,
    /// The `byte` type.
    Byte,
    /// The `short` type.
    Short,
    /// The `int` type.
    Int,
    /// The `long` type.
    Long,
    /// The `void` marker. Only legal as a return type or as a standalone signature.
    Void,
}

impl BaseType {
    /// All the base types, `void` last.
    pub const ALL: [Self; 9] = [
        Self::Boolean,
        Self::Char,
        Self::Float,
        Self::Double,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Void,
    ];

    /// Returns the one-character code of the type.
    #[must_use]
    pub const fn descriptor(self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Char => 'C',
            Self::Float => 'F',
            Self::Double => 'D',
            Self::Byte => 'B',
            Self::Short => 'S',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Void => 'V',
        }
    }

    /// Returns the source keyword of the type.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Void => "void",
        }
    }

    /// Looks up the base type whose keyword is exactly `keyword`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|it| it.keyword() == keyword)
    }

    /// Checks if the type is the `void` marker.
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }
}

impl TryFrom<char> for BaseType {
    type Error = InvalidBaseType;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            'Z' => Ok(Self::Boolean),
            'C' => Ok(Self::Char),
            'F' => Ok(Self::Float),
            'D' => Ok(Self::Double),
            'B' => Ok(Self::Byte),
            'S' => Ok(Self::Short),
            'I' => Ok(Self::Int),
            'J' => Ok(Self::Long),
            'V' => Ok(Self::Void),
            other => Err(InvalidBaseType(other)),
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An error indicating that a character is not a base type code.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid base type code {0:?}")]
pub struct InvalidBaseType(pub char);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_base_types() {
        let codes = ['Z', 'C', 'F', 'D', 'B', 'S', 'I', 'J', 'V'];
        let types = codes
            .into_iter()
            .map(BaseType::try_from)
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to parse base types");
        assert_eq!(types, BaseType::ALL);
    }

    #[test]
    fn parse_invalid_base_type() {
        assert_eq!(BaseType::try_from('A'), Err(InvalidBaseType('A')));
        assert!(BaseType::try_from('L').is_err());
    }

    #[test]
    fn keyword_must_match_exactly() {
        assert_eq!(BaseType::from_keyword("long"), Some(BaseType::Long));
        assert_eq!(BaseType::from_keyword("longtest"), None);
        assert_eq!(BaseType::from_keyword("Int"), None);
    }

    proptest! {
        #[test]
        fn code_and_keyword_agree(base_type in any::<BaseType>()) {
            assert_eq!(BaseType::try_from(base_type.descriptor()), Ok(base_type));
            assert_eq!(BaseType::from_keyword(base_type.keyword()), Some(base_type));
            assert_eq!(base_type.to_string(), base_type.keyword());
        }
    }
}
