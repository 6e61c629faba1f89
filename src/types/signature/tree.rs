//! The parsed representation of signatures.
//!
//! Every node borrows from the parsed input and keeps the exact text it was parsed from, so that
//! sub-signatures can be handed out as zero-copy views.
use super::{MalformedSignature, Resolution, SignatureKind, scanner::Parser, sigil};
use crate::types::base_type::BaseType;

/// A type signature.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TypeNode<'a> {
    /// The text of the signature.
    pub text: &'a str,
    /// The structure of the type.
    pub kind: TypeKind<'a>,
}

/// The structure of a [`TypeNode`].
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum TypeKind<'a> {
    /// A primitive type or `void`.
    Base(BaseType),
    /// A class type.
    Class(ClassType<'a>),
    /// An array type. Consecutive dimensions are folded into one node, so `element` is never an
    /// array.
    Array {
        /// The number of dimensions, at least one.
        dimensions: usize,
        /// The element type.
        element: Box<TypeNode<'a>>,
    },
    /// A reference to a type variable.
    TypeVariable(&'a str),
    /// A wildcard.
    Wildcard(Wildcard<'a>),
    /// A capture of a wildcard.
    Capture(Wildcard<'a>),
    /// An intersection of one or more bounds.
    Intersection(Vec<TypeNode<'a>>),
}

/// A possibly parameterized, possibly member-qualified class type.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassType<'a> {
    /// Whether the type is resolved.
    pub resolution: Resolution,
    /// The outermost type followed by the member types, never empty.
    /// The first segment carries the qualified name as written.
    pub segments: Vec<ClassSegment<'a>>,
}

/// A segment of a [`ClassType`].
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassSegment<'a> {
    /// The qualified name for the first segment, the simple member name otherwise.
    pub name: &'a str,
    /// The type arguments, [`None`] if the segment is raw.
    pub arguments: Option<Vec<TypeNode<'a>>>,
}

impl<'a> ClassType<'a> {
    /// Returns the qualified name of the outermost type.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.segments.first().map_or("", |it| it.name)
    }

    /// Returns the type arguments of the innermost type, empty if it is raw.
    #[must_use]
    pub fn type_arguments(&self) -> &[TypeNode<'a>] {
        self.segments
            .last()
            .and_then(|it| it.arguments.as_deref())
            .unwrap_or_default()
    }

    /// Checks if no segment of the type carries type arguments.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.segments.iter().all(|it| it.arguments.is_none())
    }
}

/// A wildcard type argument.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Wildcard<'a> {
    /// `*`
    Unbounded,
    /// `+` followed by the upper bound.
    Extends(Box<TypeNode<'a>>),
    /// `-` followed by the lower bound.
    Super(Box<TypeNode<'a>>),
}

impl<'a> Wildcard<'a> {
    /// Returns the bound of the wildcard, if any.
    #[must_use]
    pub fn bound(&self) -> Option<&TypeNode<'a>> {
        match self {
            Self::Unbounded => None,
            Self::Extends(bound) | Self::Super(bound) => Some(bound),
        }
    }
}

/// A formal type parameter, such as `T:Ljava.lang.Object;:Ljava.lang.Comparable<TT;>;`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FormalTypeParameter<'a> {
    /// The text of the type parameter.
    pub text: &'a str,
    /// The name of the type variable.
    pub name: &'a str,
    /// Whether the class bound is textually present.
    pub has_class_bound: bool,
    /// The bounds in declaration order, the class bound (if any) first.
    pub bounds: Vec<TypeNode<'a>>,
}

impl<'a> FormalTypeParameter<'a> {
    /// Returns the class bound, if present.
    #[must_use]
    pub fn class_bound(&self) -> Option<&TypeNode<'a>> {
        self.has_class_bound.then(|| self.bounds.first()).flatten()
    }

    /// Returns the interface bounds.
    #[must_use]
    pub fn interface_bounds(&self) -> &[TypeNode<'a>] {
        let skip = usize::from(self.has_class_bound).min(self.bounds.len());
        &self.bounds[skip..]
    }
}

/// A method signature.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MethodNode<'a> {
    /// The text of the method signature.
    pub text: &'a str,
    /// The formal type parameters, empty if the method is not generic.
    pub type_parameters: Vec<FormalTypeParameter<'a>>,
    /// The parameter types.
    pub parameters: Vec<TypeNode<'a>>,
    /// The return type.
    pub return_type: TypeNode<'a>,
    /// The thrown types.
    pub thrown: Vec<TypeNode<'a>>,
}

/// The signature of a class declaration.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassDeclarationNode<'a> {
    /// The text of the signature.
    pub text: &'a str,
    /// The formal type parameters, empty if the class is not generic.
    pub type_parameters: Vec<FormalTypeParameter<'a>>,
    /// The superclass.
    pub superclass: TypeNode<'a>,
    /// The superinterfaces.
    pub interfaces: Vec<TypeNode<'a>>,
}

/// A complete signature of any shape.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ParsedSignature<'a> {
    /// A type signature.
    Type(TypeNode<'a>),
    /// A method signature.
    Method(MethodNode<'a>),
    /// A formal type parameter.
    TypeParameter(FormalTypeParameter<'a>),
    /// The signature of a class declaration.
    ClassDeclaration(ClassDeclarationNode<'a>),
}

impl TypeNode<'_> {
    /// Returns the kind of the type.
    #[must_use]
    pub fn signature_kind(&self) -> SignatureKind {
        match self.kind {
            TypeKind::Base(_) => SignatureKind::BaseType,
            TypeKind::Class(_) => SignatureKind::ClassType,
            TypeKind::Array { .. } => SignatureKind::ArrayType,
            TypeKind::TypeVariable(_) => SignatureKind::TypeVariable,
            TypeKind::Wildcard(_) => SignatureKind::Wildcard,
            TypeKind::Capture(_) => SignatureKind::Capture,
            TypeKind::Intersection(_) => SignatureKind::Intersection,
        }
    }
}

impl<'a> ParsedSignature<'a> {
    /// Returns the kind of the signature.
    #[must_use]
    pub fn kind(&self) -> SignatureKind {
        match self {
            Self::Type(node) => node.signature_kind(),
            Self::Method(_) => SignatureKind::Method,
            Self::TypeParameter(_) => SignatureKind::TypeParameter,
            Self::ClassDeclaration(_) => SignatureKind::ClassDeclaration,
        }
    }

    /// Returns the text of the signature.
    #[must_use]
    pub fn text(&self) -> &'a str {
        match self {
            Self::Type(node) => node.text,
            Self::Method(method) => method.text,
            Self::TypeParameter(param) => param.text,
            Self::ClassDeclaration(decl) => decl.text,
        }
    }
}

/// Parses a complete signature of any shape.
///
/// The shape is decided once: `(` starts a method, `<` starts a method or a class declaration,
/// anything else is tried as a type, then as a class declaration, then as a formal type
/// parameter.
/// # Errors
/// - [`MalformedSignature`] if `input` matches none of the shapes exactly. When every shape
///   fails, the error that got furthest into the input is reported.
pub fn parse(input: &str) -> Result<ParsedSignature<'_>, MalformedSignature> {
    parse_shape(input).inspect_err(|err| {
        tracing::debug!(
            input,
            offset = err.offset,
            reason = err.reason,
            "Rejected malformed signature"
        );
    })
}

fn parse_shape(input: &str) -> Result<ParsedSignature<'_>, MalformedSignature> {
    match input.chars().next() {
        None => Err(MalformedSignature::new(input, 0, "empty signature")),
        Some(sigil::PARAMETERS_START) => Parser::new(input)
            .complete(Parser::method_signature)
            .map(ParsedSignature::Method),
        Some(sigil::GENERIC_START) => Parser::new(input).complete(Parser::generic_declaration),
        Some(_) => {
            let type_error = match Parser::new(input).complete(Parser::return_type) {
                Ok(node) => return Ok(ParsedSignature::Type(node)),
                Err(err) => err,
            };
            let declaration_error = match Parser::new(input).complete(Parser::class_declaration) {
                Ok(decl) => return Ok(ParsedSignature::ClassDeclaration(decl)),
                Err(err) => err,
            };
            let parameter_error = match Parser::new(input).complete(Parser::formal_type_parameter)
            {
                Ok(param) => return Ok(ParsedSignature::TypeParameter(param)),
                Err(err) => err,
            };
            let furthest = [declaration_error, parameter_error]
                .into_iter()
                .fold(type_error, |best, err| {
                    if err.offset > best.offset { err } else { best }
                });
            Err(furthest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_member_chain() {
        let input = "Lp.Outer<TT;>.Inner<TU;>;";
        let Ok(ParsedSignature::Type(node)) = parse(input) else {
            panic!("Failed to parse {input}");
        };
        let TypeKind::Class(class) = node.kind else {
            panic!("Not a class type");
        };
        assert_eq!(class.resolution, Resolution::Resolved);
        assert_eq!(class.name(), "p.Outer");
        let names: Vec<_> = class.segments.iter().map(|it| it.name).collect();
        assert_eq!(names, ["p.Outer", "Inner"]);
        let args: Vec<_> = class.type_arguments().iter().map(|it| it.text).collect();
        assert_eq!(args, ["TU;"]);
        assert!(!class.is_raw());
    }

    #[test]
    fn parse_folds_array_dimensions() {
        let Ok(ParsedSignature::Type(node)) = parse("[[[I") else {
            panic!("Failed to parse array");
        };
        let TypeKind::Array {
            dimensions,
            element,
        } = node.kind
        else {
            panic!("Not an array");
        };
        assert_eq!(dimensions, 3);
        assert_eq!(element.kind, TypeKind::Base(BaseType::Int));
        assert_eq!(element.text, "I");
    }

    #[test]
    fn parse_formal_type_parameter_bounds() {
        let input = "T::Ljava.lang.Comparable<TT;>;:Ljava.io.Serializable;";
        let Ok(ParsedSignature::TypeParameter(param)) = parse(input) else {
            panic!("Failed to parse {input}");
        };
        assert_eq!(param.name, "T");
        assert!(param.class_bound().is_none());
        let bounds: Vec<_> = param.interface_bounds().iter().map(|it| it.text).collect();
        assert_eq!(
            bounds,
            ["Ljava.lang.Comparable<TT;>;", "Ljava.io.Serializable;"]
        );
    }

    #[test]
    fn parse_shapes() {
        let cases = [
            ("I", SignatureKind::BaseType),
            ("V", SignatureKind::BaseType),
            ("QString;", SignatureKind::ClassType),
            ("()V", SignatureKind::Method),
            ("<T:>(TT;)V", SignatureKind::Method),
            ("<T:>Ljava.lang.Object;", SignatureKind::ClassDeclaration),
            (
                "Ljava.lang.Object;Ljava.lang.Comparable<LFoo;>;",
                SignatureKind::ClassDeclaration,
            ),
            ("T:", SignatureKind::TypeParameter),
            ("TT;", SignatureKind::TypeVariable),
        ];
        for (input, kind) in cases {
            let parsed = parse(input).unwrap_or_else(|err| panic!("{err}"));
            assert_eq!(parsed.kind(), kind, "{input}");
            assert_eq!(parsed.text(), input);
        }
    }

    #[test]
    fn parse_reports_furthest_error() {
        let err = parse("Ljava.util.List<TT;").expect_err("Should be malformed");
        assert_eq!(err.offset, 19);
        assert_eq!(err.input, "Ljava.util.List<TT;");
    }

    #[test]
    fn parse_empty() {
        let err = parse("").expect_err("Should be malformed");
        assert_eq!(err.offset, 0);
    }
}
