//! Extraction of sub-signatures.
//!
//! Every function parses its input once and answers by matching on the tree. The returned
//! sub-signatures are views into the input.
use super::{
    MalformedSignature, ParsedSignature, Signature, SignatureKind, parse, sigil,
    tree::{MethodNode, TypeKind, TypeNode},
};

fn shape_mismatch(input: &str, reason: &'static str) -> MalformedSignature {
    MalformedSignature::new(input, 0, reason)
}

fn method(signature: &str) -> Result<MethodNode<'_>, MalformedSignature> {
    match parse(signature)? {
        ParsedSignature::Method(method) => Ok(method),
        _ => Err(shape_mismatch(signature, "expected a method signature")),
    }
}

pub(super) fn type_node(signature: &str) -> Result<TypeNode<'_>, MalformedSignature> {
    match parse(signature)? {
        ParsedSignature::Type(node) => Ok(node),
        _ => Err(shape_mismatch(signature, "expected a type signature")),
    }
}

fn texts<'a>(nodes: &[TypeNode<'a>]) -> Vec<&'a str> {
    nodes.iter().map(|it| it.text).collect()
}

/// Returns the kind of any signature.
/// # Errors
/// - [`MalformedSignature`] if `signature` is malformed.
pub fn signature_kind(signature: &str) -> Result<SignatureKind, MalformedSignature> {
    parse(signature).map(|it| it.kind())
}

/// Returns the number of parameters of a method signature.
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed method signature.
pub fn parameter_count(signature: &str) -> Result<usize, MalformedSignature> {
    method(signature).map(|it| it.parameters.len())
}

/// Returns the parameter types of a method signature, in declaration order.
/// ```
/// use typesig::types::signature::decompose::parameter_types;
///
/// assert_eq!(parameter_types("(I[QString;TT;)V")?, ["I", "[QString;", "TT;"]);
/// assert!(parameter_types("()V")?.is_empty());
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed method signature.
pub fn parameter_types(signature: &str) -> Result<Vec<&str>, MalformedSignature> {
    method(signature).map(|it| texts(&it.parameters))
}

/// Returns the return type of a method signature.
/// Any type the grammar allows is accepted, including wildcards.
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed method signature.
pub fn return_type(signature: &str) -> Result<&str, MalformedSignature> {
    method(signature).map(|it| it.return_type.text)
}

/// Returns the thrown types of a method signature, in declaration order.
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed method signature, including when
///   a `^` is not followed by a type.
pub fn thrown_types(signature: &str) -> Result<Vec<&str>, MalformedSignature> {
    method(signature).map(|it| texts(&it.thrown))
}

/// Returns the formal type parameters of a method or class declaration signature.
/// # Errors
/// - [`MalformedSignature`] if `signature` is neither a well-formed method signature nor a
///   well-formed class declaration signature.
pub fn type_parameters(signature: &str) -> Result<Vec<&str>, MalformedSignature> {
    let type_parameters = match parse(signature)? {
        ParsedSignature::Method(method) => method.type_parameters,
        ParsedSignature::ClassDeclaration(decl) => decl.type_parameters,
        _ => {
            return Err(shape_mismatch(
                signature,
                "expected a method or class declaration signature",
            ));
        }
    };
    Ok(type_parameters.into_iter().map(|it| it.text).collect())
}

/// Returns the bounds of a formal type parameter, the class bound (if present) first.
/// ```
/// use typesig::types::signature::decompose::type_parameter_bounds;
///
/// let bounds = type_parameter_bounds("T:Ljava.lang.Number;:Ljava.lang.Runnable;")?;
/// assert_eq!(bounds, ["Ljava.lang.Number;", "Ljava.lang.Runnable;"]);
/// assert!(type_parameter_bounds("T:")?.is_empty());
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed formal type parameter.
pub fn type_parameter_bounds(signature: &str) -> Result<Vec<&str>, MalformedSignature> {
    match parse(signature)? {
        ParsedSignature::TypeParameter(param) => Ok(texts(&param.bounds)),
        _ => Err(shape_mismatch(signature, "expected a formal type parameter")),
    }
}

/// Returns the name of the type variable declared by a formal type parameter or referenced by a
/// type variable signature.
/// # Errors
/// - [`MalformedSignature`] if `signature` is neither a well-formed formal type parameter nor a
///   type variable signature.
pub fn type_variable_name(signature: &str) -> Result<&str, MalformedSignature> {
    match parse(signature)? {
        ParsedSignature::TypeParameter(param) => Ok(param.name),
        ParsedSignature::Type(TypeNode {
            kind: TypeKind::TypeVariable(name),
            ..
        }) => Ok(name),
        _ => Err(shape_mismatch(
            signature,
            "expected a formal type parameter or a type variable",
        )),
    }
}

/// Returns the type arguments of the type a class type signature denotes.
///
/// For a member type, these are the arguments of the innermost segment; the arguments of the
/// enclosing types are not included. Raw types and types other than class types have none.
/// ```
/// use typesig::types::signature::decompose::type_arguments;
///
/// assert_eq!(type_arguments("Lp.Outer<TT;>.Inner<TU;TV;>;")?, ["TU;", "TV;"]);
/// assert!(type_arguments("Lp.Outer<TT;>.Inner;")?.is_empty());
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed type signature.
pub fn type_arguments(signature: &str) -> Result<Vec<&str>, MalformedSignature> {
    match type_node(signature)?.kind {
        TypeKind::Class(class) => Ok(texts(class.type_arguments())),
        _ => Ok(Vec::new()),
    }
}

/// Returns the number of array dimensions of a type signature, zero if it is not an array.
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed type signature.
pub fn array_count(signature: &str) -> Result<usize, MalformedSignature> {
    match type_node(signature)?.kind {
        TypeKind::Array { dimensions, .. } => Ok(dimensions),
        _ => Ok(0),
    }
}

/// Returns the type signature with every array dimension stripped.
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed type signature.
pub fn element_type(signature: &str) -> Result<&str, MalformedSignature> {
    let node = type_node(signature)?;
    match node.kind {
        TypeKind::Array { element, .. } => Ok(element.text),
        _ => Ok(node.text),
    }
}

/// Returns the bounds of an intersection type, empty for any other type.
/// Only top-level separators split bounds.
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a well-formed type signature.
pub fn intersection_bounds(signature: &str) -> Result<Vec<&str>, MalformedSignature> {
    match type_node(signature)?.kind {
        TypeKind::Intersection(bounds) => Ok(texts(&bounds)),
        _ => Ok(Vec::new()),
    }
}

/// Removes every capture marker, leaving the captured wildcards in place.
/// # Errors
/// - [`MalformedSignature`] if `signature` is malformed.
pub fn remove_capture(signature: &str) -> Result<Signature, MalformedSignature> {
    let kind = parse(signature)?.kind();
    // Outside of captures the marker never occurs in a well-formed signature.
    let text: String = signature.chars().filter(|&c| c != sigil::CAPTURE).collect();
    let kind = if kind == SignatureKind::Capture {
        SignatureKind::Wildcard
    } else {
        kind
    };
    Ok(Signature::from_parts(text, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::tests::{arb_method_signature, arb_type_parameter};

    #[test]
    fn nine_primitive_parameters() {
        let params = parameter_types("(BCDFIJSZZ)V").expect("Failed to decompose");
        assert_eq!(params, ["B", "C", "D", "F", "I", "J", "S", "Z", "Z"]);
        assert_eq!(parameter_count("(BCDFIJSZZ)V"), Ok(9));
    }

    #[test]
    fn thrown_type_variable_and_class() {
        let sig = "<E:Ljava.lang.Exception;>()V^TE;^Ljava.io.IOException;";
        assert_eq!(
            thrown_types(sig),
            Ok(vec!["TE;", "Ljava.io.IOException;"])
        );
        assert_eq!(type_parameters(sig), Ok(vec!["E:Ljava.lang.Exception;"]));
        assert_eq!(return_type(sig), Ok("V"));
    }

    #[test]
    fn dangling_throws_marker() {
        assert!(thrown_types("()V^").is_err());
        assert!(thrown_types("()V^V").is_err());
    }

    #[test]
    fn return_type_is_grammar_permissive() {
        assert_eq!(return_type("()*"), Ok("*"));
        assert_eq!(return_type("()[+Ljava.lang.Number;"), Ok("[+Ljava.lang.Number;"));
        assert_eq!(
            return_type("(I)Ljava.util.List<TT;>;"),
            Ok("Ljava.util.List<TT;>;")
        );
    }

    #[test]
    fn empty_method_signature() {
        let err = parameter_count("").expect_err("Should be malformed");
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn shape_mismatches() {
        assert!(parameter_types("I").is_err());
        assert!(type_parameter_bounds("TT;").is_err());
        assert!(type_parameters("T:").is_err());
        assert!(array_count("(I)V").is_err());
        assert_eq!(type_variable_name("TKey;"), Ok("Key"));
        assert_eq!(type_variable_name("Key:Ljava.lang.Object;"), Ok("Key"));
    }

    #[test]
    fn type_parameters_of_class_declaration() {
        let sig = "<K:Ljava.lang.Object;V::Ljava.lang.Comparable<TV;>;>Ljava.lang.Object;";
        assert_eq!(
            type_parameters(sig),
            Ok(vec![
                "K:Ljava.lang.Object;",
                "V::Ljava.lang.Comparable<TV;>;"
            ])
        );
    }

    #[test]
    fn bounds_keep_declaration_order() {
        assert_eq!(
            type_parameter_bounds("T:Lp.A;:Lp.B;:Lp.C;"),
            Ok(vec!["Lp.A;", "Lp.B;", "Lp.C;"])
        );
        assert_eq!(type_parameter_bounds("T::Lp.B;"), Ok(vec!["Lp.B;"]));
        assert_eq!(type_parameter_bounds("T:Lp.A;:"), Ok(vec!["Lp.A;"]));
    }

    #[test]
    fn raw_and_parameterized_arguments() {
        assert_eq!(type_arguments("Ljava.lang.String;"), Ok(vec![]));
        assert_eq!(
            type_arguments("Ljava.util.Map<TK;Ljava.util.List<TV;>;>;"),
            Ok(vec!["TK;", "Ljava.util.List<TV;>;"])
        );
        assert_eq!(type_arguments("TT;"), Ok(vec![]));
    }

    #[test]
    fn arrays() {
        assert_eq!(array_count("[[Ljava.lang.String;"), Ok(2));
        assert_eq!(element_type("[[Ljava.lang.String;"), Ok("Ljava.lang.String;"));
        assert_eq!(array_count("I"), Ok(0));
        assert_eq!(element_type("I"), Ok("I"));
    }

    #[test]
    fn intersection_splits_top_level_only() {
        let sig = "|Ljava.util.Map<TK;TV;>;:Ljava.lang.Comparable<|TT;:TU;>;";
        assert_eq!(
            intersection_bounds(sig),
            Ok(vec![
                "Ljava.util.Map<TK;TV;>;",
                "Ljava.lang.Comparable<|TT;:TU;>;"
            ])
        );
        assert_eq!(intersection_bounds("Ljava.lang.Object;"), Ok(vec![]));
    }

    #[test]
    fn captures_are_removed() {
        let sig = remove_capture("Ljava.util.List<!-Lp.A;>;").expect("Failed to remove capture");
        assert_eq!(sig.as_str(), "Ljava.util.List<-Lp.A;>;");
        let sig = remove_capture("!*").expect("Failed to remove capture");
        assert_eq!(sig.kind(), SignatureKind::Wildcard);
    }

    proptest! {
        #[test]
        fn parameter_count_matches_parameter_types(sig in arb_method_signature()) {
            let count = parameter_count(&sig).expect("Failed to count parameters");
            let params = parameter_types(&sig).expect("Failed to extract parameters");
            assert_eq!(count, params.len());
            for param in params {
                assert!(signature_kind(param).is_ok());
            }
        }

        #[test]
        fn every_bound_is_a_signature(sig in arb_type_parameter()) {
            for bound in type_parameter_bounds(&sig).expect("Failed to extract bounds") {
                assert!(signature_kind(bound).is_ok(), "{bound}");
            }
        }
    }
}
