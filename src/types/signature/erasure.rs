//! Type erasure of signatures.
use std::collections::HashMap;

use itertools::Itertools;

use super::{
    MalformedSignature, ParsedSignature, Signature, parse,
    scanner::Parser,
    sigil,
    tree::{FormalTypeParameter, TypeKind, TypeNode, Wildcard},
};

/// The erasure of a type variable without bounds.
const OBJECT: &str = "Ljava.lang.Object;";

/// Strips every type-argument list from a signature.
///
/// Member types are merged back into a single qualified name. Array dimensions, wildcards,
/// captures, intersections and type variables are kept. Methods and class declarations also
/// lose their formal type parameters.
/// ```
/// use typesig::types::signature::erasure::type_erasure;
///
/// assert_eq!(type_erasure("Lp.Outer<TT;>.Inner<TU;>;")?.as_str(), "Lp.Outer.Inner;");
/// assert_eq!(
///     type_erasure("<T:>(Ljava.util.List<TT;>;)TT;")?.as_str(),
///     "(Ljava.util.List;)TT;"
/// );
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is malformed.
pub fn type_erasure(signature: &str) -> Result<Signature, MalformedSignature> {
    erase(signature, None)
}

/// How [`type_erasure_with`] treats type variables.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
#[instability::unstable(feature = "type-variable-erasure")]
pub enum TypeVariableErasure<'d> {
    /// Type variables are kept as they are.
    #[default]
    Keep,
    /// Type variables declared by any of the given formal type parameters, or by the erased
    /// method or class declaration itself, are replaced with the erasure of their first bound.
    /// A type variable whose bounds lead back to itself is kept.
    DeclaredBound(&'d [&'d str]),
}

/// Strips every type-argument list from a signature, treating type variables as requested.
/// ```
/// use typesig::types::signature::erasure::{TypeVariableErasure, type_erasure_with};
///
/// let erased = type_erasure_with(
///     "<T:Ljava.lang.Number;>(TT;[TE;)V",
///     TypeVariableErasure::DeclaredBound(&["E:"]),
/// )?;
/// assert_eq!(erased.as_str(), "(Ljava.lang.Number;[Ljava.lang.Object;)V");
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` or one of the declarations is malformed.
#[instability::unstable(feature = "type-variable-erasure")]
pub fn type_erasure_with(
    signature: &str,
    type_variables: TypeVariableErasure<'_>,
) -> Result<Signature, MalformedSignature> {
    match type_variables {
        TypeVariableErasure::Keep => erase(signature, None),
        TypeVariableErasure::DeclaredBound(declarations) => erase(signature, Some(declarations)),
    }
}

fn erase(signature: &str, declarations: Option<&[&str]>) -> Result<Signature, MalformedSignature> {
    let declared = declarations
        .unwrap_or_default()
        .iter()
        .map(|it| Parser::new(it).complete(Parser::formal_type_parameter))
        .collect::<Result<Vec<_>, _>>()?;
    let parsed = parse(signature)?;

    let mut eraser = Eraser {
        substitute: declarations.is_some(),
        scope: HashMap::new(),
        resolving: Vec::new(),
        out: String::with_capacity(signature.len()),
    };
    eraser.declare(&declared);
    match &parsed {
        ParsedSignature::Type(node) => eraser.type_node(node),
        ParsedSignature::Method(method) => {
            eraser.declare(&method.type_parameters);
            eraser.out.push(sigil::PARAMETERS_START);
            method
                .parameters
                .iter()
                .for_each(|it| eraser.type_node(it));
            eraser.out.push(sigil::PARAMETERS_END);
            eraser.type_node(&method.return_type);
            for thrown in &method.thrown {
                eraser.out.push(sigil::EXCEPTION_START);
                eraser.type_node(thrown);
            }
        }
        ParsedSignature::TypeParameter(param) => eraser.type_parameter(param),
        ParsedSignature::ClassDeclaration(decl) => {
            eraser.declare(&decl.type_parameters);
            eraser.type_node(&decl.superclass);
            decl.interfaces.iter().for_each(|it| eraser.type_node(it));
        }
    }
    Signature::try_from(eraser.out)
}

/// Writes the erasure of a parsed signature.
struct Eraser<'n, 'a> {
    substitute: bool,
    /// Type variables in scope, by name. Later declarations shadow earlier ones.
    scope: HashMap<&'a str, &'n FormalTypeParameter<'a>>,
    /// Type variables whose bound is being erased.
    resolving: Vec<&'a str>,
    out: String,
}

impl<'n, 'a> Eraser<'n, 'a> {
    fn declare(&mut self, type_parameters: &'n [FormalTypeParameter<'a>]) {
        if self.substitute {
            self.scope
                .extend(type_parameters.iter().map(|it| (it.name, it)));
        }
    }

    fn type_node(&mut self, node: &'n TypeNode<'a>) {
        match &node.kind {
            TypeKind::Base(_) => self.out.push_str(node.text),
            TypeKind::Class(class) => {
                self.out.push(class.resolution.sigil());
                let name = class.segments.iter().map(|it| it.name).join(".");
                self.out.push_str(&name);
                self.out.push(sigil::TERMINATOR);
            }
            TypeKind::Array {
                dimensions,
                element,
            } => {
                self.out
                    .extend(std::iter::repeat_n(sigil::ARRAY, *dimensions));
                self.type_node(element);
            }
            TypeKind::TypeVariable(name) => self.type_variable(node.text, *name),
            TypeKind::Wildcard(wildcard) => self.wildcard(wildcard),
            TypeKind::Capture(wildcard) => {
                self.out.push(sigil::CAPTURE);
                self.wildcard(wildcard);
            }
            TypeKind::Intersection(bounds) => {
                self.out.push(sigil::INTERSECTION);
                self.bounds(bounds);
            }
        }
    }

    fn bounds(&mut self, bounds: &'n [TypeNode<'a>]) {
        for (index, bound) in bounds.iter().enumerate() {
            if index > 0 {
                self.out.push(sigil::COLON);
            }
            self.type_node(bound);
        }
    }

    fn wildcard(&mut self, wildcard: &'n Wildcard<'a>) {
        match wildcard {
            Wildcard::Unbounded => self.out.push(sigil::STAR),
            Wildcard::Extends(bound) => {
                self.out.push(sigil::EXTENDS);
                self.type_node(bound);
            }
            Wildcard::Super(bound) => {
                self.out.push(sigil::SUPER);
                self.type_node(bound);
            }
        }
    }

    fn type_variable(&mut self, text: &'a str, name: &'a str) {
        match self.scope.get(name).copied() {
            Some(declaration) if !self.resolving.contains(&name) => {
                self.resolving.push(name);
                match declaration.bounds.first() {
                    Some(bound) => self.type_node(bound),
                    None => self.out.push_str(OBJECT),
                }
                self.resolving.pop();
            }
            _ => self.out.push_str(text),
        }
    }

    fn type_parameter(&mut self, param: &'n FormalTypeParameter<'a>) {
        self.out.push_str(param.name);
        self.out.push(sigil::COLON);
        if let Some(class_bound) = param.class_bound() {
            self.type_node(class_bound);
        }
        for bound in param.interface_bounds() {
            self.out.push(sigil::COLON);
            self.type_node(bound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::tests::{arb_method_signature, arb_type_signature};

    fn erased(signature: &str) -> String {
        type_erasure(signature)
            .unwrap_or_else(|err| panic!("{err}"))
            .into_string()
    }

    #[test]
    fn erase_types() {
        let cases = [
            ("Lp.Outer<TT;>.Inner<TU;>;", "Lp.Outer.Inner;"),
            ("[Ljava.util.List<+Ljava.lang.Number;>;", "[Ljava.util.List;"),
            ("QList<*>;", "QList;"),
            ("!+Ljava.util.List<TT;>;", "!+Ljava.util.List;"),
            (
                "|Ljava.lang.Comparable<TT;>;:Ljava.io.Serializable;",
                "|Ljava.lang.Comparable;:Ljava.io.Serializable;",
            ),
            ("Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;", "Ljava/util/Map.Entry;"),
        ];
        for (signature, expected) in cases {
            assert_eq!(erased(signature), expected, "{signature}");
        }
    }

    #[test]
    fn erasure_is_a_no_op_on_raw_types() {
        for signature in ["I", "V", "TT;", "[[J", "Ljava.lang.String;", "()V"] {
            assert_eq!(erased(signature), signature);
        }
    }

    #[test]
    fn erase_declarations() {
        assert_eq!(
            erased("<T:Ljava.lang.Object;>(Ljava.util.List<TT;>;)TT;^Ljava.lang.Exception;"),
            "(Ljava.util.List;)TT;^Ljava.lang.Exception;"
        );
        assert_eq!(
            erased("<T:>Ljava.util.AbstractList<TT;>;Ljava.util.List<TT;>;"),
            "Ljava.util.AbstractList;Ljava.util.List;"
        );
        assert_eq!(
            erased("T:Ljava.lang.Number;:Ljava.lang.Comparable<TT;>;"),
            "T:Ljava.lang.Number;:Ljava.lang.Comparable;"
        );
        assert!(type_erasure("Ljava.util.List<TT;").is_err());
    }

    #[test]
    fn erase_type_variables_to_bounds() {
        let declared = TypeVariableErasure::DeclaredBound(&[]);
        let erased = type_erasure_with(
            "<T:Ljava.lang.Number;U::Ljava.lang.Comparable<TU;>;V:>(TT;TU;TV;)V",
            declared,
        );
        assert_eq!(
            erased.map(Signature::into_string),
            Ok("(Ljava.lang.Number;Ljava.lang.Comparable;Ljava.lang.Object;)V".to_owned())
        );
        let erased = type_erasure_with(
            "[TE;",
            TypeVariableErasure::DeclaredBound(&["E:Ljava.util.List<TE;>;"]),
        );
        assert_eq!(
            erased.map(Signature::into_string),
            Ok("[Ljava.util.List;".to_owned())
        );
        assert_eq!(
            type_erasure_with("TX;", declared).map(Signature::into_string),
            Ok("TX;".to_owned())
        );
    }

    #[test]
    fn cyclic_bounds_keep_the_variable() {
        let declared = TypeVariableErasure::DeclaredBound(&["T:TU;", "U:TT;"]);
        assert_eq!(
            type_erasure_with("TT;", declared).map(Signature::into_string),
            Ok("TT;".to_owned())
        );
    }

    #[test]
    fn malformed_declarations() {
        let declared = TypeVariableErasure::DeclaredBound(&["T"]);
        assert!(type_erasure_with("TT;", declared).is_err());
    }

    proptest! {
        #[test]
        fn erasure_is_idempotent(sig in arb_type_signature()) {
            let once = erased(&sig);
            prop_assert_eq!(erased(&once), once.clone());
            prop_assert!(!once.contains(sigil::GENERIC_START));
        }

        #[test]
        fn method_erasure_is_idempotent(sig in arb_method_signature()) {
            let once = erased(&sig);
            prop_assert_eq!(erased(&once), once.clone());
            prop_assert!(!once.contains(sigil::GENERIC_START));
        }

        #[test]
        fn keep_is_plain_erasure(sig in arb_method_signature()) {
            prop_assert_eq!(
                type_erasure_with(&sig, TypeVariableErasure::Keep),
                type_erasure(&sig)
            );
        }
    }
}
