//! Construction of canonical signatures.
//!
//! Apart from [`type_signature`], which encodes source-style names, every builder is undone by
//! the matching function of [`decompose`](super::decompose).
use itertools::Itertools;

use super::{
    MalformedSignature, Resolution, Signature, SignatureKind,
    scanner::{MAX_NESTING_DEPTH, Parser, is_identifier_char},
    sigil,
    tree::{TypeKind, TypeNode},
};
use crate::types::base_type::BaseType;

/// Creates a type signature from a source-style type name.
///
/// The name may be qualified with `.`, carry type arguments (including wildcards) and member
/// types after them, and end with any number of `[]` pairs or a trailing `...`. A primitive
/// keyword is only recognized when it is the whole name.
/// ```
/// use typesig::types::signature::{Resolution, compose::type_signature};
///
/// assert_eq!(type_signature("int[]", Resolution::Resolved)?.as_str(), "[I");
/// assert_eq!(
///     type_signature("java.util.List<? extends Number>", Resolution::Unresolved)?.as_str(),
///     "Qjava.util.List<+QNumber;>;"
/// );
/// assert_eq!(
///     type_signature("longtest.MyData", Resolution::Resolved)?.as_str(),
///     "Llongtest.MyData;"
/// );
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `name` is empty, has unbalanced brackets, qualifies a primitive
///   or is otherwise not a type name.
pub fn type_signature(name: &str, resolution: Resolution) -> Result<Signature, MalformedSignature> {
    SourceName::new(name, resolution)
        .encode()
        .inspect_err(|err| {
            tracing::debug!(
                name,
                offset = err.offset,
                reason = err.reason,
                "Rejected malformed type name"
            );
        })
}

/// Prefixes `dimensions` array markers to `element`. Zero dimensions return `element` unchanged.
/// # Errors
/// - [`MalformedSignature`] if `element` is not a type signature, or is `V` and `dimensions` is
///   not zero.
pub fn array_signature(element: &str, dimensions: usize) -> Result<Signature, MalformedSignature> {
    let node = Parser::new(element).complete(Parser::return_type)?;
    if dimensions == 0 {
        return Ok(Signature::from_parts(element.to_owned(), node.signature_kind()));
    }
    if node.kind == TypeKind::Base(BaseType::Void) {
        return Err(MalformedSignature::new(element, 0, "`V` cannot be an array element"));
    }
    let text = format!("{}{element}", sigil::ARRAY.to_string().repeat(dimensions));
    Ok(Signature::from_parts(text, SignatureKind::ArrayType))
}

/// Creates a method signature from its parameter types and return type.
/// # Errors
/// - [`MalformedSignature`] if a parameter is not a type signature other than `V`, or if
///   `return_type` is not a type signature.
pub fn method_signature(
    parameters: &[&str],
    return_type: &str,
) -> Result<Signature, MalformedSignature> {
    generic_method_signature(&[], parameters, return_type, &[])
}

/// Creates a method signature with formal type parameters and thrown types.
/// ```
/// use typesig::types::signature::compose::generic_method_signature;
///
/// let sig = generic_method_signature(
///     &["T:Ljava.lang.Number;"],
///     &["TT;"],
///     "Ljava.util.List<TT;>;",
///     &["Ljava.io.IOException;"],
/// )?;
/// assert_eq!(
///     sig.as_str(),
///     "<T:Ljava.lang.Number;>(TT;)Ljava.util.List<TT;>;^Ljava.io.IOException;"
/// );
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if any component is malformed.
pub fn generic_method_signature(
    type_parameters: &[&str],
    parameters: &[&str],
    return_type: &str,
    thrown: &[&str],
) -> Result<Signature, MalformedSignature> {
    for type_parameter in type_parameters {
        Parser::new(type_parameter).complete(Parser::formal_type_parameter)?;
    }
    for parameter in parameters.iter().chain(thrown) {
        Parser::new(parameter).complete(Parser::type_signature)?;
    }
    Parser::new(return_type).complete(Parser::return_type)?;

    let mut text = String::new();
    if !type_parameters.is_empty() {
        text.push(sigil::GENERIC_START);
        text.extend(type_parameters.iter().copied());
        text.push(sigil::GENERIC_END);
    }
    text.push(sigil::PARAMETERS_START);
    text.extend(parameters.iter().copied());
    text.push(sigil::PARAMETERS_END);
    text.push_str(return_type);
    for thrown_type in thrown {
        text.push(sigil::EXCEPTION_START);
        text.push_str(thrown_type);
    }
    Signature::try_from(text)
}

/// Creates a formal type parameter from its name and bounds.
/// # Errors
/// - [`MalformedSignature`] if `name` is not an identifier or a bound is malformed.
pub fn type_parameter_signature(
    name: &str,
    class_bound: Option<&str>,
    interface_bounds: &[&str],
) -> Result<Signature, MalformedSignature> {
    if name.is_empty() || !name.chars().all(is_identifier_char) {
        return Err(MalformedSignature::new(name, 0, "expected an identifier"));
    }
    let bounds: Vec<&str> = class_bound.iter().chain(interface_bounds).copied().collect();
    validate_bounds(&bounds)?;
    let text = format!(
        "{name}{}{}{}",
        sigil::COLON,
        class_bound.unwrap_or_default(),
        interface_bounds
            .iter()
            .map(|it| format!("{}{it}", sigil::COLON))
            .join("")
    );
    Ok(Signature::from_parts(text, SignatureKind::TypeParameter))
}

/// Creates an intersection type from its bounds.
/// ```
/// use typesig::types::signature::{
///     compose::intersection_signature, decompose::intersection_bounds,
/// };
///
/// let bounds = ["Ljava.lang.Number;", "Ljava.lang.Comparable<TT;>;"];
/// let sig = intersection_signature(&bounds)?;
/// assert_eq!(sig.as_str(), "|Ljava.lang.Number;:Ljava.lang.Comparable<TT;>;");
/// assert_eq!(intersection_bounds(&sig)?, bounds);
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `bounds` is empty or a bound is malformed.
pub fn intersection_signature(bounds: &[&str]) -> Result<Signature, MalformedSignature> {
    if bounds.is_empty() {
        return Err(MalformedSignature::new("", 0, "an intersection needs at least one bound"));
    }
    validate_bounds(bounds)?;
    let text = format!(
        "{}{}",
        sigil::INTERSECTION,
        bounds.iter().join(&sigil::COLON.to_string())
    );
    Ok(Signature::from_parts(text, SignatureKind::Intersection))
}

/// Checks that every bound is a type signature and that none but the last would absorb the
/// bounds that follow it.
fn validate_bounds(bounds: &[&str]) -> Result<(), MalformedSignature> {
    let last = bounds.len().saturating_sub(1);
    for (index, bound) in bounds.iter().enumerate() {
        let node = Parser::new(bound).complete(Parser::type_signature)?;
        if index < last && ends_with_intersection(&node) {
            return Err(MalformedSignature::new(
                bound,
                0,
                "an intersection bound would absorb the bounds after it",
            ));
        }
    }
    Ok(())
}

fn ends_with_intersection(node: &TypeNode<'_>) -> bool {
    match &node.kind {
        TypeKind::Intersection(_) => true,
        TypeKind::Array { element, .. } => ends_with_intersection(element),
        TypeKind::Wildcard(wildcard) | TypeKind::Capture(wildcard) => {
            wildcard.bound().is_some_and(ends_with_intersection)
        }
        TypeKind::Base(_) | TypeKind::Class(_) | TypeKind::TypeVariable(_) => false,
    }
}

/// Encodes a source-style type name.
struct SourceName<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    resolution: Resolution,
}

impl<'a> SourceName<'a> {
    fn new(input: &'a str, resolution: Resolution) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            resolution,
        }
    }

    fn encode(mut self) -> Result<Signature, MalformedSignature> {
        let mut out = String::new();
        self.source_type(&mut out, false)?;
        self.skip_whitespace();
        if self.pos != self.input.len() {
            return Err(self.error("unexpected trailing characters"));
        }
        Signature::try_from(out)
    }

    fn error(&self, reason: &'static str) -> MalformedSignature {
        MalformedSignature::new(self.input, self.pos, reason)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn at_varargs(&mut self) -> bool {
        self.skip_whitespace();
        self.rest().starts_with("...")
    }

    fn eat(&mut self, expected: &str) -> bool {
        self.skip_whitespace();
        let matched = self.rest().starts_with(expected);
        if matched {
            self.pos += expected.len();
        }
        matched
    }

    fn identifier(&mut self) -> Result<&'a str, MalformedSignature> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn source_type(
        &mut self,
        out: &mut String,
        in_arguments: bool,
    ) -> Result<(), MalformedSignature> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(self.error("type name nests too deeply"));
        }
        self.depth += 1;
        let encoded = self.nested_source_type(out, in_arguments);
        self.depth -= 1;
        encoded
    }

    fn nested_source_type(
        &mut self,
        out: &mut String,
        in_arguments: bool,
    ) -> Result<(), MalformedSignature> {
        let start = out.len();
        if in_arguments && self.eat("?") {
            return self.wildcard(out);
        }
        let keyword_pos = self.pos;
        let first = self.identifier()?;
        let base_type = BaseType::from_keyword(first);
        match base_type {
            Some(_) if !self.at_varargs() && self.eat(".") => {
                return Err(self.error("qualifier following a primitive"));
            }
            Some(_) if self.eat("<") => {
                return Err(self.error("type arguments following a primitive"));
            }
            Some(BaseType::Void) if in_arguments => {
                self.pos = keyword_pos;
                return Err(self.error("`void` is not a type argument"));
            }
            Some(base_type) => out.push(base_type.descriptor()),
            None => self.class_type(first, out)?,
        }

        let mut dimensions = 0;
        loop {
            if self.eat("[") {
                if !self.eat("]") {
                    return Err(self.error("expected `]`"));
                }
                dimensions += 1;
            } else if self.eat("...") {
                dimensions += 1;
                break;
            } else {
                break;
            }
        }
        if dimensions > 0 {
            if base_type == Some(BaseType::Void) {
                return Err(self.error("`void` cannot be an array element"));
            }
            out.insert_str(start, &sigil::ARRAY.to_string().repeat(dimensions));
        }
        Ok(())
    }

    fn wildcard(&mut self, out: &mut String) -> Result<(), MalformedSignature> {
        self.skip_whitespace();
        if !self.peek().is_some_and(is_identifier_char) {
            out.push(sigil::STAR);
            return Ok(());
        }
        match self.identifier()? {
            "extends" => out.push(sigil::EXTENDS),
            "super" => out.push(sigil::SUPER),
            _ => return Err(self.error("expected `extends` or `super`")),
        }
        self.source_type(out, true)
    }

    fn class_type(&mut self, first: &str, out: &mut String) -> Result<(), MalformedSignature> {
        out.push(self.resolution.sigil());
        out.push_str(first);
        let mut has_arguments = false;
        loop {
            if !self.at_varargs() && self.eat(".") {
                let segment = self.identifier()?;
                if BaseType::from_keyword(segment).is_some() {
                    return Err(self.error("primitive keyword used as a name segment"));
                }
                out.push(sigil::DOT);
                out.push_str(segment);
            } else if self.eat("<") {
                if has_arguments && !out.ends_with(is_identifier_char) {
                    return Err(self.error("type arguments must follow a member name"));
                }
                self.type_arguments(out)?;
                has_arguments = true;
            } else {
                break;
            }
        }
        out.push(sigil::TERMINATOR);
        Ok(())
    }

    /// Called right after `<`.
    fn type_arguments(&mut self, out: &mut String) -> Result<(), MalformedSignature> {
        out.push(sigil::GENERIC_START);
        loop {
            self.source_type(out, true)?;
            if self.eat(",") {
                continue;
            }
            if self.eat(">") {
                break;
            }
            return Err(self.error("expected `,` or `>`"));
        }
        out.push(sigil::GENERIC_END);
        Ok(())
    }
}
