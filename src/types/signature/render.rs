//! Human-readable rendering of signatures and helpers for source-style names.
use std::{
    borrow::Cow,
    fmt::{self, Display, Write},
};

use bitflags::bitflags;
use itertools::Itertools;

use super::{
    MalformedSignature, ParsedSignature,
    decompose::type_node,
    parse, sigil,
    tree::{
        ClassDeclarationNode, ClassType, FormalTypeParameter, MethodNode, TypeKind, TypeNode,
        Wildcard,
    },
};

bitflags! {
    /// Options controlling how [`display_declaration`] and [`display_string_with`] render.
    #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
    pub struct DisplayOptions: u8 {
        /// Render class names with their package qualifier.
        const QUALIFIED_TYPES = 0x01;
        /// Render the return type in front of a method.
        const INCLUDE_RETURN_TYPE = 0x02;
        /// Render the last array parameter of a method as `Type...`.
        const VAR_ARGS = 0x04;
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::QUALIFIED_TYPES | Self::INCLUDE_RETURN_TYPE
    }
}

/// Renders a signature of any shape in source form, with qualified names.
/// ```
/// use typesig::types::signature::render::display_string;
///
/// assert_eq!(display_string("[[I")?, "int[][]");
/// assert_eq!(
///     display_string("!-Ljava.util.List<TT;>;")?,
///     "capture-of ? super java.util.List<T>"
/// );
/// assert_eq!(
///     display_string("(ILjava/lang/String;)V")?,
///     "void (int, java.lang.String)"
/// );
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is malformed.
pub fn display_string(signature: &str) -> Result<String, MalformedSignature> {
    display_string_with(signature, DisplayOptions::default())
}

/// Renders a signature of any shape in source form.
///
/// Methods render as a declaration with an empty name.
/// # Errors
/// - [`MalformedSignature`] if `signature` is malformed.
pub fn display_string_with(
    signature: &str,
    options: DisplayOptions,
) -> Result<String, MalformedSignature> {
    let rendered = match parse(signature)? {
        ParsedSignature::Type(node) => Rendered::new(&node, options).to_string(),
        ParsedSignature::Method(method) => Declaration {
            method: &method,
            name: "",
            parameter_names: None,
            options,
        }
        .to_string(),
        ParsedSignature::TypeParameter(param) => Rendered::new(&param, options).to_string(),
        ParsedSignature::ClassDeclaration(decl) => Rendered::new(&decl, options).to_string(),
    };
    Ok(rendered)
}

/// Renders a method signature as a declaration named `name`.
///
/// Parameter names are only rendered if at least as many names as parameters are given.
/// ```
/// use typesig::types::signature::render::{DisplayOptions, display_declaration};
///
/// let rendered = display_declaration(
///     "(I[Ljava.lang.String;)V",
///     "main",
///     Some(&["count", "args"]),
///     DisplayOptions::INCLUDE_RETURN_TYPE | DisplayOptions::VAR_ARGS,
/// )?;
/// assert_eq!(rendered, "void main(int count, String... args)");
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `method_signature` is not a method signature.
pub fn display_declaration(
    method_signature: &str,
    name: &str,
    parameter_names: Option<&[&str]>,
    options: DisplayOptions,
) -> Result<String, MalformedSignature> {
    let ParsedSignature::Method(method) = parse(method_signature)? else {
        return Err(MalformedSignature::new(
            method_signature,
            0,
            "not a method signature",
        ));
    };
    Ok(Declaration {
        method: &method,
        name,
        parameter_names,
        options,
    }
    .to_string())
}

impl Display for TypeNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Rendered::new(self, DisplayOptions::QUALIFIED_TYPES))
    }
}

/// A node paired with the options it is rendered with.
struct Rendered<'n, T: ?Sized> {
    node: &'n T,
    options: DisplayOptions,
}

impl<'n, T: ?Sized> Rendered<'n, T> {
    fn new(node: &'n T, options: DisplayOptions) -> Self {
        Self { node, options }
    }

    fn nested<'m, U: ?Sized>(&self, node: &'m U) -> Rendered<'m, U> {
        Rendered::new(node, self.options)
    }

    fn qualified(&self) -> bool {
        self.options.contains(DisplayOptions::QUALIFIED_TYPES)
    }
}

impl Display for Rendered<'_, TypeNode<'_>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.kind {
            TypeKind::Base(base_type) => write!(f, "{base_type}"),
            TypeKind::Class(class) => write!(f, "{}", self.nested(class)),
            TypeKind::Array {
                dimensions,
                element,
            } => {
                write!(f, "{}", self.nested(element.as_ref()))?;
                (0..*dimensions).try_for_each(|_| f.write_str("[]"))
            }
            TypeKind::TypeVariable(name) => f.write_str(name),
            TypeKind::Wildcard(wildcard) => write!(f, "{}", self.nested(wildcard)),
            TypeKind::Capture(wildcard) => write!(f, "capture-of {}", self.nested(wildcard)),
            TypeKind::Intersection(bounds) => write!(
                f,
                "{}",
                bounds.iter().map(|it| self.nested(it)).format(" & ")
            ),
        }
    }
}

impl Display for Rendered<'_, Wildcard<'_>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Wildcard::Unbounded => f.write_str("?"),
            Wildcard::Extends(bound) => write!(f, "? extends {}", self.nested(bound.as_ref())),
            Wildcard::Super(bound) => write!(f, "? super {}", self.nested(bound.as_ref())),
        }
    }
}

impl Display for Rendered<'_, ClassType<'_>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::new();
        for (index, segment) in self.node.segments.iter().enumerate() {
            let simple_name = if index == 0 {
                let (qualifier, simple_name) = split_binary_name(segment.name);
                if self.qualified() && !qualifier.is_empty() {
                    rendered.push_str(&qualifier.replace(sigil::SLASH, "."));
                    rendered.push('.');
                }
                simple_name
            } else {
                segment.name
            };
            for part in simple_name.split(sigil::DOLLAR).filter(|it| !it.is_empty()) {
                if part.starts_with(|c: char| c.is_ascii_digit()) && !rendered.is_empty() {
                    // Anonymous classes are numbered.
                    rendered = format!("new {}(){{}}", rendered.trim_end_matches('.'));
                } else {
                    if !rendered.is_empty() && !rendered.ends_with('.') {
                        rendered.push('.');
                    }
                    rendered.push_str(part);
                }
            }
            if let Some(arguments) = &segment.arguments {
                write!(
                    rendered,
                    "<{}>",
                    arguments.iter().map(|it| self.nested(it)).format(",")
                )?;
            }
        }
        f.write_str(&rendered)
    }
}

impl Display for Rendered<'_, FormalTypeParameter<'_>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node.name)?;
        if !self.node.bounds.is_empty() {
            write!(
                f,
                " extends {}",
                self.node.bounds.iter().map(|it| self.nested(it)).format(" & ")
            )?;
        }
        Ok(())
    }
}

impl<T: ?Sized> Rendered<'_, T> {
    fn type_parameters(
        &self,
        f: &mut fmt::Formatter<'_>,
        type_parameters: &[FormalTypeParameter<'_>],
    ) -> fmt::Result {
        if type_parameters.is_empty() {
            return Ok(());
        }
        write!(
            f,
            "<{}> ",
            type_parameters.iter().map(|it| self.nested(it)).format(", ")
        )
    }
}

impl Display for Rendered<'_, ClassDeclarationNode<'_>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.type_parameters(f, &self.node.type_parameters)?;
        write!(f, "extends {}", self.nested(&self.node.superclass))?;
        if !self.node.interfaces.is_empty() {
            write!(
                f,
                " implements {}",
                self.node.interfaces.iter().map(|it| self.nested(it)).format(", ")
            )?;
        }
        Ok(())
    }
}

/// A method rendered as a declaration.
struct Declaration<'n, 'a> {
    method: &'n MethodNode<'a>,
    name: &'n str,
    parameter_names: Option<&'n [&'n str]>,
    options: DisplayOptions,
}

impl Display for Declaration<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = Rendered::new(self.method, self.options);
        types.type_parameters(f, &self.method.type_parameters)?;
        if self.options.contains(DisplayOptions::INCLUDE_RETURN_TYPE) {
            write!(f, "{} ", types.nested(&self.method.return_type))?;
        }
        write!(f, "{}(", self.name)?;
        let parameters = &self.method.parameters;
        let names = self
            .parameter_names
            .filter(|names| names.len() >= parameters.len());
        for (index, parameter) in parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            let is_last = index + 1 == parameters.len();
            match &parameter.kind {
                TypeKind::Array {
                    dimensions,
                    element,
                } if is_last && self.options.contains(DisplayOptions::VAR_ARGS) => {
                    write!(f, "{}", types.nested(element.as_ref()))?;
                    (1..*dimensions).try_for_each(|_| f.write_str("[]"))?;
                    f.write_str("...")?;
                }
                _ => write!(f, "{}", types.nested(parameter))?,
            }
            if let Some(name) = names.and_then(|names| names.get(index)) {
                write!(f, " {name}")?;
            }
        }
        f.write_str(")")?;
        if !self.method.thrown.is_empty() {
            write!(
                f,
                " throws {}",
                self.method.thrown.iter().map(|it| types.nested(it)).format(", ")
            )?;
        }
        Ok(())
    }
}

/// Splits a name as written in a signature into its package qualifier and the rest, at the last
/// `.` or `/` before any `$`.
fn split_binary_name(name: &str) -> (&str, &str) {
    let package = name.find(sigil::DOLLAR).map_or(name, |end| &name[..end]);
    match package.rfind([sigil::DOT, sigil::SLASH]) {
        Some(split) => (&name[..split], &name[split + 1..]),
        None => ("", name),
    }
}

/// Returns the byte offset of the first `<` in `name`, or its length.
fn arguments_start(name: &str) -> usize {
    name.find(sigil::GENERIC_START).unwrap_or(name.len())
}

/// Returns the simple name of a source-style type name.
///
/// The qualifier of the outermost type is dropped and every type argument is simplified too.
/// Member types following a type-argument list are kept.
/// ```
/// use typesig::types::signature::render::simple_name;
///
/// assert_eq!(simple_name("java.lang.String"), "String");
/// assert_eq!(
///     simple_name("java.util.Map<java.lang.String, ? extends java.lang.Number>.Entry[]"),
///     "Map<String,? extends Number>.Entry[]"
/// );
/// ```
#[must_use]
pub fn simple_name(name: &str) -> Cow<'_, str> {
    let name = name.trim();
    let start = qualifier(name).len();
    let start = if start == 0 { 0 } else { start + 1 };
    let name = &name[start..];
    if !name.contains(sigil::GENERIC_START) {
        return Cow::Borrowed(name);
    }

    let mut simplified = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(open) = rest.find(sigil::GENERIC_START) {
        simplified.push_str(&rest[..=open]);
        rest = &rest[open + 1..];
        let Some(close) = matching_generic_end(rest) else {
            // Unbalanced, keep the rest as written.
            simplified.push_str(rest);
            return Cow::Owned(simplified);
        };
        let arguments = split_top_level(&rest[..close])
            .map(simple_argument)
            .join(",");
        simplified.push_str(&arguments);
        simplified.push(sigil::GENERIC_END);
        rest = &rest[close + 1..];
    }
    simplified.push_str(rest);
    Cow::Owned(simplified)
}

fn simple_argument(argument: &str) -> Cow<'_, str> {
    let argument = argument.trim();
    for prefix in ["? extends ", "? super "] {
        if let Some(bound) = argument.strip_prefix(prefix) {
            return Cow::Owned(format!("{prefix}{}", simple_name(bound)));
        }
    }
    simple_name(argument)
}

/// Returns the offset of the `>` closing a list whose `<` was just consumed.
fn matching_generic_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text.char_indices() {
        match c {
            sigil::GENERIC_START => depth += 1,
            sigil::GENERIC_END if depth == 0 => return Some(offset),
            sigil::GENERIC_END => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Splits on the `,` that are not nested in a type-argument list.
fn split_top_level(text: &str) -> impl Iterator<Item = &str> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut pieces = Vec::new();
    for (offset, c) in text.char_indices() {
        match c {
            sigil::GENERIC_START => depth += 1,
            sigil::GENERIC_END => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&text[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces.into_iter()
}

/// Splits a source-style name on `.` up to its first type-argument list. Everything from the
/// last `.` before the list on belongs to the last segment.
/// ```
/// use typesig::types::signature::render::simple_name_segments;
///
/// assert_eq!(
///     simple_name_segments("java.util.Map<K, V>.Entry"),
///     ["java", "util", "Map<K, V>.Entry"]
/// );
/// ```
#[must_use]
pub fn simple_name_segments(name: &str) -> Vec<&str> {
    if name.is_empty() {
        return Vec::new();
    }
    let head_end = arguments_start(name);
    let mut segments: Vec<&str> = name[..head_end].split(sigil::DOT).collect();
    if let Some(last) = segments.last_mut() {
        let last_start = head_end - last.len();
        *last = &name[last_start..];
    }
    segments
}

/// Returns the qualifier of a source-style name, that is everything before the last `.` that
/// precedes its first type-argument list. Empty if the name is not qualified.
/// ```
/// use typesig::types::signature::render::qualifier;
///
/// assert_eq!(qualifier("java.util.List<java.lang.String>"), "java.util");
/// assert_eq!(qualifier("String"), "");
/// ```
#[must_use]
pub fn qualifier(name: &str) -> &str {
    let head = &name[..arguments_start(name)];
    head.rfind(sigil::DOT).map_or("", |split| &name[..split])
}

/// Returns the class type a type signature names, looking through arrays.
fn named_class<'n, 'a>(node: &'n TypeNode<'a>) -> Option<&'n ClassType<'a>> {
    match &node.kind {
        TypeKind::Class(class) => Some(class),
        TypeKind::Array { element, .. } => named_class(element),
        _ => None,
    }
}

/// Returns the package qualifier of the class type a type signature names, with `/` shown as
/// `.`. Empty for primitives, type variables and unqualified names.
/// ```
/// use typesig::types::signature::render::signature_qualifier;
///
/// assert_eq!(signature_qualifier("[Ljava.util.Map$Entry<TK;TV;>;")?, "java.util");
/// assert_eq!(signature_qualifier("Ljava/lang/String;")?, "java.lang");
/// assert_eq!(signature_qualifier("I")?, "");
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a type signature.
pub fn signature_qualifier(signature: &str) -> Result<Cow<'_, str>, MalformedSignature> {
    let node = type_node(signature)?;
    let qualifier = named_class(&node).map_or("", |class| split_binary_name(class.name()).0);
    if qualifier.contains(sigil::SLASH) {
        Ok(Cow::Owned(qualifier.replace(sigil::SLASH, ".")))
    } else {
        Ok(Cow::Borrowed(qualifier))
    }
}

/// Returns the unqualified source form of the type a type signature names, looking through
/// arrays.
/// ```
/// use typesig::types::signature::render::signature_simple_name;
///
/// assert_eq!(signature_simple_name("[Ljava.util.List<Ljava.lang.String;>;")?, "List<String>");
/// assert_eq!(signature_simple_name("TT;")?, "T");
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if `signature` is not a type signature.
pub fn signature_simple_name(signature: &str) -> Result<String, MalformedSignature> {
    let node = type_node(signature)?;
    let element = match &node.kind {
        TypeKind::Array { element, .. } => element.as_ref(),
        _ => &node,
    };
    Ok(Rendered::new(element, DisplayOptions::empty()).to_string())
}
