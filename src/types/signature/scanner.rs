//! The grammar matcher every other component relies on.
//!
//! The scanner is a single left-to-right recursive descent that dispatches on the current
//! character. Type arguments, wildcard bounds and intersection bounds are self-delimiting, so a
//! `<` or `>` nested in one argument is never mistaken for a delimiter of the enclosing list.
use super::{
    MalformedSignature, ParsedSignature, Resolution, sigil,
    tree::{
        ClassDeclarationNode, ClassSegment, ClassType, FormalTypeParameter, MethodNode, TypeKind,
        TypeNode, Wildcard,
    },
};
use crate::types::base_type::BaseType;

/// Scans exactly one type signature starting at `start`.
/// Returns the offset right after its last character. Unlike inside parameter lists, a
/// standalone `V` is accepted.
/// ```
/// use typesig::types::signature::scanner::scan_type_signature;
///
/// assert_eq!(scan_type_signature("ILjava.util.List<TT;>;J", 1)?, 22);
/// # Ok::<(), typesig::types::signature::MalformedSignature>(())
/// ```
/// # Errors
/// - [`MalformedSignature`] if no complete type signature starts at `start`.
pub fn scan_type_signature(input: &str, start: usize) -> Result<usize, MalformedSignature> {
    let mut parser = Parser::starting_at(input, start)?;
    parser.return_type()?;
    Ok(parser.position())
}

/// Scans exactly one method signature starting at `start`.
/// Returns the offset right after its last character.
/// # Errors
/// - [`MalformedSignature`] if no complete method signature starts at `start`.
pub fn scan_method_signature(input: &str, start: usize) -> Result<usize, MalformedSignature> {
    let mut parser = Parser::starting_at(input, start)?;
    parser.method_signature()?;
    Ok(parser.position())
}

/// Scans exactly one formal type parameter starting at `start`.
/// Returns the offset right after its last character.
/// # Errors
/// - [`MalformedSignature`] if no complete formal type parameter starts at `start`.
pub fn scan_type_parameter(input: &str, start: usize) -> Result<usize, MalformedSignature> {
    let mut parser = Parser::starting_at(input, start)?;
    parser.formal_type_parameter()?;
    Ok(parser.position())
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '$' || c == '_'
}

/// How many type signatures may enclose one another, counting wildcard bounds, captures,
/// intersection bounds, type arguments and array elements.
pub(crate) const MAX_NESTING_DEPTH: usize = 128;

/// A cursor over a signature that builds [`TypeNode`]s as it matches the grammar.
#[derive(Debug)]
pub(crate) struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn starting_at(input: &'a str, start: usize) -> Result<Self, MalformedSignature> {
        if start <= input.len() && input.is_char_boundary(start) {
            Ok(Self {
                input,
                pos: start,
                depth: 0,
            })
        } else {
            Err(MalformedSignature::new(input, start, "start offset is out of bounds"))
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        let matched = self.peek() == Some(expected);
        if matched {
            self.pos += expected.len_utf8();
        }
        matched
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), MalformedSignature> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn error(&self, reason: &'static str) -> MalformedSignature {
        MalformedSignature::new(self.input, self.pos, reason)
    }

    fn text_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    /// Runs `parse` and requires it to consume the rest of the input.
    pub(crate) fn complete<T>(
        mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, MalformedSignature>,
    ) -> Result<T, MalformedSignature> {
        let parsed = parse(&mut self)?;
        if self.pos == self.input.len() {
            Ok(parsed)
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }

    /// A type signature, or `V`.
    pub(crate) fn return_type(&mut self) -> Result<TypeNode<'a>, MalformedSignature> {
        let start = self.pos;
        if self.eat(BaseType::Void.descriptor()) {
            return Ok(TypeNode {
                text: self.text_from(start),
                kind: TypeKind::Base(BaseType::Void),
            });
        }
        self.type_signature()
    }

    /// A type signature other than `V`.
    pub(crate) fn type_signature(&mut self) -> Result<TypeNode<'a>, MalformedSignature> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(self.error("signature nests too deeply"));
        }
        let start = self.pos;
        self.depth += 1;
        let kind = self.type_kind();
        self.depth -= 1;
        Ok(TypeNode {
            kind: kind?,
            text: self.text_from(start),
        })
    }

    fn type_kind(&mut self) -> Result<TypeKind<'a>, MalformedSignature> {
        Ok(match self.peek() {
            None => return Err(self.error("expected a type signature")),
            Some(sigil::ARRAY) => {
                let mut dimensions = 0;
                while self.eat(sigil::ARRAY) {
                    dimensions += 1;
                }
                let element = self.type_signature()?;
                TypeKind::Array {
                    dimensions,
                    element: Box::new(element),
                }
            }
            Some(sigil::TYPE_VARIABLE) => {
                self.bump();
                let name = self.identifier()?;
                self.expect(sigil::TERMINATOR, "expected `;` after a type variable name")?;
                TypeKind::TypeVariable(name)
            }
            Some(sigil::RESOLVED | sigil::UNRESOLVED) => TypeKind::Class(self.class_type()?),
            Some(sigil::STAR | sigil::EXTENDS | sigil::SUPER) => {
                TypeKind::Wildcard(self.wildcard()?)
            }
            Some(sigil::CAPTURE) => {
                self.bump();
                TypeKind::Capture(self.wildcard()?)
            }
            Some(sigil::INTERSECTION) => {
                self.bump();
                let mut bounds = vec![self.type_signature()?];
                while self.eat(sigil::COLON) {
                    bounds.push(self.type_signature()?);
                }
                TypeKind::Intersection(bounds)
            }
            Some(c) => match BaseType::try_from(c) {
                Ok(BaseType::Void) => {
                    return Err(self.error("`V` is only legal as a return type"));
                }
                Ok(base_type) => {
                    self.bump();
                    TypeKind::Base(base_type)
                }
                Err(_) => return Err(self.error("expected a type signature")),
            },
        })
    }

    fn identifier(&mut self) -> Result<&'a str, MalformedSignature> {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        if self.pos == start {
            Err(self.error("expected an identifier"))
        } else {
            Ok(self.text_from(start))
        }
    }

    /// Identifiers separated by `.` or `/`.
    fn qualified_name(&mut self) -> Result<&'a str, MalformedSignature> {
        let start = self.pos;
        self.identifier()?;
        while self.eat(sigil::DOT) || self.eat(sigil::SLASH) {
            self.identifier()?;
        }
        Ok(self.text_from(start))
    }

    fn class_type(&mut self) -> Result<ClassType<'a>, MalformedSignature> {
        let resolution = match self.bump() {
            Some(sigil::RESOLVED) => Resolution::Resolved,
            Some(sigil::UNRESOLVED) => Resolution::Unresolved,
            _ => return Err(self.error("expected a class type")),
        };
        let name = self.qualified_name()?;
        let arguments = self.type_arguments()?;
        let mut segments = vec![ClassSegment { name, arguments }];
        while self.eat(sigil::DOT) {
            let name = self.identifier()?;
            let arguments = self.type_arguments()?;
            segments.push(ClassSegment { name, arguments });
        }
        self.expect(sigil::TERMINATOR, "expected `;` to terminate a class type")?;
        Ok(ClassType {
            resolution,
            segments,
        })
    }

    fn type_arguments(&mut self) -> Result<Option<Vec<TypeNode<'a>>>, MalformedSignature> {
        if !self.eat(sigil::GENERIC_START) {
            return Ok(None);
        }
        let mut arguments = Vec::new();
        while !self.eat(sigil::GENERIC_END) {
            if self.peek().is_none() {
                return Err(self.error("unterminated type-argument list"));
            }
            arguments.push(self.type_signature()?);
        }
        if arguments.is_empty() {
            return Err(self.error("empty type-argument list"));
        }
        Ok(Some(arguments))
    }

    fn wildcard(&mut self) -> Result<Wildcard<'a>, MalformedSignature> {
        match self.peek() {
            Some(sigil::STAR) => {
                self.bump();
                Ok(Wildcard::Unbounded)
            }
            Some(sigil::EXTENDS) => {
                self.bump();
                Ok(Wildcard::Extends(Box::new(self.type_signature()?)))
            }
            Some(sigil::SUPER) => {
                self.bump();
                Ok(Wildcard::Super(Box::new(self.type_signature()?)))
            }
            _ => Err(self.error("expected a wildcard")),
        }
    }

    /// Whether the input continues with `name:`, the start of the next formal type parameter.
    fn at_type_parameter(&self) -> bool {
        let rest = &self.input[self.pos..];
        let name_len = rest
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(rest.len());
        name_len > 0 && rest[name_len..].starts_with(sigil::COLON)
    }

    fn at_bound_end(&self) -> bool {
        matches!(self.peek(), None | Some(sigil::COLON | sigil::GENERIC_END))
            || self.at_type_parameter()
    }

    /// `name:` followed by an optional class bound and any number of `:`-prefixed interface
    /// bounds. A separator followed by nothing is legal, so `<T:U:>` declares two parameters.
    /// A bound never starts with `name:`; such input starts the next parameter instead.
    pub(crate) fn formal_type_parameter(
        &mut self,
    ) -> Result<FormalTypeParameter<'a>, MalformedSignature> {
        let start = self.pos;
        let name = self.identifier()?;
        self.expect(sigil::COLON, "expected `:` after a type parameter name")?;
        let mut bounds = Vec::new();
        let has_class_bound = !self.at_bound_end();
        if has_class_bound {
            bounds.push(self.type_signature()?);
        }
        while self.eat(sigil::COLON) {
            if !self.at_bound_end() {
                bounds.push(self.type_signature()?);
            }
        }
        Ok(FormalTypeParameter {
            text: self.text_from(start),
            name,
            has_class_bound,
            bounds,
        })
    }

    fn formal_type_parameters(
        &mut self,
    ) -> Result<Vec<FormalTypeParameter<'a>>, MalformedSignature> {
        self.expect(sigil::GENERIC_START, "expected `<` to open the type-parameter list")?;
        let mut parameters = Vec::new();
        while !self.eat(sigil::GENERIC_END) {
            if self.peek().is_none() {
                return Err(self.error("unterminated type-parameter list"));
            }
            parameters.push(self.formal_type_parameter()?);
        }
        if parameters.is_empty() {
            return Err(self.error("empty type-parameter list"));
        }
        Ok(parameters)
    }

    fn optional_formal_type_parameters(
        &mut self,
    ) -> Result<Vec<FormalTypeParameter<'a>>, MalformedSignature> {
        if self.peek() == Some(sigil::GENERIC_START) {
            self.formal_type_parameters()
        } else {
            Ok(Vec::new())
        }
    }

    pub(crate) fn method_signature(&mut self) -> Result<MethodNode<'a>, MalformedSignature> {
        let start = self.pos;
        let type_parameters = self.optional_formal_type_parameters()?;
        self.method_rest(start, type_parameters)
    }

    fn method_rest(
        &mut self,
        start: usize,
        type_parameters: Vec<FormalTypeParameter<'a>>,
    ) -> Result<MethodNode<'a>, MalformedSignature> {
        self.expect(sigil::PARAMETERS_START, "expected `(` to open the parameter list")?;
        let mut parameters = Vec::new();
        while !self.eat(sigil::PARAMETERS_END) {
            if self.peek().is_none() {
                return Err(self.error("unterminated parameter list"));
            }
            parameters.push(self.type_signature()?);
        }
        let return_type = self.return_type()?;
        let mut thrown = Vec::new();
        while self.eat(sigil::EXCEPTION_START) {
            thrown.push(self.type_signature()?);
        }
        Ok(MethodNode {
            text: self.text_from(start),
            type_parameters,
            parameters,
            return_type,
            thrown,
        })
    }

    pub(crate) fn class_declaration(
        &mut self,
    ) -> Result<ClassDeclarationNode<'a>, MalformedSignature> {
        let start = self.pos;
        let type_parameters = self.optional_formal_type_parameters()?;
        self.class_declaration_rest(start, type_parameters)
    }

    fn class_declaration_rest(
        &mut self,
        start: usize,
        type_parameters: Vec<FormalTypeParameter<'a>>,
    ) -> Result<ClassDeclarationNode<'a>, MalformedSignature> {
        let superclass = self.class_type_signature()?;
        let mut interfaces = Vec::new();
        while matches!(self.peek(), Some(sigil::RESOLVED | sigil::UNRESOLVED)) {
            interfaces.push(self.class_type_signature()?);
        }
        Ok(ClassDeclarationNode {
            text: self.text_from(start),
            type_parameters,
            superclass,
            interfaces,
        })
    }

    fn class_type_signature(&mut self) -> Result<TypeNode<'a>, MalformedSignature> {
        match self.peek() {
            Some(sigil::RESOLVED | sigil::UNRESOLVED) => self.type_signature(),
            _ => Err(self.error("expected a class type")),
        }
    }

    /// A formal type parameter list followed by either a method or a class declaration.
    pub(crate) fn generic_declaration(
        &mut self,
    ) -> Result<ParsedSignature<'a>, MalformedSignature> {
        let start = self.pos;
        let type_parameters = self.formal_type_parameters()?;
        if self.peek() == Some(sigil::PARAMETERS_START) {
            self.method_rest(start, type_parameters)
                .map(ParsedSignature::Method)
        } else {
            self.class_declaration_rest(start, type_parameters)
                .map(ParsedSignature::ClassDeclaration)
        }
    }
}
