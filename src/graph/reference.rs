//! Usage sites.

use std::sync::Arc;

use crate::base::Span;

use super::ids::SymbolId;

/// A file + span pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: Arc<str>,
    pub span: Span,
}

impl Location {
    pub fn new(file: Arc<str>, span: Span) -> Self {
        Self { file, span }
    }
}

/// How a reference was discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefVia {
    /// An identifier use reported by the type-checker.
    Identifier,
    /// An import statement naming the target package.
    Import,
    /// An embedded struct field or interface member naming the target type.
    Embedding,
    /// A named type inside a field, parameter or variable type expression.
    TypeAnnotation,
}

/// A site that uses a symbol. Stored on the target symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    /// File containing the use.
    pub file: Arc<str>,
    /// Enclosing declaration of the use, when known.
    pub context: Option<SymbolId>,
    pub span: Span,
    pub is_write: bool,
    pub via: RefVia,
}

impl Reference {
    pub fn new(file: Arc<str>, span: Span, via: RefVia) -> Self {
        Self {
            file,
            context: None,
            span,
            is_write: false,
            via,
        }
    }

    pub fn with_context(mut self, context: Option<SymbolId>) -> Self {
        self.context = context;
        self
    }

    pub fn with_write(mut self, is_write: bool) -> Self {
        self.is_write = is_write;
        self
    }

    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.span)
    }
}
