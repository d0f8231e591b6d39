//! Owned, mutable model of one Java compilation unit
//!
//! The model is lowered from a tree-sitter parse (see `parser`). Every value
//! the augmenter may change is wrapped in [`Tracked`], which keeps the value
//! as it was read from the source next to the current value. Rendering emits
//! one text edit per tracked value that differs from its original.

use crate::javadoc::Javadoc;
use crate::list::AppendOnlyList;
use stubwright_foundation::ByteSpan;

/// A value together with the state it had when the source was parsed
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    original: T,
    current: T,
}

impl<T: Clone + PartialEq> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self {
            original: value.clone(),
            current: value,
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.current
    }

    pub fn set(&mut self, value: T) {
        self.current = value;
    }

    pub fn original(&self) -> &T {
        &self.original
    }

    pub fn is_modified(&self) -> bool {
        self.original != self.current
    }
}

/// An annotation applied to a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// `@Name`
    Marker { name: String },
    /// `@Name(key = "value")`
    SingleValue {
        name: String,
        key: String,
        value: String,
    },
    /// An annotation with arguments, kept exactly as written in the source
    Verbatim { name: String, text: String },
}

impl Annotation {
    pub fn marker(name: impl Into<String>) -> Self {
        Self::Marker { name: name.into() }
    }

    pub fn single_value(
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::SingleValue {
            name: name.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Marker { name } | Self::SingleValue { name, .. } | Self::Verbatim { name, .. } => {
                name
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Marker { name } => format!("@{}", name),
            Self::SingleValue { name, key, value } => {
                format!("@{}({} = \"{}\")", name, key, escape_string_literal(value))
            }
            Self::Verbatim { text, .. } => text.clone(),
        }
    }
}

fn escape_string_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// One entry of a declaration's modifier list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// `public`, `static`, `final`, ...
    Keyword(String),
    Annotation(Annotation),
    /// A comment written between modifiers, kept as written
    Comment(String),
}

impl Modifier {
    pub fn is_annotation(&self) -> bool {
        matches!(self, Self::Annotation(_))
    }

    pub fn render(&self) -> String {
        match self {
            Self::Keyword(keyword) | Self::Comment(keyword) => keyword.clone(),
            Self::Annotation(annotation) => annotation.render(),
        }
    }

    /// Whether the next element must start on a new line
    fn ends_line(&self) -> bool {
        match self {
            Self::Annotation(_) => true,
            Self::Comment(text) => text.starts_with("//"),
            Self::Keyword(_) => false,
        }
    }
}

/// Ordered modifier list of a declaration
///
/// Like the list it models, it only grows at the end; use
/// [`crate::list::insert_first`] to put an element in front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierList {
    items: Vec<Modifier>,
}

impl ModifierList {
    pub fn new(items: Vec<Modifier>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Modifier> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.items.iter()
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter().filter_map(|item| match item {
            Modifier::Annotation(annotation) => Some(annotation),
            Modifier::Keyword(_) | Modifier::Comment(_) => None,
        })
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.items.push(modifier);
    }

    /// Remove every annotation, walking from the back so indices stay valid.
    ///
    /// Returns the number of annotations removed.
    pub fn remove_annotations(&mut self) -> usize {
        let mut removed = 0;
        for idx in (0..self.items.len()).rev() {
            if self.items[idx].is_annotation() {
                self.items.remove(idx);
                removed += 1;
            }
        }
        removed
    }

    /// Render with annotations and line comments ending their line, and
    /// everything else space separated.
    ///
    /// Every element is followed by its separator, so a non-empty result can
    /// be placed directly before the declaration's type.
    pub fn render(&self, indent: &str, line_ending: &str) -> String {
        let mut out = String::new();
        for item in &self.items {
            out.push_str(&item.render());
            if item.ends_line() {
                out.push_str(line_ending);
                out.push_str(indent);
            } else {
                out.push(' ');
            }
        }
        out
    }
}

impl AppendOnlyList<Modifier> for ModifierList {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn set(&mut self, index: usize, value: Modifier) -> Modifier {
        std::mem::replace(&mut self.items[index], value)
    }

    fn push(&mut self, value: Modifier) {
        self.items.push(value);
    }
}

/// Source regions of a method declaration, as byte spans of the parsed text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodLayout {
    /// Existing doc comment through the next token, or empty at the start
    pub javadoc_region: ByteSpan,
    /// The existing doc comment sits inside the modifier list, so both are
    /// rewritten together
    pub javadoc_in_modifiers: bool,
    /// Modifier list through the next token, or empty at the declaration start
    pub modifiers_region: ByteSpan,
    /// From the end of the parameter list through the throws clause
    pub throws_region: ByteSpan,
    /// The method's name identifier
    pub name_span: ByteSpan,
    /// Leading whitespace of the declaration's first line
    pub indent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub(crate) name: String,
    pub(crate) javadoc: Tracked<Option<Javadoc>>,
    pub(crate) modifiers: Tracked<ModifierList>,
    pub(crate) thrown: Tracked<Vec<String>>,
    pub(crate) local_types: Vec<TypeDeclaration>,
    pub(crate) layout: MethodLayout,
}

impl MethodDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn javadoc(&self) -> Option<&Javadoc> {
        self.javadoc.get().as_ref()
    }

    /// Replace the documentation block wholesale
    pub fn set_javadoc(&mut self, javadoc: Option<Javadoc>) {
        self.javadoc.set(javadoc);
    }

    pub fn modifiers(&self) -> &ModifierList {
        self.modifiers.get()
    }

    pub fn modifiers_mut(&mut self) -> &mut ModifierList {
        self.modifiers.get_mut()
    }

    pub fn thrown_exceptions(&self) -> &[String] {
        self.thrown.get()
    }

    pub fn thrown_exceptions_mut(&mut self) -> &mut Vec<String> {
        self.thrown.get_mut()
    }

    /// Types declared inside the method body (local and anonymous classes)
    pub fn local_types(&self) -> &[TypeDeclaration] {
        &self.local_types
    }

    pub fn layout(&self) -> &MethodLayout {
        &self.layout
    }

    pub fn is_modified(&self) -> bool {
        self.javadoc.is_modified() || self.modifiers.is_modified() || self.thrown.is_modified()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    /// Body of an anonymous class or enum constant
    Anonymous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) members: Vec<Member>,
}

/// A member of a type body, in document order
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Method(MethodDeclaration),
    Type(TypeDeclaration),
}

impl TypeDeclaration {
    /// Simple name; empty for anonymous bodies
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn members_mut(&mut self) -> &mut [Member] {
        &mut self.members
    }

    /// Methods declared directly in this type
    pub fn methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            Member::Type(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Qualified name, without a trailing `.*`
    pub name: String,
    pub is_static: bool,
    /// `import a.b.*;`
    pub on_demand: bool,
}

impl ImportDeclaration {
    pub fn new(name: impl Into<String>, is_static: bool) -> Self {
        Self {
            name: name.into(),
            is_static,
            on_demand: false,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "import {}{}{};",
            if self.is_static { "static " } else { "" },
            self.name,
            if self.on_demand { ".*" } else { "" }
        )
    }
}

/// Where new imports go when the list grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAnchor {
    /// End of the last existing import's line, before its line terminator
    AfterLastImport(usize),
    /// End offset of the package declaration
    AfterPackage(usize),
    FileStart,
}

/// Model of one `.java` file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTree {
    pub(crate) source: String,
    pub(crate) line_ending: &'static str,
    pub(crate) package: Option<String>,
    pub(crate) imports: Tracked<Vec<ImportDeclaration>>,
    pub(crate) import_anchor: ImportAnchor,
    pub(crate) types: Vec<TypeDeclaration>,
}

impl SourceTree {
    /// The text this tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Line terminator used for inserted text, `"\r\n"` when the source uses it
    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn imports(&self) -> &[ImportDeclaration] {
        self.imports.get()
    }

    pub fn has_import(&self, qualified_name: &str) -> bool {
        self.imports().iter().any(|import| import.name == qualified_name)
    }

    /// Append an import at the end of the import list
    pub fn push_import(&mut self, import: ImportDeclaration) {
        self.imports.get_mut().push(import);
    }

    pub fn types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut [TypeDeclaration] {
        &mut self.types
    }

    /// First top-level type of the file
    pub fn primary_type(&self) -> Option<&TypeDeclaration> {
        self.types.first()
    }

    /// Every method of the file in document order
    pub fn methods(&self) -> Vec<&MethodDeclaration> {
        let mut out = Vec::new();
        for ty in &self.types {
            collect_methods(ty, &mut out);
        }
        out
    }

    pub fn is_modified(&self) -> bool {
        self.imports.is_modified() || self.methods().iter().any(|m| m.is_modified())
    }
}

fn collect_methods<'a>(ty: &'a TypeDeclaration, out: &mut Vec<&'a MethodDeclaration>) {
    for member in &ty.members {
        match member {
            Member::Method(method) => {
                out.push(method);
                for local in &method.local_types {
                    collect_methods(local, out);
                }
            }
            Member::Type(nested) => collect_methods(nested, out),
        }
    }
}
