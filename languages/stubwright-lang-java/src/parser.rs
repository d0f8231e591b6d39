//! Lowering of a tree-sitter-java parse into the owned [`SourceTree`] model

use crate::javadoc::Javadoc;
use crate::tree::{
    Annotation, ImportAnchor, ImportDeclaration, Member, MethodDeclaration, MethodLayout,
    Modifier, ModifierList, SourceTree, Tracked, TypeDeclaration, TypeKind,
};
use stubwright_foundation::{line_column, ByteSpan, StubError, StubResult};
use tree_sitter::{Node, Parser};

impl SourceTree {
    /// Parse a Java compilation unit.
    ///
    /// Fails with a parse error when the grammar cannot be loaded or the text
    /// contains a syntax error.
    pub fn parse(source: &str) -> StubResult<SourceTree> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| StubError::parse(format!("Failed to load Java grammar: {}", e)))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| StubError::parse("Failed to parse Java source"))?;
        let root = tree.root_node();

        if root.has_error() {
            let offset = first_error(root).map(|n| n.start_byte()).unwrap_or(0);
            let (line, column) = line_column(source, offset);
            return Err(StubError::parse(format!(
                "Syntax error at line {}, column {}",
                line + 1,
                column + 1
            )));
        }

        Lowering { source }.compilation_unit(root)
    }
}

/// `"\r\n"` when the first line of `source` ends with it, `"\n"` otherwise
fn detect_line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(idx) if source[..idx].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn type_kind(kind: &str) -> Option<TypeKind> {
    match kind {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" => Some(TypeKind::Record),
        "annotation_type_declaration" => Some(TypeKind::Annotation),
        _ => None,
    }
}

fn is_comment(node: &Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn named_children_of(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor).collect();
    children
}

/// Leading whitespace of the line containing `offset`
fn indent_of(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

struct Lowering<'s> {
    source: &'s str,
}

struct FoundJavadoc {
    doc: Javadoc,
    region: ByteSpan,
    /// Start of the comment when it sits inside the modifier list
    embedded_at: Option<usize>,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node<'_>) -> StubResult<&'s str> {
        node.utf8_text(self.source.as_bytes())
            .map_err(|e| StubError::parse(format!("Invalid UTF-8 in source: {}", e)))
    }

    fn compilation_unit(&self, root: Node<'_>) -> StubResult<SourceTree> {
        let mut package = None;
        let mut package_end = None;
        let mut imports = Vec::new();
        let mut last_import_end = None;
        let mut types = Vec::new();

        for child in named_children_of(root) {
            match child.kind() {
                "package_declaration" => {
                    package = named_children_of(child)
                        .into_iter()
                        .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
                        .map(|n| self.text(n).map(str::to_string))
                        .transpose()?;
                    package_end = Some(self.line_tail_end(child));
                }
                "import_declaration" => {
                    imports.push(self.import(child)?);
                    last_import_end = Some(self.line_tail_end(child));
                }
                kind => {
                    if let Some(kind) = type_kind(kind) {
                        types.push(self.type_declaration(child, kind)?);
                    }
                }
            }
        }

        let import_anchor = match (last_import_end, package_end) {
            (Some(end), _) => ImportAnchor::AfterLastImport(end),
            (None, Some(end)) => ImportAnchor::AfterPackage(end),
            (None, None) => ImportAnchor::FileStart,
        };

        tracing::debug!(
            package = ?package,
            imports = imports.len(),
            types = types.len(),
            "Lowered Java compilation unit"
        );

        Ok(SourceTree {
            source: self.source.to_string(),
            line_ending: detect_line_ending(self.source),
            package,
            imports: Tracked::new(imports),
            import_anchor,
            types,
        })
    }

    /// End of `node` together with the comments that follow it on the same line
    fn line_tail_end(&self, node: Node<'_>) -> usize {
        let mut end = node.end_byte();
        let mut next = node.next_sibling();
        while let Some(sibling) = next {
            if !is_comment(&sibling) || self.source[end..sibling.start_byte()].contains('\n') {
                break;
            }
            end = sibling.end_byte();
            next = sibling.next_sibling();
        }
        end
    }

    fn import(&self, node: Node<'_>) -> StubResult<ImportDeclaration> {
        let name_node = named_children_of(node)
            .into_iter()
            .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
            .ok_or_else(|| StubError::parse("Import declaration without a name"))?;

        Ok(ImportDeclaration {
            name: self.text(name_node)?.to_string(),
            is_static: child_of_kind(node, "static").is_some(),
            on_demand: child_of_kind(node, "asterisk").is_some(),
        })
    }

    fn type_declaration(&self, node: Node<'_>, kind: TypeKind) -> StubResult<TypeDeclaration> {
        let name = match node.child_by_field_name("name") {
            Some(name) => self.text(name)?.to_string(),
            None => String::new(),
        };
        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.body(body, &mut members)?;
        }
        Ok(TypeDeclaration {
            name,
            kind,
            members,
        })
    }

    fn anonymous(&self, body: Node<'_>) -> StubResult<TypeDeclaration> {
        let mut members = Vec::new();
        self.body(body, &mut members)?;
        Ok(TypeDeclaration {
            name: String::new(),
            kind: TypeKind::Anonymous,
            members,
        })
    }

    fn body(&self, body: Node<'_>, members: &mut Vec<Member>) -> StubResult<()> {
        for child in named_children_of(body) {
            match child.kind() {
                "method_declaration" => members.push(Member::Method(self.method(child)?)),
                "enum_body_declarations" => self.body(child, members)?,
                "enum_constant" => {
                    if let Some(constant_body) = child.child_by_field_name("body") {
                        members.push(Member::Type(self.anonymous(constant_body)?));
                    }
                }
                _ if is_comment(&child) => {}
                kind => match type_kind(kind) {
                    Some(kind) => members.push(Member::Type(self.type_declaration(child, kind)?)),
                    // fields, constructors and initializers only contribute the types inside them
                    None => {
                        let mut nested = Vec::new();
                        self.local_types(child, &mut nested)?;
                        members.extend(nested.into_iter().map(Member::Type));
                    }
                },
            }
        }
        Ok(())
    }

    /// Types declared anywhere under `node`, outermost first, in document order
    fn local_types(&self, node: Node<'_>, out: &mut Vec<TypeDeclaration>) -> StubResult<()> {
        for child in named_children_of(node) {
            if let Some(kind) = type_kind(child.kind()) {
                out.push(self.type_declaration(child, kind)?);
            } else if child.kind() == "class_body" && node.kind() == "object_creation_expression" {
                out.push(self.anonymous(child)?);
            } else {
                self.local_types(child, out)?;
            }
        }
        Ok(())
    }

    fn method(&self, node: Node<'_>) -> StubResult<MethodDeclaration> {
        let name_node = node
            .child_by_field_name("name")
            .ok_or_else(|| StubError::parse("Method declaration without a name"))?;
        let parameters = node
            .child_by_field_name("parameters")
            .ok_or_else(|| StubError::parse("Method declaration without parameters"))?;
        let start = node.start_byte();

        let modifiers_node = child_of_kind(node, "modifiers");
        let mut javadoc = self.leading_javadoc(node)?;
        if javadoc.is_none() {
            if let Some(modifiers) = modifiers_node {
                javadoc = self.embedded_javadoc(modifiers)?;
            }
        }
        let (javadoc, javadoc_region, embedded_doc) = match javadoc {
            Some(found) => (Some(found.doc), found.region, found.embedded_at),
            None => (None, ByteSpan::at(start), None),
        };

        let (modifiers, modifiers_region) = match modifiers_node {
            Some(modifiers) => {
                let end = modifiers
                    .next_sibling()
                    .map(|next| next.start_byte())
                    .unwrap_or_else(|| modifiers.end_byte());
                (
                    self.modifiers(modifiers, embedded_doc)?,
                    ByteSpan::new(modifiers.start_byte(), end),
                )
            }
            None => (ModifierList::default(), ByteSpan::at(start)),
        };

        let throws_anchor = node
            .child_by_field_name("dimensions")
            .unwrap_or(parameters)
            .end_byte();
        let (thrown, throws_region) = match child_of_kind(node, "throws") {
            Some(throws) => {
                let names = named_children_of(throws)
                    .into_iter()
                    .filter(|n| !is_comment(n))
                    .map(|n| self.text(n).map(str::to_string))
                    .collect::<StubResult<Vec<_>>>()?;
                (names, ByteSpan::new(throws_anchor, throws.end_byte()))
            }
            None => (Vec::new(), ByteSpan::at(throws_anchor)),
        };

        let mut local_types = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.local_types(body, &mut local_types)?;
        }

        Ok(MethodDeclaration {
            name: self.text(name_node)?.to_string(),
            javadoc: Tracked::new(javadoc),
            modifiers: Tracked::new(modifiers),
            thrown: Tracked::new(thrown),
            local_types,
            layout: MethodLayout {
                javadoc_region,
                javadoc_in_modifiers: embedded_doc.is_some(),
                modifiers_region,
                throws_region,
                name_span: ByteSpan::new(name_node.start_byte(), name_node.end_byte()),
                indent: indent_of(self.source, start),
            },
        })
    }

    /// The nearest `/** */` comment before a method, looking back over other
    /// comments only.
    ///
    /// The region covers the comment up to the next token, so comments between
    /// it and the declaration stay in place.
    fn leading_javadoc(&self, method: Node<'_>) -> StubResult<Option<FoundJavadoc>> {
        let mut prev = method.prev_sibling();
        while let Some(node) = prev {
            if !is_comment(&node) {
                break;
            }
            let text = self.text(node)?;
            if is_doc_comment(text) {
                let end = node
                    .next_sibling()
                    .map(|next| next.start_byte())
                    .unwrap_or_else(|| method.start_byte());
                return Ok(Some(FoundJavadoc {
                    doc: Javadoc::parse_comment(text),
                    region: ByteSpan::new(node.start_byte(), end),
                    embedded_at: None,
                }));
            }
            prev = node.prev_sibling();
        }
        Ok(None)
    }

    /// The last `/** */` comment written between a method's modifiers.
    ///
    /// Its replacement goes in front of the modifier list, which is rendered
    /// without it.
    fn embedded_javadoc(&self, modifiers: Node<'_>) -> StubResult<Option<FoundJavadoc>> {
        let mut found = None;
        for child in named_children_of(modifiers) {
            if child.kind() == "block_comment" && is_doc_comment(self.text(child)?) {
                found = Some(child);
            }
        }
        let Some(doc) = found else {
            return Ok(None);
        };
        Ok(Some(FoundJavadoc {
            doc: Javadoc::parse_comment(self.text(doc)?),
            region: ByteSpan::at(modifiers.start_byte()),
            embedded_at: Some(doc.start_byte()),
        }))
    }

    /// Lower a modifier list, leaving out the doc comment starting at `skip`
    fn modifiers(&self, node: Node<'_>, skip: Option<usize>) -> StubResult<ModifierList> {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

        let mut items = Vec::with_capacity(children.len());
        for child in children {
            let item = match child.kind() {
                "marker_annotation" => {
                    let name = child
                        .child_by_field_name("name")
                        .ok_or_else(|| StubError::parse("Annotation without a name"))?;
                    Modifier::Annotation(Annotation::marker(self.text(name)?))
                }
                "annotation" => {
                    let name = child
                        .child_by_field_name("name")
                        .ok_or_else(|| StubError::parse("Annotation without a name"))?;
                    Modifier::Annotation(Annotation::Verbatim {
                        name: self.text(name)?.to_string(),
                        text: self.text(child)?.to_string(),
                    })
                }
                _ if Some(child.start_byte()) == skip => continue,
                _ if is_comment(&child) => {
                    Modifier::Comment(self.text(child)?.trim_end().to_string())
                }
                _ => Modifier::Keyword(self.text(child)?.to_string()),
            };
            items.push(item);
        }
        Ok(ModifierList::new(items))
    }
}
