//! Javadoc model and cross-reference link builder

use crate::constants::DESCRIPTION_PREFIX;
use serde::{Deserialize, Serialize};

/// A documentation comment as an ordered list of tag elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Javadoc {
    tags: Vec<TagElement>,
}

/// One tag of a documentation comment
///
/// The description tag has no name; block tags carry their `@name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagElement {
    pub name: Option<String>,
    pub fragments: Vec<DocFragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocFragment {
    /// Free text
    Text(String),
    /// A referenced name, e.g. the exception type after `@throws`
    Name(String),
}

impl DocFragment {
    fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Name(text) => text,
        }
    }
}

impl TagElement {
    pub fn description(text: impl Into<String>) -> Self {
        Self {
            name: None,
            fragments: vec![DocFragment::Text(text.into())],
        }
    }

    pub fn named(name: impl Into<String>, fragments: Vec<DocFragment>) -> Self {
        Self {
            name: Some(name.into()),
            fragments,
        }
    }

    fn render(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.fragments.len() + 1);
        if let Some(name) = &self.name {
            parts.push(name);
        }
        parts.extend(self.fragments.iter().map(DocFragment::as_str));
        parts.join(" ")
    }
}

impl Javadoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[TagElement] {
        &self.tags
    }

    pub fn push_tag(&mut self, tag: TagElement) {
        self.tags.push(tag);
    }

    /// Text of the description tag, if present
    pub fn description(&self) -> Option<String> {
        self.tags
            .iter()
            .find(|tag| tag.name.is_none())
            .map(TagElement::render)
    }

    /// Lower the text of a `/** ... */` comment into tags.
    pub fn parse_comment(comment: &str) -> Self {
        let body = comment
            .trim()
            .trim_start_matches("/**")
            .trim_end_matches("*/");

        let mut doc = Javadoc::new();
        let mut current: Option<TagElement> = None;

        for line in body.lines() {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('@') {
                if let Some(tag) = current.take() {
                    doc.push_tag(tag);
                }
                let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                let rest = rest.trim();
                let fragments = if rest.is_empty() {
                    Vec::new()
                } else {
                    vec![DocFragment::Text(rest.to_string())]
                };
                current = Some(TagElement::named(name, fragments));
            } else {
                current
                    .get_or_insert_with(|| TagElement {
                        name: None,
                        fragments: Vec::new(),
                    })
                    .fragments
                    .push(DocFragment::Text(line.to_string()));
            }
        }

        if let Some(tag) = current {
            doc.push_tag(tag);
        }
        doc
    }

    /// Render as a comment whose continuation lines start with `indent`.
    ///
    /// Lines are joined with `line_ending`; the result has no trailing one.
    pub fn render(&self, indent: &str, line_ending: &str) -> String {
        let mut out = String::from("/**");
        out.push_str(line_ending);
        for tag in &self.tags {
            out.push_str(indent);
            out.push_str(" * ");
            out.push_str(&tag.render());
            out.push_str(line_ending);
        }
        out.push_str(indent);
        out.push_str(" */");
        out
    }
}

/// What a generated test method documents a link to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LinkTarget {
    /// The class under test, when no single tested member is known
    #[serde(rename_all = "camelCase")]
    Class { qualified_name: String },
    /// A specific method under test
    #[serde(rename_all = "camelCase")]
    Method {
        declaring_type: String,
        method_name: String,
        parameter_types: Vec<String>,
    },
}

impl LinkTarget {
    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::Class {
            qualified_name: qualified_name.into(),
        }
    }

    pub fn method(
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
        parameter_types: Vec<String>,
    ) -> Self {
        Self::Method {
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            parameter_types,
        }
    }

    /// Description sentence for this target
    pub fn description(&self) -> String {
        match self {
            Self::Class { qualified_name } => link_for_class(qualified_name),
            Self::Method {
                declaring_type,
                method_name,
                parameter_types,
            } => link_for_method(declaring_type, method_name, parameter_types),
        }
    }
}

/// Creates a javadoc `{@link ...}` reference
pub fn create_link(target: &str) -> String {
    format!("{{@link {}}}", target)
}

/// `Test method for {@link <qualified_class_name>}.`
pub fn link_for_class(qualified_class_name: &str) -> String {
    format!("{}{}.", DESCRIPTION_PREFIX, create_link(qualified_class_name))
}

/// `Test method for {@link <type>#<method>(<params>)}.`
///
/// Generic arguments are dropped from every parameter type so the link stays
/// valid javadoc syntax.
pub fn link_for_method<S: AsRef<str>>(
    declaring_type_name: &str,
    method_name: &str,
    parameter_type_names: &[S],
) -> String {
    let parameters = parameter_type_names
        .iter()
        .map(|name| strip_type_arguments(name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");

    let target = format!("{}#{}({})", declaring_type_name, method_name, parameters);
    format!("{}{}.", DESCRIPTION_PREFIX, create_link(&target))
}

/// Display name of a type without its generic arguments
///
/// `List<String>` becomes `List`.
pub fn strip_type_arguments(type_name: &str) -> &str {
    match type_name.find('<') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_link_for_class() {
        assert_eq!(
            link_for_class("com.example.Circle"),
            "Test method for {@link com.example.Circle}."
        );
    }

    #[test]
    fn test_link_for_method_without_parameters() {
        let none: [&str; 0] = [];
        assert_eq!(
            link_for_method("Circle", "area", &none),
            "Test method for {@link Circle#area()}."
        );
    }

    #[test]
    fn test_link_for_method_strips_generics() {
        assert_eq!(
            link_for_method("Circle", "scale", &["int", "List<String>"]),
            "Test method for {@link Circle#scale(int, List)}."
        );
    }

    #[test]
    fn test_strip_type_arguments() {
        assert_eq!(strip_type_arguments("List<String>"), "List");
        assert_eq!(strip_type_arguments("Map<K, List<V>>"), "Map");
        assert_eq!(strip_type_arguments("int[]"), "int[]");
    }

    #[test]
    fn test_render_with_indent() {
        let mut doc = Javadoc::new();
        doc.push_tag(TagElement::description("Test method for {@link Circle}."));
        doc.push_tag(TagElement::named(
            "@throws",
            vec![
                DocFragment::Name("Exception".into()),
                DocFragment::Text("Error.".into()),
            ],
        ));

        assert_eq!(
            doc.render("    ", "\n"),
            concat!(
                "/**\n",
                "     * Test method for {@link Circle}.\n",
                "     * @throws Exception Error.\n",
                "     */",
            )
        );
    }

    #[test]
    fn test_render_with_crlf() {
        let mut doc = Javadoc::new();
        doc.push_tag(TagElement::description("Test method for {@link Circle}."));

        assert_eq!(
            doc.render("  ", "\r\n"),
            "/**\r\n   * Test method for {@link Circle}.\r\n   */"
        );
    }

    #[test]
    fn test_parse_comment_description_and_tags() {
        let doc = Javadoc::parse_comment(
            "/**\n     * Computes things.\n     * More detail.\n     *\n     * @param x the x\n     * @deprecated\n     */",
        );
        assert_eq!(doc.tags().len(), 3);
        assert_eq!(doc.description().as_deref(), Some("Computes things. More detail."));
        assert_eq!(doc.tags()[1].name.as_deref(), Some("@param"));
        assert_eq!(doc.tags()[1].fragments, vec![DocFragment::Text("x the x".into())]);
        assert_eq!(doc.tags()[2].name.as_deref(), Some("@deprecated"));
        assert!(doc.tags()[2].fragments.is_empty());
    }

    #[test]
    fn test_parse_single_line_comment() {
        let doc = Javadoc::parse_comment("/** Short. */");
        assert_eq!(doc.description().as_deref(), Some("Short."));
    }

    #[test]
    fn test_link_target_description() {
        let target = LinkTarget::method("Circle", "area", vec![]);
        assert_eq!(target.description(), "Test method for {@link Circle#area()}.");
        assert_eq!(
            LinkTarget::class("a.B").description(),
            "Test method for {@link a.B}."
        );
    }
}
