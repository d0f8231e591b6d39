//! Test framework policies
//!
//! A policy tells the augmenter which imports a test file needs, which
//! exception the stubs declare, and whether the test marker annotation is
//! rewritten with a grouping value.

use crate::constants::{BROAD_EXCEPTION, GROUPING_KEY, GROUPING_VALUE, TEST_MARKER};
use crate::tree::{Annotation, ImportDeclaration, SourceTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stubwright_foundation::{StubError, StubResult};

/// The supported test frameworks
///
/// Serialized under the same identifiers the configuration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameworkKind {
    /// Base-class driven (junit3)
    #[serde(rename = "junit3")]
    Basic,
    /// Marker-annotation driven (junit4)
    #[serde(rename = "junit4")]
    Annotated,
    /// Marker annotation carrying a group assignment (testng)
    #[serde(rename = "testng")]
    AnnotatedWithGrouping,
}

/// An import a framework requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredImport {
    pub name: &'static str,
    pub is_static: bool,
}

impl RequiredImport {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            is_static: false,
        }
    }

    const fn static_member(name: &'static str) -> Self {
        Self {
            name,
            is_static: true,
        }
    }
}

/// Replacement annotation put at the head of a stub's modifier list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationRewrite {
    pub marker: &'static str,
    pub key: &'static str,
    pub value: &'static str,
}

impl AnnotationRewrite {
    pub fn annotation(&self) -> Annotation {
        Annotation::single_value(self.marker, self.key, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkPolicy {
    pub kind: FrameworkKind,
    /// Exception type every augmented stub declares
    pub broad_exception: &'static str,
    /// Imports in the order they are appended
    pub imports: &'static [RequiredImport],
    pub annotation_rewrite: Option<AnnotationRewrite>,
}

const BASIC_IMPORTS: &[RequiredImport] = &[RequiredImport::plain("junit.framework.TestCase")];

const ANNOTATED_IMPORTS: &[RequiredImport] = &[
    RequiredImport::plain("org.junit.Test"),
    RequiredImport::plain("org.junit.Assert"),
    RequiredImport::static_member("org.junit.Assert.fail"),
];

const GROUPING_IMPORTS: &[RequiredImport] = &[
    RequiredImport::plain("org.testng.annotations.Test"),
    RequiredImport::plain("org.testng.Assert"),
    RequiredImport::static_member("org.testng.Assert.fail"),
];

impl FrameworkKind {
    pub const ALL: [FrameworkKind; 3] = [
        FrameworkKind::Basic,
        FrameworkKind::Annotated,
        FrameworkKind::AnnotatedWithGrouping,
    ];

    /// Resolve a configured framework identifier.
    ///
    /// Identifiers are matched exactly; anything else is an unsupported
    /// framework.
    pub fn from_identifier(identifier: &str) -> StubResult<Self> {
        match identifier {
            "junit3" => Ok(Self::Basic),
            "junit4" => Ok(Self::Annotated),
            "testng" => Ok(Self::AnnotatedWithGrouping),
            other => Err(StubError::unsupported_framework(other)),
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Basic => "junit3",
            Self::Annotated => "junit4",
            Self::AnnotatedWithGrouping => "testng",
        }
    }

    pub fn policy(&self) -> FrameworkPolicy {
        let (imports, annotation_rewrite) = match self {
            Self::Basic => (BASIC_IMPORTS, None),
            Self::Annotated => (ANNOTATED_IMPORTS, None),
            Self::AnnotatedWithGrouping => (
                GROUPING_IMPORTS,
                Some(AnnotationRewrite {
                    marker: TEST_MARKER,
                    key: GROUPING_KEY,
                    value: GROUPING_VALUE,
                }),
            ),
        };

        FrameworkPolicy {
            kind: *self,
            broad_exception: BROAD_EXCEPTION,
            imports,
            annotation_rewrite,
        }
    }
}

impl FromStr for FrameworkKind {
    type Err = StubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Append every import the policy requires that the file lacks.
///
/// An import counts as present when an existing import has the same qualified
/// name, whatever its static flag. Existing imports are never reordered or
/// removed. Returns the number of imports added.
pub fn apply_imports(tree: &mut SourceTree, policy: &FrameworkPolicy) -> usize {
    let mut added = 0;
    for required in policy.imports {
        if tree.has_import(required.name) {
            tracing::debug!(import = required.name, "Import already present");
            continue;
        }
        tree.push_import(ImportDeclaration::new(required.name, required.is_static));
        added += 1;
    }
    added
}
