//! End-to-end augmentation of realistic test files

use pretty_assertions::assert_eq;
use stubwright_foundation::StubError;
use stubwright_lang_java::{
    AugmentRequest, ChangedFile, EditResult, FrameworkKind, LinkTarget, Session, SourceTree,
    TargetSelection,
};

fn changed(result: EditResult) -> ChangedFile {
    match result {
        EditResult::Changed(file) => file,
        EditResult::NoChanges => panic!("expected the file to change"),
    }
}

fn line_of(text: &str, needle: &str) -> u32 {
    text.lines()
        .position(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("{} not found", needle)) as u32
}

const CIRCLE_STUB: &str = r#"package com.example;

public class CircleTest {

    @Test
    public void testArea() {
        fail("Not yet implemented");
    }
}
"#;

#[test]
fn annotated_framework_documents_stub_and_adds_imports() {
    let request = AugmentRequest::single(
        "testArea",
        LinkTarget::method("Circle", "area", vec![]),
        FrameworkKind::Annotated,
    );
    let file = changed(Session::run_source(CIRCLE_STUB, &request).unwrap());

    assert_eq!(
        file.text,
        r#"package com.example;

import org.junit.Test;
import org.junit.Assert;
import static org.junit.Assert.fail;

public class CircleTest {

    /**
     * Test method for {@link Circle#area()}.
     * @throws Exception Error.
     */
    @Test
    public void testArea() throws Exception {
        fail("Not yet implemented");
    }
}
"#
    );
    assert_eq!(file.changed, vec!["testArea".to_string()]);
    assert_eq!(file.navigation.name, "testArea");
    let position = file.navigation.position.unwrap();
    assert_eq!(position.line, line_of(&file.text, "void testArea"));
    assert_eq!(position.column, 16);
}

#[test]
fn grouping_framework_replaces_marker_ahead_of_visibility() {
    let source = r#"package com.example;

import org.testng.annotations.Test;

public class CircleTest {
    @Test
    public void testArea() {
    }
}
"#;
    let request = AugmentRequest::single(
        "testArea",
        LinkTarget::method("com.example.Circle", "area", vec![]),
        FrameworkKind::AnnotatedWithGrouping,
    );
    let file = changed(Session::run_source(source, &request).unwrap());

    assert_eq!(
        file.text,
        r#"package com.example;

import org.testng.annotations.Test;
import org.testng.Assert;
import static org.testng.Assert.fail;

public class CircleTest {
    /**
     * Test method for {@link com.example.Circle#area()}.
     * @throws Exception Error.
     */
    @Test(groups = "Standard")
    public void testArea() throws Exception {
    }
}
"#
    );
}

#[test]
fn grouping_framework_drops_every_annotation() {
    let source = r#"class CircleTest {
    @Deprecated
    @Test(timeOut = 100)
    public static void testArea() {
    }
}
"#;
    let request =
        AugmentRequest::single("testArea", LinkTarget::class("Circle"), FrameworkKind::AnnotatedWithGrouping);
    let file = changed(Session::run_source(source, &request).unwrap());

    assert!(file
        .text
        .contains("    @Test(groups = \"Standard\")\n    public static void testArea() throws Exception {"));
    assert!(!file.text.contains("@Deprecated"));
    assert!(!file.text.contains("timeOut"));
}

const SHAPE_STUBS: &str = r#"package com.example;

import junit.framework.TestCase;

public class ShapeTest extends TestCase {

    public void testAlpha() throws Exception {
    }

    public void testBeta() {
    }

    public void testGamma() {
    }
}
"#;

#[test]
fn batch_augments_fresh_stubs_and_navigates_to_last() {
    let request = AugmentRequest::batch("test", "com.example.Shape", FrameworkKind::Basic);
    let file = changed(Session::run_source(SHAPE_STUBS, &request).unwrap());

    assert_eq!(file.changed, vec!["testBeta".to_string(), "testGamma".to_string()]);
    assert_eq!(file.navigation.name, "testGamma");
    assert_eq!(
        file.navigation.position.map(|p| p.line),
        Some(line_of(&file.text, "void testGamma"))
    );

    assert_eq!(
        file.text,
        r#"package com.example;

import junit.framework.TestCase;

public class ShapeTest extends TestCase {

    public void testAlpha() throws Exception {
    }

    /**
     * Test method for {@link com.example.Shape}.
     * @throws Exception Error.
     */
    public void testBeta() throws Exception {
    }

    /**
     * Test method for {@link com.example.Shape}.
     * @throws Exception Error.
     */
    public void testGamma() throws Exception {
    }
}
"#
    );
}

#[test]
fn batch_with_nothing_to_do_reports_no_changes() {
    let request = AugmentRequest::batch("check", "com.example.Shape", FrameworkKind::Basic);
    assert_eq!(Session::run_source(SHAPE_STUBS, &request).unwrap(), EditResult::NoChanges);
}

#[test]
fn second_run_is_a_no_op() {
    for framework in FrameworkKind::ALL {
        let request =
            AugmentRequest::single("testArea", LinkTarget::method("Circle", "area", vec![]), framework);
        let first = changed(Session::run_source(CIRCLE_STUB, &request).unwrap());
        let second = Session::run_source(&first.text, &request).unwrap();
        assert_eq!(second, EditResult::NoChanges, "framework {}", framework);
    }
}

#[test]
fn existing_documentation_is_replaced_wholesale() {
    let source = r#"class CircleTest {
    /**
     * Generated stub.
     *
     * @see Circle
     */
    public void testArea() {
    }
}
"#;
    let request = AugmentRequest::single(
        "testArea",
        LinkTarget::method("Circle", "scale", vec!["double".into(), "List<String>".into()]),
        FrameworkKind::Basic,
    );
    let file = changed(Session::run_source(source, &request).unwrap());
    assert_eq!(
        file.text,
        r#"class CircleTest {
    /**
     * Test method for {@link Circle#scale(double, List)}.
     * @throws Exception Error.
     */
    public void testArea() throws Exception {
    }
}
"#
    );
}

#[test]
fn diverged_original_is_rejected() {
    let mut tree = SourceTree::parse(CIRCLE_STUB).unwrap();
    let edited = CIRCLE_STUB.replace("fail(", "org.junit.Assert.fail(");
    let request =
        AugmentRequest::single("testArea", LinkTarget::class("Circle"), FrameworkKind::Annotated);

    let err = Session::run(&edited, &mut tree, &request).unwrap_err();
    assert!(matches!(err, StubError::DiffApplication { .. }));
}

#[test]
fn missing_declaration_is_reported() {
    let request =
        AugmentRequest::single("testVolume", LinkTarget::class("Circle"), FrameworkKind::Annotated);
    let err = Session::run_source(CIRCLE_STUB, &request).unwrap_err();
    assert!(matches!(err, StubError::DeclarationNotFound { ref name } if name == "testVolume"));
    assert_eq!(err.code(), "E2001");
}

#[test]
fn unknown_framework_is_fatal() {
    let selection = TargetSelection::Single {
        method: "testArea".into(),
        link: LinkTarget::class("Circle"),
    };
    let err = AugmentRequest::from_identifier(selection, "junit5").unwrap_err();
    assert!(matches!(err, StubError::UnsupportedFramework { ref identifier } if identifier == "junit5"));
}

#[test]
fn imports_already_present_are_not_duplicated() {
    let source = r#"import static org.junit.Assert.fail;
import org.junit.*;
import org.junit.Test;

class CircleTest {
    @Test
    public void testArea() {
    }
}
"#;
    let request =
        AugmentRequest::single("testArea", LinkTarget::class("Circle"), FrameworkKind::Annotated);
    let file = changed(Session::run_source(source, &request).unwrap());
    assert!(file.text.starts_with(
        "import static org.junit.Assert.fail;\nimport org.junit.*;\nimport org.junit.Test;\nimport org.junit.Assert;\n\nclass"
    ));
}

#[test]
fn documentation_behind_line_comment_is_replaced() {
    let source = r#"class CircleTest {
    /** Old. */
    // note
    public void testArea() {
    }
}
"#;
    let request =
        AugmentRequest::single("testArea", LinkTarget::class("Circle"), FrameworkKind::Basic);
    let file = changed(Session::run_source(source, &request).unwrap());
    assert_eq!(
        file.text,
        r#"import junit.framework.TestCase;

class CircleTest {
    /**
     * Test method for {@link Circle}.
     * @throws Exception Error.
     */
    // note
    public void testArea() throws Exception {
    }
}
"#
    );
}

#[test]
fn documentation_between_modifiers_moves_in_front() {
    let source = r#"class CircleTest {
    @Test
    /** Old. */
    public void testArea() {
    }
}
"#;
    let request =
        AugmentRequest::single("testArea", LinkTarget::class("Circle"), FrameworkKind::Basic);
    let file = changed(Session::run_source(source, &request).unwrap());
    assert_eq!(
        file.text,
        r#"import junit.framework.TestCase;

class CircleTest {
    /**
     * Test method for {@link Circle}.
     * @throws Exception Error.
     */
    @Test
    public void testArea() throws Exception {
    }
}
"#
    );

    let request = AugmentRequest::single(
        "testArea",
        LinkTarget::class("Circle"),
        FrameworkKind::AnnotatedWithGrouping,
    );
    let file = changed(Session::run_source(source, &request).unwrap());
    assert_eq!(file.text.matches("/**").count(), 1);
    assert!(!file.text.contains("Old."));
    assert!(file.text.contains(concat!(
        "     */\n",
        "    @Test(groups = \"Standard\")\n",
        "    public void testArea() throws Exception {"
    )));
}

#[test]
fn comments_between_modifiers_survive_grouping_rewrite() {
    let source = r#"class CircleTest {
    @Test // flaky
    public void testArea() {
    }
}
"#;
    let request = AugmentRequest::single(
        "testArea",
        LinkTarget::class("Circle"),
        FrameworkKind::AnnotatedWithGrouping,
    );
    let file = changed(Session::run_source(source, &request).unwrap());
    assert!(file.text.contains(concat!(
        "    @Test(groups = \"Standard\")\n",
        "    // flaky\n",
        "    public void testArea() throws Exception {"
    )));
}

#[test]
fn crlf_files_keep_their_line_endings() {
    let source = CIRCLE_STUB.replace('\n', "\r\n");
    for framework in FrameworkKind::ALL {
        let request =
            AugmentRequest::single("testArea", LinkTarget::method("Circle", "area", vec![]), framework);
        let file = changed(Session::run_source(&source, &request).unwrap());

        assert!(
            !file.text.replace("\r\n", "").contains('\n'),
            "bare line feed written for {}:\n{:?}",
            framework,
            file.text
        );
        assert!(file.text.contains("     * Test method for {@link Circle#area()}.\r\n"));
        let second = Session::run_source(&file.text, &request).unwrap();
        assert_eq!(second, EditResult::NoChanges, "framework {}", framework);
    }
}
