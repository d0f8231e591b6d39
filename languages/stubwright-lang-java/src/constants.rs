//! Fixed Java fragments emitted into augmented test methods

/// Exception type every augmented test method declares
pub const BROAD_EXCEPTION: &str = "Exception";

/// Description attached to the `@throws` documentation tag
pub const THROWS_DESCRIPTION: &str = "Error.";

/// Name of the javadoc tag documenting thrown exceptions
pub const TAG_THROWS: &str = "@throws";

/// Opening sentence of the generated method description
pub const DESCRIPTION_PREFIX: &str = "Test method for ";

/// Simple name of the test marker annotation
pub const TEST_MARKER: &str = "Test";

/// Member assigned in the grouping annotation
pub const GROUPING_KEY: &str = "groups";

/// Group every generated grouping-framework test is placed in
pub const GROUPING_VALUE: &str = "Standard";
