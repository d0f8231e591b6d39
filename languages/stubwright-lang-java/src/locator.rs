//! Depth-first lookup of method declarations by name

use crate::tree::{Member, MethodDeclaration, SourceTree, TypeDeclaration};
use stubwright_foundation::{StubError, StubResult};

/// Find the first method named `name` in document order.
///
/// Types are searched top to bottom; within a type every member is visited in
/// order, and the types declared inside a method body are searched right after
/// the method itself. The search stops at the first match.
pub fn find_method<'a>(tree: &'a mut SourceTree, name: &str) -> Option<&'a mut MethodDeclaration> {
    tree.types_mut()
        .iter_mut()
        .find_map(|ty| find_in_type(ty, name))
}

/// Like [`find_method`], reporting absence as an error
pub fn locate_method<'a>(
    tree: &'a mut SourceTree,
    name: &str,
) -> StubResult<&'a mut MethodDeclaration> {
    find_method(tree, name).ok_or_else(|| StubError::declaration_not_found(name))
}

fn find_in_type<'a>(ty: &'a mut TypeDeclaration, name: &str) -> Option<&'a mut MethodDeclaration> {
    ty.members_mut().iter_mut().find_map(|member| match member {
        Member::Method(method) => find_in_method(method, name),
        Member::Type(nested) => find_in_type(nested, name),
    })
}

fn find_in_method<'a>(
    method: &'a mut MethodDeclaration,
    name: &str,
) -> Option<&'a mut MethodDeclaration> {
    if method.name() == name {
        return Some(method);
    }
    method
        .local_types
        .iter_mut()
        .find_map(|ty| find_in_type(ty, name))
}
