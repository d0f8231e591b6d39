//! Head insertion for append-only ordered sequences

/// An ordered sequence that can only be read, overwritten in place, or
/// extended at the end.
pub trait AppendOnlyList<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the element at `index`, returning the value it held.
    ///
    /// `index` must be `< len()`.
    fn set(&mut self, index: usize, value: T) -> T;

    fn push(&mut self, value: T);
}

impl<T> AppendOnlyList<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn set(&mut self, index: usize, value: T) -> T {
        std::mem::replace(&mut self[index], value)
    }

    fn push(&mut self, value: T) {
        Vec::push(self, value)
    }
}

/// Insert `first` at index 0 by rotating every element one slot right.
///
/// Each original element is moved exactly once and keeps its relative order;
/// the former last element is re-appended at index `n`.
///
/// ```
/// use stubwright_lang_java::list::insert_first;
///
/// let mut list = vec!["public", "void"];
/// insert_first(&mut list, "@Test");
/// assert_eq!(list, vec!["@Test", "public", "void"]);
/// ```
pub fn insert_first<T, L>(list: &mut L, first: T)
where
    L: AppendOnlyList<T> + ?Sized,
{
    let original_len = list.len();
    if original_len == 0 {
        list.push(first);
        return;
    }

    let mut carried = first;
    for idx in 0..original_len {
        carried = list.set(idx, carried);
    }
    list.push(carried);
}
