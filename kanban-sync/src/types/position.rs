//! Contiguous zero-based ordering within a sibling set.
//!
//! Cards within a column and columns within a board carry an explicit index.
//! After any insertion, removal or reorder the indices are reassigned from the
//! sequence order so they stay `0..n` with no gaps or duplicates.

/// An element of an ordered sibling set
pub trait Positioned {
    fn position(&self) -> usize;
    fn set_position(&mut self, position: usize);
}

/// Reassign every element's position to its index in the slice.
///
/// Total over any slice, including an empty one. Nothing but the position
/// field is touched.
pub fn reindex<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index);
    }
}

/// Whether positions equal `0..n` in slice order
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index)
}
