//! Combinatorics.

/// Iterates over every unordered pair of distinct elements of a slice, in lexicographic order of
/// their indexes.
pub struct Pairs<'a, T> {
    items: &'a [T],
    first: usize,
    second: usize,
}
impl<'a, T> Pairs<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            first: 0,
            second: 1,
        }
    }
}

impl<'a, T> Iterator for Pairs<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.second >= self.items.len() {
            self.first += 1;
            self.second = self.first + 1;
            if self.second >= self.items.len() {
                return None;
            }
        }
        let pair = (&self.items[self.first], &self.items[self.second]);
        self.second += 1;
        Some(pair)
    }
}

/// Number of unordered pairs that can be drawn from `n` elements.
pub fn count_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Appends `item` unless an equal element is already present, preserving first-seen order.
pub fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
