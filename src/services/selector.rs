use crate::random::RandomSource;

/// Picks one element uniformly at random.
///
/// Returns `None` only for an empty slice; the discovery flow branches on
/// emptiness before relying on a pick.
pub fn pick<'a, T>(items: &'a [T], random: &dyn RandomSource) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(random.below(items.len()))
}
