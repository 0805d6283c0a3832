use crate::dispatch::candidate::Candidate;
use lx_core::types::TypeOracle;
use std::cmp::Ordering;

/// Better-first comparison of two applicable candidates.
///
/// Returns `Equal` when nothing separates them; the caller then keeps the one
/// found first.
pub(crate) fn compare(oracle: &dyn TypeOracle, a: &Candidate, b: &Candidate) -> Ordering {
    a.extension
        .cmp(&b.extension)
        .then(a.expanded.cmp(&b.expanded))
        .then_with(|| specificity(oracle, a, b))
        .then(a.defaults.cmp(&b.defaults))
        .then_with(|| a.conversions().cmp(&b.conversions()))
}

/// First parameter position where one type converts to the other but not back.
fn specificity(oracle: &dyn TypeOracle, a: &Candidate, b: &Candidate) -> Ordering {
    for (left, right) in a.params.iter().zip(&b.params) {
        if left == right {
            continue;
        }
        let to_right = oracle.is_implicitly_convertible(left, right);
        let to_left = oracle.is_implicitly_convertible(right, left);
        match (to_right, to_left) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// The best candidate; ties go to the earliest.
pub(crate) fn select(oracle: &dyn TypeOracle, candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut iter = candidates.into_iter();
    let mut best = iter.next()?;
    for candidate in iter {
        if compare(oracle, &candidate, &best) == Ordering::Less {
            best = candidate;
        }
    }
    Some(best)
}
