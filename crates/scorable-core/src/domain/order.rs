//! Comparators over scores.
//!
//! Scores carry no intrinsic ordering; the caller supplies one. "Greater" means
//! "better" everywhere a comparator is consulted.

use std::cmp::Ordering;
use std::sync::Arc;

pub type Comparator<S> = Arc<dyn Fn(&S, &S) -> Ordering + Send + Sync>;

/// `PartialOrd` ordering. A value that is not comparable with itself (NaN)
/// ranks below every comparable value; two such values compare as equal.
pub fn natural_order<S: PartialOrd + 'static>() -> Comparator<S> {
    Arc::new(|a: &S, b: &S| {
        a.partial_cmp(b).unwrap_or_else(|| {
            let a_ordered = a.partial_cmp(a).is_some();
            let b_ordered = b.partial_cmp(b).is_some();
            a_ordered.cmp(&b_ordered)
        })
    })
}

/// IEEE 754 total order on `f64`.
pub fn total_order_f64() -> Comparator<f64> {
    Arc::new(|a: &f64, b: &f64| a.total_cmp(b))
}

/// Flip a comparator, for scores where lower is better (distances, costs).
pub fn reversed<S: 'static>(comparator: Comparator<S>) -> Comparator<S> {
    Arc::new(move |a: &S, b: &S| comparator(b, a))
}
