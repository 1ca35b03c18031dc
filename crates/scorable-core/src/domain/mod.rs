//! Domain model: errors, cancellation, score ordering, traits, ids.

pub mod cancel;
pub mod errors;
pub mod ids;
pub mod order;
pub mod traits;

pub use self::cancel::{CancelSignal, CancelSource};
pub use self::errors::{BoxError, ScorableError};
pub use self::ids::{EvaluationId, Id, IdMarker};
pub use self::order::{Comparator, natural_order, reversed, total_order_f64};
pub use self::traits::{NormalizedTraits, Traits};
