//! Listing filter expressions

use crate::domain::EpochBounds;

/// Build the `created` range filter for a window
///
/// An additional expression, when present, is conjoined with ` and `.
///
/// ```
/// use weekly_inventory::core::fetch::created_filter;
/// use weekly_inventory::domain::EpochBounds;
///
/// let bounds = EpochBounds { start_ms: 1, end_ms: 2 };
/// assert_eq!(created_filter(bounds, None), "created:[1 ... 2]");
/// assert_eq!(
///     created_filter(bounds, Some("state:RUNNING")),
///     "created:[1 ... 2] and state:RUNNING"
/// );
/// ```
pub fn created_filter(bounds: EpochBounds, extra: Option<&str>) -> String {
    let range = format!("created:[{} ... {}]", bounds.start_ms, bounds.end_ms);
    match extra {
        Some(expr) => format!("{range} and {expr}"),
        None => range,
    }
}
