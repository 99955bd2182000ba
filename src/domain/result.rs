//! Result type alias
//!
//! Convenience alias that uses [`InventoryError`] as the error type.

use super::errors::InventoryError;

/// Result type alias for inventory operations
///
/// # Examples
///
/// ```
/// use weekly_inventory::domain::result::Result;
/// use weekly_inventory::domain::errors::InventoryError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(InventoryError::Configuration("missing token".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, InventoryError>;
