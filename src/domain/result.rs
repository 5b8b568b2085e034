//! Result type alias for Hattori
//!
//! This module provides a convenient Result type alias that uses HattoriError
//! as the error type.

use super::errors::HattoriError;

/// Result type alias for Hattori operations
///
/// # Examples
///
/// ```
/// use hattori::domain::result::Result;
/// use hattori::domain::errors::HattoriError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HattoriError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HattoriError>;
