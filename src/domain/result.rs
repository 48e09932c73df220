//! Result type alias for Wikigen
//!
//! This module provides a convenient Result type alias that uses WikigenError
//! as the error type.

use super::errors::WikigenError;

/// Result type alias for Wikigen operations
///
/// # Examples
///
/// ```
/// use wikigen::domain::result::Result;
/// use wikigen::domain::errors::WikigenError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(WikigenError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, WikigenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::WikigenError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(WikigenError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
