// Export all route modules
pub mod companies;
pub mod news;
pub mod stats;

use crate::error::AppError;

pub(crate) const DEFAULT_LIMIT: i64 = 50;
pub(crate) const MAX_LIMIT: i64 = 500;
pub(crate) const DEFAULT_SINCE_DAYS: i64 = 90;
// Largest accepted recency window, roughly a century; anything bigger is a
// typo, and unbounded values overflow chrono's timestamp arithmetic
pub(crate) const MAX_SINCE_DAYS: i64 = 36_500;

// Out-of-range limits are rejected, never clamped
pub(crate) fn validate_limit(limit: Option<i64>) -> Result<u64, AppError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::InvalidFilter(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(limit as u64)
}

// Same policy for the recency window: reject, never clamp
pub(crate) fn validate_since_days(since_days: Option<i64>) -> Result<i64, AppError> {
    let since_days = since_days.unwrap_or(DEFAULT_SINCE_DAYS);
    if !(0..=MAX_SINCE_DAYS).contains(&since_days) {
        return Err(AppError::InvalidFilter(format!(
            "since_days must be between 0 and {}, got {}",
            MAX_SINCE_DAYS, since_days
        )));
    }
    Ok(since_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(validate_limit(None).unwrap(), 50);
        assert_eq!(validate_limit(Some(1)).unwrap(), 1);
        assert_eq!(validate_limit(Some(500)).unwrap(), 500);
        assert!(validate_limit(Some(0)).is_err());
        assert!(validate_limit(Some(-1)).is_err());
        assert!(validate_limit(Some(501)).is_err());
    }

    #[test]
    fn since_days_defaults_and_bounds() {
        assert_eq!(validate_since_days(None).unwrap(), 90);
        assert_eq!(validate_since_days(Some(0)).unwrap(), 0);
        assert_eq!(validate_since_days(Some(MAX_SINCE_DAYS)).unwrap(), MAX_SINCE_DAYS);
        assert!(validate_since_days(Some(-1)).is_err());
        assert!(validate_since_days(Some(MAX_SINCE_DAYS + 1)).is_err());
        assert!(validate_since_days(Some(i64::MAX)).is_err());
    }
}
