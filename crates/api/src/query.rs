//! Shared query parameter types.

use serde::Deserialize;

/// `?limit=` for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    /// The requested limit, or `default` when absent, clamped to `1..=max`.
    pub fn resolve(&self, default: i64, max: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        assert_eq!(LimitParams::default().resolve(20, 100), 20);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(LimitParams { limit: Some(500) }.resolve(20, 100), 100);
        assert_eq!(LimitParams { limit: Some(0) }.resolve(20, 100), 1);
        assert_eq!(LimitParams { limit: Some(-3) }.resolve(20, 100), 1);
        assert_eq!(LimitParams { limit: Some(42) }.resolve(20, 100), 42);
    }
}
