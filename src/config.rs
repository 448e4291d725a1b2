//! Constructor configuration.

use crate::consts::FLOAT16_AVAILABLE;

/// How out-of-range values are handled when a scalar is coerced to a
/// narrower or different numeric dtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CastPolicy {
    /// Host `as` cast semantics: integer targets keep the low bits, float
    /// sources truncate toward zero and saturate at the target bounds, NaN
    /// becomes zero.
    #[default]
    Truncate,
    /// Reject any value the target cannot represent after truncation toward
    /// zero, and any non-finite result.
    Checked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConstructorConfig {
    pub cast_policy: CastPolicy,
    /// Allow `F16` as a coercion target. Cannot enable float16 on a build
    /// without it; see [`ConstructorConfig::float16_enabled`].
    pub float16: bool,
}

impl Default for ConstructorConfig {
    fn default() -> Self {
        Self {
            cast_policy: CastPolicy::Truncate,
            float16: FLOAT16_AVAILABLE,
        }
    }
}

impl ConstructorConfig {
    pub fn with_cast_policy(mut self, cast_policy: CastPolicy) -> Self {
        self.cast_policy = cast_policy;
        self
    }

    pub fn with_float16(mut self, float16: bool) -> Self {
        self.float16 = float16;
        self
    }

    /// Effective float16 capability: requested and present in this build.
    pub const fn float16_enabled(&self) -> bool {
        self.float16 && FLOAT16_AVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_truncating() {
        let config = ConstructorConfig::default();
        assert_eq!(config.cast_policy, CastPolicy::Truncate);
        assert_eq!(config.float16_enabled(), FLOAT16_AVAILABLE);
    }

    #[test]
    fn float16_cannot_exceed_build_capability() {
        let config = ConstructorConfig::default().with_float16(true);
        assert_eq!(config.float16_enabled(), FLOAT16_AVAILABLE);
        assert!(!config.with_float16(false).float16_enabled());
    }
}
