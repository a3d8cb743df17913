use crate::error::{PhysicsError, PhysicsResult};
use crate::math::Vec3;
use crate::solver::ResolverConfig;

/// Gravity used by [`WorldConfig::default`]
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

/// Configuration for the physics world
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Gravity vector
    pub gravity: Vec3,
    /// Contact resolver configuration
    pub resolver: ResolverConfig,
    /// Passes over the joint constraints per step
    pub constraint_iterations: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            resolver: ResolverConfig::default(),
            constraint_iterations: 4,
        }
    }
}

impl WorldConfig {
    /// Returns the config with `gravity` replaced
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Returns the config with the resolver settings replaced
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Checks that every value is usable by the step loop
    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        self.resolver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WorldConfig::default();
        assert_eq!(config.gravity, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(config.constraint_iterations, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_gravity() {
        let config = WorldConfig::default().with_gravity(Vec3::new(0.0, f32::NAN, 0.0));
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_resolver() {
        let config = WorldConfig::default().with_resolver(ResolverConfig {
            slop: -1.0,
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }
}
