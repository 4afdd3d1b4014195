use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::math::TOLERANCE;

/// How the midpoint of a candidate segment is tested against the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidpointTest {
    /// The midpoint must be free of any collider.
    #[default]
    Clear,
    /// The midpoint must touch geometry, i.e. the segment lies on a surface.
    Contact,
}

/// Process-wide tuning for spline generation.
///
/// One value is handed to each run and treated as immutable for its
/// duration; hosts typically load it from user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    /// Distance from a vertex to each open-space probe.
    pub point_test_offset: f64,
    /// Half-extent of each open-space probe box.
    pub point_test_radius: f64,
    /// Maximum horizontal turn between consecutive segments, in degrees.
    pub max_horizontal_angle: f64,
    /// Maximum vertical slope of a segment, in degrees.
    pub max_slope: f64,
    /// Minimum distance between distinct points.
    pub min_vertex_distance: f64,
    /// Upper bound on the number of mesh vertices scanned per surface.
    pub max_vertices: usize,
    /// Only colliders belonging to the surface itself block open-space probes.
    pub restrict_to_self_colliders: bool,
    /// Midpoint policy for candidate segments.
    pub midpoint_test: MidpointTest,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            point_test_offset: 0.1,
            point_test_radius: 0.05,
            max_horizontal_angle: 15.0,
            max_slope: 60.0,
            min_vertex_distance: 0.05,
            max_vertices: 65_536,
            restrict_to_self_colliders: true,
            midpoint_test: MidpointTest::Clear,
        }
    }
}

impl GenerationTuning {
    /// Parses tuning from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] if a value fails [`Self::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let tuning: Self = toml::from_str(source).map_err(ConfigError::from)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects negative or non-finite values. Zero is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("point_test_offset", self.point_test_offset),
            ("point_test_radius", self.point_test_radius),
            ("max_horizontal_angle", self.max_horizontal_angle),
            ("max_slope", self.max_slope),
            ("min_vertex_distance", self.min_vertex_distance),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { field, value }.into());
            }
        }
        Ok(())
    }

    /// Distance under which two positions are treated as the same point.
    #[must_use]
    pub fn identity_epsilon(&self) -> f64 {
        (self.min_vertex_distance * 0.1).max(TOLERANCE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GrindError;

    #[test]
    fn empty_toml_yields_defaults() {
        let tuning = GenerationTuning::from_toml_str("").unwrap();
        assert_eq!(tuning, GenerationTuning::default());
    }

    #[test]
    fn overrides_are_applied() {
        let tuning = GenerationTuning::from_toml_str(
            "max_slope = 30.0\nrestrict_to_self_colliders = false\nmidpoint_test = \"contact\"\n",
        )
        .unwrap();
        assert!((tuning.max_slope - 30.0).abs() < 1e-12);
        assert!(!tuning.restrict_to_self_colliders);
        assert_eq!(tuning.midpoint_test, MidpointTest::Contact);
        assert!((tuning.max_horizontal_angle - 15.0).abs() < 1e-12);
    }

    #[test]
    fn negative_values_are_rejected() {
        let err = GenerationTuning::from_toml_str("point_test_radius = -1.0").unwrap_err();
        assert!(matches!(
            err,
            GrindError::Config(ConfigError::Invalid { field: "point_test_radius", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GenerationTuning::from_toml_str("max_slope = [").unwrap_err();
        assert!(matches!(err, GrindError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn identity_epsilon_scales_with_min_distance() {
        let tuning = GenerationTuning::default();
        assert!((tuning.identity_epsilon() - 0.005).abs() < 1e-12);

        let zero = GenerationTuning {
            min_vertex_distance: 0.0,
            ..GenerationTuning::default()
        };
        assert!(zero.identity_epsilon() > 0.0);
    }
}
