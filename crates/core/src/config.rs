//! Named configuration choices for the particle field.
//!
//! Two revisions of the page shipped different edge behavior (wrap vs.
//! bounce) and different link falloffs (tight vs. loose). Both are kept as
//! named presets; the defaults match the most recent revision (wrap + tight).

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::Rgba;
use crate::error::BackdropError;
use crate::params::{param_f64, param_range, param_string, param_u64};

/// Viewports narrower than this many pixels use the coarse divisor.
pub const DEFAULT_BREAKPOINT: u32 = 768;
/// Pixels of area per particle on narrow viewports.
pub const DEFAULT_NARROW_DIVISOR: u64 = 20_000;
/// Pixels of area per particle on wide viewports.
pub const DEFAULT_WIDE_DIVISOR: u64 = 12_000;

const NARROW_DIVISOR: NonZeroU64 = match NonZeroU64::new(DEFAULT_NARROW_DIVISOR) {
    Some(d) => d,
    None => panic!("narrow divisor must be non-zero"),
};
const WIDE_DIVISOR: NonZeroU64 = match NonZeroU64::new(DEFAULT_WIDE_DIVISOR) {
    Some(d) => d,
    None => panic!("wide divisor must be non-zero"),
};

const DEFAULT_RADIUS: [f64; 2] = [0.5, 2.5];
const DEFAULT_SPEED: [f64; 2] = [-0.25, 0.25];
const DEFAULT_PARTICLE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.15);
const DEFAULT_LINE_WIDTH: f64 = 0.5;

/// What happens when a particle leaves the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Reappear on the opposite edge.
    #[default]
    Wrap,
    /// Reflect the velocity component; position is not clamped.
    Bounce,
}

impl EdgePolicy {
    pub const ALL: [EdgePolicy; 2] = [EdgePolicy::Wrap, EdgePolicy::Bounce];

    pub fn name(self) -> &'static str {
        match self {
            EdgePolicy::Wrap => "wrap",
            EdgePolicy::Bounce => "bounce",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, BackdropError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| BackdropError::UnknownPreset(format!("edge policy '{name}'")))
    }
}

/// Proximity-line parameters.
///
/// A pair closer than `threshold` is joined by a line whose opacity is
/// `max_opacity - distance / falloff`, clamped to `[0, max_opacity]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkStyle {
    pub threshold: f64,
    pub max_opacity: f64,
    pub falloff: f64,
    pub line_width: f64,
    pub color: Rgba,
}

impl LinkStyle {
    pub const PRESETS: [&'static str; 2] = ["tight", "loose"];

    /// 120 px reach, steep falloff (`0.05 - d / 2400`).
    pub const fn tight() -> Self {
        Self {
            threshold: 120.0,
            max_opacity: 0.05,
            falloff: 2400.0,
            line_width: DEFAULT_LINE_WIDTH,
            color: Rgba::WHITE,
        }
    }

    /// 150 px reach, shallower falloff (`0.1 - d / 1500`).
    pub const fn loose() -> Self {
        Self {
            threshold: 150.0,
            max_opacity: 0.1,
            falloff: 1500.0,
            line_width: DEFAULT_LINE_WIDTH,
            color: Rgba::WHITE,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, BackdropError> {
        match name {
            "tight" => Ok(Self::tight()),
            "loose" => Ok(Self::loose()),
            _ => Err(BackdropError::UnknownPreset(format!("link style '{name}'"))),
        }
    }

    /// Stroke opacity for a pair at `distance`, or `None` when out of reach.
    ///
    /// Never negative, never above `max_opacity`, even for an unvalidated
    /// style.
    pub fn opacity_at(&self, distance: f64) -> Option<f64> {
        if distance < self.threshold {
            let linear = self.max_opacity - distance / self.falloff;
            Some(linear.min(self.max_opacity).max(0.0))
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), BackdropError> {
        if !(self.threshold > 0.0) {
            return Err(BackdropError::InvalidLinkStyle(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !(self.falloff > 0.0) {
            return Err(BackdropError::InvalidLinkStyle(format!(
                "falloff must be positive, got {}",
                self.falloff
            )));
        }
        if !(0.0..=1.0).contains(&self.max_opacity) {
            return Err(BackdropError::InvalidLinkStyle(format!(
                "max opacity must be in [0, 1], got {}",
                self.max_opacity
            )));
        }
        if !(self.line_width > 0.0) {
            return Err(BackdropError::InvalidLinkStyle(format!(
                "line width must be positive, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self::tight()
    }
}

/// Viewport-width threshold rule selecting the density divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityPolicy {
    pub breakpoint: u32,
    pub narrow_divisor: NonZeroU64,
    pub wide_divisor: NonZeroU64,
}

impl DensityPolicy {
    pub fn new(breakpoint: u32, narrow_divisor: u64, wide_divisor: u64) -> Result<Self, BackdropError> {
        Ok(Self {
            breakpoint,
            narrow_divisor: NonZeroU64::new(narrow_divisor)
                .ok_or(BackdropError::InvalidDivisor(narrow_divisor))?,
            wide_divisor: NonZeroU64::new(wide_divisor)
                .ok_or(BackdropError::InvalidDivisor(wide_divisor))?,
        })
    }

    /// Narrow viewports get the larger divisor, i.e. fewer particles.
    pub fn divisor_for(&self, viewport_width: u32) -> NonZeroU64 {
        if viewport_width < self.breakpoint {
            self.narrow_divisor
        } else {
            self.wide_divisor
        }
    }
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_BREAKPOINT,
            narrow_divisor: NARROW_DIVISOR,
            wide_divisor: WIDE_DIVISOR,
        }
    }
}

/// Sampling ranges and fill color for newly constructed particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleStyle {
    /// `[min, max)` radius.
    pub radius: [f64; 2],
    /// `[min, max)` for each velocity component.
    pub speed: [f64; 2],
    pub color: Rgba,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            speed: DEFAULT_SPEED,
            color: DEFAULT_PARTICLE_COLOR,
        }
    }
}

impl ParticleStyle {
    pub fn validate(&self) -> Result<(), BackdropError> {
        for (name, [min, max]) in [("radius", self.radius), ("speed", self.speed)] {
            if !(min <= max) {
                return Err(BackdropError::InvalidRange {
                    name: name.to_owned(),
                    min,
                    max,
                });
            }
        }
        if self.radius[0] < 0.0 {
            return Err(BackdropError::InvalidRange {
                name: "radius".to_owned(),
                min: self.radius[0],
                max: self.radius[1],
            });
        }
        Ok(())
    }
}

/// Everything the field and the loop need besides the surface itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub style: ParticleStyle,
    pub edge_policy: EdgePolicy,
    pub link_style: LinkStyle,
    pub density: DensityPolicy,
}

impl FieldConfig {
    /// Builds a config from a flat JSON params object.
    ///
    /// `link_style` picks a preset; `link_threshold`, `link_max_opacity`,
    /// `link_falloff` and `line_width` then override individual fields.
    /// Unknown preset names and invalid values are errors; missing keys are not.
    pub fn from_json(params: &Value) -> Result<Self, BackdropError> {
        let defaults = Self::default();

        let edge_policy = EdgePolicy::from_name(&param_string(
            params,
            "edge_policy",
            defaults.edge_policy.name(),
        ))?;

        let preset = LinkStyle::from_name(&param_string(params, "link_style", "tight"))?;
        let link_style = LinkStyle {
            threshold: param_f64(params, "link_threshold", preset.threshold),
            max_opacity: param_f64(params, "link_max_opacity", preset.max_opacity),
            falloff: param_f64(params, "link_falloff", preset.falloff),
            line_width: param_f64(params, "line_width", preset.line_width),
            color: preset.color,
        };

        let (r0, r1) = param_range(params, "radius", (DEFAULT_RADIUS[0], DEFAULT_RADIUS[1]));
        let (s0, s1) = param_range(params, "speed", (DEFAULT_SPEED[0], DEFAULT_SPEED[1]));
        let color = match params.get("color").and_then(Value::as_str) {
            Some(css) => Rgba::from_css(css)?,
            None => DEFAULT_PARTICLE_COLOR,
        };

        let density = DensityPolicy::new(
            u32::try_from(param_u64(params, "breakpoint", DEFAULT_BREAKPOINT.into()))
                .unwrap_or(u32::MAX),
            param_u64(params, "narrow_divisor", DEFAULT_NARROW_DIVISOR),
            param_u64(params, "wide_divisor", DEFAULT_WIDE_DIVISOR),
        )?;

        let config = Self {
            style: ParticleStyle {
                radius: [r0, r1],
                speed: [s0, s1],
                color,
            },
            edge_policy,
            link_style,
            density,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BackdropError> {
        self.style.validate()?;
        self.link_style.validate()
    }

    /// Current values in the same flat shape [`FieldConfig::from_json`] reads.
    pub fn params(&self) -> Value {
        json!({
            "edge_policy": self.edge_policy.name(),
            "link_threshold": self.link_style.threshold,
            "link_max_opacity": self.link_style.max_opacity,
            "link_falloff": self.link_style.falloff,
            "line_width": self.link_style.line_width,
            "radius": self.style.radius,
            "speed": self.style.speed,
            "color": self.style.color.to_css(),
            "breakpoint": self.density.breakpoint,
            "narrow_divisor": self.density.narrow_divisor.get(),
            "wide_divisor": self.density.wide_divisor.get(),
        })
    }

    /// Schema of every accepted key: type, default, and range where one applies.
    pub fn param_schema() -> Value {
        json!({
            "edge_policy": {
                "type": "string",
                "default": "wrap",
                "options": ["wrap", "bounce"],
                "description": "Wrap to the opposite edge, or reflect velocity at the edge"
            },
            "link_style": {
                "type": "string",
                "default": "tight",
                "options": LinkStyle::PRESETS,
                "description": "Preset for link reach and opacity falloff"
            },
            "link_threshold": {
                "type": "number",
                "default": LinkStyle::tight().threshold,
                "min": 0.0,
                "description": "Maximum distance at which two particles are linked"
            },
            "link_max_opacity": {
                "type": "number",
                "default": LinkStyle::tight().max_opacity,
                "min": 0.0,
                "max": 1.0,
                "description": "Link opacity at zero distance"
            },
            "link_falloff": {
                "type": "number",
                "default": LinkStyle::tight().falloff,
                "min": 0.0,
                "description": "Distance per unit of opacity lost"
            },
            "line_width": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.0,
                "description": "Link stroke width in pixels"
            },
            "radius": {
                "type": "range",
                "default": DEFAULT_RADIUS,
                "description": "Particle radius sampled uniformly from [min, max)"
            },
            "speed": {
                "type": "range",
                "default": DEFAULT_SPEED,
                "description": "Per-axis velocity sampled uniformly from [min, max)"
            },
            "color": {
                "type": "color",
                "default": DEFAULT_PARTICLE_COLOR.to_css(),
                "description": "Particle fill color"
            },
            "breakpoint": {
                "type": "integer",
                "default": DEFAULT_BREAKPOINT,
                "description": "Viewports narrower than this use narrow_divisor"
            },
            "narrow_divisor": {
                "type": "integer",
                "default": DEFAULT_NARROW_DIVISOR,
                "min": 1,
                "description": "Pixels of area per particle on narrow viewports"
            },
            "wide_divisor": {
                "type": "integer",
                "default": DEFAULT_WIDE_DIVISOR,
                "min": 1,
                "description": "Pixels of area per particle on wide viewports"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn edge_policy_names_round_trip() {
        for policy in EdgePolicy::ALL {
            assert_eq!(EdgePolicy::from_name(policy.name()).unwrap(), policy);
        }
        assert!(matches!(
            EdgePolicy::from_name("teleport"),
            Err(BackdropError::UnknownPreset(_))
        ));
    }

    #[test]
    fn tight_opacity_at_100_px() {
        let o = LinkStyle::tight().opacity_at(100.0).unwrap();
        assert!((o - (0.05 - 100.0 / 2400.0)).abs() < EPS, "got {o}");
        assert!((o - 0.0083).abs() < 1e-4);
    }

    #[test]
    fn loose_opacity_at_100_px() {
        let o = LinkStyle::loose().opacity_at(100.0).unwrap();
        assert!((o - (0.1 - 100.0 / 1500.0)).abs() < EPS, "got {o}");
        assert!((o - 0.0333).abs() < 1e-4);
    }

    #[test]
    fn opacity_at_zero_distance_is_max() {
        assert_eq!(LinkStyle::tight().opacity_at(0.0), Some(0.05));
        assert_eq!(LinkStyle::loose().opacity_at(0.0), Some(0.1));
    }

    #[test]
    fn opacity_at_threshold_is_out_of_reach() {
        assert_eq!(LinkStyle::tight().opacity_at(120.0), None);
        assert_eq!(LinkStyle::loose().opacity_at(150.0), None);
    }

    #[test]
    fn opacity_just_below_threshold_is_not_negative() {
        for style in [LinkStyle::tight(), LinkStyle::loose()] {
            let d = style.threshold - f64::EPSILON * style.threshold;
            let o = style.opacity_at(d).unwrap();
            assert!(o >= 0.0, "negative opacity {o} at {d}");
        }
    }

    #[test]
    fn opacity_clamps_for_mismatched_falloff() {
        // falloff too small for the threshold: formula goes negative well inside reach
        let style = LinkStyle {
            falloff: 100.0,
            ..LinkStyle::tight()
        };
        assert_eq!(style.opacity_at(110.0), Some(0.0));
    }

    #[test]
    fn density_policy_switches_at_breakpoint() {
        let policy = DensityPolicy::default();
        assert_eq!(policy.divisor_for(767).get(), 20_000);
        assert_eq!(policy.divisor_for(768).get(), 12_000);
        assert_eq!(policy.divisor_for(1920).get(), 12_000);
    }

    #[test]
    fn density_policy_rejects_zero_divisor() {
        assert!(matches!(
            DensityPolicy::new(768, 0, 12_000),
            Err(BackdropError::InvalidDivisor(0))
        ));
        assert!(DensityPolicy::new(768, 1, 1).is_ok());
    }

    #[test]
    fn from_empty_json_is_default() {
        let config = FieldConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, FieldConfig::default());
    }

    #[test]
    fn from_json_applies_presets_and_overrides() {
        let config = FieldConfig::from_json(&json!({
            "edge_policy": "bounce",
            "link_style": "loose",
            "line_width": 1.0,
            "radius": [1.0, 1.0],
            "color": "rgba(200, 220, 255, 0.3)",
            "wide_divisor": 9000
        }))
        .unwrap();
        assert_eq!(config.edge_policy, EdgePolicy::Bounce);
        assert_eq!(config.link_style.threshold, 150.0);
        assert_eq!(config.link_style.line_width, 1.0);
        assert_eq!(config.style.radius, [1.0, 1.0]);
        assert_eq!(config.style.color, Rgba::new(200, 220, 255, 0.3));
        assert_eq!(config.density.wide_divisor.get(), 9000);
        assert_eq!(config.density.narrow_divisor.get(), DEFAULT_NARROW_DIVISOR);
    }

    #[test]
    fn from_json_rejects_invalid_values() {
        assert!(matches!(
            FieldConfig::from_json(&json!({"link_style": "medium"})),
            Err(BackdropError::UnknownPreset(_))
        ));
        assert!(matches!(
            FieldConfig::from_json(&json!({"narrow_divisor": 0})),
            Err(BackdropError::InvalidDivisor(0))
        ));
        assert!(matches!(
            FieldConfig::from_json(&json!({"radius": [3.0, 1.0]})),
            Err(BackdropError::InvalidRange { .. })
        ));
        assert!(matches!(
            FieldConfig::from_json(&json!({"link_threshold": 0.0})),
            Err(BackdropError::InvalidLinkStyle(_))
        ));
        assert!(matches!(
            FieldConfig::from_json(&json!({"color": "blue"})),
            Err(BackdropError::InvalidColor(_))
        ));
    }

    #[test]
    fn params_round_trip_through_from_json() {
        let original = FieldConfig {
            edge_policy: EdgePolicy::Bounce,
            link_style: LinkStyle::loose(),
            ..FieldConfig::default()
        };
        let restored = FieldConfig::from_json(&original.params()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn schema_covers_every_param_key() {
        let schema = FieldConfig::param_schema();
        let params = FieldConfig::default().params();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing '{key}'");
        }
        assert!(schema.get("link_style").is_some());
    }

    #[test]
    fn serde_round_trip() {
        let config = FieldConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: FieldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
