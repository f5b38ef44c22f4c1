use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::device::OrbitParams;

use super::CommandError;

#[derive(Debug, Clone, Copy)]
pub struct OrbitPreset {
    pub name: &'static str,
    pub params: OrbitParams,
}

pub static PRESETS: [OrbitPreset; 3] = [
    OrbitPreset {
        name: "iss",
        params: OrbitParams {
            altitude_km: 400.0,
            period_min: 92.5,
            eccentricity: 0.001,
            inclination_deg: 51.6,
        },
    },
    OrbitPreset {
        name: "leo",
        params: OrbitParams {
            altitude_km: 600.0,
            period_min: 96.5,
            eccentricity: 0.0,
            inclination_deg: 98.0,
        },
    },
    OrbitPreset {
        name: "geo",
        params: OrbitParams {
            altitude_km: 35786.0,
            period_min: 1436.0,
            eccentricity: 0.0,
            inclination_deg: 0.0,
        },
    },
];

pub fn find_preset(name: &str) -> Option<&'static OrbitPreset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

/// Orbit parameters being edited before an explicit apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PendingOrbitParams {
    pub altitude_km: Option<f64>,
    pub period_min: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination_deg: Option<f64>,
}

impl PendingOrbitParams {
    /// Overwrites every field with the preset's constants. Makes no device call.
    pub fn load_preset(&mut self, name: &str) -> Result<OrbitParams, CommandError> {
        let preset = find_preset(name).ok_or_else(|| CommandError::UnknownPreset(name.to_string()))?;
        *self = preset.params.into();
        Ok(preset.params)
    }

    /// Applies only the fields set in `edit`.
    pub fn merge(&mut self, edit: PendingOrbitParams) {
        self.altitude_km = edit.altitude_km.or(self.altitude_km);
        self.period_min = edit.period_min.or(self.period_min);
        self.eccentricity = edit.eccentricity.or(self.eccentricity);
        self.inclination_deg = edit.inclination_deg.or(self.inclination_deg);
    }

    pub fn validate(&self) -> Result<OrbitParams, CommandError> {
        let field = |value: Option<f64>, name: &str| {
            value
                .filter(|v| v.is_finite())
                .ok_or_else(|| CommandError::validation(format!("{name} must be a number")))
        };

        Ok(OrbitParams {
            altitude_km: field(self.altitude_km, "altitude_km")?,
            period_min: field(self.period_min, "period_min")?,
            eccentricity: field(self.eccentricity, "eccentricity")?,
            inclination_deg: field(self.inclination_deg, "inclination_deg")?,
        })
    }
}

impl From<OrbitParams> for PendingOrbitParams {
    fn from(params: OrbitParams) -> Self {
        Self {
            altitude_km: Some(params.altitude_km),
            period_min: Some(params.period_min),
            eccentricity: Some(params.eccentricity),
            inclination_deg: Some(params.inclination_deg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iss_preset_populates_exact_values() {
        let mut pending = PendingOrbitParams::default();
        pending.load_preset("iss").unwrap();

        assert_eq!(
            pending.validate().unwrap(),
            OrbitParams {
                altitude_km: 400.0,
                period_min: 92.5,
                eccentricity: 0.001,
                inclination_deg: 51.6,
            }
        );
    }

    #[test]
    fn leo_preset_populates_exact_values() {
        let mut pending = PendingOrbitParams::default();
        pending.load_preset("leo").unwrap();

        assert_eq!(
            pending.validate().unwrap(),
            OrbitParams {
                altitude_km: 600.0,
                period_min: 96.5,
                eccentricity: 0.0,
                inclination_deg: 98.0,
            }
        );
    }

    #[test]
    fn geo_preset_populates_exact_values() {
        let mut pending = PendingOrbitParams::default();
        pending.load_preset("geo").unwrap();

        assert_eq!(
            pending.validate().unwrap(),
            OrbitParams {
                altitude_km: 35786.0,
                period_min: 1436.0,
                eccentricity: 0.0,
                inclination_deg: 0.0,
            }
        );
    }

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!(find_preset("GEO").unwrap().params.altitude_km, 35786.0);
        assert!(find_preset("meo").is_none());
    }

    #[test]
    fn unknown_preset_leaves_pending_untouched() {
        let mut pending = PendingOrbitParams::default();
        pending.load_preset("leo").unwrap();

        let err = pending.load_preset("molniya").unwrap_err();

        assert_eq!(err, CommandError::UnknownPreset("molniya".to_string()));
        assert_eq!(pending.altitude_km, Some(600.0));
    }

    #[test]
    fn merge_keeps_fields_not_edited() {
        let mut pending = PendingOrbitParams::default();
        pending.load_preset("iss").unwrap();

        pending.merge(PendingOrbitParams {
            altitude_km: Some(420.0),
            ..Default::default()
        });

        assert_eq!(pending.altitude_km, Some(420.0));
        assert_eq!(pending.period_min, Some(92.5));
    }

    #[test]
    fn incomplete_or_non_finite_params_fail_validation() {
        let missing = PendingOrbitParams {
            altitude_km: Some(400.0),
            ..Default::default()
        };
        assert!(matches!(missing.validate(), Err(CommandError::Validation(_))));

        let mut nan = PendingOrbitParams::from(PRESETS[0].params);
        nan.eccentricity = Some(f64::NAN);
        assert!(nan.validate().is_err());
    }
}
