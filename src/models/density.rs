use serde::{Deserialize, Serialize};

use super::enums::DensityMode;
use super::fields::{FieldBag, FieldReader};
use crate::error::ModelError;

/// Reference density of water, kg/m³.
pub const DEFAULT_DENSITY: f64 = 1000.0;

/// Density imposed on a zone. `value` is exported only in
/// [`DensityMode::Fixed`] but survives switching modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityInfo {
    mode: DensityMode,
    value: f64,
}

impl Default for DensityInfo {
    fn default() -> Self {
        Self {
            mode: DensityMode::Fixed,
            value: DEFAULT_DENSITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityInput {
    pub value: f64,
}

impl DensityInput {
    pub fn from_fields(bag: &FieldBag) -> Result<Self, ModelError> {
        let value = FieldReader::new(bag).number("value")?;
        if value <= 0.0 {
            return Err(ModelError::invalid_field("value", "density must be positive"));
        }
        Ok(Self { value })
    }
}

impl DensityInfo {
    pub fn mode(&self) -> DensityMode {
        self.mode
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn select_mode(&mut self, mode: DensityMode) {
        self.mode = mode;
    }

    pub fn apply(&mut self, input: DensityInput) {
        self.value = input.value;
    }

    /// Only the fixed mode carries a value; committing in the other modes
    /// changes nothing.
    pub fn commit(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        if self.mode == DensityMode::Fixed {
            self.apply(DensityInput::from_fields(bag)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> FieldBag {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn commit_outside_fixed_mode_keeps_the_value() {
        let mut density = DensityInfo::default();
        density.select_mode(DensityMode::Hydrostatic);
        density.commit(&bag(json!({ "value": -5 }))).unwrap();
        assert_eq!(density.value(), DEFAULT_DENSITY);
    }

    #[test]
    fn zero_density_is_rejected() {
        let err = DensityInput::from_fields(&bag(json!({ "value": 0 }))).unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { ref field, .. } if field == "value"));
    }
}
