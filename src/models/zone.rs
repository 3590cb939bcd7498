use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::density::DensityInfo;
use super::elevation::ElevationInfo;
use super::enums::{
    DensityMode, ElevationMode, FixedVelocitySpec, InputTreatment, RefillingMode,
    VariableElevationSpec, VariableVelocitySpec, VelocityMode, ZoneShape,
};
use super::fields::{FieldBag, FieldReader};
use super::velocity::{VelocityInfo, VelocityInput};
use super::zone_info::{DirectionInput, GeometryInput, RotationInput, ZoneInfo};
use crate::error::ModelError;

/// Number of particle layers generated inside a new zone.
pub const DEFAULT_LAYERS: u32 = 4;

/// One inlet/outlet zone of a case.
///
/// Zones are created by [`InletOutletConfig::add_zone`](super::InletOutletConfig::add_zone)
/// and keep their `id` for life. The `proxy` is an opaque handle to the CAD
/// object that draws the zone; it is never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InletOutletZone {
    pub id: Uuid,
    zone_info: ZoneInfo,
    velocity: VelocityInfo,
    density: DensityInfo,
    elevation: ElevationInfo,
    layers: u32,
    pub refilling: RefillingMode,
    pub input_treatment: InputTreatment,
    pub proxy: Option<String>,
}

impl InletOutletZone {
    pub fn new(shape: ZoneShape) -> Self {
        Self {
            id: Uuid::new_v4(),
            zone_info: ZoneInfo::new(shape),
            velocity: VelocityInfo::default(),
            density: DensityInfo::default(),
            elevation: ElevationInfo::default(),
            layers: DEFAULT_LAYERS,
            refilling: RefillingMode::default(),
            input_treatment: InputTreatment::default(),
            proxy: None,
        }
    }

    pub fn shape(&self) -> ZoneShape {
        self.zone_info.shape()
    }

    pub fn zone_info(&self) -> &ZoneInfo {
        &self.zone_info
    }

    pub fn velocity(&self) -> &VelocityInfo {
        &self.velocity
    }

    pub fn density(&self) -> &DensityInfo {
        &self.density
    }

    pub fn density_mut(&mut self) -> &mut DensityInfo {
        &mut self.density
    }

    pub fn elevation(&self) -> &ElevationInfo {
        &self.elevation
    }

    pub fn elevation_mut(&mut self) -> &mut ElevationInfo {
        &mut self.elevation
    }

    pub fn layers(&self) -> u32 {
        self.layers
    }

    pub fn set_layers(&mut self, layers: u32) -> Result<(), ModelError> {
        if layers == 0 {
            return Err(ModelError::invalid_field("layers", "at least one layer is required"));
        }
        self.layers = layers;
        Ok(())
    }

    /// Verifies a deserialized zone: at least one layer, a generator that
    /// passes [`ZoneInfo::check`], and a jet circle only on a circle.
    pub fn check(&self) -> Result<(), ModelError> {
        if self.layers == 0 {
            return Err(ModelError::invalid_field("layers", "at least one layer is required"));
        }
        self.zone_info.check()?;
        if self.velocity.fixed().spec() == FixedVelocitySpec::JetCircle
            && self.shape() != ZoneShape::Circle
        {
            return Err(ModelError::IncompatibleVariant(format!(
                "jet_circle velocity on a {} zone",
                self.shape()
            )));
        }
        Ok(())
    }

    /// Changes the generator. A jet circle velocity falls back to a constant
    /// profile when the zone stops being a circle.
    pub fn set_shape(&mut self, shape: ZoneShape) {
        self.zone_info.set_shape(shape);
        self.velocity.release_jet_circle(shape);
    }

    pub fn select_velocity_mode(&mut self, mode: VelocityMode) {
        self.velocity.select_mode(mode);
    }

    pub fn select_fixed_velocity(&mut self, spec: FixedVelocitySpec) -> Result<(), ModelError> {
        let shape = self.shape();
        self.velocity.select_fixed_spec(spec, shape)
    }

    pub fn select_variable_velocity(&mut self, spec: VariableVelocitySpec) {
        self.velocity.select_variable_spec(spec);
    }

    /// Writes a typed velocity payload into its own slot. A jet circle
    /// payload is refused for any shape but a circle.
    pub fn apply_velocity(&mut self, input: VelocityInput) -> Result<(), ModelError> {
        if matches!(input, VelocityInput::JetCircle(_)) && self.shape() != ZoneShape::Circle {
            return Err(ModelError::IncompatibleVariant(format!(
                "jet_circle velocity requires a circle zone, this zone is {}",
                self.shape()
            )));
        }
        self.velocity.apply(input);
        Ok(())
    }

    pub fn apply_geometry(&mut self, input: GeometryInput) -> Result<(), ModelError> {
        self.zone_info.apply_geometry(input)
    }

    pub fn apply_direction(&mut self, input: DirectionInput) -> Result<(), ModelError> {
        self.zone_info.apply_direction(input)
    }

    pub fn apply_rotation(&mut self, input: RotationInput) -> Result<(), ModelError> {
        self.zone_info.apply_rotation(input)
    }

    pub fn save_geometry(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        self.zone_info.save_geometry(bag)
    }

    pub fn save_direction(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        self.zone_info.save_direction(bag)
    }

    pub fn save_rotation(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        self.zone_info.save_rotation(bag)
    }

    /// Commits `refilling`, `input_treatment` and `layers`. Each key is
    /// optional; nothing changes unless every present key is valid.
    pub fn save_policy(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let fields = FieldReader::new(bag);
        let refilling = fields.opt_tag::<RefillingMode>("refilling")?;
        let input_treatment = fields.opt_tag::<InputTreatment>("input_treatment")?;
        let layers = fields.opt_count("layers")?;
        if layers == Some(0) {
            return Err(ModelError::invalid_field("layers", "at least one layer is required"));
        }

        if let Some(refilling) = refilling {
            self.refilling = refilling;
        }
        if let Some(input_treatment) = input_treatment {
            self.input_treatment = input_treatment;
        }
        if let Some(layers) = layers {
            self.layers = layers;
        }
        Ok(())
    }

    /// Applies the optional `mode` and `spec` selections, then commits any
    /// remaining fields into the selected variant.
    ///
    /// `spec` names a [`FixedVelocitySpec`] or a [`VariableVelocitySpec`]
    /// depending on the mode in effect after `mode` is applied.
    pub fn save_velocity(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let fields = FieldReader::new(bag);
        let shape = self.shape();
        let mut velocity = self.velocity.clone();

        if let Some(mode) = fields.opt_tag::<VelocityMode>("mode")? {
            velocity.select_mode(mode);
        }
        if fields.contains("spec") {
            match velocity.mode() {
                VelocityMode::Fixed => {
                    velocity.select_fixed_spec(fields.tag::<FixedVelocitySpec>("spec")?, shape)?
                }
                VelocityMode::Variable => {
                    velocity.select_variable_spec(fields.tag::<VariableVelocitySpec>("spec")?)
                }
                mode => {
                    return Err(ModelError::invalid_field(
                        "spec",
                        format!("{mode} velocity has no spec to select"),
                    ))
                }
            }
        }
        if fields.has_fields_besides(&["mode", "spec"]) {
            velocity.commit(bag)?;
        }

        self.velocity = velocity;
        Ok(())
    }

    pub fn save_density(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let fields = FieldReader::new(bag);
        let mut density = self.density.clone();

        if let Some(mode) = fields.opt_tag::<DensityMode>("mode")? {
            density.select_mode(mode);
        }
        if fields.has_fields_besides(&["mode"]) {
            density.commit(bag)?;
        }

        self.density = density;
        Ok(())
    }

    /// Applies the optional `enabled`, `mode` and `spec` selections, then
    /// commits the remaining fields. A bag carrying only `remove_above`
    /// updates that flag alone.
    pub fn save_elevation(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let fields = FieldReader::new(bag);
        let mut elevation = self.elevation.clone();

        if let Some(enabled) = fields.opt_boolean("enabled")? {
            elevation.set_enabled(enabled);
        }
        if let Some(mode) = fields.opt_tag::<ElevationMode>("mode")? {
            elevation.select_mode(mode);
        }
        if fields.contains("spec") {
            if elevation.mode() != ElevationMode::Variable {
                return Err(ModelError::invalid_field(
                    "spec",
                    format!("{} elevation has no spec to select", elevation.mode()),
                ));
            }
            elevation.select_variable_spec(fields.tag::<VariableElevationSpec>("spec")?);
        }
        if fields.has_fields_besides(&["enabled", "mode", "spec", "remove_above"]) {
            elevation.commit(bag)?;
        } else if let Some(remove) = fields.opt_boolean("remove_above")? {
            elevation.set_remove_above(remove);
        }

        self.elevation = elevation;
        Ok(())
    }
}
