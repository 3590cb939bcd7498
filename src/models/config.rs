use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ExtrapolationMode, ZoneDimension, ZoneShape};
use super::fields::{FieldBag, FieldReader};
use super::values::Point3;
use super::zone::InletOutletZone;
use crate::error::ModelError;

pub const DEFAULT_DETERM_LIMIT: f64 = 1e3;
pub const DEFAULT_REFILLING_RATE: u32 = 1;

/// Memory reserved for inlet particles, as multiples of the initial count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryResize {
    /// First resize.
    pub size0: f64,
    /// Every following resize.
    pub size: f64,
}

impl Default for MemoryResize {
    fn default() -> Self {
        Self {
            size0: 2.0,
            size: 4.0,
        }
    }
}

/// Whether inlet particles are confined to the zone's bounding box, with an
/// optional fixed centre for the free surface search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxLimit {
    pub enabled: bool,
    pub free_center: Option<Point3>,
}

impl Default for BoxLimit {
    fn default() -> Self {
        Self {
            enabled: true,
            free_center: None,
        }
    }
}

/// The Inlet/Outlet section of a case: global tuning plus the zones, kept in
/// the order they were added. That order is the export order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InletOutletConfig {
    pub extrapolation_mode: ExtrapolationMode,
    /// Determinant limit for the ghost node matrix inversion.
    pub determ_limit: f64,
    /// Refilling frequency in steps.
    pub refilling_rate: u32,
    pub memory_resize: MemoryResize,
    pub box_limit: BoxLimit,
    zones: Vec<InletOutletZone>,
}

impl Default for InletOutletConfig {
    fn default() -> Self {
        Self {
            extrapolation_mode: ExtrapolationMode::default(),
            determ_limit: DEFAULT_DETERM_LIMIT,
            refilling_rate: DEFAULT_REFILLING_RATE,
            memory_resize: MemoryResize::default(),
            box_limit: BoxLimit::default(),
            zones: Vec::new(),
        }
    }
}

impl InletOutletConfig {
    pub fn zones(&self) -> &[InletOutletZone] {
        &self.zones
    }

    /// Dimensionality of the zones, taken from the first one.
    pub fn dimension(&self) -> Option<ZoneDimension> {
        self.zones.first().map(|zone| zone.shape().dimension())
    }

    fn check_dimension(&self, shape: ZoneShape, ignore: Option<Uuid>) -> Result<(), ModelError> {
        let existing = self
            .zones
            .iter()
            .find(|zone| Some(zone.id) != ignore)
            .map(|zone| zone.shape().dimension());
        match existing {
            Some(dimension) if dimension != shape.dimension() => {
                Err(ModelError::IncompatibleVariant(format!(
                    "a {} zone cannot join a case with {} zones",
                    shape,
                    dimension
                )))
            }
            _ => Ok(()),
        }
    }

    /// Verifies a deserialized configuration against the rules the edit
    /// operations enforce. Zone errors name the zone as `zones[i]`.
    pub fn check(&self) -> Result<(), ModelError> {
        if self.determ_limit <= 0.0 {
            return Err(ModelError::invalid_field("determ_limit", "must be positive"));
        }
        if self.refilling_rate == 0 {
            return Err(ModelError::invalid_field("refilling_rate", "must be at least 1"));
        }
        if self.memory_resize.size0 < 1.0 || self.memory_resize.size < 1.0 {
            return Err(ModelError::invalid_field("memory_resize", "cannot be below 1"));
        }

        let dimension = self.dimension();
        for (i, zone) in self.zones.iter().enumerate() {
            if Some(zone.shape().dimension()) != dimension {
                return Err(ModelError::IncompatibleVariant(format!(
                    "zones[{}] is a {} zone in a case with {} zones",
                    i,
                    zone.shape(),
                    dimension.map(|d| d.as_str()).unwrap_or("no")
                )));
            }
            zone.check().map_err(|err| match err {
                ModelError::InvalidField { field, reason } => ModelError::InvalidField {
                    field: format!("zones[{i}].{field}"),
                    reason,
                },
                ModelError::IncompatibleVariant(detail) => {
                    ModelError::IncompatibleVariant(format!("zones[{i}]: {detail}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Appends a zone populated with the defaults for `shape` and returns it.
    pub fn add_zone(&mut self, shape: ZoneShape) -> Result<&mut InletOutletZone, ModelError> {
        self.check_dimension(shape, None)?;
        let zone = InletOutletZone::new(shape);
        tracing::debug!(zone_id = %zone.id, shape = %shape, "Adding inout zone");
        self.zones.push(zone);
        let index = self.zones.len() - 1;
        Ok(&mut self.zones[index])
    }

    /// Removes a zone and hands it back so the caller can release its CAD
    /// proxy. The remaining zones keep their order.
    pub fn remove_zone(&mut self, id: Uuid) -> Result<InletOutletZone, ModelError> {
        let index = self
            .zones
            .iter()
            .position(|zone| zone.id == id)
            .ok_or(ModelError::ZoneNotFound(id))?;
        tracing::debug!(zone_id = %id, "Removing inout zone");
        Ok(self.zones.remove(index))
    }

    pub fn zone(&self, id: Uuid) -> Result<&InletOutletZone, ModelError> {
        self.zones
            .iter()
            .find(|zone| zone.id == id)
            .ok_or(ModelError::ZoneNotFound(id))
    }

    pub fn zone_mut(&mut self, id: Uuid) -> Result<&mut InletOutletZone, ModelError> {
        self.zones
            .iter_mut()
            .find(|zone| zone.id == id)
            .ok_or(ModelError::ZoneNotFound(id))
    }

    /// Reshapes a zone. A case with more than one zone cannot change
    /// dimensionality through this call.
    pub fn set_zone_shape(&mut self, id: Uuid, shape: ZoneShape) -> Result<(), ModelError> {
        self.zone(id)?;
        self.check_dimension(shape, Some(id))?;
        self.zone_mut(id)?.set_shape(shape);
        Ok(())
    }

    /// Commits global tuning. Every key is optional:
    /// `extrapolation_mode`, `determ_limit`, `refilling_rate`,
    /// `memory_resize_size0`, `memory_resize_size`, `box_limit`,
    /// `free_center` (a point, or null to clear it).
    pub fn save_settings(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let fields = FieldReader::new(bag);
        let extrapolation_mode = fields.opt_tag::<ExtrapolationMode>("extrapolation_mode")?;
        let determ_limit = fields.opt_number("determ_limit")?;
        let refilling_rate = fields.opt_count("refilling_rate")?;
        let size0 = fields.opt_number("memory_resize_size0")?;
        let size = fields.opt_number("memory_resize_size")?;
        let box_limit = fields.opt_boolean("box_limit")?;
        let free_center = fields.opt_point3("free_center")?;

        if determ_limit.is_some_and(|limit| limit <= 0.0) {
            return Err(ModelError::invalid_field("determ_limit", "must be positive"));
        }
        if refilling_rate == Some(0) {
            return Err(ModelError::invalid_field("refilling_rate", "must be at least 1"));
        }
        for (name, value) in [("memory_resize_size0", size0), ("memory_resize_size", size)] {
            if value.is_some_and(|v| v < 1.0) {
                return Err(ModelError::invalid_field(name, "cannot be below 1"));
            }
        }

        if let Some(mode) = extrapolation_mode {
            self.extrapolation_mode = mode;
        }
        if let Some(limit) = determ_limit {
            self.determ_limit = limit;
        }
        if let Some(rate) = refilling_rate {
            self.refilling_rate = rate;
        }
        if let Some(size0) = size0 {
            self.memory_resize.size0 = size0;
        }
        if let Some(size) = size {
            self.memory_resize.size = size;
        }
        if let Some(enabled) = box_limit {
            self.box_limit.enabled = enabled;
        }
        if bag.contains_key("free_center") {
            self.box_limit.free_center = free_center;
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
    fn removing_a_zone_keeps_the_others_in_order() {
        let mut config = InletOutletConfig::default();
        let a = config.add_zone(ZoneShape::Box).unwrap().id;
        let b = config.add_zone(ZoneShape::Circle).unwrap().id;
        let c = config.add_zone(ZoneShape::Mk3d).unwrap().id;

        let removed = config.remove_zone(b).unwrap();
        assert_eq!(removed.id, b);
        let ids: Vec<Uuid> = config.zones().iter().map(|zone| zone.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn unknown_zone_is_reported() {
        let mut config = InletOutletConfig::default();
        let id = Uuid::new_v4();
        assert_eq!(config.remove_zone(id).unwrap_err(), ModelError::ZoneNotFound(id));
    }

    #[test]
    fn zones_share_one_dimensionality() {
        let mut config = InletOutletConfig::default();
        let id = config.add_zone(ZoneShape::Line).unwrap().id;
        assert!(matches!(
            config.add_zone(ZoneShape::Box),
            Err(ModelError::IncompatibleVariant(_))
        ));

        // A lone zone may still switch dimension.
        config.set_zone_shape(id, ZoneShape::Circle).unwrap();
        assert_eq!(config.dimension(), Some(ZoneDimension::ThreeD));
    }

    #[test]
    fn settings_clear_free_center_with_null() {
        let mut config = InletOutletConfig::default();
        config
            .save_settings(&bag(json!({ "free_center": [1, 2, 3], "determ_limit": "0.001" })))
            .unwrap();
        assert_eq!(config.box_limit.free_center, Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(config.determ_limit, 0.001);

        config.save_settings(&bag(json!({ "free_center": null }))).unwrap();
        assert_eq!(config.box_limit.free_center, None);
    }
}
