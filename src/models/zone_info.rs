use serde::{Deserialize, Serialize};

use super::enums::{AngleUnits, Direction, ZoneDimension, ZoneShape};
use super::fields::{FieldBag, FieldReader};
use super::values::{Point2, Point3};
use crate::error::ModelError;

/// Inflow direction of a 2-D zone. `custom` is used only when `direction` is
/// [`Direction::Custom`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Direction2d {
    pub direction: Direction,
    pub custom: Point2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Direction3d {
    pub direction: Direction,
    pub custom: Point3,
}

/// Rotation of a 2-D zone around `center`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation2d {
    pub enabled: bool,
    pub angle: f64,
    pub units: AngleUnits,
    pub center: Point2,
}

/// Rotation of a 3-D zone around the axis through `axis_point1` and
/// `axis_point2`.
///
/// Box and circle generators may additionally carry an [`AdvancedRotation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation3d {
    pub enabled: bool,
    pub angle: f64,
    pub units: AngleUnits,
    pub axis_point1: Point3,
    pub axis_point2: Point3,
    pub advanced: AdvancedRotation,
}

impl Default for Rotation3d {
    fn default() -> Self {
        Self {
            enabled: false,
            angle: 0.0,
            units: AngleUnits::Degrees,
            axis_point1: Point3::default(),
            axis_point2: Point3::new(0.0, 0.0, 1.0),
            advanced: AdvancedRotation::default(),
        }
    }
}

/// Successive rotations around X, Y and Z about `center`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedRotation {
    pub enabled: bool,
    pub angles: Point3,
    pub center: Point3,
    pub intrinsic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mk2dGenerator {
    pub mkfluid: u32,
    pub direction: Direction2d,
    pub rotation: Rotation2d,
}

/// A 2-D zone spanned by a segment. The inflow direction follows from the
/// segment's normal, so there is no direction or rotation to configure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGenerator {
    pub mkfluid: u32,
    pub point: Point2,
    pub point2: Point2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mk3dGenerator {
    pub mkfluid: u32,
    pub direction: Direction3d,
    pub rotation: Rotation3d,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGenerator {
    pub mkfluid: u32,
    pub point: Point3,
    pub size: Point3,
    pub direction: Direction3d,
    pub rotation: Rotation3d,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleGenerator {
    pub mkfluid: u32,
    pub point: Point3,
    pub radius: f64,
    pub direction: Direction3d,
    pub rotation: Rotation3d,
}

/// The particle generator of a zone. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ZoneGenerator {
    Mk2d(Mk2dGenerator),
    Line(LineGenerator),
    Mk3d(Mk3dGenerator),
    Box(BoxGenerator),
    Circle(CircleGenerator),
}

impl ZoneGenerator {
    /// A generator of the given shape populated with defaults.
    pub fn with_defaults(shape: ZoneShape) -> Self {
        match shape {
            ZoneShape::Mk2d => Self::Mk2d(Mk2dGenerator::default()),
            ZoneShape::Line => Self::Line(LineGenerator {
                mkfluid: 0,
                point: Point2::new(0.0, 0.0),
                point2: Point2::new(0.0, 1.0),
            }),
            ZoneShape::Mk3d => Self::Mk3d(Mk3dGenerator::default()),
            ZoneShape::Box => Self::Box(BoxGenerator {
                mkfluid: 0,
                point: Point3::default(),
                size: Point3::new(1.0, 1.0, 1.0),
                direction: Direction3d::default(),
                rotation: Rotation3d::default(),
            }),
            ZoneShape::Circle => Self::Circle(CircleGenerator {
                mkfluid: 0,
                point: Point3::default(),
                radius: 1.0,
                direction: Direction3d::default(),
                rotation: Rotation3d::default(),
            }),
        }
    }

    pub fn shape(&self) -> ZoneShape {
        match self {
            Self::Mk2d(_) => ZoneShape::Mk2d,
            Self::Line(_) => ZoneShape::Line,
            Self::Mk3d(_) => ZoneShape::Mk3d,
            Self::Box(_) => ZoneShape::Box,
            Self::Circle(_) => ZoneShape::Circle,
        }
    }

    pub fn mkfluid(&self) -> u32 {
        match self {
            Self::Mk2d(g) => g.mkfluid,
            Self::Line(g) => g.mkfluid,
            Self::Mk3d(g) => g.mkfluid,
            Self::Box(g) => g.mkfluid,
            Self::Circle(g) => g.mkfluid,
        }
    }

    fn mkfluid_mut(&mut self) -> &mut u32 {
        match self {
            Self::Mk2d(g) => &mut g.mkfluid,
            Self::Line(g) => &mut g.mkfluid,
            Self::Mk3d(g) => &mut g.mkfluid,
            Self::Box(g) => &mut g.mkfluid,
            Self::Circle(g) => &mut g.mkfluid,
        }
    }

    fn orientation_3d(&self) -> Option<(&Direction3d, &Rotation3d)> {
        match self {
            Self::Mk3d(g) => Some((&g.direction, &g.rotation)),
            Self::Box(g) => Some((&g.direction, &g.rotation)),
            Self::Circle(g) => Some((&g.direction, &g.rotation)),
            Self::Mk2d(_) | Self::Line(_) => None,
        }
    }

    fn orientation_3d_mut(&mut self) -> Option<(&mut Direction3d, &mut Rotation3d)> {
        match self {
            Self::Mk3d(g) => Some((&mut g.direction, &mut g.rotation)),
            Self::Box(g) => Some((&mut g.direction, &mut g.rotation)),
            Self::Circle(g) => Some((&mut g.direction, &mut g.rotation)),
            Self::Mk2d(_) | Self::Line(_) => None,
        }
    }
}

/// Geometry fields of the active generator, as committed by the GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    Mk { mkfluid: u32 },
    Line { mkfluid: u32, point: Point2, point2: Point2 },
    Box { mkfluid: u32, point: Point3, size: Point3 },
    Circle { mkfluid: u32, point: Point3, radius: f64 },
}

impl GeometryInput {
    /// Reads the geometry fields that belong to `shape`.
    pub fn from_fields(shape: ZoneShape, bag: &FieldBag) -> Result<Self, ModelError> {
        let fields = FieldReader::new(bag);
        let mkfluid = fields.count("mkfluid")?;
        let input = match shape {
            ZoneShape::Mk2d | ZoneShape::Mk3d => Self::Mk { mkfluid },
            ZoneShape::Line => Self::Line {
                mkfluid,
                point: fields.point2("point")?,
                point2: fields.point2("point2")?,
            },
            ZoneShape::Box => {
                let size = fields.point3("size")?;
                if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
                    return Err(ModelError::invalid_field("size", "box size must be positive"));
                }
                Self::Box {
                    mkfluid,
                    point: fields.point3("point")?,
                    size,
                }
            }
            ZoneShape::Circle => {
                let radius = fields.number("radius")?;
                if radius <= 0.0 {
                    return Err(ModelError::invalid_field("radius", "radius must be positive"));
                }
                Self::Circle {
                    mkfluid,
                    point: fields.point3("point")?,
                    radius,
                }
            }
        };
        Ok(input)
    }
}

/// A custom inflow vector, `[x, z]` for 2-D zones and `[x, y, z]` for 3-D
/// zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CustomDirection {
    TwoD(Point2),
    ThreeD(Point3),
}

/// Direction fields. `custom` is required only for [`Direction::Custom`].
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionInput {
    pub direction: Direction,
    pub custom: Option<CustomDirection>,
}

impl DirectionInput {
    pub fn from_fields(dimension: ZoneDimension, bag: &FieldBag) -> Result<Self, ModelError> {
        let fields = FieldReader::new(bag);
        let direction = fields.tag::<Direction>("direction")?;
        let custom = if direction == Direction::Custom {
            let custom = match dimension {
                ZoneDimension::TwoD => CustomDirection::TwoD(fields.point2("custom")?),
                ZoneDimension::ThreeD => CustomDirection::ThreeD(fields.point3("custom")?),
            };
            let zero = match custom {
                CustomDirection::TwoD(p) => p == Point2::default(),
                CustomDirection::ThreeD(p) => p == Point3::default(),
            };
            if zero {
                return Err(ModelError::invalid_field("custom", "direction vector cannot be zero"));
            }
            Some(custom)
        } else {
            None
        };
        Ok(Self { direction, custom })
    }
}

const ADVANCED_ROTATION_FIELDS: [&str; 4] = [
    "advanced_enabled",
    "advanced_angles",
    "advanced_center",
    "advanced_intrinsic",
];

/// Rotation fields for either dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub enum RotationInput {
    TwoD(Rotation2d),
    ThreeD(Rotation3d),
}

impl RotationInput {
    /// Reads rotation fields. Disabled rotations keep their stored values for
    /// any field the bag leaves out.
    ///
    /// Advanced rotation belongs to box and circle generators only; any
    /// `advanced_*` field for another shape is refused.
    pub fn from_fields(
        shape: ZoneShape,
        current: RotationInput,
        bag: &FieldBag,
    ) -> Result<Self, ModelError> {
        let fields = FieldReader::new(bag);
        if !shape.has_advanced_rotation() {
            if let Some(key) = ADVANCED_ROTATION_FIELDS.iter().find(|key| fields.contains(key)) {
                return Err(ModelError::InvalidState(format!(
                    "`{key}` is not available for a {shape} zone"
                )));
            }
        }
        match (shape.dimension(), current) {
            (ZoneDimension::TwoD, RotationInput::TwoD(mut rotation)) => {
                rotation.enabled = fields.boolean("enabled")?;
                if let Some(angle) = fields.opt_number("angle")? {
                    rotation.angle = angle;
                }
                if let Some(units) = fields.opt_tag::<AngleUnits>("units")? {
                    rotation.units = units;
                }
                if fields.contains("center") {
                    rotation.center = fields.point2("center")?;
                }
                Ok(Self::TwoD(rotation))
            }
            (ZoneDimension::ThreeD, RotationInput::ThreeD(mut rotation)) => {
                rotation.enabled = fields.boolean("enabled")?;
                if let Some(angle) = fields.opt_number("angle")? {
                    rotation.angle = angle;
                }
                if let Some(units) = fields.opt_tag::<AngleUnits>("units")? {
                    rotation.units = units;
                }
                if let Some(p) = fields.opt_point3("axis_point1")? {
                    rotation.axis_point1 = p;
                }
                if let Some(p) = fields.opt_point3("axis_point2")? {
                    rotation.axis_point2 = p;
                }
                if rotation.enabled && rotation.axis_point1 == rotation.axis_point2 {
                    return Err(ModelError::invalid_field(
                        "axis_point2",
                        "rotation axis needs two distinct points",
                    ));
                }
                if let Some(enabled) = fields.opt_boolean("advanced_enabled")? {
                    rotation.advanced.enabled = enabled;
                }
                if let Some(angles) = fields.opt_point3("advanced_angles")? {
                    rotation.advanced.angles = angles;
                }
                if let Some(center) = fields.opt_point3("advanced_center")? {
                    rotation.advanced.center = center;
                }
                if let Some(intrinsic) = fields.opt_boolean("advanced_intrinsic")? {
                    rotation.advanced.intrinsic = intrinsic;
                }
                Ok(Self::ThreeD(rotation))
            }
            _ => Err(ModelError::InvalidState(
                "rotation dimensionality does not match the zone".to_string(),
            )),
        }
    }
}

/// The shape descriptor of a zone: its generator plus the direction and
/// rotation appropriate to that generator's dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneInfo {
    generator: ZoneGenerator,
}

impl ZoneInfo {
    pub fn new(shape: ZoneShape) -> Self {
        Self {
            generator: ZoneGenerator::with_defaults(shape),
        }
    }

    pub fn shape(&self) -> ZoneShape {
        self.generator.shape()
    }

    pub fn dimension(&self) -> ZoneDimension {
        self.shape().dimension()
    }

    pub fn generator(&self) -> &ZoneGenerator {
        &self.generator
    }

    pub fn mkfluid(&self) -> u32 {
        self.generator.mkfluid()
    }

    pub fn set_mkfluid(&mut self, mkfluid: u32) {
        *self.generator.mkfluid_mut() = mkfluid;
    }

    /// Switches the generator to `shape`, resetting it to that shape's
    /// defaults.
    ///
    /// `mkfluid` always survives. Direction and rotation survive a switch
    /// between 3-D generators, except advanced rotation on an MK generator;
    /// everything else is dropped. Selecting the
    /// current shape changes nothing.
    pub fn set_shape(&mut self, shape: ZoneShape) {
        if self.shape() == shape {
            return;
        }

        let mkfluid = self.mkfluid();
        let orientation = self
            .generator
            .orientation_3d()
            .map(|(direction, rotation)| (*direction, *rotation));

        let mut generator = ZoneGenerator::with_defaults(shape);
        *generator.mkfluid_mut() = mkfluid;
        if let (Some((direction, rotation)), Some((dir_slot, rot_slot))) =
            (orientation, generator.orientation_3d_mut())
        {
            *dir_slot = direction;
            *rot_slot = rotation;
            if !shape.has_advanced_rotation() {
                rot_slot.advanced = AdvancedRotation::default();
            }
        }

        self.generator = generator;
    }

    /// Verifies a deserialized generator against the rules the commit
    /// operations enforce.
    pub fn check(&self) -> Result<(), ModelError> {
        match &self.generator {
            ZoneGenerator::Mk3d(g) if g.rotation.advanced.enabled => {
                Err(ModelError::IncompatibleVariant(format!(
                    "advanced rotation does not fit a {} zone",
                    ZoneShape::Mk3d
                )))
            }
            ZoneGenerator::Box(g) if g.size.x <= 0.0 || g.size.y <= 0.0 || g.size.z <= 0.0 => {
                Err(ModelError::invalid_field("size", "box size must be positive"))
            }
            ZoneGenerator::Circle(g) if g.radius <= 0.0 => {
                Err(ModelError::invalid_field("radius", "radius must be positive"))
            }
            _ => Ok(()),
        }
    }

    fn inactive(&self, what: &str) -> ModelError {
        ModelError::InvalidState(format!(
            "{} is not available for a {} zone",
            what,
            self.shape()
        ))
    }

    pub fn direction_2d(&self) -> Result<&Direction2d, ModelError> {
        match &self.generator {
            ZoneGenerator::Mk2d(g) => Ok(&g.direction),
            _ => Err(self.inactive("2-D direction")),
        }
    }

    pub fn direction_2d_mut(&mut self) -> Result<&mut Direction2d, ModelError> {
        let err = self.inactive("2-D direction");
        match &mut self.generator {
            ZoneGenerator::Mk2d(g) => Ok(&mut g.direction),
            _ => Err(err),
        }
    }

    pub fn rotation_2d(&self) -> Result<&Rotation2d, ModelError> {
        match &self.generator {
            ZoneGenerator::Mk2d(g) => Ok(&g.rotation),
            _ => Err(self.inactive("2-D rotation")),
        }
    }

    pub fn rotation_2d_mut(&mut self) -> Result<&mut Rotation2d, ModelError> {
        let err = self.inactive("2-D rotation");
        match &mut self.generator {
            ZoneGenerator::Mk2d(g) => Ok(&mut g.rotation),
            _ => Err(err),
        }
    }

    pub fn direction_3d(&self) -> Result<&Direction3d, ModelError> {
        self.generator
            .orientation_3d()
            .map(|(direction, _)| direction)
            .ok_or_else(|| self.inactive("3-D direction"))
    }

    pub fn direction_3d_mut(&mut self) -> Result<&mut Direction3d, ModelError> {
        let err = self.inactive("3-D direction");
        self.generator
            .orientation_3d_mut()
            .map(|(direction, _)| direction)
            .ok_or(err)
    }

    pub fn rotation_3d(&self) -> Result<&Rotation3d, ModelError> {
        self.generator
            .orientation_3d()
            .map(|(_, rotation)| rotation)
            .ok_or_else(|| self.inactive("3-D rotation"))
    }

    pub fn rotation_3d_mut(&mut self) -> Result<&mut Rotation3d, ModelError> {
        let err = self.inactive("3-D rotation");
        self.generator
            .orientation_3d_mut()
            .map(|(_, rotation)| rotation)
            .ok_or(err)
    }

    /// Writes geometry into the active generator. The input must be for the
    /// active shape.
    pub fn apply_geometry(&mut self, input: GeometryInput) -> Result<(), ModelError> {
        let shape = self.shape();
        match (&mut self.generator, input) {
            (ZoneGenerator::Mk2d(g), GeometryInput::Mk { mkfluid }) => g.mkfluid = mkfluid,
            (ZoneGenerator::Mk3d(g), GeometryInput::Mk { mkfluid }) => g.mkfluid = mkfluid,
            (
                ZoneGenerator::Line(g),
                GeometryInput::Line {
                    mkfluid,
                    point,
                    point2,
                },
            ) => {
                g.mkfluid = mkfluid;
                g.point = point;
                g.point2 = point2;
            }
            (ZoneGenerator::Box(g), GeometryInput::Box { mkfluid, point, size }) => {
                g.mkfluid = mkfluid;
                g.point = point;
                g.size = size;
            }
            (
                ZoneGenerator::Circle(g),
                GeometryInput::Circle {
                    mkfluid,
                    point,
                    radius,
                },
            ) => {
                g.mkfluid = mkfluid;
                g.point = point;
                g.radius = radius;
            }
            (_, input) => {
                return Err(ModelError::IncompatibleVariant(format!(
                    "geometry {:?} does not fit a {} zone",
                    input, shape
                )))
            }
        }
        Ok(())
    }

    pub fn save_geometry(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let input = GeometryInput::from_fields(self.shape(), bag)?;
        self.apply_geometry(input)
    }

    pub fn apply_direction(&mut self, input: DirectionInput) -> Result<(), ModelError> {
        match self.dimension() {
            ZoneDimension::TwoD => {
                let custom = match input.custom {
                    None => None,
                    Some(CustomDirection::TwoD(p)) => Some(p),
                    Some(CustomDirection::ThreeD(_)) => {
                        return Err(ModelError::IncompatibleVariant(
                            "3-D direction vector for a 2-D zone".to_string(),
                        ))
                    }
                };
                let slot = self.direction_2d_mut()?;
                slot.direction = input.direction;
                if let Some(custom) = custom {
                    slot.custom = custom;
                }
            }
            ZoneDimension::ThreeD => {
                let custom = match input.custom {
                    None => None,
                    Some(CustomDirection::ThreeD(p)) => Some(p),
                    Some(CustomDirection::TwoD(_)) => {
                        return Err(ModelError::IncompatibleVariant(
                            "2-D direction vector for a 3-D zone".to_string(),
                        ))
                    }
                };
                let slot = self.direction_3d_mut()?;
                slot.direction = input.direction;
                if let Some(custom) = custom {
                    slot.custom = custom;
                }
            }
        }
        Ok(())
    }

    pub fn save_direction(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        // Validate availability before reading fields so a line zone reports
        // the state error rather than a missing field.
        self.current_rotation()?;
        let input = DirectionInput::from_fields(self.dimension(), bag)?;
        self.apply_direction(input)
    }

    fn current_rotation(&self) -> Result<RotationInput, ModelError> {
        match self.dimension() {
            ZoneDimension::TwoD => self.rotation_2d().map(|r| RotationInput::TwoD(*r)),
            ZoneDimension::ThreeD => self.rotation_3d().map(|r| RotationInput::ThreeD(*r)),
        }
    }

    pub fn apply_rotation(&mut self, input: RotationInput) -> Result<(), ModelError> {
        match input {
            RotationInput::TwoD(rotation) => *self.rotation_2d_mut()? = rotation,
            RotationInput::ThreeD(rotation) => {
                let shape = self.shape();
                if rotation.advanced.enabled && !shape.has_advanced_rotation() {
                    return Err(ModelError::IncompatibleVariant(format!(
                        "advanced rotation does not fit a {shape} zone"
                    )));
                }
                *self.rotation_3d_mut()? = rotation;
            }
        }
        Ok(())
    }

    pub fn save_rotation(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let current = self.current_rotation()?;
        let input = RotationInput::from_fields(self.shape(), current, bag)?;
        self.apply_rotation(input)
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
    fn line_zone_has_no_orientation() {
        let info = ZoneInfo::new(ZoneShape::Line);
        assert!(matches!(info.rotation_3d(), Err(ModelError::InvalidState(_))));
        assert!(matches!(info.direction_2d(), Err(ModelError::InvalidState(_))));
    }

    #[test]
    fn switching_between_3d_shapes_keeps_orientation() {
        let mut info = ZoneInfo::new(ZoneShape::Box);
        info.set_mkfluid(3);
        info.direction_3d_mut().unwrap().direction = Direction::Top;
        info.set_shape(ZoneShape::Circle);

        assert_eq!(info.mkfluid(), 3);
        assert_eq!(info.direction_3d().unwrap().direction, Direction::Top);
        match info.generator() {
            ZoneGenerator::Circle(g) => assert_eq!(g.radius, 1.0),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn switching_dimension_drops_orientation() {
        let mut info = ZoneInfo::new(ZoneShape::Mk3d);
        info.rotation_3d_mut().unwrap().enabled = true;
        info.set_shape(ZoneShape::Mk2d);
        assert!(!info.rotation_2d().unwrap().enabled);
        assert!(info.rotation_3d().is_err());
    }

    #[test]
    fn mk3d_refuses_advanced_rotation() {
        let mut info = ZoneInfo::new(ZoneShape::Mk3d);
        let err = info
            .save_rotation(&bag(json!({
                "enabled": true,
                "angle": 15,
                "advanced_enabled": true,
                "advanced_angles": [10, 20, 30],
            })))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidState(_)));
        assert_eq!(*info.rotation_3d().unwrap(), Rotation3d::default());

        let mut rotation = Rotation3d::default();
        rotation.advanced.enabled = true;
        let err = info.apply_rotation(RotationInput::ThreeD(rotation)).unwrap_err();
        assert!(matches!(err, ModelError::IncompatibleVariant(_)));
    }

    #[test]
    fn switching_to_mk3d_drops_advanced_rotation() {
        let mut info = ZoneInfo::new(ZoneShape::Box);
        info.save_rotation(&bag(json!({
            "enabled": true,
            "angle": 45,
            "advanced_enabled": true,
            "advanced_angles": [10, 20, 30],
        })))
        .unwrap();

        info.set_shape(ZoneShape::Mk3d);
        let rotation = info.rotation_3d().unwrap();
        assert!(rotation.enabled);
        assert_eq!(rotation.angle, 45.0);
        assert_eq!(rotation.advanced, AdvancedRotation::default());
    }

    #[test]
    fn box_size_must_be_positive() {
        let mut info = ZoneInfo::new(ZoneShape::Box);
        let err = info
            .save_geometry(&bag(json!({
                "mkfluid": 0,
                "point": [0, 0, 0],
                "size": [1, 0, 1],
            })))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { ref field, .. } if field == "size"));
    }

    #[test]
    fn custom_direction_must_match_dimension() {
        let mut info = ZoneInfo::new(ZoneShape::Box);
        let err = info
            .apply_direction(DirectionInput {
                direction: Direction::Custom,
                custom: Some(CustomDirection::TwoD(Point2::new(1.0, 0.0))),
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::IncompatibleVariant(_)));
        assert_eq!(info.direction_3d().unwrap().direction, Direction::Left);

        info.save_direction(&bag(json!({ "direction": "custom", "custom": [0, 1, 0] })))
            .unwrap();
        assert_eq!(info.direction_3d().unwrap().custom, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn geometry_must_match_active_shape() {
        let mut info = ZoneInfo::new(ZoneShape::Box);
        let err = info
            .apply_geometry(GeometryInput::Circle {
                mkfluid: 0,
                point: Point3::default(),
                radius: 2.0,
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::IncompatibleVariant(_)));
    }

    #[test]
    fn custom_direction_needs_a_vector() {
        let mut info = ZoneInfo::new(ZoneShape::Mk2d);
        let err = info
            .save_direction(&bag(json!({ "direction": "custom" })))
            .unwrap_err();
        assert_eq!(err, ModelError::MissingField("custom".to_string()));

        info.save_direction(&bag(json!({ "direction": "custom", "custom": [1, 0.5] })))
            .unwrap();
        let direction = info.direction_2d().unwrap();
        assert_eq!(direction.direction, Direction::Custom);
        assert_eq!(direction.custom, Point2::new(1.0, 0.5));
    }

    #[test]
    fn line_direction_commit_is_a_state_error() {
        let mut info = ZoneInfo::new(ZoneShape::Line);
        let err = info
            .save_direction(&bag(json!({ "direction": "left" })))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidState(_)));
    }

    #[test]
    fn rotation_commit_keeps_omitted_fields() {
        let mut info = ZoneInfo::new(ZoneShape::Box);
        info.save_rotation(&bag(json!({
            "enabled": true,
            "angle": 30,
            "axis_point1": [0, 0, 0],
            "axis_point2": [0, 0, 1],
        })))
        .unwrap();
        info.save_rotation(&bag(json!({ "enabled": false }))).unwrap();

        let rotation = info.rotation_3d().unwrap();
        assert!(!rotation.enabled);
        assert_eq!(rotation.angle, 30.0);
        assert_eq!(rotation.axis_point2, Point3::new(0.0, 0.0, 1.0));
    }
}
