use serde::{Deserialize, Serialize};

/// A closed set of tags addressed by name at the GUI boundary and in
/// persisted documents.
pub trait Tag: Sized + Copy + 'static {
    /// Human readable name of the tag set, used in error messages.
    const KIND: &'static str;

    fn all() -> &'static [Self];
    fn as_str(&self) -> &'static str;
    fn from_str(s: &str) -> Option<Self>;
}

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $tag)] $variant, )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $tag, )+
                }
            }

            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $( $tag => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl Tag for $name {
            const KIND: &'static str = $kind;

            fn all() -> &'static [Self] {
                &[$( Self::$variant ),+]
            }

            fn as_str(&self) -> &'static str {
                $name::as_str(self)
            }

            fn from_str(s: &str) -> Option<Self> {
                $name::from_str(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// The generator that defines a zone's particles.
    ///
    /// 2-D cases use `Mk2d` or `Line`; 3-D cases use `Mk3d`, `Box` or `Circle`.
    pub enum ZoneShape ("zone shape") {
        Mk2d => "mk2d",
        Line => "line",
        Mk3d => "mk3d",
        Box => "box",
        Circle => "circle",
    }
}

impl ZoneShape {
    pub fn dimension(&self) -> ZoneDimension {
        match self {
            Self::Mk2d | Self::Line => ZoneDimension::TwoD,
            Self::Mk3d | Self::Box | Self::Circle => ZoneDimension::ThreeD,
        }
    }

    /// Box and circle generators accept a `rotateadv` on top of the axis
    /// rotation.
    pub fn has_advanced_rotation(&self) -> bool {
        matches!(self, Self::Box | Self::Circle)
    }

    pub fn generator_kind(&self) -> ZoneGeneratorKind {
        match self {
            Self::Mk2d | Self::Mk3d => ZoneGeneratorKind::Mk,
            Self::Line => ZoneGeneratorKind::Line,
            Self::Box => ZoneGeneratorKind::Box,
            Self::Circle => ZoneGeneratorKind::Circle,
        }
    }
}

tag_enum! {
    pub enum ZoneDimension ("zone dimension") {
        TwoD => "2d",
        ThreeD => "3d",
    }
}

tag_enum! {
    pub enum ZoneGeneratorKind ("zone generator") {
        Mk => "mk",
        Line => "line",
        Box => "box",
        Circle => "circle",
    }
}

tag_enum! {
    /// Inflow direction of a zone. `Custom` takes an explicit vector.
    pub enum Direction ("direction") {
        Left => "left",
        Right => "right",
        Front => "front",
        Back => "back",
        Top => "top",
        Bottom => "bottom",
        Custom => "custom",
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Left
    }
}

tag_enum! {
    pub enum AngleUnits ("angle units") {
        Degrees => "degrees",
        Radians => "radians",
    }
}

impl Default for AngleUnits {
    fn default() -> Self {
        Self::Degrees
    }
}

tag_enum! {
    /// Outer velocity tag.
    ///
    /// - `Fixed`: constant in time, profile chosen by [`FixedVelocitySpec`]
    /// - `Variable`: time dependent, source chosen by [`VariableVelocitySpec`]
    /// - `Extrapolated`: taken from the fluid domain, no payload
    /// - `Interpolated`: read from mesh data
    pub enum VelocityMode ("velocity mode") {
        Fixed => "fixed",
        Variable => "variable",
        Extrapolated => "extrapolated",
        Interpolated => "interpolated",
    }
}

impl Default for VelocityMode {
    fn default() -> Self {
        Self::Fixed
    }
}

tag_enum! {
    pub enum FixedVelocitySpec ("fixed velocity spec") {
        Constant => "constant",
        Linear => "linear",
        Parabolic => "parabolic",
        /// Only legal for circle zones.
        JetCircle => "jet_circle",
    }
}

tag_enum! {
    pub enum VariableVelocitySpec ("variable velocity spec") {
        UniformSeries => "uniform_series",
        LinearSeries => "linear_series",
        ParabolicSeries => "parabolic_series",
        UniformFile => "uniform_file",
        LinearFile => "linear_file",
        ParabolicFile => "parabolic_file",
    }
}

tag_enum! {
    pub enum DensityMode ("density mode") {
        Fixed => "fixed",
        Hydrostatic => "hydrostatic",
        Extrapolated => "extrapolated",
    }
}

tag_enum! {
    /// Free-surface elevation tag. `Automatic` computes the surface from the
    /// fluid domain.
    pub enum ElevationMode ("elevation mode") {
        Fixed => "fixed",
        Variable => "variable",
        Automatic => "automatic",
    }
}

impl Default for ElevationMode {
    fn default() -> Self {
        Self::Fixed
    }
}

tag_enum! {
    pub enum VariableElevationSpec ("variable elevation spec") {
        TimeList => "time_list",
        File => "file",
        MeshData => "mesh_data",
    }
}

tag_enum! {
    /// How particles leaving an outlet are replaced.
    pub enum RefillingMode ("refilling mode") {
        SimpleFull => "simple_full",
        SimpleBelowZsurf => "simple_below_zsurf",
        Advanced => "advanced",
    }
}

impl Default for RefillingMode {
    fn default() -> Self {
        Self::SimpleFull
    }
}

tag_enum! {
    /// Treatment of fluid particles that enter the zone.
    pub enum InputTreatment ("input treatment") {
        NoChanges => "no_changes",
        ConvertFluid => "convert_fluid",
        RemoveFluid => "remove_fluid",
    }
}

impl Default for InputTreatment {
    fn default() -> Self {
        Self::NoChanges
    }
}

tag_enum! {
    /// Calculation mode for density and velocity extrapolation from ghost nodes.
    pub enum ExtrapolationMode ("extrapolation mode") {
        FastSingle => "fast_single",
        Single => "single",
        Double => "double",
    }
}

impl Default for ExtrapolationMode {
    fn default() -> Self {
        Self::FastSingle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_their_names() {
        for tag in VariableVelocitySpec::all() {
            assert_eq!(VariableVelocitySpec::from_str(tag.as_str()), Some(*tag));
        }
        assert_eq!(ZoneShape::from_str("hexagon"), None);
    }

    #[test]
    fn serde_uses_tag_names() {
        let json = serde_json::to_string(&FixedVelocitySpec::JetCircle).unwrap();
        assert_eq!(json, "\"jet_circle\"");
        let dim: ZoneDimension = serde_json::from_str("\"2d\"").unwrap();
        assert_eq!(dim, ZoneDimension::TwoD);
    }

    #[test]
    fn shapes_know_their_dimension() {
        assert_eq!(ZoneShape::Line.dimension(), ZoneDimension::TwoD);
        assert_eq!(ZoneShape::Circle.dimension(), ZoneDimension::ThreeD);
        assert_eq!(ZoneShape::Mk3d.generator_kind(), ZoneGeneratorKind::Mk);
    }
}
