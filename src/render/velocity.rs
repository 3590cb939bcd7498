use super::shape::point3;
use super::xml::{num, XmlNode};
use crate::models::{
    FixedVelocitySpec, MeshData, VariableVelocitySpec, VelocityInfo, VelocityMode, ZoneShape,
};

pub(super) fn mode_code(mode: VelocityMode) -> u8 {
    match mode {
        VelocityMode::Fixed => 0,
        VelocityMode::Variable => 1,
        VelocityMode::Extrapolated => 2,
        VelocityMode::Interpolated => 3,
    }
}

pub(super) fn mesh_data(mesh: &MeshData) -> XmlNode {
    XmlNode::new("meshdata")
        .attr("file", &mesh.file)
        .attr("initialtime", num(mesh.initial_time))
        .attr("reverse", mesh.reverse)
        .child(point3("setpos", &mesh.set_pos))
        .child(point3("setvelmul", &mesh.set_vel_mul))
        .child(point3("setveladd", &mesh.set_vel_add))
}

/// The `imposevelocity` element. Fails with a detail message when a jet
/// circle profile is selected on anything but a circle zone.
pub fn render_velocity(velocity: &VelocityInfo, shape: ZoneShape) -> Result<XmlNode, String> {
    let elem = XmlNode::new("imposevelocity").attr("mode", mode_code(velocity.mode()));

    let body = match velocity.mode() {
        VelocityMode::Extrapolated => return Ok(elem),
        VelocityMode::Interpolated => mesh_data(velocity.interpolated()),
        VelocityMode::Fixed => {
            let fixed = velocity.fixed();
            match fixed.spec() {
                FixedVelocitySpec::Constant => {
                    XmlNode::new("velocity").attr("v", num(fixed.constant))
                }
                FixedVelocitySpec::Linear => {
                    let p = &fixed.linear;
                    XmlNode::new("velocity2")
                        .attr("v", num(p.v1))
                        .attr("v2", num(p.v2))
                        .attr("z", num(p.z1))
                        .attr("z2", num(p.z2))
                }
                FixedVelocitySpec::Parabolic => {
                    let p = &fixed.parabolic;
                    XmlNode::new("velocity3")
                        .attr("v", num(p.v1))
                        .attr("v2", num(p.v2))
                        .attr("v3", num(p.v3))
                        .attr("z", num(p.z1))
                        .attr("z2", num(p.z2))
                        .attr("z3", num(p.z3))
                }
                FixedVelocitySpec::JetCircle => {
                    if shape != ZoneShape::Circle {
                        return Err(format!("jet_circle velocity on a {shape} zone"));
                    }
                    XmlNode::new("velocityjetcircle")
                        .attr("v", num(fixed.jet_circle.velocity))
                        .attr("distance", num(fixed.jet_circle.distance))
                }
            }
        }
        VelocityMode::Variable => {
            let variable = velocity.variable();
            match variable.spec() {
                VariableVelocitySpec::UniformSeries => XmlNode::new("velocitytimes").children(
                    variable.uniform_series.iter().map(|row| {
                        XmlNode::new("timevalue")
                            .attr("time", num(row.time))
                            .attr("v", num(row.value))
                    }),
                ),
                VariableVelocitySpec::LinearSeries => XmlNode::new("velocitytimes2").children(
                    variable.linear_series.iter().map(|row| {
                        XmlNode::new("timevalue")
                            .attr("time", num(row.time))
                            .attr("v", num(row.profile.v1))
                            .attr("v2", num(row.profile.v2))
                            .attr("z", num(row.profile.z1))
                            .attr("z2", num(row.profile.z2))
                    }),
                ),
                VariableVelocitySpec::ParabolicSeries => XmlNode::new("velocitytimes3").children(
                    variable.parabolic_series.iter().map(|row| {
                        XmlNode::new("timevalue")
                            .attr("time", num(row.time))
                            .attr("v", num(row.profile.v1))
                            .attr("v2", num(row.profile.v2))
                            .attr("v3", num(row.profile.v3))
                            .attr("z", num(row.profile.z1))
                            .attr("z2", num(row.profile.z2))
                            .attr("z3", num(row.profile.z3))
                    }),
                ),
                VariableVelocitySpec::UniformFile => {
                    XmlNode::new("velocityfile").attr("file", &variable.uniform_file.path)
                }
                VariableVelocitySpec::LinearFile => {
                    let source = &variable.linear_file;
                    XmlNode::new("velocityfile2")
                        .attr("file", &source.path)
                        .attr("z", num(source.z1))
                        .attr("z2", num(source.z2))
                }
                VariableVelocitySpec::ParabolicFile => {
                    let source = &variable.parabolic_file;
                    XmlNode::new("velocityfile3")
                        .attr("file", &source.path)
                        .attr("z", num(source.z1))
                        .attr("z2", num(source.z2))
                        .attr("z3", num(source.z3))
                }
            }
        }
    };

    Ok(elem.child(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldBag;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> FieldBag {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn extrapolated_is_empty_but_interpolated_is_not() {
        let mut velocity = VelocityInfo::default();
        velocity.select_mode(VelocityMode::Extrapolated);
        let elem = render_velocity(&velocity, ZoneShape::Box).unwrap();
        assert_eq!(elem.get_attr("mode"), Some("2"));
        assert!(elem.children.is_empty());

        velocity.select_mode(VelocityMode::Interpolated);
        let elem = render_velocity(&velocity, ZoneShape::Box).unwrap();
        assert_eq!(elem.children[0].name, "meshdata");
    }

    #[test]
    fn linear_file_renders_heights() {
        let mut velocity = VelocityInfo::default();
        velocity.select_mode(VelocityMode::Variable);
        velocity.select_variable_spec(VariableVelocitySpec::LinearFile);
        velocity
            .commit(&bag(json!({ "file": "vel.csv", "z1": 0, "z2": 2.5 })))
            .unwrap();

        let elem = render_velocity(&velocity, ZoneShape::Mk2d).unwrap();
        let file = &elem.children[0];
        assert_eq!(file.name, "velocityfile2");
        assert_eq!(file.get_attr("file"), Some("vel.csv"));
        assert_eq!(file.get_attr("z2"), Some("2.5"));
    }

    #[test]
    fn jet_circle_outside_a_circle_is_inconsistent() {
        let mut velocity = VelocityInfo::default();
        velocity
            .select_fixed_spec(FixedVelocitySpec::JetCircle, ZoneShape::Circle)
            .unwrap();
        assert!(render_velocity(&velocity, ZoneShape::Circle).is_ok());
        assert!(render_velocity(&velocity, ZoneShape::Box).is_err());
    }
}
