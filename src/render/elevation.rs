use super::shape::point3;
use super::velocity::mesh_data;
use super::xml::{num, XmlNode};
use crate::models::{ElevationInfo, ElevationMode, VariableElevationSpec};

fn mode_code(mode: ElevationMode) -> u8 {
    match mode {
        ElevationMode::Fixed => 0,
        ElevationMode::Variable => 1,
        ElevationMode::Automatic => 2,
    }
}

/// The `imposezsurf` element, or `None` while elevation is disabled.
pub fn render_elevation(elevation: &ElevationInfo) -> Option<XmlNode> {
    if !elevation.is_enabled() {
        return None;
    }

    let mut elem = XmlNode::new("imposezsurf").attr("mode", mode_code(elevation.mode()));
    match elevation.mode() {
        ElevationMode::Fixed => {
            let fixed = elevation.fixed();
            elem.push(XmlNode::value("zbottom", num(fixed.zbottom)));
            elem.push(XmlNode::value("zsurf", num(fixed.zsurf)));
        }
        ElevationMode::Variable => {
            let variable = elevation.variable();
            elem.push(XmlNode::value("zbottom", num(variable.zbottom)));
            elem.push(match variable.spec() {
                VariableElevationSpec::TimeList => {
                    XmlNode::new("zsurftimes").children(variable.times.iter().map(|row| {
                        XmlNode::new("timevalue")
                            .attr("time", num(row.time))
                            .attr("zsurf", num(row.value))
                    }))
                }
                VariableElevationSpec::File => {
                    XmlNode::new("zsurffile").attr("file", &variable.file)
                }
                VariableElevationSpec::MeshData => mesh_data(&variable.mesh_data),
            });
        }
        ElevationMode::Automatic => {
            let automatic = elevation.automatic();
            elem.push(XmlNode::value("zbottom", num(automatic.zbottom)));
            elem.push(XmlNode::value("zsurfmin", num(automatic.zsurf_min)));
            elem.push(point3("zsurfpoint", &automatic.point));
        }
    }
    elem.push(XmlNode::value("remove", elevation.remove_above()));
    Some(elem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_elevation_renders_nothing() {
        assert_eq!(render_elevation(&ElevationInfo::default()), None);
    }

    #[test]
    fn automatic_mode_lists_its_children() {
        let mut elevation = ElevationInfo::default();
        elevation.set_enabled(true);
        elevation.select_mode(ElevationMode::Automatic);

        let elem = render_elevation(&elevation).unwrap();
        assert_eq!(elem.get_attr("mode"), Some("2"));
        let names: Vec<&str> = elem.children.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["zbottom", "zsurfmin", "zsurfpoint", "remove"]);
    }
}
