use super::xml::{num, XmlNode};
use crate::models::{
    AdvancedRotation, Direction, Direction2d, Direction3d, Point2, Point3, Rotation2d, Rotation3d,
    ZoneGenerator,
};

fn point2(name: &'static str, p: &Point2) -> XmlNode {
    XmlNode::new(name).attr("x", num(p.x)).attr("z", num(p.z))
}

pub(super) fn point3(name: &'static str, p: &Point3) -> XmlNode {
    XmlNode::new(name)
        .attr("x", num(p.x))
        .attr("y", num(p.y))
        .attr("z", num(p.z))
}

/// Adds the `direction` attribute unless the direction is custom, in which
/// case the vector is written as a child element instead.
fn with_direction(elem: XmlNode, direction: Direction) -> XmlNode {
    if direction == Direction::Custom {
        elem
    } else {
        elem.attr("direction", direction)
    }
}

fn orientation_2d(mut elem: XmlNode, direction: &Direction2d, rotation: &Rotation2d) -> XmlNode {
    if direction.direction == Direction::Custom {
        elem.push(point2("direction", &direction.custom));
    }
    if rotation.enabled {
        elem.push(
            XmlNode::new("rotate")
                .attr("angle", num(rotation.angle))
                .attr("anglesunits", rotation.units)
                .child(point2("center", &rotation.center)),
        );
    }
    elem
}

fn orientation_3d(mut elem: XmlNode, direction: &Direction3d, rotation: &Rotation3d) -> XmlNode {
    if direction.direction == Direction::Custom {
        elem.push(point3("direction", &direction.custom));
    }
    if rotation.enabled {
        elem.push(
            XmlNode::new("rotateaxis")
                .attr("angle", num(rotation.angle))
                .attr("anglesunits", rotation.units)
                .child(point3("point1", &rotation.axis_point1))
                .child(point3("point2", &rotation.axis_point2)),
        );
    }
    elem
}

fn advanced_rotation(mut elem: XmlNode, rotation: &Rotation3d) -> XmlNode {
    let AdvancedRotation {
        enabled,
        angles,
        center,
        intrinsic,
    } = &rotation.advanced;
    if *enabled {
        elem.push(
            XmlNode::new("rotateadv")
                .attr("anglex", num(angles.x))
                .attr("angley", num(angles.y))
                .attr("anglez", num(angles.z))
                .attr("anglesunits", rotation.units)
                .attr("intrinsic", intrinsic)
                .child(point3("center", center)),
        );
    }
    elem
}

/// The `zone2d` or `zone3d` element wrapping the zone's generator.
pub fn render_generator(generator: &ZoneGenerator) -> XmlNode {
    match generator {
        ZoneGenerator::Mk2d(g) => {
            let particles = with_direction(
                XmlNode::new("particles").attr("mkfluid", g.mkfluid),
                g.direction.direction,
            );
            XmlNode::new("zone2d").child(orientation_2d(particles, &g.direction, &g.rotation))
        }
        ZoneGenerator::Line(g) => XmlNode::new("zone2d").child(
            XmlNode::new("line")
                .attr("mkfluid", g.mkfluid)
                .child(point2("point", &g.point))
                .child(point2("point2", &g.point2)),
        ),
        ZoneGenerator::Mk3d(g) => {
            let particles = with_direction(
                XmlNode::new("particles").attr("mkfluid", g.mkfluid),
                g.direction.direction,
            );
            XmlNode::new("zone3d").child(orientation_3d(particles, &g.direction, &g.rotation))
        }
        ZoneGenerator::Box(g) => {
            let boxfluid = with_direction(
                XmlNode::new("boxfluid").attr("mkfluid", g.mkfluid),
                g.direction.direction,
            )
            .child(point3("point", &g.point))
            .child(point3("size", &g.size));
            let boxfluid = orientation_3d(boxfluid, &g.direction, &g.rotation);
            XmlNode::new("zone3d").child(advanced_rotation(boxfluid, &g.rotation))
        }
        ZoneGenerator::Circle(g) => {
            let circle = with_direction(
                XmlNode::new("circle").attr("mkfluid", g.mkfluid),
                g.direction.direction,
            )
            .child(point3("point", &g.point))
            .child(XmlNode::new("radius").attr("v", num(g.radius)));
            let circle = orientation_3d(circle, &g.direction, &g.rotation);
            XmlNode::new("zone3d").child(advanced_rotation(circle, &g.rotation))
        }
    }
}
