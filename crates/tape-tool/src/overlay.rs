//! Overlay geometry: the measurement arrow and pick markers.

use crate::host::{Camera, Color, DrawCommand, LineStyle};
use tape_math::{Axes, Axis, Point3, Tolerance, Vec3};
use tape_pick::{PickPoint, PickSource};

/// Color of a line from `a` to `b`: the axis color when the line is parallel
/// to a model axis, black otherwise.
pub fn axis_color(axes: &Axes, a: &Point3, b: &Point3) -> Color {
    match axes.parallel_axis(&(b - a), &Tolerance::DEFAULT) {
        Some(axis) => color_of(axis),
        None => Color::BLACK,
    }
}

/// Conventional color of a model axis.
pub fn color_of(axis: Axis) -> Color {
    match axis {
        Axis::X => Color::RED,
        Axis::Y => Color::GREEN,
        Axis::Z => Color::BLUE,
    }
}

/// A double headed arrow from `start` to `end`.
///
/// `head_size` gives the world length of an arrowhead at a tip, so heads keep
/// a constant on-screen size. Returns nothing when the endpoints coincide.
pub fn arrow(
    start: &Point3,
    end: &Point3,
    camera: &Camera,
    head_size: impl Fn(&Point3) -> f64,
    style: LineStyle,
) -> Vec<DrawCommand> {
    if start == end {
        return Vec::new();
    }

    let vector = end - start;
    let mut commands = vec![DrawCommand::Lines {
        points: vec![*start, *end],
        style,
    }];
    for (tip, direction) in [(start, -vector), (end, vector)] {
        if let Some(points) = arrow_head(tip, &direction, camera, head_size(tip)) {
            commands.push(DrawCommand::LineStrip {
                points: points.to_vec(),
                style,
            });
        }
    }
    commands
}

/// The three points of an arrowhead at `tip` pointing along `direction`.
///
/// The head lies in the plane facing the camera: its barbs sit either side
/// of the arrow's on-screen direction, swept back by `offset`. `None` when
/// the arrow points straight at the camera and has no on-screen direction.
pub fn arrow_head(tip: &Point3, direction: &Vec3, camera: &Camera, offset: f64) -> Option<[Point3; 3]> {
    let reference = if camera.perspective {
        tip - camera.eye
    } else {
        camera.direction
    };

    let direction = direction.try_normalize(f64::EPSILON)?;
    let perp = direction.cross(&reference).try_normalize(f64::EPSILON)?;
    let flattened = reference.cross(&perp).try_normalize(f64::EPSILON)?;

    let barb = |side: f64| -> Option<Point3> {
        let v = (perp * side - flattened).try_normalize(f64::EPSILON)?;
        Some(tip + v * offset)
    };
    Some([barb(1.0)?, *tip, barb(-1.0)?])
}

/// Marker for a valid pick, colored by what the pick lies on.
pub fn marker(pick: &PickPoint, size: f64) -> Option<DrawCommand> {
    let position = pick.position()?;
    let color = match (pick.axis(), pick.source()) {
        (Some(axis), _) => color_of(axis),
        (None, PickSource::Edge(_)) => Color::MAGENTA,
        (None, PickSource::Face(_)) => Color::BLUE,
        (None, _) => Color::BLACK,
    };
    Some(DrawCommand::Marker {
        position,
        size,
        color,
    })
}
