use super::*;

/// Pointing error of a beam, in degrees, decomposed along a target frame's axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AngularDeviation {
    /// Angle measured in the plane spanned by the target's `Y` axis and normal,
    /// i.e. the tilt about the target's `X` axis
    pub x: Float,
    /// Angle measured in the plane spanned by the target's `X` axis and normal,
    /// i.e. the tilt about the target's `Y` axis
    pub y: Float,
}

/// Offset of a point from a target frame's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionalDeviation {
    pub dx: Float,
    pub dy: Float,
}

/// Project `v`, drawn from the plane's origin, onto the plane.
fn projected(plane: &Plane, v: &Vector) -> Result<Vector> {
    let len = v.norm();
    if !(len > precision::RESOLUTION) {
        return Err(Error::DegenerateGeometry(Degeneracy::ZeroDirection));
    }

    let o = plane.origin();
    let p = plane.project_point(&(o + v)) - o;

    if p.norm() <= precision::ANGULAR * len {
        return Err(Error::DegenerateGeometry(Degeneracy::ZeroProjection));
    }

    Ok(p)
}

fn projected_angle(plane: &Plane, a: &Vector, b: &Vector) -> Result<Float> {
    let a = projected(plane, a)?;
    let b = projected(plane, b)?;

    // better conditioned than `acos` near 0 and 180 degrees
    Ok(a.cross(&b).norm().atan2(a.dot(&b)).to_degrees())
}

/// Angles (degrees, in `[0, 180]`) between `incoming` and `reference` once
/// both are projected on each of `target`'s two reference planes.
///
/// Fails if either vector is zero, or normal to one of the planes.
pub fn angular_deviation(
    target: &Frame,
    incoming: &Vector,
    reference: &Vector,
) -> Result<AngularDeviation> {
    let o = *target.origin();

    let about_x = Plane::from_unit(o, *target.x_dir());
    let about_y = Plane::from_unit(o, *target.y_dir());

    Ok(AngularDeviation {
        x: projected_angle(&about_x, incoming, reference)?,
        y: projected_angle(&about_y, incoming, reference)?,
    })
}

/// The world `X` and `Y` components of `point - target.origin()`.
///
/// The offset is deliberately not expressed in the target's own axes;
/// see [`local_positional_deviation`] for that.
#[inline]
#[must_use]
pub fn positional_deviation(target: &Frame, point: &Vector) -> PositionalDeviation {
    let d = point - target.origin();
    PositionalDeviation { dx: d.x, dy: d.y }
}

/// The offset of `point` from `target`'s origin, along `target`'s own `X` and `Y` axes.
#[inline]
#[must_use]
pub fn local_positional_deviation(target: &Frame, point: &Vector) -> PositionalDeviation {
    let local = target.to_local(point);
    PositionalDeviation {
        dx: local.x,
        dy: local.y,
    }
}

/// How a traced beam lands on a target.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    /// The rays leaving each mirror of the chain
    pub path: TracedPath,
    /// Where the final ray crosses the target plane
    pub hit: Vector,
    /// The final ray, bounced off the target plane, then reversed
    pub returned: Vector,
    /// Deviation of `returned` from the target's boresight
    pub angle: AngularDeviation,
    /// Deviation of `hit` from the target's origin, along the world axes
    pub offset: PositionalDeviation,
}

/// Trace `ray` through `mirrors`, then measure it against `target`.
///
/// The final ray is bounced off the target's plane, and the reversed outgoing
/// direction is compared with the target's boresight using
/// [`angular_deviation`]. The crossing point is compared with the target's
/// origin using [`positional_deviation`].
pub fn evaluate<M: Reflect>(mirrors: &[M], ray: &Ray, target: &Frame) -> Result<Alignment> {
    let path = trace(mirrors, ray)?;

    let at_target = target.reflect(&path.final_ray())?.reversed();

    let angle = angular_deviation(target, &at_target.dir, target.normal().as_ref())?;
    let offset = positional_deviation(target, &at_target.pos);

    log::debug!("beam lands at {:?}: {angle:?}, {offset:?}", at_target.pos);

    Ok(Alignment {
        path,
        hit: at_target.pos,
        returned: at_target.dir,
        angle,
        offset,
    })
}
