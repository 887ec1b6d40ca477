use fold::*;
use std::error::Error;

pub use serde_json;

/// This is essentially `try_into` then `try_map` but the latter is nightly-only
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(coords)
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

fn field<'a>(json: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    json.get(name).filter(|value| !value.is_null())
}

/// Read the `name` field of `json` as an array of `D` numbers, `None` if it's absent.
fn float_array_field<const D: usize>(
    json: &serde_json::Value,
    name: &str,
) -> Result<Option<[Float; D]>, Box<dyn Error>> {
    field(json, name)
        .map(|value| {
            value
                .as_array()
                .and_then(|array| json_array_to_float_array(array))
                .ok_or_else(|| format!("{name} must be an array of {D} numbers").into())
        })
        .transpose()
}

fn vector_field(json: &serde_json::Value, name: &str) -> Result<Vector, Box<dyn Error>> {
    float_array_field::<3>(json, name)?
        .map(Vector::from)
        .ok_or_else(|| format!("Missing {name}").into())
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl JsonSer for Ray {
    /// Serialize a ray into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.pos.as_slice(),
            "direction": self.dir.as_slice(),
        })
    }
}

impl JsonDes for Ray {
    /// Deserialize a new ray from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [9., 8., 7.],
    ///     "direction": [9., 8., 7.], // (must have at least one non-zero value)
    /// }
    /// ```
    ///
    /// The direction is kept as is, not normalized.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let pos = vector_field(json, "origin")?;
        let dir = vector_field(json, "direction")?;

        if !(dir.norm() > precision::RESOLUTION) {
            return Err("ray direction must not be zero".into());
        }

        Ok(Self { pos, dir })
    }
}

impl JsonSer for Tilt {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!(<[Float; 3]>::from(*self))
    }
}

impl JsonDes for Tilt {
    /// An array of three angles in degrees: `[x, y, z]`.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        json.as_array()
            .and_then(|array| json_array_to_float_array::<3>(array))
            .map(Self::from)
            .ok_or_else(|| "tilt must be an array of 3 numbers".into())
    }
}

impl JsonSer for Extent {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!([self.lx, self.ly])
    }
}

impl JsonDes for Extent {
    /// An array of two lengths: `[lx, ly]`.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let [lx, ly] = json
            .as_array()
            .and_then(|array| json_array_to_float_array::<2>(array))
            .ok_or("extent must be an array of 2 numbers")?;

        if !(lx > 0. && ly > 0.) {
            return Err("extent must be positive".into());
        }

        Ok(Self::new(lx, ly))
    }
}

impl JsonSer for Frame {
    /// Serialize a frame into a JSON object.
    ///
    /// The axes are written out explicitly, so the result can be read back
    /// without knowing how the frame was built.
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin().as_slice(),
            "normal": self.normal().as_slice(),
            "x_dir": self.x_dir().as_slice(),
        })
    }
}

impl JsonDes for Frame {
    /// Deserialize a frame from a JSON object, in one of two forms.
    ///
    /// A placement, rotated about the frame's own axes (`"local"`, the default),
    /// or about the world axes (`"fixed"`):
    ///
    /// ```json
    /// {
    ///     "origin": [0., -250., 470.],
    ///     "tilt": [45., 180., 0.], // (optional, degrees, defaults to zeros)
    ///     "axes": "local" | "fixed", // (optional)
    /// }
    /// ```
    ///
    /// Or explicit axes:
    ///
    /// ```json
    /// {
    ///     "origin": [0., 0., 0.],
    ///     "normal": [0., 0., 1.],
    ///     "x_dir": [1., 0., 0.],
    /// }
    /// ```
    ///
    /// Fields of one form can't be mixed with the other.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let origin = vector_field(json, "origin")?;

        if field(json, "normal").is_some() {
            if field(json, "tilt").is_some() || field(json, "axes").is_some() {
                return Err("a frame is given either by its axes or by a tilt, not both".into());
            }
            let normal = vector_field(json, "normal")?;
            let x_dir = vector_field(json, "x_dir")?;
            return Ok(Self::try_from_axes(origin, normal, x_dir)?);
        }

        if field(json, "x_dir").is_some() {
            return Err("x_dir requires a normal".into());
        }

        let tilt = field(json, "tilt")
            .map(Tilt::from_json)
            .transpose()?
            .unwrap_or_default();

        let axes = field(json, "axes")
            .map(|value| value.as_str().ok_or("axes must be a string"))
            .transpose()?
            .unwrap_or("local");

        match axes {
            "local" => Ok(Self::new(origin, tilt)?),
            "fixed" => Ok(Self::with_fixed_axes(origin, tilt)?),
            other => Err(format!(r#"axes must be "local" or "fixed", not "{other}""#).into()),
        }
    }
}

impl JsonSer for Mirror {
    fn to_json(&self) -> serde_json::Value {
        let mut json = self.frame.to_json();
        json["extent"] = self.extent.to_json();
        json
    }
}

impl JsonDes for Mirror {
    /// A frame object (see [`Frame::from_json`]), with an optional
    /// `"extent": [lx, ly]` field, defaulting to `[150., 200.]`.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let frame = Frame::from_json(json)?;

        let extent = field(json, "extent")
            .map(Extent::from_json)
            .transpose()?
            .unwrap_or_default();

        Ok(Self::new(frame, extent))
    }
}

impl JsonSer for MirrorChain {
    fn to_json(&self) -> serde_json::Value {
        self.mirrors().to_json()
    }
}

impl JsonDes for MirrorChain {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        map_json_array(json, Mirror::from_json)
    }
}

/// Read a light source: either a ray, or the placement of a frame
/// whose boresight is the emitted ray.
pub fn source_from_json(json: &serde_json::Value) -> Result<Ray, Box<dyn Error>> {
    if field(json, "direction").is_some() {
        Ray::from_json(json)
    } else {
        Frame::from_json(json).map(|frame| frame.boresight_ray())
    }
}

/// A light source, a chain of mirrors, and the target the beam should land on.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    pub source: Ray,
    pub chain: MirrorChain,
    pub target: Mirror,
}

impl Setup {
    #[inline]
    pub fn evaluate(&self) -> fold::Result<Alignment> {
        self.chain.evaluate(&self.source, &self.target.frame)
    }
}

impl JsonSer for Setup {
    fn to_json(&self) -> serde_json::Value {
        serialize_setup(&self.source, &self.chain, &self.target)
    }
}

impl JsonDes for Setup {
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "source": // <a ray, or a frame placement, see `source_from_json`>,
    ///     "mirrors": [ /* mirror objects, see `Mirror::from_json` */ ],
    ///     "target": // <a mirror object>
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        deserialize_setup(json)
    }
}

pub fn serialize_setup(source: &Ray, chain: &MirrorChain, target: &Mirror) -> serde_json::Value {
    serde_json::json!({
        "source": source.to_json(),
        "mirrors": chain.to_json(),
        "target": target.to_json(),
    })
}

pub fn deserialize_setup(json: &serde_json::Value) -> Result<Setup, Box<dyn Error>> {
    let source = source_from_json(field(json, "source").ok_or("source field expected")?)?;

    let chain = field(json, "mirrors")
        .map(MirrorChain::from_json)
        .transpose()?
        .unwrap_or_default();

    let target = Mirror::from_json(field(json, "target").ok_or("target field expected")?)?;

    log::debug!("loaded a setup with {} mirrors", chain.len());

    Ok(Setup {
        source,
        chain,
        target,
    })
}

impl JsonSer for AngularDeviation {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "x": self.x, "y": self.y })
    }
}

impl JsonSer for PositionalDeviation {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "dx": self.dx, "dy": self.dy })
    }
}

impl JsonSer for Alignment {
    /// A report of the traced path and the deviations at the target.
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "path": self.path.bounces().to_json(),
            "hit": self.hit.as_slice(),
            "returned": self.returned.as_slice(),
            "angular_deviation": self.angle.to_json(),
            "positional_deviation": self.offset.to_json(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const E: Float = 1e-9;

    fn periscope() -> serde_json::Value {
        json!({
            "source": { "origin": [0, 0, 0], "tilt": [0, 0, 0] },
            "mirrors": [
                { "origin": [0, 0, 470], "tilt": [-45, 0, 0], "axes": "fixed" },
                { "origin": [0, -250, 470], "tilt": [45, 180, 0], "axes": "fixed", "extent": [100, 100] },
            ],
            "target": { "origin": [0, -250, 830] },
        })
    }

    #[test]
    fn periscope_setup() {
        let setup = deserialize_setup(&periscope()).unwrap();

        assert_eq!(setup.source, Ray::new([0., 0., 0.], [0., 0., 1.]));
        assert_eq!(setup.chain.len(), 2);
        assert_eq!(setup.chain.mirrors()[0].extent, Extent::default());
        assert_eq!(setup.chain.mirrors()[1].extent, Extent::new(100., 100.));

        let alignment = setup.evaluate().unwrap();
        assert!((alignment.hit - Vector::new(0., -250., 830.)).norm() < E);
        assert!(alignment.angle.x.abs() < E && alignment.angle.y.abs() < E);

        let report = alignment.to_json();
        assert_eq!(report["path"].as_array().unwrap().len(), 2);
        assert!(report["angular_deviation"]["x"].as_f64().unwrap().abs() < E);
    }

    #[test]
    fn axes_convention_is_honored() {
        let tilted = |axes| json!({ "origin": [0, 0, 0], "tilt": [45, 180, 0], "axes": axes });

        let local = Frame::from_json(&tilted("local")).unwrap();
        let fixed = Frame::from_json(&tilted("fixed")).unwrap();
        let default = Frame::from_json(&json!({ "origin": [0, 0, 0], "tilt": [45, 180, 0] })).unwrap();

        assert_eq!(local, default);
        assert!((local.normal().as_ref() - fixed.normal().as_ref()).norm() > 1.);
        assert!(Frame::from_json(&tilted("sideways")).is_err());
    }

    #[test]
    fn explicit_axes() {
        let frame = Frame::from_json(&json!({
            "origin": [1, 2, 3],
            "normal": [0, 0, 2],
            "x_dir": [1, 0, 1],
        }))
        .unwrap();

        assert!((frame.x_dir().as_ref() - Vector::x()).norm() < E);
        assert!((frame.y_dir().as_ref() - Vector::y()).norm() < E);

        assert!(Frame::from_json(&json!({
            "origin": [1, 2, 3],
            "normal": [0, 0, 2],
            "x_dir": [0, 0, 1],
        }))
        .is_err());

        // mixing both forms is ambiguous
        assert!(Frame::from_json(&json!({
            "origin": [1, 2, 3],
            "normal": [0, 0, 1],
            "x_dir": [1, 0, 0],
            "tilt": [10, 0, 0],
        }))
        .is_err());
        assert!(Frame::from_json(&json!({
            "origin": [1, 2, 3],
            "normal": [0, 0, 1],
            "x_dir": [1, 0, 0],
            "axes": "fixed",
        }))
        .is_err());
        assert!(Frame::from_json(&json!({ "origin": [1, 2, 3], "x_dir": [1, 0, 0] })).is_err());
    }

    #[test]
    fn mirrors_read_back() {
        let mirror = Mirror::new(
            Frame::new([10., -5., 3.], Tilt::new(12., -30., 7.)).unwrap(),
            Extent::new(20., 40.),
        );

        let read = Mirror::from_json(&mirror.to_json()).unwrap();

        assert_eq!(read.extent, mirror.extent);
        assert!((read.frame.origin() - mirror.frame.origin()).norm() < E);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert!((read.frame.axis(axis).as_ref() - mirror.frame.axis(axis).as_ref()).norm() < E);
        }
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(Ray::from_json(&json!({ "origin": [0, 0, 0], "direction": [0, 0, 0] })).is_err());
        assert!(Ray::from_json(&json!({ "origin": [0, 0], "direction": [0, 0, 1] })).is_err());
        assert!(Mirror::from_json(&json!({ "origin": [0, 0, 0], "extent": [1, -1] })).is_err());
        assert!(Mirror::from_json(&json!({ "origin": [0, 0, 0], "tilt": "up" })).is_err());

        let mut missing_target = periscope();
        missing_target["target"] = serde_json::Value::Null;
        assert!(deserialize_setup(&missing_target).is_err());
    }

    #[test]
    fn setup_without_mirrors_aims_the_source_at_the_target() {
        let setup = Setup::from_json(&json!({
            "source": { "origin": [1, 1, 0], "direction": [0, 0, 1] },
            "target": { "origin": [0, 0, 10] },
        }))
        .unwrap();

        assert!(setup.chain.is_empty());

        let alignment = setup.evaluate().unwrap();
        assert_eq!(alignment.offset, PositionalDeviation { dx: 1., dy: 1. });

        let again = deserialize_setup(&setup.to_json()).unwrap();
        assert_eq!(again.source, setup.source);
    }
}
