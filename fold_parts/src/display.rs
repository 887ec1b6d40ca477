use super::*;

/// Length of the `X` axis line drawn for a frame.
pub const X_AXIS_LENGTH: Float = 50.;
/// Length of the `Y` axis line drawn for a frame.
pub const Y_AXIS_LENGTH: Float = 100.;
/// Length of the arrow drawn for a ray.
pub const RAY_ARROW_LENGTH: Float = 50.;

/// A wrapper around a `Vec<T>` that only allows pushing and extending
#[derive(Clone, Debug, PartialEq)]
pub struct List<T>(Vec<T>);

impl<T> List<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    #[inline]
    pub fn push(&mut self, v: T) {
        self.0.push(v);
    }
}

impl<T> Default for List<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for List<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Something that can be drawn as a handful of [`Shape`]s.
#[impl_trait_for_tuples::impl_for_tuples(1, 16)]
pub trait Displayable {
    fn append_shapes(&self, list: &mut List<Shape>);
}

/// All the shapes drawing `item`.
pub fn shapes_of(item: &(impl Displayable + ?Sized)) -> Vec<Shape> {
    let mut list = List::new();
    item.append_shapes(&mut list);
    list.into_inner()
}

impl Displayable for Shape {
    fn append_shapes(&self, list: &mut List<Shape>) {
        list.push(self.clone());
    }
}

impl Displayable for Frame {
    /// The origin, and the `X` and `Y` axes, drawn with different lengths to tell them apart.
    fn append_shapes(&self, list: &mut List<Shape>) {
        let o = *self.origin();
        list.extend([
            Shape::Point(o),
            Shape::segment(o, o + self.x_dir().as_ref() * X_AXIS_LENGTH),
            Shape::segment(o, o + self.y_dir().as_ref() * Y_AXIS_LENGTH),
        ]);
    }
}

impl Displayable for Mirror {
    fn append_shapes(&self, list: &mut List<Shape>) {
        list.push(Shape::Face(self.corners().to_vec()));
        self.frame.append_shapes(list);
    }
}

impl Displayable for MirrorChain {
    fn append_shapes(&self, list: &mut List<Shape>) {
        self.mirrors().append_shapes(list);
    }
}

impl Displayable for Ray {
    /// An arrow of fixed length, pointing along the ray.
    ///
    /// Rays with a zero direction are drawn as a point.
    fn append_shapes(&self, list: &mut List<Shape>) {
        list.push(match self.dir.try_normalize(precision::RESOLUTION) {
            Some(dir) => Shape::arrow(self.pos, self.pos + dir * RAY_ARROW_LENGTH),
            None => Shape::Point(self.pos),
        });
    }
}

impl Displayable for TracedPath {
    /// One segment per leg between reflection points, then the final ray.
    fn append_shapes(&self, list: &mut List<Shape>) {
        let points: Vec<_> = self.points().collect();
        list.extend(points.windows(2).map(|leg| Shape::segment(leg[0], leg[1])));
        self.final_ray().append_shapes(list);
    }
}

impl<T: Displayable> Displayable for [T] {
    fn append_shapes(&self, list: &mut List<Shape>) {
        self.iter().for_each(|a| a.append_shapes(list));
    }
}

impl<T: Displayable + ?Sized> Displayable for Box<T> {
    fn append_shapes(&self, list: &mut List<Shape>) {
        self.as_ref().append_shapes(list);
    }
}

impl<T: Displayable> Displayable for Vec<T> {
    fn append_shapes(&self, list: &mut List<Shape>) {
        self.as_slice().append_shapes(list);
    }
}

impl<T: Displayable + ?Sized> Displayable for &T {
    fn append_shapes(&self, list: &mut List<Shape>) {
        (**self).append_shapes(list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_axes_have_distinct_lengths() {
        let shapes = shapes_of(&Frame::world([1., 2., 3.]));

        assert_eq!(
            shapes,
            [
                Shape::Point(Vector::new(1., 2., 3.)),
                Shape::segment([1., 2., 3.], [51., 2., 3.]),
                Shape::segment([1., 2., 3.], [1., 102., 3.]),
            ]
        );
    }

    #[test]
    fn rays_are_fixed_length_arrows() {
        let shapes = shapes_of(&Ray::new([0., 0., 0.], [0., 0., 7.]));
        assert_eq!(shapes, [Shape::arrow([0., 0., 0.], [0., 0., 50.])]);

        let shapes = shapes_of(&Ray::new([1., 0., 0.], [0., 0., 0.]));
        assert_eq!(shapes, [Shape::Point(Vector::x())]);
    }

    #[test]
    fn tuples_and_collections_concatenate() {
        let mirror = Mirror::from(Frame::world([0., 0., 10.]));
        let ray = Ray::new([0., 0., 0.], [0., 0., 1.]);

        let marker: Box<dyn Displayable> = Box::new(Shape::Point(Vector::z()));

        let shapes = shapes_of(&(mirror, vec![ray, ray], &ray, marker));

        assert_eq!(shapes.len(), 4 + 3 + 1);
        assert_eq!(shapes[7], Shape::Point(Vector::z()));
        assert!(matches!(shapes[0], Shape::Face(ref v) if v.len() == 4));
    }

    #[test]
    fn traced_path_legs() {
        let chain = MirrorChain::from_frames([
            Frame::new([0., 0., 470.], Tilt::about_x(-45.)).unwrap(),
            Frame::new([0., -250., 470.], Tilt::new(45., 180., 0.)).unwrap(),
        ]);
        let path = chain.trace(&Ray::new([0., 0., 0.], [0., 0., 1.])).unwrap();

        let shapes = shapes_of(&path);

        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[0], Shape::Segment(_)));
        assert!(matches!(shapes[2], Shape::Arrow { .. }));
    }
}
