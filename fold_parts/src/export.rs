use super::*;
use fold_json::{serde_json, JsonSer, Setup};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Something that shows shapes on screen.
pub trait Viewer {
    fn show(&mut self, label: &str, shape: &Shape);
}

/// Something that writes shapes to a file.
pub trait Exporter {
    fn export(&mut self, shapes: &[Shape], path: &Path) -> Result<(), Box<dyn Error>>;
}

impl<T: Viewer + ?Sized> Viewer for &mut T {
    fn show(&mut self, label: &str, shape: &Shape) {
        (**self).show(label, shape);
    }
}

impl<T: Exporter + ?Sized> Exporter for &mut T {
    fn export(&mut self, shapes: &[Shape], path: &Path) -> Result<(), Box<dyn Error>> {
        (**self).export(shapes, path)
    }
}

/// A viewer that keeps what it is shown, e.g. to serialize it afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    items: Vec<(String, Shape)>,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn items(&self) -> &[(String, Shape)] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Viewer for Scene {
    fn show(&mut self, label: &str, shape: &Shape) {
        log::trace!("showing {} {label}", shape.kind());
        self.items.push((label.to_owned(), shape.clone()));
    }
}

impl JsonSer for Scene {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.items.iter().map(|(label, shape)| {
            let mut json = shape.to_json();
            json["label"] = label.as_str().into();
            json
        })))
    }
}

/// Writes shapes as a pretty-printed JSON array.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&mut self, shapes: &[Shape], path: &Path) -> Result<(), Box<dyn Error>> {
        log::info!("writing {} shapes to {}", shapes.len(), path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &shapes.to_json())?;
        writer.flush()?;
        Ok(())
    }
}

/// Everything there is to draw about `setup`, traced or not.
///
/// The source, each mirror and the target (with its boresight) get their own sub-assembly. When
/// `alignment` is given, the beam path is added under `"beam"`.
pub fn setup_assembly(setup: &Setup, alignment: Option<&Alignment>) -> Assembly {
    fn part(item: &(impl Displayable + ?Sized)) -> Assembly {
        let mut assembly = Assembly::new();
        for shape in shapes_of(item) {
            assembly.add_part(shape, None);
        }
        assembly
    }

    let mut assembly = Assembly::new();

    assembly.insert("source", part(&setup.source));

    for (i, mirror) in setup.chain.mirrors().iter().enumerate() {
        assembly.insert(format!("mirror_{i}"), part(mirror));
    }

    let target = (setup.target, setup.target.frame.boresight_ray());
    assembly.insert("target", part(&target));

    if let Some(alignment) = alignment {
        let mut beam = part(&alignment.path);
        beam.insert(
            "to_target",
            Shape::segment(alignment.path.final_ray().pos, alignment.hit),
        );
        assembly.insert("beam", beam);
    }

    assembly
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Remembers what it was asked to write.
    #[derive(Default)]
    struct Recorder(Vec<(PathBuf, usize)>);

    impl Exporter for Recorder {
        fn export(&mut self, shapes: &[Shape], path: &Path) -> Result<(), Box<dyn Error>> {
            self.0.push((path.to_owned(), shapes.len()));
            Ok(())
        }
    }

    fn lines() -> Assembly {
        let (p0, p1, p2) = (Vector::zeros(), Vector::z(), Vector::y() + Vector::z());

        let mut assembly = Assembly::new();
        assembly.insert("line_1", Shape::segment(p0, p1));
        assembly.insert("line_2", Shape::segment(p1, p2));
        assembly.insert("line_3", Shape::segment(p2, p0));
        assembly
    }

    #[test]
    fn single_export_writes_one_file() {
        let mut recorder = Recorder::default();

        let written = lines()
            .write(&mut recorder, Path::new("out/lines.stp"), true)
            .unwrap();

        assert_eq!(written, [PathBuf::from("out/lines.stp")]);
        assert_eq!(recorder.0, [(PathBuf::from("out/lines.stp"), 3)]);
    }

    #[test]
    fn split_export_writes_one_file_per_part() {
        let mut recorder = Recorder::default();

        let written = lines()
            .write(&mut recorder, Path::new("out/lines.stp"), false)
            .unwrap();

        assert_eq!(
            written,
            [
                PathBuf::from("out/lines_line_1.stp"),
                PathBuf::from("out/lines_line_2.stp"),
                PathBuf::from("out/lines_line_3.stp"),
            ]
        );
        assert!(recorder.0.iter().all(|(_, n)| *n == 1));
    }

    #[test]
    fn scene_collects_labelled_shapes() {
        let mut scene = Scene::new();
        lines().display(&mut scene);

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.items()[2].0, "line_3");
        assert_eq!(scene.to_json()[0]["label"], "line_1");
    }

    #[test]
    fn traced_setup_assembly() {
        let target = Mirror::from(Frame::world([0., -250., 830.]));
        let setup = Setup {
            source: Ray::new([0., 0., 0.], [0., 0., 1.]),
            chain: MirrorChain::from_frames([
                Frame::with_fixed_axes([0., 0., 470.], Tilt::about_x(-45.)).unwrap(),
                Frame::with_fixed_axes([0., -250., 470.], Tilt::new(45., 180., 0.)).unwrap(),
            ]),
            target,
        };
        let alignment = setup.evaluate().unwrap();

        let assembly = setup_assembly(&setup, Some(&alignment));

        assert_eq!(
            assembly.names().collect::<Vec<_>>(),
            ["source", "mirror_0", "mirror_1", "target", "beam"]
        );

        // face, origin and two axes
        let Some(GeometryNode::SubAssembly(mirror)) = assembly.get("mirror_1") else {
            panic!("mirror_1 should be a sub-assembly");
        };
        assert_eq!(mirror.len(), 4);

        let Some(GeometryNode::SubAssembly(beam)) = assembly.get("beam") else {
            panic!("beam should be a sub-assembly");
        };
        // two legs, the final arrow, and the leg to the target
        assert_eq!(beam.len(), 4);
        assert_eq!(
            beam.get("to_target"),
            Some(&GeometryNode::Shape(Shape::segment(
                alignment.path.final_ray().pos,
                alignment.hit
            )))
        );

        assert_eq!(setup_assembly(&setup, None).len(), 4);
    }

    #[test]
    fn json_export_to_disk() {
        let dir = std::env::temp_dir().join(format!("fold_parts_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let written = lines()
            .write(&mut JsonExporter, &dir.join("lines.json"), false)
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_reader(File::open(&written[1]).unwrap()).unwrap();
        assert_eq!(json[0]["type"], "segment");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn json_export_reports_a_failed_write() {
        let result =
            JsonExporter.export(&[Shape::Point(Vector::zeros())], Path::new("/dev/full"));
        assert!(result.is_err());

        let written = lines().write(&mut JsonExporter, Path::new("/dev/full"), true);
        assert!(written.is_err());
    }
}
