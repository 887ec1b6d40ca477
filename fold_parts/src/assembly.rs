use super::*;
use core::fmt;
use std::path::{Path, PathBuf};

/// An entry of an [`Assembly`].
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryNode {
    Shape(Shape),
    SubAssembly(Assembly),
}

impl From<Shape> for GeometryNode {
    #[inline]
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<Assembly> for GeometryNode {
    #[inline]
    fn from(assembly: Assembly) -> Self {
        Self::SubAssembly(assembly)
    }
}

impl GeometryNode {
    /// Push every shape under this node, labelled with its path from `prefix`.
    fn collect_shapes<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Shape)>) {
        match self {
            Self::Shape(shape) => out.push((prefix.to_owned(), shape)),
            Self::SubAssembly(assembly) => {
                for (name, node) in assembly.iter() {
                    node.collect_shapes(&format!("{prefix}/{name}"), out);
                }
            }
        }
    }
}

/// A name-indexed collection of geometry, iterated in insertion order.
///
/// Names are unique: inserting under an existing name replaces the node in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assembly {
    nodes: Vec<(String, GeometryNode)>,
}

impl Assembly {
    #[inline]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|(n, _)| n == name)
    }

    /// Returns the node previously stored under `name`, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        node: impl Into<GeometryNode>,
    ) -> Option<GeometryNode> {
        let name = name.into();
        let node = node.into();

        match self.position(&name) {
            Some(i) => Some(core::mem::replace(&mut self.nodes[i].1, node)),
            None => {
                self.nodes.push((name, node));
                None
            }
        }
    }

    /// Add `node` under `name`, or under the first free `part_<n>`, starting at
    /// `n = self.len()`. Returns the name used.
    pub fn add_part(&mut self, node: impl Into<GeometryNode>, name: Option<&str>) -> String {
        let name = match name {
            Some(name) => name.to_owned(),
            None => (self.len()..)
                .map(|n| format!("part_{n}"))
                .find(|candidate| self.position(candidate).is_none())
                .unwrap_or_default(),
        };

        self.insert(name.clone(), node);
        name
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&GeometryNode> {
        self.position(name).map(|i| &self.nodes[i].1)
    }

    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut GeometryNode> {
        self.position(name).map(|i| &mut self.nodes[i].1)
    }

    /// Remove the node stored under `name`, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<GeometryNode> {
        self.position(name).map(|i| self.nodes.remove(i).1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeometryNode)> + '_ {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|(name, _)| name.as_str())
    }

    /// Every shape in this assembly and its sub-assemblies, depth first,
    /// labelled with its `/`-separated path.
    pub fn shapes(&self) -> Vec<(String, &Shape)> {
        let mut out = Vec::new();
        for (name, node) in self.iter() {
            node.collect_shapes(name, &mut out);
        }
        out
    }

    /// Hand every shape to `viewer`, in order.
    pub fn display(&self, viewer: &mut (impl Viewer + ?Sized)) {
        for (label, shape) in self.shapes() {
            viewer.show(&label, shape);
        }
    }

    /// Write the assembly through `exporter`.
    ///
    /// With `single_export`, every shape goes to `path`. Otherwise, each
    /// top-level node goes to its own file, named `<stem>_<name>.<ext>`
    /// next to `path`. Returns the paths written, in order.
    pub fn write(
        &self,
        exporter: &mut (impl Exporter + ?Sized),
        path: &Path,
        single_export: bool,
    ) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        if single_export {
            let shapes: Vec<_> = self.shapes().into_iter().map(|(_, s)| s.clone()).collect();
            exporter.export(&shapes, path)?;
            return Ok(vec![path.to_owned()]);
        }

        let stem = path
            .file_stem()
            .ok_or("export path must name a file")?
            .to_string_lossy();

        self.iter()
            .map(|(name, node)| -> Result<PathBuf, Box<dyn Error>> {
                let mut file_name = format!("{stem}_{name}");
                if let Some(ext) = path.extension() {
                    file_name.push('.');
                    file_name.push_str(&ext.to_string_lossy());
                }
                let part_path = path.with_file_name(file_name);

                let mut labelled = Vec::new();
                node.collect_shapes(name, &mut labelled);
                let shapes: Vec<_> = labelled.into_iter().map(|(_, s)| s.clone()).collect();

                exporter.export(&shapes, &part_path)?;
                Ok(part_path)
            })
            .collect()
    }
}

impl fmt::Display for Assembly {
    /// The list of top-level names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
