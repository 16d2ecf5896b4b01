use crate::error::Result;
use crate::parser;

/// Faces in a `.mqo` document reference at most this many vertices
pub const MAX_FACE_VERTICES: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub materials: Vec<Material>,
    pub objects: Vec<Object>,
}

impl Scene {
    /// Parses a `.mqo` text document, skipping malformed blocks
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(parser::parse(data)?.scene)
    }

    /// Distinct texture files referenced by the materials, in material order
    pub fn texture_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for file in self.materials.iter().filter_map(Material::texture) {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        files
    }

    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.vertices.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub name: String,
    /// empty if the material has no texture
    pub texture_file: String,
}

impl Material {
    pub fn texture(&self) -> Option<&str> {
        if self.texture_file.is_empty() {
            None
        } else {
            Some(&self.texture_file)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    /// object-local vertex indices; the first `None` ends the used slots
    pub vertex_indices: [Option<u32>; MAX_FACE_VERTICES],
    pub material_index: Option<usize>,
    /// one `[u, v]` pair per declared face vertex
    pub texture_coordinates: Option<Vec<[f32; 2]>>,
}

impl Face {
    /// Number of used vertex slots before the first empty one
    pub fn vertex_count(&self) -> usize {
        self.vertex_indices
            .iter()
            .position(Option::is_none)
            .unwrap_or(MAX_FACE_VERTICES)
    }

    pub fn vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.vertex_indices.iter().map_while(|index| *index)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_face_vertex_count() {
        let mut face = Face::default();
        assert_eq!(face.vertex_count(), 0);

        face.vertex_indices = [Some(3), Some(1), None, None];
        assert_eq!(face.vertex_count(), 2);
        assert_eq!(face.vertices().collect::<Vec<_>>(), vec![3, 1]);

        face.vertex_indices = [Some(0), Some(1), Some(2), Some(3)];
        assert_eq!(face.vertex_count(), 4);

        // a gap ends the used prefix
        face.vertex_indices = [Some(0), None, Some(2), Some(3)];
        assert_eq!(face.vertex_count(), 1);
        assert_eq!(face.vertices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_texture_files() {
        let scene = Scene {
            materials: vec![
                Material {
                    name: "a".into(),
                    texture_file: "wood.png".into(),
                },
                Material {
                    name: "b".into(),
                    texture_file: String::new(),
                },
                Material {
                    name: "c".into(),
                    texture_file: "wood.png".into(),
                },
                Material {
                    name: "d".into(),
                    texture_file: "tex/stone.bmp".into(),
                },
            ],
            ..Scene::default()
        };

        assert_eq!(scene.texture_files(), vec!["wood.png", "tex/stone.bmp"]);
        assert_eq!(scene.materials[1].texture(), None);
    }
}
