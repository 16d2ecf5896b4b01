//! Wavefront `.obj`/`.mtl` output (https://en.wikipedia.org/wiki/Wavefront_.obj_file)

use std::io::Write;

use log::{debug, trace, warn};

use crate::error::{FormatError, Result};
use crate::scene::{Face, Scene};

/// Writes one `newmtl` entry per material, with `map_Kd` for textured ones
pub fn write_mtl<W: Write>(out: &mut W, scene: &Scene) -> Result<()> {
    for material in &scene.materials {
        writeln!(out, "newmtl {}", material.name)?;

        if let Some(texture) = material.texture() {
            writeln!(out, "map_Kd {}", texture)?;
        }
    }

    Ok(())
}

/// Index of each object's first vertex in the combined vertex list, followed by the total count
pub fn vertex_offsets(scene: &Scene) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(scene.objects.len() + 1);
    let mut offset = 0;

    offsets.push(offset);
    for object in &scene.objects {
        offset += object.vertices.len();
        offsets.push(offset);
    }

    offsets
}

/// Writes the geometry of all objects, referencing the material library `mtl_name`.
///
/// All vertices come first so face indices are global; texture coordinates are written right
/// before the face using them, so their index keeps running across objects.
pub fn write_obj<W: Write>(out: &mut W, scene: &Scene, mtl_name: &str) -> Result<()> {
    let offsets = vertex_offsets(scene);
    let mut current_material: Option<usize> = None;
    let mut uv_index = 1;

    writeln!(out, "mtllib {}", mtl_name)?;

    for object in &scene.objects {
        for vertex in &object.vertices {
            writeln!(out, "v {:.6} {:.6} {:.6}", vertex.x, vertex.y, vertex.z)?;
        }
    }

    for (object, &offset) in scene.objects.iter().zip(&offsets) {
        writeln!(out, "o {}", object.name)?;
        writeln!(out, "g {}", object.name)?;

        for face in &object.faces {
            if face.vertex_count() < 2 {
                trace!("Skipping degenerate face in \"{}\"", object.name);
                continue;
            }

            // indices past a truncated vertex list would land in the next object
            if let Some(index) = face
                .vertices()
                .find(|&index| index as usize >= object.vertices.len())
            {
                warn!(
                    "Skipping face in \"{}\" referencing vertex {}, but only {} vertices exist",
                    object.name,
                    index,
                    object.vertices.len()
                );
                continue;
            }

            // an unset material keeps the active one, obj has no way to reset it
            if let Some(index) = face.material_index {
                if current_material != Some(index) {
                    let material = scene.materials.get(index).ok_or(
                        FormatError::MaterialOutOfRange {
                            index,
                            count: scene.materials.len(),
                        },
                    )?;
                    writeln!(out, "usemtl {}", material.name)?;
                    current_material = Some(index);
                }
            }

            uv_index += write_face(out, face, offset, uv_index)?;
        }
    }

    debug!(
        "Wrote {} vertices and {} texture coordinates",
        offsets.last().copied().unwrap_or_default(),
        uv_index - 1
    );

    Ok(())
}

// returns the number of texture coordinates written
fn write_face<W: Write>(
    out: &mut W,
    face: &Face,
    offset: usize,
    uv_index: usize,
) -> Result<usize> {
    match &face.texture_coordinates {
        Some(uvs) => {
            for [u, v] in uvs {
                writeln!(out, "vt {:.6} {:.6}", u, v)?;
            }

            write!(out, "f")?;
            for (i, vertex) in face.vertices().enumerate() {
                write!(out, " {}/{}", vertex as usize + 1 + offset, uv_index + i)?;
            }
            writeln!(out)?;

            Ok(uvs.len())
        }
        None => {
            write!(out, "f")?;
            for vertex in face.vertices() {
                write!(out, " {}", vertex as usize + 1 + offset)?;
            }
            writeln!(out)?;

            Ok(0)
        }
    }
}
