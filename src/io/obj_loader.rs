use crate::core::error::SceneParseError;
use crate::scene::graph::{
    ImportOptions, SceneGraph, SceneNode, SceneParser, SourceMaterial, SourceMesh, TextureSlot,
};
use log::{debug, info, warn};
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// Wavefront OBJ/MTL scene parser backed by `tobj`.
///
/// OBJ has no node hierarchy, so the graph is a root node named after the
/// file with one child per object/group.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjSceneParser;

impl SceneParser for ObjSceneParser {
    fn parse(&self, path: &Path, options: &ImportOptions) -> Result<SceneGraph, SceneParseError> {
        if !path.exists() {
            return Err(SceneParseError::NotFound(path.to_path_buf()));
        }

        info!("Loading OBJ file: {:?}", path);

        let load_options = tobj::LoadOptions {
            triangulate: options.triangulate,
            single_index: true, // Unifies indices for Position/Normal/UV
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };

        let (models, materials) =
            tobj::load_obj(path, &load_options).map_err(|e| SceneParseError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let materials = match materials {
            Ok(mats) => mats,
            Err(e) => {
                warn!("Failed to load materials for {:?}: {}", path, e);
                Vec::new()
            }
        };

        let root_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut root = SceneNode::new(root_name);
        let mut meshes = Vec::with_capacity(models.len());

        for model in &models {
            let mesh = convert_mesh(model, options);
            debug!(
                "OBJ object '{}': {} vertices, {} faces",
                mesh.name,
                mesh.positions.len(),
                mesh.faces.len()
            );
            let mut node = SceneNode::new(model.name.clone());
            node.meshes.push(meshes.len());
            root.children.push(node);
            meshes.push(mesh);
        }

        info!(
            "OBJ parsed: {} objects, {} materials",
            meshes.len(),
            materials.len()
        );

        Ok(SceneGraph {
            root: Some(root),
            meshes,
            materials: materials.iter().map(convert_material).collect(),
            incomplete: false,
        })
    }
}

fn convert_material(mat: &tobj::Material) -> SourceMaterial {
    let diffuse_color = mat
        .diffuse
        .map(|[r, g, b]| [r, g, b, mat.dissolve.unwrap_or(1.0)]);

    let textures = [
        (TextureSlot::Diffuse, &mat.diffuse_texture),
        (TextureSlot::Specular, &mat.specular_texture),
        (TextureSlot::Height, &mat.normal_texture),
        (TextureSlot::Ambient, &mat.ambient_texture),
    ]
    .into_iter()
    .filter_map(|(slot, tex)| tex.as_ref().map(|path| (slot, path.clone())))
    .collect();

    SourceMaterial {
        name: mat.name.clone(),
        diffuse_color,
        textures,
    }
}

fn convert_mesh(model: &tobj::Model, options: &ImportOptions) -> SourceMesh {
    let mesh = &model.mesh;

    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    let normals: Vec<[f32; 3]> = mesh
        .normals
        .chunks_exact(3)
        .map(|n| [n[0], n[1], n[2]])
        .collect();

    let texcoords: Option<Vec<[f32; 2]>> = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| {
                if options.flip_uvs {
                    [t[0], 1.0 - t[1]]
                } else {
                    [t[0], t[1]]
                }
            })
            .collect()
    });

    let faces = split_faces(&mesh.indices, &mesh.face_arities);

    let (tangents, bitangents) = match &texcoords {
        Some(uvs) if options.calc_tangent_space => compute_tangent_space(&positions, uvs, &faces),
        _ => (Vec::new(), Vec::new()),
    };

    SourceMesh {
        name: model.name.clone(),
        positions,
        normals,
        texcoords,
        tangents,
        bitangents,
        faces,
        material_index: mesh.material_id.unwrap_or(usize::MAX),
    }
}

/// `face_arities` is empty when every face is a triangle.
fn split_faces(indices: &[u32], face_arities: &[u32]) -> Vec<Vec<u32>> {
    if face_arities.is_empty() {
        return indices.chunks_exact(3).map(<[u32]>::to_vec).collect();
    }

    let mut faces = Vec::with_capacity(face_arities.len());
    let mut start = 0usize;
    for &arity in face_arities {
        let end = (start + arity as usize).min(indices.len());
        faces.push(indices[start..end].to_vec());
        start = end;
    }
    faces
}

/// Per-vertex tangents and bitangents accumulated from every triangle that
/// uses the vertex, then normalised. Degenerate UV triangles contribute
/// nothing.
pub fn compute_tangent_space(
    positions: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    faces: &[Vec<u32>],
) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let mut tangents = vec![Vector3::<f32>::zeros(); positions.len()];
    let mut bitangents = vec![Vector3::<f32>::zeros(); positions.len()];

    for face in faces.iter().filter(|f| f.len() == 3) {
        let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let in_range = |i: usize| i < positions.len() && i < texcoords.len();
        if !(in_range(i0) && in_range(i1) && in_range(i2)) {
            continue;
        }

        let p0 = Vector3::from(positions[i0]);
        let e1 = Vector3::from(positions[i1]) - p0;
        let e2 = Vector3::from(positions[i2]) - p0;

        let uv0 = Vector2::from(texcoords[i0]);
        let d1 = Vector2::from(texcoords[i1]) - uv0;
        let d2 = Vector2::from(texcoords[i2]) - uv0;

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < 1e-12 {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (e1 * d2.y - e2 * d1.y) * r;
        let bitangent = (e2 * d1.x - e1 * d2.x) * r;

        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    let finish = |v: Vector3<f32>| -> [f32; 3] {
        let n = v.norm();
        if n > 1e-8 { (v / n).into() } else { [0.0; 3] }
    };

    (
        tangents.into_iter().map(finish).collect(),
        bitangents.into_iter().map(finish).collect(),
    )
}
