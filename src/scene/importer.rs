//! Scene-graph traversal that turns a parsed scene into a [`Model`].

use crate::core::error::{ImportError, SceneParseError};
use crate::core::geometry::Vertex;
use crate::scene::graph::{
    ImportOptions, SceneGraph, SceneNode, SceneParser, SourceMaterial, SourceMesh, TextureSlot,
};
use crate::scene::mesh::MeshRecord;
use crate::scene::model::Model;
use crate::scene::texture::{ImageDecoder, TextureCache, TextureKind, TextureRef};
use crate::scene::windows::WindowNames;
use log::{debug, error, info, warn};
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::path::Path;

/// Material slot each texture kind is read from, in binding order.
///
/// Normal maps come from the height (bump) slot and height maps from the
/// ambient slot. Scene assets are authored against this mapping.
const TEXTURE_SOURCES: [(TextureSlot, TextureKind); 4] = [
    (TextureSlot::Diffuse, TextureKind::Diffuse),
    (TextureSlot::Specular, TextureKind::Specular),
    (TextureSlot::Height, TextureKind::Normal),
    (TextureSlot::Ambient, TextureKind::Height),
];

/// Loads model files through the parser and decoder services and splits
/// their meshes into structural and window groups.
pub struct ModelImporter<'a> {
    parser: &'a dyn SceneParser,
    decoder: &'a dyn ImageDecoder,
    window_names: &'a WindowNames,
    options: ImportOptions,
}

impl<'a> ModelImporter<'a> {
    pub fn new(
        parser: &'a dyn SceneParser,
        decoder: &'a dyn ImageDecoder,
        window_names: &'a WindowNames,
    ) -> Self {
        Self {
            parser,
            decoder,
            window_names,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Loads `path` and tags the result with `id`.
    pub fn load<P: AsRef<Path>>(&self, path: P, id: u8) -> Result<Model, ImportError> {
        let path = path.as_ref();
        info!("Loading model {:?} (id {})", path, id);

        let scene = self.parser.parse(path, &self.options)?;
        if scene.incomplete {
            return Err(SceneParseError::Incomplete(path.to_path_buf()).into());
        }
        let root = scene
            .root
            .as_ref()
            .ok_or_else(|| SceneParseError::NoRoot(path.to_path_buf()))?;

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let mut model = Model::empty(id, directory);
        self.process_node(root, &scene, &mut model)?;

        info!(
            "Model {:?} loaded: {} meshes, {} windows, {} textures",
            path,
            model.meshes.len(),
            model.windows.len(),
            model.textures.loaded().len()
        );
        Ok(model)
    }

    /// Like [`ModelImporter::load`], but a scene that cannot be parsed is
    /// logged and replaced by an empty model. Fatal texture errors still
    /// propagate.
    pub fn load_or_empty<P: AsRef<Path>>(&self, path: P, id: u8) -> Result<Model, ImportError> {
        let path = path.as_ref();
        match self.load(path, id) {
            Ok(model) => Ok(model),
            Err(ImportError::SceneParse(e)) => {
                error!("Failed to load model {:?}: {}", path, e);
                let directory = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Model::empty(id, directory))
            }
            Err(e) => Err(e),
        }
    }

    fn process_node(
        &self,
        node: &SceneNode,
        scene: &SceneGraph,
        model: &mut Model,
    ) -> Result<(), ImportError> {
        for &mesh_index in &node.meshes {
            let Some(mesh) = scene.meshes.get(mesh_index) else {
                warn!(
                    "Node '{}' references missing mesh {} (scene has {})",
                    node.name,
                    mesh_index,
                    scene.meshes.len()
                );
                continue;
            };

            let record = self.process_mesh(mesh, scene, model)?;
            if self.window_names.is_window(&record.name) {
                debug!("Mesh '{}' classified as window", record.name);
                model.windows.push(record);
            } else {
                model.meshes.push(record);
            }
        }

        for child in &node.children {
            self.process_node(child, scene, model)?;
        }
        Ok(())
    }

    fn process_mesh(
        &self,
        mesh: &SourceMesh,
        scene: &SceneGraph,
        model: &mut Model,
    ) -> Result<MeshRecord, ImportError> {
        let material = scene.materials.get(mesh.material_index);

        let (color, use_diffuse_texture) = match material {
            Some(mat) => (
                mat.diffuse_color
                    .map(Vector4::from)
                    .unwrap_or(Vector4::new(1.0, 1.0, 1.0, 1.0)),
                if mat.texture_count(TextureSlot::Diffuse) > 0 { 1.0 } else { 0.0 },
            ),
            None => (Vector4::new(1.0, 1.0, 1.0, 1.0), 0.0),
        };

        let has_normals = mesh.normals.len() == mesh.positions.len();
        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 1, 0).",
                mesh.name
            );
        }

        let vertices = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let normal = if has_normals {
                    Vector3::from(mesh.normals[i])
                } else {
                    Vector3::y()
                };
                let mut vertex = Vertex::new(Point3::from(*p), normal, Vector2::zeros());
                vertex.color = color;
                vertex.use_diffuse_texture = use_diffuse_texture;

                if let Some(texcoords) = &mesh.texcoords {
                    if let Some(uv) = texcoords.get(i) {
                        vertex.texcoord = Vector2::from(*uv);
                    }
                    if let Some(t) = mesh.tangents.get(i) {
                        vertex.tangent = Vector3::from(*t);
                    }
                    if let Some(b) = mesh.bitangents.get(i) {
                        vertex.bitangent = Vector3::from(*b);
                    }
                }
                vertex
            })
            .collect::<Vec<_>>();

        let indices = mesh
            .faces
            .iter()
            .flat_map(|face| face.iter().copied())
            .collect::<Vec<u32>>();

        let mut textures = Vec::new();
        if let Some(mat) = material {
            for (slot, kind) in TEXTURE_SOURCES {
                textures.extend(self.load_material_textures(
                    mat,
                    slot,
                    kind,
                    &model.directory,
                    &mut model.textures,
                )?);
            }
        } else {
            debug!(
                "Mesh '{}' has material index {} out of range",
                mesh.name, mesh.material_index
            );
        }

        debug!(
            "Mesh '{}': {} vertices, {} indices, {} textures",
            mesh.name,
            vertices.len(),
            indices.len(),
            textures.len()
        );

        Ok(MeshRecord::new(mesh.name.clone(), vertices, indices, textures))
    }

    fn load_material_textures(
        &self,
        material: &SourceMaterial,
        slot: TextureSlot,
        kind: TextureKind,
        directory: &Path,
        cache: &mut TextureCache,
    ) -> Result<Vec<TextureRef>, ImportError> {
        material
            .textures_of(slot)
            .map(|path| cache.get_or_load(path, kind, directory, self.decoder))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ImageDecodeError;
    use crate::scene::texture::{DecodedImage, TextureHandle};
    use std::cell::Cell;

    struct FixedParser(Result<SceneGraph, fn(&Path) -> SceneParseError>);

    fn not_found(path: &Path) -> SceneParseError {
        SceneParseError::NotFound(path.to_path_buf())
    }

    impl SceneParser for FixedParser {
        fn parse(&self, path: &Path, _: &ImportOptions) -> Result<SceneGraph, SceneParseError> {
            match &self.0 {
                Ok(graph) => Ok(graph.clone()),
                Err(make) => Err(make(path)),
            }
        }
    }

    struct FakeDecoder {
        channels: u8,
        calls: Cell<usize>,
    }

    impl FakeDecoder {
        fn rgb() -> Self {
            Self {
                channels: 3,
                calls: Cell::new(0),
            }
        }
    }

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, path: &Path) -> Result<DecodedImage, ImageDecodeError> {
            self.calls.set(self.calls.get() + 1);
            if path.ends_with("broken.png") {
                return Err(ImageDecodeError::Decode {
                    path: path.to_path_buf(),
                    message: "truncated".into(),
                });
            }
            Ok(DecodedImage {
                width: 2,
                height: 2,
                channels: self.channels,
                pixels: vec![128; 4 * self.channels as usize],
            })
        }
    }

    fn triangle(name: &str, material_index: usize, textured: bool) -> SourceMesh {
        SourceMesh {
            name: name.into(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            texcoords: textured.then(|| vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            tangents: if textured { vec![[1.0, 0.0, 0.0]; 3] } else { Vec::new() },
            bitangents: if textured { vec![[0.0, 1.0, 0.0]; 3] } else { Vec::new() },
            faces: vec![vec![0, 1, 2]],
            material_index,
        }
    }

    fn house_graph() -> SceneGraph {
        let meshes = vec![
            triangle("Walls_Cube.001", 0, true),
            triangle("Window_Cube.055", 1, false),
            triangle("Roof_Cube.002", 0, true),
            triangle("water_Cube.041", 5, false),
            triangle("Window.009_Cube.064", 1, false),
        ];
        let materials = vec![
            SourceMaterial {
                name: "brick".into(),
                diffuse_color: Some([0.8, 0.4, 0.2, 1.0]),
                textures: vec![
                    (TextureSlot::Diffuse, "brick.png".into()),
                    (TextureSlot::Height, "brick_bump.png".into()),
                    (TextureSlot::Ambient, "brick_ao.png".into()),
                    (TextureSlot::Specular, "brick.png".into()),
                ],
            },
            SourceMaterial {
                name: "glass".into(),
                diffuse_color: Some([0.9, 0.9, 1.0, 0.3]),
                textures: Vec::new(),
            },
        ];

        let mut root = SceneNode::new("house");
        root.meshes = vec![0];
        let mut upper = SceneNode::new("upper");
        upper.meshes = vec![1, 2];
        let mut garden = SceneNode::new("garden");
        garden.meshes = vec![3];
        upper.children.push(garden);
        let mut annex = SceneNode::new("annex");
        annex.meshes = vec![4];
        root.children.push(upper);
        root.children.push(annex);

        SceneGraph {
            root: Some(root),
            meshes,
            materials,
            incomplete: false,
        }
    }

    fn load(graph: SceneGraph, decoder: &FakeDecoder) -> Result<Model, ImportError> {
        let parser = FixedParser(Ok(graph));
        let names = WindowNames::default();
        ModelImporter::new(&parser, decoder, &names).load("assets/house/house.obj", 7)
    }

    #[test]
    fn partition_is_total_and_ordered_depth_first() {
        let graph = house_graph();
        let total = graph.root.as_ref().unwrap().mesh_reference_count();
        let model = load(graph, &FakeDecoder::rgb()).unwrap();

        assert_eq!(model.id, 7);
        assert_eq!(model.mesh_count(), total);

        let structural: Vec<_> = model.meshes.iter().map(|m| m.name.as_str()).collect();
        let windows: Vec<_> = model.windows.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            structural,
            vec!["Walls_Cube.001", "Roof_Cube.002", "Window.009_Cube.064"]
        );
        assert_eq!(windows, vec!["Window_Cube.055", "water_Cube.041"]);
    }

    #[test]
    fn material_tint_and_flag_apply_to_every_vertex() {
        let model = load(house_graph(), &FakeDecoder::rgb()).unwrap();

        let walls = &model.meshes[0];
        assert!(walls.vertices.iter().all(|v| {
            v.color == Vector4::new(0.8, 0.4, 0.2, 1.0) && v.use_diffuse_texture == 1.0
        }));

        let glass = &model.windows[0];
        assert!(glass.vertices.iter().all(|v| v.use_diffuse_texture == 0.0));
        assert_eq!(glass.vertices[0].color.w, 0.3);

        // Material index out of range: default tint, no textures.
        let water = &model.windows[1];
        assert_eq!(water.vertices[0].color, Vector4::new(1.0, 1.0, 1.0, 1.0));
        assert!(water.textures.is_empty());
    }

    #[test]
    fn untextured_meshes_get_zero_uv_and_tangent_space() {
        let model = load(house_graph(), &FakeDecoder::rgb()).unwrap();

        let glass = &model.windows[0];
        for v in &glass.vertices {
            assert_eq!(v.texcoord, Vector2::zeros());
            assert_eq!(v.tangent, Vector3::zeros());
            assert_eq!(v.bitangent, Vector3::zeros());
        }

        let walls = &model.meshes[0];
        assert_eq!(walls.vertices[1].texcoord, Vector2::new(1.0, 0.0));
        assert_eq!(walls.vertices[1].tangent, Vector3::x());
        assert_eq!(walls.vertices[1].bitangent, Vector3::y());
        assert_eq!(walls.indices, vec![0, 1, 2]);
    }

    #[test]
    fn textures_follow_slot_mapping_and_are_shared() {
        let decoder = FakeDecoder::rgb();
        let model = load(house_graph(), &decoder).unwrap();

        let walls = &model.meshes[0];
        let kinds: Vec<_> = walls.textures.iter().map(|t| (t.kind, t.path.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (TextureKind::Diffuse, "brick.png"),
                (TextureKind::Specular, "brick.png"),
                (TextureKind::Normal, "brick_bump.png"),
                (TextureKind::Height, "brick_ao.png"),
            ]
        );

        // Two meshes and two slots reference brick.png; it is decoded once.
        assert_eq!(decoder.calls.get(), 3);
        assert_eq!(model.textures.loaded().len(), 3);
        let roof = &model.meshes[1];
        assert_eq!(roof.textures[0].handle, walls.textures[0].handle);
        assert_eq!(walls.textures[0].handle, walls.textures[1].handle);
    }

    #[test]
    fn broken_texture_does_not_abort_the_load() {
        let mut graph = house_graph();
        graph.materials[0].textures = vec![(TextureSlot::Diffuse, "broken.png".into())];
        let model = load(graph, &FakeDecoder::rgb()).unwrap();

        assert_eq!(model.mesh_count(), 5);
        assert_eq!(model.meshes[0].textures[0].handle, TextureHandle::UNBOUND);
    }

    #[test]
    fn invalid_channel_count_is_fatal() {
        let decoder = FakeDecoder {
            channels: 6,
            calls: Cell::new(0),
        };
        let err = load(house_graph(), &decoder).unwrap_err();
        assert!(matches!(err, ImportError::InvalidImageFormat { channels: 6, .. }));
    }

    #[test]
    fn incomplete_and_rootless_scenes_are_rejected() {
        let mut incomplete = house_graph();
        incomplete.incomplete = true;
        assert!(matches!(
            load(incomplete, &FakeDecoder::rgb()),
            Err(ImportError::SceneParse(SceneParseError::Incomplete(_)))
        ));

        let mut rootless = house_graph();
        rootless.root = None;
        assert!(matches!(
            load(rootless, &FakeDecoder::rgb()),
            Err(ImportError::SceneParse(SceneParseError::NoRoot(_)))
        ));
    }

    #[test]
    fn lenient_load_leaves_an_empty_model() {
        let parser = FixedParser(Err(not_found));
        let decoder = FakeDecoder::rgb();
        let names = WindowNames::default();
        let model = ModelImporter::new(&parser, &decoder, &names)
            .load_or_empty("missing/house.obj", 3)
            .unwrap();

        assert!(model.is_empty());
        assert_eq!(model.id, 3);
        assert_eq!(decoder.calls.get(), 0);
    }

    #[test]
    fn dangling_mesh_references_are_skipped() {
        let mut graph = house_graph();
        graph.root.as_mut().unwrap().meshes.push(42);
        let model = load(graph, &FakeDecoder::rgb()).unwrap();
        assert_eq!(model.mesh_count(), 5);
    }

    #[test]
    fn injected_window_table_changes_classification() {
        let parser = FixedParser(Ok(house_graph()));
        let decoder = FakeDecoder::rgb();
        let names = WindowNames::new(["Roof_Cube.002"]);
        let model = ModelImporter::new(&parser, &decoder, &names)
            .load("house.obj", 0)
            .unwrap();

        assert_eq!(model.windows.len(), 1);
        assert_eq!(model.windows[0].name, "Roof_Cube.002");
        assert_eq!(model.meshes.len(), 4);
    }
}
