use house_walkthrough::io::config::Config;
use house_walkthrough::io::image::ImageCrateDecoder;
use house_walkthrough::io::obj_loader::ObjSceneParser;
use house_walkthrough::scene::context::MeshGroup;
use house_walkthrough::scene::importer::ModelImporter;
use house_walkthrough::scene::loader::init_walkthrough;
use house_walkthrough::scene::texture::{PixelFormat, TextureHandle, TextureKind, WrapMode};
use house_walkthrough::scene::windows::WindowNames;
use house_walkthrough::ui::input::InputState;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::PathBuf;

const HOUSE_OBJ: &str = "\
mtllib house.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
o Wall
usemtl brick
f 1/1/1 2/2/1 3/3/1 4/4/1
o Window_Cube.055
usemtl glass
f 1/1/1 2/2/1 3/3/1
";

const HOUSE_MTL: &str = "\
newmtl brick
Kd 0.8 0.4 0.2
map_Kd tex.png
map_Ks missing.png
map_Bump tex.png

newmtl glass
Kd 0.6 0.8 1.0
d 0.4
map_Kd glass.png
";

/// Fresh fixture directory with the house OBJ, its MTL and two PNGs.
fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "house-walkthrough-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    fs::write(dir.join("house.obj"), HOUSE_OBJ).unwrap();
    fs::write(dir.join("house.mtl"), HOUSE_MTL).unwrap();
    RgbImage::from_pixel(2, 2, Rgb([200, 100, 50]))
        .save(dir.join("tex.png"))
        .unwrap();
    RgbaImage::from_pixel(2, 2, Rgba([150, 200, 255, 100]))
        .save(dir.join("glass.png"))
        .unwrap();
    dir
}

#[test]
fn obj_scene_is_split_into_structure_and_windows() {
    let dir = fixture_dir("split");
    let names = WindowNames::default();
    let importer = ModelImporter::new(&ObjSceneParser, &ImageCrateDecoder, &names);

    let model = importer.load(dir.join("house.obj"), 4).unwrap();

    assert_eq!(model.id, 4);
    assert_eq!(model.mesh_count(), 2);
    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.windows.len(), 1);

    let wall = &model.meshes[0];
    assert_eq!(wall.name, "Wall");
    assert_eq!(wall.triangle_count(), 2);
    assert!(wall.indices.iter().all(|&i| (i as usize) < wall.vertices.len()));

    let glass = &model.windows[0];
    assert_eq!(glass.name, "Window_Cube.055");
    assert!((glass.vertices[0].color.w - 0.4).abs() < 1e-6);
    assert_eq!(glass.vertices[0].use_diffuse_texture, 1.0);
}

#[test]
fn textures_are_shared_by_path_and_failures_stay_unbound() {
    let dir = fixture_dir("textures");
    let names = WindowNames::default();
    let importer = ModelImporter::new(&ObjSceneParser, &ImageCrateDecoder, &names);
    let model = importer.load(dir.join("house.obj"), 1).unwrap();

    let wall = &model.meshes[0];
    let kinds: Vec<_> = wall.textures.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TextureKind::Diffuse, TextureKind::Specular, TextureKind::Normal]
    );
    assert_eq!(wall.textures[0].handle, wall.textures[2].handle);
    assert!(wall.textures[0].handle.is_bound());
    assert_eq!(wall.textures[1].handle, TextureHandle::UNBOUND);

    assert_eq!(model.textures.loaded().len(), 3);
    assert_eq!(model.textures.store().len(), 2);

    let tex = model.textures.texture(wall.textures[0].handle).unwrap();
    assert_eq!((tex.format, tex.wrap), (PixelFormat::Rgb, WrapMode::Repeat));

    let glass_ref = &model.windows[0].textures[0];
    let glass = model.textures.texture(glass_ref.handle).unwrap();
    assert_eq!(
        (glass.format, glass.wrap),
        (PixelFormat::Rgba, WrapMode::ClampToEdge)
    );
}

#[test]
fn uvs_are_flipped_and_tangents_generated() {
    let dir = fixture_dir("uvs");
    let names = WindowNames::empty();
    let importer = ModelImporter::new(&ObjSceneParser, &ImageCrateDecoder, &names);
    let model = importer.load(dir.join("house.obj"), 1).unwrap();

    // With no window table every mesh is structural.
    assert_eq!(model.meshes.len(), 2);
    assert!(model.windows.is_empty());

    let wall = &model.meshes[0];
    let top_left = wall
        .vertices
        .iter()
        .find(|v| v.position.x == 0.0 && v.position.y == 1.0)
        .unwrap();
    assert_eq!(top_left.texcoord.y, 0.0);
    assert!(wall.vertices.iter().all(|v| (v.tangent.norm() - 1.0).abs() < 1e-4));
}

#[test]
fn walkthrough_builds_from_config() {
    let dir = fixture_dir("walkthrough");
    let config = Config::from_toml(
        r#"
        [[objects]]
        name = "house"
        path = "house.obj"
        id = 1

        [[objects]]
        name = "shed"
        path = "shed.obj"
        id = 2

        [[objects.placements]]
        position = [5.0, 0.0, 0.0]

        [[interactions]]
        object = "house"
        reaction = { type = "tear", cue = "crash.wav" }
        "#,
    )
    .unwrap();

    let mut world = init_walkthrough(&config, &dir, &ObjSceneParser, &ImageCrateDecoder).unwrap();

    // The missing shed loads as an empty model and is never drawn.
    assert!(world.object("shed").unwrap().model.is_empty());
    let groups: Vec<_> = world.draw_list().iter().map(|c| (c.object, c.group)).collect();
    assert_eq!(
        groups,
        vec![("house", MeshGroup::Structural), ("house", MeshGroup::Windows)]
    );

    let mut input = InputState::new();
    input.click(1);
    let out = world.update(&input, 0.016);
    assert_eq!(out.reactions.len(), 1);
    assert!(world.draw_list().is_empty());
}
