use approx::assert_relative_eq;
use fitview_core::framing::{FRAME_MARGIN, MAX_DISTANCE_FACTOR};
use fitview_core::{
    frame_model, Camera, FrameError, LoadState, MemorySource, ModelLoad, OrbitControls,
    ViewerConfig,
};
use nalgebra::Point3;

/// A tall box standing on the ground, far above the default camera height
const TOWER_OBJ: &str = "\
mtllib tower.mtl
o tower
v -100.0 0.0 -100.0
v 100.0 0.0 -100.0
v 100.0 0.0 100.0
v -100.0 0.0 100.0
v -100.0 1500.0 -100.0
v 100.0 1500.0 -100.0
v 100.0 1500.0 100.0
v -100.0 1500.0 100.0
usemtl stone
f 1 2 3 4
f 5 8 7 6
f 1 5 6 2
f 2 6 7 3
f 3 7 8 4
f 4 8 5 1
";

const TOWER_MTL: &str = "\
newmtl stone
Kd 0.5 0.5 0.4
";

fn source() -> MemorySource {
    let mut source = MemorySource::new();
    source.insert("tower.obj", TOWER_OBJ);
    source.insert("tower.mtl", TOWER_MTL);
    source
}

#[test]
fn loaded_model_is_framed_at_eye_level() {
    let config = ViewerConfig::default();
    let (mut camera, mut controls) = config.camera.build(2.0).unwrap();

    let mut load = ModelLoad::new("tower.obj", Some("tower.mtl".to_string()));
    load.run_to_completion(&source());
    let model = load.take_loaded().expect("model should load");
    assert_eq!(model.meshes[0].albedo, [0.5, 0.5, 0.4]);

    let bounds = model.bounding_volume().unwrap();
    assert_eq!(bounds.center, Point3::new(0.0, 750.0, 0.0));

    let fit = frame_model(&bounds, &mut camera, &mut controls).unwrap();

    // the model center sits far above the starting camera, the framed camera
    // must still be level with it
    assert_eq!(camera.position.y, bounds.center.y);
    assert_eq!(camera.target, bounds.center);
    assert_eq!(controls.target, bounds.center);
    assert_relative_eq!(
        controls.max_distance,
        bounds.diagonal_length * MAX_DISTANCE_FACTOR,
        max_relative = 1e-6
    );

    let half_fov = (camera.fov().to_radians() * 0.5).tan();
    let distance = nalgebra::distance(&fit.position, &bounds.center);
    assert_relative_eq!(
        2.0 * distance * half_fov,
        bounds.diagonal_length * FRAME_MARGIN,
        max_relative = 1e-4
    );
    assert!(camera.near() < distance - bounds.diagonal_length / 2.0);
    assert!(camera.far() > distance + bounds.diagonal_length / 2.0);
}

#[test]
fn failed_load_leaves_camera_unframed() {
    let mut source = MemorySource::new();
    source.insert("tower.obj", TOWER_OBJ);

    let mut camera = Camera::default();
    let controls = OrbitControls::default();
    let before = camera.clone();

    let mut load = ModelLoad::new("tower.obj", Some("tower.mtl".to_string()));
    assert!(matches!(load.run_to_completion(&source), LoadState::Failed(_)));
    assert!(load.take_loaded().is_none());

    controls.update(&mut camera);
    assert_eq!(camera.position, before.position);
    assert_eq!(camera.near(), before.near());
    assert_eq!(camera.far(), before.far());
}

#[test]
fn flat_point_model_is_rejected_by_framing() {
    let mut source = MemorySource::new();
    source.insert("point.obj", "v 1.0 2.0 3.0\nv 1.0 2.0 3.0\nv 1.0 2.0 3.0\nf 1 2 3\n");

    let mut load = ModelLoad::new("point.obj", None);
    load.run_to_completion(&source);
    let model = load.take_loaded().unwrap();
    let bounds = model.bounding_volume().unwrap();

    let mut camera = Camera::default();
    let mut controls = OrbitControls::default();
    assert_eq!(
        frame_model(&bounds, &mut camera, &mut controls),
        Err(FrameError::DegenerateBounds)
    );
}
