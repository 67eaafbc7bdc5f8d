//! Scene-level behaviour against the headless renderer.

use terraview_protocol::{EntityColor, EntityState, RegionInfo};
use terraview_raster::{GridRaster, RasterDims};
use terraview_scene::{
    Anchor, DEFAULT_TINT, HeadlessRenderer, Layer, Overlay, RenderError, Scene, SceneConfig,
};
use terraview_viewport::ViewportTransform;

// =========================================================================
// Helpers
// =========================================================================

const DIMS: RasterDims = RasterDims::rgba(600, 400);

fn scene() -> Scene<HeadlessRenderer> {
    Scene::new(HeadlessRenderer::new(), DIMS, SceneConfig::default())
}

fn filled(value: u8) -> GridRaster {
    GridRaster::new(DIMS, vec![value; DIMS.byte_len()]).unwrap()
}

fn region(id: u64, name: &str, area: u64, value: f64) -> RegionInfo {
    RegionInfo {
        id,
        name: name.into(),
        resources: 5,
        area,
        average_land_value: value,
        center_of_mass: [200.0, 300.0],
    }
}

fn entity(row: f64, col: f64, color: Option<EntityColor>) -> EntityState {
    EntityState {
        position: [row, col],
        velocity: [1.0, 0.0],
        investment: 10.0,
        color,
    }
}

fn renderer(scene: &Scene<HeadlessRenderer>) -> &HeadlessRenderer {
    scene.renderer().unwrap()
}

// =========================================================================
// Raster
// =========================================================================

#[test]
fn test_first_raster_creates_one_surface() {
    let mut scene = scene();
    scene.set_raster(filled(1)).unwrap();

    let r = renderer(&scene);
    assert_eq!(r.stats().surfaces_created, 1);
    assert_eq!(r.stats().textures_created, 1);
    assert_eq!(r.displayed(), Some(&filled(1)));
    assert!(scene.layers().raster.is_some());
}

#[test]
fn test_consecutive_rasters_rebind_without_leaking() {
    let mut scene = scene();
    scene.set_raster(filled(1)).unwrap();
    scene.set_raster(filled(2)).unwrap();
    scene.set_raster(filled(3)).unwrap();

    let r = renderer(&scene);
    let stats = r.stats();
    assert_eq!(stats.surfaces_created, 1, "surface must not be recreated");
    assert_eq!(stats.rebinds, 2);
    assert_eq!(stats.textures_created, 3);
    assert_eq!(stats.textures_released, 2);
    assert_eq!(r.live_textures(), 1);
    assert_eq!(stats.bad_releases, 0);
    assert_eq!(r.displayed(), Some(&filled(3)));
    assert_eq!(scene.state().raster(), Some(&filled(3)));
}

#[test]
fn test_texture_failure_keeps_previous_frame() {
    let mut scene = scene();
    scene.set_raster(filled(1)).unwrap();

    scene.renderer_mut().unwrap().fail_next_textures(1);
    let err = scene.set_raster(filled(2)).unwrap_err();
    assert!(matches!(err, RenderError::Allocation { .. }));

    assert_eq!(renderer(&scene).displayed(), Some(&filled(1)));
    assert_eq!(scene.state().raster(), Some(&filled(1)));

    // The next frame goes through normally.
    scene.set_raster(filled(3)).unwrap();
    assert_eq!(renderer(&scene).displayed(), Some(&filled(3)));
    assert_eq!(renderer(&scene).live_textures(), 1);
}

#[test]
fn test_texture_failure_before_any_raster_leaves_scene_empty() {
    let mut scene = scene();
    scene.renderer_mut().unwrap().fail_next_textures(1);
    assert!(scene.set_raster(filled(1)).is_err());
    assert!(scene.state().raster().is_none());
    assert!(scene.layers().raster.is_none());
    assert_eq!(renderer(&scene).stats().live(), 0);
}

// =========================================================================
// Regions
// =========================================================================

#[test]
fn test_single_region_gives_label_pair_and_leaderboard_line() {
    let mut scene = scene();
    scene.set_raster(filled(0)).unwrap();
    scene
        .set_regions(vec![region(1, "A", 240_000, 1.0)])
        .unwrap();

    let r = renderer(&scene);
    let labels = r.overlays(Layer::Labels);
    assert_eq!(labels.len(), 2);
    let anchors: Vec<Anchor> = labels
        .iter()
        .map(|o| match o {
            Overlay::Label(l) => l.anchor,
            other => panic!("unexpected overlay {other:?}"),
        })
        .collect();
    assert_eq!(anchors, [Anchor::Above, Anchor::Below]);
    assert_eq!(r.leaderboard_text(), ["1. A (240000, $240000)"]);
}

#[test]
fn test_tiny_regions_are_ranked_but_not_labelled() {
    let mut scene = scene();
    scene
        .set_regions(vec![region(1, "Big", 60_000, 1.0), region(2, "Dot", 4, 1.0)])
        .unwrap();

    let r = renderer(&scene);
    assert_eq!(r.overlays(Layer::Labels).len(), 2);
    assert_eq!(r.leaderboard_text().len(), 2);
}

#[test]
fn test_region_update_replaces_previous_overlays() {
    let mut scene = scene();
    scene
        .set_regions((1..=12).map(|i| region(i, "R", 24_000 * i, 1.0)).collect())
        .unwrap();
    assert_eq!(renderer(&scene).leaderboard_text().len(), 10);
    assert_eq!(renderer(&scene).overlays(Layer::Labels).len(), 24);

    scene
        .set_regions(vec![region(99, "Solo", 240_000, 2.0)])
        .unwrap();
    let r = renderer(&scene);
    assert_eq!(r.overlays(Layer::Labels).len(), 2);
    assert_eq!(r.leaderboard_text(), ["1. Solo (240000, $480000)"]);
    assert_eq!(r.stats().bad_releases, 0);
}

#[test]
fn test_empty_region_list_clears_labels_and_leaderboard() {
    let mut scene = scene();
    scene
        .set_regions(vec![region(1, "A", 240_000, 1.0), region(2, "B", 120_000, 1.0)])
        .unwrap();
    scene.set_regions(Vec::new()).unwrap();

    let r = renderer(&scene);
    assert!(r.overlays(Layer::Labels).is_empty());
    assert!(r.leaderboard_text().is_empty());
    assert!(scene.state().leaderboard().is_empty());
    assert_eq!(scene.layers().overlay_count(), 0);
}

#[test]
fn test_label_failure_keeps_previous_regions_on_screen() {
    let mut scene = scene();
    scene
        .set_regions(vec![region(1, "A", 240_000, 1.0)])
        .unwrap();
    let labels_before = renderer(&scene).overlays(Layer::Labels).len();
    let board_before = renderer(&scene).leaderboard_text();
    assert_eq!(labels_before, 2);

    scene.renderer_mut().unwrap().fail_next_overlays(1);
    let err = scene
        .set_regions(vec![region(2, "B", 240_000, 2.0)])
        .unwrap_err();
    assert!(matches!(err, RenderError::Allocation { .. }));

    let r = renderer(&scene);
    assert_eq!(r.overlays(Layer::Labels).len(), labels_before);
    assert_eq!(r.leaderboard_text(), board_before);
    assert_eq!(scene.layers().overlay_count(), 3);
    let ids: Vec<u64> = scene.state().regions().iter().map(|r| r.id).collect();
    assert_eq!(ids, [1]);
    assert_eq!(scene.state().leaderboard()[0].region_id, 1);
    assert_eq!(r.stats().bad_releases, 0);

    scene.teardown();
    assert!(renderer(&scene).is_clean());
}

#[test]
fn test_leaderboard_failure_rolls_back_new_labels() {
    let mut scene = scene();
    scene
        .set_regions(vec![region(1, "A", 240_000, 1.0)])
        .unwrap();

    // Both new labels allocate, then the leaderboard line fails.
    scene.renderer_mut().unwrap().limit_overlays(Some(2));
    let err = scene
        .set_regions(vec![region(2, "B", 240_000, 2.0)])
        .unwrap_err();
    assert!(matches!(err, RenderError::Allocation { .. }));

    let r = renderer(&scene);
    assert_eq!(r.live_overlays(), 3);
    assert_eq!(r.stats().overlays_created, 5);
    assert_eq!(r.stats().overlays_released, 2);
    assert_eq!(r.leaderboard_text(), ["1. A (240000, $240000)"]);
    assert_eq!(scene.state().regions()[0].id, 1);

    scene.renderer_mut().unwrap().limit_overlays(None);
    scene
        .set_regions(vec![region(2, "B", 240_000, 2.0)])
        .unwrap();
    assert_eq!(renderer(&scene).leaderboard_text(), ["1. B (240000, $480000)"]);

    scene.teardown();
    let r = renderer(&scene);
    assert!(r.is_clean(), "leak or double release: {:?}", r.stats());
}

// =========================================================================
// Entities
// =========================================================================

#[test]
fn test_entities_are_replaced_wholesale() {
    let mut scene = scene();
    scene
        .set_entities(vec![
            entity(1.0, 2.0, Some(EntityColor::Channels(vec![10.0, 20.0, 30.0]))),
            entity(3.0, 4.0, Some(EntityColor::Malformed)),
        ])
        .unwrap();

    let tints: Vec<[u8; 3]> = renderer(&scene)
        .overlays(Layer::Entities)
        .iter()
        .map(|o| match o {
            Overlay::Marker(m) => m.tint,
            other => panic!("unexpected overlay {other:?}"),
        })
        .collect();
    assert_eq!(tints, [[10, 20, 30], DEFAULT_TINT]);

    scene.set_entities(vec![entity(5.0, 6.0, None)]).unwrap();
    assert_eq!(renderer(&scene).overlays(Layer::Entities).len(), 1);
    assert_eq!(scene.state().entities().len(), 1);
}

#[test]
fn test_entity_failure_keeps_previous_markers() {
    let mut scene = scene();
    scene
        .set_entities(vec![entity(1.0, 2.0, None), entity(3.0, 4.0, None)])
        .unwrap();

    scene.renderer_mut().unwrap().limit_overlays(Some(1));
    assert!(scene.set_entities(vec![entity(5.0, 6.0, None); 3]).is_err());

    let r = renderer(&scene);
    assert_eq!(r.overlays(Layer::Entities).len(), 2);
    assert_eq!(r.live_overlays(), 2);
    assert_eq!(scene.state().entities().len(), 2);
    assert_eq!(r.stats().bad_releases, 0);
}

// =========================================================================
// Teardown
// =========================================================================

#[test]
fn test_teardown_releases_everything_once() {
    let mut scene = scene();
    scene.set_raster(filled(1)).unwrap();
    scene.set_raster(filled(2)).unwrap();
    scene
        .set_regions(vec![region(1, "A", 240_000, 1.0)])
        .unwrap();
    scene.set_entities(vec![entity(0.0, 0.0, None)]).unwrap();

    scene.teardown();
    scene.teardown();

    let r = renderer(&scene);
    assert!(r.is_clean(), "leak or double release: {:?}", r.stats());
    let stats = r.stats();
    assert_eq!(stats.textures_created, stats.textures_released);
    assert_eq!(stats.surfaces_created, stats.surfaces_released);
    assert_eq!(stats.overlays_created, stats.overlays_released);
}

#[test]
fn test_calls_after_teardown_are_rejected() {
    let mut scene = scene();
    scene.teardown();
    assert!(scene.is_torn_down());
    assert_eq!(scene.set_raster(filled(1)), Err(RenderError::TornDown));
    assert_eq!(scene.set_regions(Vec::new()), Err(RenderError::TornDown));
    assert_eq!(scene.set_entities(Vec::new()), Err(RenderError::TornDown));
    assert_eq!(
        scene.present(&ViewportTransform::IDENTITY),
        Err(RenderError::TornDown)
    );
    assert_eq!(renderer(&scene).stats().textures_created, 0);
}

#[test]
fn test_into_renderer_returns_clean_renderer() {
    let mut scene = scene();
    scene.set_raster(filled(1)).unwrap();
    scene
        .set_regions(vec![region(1, "A", 240_000, 1.0)])
        .unwrap();

    let renderer = scene.into_renderer().unwrap();
    assert!(renderer.is_clean());
    assert_eq!(renderer.stats().surfaces_released, 1);
}

#[test]
fn test_present_forwards_transform() {
    let mut scene = scene();
    let t = ViewportTransform {
        scale: 2.0,
        ..ViewportTransform::IDENTITY
    };
    scene.present(&t).unwrap();
    assert_eq!(renderer(&scene).last_transform(), Some(t));
}
