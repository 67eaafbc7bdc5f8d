//! End-to-end frame handling through the synchronous core.

mod common;

use common::*;
use terraview::prelude::*;
use terraview::scene::{Layer, Overlay};

fn view() -> (LiveView<HeadlessRenderer>, RecordingSink) {
    let sink = RecordingSink::new();
    let view = LiveViewBuilder::new().sink(sink.clone()).build(HeadlessRenderer::new());
    (view, sink)
}

fn renderer(view: &LiveView<HeadlessRenderer>) -> &HeadlessRenderer {
    view.scene().renderer().unwrap()
}

// =========================================================================
// Raster
// =========================================================================

#[test]
fn test_map_then_region_gives_one_label_pair_and_one_leaderboard_line() {
    let (mut view, sink) = view();

    assert_eq!(
        view.handle_frame(&raster_frame("map", &pixels(7))),
        FrameOutcome::Applied("map")
    );
    assert_eq!(
        view.handle_frame(&region_a_frame()),
        FrameOutcome::Applied("square_info")
    );

    let r = renderer(&view);
    let labels: Vec<&str> = r
        .overlays(Layer::Labels)
        .into_iter()
        .map(|o| match o {
            Overlay::Label(l) => l.text.as_str(),
            other => panic!("unexpected overlay {other:?}"),
        })
        .collect();
    assert_eq!(labels, ["A", "5"]);
    assert_eq!(r.leaderboard_text(), ["1. A (240000, $240000)"]);
    assert!(sink.is_empty());
}

#[test]
fn test_consecutive_grid_updates_replace_raster_once_each() {
    let (mut view, _sink) = view();

    view.handle_frame(&raster_frame("grid_update", &pixels(1)));
    let first = renderer(&view).stats();
    assert_eq!(renderer(&view).displayed().unwrap().pixels(), &pixels(1)[..]);

    view.handle_frame(&raster_frame("grid_update", &pixels(2)));
    let r = renderer(&view);
    let second = r.stats();
    assert_eq!(r.displayed().unwrap().pixels(), &pixels(2)[..]);

    assert_eq!(second.surfaces_created, 1);
    assert_eq!(second.textures_created - first.textures_created, 1);
    assert_eq!(second.textures_released - first.textures_released, 1);
    assert_eq!(second.rebinds, 1);
    assert_eq!(r.live_textures(), 1);
    assert_eq!(second.bad_releases, 0);
}

#[test]
fn test_base64_payload_is_accepted() {
    let (mut view, sink) = view();
    let outcome = view.handle_frame(&base64_raster_frame("grid_update", &pixels(9)));
    assert!(outcome.is_applied());
    assert_eq!(renderer(&view).displayed().unwrap().pixels(), &pixels(9)[..]);
    assert!(sink.is_empty());
}

#[test]
fn test_wrong_size_raster_never_replaces_current_one() {
    let (mut view, sink) = view();
    view.handle_frame(&raster_frame("map", &pixels(3)));

    let short = vec![5u8; DIMS.byte_len() - 4];
    assert_eq!(
        view.handle_frame(&raster_frame("grid_update", &short)),
        FrameOutcome::Dropped
    );

    let current = view.scene().state().raster().unwrap();
    assert_eq!(current.pixels(), &pixels(3)[..]);
    assert_eq!(renderer(&view).displayed().unwrap().pixels(), &pixels(3)[..]);

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!(d.stage, Stage::Codec);
    assert_eq!(d.message_kind.as_deref(), Some("grid_update"));
    assert_eq!(d.expected_size, Some(960_000));
    assert!(d.raw_size > 0);
}

#[test]
fn test_oversized_raster_is_dropped() {
    let (mut view, sink) = view();
    let big = vec![0u8; DIMS.byte_len() * 2];
    assert_eq!(view.handle_frame(&raster_frame("map", &big)), FrameOutcome::Dropped);
    assert!(view.scene().state().raster().is_none());
    assert_eq!(sink.diagnostics()[0].expected_size, Some(960_000));
}

#[test]
fn test_corrupt_raster_is_dropped() {
    let (mut view, sink) = view();
    let frame = format!(r#"{{"type":"map","grid":"{}"}}"#, hex::encode(b"not zlib at all"));
    assert_eq!(view.handle_frame(frame.as_bytes()), FrameOutcome::Dropped);
    assert_eq!(sink.diagnostics()[0].stage, Stage::Codec);
}

#[test]
fn test_initial_state_after_map_is_superseded() {
    let (mut view, _sink) = view();
    view.handle_frame(&raster_frame("map", &pixels(4)));

    let outcome = view.handle_frame(
        br#"{"type":"initial_state","width":600,"height":400,"cells":[[0,0,[1,2,3]]]}"#,
    );
    assert_eq!(outcome, FrameOutcome::Superseded("initial_state"));
    assert_eq!(renderer(&view).displayed().unwrap().pixels(), &pixels(4)[..]);
}

#[test]
fn test_map_after_initial_state_takes_over() {
    let (mut view, _sink) = view();
    view.handle_frame(
        br#"{"type":"initial_state","width":600,"height":400,"cells":[[0,0,[1,2,3]]]}"#,
    );
    view.handle_frame(&raster_frame("map", &pixels(6)));
    assert_eq!(renderer(&view).displayed().unwrap().pixels(), &pixels(6)[..]);
    assert_eq!(renderer(&view).live_textures(), 1);
}

// =========================================================================
// Regions
// =========================================================================

#[test]
fn test_empty_region_list_clears_labels_and_leaderboard() {
    let (mut view, _sink) = view();
    view.handle_frame(&region_a_frame());
    assert_eq!(renderer(&view).leaderboard_text().len(), 1);

    view.handle_frame(&empty_regions_frame());
    let r = renderer(&view);
    assert!(r.overlays(Layer::Labels).is_empty());
    assert!(r.leaderboard_text().is_empty());
}

#[test]
fn test_malformed_region_update_keeps_previous_overlays() {
    let (mut view, sink) = view();
    view.handle_frame(&region_a_frame());
    view.handle_frame(br#"{"type":"square_info","square_info":[{"id":"x"}]}"#);

    assert_eq!(renderer(&view).leaderboard_text(), ["1. A (240000, $240000)"]);
    assert_eq!(sink.diagnostics()[0].stage, Stage::Protocol);
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn test_teardown_releases_every_resource() {
    let (mut view, _sink) = view();
    view.handle_frame(&raster_frame("map", &pixels(1)));
    view.handle_frame(&raster_frame("grid_update", &pixels(2)));
    view.handle_frame(&region_a_frame());
    view.handle_frame(br#"{"type":"update","entities":[{"position":[5,5],"color":[1,2,3]}]}"#);
    view.present();

    let renderer = view.into_renderer().unwrap();
    assert!(renderer.is_clean(), "{:?}", renderer.stats());
    assert_eq!(renderer.stats().presents, 1);
}
