// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation-level behavior of `Zooming` against an in-memory document.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use loupe::{
    CustomSize, Hook, Hooks, Options, Rejected, Settings, SettingsPatch, Subscriptions, Task,
    Zooming,
};

use common::{NodeId, TestHost, end_transition, open_settled, page, run_timers, tick};

type Log = Rc<RefCell<Vec<(Hook, NodeId)>>>;

fn recording() -> (Options<NodeId>, Log) {
    let log: Log = Rc::default();
    let mut hooks = Hooks::new();
    for hook in Hook::ALL {
        let log = Rc::clone(&log);
        hooks.set(hook, move |el: &NodeId| log.borrow_mut().push((hook, *el)));
    }
    let options = Options {
        settings: Settings::default(),
        hooks,
    };
    (options, log)
}

fn fired(log: &Log) -> Vec<Hook> {
    log.borrow().iter().map(|(hook, _)| *hook).collect()
}

fn with_settings(patch: SettingsPatch) -> Options<NodeId> {
    let mut settings = Settings::default();
    settings.merge(patch);
    settings.into()
}

#[test]
fn open_centers_and_fits_target() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());

    zooming.open(&mut host, &img).unwrap();

    let target = zooming.target().unwrap();
    let open = target.open_transform();
    assert_eq!(open.translate, Vec2::new(200.0, 200.0));
    assert_eq!(open.scale, Vec2::new(2.5, 2.5));

    assert_eq!(
        host.style_of(img, "transform"),
        "translate3d(200px, 200px, 0px) scale(2.5,2.5)"
    );
    assert_eq!(host.style_of(img, "position"), "relative");
    assert_eq!(host.style_of(img, "z-index"), "999");
    assert_eq!(host.style_of(img, "cursor"), "grab");
    assert_eq!(host.style_of(img, "width"), "400px");
    assert_eq!(host.style_of(img, "height"), "200px");
    assert_eq!(
        host.style_of(img, "transition"),
        "transform 0.4s cubic-bezier(0.4, 0, 0, 1)"
    );
    assert!(host.layouts >= 1, "start state must be flushed before the transform");

    let state = zooming.state();
    assert!(state.shown);
    assert!(state.lock);
    assert!(state.released);
}

#[test]
fn overlay_fades_in_after_insertion() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());
    let overlay = *zooming.overlay();

    assert_eq!(host.style_of(overlay, "position"), "fixed");
    assert_eq!(host.style_of(overlay, "z-index"), "998");
    assert_eq!(host.style_of(overlay, "background-color"), "rgb(255, 255, 255)");
    assert!(host.body.is_empty());

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(host.body, [overlay]);
    assert_eq!(host.style_of(overlay, "opacity"), "0");

    tick(&mut zooming, &mut host);
    assert_eq!(host.style_of(overlay, "opacity"), "1");
}

#[test]
fn open_completes_on_transition_end() {
    let (mut host, img) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(fired(&log), [Hook::BeforeOpen]);
    assert_eq!(
        host.subscriptions,
        Subscriptions::SCROLL | Subscriptions::KEYDOWN | Subscriptions::RESIZE
    );

    end_transition(&mut zooming, &mut host);
    assert_eq!(fired(&log), [Hook::BeforeOpen, Hook::Open]);
    assert!(!zooming.state().lock);
    assert!(host.subscriptions.contains(Subscriptions::GRAB));
}

#[test]
fn transition_end_on_other_elements_is_ignored() {
    let (mut host, img) = page();
    let other = host.add_image(Rect::new(0.0, 0.0, 10.0, 10.0));
    let mut zooming = Zooming::new(&mut host, Options::default());

    zooming.open(&mut host, &img).unwrap();
    zooming.transition_end(&mut host, &other);
    assert!(zooming.state().lock);

    zooming.transition_end(&mut host, &img);
    assert!(!zooming.state().lock);
}

#[test]
fn open_is_idempotent() {
    let (mut host, img) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(zooming.open(&mut host, &img), Err(Rejected::Locked));

    end_transition(&mut zooming, &mut host);
    let before = *zooming.state();
    assert_eq!(zooming.open(&mut host, &img), Err(Rejected::AlreadyShown));
    assert_eq!(*zooming.state(), before);
    assert_eq!(fired(&log), [Hook::BeforeOpen, Hook::Open]);
}

#[test]
fn open_rejects_non_images() {
    let (mut host, _) = page();
    let div = host.add("div", Rect::new(0.0, 0.0, 50.0, 50.0));
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);

    assert_eq!(zooming.open(&mut host, &div), Err(Rejected::NotImage));
    assert!(!zooming.state().shown);
    assert!(log.borrow().is_empty());
    assert!(host.body.is_empty());
}

#[test]
fn open_selector_uses_first_match() {
    let (mut host, img) = page();
    host.with_class(img, "hero");
    let mut zooming = Zooming::new(&mut host, Options::default());

    assert_eq!(
        zooming.open_selector(&mut host, ".missing"),
        Err(Rejected::NoMatch)
    );
    zooming.open_selector(&mut host, ".hero").unwrap();
    assert_eq!(zooming.target().map(|t| *t.element()), Some(img));
}

#[test]
fn close_when_not_shown_is_a_no_op() {
    let (mut host, _) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    let before = *zooming.state();

    assert_eq!(zooming.close(&mut host), Err(Rejected::NotShown));
    assert_eq!(*zooming.state(), before);
    assert!(log.borrow().is_empty());
    assert_eq!(host.subscribe_calls, 0);
}

#[test]
fn close_restores_pre_open_styles() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());
    zooming.listen(&mut host, &img);
    host.node_mut(img)
        .styles
        .insert("position".into(), "absolute".into());
    let styles_before = host.node(img).styles.clone();

    open_settled(&mut zooming, &mut host, img);
    zooming
        .grab(&mut host, Point::new(600.0, 450.0), None)
        .unwrap();
    end_transition(&mut zooming, &mut host);
    zooming.release(&mut host).unwrap();
    end_transition(&mut zooming, &mut host);

    zooming.close(&mut host).unwrap();
    assert_eq!(host.style_of(img, "transform"), "none");
    end_transition(&mut zooming, &mut host);

    assert_eq!(host.node(img).styles, styles_before);
    assert_eq!(host.style_of(img, "cursor"), "zoom-in");
    assert!(host.body.is_empty(), "overlay must be removed");
    assert_eq!(host.subscriptions, Subscriptions::empty());
    assert!(zooming.target().is_none());

    let state = zooming.state();
    assert!(!state.shown);
    assert!(!state.lock);
    assert!(state.released);
}

#[test]
fn close_fires_hooks_and_resets_body_cursor() {
    let (mut host, img) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    open_settled(&mut zooming, &mut host, img);
    host.body_cursor = "move".into();
    log.borrow_mut().clear();

    zooming.close(&mut host).unwrap();
    assert_eq!(host.body_cursor, "auto");
    assert_eq!(host.style_of(*zooming.overlay(), "opacity"), "0");
    assert_eq!(host.subscriptions, Subscriptions::GRAB);
    assert_eq!(fired(&log), [Hook::BeforeClose]);

    end_transition(&mut zooming, &mut host);
    assert_eq!(*log.borrow(), [(Hook::BeforeClose, img), (Hook::Close, img)]);
}

#[test]
fn grab_while_locked_changes_nothing() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());
    zooming.open(&mut host, &img).unwrap();
    let transform = host.style_of(img, "transform").to_owned();

    assert_eq!(
        zooming.grab(&mut host, Point::new(10.0, 10.0), Some(0.5)),
        Err(Rejected::Locked)
    );
    assert!(zooming.state().released);
    assert_eq!(host.style_of(img, "transform"), transform);
}

#[test]
fn custom_size_ignores_scale_base() {
    let (mut host, _) = page();
    let img = host.add_image(Rect::new(0.0, 0.0, 400.0, 200.0));
    let mut zooming = Zooming::new(
        &mut host,
        with_settings(SettingsPatch {
            scale_base: Some(3.0),
            custom_size: Some(CustomSize::absolute(800.0, 400.0)),
            ..SettingsPatch::default()
        }),
    );

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(
        zooming.target().unwrap().open_transform().scale,
        Vec2::new(2.0, 2.0)
    );
}

#[test]
fn element_attributes_size_the_target() {
    let (mut host, img) = page();
    host.with_attr(img, "data-zooming-width", "1200");
    host.with_attr(img, "data-zooming-height", "300");
    let mut zooming = Zooming::new(&mut host, Options::default());

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(
        zooming.target().unwrap().open_transform().scale,
        Vec2::new(3.0, 1.5)
    );
}

#[test]
fn percent_size_is_capped_by_natural_resolution() {
    let (mut host, img) = page();
    host.node_mut(img).natural = kurbo::Size::new(600.0, 300.0);
    let mut zooming = Zooming::new(
        &mut host,
        with_settings(SettingsPatch {
            custom_size: Some(CustomSize::Percent(100.0)),
            ..SettingsPatch::default()
        }),
    );

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(
        zooming.target().unwrap().open_transform().scale,
        Vec2::new(1.5, 1.5)
    );
}

#[test]
fn grab_adds_scale_extra_and_follows_pointer() {
    let (mut host, img) = page();
    let (mut options, log) = recording();
    options.settings.custom_size = Some(CustomSize::absolute(480.0, 240.0));
    let mut zooming = Zooming::new(&mut host, options);
    open_settled(&mut zooming, &mut host, img);
    log.borrow_mut().clear();

    zooming
        .grab(&mut host, Point::new(600.0, 450.0), Some(0.5))
        .unwrap();

    let current = zooming.target().unwrap().current_transform();
    assert!((current.scale.x - 1.7).abs() < 1e-9);
    assert!((current.scale.y - 1.7).abs() < 1e-9);
    assert_eq!(current.translate, Vec2::new(100.0, 150.0));
    assert_eq!(host.style_of(img, "cursor"), "move");
    assert!(!zooming.state().released);
    assert!(!zooming.state().lock);
    assert_eq!(fired(&log), [Hook::BeforeGrab]);

    end_transition(&mut zooming, &mut host);
    assert_eq!(fired(&log), [Hook::BeforeGrab, Hook::Grab]);
}

#[test]
fn grab_defaults_to_configured_scale_extra() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());
    open_settled(&mut zooming, &mut host, img);

    zooming
        .grab(&mut host, Point::new(500.0, 400.0), None)
        .unwrap();
    let current = zooming.target().unwrap().current_transform();
    assert_eq!(current.scale, Vec2::new(3.0, 3.0));
    assert_eq!(current.translate, Vec2::new(200.0, 200.0));
}

#[test]
fn repeated_moves_do_not_accumulate() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());
    open_settled(&mut zooming, &mut host, img);

    zooming
        .move_to(&mut host, Point::new(400.0, 400.0), None)
        .unwrap();
    zooming
        .move_to(&mut host, Point::new(400.0, 400.0), None)
        .unwrap();

    let current = zooming.target().unwrap().current_transform();
    assert_eq!(current.translate, Vec2::new(300.0, 200.0));
    assert_eq!(current.scale, Vec2::new(3.0, 3.0));
    assert_eq!(host.style_of(img, "transition"), "transform");
    assert_eq!(host.body_cursor, "move");
    assert!(!zooming.state().released);
}

#[test]
fn release_returns_to_open_pose() {
    let (mut host, img) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    open_settled(&mut zooming, &mut host, img);
    let open_style = host.style_of(img, "transform").to_owned();

    zooming
        .move_to(&mut host, Point::new(10.0, 10.0), None)
        .unwrap();
    log.borrow_mut().clear();

    zooming.release(&mut host).unwrap();
    assert!(zooming.state().lock);
    assert!(!zooming.state().released);
    assert_eq!(host.body_cursor, "auto");
    assert_eq!(host.style_of(img, "transform"), open_style);
    assert_eq!(host.style_of(img, "cursor"), "grab");
    assert_eq!(
        host.style_of(img, "transition"),
        "transform 0.4s cubic-bezier(0.4, 0, 0, 1)"
    );

    end_transition(&mut zooming, &mut host);
    assert!(!zooming.state().lock);
    assert!(zooming.state().released);
    // The pending move completes alongside the release.
    assert_eq!(fired(&log), [Hook::BeforeRelease, Hook::Move, Hook::Release]);
}

#[test]
fn callbacks_replace_after_hooks() {
    let (mut host, img) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    let seen = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&seen);
    zooming
        .open_then(&mut host, &img, move |el| *sink.borrow_mut() = Some(*el))
        .unwrap();
    end_transition(&mut zooming, &mut host);

    assert_eq!(*seen.borrow(), Some(img));
    assert_eq!(fired(&log), [Hook::BeforeOpen]);
}

#[test]
fn release_and_close_chains_both_transitions() {
    let (mut host, img) = page();
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    open_settled(&mut zooming, &mut host, img);
    zooming
        .grab(&mut host, Point::new(300.0, 300.0), None)
        .unwrap();
    end_transition(&mut zooming, &mut host);
    log.borrow_mut().clear();

    zooming.release_and_close(&mut host).unwrap();
    end_transition(&mut zooming, &mut host);
    assert!(zooming.state().lock, "close is now in flight");
    assert_eq!(fired(&log), [Hook::BeforeRelease, Hook::BeforeClose]);

    end_transition(&mut zooming, &mut host);
    assert!(!zooming.state().shown);
    assert_eq!(
        fired(&log),
        [Hook::BeforeRelease, Hook::BeforeClose, Hook::Close]
    );
}

#[test]
fn without_grab_target_shows_zoom_out_cursor() {
    let (mut host, img) = page();
    let mut zooming = Zooming::new(
        &mut host,
        with_settings(SettingsPatch {
            enable_grab: Some(false),
            close_on_window_resize: Some(false),
            ..SettingsPatch::default()
        }),
    );

    open_settled(&mut zooming, &mut host, img);
    assert_eq!(host.style_of(img, "cursor"), "zoom-out");
    assert_eq!(
        host.subscriptions,
        Subscriptions::SCROLL | Subscriptions::KEYDOWN
    );
}

#[test]
fn hi_res_source_swaps_in_and_back_out() {
    let (mut host, img) = page();
    let figure = host.add("figure", Rect::ZERO);
    host.adopt(figure, img);
    host.with_attr(img, "src", "small.jpg");
    host.with_attr(img, "srcset", "small@2x.jpg 2x");
    host.with_attr(img, "data-original", "big.jpg");
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(fired(&log), [Hook::BeforeOpen, Hook::ImageLoading]);
    assert_eq!(host.preloaded, ["big.jpg"]);
    assert_eq!(host.attr(img, "srcset"), Some("small@2x.jpg 2x"));

    tick(&mut zooming, &mut host);
    end_transition(&mut zooming, &mut host);
    assert_eq!(host.attr(img, "srcset"), None);
    let clone = *host.node(figure).children.last().unwrap();
    assert_ne!(clone, img);
    assert_eq!(host.attr(clone, "src"), Some("big.jpg"));
    assert_eq!(host.style_of(clone, "visibility"), "hidden");
    assert_eq!(host.attr(img, "src"), Some("small.jpg"));
    assert!(host.timers.iter().any(|t| t.task == Task::SwapSource
        && t.delay == loupe::SWAP_SOURCE_DELAY));

    run_timers(&mut zooming, &mut host, |task| *task == Task::SwapSource);
    assert_eq!(host.attr(img, "src"), Some("big.jpg"));
    assert_eq!(host.node(figure).children, [img]);

    zooming.close(&mut host).unwrap();
    end_transition(&mut zooming, &mut host);
    assert_eq!(host.attr(img, "src"), Some("small.jpg"));
    assert_eq!(host.attr(img, "srcset"), Some("small@2x.jpg 2x"));
}

#[test]
fn closing_before_the_swap_discards_the_clone() {
    let (mut host, img) = page();
    host.with_attr(img, "src", "small.jpg");
    host.with_attr(img, "data-original", "big.jpg");
    let mut zooming = Zooming::new(&mut host, Options::default());
    open_settled(&mut zooming, &mut host, img);
    assert_eq!(host.body.len(), 2, "overlay and the parentless clone");

    zooming.close(&mut host).unwrap();
    end_transition(&mut zooming, &mut host);

    assert!(host.body.is_empty());
    assert!(!host.has_timer(|task| *task == Task::SwapSource));
    assert_eq!(host.attr(img, "src"), Some("small.jpg"));
}

#[test]
fn wrapping_link_provides_the_original() {
    let (mut host, img) = page();
    let link = host.add("a", Rect::ZERO);
    host.with_attr(link, "href", "full.png");
    host.adopt(link, img);
    let mut zooming = Zooming::new(&mut host, Options::default());

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(zooming.target().unwrap().src_original(), Some("full.png"));
}

#[test]
fn image_loaded_fires_for_the_requested_source_only() {
    let (mut host, img) = page();
    host.with_attr(img, "data-original", "big.jpg");
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    zooming.open(&mut host, &img).unwrap();
    log.borrow_mut().clear();

    zooming.image_loaded(&mut host, "other.jpg");
    assert!(log.borrow().is_empty());

    zooming.image_loaded(&mut host, "big.jpg");
    zooming.image_loaded(&mut host, "big.jpg");
    assert_eq!(*log.borrow(), [(Hook::ImageLoaded, img)]);
}

#[test]
fn image_loaded_fires_after_an_early_close() {
    let (mut host, img) = page();
    host.with_attr(img, "data-original", "big.jpg");
    let (options, log) = recording();
    let mut zooming = Zooming::new(&mut host, options);
    open_settled(&mut zooming, &mut host, img);

    zooming.close(&mut host).unwrap();
    end_transition(&mut zooming, &mut host);
    assert!(!zooming.state().shown);

    zooming.image_loaded(&mut host, "big.jpg");
    let image_hooks: Vec<_> = fired(&log)
        .into_iter()
        .filter(|hook| matches!(hook, Hook::ImageLoading | Hook::ImageLoaded))
        .collect();
    assert_eq!(image_hooks, [Hook::ImageLoading, Hook::ImageLoaded]);
}

#[test]
fn topmost_z_index_keeps_target_above_overlay() {
    let mut options: Options<NodeId> = Options::default();
    options.settings.z_index = i32::MAX;
    let (mut host, img) = page();
    let mut zooming = Zooming::new(&mut host, options);

    open_settled(&mut zooming, &mut host, img);

    assert!(zooming.state().shown);
    assert_eq!(host.style_of(img, "z-index"), "2147483647");
    assert_eq!(host.style_of(*zooming.overlay(), "z-index"), "2147483646");
}

#[test]
fn preloading_happens_at_listen_time() {
    let (mut host, img) = page();
    host.with_attr(img, "data-original", "big.jpg");
    let (mut options, log) = recording();
    options.settings.preload_image = true;
    let mut zooming = Zooming::new(&mut host, options);

    assert!(zooming.listen(&mut host, &img));
    assert_eq!(host.preloaded, ["big.jpg"]);

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(host.preloaded, ["big.jpg"]);
    assert_eq!(fired(&log), [Hook::BeforeOpen]);
}

#[test]
fn listen_skips_non_images_and_deduplicates() {
    let (mut host, img) = page();
    let div = host.add("div", Rect::ZERO);
    let mut zooming = Zooming::new(&mut host, Options::default());

    assert!(!zooming.listen(&mut host, &div));
    assert!(zooming.listen(&mut host, &img));
    assert!(zooming.listen(&mut host, &img));

    assert_eq!(host.click_listeners, [img]);
    assert_eq!(zooming.zoomables(), [img]);
    assert_eq!(host.style_of(img, "cursor"), "zoom-in");
    assert_eq!(host.style_of(div, "cursor"), "");
}

#[test]
fn default_zoomable_is_listened_on_construction() {
    let (mut host, img) = page();
    host.with_attr(img, "data-action", "zoom");
    let plain = host.add_image(Rect::new(0.0, 0.0, 10.0, 10.0));

    let zooming = Zooming::new(&mut host, Options::default());
    assert_eq!(zooming.zoomables(), [img]);
    assert_eq!(host.style_of(plain, "cursor"), "");

    let mut host = TestHost::new(kurbo::Size::new(100.0, 100.0));
    let zoomable = host.add_image(Rect::ZERO);
    host.with_class(zoomable, "zoom");
    let zooming = Zooming::new(
        &mut host,
        with_settings(SettingsPatch {
            default_zoomable: Some(".zoom".into()),
            ..SettingsPatch::default()
        }),
    );
    assert_eq!(zooming.zoomables(), [zoomable]);
}

#[test]
fn config_restyles_the_overlay() {
    let (mut host, _) = page();
    let mut zooming = Zooming::new(&mut host, Options::default());
    let overlay = *zooming.overlay();

    zooming.config(
        &mut host,
        SettingsPatch {
            bg_color: Some("black".into()),
            z_index: Some(10),
            transition_duration: Some(1.0),
            ..SettingsPatch::default()
        },
    );

    assert_eq!(zooming.settings().bg_color, "black");
    assert_eq!(zooming.settings().scroll_threshold, 40.0);
    assert_eq!(host.style_of(overlay, "background-color"), "black");
    assert_eq!(host.style_of(overlay, "z-index"), "10");
    assert_eq!(
        host.style_of(overlay, "transition"),
        "opacity 1s cubic-bezier(0.4, 0, 0, 1)"
    );
}

#[test]
fn prefixed_style_names_are_used_when_needed() {
    let (mut host, img) = page();
    host.unsupported = vec!["transform", "transition"];
    let mut zooming = Zooming::new(&mut host, Options::default());

    zooming.open(&mut host, &img).unwrap();
    assert_eq!(host.style_of(img, "transform"), "");
    assert_eq!(
        host.style_of(img, "-webkit-transform"),
        "translate3d(200px, 200px, 0px) scale(2.5,2.5)"
    );
    assert_eq!(
        host.style_of(img, "-webkit-transition"),
        "-webkit-transform 0.4s cubic-bezier(0.4, 0, 0, 1)"
    );

    end_transition(&mut zooming, &mut host);
    zooming.close(&mut host).unwrap();
    end_transition(&mut zooming, &mut host);
    assert_eq!(host.style_of(img, "-webkit-transform"), "");
}

#[test]
fn instances_do_not_share_state() {
    let (mut host, img) = page();
    let other_img = host.add_image(Rect::new(0.0, 0.0, 100.0, 100.0));
    let mut first = Zooming::new(&mut host, Options::default());
    let mut second = Zooming::new(&mut host, Options::default());
    assert_ne!(first.overlay(), second.overlay());

    first.open(&mut host, &img).unwrap();
    assert!(!second.state().shown);

    second.open(&mut host, &other_img).unwrap();
    assert!(second.state().shown);
    assert_eq!(host.body, [*first.overlay(), *second.overlay()]);

    end_transition(&mut first, &mut host);
    assert!(!first.state().lock);
    assert!(second.state().lock);
}
