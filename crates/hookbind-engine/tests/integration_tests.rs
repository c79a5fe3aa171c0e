use dom::{Document, Event, NodeId, NodeSpec};
use hookbind_engine::{Engine, HAD_ATTR, HOOK_ATTR};

/// Build a fixture document from a RON spec.
fn build(spec: &str) -> Document {
    let spec: NodeSpec = ron::from_str(spec).expect("valid fixture spec");
    Document::from_spec(&spec)
}

/// Create an engine initialized over the whole document.
fn init_engine(doc: &Document) -> Engine {
    let mut engine = Engine::new();
    let bound = engine.init(doc, None, Some("test"), false);
    assert!(bound > 0, "fixture should bind at least one element");
    engine
}

/// Fire one event and return whether its default was prevented.
fn fire(engine: &mut Engine, doc: &mut Document, node: NodeId, name: &str) -> bool {
    let mut event = Event::new(name);
    let _ = engine.dispatch(doc, node, &mut event);
    event.default_prevented()
}

#[test]
fn click_shows_or_hides_overlay_by_checked_state() {
    let mut doc = build(
        r##"(tag: "body", children: [
            (tag: "input", attrs: {"data-had": r#"{"click":[["show:hide","overlay","node.checked"]]}"#}),
            (tag: "div", attrs: {"data-hook": "overlay"}, hidden: true),
        ])"##,
    );
    let kids = doc.children(doc.root()).to_vec();
    let (input, overlay) = (kids[0], kids[1]);
    let mut engine = init_engine(&doc);

    doc.set_checked(input, true);
    let prevented = fire(&mut engine, &mut doc, input, "click");
    assert!(doc.visible(overlay));
    assert!(prevented, "prevent_default defaults to true");

    doc.set_checked(input, false);
    let _ = fire(&mut engine, &mut doc, input, "click");
    assert!(!doc.visible(overlay));
}

#[test]
fn empty_target_acts_on_the_triggering_element() {
    let mut doc = Document::new("body");
    let button = doc.append(doc.root(), "button");
    doc.set_attr(
        button,
        HAD_ATTR,
        r#"{"click": [["class-add", "", true, "active"]]}"#,
    );
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, button, "click");
    assert!(doc.has_class(button, "active"));
}

#[test]
fn malformed_definition_is_skipped_and_siblings_still_run() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    // arity 5 is invalid; the class-add after it must still run
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [["show", "x", true, "p", "extra"], ["class-add", "", true, "ok"]]}"#,
    );
    let mut engine = init_engine(&doc);

    let mut event = Event::new("click");
    let outcome = engine.dispatch(&mut doc, a, &mut event);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.executed, 1);
    assert!(doc.has_class(a, "ok"));
}

#[test]
fn condition_script_failure_does_not_stop_siblings() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [["show", "", "no_such_fn()"], ["check", ""]]}"#,
    );
    let mut engine = init_engine(&doc);

    let mut event = Event::new("click");
    let outcome = engine.dispatch(&mut doc, a, &mut event);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.executed, 1);
    assert!(doc.checked(a));
}

#[test]
fn double_init_binds_one_listener() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(a, HAD_ATTR, r#"{"click": [["toggle", "panel"]]}"#);
    let panel = doc.append(doc.root(), "div");
    doc.set_attr(panel, HOOK_ATTR, "panel");
    doc.set_visible(panel, false);

    let mut engine = Engine::new();
    assert_eq!(engine.init(&doc, None, Some("page"), false), 1);
    // same marker again: no-op
    assert_eq!(engine.init(&doc, None, Some("page"), false), 0);
    // forced re-init rebinds without stacking listeners
    assert_eq!(engine.init(&doc, None, Some("page"), true), 1);

    // a duplicated listener would toggle twice and leave the panel hidden
    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.visible(panel));
}

#[test]
fn init_scope_limits_the_scan() {
    let mut doc = Document::new("body");
    let section = doc.append(doc.root(), "section");
    let inside = doc.append(section, "a");
    doc.set_attr(inside, HAD_ATTR, r#"{"click": [["check", ""]]}"#);
    let outside = doc.append(doc.root(), "a");
    doc.set_attr(outside, HAD_ATTR, r#"{"click": [["check", ""]]}"#);

    let mut engine = Engine::new();
    assert_eq!(engine.init(&doc, Some(section), Some("section"), false), 1);
    assert!(engine.is_bound(inside, "click"));
    assert!(!engine.is_bound(outside, "click"));
}

#[test]
fn cached_target_set_is_reused_until_bypassed() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(a, HAD_ATTR, r#"{"click": [["show", "overlay"]]}"#);
    let first = doc.append(doc.root(), "div");
    doc.set_attr(first, HOOK_ATTR, "overlay");
    doc.set_visible(first, false);
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.visible(first));

    // a marker added after the first resolution is invisible to the cache
    let second = doc.append(doc.root(), "div");
    doc.set_attr(second, HOOK_ATTR, "overlay");
    doc.set_visible(second, false);
    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(!doc.visible(second));

    // until the entry is invalidated
    engine.invalidate_hook("overlay");
    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.visible(second));
}

#[test]
fn non_cacheable_definition_requeries_every_time() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [{"act": "show", "hook": "overlay", "cache": false}]}"#,
    );
    let first = doc.append(doc.root(), "div");
    doc.set_attr(first, HOOK_ATTR, "overlay");
    doc.set_visible(first, false);
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.visible(first));

    let second = doc.append(doc.root(), "div");
    doc.set_attr(second, HOOK_ATTR, "overlay");
    doc.set_visible(second, false);
    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.visible(second));
}

#[test]
fn target_resolution_falls_back_to_relative_and_raw_selectors() {
    let mut doc = Document::new("body");
    let panel = doc.append(doc.root(), "div");
    doc.add_class(panel, "panel");
    let a = doc.append(panel, "a");
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [["class-add", "closest .panel", true, "from-closest"]],
            "change": [["class-add", ".panel", true, "from-raw"]]}"#,
    );
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.has_class(panel, "from-closest"));
    let _ = fire(&mut engine, &mut doc, a, "change");
    assert!(doc.has_class(panel, "from-raw"));
}

#[test]
fn trigger_reuses_the_outer_condition_verdict() {
    let mut doc = Document::new("body");
    let input = doc.append(doc.root(), "input");
    doc.set_attr(
        input,
        HAD_ATTR,
        r#"{"click": [["trigger", "menu", "node.checked", "expand:collapse"]]}"#,
    );
    let menu = doc.append(doc.root(), "div");
    doc.set_attr(menu, HOOK_ATTR, "menu");
    doc.set_attr(
        menu,
        HAD_ATTR,
        r#"{"expand": [["class-add", "", true, "wide"]], "collapse": [["class-add", "", true, "shut"]]}"#,
    );
    let mut engine = init_engine(&doc);

    doc.set_checked(input, false);
    let _ = fire(&mut engine, &mut doc, input, "click");
    assert!(doc.has_class(menu, "shut"));
    assert!(!doc.has_class(menu, "wide"));

    doc.set_checked(input, true);
    let _ = fire(&mut engine, &mut doc, input, "click");
    assert!(doc.has_class(menu, "wide"));
}

#[test]
fn open_adds_state_class_and_raises_notification_event() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(a, HAD_ATTR, r#"{"click": [["open", "drawer"]]}"#);
    let drawer = doc.append(doc.root(), "div");
    doc.set_attr(drawer, HOOK_ATTR, "drawer");
    doc.set_attr(
        drawer,
        HAD_ATTR,
        r#"{"open": [["class-add", "", true, "lit"]]}"#,
    );
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, a, "click");
    assert!(doc.has_class(drawer, "open"));
    assert!(doc.has_class(drawer, "lit"));
}

#[test]
fn do_callback_executes_returned_definitions_on_the_trigger() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [["do", "", true, "[[\"class-add\", \"\", true, \"from-script\"]]"]]}"#,
    );
    let mut engine = init_engine(&doc);

    let mut event = Event::new("click");
    let outcome = engine.dispatch(&mut doc, a, &mut event);
    assert_eq!(outcome.executed, 1);
    assert!(doc.has_class(a, "from-script"));
}

#[test]
fn unknown_action_is_a_silent_noop() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(a, HAD_ATTR, r#"{"click": [["explode", "overlay"]]}"#);
    let mut engine = init_engine(&doc);

    let mut event = Event::new("click");
    let outcome = engine.dispatch(&mut doc, a, &mut event);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.failed, 0);
}

#[test]
fn prevent_can_be_disabled_per_definition() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [{"act": "check", "hook": "", "prevent": false}]}"#,
    );
    let mut engine = init_engine(&doc);

    let prevented = fire(&mut engine, &mut doc, a, "click");
    assert!(!prevented);
}

#[test]
fn submit_action_reraises_submit_on_the_target() {
    let mut doc = Document::new("body");
    let form = doc.append(doc.root(), "form");
    doc.set_attr(form, HOOK_ATTR, "signup");
    doc.set_attr(
        form,
        HAD_ATTR,
        r#"{"submit": [["class-add", "", true, "submitted"]]}"#,
    );
    let button = doc.append(form, "button");
    doc.set_attr(button, HAD_ATTR, r#"{"click": [["submit", "signup"]]}"#);
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, button, "click");
    assert!(doc.has_class(form, "submitted"));
}

#[test]
fn scroll_records_an_anchor_with_offset() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(
        a,
        HAD_ATTR,
        r#"{"click": [["scroll", "top", true, {"offset": -40}]]}"#,
    );
    let top = doc.append(doc.root(), "div");
    doc.set_attr(top, HOOK_ATTR, "top");
    let mut engine = init_engine(&doc);

    let _ = fire(&mut engine, &mut doc, a, "click");
    let anchor = doc.scroll_anchor().expect("anchor recorded");
    assert_eq!(anchor.node, top);
    assert_eq!(anchor.offset, -40);
}

#[test]
fn dispatch_on_unbound_event_is_a_noop() {
    let mut doc = Document::new("body");
    let a = doc.append(doc.root(), "a");
    doc.set_attr(a, HAD_ATTR, r#"{"click": [["check", ""]]}"#);
    let mut engine = init_engine(&doc);

    let mut event = Event::new("change");
    let outcome = engine.dispatch(&mut doc, a, &mut event);
    assert_eq!(outcome, hookbind_engine::DispatchOutcome::default());
    assert!(!doc.checked(a));
}
