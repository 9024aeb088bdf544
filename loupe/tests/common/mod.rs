// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document used by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::BTreeMap;
use std::time::Duration;

use kurbo::{Rect, Size};
use loupe::{Event, Host, Subscriptions, Task, TimerId, Zooming};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub rect: Rect,
    pub natural: Size,
}

#[derive(Clone, Debug)]
pub struct Timer {
    pub id: TimerId,
    pub delay: Duration,
    pub task: Task,
}

#[derive(Debug)]
pub struct TestHost {
    pub nodes: Vec<Node>,
    pub body: Vec<NodeId>,
    pub body_cursor: String,
    pub viewport: Size,
    pub timers: Vec<Timer>,
    pub next_timer: u64,
    pub subscriptions: Subscriptions,
    pub subscribe_calls: usize,
    pub click_listeners: Vec<NodeId>,
    pub opened_windows: Vec<String>,
    pub preloaded: Vec<String>,
    pub layouts: usize,
    pub unsupported: Vec<&'static str>,
}

impl TestHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            body: Vec::new(),
            body_cursor: String::new(),
            viewport,
            timers: Vec::new(),
            next_timer: 0,
            subscriptions: Subscriptions::empty(),
            subscribe_calls: 0,
            click_listeners: Vec::new(),
            opened_windows: Vec::new(),
            preloaded: Vec::new(),
            layouts: 0,
            unsupported: Vec::new(),
        }
    }

    pub fn add(&mut self, tag: &'static str, rect: Rect) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("few nodes"));
        self.nodes.push(Node {
            tag,
            rect,
            ..Node::default()
        });
        id
    }

    pub fn add_image(&mut self, rect: Rect) -> NodeId {
        let id = self.add("img", rect);
        self.node_mut(id).natural = rect.size();
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn with_attr(&mut self, id: NodeId, name: &str, value: &str) -> NodeId {
        self.node_mut(id)
            .attributes
            .insert(name.to_owned(), value.to_owned());
        id
    }

    pub fn with_class(&mut self, id: NodeId, class: &'static str) -> NodeId {
        self.node_mut(id).classes.push(class);
        id
    }

    pub fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.append_child(&parent, &child);
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attributes.get(name).map(String::as_str)
    }

    pub fn style_of(&self, id: NodeId, property: &str) -> &str {
        self.node(id)
            .styles
            .get(property)
            .map_or("", String::as_str)
    }

    pub fn has_timer(&self, matches: impl Fn(&Task) -> bool) -> bool {
        self.timers.iter().any(|timer| matches(&timer.task))
    }

    /// Supports `.class`, `tag`, `[name]`, `[name="value"]`, and `tag[...]`.
    fn matches(&self, id: NodeId, selector: &str) -> bool {
        let node = self.node(id);
        if let Some(class) = selector.strip_prefix('.') {
            return node.classes.contains(&class);
        }
        let (tag, attr) = match selector.split_once('[') {
            Some((tag, rest)) => (tag, rest.strip_suffix(']')),
            None => (selector, None),
        };
        if !tag.is_empty() && node.tag != tag {
            return false;
        }
        match attr.map(|attr| attr.split_once('=')) {
            None => true,
            Some(Some((name, value))) => {
                node.attributes.get(name).map(String::as_str) == Some(value.trim_matches('"'))
            }
            Some(None) => attr.is_some_and(|name| node.attributes.contains_key(name)),
        }
    }
}

impl Host for TestHost {
    type Element = NodeId;

    fn is_image(&self, el: &NodeId) -> bool {
        self.node(*el).tag == "img"
    }

    fn is_anchor(&self, el: &NodeId) -> bool {
        self.node(*el).tag == "a"
    }

    fn bounding_rect(&self, el: &NodeId) -> Rect {
        self.node(*el).rect
    }

    fn natural_size(&self, el: &NodeId) -> Size {
        self.node(*el).natural
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.node(*el).parent
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.node(*el).attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, el: &NodeId, name: &str, value: &str) {
        self.with_attr(*el, name, value);
    }

    fn remove_attribute(&mut self, el: &NodeId, name: &str) {
        self.node_mut(*el).attributes.remove(name);
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(|i| NodeId(u32::try_from(i).expect("few nodes")))
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    fn supports_style(&self, property: &str) -> bool {
        !self.unsupported.contains(&property)
    }

    fn style(&self, el: &NodeId, property: &str) -> String {
        self.style_of(*el, property).to_owned()
    }

    fn set_style(&mut self, el: &NodeId, property: &str, value: &str) {
        let styles = &mut self.node_mut(*el).styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_owned(), value.to_owned());
        }
    }

    fn force_layout(&mut self, _el: &NodeId) {
        self.layouts += 1;
    }

    fn set_body_cursor(&mut self, cursor: &str) {
        cursor.clone_into(&mut self.body_cursor);
    }

    fn create_overlay(&mut self) -> NodeId {
        self.add("div", Rect::ZERO)
    }

    fn clone_shallow(&mut self, el: &NodeId) -> Option<NodeId> {
        let mut node = self.node(*el).clone();
        node.parent = None;
        node.children.clear();
        let id = NodeId(u32::try_from(self.nodes.len()).expect("few nodes"));
        self.nodes.push(node);
        Some(id)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.node_mut(*child).parent = Some(*parent);
        self.node_mut(*parent).children.push(*child);
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.node_mut(*parent).children.retain(|c| c != child);
        self.node_mut(*child).parent = None;
    }

    fn append_to_body(&mut self, el: &NodeId) {
        self.body.push(*el);
    }

    fn remove_from_body(&mut self, el: &NodeId) {
        self.body.retain(|b| b != el);
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.push(Timer { id, delay, task });
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.retain(|t| t.id != timer);
    }

    fn subscribe(&mut self, active: Subscriptions) {
        self.subscriptions = active;
        self.subscribe_calls += 1;
    }

    fn listen_click(&mut self, el: &NodeId) {
        self.click_listeners.push(*el);
    }

    fn open_in_new_window(&mut self, url: &str) {
        self.opened_windows.push(url.to_owned());
    }

    fn preload_image(&mut self, url: &str) {
        self.preloaded.push(url.to_owned());
    }
}

/// Runs every scheduled task whose kind matches, in scheduling order.
pub fn run_timers(
    zooming: &mut Zooming<NodeId>,
    host: &mut TestHost,
    matches: impl Fn(&Task) -> bool,
) -> usize {
    let (due, kept): (Vec<_>, Vec<_>) = host.timers.drain(..).partition(|t| matches(&t.task));
    host.timers = kept;
    for timer in &due {
        zooming.run_task(host, timer.task);
    }
    due.len()
}

/// Lets the overlay fade in.
pub fn tick(zooming: &mut Zooming<NodeId>, host: &mut TestHost) {
    run_timers(zooming, host, |task| *task == Task::ShowOverlay);
}

/// Reports the end of the running transition on the current target.
pub fn end_transition(zooming: &mut Zooming<NodeId>, host: &mut TestHost) {
    if let Some(target) = zooming.target().map(|t| *t.element()) {
        zooming.handle(host, Event::TransitionEnd { target });
    }
}

/// Opens `el` and finishes the open transition.
pub fn open_settled(zooming: &mut Zooming<NodeId>, host: &mut TestHost, el: NodeId) {
    zooming.open(host, &el).expect("open accepted");
    tick(zooming, host);
    end_transition(zooming, host);
}

/// A 1000x800 viewport with one 400x200 image at (100, 100).
pub fn page() -> (TestHost, NodeId) {
    let mut host = TestHost::new(Size::new(1000.0, 800.0));
    let img = host.add_image(Rect::new(100.0, 100.0, 500.0, 300.0));
    (host, img)
}
