// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Host`] over the live DOM.

use alloc::collections::BTreeMap;
use alloc::rc::Weak;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use kurbo::{Point, Rect, Size};
use loupe::{Event, Host, Key, Modifiers, MouseButton, Subscriptions, Task, TimerId, Zooming};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent,
    MouseEvent, TouchEvent, TouchList, Window,
};

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) zooming: Option<Zooming<HtmlElement>>,
    pub(crate) host: WebHost,
}

type Handle = Weak<RefCell<Inner>>;

/// Runs `f` against the instance behind `handle`.
///
/// Returns `None` if the instance is gone or already borrowed, which happens
/// when a hook calls back into the same instance.
pub(crate) fn dispatch<R>(
    handle: &Handle,
    f: impl FnOnce(&mut Zooming<HtmlElement>, &mut WebHost) -> R,
) -> Option<R> {
    let shared = handle.upgrade()?;
    let Ok(mut inner) = shared.try_borrow_mut() else {
        tracing::warn!("re-entrant call into a Loupe instance dropped");
        return None;
    };
    let Inner { zooming, host } = &mut *inner;
    host.retired.clear();
    host.retired_timers.clear();
    let zooming = zooming.as_mut()?;
    Some(f(zooming, host))
}

fn warn_on_err<T>(operation: &'static str, result: Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(operation, ?error, "DOM call failed");
            None
        }
    }
}

/// A registered DOM event listener.
///
/// Detached listeners are parked in the host's retired list until the next
/// dispatch, since the closure may be the one currently running.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Option<Self> {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        warn_on_err(
            "addEventListener",
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            ),
        )?;
        Some(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(&self) {
        warn_on_err(
            "removeEventListener",
            self.target
                .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref()),
        );
    }
}

struct Timer {
    handle: i32,
    callback: Closure<dyn FnMut()>,
}

type Convert = fn(&web_sys::Event) -> Option<Event<HtmlElement>>;

/// Builds a listener callback that converts the raw event and routes it.
fn route(
    handle: Handle,
    convert: impl Fn(&web_sys::Event) -> Option<Event<HtmlElement>> + 'static,
) -> Closure<dyn FnMut(web_sys::Event)> {
    Closure::new(move |raw: web_sys::Event| {
        let Some(event) = convert(&raw) else {
            return;
        };
        if dispatch(&handle, |zooming, host| zooming.handle(host, event)) == Some(true) {
            raw.prevent_default();
        }
    })
}

fn modifiers(event: &MouseEvent) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, event.shift_key());
    modifiers.set(Modifiers::CTRL, event.ctrl_key());
    modifiers.set(Modifiers::ALT, event.alt_key());
    modifiers.set(Modifiers::META, event.meta_key());
    modifiers
}

fn client_position(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn convert_scroll(_: &web_sys::Event) -> Option<Event<HtmlElement>> {
    let window = web_sys::window()?;
    let position = Point::new(window.scroll_x().ok()?, window.scroll_y().ok()?);
    Some(Event::Scroll { position })
}

fn convert_keydown(raw: &web_sys::Event) -> Option<Event<HtmlElement>> {
    let key = Key::from_dom(&raw.dyn_ref::<KeyboardEvent>()?.key());
    Some(Event::KeyDown { key })
}

fn convert_resize(_: &web_sys::Event) -> Option<Event<HtmlElement>> {
    Some(Event::Resize)
}

fn convert_mouse(raw: &web_sys::Event) -> Option<Event<HtmlElement>> {
    let mouse = raw.dyn_ref::<MouseEvent>()?;
    let event = match raw.type_().as_str() {
        "mousedown" => Event::MouseDown {
            position: client_position(mouse),
            button: MouseButton::from_dom(mouse.button()),
            modifiers: modifiers(mouse),
        },
        "mousemove" => Event::MouseMove {
            position: client_position(mouse),
        },
        "mouseup" => Event::MouseUp {
            button: MouseButton::from_dom(mouse.button()),
            modifiers: modifiers(mouse),
        },
        _ => return None,
    };
    Some(event)
}

fn convert_touch(raw: &web_sys::Event) -> Option<Event<HtmlElement>> {
    let touch = raw.dyn_ref::<TouchEvent>()?;
    let event = match raw.type_().as_str() {
        "touchstart" => Event::TouchStart {
            touches: touch_points(&touch.touches()),
        },
        "touchmove" => Event::TouchMove {
            touches: touch_points(&touch.touches()),
        },
        "touchend" => Event::TouchEnd {
            remaining: touch.target_touches().length() as usize,
        },
        _ => return None,
    };
    Some(event)
}

fn convert_transition_end(raw: &web_sys::Event) -> Option<Event<HtmlElement>> {
    let target = raw.target()?.dyn_into::<HtmlElement>().ok()?;
    Some(Event::TransitionEnd { target })
}

/// DOM-backed [`Host`] for one Loupe instance.
pub struct WebHost {
    window: Window,
    document: Document,
    body: HtmlElement,
    overlay: HtmlElement,
    handle: Handle,
    groups: [Vec<Listener>; 4],
    always: Vec<Listener>,
    clicks: Vec<(HtmlElement, Listener)>,
    preloads: Vec<(String, HtmlImageElement, Vec<Listener>)>,
    timers: BTreeMap<u64, Timer>,
    next_timer: u64,
    retired: Vec<Listener>,
    retired_timers: Vec<Closure<dyn FnMut()>>,
}

impl core::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebHost")
            .field("overlay", &self.overlay)
            .field("clicks", &self.clicks.len())
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    const GROUPS: [Subscriptions; 4] = [
        Subscriptions::SCROLL,
        Subscriptions::KEYDOWN,
        Subscriptions::RESIZE,
        Subscriptions::GRAB,
    ];

    /// Binds to the current window and document and creates the overlay element.
    pub(crate) fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let overlay = document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;
        Ok(Self {
            window,
            document,
            body,
            overlay,
            handle: Weak::new(),
            groups: Default::default(),
            always: Vec::new(),
            clicks: Vec::new(),
            preloads: Vec::new(),
            timers: BTreeMap::new(),
            next_timer: 0,
            retired: Vec::new(),
            retired_timers: Vec::new(),
        })
    }

    /// Connects the host to its instance and attaches the permanent listeners.
    pub(crate) fn bind(&mut self, handle: Handle) {
        self.handle = handle;
        let document: &EventTarget = &self.document;
        let callback = route(self.handle.clone(), convert_transition_end);
        self.always
            .extend(Listener::attach(document, "transitionend", callback));
    }

    fn attach_group(&self, group: Subscriptions) -> Vec<Listener> {
        let window: &EventTarget = &self.window;
        let document: &EventTarget = &self.document;
        let wanted: Vec<(&EventTarget, &'static str, Convert)> = if group == Subscriptions::SCROLL {
            vec![(window, "scroll", convert_scroll as Convert)]
        } else if group == Subscriptions::KEYDOWN {
            vec![(document, "keydown", convert_keydown as Convert)]
        } else if group == Subscriptions::RESIZE {
            vec![(window, "resize", convert_resize as Convert)]
        } else if group == Subscriptions::GRAB {
            ["mousedown", "mousemove", "mouseup"]
                .map(|kind| (document, kind, convert_mouse as Convert))
                .into_iter()
                .chain(
                    ["touchstart", "touchmove", "touchend"]
                        .map(|kind| (document, kind, convert_touch as Convert)),
                )
                .collect()
        } else {
            Vec::new()
        };
        wanted
            .into_iter()
            .filter_map(|(target, kind, convert)| {
                Listener::attach(target, kind, route(self.handle.clone(), convert))
            })
            .collect()
    }

    fn retire(&mut self, listener: Listener) {
        listener.detach();
        self.retired.push(listener);
    }

    /// Drops the preload for `src` once it has loaded or failed.
    fn settle_preload(&mut self, src: &str) {
        if let Some(at) = self.preloads.iter().position(|(s, _, _)| s == src) {
            let (_, _, listeners) = self.preloads.swap_remove(at);
            for listener in listeners {
                self.retire(listener);
            }
        }
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        let listeners = self
            .groups
            .iter()
            .flatten()
            .chain(&self.always)
            .chain(self.clicks.iter().map(|(_, l)| l))
            .chain(self.preloads.iter().flat_map(|(_, _, l)| l));
        for listener in listeners {
            listener.detach();
        }
        for timer in self.timers.values() {
            self.window.clear_timeout_with_handle(timer.handle);
        }
    }
}

impl Host for WebHost {
    type Element = HtmlElement;

    fn is_image(&self, el: &HtmlElement) -> bool {
        el.dyn_ref::<HtmlImageElement>().is_some()
    }

    fn is_anchor(&self, el: &HtmlElement) -> bool {
        el.tag_name().eq_ignore_ascii_case("a")
    }

    fn bounding_rect(&self, el: &HtmlElement) -> Rect {
        let rect = el.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    fn natural_size(&self, el: &HtmlElement) -> Size {
        el.dyn_ref::<HtmlImageElement>().map_or(Size::ZERO, |img| {
            Size::new(f64::from(img.natural_width()), f64::from(img.natural_height()))
        })
    }

    fn parent(&self, el: &HtmlElement) -> Option<HtmlElement> {
        el.parent_element()?.dyn_into::<HtmlElement>().ok()
    }

    fn attribute(&self, el: &HtmlElement, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&mut self, el: &HtmlElement, name: &str, value: &str) {
        warn_on_err("setAttribute", el.set_attribute(name, value));
    }

    fn remove_attribute(&mut self, el: &HtmlElement, name: &str) {
        warn_on_err("removeAttribute", el.remove_attribute(name));
    }

    fn query_selector_all(&self, selector: &str) -> Vec<HtmlElement> {
        let Some(nodes) = warn_on_err("querySelectorAll", self.document.query_selector_all(selector))
        else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn supports_style(&self, property: &str) -> bool {
        let Ok(probe) = self.document.create_element("div") else {
            return false;
        };
        let Ok(probe) = probe.dyn_into::<HtmlElement>() else {
            return false;
        };
        let style = probe.style();
        style.set_property(property, "inherit").is_ok()
            && style
                .get_property_value(property)
                .is_ok_and(|value| value == "inherit")
    }

    fn style(&self, el: &HtmlElement, property: &str) -> String {
        el.style().get_property_value(property).unwrap_or_default()
    }

    fn set_style(&mut self, el: &HtmlElement, property: &str, value: &str) {
        let style = el.style();
        if value.is_empty() {
            warn_on_err("removeProperty", style.remove_property(property));
        } else {
            warn_on_err("setProperty", style.set_property(property, value));
        }
    }

    fn force_layout(&mut self, el: &HtmlElement) {
        let _ = el.offset_width();
    }

    fn set_body_cursor(&mut self, cursor: &str) {
        warn_on_err("setProperty", self.body.style().set_property("cursor", cursor));
    }

    fn create_overlay(&mut self) -> HtmlElement {
        let overlay: &EventTarget = &self.overlay;
        let callback = route(self.handle.clone(), |_| Some(Event::OverlayClick));
        self.always.extend(Listener::attach(overlay, "click", callback));
        self.overlay.clone()
    }

    fn clone_shallow(&mut self, el: &HtmlElement) -> Option<HtmlElement> {
        warn_on_err("cloneNode", el.clone_node())?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn append_child(&mut self, parent: &HtmlElement, child: &HtmlElement) {
        warn_on_err("appendChild", parent.append_child(child));
    }

    fn remove_child(&mut self, parent: &HtmlElement, child: &HtmlElement) {
        warn_on_err("removeChild", parent.remove_child(child));
    }

    fn append_to_body(&mut self, el: &HtmlElement) {
        warn_on_err("appendChild", self.body.append_child(el));
    }

    fn remove_from_body(&mut self, el: &HtmlElement) {
        warn_on_err("removeChild", self.body.remove_child(el));
    }

    fn viewport_size(&self) -> Size {
        let inner = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(f64::INFINITY)
        };
        let (client_width, client_height) = self
            .document
            .document_element()
            .map_or((f64::INFINITY, f64::INFINITY), |root| {
                (f64::from(root.client_width()), f64::from(root.client_height()))
            });
        let width = client_width.min(inner(self.window.inner_width()));
        let height = client_height.min(inner(self.window.inner_height()));
        if width.is_finite() && height.is_finite() {
            Size::new(width, height)
        } else {
            Size::ZERO
        }
    }

    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        self.next_timer += 1;
        let id = self.next_timer;
        let handle = self.handle.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            dispatch(&handle, |zooming, host| {
                if let Some(timer) = host.timers.remove(&id) {
                    host.retired_timers.push(timer.callback);
                }
                zooming.run_task(host, task);
            });
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "delays are a few hundred milliseconds"
        )]
        let millis = delay.as_millis() as i32;
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            );
        if let Some(handle) = warn_on_err("setTimeout", scheduled) {
            self.timers.insert(id, Timer { handle, callback });
        }
        TimerId(id)
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(timer) = self.timers.remove(&timer.0) {
            self.window.clear_timeout_with_handle(timer.handle);
            self.retired_timers.push(timer.callback);
        }
    }

    fn subscribe(&mut self, active: Subscriptions) {
        for (slot, group) in Self::GROUPS.into_iter().enumerate() {
            let attached = !self.groups[slot].is_empty();
            if active.contains(group) && !attached {
                self.groups[slot] = self.attach_group(group);
            } else if !active.contains(group) && attached {
                for listener in core::mem::take(&mut self.groups[slot]) {
                    self.retire(listener);
                }
            }
        }
    }

    fn listen_click(&mut self, el: &HtmlElement) {
        if self.clicks.iter().any(|(known, _)| known == el) {
            return;
        }
        let target = el.clone();
        let callback = route(self.handle.clone(), move |raw| {
            let mouse = raw.dyn_ref::<MouseEvent>()?;
            Some(Event::Click {
                target: target.clone(),
                modifiers: modifiers(mouse),
            })
        });
        if let Some(listener) = Listener::attach(el, "click", callback) {
            self.clicks.push((el.clone(), listener));
        }
    }

    fn open_in_new_window(&mut self, url: &str) {
        warn_on_err("open", self.window.open_with_url_and_target(url, "_blank"));
    }

    fn preload_image(&mut self, url: &str) {
        let Some(img) = warn_on_err("new Image", HtmlImageElement::new()) else {
            return;
        };
        let (handle, src) = (self.handle.clone(), String::from(url));
        let loaded: Closure<dyn FnMut(web_sys::Event)> = Closure::new(move |_: web_sys::Event| {
            let src = src.clone();
            dispatch(&handle, |zooming, host| {
                host.settle_preload(&src);
                zooming.handle(host, Event::ImageLoaded { src });
            });
        });
        let (handle, src) = (self.handle.clone(), String::from(url));
        let failed: Closure<dyn FnMut(web_sys::Event)> = Closure::new(move |_: web_sys::Event| {
            tracing::warn!(src = %src, "image preload failed");
            dispatch(&handle, |_, host| host.settle_preload(&src));
        });
        let listeners: Vec<Listener> = [("load", loaded), ("error", failed)]
            .into_iter()
            .filter_map(|(kind, callback)| Listener::attach(&img, kind, callback))
            .collect();
        if listeners.len() < 2 {
            for listener in &listeners {
                listener.detach();
            }
            return;
        }
        img.set_src(url);
        self.preloads.push((String::from(url), img, listeners));
    }
}
