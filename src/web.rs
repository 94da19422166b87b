//! Browser binding: discovers the cards in the DOM, wires click and key
//! listeners, and drives the controller from `requestAnimationFrame`.
//!
//! Expected markup:
//!
//! ```html
//! <div class="card-group">
//!   <div class="card-inner">...</div>
//!   <div class="orbit-path"></div>            <!-- optional -->
//!   <div class="sub-cards-container">
//!     <div class="sub-card">...</div>
//!   </div>
//! </div>
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, Window};
use web_time::Instant;

use crate::analytics::{AnalyticsLogger, RequestInfo};
use crate::animation::DeckController;
use crate::deck::{
    CardId, CardLayout, ClickTarget, Deck, PageLayout, Stage, SubCardId, SubCardLayout, Target,
    Viewport,
};
use crate::error::CardfolioError;
use crate::geometry::Rect;
use crate::input::Key;
use crate::options::Options;

const CARD_ATTR: &str = "data-cardfolio-card";
const SUB_ATTR: &str = "data-cardfolio-sub";

/// DOM nodes of one card.
struct CardNodes {
    id: CardId,
    group: HtmlElement,
    inner: Option<HtmlElement>,
    path: Option<HtmlElement>,
}

/// Every element the stage is applied to.
struct PageNodes {
    body: Option<HtmlElement>,
    cards: Vec<CardNodes>,
    sub_cards: Vec<(SubCardId, HtmlElement)>,
}

/// Bind the engine to the current page.
///
/// Records a page view first. Fails with
/// [`CardfolioError::FrameClockUnavailable`] outside a browser window; the
/// page then simply stays static. Any other failure is also reported as an
/// error record.
pub fn mount(options: Options) -> Result<(), CardfolioError> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some((window, document)) = browser() else {
        log::error!("no window/document; interaction disabled");
        return Err(CardfolioError::FrameClockUnavailable);
    };

    let analytics = AnalyticsLogger::new(options.analytics.clone());
    let request = page_request(&window, &document);
    analytics.track_page_view(&request);

    bind(&window, &document, options).inspect_err(|e| analytics.track_error(e, Some(&request)))
}

fn bind(window: &Window, document: &Document, options: Options) -> Result<(), CardfolioError> {
    let (layout, nodes) = discover(window, document)?;
    options.validate()?;
    let deck = Deck::from_layout(&layout)?;
    log::info!("cardfolio mounted with {} cards", deck.cards().len());

    let controller = Rc::new(RefCell::new(DeckController::new(deck, options)));
    wire_clicks(document, &controller)?;
    wire_keys(document, &controller)?;
    wire_resize(window, &controller)?;

    let nodes = Rc::new(nodes);
    run_animation_loop(move || {
        let mut ctrl = controller.borrow_mut();
        let _ = ctrl.tick(Instant::now());
        apply_stage(ctrl.stage(), &nodes);
    });
    Ok(())
}

/// The page load as a request record.
fn page_request(window: &Window, document: &Document) -> RequestInfo {
    let path = window
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_owned());
    let referrer = document.referrer();
    RequestInfo {
        user_agent: window.navigator().user_agent().ok(),
        referrer: (!referrer.is_empty()).then_some(referrer),
        ..RequestInfo::new("GET", path)
    }
}

fn browser() -> Option<(Window, Document)> {
    let window = web_sys::window()?;
    let document = window.document()?;
    Some((window, document))
}

fn js_error(context: &str, err: &JsValue) -> CardfolioError {
    CardfolioError::MissingStructure(format!("{context}: {err:?}"))
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
    let defaults = Viewport::default();
    Viewport {
        width: dim(window.inner_width()).map_or(defaults.width, |w| w as f32),
        height: dim(window.inner_height()).map_or(defaults.height, |h| h as f32),
    }
}

/// Walk `.card-group` elements, tag them with ids and record their rest
/// geometry.
fn discover(
    window: &Window,
    document: &Document,
) -> Result<(PageLayout, PageNodes), CardfolioError> {
    let groups = document
        .query_selector_all(".card-group")
        .map_err(|e| js_error("query .card-group", &e))?;

    let mut layout = PageLayout {
        viewport: viewport(window),
        cards: Vec::new(),
    };
    let mut nodes = PageNodes {
        body: document.body(),
        cards: Vec::new(),
        sub_cards: Vec::new(),
    };
    let mut next_sub = 1;

    for i in 0..groups.length() {
        let Some(group) = groups
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let id = i + 1;
        group
            .set_attribute(CARD_ATTR, &id.to_string())
            .map_err(|e| js_error("tag card", &e))?;

        let bounds = group.get_bounding_client_rect();
        let z_index = window
            .get_computed_style(&group)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("z-index").ok())
            .and_then(|z| z.parse().ok())
            .unwrap_or(1);

        let mut sub_layouts = Vec::new();
        if let Ok(subs) = group.query_selector_all(".sub-cards-container .sub-card") {
            for j in 0..subs.length() {
                let Some(sub) = subs.item(j).and_then(|n| n.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                sub.set_attribute(SUB_ATTR, &next_sub.to_string())
                    .map_err(|e| js_error("tag sub-card", &e))?;
                let size = sub.get_bounding_client_rect();
                let defaults = SubCardLayout {
                    id: next_sub,
                    width: 80.0,
                    height: 100.0,
                };
                sub_layouts.push(SubCardLayout {
                    width: if size.width() > 0.0 { size.width() as f32 } else { defaults.width },
                    height: if size.height() > 0.0 { size.height() as f32 } else { defaults.height },
                    ..defaults
                });
                nodes.sub_cards.push((SubCardId(next_sub), sub));
                next_sub += 1;
            }
        }

        layout.cards.push(CardLayout {
            id,
            rect: Rect::new(
                bounds.left() as f32,
                bounds.top() as f32,
                bounds.width() as f32,
                bounds.height() as f32,
            ),
            z_index,
            sub_cards: sub_layouts,
        });
        nodes.cards.push(CardNodes {
            id: CardId(id),
            inner: child(&group, ".card-inner"),
            path: child(&group, ".orbit-path"),
            group,
        });
    }

    if layout.cards.is_empty() {
        log::warn!("no .card-group elements found");
    }
    Ok((layout, nodes))
}

fn child(parent: &Element, selector: &str) -> Option<HtmlElement> {
    parent
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

/// Resolve what a click landed on from the tagged ancestors of its target.
/// Sub-cards are checked first so their clicks never reach the card.
fn click_target(event: &MouseEvent) -> ClickTarget {
    let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return ClickTarget::Outside;
    };
    let tagged = |attr: &str| -> Option<u32> {
        let node = element.closest(&format!("[{attr}]")).ok().flatten()?;
        node.get_attribute(attr)?.parse().ok()
    };
    if let Some(sub) = tagged(SUB_ATTR) {
        return ClickTarget::SubCard(SubCardId(sub));
    }
    tagged(CARD_ATTR).map_or(ClickTarget::Outside, |card| ClickTarget::Card(CardId(card)))
}

fn wire_clicks(
    document: &Document,
    controller: &Rc<RefCell<DeckController>>,
) -> Result<(), CardfolioError> {
    let ctrl = Rc::clone(controller);
    let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let target = click_target(&event);
        let _ = ctrl.borrow_mut().click(target, Instant::now());
    });
    document
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(|e| js_error("click listener", &e))?;
    // Lives as long as the page.
    closure.forget();
    Ok(())
}

fn wire_keys(
    document: &Document,
    controller: &Rc<RefCell<DeckController>>,
) -> Result<(), CardfolioError> {
    let ctrl = Rc::clone(controller);
    let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if Key::from_dom(&event.key()) == Key::Escape {
            let _ = ctrl.borrow_mut().request_reset(Instant::now());
        }
    });
    document
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .map_err(|e| js_error("keydown listener", &e))?;
    closure.forget();
    Ok(())
}

fn wire_resize(
    window: &Window,
    controller: &Rc<RefCell<DeckController>>,
) -> Result<(), CardfolioError> {
    let ctrl = Rc::clone(controller);
    let closure = Closure::<dyn FnMut()>::new(move || {
        if let Some(window) = web_sys::window() {
            let size = viewport(&window);
            ctrl.borrow_mut().resize(size.width, size.height);
        }
    });
    window
        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .map_err(|e| js_error("resize listener", &e))?;
    closure.forget();
    Ok(())
}

fn run_animation_loop<F>(mut callback: F)
where
    F: FnMut() + 'static,
{
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = Rc::clone(&f);

    *g.borrow_mut() = Some(Closure::new(move || {
        callback();
        if let Some(next) = f.borrow().as_ref() {
            request_animation_frame(next);
        }
    }));

    if let Some(first) = g.borrow().as_ref() {
        request_animation_frame(first);
    };
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    let Some(window) = web_sys::window() else {
        log::error!("frame clock lost");
        return;
    };
    if let Err(e) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

fn set_style(element: &HtmlElement, name: &str, value: &str) {
    let _ = element.style().set_property(name, value);
}

fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

/// Write the stage into element styles and classes.
fn apply_stage(stage: &Stage, nodes: &PageNodes) {
    for card in &nodes.cards {
        let target = Target::Card(card.id);
        let props = stage.props(target);
        let flags = stage.flags(target);
        set_style(
            &card.group,
            "transform",
            &format!("translate({}px, {}px) scale({})", props.x, props.y, props.scale),
        );
        set_style(&card.group, "opacity", &props.opacity.to_string());
        set_style(&card.group, "z-index", &props.z_index.to_string());
        set_class(&card.group, "selected", flags.selected);
        set_class(&card.group, "deselected", flags.deselected);

        if let Some(inner) = &card.inner {
            let rotation = stage.props(Target::CardInner(card.id)).rotation_y;
            set_style(inner, "transform", &format!("rotateY({rotation}deg)"));
        }
        if let Some(path) = &card.path {
            let ring = stage.props(Target::OrbitPath(card.id));
            let diameter = ring.radius * 2.0;
            set_style(path, "width", &format!("{diameter}px"));
            set_style(path, "height", &format!("{diameter}px"));
            set_style(path, "opacity", &ring.opacity.to_string());
            set_style(path, "visibility", if ring.visible { "visible" } else { "hidden" });
        }
    }

    for (id, element) in &nodes.sub_cards {
        let target = Target::SubCard(*id);
        let props = stage.props(target);
        set_style(
            element,
            "transform",
            &format!(
                "translate(-50%, -50%) translate({}px, {}px) scale({})",
                props.x, props.y, props.scale
            ),
        );
        set_style(element, "opacity", &props.opacity.to_string());
        set_style(element, "z-index", &props.z_index.to_string());
        set_style(element, "visibility", if props.visible { "visible" } else { "hidden" });
        set_class(element, "focused", stage.flags(target).focused);
    }

    if let Some(body) = &nodes.body {
        let page = stage.page();
        set_class(body, "dimmed-background", page.dimmed_background);
        set_class(body, "active", page.dimmed_background);
        set_class(body, "sub-card-interaction-lock", page.interaction_lock);
    }
}
