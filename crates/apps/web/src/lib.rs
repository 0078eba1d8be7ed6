use std::cell::RefCell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::math::Rotation;
use gloo_net::http::Request;
use scene::{
    CatalogFeatureSet, CatalogKind, ContourKey, DisplayOptions, FieldId, FieldSelection, LocalizationContour,
    ObservationFootprintSet,
};
use skymap::{SkyMap, SkyMapConfig, SkyMapHost};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub mod canvas;

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

/// Widget notifications waiting to be handed to JS once the state borrow is released.
#[derive(Debug, Clone, PartialEq)]
enum HostEvent {
    SelectedFields(Vec<FieldId>),
    Rotation(Rotation),
    Link(String),
}

/// Holds the page's field selection and queues callbacks.
#[derive(Debug, Default)]
struct JsHost {
    selection: FieldSelection,
    events: Vec<HostEvent>,
}

impl SkyMapHost for JsHost {
    fn selected_fields(&self) -> &FieldSelection {
        &self.selection
    }

    fn selected_fields_mut(&mut self) -> &mut FieldSelection {
        &mut self.selection
    }

    fn on_selected_fields_change(&mut self, ids: &[FieldId]) {
        self.events.push(HostEvent::SelectedFields(ids.to_vec()));
    }

    fn on_rotation_change(&mut self, rotation: Rotation) {
        self.events.push(HostEvent::Rotation(rotation));
    }

    fn on_link_activated(&mut self, href: &str) {
        self.events.push(HostEvent::Link(href.to_string()));
    }
}

#[derive(Default)]
struct Callbacks {
    on_rotation_change: Option<js_sys::Function>,
    on_selected_fields_change: Option<js_sys::Function>,
    on_link: Option<js_sys::Function>,
}

/// Latest fetch issued per data slot; older responses are dropped.
#[derive(Debug, Default, Clone, Copy)]
struct FetchTickets {
    sources: u64,
    galaxies: u64,
    observations: u64,
    instrument: u64,
}

#[derive(Default)]
struct ViewerState {
    map: Option<SkyMap<JsHost>>,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    callbacks: Callbacks,
    tickets: FetchTickets,
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
}

fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<ViewerState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    Ok(())
}

/// Binds the widget to `<canvas id=canvas_id>`.
///
/// `config_json` overrides tunables; `rotation` is `[λ, φ, γ]` or empty to
/// center on the first localization.
#[wasm_bindgen]
pub fn init_sky_map(canvas_id: &str, config_json: Option<String>, rotation: Option<Vec<f64>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing {canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let config = match config_json.as_deref() {
        Some(json) => SkyMapConfig::from_json_str(json).map_err(js_err)?,
        None => SkyMapConfig::default(),
    };
    let rotation = match rotation.as_deref() {
        None | Some([]) => None,
        Some(&[lambda, phi]) => Some(Rotation::new(lambda, phi, 0.0)),
        Some(&[lambda, phi, gamma]) => Some(Rotation::new(lambda, phi, gamma)),
        Some(_) => return Err(JsValue::from_str("rotation must have 2 or 3 components")),
    };
    let width = f64::from(canvas.width());
    let height = f64::from(canvas.height());
    let map = SkyMap::new(JsHost::default(), config, width, height, rotation).map_err(js_err)?;

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.map = Some(map);
        s.canvas = Some(canvas);
        s.ctx = Some(ctx);
    });
    repaint()
}

fn repaint() -> Result<(), JsValue> {
    with_state(|state| {
        let s = state.borrow();
        match (&s.map, &s.ctx) {
            (Some(map), Some(ctx)) => Some(canvas::paint(ctx, map.scene(), map.view().width(), map.view().height())),
            _ => None,
        }
    })
    .unwrap_or(Ok(()))
}

/// Runs `f` on the widget, repaints, then delivers queued callbacks outside
/// the state borrow so JS handlers may call back into this module.
fn update<F>(f: F) -> Result<(), JsValue>
where
    F: FnOnce(&mut SkyMap<JsHost>),
{
    let (events, callbacks) = with_state(|state| {
        let mut s = state.borrow_mut();
        let Some(map) = s.map.as_mut() else {
            return (Vec::new(), (None, None, None));
        };
        f(map);
        let events = std::mem::take(&mut map.host_mut().events);
        let c = &s.callbacks;
        (
            events,
            (
                c.on_selected_fields_change.clone(),
                c.on_rotation_change.clone(),
                c.on_link.clone(),
            ),
        )
    });
    repaint()?;

    let (on_selection, on_rotation, on_link) = callbacks;
    for event in events {
        match event {
            HostEvent::SelectedFields(ids) => {
                if let Some(f) = &on_selection {
                    let arr: js_sys::Array = ids.iter().map(|&id| JsValue::from_f64(id as f64)).collect();
                    f.call1(&JsValue::NULL, &arr)?;
                }
            }
            HostEvent::Rotation(rotation) => {
                if let Some(f) = &on_rotation {
                    let arr: js_sys::Array = rotation.to_array().iter().map(|&v| JsValue::from_f64(v)).collect();
                    f.call1(&JsValue::NULL, &arr)?;
                }
            }
            HostEvent::Link(href) => {
                if let Some(f) = &on_link {
                    f.call1(&JsValue::NULL, &JsValue::from_str(&href))?;
                }
            }
        }
    }
    Ok(())
}

#[wasm_bindgen]
pub fn set_on_rotation_change(f: Option<js_sys::Function>) {
    with_state(|state| state.borrow_mut().callbacks.on_rotation_change = f);
}

#[wasm_bindgen]
pub fn set_on_selected_fields_change(f: Option<js_sys::Function>) {
    with_state(|state| state.borrow_mut().callbacks.on_selected_fields_change = f);
}

#[wasm_bindgen]
pub fn set_on_link(f: Option<js_sys::Function>) {
    with_state(|state| state.borrow_mut().callbacks.on_link = f);
}

/// Replaces the selection from the page; no change callback fires.
#[wasm_bindgen]
pub fn set_selected_fields(ids: Vec<f64>) -> Result<(), JsValue> {
    let ids = ids
        .into_iter()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as FieldId);
    let selection = FieldSelection::from_ids(ids);
    update(|map| {
        map.host_mut().selection = selection;
        map.sync_selection();
    })
}

#[wasm_bindgen]
pub fn set_rotation(lambda: f64, phi: f64, gamma: f64) -> Result<(), JsValue> {
    update(|map| map.set_rotation(Rotation::new(lambda, phi, gamma)))
}

#[wasm_bindgen]
pub fn set_display(json: &str) -> Result<(), JsValue> {
    let display: DisplayOptions = serde_json::from_str(json).map_err(js_err)?;
    update(|map| map.set_display(display))
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64) -> Result<(), JsValue> {
    with_state(|state| {
        if let Some(canvas) = &state.borrow().canvas {
            canvas.set_width(width.max(0.0) as u32);
            canvas.set_height(height.max(0.0) as u32);
        }
    });
    update(|map| map.resize(width, height))
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) -> Result<(), JsValue> {
    update(|map| map.pointer_down(x, y))
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) -> Result<(), JsValue> {
    update(|map| map.pointer_move(x, y))
}

#[wasm_bindgen]
pub fn pointer_up(x: f64, y: f64) -> Result<(), JsValue> {
    update(|map| map.pointer_up(x, y))
}

#[wasm_bindgen]
pub fn pointer_leave() -> Result<(), JsValue> {
    update(|map| map.pointer_leave())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url).send().await.map_err(js_err)?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {} for {url}", resp.status())));
    }
    resp.text().await.map_err(js_err)
}

/// Switches to a localization and fetches its contour.
///
/// Only the newest request for the current key is ever drawn; an older
/// fetch that finishes late is kept in the cache but not shown.
#[wasm_bindgen]
pub fn load_localization(url: String, id: f64, dateobs: String, localization_name: String) -> Result<(), JsValue> {
    let key = ContourKey::new(dateobs, localization_name);
    let mut request = None;
    update(|map| request = Some(map.request_localization(key.clone())))?;
    let Some(request) = request else {
        return Err(JsValue::from_str("sky map not initialized"));
    };

    spawn_local(async move {
        let features = match fetch_text(&url).await.and_then(|text| {
            formats::parse_feature_collection(&text).map_err(js_err)
        }) {
            Ok(features) => features,
            Err(err) => {
                log(&format!("localization {key} failed: {err:?}"));
                return;
            }
        };
        let contour = LocalizationContour::new(id as u64, key, features);
        let mut resolution = None;
        if let Err(err) = update(|map| resolution = Some(map.resolve_localization(request, contour))) {
            log(&format!("localization update failed: {err:?}"));
        }
        if let Some(resolution) = resolution {
            log(&format!("localization resolved: {resolution:?}"));
        }
    });
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum DataSlot {
    Sources,
    Galaxies,
    Observations,
    Instrument,
}

impl DataSlot {
    fn ticket(self, tickets: &mut FetchTickets) -> &mut u64 {
        match self {
            DataSlot::Sources => &mut tickets.sources,
            DataSlot::Galaxies => &mut tickets.galaxies,
            DataSlot::Observations => &mut tickets.observations,
            DataSlot::Instrument => &mut tickets.instrument,
        }
    }
}

fn load_slot(slot: DataSlot, url: String) {
    let ticket = with_state(|state| {
        let mut s = state.borrow_mut();
        let t = slot.ticket(&mut s.tickets);
        *t += 1;
        *t
    });

    spawn_local(async move {
        let text = match fetch_text(&url).await {
            Ok(text) => text,
            Err(err) => {
                log(&format!("{slot:?} fetch failed: {err:?}"));
                return;
            }
        };
        let current = with_state(|state| *slot.ticket(&mut state.borrow_mut().tickets));
        if current != ticket {
            log(&format!("{slot:?} response superseded"));
            return;
        }

        let applied = match slot {
            DataSlot::Instrument => formats::parse_instrument(&text)
                .map_err(js_err)
                .and_then(|instrument| update(|map| map.set_instrument(Some(instrument)))),
            _ => formats::parse_feature_collection(&text).map_err(js_err).and_then(|features| {
                update(|map| match slot {
                    DataSlot::Sources => {
                        map.set_sources(Some(CatalogFeatureSet::from_features(CatalogKind::Sources, &features)))
                    }
                    DataSlot::Galaxies => {
                        map.set_galaxies(Some(CatalogFeatureSet::from_features(CatalogKind::Galaxies, &features)))
                    }
                    DataSlot::Observations => {
                        map.set_observations(Some(ObservationFootprintSet::from_features(&features)))
                    }
                    DataSlot::Instrument => {}
                })
            }),
        };
        if let Err(err) = applied {
            log(&format!("{slot:?} load failed: {err:?}"));
        }
    });
}

#[wasm_bindgen]
pub fn load_sources(url: String) {
    load_slot(DataSlot::Sources, url);
}

#[wasm_bindgen]
pub fn load_galaxies(url: String) {
    load_slot(DataSlot::Galaxies, url);
}

#[wasm_bindgen]
pub fn load_observations(url: String) {
    load_slot(DataSlot::Observations, url);
}

#[wasm_bindgen]
pub fn load_instrument(url: String) {
    load_slot(DataSlot::Instrument, url);
}
