use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use tracc_core::{
    search::zoom_target, ClimateAtlas, FeatureCollection, FillLayer, RenderFrame, VariableCatalog,
    ViewController,
};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_err)
}

/// Browser handle on a loaded atlas: the data, the current view and the fill
/// of every contour. The host fetches both datasets (with its own fallback)
/// and hands over the raw JSON text.
///
/// `onChange` listeners run inside a transition and receive the full
/// `{ state, fills, legend, stats }` frame, already recolored. They must not
/// call back into the `Atlas` while it is switching.
#[wasm_bindgen]
pub struct Atlas {
    atlas: Rc<ClimateAtlas>,
    features: FeatureCollection,
    layer: Rc<RefCell<FillLayer>>,
    view: ViewController,
    listeners: Rc<RefCell<Vec<js_sys::Function>>>,
    failure: Rc<RefCell<Option<JsValue>>>,
}

#[wasm_bindgen]
impl Atlas {
    /// Build from the climate table and GeoJSON text. `variables_json` may be
    /// empty for the built-in DRIAS catalog.
    #[wasm_bindgen(constructor)]
    pub fn new(records_json: &str, geojson: &str, variables_json: &str) -> Result<Atlas, JsValue> {
        let catalog = if variables_json.trim().is_empty() {
            VariableCatalog::drias()
        } else {
            VariableCatalog::from_json(variables_json.as_bytes()).map_err(js_err)?
        };
        let records = tracc_core::record::parse_records(records_json.as_bytes()).map_err(js_err)?;
        let features = FeatureCollection::from_json(geojson.as_bytes()).map_err(js_err)?;
        let atlas = Rc::new(ClimateAtlas::new(records, catalog.clone()));
        let mut view = ViewController::new(catalog);
        let layer = Rc::new(RefCell::new(FillLayer::new(&features)));
        layer.borrow_mut().recolor(&atlas, view.state());

        let listeners: Rc<RefCell<Vec<js_sys::Function>>> = Rc::default();
        let failure: Rc<RefCell<Option<JsValue>>> = Rc::default();
        {
            let atlas = Rc::clone(&atlas);
            let layer = Rc::clone(&layer);
            let listeners = Rc::clone(&listeners);
            let failure = Rc::clone(&failure);
            // Sole view observer: recolor first, then fan the frame out.
            view.subscribe(move |state| {
                let frame = atlas.render(state, &mut layer.borrow_mut());
                let payload = match serde_wasm_bindgen::to_value(&frame) {
                    Ok(v) => v,
                    Err(e) => {
                        failure.borrow_mut().get_or_insert(js_err(e));
                        return;
                    }
                };
                for listener in listeners.borrow().iter() {
                    if let Err(e) = listener.call1(&JsValue::NULL, &payload) {
                        failure.borrow_mut().get_or_insert(e);
                    }
                }
            });
        }
        Ok(Self { atlas, features, layer, view, listeners, failure })
    }

    /// `{ joined, unjoined }` over the loaded contours.
    #[wasm_bindgen(js_name = joinReport)]
    pub fn join_report(&self) -> Result<JsValue, JsValue> {
        to_js(&self.atlas.join_report(&self.features))
    }

    /// Current `{ variable, mode }`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.view.state())
    }

    /// Current `{ state, fills, legend, stats }` frame.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        let state = self.view.state();
        to_js(&RenderFrame {
            state: state.clone(),
            fills: self.layer.borrow().fills().to_vec(),
            legend: self.atlas.legend(state),
            stats: self.atlas.stats_panel(state),
        })
    }

    /// Register `callback(frame)`, run synchronously after every transition.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.listeners.borrow_mut().push(callback);
    }

    /// Re-run every listener on the current view.
    pub fn refresh(&mut self) -> Result<(), JsValue> {
        self.view.refresh();
        self.take_failure()
    }

    #[wasm_bindgen(js_name = selectVariable)]
    pub fn select_variable(&mut self, key: &str) -> Result<(), JsValue> {
        self.view.select_variable(key).map_err(js_err)?;
        self.take_failure()
    }

    #[wasm_bindgen(js_name = selectBivariate)]
    pub fn select_bivariate(&mut self) -> Result<(), JsValue> {
        self.view.select_bivariate();
        self.take_failure()
    }

    #[wasm_bindgen(js_name = selectUnivariate)]
    pub fn select_univariate(&mut self) -> Result<(), JsValue> {
        self.view.select_univariate();
        self.take_failure()
    }

    /// Fill of every contour, in GeoJSON feature order.
    pub fn fills(&self) -> js_sys::Array {
        self.layer.borrow().fills().iter().map(|c| JsValue::from_str(c)).collect()
    }

    #[wasm_bindgen(js_name = fillFor)]
    pub fn fill_for(&self, properties: JsValue) -> Result<String, JsValue> {
        let props: serde_json::Map<String, serde_json::Value> =
            serde_wasm_bindgen::from_value(properties).map_err(js_err)?;
        let key = tracc_core::normalize_key(&props);
        Ok(self.atlas.fill_color(self.view.state(), &key).to_string())
    }

    pub fn tooltip(&self, key: &str) -> Result<JsValue, JsValue> {
        to_js(&self.atlas.tooltip(self.view.state(), key))
    }

    #[wasm_bindgen(js_name = infoPanel)]
    pub fn info_panel(&self, key: &str) -> Result<JsValue, JsValue> {
        to_js(&self.atlas.info_panel(self.view.state(), key))
    }

    pub fn legend(&self) -> Result<JsValue, JsValue> {
        to_js(&self.atlas.legend(self.view.state()))
    }

    #[wasm_bindgen(js_name = statsPanel)]
    pub fn stats_panel(&self) -> Result<JsValue, JsValue> {
        to_js(&self.atlas.stats_panel(self.view.state()))
    }

    pub fn search(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.atlas.search(query))
    }

    /// Bounds and fit options for the commune picked in the search box.
    #[wasm_bindgen(js_name = zoomTo)]
    pub fn zoom_to(&self, key: &str) -> Result<JsValue, JsValue> {
        to_js(&zoom_target(&self.features, key))
    }
}

impl Atlas {
    /// First listener or serialization error raised by the last transition.
    fn take_failure(&self) -> Result<(), JsValue> {
        match self.failure.borrow_mut().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Canonical join key of a GeoJSON properties object.
#[wasm_bindgen(js_name = normalizeKey)]
pub fn normalize_key(properties: JsValue) -> Result<String, JsValue> {
    let props: serde_json::Map<String, serde_json::Value> =
        serde_wasm_bindgen::from_value(properties).map_err(js_err)?;
    Ok(tracc_core::normalize_key(&props))
}
