use wasm_bindgen::prelude::*;

use crate::config::PaginatorConfig;

fn load_config(config_json: Option<String>) -> Result<PaginatorConfig, JsValue> {
    match config_json.as_deref() {
        None | Some("") => Ok(PaginatorConfig::default()),
        Some(json) => PaginatorConfig::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string())),
    }
}

/// Paginate one page of HTML. Returns the `Pagination` as a JS object.
#[wasm_bindgen]
pub fn paginate_html(html: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let config = load_config(config_json)?;
    let pagination = crate::paginate_markup(html, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&pagination).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render a proposal JSON document to the print-ready HTML document.
#[wasm_bindgen]
pub fn render_proposal(json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = load_config(config_json)?;
    crate::render_proposal_json(json, &config)
        .map(|doc| doc.to_html())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
