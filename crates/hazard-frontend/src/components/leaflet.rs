//! # Leaflet Bindings
//!
//! The slice of Leaflet.js the two maps use, plus small helpers for
//! building its option objects.

use hazard_client::config::TILE_ATTRIBUTION;
use hazard_domain::{HazardError, Position};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Marker artwork; bundlers break Leaflet's default icon path detection
pub const MARKER_ICON_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/images/marker-icon.png";
pub const MARKER_ICON_RETINA_URL: &str =
    "https://unpkg.com/leaflet@1.9.4/dist/images/marker-icon-2x.png";
pub const MARKER_SHADOW_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/images/marker-shadow.png";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L)]
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    pub fn create_map(container: &HtmlElement) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, lat_lng: &JsValue, zoom: u32) -> Map;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Map);

    #[wasm_bindgen(js_namespace = L)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &TileLayer, map: &Map);

    #[wasm_bindgen(method, js_name = on)]
    pub fn tile_on(this: &TileLayer, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = L)]
    pub type Icon;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    pub fn create_icon(options: &JsValue) -> Icon;

    #[wasm_bindgen(js_namespace = L)]
    #[derive(Clone)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn create_marker(lat_lng: &JsValue, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn marker_add_to(this: &Marker, map: &Map);

    #[wasm_bindgen(method, js_name = setLatLng)]
    pub fn set_lat_lng(this: &Marker, lat_lng: &JsValue);

    #[wasm_bindgen(method, js_name = getLatLng)]
    pub fn get_lat_lng(this: &Marker) -> LatLng;

    #[wasm_bindgen(method, js_name = on)]
    pub fn marker_on(this: &Marker, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = L)]
    pub type LatLng;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &LatLng) -> f64;

    #[wasm_bindgen(js_namespace = L)]
    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn create_layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn group_add_to(this: &LayerGroup, map: &Map);

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &LayerGroup);

    #[wasm_bindgen(js_namespace = L)]
    pub type CircleMarker;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    pub fn create_circle_marker(lat_lng: &JsValue, options: &JsValue) -> CircleMarker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &CircleMarker, content: &str) -> CircleMarker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn circle_add_to(this: &CircleMarker, group: &LayerGroup);
}

/// `true` once the Leaflet script has loaded
pub fn leaflet_loaded() -> bool {
    web_sys::window().is_some_and(|window| window.get("L").is_some())
}

/// `[lat, lng]` array as Leaflet expects it
pub fn lat_lng(position: Position) -> JsValue {
    let pair = js_sys::Array::new();
    pair.push(&JsValue::from_f64(position.lat));
    pair.push(&JsValue::from_f64(position.lng));
    pair.into()
}

/// Plain options object
pub fn options(entries: &[(&str, JsValue)]) -> JsValue {
    let object = js_sys::Object::new();
    for (key, value) in entries {
        // setting on a fresh plain object cannot fail
        let _ = js_sys::Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

/// JS event handler kept alive for as long as its map
pub type Listener = Closure<dyn FnMut(JsValue)>;

/// OSM tiles; failed tiles are logged and the map stays usable. The
/// returned listener must live as long as the map.
pub fn add_tiles(map: &Map, url: &str) -> Listener {
    let tiles = tile_layer(
        url,
        &options(&[
            ("maxZoom", 19.into()),
            ("attribution", TILE_ATTRIBUTION.into()),
        ]),
    );

    let on_error = Closure::wrap(Box::new(move |_event: JsValue| {
        log::warn!("{}", HazardError::AssetLoad("map tile".into()));
    }) as Box<dyn FnMut(JsValue)>);
    tiles.tile_on("tileerror", on_error.as_ref().unchecked_ref());
    tiles.add_to(map);
    on_error
}

pub fn marker_icon() -> Icon {
    let size = js_sys::Array::of2(&25.into(), &41.into());
    let anchor = js_sys::Array::of2(&12.into(), &41.into());
    create_icon(&options(&[
        ("iconUrl", MARKER_ICON_URL.into()),
        ("iconRetinaUrl", MARKER_ICON_RETINA_URL.into()),
        ("shadowUrl", MARKER_SHADOW_URL.into()),
        ("iconSize", size.into()),
        ("iconAnchor", anchor.into()),
    ]))
}

/// Escape text interpolated into popup HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="alert('x')">"#),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt;"
        );
        assert_eq!(escape_html("Fallen tree & debris"), "Fallen tree &amp; debris");
    }
}
