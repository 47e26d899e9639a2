//! # Location Picker Map
//!
//! Leaflet view over a [`MapPositionSync`]. The owner's position flows in
//! as a signal; marker drags flow out through `on_position_changed`.

use std::cell::RefCell;
use std::rc::Rc;

use hazard_client::config::PICKER_ZOOM;
use hazard_client::{MapCommand, MapPositionSync};
use hazard_domain::Position;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::leaflet::{self, Listener, Map, Marker};
use crate::state::client_config;

/// Live Leaflet objects behind one mounted picker
struct PickerLayers {
    map: Map,
    marker: Marker,
    _listeners: [Listener; 2],
}

impl PickerLayers {
    fn mount(container: &web_sys::HtmlElement, center: Position, sync: &Rc<RefCell<MapPositionSync>>) -> Self {
        let map = leaflet::create_map(container);
        map.set_view(&leaflet::lat_lng(center), u32::from(PICKER_ZOOM));
        let on_tile_error = leaflet::add_tiles(&map, &client_config().tile_url);

        let marker = leaflet::create_marker(
            &leaflet::lat_lng(center),
            &leaflet::options(&[
                ("draggable", true.into()),
                ("icon", leaflet::marker_icon().into()),
            ]),
        );
        marker.marker_add_to(&map);

        let on_drag_end = {
            let sync = Rc::clone(sync);
            let marker = marker.clone();
            Closure::wrap(Box::new(move |_event: JsValue| {
                let released = marker.get_lat_lng();
                sync.borrow_mut()
                    .drag_end(Position::new(released.lat(), released.lng()));
            }) as Box<dyn FnMut(JsValue)>)
        };
        marker.marker_on("dragend", on_drag_end.as_ref().unchecked_ref());

        Self {
            map,
            marker,
            _listeners: [on_tile_error, on_drag_end],
        }
    }

    fn apply(&self, command: MapCommand) {
        match command {
            MapCommand::SetView { center, zoom } => {
                self.map.set_view(&leaflet::lat_lng(center), u32::from(zoom));
                self.marker.set_lat_lng(&leaflet::lat_lng(center));
            }
        }
    }
}

/// Interactive map with a draggable marker at `position`
#[component]
pub fn LocationPickerMap(
    #[prop(into)] position: Signal<Option<Position>>,
    on_position_changed: Callback<Position>,
) -> impl IntoView {
    let container = NodeRef::<Div>::new();
    let sync = Rc::new(RefCell::new(MapPositionSync::new(PICKER_ZOOM, move |p| {
        on_position_changed.run(p);
    })));
    let layers = StoredValue::new_local(None::<PickerLayers>);

    // unmounted on reset; drop the map with its listeners
    on_cleanup(move || {
        layers.try_update_value(|slot| {
            if let Some(mounted) = slot.take() {
                mounted.map.remove();
            }
        });
    });

    Effect::new(move |_| {
        let center = position.get();
        let Some(element) = container.get() else {
            return;
        };
        let Some(command) = sync.borrow_mut().sync(center) else {
            return;
        };

        layers.update_value(|slot| match slot.as_ref() {
            Some(mounted) => mounted.apply(command),
            None if leaflet::leaflet_loaded() => {
                let MapCommand::SetView { center, .. } = command;
                *slot = Some(PickerLayers::mount(&element, center, &sync));
            }
            None => log::warn!("Leaflet not loaded, location picker will not render"),
        });
    });

    view! {
        <div class="picker-map">
            <div node_ref=container class="picker-map-canvas"></div>
            <p class="picker-hint">"Marker set. You can drag it to adjust the location."</p>
        </div>
    }
}
