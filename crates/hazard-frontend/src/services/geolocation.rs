//! # Device Location
//!
//! `navigator.geolocation` as a [`LocationSource`].

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use gloo_timers::future::TimeoutFuture;
use hazard_client::geolocation::locate;
use hazard_client::{LocationSource, PositionOptions};
use hazard_domain::{GeolocationError, Position};
use wasm_bindgen::prelude::*;
use web_sys::{Position as GeolocationPosition, PositionError as GeolocationPositionError};

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<Position, GeolocationError>>>>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocation;

impl BrowserLocation {
    /// One attempt bounded by the configured timeout
    pub async fn locate(&self, options: &PositionOptions) -> Result<Position, GeolocationError> {
        let millis = u32::try_from(options.timeout.as_millis()).unwrap_or(u32::MAX);
        locate(self, options, TimeoutFuture::new(millis)).await
    }
}

fn reply(slot: &Reply, outcome: Result<Position, GeolocationError>) {
    if let Some(tx) = slot.borrow_mut().take() {
        let _ = tx.send(outcome);
    }
}

#[async_trait(?Send)]
impl LocationSource for BrowserLocation {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, GeolocationError> {
        let geolocation = web_sys::window()
            .ok_or(GeolocationError::Unsupported)?
            .navigator()
            .geolocation()
            .map_err(|_| GeolocationError::Unsupported)?;

        let (tx, rx) = oneshot::channel();
        let slot: Reply = Rc::new(RefCell::new(Some(tx)));

        // exactly one of the two fires; the browser owns them from here
        let on_success = {
            let slot = Rc::clone(&slot);
            Closure::once_into_js(move |found: GeolocationPosition| {
                let coords = found.coords();
                reply(&slot, Ok(Position::new(coords.latitude(), coords.longitude())));
            })
        };
        let on_error = {
            let slot = Rc::clone(&slot);
            Closure::once_into_js(move |err: GeolocationPositionError| {
                reply(&slot, Err(GeolocationError::from_code(err.code())));
            })
        };

        let js_options = web_sys::PositionOptions::new();
        js_options.set_enable_high_accuracy(options.enable_high_accuracy);
        js_options.set_timeout(u32::try_from(options.timeout.as_millis()).unwrap_or(u32::MAX));

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.unchecked_ref(),
                Some(on_error.unchecked_ref()),
                &js_options,
            )
            .map_err(|_| GeolocationError::Unsupported)?;

        rx.await.unwrap_or(Err(GeolocationError::PositionUnavailable))
    }
}
