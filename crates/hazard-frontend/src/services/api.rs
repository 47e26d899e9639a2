//! # API Client
//!
//! `fetch`-backed implementation of the reports API. Status and body
//! interpretation is shared with the native client.

use async_trait::async_trait;
use gloo_net::http::Request;
use hazard_client::api::{interpret_create, interpret_listing};
use hazard_client::config::{REPORTS_CREATE_PATH, VERIFIED_REPORTS_PATH};
use hazard_client::{ApiError, ReportPayload, ReportReceipt, ReportsApi, RequestContext};
use hazard_domain::VerifiedReport;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserReportsApi;

fn transport(err: gloo_net::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Transport(format!("{err:?}"))
}

/// Multipart body: text fields first, then the optional image part
pub fn form_data(payload: &ReportPayload) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error)?;
    for (name, value) in payload.text_fields() {
        form.append_with_str(name, &value).map_err(js_error)?;
    }

    if let Some(image) = &payload.image {
        let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let props = BlobPropertyBag::new();
        props.set_type(&image.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(js_error)?;
        form.append_with_blob_and_filename(ReportPayload::IMAGE_FIELD, &blob, &image.file_name)
            .map_err(js_error)?;
    }

    Ok(form)
}

#[async_trait(?Send)]
impl ReportsApi for BrowserReportsApi {
    async fn create_report(
        &self,
        ctx: &RequestContext,
        payload: &ReportPayload,
    ) -> Result<ReportReceipt, ApiError> {
        let mut request = Request::post(&ctx.endpoint(REPORTS_CREATE_PATH));
        if let Some(authorization) = ctx.authorization() {
            request = request.header("Authorization", &authorization);
        }

        let response = request
            .body(form_data(payload)?)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        log::debug!("create report -> {status}");
        interpret_create(status, &body)
    }

    async fn verified_reports(&self, ctx: &RequestContext) -> Result<Vec<VerifiedReport>, ApiError> {
        let mut request = Request::get(&ctx.endpoint(VERIFIED_REPORTS_PATH));
        if let Some(authorization) = ctx.authorization() {
            request = request.header("Authorization", &authorization);
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        interpret_listing(status, &body)
    }
}
