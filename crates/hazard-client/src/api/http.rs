//! # Native HTTP transport
//!
//! `reqwest` implementation of [`ReportsApi`] used by the command-line client.

use async_trait::async_trait;
use hazard_domain::VerifiedReport;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Request, RequestBuilder};
use tracing::{debug, instrument};

use super::{ReportPayload, ReportReceipt, ReportsApi, interpret_create, interpret_listing};
use crate::config::{REPORTS_CREATE_PATH, VERIFIED_REPORTS_PATH};
use crate::context::RequestContext;
use crate::error::Result;

/// Reports API over `reqwest`
#[derive(Debug, Clone, Default)]
pub struct HttpReportsApi {
    client: Client,
}

impl HttpReportsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Multipart POST to the create endpoint, credential attached
    pub fn create_request(&self, ctx: &RequestContext, payload: &ReportPayload) -> Result<Request> {
        let request = self
            .client
            .post(ctx.endpoint(REPORTS_CREATE_PATH))
            .multipart(multipart_form(payload)?);
        Ok(authorize(request, ctx).build()?)
    }

    /// GET of the verified listing, credential attached
    pub fn listing_request(&self, ctx: &RequestContext) -> Result<Request> {
        let request = self.client.get(ctx.endpoint(VERIFIED_REPORTS_PATH));
        Ok(authorize(request, ctx).build()?)
    }
}

fn authorize(request: RequestBuilder, ctx: &RequestContext) -> RequestBuilder {
    match ctx.authorization() {
        Some(value) => request.header(AUTHORIZATION, value),
        None => request,
    }
}

/// Build the multipart body. The content type is left to reqwest so the
/// boundary parameter is filled in.
pub fn multipart_form(payload: &ReportPayload) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in payload.text_fields() {
        form = form.text(name, value);
    }

    if let Some(image) = &payload.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part(ReportPayload::IMAGE_FIELD, part);
    }

    Ok(form)
}

#[async_trait(?Send)]
impl ReportsApi for HttpReportsApi {
    #[instrument(skip_all, fields(has_image = payload.image.is_some()))]
    async fn create_report(
        &self,
        ctx: &RequestContext,
        payload: &ReportPayload,
    ) -> Result<ReportReceipt> {
        let request = self.create_request(ctx, payload)?;
        let response = self.client.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "create report response");

        interpret_create(status, &body)
    }

    #[instrument(skip_all)]
    async fn verified_reports(&self, ctx: &RequestContext) -> Result<Vec<VerifiedReport>> {
        let request = self.listing_request(ctx)?;
        let response = self.client.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "verified reports response");

        interpret_listing(status, &body)
    }
}
