//! # Hazard Map
//!
//! Overview of verified reports: one colored circle per report, a sidebar
//! with the count and the first few reports, and a severity legend.

use hazard_client::config::{DEFAULT_CENTER, OVERVIEW_ZOOM};
use hazard_client::{ReportMarker, ReportsApi, VerifiedReportsMap};
use hazard_domain::{SeverityTier, VerifiedReport};
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::leaflet::{self, LayerGroup, Listener, Map, escape_html};
use crate::services::{BrowserReportsApi, request_context};
use crate::state::client_config;

const LEGEND: [SeverityTier; 3] = [SeverityTier::Urgent, SeverityTier::Moderate, SeverityTier::Low];

/// Popup body for one marker
pub fn popup_html(marker: &ReportMarker<'_>) -> String {
    let report = marker.report;
    let mut html = format!("<div class=\"report-popup\"><strong>{}</strong>", escape_html(&report.description));

    if let Some(url) = &report.image_url {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Hazard\" class=\"popup-image\"/>",
            escape_html(url)
        ));
    }

    html.push_str(&format!(
        "<div class=\"badges\"><span class=\"badge {}\">{}</span><span class=\"badge {}\">{}</span></div>",
        marker.tier.class(),
        escape_html(report.priority_label()),
        marker.category.class(),
        escape_html(report.status_label()),
    ));
    html.push_str(&format!(
        "<p>Lat: {:.4}, Lng: {:.4}</p>",
        marker.position.lat, marker.position.lng
    ));
    if let Some(created) = marker.created_at() {
        html.push_str(&format!("<p>Reported on: {}</p>", created.format("%b %-d, %Y")));
    }
    html.push_str("</div>");
    html
}

/// Live Leaflet objects behind the overview map
struct OverviewLayers {
    map: Map,
    group: LayerGroup,
    _on_tile_error: Listener,
}

impl OverviewLayers {
    fn mount(container: &web_sys::HtmlElement) -> Self {
        let map = leaflet::create_map(container);
        map.set_view(&leaflet::lat_lng(DEFAULT_CENTER), u32::from(OVERVIEW_ZOOM));
        let on_tile_error = leaflet::add_tiles(&map, &client_config().tile_url);

        let group = leaflet::create_layer_group();
        group.group_add_to(&map);
        Self {
            map,
            group,
            _on_tile_error: on_tile_error,
        }
    }

    fn render(&self, markers: &[ReportMarker<'_>]) {
        self.group.clear_layers();
        for marker in markers {
            let color = marker.tier.color();
            let circle = leaflet::create_circle_marker(
                &leaflet::lat_lng(marker.position),
                &leaflet::options(&[
                    ("radius", 10.into()),
                    ("color", color.into()),
                    ("fillColor", color.into()),
                    ("fillOpacity", 0.7.into()),
                    ("weight", 2.into()),
                ]),
            );
            circle.bind_popup(&popup_html(marker));
            circle.circle_add_to(&self.group);
        }
        log::info!("Map rendered with {} verified reports", markers.len());
    }
}

#[component]
fn SummaryItem(report: VerifiedReport) -> impl IntoView {
    let tier = report.severity();
    let created = report
        .created_at
        .map(|at| at.format("%b %-d, %Y").to_string());

    view! {
        <li class="summary-item">
            <span class="status-dot" style=format!("background: {}", tier.color())></span>
            <div>
                <div class="summary-description">{report.description.clone()}</div>
                <div class="summary-meta">
                    <span class=format!("badge {}", tier.class())>{report.priority_label().to_string()}</span>
                    {created.map(|date| view! { <span class="text-muted">{date}</span> })}
                </div>
            </div>
        </li>
    }
}

#[component]
pub fn HazardMap() -> impl IntoView {
    let reports = RwSignal::new(VerifiedReportsMap::new());
    on_cleanup(move || {
        reports.try_update(VerifiedReportsMap::detach);
    });

    let refresh = move || {
        let Some(ticket) = reports.try_update(VerifiedReportsMap::begin_refresh) else {
            return;
        };
        let ctx = request_context();
        spawn_local(async move {
            let result = BrowserReportsApi.verified_reports(&ctx).await;
            reports.try_update(|m| m.finish_refresh(ticket, result));
        });
    };
    refresh();

    let container = NodeRef::<Div>::new();
    let layers = StoredValue::new_local(None::<OverviewLayers>);
    on_cleanup(move || {
        layers.try_update_value(|slot| {
            if let Some(overview) = slot.take() {
                overview.map.remove();
            }
        });
    });

    Effect::new(move |_| {
        let Some(element) = container.get() else {
            return;
        };
        layers.update_value(|slot| {
            if slot.is_none() {
                if !leaflet::leaflet_loaded() {
                    log::warn!("Leaflet not loaded, map will not render");
                    return;
                }
                *slot = Some(OverviewLayers::mount(&element));
            }
            if let Some(overview) = slot.as_ref() {
                reports.with(|m| overview.render(&m.markers()));
            }
        });
    });

    let loading = move || reports.with(VerifiedReportsMap::is_loading);
    let error = move || reports.with(|m| m.error().map(str::to_string));
    let count = move || reports.with(VerifiedReportsMap::count);

    view! {
        <div class="hazard-map">
            <div class="map-container">
                <div node_ref=container class="map-canvas"></div>
                <Show when=loading>
                    <div class="map-overlay">
                        <div class="spinner"></div>
                        <div class="text-muted">"Loading verified reports..."</div>
                    </div>
                </Show>
                {move || error().map(|message| view! {
                    <div class="map-overlay banner banner-error">{message}</div>
                })}
            </div>

            <aside class="map-sidebar">
                <div class="flex justify-between items-center">
                    <h3>"Verified Hazards"</h3>
                    <button class="btn btn-sm" disabled=loading on:click=move |_| refresh()>"Refresh"</button>
                </div>

                <Show
                    when=move || { count() > 0 }
                    fallback=|| view! { <p class="text-muted">"No verified reports to display."</p> }
                >
                    <p>{move || format!("{} verified reports in your area", count())}</p>
                    <ul class="summary-list">
                        <For
                            each=move || reports.with(|m| m.summary().to_vec())
                            key=|report| report.id.clone()
                            children=|report| view! { <SummaryItem report=report /> }
                        />
                    </ul>
                </Show>

                <div class="legend">
                    <h4>"Severity"</h4>
                    {LEGEND
                        .into_iter()
                        .map(|tier| view! {
                            <div class="legend-item">
                                <span class="status-dot" style=format!("background: {}", tier.color())></span>
                                {tier.legend_label()}
                            </div>
                        })
                        .collect_view()}
                </div>
            </aside>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn report() -> VerifiedReport {
        VerifiedReport {
            id: "66f1c0".into(),
            description: "Open manhole <near school>".into(),
            latitude: 23.682_31,
            longitude: 86.953_68,
            image_url: Some("https://cdn.example.org/h.jpg".into()),
            priority: Some("urgent".into()),
            status: Some("resolved".into()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).single(),
        }
    }

    #[test]
    fn test_popup_content() {
        let report = report();
        let marker = ReportMarker {
            report: &report,
            position: report.position(),
            tier: report.severity(),
            category: report.category(),
        };

        let html = popup_html(&marker);
        assert!(html.contains("Open manhole &lt;near school&gt;"));
        assert!(html.contains("Lat: 23.6823, Lng: 86.9537"));
        assert!(html.contains("priority-urgent"));
        assert!(html.contains("status-resolved"));
        assert!(html.contains("Reported on: Mar 9, 2024"));
        assert!(html.contains("https://cdn.example.org/h.jpg"));
    }

    #[test]
    fn test_popup_without_optional_fields() {
        let report = VerifiedReport {
            image_url: None,
            created_at: None,
            priority: None,
            ..report()
        };
        let marker = ReportMarker {
            report: &report,
            position: report.position(),
            tier: report.severity(),
            category: report.category(),
        };

        let html = popup_html(&marker);
        assert!(!html.contains("<img"));
        assert!(!html.contains("Reported on"));
        assert!(html.contains("priority-moderate"));
    }
}
