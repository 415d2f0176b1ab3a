//! HTML control page and its form handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::info;

use dirac_client::{ProcessorError, Slot};

use crate::state::AppState;

/// A processor failure, rendered as an error page instead of the control page.
#[derive(Debug)]
pub struct PageError(pub ProcessorError);

impl From<ProcessorError> for PageError {
    fn from(err: ProcessorError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Error</title></head>\n\
             <body>\n<p class=\"error\">An error occurred: {}</p>\n<p><a href=\"/\">Retry</a></p>\n</body>\n</html>\n",
            escape_html(&self.0.to_string())
        );
        (StatusCode::BAD_GATEWAY, Html(body)).into_response()
    }
}

/// Everything the control page shows.
#[derive(Debug, Clone)]
pub struct IndexView {
    pub name: String,
    pub slots: Vec<Slot>,
    pub active_slot: u32,
    pub speaker_gain: f64,
    pub filter_state: bool,
    pub camilla_url: Option<String>,
    pub uvmeter_url: Option<String>,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let client = state.client();
    let slots = client.get_slots().await?;
    let active_slot = client.get_active_slot().await?;
    let speaker_gain = client.get_speaker_gain().await?;
    let filter_state = client.get_filter_state().await?;

    let config = state.config();
    let view = IndexView {
        name: config.name.clone(),
        slots,
        active_slot,
        speaker_gain,
        filter_state,
        camilla_url: config.camilla_url.clone(),
        uvmeter_url: config.uvmeter_url.clone(),
    };

    Ok(Html(render_index(&view)))
}

#[derive(Debug, Deserialize)]
pub struct SetSlotForm {
    pub slot_index: u32,
}

pub async fn set_slot(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetSlotForm>,
) -> Result<Redirect, PageError> {
    state.client().set_active_slot(form.slot_index).await?;
    info!(slot = form.slot_index, "active slot changed");
    Ok(Redirect::to("/"))
}

pub async fn reset_gain(State(state): State<Arc<AppState>>) -> Result<Redirect, PageError> {
    state.client().set_speaker_gain(0.0).await?;
    info!("speaker gain reset");
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct SetFilterStateForm {
    #[serde(default)]
    pub filter_state: String,
}

/// Anything other than the literal `true` disables filtering.
pub async fn set_filter_state(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetFilterStateForm>,
) -> Result<Redirect, PageError> {
    let enabled = form.filter_state == "true";
    state.client().set_filter_state(enabled).await?;
    info!(enabled, "filter state changed");
    Ok(Redirect::to("/"))
}

pub fn render_index(view: &IndexView) -> String {
    let name = escape_html(&view.name);
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", name));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", name));

    html.push_str("<section class=\"slots\">\n<h2>Filter slots</h2>\n");
    if view.slots.is_empty() {
        html.push_str("<p class=\"empty\">No slots available</p>\n");
    }
    for slot in &view.slots {
        html.push_str(&render_slot(slot, slot.index == view.active_slot));
    }
    html.push_str("</section>\n");

    let (state_label, toggle_label) = if view.filter_state {
        ("Enabled", "Disable")
    } else {
        ("Disabled", "Enable")
    };
    html.push_str("<section class=\"filter\">\n<h2>Filtering</h2>\n");
    html.push_str(&format!(
        "<p>Filter state: <strong id=\"filter-state\">{}</strong></p>\n",
        state_label
    ));
    html.push_str(&format!(
        "<form method=\"post\" action=\"/set-filter-state\">\
         <input type=\"hidden\" name=\"filter_state\" value=\"{}\">\
         <button type=\"submit\">{}</button></form>\n",
        !view.filter_state, toggle_label
    ));
    html.push_str("</section>\n");

    html.push_str("<section class=\"speaker\">\n<h2>Speaker</h2>\n");
    html.push_str(&format!(
        "<p>Gain: <strong id=\"speaker-gain\">{} dB</strong></p>\n",
        view.speaker_gain
    ));
    html.push_str(
        "<form method=\"post\" action=\"/reset-gain\">\
         <button type=\"submit\">Reset gain</button></form>\n",
    );
    html.push_str("</section>\n");

    let links: Vec<(&str, &String)> = [
        ("CamillaDSP", view.camilla_url.as_ref()),
        ("Level meter", view.uvmeter_url.as_ref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| url.map(|u| (label, u)))
    .collect();
    if !links.is_empty() {
        html.push_str("<nav>\n");
        for (label, url) in links {
            html.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>\n",
                escape_html(url),
                label
            ));
        }
        html.push_str("</nav>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_slot(slot: &Slot, active: bool) -> String {
    let trial = if slot.is_trial {
        " <span class=\"trial\">trial</span>"
    } else {
        ""
    };
    format!(
        "<form method=\"post\" action=\"/set-slot\" class=\"slot{}\">\
         <input type=\"hidden\" name=\"slot_index\" value=\"{}\">\
         <button type=\"submit\"{}>{}</button> \
         <span class=\"filter-type\">{}</span>{}</form>\n",
        if active { " active" } else { "" },
        slot.index,
        if active { " disabled" } else { "" },
        escape_html(&slot.name),
        escape_html(&slot.filter_type),
        trial
    )
}

const STYLE: &str = "<style>\n\
body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }\n\
section { margin-bottom: 1.5rem; }\n\
form.slot { margin: 0.25rem 0; }\n\
form.slot.active button { font-weight: bold; }\n\
.filter-type { color: #666; font-size: 0.9em; }\n\
.trial { color: #b36b00; font-size: 0.8em; }\n\
nav a { margin-right: 1rem; }\n\
</style>\n";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
