//! Experiment catalog and the sieve analysis form.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use base64::Engine;
use minijinja::context;
use serde::{Deserialize, Serialize};

use gfnlab_common::{Experiment, GfnError, SIEVE_COUNT};
use gfnlab_sieve::{calculator, chart, report, GfnReport};

use crate::error::WebError;
use crate::notify::{ReportMessage, CHART_CID};
use crate::state::SharedState;

/// Fields posted by the experiment form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunForm {
    pub w1: String,
    pub w2: String,
    pub w3: String,
    pub w4: String,
    pub w5: String,
    pub w6: String,
    pub email: String,
    /// "true" when the form was re-submitted from a rendered result
    pub from_result: String,
}

impl RunForm {
    pub fn weight_inputs(&self) -> [String; SIEVE_COUNT] {
        [
            self.w1.clone(),
            self.w2.clone(),
            self.w3.clone(),
            self.w4.clone(),
            self.w5.clone(),
            self.w6.clone(),
        ]
    }

    pub fn email(&self) -> &str {
        self.email.trim()
    }

    pub fn from_result(&self) -> bool {
        self.from_result == "true"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// "info" or "warning"
    pub level: &'static str,
    pub message: String,
}

/// Everything the run template needs.
#[derive(Debug, Serialize)]
struct RunView<'a> {
    experiment: &'a Experiment,
    sieves: Vec<String>,
    weight_inputs: Vec<String>,
    email: String,
    report: Option<GfnReport>,
    result: Option<f64>,
    steps: String,
    error: Option<String>,
    chart_uri: Option<String>,
    notice: Option<Notice>,
}

impl<'a> RunView<'a> {
    fn new(experiment: &'a Experiment) -> Self {
        Self {
            experiment,
            sieves: experiment.factors.iter().map(report::fmt_factor).collect(),
            weight_inputs: vec![String::new(); SIEVE_COUNT],
            email: String::new(),
            report: None,
            result: None,
            steps: String::new(),
            error: None,
            chart_uri: None,
            notice: None,
        }
    }
}

/// GET / — list the catalog.
pub async fn experiment_list(State(state): State<SharedState>) -> Result<Html<String>, WebError> {
    let experiments: Vec<&Experiment> = state.catalog.iter().collect();
    let html = state
        .templates
        .get_template("experiment_list.html")?
        .render(context! { experiments => experiments })?;
    Ok(Html(html))
}

/// GET /{slug} — canonical URLs end with a slash.
pub async fn slash_redirect(Path(slug): Path<String>) -> Redirect {
    Redirect::permanent(&format!("/{slug}/"))
}

/// GET /{slug}/ — empty form.
pub async fn experiment_page(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, WebError> {
    let experiment = state.catalog.get(&slug).ok_or(WebError::NotFound)?;
    render_run(&state, &RunView::new(experiment))
}

/// POST /{slug}/ — compute, render, and optionally email the report.
pub async fn experiment_submit(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Form(form): Form<RunForm>,
) -> Result<Html<String>, WebError> {
    let experiment = state.catalog.get(&slug).ok_or(WebError::NotFound)?;

    let inputs = form.weight_inputs();
    let mut view = RunView::new(experiment);
    view.weight_inputs = inputs.to_vec();
    view.email = form.email().to_string();

    match calculator::compute(&inputs, &experiment.factors) {
        Ok(gfn_report) => {
            let chart_png = match chart::render_png(&gfn_report.chart) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!("Chart rendering failed for {slug}: {e}");
                    None
                }
            };
            view.chart_uri = chart_png.as_deref().map(png_data_uri);
            view.steps = report::steps_html(&gfn_report);
            view.result = Some(gfn_report.gfn);

            if !view.email.is_empty() && form.from_result() {
                view.notice = Some(
                    match send_report(&state, &view.email, &gfn_report, chart_png).await {
                        Ok(()) => Notice {
                            level: "info",
                            message: format!("Result sent to {}", view.email),
                        },
                        Err(e) => Notice { level: "warning", message: e.to_string() },
                    },
                );
            }
            view.report = Some(gfn_report);
        }
        Err(e) => {
            tracing::debug!("Rejected input for {slug}: {e}");
            view.error = Some(e.to_string());
        }
    }

    render_run(&state, &view)
}

/// Email the report. Failures leave the rendered report untouched.
async fn send_report(
    state: &SharedState,
    to: &str,
    gfn_report: &GfnReport,
    chart_png: Option<Vec<u8>>,
) -> Result<(), GfnError> {
    let chart_png = chart_png
        .ok_or_else(|| GfnError::Notification("the chart could not be rendered".to_string()))?;

    let message = ReportMessage {
        to: to.to_string(),
        subject: state.mail.subject.clone(),
        text_body: report::plain_text(gfn_report),
        html_body: report::email_html(gfn_report, CHART_CID, &state.mail.signature),
        chart_png,
        chart_cid: CHART_CID.to_string(),
    };

    match state.notifier.send(&message).await {
        Ok(()) => {
            tracing::info!("Report sent to {to} via {}", state.notifier.name());
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Report delivery to {to} failed: {e}");
            Err(e)
        }
    }
}

fn render_run(state: &SharedState, view: &RunView<'_>) -> Result<Html<String>, WebError> {
    let html = state
        .templates
        .get_template("experiment_run.html")?
        .render(view)?;
    Ok(Html(html))
}

fn png_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_flags() {
        let form = RunForm {
            email: "  lab@example.com ".to_string(),
            from_result: "true".to_string(),
            ..RunForm::default()
        };
        assert_eq!(form.email(), "lab@example.com");
        assert!(form.from_result());
        assert!(!RunForm { from_result: "on".to_string(), ..RunForm::default() }.from_result());
    }

    #[test]
    fn test_weight_inputs_in_field_order() {
        let form = RunForm {
            w1: "1".into(),
            w3: "3".into(),
            w6: "6".into(),
            ..RunForm::default()
        };
        assert_eq!(form.weight_inputs(), ["1", "", "3", "", "", "6"].map(String::from));
    }

    #[test]
    fn test_png_data_uri() {
        assert_eq!(png_data_uri(&[0, 1, 2]), "data:image/png;base64,AAEC");
    }
}
