//! Generator counters, exposed at `/metrics/forms`.
//!
//! HTTP request metrics come from the actix-web-prometheus middleware on
//! `/metrics`; these live in their own registry.

use actix_web::{web, HttpResponse, Responder};
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::ErrorResponse;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    static ref GENERATED: IntCounterVec = register(
        "forms_generated_total",
        "Documents generated, by form type and strategy",
        &["form_type", "strategy"],
    );
    static ref FALLBACKS: IntCounterVec = register(
        "forms_template_fallbacks_total",
        "Template fills that failed and were drawn instead",
        &["form_type"],
    );
}

fn register(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let counter =
        IntCounterVec::new(Opts::new(name, help), labels).expect("valid counter definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("counter registered once");
    counter
}

pub fn record_generated(form_type: &str, strategy: &str) {
    GENERATED.with_label_values(&[form_type, strategy]).inc();
}

pub fn record_fallback(form_type: &str) {
    FALLBACKS.with_label_values(&[form_type]).inc();
}

pub fn generated_count(form_type: &str, strategy: &str) -> u64 {
    GENERATED.with_label_values(&[form_type, strategy]).get()
}

pub fn fallback_count(form_type: &str) -> u64 {
    FALLBACKS.with_label_values(&[form_type]).get()
}

/// Text exposition of the generator registry.
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/metrics/forms",
    tag = "Metrics",
    responses(
        (status = 200, description = "Generator counters in Prometheus text format", body = String)
    )
)]
pub async fn forms_metrics() -> impl Responder {
    match render() {
        Ok(body) => HttpResponse::Ok()
            .content_type(TextEncoder::new().format_type())
            .body(body),
        Err(e) => {
            log::error!("failed to encode metrics: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/metrics/forms").route(web::get().to(forms_metrics)));
}
