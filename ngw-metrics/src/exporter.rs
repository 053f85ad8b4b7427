//! OTLP metrics exporter.

use std::collections::HashMap;

use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;

use crate::MetricsError;

/// Initialize the OTLP metrics exporter, pushing to `endpoint` on a
/// periodic schedule. `api_key`, when set, is sent as a bearer token on
/// every export (`metrics.apiKey`, spec.md §6 configuration surface
/// analogue).
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built.
pub fn init_otlp_exporter(endpoint: &str, api_key: Option<&str>) -> Result<SdkMeterProvider, MetricsError> {
    tracing::info!(endpoint = %endpoint, "configuring OTLP metrics exporter");

    let mut builder = opentelemetry_otlp::MetricExporter::builder().with_http().with_endpoint(endpoint);

    if let Some(api_key) = api_key {
        let mut headers = HashMap::with_capacity(1);
        headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));
        builder = builder.with_headers(headers);
    }

    let exporter = builder.build().map_err(|error| {
        tracing::error!(endpoint = %endpoint, %error, "failed to build OTLP exporter");
        MetricsError::OpenTelemetry(error.to_string())
    })?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter).build();
    let provider = SdkMeterProvider::builder().with_reader(reader).build();

    tracing::info!("OTLP metrics exporter initialized");
    Ok(provider)
}
