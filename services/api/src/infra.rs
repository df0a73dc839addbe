use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use visitgate::config::RiskConfig;
use visitgate::risk::{GeminiRiskAnalyzer, NoopRiskAnalyzer, RiskAnalyzer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Risk annotator picked at startup: the outbound Gemini-style call when an
/// API key is configured, otherwise the fixed placeholder.
pub(crate) enum ConfiguredRiskAnalyzer {
    Gemini(GeminiRiskAnalyzer),
    Disabled(NoopRiskAnalyzer),
}

impl ConfiguredRiskAnalyzer {
    pub(crate) fn from_config(config: &RiskConfig) -> Self {
        match GeminiRiskAnalyzer::from_config(config) {
            Some(analyzer) => Self::Gemini(analyzer),
            None => Self::Disabled(NoopRiskAnalyzer),
        }
    }
}

#[async_trait::async_trait]
impl RiskAnalyzer for ConfiguredRiskAnalyzer {
    async fn analyze(&self, purpose: &str, location: &str, visitor_count: usize) -> String {
        match self {
            Self::Gemini(analyzer) => analyzer.analyze(purpose, location, visitor_count).await,
            Self::Disabled(analyzer) => analyzer.analyze(purpose, location, visitor_count).await,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
