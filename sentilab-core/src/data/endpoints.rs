//! Backend URL construction and query-key normalization.

use reqwest::Url;

use crate::config::{ApiConfig, ConfigError, QueryConfig};

/// Trim and upper-case a ticker; `None` when nothing is left.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let t = raw.trim();
    (!t.is_empty()).then(|| t.to_uppercase())
}

/// Trim an entity name; `None` when nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    let n = raw.trim();
    (!n.is_empty()).then(|| n.to_string())
}

/// Builds every backend URL from the configured origins.
#[derive(Debug, Clone)]
pub struct Endpoints {
    api_base: Url,
    static_base: Url,
    sentiment_model: String,
    query: QueryConfig,
}

impl Endpoints {
    pub fn new(api: &ApiConfig, query: &QueryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_base(&api.base_url)?,
            static_base: parse_base(api.static_base())?,
            sentiment_model: api.sentiment_model.clone(),
            query: query.clone(),
        })
    }

    pub fn sentiment_model(&self) -> &str {
        &self.sentiment_model
    }

    fn api(&self, path: &str, params: &[(&str, &str)]) -> String {
        // `path` is a fixed relative literal, so the join cannot fail on a validated base.
        let mut url = self
            .api_base
            .join(path)
            .unwrap_or_else(|_| self.api_base.clone());
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url.into()
    }

    /// `GET /api/data?ticker=&period=&sentiment_model=[&refresh=true]`
    pub fn price(&self, ticker: &str, period: &str, refresh: bool) -> String {
        let mut params = vec![
            ("ticker", ticker),
            ("period", period),
            ("sentiment_model", self.sentiment_model.as_str()),
        ];
        if refresh {
            params.push(("refresh", "true"));
        }
        self.api("api/data", &params)
    }

    /// `GET /data/<TICKER>_merged.csv`
    pub fn price_csv(&self, ticker: &str) -> String {
        let mut url = self.static_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("data")
                .push(&format!("{ticker}_merged.csv"));
        }
        url.into()
    }

    /// `GET /api/entity?name=&sentiment_model=&days=`
    pub fn entity(&self, name: &str) -> String {
        let days = self.query.entity_days.to_string();
        self.api(
            "api/entity",
            &[
                ("name", name),
                ("sentiment_model", self.sentiment_model.as_str()),
                ("days", days.as_str()),
            ],
        )
    }

    /// `GET /api/holdings?name=&max_rows=`
    pub fn holdings(&self, name: &str) -> String {
        let max_rows = self.query.holdings_max_rows.to_string();
        self.api("api/holdings", &[("name", name), ("max_rows", max_rows.as_str())])
    }

    /// `GET /api/insiders?ticker=&max_filings=`
    pub fn insiders(&self, ticker: &str) -> String {
        let max_filings = self.query.insiders_max_filings.to_string();
        self.api(
            "api/insiders",
            &[("ticker", ticker), ("max_filings", max_filings.as_str())],
        )
    }

    pub fn tickers(&self) -> String {
        self.api("api/tickers", &[])
    }

    pub fn health(&self) -> String {
        self.api("api/health", &[])
    }
}

/// Parse an http(s) origin and make sure its path ends with `/` so relative joins append.
fn parse_base(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".into()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    Ok(url)
}
