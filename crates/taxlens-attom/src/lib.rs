// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod address;

pub use address::{ParsedAddress, parse_address};

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;
use taxlens_app::{Estimator, MappedProperty, PropertyData, PropertyResponse, RawPropertyRecord};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.gateway.attomdata.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PROPERTY_PATH: &str = "propertyapi/v1.0.0/property";
const NO_RESULT_MESSAGE: &str = "SuccessWithoutResult";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttomConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AttomConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Search response plus, when the search found something and the follow-up
/// call worked, the detail response for the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct FullPropertyLookup {
    pub search: PropertyResponse,
    pub detail: Option<PropertyResponse>,
}

impl FullPropertyLookup {
    pub fn search_record(&self) -> Option<&RawPropertyRecord> {
        self.search.first_property()
    }

    pub fn detail_record(&self) -> Option<&RawPropertyRecord> {
        self.detail.as_ref()?.first_property()
    }

    pub fn map(&self) -> Option<PropertyData> {
        self.map_with(&Estimator::default())
            .map(|mapped| mapped.data)
    }

    pub fn map_with(&self, estimator: &Estimator) -> Option<MappedProperty> {
        let search = self.search_record()?;
        Some(estimator.map(search, self.detail_record()))
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(config: &AttomConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("attom.base_url must not be empty");
        }
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            bail!(
                "ATTOM API key not configured -- set attom.api_key in the config file or TAXLENS_ATTOM_API_KEY"
            );
        }

        let mut key =
            HeaderValue::from_str(api_key).context("attom.api_key is not a valid header value")?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("apikey", key);

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout: config.timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// An empty `property` list means the provider found no match.
    pub fn search_property(&self, address: &str) -> Result<PropertyResponse> {
        let parsed = parse_address(address)?;
        debug!(
            street = %parsed.street,
            city = %parsed.city,
            state = parsed.state.as_deref().unwrap_or(""),
            zip = parsed.zip.as_deref().unwrap_or(""),
            "parsed address"
        );
        let address2 = parsed.address2();
        let url = self.endpoint(
            "address",
            &[
                ("address1", parsed.street.as_str()),
                ("address2", address2.as_str()),
                ("format", "json"),
            ],
        )?;
        self.fetch(url, "property search")
            .with_context(|| format!("search property {address:?}"))
    }

    pub fn property_detail(&self, attom_id: &str) -> Result<PropertyResponse> {
        let url = self.endpoint("detail", &[("attomid", attom_id), ("format", "json")])?;
        self.fetch(url, "property detail")
            .with_context(|| format!("get property detail for ATTOM id {attom_id}"))
    }

    /// A failed detail call is logged and leaves `detail` empty; only the
    /// search itself can fail the lookup.
    pub fn full_property(&self, address: &str) -> Result<FullPropertyLookup> {
        let search = self.search_property(address)?;
        let attom_id = search
            .first_property()
            .and_then(|record| record.identifier.as_ref())
            .and_then(|identifier| identifier.attom_id.clone());

        let Some(attom_id) = attom_id else {
            info!(matches = search.property.len(), "no ATTOM id in search result");
            return Ok(FullPropertyLookup {
                search,
                detail: None,
            });
        };

        let detail = match self.property_detail(&attom_id) {
            Ok(detail) => Some(detail),
            Err(error) => {
                warn!(
                    attom_id = %attom_id,
                    error = %format!("{error:#}"),
                    "property detail unavailable, using search data only"
                );
                None
            }
        };
        Ok(FullPropertyLookup { search, detail })
    }

    fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> Result<Url> {
        let base = format!("{}/{PROPERTY_PATH}/{name}", self.base_url);
        Url::parse_with_params(&base, params).with_context(|| format!("build URL from {base}"))
    }

    fn fetch(&self, url: Url, endpoint: &str) -> Result<PropertyResponse> {
        info!(url = %url, "requesting {endpoint}");
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("read {endpoint} response"))?;
        debug!(status = status.as_u16(), bytes = body.len(), "{endpoint} response");

        if status == StatusCode::BAD_REQUEST
            && let Ok(parsed) = PropertyResponse::from_json(&body)
            && parsed.status_message() == Some(NO_RESULT_MESSAGE)
        {
            return Ok(parsed);
        }
        if !status.is_success() {
            return Err(clean_error_response(status, &body));
        }

        PropertyResponse::from_json(&body).with_context(|| format!("decode {endpoint} response"))
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check your network connection and attom.base_url ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    match status {
        StatusCode::UNAUTHORIZED => {
            return anyhow!(
                "invalid ATTOM API key (401) -- check attom.api_key or TAXLENS_ATTOM_API_KEY"
            );
        }
        StatusCode::FORBIDDEN => {
            return anyhow!("ATTOM API access denied (403) -- check the key's permissions");
        }
        StatusCode::TOO_MANY_REQUESTS => {
            return anyhow!("ATTOM API rate limit exceeded (429) -- try again in a few minutes");
        }
        _ => {}
    }

    if let Ok(parsed) = PropertyResponse::from_json(body)
        && let Some(message) = parsed.status_message()
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return anyhow!("server returned {}", status.as_u16());
    }
    let excerpt = trimmed.chars().take(200).collect::<String>();
    anyhow!("server error ({}): {}", status.as_u16(), excerpt)
}

#[cfg(test)]
mod tests {
    use super::{AttomConfig, Client, DEFAULT_BASE_URL, FullPropertyLookup, clean_error_response};
    use anyhow::Result;
    use reqwest::StatusCode;
    use std::time::Duration;
    use taxlens_app::PropertyResponse;

    fn config(base_url: &str, api_key: &str) -> AttomConfig {
        AttomConfig {
            api_key: api_key.to_owned(),
            base_url: base_url.to_owned(),
            timeout: Duration::from_millis(250),
        }
    }

    #[test]
    fn default_config_points_at_gateway() {
        let config = AttomConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn new_trims_trailing_slashes() -> Result<()> {
        let client = Client::new(&config("http://127.0.0.1:9/api//", "key"))?;
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
        assert_eq!(client.timeout(), Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn new_rejects_missing_settings() {
        let error = Client::new(&config("", "key")).expect_err("empty base URL");
        assert!(error.to_string().contains("base_url"));

        let error = Client::new(&config(DEFAULT_BASE_URL, "  ")).expect_err("empty key");
        assert!(error.to_string().contains("TAXLENS_ATTOM_API_KEY"));
    }

    #[test]
    fn error_responses_are_actionable() {
        let cases = [
            (StatusCode::UNAUTHORIZED, "", "invalid ATTOM API key"),
            (StatusCode::FORBIDDEN, "", "access denied"),
            (StatusCode::TOO_MANY_REQUESTS, "", "rate limit"),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"status":{"msg":"Backend unavailable"}}"#,
                "server error (500): Backend unavailable",
            ),
            (
                StatusCode::BAD_GATEWAY,
                "upstream timed out",
                "server error (502): upstream timed out",
            ),
            (StatusCode::SERVICE_UNAVAILABLE, "  ", "server returned 503"),
        ];
        for (status, body, expected) in cases {
            let message = clean_error_response(status, body).to_string();
            assert!(message.contains(expected), "status {status}: {message}");
        }
    }

    #[test]
    fn lookup_without_search_match_maps_to_nothing() {
        let lookup = FullPropertyLookup {
            search: PropertyResponse::default(),
            detail: None,
        };
        assert!(lookup.search_record().is_none());
        assert!(lookup.map().is_none());
    }
}
