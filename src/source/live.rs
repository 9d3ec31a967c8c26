use serde::{Deserialize, Serialize};

use super::{DataSource, FetchContext, SourceError};
use crate::model::PromotionRecord;

pub const DEFAULT_ENDPOINT: &str = "https://dapi.tourvis.com/api/inventory/getInventoryList";
pub const MOBILE_UNIQ_CODE: &str = "TV_IV_C_TOPBANNER";
pub const DESKTOP_UNIQ_CODE: &str = "TV_IV_C_P_TOPBANNER";
pub const MOBILE_BREAKPOINT: f64 = 768.0;

#[derive(Clone, Debug)]
pub struct LiveOptions {
    pub endpoint: String,
    pub mobile_code: String,
    pub desktop_code: String,
    pub breakpoint: f64,
    /// Route requests through this proxy. `None` ignores proxy environment
    /// variables as well.
    pub proxy: Option<String>,
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            mobile_code: MOBILE_UNIQ_CODE.to_string(),
            desktop_code: DESKTOP_UNIQ_CODE.to_string(),
            breakpoint: MOBILE_BREAKPOINT,
            proxy: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRequest<'a> {
    uniq_code: &'a str,
}

#[derive(Deserialize)]
struct InventoryResponse {
    data: InventoryData,
}

#[derive(Deserialize)]
struct InventoryData {
    #[serde(default)]
    list: Option<Vec<PromotionRecord>>,
}

/// Decodes an inventory listing body. A missing or null `list` is an empty
/// listing; a missing `data` object is not.
pub fn decode_inventory(body: &[u8]) -> Result<Vec<PromotionRecord>, SourceError> {
    let response: InventoryResponse =
        serde_json::from_slice(body).map_err(|source| SourceError::Decode { source })?;
    Ok(response.data.list.unwrap_or_default())
}

// fetches the inventory listing with one POST per call
#[derive(Clone, Debug)]
pub struct LiveSource {
    client: reqwest::Client,
    options: LiveOptions,
}

impl LiveSource {
    pub fn new(options: LiveOptions) -> Result<Self, SourceError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let builder = reqwest::Client::builder().default_headers(headers);
        let builder = match options.proxy.as_deref() {
            Some(proxy) => {
                let proxy_cfg =
                    reqwest::Proxy::all(proxy).map_err(|source| SourceError::ProxySetup {
                        proxy: proxy.to_string(),
                        source,
                    })?;
                builder.proxy(proxy_cfg)
            }
            None => builder.no_proxy(),
        };
        let client = builder
            .build()
            .map_err(|source| SourceError::ClientBuild { source })?;
        Ok(Self { client, options })
    }

    pub fn uniq_code_for(&self, viewport_width: f64) -> &str {
        if viewport_width < self.options.breakpoint {
            &self.options.mobile_code
        } else {
            &self.options.desktop_code
        }
    }
}

impl DataSource for LiveSource {
    async fn fetch_all(&self, ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError> {
        let endpoint = self.options.endpoint.as_str();
        let uniq_code = self.uniq_code_for(ctx.viewport_width);
        tracing::info!(endpoint, uniq_code, "requesting inventory listing");

        let response = self
            .client
            .post(endpoint)
            .json(&InventoryRequest { uniq_code })
            .send()
            .await
            .map_err(|source| SourceError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let records = decode_inventory(&body)?;
        tracing::debug!(count = records.len(), "inventory listing decoded");
        Ok(records)
    }
}
