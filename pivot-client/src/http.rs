//! HTTP transport and the remote aggregation port

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pivot_engine::{AggregationPort, cursor};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{
    CsvDocument, DailyPoint, DailySeriesRequest, EntityRef, ExportFile, ExportQuery, MasterRecord,
    Period, PivotPage, PivotQuery, SummaryQuery, SummaryRow,
};
use std::time::Duration;

use crate::{ClientConfig, ClientError, ClientResult};

/// JSON-over-HTTP client speaking the `ApiResponse` envelope
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        Self::handle_response(request.send().await?).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Unwrap the envelope; error envelopes keep their code
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ClientError::Serialization(e)),
            Err(_) => {
                return Err(ClientError::InvalidResponse(format!(
                    "HTTP {}: {}",
                    status,
                    text.chars().take(200).collect::<String>()
                )));
            }
        };

        envelope.into_result().map_err(|e| {
            tracing::debug!(
                status = %status,
                code = %e.code,
                message = %e.message,
                "Server returned error"
            );
            ClientError::Api(e)
        })
    }
}

/// [`AggregationPort`] backed by a remote pivot server
///
/// Queries are validated locally first; invalid ones never leave the process.
#[derive(Debug, Clone)]
pub struct HttpAggregationPort {
    http: HttpClient,
}

impl HttpAggregationPort {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let http = HttpClient::new(config)?;
        tracing::debug!(base_url = %http.base_url(), "Remote aggregation port ready");
        Ok(Self { http })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        Ok(self.http.get(path).await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        Ok(self.http.post(path, body).await?)
    }
}

fn decode_file(file: ExportFile) -> AppResult<CsvDocument> {
    let bytes = STANDARD.decode(file.content_base64.as_bytes()).map_err(|e| {
        AppError::upstream(format!("Export file is not valid base64: {}", e))
            .with_detail("fileName", file.file_name.as_str())
    })?;
    Ok(CsvDocument {
        file_name: file.file_name,
        bytes,
    })
}

#[async_trait]
impl AggregationPort for HttpAggregationPort {
    async fn fetch_summary(&self, query: &SummaryQuery) -> AppResult<Vec<SummaryRow>> {
        self.post("/api/pivot/summary", query).await
    }

    async fn fetch_pivot(&self, query: &PivotQuery) -> AppResult<PivotPage> {
        query.validate()?;
        if query.top_n.is_all() {
            cursor::decode(query.cursor.as_deref())?;
        }
        self.post("/api/pivot/drill", query).await
    }

    async fn fetch_daily_series(
        &self,
        period: &Period,
        entity: &EntityRef,
    ) -> AppResult<Vec<DailyPoint>> {
        let request = DailySeriesRequest {
            period: *period,
            entity: entity.clone(),
        };
        self.post("/api/pivot/daily", &request).await
    }

    async fn export_mode_cube(&self, query: &ExportQuery) -> AppResult<Vec<CsvDocument>> {
        let files: Vec<ExportFile> = self.post("/api/pivot/export", query).await?;
        files.into_iter().map(decode_file).collect()
    }

    async fn list_sales_reps(&self) -> AppResult<Vec<MasterRecord>> {
        self.get("/api/master/reps").await
    }

    async fn list_customers(&self) -> AppResult<Vec<MasterRecord>> {
        self.get("/api/master/customers").await
    }

    async fn list_items(&self) -> AppResult<Vec<MasterRecord>> {
        self.get("/api/master/items").await
    }
}
