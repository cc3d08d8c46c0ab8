use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CommodityGroup, ProcurementRequest, ProcurementRequestCreate, UploadAck};

/// One function per backend capability. Callers present the error text
/// themselves; there are no retries or timeouts at this layer.
#[async_trait]
pub trait ProcurementApi: Send + Sync {
    async fn create_request(
        &self,
        payload: &ProcurementRequestCreate,
    ) -> Result<ProcurementRequest, ApiError>;

    async fn list_requests(&self) -> Result<Vec<ProcurementRequest>, ApiError>;

    async fn upload_offer(
        &self,
        request_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadAck, ApiError>;

    async fn extract_offer(&self, request_id: i64) -> Result<ProcurementRequest, ApiError>;

    async fn create_from_offer(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcurementRequest, ApiError>;

    async fn list_commodity_groups(&self) -> Result<Vec<CommodityGroup>, ApiError>;

    async fn predict_commodity_group(&self, title: &str) -> Result<Option<String>, ApiError>;

    async fn delete_all_requests(&self) -> Result<(), ApiError>;

    async fn update_request_status(
        &self,
        request_id: i64,
        status: &str,
        actor: &str,
    ) -> Result<ProcurementRequest, ApiError>;

    async fn chat(&self, message: &str) -> Result<String, ApiError>;
}

/// Non-2xx responses surface the raw body text verbatim as the message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    title: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    commodity_group_id: Option<String>,
}

#[derive(Serialize)]
struct StatusChange<'a> {
    status: &'a str,
    actor: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

pub struct HttpApi {
    client: reqwest::Client,
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        HttpApi {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    fn offer_part(filename: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        reqwest::multipart::Form::new().part("file", part)
    }
}

async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ProcurementApi for HttpApi {
    async fn create_request(
        &self,
        payload: &ProcurementRequestCreate,
    ) -> Result<ProcurementRequest, ApiError> {
        let response = self
            .client
            .post(self.url("/requests"))
            .json(payload)
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn list_requests(&self) -> Result<Vec<ProcurementRequest>, ApiError> {
        let response = self.client.get(self.url("/requests")).send().await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn upload_offer(
        &self,
        request_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadAck, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/requests/{}/upload-offer", request_id)))
            .multipart(Self::offer_part(filename, bytes))
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn extract_offer(&self, request_id: i64) -> Result<ProcurementRequest, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/requests/{}/extract-offer", request_id)))
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn create_from_offer(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcurementRequest, ApiError> {
        let response = self
            .client
            .post(self.url("/requests/create-from-offer"))
            .multipart(Self::offer_part(filename, bytes))
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn list_commodity_groups(&self) -> Result<Vec<CommodityGroup>, ApiError> {
        let response = self.client.get(self.url("/commodity-groups")).send().await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn predict_commodity_group(&self, title: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .client
            .post(self.url("/predict-commodity-group"))
            .json(&PredictRequest { title })
            .send()
            .await?;
        let body: PredictResponse = checked(response).await?.json().await?;
        Ok(body.commodity_group_id)
    }

    async fn delete_all_requests(&self) -> Result<(), ApiError> {
        let response = self.client.delete(self.url("/requests")).send().await?;
        checked(response).await?;
        Ok(())
    }

    async fn update_request_status(
        &self,
        request_id: i64,
        status: &str,
        actor: &str,
    ) -> Result<ProcurementRequest, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/requests/{}/status", request_id)))
            .json(&StatusChange { status, actor })
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn chat(&self, message: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&ChatRequest { message })
            .send()
            .await?;
        let body: ChatResponse = checked(response).await?.json().await?;
        Ok(body.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_the_raw_body() {
        let err = ApiError::Status {
            status: 422,
            body: "order_lines must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "order_lines must not be empty");
    }

    #[test]
    fn base_url_trailing_slash_is_tolerated() {
        let api = HttpApi::new("http://127.0.0.1:8000/");
        assert_eq!(api.url("/requests"), "http://127.0.0.1:8000/requests");
    }
}
