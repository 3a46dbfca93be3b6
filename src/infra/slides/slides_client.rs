use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};

use crate::core::gateway::{AccessTokenProvider, GatewayError};
use crate::core::links::DocumentRef;
use crate::core::slides::{hashtag_slide_map, Presentation, Slide};
use crate::infra::drive::check_status;

/// Client for the Slides v1 API.
pub struct SlidesClient {
    auth: Arc<dyn AccessTokenProvider>,
    client: Client,
    base_url: String,
}

impl SlidesClient {
    pub fn new(auth: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            auth,
            client: Client::new(),
            base_url: "https://slides.googleapis.com/v1/presentations".to_string(),
        }
    }

    /// Fetches a presentation restricted to the given field mask.
    pub async fn get_presentation(
        &self,
        presentation: &DocumentRef,
        fields: &str,
    ) -> Result<Value, GatewayError> {
        let id = presentation.resolve()?;
        let token = self.auth.access_token().await?;

        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, id))
            .bearer_auth(&token)
            .query(&[("fields", fields)])
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        resp.json().await.map_err(GatewayError::transport)
    }

    /// Fetches just the slides of a presentation, typed.
    pub async fn get_slides(&self, presentation: &DocumentRef) -> Result<Vec<Slide>, GatewayError> {
        let raw = self.get_presentation(presentation, "slides").await?;
        let parsed: Presentation = serde_json::from_value(raw)
            .map_err(|e| GatewayError::Shape(format!("unexpected presentation body: {}", e)))?;
        Ok(parsed.slides)
    }

    /// Submits a batch of update requests (see the builders in
    /// [`crate::core::slides`]) against the presentation.
    pub async fn batch_update(
        &self,
        presentation: &DocumentRef,
        requests: Vec<Value>,
    ) -> Result<Value, GatewayError> {
        let id = presentation.resolve()?;
        let token = self.auth.access_token().await?;
        let request_count = requests.len();

        let resp = self
            .client
            .post(format!("{}/{}:batchUpdate", self.base_url, id))
            .bearer_auth(&token)
            .query(&[("fields", "")])
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let body: Value = resp.json().await.map_err(GatewayError::transport)?;
        tracing::info!("presentation {} updated ({} request(s))", id, request_count);
        Ok(body)
    }

    /// Fetches the presentation's slides and maps speaker-note hashtags to
    /// slide object ids, for tag-driven slide selection.
    pub async fn speaker_note_tags(
        &self,
        presentation: &DocumentRef,
    ) -> Result<HashMap<String, Vec<String>>, GatewayError> {
        let slides = self.get_slides(presentation).await?;
        Ok(hashtag_slide_map(&slides))
    }
}
