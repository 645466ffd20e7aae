use crate::RoarmError;

/// Stateless HTTP polling transport. The arm's firmware accepts one
/// command per GET, with the JSON frame passed in the `json` query
/// parameter, and answers telemetry requests in the response body.
pub struct HttpLink {
    host: String,
    client: reqwest::Client,
}

impl HttpLink {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Network errors fail only this attempt; the retry engine decides
    /// what happens next. A non-telemetry call that reaches the device is
    /// reported as its own frame; the firmware sends no acknowledgement
    /// on this path.
    pub async fn request(
        &mut self,
        frame: &str,
        telemetry: bool,
    ) -> Result<Option<String>, RoarmError> {
        let command = frame.trim_end();
        let url = format!("http://{}/js?json={}", self.host, command);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RoarmError::Http(e.to_string()))?;

        if telemetry {
            let body = response
                .text()
                .await
                .map_err(|e| RoarmError::Http(e.to_string()))?;
            if body.is_empty() {
                return Ok(None);
            }
            Ok(Some(body))
        } else {
            Ok(Some(command.to_string()))
        }
    }
}
