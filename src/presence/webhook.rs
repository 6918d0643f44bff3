use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{Avatars, Presence, PresenceError};
use crate::models::PlantStatus;

/// Body posted to the presence endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresenceUpdate<'a> {
    activity: &'a str,
    activity_type: &'static str,
    avatar_url: &'a str,
    alive: bool,
    application_id: Option<&'a str>,
    scope: Option<&'a str>,
}

/// Forwards status updates to an HTTP endpoint owned by the chat bridge.
#[derive(Debug, Clone)]
pub struct WebhookPresence {
    url: String,
    token: Option<String>,
    application_id: Option<String>,
    scope: Option<String>,
    avatars: Avatars,
    client: Client,
}

impl WebhookPresence {
    pub fn new(url: impl Into<String>, avatars: Avatars) -> Self {
        Self {
            url: url.into(),
            token: None,
            application_id: None,
            scope: None,
            avatars,
            client: Client::new(),
        }
    }

    /// Bearer credential sent with every update.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Application identity and deployment scope passed through to the bridge.
    pub fn with_identity(mut self, application_id: Option<String>, scope: Option<String>) -> Self {
        self.application_id = application_id;
        self.scope = scope;
        self
    }
}

#[async_trait]
impl Presence for WebhookPresence {
    async fn publish(&self, status: &PlantStatus) -> Result<(), PresenceError> {
        let body = PresenceUpdate {
            activity: &status.label,
            activity_type: "playing",
            avatar_url: self.avatars.for_status(status),
            alive: status.alive,
            application_id: self.application_id.as_deref(),
            scope: self.scope.as_deref(),
        };

        let mut req = self.client.post(&self.url).json(&body);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let code = response.status();
        if code.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(PresenceError::Rejected(format!("{}: {}", code, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_uses_camel_case_keys() {
        let body = PresenceUpdate {
            activity: "dead",
            activity_type: "playing",
            avatar_url: "dead.png",
            alive: false,
            application_id: Some("123"),
            scope: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "activity": "dead",
                "activityType": "playing",
                "avatarUrl": "dead.png",
                "alive": false,
                "applicationId": "123",
                "scope": null,
            })
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let presence = WebhookPresence::new("http://127.0.0.1:9/presence", Avatars::default());
        let status = PlantStatus {
            alive: true,
            label: "plant games | 5% life | 5% water".to_string(),
        };
        assert!(presence.publish(&status).await.is_err());
    }
}
