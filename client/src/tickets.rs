//! Ticket creation against the backend.

use std::time::Duration;

use boarding_store::PendingTicket;
use boarding_types::{ApiEndpoint, NewTicket, Ticket};
use serde::Deserialize;

use crate::error::ClientError;
use crate::http::{build_client, describe, DEFAULT_TIMEOUT};

/// Client for the backend's ticket endpoint.
///
/// Sends `POST {endpoint}/tickets` and turns the created ticket into the
/// pending ticket the verification flow binds to.
pub struct TicketClient {
    http_client: reqwest::Client,
}

/// Ticket as returned by the backend.
///
/// The backend also fills in its own flight fields; they are not part of the
/// pending ticket and are ignored here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedTicket {
    id: String,
    first_name: String,
    last_name: String,
    document_number: String,
}

impl TicketClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let http_client = build_client(timeout).unwrap_or_default();
        Self { http_client }
    }

    /// Create a ticket for `request`.
    ///
    /// Incomplete input is rejected before anything is sent.
    pub async fn create_ticket(
        &self,
        endpoint: &ApiEndpoint,
        request: &NewTicket,
    ) -> Result<PendingTicket, ClientError> {
        let body = request.normalized();
        if !body.is_complete() {
            return Err(ClientError::IncompleteTicket);
        }

        let url = endpoint.tickets_url();
        tracing::debug!(%url, "creating ticket");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ClientError::Unreachable(describe(&e))
                } else {
                    ClientError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.trim();
            return Err(ClientError::RequestFailed(if detail.is_empty() {
                format!("HTTP status {status}")
            } else {
                format!("HTTP status {status}: {detail}")
            }));
        }

        let created: CreatedTicket = response.json().await.map_err(|e| {
            ClientError::InvalidResponse(format!("failed to parse created ticket: {e}"))
        })?;
        if created.id.trim().is_empty() {
            return Err(ClientError::InvalidResponse("created ticket has no id".into()));
        }

        tracing::info!(ticket_id = %created.id, "ticket created");
        Ok(PendingTicket {
            ticket_id: created.id,
            ticket: Ticket::with_document(
                created.first_name,
                created.last_name,
                created.document_number,
            ),
        })
    }
}

impl Default for TicketClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_ticket_ignores_flight_fields() {
        let json = r#"{"id":"t-42","firstName":"Jane","lastName":"Doe","documentNumber":"X1",
                       "flight":"OS123","from":"AMS","to":"BCN","seat":"12A"}"#;
        let created: CreatedTicket = serde_json::from_str(json).unwrap();
        assert_eq!(created.id, "t-42");
        assert_eq!(created.document_number, "X1");
    }

    #[tokio::test]
    async fn incomplete_input_is_rejected_locally() {
        let client = TicketClient::new();
        // Nothing listens here; an attempted request would be Unreachable.
        let endpoint = ApiEndpoint::resolve(Some("http://127.0.0.1:9/api"));
        let request = NewTicket {
            first_name: "Jane".into(),
            last_name: "  ".into(),
            document_number: "x1".into(),
        };
        let err = client.create_ticket(&endpoint, &request).await.unwrap_err();
        assert!(matches!(err, ClientError::IncompleteTicket));
    }
}
