//! Session pointers and session start requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ticket::Ticket;

/// Opaque handle identifying a verification session.
///
/// The only field interpreted here is `u`, the session resource URL; every
/// other field is kept as received so the pointer can be handed to the user's
/// credential app unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPointer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionPointer {
    pub fn new(u: impl Into<String>) -> Self {
        Self {
            u: Some(u.into()),
            extra: Map::new(),
        }
    }
}

/// Body of a ticket-bound session start request.
///
/// Absent fields are omitted from the JSON body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
}

impl SessionRequest {
    /// Build the request for a previously stored ticket.
    ///
    /// Names are trimmed and the document number is trimmed and upper-cased.
    pub fn for_ticket(ticket_id: &str, ticket: &Ticket) -> Self {
        Self {
            ticket_id: Some(ticket_id.trim().to_string()),
            first_name: Some(ticket.first_name.trim().to_string()),
            last_name: Some(ticket.last_name.trim().to_string()),
            document_number: ticket
                .document_number()
                .map(|doc| doc.trim().to_uppercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::Itinerary;
    use serde_json::json;

    #[test]
    fn pointer_keeps_unknown_fields() {
        let raw = json!({"u": "https://irma.example/irma/session/abc123", "irmaqr": "disclosing"});
        let pointer: SessionPointer = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(pointer.u.as_deref(), Some("https://irma.example/irma/session/abc123"));
        assert_eq!(pointer.extra["irmaqr"], "disclosing");
        assert_eq!(serde_json::to_value(&pointer).unwrap(), raw);
    }

    #[test]
    fn pointer_without_u() {
        let pointer: SessionPointer = serde_json::from_value(json!({"irmaqr": "x"})).unwrap();
        assert!(pointer.u.is_none());
    }

    #[test]
    fn request_for_document_ticket_is_normalized() {
        let ticket = Ticket::with_document(" Jane ", "Doe ", " x123 ");
        let req = SessionRequest::for_ticket("t-1", &ticket);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"ticketId": "t-1", "firstName": "Jane", "lastName": "Doe", "documentNumber": "X123"})
        );
    }

    #[test]
    fn request_for_flight_ticket_omits_document() {
        let ticket = Ticket::with_itinerary("Jane", "Doe", Itinerary::demo());
        let value = serde_json::to_value(SessionRequest::for_ticket("t-2", &ticket)).unwrap();
        assert!(value.get("documentNumber").is_none());
    }
}
