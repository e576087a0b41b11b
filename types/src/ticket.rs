//! Demo tickets and boarding-pass itineraries.

use serde::{Deserialize, Serialize};

/// Demo boarding-pass data.
///
/// A ticket either carries the passenger's free-form document number (as
/// entered when the ticket was bought) or the flight metadata printed on the
/// boarding pass once a disclosure session completed. Tickets are never
/// mutated after creation; a later successful session supersedes them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub first_name: String,
    pub last_name: String,
    #[serde(flatten)]
    pub details: TicketDetails,
}

/// Variant-specific ticket fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketDetails {
    /// Flight metadata sourced from the configured itinerary.
    Flight(Itinerary),
    /// Passport or other document number supplied by the passenger.
    Document {
        #[serde(rename = "documentNumber")]
        document_number: String,
    },
}

impl Ticket {
    /// A ticket bound to a passenger document.
    pub fn with_document(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        document_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            details: TicketDetails::Document {
                document_number: document_number.into(),
            },
        }
    }

    /// A ticket carrying flight metadata.
    pub fn with_itinerary(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        itinerary: Itinerary,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            details: TicketDetails::Flight(itinerary),
        }
    }

    /// "First Last", as printed on the pass.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn document_number(&self) -> Option<&str> {
        match &self.details {
            TicketDetails::Document { document_number } => Some(document_number),
            TicketDetails::Flight(_) => None,
        }
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        match &self.details {
            TicketDetails::Flight(itinerary) => Some(itinerary),
            TicketDetails::Document { .. } => None,
        }
    }
}

/// Flight metadata for a demo boarding pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub flight: String,
    pub from: String,
    pub to: String,
    pub seat: String,
    pub date: String,
    pub time: String,
    pub gate: String,
}

impl Itinerary {
    /// The fixed itinerary every demo passenger is booked on.
    pub fn demo() -> Self {
        Self {
            flight: "Y256".into(),
            from: "AMS".into(),
            to: "MXP".into(),
            seat: "15B".into(),
            date: "2025-12-5".into(),
            time: "13:30".into(),
            gate: "12".into(),
        }
    }
}

impl Default for Itinerary {
    fn default() -> Self {
        Self::demo()
    }
}

/// Passenger input for creating a ticket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub first_name: String,
    pub last_name: String,
    pub document_number: String,
}

impl NewTicket {
    /// Trim every field and upper-case the document number.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            document_number: self.document_number.trim().to_uppercase(),
        }
    }

    /// All three fields are non-empty after normalization.
    pub fn is_complete(&self) -> bool {
        let n = self.normalized();
        !n.first_name.is_empty() && !n.last_name.is_empty() && !n.document_number.is_empty()
    }
}
