//! Disclosure result parsing.
//!
//! The verification backend requests identity attributes in a fixed order
//! (first name, then last name) and returns what the user disclosed as
//! `{ "disclosed": [[{ "rawvalue": … }, …], …] }`. Only the first group is
//! read, and attributes are mapped by position. The flight fields of the
//! boarding pass never come from the disclosure; they are filled from the
//! configured itinerary.

use boarding_types::{Itinerary, Ticket};
use serde_json::Value;

use crate::error::ParseError;

/// Position of the first-name attribute in the requested attribute list.
const FIRST_NAME_INDEX: usize = 0;
/// Position of the last-name attribute in the requested attribute list.
const LAST_NAME_INDEX: usize = 1;

/// Parse a disclosure result into a boarding-pass ticket.
///
/// Returns `Ok(None)` when `disclosed` is absent, not an array, or empty.
/// Missing or malformed attributes leave the corresponding name empty.
/// A `null` payload has nothing to read from and is a [`ParseError`].
pub fn parse_ticket(raw: &Value, itinerary: &Itinerary) -> Result<Option<Ticket>, ParseError> {
    if raw.is_null() {
        return Err(ParseError::new("result payload is null", raw.clone()));
    }

    let Some(groups) = raw.get("disclosed").and_then(Value::as_array) else {
        return Ok(None);
    };
    let Some(group) = groups.first() else {
        return Ok(None);
    };

    let values = extract_raw_values(group);
    let name_at = |index: usize| values.get(index).cloned().unwrap_or_default();

    Ok(Some(Ticket::with_itinerary(
        name_at(FIRST_NAME_INDEX),
        name_at(LAST_NAME_INDEX),
        itinerary.clone(),
    )))
}

/// Collect the non-empty `rawvalue` strings of one attribute group, in order.
///
/// A group that is not an array is treated as empty; entries without a
/// non-empty string `rawvalue` are skipped.
pub fn extract_raw_values(group: &Value) -> Vec<String> {
    group
        .as_array()
        .map(|attributes| {
            attributes
                .iter()
                .filter_map(|attr| attr.get("rawvalue").and_then(Value::as_str))
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> Option<Ticket> {
        parse_ticket(&raw, &Itinerary::demo()).expect("parse should not fail")
    }

    #[test]
    fn maps_first_group_positionally() {
        let ticket = parse(json!({"disclosed": [[{"rawvalue": "Alice"}, {"rawvalue": "Smith"}]]}))
            .expect("ticket");
        assert_eq!(ticket.first_name, "Alice");
        assert_eq!(ticket.last_name, "Smith");
        assert_eq!(ticket.itinerary(), Some(&Itinerary::demo()));
    }

    #[test]
    fn empty_or_absent_disclosed_yields_nothing() {
        assert_eq!(parse(json!({"disclosed": []})), None);
        assert_eq!(parse(json!({})), None);
        assert_eq!(parse(json!({"disclosed": "nope"})), None);
        assert_eq!(parse(json!("just a string")), None);
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let ticket = parse(json!({"disclosed": [[{"rawvalue": ""}, {"notRawvalue": "x"}]]}))
            .expect("ticket");
        assert_eq!(ticket.first_name, "");
        assert_eq!(ticket.last_name, "");
    }

    #[test]
    fn dropped_entries_shift_later_values_forward() {
        let ticket = parse(json!({"disclosed": [[
            {"rawvalue": 42},
            {"id": "pbdf.gemeente.personalData.firstnames", "rawvalue": "Jan"},
            {"rawvalue": "Jansen", "value": {"en": "Jansen"}}
        ]]}))
        .expect("ticket");
        assert_eq!(ticket.full_name(), "Jan Jansen");
    }

    #[test]
    fn non_array_first_group_is_an_empty_group() {
        let ticket = parse(json!({"disclosed": [{"rawvalue": "Alice"}]})).expect("ticket");
        assert_eq!(ticket.first_name, "");
    }

    #[test]
    fn later_groups_are_ignored() {
        let ticket = parse(json!({"disclosed": [
            [{"rawvalue": "Alice"}],
            [{"rawvalue": "Other"}, {"rawvalue": "Group"}]
        ]}))
        .expect("ticket");
        assert_eq!(ticket.first_name, "Alice");
        assert_eq!(ticket.last_name, "");
    }

    #[test]
    fn itinerary_comes_from_configuration() {
        let custom = Itinerary {
            flight: "KL1234".into(),
            ..Itinerary::demo()
        };
        let ticket = parse_ticket(
            &json!({"disclosed": [[{"rawvalue": "A"}, {"rawvalue": "B"}]]}),
            &custom,
        )
        .unwrap()
        .unwrap();
        assert_eq!(ticket.itinerary().map(|i| i.flight.as_str()), Some("KL1234"));
    }

    #[test]
    fn null_payload_is_a_parse_error() {
        let err = parse_ticket(&Value::Null, &Itinerary::demo()).unwrap_err();
        assert_eq!(err.raw, Value::Null);
    }
}
