use proptest::prelude::*;
use serde_json::{json, Value};

use boarding_types::{Itinerary, SessionPointer};
use boarding_verification::{derive_session_id, parse_ticket, WidgetOutcome};

fn attribute() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[A-Za-z]{0,12}".prop_map(|s| json!({ "rawvalue": s })),
        Just(json!({ "rawvalue": null })),
        Just(json!({ "id": "pbdf.gemeente.personalData.fullname" })),
        any::<i64>().prop_map(|n| json!({ "rawvalue": n })),
    ]
}

proptest! {
    /// The session id is whatever follows the last slash of the pointer URL.
    #[test]
    fn session_id_is_last_segment(
        prefix in "(https://[a-z]{1,10}\\.example)?(/[a-z]{1,8}){0,4}",
        id in "[A-Za-z0-9]{1,20}",
    ) {
        let pointer = SessionPointer::new(format!("{prefix}/{id}"));
        prop_assert_eq!(derive_session_id(Some(&pointer)), id);
    }

    /// A pointer without a slash is its own session id.
    #[test]
    fn session_id_without_slash(id in "[A-Za-z0-9]{0,20}") {
        let pointer = SessionPointer::new(id.clone());
        prop_assert_eq!(derive_session_id(Some(&pointer)), id);
    }

    /// Parsing any object never fails; a ticket always carries the itinerary.
    #[test]
    fn parse_never_fails_on_objects(group in prop::collection::vec(attribute(), 0..6)) {
        let raw = json!({ "disclosed": [group] });
        let parsed = parse_ticket(&raw, &Itinerary::demo());
        prop_assert!(parsed.is_ok());
        let ticket = parsed.unwrap().expect("non-empty disclosed yields a ticket");
        let demo = Itinerary::demo();
        prop_assert_eq!(ticket.itinerary(), Some(&demo));
    }

    /// Names come from the first two non-empty string values, in order.
    #[test]
    fn names_follow_first_group_order(
        first in "[A-Za-z]{1,12}",
        last in "[A-Za-z]{1,12}",
        other in "[A-Za-z]{1,12}",
    ) {
        let raw = json!({ "disclosed": [
            [{ "rawvalue": first }, { "rawvalue": "" }, { "rawvalue": last }],
            [{ "rawvalue": other }],
        ]});
        let ticket = parse_ticket(&raw, &Itinerary::demo()).unwrap().unwrap();
        prop_assert_eq!(ticket.first_name, first);
        prop_assert_eq!(ticket.last_name, last);
    }

    /// Objects without a `sessionResult` key are the disclosure itself.
    #[test]
    fn unwrapped_results_pass_through(key in "[a-z]{1,10}") {
        let raw = json!({ key: { "disclosed": [] } });
        let outcome = WidgetOutcome::from_value(raw.clone());
        prop_assert_eq!(outcome.into_disclosure().unwrap(), raw);
    }
}
