//! Plain-text boarding pass.

use boarding_types::{Language, Ticket};

struct Labels {
    subtitle: &'static str,
    name: &'static str,
    document: &'static str,
    from: &'static str,
    to: &'static str,
    flight: &'static str,
    seat: &'static str,
    date: &'static str,
    time: &'static str,
    gate: &'static str,
    ready: &'static str,
    pending: &'static str,
}

const AIRLINE: &str = "Yivi International Airlines";

fn labels(language: Language) -> Labels {
    match language {
        Language::En => Labels {
            subtitle: "Demo Boarding Pass",
            name: "Name",
            document: "Document",
            from: "From",
            to: "To",
            flight: "Flight",
            seat: "Seat",
            date: "Date",
            time: "Time",
            gate: "Gate",
            ready: "Verification complete. Boarding pass ready.",
            pending: "Complete verification to activate your pass.",
        },
        Language::Nl => Labels {
            subtitle: "Demo-boardingpass",
            name: "Naam",
            document: "Document",
            from: "Van",
            to: "Naar",
            flight: "Vlucht",
            seat: "Stoel",
            date: "Datum",
            time: "Tijd",
            gate: "Gate",
            ready: "Verificatie voltooid. Boardingpass is klaar.",
            pending: "Maak de verificatie af om je pass te activeren.",
        },
    }
}

/// Render `ticket` as a framed boarding pass.
///
/// A pass that is not `ready` carries the pending notice instead of the
/// ready notice.
pub fn render(ticket: &Ticket, language: Language, ready: bool) -> String {
    let labels = labels(language);
    let mut rows = vec![(labels.name, ticket.full_name())];
    if let Some(document) = ticket.document_number() {
        rows.push((labels.document, document.to_string()));
    }
    if let Some(it) = ticket.itinerary() {
        rows.extend([
            (labels.flight, it.flight.clone()),
            (labels.from, it.from.clone()),
            (labels.to, it.to.clone()),
            (labels.date, it.date.clone()),
            (labels.time, it.time.clone()),
            (labels.gate, it.gate.clone()),
            (labels.seat, it.seat.clone()),
        ]);
    }

    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let mut lines = vec![AIRLINE.to_string(), labels.subtitle.to_string(), String::new()];
    lines.extend(
        rows.iter()
            .map(|(label, value)| format!("{label:<label_width$}  {value}")),
    );
    lines.push(String::new());
    lines.push(if ready { labels.ready } else { labels.pending }.to_string());

    frame(&lines)
}

fn frame(lines: &[String]) -> String {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for line in lines {
        let pad = width - line.chars().count();
        out.push_str(&format!("| {line}{} |\n", " ".repeat(pad)));
    }
    out.push_str(&border);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use boarding_types::Itinerary;

    #[test]
    fn flight_pass_lists_the_itinerary() {
        let ticket = Ticket::with_itinerary("Jan", "Jansen", Itinerary::demo());
        let pass = render(&ticket, Language::Nl, true);
        assert!(pass.contains("Naam    Jan Jansen"));
        assert!(pass.contains("Vlucht  Y256"));
        assert!(pass.contains("Stoel   15B"));
        assert!(pass.contains("Boardingpass is klaar."));
    }

    #[test]
    fn pending_pass_shows_the_document() {
        let ticket = Ticket::with_document("Jane", "Doe", "X1234567");
        let pass = render(&ticket, Language::En, false);
        assert!(pass.contains("Document  X1234567"));
        assert!(pass.contains("Complete verification to activate your pass."));
        assert!(!pass.contains("Flight"));
    }

    #[test]
    fn frame_lines_share_one_width() {
        let ticket = Ticket::with_itinerary("Jan", "Jansen", Itinerary::demo());
        let pass = render(&ticket, Language::En, true);
        let widths: Vec<usize> = pass.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
