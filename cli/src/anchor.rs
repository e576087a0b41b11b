//! Terminal mount anchor: shows the session pointer as a QR code.

use std::io::Write;

use boarding_types::{Language, SessionPointer};
use boarding_verification::MountAnchor;
use qrcode::QrCode;

/// Renders session pointers to stdout.
pub struct TerminalAnchor {
    id: String,
}

impl TerminalAnchor {
    pub fn new() -> Self {
        Self {
            id: "terminal".into(),
        }
    }
}

impl Default for TerminalAnchor {
    fn default() -> Self {
        Self::new()
    }
}

fn instructions(language: Language) -> &'static str {
    match language {
        Language::En => "Scan the QR code with your Yivi app to authenticate.",
        Language::Nl => "Scan de QR-code met je Yivi-app om je te identificeren.",
    }
}

/// The QR code (or, when the pointer is too large, just the link) plus
/// instructions.
pub fn render_pointer(pointer: &SessionPointer, language: Language) -> String {
    let mut out = String::new();
    out.push_str(instructions(language));
    out.push('\n');

    // The credential app scans the pointer itself, as JSON.
    match serde_json::to_string(pointer)
        .map_err(|e| e.to_string())
        .and_then(|payload| QrCode::new(payload.as_bytes()).map_err(|e| e.to_string()))
    {
        Ok(code) => {
            out.push_str(
                &code
                    .render::<char>()
                    .quiet_zone(true)
                    .module_dimensions(2, 1)
                    .build(),
            );
            out.push('\n');
        }
        Err(e) => tracing::warn!("could not render session QR code: {e}"),
    }

    if let Some(url) = &pointer.u {
        out.push_str(url);
        out.push('\n');
    }
    out
}

impl MountAnchor for TerminalAnchor {
    fn id(&self) -> &str {
        &self.id
    }

    fn present(&self, pointer: &SessionPointer, language: Language) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout
            .write_all(render_pointer(pointer, language).as_bytes())
            .and_then(|()| stdout.flush())
        {
            tracing::warn!("failed to write session QR code: {e}");
        }
    }

    fn clear(&self) {
        tracing::debug!(anchor = %self.id, "session pointer withdrawn");
    }
}
