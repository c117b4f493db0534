//! Copying plugin coordinates

use tracing::{trace, warn};

use crate::view::{ElementHandle, View};

/// Class added to a copy button after a copy attempt
pub const COPIED_CLASS: &str = "copied";

/// Attribute holding a plugin's dependency coordinates
pub const COORDS_ATTR: &str = "data-coords";

/// System clipboard access
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard failed and the manual fallback was used
    FallbackUsed,
    NothingToCopy,
}

/// Write `coords` to the clipboard, falling back to `fallback` on failure
pub fn copy_coordinates(
    clipboard: &mut dyn Clipboard,
    coords: Option<&str>,
    fallback: impl FnOnce(&str),
) -> CopyOutcome {
    let Some(coords) = coords.filter(|coords| !coords.is_empty()) else {
        return CopyOutcome::NothingToCopy;
    };

    match clipboard.write_text(coords) {
        Ok(()) => {
            trace!(coords, "Copied coordinates");
            CopyOutcome::Copied
        }
        Err(e) => {
            warn!("Failed to copy: {e:#}");
            fallback(coords);
            CopyOutcome::FallbackUsed
        }
    }
}

/// Copy the coordinates a button carries and mark the button
pub fn copy_from_button(
    view: &mut dyn View,
    button: ElementHandle,
    clipboard: &mut dyn Clipboard,
    fallback: impl FnOnce(&str),
) -> CopyOutcome {
    let coords = view.attr(button, COORDS_ATTR);
    let outcome = copy_coordinates(clipboard, coords.as_deref(), fallback);
    if outcome != CopyOutcome::NothingToCopy {
        view.add_class(button, COPIED_CLASS);
    }
    outcome
}
