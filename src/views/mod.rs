// src/views/mod.rs
// =============================================================================
// Views: the consumers of fetch controllers, rendered as terminal text.
//
// Every view follows the same contract:
// - it owns one FetchController per piece of data it shows
// - it triggers the fetches itself (load), the controllers never do
// - it guards each payload with a Schema before touching it
// - each panel renders exactly one of: loading, error message, content
//
// Submodules:
// - user: "Your Stats" page
// - repositories: "Your Repositories" page
// - sidebar: brand, navigation and the signed-in user's account widget
// - progress: live per-panel progress lines driven by state subscriptions
//
// Rust concepts:
// - Traits: every page exposes its panels the same way
// - Generics: Render<T> works for any Schema type
// - fmt::Write: rendering into a String instead of straight to stdout
// =============================================================================

mod progress;
mod repositories;
mod sidebar;
mod user;

pub use progress::watch_progress;
pub use repositories::RepositoriesPage;
pub use sidebar::Sidebar;
pub use user::UserPage;

use crate::error::FALLBACK_MESSAGE;
use crate::fetch::{FetchController, FetchState, FetchStatus};
use crate::schema::Schema;
use serde_json::{Map, Value};
use std::fmt::{self, Write};

/// The visual state of one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Render<T> {
    Loading,
    Failed(String),
    Ready(T),
    /// Nothing to show: never fetched, or the payload failed its guard
    Empty,
}

impl<T: Schema> Render<T> {
    pub fn from_state(state: &FetchState) -> Self {
        match state.status {
            FetchStatus::Idle => Render::Empty,
            FetchStatus::Loading => Render::Loading,
            FetchStatus::Error => Render::Failed(
                state
                    .message
                    .clone()
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            ),
            // Success alone is not enough; the payload has to pass its guard
            FetchStatus::Success => match T::from_state(state) {
                Ok(value) => Render::Ready(value),
                Err(e) => {
                    tracing::debug!(error = %e, "Treating payload as no usable data");
                    Render::Empty
                }
            },
        }
    }
}

/// Anything made of named, independently fetched panels.
pub trait View {
    fn panels(&self) -> Vec<(&'static str, &FetchController)>;

    fn render(&self, out: &mut String) -> fmt::Result;

    /// Stops publishing results for every panel still in flight.
    fn unmount(&self) {
        for (_, controller) in self.panels() {
            controller.unmount();
        }
    }
}

/// Page-level view of its panels. Controllers provide no joint signal, so
/// the page works it out here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSummary {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
}

impl PageSummary {
    pub fn of(view: &dyn View) -> Self {
        view.panels()
            .into_iter()
            .fold(PageSummary::default(), |mut summary, (_, controller)| {
                summary.total += 1;
                // Panels still idle or loading count towards the total only
                match controller.state().status {
                    FetchStatus::Success => summary.loaded += 1,
                    FetchStatus::Error => summary.failed += 1,
                    FetchStatus::Idle | FetchStatus::Loading => {}
                }
                summary
            })
    }

    pub fn all_loaded(&self) -> bool {
        self.loaded == self.total
    }
}

/// Every panel's raw state, keyed by panel name.
pub fn snapshot(view: &dyn View) -> Value {
    let mut map = Map::new();
    for (name, controller) in view.panels() {
        // FetchState always serializes; Null just keeps the key present
        let state = serde_json::to_value(controller.state()).unwrap_or(Value::Null);
        map.insert(name.to_string(), state);
    }
    Value::Object(map)
}

/// Writes a titled panel and then whichever of the three states applies.
pub(crate) fn write_panel<T: Schema>(
    out: &mut String,
    heading: &str,
    description: &str,
    state: &FetchState,
    content: impl FnOnce(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    writeln!(out, "{}", heading)?;
    writeln!(out, "{}", description)?;
    writeln!(out, "{}", "-".repeat(72))?;

    match Render::<T>::from_state(state) {
        Render::Loading => writeln!(out, "   ⏳ Loading...")?,
        Render::Failed(message) => writeln!(out, "   ❌ {}", message)?,
        Render::Empty => writeln!(out, "   (nothing to show)")?,
        Render::Ready(value) => content(out, &value)?,
    }

    writeln!(out)
}

/// Cuts `text` down to `width` characters, marking the cut with "...".
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    // Count chars, not bytes, so multi-byte names are never split
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::schema::UserSidebar;
    use serde_json::json;

    #[test]
    fn test_render_states_are_exclusive() {
        assert_eq!(
            Render::<UserSidebar>::from_state(&FetchState::idle()),
            Render::Empty
        );
        assert_eq!(
            Render::<UserSidebar>::from_state(&FetchState::loading()),
            Render::Loading
        );

        let failed = FetchState::failed(FetchError::Remote {
            status: 403,
            message: Some("Forbidden".to_string()),
        });
        assert_eq!(
            Render::<UserSidebar>::from_state(&failed),
            Render::Failed("Forbidden".to_string())
        );
    }

    #[test]
    fn test_failed_guard_renders_empty() {
        let state = FetchState::success(json!({ "unexpected": true }));
        assert_eq!(Render::<UserSidebar>::from_state(&state), Render::Empty);
    }

    #[test]
    fn test_write_panel_shows_error_message() {
        let mut out = String::new();
        let state = FetchState::failed(FetchError::Transport("refused".to_string()));
        write_panel::<UserSidebar>(&mut out, "Heading", "Description", &state, |_, _| Ok(()))
            .unwrap();

        assert!(out.contains("Heading"));
        assert!(out.contains(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-repository-name", 10), "a-very-...");
    }
}
