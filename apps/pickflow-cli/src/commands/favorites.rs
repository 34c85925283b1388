//! Favorite articles, kept across sessions in the preference files.

use tracing::{debug, info};

use crate::commands::Response;
use crate::error::ApiError;
use crate::state::{PreferencesState, SessionState};

/// Toggles a favorite. Without a key the current item's article is used.
pub fn toggle(
    session: &SessionState,
    preferences: &PreferencesState,
    key: Option<&str>,
) -> Result<Response, ApiError> {
    let key = match key {
        Some(key) => key.to_string(),
        None => session
            .with_session(|s| {
                s.cursor()
                    .current_item()
                    .map(|item| item.article_number.clone())
            })
            .ok_or_else(|| ApiError::validation("No current article to mark as favorite"))?,
    };
    debug!(key = %key, "fav command");

    let favorite = preferences.toggle_favorite(&key)?;
    info!(key = %key, favorite, "Favorite toggled");

    Ok(Response::Favorite { key, favorite })
}

/// Lists all favorites.
pub fn list(preferences: &PreferencesState) -> Result<Response, ApiError> {
    let keys = preferences
        .favorites()?
        .iter()
        .map(str::to_string)
        .collect();
    Ok(Response::Favorites { keys })
}
