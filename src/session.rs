//! Process-lifetime session state.
//!
//! Ephemeral cross-call memory that intentionally does not survive a
//! restart: the per-chat commentary style and the per-user "next message is
//! a wishlist item" flag. Kept behind one explicit accessor (never a bare
//! global) so handlers share a single instance through `BotData` and tests
//! construct and reset their own. Reads and writes race across await points
//! by design - last writer per chat/user wins, and the worst case is one
//! stale style.

use crate::r#gen::gemini::CommentaryStyle;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory session state shared by all handlers.
#[derive(Debug, Default)]
pub struct SessionState {
    chat_styles: RwLock<HashMap<i64, CommentaryStyle>>,
    awaiting_wishlist: RwLock<HashSet<i64>>,
}

impl SessionState {
    /// Creates empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The chat's selected commentary style, defaulting when never set.
    pub async fn style_for(&self, chat_id: i64) -> CommentaryStyle {
        self.chat_styles
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// Selects the chat's commentary style.
    pub async fn set_style(&self, chat_id: i64, style: CommentaryStyle) {
        self.chat_styles.write().await.insert(chat_id, style);
    }

    /// Arms the "next free-text message is a wishlist item" flag for a user.
    pub async fn arm_wishlist_prompt(&self, user_id: i64) {
        self.awaiting_wishlist.write().await.insert(user_id);
    }

    /// Consumes the user's wishlist flag, reporting whether it was armed.
    pub async fn take_wishlist_prompt(&self, user_id: i64) -> bool {
        self.awaiting_wishlist.write().await.remove(&user_id)
    }

    /// Drops all session state. Test hook.
    pub async fn reset(&self) {
        self.chat_styles.write().await.clear();
        self.awaiting_wishlist.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_style_defaults_and_sticks() {
        let session = SessionState::new();
        assert_eq!(session.style_for(1).await, CommentaryStyle::Sarcastic);

        session.set_style(1, CommentaryStyle::Deadpan).await;
        assert_eq!(session.style_for(1).await, CommentaryStyle::Deadpan);
        // other chats stay on the default
        assert_eq!(session.style_for(2).await, CommentaryStyle::Sarcastic);
    }

    #[tokio::test]
    async fn test_wishlist_flag_consumed_once() {
        let session = SessionState::new();
        assert!(!session.take_wishlist_prompt(7).await);

        session.arm_wishlist_prompt(7).await;
        assert!(session.take_wishlist_prompt(7).await);
        assert!(!session.take_wishlist_prompt(7).await);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let session = SessionState::new();
        session.set_style(1, CommentaryStyle::Motivational).await;
        session.arm_wishlist_prompt(7).await;

        session.reset().await;
        assert_eq!(session.style_for(1).await, CommentaryStyle::Sarcastic);
        assert!(!session.take_wishlist_prompt(7).await);
    }
}
