//! Click effects carried by bubbles and their single dispatch point

use serde::{Deserialize, Serialize};

/// What happens when a bubble is clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnEffect {
    /// Navigate to the catalog item with this key
    Navigate(String),
    /// Open the login surface
    OpenLogin,
    /// Open the dialogue surface
    OpenDialogue,
}

/// Host-side side effects triggered by clicking a bubble
pub trait EffectHandler {
    fn navigate(&mut self, key: &str);
    fn open_login(&mut self);
    fn open_dialogue(&mut self);
}

/// Invoke exactly one handler callback for `effect`
pub fn dispatch(effect: &SpawnEffect, handler: &mut dyn EffectHandler) {
    match effect {
        SpawnEffect::Navigate(key) => handler.navigate(key),
        SpawnEffect::OpenLogin => handler.open_login(),
        SpawnEffect::OpenDialogue => handler.open_dialogue(),
    }
}
