//! Session signal from the identity provider

/// An authenticated visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque identity string (a DID)
    pub did: String,
}

/// Synchronous "who is signed in" query
pub trait SessionProvider {
    /// None when no visitor is authenticated
    fn session(&self) -> Option<Session>;

    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}
