//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{FirestoreDb, StoreListener};

/// Collection names as constants.
pub mod collections {
    pub const RECIPES: &str = "recipes";
    pub const USERS: &str = "users";
    /// Per-user favorites subcollection under `users/{uid}`.
    pub const FAVORITES: &str = "favorites";
}

/// Listener target ids, one per live query shape.
pub mod targets {
    pub const RECIPES_FEED: u32 = 1;
    pub const OWNED_RECIPES: u32 = 2;
    pub const FAVORITES: u32 = 3;
}
