//! Shared primitives for the whisker crates.

/// Generate a new random identifier (UUID v4, hyphenated).
pub fn create_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
