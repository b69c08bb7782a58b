use jiff::SignedDuration;
use typed_builder::TypedBuilder;

/// Lifetime given to new links unless configured otherwise.
pub const DEFAULT_LINK_TTL: SignedDuration = SignedDuration::from_hours(48);

/// What to do when a long URL is submitted a second time.
///
/// Tokens are content-addressed, so a resubmission always collides with the
/// stored short URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Surface the store's `Conflict` to the caller.
    #[default]
    Reject,
    /// Return the already stored link if it points at the same long URL.
    ReuseExisting,
}

/// Service settings, built once at startup.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// `expires_at = created_at + link_ttl`.
    #[builder(default = DEFAULT_LINK_TTL)]
    pub link_ttl: SignedDuration,
    #[builder(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
