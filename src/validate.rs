use once_cell::sync::Lazy;
use regex::Regex;

// Full watch URLs and short links, optional scheme and www, id exactly 11 chars.
static SOURCE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)[A-Za-z0-9_-]{11}$")
        .expect("source url pattern")
});

/// Pure predicate gating every request: does `candidate` look like a video URL
/// we can hand to the remote service?
pub fn is_valid_source_url(candidate: &str) -> bool {
    SOURCE_URL.is_match(candidate)
}
