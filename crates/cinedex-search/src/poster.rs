//! Poster selection.

use cinedex_api::omdb::POSTER_NOT_AVAILABLE;
use cinedex_api::probe::ImageProbe;

/// Image shown when a record has no usable poster.
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Returns the poster URL worth probing, if any.
#[must_use]
pub fn poster_candidate(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() || url == POSTER_NOT_AVAILABLE {
        None
    } else {
        Some(url)
    }
}

/// Picks the poster to display: `url` if it is reachable, otherwise the placeholder.
///
/// The `"N/A"` sentinel and blank URLs never reach the probe.
pub async fn resolve_poster<P>(probe: &P, url: &str) -> String
where
    P: ImageProbe + Sync,
{
    let Some(candidate) = poster_candidate(url) else {
        return String::from(PLACEHOLDER_POSTER);
    };
    if probe.check(candidate).await {
        String::from(candidate)
    } else {
        String::from(PLACEHOLDER_POSTER)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Probe answering a fixed value and counting calls.
    struct FixedProbe {
        reachable: bool,
        calls: AtomicUsize,
    }

    impl FixedProbe {
        const fn new(reachable: bool) -> Self {
            Self {
                reachable,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ImageProbe for FixedProbe {
        async fn check(&self, _url: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reachable
        }
    }

    #[test]
    fn test_poster_candidate() {
        // Arrange & Act & Assert
        assert_eq!(poster_candidate("N/A"), None);
        assert_eq!(poster_candidate(""), None);
        assert_eq!(poster_candidate("  "), None);
        assert_eq!(
            poster_candidate("https://img.example/p.jpg"),
            Some("https://img.example/p.jpg")
        );
    }

    #[tokio::test]
    async fn test_resolve_reachable_poster() {
        // Arrange
        let probe = FixedProbe::new(true);

        // Act
        let poster = resolve_poster(&probe, "https://img.example/p.jpg").await;

        // Assert
        assert_eq!(poster, "https://img.example/p.jpg");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_unreachable_poster_uses_placeholder() {
        // Arrange
        let probe = FixedProbe::new(false);

        // Act
        let poster = resolve_poster(&probe, "https://img.example/gone.jpg").await;

        // Assert
        assert_eq!(poster, PLACEHOLDER_POSTER);
    }

    #[tokio::test]
    async fn test_resolve_sentinel_skips_probe() {
        // Arrange
        let probe = FixedProbe::new(true);

        // Act
        let poster = resolve_poster(&probe, "N/A").await;

        // Assert
        assert_eq!(poster, PLACEHOLDER_POSTER);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }
}
