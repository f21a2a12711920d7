//! External song link classification.
//!
//! Entries may reference a YouTube video or a Spotify track/playlist; the
//! read view embeds a player for the recognized shapes.

use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("valid youtube regex")
});

/// Parsed song reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongLink {
    YouTube { url: String, video_id: String },
    Spotify { url: String },
    /// Unrecognized link; shown as a plain hyperlink only.
    Other { url: String },
}

impl SongLink {
    /// Classifies a raw song URL. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = raw.trim();
        if url.is_empty() {
            return None;
        }

        if let Some(video_id) = YOUTUBE_ID_RE
            .captures(url)
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        {
            return Some(Self::YouTube {
                url: url.to_string(),
                video_id,
            });
        }

        if url.contains("spotify.com") {
            return Some(Self::Spotify {
                url: url.to_string(),
            });
        }

        Some(Self::Other {
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::YouTube { url, .. } | Self::Spotify { url } | Self::Other { url } => url,
        }
    }

    /// Embeddable player URL, when the provider supports one.
    pub fn embed_url(&self) -> Option<String> {
        match self {
            Self::YouTube { video_id, .. } => Some(format!(
                "https://www.youtube.com/embed/{video_id}?autoplay=1&playsinline=1&mute=0"
            )),
            Self::Spotify { url } => {
                if url.contains("/embed") {
                    Some(url.clone())
                } else {
                    Some(url.replacen("spotify.com", "spotify.com/embed", 1))
                }
            }
            Self::Other { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SongLink;

    #[test]
    fn recognizes_youtube_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        ] {
            match SongLink::parse(url) {
                Some(SongLink::YouTube { video_id, .. }) => assert_eq!(video_id, "dQw4w9WgXcQ"),
                other => panic!("expected youtube link for {url}, got {other:?}"),
            }
        }
    }

    #[test]
    fn spotify_embed_inserts_segment_once() {
        let link = SongLink::parse("https://open.spotify.com/track/abc").unwrap();
        assert_eq!(
            link.embed_url().as_deref(),
            Some("https://open.spotify.com/embed/track/abc")
        );

        let embedded = SongLink::parse("https://open.spotify.com/embed/track/abc").unwrap();
        assert_eq!(
            embedded.embed_url().as_deref(),
            Some("https://open.spotify.com/embed/track/abc")
        );
    }

    #[test]
    fn blank_and_unknown_links() {
        assert_eq!(SongLink::parse("   "), None);
        let other = SongLink::parse("https://example.com/song").unwrap();
        assert_eq!(other.embed_url(), None);
        assert_eq!(other.url(), "https://example.com/song");
    }
}
