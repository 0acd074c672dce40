use std::sync::LazyLock;

use regex::Regex;

/// Matches Yandex Music links across the regional domains, with or without
/// the `music.` subdomain. The match ends at the first whitespace character.
static MUSIC_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:music\.)?yandex\.(?:com\.tr|ru|com|by|kz|uz)/\S+")
        .expect("music link pattern is valid")
});

/// Returns the first music service link found in `text`, if any.
pub fn find_music_link(text: Option<&str>) -> Option<&str> {
    MUSIC_LINK.find(text?).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_link_from_sentence() {
        assert_eq!(
            find_music_link(Some("check this https://music.yandex.ru/album/123 out")),
            Some("https://music.yandex.ru/album/123")
        );
    }

    #[test]
    fn test_stops_at_first_whitespace() {
        let found = find_music_link(Some("https://music.yandex.ru/album/1/track/2\tnext")).unwrap();
        assert_eq!(found, "https://music.yandex.ru/album/1/track/2");
        assert!(!found.contains(char::is_whitespace));
    }

    #[test]
    fn test_regional_domains_and_case() {
        for text in [
            "http://music.yandex.com/artist/7",
            "HTTPS://MUSIC.YANDEX.KZ/album/5",
            "https://yandex.by/album/5",
            "https://music.yandex.uz/track/9",
            "https://music.yandex.com.tr/album/3",
        ] {
            assert_eq!(find_music_link(Some(text)), Some(text), "{text}");
        }
    }

    #[test]
    fn test_first_of_several_links() {
        let text = "https://music.yandex.ru/album/1 and https://music.yandex.ru/album/2";
        assert_eq!(
            find_music_link(Some(text)),
            Some("https://music.yandex.ru/album/1")
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find_music_link(None), None);
        assert_eq!(find_music_link(Some("")), None);
        assert_eq!(find_music_link(Some("music.yandex.ru/album/1")), None);
        assert_eq!(find_music_link(Some("https://open.spotify.com/track/1")), None);
        assert_eq!(find_music_link(Some("https://music.yandex.ru/")), None);
    }
}
