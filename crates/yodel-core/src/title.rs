//! Artist/title guessing from scraped page titles
//!
//! The heuristic is a fixed sequence of pure steps, each usable on its own:
//!
//! 1. [`normalize_encoding`] drops non-ASCII characters and unifies line endings
//! 2. [`strip_decoration`] removes bracketed prefixes/suffixes and dangling hyphens
//! 3. [`remove_noise`] removes "MV" and "music video" tokens
//! 4. [`split_artist_title`] splits on the first `-` or `_`
//!
//! [`guess_title`] runs all four and never fails.

use regex::Regex;
use std::sync::LazyLock;

static LEADING: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^\[[^\]]*\]").expect("valid regex"),
        Regex::new(r"^\([^)]*\)").expect("valid regex"),
        Regex::new(r"^\{[^}]*\}").expect("valid regex"),
    ]
});

// Leftmost opener wins, so nested groups go as a whole.
static TRAILING: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\[.*?\]$").expect("valid regex"),
        Regex::new(r"\(.*?\)$").expect("valid regex"),
        Regex::new(r"\{.*?\}$").expect("valid regex"),
    ]
});

static DANGLING_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*$").expect("valid regex"));

static MV_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\b|_|-)m/?v(\b|_|-)").expect("valid regex"));

static MUSIC_VIDEO_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b|_)music\s+video(\s*hd)?(\b|_|-)").expect("valid regex")
});

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(.*?)(-|_)(.*?)$").expect("valid regex"));

/// Default artist/title derived from a page title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleGuess {
    /// The page title exactly as scraped
    pub raw: String,
    pub artist: String,
    /// `None` when no separator was found
    pub title: Option<String>,
}

/// Run the full heuristic over a scraped page title.
pub fn guess_title(raw: &str) -> TitleGuess {
    let cleaned = remove_noise(&strip_decoration(&normalize_encoding(raw)));
    let (artist, title) = split_artist_title(&cleaned);

    TitleGuess {
        raw: raw.to_string(),
        artist,
        title,
    }
}

/// Drop everything outside 7-bit ASCII and convert `\r\n` / `\r` to `\n`.
pub fn normalize_encoding(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Strip one leading and one trailing `[..]`, `(..)` and `{..}` segment and
/// a dangling trailing hyphen, repeating until nothing changes.
pub fn strip_decoration(input: &str) -> String {
    let mut current = strip_pass(input);
    loop {
        let next = strip_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_pass(input: &str) -> String {
    let mut s = input.trim().to_string();

    for re in LEADING.iter().chain(TRAILING.iter()) {
        s = re.replace(&s, "").into_owned();
    }
    s = DANGLING_HYPHEN.replace(&s, "").into_owned();

    s.trim().to_string()
}

/// Remove standalone "MV"/"M/V" and "music video [HD]" tokens, ignoring case.
pub fn remove_noise(input: &str) -> String {
    let without_mv = MV_TOKEN.replace_all(input, "");
    MUSIC_VIDEO_TOKEN
        .replace_all(&without_mv, "")
        .trim()
        .to_string()
}

/// Split on the first `-` or `_`. Without a separator the whole string is
/// the artist and there is no title.
pub fn split_artist_title(input: &str) -> (String, Option<String>) {
    match SEPARATOR.captures(input) {
        Some(caps) => {
            let artist = strip_decoration(&caps[1]);
            let title = strip_decoration(&caps[3]);
            (artist, Some(title))
        }
        None => (input.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorated_music_video() {
        let guess = guess_title("[HD] Artist Name - Cool Song (Official Music Video)");
        assert_eq!(guess.artist, "Artist Name");
        assert_eq!(guess.title.as_deref(), Some("Cool Song"));
        assert_eq!(guess.raw, "[HD] Artist Name - Cool Song (Official Music Video)");
    }

    #[test]
    fn test_single_title_has_no_split() {
        let guess = guess_title("Just One Title");
        assert_eq!(guess.artist, "Just One Title");
        assert_eq!(guess.title, None);
    }

    #[test]
    fn test_simple_split() {
        assert_eq!(
            split_artist_title("Daft Punk - One More Time"),
            ("Daft Punk".to_string(), Some("One More Time".to_string()))
        );
        assert_eq!(
            split_artist_title("(Live) Band - Tune [2019]"),
            ("Band".to_string(), Some("Tune".to_string()))
        );
    }

    #[test]
    fn test_splits_on_first_separator_of_either_kind() {
        assert_eq!(
            split_artist_title("Some_Artist - Song"),
            ("Some".to_string(), Some("Artist - Song".to_string()))
        );
        assert_eq!(
            split_artist_title("Jay-Z - Song"),
            ("Jay".to_string(), Some("Z - Song".to_string()))
        );
    }

    #[test]
    fn test_strip_decoration() {
        assert_eq!(strip_decoration("  [HD] Song  "), "Song");
        assert_eq!(strip_decoration("{tag} Song (remix)"), "Song");
        assert_eq!(strip_decoration("Song -"), "Song");
        assert_eq!(strip_decoration("Song [a] more [b]"), "Song");
        assert_eq!(strip_decoration("(a) (b) Song"), "Song");
        assert_eq!(strip_decoration("Artist - Song (Official Video) [HD]"), "Artist - Song");
        assert_eq!(strip_decoration("No decoration"), "No decoration");
    }

    #[test]
    fn test_nested_trailing_group_removed_whole() {
        assert_eq!(strip_decoration("Song (feat. X (remix))"), "Song");
        assert_eq!(strip_decoration("Song [live [2019]]"), "Song");

        let guess = guess_title("Artist - Song (feat. X (remix))");
        assert_eq!(guess.artist, "Artist");
        assert_eq!(guess.title.as_deref(), Some("Song"));
    }

    #[test]
    fn test_split_stays_on_one_line() {
        assert_eq!(
            split_artist_title("Artist\nName - Song"),
            ("Name".to_string(), Some("Song".to_string()))
        );
    }

    #[test]
    fn test_strip_decoration_is_idempotent() {
        let samples = [
            "[HD] Artist Name - Cool Song (Official Music Video)",
            "(a) (b) {c} Song [d] (e) -",
            "  ((nested)) text ",
            "[unclosed title",
            "",
        ];
        for sample in samples {
            let once = strip_decoration(sample);
            assert_eq!(strip_decoration(&once), once, "input: {:?}", sample);
        }
    }

    #[test]
    fn test_noise_tokens_case_insensitive() {
        let expected = remove_noise("Song MV");
        assert_eq!(expected, "Song");
        assert_eq!(remove_noise("Song mv"), expected);
        assert_eq!(remove_noise("Song M/V"), expected);
        assert_eq!(remove_noise("Song m/v"), expected);
    }

    #[test]
    fn test_noise_requires_token_boundary() {
        assert_eq!(remove_noise("Movie"), "Movie");
        assert_eq!(remove_noise("Groove MVP"), "Groove MVP");
        assert_eq!(remove_noise("Song_MV"), "Song");
    }

    #[test]
    fn test_music_video_tokens() {
        assert_eq!(remove_noise("Song Music Video"), "Song");
        assert_eq!(remove_noise("Song music  video HD"), "Song");
        assert_eq!(remove_noise("Song MUSIC VIDEOHD"), "Song");
        assert_eq!(remove_noise("Musical videos"), "Musical videos");
    }

    #[test]
    fn test_normalize_encoding() {
        assert_eq!(normalize_encoding("Beyoncé"), "Beyonc");
        assert_eq!(normalize_encoding("日本 Song"), " Song");
        assert_eq!(normalize_encoding("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_non_ascii_artist() {
        let guess = guess_title("Sigur Rós - Hoppípolla");
        assert_eq!(guess.artist, "Sigur Rs");
        assert_eq!(guess.title.as_deref(), Some("Hopppolla"));
        assert_eq!(guess.raw, "Sigur Rós - Hoppípolla");
    }

    #[test]
    fn test_mv_suffix_before_split() {
        let guess = guess_title("IU - Blueming MV");
        assert_eq!(guess.artist, "IU");
        assert_eq!(guess.title.as_deref(), Some("Blueming"));
    }

    #[test]
    fn test_degenerate_input() {
        let guess = guess_title("");
        assert_eq!(guess.artist, "");
        assert_eq!(guess.title, None);

        let guess = guess_title("[HD]");
        assert_eq!(guess.artist, "");
        assert_eq!(guess.title, None);
    }
}
