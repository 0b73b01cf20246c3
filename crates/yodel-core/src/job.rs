//! Audio job description and time offset parsing

use crate::error::JobError;
use reqwest::Url;
use tracing::warn;

/// One extraction request. Built through [`AudioJob::new`], which enforces
/// a non-empty artist/title and `end >= start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioJob {
    url: Url,
    start: u32,
    end: Option<u32>,
    artist: String,
    title: String,
}

impl AudioJob {
    pub fn new(
        url: &str,
        start: Option<u32>,
        end: Option<u32>,
        artist: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, JobError> {
        let url = Url::parse(url.trim()).map_err(|_| JobError::InvalidUrl(url.to_string()))?;
        let start = start.unwrap_or(0);

        if let Some(end) = end {
            if end < start {
                return Err(JobError::InvalidTimeRange { start, end });
            }
            // The inclusive duration adds one second past `end`.
            if end == u32::MAX {
                return Err(JobError::EndOutOfRange(end));
            }
        }

        let artist = artist.into().trim().to_string();
        let title = title.into().trim().to_string();
        if artist.is_empty() {
            return Err(JobError::EmptyField("artist"));
        }
        if title.is_empty() {
            return Err(JobError::EmptyField("title"));
        }

        Ok(Self {
            url,
            start,
            end,
            artist,
            title,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Source URL with the `hd=1` quality hint, when the URL carries a query.
    pub fn source_url(&self, hd_hint: bool) -> Url {
        if hd_hint {
            with_quality_hint(&self.url)
        } else {
            self.url.clone()
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> Option<u32> {
        self.end
    }

    /// Seconds to encode, inclusive of the end second. `None` means to the
    /// end of the input.
    pub fn duration(&self) -> Option<u32> {
        self.end.map(|end| end - self.start + 1)
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tags embedded into the MP3, in argument order.
    pub fn tags(&self) -> [(&'static str, &str); 2] {
        [("artist", self.artist.as_str()), ("title", self.title.as_str())]
    }
}

/// Force high-definition source selection on query-parameterized URLs.
pub fn with_quality_hint(url: &Url) -> Url {
    if url.query().is_none() {
        return url.clone();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "hd")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut hinted = url.clone();
    hinted
        .query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("hd", "1");
    hinted
}

/// Parse `mm:ss` or `:ss` into seconds. Blank input means no offset;
/// anything unparseable is treated the same way.
pub fn parse_offset(input: &str) -> Option<u32> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parsed = input.split_once(':').and_then(|(min, sec)| {
        let sec: u32 = sec.parse().ok()?;
        let min: u32 = if min.is_empty() { 0 } else { min.parse().ok()? };
        min.checked_mul(60)?.checked_add(sec)
    });

    if parsed.is_none() {
        warn!("Ignoring unrecognized time '{}' (expected mm:ss or :ss)", input);
    }
    parsed
}
