use crate::error::{AppError, Result};
use serde::Deserialize;
use serde_json::{Number, Value};

/// One ranked trending topic, built fresh from each API response.
#[derive(Debug, Clone, PartialEq)]
pub struct HotSearchEntry {
    rank: usize,
    title: Option<String>,
    hot_value: Option<Number>,
    word_cover: Option<String>,
    sentence_id: Option<String>,
    event_time: String,
}

impl HotSearchEntry {
    pub fn new(rank: usize, event_time: String) -> Self {
        Self {
            rank,
            title: None,
            hot_value: None,
            word_cover: None,
            sentence_id: None,
            event_time,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_hot_value(mut self, hot_value: Option<Number>) -> Self {
        self.hot_value = hot_value;
        self
    }

    pub fn with_word_cover(mut self, word_cover: Option<String>) -> Self {
        self.word_cover = word_cover;
        self
    }

    pub fn with_sentence_id(mut self, sentence_id: Option<String>) -> Self {
        self.sentence_id = sentence_id;
        self
    }

    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Fails with `MissingField("word")` when upstream sent no title.
    pub fn title(&self) -> Result<&str> {
        self.title.as_deref().ok_or(AppError::MissingField("word"))
    }

    pub fn hot_value(&self) -> Option<&Number> {
        self.hot_value.as_ref()
    }

    /// Score as sent upstream, or `N/A`.
    pub fn display_hot_value(&self) -> String {
        self.hot_value
            .as_ref()
            .map_or_else(|| "N/A".to_string(), Number::to_string)
    }

    pub fn word_cover(&self) -> Option<&str> {
        self.word_cover.as_deref()
    }

    /// Fails with `MissingField("sentence_id")` when upstream sent no id.
    pub fn sentence_id(&self) -> Result<&str> {
        self.sentence_id
            .as_deref()
            .ok_or(AppError::MissingField("sentence_id"))
    }

    pub fn event_time(&self) -> &str {
        &self.event_time
    }
}

#[derive(Debug, Deserialize)]
pub struct HotSearchResponse {
    #[serde(default)]
    pub data: Option<HotSearchData>,
}

#[derive(Debug, Deserialize)]
pub struct HotSearchData {
    #[serde(default)]
    pub word_list: Option<Vec<HotSearchWord>>,
}

impl HotSearchResponse {
    /// Resolves `data.word_list`, surfacing the first missing segment.
    pub fn into_word_list(self) -> Result<Vec<HotSearchWord>> {
        self.data
            .ok_or(AppError::MissingField("data"))?
            .word_list
            .ok_or(AppError::MissingField("data.word_list"))
    }
}

/// Raw list item. Fields stay untyped so one odd value only blanks that field.
#[derive(Debug, Deserialize)]
pub struct HotSearchWord {
    #[serde(default)]
    pub word: Option<Value>,
    #[serde(default)]
    pub hot_value: Option<Value>,
    #[serde(default)]
    pub word_cover: Option<Value>,
    #[serde(default)]
    pub sentence_id: Option<Value>,
    #[serde(default)]
    pub event_time: Option<Value>,
}

impl HotSearchWord {
    pub fn title(&self) -> Option<String> {
        self.word.as_ref().and_then(as_text)
    }

    pub fn hot_value(&self) -> Option<Number> {
        match self.hot_value.as_ref()? {
            Value::Number(n) => Some(n.clone()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// First string in `word_cover.url_list`, if any.
    pub fn cover_url(&self) -> Option<String> {
        self.word_cover
            .as_ref()?
            .get("url_list")?
            .as_array()?
            .iter()
            .find_map(Value::as_str)
            .map(str::to_string)
    }

    /// The id arrives as a string or a bare number depending on the API build.
    pub fn sentence_id(&self) -> Option<String> {
        self.sentence_id.as_ref().and_then(as_text)
    }

    /// Epoch seconds; the whole entry is unusable without them.
    pub fn event_secs(&self) -> Result<i64> {
        let raw = match self.event_time.as_ref() {
            None | Some(Value::Null) => return Err(AppError::MissingField("event_time")),
            Some(raw) => raw,
        };

        let secs = match raw {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        secs.ok_or_else(|| {
            AppError::parse_error("Douyin hot search", format!("invalid event_time {}", raw))
        })
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
