use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerMode {
    #[default]
    Always,
    QuestionMark,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub fn resolve(self, system: ColorScheme) -> ColorScheme {
        match self {
            Theme::Auto => system,
            Theme::Light => ColorScheme::Light,
            Theme::Dark => ColorScheme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn css_class(self) -> &'static str {
        match self {
            ColorScheme::Light => "gpt-light",
            ColorScheme::Dark => "gpt-dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Auto,
    English,
    Chinese,
    Japanese,
    Korean,
    Spanish,
    French,
    German,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptSource {
    #[default]
    Default,
}

impl PromptSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptSource::Default => "default",
        }
    }
}

/// Ordered CSS selector candidates; the first one that matches wins.
///
/// Older stored configs hold a single selector string instead of a list, so
/// both shapes are accepted on read. Writes always produce a list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SelectorList(Vec<String>);

impl SelectorList {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            selectors
                .into_iter()
                .map(Into::into)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn single(selector: impl Into<String>) -> Self {
        Self::new([selector])
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), crate::config::ConfigError> {
        for selector in &self.0 {
            scraper::Selector::parse(selector).map_err(|e| {
                crate::config::ConfigError::InvalidSelector {
                    selector: selector.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSelectors {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for SelectorList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StoredSelectors::deserialize(deserializer)? {
            StoredSelectors::One(s) => Self::single(s),
            StoredSelectors::Many(v) => Self::new(v),
        })
    }
}

impl<S: Into<String>> FromIterator<S> for SelectorList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_list_accepts_legacy_single_string() {
        let list: SelectorList = serde_json::from_str(r#""blockquote.abstract""#).unwrap();
        assert_eq!(list.as_slice(), ["blockquote.abstract"]);

        let blank: SelectorList = serde_json::from_str(r#""   ""#).unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn selector_list_serializes_as_array() {
        let list = SelectorList::new([".a", " .b ", ""]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"[".a",".b"]"#);
    }

    #[test]
    fn validate_rejects_malformed_selector() {
        assert!(SelectorList::new([".ok", "div > p"]).validate().is_ok());
        assert!(SelectorList::single("div[").validate().is_err());
    }

    #[test]
    fn auto_theme_follows_system_scheme() {
        assert_eq!(Theme::Auto.resolve(ColorScheme::Dark), ColorScheme::Dark);
        assert_eq!(Theme::Light.resolve(ColorScheme::Dark), ColorScheme::Light);
        assert_eq!(Theme::Dark.resolve(ColorScheme::Light).css_class(), "gpt-dark");
    }
}
