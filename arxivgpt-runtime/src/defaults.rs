use arxivgpt_core::config::{SiteConfigs, SiteEntry, UserConfig};
use arxivgpt_core::types::{Language, SelectorList, Theme, TriggerMode};

pub const ARXIV_HOST: &str = "arxiv.org";

const ARXIV_PROMPT: &str = "Please summarize the paper in one concise sentence. \
Then list the key insights and lessons learned from it. \
Next, write 3-5 questions you would ask the authors about their work. \
Finally, suggest 3-5 related topics or future research directions. \
If the last sentence of the text is incomplete, ignore it. Here is the paper: ";

pub fn default_supported_hosts() -> Vec<String> {
    vec![ARXIV_HOST.into()]
}

pub fn default_site_configs() -> SiteConfigs {
    SiteConfigs::from([(
        ARXIV_HOST.to_string(),
        SiteEntry {
            prompt: ARXIV_PROMPT.into(),
            body_tag: SelectorList::single("blockquote.abstract"),
            display_tag: SelectorList::single("div.extra-services"),
            append_container: SelectorList::new(["#abs-outer", "#content"]),
        },
    )])
}

pub fn default_user_config() -> UserConfig {
    UserConfig {
        supported_hosts: default_supported_hosts(),
        site_configs: default_site_configs(),
        trigger_mode: TriggerMode::Always,
        theme: Theme::Auto,
        language: Language::Auto,
    }
}
