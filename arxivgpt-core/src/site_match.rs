#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostMatch {
    pub matched_host: Option<String>,
}

impl HostMatch {
    pub fn unsupported() -> Self {
        Self { matched_host: None }
    }

    pub fn found(&self) -> bool {
        self.matched_host.is_some()
    }

    pub fn host(&self) -> Option<&str> {
        self.matched_host.as_deref()
    }
}

/// Matching is exact string equality in list order; the first hit wins.
/// Subdomains and path-scoped variants are not expanded, so `www.arxiv.org`
/// only matches if it is listed itself.
pub fn match_host(supported_hosts: &[String], current_host: &str) -> HostMatch {
    let matched = supported_hosts.iter().find(|h| h.as_str() == current_host);

    match matched {
        Some(host) => HostMatch {
            matched_host: Some(host.clone()),
        },
        None => HostMatch::unsupported(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_host_matches() {
        let m = match_host(&hosts(&["openreview.net", "arxiv.org"]), "arxiv.org");
        assert!(m.found());
        assert_eq!(m.host(), Some("arxiv.org"));
    }

    #[test]
    fn subdomain_is_not_expanded() {
        let m = match_host(&hosts(&["arxiv.org"]), "export.arxiv.org");
        assert!(!m.found());
        assert_eq!(m, HostMatch::unsupported());
    }

    #[test]
    fn matching_is_case_sensitive_and_untrimmed() {
        let list = hosts(&["arxiv.org"]);
        assert!(!match_host(&list, "ARXIV.org").found());
        assert!(!match_host(&list, " arxiv.org").found());
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert!(!match_host(&[], "arxiv.org").found());
        assert!(!match_host(&hosts(&["arxiv.org"]), "").found());
    }

    #[test]
    fn first_listed_duplicate_wins() {
        let list = hosts(&["a.org", "arxiv.org", "arxiv.org"]);
        assert_eq!(match_host(&list, "arxiv.org").host(), Some("arxiv.org"));
    }
}
