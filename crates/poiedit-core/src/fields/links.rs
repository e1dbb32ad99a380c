//! Labelled links.
//!
//! A message is either `url`, `label url`, or a bare `label` which removes
//! that link.

use crate::config::LinkConfig;
use crate::poi::Link;

const INSTAGRAM: &str = "instagram";
const VK: &str = "vk";

/// Applies one link message to the current list.
///
/// Returns `None` when the message is empty and nothing changes.
pub fn apply_link(current: &[Link], input: &str, config: &LinkConfig) -> Option<Vec<Link>> {
    let value = input.trim().replace(". ", ".");
    let mut parts = value.splitn(2, char::is_whitespace);
    let first = parts.next().filter(|p| !p.is_empty())?;
    let rest = parts.next().map(str::trim).filter(|p| !p.is_empty());

    let (label, url) = match rest {
        Some(url) => (first.to_lowercase(), Some(url.to_string())),
        None if first.contains('.') => (config.default_label.clone(), Some(first.to_string())),
        None => (first.to_lowercase(), None),
    };
    let label = config.aliases.get(&label).cloned().unwrap_or(label);

    let mut links: Vec<Link> = current.iter().filter(|l| l.label != label).cloned().collect();
    if let Some(url) = url {
        let url = expand_url(&label, &url);
        let link = Link::new(label, url);
        match current.iter().position(|l| l.label == link.label) {
            Some(i) => links.insert(i.min(links.len()), link),
            None => links.push(link),
        }
    }
    Some(links)
}

fn expand_url(label: &str, url: &str) -> String {
    let url = match label {
        INSTAGRAM if !url.contains("instagram.") => {
            format!("https://instagram.com/{}", url.trim_start_matches('@'))
        }
        VK if !url.contains("vk.") => format!("https://vk.com/{}", url),
        _ => url.to_string(),
    };
    if url.contains("://") {
        url
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(current: &[Link], input: &str) -> Vec<Link> {
        apply_link(current, input, &LinkConfig::default()).unwrap()
    }

    #[test]
    fn test_bare_url_gets_default_label() {
        assert_eq!(
            apply(&[], "example.com"),
            vec![Link::new("website", "https://example.com")]
        );
    }

    #[test]
    fn test_spaced_dots_are_joined() {
        assert_eq!(
            apply(&[], "site example. com/Menu"),
            vec![Link::new("website", "https://example.com/Menu")]
        );
    }

    #[test]
    fn test_instagram_handle() {
        assert_eq!(
            apply(&[], "insta @coffee_place"),
            vec![Link::new("instagram", "https://instagram.com/coffee_place")]
        );
        assert_eq!(
            apply(&[], "instagram https://www.instagram.com/x"),
            vec![Link::new("instagram", "https://www.instagram.com/x")]
        );
    }

    #[test]
    fn test_vk_handle() {
        assert_eq!(
            apply(&[], "ВК coffee"),
            vec![Link::new("vk", "https://vk.com/coffee")]
        );
    }

    #[test]
    fn test_label_replaces_in_place() {
        let current = vec![
            Link::new("website", "https://a.com"),
            Link::new("vk", "https://vk.com/a"),
        ];
        assert_eq!(
            apply(&current, "site b.com"),
            vec![
                Link::new("website", "https://b.com"),
                Link::new("vk", "https://vk.com/a"),
            ]
        );
    }

    #[test]
    fn test_bare_label_removes() {
        let current = vec![Link::new("website", "https://a.com")];
        assert_eq!(apply(&current, "site"), vec![]);
        assert_eq!(apply(&current, "facebook"), current);
    }

    #[test]
    fn test_empty_is_noop() {
        assert_eq!(apply_link(&[], "  ", &LinkConfig::default()), None);
    }
}
