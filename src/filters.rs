use crate::graph::RankedFeed;

/// How many extra ranked feeds to fetch per wanted result when common
/// domains are filtered out afterwards.
pub const FILTER_OVERFETCH: usize = 5;

/// Rows to fetch so that `limit` remain after filtering. Saturates instead of
/// overflowing on absurd limits.
pub fn overfetch_limit(limit: usize) -> usize {
    limit.saturating_mul(FILTER_OVERFETCH)
}

pub fn is_common_domain(url: &str, domains: &[String]) -> bool {
    domains.iter().any(|domain| url.contains(domain.as_str()))
}

/// Drops feeds on common domains, keeping rank order, then truncates.
pub fn without_common_domains(
    ranked: Vec<RankedFeed>,
    domains: &[String],
    limit: usize,
) -> Vec<RankedFeed> {
    ranked
        .into_iter()
        .filter(|r| !is_common_domain(&r.feed.url, domains))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FeedNode;

    fn ranked(id: i32, url: &str, inbound_count: i64) -> RankedFeed {
        RankedFeed {
            feed: FeedNode {
                id,
                url: url.to_string(),
                title: String::new(),
                created_at: 0,
            },
            inbound_count,
        }
    }

    #[test]
    fn filters_common_domains_and_truncates() {
        let domains = vec!["github.com".to_string(), "x.com".to_string()];
        assert!(is_common_domain("https://github.com/", &domains));
        assert!(!is_common_domain("https://hamel.dev/", &domains));

        let kept = without_common_domains(
            vec![
                ranked(1, "https://github.com/", 9),
                ranked(2, "https://simonwillison.net/", 7),
                ranked(3, "https://x.com/", 5),
                ranked(4, "https://hamel.dev/", 3),
                ranked(5, "https://jvns.ca/", 1),
            ],
            &domains,
            2,
        );
        let ids: Vec<i32> = kept.iter().map(|r| r.feed.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn overfetch_saturates_on_huge_limits() {
        assert_eq!(overfetch_limit(20), 100);
        assert_eq!(overfetch_limit(usize::MAX), usize::MAX);
        assert_eq!(overfetch_limit(usize::MAX / 2), usize::MAX);
    }
}
