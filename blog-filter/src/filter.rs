use std::collections::{BTreeSet, HashSet};
use utils_common::{normalize_tag, Post};

/// 文本匹配：标题、摘要或任意标签包含关键词（已小写）
fn matches_query(post: &Post, query_lower: &str) -> bool {
    post.title.to_lowercase().contains(query_lower)
        || post.excerpt.to_lowercase().contains(query_lower)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(query_lower))
}

/// 标签匹配：至少有一个标签在已选集合中（OR 语义）
fn matches_any_tag(post: &Post, selected_keys: &HashSet<String>) -> bool {
    post.tags
        .iter()
        .any(|tag| selected_keys.contains(&normalize_tag(tag)))
}

/// 按关键词和已选标签筛选文章，保持原有顺序
///
/// 关键词为空时不做文本筛选，已选标签为空时不做标签筛选，
/// 两者同时生效时文章必须同时满足。
pub fn filter_posts<'a>(
    posts: &'a [Post],
    search_query: &str,
    selected_tags: &BTreeSet<String>,
) -> Vec<&'a Post> {
    let query_lower = search_query.to_lowercase();
    let selected_keys: HashSet<String> =
        selected_tags.iter().map(|t| normalize_tag(t)).collect();

    posts
        .iter()
        .filter(|post| query_lower.is_empty() || matches_query(post, &query_lower))
        .filter(|post| selected_keys.is_empty() || matches_any_tag(post, &selected_keys))
        .collect()
}

/// 同 [`filter_posts`]，返回克隆后的文章
pub fn filter_posts_owned(
    posts: &[Post],
    search_query: &str,
    selected_tags: &BTreeSet<String>,
) -> Vec<Post> {
    filter_posts(posts, search_query, selected_tags)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    fn sample() -> Vec<Post> {
        vec![
            Post::new("1", "Intro to React", "basics", &["React", "Guide"]),
            Post::new("2", "Advanced CSS", "flex/grid", &["CSS"]),
            Post::new("3", "react hooks deep dive", "hooks", &["React", "Advanced"]),
            Post::new("4", "Shipping pipelines", "ci", &["DevOps"]),
        ]
    }

    #[test]
    fn no_filters_pass_everything_in_order() {
        let posts = sample();
        let result = filter_posts(&posts, "", &BTreeSet::new());
        assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn query_matches_title_excerpt_or_tag() {
        let posts = sample();
        assert_eq!(ids(&filter_posts(&posts, "REACT", &BTreeSet::new())), vec!["1", "3"]);
        assert_eq!(ids(&filter_posts(&posts, "grid", &BTreeSet::new())), vec!["2"]);
        assert_eq!(ids(&filter_posts(&posts, "devo", &BTreeSet::new())), vec!["4"]);
    }

    #[test]
    fn query_is_not_trimmed() {
        let posts = sample();
        assert!(filter_posts(&posts, " react ", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn selected_tags_use_or_semantics() {
        let posts = sample();
        let result = filter_posts(&posts, "", &tags(&["Tutorial", "Guide", "css"]));
        assert_eq!(ids(&result), vec!["1", "2"]);
    }

    #[test]
    fn query_and_tags_compose_with_and() {
        let posts = sample();
        let result = filter_posts(&posts, "react", &tags(&["Guide"]));
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn posts_without_tags_fail_tag_filter() {
        let posts = vec![Post::new("1", "Untagged", "", &[])];
        assert!(filter_posts(&posts, "", &tags(&["Guide"])).is_empty());
        assert_eq!(filter_posts(&posts, "untag", &BTreeSet::new()).len(), 1);
    }

    #[test]
    fn owned_variant_clones_matches() {
        let posts = sample();
        let owned = filter_posts_owned(&posts, "hooks", &BTreeSet::new());
        assert_eq!(owned, vec![posts[2].clone()]);
    }
}
