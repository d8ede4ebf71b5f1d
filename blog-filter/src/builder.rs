use std::collections::{HashMap, HashSet};
use utils_common::{normalize_tag, Post};
use crate::models::TagEntry;

/// 词表中间项
struct TagTally {
    display_name: String,
    usage_count: usize,
    /// 第一次出现的顺序，用于保持插入顺序
    first_seen: usize,
}

/// 标签词表构建器
#[derive(Default)]
pub struct TagVocabularyBuilder {
    tallies: HashMap<String, TagTally>,
    post_count: usize,
}

impl TagVocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一篇文章的标签，同一文章内重复的标签只计一次
    pub fn add_post(&mut self, post: &Post) {
        self.post_count += 1;
        let mut seen_in_post: HashSet<String> = HashSet::new();

        for tag in &post.tags {
            let key = normalize_tag(tag);
            if !seen_in_post.insert(key.clone()) {
                continue;
            }

            let first_seen = self.tallies.len();
            self.tallies
                .entry(key)
                .or_insert_with(|| TagTally {
                    display_name: tag.clone(),
                    usage_count: 0,
                    first_seen,
                })
                .usage_count += 1;
        }
    }

    pub fn add_posts<'a>(&mut self, posts: impl IntoIterator<Item = &'a Post>) {
        for post in posts {
            self.add_post(post);
        }
    }

    /// 构建词表：按使用次数降序，次数相同按名称（不区分大小写）升序
    pub fn build(self) -> Vec<TagEntry> {
        let mut tallies: Vec<TagTally> = self.tallies.into_values().collect();

        tallies.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| {
                    a.display_name
                        .to_lowercase()
                        .cmp(&b.display_name.to_lowercase())
                })
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });

        tracing::debug!(
            posts = self.post_count,
            tags = tallies.len(),
            "标签词表构建完成"
        );

        tallies
            .into_iter()
            .map(|t| TagEntry {
                display_name: t.display_name,
                usage_count: t.usage_count,
            })
            .collect()
    }
}

/// 从文章集合构建带计数的标签词表
pub fn build_tag_vocabulary(posts: &[Post]) -> Vec<TagEntry> {
    let mut builder = TagVocabularyBuilder::new();
    builder.add_posts(posts);
    builder.build()
}

/// 只返回标签显示名称，用于渲染筛选标签
pub fn tag_names(posts: &[Post]) -> Vec<String> {
    build_tag_vocabulary(posts)
        .into_iter()
        .map(|entry| entry.display_name)
        .collect()
}
