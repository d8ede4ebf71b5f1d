//! 带缓存的博客搜索视图
//!
//! 持有文章集合与筛选状态，缓存标签词表和筛选结果。
//! 词表只在文章集合（按引用）变化时重算；筛选结果在文章集合、
//! 关键词或已选标签变化时重算。输入不变时返回同一个 `Arc`。

use std::sync::Arc;
use utils_common::Post;
use crate::builder::build_tag_vocabulary;
use crate::filter::filter_posts;
use crate::models::{FilterAction, FilterState, TagEntry};

/// 上一次计算的输入与结果
struct Memo<K, V> {
    key: K,
    value: V,
}

/// 文章集合的引用标识，只比较指针
#[derive(Clone)]
struct PostsRef(Arc<[Post]>);

impl PartialEq for PostsRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// 博客搜索视图
pub struct BlogSearch {
    posts: Arc<[Post]>,
    state: FilterState,
    entries: Option<Memo<PostsRef, Arc<[TagEntry]>>>,
    names: Option<Memo<PostsRef, Arc<[String]>>>,
    filtered: Option<Memo<(PostsRef, FilterState), Arc<[Post]>>>,
}

impl BlogSearch {
    pub fn new(posts: impl Into<Arc<[Post]>>) -> Self {
        Self {
            posts: posts.into(),
            state: FilterState::default(),
            entries: None,
            names: None,
            filtered: None,
        }
    }

    pub fn posts(&self) -> &Arc<[Post]> {
        &self.posts
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// 替换文章集合，筛选状态保留
    pub fn set_posts(&mut self, posts: impl Into<Arc<[Post]>>) {
        self.posts = posts.into();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.set_search_query(query);
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.state.toggle_tag(tag);
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
    }

    pub fn dispatch(&mut self, action: FilterAction) {
        self.state = std::mem::take(&mut self.state).apply(action);
    }

    /// 带计数的标签词表
    pub fn tag_entries(&mut self) -> Arc<[TagEntry]> {
        let key = PostsRef(self.posts.clone());
        if let Some(memo) = &self.entries {
            if memo.key == key {
                return memo.value.clone();
            }
        }

        let value: Arc<[TagEntry]> = build_tag_vocabulary(&self.posts).into();
        self.entries = Some(Memo { key, value: value.clone() });
        value
    }

    /// 标签显示名称列表
    pub fn tags(&mut self) -> Arc<[String]> {
        let key = PostsRef(self.posts.clone());
        if let Some(memo) = &self.names {
            if memo.key == key {
                return memo.value.clone();
            }
        }

        let value: Arc<[String]> = self
            .tag_entries()
            .iter()
            .map(|entry| entry.display_name.clone())
            .collect();
        self.names = Some(Memo { key, value: value.clone() });
        value
    }

    /// 当前筛选结果
    pub fn filtered(&mut self) -> Arc<[Post]> {
        let key = (PostsRef(self.posts.clone()), self.state.clone());
        if let Some(memo) = &self.filtered {
            if memo.key == key {
                return memo.value.clone();
            }
        }

        let value: Arc<[Post]> = filter_posts(
            &self.posts,
            &self.state.search_query,
            &self.state.selected_tags,
        )
        .into_iter()
        .cloned()
        .collect();

        tracing::debug!(
            total = self.posts.len(),
            matched = value.len(),
            "筛选结果已重新计算"
        );

        self.filtered = Some(Memo { key, value: value.clone() });
        value
    }
}
