use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 标签词表项
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    /// 第一次出现时的原始大小写
    pub display_name: String,
    /// 包含该标签的文章数量
    pub usage_count: usize,
}

/// 筛选动作 - 视图层把用户输入翻译成这些动作
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterAction {
    SetSearchQuery(String),
    ToggleTag(String),
    ClearFilters,
}

/// 筛选状态 - 由视图层持有，挂载时创建、卸载时丢弃
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// 搜索关键词，原样保存
    pub search_query: String,
    /// 已选标签，保留显示大小写
    pub selected_tags: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换搜索关键词（不做裁剪或归一化）
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// 按精确字符串切换标签的选中状态
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    /// 同时清空关键词和已选标签
    pub fn clear_filters(&mut self) {
        *self = Self::default();
    }

    /// 是否有任何筛选条件生效
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty() || !self.selected_tags.is_empty()
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected_tags.contains(tag)
    }

    /// 纯函数形式：消费旧状态，返回新状态
    pub fn apply(mut self, action: FilterAction) -> Self {
        match action {
            FilterAction::SetSearchQuery(query) => self.set_search_query(query),
            FilterAction::ToggleTag(tag) => self.toggle_tag(&tag),
            FilterAction::ClearFilters => self.clear_filters(),
        }
        self
    }
}
