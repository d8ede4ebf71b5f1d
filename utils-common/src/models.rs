use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 博客文章 - 筛选逻辑只读取 id、title、excerpt、tags
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// 文章唯一标识符
    pub id: String,
    /// 文章标题
    pub title: String,
    /// 文章摘要
    pub excerpt: String,
    /// 文章标签列表（保留原始大小写）
    pub tags: Vec<String>,
    /// 文章URL路径片段
    pub slug: String,
    /// 发布日期
    pub published_at: Option<DateTime<Utc>>,
    /// 作者
    pub author: Option<String>,
}

impl Post {
    /// 只包含筛选相关字段的文章
    pub fn new(id: &str, title: &str, excerpt: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// 作品集项目 - 用于技术栈单选筛选
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 使用的技术（保留原始大小写）
    pub technologies: Vec<String>,
}

impl Project {
    pub fn new(id: &str, title: &str, technologies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// 内容快照 - 索引器写出、WASM 模块读取的数据单元
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostSnapshot {
    /// 快照生成时间
    pub generated_at: DateTime<Utc>,
    /// 所有文章，保持 CMS 返回的顺序
    pub posts: Vec<Post>,
    /// 所有项目
    pub projects: Vec<Project>,
}

impl PostSnapshot {
    pub fn new(posts: Vec<Post>, projects: Vec<Project>) -> Self {
        Self {
            generated_at: Utc::now(),
            posts,
            projects,
        }
    }
}
