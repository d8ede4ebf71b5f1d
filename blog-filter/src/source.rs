//! 内容来源
//!
//! 文章由外部（CMS 导出或索引器快照）提供。加载失败时记录日志并返回空集合，
//! 筛选逻辑只会看到“没有结果”，不会收到错误。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utils_common::compression::from_compressed;
use utils_common::{CommonError, Post, PostSnapshot, Project, Result};

/// 一次读取得到的全部内容
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Content {
    pub posts: Vec<Post>,
    pub projects: Vec<Project>,
}

/// 内容来源
///
/// 每次 `fetch_*` 都会完整解析一次输入；同时需要文章和项目时用
/// [`load_content_or_empty`] 只读一次。
pub trait ContentSource {
    fn fetch_content(&self) -> Result<Content>;

    fn fetch_posts(&self) -> Result<Vec<Post>> {
        Ok(self.fetch_content()?.posts)
    }

    fn fetch_projects(&self) -> Result<Vec<Project>> {
        Ok(self.fetch_content()?.projects)
    }
}

/// CMS 文档标识，优先使用 `id`，没有时再用 `_id`
#[derive(Deserialize, Debug, Default)]
pub struct CmsKey {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "_id")]
    pub document_id: Option<String>,
}

impl CmsKey {
    fn resolve(self, kind: &str, title: &str) -> Result<String> {
        self.id
            .or(self.document_id)
            .ok_or_else(|| CommonError::Content(format!("{}缺少 id: {}", kind, title)))
    }
}

/// CMS 导出中的文章，`tags` 可能缺失或为 null
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CmsPost {
    #[serde(flatten)]
    pub key: CmsKey,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<String>,
}

impl TryFrom<CmsPost> for Post {
    type Error = CommonError;

    fn try_from(raw: CmsPost) -> Result<Self> {
        Ok(Post {
            id: raw.key.resolve("文章", &raw.title)?,
            title: raw.title,
            excerpt: raw.excerpt.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            slug: raw.slug.unwrap_or_default(),
            published_at: raw.published_at,
            author: raw.author,
        })
    }
}

/// CMS 导出中的项目
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CmsProject {
    #[serde(flatten)]
    pub key: CmsKey,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "techStack")]
    pub technologies: Option<Vec<String>>,
}

impl TryFrom<CmsProject> for Project {
    type Error = CommonError;

    fn try_from(raw: CmsProject) -> Result<Self> {
        Ok(Project {
            id: raw.key.resolve("项目", &raw.title)?,
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            technologies: raw.technologies.unwrap_or_default(),
        })
    }
}

/// CMS 导出的两种形状：文章数组，或包含 posts/projects 的对象
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum CmsExport {
    Posts(Vec<CmsPost>),
    Bundle {
        #[serde(default)]
        posts: Vec<CmsPost>,
        #[serde(default)]
        projects: Vec<CmsProject>,
    },
}

impl CmsExport {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CommonError::Content(e.to_string()))
    }

    pub fn into_content(self) -> Result<Content> {
        let (posts, projects) = match self {
            CmsExport::Posts(posts) => (posts, Vec::new()),
            CmsExport::Bundle { posts, projects } => (posts, projects),
        };

        Ok(Content {
            posts: posts.into_iter().map(Post::try_from).collect::<Result<_>>()?,
            projects: projects
                .into_iter()
                .map(Project::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

/// JSON 格式的 CMS 导出
pub struct JsonSource<'a> {
    json: &'a str,
}

impl<'a> JsonSource<'a> {
    pub fn new(json: &'a str) -> Self {
        Self { json }
    }
}

impl ContentSource for JsonSource<'_> {
    fn fetch_content(&self) -> Result<Content> {
        CmsExport::parse(self.json)?.into_content()
    }
}

/// 索引器生成的压缩快照
pub struct SnapshotSource<'a> {
    data: &'a [u8],
}

impl<'a> SnapshotSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn snapshot(&self) -> Result<PostSnapshot> {
        from_compressed(self.data)
    }
}

impl ContentSource for SnapshotSource<'_> {
    fn fetch_content(&self) -> Result<Content> {
        let snapshot = self.snapshot()?;
        Ok(Content {
            posts: snapshot.posts,
            projects: snapshot.projects,
        })
    }
}

/// 吞掉加载错误：交给 `on_error` 处理后返回空值
pub fn or_empty<T: Default>(result: Result<T>, on_error: impl FnOnce(&CommonError)) -> T {
    result.unwrap_or_else(|e| {
        on_error(&e);
        T::default()
    })
}

fn warn_load_failure(e: &CommonError) {
    tracing::warn!(error = %e, "加载内容失败，使用空集合");
}

/// 读取一次来源，同时得到文章和项目；失败时记录警告并返回空内容
pub fn load_content_or_empty(source: &dyn ContentSource) -> Content {
    or_empty(source.fetch_content(), warn_load_failure)
}

/// 加载文章，失败时记录警告并返回空集合
pub fn load_posts_or_empty(source: &dyn ContentSource) -> Vec<Post> {
    or_empty(source.fetch_posts(), warn_load_failure)
}

/// 加载项目，失败时记录警告并返回空集合
pub fn load_projects_or_empty(source: &dyn ContentSource) -> Vec<Project> {
    or_empty(source.fetch_projects(), warn_load_failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils_common::to_compressed;

    #[test]
    fn parses_bare_post_array_with_missing_tags() {
        let json = r#"[
            {"id": "1", "title": "Hello", "excerpt": "hi", "tags": ["Rust"]},
            {"_id": "2", "title": "No tags", "tags": null},
            {"id": "3", "title": "Absent"}
        ]"#;
        let posts = load_posts_or_empty(&JsonSource::new(json));
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].tags, vec!["Rust"]);
        assert_eq!(posts[1].id, "2");
        assert!(posts[1].tags.is_empty());
        assert!(posts[2].excerpt.is_empty());
    }

    #[test]
    fn parses_bundle_with_projects() {
        let json = r#"{
            "posts": [{"id": "1", "title": "A", "publishedAt": "2024-05-01T10:00:00Z"}],
            "projects": [{"id": "p", "title": "P", "techStack": ["Rust"]}]
        }"#;
        let source = JsonSource::new(json);
        let posts = load_posts_or_empty(&source);
        assert!(posts[0].published_at.is_some());
        let projects = load_projects_or_empty(&source);
        assert_eq!(projects[0].technologies, vec!["Rust"]);
    }

    #[test]
    fn malformed_json_yields_empty() {
        assert!(load_posts_or_empty(&JsonSource::new("{not json")).is_empty());
        assert!(load_projects_or_empty(&JsonSource::new("42")).is_empty());
    }

    #[test]
    fn snapshot_source_reads_compressed_data() {
        let snapshot = PostSnapshot::new(
            vec![Post::new("1", "T", "E", &["Go"])],
            vec![Project::new("p", "P", &["Go"])],
        );
        let data = to_compressed(&snapshot, [1, 0]).unwrap();
        let source = SnapshotSource::new(&data);
        assert_eq!(load_posts_or_empty(&source), snapshot.posts);
        assert_eq!(load_projects_or_empty(&source), snapshot.projects);
    }

    #[test]
    fn prefers_id_over_document_id() {
        let json = r#"[{"id": "slug-1", "_id": "doc-1", "title": "Both keys"}]"#;
        let posts = load_posts_or_empty(&JsonSource::new(json));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "slug-1");
    }

    #[test]
    fn post_without_any_id_fails_export() {
        let err = JsonSource::new(r#"[{"title": "Orphan"}]"#).fetch_posts().unwrap_err();
        assert!(err.to_string().contains("Orphan"));
    }

    #[test]
    fn content_is_read_once_for_both_collections() {
        use std::cell::Cell;

        struct CountingSource(Cell<usize>);

        impl ContentSource for CountingSource {
            fn fetch_content(&self) -> Result<Content> {
                self.0.set(self.0.get() + 1);
                Ok(Content {
                    posts: vec![Post::new("1", "T", "", &[])],
                    projects: vec![Project::new("p", "P", &["Go"])],
                })
            }
        }

        let source = CountingSource(Cell::new(0));
        let content = load_content_or_empty(&source);
        assert_eq!(source.0.get(), 1);
        assert_eq!(content.posts.len(), 1);
        assert_eq!(content.projects.len(), 1);
    }

    #[test]
    fn or_empty_reports_error_once() {
        let mut reported = Vec::new();
        let posts: Vec<Post> = or_empty(SnapshotSource::new(b"BLOGS").fetch_posts(), |e| {
            reported.push(e.to_string())
        });
        assert!(posts.is_empty());
        assert_eq!(reported.len(), 1);
    }

    #[test]
    fn or_empty_skips_callback_on_success() {
        let mut called = false;
        let posts = or_empty(JsonSource::new("[]").fetch_posts(), |_| called = true);
        assert!(posts.is_empty());
        assert!(!called);
    }

    #[test]
    fn corrupt_snapshot_yields_empty() {
        assert!(load_posts_or_empty(&SnapshotSource::new(b"garbage-bytes")).is_empty());
    }
}
