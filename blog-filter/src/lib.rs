use wasm_bindgen::prelude::*;
use web_sys::console;
use utils_common::{Post, Project};

// 导出模块
pub mod builder;
pub mod filter;
pub mod models;
pub mod project;
pub mod search;
pub mod source;

pub use builder::{build_tag_vocabulary, tag_names, TagVocabularyBuilder};
pub use filter::{filter_posts, filter_posts_owned};
pub use models::{FilterAction, FilterState, TagEntry};
pub use project::{ProjectFilter, ALL_FILTER};
pub use search::BlogSearch;
pub use source::{
    load_content_or_empty, load_posts_or_empty, load_projects_or_empty, or_empty, Content,
    ContentSource, JsonSource, SnapshotSource,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 输出到浏览器控制台
fn log(message: &str) {
    console::log_1(&JsValue::from_str(message));
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("序列化{}失败: {}", what, e)))
}

/// 从来源加载文章，失败时记录到控制台并返回空集合
fn posts_from(source: &dyn ContentSource) -> Vec<Post> {
    or_empty(source.fetch_posts(), |e| log(&format!("加载文章失败: {}", e)))
}

fn projects_from(source: &dyn ContentSource) -> Vec<Project> {
    or_empty(source.fetch_projects(), |e| log(&format!("加载项目失败: {}", e)))
}

/// 博客搜索JS接口 - 每个视图持有自己的实例
#[wasm_bindgen]
pub struct BlogSearchJS {
    inner: BlogSearch,
}

#[wasm_bindgen]
impl BlogSearchJS {
    /// 从索引器生成的压缩快照创建
    #[wasm_bindgen(js_name = fromSnapshot)]
    pub fn from_snapshot(data: &[u8]) -> BlogSearchJS {
        console_error_panic_hook::set_once();
        Self {
            inner: BlogSearch::new(posts_from(&SnapshotSource::new(data))),
        }
    }

    /// 从 CMS 返回的 JSON 创建
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> BlogSearchJS {
        console_error_panic_hook::set_once();
        Self {
            inner: BlogSearch::new(posts_from(&JsonSource::new(json))),
        }
    }

    /// 标签名称列表（已排序）
    pub fn tags(&mut self) -> js_sys::Array {
        self.inner
            .tags()
            .iter()
            .map(|tag| JsValue::from_str(tag))
            .collect()
    }

    /// 带计数的标签词表
    #[wasm_bindgen(js_name = tagEntries)]
    pub fn tag_entries(&mut self) -> Result<JsValue, JsValue> {
        to_js(&*self.inner.tag_entries(), "标签")
    }

    #[wasm_bindgen(js_name = searchQuery)]
    pub fn search_query(&self) -> String {
        self.inner.state().search_query.clone()
    }

    #[wasm_bindgen(js_name = selectedTags)]
    pub fn selected_tags(&self) -> js_sys::Array {
        self.inner
            .state()
            .selected_tags
            .iter()
            .map(|tag| JsValue::from_str(tag))
            .collect()
    }

    #[wasm_bindgen(js_name = setSearchQuery)]
    pub fn set_search_query(&mut self, query: &str) {
        self.inner.set_search_query(query);
    }

    #[wasm_bindgen(js_name = toggleTag)]
    pub fn toggle_tag(&mut self, tag: &str) {
        self.inner.toggle_tag(tag);
    }

    #[wasm_bindgen(js_name = clearFilters)]
    pub fn clear_filters(&mut self) {
        self.inner.clear_filters();
    }

    /// 执行 JSON 形式的筛选动作，如 `{"type":"toggleTag","value":"Rust"}`
    pub fn dispatch(&mut self, action_json: &str) -> Result<(), JsValue> {
        let action: FilterAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("解析筛选动作失败: {}", e)))?;
        self.inner.dispatch(action);
        Ok(())
    }

    /// 当前筛选状态
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.state(), "筛选状态")
    }

    /// 当前筛选结果
    #[wasm_bindgen(js_name = filteredPosts)]
    pub fn filtered_posts(&mut self) -> Result<JsValue, JsValue> {
        to_js(&*self.inner.filtered(), "筛选结果")
    }

    #[wasm_bindgen(js_name = postCount)]
    pub fn post_count(&self) -> usize {
        self.inner.posts().len()
    }
}

/// 项目筛选JS接口 - 单选技术栈
#[wasm_bindgen]
pub struct ProjectFilterJS {
    projects: Vec<Project>,
    filter: ProjectFilter,
}

impl ProjectFilterJS {
    fn with_projects(projects: Vec<Project>) -> Self {
        let filter = ProjectFilter::new(&projects);
        Self { projects, filter }
    }
}

#[wasm_bindgen]
impl ProjectFilterJS {
    /// 从 CMS 返回的 JSON 创建
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str) -> ProjectFilterJS {
        console_error_panic_hook::set_once();
        Self::with_projects(projects_from(&JsonSource::new(json)))
    }

    #[wasm_bindgen(js_name = fromSnapshot)]
    pub fn from_snapshot(data: &[u8]) -> ProjectFilterJS {
        console_error_panic_hook::set_once();
        Self::with_projects(projects_from(&SnapshotSource::new(data)))
    }

    pub fn options(&self) -> js_sys::Array {
        self.filter
            .options()
            .iter()
            .map(|option| JsValue::from_str(option))
            .collect()
    }

    pub fn active(&self) -> String {
        self.filter.active().to_string()
    }

    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&mut self, value: &str) {
        self.filter.set_active(value);
    }

    /// 恢复本地保存的选项，例如 localStorage 中的值
    pub fn restore(&mut self, stored: Option<String>) {
        self.filter.restore(stored.as_deref());
    }

    #[wasm_bindgen(js_name = filteredProjects)]
    pub fn filtered_projects(&self) -> Result<JsValue, JsValue> {
        to_js(&self.filter.apply(&self.projects), "项目")
    }
}
