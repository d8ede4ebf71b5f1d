//! 标签归一化
//!
//! 标签词表、标签筛选和项目筛选都只通过这里计算比较键，
//! 保证 "React"、"react"、"REACT" 在各处被视为同一个标签。

/// 计算标签的归一化键（大小写折叠）
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase()
}

/// 两个标签在归一化后是否相等
pub fn tags_match(a: &str, b: &str) -> bool {
    normalize_tag(a) == normalize_tag(b)
}
