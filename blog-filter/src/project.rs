use std::collections::HashSet;
use utils_common::{normalize_tag, tags_match, Project};

/// 表示“不筛选”的保留选项
pub const ALL_FILTER: &str = "All";

/// 项目技术栈单选筛选
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectFilter {
    options: Vec<String>,
    active: String,
}

impl ProjectFilter {
    /// 汇总所有项目的技术，去重后按名称排序，`All` 永远排在第一位
    pub fn new(projects: &[Project]) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut technologies: Vec<String> = Vec::new();

        for tech in projects.iter().flat_map(|p| p.technologies.iter()) {
            let key = normalize_tag(tech);
            if key == normalize_tag(ALL_FILTER) {
                continue;
            }
            if seen.insert(key) {
                technologies.push(tech.clone());
            }
        }

        technologies.sort_by_key(|tech| tech.to_lowercase());

        let mut options = Vec::with_capacity(technologies.len() + 1);
        options.push(ALL_FILTER.to_string());
        options.extend(technologies);

        Self {
            options,
            active: ALL_FILTER.to_string(),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_all(&self) -> bool {
        self.active == ALL_FILTER
    }

    /// 选择一个选项；不在选项列表中的值回退为 `All`
    pub fn set_active(&mut self, value: &str) {
        self.active = if self.options.iter().any(|o| o == value) {
            value.to_string()
        } else {
            ALL_FILTER.to_string()
        };
    }

    /// 恢复之前保存的选项，过期或缺失的值回退为 `All`
    pub fn restore(&mut self, stored: Option<&str>) {
        match stored {
            Some(value) => {
                self.set_active(value);
                if self.is_all() && value != ALL_FILTER {
                    tracing::debug!(stored = value, "保存的项目筛选已失效，回退为 All");
                }
            }
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.active = ALL_FILTER.to_string();
    }

    /// 筛选项目，保持原有顺序
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        if self.is_all() {
            return projects.iter().collect();
        }

        projects
            .iter()
            .filter(|p| p.technologies.iter().any(|t| tags_match(t, &self.active)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Vec<Project> {
        vec![
            Project::new("a", "Portfolio", &["Next.js", "TypeScript"]),
            Project::new("b", "CLI", &["Rust"]),
            Project::new("c", "Dashboard", &["typescript", "D3"]),
        ]
    }

    #[test]
    fn options_start_with_all_and_are_deduplicated() {
        let filter = ProjectFilter::new(&projects());
        assert_eq!(filter.options(), &["All", "D3", "Next.js", "Rust", "TypeScript"]);
        assert_eq!(filter.active(), ALL_FILTER);
    }

    #[test]
    fn all_passes_every_project() {
        let projects = projects();
        let filter = ProjectFilter::new(&projects);
        let ids: Vec<&str> = filter.apply(&projects).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn active_option_matches_case_insensitively() {
        let projects = projects();
        let mut filter = ProjectFilter::new(&projects);
        filter.set_active("TypeScript");
        let ids: Vec<&str> = filter.apply(&projects).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn unknown_value_falls_back_to_all() {
        let mut filter = ProjectFilter::new(&projects());
        filter.set_active("Rust");
        filter.set_active("Cobol");
        assert!(filter.is_all());
    }

    #[test]
    fn restore_handles_stale_and_missing_values() {
        let mut filter = ProjectFilter::new(&projects());
        filter.restore(Some("Rust"));
        assert_eq!(filter.active(), "Rust");
        filter.restore(Some("Cobol"));
        assert_eq!(filter.active(), ALL_FILTER);
        filter.set_active("D3");
        filter.restore(None);
        assert_eq!(filter.active(), ALL_FILTER);
    }

    #[test]
    fn technology_named_all_is_not_duplicated() {
        let filter = ProjectFilter::new(&[Project::new("x", "x", &["all", "Go"])]);
        assert_eq!(filter.options(), &["All", "Go"]);
    }
}
