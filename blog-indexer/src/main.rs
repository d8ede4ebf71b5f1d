use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use blog_filter::builder::TagVocabularyBuilder;
use blog_filter::source::CmsExport;
use utils_common::{to_compressed, Post, PostSnapshot, Project};

/// 快照文件名
const SNAPSHOT_FILE: &str = "posts_index.bin";

/// 快照格式版本
const SNAPSHOT_VERSION: [u8; 2] = [1, 0];

/// 打印词表时最多显示的标签数
const TOP_TAGS: usize = 10;

fn main() {
    let matches = Command::new("博客内容快照生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("将 CMS 导出的 JSON 转换为博客筛选模块使用的压缩快照")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("SOURCE")
                .help("CMS 导出文件或目录")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_DIR")
                .help("快照输出目录")
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("显示详细信息")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    init_logging(verbose);

    // required(true) 保证参数存在
    let arg_path = |name: &str| {
        PathBuf::from(matches.get_one::<String>(name).cloned().unwrap_or_default())
    };
    let source = arg_path("source");
    let output = arg_path("output");

    match generate_snapshot(&source, &output) {
        Ok(path) => println!("快照生成成功: {}", path.display()),
        Err(e) => {
            eprintln!("错误: 快照生成失败: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 收集导出文件，目录按路径排序以保证结果稳定
fn collect_export_files(source: &Path) -> Result<Vec<PathBuf>> {
    if !source.exists() {
        bail!("源路径不存在 '{}'", source.display());
    }

    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.with_context(|| format!("遍历目录时出错: {}", source.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// 读取并合并所有导出文件，重复 id 的文章只保留第一篇
fn load_exports(files: &[PathBuf]) -> Result<(Vec<Post>, Vec<Project>)> {
    let mut posts = Vec::new();
    let mut projects = Vec::new();
    let mut seen_posts: HashSet<String> = HashSet::new();
    let mut seen_projects: HashSet<String> = HashSet::new();

    for file in files {
        let json = fs::read_to_string(file)
            .with_context(|| format!("无法读取文件 '{}'", file.display()))?;
        let content = CmsExport::parse(&json)
            .and_then(CmsExport::into_content)
            .with_context(|| format!("无法解析文件 '{}'", file.display()))?;

        tracing::debug!(
            file = %file.display(),
            posts = content.posts.len(),
            projects = content.projects.len(),
            "已读取导出文件"
        );

        for post in content.posts {
            if seen_posts.insert(post.id.clone()) {
                posts.push(post);
            } else {
                tracing::warn!(id = %post.id, file = %file.display(), "跳过重复文章");
            }
        }
        for project in content.projects {
            if seen_projects.insert(project.id.clone()) {
                projects.push(project);
            } else {
                tracing::warn!(id = %project.id, file = %file.display(), "跳过重复项目");
            }
        }
    }

    Ok((posts, projects))
}

fn generate_snapshot(source: &Path, output_dir: &Path) -> Result<PathBuf> {
    let start_time = std::time::Instant::now();

    let files = collect_export_files(source)?;
    tracing::info!(files = files.len(), "开始读取 CMS 导出");

    let (posts, projects) = load_exports(&files)?;
    if posts.is_empty() {
        bail!("没有找到任何文章");
    }

    let mut vocabulary = TagVocabularyBuilder::new();
    vocabulary.add_posts(&posts);
    let vocabulary = vocabulary.build();

    println!(
        "文章: {}，项目: {}，标签: {}",
        posts.len(),
        projects.len(),
        vocabulary.len()
    );
    for entry in vocabulary.iter().take(TOP_TAGS) {
        println!("  {} ({})", entry.display_name, entry.usage_count);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录 '{}'", output_dir.display()))?;

    let snapshot = PostSnapshot::new(posts, projects);
    let data = to_compressed(&snapshot, SNAPSHOT_VERSION).context("压缩快照失败")?;

    let path = output_dir.join(SNAPSHOT_FILE);
    fs::write(&path, &data)
        .with_context(|| format!("无法写入快照文件 '{}'", path.display()))?;

    tracing::info!(
        bytes = data.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "快照已写入"
    );

    Ok(path)
}
