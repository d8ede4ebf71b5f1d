pub mod compression;
pub mod error;
pub mod models;
pub mod tag;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{
    from_binary, from_compressed, to_binary, to_compressed, validate_compressed_data,
};
pub use error::{CommonError, Result};
pub use models::{Post, Project, PostSnapshot};
pub use tag::{normalize_tag, tags_match};
