use std::io::{Read, Write};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};
use crate::error::{CommonError, Result};

/// 魔数常量 - 用于标识快照文件格式
pub const MAGIC_BYTES: &[u8] = b"BLOGS";

/// 当前快照格式的主版本号
pub const CURRENT_MAJOR_VERSION: u8 = 1;

/// 头部长度：魔数 + 版本号(2) + 原始大小(4)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 按头部大小预分配的上限，头部数值不可信
const MAX_PREALLOC: usize = 1 << 20;

/// 快照头部信息
struct Header {
    version: [u8; 2],
    original_size: usize,
}

/// 解析并校验头部
fn read_header(data: &[u8], max_version: u8) -> Result<Header> {
    if data.len() < HEADER_LEN {
        return Err(CommonError::TooShort(data.len()));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(CommonError::BadMagic);
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(CommonError::UnsupportedVersion {
            major: version[0],
            minor: version[1],
        });
    }

    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[version_offset + 2..HEADER_LEN]);

    Ok(Header {
        version,
        original_size: u32::from_le_bytes(size_bytes) as usize,
    })
}

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(obj, bincode::config::standard())?)
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
    let (value, _) = bincode::serde::decode_from_slice(data, bincode::config::standard())?;
    Ok(value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>> {
    let binary = to_binary(obj)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&binary)?;
    let compressed_data = encoder.finish()?;

    let mut output = Vec::with_capacity(HEADER_LEN + compressed_data.len());
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());
    output.extend_from_slice(&compressed_data);

    Ok(output)
}

/// 从压缩的二进制格式反序列化对象，只接受当前主版本及以下
pub fn from_compressed<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
    from_compressed_with_max_version(data, CURRENT_MAJOR_VERSION)
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: serde::de::DeserializeOwned>(
    data: &[u8],
    max_version: u8,
) -> Result<T> {
    let header = read_header(data, max_version)?;

    // 最多多读一个字节，超出头部声明的数据不会被完整解压
    let limit = header.original_size as u64 + 1;
    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]).take(limit);
    let mut decompressed_data = Vec::with_capacity(header.original_size.min(MAX_PREALLOC));
    decoder.read_to_end(&mut decompressed_data)?;

    if decompressed_data.len() != header.original_size {
        return Err(CommonError::SizeMismatch {
            expected: header.original_size,
            actual: decompressed_data.len(),
        });
    }

    from_binary(&decompressed_data)
}

/// 验证压缩数据头部，返回版本号
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2]> {
    read_header(data, CURRENT_MAJOR_VERSION).map(|h| h.version)
}
