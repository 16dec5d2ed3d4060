use alloc::{string::String, vec::Vec};
use embedded_io::{Read, Seek};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// SD 卡文件系统
pub trait FileSystem {
    type File: Read + Seek;
    type Error: core::fmt::Debug;

    /// Whether a medium is inserted and mounted right now.
    fn is_available(&self) -> bool;

    fn open(&self, path: &str) -> Result<Self::File, Self::Error>;

    /// Entries of `path`, directories first, otherwise in name order.
    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, Self::Error>;
}

/// 偏好设置键值存储
pub trait KeyValueStore {
    type Error: core::fmt::Debug;

    /// Copies the value into `buf` and returns its length, or `None` when the
    /// key has never been written.
    fn load(&self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;

    fn store(&self, key: &str, value: &[u8]) -> Result<(), Self::Error>;
}
