use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use aria_desk_common::*;
use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};
use thiserror::Error;

fn kind(e: io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
        io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
        io::ErrorKind::InvalidData => ErrorKind::InvalidData,
        io::ErrorKind::Interrupted => ErrorKind::Interrupted,
        io::ErrorKind::Unsupported => ErrorKind::Unsupported,
        _ => ErrorKind::Other,
    }
}

/// 以宿主机目录模拟 SD 卡
///
/// Device paths are rooted at `root`; `/books/a.txt` maps to
/// `<root>/books/a.txt`. Removing the directory reads as a pulled card.
pub struct HostFileSystem {
    root: PathBuf,
}

impl HostFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn host_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl FileSystem for HostFileSystem {
    type File = HostFile;
    type Error = ErrorKind;

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn open(&self, path: &str) -> Result<Self::File, Self::Error> {
        fs::File::open(self.host_path(path)).map(HostFile).map_err(kind)
    }

    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, Self::Error> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.host_path(path)).map_err(kind)? {
            let entry = entry.map_err(kind)?;
            let meta = entry.metadata().map_err(kind)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            entries.push(DirEntry {
                name,
                is_dir: meta.is_dir(),
                size: meta.len(),
            });
        }
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
        Ok(entries)
    }
}

pub struct HostFile(fs::File);

impl ErrorType for HostFile {
    type Error = ErrorKind;
}

impl Read for HostFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        io::Read::read(&mut self.0, buf).map_err(kind)
    }
}

impl Seek for HostFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let pos = match pos {
            SeekFrom::Start(p) => io::SeekFrom::Start(p),
            SeekFrom::End(d) => io::SeekFrom::End(d),
            SeekFrom::Current(d) => io::SeekFrom::Current(d),
        };
        io::Seek::seek(&mut self.0, pos).map_err(kind)
    }
}

#[derive(Debug, Error)]
pub enum KvError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// 偏好设置，保存为一个 JSON 文件
pub struct JsonFileStore {
    path: PathBuf,
    values: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl JsonFileStore {
    /// A missing or unreadable file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("preferences {} unreadable, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            values: RefCell::new(values),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    type Error = KvError;

    fn load(&self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, Self::Error> {
        Ok(self.values.borrow().get(key).map(|v| {
            let n = v.len().min(buf.len());
            buf[..n].copy_from_slice(&v[..n]);
            n
        }))
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        let mut values = self.values.borrow_mut();
        values.insert(key.to_string(), value.to_vec());
        let json = serde_json::to_vec_pretty(&*values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
