use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::BoardData;

/// 持久化槽位的固定键名，文件名由它派生
pub const SLOT_KEY: &str = "questions";

/// 单个持久化槽位：启动时整体读取一次，每次变更整体覆盖
pub trait Slot {
    /// 槽位不存在时返回 `Ok(None)`
    fn read(&self) -> Result<Option<BoardData>>;
    fn write(&mut self, data: &BoardData) -> Result<()>;
}

/// 以 TOML 文件作为槽位
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/questions.toml`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{SLOT_KEY}.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<BoardData>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let data: BoardData = toml::from_str(&content)?;
        debug!(path = %self.path.display(), questions = data.questions.len(), "slot loaded");
        Ok(Some(data))
    }

    fn write(&mut self, data: &BoardData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// 读取槽位；缺失或无法解析都视为没有历史数据
pub fn load_or_default(slot: &dyn Slot) -> BoardData {
    match slot.read() {
        Ok(Some(data)) => data,
        Ok(None) => BoardData::default(),
        Err(e) => {
            warn!(error = %e, "persisted board unreadable, starting empty");
            BoardData::default()
        }
    }
}

/// 内存槽位，内容以序列化后的 TOML 保存，克隆体共享同一份内容
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: std::rc::Rc<std::cell::RefCell<Option<String>>>,
}

#[cfg(test)]
impl MemorySlot {
    pub fn with_raw(raw: &str) -> Self {
        let slot = Self::default();
        *slot.contents.borrow_mut() = Some(raw.to_string());
        slot
    }

    pub fn raw(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

#[cfg(test)]
impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<BoardData>> {
        match self.contents.borrow().as_deref() {
            Some(raw) => Ok(Some(toml::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn write(&mut self, data: &BoardData) -> Result<()> {
        *self.contents.borrow_mut() = Some(toml::to_string_pretty(data)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, Response};
    use chrono::Local;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::in_dir(dir.path());
        assert!(slot.read().unwrap().is_none());
        assert!(load_or_default(&slot).questions.is_empty());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::in_dir(&dir.path().join("nested"));

        let mut q = Question::new("Subject".to_string(), "Body".to_string());
        q.responses.push(Response::new("ann".to_string(), "hi".to_string()));
        let data = BoardData::new(vec![q], Local::now());

        slot.write(&data).unwrap();
        assert!(slot.path().ends_with("questions.toml"));
        assert_eq!(slot.read().unwrap(), Some(data));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::in_dir(dir.path());
        fs::write(slot.path(), "this is = = not toml").unwrap();

        assert!(slot.read().is_err());
        assert!(load_or_default(&slot).questions.is_empty());
    }

    #[test]
    fn test_memory_slot_shares_contents() {
        let slot = MemorySlot::default();
        let mut writer = slot.clone();
        writer.write(&BoardData::default()).unwrap();
        assert!(slot.raw().is_some());
        assert!(slot.read().unwrap().is_some());

        let corrupt = MemorySlot::with_raw("[[[");
        assert!(load_or_default(&corrupt).questions.is_empty());
    }
}
