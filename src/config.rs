use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::storage::FileSlot;

/// Terminal discussion board
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the board and the log file [default: <user data dir>/parley]
    #[arg(long, env = "PARLEY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "parley=trace"
    #[arg(long, env = "PARLEY_LOG", default_value = "info")]
    pub log_level: String,

    /// Log file path [default: <data dir>/parley.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// 解析后的运行配置
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub slot_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// 补全默认值并创建数据目录
    pub fn from_args(args: Args) -> Result<Self> {
        let data_dir = match args.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)?;

        let slot_path = FileSlot::in_dir(&data_dir).path().to_path_buf();
        let log_path = args.log_file.unwrap_or_else(|| data_dir.join("parley.log"));

        Ok(Self {
            data_dir,
            slot_path,
            log_path,
            log_filter: args.log_level,
        })
    }
}

/// ~/.local/share/parley/
fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("parley"))
        .ok_or(Error::NoDataDir)
}
