//! Log writer with rotation support

use oxidelog_core::{LogRecord, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::rotation::RotationConfig;

/// Appends records to the active log file and rotates it by size.
///
/// The file handle is opened lazily, so the writer survives the active file
/// being removed by a compression cycle: the next write recreates it.
pub struct LogWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    config: RotationConfig,
    current_size: u64,
}

impl LogWriter {
    /// Create the active file, truncating anything already there
    pub fn create(path: PathBuf, config: RotationConfig) -> Result<Self> {
        ensure_parent(&path)?;
        File::create(&path)?;

        let mut writer = Self::detached(path, config);
        writer.ensure_open()?;
        Ok(writer)
    }

    /// Prepare to append to the active file, keeping existing content.
    ///
    /// Only the parent directory is created here; the file itself is opened
    /// (or created) on the first write.
    pub fn open(path: PathBuf, config: RotationConfig) -> Result<Self> {
        ensure_parent(&path)?;
        Ok(Self::detached(path, config))
    }

    /// A writer with no open handle; the file is opened on first write
    pub fn detached(path: PathBuf, config: RotationConfig) -> Self {
        Self {
            path,
            writer: None,
            config,
            current_size: 0,
        }
    }

    /// Append one record as a JSON line
    pub fn write_record(&mut self, record: &LogRecord) -> Result<()> {
        let line = record.to_json_line()?;
        self.write_raw(line.as_bytes())
    }

    /// Write raw bytes
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        let writer = self.ensure_open()?;
        writer.write_all(data)?;
        writer.flush()?;
        self.current_size += data.len() as u64;

        if self.config.should_rotate(self.current_size) {
            self.rotate()?;
        }

        Ok(())
    }

    /// Flush and drop the file handle
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        self.current_size = 0;
        Ok(())
    }

    fn ensure_open(&mut self) -> Result<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                ensure_parent(&self.path)?;
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                self.current_size = file.metadata()?.len();
                debug!("Opened log file: {}", self.path.display());
                BufWriter::new(file)
            }
        };

        Ok(self.writer.insert(writer))
    }

    /// Rotate the log file
    fn rotate(&mut self) -> Result<()> {
        debug!("Rotating log file: {}", self.path.display());

        self.close()?;

        if self.config.max_files <= 1 {
            // No room for rotated copies: start over in place
            File::create(&self.path)?;
            return Ok(());
        }

        // Shift existing files: .3 -> .4, .2 -> .3, etc. The active file
        // counts toward max_files, so the highest kept index is max_files - 1.
        for i in (1..self.config.max_files).rev() {
            let old_path = rotated_path(&self.path, i);
            if !old_path.exists() {
                continue;
            }
            if i + 1 >= self.config.max_files {
                fs::remove_file(&old_path)?;
            } else {
                fs::rename(&old_path, rotated_path(&self.path, i + 1))?;
            }
        }

        if self.path.exists() {
            fs::rename(&self.path, rotated_path(&self.path, 1))?;
        }

        File::create(&self.path)?;
        Ok(())
    }

    /// Size of the active file as tracked since it was last opened
    pub fn current_size(&self) -> u64 {
        self.current_size
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Get the path for a rotated log file
pub fn rotated_path(base: &Path, index: usize) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
