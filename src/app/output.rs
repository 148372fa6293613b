use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf}
};

use super::Result;

const PATH_HOSTILE : [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `<name>.<extension>` with characters that cannot appear in a file name
/// replaced by `_`.
pub fn file_name_for(name : &str, extension : &str) -> String {
    let stem : String = name
        .chars()
        .map(|c| if PATH_HOSTILE.contains(&c) { '_' } else { c })
        .collect();
    format!("{stem}.{extension}")
}

/// Writes finished documents into the output folder.
///
/// Every document goes to a sibling temp file first and is then renamed into
/// place, so a reader never sees a half written report.
pub struct OutputSink {
    folder : PathBuf
}

impl OutputSink {
    pub fn new(folder : impl Into<PathBuf>) -> Self {
        Self {
            folder : folder.into()
        }
    }

    pub fn folder(&self) -> &Path { &self.folder }

    pub fn write(&self, file_name : &str, contents : &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.folder)?;

        let path = self.folder.join(file_name);
        let temp_path = temp_path_for(&path);

        let written = fs::write(&temp_path, contents).and_then(|()| fs::rename(&temp_path, &path));
        if let Err(error) = written {
            let _best_effort = fs::remove_file(&temp_path);
            return Err(error.into());
        }

        tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());

        Ok(path)
    }
}

fn temp_path_for(path : &Path) -> PathBuf {
    let mut temp : OsString = path.as_os_str().to_owned();
    temp.push(".tmp");
    PathBuf::from(temp)
}
