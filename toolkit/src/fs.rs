//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.


use std::fs::File;
use std::io::{BufWriter, ErrorKind};
use std::path::Path;

/// Creates (or truncates) the file at `path` and all missing parent directories.
pub fn create_output_file(path: impl AsRef<Path>) -> std::io::Result<BufWriter<File>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::options().create(true).write(true).truncate(true).open(path)?;
    log::debug!("Write: {}", path.display());
    Ok(BufWriter::new(file))
}

/// Opens the file at `path` for reading, failing with a readable message if it does not exist.
pub fn open_input_file(path: impl AsRef<Path>) -> std::io::Result<File> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(ErrorKind::NotFound, format!("{:?} not found", path)));
    }
    File::options().read(true).open(path)
}
