// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use swipedeck_core::error::Fallible;
use swipedeck_core::error::fail;

/// Serves files out of the directory `wasm-pack` wrote the browser binding
/// to.
///
/// Paths come straight from the request, so anything that could escape the
/// root is rejected.
pub struct AssetLoader {
    /// Absolute path to the package directory.
    root: PathBuf,
}

#[derive(Debug, PartialEq)]
pub enum AssetError {
    Absolute,
    NotFound,
    NotFile,
    SymbolicLink,
    /// Path contains parent (`..`) components.
    ParentComponent,
    /// Path resolves to somewhere outside the root, through a symlinked
    /// directory.
    OutsideRoot,
}

impl AssetLoader {
    pub fn new(root: &Path) -> Fallible<Self> {
        if !root.is_dir() {
            return fail("pkg directory does not exist.");
        }
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn validate(&self, path: &str) -> Result<PathBuf, AssetError> {
        let path: PathBuf = PathBuf::from(path);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(AssetError::ParentComponent);
        }
        if path.is_absolute() {
            return Err(AssetError::Absolute);
        }
        let path: PathBuf = self.root.join(path);
        if !path.exists() {
            return Err(AssetError::NotFound);
        }
        if path.is_symlink() {
            return Err(AssetError::SymbolicLink);
        }
        if !path.is_file() {
            return Err(AssetError::NotFile);
        }
        let resolved: PathBuf = path.canonicalize().map_err(|_| AssetError::NotFound)?;
        if !resolved.starts_with(&self.root) {
            return Err(AssetError::OutsideRoot);
        }
        Ok(resolved)
    }
}

pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "js" => "text/javascript",
        "wasm" => "application/wasm",
        "json" => "application/json",
        "css" => "text/css",
        "ts" => "text/plain",
        _ => "application/octet-stream",
    }
}
