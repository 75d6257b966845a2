use std::{
    cell::RefCell,
    env, fmt, fs, io,
    path::{Path, PathBuf},
};

use schemars::{json_schema, JsonSchema};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A path as written in the configuration, alongside its canonical absolute form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    pub relative: String,
    pub absolute: String,
}

// Relative paths resolve against the directory of the configuration file, which the
// deserializer cannot see on its own.
thread_local!(static CONTEXT_START_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) });

pub fn with_start_path<F, T>(start_path: &Path, f: F) -> T
where
    F: FnOnce() -> T,
{
    CONTEXT_START_PATH.with(|ctx| {
        *ctx.borrow_mut() = Some(start_path.to_path_buf());
    });

    let result = f();

    CONTEXT_START_PATH.with(|ctx| {
        *ctx.borrow_mut() = None;
    });

    result
}

impl JsonSchema for FilePath {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "FilePath".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        json_schema!({
            "type": "string",
            "format": "path"
        })
    }

    fn inline_schema() -> bool {
        true
    }
}

impl Serialize for FilePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.relative)
    }
}

struct FilePathVisitor;

impl<'de> Visitor<'de> for FilePathVisitor {
    type Value = FilePath;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string representing a file path")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        CONTEXT_START_PATH.with(|ctx| match ctx.borrow().as_ref() {
            Some(start_path) => FilePath::resolve_relative(start_path, v, true)
                .map_err(|err| E::custom(format!("Failed to canonicalize path '{}': {}", v, err))),
            None => Err(E::custom(
                "FilePath deserialization context (start_path) is not set",
            )),
        })
    }
}

impl<'de> Deserialize<'de> for FilePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(FilePathVisitor)
    }
}

impl FilePath {
    pub fn new_from_relative(relative_path: &str) -> io::Result<FilePath> {
        Self::resolve_relative(&env::current_dir()?, relative_path, false)
    }

    fn resolve_relative(
        base_path: &Path,
        relative_path: &str,
        canonicalize: bool,
    ) -> io::Result<FilePath> {
        let absolute_path = base_path.join(relative_path);
        let absolute_path = if canonicalize {
            fs::canonicalize(absolute_path)?
        } else {
            absolute_path
        };

        Ok(FilePath {
            relative: relative_path.to_string(),
            absolute: absolute_path.to_string_lossy().to_string(),
        })
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.absolute)
    }
}
