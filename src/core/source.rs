use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An interned handle into the file table. Cheap to copy and compare;
/// resolves back to an absolute path through the owning `SourceMap`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// A human-facing provenance marker: the file (by name, since diagnostics
/// outlive the file table borrow) and the 1-based line the item came from.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Origin {
    pub file: String,
    pub line: usize,
}

impl Origin {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: line,
        }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SourceError {
    #[error("could not find \"{name}\" (searched: {})", paths_list(.searched))]
    IncludeNotFound {
        name: String,
        searched: Vec<PathBuf>,
    },
    #[error("failed to read {0:?}: {1}")]
    Io(PathBuf, String),
}

fn paths_list(paths: &Vec<PathBuf>) -> String {
    match paths.is_empty() {
        true => String::from("no paths"),
        false => paths
            .iter()
            .map(|p| format!("{:?}", p))
            .collect::<Vec<String>>()
            .join(", "),
    }
}

#[derive(Debug, PartialEq)]
struct SourceFile {
    path: PathBuf,
    line_count: usize,
}

/// Opens source files through the include-path search order and interns
/// every opened path into a table of small ids. Texts are normalized to LF
/// line endings before they are handed back.
#[derive(Debug, PartialEq)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    include_paths: Vec<PathBuf>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            include_paths: Vec::new(),
        }
    }

    pub fn with_include_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            files: Vec::new(),
            include_paths: paths,
        }
    }

    pub fn add_include_path(&mut self, path: PathBuf) {
        self.include_paths.push(path);
    }

    pub fn include_paths(&self) -> &Vec<PathBuf> {
        &self.include_paths
    }

    /// Resolves `name` and reads its text. Absolute names are used as-is;
    /// relative names are searched first beside the `context` file, then
    /// along each configured include path in order.
    pub fn open(
        &mut self,
        name: &str,
        context: Option<FileId>,
    ) -> Result<(String, FileId), SourceError> {
        let target = Path::new(name);
        let mut searched: Vec<PathBuf> = Vec::new();

        let found = if target.is_absolute() == true {
            searched.push(target.to_path_buf());
            match target.exists() {
                true => Some(target.to_path_buf()),
                false => None,
            }
        } else {
            let mut dirs: Vec<PathBuf> = Vec::new();
            if let Some(id) = context {
                if let Some(parent) = self.path(id).parent() {
                    dirs.push(parent.to_path_buf());
                }
            } else {
                dirs.push(PathBuf::from("."));
            }
            dirs.extend(self.include_paths.iter().cloned());

            let mut hit = None;
            for dir in dirs {
                let candidate = dir.join(target);
                if candidate.exists() == true {
                    hit = Some(candidate);
                    break;
                }
                searched.push(candidate);
            }
            hit
        };

        let path = found.ok_or(SourceError::IncludeNotFound {
            name: name.to_string(),
            searched: searched,
        })?;
        let raw =
            fs::read_to_string(&path).map_err(|e| SourceError::Io(path.clone(), e.to_string()))?;
        let text = normalize_line_endings(&raw);
        let id = self.intern(path, text.lines().count());
        Ok((text, id))
    }

    /// Registers a non-file origin (in-memory text) under `name` so its id
    /// participates in provenance like any opened file.
    pub fn register(&mut self, name: &str, text: &str) -> FileId {
        self.intern(PathBuf::from(name), text.lines().count())
    }

    /// Access the path belonging to a file id.
    pub fn path(&self, id: FileId) -> &Path {
        &self.files[id.0].path
    }

    /// Access the number of lines recorded for a file id, for bounds-checked
    /// reporting.
    pub fn line_count(&self, id: FileId) -> usize {
        self.files[id.0].line_count
    }

    /// Looks up the id a path was interned under, if any.
    pub fn find(&self, path: &Path) -> Option<FileId> {
        self.files.iter().position(|f| f.path == path).map(FileId)
    }

    fn intern(&mut self, path: PathBuf, line_count: usize) -> FileId {
        let abs = match path.is_absolute() {
            true => path,
            false => match fs::canonicalize(&path) {
                Ok(p) => p,
                Err(_) => path,
            },
        };
        if let Some(id) = self.find(&abs) {
            return id;
        }
        self.files.push(SourceFile {
            path: abs,
            line_count: line_count,
        });
        FileId(self.files.len() - 1)
    }
}

/// Rewrites CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            result.push('\n');
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn searches_context_then_include_paths() {
        let root = tempfile::tempdir().unwrap();
        let inc = root.path().join("inc");
        fs::create_dir(&inc).unwrap();
        let top = root.path().join("top.v");
        write!(fs::File::create(&top).unwrap(), "module top; endmodule\n").unwrap();
        write!(fs::File::create(inc.join("hdr.vh")).unwrap(), "`define X 1\n").unwrap();

        let mut sources = SourceMap::with_include_paths(vec![inc.clone()]);
        let (_, top_id) = sources.open(top.to_str().unwrap(), None).unwrap();

        // not beside top.v, so the include path must supply it
        let (text, hdr_id) = sources.open("hdr.vh", Some(top_id)).unwrap();
        assert_eq!(text, "`define X 1\n");
        assert_eq!(sources.line_count(hdr_id), 1);

        // missing everywhere: both searched locations are reported
        let err = sources.open("nope.vh", Some(top_id)).unwrap_err();
        match err {
            SourceError::IncludeNotFound { searched, .. } => {
                assert_eq!(searched.len(), 2);
            }
            _ => panic!("expected IncludeNotFound"),
        }
    }

    #[test]
    fn interning_is_stable() {
        let root = tempfile::tempdir().unwrap();
        let f = root.path().join("a.v");
        write!(fs::File::create(&f).unwrap(), "wire w;\n").unwrap();
        let mut sources = SourceMap::new();
        let (_, id0) = sources.open(f.to_str().unwrap(), None).unwrap();
        let (_, id1) = sources.open(f.to_str().unwrap(), None).unwrap();
        assert_eq!(id0, id1);
    }
}
