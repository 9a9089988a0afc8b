use std::path::{Path, PathBuf};

/// Content written by `--create-document` when no test document exists.
pub const SAMPLE_DOCUMENT: &str = "\
Informe de proyecto de prueba

Este documento se usa para verificar los límites de análisis y de subida de proyectos.
Contiene texto suficiente para que el análisis devuelva un resumen.

- Objetivo: validar el plan gratuito y el plan premium
- Responsable: equipo de QA
";

/// Local file attached to every guarded action.
#[derive(Debug, Clone)]
pub struct TestDocument {
    path: PathBuf,
}

impl TestDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document fresh for each request. Errors are returned already
    /// formatted for a test record.
    pub fn read(&self) -> Result<Vec<u8>, String> {
        std::fs::read(&self.path).map_err(|e| format!("File error: {}: {}", self.path.display(), e))
    }

    /// Write [`SAMPLE_DOCUMENT`] if nothing exists at the path yet.
    /// Returns whether a file was created.
    pub fn ensure_exists(&self) -> std::io::Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, SAMPLE_DOCUMENT)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_document_reports_file_error() {
        let doc = TestDocument::new("/nonexistent/dir/test_document.txt");
        let err = doc.read().unwrap_err();
        assert!(err.starts_with("File error: "));
        assert!(err.contains("test_document.txt"));
    }

    #[test]
    fn test_ensure_exists_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let doc = TestDocument::new(dir.path().join("nested").join("doc.txt"));

        assert!(doc.ensure_exists().unwrap());
        assert_eq!(doc.read().unwrap(), SAMPLE_DOCUMENT.as_bytes());

        std::fs::write(doc.path(), "custom").unwrap();
        assert!(!doc.ensure_exists().unwrap());
        assert_eq!(doc.read().unwrap(), b"custom");
    }
}
