//! # Resolución de Paths
//! src/resolver/mod.rs
//!
//! Traduce el path decodificado de un request a un archivo dentro del
//! document root.
//!
//! ## Algoritmo
//!
//! ```text
//! "/api/data.json"
//!   1. contiene ".."?             → 403
//!   2. "/" → "/index.html"
//!   3. root.join(path) + normalizar
//!   4. fuera del root?            → 403
//!   5. no existe?                 → 404
//!   6. directorio → <dir>/index.html (o 404)
//!   7. Resolved { path, content_type, size }
//! ```
//!
//! Aquí solo se consulta metadata; el contenido lo lee el handler.

use crate::error::ServeError;
use log::{debug, warn};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Content type cuando la extensión no es conocida
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Archivo encontrado dentro del document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Ruta absoluta canónica del archivo
    pub absolute_path: PathBuf,

    /// Tipo MIME según la extensión
    pub content_type: String,

    /// Tamaño en bytes al momento de resolver
    pub size: u64,
}

/// Raíz de documentos, canonicalizada una sola vez al arrancar
///
/// Es de solo lectura: los workers la comparten con `Arc` sin locks.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
}

impl DocumentRoot {
    /// Canonicaliza la raíz
    ///
    /// # Errores
    ///
    /// Falla si la ruta no existe o no es un directorio. Es una
    /// precondición de arranque, no un caso del pipeline.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = fs::canonicalize(path.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("document root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Ruta canónica de la raíz
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resuelve un path decodificado a un archivo servible
    ///
    /// # Ejemplo
    ///
    /// ```no_run
    /// use redunix_static::resolver::DocumentRoot;
    ///
    /// let root = DocumentRoot::new("./www").unwrap();
    /// let resolved = root.resolve("/").unwrap();
    /// assert!(resolved.absolute_path.ends_with("index.html"));
    /// ```
    pub fn resolve(&self, request_path: &str) -> Result<Resolved, ServeError> {
        // 1. Filtro rápido, antes de normalizar
        if request_path.contains("..") {
            warn!("traversal attempt rejected: {}", request_path);
            return Err(ServeError::TraversalAttempt(request_path.to_string()));
        }

        // 2. La raíz sirve index.html
        let path = if request_path == "/" { "/index.html" } else { request_path };

        // 3. Unir y normalizar
        let candidate = normalize(&self.root.join(path.trim_start_matches('/')));

        // 4. Chequeo de contención autoritativo
        if !candidate.starts_with(&self.root) {
            warn!("path outside document root rejected: {}", request_path);
            return Err(ServeError::OutOfRoot(request_path.to_string()));
        }

        // 5. Existencia
        let metadata = lookup(&candidate, request_path)?;

        // 6. Directorios sirven su index.html
        let (file_path, metadata) = if metadata.is_dir() {
            let index = candidate.join("index.html");
            let index_metadata = lookup(&index, request_path)?;
            if index_metadata.is_dir() {
                return Err(ServeError::NotFound(request_path.to_string()));
            }
            (index, index_metadata)
        } else {
            (candidate, metadata)
        };

        // Un symlink puede apuntar fuera de la raíz
        let absolute_path =
            fs::canonicalize(&file_path).map_err(|e| ServeError::from_io(e, request_path))?;
        if !absolute_path.starts_with(&self.root) {
            warn!("symlink escaping document root rejected: {}", request_path);
            return Err(ServeError::OutOfRoot(request_path.to_string()));
        }

        // 7. Éxito
        let resolved = Resolved {
            content_type: content_type_for(&file_path),
            size: metadata.len(),
            absolute_path,
        };
        debug!(
            "resolved {} -> {} ({}, {} bytes)",
            request_path,
            resolved.absolute_path.display(),
            resolved.content_type,
            resolved.size
        );
        Ok(resolved)
    }
}

/// Tipo MIME por extensión, con `application/octet-stream` por defecto
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// Normalización léxica: elimina `.` y resuelve `..` sin tocar el disco
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Consulta de existencia: permiso denegado → 403, cualquier otro fallo → 404
fn lookup(path: &Path, request_path: &str) -> Result<Metadata, ServeError> {
    fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => ServeError::PermissionDenied(request_path.to_string()),
        _ => ServeError::NotFound(request_path.to_string()),
    })
}
