//! # Contenido de Ejemplo
//! src/samples.rs
//!
//! Genera un árbol mínimo en el document root para probar el servidor
//! (`--create-samples`):
//!
//! ```text
//! www/
//! ├── index.html
//! ├── about.html
//! ├── styles.css
//! ├── api/data.json
//! └── images/logo.txt
//! ```

use log::info;
use std::fs;
use std::io;
use std::path::Path;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <title>RedUnix Static</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <h1>Servidor HTTP/1.1 de archivos estáticos</h1>
    <p>Un thread por conexión, solo GET y HEAD.</p>
    <ul>
        <li><a href="/about.html">About</a></li>
        <li><a href="/api/data.json">Datos JSON</a></li>
        <li><a href="/images/logo.txt">Archivo de texto</a></li>
        <li><a href="/noexiste.html">Página inexistente (404)</a></li>
    </ul>
</body>
</html>
"#;

const ABOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <title>About</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <h1>Acerca del servidor</h1>
    <ul>
        <li>Métodos GET y HEAD</li>
        <li>Tipos MIME por extensión</li>
        <li>Errores 400, 403, 404, 405 y 500 en HTML</li>
        <li>Protección contra directory traversal</li>
    </ul>
    <p><a href="/">Volver al inicio</a></p>
</body>
</html>
"#;

const STYLES_CSS: &str = r#"body {
    font-family: sans-serif;
    max-width: 800px;
    margin: 40px auto;
    color: #333;
}

a {
    color: #667eea;
}
"#;

const DATA_JSON: &str = r#"{
    "servidor": "RedUnix-Static",
    "metodos_soportados": ["GET", "HEAD"],
    "concurrencia": "thread por conexión"
}
"#;

const LOGO_TXT: &str = "Archivo de texto de ejemplo.\nRedUnix Static HTTP/1.1\n";

/// Archivos generados, relativos al document root
pub const SAMPLE_FILES: [(&str, &str); 5] = [
    ("index.html", INDEX_HTML),
    ("about.html", ABOUT_HTML),
    ("styles.css", STYLES_CSS),
    ("api/data.json", DATA_JSON),
    ("images/logo.txt", LOGO_TXT),
];

/// Crea (o sobrescribe) el contenido de ejemplo bajo `root`
pub fn create_sample_files(root: &Path) -> io::Result<()> {
    for (relative, contents) in SAMPLE_FILES {
        let target = root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, contents)?;
    }
    info!("sample files created in {}", root.display());
    Ok(())
}
