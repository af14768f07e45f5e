use actix_files::NamedFile;
use actix_web::{web, Responder};
use std::path::{Path, PathBuf};

/// Extensions that may be served from the site directory
const ALLOWED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "svg", "css", "js"];

/// Directory static assets are looked up in
#[derive(Clone, Debug)]
pub struct StaticRoot(pub PathBuf);

fn is_allowed(filename: &str) -> bool {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return false;
    }

    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Look in the site directory first, then its `static/` subdirectory
fn locate(root: &Path, filename: &str) -> Option<PathBuf> {
    [root.join(filename), root.join("static").join(filename)]
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// GET /{filename}
/// Serve images, stylesheets and scripts (avatar, background, ...)
pub async fn serve_static(
    root: web::Data<StaticRoot>,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    let filename = path.into_inner();

    if !is_allowed(&filename) {
        return Err(actix_web::error::ErrorNotFound("Not found"));
    }

    let file_path = locate(&root.0, &filename)
        .ok_or_else(|| actix_web::error::ErrorNotFound("Not found"))?;

    let named_file = NamedFile::open(file_path).map_err(|e| {
        log::error!("Failed to open file: {}", e);
        actix_web::error::ErrorInternalServerError("Failed to serve file")
    })?;

    Ok(named_file)
}
