use crate::{
    database::MongoDB,
    models::{Resource, ScannedPdf},
    utils::error::AppError,
};
use futures::TryStreamExt;
use lazy_static::lazy_static;
use mongodb::bson::{DateTime as BsonDateTime, Document};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    /// Fixed branch-name → short-code table. Unknown branch names fall back
    /// to a lowercased, underscore-separated form.
    static ref BRANCH_CODES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Computer Science", "cs");
        m.insert("Mechanical", "mech");
        m.insert("Electrical", "eee");
        m.insert("Electronics", "ece");
        m.insert("Civil", "civil");
        m.insert("Information Technology", "it");
        m.insert("Biotechnology", "bio");
        m
    };
}

/// Optional equality filters shared by both listing strategies.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResourceFilters {
    pub branch: Option<String>,
    pub semester: Option<String>,
    pub category: Option<String>,
}

pub fn normalize_branch(branch: &str) -> String {
    match BRANCH_CODES.get(branch) {
        Some(code) => (*code).to_string(),
        None => branch
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_"),
    }
}

/// Target directory for a classified upload:
/// `<root>/<branch>/semester_<semester>/<category>`.
pub fn target_dir(root: &Path, branch: &str, semester: &str, category: &str) -> PathBuf {
    root.join(branch)
        .join(format!("semester_{}", semester))
        .join(category)
}

/// Timestamped name for an incoming file, preserving the original extension.
pub fn stamped_filename(original: &str, now_millis: i64) -> String {
    let ext = Path::new(original)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    format!("pdf-{}{}", now_millis, ext)
}

/// Moves a received file from its temporary location into the classified
/// directory and records its metadata.
///
/// mkdir + rename is not transactional; a crash in between leaves an
/// orphaned temp file, which is accepted rather than retried.
pub async fn finalize_upload(
    db: &MongoDB,
    uploads_root: &Path,
    temp_path: &Path,
    filename: &str,
    branch: &str,
    semester: &str,
    category: &str,
) -> Result<Resource, AppError> {
    let branch = normalize_branch(branch);
    let dir = target_dir(uploads_root, &branch, semester, category);

    fs::create_dir_all(&dir).map_err(|e| {
        AppError::Internal(format!(
            "Failed to create upload directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let final_path = dir.join(filename);
    fs::rename(temp_path, &final_path)
        .map_err(|e| AppError::Internal(format!("Failed to move uploaded file: {}", e)))?;

    let resource = Resource {
        id: None,
        filename: filename.to_string(),
        branch,
        semester: semester.to_string(),
        category: category.to_string(),
        path: final_path.to_string_lossy().into_owned(),
        uploaded_at: Some(BsonDateTime::now()),
    };

    db.database()
        .collection::<Resource>("resources")
        .insert_one(&resource)
        .await
        .map_err(|e| AppError::Database(format!("Failed to save resource: {}", e)))?;

    log::info!("✅ Stored {} under {}", resource.filename, resource.path);

    Ok(resource)
}

/// Database-backed listing with optional equality filters.
pub async fn list_resources(
    db: &MongoDB,
    filters: &ResourceFilters,
) -> Result<Vec<Resource>, AppError> {
    let mut filter = Document::new();
    if let Some(branch) = &filters.branch {
        filter.insert("branch", branch);
    }
    if let Some(semester) = &filters.semester {
        filter.insert("semester", semester);
    }
    if let Some(category) = &filters.category {
        filter.insert("category", category);
    }

    let mut cursor = db
        .collection::<Resource>("resources")
        .find(filter)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch resources: {}", e)))?;

    let mut resources = Vec::new();
    while let Some(resource) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::Database(format!("Failed to read resources: {}", e)))?
    {
        resources.push(resource);
    }

    Ok(resources)
}

// Subdirectories of `parent`, or just `wanted` if a filter asked for one.
// Missing directories yield nothing rather than an error.
fn subdirs(parent: &Path, wanted: Option<&str>) -> Vec<String> {
    if let Some(name) = wanted {
        return if parent.join(name).is_dir() {
            vec![name.to_string()]
        } else {
            Vec::new()
        };
    }

    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}

/// Filesystem-scan listing: walks `<branch>/<semester dir>/<category>` under
/// the uploads root and returns every `.pdf` found, with its web path.
///
/// Filters select a single directory at their level by name (the semester
/// filter matches the directory name, e.g. `semester_3`).
pub fn scan_uploads(uploads_root: &Path, filters: &ResourceFilters) -> Vec<ScannedPdf> {
    let mut results = Vec::new();

    for branch in subdirs(uploads_root, filters.branch.as_deref()) {
        let branch_dir = uploads_root.join(&branch);

        for semester in subdirs(&branch_dir, filters.semester.as_deref()) {
            let semester_dir = branch_dir.join(&semester);

            for category in subdirs(&semester_dir, filters.category.as_deref()) {
                let category_dir = semester_dir.join(&category);

                let entries = match fs::read_dir(&category_dir) {
                    Ok(entries) => entries,
                    Err(_) => continue,
                };

                for entry in entries.filter_map(|entry| entry.ok()) {
                    let filename = match entry.file_name().into_string() {
                        Ok(name) => name,
                        Err(_) => continue,
                    };
                    if !filename.ends_with(".pdf") || !entry.path().is_file() {
                        continue;
                    }

                    results.push(ScannedPdf {
                        path: format!("/uploads/{}/{}/{}/{}", branch, semester, category, filename),
                        filename,
                        branch: branch.clone(),
                        semester: semester.clone(),
                        category: category.clone(),
                    });
                }
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_known_branches_use_short_codes() {
        assert_eq!(normalize_branch("Computer Science"), "cs");
        assert_eq!(normalize_branch("Mechanical"), "mech");
        assert_eq!(normalize_branch("Electrical"), "eee");
        assert_eq!(normalize_branch("Information Technology"), "it");
    }

    #[test]
    fn test_unknown_branch_falls_back_to_slug() {
        assert_eq!(normalize_branch("Marine Engineering"), "marine_engineering");
        assert_eq!(normalize_branch("Textile"), "textile");
    }

    #[test]
    fn test_target_dir_layout() {
        let dir = target_dir(Path::new("uploads"), "cs", "3", "notes");
        assert_eq!(dir, PathBuf::from("uploads/cs/semester_3/notes"));
    }

    #[test]
    fn test_stamped_filename_keeps_extension() {
        assert_eq!(stamped_filename("dbms notes.pdf", 1712345678901), "pdf-1712345678901.pdf");
        assert_eq!(stamped_filename("no_extension", 42), "pdf-42");
    }

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("studyhub-scan-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let root = scratch_root();
        let pdfs = scan_uploads(&root, &ResourceFilters::default());
        assert!(pdfs.is_empty());
    }

    #[test]
    fn test_scan_walks_hierarchy_and_skips_non_pdfs() {
        let root = scratch_root();
        let notes = root.join("cs").join("semester_3").join("notes");
        fs::create_dir_all(&notes).unwrap();
        fs::write(notes.join("pdf-1.pdf"), b"%PDF-").unwrap();
        fs::write(notes.join("readme.txt"), b"nope").unwrap();

        let pdfs = scan_uploads(&root, &ResourceFilters::default());
        assert_eq!(pdfs.len(), 1);
        assert_eq!(pdfs[0].filename, "pdf-1.pdf");
        assert_eq!(pdfs[0].branch, "cs");
        assert_eq!(pdfs[0].semester, "semester_3");
        assert_eq!(pdfs[0].category, "notes");
        assert_eq!(pdfs[0].path, "/uploads/cs/semester_3/notes/pdf-1.pdf");

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_scan_filters_narrow_the_walk() {
        let root = scratch_root();
        for (branch, semester, category, file) in [
            ("cs", "semester_3", "notes", "pdf-1.pdf"),
            ("cs", "semester_4", "notes", "pdf-2.pdf"),
            ("mech", "semester_3", "papers", "pdf-3.pdf"),
        ] {
            let dir = root.join(branch).join(semester).join(category);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(file), b"%PDF-").unwrap();
        }

        let filters = ResourceFilters {
            branch: Some("cs".to_string()),
            semester: Some("semester_3".to_string()),
            category: None,
        };
        let pdfs = scan_uploads(&root, &filters);
        assert_eq!(pdfs.len(), 1);
        assert_eq!(pdfs[0].filename, "pdf-1.pdf");

        // A requested branch with no directory is silently empty
        let filters = ResourceFilters {
            branch: Some("civil".to_string()),
            ..Default::default()
        };
        assert!(scan_uploads(&root, &filters).is_empty());

        fs::remove_dir_all(&root).unwrap();
    }
}
