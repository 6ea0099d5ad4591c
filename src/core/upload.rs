use std::path::Path;

use uuid::Uuid;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Extension to store an uploaded file under, or `None` when the upload is
/// not an image.
pub fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .and_then(|x| Path::new(x).extension())
        .and_then(|x| x.to_str())
        .map(|x| x.to_ascii_lowercase())
        .filter(|x| IMAGE_EXTENSIONS.contains(&x.as_str()));
    if from_name.is_some() {
        return from_name;
    }
    let content_type = content_type?.to_ascii_lowercase();
    let subtype = content_type.strip_prefix("image/")?;
    match subtype {
        "jpeg" | "pjpeg" => Some("jpg".to_string()),
        "png" | "gif" | "webp" => Some(subtype.to_string()),
        _ => None,
    }
}

/// Writes the image bytes under `upload_dir` with a generated name and
/// returns the stored path.
pub async fn store_image(upload_dir: &str, extension: &str, bytes: &[u8]) -> anyhow::Result<String> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let file_name = format!("{}.{}", Uuid::now_v7(), extension);
    let path = Path::new(upload_dir).join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path.to_string_lossy().to_string())
}

/// Deletes a file written by [`store_image`]. A file already gone is not an error.
pub async fn remove_image(path: &str) -> anyhow::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
