//! The upload boundary: a batch of raster files is decoded in parallel and
//! appended to the project only when every decode succeeds.
//!
//! The whole batch is rejected up front if it would push the project past
//! the image cap — no partial application.

use base64::Engine as _;

use loopscene_core::{LoopsceneError, LoopsceneResult};
use loopscene_ir::{Image, MAX_IMAGES};

/// One raster file handed in by the embedding UI.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Decode an upload batch: fan out one blocking decode per file, then fan
/// in preserving the batch's original file order. Any single decode failure
/// fails the whole batch.
pub async fn decode_batch(
    existing_count: usize,
    files: Vec<UploadFile>,
) -> LoopsceneResult<Vec<Image>> {
    if existing_count + files.len() > MAX_IMAGES {
        return Err(LoopsceneError::Upload(format!(
            "uploading {} file(s) would exceed the maximum of {} images",
            files.len(),
            MAX_IMAGES
        )));
    }

    let handles: Vec<_> = files
        .into_iter()
        .map(|file| tokio::task::spawn_blocking(move || decode_one(file)))
        .collect();

    // Awaiting in spawn order keeps the appended ranks in file order, even
    // though the decodes themselves finish in any order.
    let mut images = Vec::with_capacity(handles.len());
    for handle in handles {
        let image = handle
            .await
            .map_err(|e| LoopsceneError::Decode(format!("decode task failed: {}", e)))??;
        images.push(image);
    }
    Ok(images)
}

fn decode_one(file: UploadFile) -> LoopsceneResult<Image> {
    let format = image::guess_format(&file.bytes)
        .map_err(|e| LoopsceneError::Decode(format!("{}: {}", file.name, e)))?;
    let decoded = image::load_from_memory_with_format(&file.bytes, format)
        .map_err(|e| LoopsceneError::Decode(format!("{}: {}", file.name, e)))?;

    let payload = format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        base64::engine::general_purpose::STANDARD.encode(&file.bytes)
    );
    tracing::debug!(
        name = file.name.as_str(),
        width = decoded.width(),
        height = decoded.height(),
        "decoded upload"
    );
    Ok(Image::new(
        file.name,
        payload,
        decoded.width(),
        decoded.height(),
    ))
}
