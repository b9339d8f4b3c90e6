//! Featured image upload.
//!
//! Downloads an image from its public URL and registers the bytes with the
//! media endpoint. A missing URL is not an error: the post simply goes out
//! without featured media.

use reqwest::Url;

use crate::api::{Created, FileUpload, HttpTransport};
use crate::error::{ApiError, MediaError};
use crate::models::MediaId;

/// Route of the media library.
pub const MEDIA_ROUTE: &str = "media";

/// Filename used when the URL path has no last segment.
const FALLBACK_FILENAME: &str = "image";

/// A media asset created from a row's image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub id: MediaId,
    pub filename: String,
}

/// Upload the image behind `image_url`, if there is one.
///
/// Returns `Ok(None)` without touching the network when the reference is
/// absent or blank. The download must answer 200 and the upload 201;
/// anything else is a [`MediaError`] for the caller to report.
pub async fn upload_featured_image<T: HttpTransport>(
    api: &T,
    image_url: Option<&str>,
) -> Result<Option<UploadedMedia>, MediaError> {
    let Some(url) = image_url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let fetch_error = |source| MediaError::Fetch {
        url: url.to_string(),
        source,
    };

    let image = api.download(url).await.map_err(fetch_error)?;
    if image.status != 200 {
        return Err(fetch_error(ApiError::rejected(image.status, "")));
    }

    let filename = filename_from_url(url);
    let upload_error = |source| MediaError::Upload {
        filename: filename.clone(),
        source,
    };

    let file = FileUpload {
        filename: filename.clone(),
        content_type: content_type_for(&filename),
        bytes: image.body,
    };

    let response = api.post_file(MEDIA_ROUTE, file).await.map_err(upload_error)?;
    if response.status != 201 {
        return Err(upload_error(response.into_rejection()));
    }

    let created: Created = response.json().map_err(upload_error)?;
    Ok(Some(UploadedMedia {
        id: created.id,
        filename,
    }))
}

/// Last segment of the URL path, e.g. `cover.png` for
/// `https://cdn.example/a/cover.png?w=800`.
pub fn filename_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// MIME type for the upload, from the file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
