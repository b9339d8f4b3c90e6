//! Post creation.

use serde::Deserialize;

use crate::api::HttpTransport;
use crate::error::ApiResult;
use crate::models::{PostId, PostRecord};

/// Route of the posts collection.
pub const POSTS_ROUTE: &str = "posts";

#[derive(Debug, Deserialize)]
struct CreatedPost {
    #[serde(default)]
    id: Option<PostId>,
}

/// Submit a post. Only `201 Created` counts as success.
///
/// The id is reported when the response carries one; a 201 with an
/// unreadable body is still a success.
pub async fn create_post<T: HttpTransport>(api: &T, post: &PostRecord) -> ApiResult<Option<PostId>> {
    let response = api.post_json(POSTS_ROUTE, post).await?;

    if response.status != 201 {
        return Err(response.into_rejection());
    }

    Ok(response.json::<CreatedPost>().ok().and_then(|created| created.id))
}
