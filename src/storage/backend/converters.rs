use crate::storage::ShortUrl;
use migration::entities::short_url;

/// Convert a SeaORM model into a ShortUrl
pub fn model_to_short_url(model: short_url::Model) -> ShortUrl {
    ShortUrl {
        uid: model.uid,
        path: model.path,
        created_by: model.created_by,
        created_at: model.created_at,
        last_seen_at: model.last_seen_at,
    }
}

/// Convert a ShortUrl into an ActiveModel for insertion.
///
/// Records are create-only; last_seen_at updates go through the batched
/// sink, never through an ActiveModel save.
pub fn short_url_to_active_model(url: &ShortUrl) -> short_url::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_url::ActiveModel {
        uid: Set(url.uid.clone()),
        path: Set(url.path.clone()),
        created_by: Set(url.created_by),
        created_at: Set(url.created_at),
        last_seen_at: Set(url.last_seen_at),
    }
}
