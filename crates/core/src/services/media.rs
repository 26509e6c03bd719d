//! Media uploads, their API representation, and the storage pipeline.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fedigram_common::{
    AppError, AppResult, IdGenerator, StorageBackend, config::MediaConfig, generate_storage_key,
};
use fedigram_db::{
    entities::{media, profile},
    repositories::MediaRepository,
};
use fedigram_federation::UrlConfig;
use sea_orm::{IntoActiveModel, Set};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Placeholder blurhash for media without one.
pub const DEFAULT_BLURHASH: &str = "U4Rfzst8?bt7ogayj[j[~pfQ9Goe%Mj[WBay";

/// Version written for new uploads. Filters only exist in version 1.
pub const CURRENT_MEDIA_VERSION: i32 = 3;

const LEGACY_FILTER_VERSION: i32 = 1;

/// Submits media storage work to the background.
#[async_trait]
pub trait MediaStorageQueue: Send + Sync {
    /// Schedule `MediaStorageService::store` for a media id.
    async fn enqueue_store(&self, media_id: i64) -> AppResult<()>;
}

/// Queue that drops every task.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMediaStorageQueue;

#[async_trait]
impl MediaStorageQueue for NoOpMediaStorageQueue {
    async fn enqueue_store(&self, media_id: i64) -> AppResult<()> {
        debug!(media_id, "Media storage queue disabled, skipping");
        Ok(())
    }
}

/// Orientation derived from pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    #[must_use]
    pub const fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else if width < height {
            Self::Portrait
        } else {
            Self::Square
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Square => "square",
        }
    }
}

/// `ActivityStreams` object type of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaType {
    /// Classify by MIME type; anything unrecognised is a document.
    #[must_use]
    pub fn from_mime(mime: Option<&str>) -> Self {
        let major = mime
            .and_then(|m| m.split('/').next())
            .map(str::to_ascii_lowercase);
        match major.as_deref() {
            Some("image") => Self::Image,
            Some("video") => Self::Video,
            Some("audio") => Self::Audio,
            _ => Self::Document,
        }
    }
}

/// Read pixel dimensions from encoded image bytes.
#[must_use]
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct UploadMediaInput {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub is_nsfw: bool,
}

/// Canonical JSON shape of a media attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRepresentation {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    pub remote_url: Option<String>,
    pub preview_url: String,
    pub optimized_url: Option<String>,
    pub text_url: Option<String>,
    pub meta: Option<MediaMeta>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub is_nsfw: bool,
    pub orientation: Option<String>,
    pub filter_name: Option<String>,
    pub filter_class: Option<String>,
    pub mime: Option<String>,
    pub blurhash: String,
}

/// Dimension metadata of a media attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaMeta {
    pub focus: FocusPoint,
    pub original: OriginalSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FocusPoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginalSize {
    pub width: i32,
    pub height: i32,
    pub size: String,
    pub aspect: f64,
}

/// Media service for uploads and representation.
#[derive(Clone)]
pub struct MediaService {
    media_repo: MediaRepository,
    storage: Arc<dyn StorageBackend>,
    queue: Arc<dyn MediaStorageQueue>,
    id_gen: IdGenerator,
    max_upload_size: usize,
    urls: UrlConfig,
}

impl MediaService {
    /// Create a new media service. `storage` is the local backend uploads land in.
    #[must_use]
    pub fn new(
        media_repo: MediaRepository,
        storage: Arc<dyn StorageBackend>,
        queue: Arc<dyn MediaStorageQueue>,
        id_gen: IdGenerator,
        config: &MediaConfig,
        urls: UrlConfig,
    ) -> Self {
        Self {
            media_repo,
            storage,
            queue,
            id_gen,
            max_upload_size: config.max_upload_size,
            urls,
        }
    }

    /// Largest accepted upload in bytes.
    #[must_use]
    pub const fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// Store an upload for `owner` and schedule the storage pipeline.
    pub async fn upload(
        &self,
        owner: &profile::Model,
        input: UploadMediaInput,
    ) -> AppResult<media::Model> {
        if input.data.is_empty() {
            return Err(AppError::BadRequest("Empty file".to_string()));
        }
        if input.data.len() > self.max_upload_size {
            return Err(AppError::BadRequest(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_upload_size
            )));
        }

        let media_type = MediaType::from_mime(Some(&input.content_type));
        let dimensions = match media_type {
            MediaType::Image => Some(image_dimensions(&input.data).ok_or_else(|| {
                AppError::BadRequest("The file is not a readable image".to_string())
            })?),
            MediaType::Video => None,
            MediaType::Audio | MediaType::Document => {
                return Err(AppError::BadRequest(format!(
                    "Unsupported media type: {}",
                    input.content_type
                )));
            }
        };

        let key = generate_storage_key(owner.id, &input.filename);
        let uploaded = self
            .storage
            .upload(&key, &input.data, &input.content_type)
            .await?;

        let now = Utc::now().fixed_offset();
        let model = media::ActiveModel {
            id: Set(self.id_gen.generate()),
            status_id: Set(None),
            profile_id: Set(owner.id),
            media_path: Set(Some(uploaded.key)),
            remote_url: Set(None),
            remote_media: Set(false),
            cdn_url: Set(None),
            thumbnail_path: Set(None),
            thumbnail_url: Set(None),
            optimized_url: Set(None),
            caption: Set(input.description),
            license: Set(input.license),
            is_nsfw: Set(input.is_nsfw),
            orientation: Set(dimensions
                .map(|(w, h)| Orientation::from_dimensions(w, h).as_str().to_string())),
            filter_name: Set(None),
            filter_class: Set(None),
            mime: Set(Some(uploaded.content_type)),
            size: Set(Some(uploaded.size as i64)),
            width: Set(dimensions.map(|(w, _)| w as i32)),
            height: Set(dimensions.map(|(_, h)| h as i32)),
            blurhash: Set(None),
            version: Set(CURRENT_MEDIA_VERSION),
            order: Set(1),
            created_at: Set(now),
            updated_at: Set(None),
        };
        let media = self.media_repo.create(model).await?;

        info!(
            media_id = media.id,
            profile_id = owner.id,
            size = media.size,
            mime = media.mime.as_deref().unwrap_or_default(),
            "Media uploaded"
        );

        // The local copy keeps serving until the pipeline runs.
        if let Err(e) = self.queue.enqueue_store(media.id).await {
            warn!(media_id = media.id, error = %e, "Failed to enqueue media storage");
        }

        Ok(media)
    }

    /// Get a media record.
    pub async fn get(&self, id: i64) -> AppResult<media::Model> {
        self.media_repo.get_by_id(id).await
    }

    /// Media attached to a status, in display order.
    pub async fn find_by_status(&self, status_id: i64) -> AppResult<Vec<media::Model>> {
        self.media_repo.find_by_status(status_id).await
    }

    fn absolute(&self, url: String) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url
        } else {
            self.urls.url(&url)
        }
    }

    /// Public URL of the full-size file.
    #[must_use]
    pub fn url(&self, media: &media::Model) -> String {
        if let Some(cdn) = &media.cdn_url {
            return cdn.clone();
        }
        if let (true, Some(remote)) = (media.remote_media, &media.remote_url) {
            return remote.clone();
        }
        match &media.media_path {
            Some(path) => self.absolute(self.storage.public_url(path)),
            None => media.remote_url.clone().unwrap_or_default(),
        }
    }

    /// Public URL of the preview image, falling back to the full-size file.
    #[must_use]
    pub fn thumbnail_url(&self, media: &media::Model) -> String {
        if let Some(url) = &media.thumbnail_url {
            return url.clone();
        }
        match &media.thumbnail_path {
            Some(path) if !media.remote_media => self.absolute(self.storage.public_url(path)),
            _ => self.url(media),
        }
    }

    /// Canonical API representation.
    #[must_use]
    pub fn represent(&self, media: &media::Model) -> MediaRepresentation {
        let meta = match (media.width, media.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => Some(MediaMeta {
                focus: FocusPoint { x: 0, y: 0 },
                original: OriginalSize {
                    width,
                    height,
                    size: format!("{width}x{height}"),
                    aspect: f64::from(width) / f64::from(height),
                },
            }),
            _ => None,
        };

        MediaRepresentation {
            id: media.id.to_string(),
            media_type: MediaType::from_mime(media.mime.as_deref()),
            url: self.url(media),
            remote_url: None,
            preview_url: self.thumbnail_url(media),
            optimized_url: media.optimized_url.clone(),
            text_url: None,
            meta,
            description: media.caption.clone(),
            license: media.license.clone(),
            is_nsfw: media.is_nsfw,
            orientation: media.orientation.clone(),
            filter_name: media.filter_name.clone(),
            filter_class: if media.version == LEGACY_FILTER_VERSION {
                media.filter_class.clone()
            } else {
                None
            },
            mime: media.mime.clone(),
            blurhash: media
                .blurhash
                .clone()
                .unwrap_or_else(|| DEFAULT_BLURHASH.to_string()),
        }
    }
}

/// What the storage pipeline did with a media record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Copied to cloud storage.
    Stored { cdn_url: String },
    /// Remote media is never copied.
    SkippedRemote,
    /// A CDN URL is already recorded.
    SkippedAlreadyStored,
    /// Cloud storage is off; the local copy stays authoritative.
    SkippedCloudDisabled,
    /// No local file to copy.
    SkippedMissingFile,
}

/// Moves uploaded media to cloud storage.
#[derive(Clone)]
pub struct MediaStorageService {
    media_repo: MediaRepository,
    local: Arc<dyn StorageBackend>,
    cloud: Option<Arc<dyn StorageBackend>>,
    delete_local: bool,
}

impl MediaStorageService {
    /// Create the service. `cloud` is ignored unless cloud storage is enabled.
    #[must_use]
    pub fn new(
        media_repo: MediaRepository,
        local: Arc<dyn StorageBackend>,
        cloud: Option<Arc<dyn StorageBackend>>,
        config: &MediaConfig,
    ) -> Self {
        Self {
            media_repo,
            local,
            cloud: cloud.filter(|_| config.cloud_storage),
            delete_local: config.delete_local_after_cloud,
        }
    }

    /// Push a media file to cloud storage and record its CDN URL.
    pub async fn store(&self, media_id: i64) -> AppResult<StoreOutcome> {
        let media = self.media_repo.get_by_id(media_id).await?;

        if media.remote_media {
            debug!(media_id, "Remote media, nothing to store");
            return Ok(StoreOutcome::SkippedRemote);
        }
        if media.cdn_url.is_some() {
            debug!(media_id, "Media already in cloud storage");
            return Ok(StoreOutcome::SkippedAlreadyStored);
        }
        let Some(cloud) = &self.cloud else {
            return Ok(StoreOutcome::SkippedCloudDisabled);
        };
        let Some(path) = media.media_path.clone() else {
            warn!(media_id, "Local media without a path");
            return Ok(StoreOutcome::SkippedMissingFile);
        };
        if !self.local.exists(&path).await? {
            warn!(media_id, path = %path, "Local media file is missing");
            return Ok(StoreOutcome::SkippedMissingFile);
        }

        let data = self.local.read(&path).await?;
        let content_type = media
            .mime
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let uploaded = cloud.upload(&path, &data, &content_type).await?;

        let mut active = media.into_active_model();
        active.cdn_url = Set(Some(uploaded.url.clone()));
        active.updated_at = Set(Some(Utc::now().fixed_offset()));
        self.media_repo.update(active).await?;

        if self.delete_local {
            self.local.delete(&path).await?;
        }

        info!(media_id, cdn_url = %uploaded.url, "Media stored in cloud");
        Ok(StoreOutcome::Stored {
            cdn_url: uploaded.url,
        })
    }
}
