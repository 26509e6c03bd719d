//! Business logic services.

#![allow(missing_docs)]

pub mod media;
pub mod mod_log;
pub mod profile;
pub mod registration;
pub mod status;
pub mod user;
pub mod user_filter;
pub mod username;

pub use media::{
    CURRENT_MEDIA_VERSION, DEFAULT_BLURHASH, MediaRepresentation, MediaService,
    MediaStorageQueue, MediaStorageService, MediaType, NoOpMediaStorageQueue, Orientation,
    StoreOutcome, UploadMediaInput,
};
pub use mod_log::{
    CreateModLogInput, MODLOG_ITEM_TYPE, MODLOG_NOTIFICATION_ACTION, ModLogEvent, ModLogService,
};
pub use profile::{COUNT_CACHE_TTL_SECS, ProfileService, format_count_short};
pub use registration::{
    Registered, RegistrationForm, RegistrationPolicy, RegistrationService, validate_form,
};
pub use status::{StatusContext, StatusService};
pub use user::UserService;
pub use user_filter::{UserFilterService, normalize_domain};
pub use username::{UsernameError, UsernameValidator, validate_username};
