//! Repositories wrapping sea-orm queries.

mod follower;
mod instance;
mod media;
mod media_tag;
mod mod_log;
mod notification;
mod profile;
mod report;
mod status;
mod user;
mod user_filter;

pub use follower::FollowerRepository;
pub use instance::InstanceRepository;
pub use media::MediaRepository;
pub use media_tag::MediaTagRepository;
pub use mod_log::ModLogRepository;
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
pub use report::ReportRepository;
pub use status::StatusRepository;
pub use user::UserRepository;
pub use user_filter::UserFilterRepository;
