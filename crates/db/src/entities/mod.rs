//! Database entities.

#![allow(missing_docs)]

pub mod follower;
pub mod instance;
pub mod media;
pub mod media_tag;
pub mod mod_log;
pub mod notification;
pub mod profile;
pub mod report;
pub mod status;
pub mod user;
pub mod user_filter;

pub use follower::Entity as Follower;
pub use instance::Entity as Instance;
pub use media::Entity as Media;
pub use media_tag::Entity as MediaTag;
pub use mod_log::Entity as ModLog;
pub use notification::Entity as Notification;
pub use profile::Entity as Profile;
pub use report::Entity as Report;
pub use status::Entity as Status;
pub use user::Entity as User;
pub use user_filter::Entity as UserFilter;
