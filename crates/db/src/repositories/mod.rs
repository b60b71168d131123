//! Database repositories.

pub mod comment;
pub mod liked_video;
pub mod user;
pub mod video;
pub mod watch_history;

pub use comment::CommentRepository;
pub use liked_video::LikedVideoRepository;
pub use user::UserRepository;
pub use video::VideoRepository;
pub use watch_history::WatchHistoryRepository;
