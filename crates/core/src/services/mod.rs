//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod liked_video;
pub mod user;
pub mod verification;
pub mod video;
pub mod watch_history;

pub use comment::{CommentService, CommentView, CreateCommentInput};
pub use liked_video::LikedVideoService;
pub use user::{RegisterInput, UpdateUserInput, UserService};
pub use verification::{CodeVerifier, NoOpVerifier, VerificationService};
pub use video::{CreateVideoInput, UpdateVideoInput, VideoService};
pub use watch_history::{RecordWatchInput, WatchHistoryService, WatchHistoryView};
