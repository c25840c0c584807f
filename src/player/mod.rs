#[cfg(feature = "audio")]
mod audio;
mod media;
mod queue;
mod store;
mod ticker;
mod user;

#[cfg(feature = "audio")]
pub use audio::RodioMedia;
pub use media::{HeadlessMedia, MediaElement};
pub use queue::{LoopMode, PlayQueue};
pub use store::{Phase, PlayerStore};
pub use ticker::Ticker;
pub use user::UserInfoStore;
