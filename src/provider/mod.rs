mod anilist;
mod http;

pub use anilist::{AniListProvider, Media};
