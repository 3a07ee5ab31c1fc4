//! API request/response types

pub mod music_selection;
pub mod pagination;
pub mod response;
pub mod search;
pub mod show;
pub mod validation;

pub use music_selection::{AddMusicSelectionRequest, MusicSelection};
pub use pagination::{Page, PageInfo, Pagination};
pub use response::ApiResponse;
pub use search::{
    SearchFilter, SearchParams, SearchResults, ShowFilter, ShowListParams, SortOrder,
};
pub use show::{CreateShowRequest, Show, ShowDetail};
pub use validation::Difficulty;
