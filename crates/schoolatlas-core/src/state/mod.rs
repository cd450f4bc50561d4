//! Presentation state holders.
//!
//! Each holder drives one catalog stream, keeps the latest snapshot and its
//! view parameters (search text, filters, sort order) and publishes a
//! recomputed view through a `tokio::sync::watch` channel on every change.
//! Views are always recomputed from the full snapshot.

mod country_list;
mod debounce;
mod paged_list;
mod province_list;
mod school_detail;
mod school_list;
mod school_search;
mod status;

pub use country_list::{CountryListModel, CountryListView};
pub use debounce::{DEFAULT_DEBOUNCE, SearchDebouncer};
pub use paged_list::PagedList;
pub use province_list::{ProvinceListModel, ProvinceListView};
pub use school_detail::{SchoolDetailModel, SchoolDetailView};
pub use school_list::{SchoolListModel, SchoolListView};
pub use school_search::{SchoolSearchModel, SchoolSearchView};
pub use status::{GENERIC_ERROR_MESSAGE, LoadStatus, ViewState, user_message};
