//! School listing, search and detail endpoints.

use schoolatlas_core::{Language, Page, PageRequest, School, SchoolSearch, SchoolType, WithTranslations};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::{ApiPage, ApiSchool};
use crate::parsing::{parse_school, parse_school_page};
use crate::url::{build_school_url, build_schools_url, build_search_url};

use super::CatalogClient;

impl<B: HttpBackend> CatalogClient<B> {
    pub(crate) async fn fetch_schools(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
        language: Language,
        page: PageRequest,
    ) -> ApiResult<Page<WithTranslations<School>>> {
        let url = build_schools_url(&self.config, province_id, school_type, language, page)?;
        let response: ApiPage<ApiSchool> = self.backend.get_json(&url, language).await?;
        debug!(
            province_id,
            page = response.page,
            total_pages = response.total_pages,
            "Fetched school page"
        );
        parse_school_page(response)
    }

    pub(crate) async fn fetch_search(
        &self,
        search: &SchoolSearch,
        language: Language,
        page: PageRequest,
    ) -> ApiResult<Page<WithTranslations<School>>> {
        let url = build_search_url(&self.config, search, language, page)?;
        let response: ApiPage<ApiSchool> = self.backend.get_json(&url, language).await?;
        parse_school_page(response)
    }

    pub(crate) async fn fetch_school(
        &self,
        id: &str,
        language: Language,
    ) -> ApiResult<WithTranslations<School>> {
        let url = build_school_url(&self.config, id, language)?;
        let school: ApiSchool = self.backend.get_json(&url, language).await?;
        parse_school(school, chrono::Utc::now())
    }
}
