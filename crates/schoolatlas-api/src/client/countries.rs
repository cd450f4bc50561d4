//! Country and province endpoints.

use schoolatlas_core::{Country, CountryDetails, Language, Province, WithTranslations};

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::{ApiCountry, ApiCountryDetails, ApiProvince};
use crate::parsing::{parse_countries, parse_country_details, parse_provinces};
use crate::url::{build_countries_url, build_country_url, build_provinces_url};

use super::CatalogClient;

impl<B: HttpBackend> CatalogClient<B> {
    pub(crate) async fn fetch_countries(
        &self,
        language: Language,
    ) -> ApiResult<Vec<WithTranslations<Country>>> {
        let url = build_countries_url(&self.config, language)?;
        let countries: Vec<ApiCountry> = self.backend.get_json(&url, language).await?;
        Ok(parse_countries(countries))
    }

    pub(crate) async fn fetch_country(
        &self,
        id: &str,
        language: Language,
    ) -> ApiResult<CountryDetails> {
        let url = build_country_url(&self.config, id, language)?;
        let details: ApiCountryDetails = self.backend.get_json(&url, language).await?;
        parse_country_details(details)
    }

    pub(crate) async fn fetch_provinces(
        &self,
        country_id: &str,
        language: Language,
    ) -> ApiResult<Vec<WithTranslations<Province>>> {
        let url = build_provinces_url(&self.config, country_id, language)?;
        let provinces: Vec<ApiProvince> = self.backend.get_json(&url, language).await?;
        parse_provinces(provinces)
    }
}
