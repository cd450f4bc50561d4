//! Catalog service: stale-while-revalidate streams for every catalog resource.
//!
//! Each public stream method wires one private [`BoundResource`] (local
//! query, remote fetch, write-through) into [`network_bound`]. The active
//! language is captured when a stream is created; changing it affects the
//! next stream only.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::{
    Country, EntityType, Language, Localized, Page, PageRequest, Paged, Province, School,
    SchoolSearch, SchoolType, Translation, localize_all,
};
use crate::ports::{
    CatalogRemotePort, CoreError, CountryDetails, RemoteError, Repos, RepositoryError,
    WithTranslations,
};
use crate::sync::{BoundResource, Resource, network_bound};

/// Stream of localized countries.
pub type CountriesStream = BoxStream<'static, Resource<Vec<Localized<Country>>>>;
/// Stream of one localized country (`None` while not cached).
pub type CountryStream = BoxStream<'static, Resource<Option<Localized<Country>>>>;
/// Stream of localized provinces.
pub type ProvincesStream = BoxStream<'static, Resource<Vec<Localized<Province>>>>;
/// Stream of one page of localized schools.
pub type SchoolPageStream = BoxStream<'static, Resource<Paged<Localized<School>>>>;
/// Stream of one localized school (`None` while not cached).
pub type SchoolStream = BoxStream<'static, Resource<Option<Localized<School>>>>;

/// Entry point for catalog reads, favorites and the active language.
#[derive(Clone)]
pub struct CatalogService {
    repos: Repos,
    remote: Arc<dyn CatalogRemotePort>,
    language: Arc<watch::Sender<Language>>,
}

impl CatalogService {
    pub fn new(repos: Repos, remote: Arc<dyn CatalogRemotePort>, language: Language) -> Self {
        let (tx, _rx) = watch::channel(language);
        Self {
            repos,
            remote,
            language: Arc::new(tx),
        }
    }

    /// The language new streams request and display.
    pub fn language(&self) -> Language {
        *self.language.borrow()
    }

    /// Observe language changes.
    pub fn subscribe_language(&self) -> watch::Receiver<Language> {
        self.language.subscribe()
    }

    /// Switch the active language and persist it in settings.
    pub async fn set_language(&self, language: Language) -> Result<(), CoreError> {
        let mut settings = self.repos.settings.load().await?;
        settings.language = Some(language);
        self.repos.settings.save(&settings).await?;
        self.language.send_replace(language);
        info!(language = %language, "Catalog language changed");
        Ok(())
    }

    fn ctx(&self) -> Ctx {
        Ctx {
            repos: self.repos.clone(),
            remote: Arc::clone(&self.remote),
            language: self.language(),
        }
    }

    pub fn countries(&self) -> CountriesStream {
        network_bound(CountriesResource { ctx: self.ctx() })
    }

    /// One country; a refresh also stores the provinces the detail embeds.
    pub fn country(&self, id: impl Into<String>) -> CountryStream {
        network_bound(CountryResource {
            ctx: self.ctx(),
            id: id.into(),
        })
    }

    pub fn provinces(&self, country_id: impl Into<String>) -> ProvincesStream {
        network_bound(ProvincesResource {
            ctx: self.ctx(),
            country_id: country_id.into(),
        })
    }

    /// One page of a province's schools.
    ///
    /// The cached emission for page 1 holds every cached school of the
    /// province; later pages have no cached emission of their own.
    /// That cached page reports no further pages, so if the refresh fails
    /// paging stays off until a later refresh succeeds.
    pub fn schools(
        &self,
        province_id: impl Into<String>,
        school_type: Option<SchoolType>,
        page: PageRequest,
    ) -> SchoolPageStream {
        network_bound(SchoolsResource {
            ctx: self.ctx(),
            province_id: province_id.into(),
            school_type,
            page,
        })
    }

    /// One page of catalog-wide search results.
    pub fn search_schools(&self, search: SchoolSearch, page: PageRequest) -> SchoolPageStream {
        network_bound(SearchResource {
            ctx: self.ctx(),
            search,
            page,
        })
    }

    pub fn school(&self, id: impl Into<String>) -> SchoolStream {
        network_bound(SchoolResource {
            ctx: self.ctx(),
            id: id.into(),
        })
    }

    /// Favorite schools from the local store; never touches the network.
    pub async fn favorites(&self) -> Result<Vec<Localized<School>>, CoreError> {
        let ctx = self.ctx();
        let schools = ctx.repos.schools.favorites().await?;
        Ok(ctx.localize(schools).await?)
    }

    /// Flip a cached school's favorite flag and return the new value.
    pub async fn toggle_favorite(&self, school_id: &str) -> Result<bool, CoreError> {
        if school_id.trim().is_empty() {
            return Err(CoreError::Validation("School id cannot be empty".to_string()));
        }
        let favorite = self.repos.schools.toggle_favorite(school_id).await?;
        debug!(school_id, favorite, "Toggled favorite");
        Ok(favorite)
    }
}

/// Everything a resource needs, owned so streams are `'static`.
#[derive(Clone)]
struct Ctx {
    repos: Repos,
    remote: Arc<dyn CatalogRemotePort>,
    language: Language,
}

impl Ctx {
    async fn localize<T>(&self, entities: Vec<T>) -> Result<Vec<Localized<T>>, RepositoryError>
    where
        T: crate::domain::Localizable,
    {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        let translations = self
            .repos
            .translations
            .list_for(T::ENTITY_TYPE, self.language)
            .await?;
        Ok(localize_all(entities, &translations))
    }

    async fn localize_one<T>(&self, entity: Option<T>) -> Result<Option<Localized<T>>, RepositoryError>
    where
        T: crate::domain::Localizable,
    {
        let Some(entity) = entity else {
            return Ok(None);
        };
        let translation = self
            .repos
            .translations
            .get(entity.entity_id(), T::ENTITY_TYPE, self.language)
            .await?;
        Ok(Some(Localized::new(entity, translation.as_ref())))
    }

    fn in_language(&self, translations: &[Translation]) -> Vec<Translation> {
        translations
            .iter()
            .filter(|t| t.language == self.language)
            .cloned()
            .collect()
    }

    async fn store_translations(&self, translations: &[Translation]) -> Result<(), RepositoryError> {
        if !translations.is_empty() {
            self.repos.translations.upsert_many(translations).await?;
        }
        Ok(())
    }

    /// Write a page of schools through and build the fresh page view.
    ///
    /// Remote rows carry no favorite flag, so the stored flags are applied.
    async fn save_school_page(
        &self,
        page: Page<WithTranslations<School>>,
    ) -> Result<Paged<Localized<School>>, RepositoryError> {
        let has_more = page.has_more();
        let number = page.page;
        let (mut schools, translations) = WithTranslations::unzip(page.items);

        let stored = self.repos.schools.upsert_many(&schools).await?;
        if stored < schools.len() {
            debug!(
                received = schools.len(),
                stored, "Some schools were not cached (province unknown)"
            );
        }
        self.store_translations(&translations).await?;

        let favorites: HashSet<String> = self
            .repos
            .schools
            .favorites()
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        for school in &mut schools {
            school.is_favorite = favorites.contains(&school.id);
        }

        let items = localize_all(schools, &self.in_language(&translations));
        Ok(Paged::new(items, number, has_more))
    }
}

struct CountriesResource {
    ctx: Ctx,
}

#[async_trait]
impl BoundResource for CountriesResource {
    type Local = Vec<Localized<Country>>;
    type Remote = Vec<WithTranslations<Country>>;

    fn describe(&self) -> String {
        "countries".to_string()
    }

    async fn query(&self) -> Result<Self::Local, RepositoryError> {
        let countries = self.ctx.repos.countries.list().await?;
        self.ctx.localize(countries).await
    }

    async fn fetch(&self) -> Result<Self::Remote, RemoteError> {
        self.ctx.remote.list_countries(self.ctx.language).await
    }

    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError> {
        let (countries, translations) = WithTranslations::unzip(remote);
        self.ctx.repos.countries.upsert_many(&countries).await?;
        self.ctx.store_translations(&translations).await?;
        Ok(None)
    }
}

struct CountryResource {
    ctx: Ctx,
    id: String,
}

#[async_trait]
impl BoundResource for CountryResource {
    type Local = Option<Localized<Country>>;
    type Remote = CountryDetails;

    fn describe(&self) -> String {
        format!("country {}", self.id)
    }

    async fn query(&self) -> Result<Self::Local, RepositoryError> {
        let country = self.ctx.repos.countries.get_by_id(&self.id).await?;
        self.ctx.localize_one(country).await
    }

    async fn fetch(&self) -> Result<Self::Remote, RemoteError> {
        self.ctx.remote.get_country(&self.id, self.ctx.language).await
    }

    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError> {
        let CountryDetails { country, provinces } = remote;
        self.ctx
            .repos
            .countries
            .upsert_many(std::slice::from_ref(&country.entity))
            .await?;
        let (provinces, province_translations) = WithTranslations::unzip(provinces);
        if !provinces.is_empty() {
            self.ctx.repos.provinces.upsert_many(&provinces).await?;
        }
        self.ctx.store_translations(&country.translations).await?;
        self.ctx.store_translations(&province_translations).await?;
        Ok(None)
    }
}

struct ProvincesResource {
    ctx: Ctx,
    country_id: String,
}

#[async_trait]
impl BoundResource for ProvincesResource {
    type Local = Vec<Localized<Province>>;
    type Remote = Vec<WithTranslations<Province>>;

    fn describe(&self) -> String {
        format!("provinces of {}", self.country_id)
    }

    async fn query(&self) -> Result<Self::Local, RepositoryError> {
        let provinces = self.ctx.repos.provinces.list_by_country(&self.country_id).await?;
        self.ctx.localize(provinces).await
    }

    async fn fetch(&self) -> Result<Self::Remote, RemoteError> {
        self.ctx
            .remote
            .list_provinces(&self.country_id, self.ctx.language)
            .await
    }

    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError> {
        let (provinces, translations) = WithTranslations::unzip(remote);
        let stored = self.ctx.repos.provinces.upsert_many(&provinces).await?;
        if stored < provinces.len() {
            debug!(
                country_id = %self.country_id,
                received = provinces.len(),
                stored,
                "Some provinces were not cached (country unknown)"
            );
        }
        self.ctx.store_translations(&translations).await?;
        Ok(None)
    }
}

struct SchoolsResource {
    ctx: Ctx,
    province_id: String,
    school_type: Option<SchoolType>,
    page: PageRequest,
}

#[async_trait]
impl BoundResource for SchoolsResource {
    type Local = Paged<Localized<School>>;
    type Remote = Page<WithTranslations<School>>;

    fn describe(&self) -> String {
        format!("schools of {} (page {})", self.province_id, self.page.page)
    }

    async fn query(&self) -> Result<Self::Local, RepositoryError> {
        if !self.page.is_first() {
            return Ok(Paged::new(Vec::new(), self.page.page, true));
        }
        let schools = self
            .ctx
            .repos
            .schools
            .list_by_province(&self.province_id, self.school_type)
            .await?;
        let items = self.ctx.localize(schools).await?;
        Ok(Paged::new(items, self.page.page, false))
    }

    async fn fetch(&self) -> Result<Self::Remote, RemoteError> {
        self.ctx
            .remote
            .list_schools(&self.province_id, self.school_type, self.ctx.language, self.page)
            .await
    }

    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError> {
        self.ctx.save_school_page(remote).await.map(Some)
    }
}

struct SearchResource {
    ctx: Ctx,
    search: SchoolSearch,
    page: PageRequest,
}

#[async_trait]
impl BoundResource for SearchResource {
    type Local = Paged<Localized<School>>;
    type Remote = Page<WithTranslations<School>>;

    fn describe(&self) -> String {
        format!("search '{}' (page {})", self.search.query, self.page.page)
    }

    async fn query(&self) -> Result<Self::Local, RepositoryError> {
        if !self.page.is_first() {
            return Ok(Paged::new(Vec::new(), self.page.page, true));
        }
        let schools = self.ctx.repos.schools.search(&self.search).await?;
        let items = self.ctx.localize(schools).await?;
        Ok(Paged::new(items, self.page.page, false))
    }

    async fn fetch(&self) -> Result<Self::Remote, RemoteError> {
        self.ctx
            .remote
            .search_schools(&self.search, self.ctx.language, self.page)
            .await
    }

    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError> {
        self.ctx.save_school_page(remote).await.map(Some)
    }
}

struct SchoolResource {
    ctx: Ctx,
    id: String,
}

#[async_trait]
impl BoundResource for SchoolResource {
    type Local = Option<Localized<School>>;
    type Remote = WithTranslations<School>;

    fn describe(&self) -> String {
        format!("school {}", self.id)
    }

    async fn query(&self) -> Result<Self::Local, RepositoryError> {
        let school = self.ctx.repos.schools.get_by_id(&self.id).await?;
        self.ctx.localize_one(school).await
    }

    async fn fetch(&self) -> Result<Self::Remote, RemoteError> {
        self.ctx.remote.get_school(&self.id, self.ctx.language).await
    }

    async fn save(&self, remote: Self::Remote) -> Result<Option<Self::Local>, RepositoryError> {
        let stored = self
            .ctx
            .repos
            .schools
            .upsert_many(std::slice::from_ref(&remote.entity))
            .await?;
        self.ctx.store_translations(&remote.translations).await?;
        if stored == 0 {
            // Not cacheable; show what the remote sent.
            let translation = self
                .ctx
                .in_language(&remote.translations)
                .into_iter()
                .find(|t| t.entity_type == EntityType::School);
            return Ok(Some(Some(Localized::new(remote.entity, translation.as_ref()))));
        }
        Ok(None)
    }
}
