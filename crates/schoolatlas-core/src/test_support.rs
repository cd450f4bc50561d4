//! In-memory port fakes shared by service and state tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    Country, EntityType, Language, Page, PageRequest, Province, ProvinceType, School,
    SchoolSearch, SchoolType, Translation,
};
use crate::ports::{
    CatalogRemotePort, CountryDetails, CountryRepository, ProvinceRepository, RemoteError,
    RemoteResult, Repos, RepositoryError, SchoolRepository, SettingsRepository,
    TranslationRepository, WithTranslations,
};
use crate::settings::Settings;

pub fn country(id: &str, name: &str, total_schools: u32) -> Country {
    Country {
        id: id.to_string(),
        name: name.to_string(),
        code: id.to_uppercase(),
        flag_url: format!("https://flags.example/{id}.png"),
        total_schools,
        last_updated: Utc::now(),
    }
}

pub fn province(id: &str, country_id: &str, name: &str) -> Province {
    Province {
        id: id.to_string(),
        country_id: country_id.to_string(),
        name: name.to_string(),
        province_type: ProvinceType::Province,
        total_schools: 0,
        latitude: 0.0,
        longitude: 0.0,
        last_updated: Utc::now(),
    }
}

pub fn school(id: &str, province_id: &str, name: &str) -> School {
    School {
        id: id.to_string(),
        province_id: province_id.to_string(),
        name: name.to_string(),
        school_type: SchoolType::Secondary,
        description: format!("{name} description"),
        established_year: Some(1990),
        website: None,
        email: None,
        phone: None,
        address: "Main road".to_string(),
        latitude: 0.0,
        longitude: 0.0,
        annual_fees: 1000.0,
        rating: 4.0,
        acceptance_rate: None,
        image_urls: vec![],
        facilities: vec![],
        programs: vec![],
        admission_requirements: vec![],
        application_deadlines: BTreeMap::new(),
        academic_calendar: BTreeMap::new(),
        is_favorite: false,
        last_updated: Utc::now(),
    }
}

pub fn translation(entity_id: &str, entity_type: EntityType, language: Language, name: &str) -> Translation {
    Translation {
        entity_id: entity_id.to_string(),
        entity_type,
        language,
        name: name.to_string(),
        description: None,
        additional_info: BTreeMap::new(),
    }
}

#[derive(Default)]
struct StoreState {
    countries: HashMap<String, Country>,
    provinces: HashMap<String, Province>,
    schools: HashMap<String, School>,
    translations: Vec<Translation>,
    settings: Option<Settings>,
}

/// Every repository port over one in-memory map set.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    pub fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn repos(self: &Arc<Self>) -> Repos {
        Repos::new(
            Arc::clone(self) as Arc<dyn CountryRepository>,
            Arc::clone(self) as Arc<dyn ProvinceRepository>,
            Arc::clone(self) as Arc<dyn SchoolRepository>,
            Arc::clone(self) as Arc<dyn TranslationRepository>,
            Arc::clone(self) as Arc<dyn SettingsRepository>,
        )
    }

    pub async fn seed_countries(&self, countries: Vec<Country>) {
        let mut state = self.state.lock().await;
        for c in countries {
            state.countries.insert(c.id.clone(), c);
        }
    }

    pub async fn seed_provinces(&self, provinces: Vec<Province>) {
        let mut state = self.state.lock().await;
        for p in provinces {
            state.provinces.insert(p.id.clone(), p);
        }
    }

    pub async fn seed_schools(&self, schools: Vec<School>) {
        let mut state = self.state.lock().await;
        for s in schools {
            state.schools.insert(s.id.clone(), s);
        }
    }

    pub async fn seed_translations(&self, translations: Vec<Translation>) {
        self.state.lock().await.translations.extend(translations);
    }

    fn check_read(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("database is locked".to_string()));
        }
        Ok(())
    }
}

fn sorted_by_name<T>(mut items: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    items.sort_by(|a, b| name(a).cmp(name(b)));
    items
}

#[async_trait]
impl CountryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Country>, RepositoryError> {
        self.check_read()?;
        let state = self.state.lock().await;
        Ok(sorted_by_name(state.countries.values().cloned().collect(), |c| &c.name))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Country>, RepositoryError> {
        self.check_read()?;
        Ok(self.state.lock().await.countries.get(id).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<Country>, RepositoryError> {
        let needle = query.to_lowercase();
        let all = CountryRepository::list(self).await?;
        Ok(all
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn upsert_many(&self, countries: &[Country]) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().await;
        for c in countries {
            state.countries.insert(c.id.clone(), c.clone());
        }
        Ok(countries.len())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        state
            .countries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("country {id}")))
    }
}

#[async_trait]
impl ProvinceRepository for MemoryStore {
    async fn list_by_country(&self, country_id: &str) -> Result<Vec<Province>, RepositoryError> {
        self.check_read()?;
        let state = self.state.lock().await;
        let items = state
            .provinces
            .values()
            .filter(|p| p.country_id == country_id)
            .cloned()
            .collect();
        Ok(sorted_by_name(items, |p| &p.name))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Province>, RepositoryError> {
        self.check_read()?;
        Ok(self.state.lock().await.provinces.get(id).cloned())
    }

    async fn upsert_many(&self, provinces: &[Province]) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().await;
        let mut stored = 0;
        for p in provinces {
            if state.countries.contains_key(&p.country_id) {
                state.provinces.insert(p.id.clone(), p.clone());
                stored += 1;
            }
        }
        Ok(stored)
    }

    async fn delete_by_country(&self, country_id: &str) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.provinces.len();
        state.provinces.retain(|_, p| p.country_id != country_id);
        Ok((before - state.provinces.len()) as u64)
    }
}

#[async_trait]
impl SchoolRepository for MemoryStore {
    async fn list_by_province(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
    ) -> Result<Vec<School>, RepositoryError> {
        self.check_read()?;
        let state = self.state.lock().await;
        let items = state
            .schools
            .values()
            .filter(|s| s.province_id == province_id)
            .filter(|s| school_type.is_none_or(|t| s.school_type == t))
            .cloned()
            .collect();
        Ok(sorted_by_name(items, |s| &s.name))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<School>, RepositoryError> {
        self.check_read()?;
        Ok(self.state.lock().await.schools.get(id).cloned())
    }

    async fn search(&self, search: &SchoolSearch) -> Result<Vec<School>, RepositoryError> {
        self.check_read()?;
        let needle = search.query.to_lowercase();
        let state = self.state.lock().await;
        let items = state
            .schools
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .filter(|s| {
                search
                    .filters
                    .province_id
                    .as_ref()
                    .is_none_or(|p| &s.province_id == p)
            })
            .filter(|s| search.filters.school_type.is_none_or(|t| s.school_type == t))
            .cloned()
            .collect();
        Ok(sorted_by_name(items, |s| &s.name))
    }

    async fn favorites(&self) -> Result<Vec<School>, RepositoryError> {
        self.check_read()?;
        let state = self.state.lock().await;
        let items = state.schools.values().filter(|s| s.is_favorite).cloned().collect();
        Ok(sorted_by_name(items, |s| &s.name))
    }

    async fn toggle_favorite(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let school = state
            .schools
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("school {id}")))?;
        school.is_favorite = !school.is_favorite;
        Ok(school.is_favorite)
    }

    async fn upsert_many(&self, schools: &[School]) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().await;
        let mut stored = 0;
        for s in schools {
            if !state.provinces.contains_key(&s.province_id) {
                continue;
            }
            let is_favorite = state.schools.get(&s.id).is_some_and(|old| old.is_favorite);
            let mut row = s.clone();
            row.is_favorite = is_favorite;
            state.schools.insert(row.id.clone(), row);
            stored += 1;
        }
        Ok(stored)
    }

    async fn delete_by_province(&self, province_id: &str) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.schools.len();
        state.schools.retain(|_, s| s.province_id != province_id);
        Ok((before - state.schools.len()) as u64)
    }
}

#[async_trait]
impl TranslationRepository for MemoryStore {
    async fn list_for(
        &self,
        entity_type: EntityType,
        language: Language,
    ) -> Result<Vec<Translation>, RepositoryError> {
        self.check_read()?;
        let state = self.state.lock().await;
        Ok(state
            .translations
            .iter()
            .filter(|t| t.entity_type == entity_type && t.language == language)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        language: Language,
    ) -> Result<Option<Translation>, RepositoryError> {
        let all = self.list_for(entity_type, language).await?;
        Ok(all.into_iter().find(|t| t.entity_id == entity_id))
    }

    async fn upsert_many(&self, translations: &[Translation]) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().await;
        for t in translations {
            state.translations.retain(|old| {
                !(old.entity_id == t.entity_id
                    && old.entity_type == t.entity_type
                    && old.language == t.language)
            });
            state.translations.push(t.clone());
        }
        Ok(translations.len())
    }

    async fn delete_for_entity(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.translations.len();
        state
            .translations
            .retain(|t| !(t.entity_id == entity_id && t.entity_type == entity_type));
        Ok((before - state.translations.len()) as u64)
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .settings
            .clone()
            .unwrap_or_else(Settings::with_defaults))
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        self.state.lock().await.settings = Some(settings.clone());
        Ok(())
    }
}

/// Scriptable remote catalog.
#[derive(Default)]
pub struct FakeRemote {
    pub countries: Mutex<Vec<WithTranslations<Country>>>,
    pub provinces: Mutex<Vec<WithTranslations<Province>>>,
    pub schools: Mutex<Vec<WithTranslations<School>>>,
    pub offline: AtomicBool,
    pub calls: AtomicUsize,
    /// Languages requested, in call order.
    pub languages: Mutex<Vec<Language>>,
}

impl FakeRemote {
    async fn begin(&self, language: Language) -> RemoteResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.languages.lock().await.push(language);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Network {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

fn paginate(items: Vec<WithTranslations<School>>, page: PageRequest) -> Page<WithTranslations<School>> {
    let size = page.page_size.max(1) as usize;
    let total_items = items.len() as u64;
    let total_pages = items.len().div_ceil(size) as u32;
    let start = (page.page.saturating_sub(1) as usize) * size;
    Page {
        items: items.into_iter().skip(start).take(size).collect(),
        total_items,
        page: page.page,
        total_pages,
    }
}

#[async_trait]
impl CatalogRemotePort for FakeRemote {
    async fn list_countries(
        &self,
        language: Language,
    ) -> RemoteResult<Vec<WithTranslations<Country>>> {
        self.begin(language).await?;
        Ok(self.countries.lock().await.clone())
    }

    async fn get_country(&self, id: &str, language: Language) -> RemoteResult<CountryDetails> {
        self.begin(language).await?;
        let country = self
            .countries
            .lock()
            .await
            .iter()
            .find(|c| c.entity.id == id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                resource: format!("countries/{id}"),
            })?;
        let provinces = self
            .provinces
            .lock()
            .await
            .iter()
            .filter(|p| p.entity.country_id == id)
            .cloned()
            .collect();
        Ok(CountryDetails { country, provinces })
    }

    async fn list_provinces(
        &self,
        country_id: &str,
        language: Language,
    ) -> RemoteResult<Vec<WithTranslations<Province>>> {
        self.begin(language).await?;
        Ok(self
            .provinces
            .lock()
            .await
            .iter()
            .filter(|p| p.entity.country_id == country_id)
            .cloned()
            .collect())
    }

    async fn list_schools(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
        language: Language,
        page: PageRequest,
    ) -> RemoteResult<Page<WithTranslations<School>>> {
        self.begin(language).await?;
        let items = self
            .schools
            .lock()
            .await
            .iter()
            .filter(|s| s.entity.province_id == province_id)
            .filter(|s| school_type.is_none_or(|t| s.entity.school_type == t))
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn search_schools(
        &self,
        search: &SchoolSearch,
        language: Language,
        page: PageRequest,
    ) -> RemoteResult<Page<WithTranslations<School>>> {
        self.begin(language).await?;
        let needle = search.query.to_lowercase();
        let items = self
            .schools
            .lock()
            .await
            .iter()
            .filter(|s| s.entity.name.to_lowercase().contains(&needle))
            .filter(|s| search.filters.school_type.is_none_or(|t| s.entity.school_type == t))
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn get_school(
        &self,
        id: &str,
        language: Language,
    ) -> RemoteResult<WithTranslations<School>> {
        self.begin(language).await?;
        self.schools
            .lock()
            .await
            .iter()
            .find(|s| s.entity.id == id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                resource: format!("schools/{id}"),
            })
    }
}

pub fn bare<T>(entity: T) -> WithTranslations<T> {
    WithTranslations::new(entity, vec![])
}
