use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{ConfigError, FetchError};
use crate::listing::{SectionKind, TimeWindow};
use crate::media::{
    Genre, MediaId, MediaKind, TitleDetail, TitleSummary, TmdbTitleDetail, TmdbTitleResult, Video,
};
use crate::settings::AppSettings;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";
const DEFAULT_LANGUAGE: &str = "en-US";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    Backdrop,
}

impl ImageSize {
    fn token(self) -> &'static str {
        match self {
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "w780",
        }
    }
}

/// CDN URL for a provider-relative image path, or the placeholder when the
/// title has no such image.
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with('/') => format!("{}/{}{}", IMAGE_BASE_URL, size.token(), p),
        Some(p) => format!("{}/{}/{}", IMAGE_BASE_URL, size.token(), p),
        None => String::from(PLACEHOLDER_IMAGE_URL),
    }
}

#[derive(Debug, Deserialize)]
struct TmdbErrorResponse {
    status_message: String,
}

#[derive(Clone)]
pub struct TmdbClient {
    api_key: String,
    language: String,
    base_url: Url,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct TmdbClientBuilder {
    api_key: Option<String>,
    language: Option<String>,
    base_url: Option<String>,
}

impl TmdbClientBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Overrides the API root, e.g. a caching proxy or a mock server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Fails fast when the credential is absent or blank: a client without a
    /// key is never constructed.
    pub fn build(self) -> Result<TmdbClient, ConfigError> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let language = self
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE));

        let mut raw_base = self
            .base_url
            .unwrap_or_else(|| String::from(DEFAULT_BASE_URL));
        if !raw_base.ends_with('/') {
            raw_base.push('/');
        }
        let base_url =
            Url::parse(&raw_base).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(TmdbClient {
            api_key,
            language,
            base_url,
            http_client,
        })
    }
}

impl TmdbClient {
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, ConfigError> {
        let mut builder = Self::builder().language(settings.language.clone());
        if let Some(key) = settings.effective_api_key() {
            builder = builder.api_key(key);
        }
        if let Some(url) = &settings.base_url {
            builder = builder.base_url(url.clone());
        }
        builder.build()
    }

    async fn fetch_value(&self, path: &str) -> Result<Value, FetchError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::Network(format!("invalid endpoint {path}: {e}")))?;

        tracing::debug!(endpoint = path, "TMDB request");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbErrorResponse>(&body)
                .map(|e| e.status_message)
                .unwrap_or(body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn fetch_titles(
        &self,
        path: &str,
        kind: MediaKind,
    ) -> Result<Vec<TitleSummary>, FetchError> {
        let body = self.fetch_value(path).await?;
        parse_title_list(body, kind)
    }

    pub async fn popular_movies(&self) -> Result<Vec<TitleSummary>, FetchError> {
        self.fetch_titles("/movie/popular", MediaKind::Movie).await
    }

    pub async fn top_rated_movies(&self) -> Result<Vec<TitleSummary>, FetchError> {
        self.fetch_titles("/movie/top_rated", MediaKind::Movie).await
    }

    pub async fn trending_movies(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<TitleSummary>, FetchError> {
        self.fetch_titles(&format!("/trending/movie/{}", window.path()), MediaKind::Movie)
            .await
    }

    pub async fn popular_series(&self) -> Result<Vec<TitleSummary>, FetchError> {
        self.fetch_titles("/tv/popular", MediaKind::Series).await
    }

    pub async fn top_rated_series(&self) -> Result<Vec<TitleSummary>, FetchError> {
        self.fetch_titles("/tv/top_rated", MediaKind::Series).await
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, FetchError> {
        let body = self.fetch_value("/genre/movie/list").await?;
        let genres = take_array(body, "genres")?;
        serde_json::from_value(genres).map_err(|e| FetchError::DataShape(e.to_string()))
    }

    async fn fetch_detail(&self, id: MediaId, kind: MediaKind) -> Result<TitleDetail, FetchError> {
        let body = self.fetch_value(&format!("/{}/{}", kind.path(), id)).await?;
        let detail: TmdbTitleDetail =
            serde_json::from_value(body).map_err(|e| FetchError::DataShape(e.to_string()))?;
        Ok(detail.into_detail(kind))
    }

    async fn fetch_videos(&self, id: MediaId, kind: MediaKind) -> Result<Vec<Video>, FetchError> {
        let body = self
            .fetch_value(&format!("/{}/{}/videos", kind.path(), id))
            .await?;
        let results = take_array(body, "results")?;
        serde_json::from_value(results).map_err(|e| FetchError::DataShape(e.to_string()))
    }

    pub async fn movie_details(&self, id: MediaId) -> Result<TitleDetail, FetchError> {
        self.fetch_detail(id, MediaKind::Movie).await
    }

    pub async fn movie_videos(&self, id: MediaId) -> Result<Vec<Video>, FetchError> {
        self.fetch_videos(id, MediaKind::Movie).await
    }

    pub async fn series_details(&self, id: MediaId) -> Result<TitleDetail, FetchError> {
        self.fetch_detail(id, MediaKind::Series).await
    }

    pub async fn series_videos(&self, id: MediaId) -> Result<Vec<Video>, FetchError> {
        self.fetch_videos(id, MediaKind::Series).await
    }

    pub async fn details(&self, id: MediaId, kind: MediaKind) -> Result<TitleDetail, FetchError> {
        match kind {
            MediaKind::Movie => self.movie_details(id).await,
            MediaKind::Series => self.series_details(id).await,
        }
    }

    pub async fn videos(&self, id: MediaId, kind: MediaKind) -> Result<Vec<Video>, FetchError> {
        match kind {
            MediaKind::Movie => self.movie_videos(id).await,
            MediaKind::Series => self.series_videos(id).await,
        }
    }
}

fn take_array(body: Value, field: &str) -> Result<Value, FetchError> {
    match body {
        Value::Object(mut map) => match map.remove(field) {
            Some(value @ Value::Array(_)) => Ok(value),
            Some(_) => Err(FetchError::DataShape(format!("`{field}` is not an array"))),
            None => Err(FetchError::DataShape(format!("missing `{field}` array"))),
        },
        _ => Err(FetchError::DataShape(String::from("body is not an object"))),
    }
}

/// Decodes a list payload. A body without a `results` array is a shape error,
/// never a partial or empty result.
pub fn parse_title_list(body: Value, kind: MediaKind) -> Result<Vec<TitleSummary>, FetchError> {
    let results = take_array(body, "results")?;
    let results: Vec<TmdbTitleResult> =
        serde_json::from_value(results).map_err(|e| FetchError::DataShape(e.to_string()))?;
    Ok(results
        .into_iter()
        .map(|result| result.into_summary(kind))
        .collect())
}

pub async fn load_section(
    client: TmdbClient,
    section: SectionKind,
    window: Option<TimeWindow>,
) -> Result<Vec<TitleSummary>, FetchError> {
    match section {
        SectionKind::Trending => client.trending_movies(window.unwrap_or_default()).await,
        SectionKind::TopRatedMovies => client.top_rated_movies().await,
        SectionKind::PopularMovies => client.popular_movies().await,
        SectionKind::TopRatedSeries => client.top_rated_series().await,
        SectionKind::PopularSeries => client.popular_series().await,
    }
}

pub async fn load_genres(client: TmdbClient) -> Result<Vec<Genre>, FetchError> {
    client.genres().await
}

pub async fn fetch_image_bytes(url: String) -> Result<Vec<u8>, String> {
    reqwest::get(&url)
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}
