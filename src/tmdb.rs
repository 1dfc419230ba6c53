use crate::config::AppConfig;
use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

const API_BASE: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedTitle {
    pub id: u64,
    pub kind: MediaKind,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
    #[serde(default)]
    media_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PosterCandidate {
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub width: u32,
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    posters: Vec<PosterCandidate>,
}

pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        if config.tmdb_api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: config.tmdb_api_key.clone(),
        })
    }

    /// Look a title up with the multi-search endpoint. First result wins; a
    /// hit that is neither a movie nor a series has no poster list and
    /// resolves to `None`.
    pub async fn resolve(&self, title: &str) -> Result<Option<ResolvedTitle>, AppError> {
        log::debug!("Resolving title: {}", title);
        let response: SearchResponse = self
            .http
            .get(format!("{}/search/multi", API_BASE))
            .bearer_auth(&self.api_key)
            .query(&[
                ("query", title),
                ("include_adult", "false"),
                ("language", "en-US"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let first = match response.results.into_iter().next() {
            Some(first) => first,
            None => return Ok(None),
        };
        let kind = match first.media_type.as_str() {
            "movie" => MediaKind::Movie,
            "tv" => MediaKind::Tv,
            other => {
                log::debug!("First search hit for '{}' is a '{}', not a poster source", title, other);
                return Ok(None);
            }
        };
        log::debug!("Resolved '{}' to {} id {}", title, kind.path_segment(), first.id);
        Ok(Some(ResolvedTitle { id: first.id, kind }))
    }

    /// All poster candidates TMDB knows for the resolved title, in upstream
    /// order.
    pub async fn poster_candidates(
        &self,
        resolved: ResolvedTitle,
    ) -> Result<Vec<PosterCandidate>, AppError> {
        let response: ImagesResponse = self
            .http
            .get(format!(
                "{}/{}/{}/images",
                API_BASE,
                resolved.kind.path_segment(),
                resolved.id
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.posters)
    }

    pub async fn download_poster(&self, file_path: &str) -> Result<Vec<u8>, AppError> {
        let bytes = self
            .http
            .get(format!("{}{}", IMAGE_BASE, file_path))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Retain candidates matching the configured language, vote and width floors.
/// Upstream ordering is preserved.
pub fn filter_candidates(
    posters: Vec<PosterCandidate>,
    config: &AppConfig,
) -> Vec<PosterCandidate> {
    posters
        .into_iter()
        .filter(|p| {
            p.iso_639_1.as_deref() == Some(config.poster_language.as_str())
                && p.vote_average >= config.min_vote_average
                && p.width >= config.min_poster_width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            tmdb_api_key: "token".into(),
            dataset_directory: "marvel_posters".into(),
            weights_path: "marvel_model.safetensors".into(),
            poster_language: "en".into(),
            min_vote_average: 5.0,
            min_poster_width: 1000,
            max_posters_per_title: 10,
            duplicate_distance: 5,
            download_delay_ms: 0,
            request_timeout_secs: 10,
            web_port: 8080,
            log_level: "info".into(),
        }
    }

    fn candidate(lang: Option<&str>, vote: f64, width: u32) -> PosterCandidate {
        PosterCandidate {
            iso_639_1: lang.map(String::from),
            vote_average: vote,
            width,
            file_path: "/poster.jpg".into(),
        }
    }

    #[test]
    fn test_filter_rejects_each_disqualifier() {
        let config = test_config();
        let posters = vec![
            candidate(Some("en"), 6.0, 2000),
            candidate(Some("fr"), 6.0, 2000),
            candidate(None, 6.0, 2000),
            candidate(Some("en"), 4.9, 2000),
            candidate(Some("en"), 6.0, 999),
        ];
        let kept = filter_candidates(posters, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].width, 2000);
    }

    #[test]
    fn test_filter_keeps_boundary_values_and_order() {
        let config = test_config();
        let posters = vec![
            candidate(Some("en"), 5.0, 1000),
            candidate(Some("en"), 9.0, 3000),
        ];
        let kept = filter_candidates(posters, &config);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].vote_average, 5.0);
        assert_eq!(kept[1].width, 3000);
    }

    #[test]
    fn test_images_response_defaults_for_sparse_json() {
        let json = serde_json::json!({
            "id": 1726,
            "posters": [
                { "file_path": "/a.jpg" },
                { "iso_639_1": "en", "vote_average": 5.4, "width": 2000, "file_path": "/b.jpg" },
                { "iso_639_1": null, "vote_average": 0, "width": 0, "file_path": "/c.jpg" }
            ]
        });
        let response: ImagesResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.posters.len(), 3);
        assert_eq!(response.posters[0].iso_639_1, None);
        assert_eq!(response.posters[0].vote_average, 0.0);
        assert_eq!(response.posters[0].width, 0);
        assert_eq!(response.posters[1].iso_639_1.as_deref(), Some("en"));
    }

    #[test]
    fn test_search_response_media_kinds() {
        let json = serde_json::json!({
            "results": [
                { "id": 1726, "media_type": "movie" },
                { "id": 84958, "media_type": "tv" },
                { "id": 3223, "media_type": "person" }
            ]
        });
        let response: SearchResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.results[0].media_type, "movie");
        assert_eq!(response.results[2].media_type, "person");
    }

    #[test]
    fn test_empty_search_response() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.results.is_empty());
    }
}
