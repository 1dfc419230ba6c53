use crate::catalog::Category;
use crate::config::AppConfig;
use crate::dedup::DuplicateFilter;
use crate::error::AppError;
use crate::tmdb::{filter_candidates, TmdbClient};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Filename stem for a title: lowercased, spaces to underscores, with
/// characters that are unsafe in filenames stripped.
pub fn safe_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Terminal state of one downloaded candidate.
enum CandidateOutcome {
    Stored(PathBuf),
    Duplicate,
    Unreadable,
}

/// Count the `<safe>_<n>.jpg` files already stored for a title and the
/// highest sequence number among them, so reruns extend the sequence instead
/// of clobbering earlier downloads.
fn existing_sequence(dir: &Path, safe: &str) -> Result<(usize, usize), AppError> {
    let prefix = format!("{}_", safe);
    let mut count = 0;
    let mut max_index = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name.strip_suffix(".jpg") else { continue };
        let Some(index) = stem.strip_prefix(&prefix) else { continue };
        if let Ok(index) = index.parse::<usize>() {
            count += 1;
            max_index = max_index.max(index);
        }
    }
    Ok((count, max_index))
}

/// Decode the temp file, consult the duplicate filter, and either promote it
/// to its final name or delete it.
fn store_if_unique(
    temp: &Path,
    folder: &Path,
    safe: &str,
    index: usize,
    filter: &mut DuplicateFilter,
) -> Result<CandidateOutcome, AppError> {
    let img = match image::open(temp) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Discarding undecodable download {:?}: {}", temp, e);
            std::fs::remove_file(temp)?;
            return Ok(CandidateOutcome::Unreadable);
        }
    };
    if filter.admit(&img) {
        let final_path = folder.join(format!("{}_{}.jpg", safe, index));
        std::fs::rename(temp, &final_path)?;
        Ok(CandidateOutcome::Stored(final_path))
    } else {
        std::fs::remove_file(temp)?;
        Ok(CandidateOutcome::Duplicate)
    }
}

/// Resolve one title and download its qualifying posters into `folder`,
/// keeping the per-title total at or below the configured cap. Returns the
/// number of posters stored by this call.
async fn harvest_title(
    client: &TmdbClient,
    config: &AppConfig,
    title: &str,
    folder: &Path,
) -> Result<usize, AppError> {
    let resolved = match client.resolve(title).await? {
        Some(resolved) => resolved,
        None => {
            log::warn!("Could not find TMDB ID for: {}", title);
            return Ok(0);
        }
    };

    let posters = client.poster_candidates(resolved).await?;
    let candidates = filter_candidates(posters, config);
    log::info!("'{}': {} qualifying poster candidates", title, candidates.len());

    let safe = safe_title(title);
    let (existing, max_index) = existing_sequence(folder, &safe)?;
    if existing >= config.max_posters_per_title {
        log::info!("'{}' already has {} posters, skipping", title, existing);
        return Ok(0);
    }

    let mut filter = DuplicateFilter::new(config.duplicate_distance);
    let seeded = filter.seed_from_dir(folder);
    log::debug!("Seeded {} existing hashes from {:?}", seeded, folder);

    let mut accepted = 0;
    let mut next_index = max_index + 1;
    for (i, candidate) in candidates.iter().enumerate() {
        if existing + accepted >= config.max_posters_per_title {
            break;
        }
        let temp_path = folder.join(format!("temp_{}_{}.jpg", safe, i + 1));
        match client.download_poster(&candidate.file_path).await {
            Ok(bytes) => std::fs::write(&temp_path, &bytes)?,
            Err(e) => {
                log::warn!("Failed to download {}: {}", candidate.file_path, e);
                continue;
            }
        }
        tokio::time::sleep(Duration::from_millis(config.download_delay_ms)).await;

        match store_if_unique(&temp_path, folder, &safe, next_index, &mut filter)? {
            CandidateOutcome::Stored(path) => {
                accepted += 1;
                next_index += 1;
                log::info!("Downloaded: {:?}", path);
            }
            CandidateOutcome::Duplicate => {
                log::debug!("Duplicate poster discarded for '{}'", title);
            }
            CandidateOutcome::Unreadable => {}
        }
    }

    log::debug!("'{}' folder now tracks {} poster hashes", title, filter.len());
    Ok(accepted)
}

/// Walk every category and title sequentially, building out the dataset.
pub async fn run(config: &AppConfig) -> Result<(), AppError> {
    let client = TmdbClient::new(config)?;
    let base = Path::new(&config.dataset_directory);
    std::fs::create_dir_all(base)?;

    let mut total = 0;
    for category in Category::ALL {
        let folder = base.join(category.dir_name());
        std::fs::create_dir_all(&folder)?;

        for title in category.titles() {
            log::info!("Searching for: {}", title);
            total += harvest_title(&client, config, title, &folder).await?;
        }
    }

    log::info!("Harvest complete: {} new posters stored", total);
    Ok(())
}
