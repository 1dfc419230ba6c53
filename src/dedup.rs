use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};
use std::path::Path;
use walkdir::WalkDir;

/// Near-duplicate detector over one category folder.
///
/// Holds the perceptual hash of every image accepted so far; a new image
/// whose minimum Hamming distance to the set is at or below the configured
/// threshold is a duplicate.
pub struct DuplicateFilter {
    hasher: Hasher,
    known: Vec<ImageHash>,
    max_distance: u32,
}

impl DuplicateFilter {
    pub fn new(max_distance: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Mean)
            .hash_size(8, 8)
            .to_hasher();
        Self {
            hasher,
            known: Vec::new(),
            max_distance,
        }
    }

    /// Hash every `.jpg` already present in `dir` (non-recursive) so posters
    /// stored by earlier runs still suppress duplicates. Unreadable files are
    /// skipped with a warning. Returns how many hashes were seeded.
    pub fn seed_from_dir(&mut self, dir: &Path) -> usize {
        let mut seeded = 0;
        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_jpg = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"));
            if !is_jpg {
                continue;
            }
            match image::open(path) {
                Ok(img) => {
                    self.known.push(self.hasher.hash_image(&img));
                    seeded += 1;
                }
                Err(e) => log::warn!("Skipping unreadable image {:?}: {}", path, e),
            }
        }
        seeded
    }

    /// Admit `img` into the set if it is not a near-duplicate of anything
    /// already known. Returns false (and leaves the set unchanged) for
    /// duplicates.
    pub fn admit(&mut self, img: &DynamicImage) -> bool {
        let hash = self.hasher.hash_image(img);
        if self.known.iter().any(|k| k.dist(&hash) <= self.max_distance) {
            return false;
        }
        self.known.push(hash);
        true
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage};

    // Half-bright/half-dark images whose mean hashes are maximally apart:
    // the two splits disagree on 32 of 64 bits.
    fn horizontal_split() -> DynamicImage {
        let img = GrayImage::from_fn(64, 64, |_, y| {
            image::Luma([if y < 32 { 255 } else { 0 }])
        });
        DynamicImage::ImageLuma8(img)
    }

    fn vertical_split() -> DynamicImage {
        let img = GrayImage::from_fn(64, 64, |x, _| {
            image::Luma([if x < 32 { 255 } else { 0 }])
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_identical_image_is_rejected() {
        let mut filter = DuplicateFilter::new(5);
        assert!(filter.admit(&horizontal_split()));
        assert!(!filter.admit(&horizontal_split()));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_distinct_images_are_accepted() {
        let mut filter = DuplicateFilter::new(5);
        assert!(filter.admit(&horizontal_split()));
        assert!(filter.admit(&vertical_split()));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_first_image_is_always_unique() {
        let mut filter = DuplicateFilter::new(5);
        assert_eq!(filter.len(), 0);
        assert!(filter.admit(&vertical_split()));
    }

    #[test]
    fn test_seed_from_dir_counts_existing_jpgs() {
        let dir = std::env::temp_dir().join("dedup_seed_test");
        std::fs::create_dir_all(&dir).unwrap();
        horizontal_split().to_rgb8().save(dir.join("stored_1.jpg")).unwrap();
        vertical_split().to_rgb8().save(dir.join("stored_2.jpg")).unwrap();
        std::fs::write(dir.join("notes.txt"), b"not an image").unwrap();

        let mut filter = DuplicateFilter::new(5);
        assert_eq!(filter.seed_from_dir(&dir), 2);
        assert!(!filter.admit(&horizontal_split()));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
