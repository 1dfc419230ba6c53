//! The fixed set of dataset categories and the titles that belong to each.
//!
//! Declaration order of `Category::ALL` doubles as the classifier's class
//! index order, so it must match the order the model head was trained with.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Phase1,
    Phase2,
    Phase3,
    Phase4,
    Phase5,
    DisneyPlus,
    Upcoming,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Phase1,
        Category::Phase2,
        Category::Phase3,
        Category::Phase4,
        Category::Phase5,
        Category::DisneyPlus,
        Category::Upcoming,
    ];

    /// Folder name under the dataset directory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Phase1 => "phase_1",
            Category::Phase2 => "phase_2",
            Category::Phase3 => "phase_3",
            Category::Phase4 => "phase_4",
            Category::Phase5 => "phase_5",
            Category::DisneyPlus => "disney_plus",
            Category::Upcoming => "upcoming",
        }
    }

    /// Human-readable label shown in the demo UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Phase1 => "Phase 1",
            Category::Phase2 => "Phase 2",
            Category::Phase3 => "Phase 3",
            Category::Phase4 => "Phase 4",
            Category::Phase5 => "Phase 5",
            Category::DisneyPlus => "Disney Plus",
            Category::Upcoming => "Upcoming",
        }
    }

    pub fn titles(&self) -> &'static [&'static str] {
        match self {
            Category::Phase1 => &[
                "Iron Man",
                "The Incredible Hulk",
                "Iron Man 2",
                "Thor",
                "Captain America: The First Avenger",
                "The Avengers",
            ],
            Category::Phase2 => &[
                "Iron Man 3",
                "Thor: The Dark World",
                "Captain America: The Winter Soldier",
                "Guardians of the Galaxy",
                "Avengers: Age of Ultron",
                "Ant-Man",
            ],
            Category::Phase3 => &[
                "Captain America: Civil War",
                "Doctor Strange",
                "Guardians of the Galaxy Vol. 2",
                "Spider-Man: Homecoming",
                "Thor: Ragnarok",
                "Black Panther",
                "Avengers: Infinity War",
                "Ant-Man and the Wasp",
                "Captain Marvel",
                "Avengers: Endgame",
                "Spider-Man: Far From Home",
            ],
            Category::Phase4 => &[
                "Black Widow",
                "Shang-Chi and the Legend of the Ten Rings",
                "Eternals",
                "Spider-Man: No Way Home",
                "Doctor Strange in the Multiverse of Madness",
                "Thor: Love and Thunder",
                "Black Panther: Wakanda Forever",
            ],
            Category::Phase5 => &[
                "Ant-Man and the Wasp: Quantumania",
                "Guardians of the Galaxy Vol. 3",
                "The Marvels",
                "Deadpool 3",
            ],
            Category::DisneyPlus => &[
                "WandaVision",
                "The Falcon and the Winter Soldier",
                "Loki",
                "What If...?",
                "Hawkeye",
                "Moon Knight",
                "Ms. Marvel",
                "She-Hulk: Attorney at Law",
                "Werewolf by Night",
                "Secret Invasion",
                "Echo",
            ],
            Category::Upcoming => &[
                "Captain America: Brave New World",
                "Thunderbolts",
                "Blade",
                "Fantastic Four",
                "Agatha All Along",
                "Daredevil: Born Again",
                "Blade: Trinity",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_order_matches_declaration() {
        assert_eq!(Category::ALL.len(), 7);
        assert_eq!(Category::ALL[0], Category::Phase1);
        assert_eq!(Category::ALL[5], Category::DisneyPlus);
        assert_eq!(Category::ALL[6], Category::Upcoming);
    }

    #[test]
    fn test_dir_names_are_unique_and_filesystem_safe() {
        let mut seen = std::collections::HashSet::new();
        for category in Category::ALL {
            let dir = category.dir_name();
            assert!(seen.insert(dir));
            assert!(dir.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }

    #[test]
    fn test_every_category_has_titles() {
        for category in Category::ALL {
            assert!(!category.titles().is_empty());
        }
        assert!(Category::Phase1.titles().contains(&"Iron Man"));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Category::Phase1.display_name(), "Phase 1");
        assert_eq!(Category::DisneyPlus.display_name(), "Disney Plus");
    }
}
