use std::collections::HashMap;

use crate::media::Genre;

/// Genre id to name lookup, fetched once per section. An empty directory is
/// a valid state: labels simply do not render.
#[derive(Debug, Clone, Default)]
pub struct GenreDirectory {
    ordered: Vec<Genre>,
    names: HashMap<u64, String>,
}

impl GenreDirectory {
    pub fn new(genres: Vec<Genre>) -> Self {
        let names = genres
            .iter()
            .map(|genre| (genre.id, genre.name.clone()))
            .collect();
        Self {
            ordered: genres,
            names,
        }
    }

    pub fn name(&self, id: u64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Names for the given ids in id order, skipping ids the directory does
    /// not know.
    pub fn labels(&self, ids: &[u64]) -> Vec<&str> {
        ids.iter().filter_map(|id| self.name(*id)).collect()
    }

    pub fn joined_labels(&self, ids: &[u64]) -> String {
        if self.is_empty() {
            return String::new();
        }
        self.labels(ids).join(", ")
    }

    /// Genres in provider order, for the filter picker.
    pub fn genres(&self) -> &[Genre] {
        &self.ordered
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> GenreDirectory {
        GenreDirectory::new(vec![
            Genre {
                id: 28,
                name: String::from("Action"),
            },
            Genre {
                id: 12,
                name: String::from("Adventure"),
            },
        ])
    }

    #[test]
    fn test_labels_skip_unknown_ids() {
        // Arrange
        let directory = directory();

        // Act
        let labels = directory.joined_labels(&[28, 9999, 12]);

        // Assert
        assert_eq!(labels, "Action, Adventure");
    }

    #[test]
    fn test_empty_directory_yields_no_labels() {
        let directory = GenreDirectory::default();
        assert!(directory.is_empty());
        assert_eq!(directory.joined_labels(&[28]), "");
    }

    #[test]
    fn test_genres_keep_provider_order() {
        let directory = directory();
        let names: Vec<&str> = directory
            .genres()
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Action", "Adventure"]);
    }
}
