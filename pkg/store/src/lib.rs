use schema::{Movie, MovieInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no movie with id {0}")]
    NotFound(i64),
}

/// Ordered in-memory movie collection. Insertion order is collection order.
#[derive(Debug, Default, Clone)]
pub struct MovieStore {
    movies: Vec<Movie>,
}

impl MovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn with_seed() -> Self {
        Self::from_movies(seed_movies())
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn list_all(&self) -> &[Movie] {
        &self.movies
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Movie> {
        self.position_of(id).map(|index| &self.movies[index])
    }

    /// Returns the first record in the given category, even when several match.
    pub fn find_by_category(&self, category: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.category == category)
    }

    pub fn append(&mut self, movie: Movie) {
        self.movies.push(movie);
        tracing::debug!(
            id = ?self.movies.last().and_then(|movie| movie.id),
            movies = self.movies.len(),
            "movie appended"
        );
    }

    /// Overwrites every writable field of the first record with `id`.
    /// The stored id is kept; the id carried by `input` is ignored.
    pub fn update_fields(&mut self, id: i64, input: MovieInput) -> Option<&Movie> {
        let index = self.position_of(id)?;
        let movie = &mut self.movies[index];
        movie.title = input.title;
        movie.overview = input.overview;
        movie.year = input.year;
        movie.rating = input.rating;
        movie.category = input.category;
        tracing::debug!(id, "movie updated");
        Some(&self.movies[index])
    }

    /// Removes the first record with `id`. The collection is untouched on a miss.
    pub fn remove(&mut self, id: i64) -> Result<Movie, StoreError> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        let removed = self.movies.remove(index);
        tracing::debug!(id, movies = self.movies.len(), "movie removed");
        Ok(removed)
    }

    fn position_of(&self, id: i64) -> Option<usize> {
        self.movies.iter().position(|movie| movie.id == Some(id))
    }
}

pub fn seed_movies() -> Vec<Movie> {
    vec![
        Movie {
            id: Some(1),
            title: "Avatar".into(),
            overview: "En un exuberante planeta llamado Pandora viven los Na'vi, seres que..."
                .into(),
            year: 2009,
            rating: 7.8,
            category: "Acción".into(),
        },
        Movie {
            id: Some(2),
            title: "It".into(),
            overview: "Bla bla bla...".into(),
            year: 2021,
            rating: 9.0,
            category: "Terror".into(),
        },
    ]
}
