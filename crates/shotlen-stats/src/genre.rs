use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
}

impl Genre {
    pub const ALL: [Genre; 3] = [Genre::Action, Genre::Comedy, Genre::Drama];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
        }
    }

    /// Title fragments that label a corpus movie with this genre.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Genre::Action => ACTION_KEYWORDS,
            Genre::Comedy => COMEDY_KEYWORDS,
            Genre::Drama => DRAMA_KEYWORDS,
        }
    }

    pub fn matches(self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords()
            .iter()
            .any(|keyword| title.contains(&keyword.to_lowercase()))
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ACTION_KEYWORDS: &[&str] = &[
    "Harry Potter",
    "Indiana Jones",
    "Vantage Point",
    "Quantum of Solace",
    "Men in black",
    "Spider-Man",
    "Iron Man",
    "Avatar",
    "Skyfall",
    "The Dark Knight",
    "Inception",
    "Matrix",
    "Star Wars",
    "Fast and Furious",
    "Mission Impossible",
    "Hunger Games",
    "Transformers",
    "X-Men",
    "Avengers",
];

const COMEDY_KEYWORDS: &[&str] = &[
    "This is 40",
    "Yes man",
    "Identity Thief",
    "Horrible Bosses",
    "The Ugly Truth",
    "27 Dresses",
    "Marley and me",
    "Juno",
    "Crazy Stupid Love",
    "Chasing Amy",
    "Superbad",
    "Hangover",
    "Bridesmaids",
    "Knocked Up",
    "Step Brothers",
    "Anchorman",
];

const DRAMA_KEYWORDS: &[&str] = &[
    "Gran Torino",
    "Benjamin Button",
    "Amadeus",
    "American Beauty",
    "Forrest Gump",
    "Gandhi",
    "Schindler",
    "Shawshank",
    "Godfather",
    "Pulp Fiction",
    "Fight Club",
    "Goodfellas",
    "Social Network",
    "Moonlight",
    "Parasite",
    "Nomadland",
    "Spotlight",
    "Birdman",
    "12 Years a Slave",
    "Argo",
    "Kings Speech",
    "Slumdog Millionaire",
];

/// Every genre whose keyword table matches the title. Labels are not mutually
/// exclusive: a title may land in several subsets.
pub fn genres_for_title(title: &str) -> Vec<Genre> {
    Genre::ALL
        .into_iter()
        .filter(|genre| genre.matches(title))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSubset {
    pub genre: Genre,
    pub titles: Vec<String>,
    pub durations: Vec<f64>,
}

impl GenreSubset {
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// Partition labelled movies into one subset per genre, in `Genre::ALL` order.
/// Genres with no matching movie are still present with empty collections.
pub fn genre_subsets<'a, I>(movies: I) -> Vec<GenreSubset>
where
    I: IntoIterator<Item = (&'a str, &'a [f64])>,
{
    let mut subsets: Vec<GenreSubset> = Genre::ALL
        .into_iter()
        .map(|genre| GenreSubset {
            genre,
            titles: Vec::new(),
            durations: Vec::new(),
        })
        .collect();
    for (title, durations) in movies {
        for genre in genres_for_title(title) {
            let subset = &mut subsets[genre as usize];
            subset.titles.push(title.to_string());
            subset.durations.extend_from_slice(durations);
        }
    }
    subsets
}
