//! Read-only content catalog.
//!
//! The core never mutates catalog data; it only queries it through
//! [`ContentProvider`] and derives filtered views from the current
//! selection on every call.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, ParseError};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EpisodeId(pub String);

impl EpisodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EpisodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::English, Self::Spanish];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
        }
    }

    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::English => "🇺🇸",
            Self::Spanish => "🇪🇸",
        }
    }
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.label() == s)
            .ok_or_else(|| ParseError::UnknownLanguage(s.to_owned()))
    }
}

/// CEFR level. Declaration order is the proficiency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
}

impl Level {
    pub const ALL: [Self; 4] = [Self::A1, Self::A2, Self::B1, Self::B2];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseError::UnknownLevel(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Travel,
    Food,
    Work,
    #[serde(rename = "Daily Life")]
    DailyLife,
    Culture,
    Tech,
    Books,
    Relationships,
}

impl Topic {
    pub const ALL: [Self; 8] = [
        Self::Travel,
        Self::Food,
        Self::Work,
        Self::DailyLife,
        Self::Culture,
        Self::Tech,
        Self::Books,
        Self::Relationships,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "Travel",
            Self::Food => "Food",
            Self::Work => "Work",
            Self::DailyLife => "Daily Life",
            Self::Culture => "Culture",
            Self::Tech => "Tech",
            Self::Books => "Books",
            Self::Relationships => "Relationships",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError::UnknownTopic(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    pub id: Topic,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub id: Level,
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Offset from the start of the episode, in seconds.
    pub time: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub definition: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: EpisodeId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub topic: Topic,
    pub level: Level,
    /// Display string such as `"5:30"`; never parsed by the core.
    pub duration: String,
    pub image_url: String,
    pub transcript: Vec<TranscriptLine>,
    #[serde(default)]
    pub vocab: Vec<VocabEntry>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

impl Episode {
    #[must_use]
    pub fn matches(&self, topic: Option<Topic>, level: Option<Level>) -> bool {
        topic.map_or(true, |t| self.topic == t) && level.map_or(true, |l| self.level == l)
    }
}

/// Query interface the core consumes. Implementations must be deterministic
/// and return the same ordering on every call.
pub trait ContentProvider: Send + Sync {
    fn list_episodes(&self) -> &[Episode];
    fn list_topics(&self) -> &[TopicInfo];
    fn list_levels(&self) -> &[LevelInfo];

    fn find(&self, id: &EpisodeId) -> Option<&Episode> {
        self.list_episodes().iter().find(|e| &e.id == id)
    }

    fn filtered(&self, topic: Option<Topic>, level: Option<Level>) -> Vec<&Episode> {
        self.list_episodes()
            .iter()
            .filter(|e| e.matches(topic, level))
            .collect()
    }

    /// The filtered list, or the whole catalog when nothing matches.
    fn display_list(&self, topic: Option<Topic>, level: Option<Level>) -> Vec<&Episode> {
        let filtered = self.filtered(topic, level);
        if filtered.is_empty() {
            self.list_episodes().iter().collect()
        } else {
            filtered
        }
    }

    fn daily_pick(&self, topic: Option<Topic>, level: Option<Level>) -> Option<&Episode> {
        self.display_list(topic, level).first().copied()
    }

    fn latest(&self, topic: Option<Topic>, level: Option<Level>) -> Vec<&Episode> {
        self.display_list(topic, level).into_iter().skip(1).collect()
    }

    /// Resolves ids in order, dropping any that are no longer in the catalog.
    fn resolve_ids(&self, ids: &[EpisodeId]) -> Vec<&Episode> {
        ids.iter().filter_map(|id| self.find(id)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    episodes: Vec<Episode>,
    topics: Vec<TopicInfo>,
    levels: Vec<LevelInfo>,
}

impl Catalog {
    pub fn new(
        episodes: Vec<Episode>,
        topics: Vec<TopicInfo>,
        levels: Vec<LevelInfo>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(episodes.len());
        for episode in &episodes {
            if !seen.insert(&episode.id) {
                return Err(CatalogError::DuplicateEpisode(episode.id.clone()));
            }
        }
        Ok(Self {
            episodes,
            topics,
            levels,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Self = serde_json::from_str(json)?;
        Self::new(raw.episodes, raw.topics, raw.levels)
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            episodes: builtin_episodes(),
            topics: builtin_topics(),
            levels: builtin_levels(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ContentProvider for Catalog {
    fn list_episodes(&self) -> &[Episode] {
        &self.episodes
    }

    fn list_topics(&self) -> &[TopicInfo] {
        &self.topics
    }

    fn list_levels(&self) -> &[LevelInfo] {
        &self.levels
    }
}

fn topic(id: Topic, label: &str, icon: &str) -> TopicInfo {
    TopicInfo {
        id,
        label: label.into(),
        icon: icon.into(),
    }
}

fn builtin_topics() -> Vec<TopicInfo> {
    vec![
        topic(Topic::Travel, "Travel", "Plane"),
        topic(Topic::Food, "Food", "Utensils"),
        topic(Topic::Work, "Work", "Briefcase"),
        topic(Topic::DailyLife, "Daily Life", "Coffee"),
        topic(Topic::Culture, "Culture", "Globe"),
        topic(Topic::Tech, "Tech", "Cpu"),
        topic(Topic::Books, "Reading", "BookOpen"),
        topic(Topic::Relationships, "Relationships", "Heart"),
    ]
}

fn level(id: Level, title: &str, subtitle: &str, description: &str) -> LevelInfo {
    LevelInfo {
        id,
        title: title.into(),
        subtitle: subtitle.into(),
        description: description.into(),
    }
}

fn builtin_levels() -> Vec<LevelInfo> {
    vec![
        level(Level::A1, "Entry Level", "Beginner", "Short sentences, slow speed"),
        level(Level::A2, "Elementary", "Elementary", "Daily scenarios, common words"),
        level(Level::B1, "Intermediate", "Intermediate", "Opinions, natural flow"),
        level(
            Level::B2,
            "Upper Interm.",
            "Upper Intermediate",
            "Complex ideas, native speed",
        ),
    ]
}

struct EpisodeSeed {
    id: &'static str,
    title: &'static str,
    topic: Topic,
    level: Level,
    duration: &'static str,
    image: &'static str,
    description: &'static str,
    transcript: &'static [(u32, &'static str)],
    vocab: &'static [(&'static str, &'static str, &'static str)],
    quiz: &'static [(&'static str, [&'static str; 4], usize, &'static str)],
}

impl EpisodeSeed {
    fn build(&self) -> Episode {
        Episode {
            id: EpisodeId::new(self.id),
            title: self.title.into(),
            subtitle: self.title.into(),
            description: self.description.into(),
            topic: self.topic,
            level: self.level,
            duration: self.duration.into(),
            image_url: format!("https://images.unsplash.com/{}?w=800&q=80", self.image),
            transcript: self
                .transcript
                .iter()
                .map(|&(time, text)| TranscriptLine {
                    time,
                    text: text.into(),
                })
                .collect(),
            vocab: self
                .vocab
                .iter()
                .map(|&(word, definition, example)| VocabEntry {
                    word: word.into(),
                    definition: definition.into(),
                    example: example.into(),
                })
                .collect(),
            quiz: self
                .quiz
                .iter()
                .map(|&(question, options, correct_index, explanation)| QuizQuestion {
                    question: question.into(),
                    options: options.iter().map(|&o| o.to_owned()).collect(),
                    correct_index,
                    explanation: explanation.into(),
                })
                .collect(),
        }
    }
}

const SEEDS: &[EpisodeSeed] = &[
    EpisodeSeed {
        id: "1",
        title: "Urban Living in NYC",
        topic: Topic::DailyLife,
        level: Level::A2,
        duration: "5:30",
        image: "photo-1496442226666-8d4d0e62e6e9",
        description: "Essential vocabulary for city life",
        transcript: &[
            (0, "Living in New York City is an exciting experience."),
            (5, "The subway system connects all five boroughs."),
            (10, "You can find food from every culture on every corner."),
            (15, "The pace of life here is incredibly fast."),
        ],
        vocab: &[
            ("Borough", "A district of a city", "Manhattan is one of five boroughs in NYC."),
            ("Subway", "Underground train system", "I take the subway to work every day."),
        ],
        quiz: &[(
            "How many boroughs does NYC have?",
            ["Three", "Four", "Five", "Six"],
            2,
            "New York City has five boroughs.",
        )],
    },
    EpisodeSeed {
        id: "2",
        title: "A Day in New York",
        topic: Topic::Travel,
        level: Level::A2,
        duration: "4:30",
        image: "photo-1546436836-07a91091f160",
        description: "Explore the busy streets of NYC and learn how to navigate the city",
        transcript: &[
            (0, "Good morning! Let's explore New York today."),
            (5, "First, we'll visit the Statue of Liberty."),
            (10, "Then, we'll walk through Central Park."),
        ],
        vocab: &[("Navigate", "Find your way around", "It's easy to navigate NYC with a map.")],
        quiz: &[(
            "What will we visit first?",
            ["Central Park", "Times Square", "Statue of Liberty", "Brooklyn Bridge"],
            2,
            "The first destination is the Statue of Liberty.",
        )],
    },
    EpisodeSeed {
        id: "3",
        title: "Ordering Street Food",
        topic: Topic::Food,
        level: Level::A2,
        duration: "3:45",
        image: "photo-1555939594-58d7cb561ad1",
        description: "Learn essential phrases for ordering delicious street food",
        transcript: &[
            (0, "Hi! I'd like to order a hot dog, please."),
            (4, "What toppings would you like?"),
            (8, "Mustard and sauerkraut, please."),
        ],
        vocab: &[("Toppings", "Food items placed on top", "I like many toppings on my pizza.")],
        quiz: &[(
            "What toppings were ordered?",
            [
                "Ketchup and onions",
                "Mustard and sauerkraut",
                "Relish and peppers",
                "Mayo and cheese",
            ],
            1,
            "The customer ordered mustard and sauerkraut.",
        )],
    },
    EpisodeSeed {
        id: "4",
        title: "The Job Interview",
        topic: Topic::Work,
        level: Level::B1,
        duration: "6:15",
        image: "photo-1560250097-0b93528c311a",
        description: "Common questions and answers for your first job interview",
        transcript: &[
            (0, "Tell me about yourself and your background."),
            (5, "I have five years of experience in marketing."),
            (10, "What are your strengths and weaknesses?"),
        ],
        vocab: &[
            ("Background", "Your experience and education", "She has a strong background in finance."),
            ("Strengths", "Things you are good at", "Communication is one of my strengths."),
        ],
        quiz: &[(
            "How many years of experience does the candidate have?",
            ["Three", "Four", "Five", "Six"],
            2,
            "The candidate has five years of experience.",
        )],
    },
    EpisodeSeed {
        id: "5",
        title: "Future of AI",
        topic: Topic::Tech,
        level: Level::B2,
        duration: "7:20",
        image: "photo-1677442136019-21780ecad995",
        description: "Discussing how AI is changing the way we work and live",
        transcript: &[
            (0, "Artificial Intelligence is no longer just science fiction."),
            (5, "It is integrated into our phones, cars, and homes."),
            (10, "But what does this mean for the future of employment?"),
        ],
        vocab: &[
            ("Integrated", "Combined to form a whole", "AI is integrated into many devices."),
            ("Employment", "Having a job", "AI may affect employment opportunities."),
        ],
        quiz: &[(
            "What is the main topic?",
            ["History of AI", "Future of AI", "Coding AI", "Robots"],
            1,
            "The podcast discusses the future impact of AI.",
        )],
    },
    EpisodeSeed {
        id: "6",
        title: "Coffee Shop Conversations",
        topic: Topic::DailyLife,
        level: Level::A1,
        duration: "3:30",
        image: "photo-1495474472287-4d71bcdd2085",
        description: "Learn the basics of ordering coffee and casual chitchat",
        transcript: &[
            (0, "Hi, I would like a medium latte, please."),
            (4, "Sure, would you like any milk alternative?"),
            (8, "Yes, oat milk please."),
        ],
        vocab: &[("Latte", "Coffee with milk", "I drink a latte every morning.")],
        quiz: &[(
            "What milk did the customer ask for?",
            ["Whole milk", "Soy milk", "Oat milk", "Almond milk"],
            2,
            "The customer specifically requested oat milk.",
        )],
    },
    EpisodeSeed {
        id: "7",
        title: "Weekend Plans",
        topic: Topic::DailyLife,
        level: Level::A2,
        duration: "4:10",
        image: "photo-1533174072545-7a4b6ad7a6c3",
        description: "Talking about weekend activities with friends",
        transcript: &[
            (0, "What are you doing this weekend?"),
            (4, "I'm going to the beach with some friends."),
            (8, "That sounds fun! Can I join you?"),
        ],
        vocab: &[("Weekend", "Saturday and Sunday", "I relax on the weekend.")],
        quiz: &[(
            "Where is the person going?",
            ["Mountains", "Beach", "City", "Park"],
            1,
            "They're going to the beach.",
        )],
    },
    EpisodeSeed {
        id: "8",
        title: "Traveling on a Budget",
        topic: Topic::Travel,
        level: Level::B1,
        duration: "5:50",
        image: "photo-1488646953014-85cb44e25828",
        description: "Tips and tricks for affordable travel adventures",
        transcript: &[
            (0, "Traveling doesn't have to be expensive."),
            (5, "You can find cheap flights if you book in advance."),
            (10, "Hostels are a great way to save money."),
        ],
        vocab: &[("Budget", "Amount of money available to spend", "I'm traveling on a tight budget.")],
        quiz: &[(
            "How can you save money on accommodation?",
            ["Hotels", "Hostels", "Resorts", "Villas"],
            1,
            "Hostels are mentioned as a money-saving option.",
        )],
    },
];

fn builtin_episodes() -> Vec<Episode> {
    SEEDS.iter().map(EpisodeSeed::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(episodes: &[&Episode]) -> Vec<String> {
        episodes.iter().map(|e| e.id.0.clone()).collect()
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.list_episodes().len(), 8);
        assert_eq!(catalog.list_topics().len(), 8);
        assert_eq!(catalog.list_levels().len(), 4);
        assert_eq!(catalog.list_topics()[6].label, "Reading");
    }

    #[test]
    fn test_filtered_by_topic_and_level() {
        let catalog = Catalog::builtin();
        let food_a2 = catalog.filtered(Some(Topic::Food), Some(Level::A2));
        assert_eq!(ids(&food_a2), vec!["3"]);

        let daily_life = catalog.filtered(Some(Topic::DailyLife), None);
        assert_eq!(ids(&daily_life), vec!["1", "6", "7"]);
    }

    #[test]
    fn test_display_list_falls_back_to_whole_catalog() {
        let catalog = Catalog::builtin();
        let none = catalog.filtered(Some(Topic::Culture), None);
        assert!(none.is_empty());

        let display = catalog.display_list(Some(Topic::Culture), None);
        assert_eq!(display.len(), 8);
        assert_eq!(
            catalog.daily_pick(Some(Topic::Culture), None).map(|e| e.id.as_str()),
            Some("1")
        );
    }

    #[test]
    fn test_daily_pick_food_a2() {
        let catalog = Catalog::builtin();
        let pick = catalog.daily_pick(Some(Topic::Food), Some(Level::A2)).unwrap();
        assert_eq!(pick.id.as_str(), "3");
        assert_eq!(pick.title, "Ordering Street Food");
    }

    #[test]
    fn test_latest_skips_daily_pick() {
        let catalog = Catalog::builtin();
        let latest = catalog.latest(Some(Topic::DailyLife), None);
        assert_eq!(ids(&latest), vec!["6", "7"]);
    }

    #[test]
    fn test_resolve_ids_drops_unknown() {
        let catalog = Catalog::builtin();
        let wanted = [EpisodeId::new("4"), EpisodeId::new("gone"), EpisodeId::new("2")];
        let resolved = catalog.resolve_ids(&wanted);
        assert_eq!(ids(&resolved), vec!["4", "2"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let episodes = builtin_episodes();
        let mut doubled = episodes.clone();
        doubled.push(episodes[0].clone());

        let err = Catalog::new(doubled, builtin_topics(), builtin_levels()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEpisode(ref id) if id.as_str() == "1"));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&Catalog::builtin()).unwrap();
        let catalog = Catalog::from_json(&json).unwrap();
        assert_eq!(catalog, Catalog::builtin());

        assert!(matches!(
            Catalog::from_json("{\"episodes\": 3}"),
            Err(CatalogError::Malformed(_))
        ));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Daily Life".parse::<Topic>().unwrap(), Topic::DailyLife);
        assert_eq!("B1".parse::<Level>().unwrap(), Level::B1);
        assert_eq!("Spanish".parse::<Language>().unwrap(), Language::Spanish);
        assert!("C1".parse::<Level>().is_err());
        assert!("Music".parse::<Topic>().is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::A1 < Level::A2);
        assert!(Level::A2 < Level::B1);
        assert!(Level::B1 < Level::B2);
    }

    #[test]
    fn test_topic_serializes_with_display_name() {
        let json = serde_json::to_string(&Topic::DailyLife).unwrap();
        assert_eq!(json, "\"Daily Life\"");
    }
}
