//! Built-in data and settings
//!
//! These make every example server usable without a config file

use crate::config::catalog::{Book, CityWeather, Condition, Media};

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
pub const DEFAULT_REST_PORT: u16 = 3000;

pub fn default_books() -> Vec<Book> {
    vec![
        book(
            "1",
            "Introduction to MCP Programming",
            "Taro Yamada",
            2024,
            "Model Context Protocol from the basics to real applications",
        ),
        book(
            "2",
            "Building AI Agents in Practice",
            "Hanako Sato",
            2024,
            "Design and implementation practices for AI agents",
        ),
        book(
            "3",
            "Principles of Protocol Design",
            "Ichiro Suzuki",
            2023,
            "How to design effective communication protocols",
        ),
    ]
}

pub fn default_media() -> Vec<Media> {
    vec![
        media("1", "Spirited Away", "Hayao Miyazaki", 2001, "animation"),
        media("2", "Seven Samurai", "Akira Kurosawa", 1954, "drama"),
        media("3", "Your Name", "Makoto Shinkai", 2016, "animation"),
    ]
}

pub fn default_weather() -> Vec<CityWeather> {
    vec![
        weather("Tokyo", 22, Condition::Sunny, 55),
        weather("Osaka", 24, Condition::Cloudy, 60),
        weather("Sapporo", 15, Condition::Rain, 75),
        weather("Fukuoka", 26, Condition::Sunny, 50),
        weather("Okinawa", 29, Condition::Sunny, 70),
    ]
}

fn book(id: &str, title: &str, author: &str, year: u32, description: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        year,
        description: description.to_string(),
    }
}

fn media(id: &str, title: &str, creator: &str, year: u32, genre: &str) -> Media {
    Media {
        id: id.to_string(),
        title: title.to_string(),
        creator: creator.to_string(),
        year,
        genre: genre.to_string(),
    }
}

fn weather(city: &str, temp: i32, condition: Condition, humidity: u8) -> CityWeather {
    CityWeather {
        city: city.to_string(),
        temp,
        condition,
        humidity,
    }
}
