//! Timeline section: the immutable dataset a timeline is rendered from.
//!
//! A section is consumed read-only at render time. It can be loaded from a
//! JSON document of the shape
//! `{ "id", "title", "type", "cards": [{ "heading", "date", "description" }] }`
//! or taken from the built-in credentials history.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Static display content of one timeline entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub heading: String,
    pub date: String,
    pub description: String,
}

impl Card {
    pub fn new(heading: impl Into<String>, date: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            date: date.into(),
            description: description.into(),
        }
    }
}

/// Ordered list of cards plus section metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSection {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cards: Vec<Card>,
}

impl TimelineSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: "timeline".to_string(),
            cards,
        }
    }

    /// Parse a section from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse timeline section JSON")
    }

    /// Load a section from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read timeline section: {}", path.display()))?;
        let section = Self::from_json_str(&json)
            .with_context(|| format!("Invalid timeline section: {}", path.display()))?;
        log::debug!(
            "Loaded section '{}' with {} cards from {}",
            section.id,
            section.cards.len(),
            path.display()
        );
        Ok(section)
    }

    /// Built-in credentials history.
    pub fn credentials() -> Self {
        Self::new(
            "credentials",
            "Credentials",
            vec![
                Card::new(
                    "First Steps into Design",
                    "2020",
                    "Started exploring UI/UX and graphic design using Figma, learning interface basics and modern design principles through self-practice.",
                ),
                Card::new(
                    "Began Bachelor’s in Computer Engineering",
                    "2021",
                    "Began my Bachelor’s in Computer Engineering at Cosmos College of Management and Technology, diving into programming, systems, and tech fundamentals.",
                ),
                Card::new(
                    "Leveling Up in Design Tools",
                    "2022",
                    "Expanded my skills in Adobe Illustrator and Canva, learning to combine visual aesthetics with brand-focused design for creative projects.",
                ),
                Card::new(
                    "Built ‘Park In’ Prototype",
                    "2023",
                    "Designed and developed Park In, a parking assistant app built using Flutter, integrating smart parking flow and user-friendly design.",
                ),
                Card::new(
                    "Creative Lead at CosmoFest 2025",
                    "2024",
                    "Worked as the lead graphic designer for CosmoFest 2025, creating visual identities and promotional materials—won 1st place in project demonstration competition.",
                ),
                Card::new(
                    "Deep Diving into DevOps & Automation",
                    "2025",
                    "Pursuing advanced learning in DevOps, automation, Linux, and system reliability while refining UI/UX and development skills.",
                ),
            ],
        )
    }
}

impl Default for TimelineSection {
    fn default() -> Self {
        Self::credentials()
    }
}
