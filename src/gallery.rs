// gallery.rs
use crate::ratio::Ratio;

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Poster {
    pub id: u64,
    /// `data:` URL of the generated image.
    pub image: String,
    pub concept: String,
    pub ratio: Ratio,
    pub timestamp: String,
}

impl Poster {
    pub fn file_name(&self) -> String {
        format!("poster-{}.png", self.id)
    }
}

/// Posters of the current session, in creation order. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct Gallery {
    posters: Vec<Poster>,
    last_id: u64,
}

impl Gallery {
    pub fn new() -> Self {
        Gallery::default()
    }

    pub fn add(&mut self, image: String, concept: String, ratio: Ratio, created: DateTime<Local>) -> &Poster {
        let millis = u64::try_from(created.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;

        self.posters.push(Poster {
            id,
            image,
            concept,
            ratio,
            timestamp: created.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        });
        &self.posters[self.posters.len() - 1]
    }

    pub fn remove(&mut self, id: u64) -> Option<Poster> {
        let index = self.posters.iter().position(|poster| poster.id == id)?;
        Some(self.posters.remove(index))
    }

    pub fn get(&self, id: u64) -> Option<&Poster> {
        self.posters.iter().find(|poster| poster.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Poster> {
        self.posters.iter()
    }

    pub fn len(&self) -> usize {
        self.posters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posters.is_empty()
    }
}
