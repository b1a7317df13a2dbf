// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! The fixed song catalog.
//!
//! Loaded once at startup and never mutated; cloning a [`Catalog`] shares the
//! same song list.

use std::{
    collections::{BTreeSet, HashMap, hash_map::Entry},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use snafu::Snafu;
use songbook_playback::{AudioSource, Playable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[builder(on(String, into))]
pub struct Song {
    pub id:    String,
    pub title: String,
    #[builder(into)]
    pub file:  AudioSource,
    pub genre: String,
}

impl Playable for Song {
    fn id(&self) -> &str { &self.id }

    fn source(&self) -> &AudioSource { &self.file }
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum CatalogError {
    #[snafu(display("Song id {id} appears more than once in the catalog"))]
    DuplicateSongId {
        id:  String,
        #[snafu(implicit)]
        loc: snafu::Location,
    },
}

#[derive(Debug, Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    songs: Vec<Song>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from songs in display order.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateSongId`] if two songs share an id.
    pub fn new(songs: Vec<Song>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(songs.len());
        for (pos, song) in songs.iter().enumerate() {
            match index.entry(song.id.clone()) {
                Entry::Occupied(_) => {
                    return DuplicateSongIdSnafu {
                        id: song.id.clone(),
                    }
                    .fail();
                }
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
            }
        }

        Ok(Self {
            inner: Arc::new(CatalogInner { songs, index }),
        })
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.inner.index.get(id).map(|&pos| &self.inner.songs[pos])
    }

    pub fn contains(&self, id: &str) -> bool { self.inner.index.contains_key(id) }

    pub fn iter(&self) -> impl Iterator<Item = &Song> { self.inner.songs.iter() }

    pub fn len(&self) -> usize { self.inner.songs.len() }

    pub fn is_empty(&self) -> bool { self.inner.songs.is_empty() }

    /// Songs of one genre, in catalog order.
    pub fn by_genre<'a>(&'a self, genre: &'a str) -> impl Iterator<Item = &'a Song> + 'a {
        self.iter().filter(move |song| song.genre == genre)
    }

    /// Distinct genres in order of first appearance.
    pub fn genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = Vec::new();
        for song in self.iter() {
            if !genres.contains(&song.genre.as_str()) {
                genres.push(&song.genre);
            }
        }
        genres
    }

    /// The catalog songs whose ids are in `ids`, in catalog order. Ids with no
    /// catalog entry are ignored.
    pub fn resolve(&self, ids: &BTreeSet<String>) -> Vec<Song> {
        self.iter()
            .filter(|song| ids.contains(&song.id))
            .cloned()
            .collect()
    }
}
