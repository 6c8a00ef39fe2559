use csv::StringRecord;
use log::{debug, warn};
use serde::Serialize;

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use crate::{card::Card, err::CatalogError, filter::LiveFilter};

pub const DEFAULT_ICON: &str = "🧩";

const ID: &str = "Id";
const NAME: &str = "Name";
const DESCRIPTION: &str = "Description";
const ICON: &str = "Icon";
const PATH: &str = "Path";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub path: Option<String>,
    pub visible: bool,
}

/// One entry of the JSON listing. Paths and visibility stay on the board.
#[derive(Debug, Serialize)]
struct ListingEntry<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    icon: &'a str,
}

impl<'a> From<&'a Tile> for ListingEntry<'a> {
    fn from(tile: &'a Tile) -> Self {
        ListingEntry {
            id: &tile.id,
            name: &tile.name,
            description: &tile.description,
            icon: &tile.icon,
        }
    }
}

impl Tile {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Tile {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: DEFAULT_ICON.to_string(),
            path: None,
            visible: true,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    fn build_from_record(headers: &HashMap<String, usize>, record: &StringRecord) -> Self {
        let field = |column: &str| {
            headers
                .get(column)
                .and_then(|i| record.get(*i))
                .unwrap_or("")
                .trim()
        };
        let icon = match field(ICON) {
            "" => DEFAULT_ICON,
            icon => icon,
        };
        let path = match field(PATH) {
            "" => None,
            path => Some(path.to_string()),
        };
        Tile {
            id: field(ID).to_string(),
            name: field(NAME).to_string(),
            description: field(DESCRIPTION).to_string(),
            icon: icon.to_string(),
            path,
            visible: true,
        }
    }
}

impl Card for Tile {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_description(&self) -> &str {
        &self.description
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Every tile on the board, ordered by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tiles: Vec<Tile>,
}

impl Catalog {
    pub fn new(mut tiles: Vec<Tile>) -> Self {
        tiles.sort_by_key(|t| t.name.to_lowercase());
        Catalog { tiles }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        debug!("Loading tiles from {}", path.as_ref().display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a tab separated tile table with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);
        let headers = reader.headers()?.to_owned();
        let headers: HashMap<String, usize> = HashMap::from_iter(
            headers
                .iter()
                .enumerate()
                .map(|(e, v)| (v.trim().to_owned(), e)),
        );
        for column in [ID, NAME, DESCRIPTION] {
            if !headers.contains_key(column) {
                warn!("Tile file missing key {}", column);
                return Err(CatalogError::MissingColumn(column));
            }
        }

        let mut tiles = Vec::new();
        for record in reader.records() {
            let record = record?;
            let tile = Tile::build_from_record(&headers, &record);
            if tile.id.is_empty() {
                warn!("Skipping tile without id: {:?}", tile.name);
                continue;
            }
            tiles.push(tile);
        }
        debug!("Loaded {} tiles", tiles.len());
        Ok(Self::new(tiles))
    }

    pub fn find(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        let listing: Vec<ListingEntry> = self.tiles.iter().map(ListingEntry::from).collect();
        Ok(serde_json::to_string_pretty(&listing)?)
    }

    pub fn into_filter(self) -> LiveFilter<Tile> {
        LiveFilter::init(self.tiles)
    }
}
