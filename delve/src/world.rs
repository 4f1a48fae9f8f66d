//! Rooms and the world provider
//!
//! The core only needs the player's current room: its exits and lock
//! state, its floor items, and whoever is standing in it. `World` is the
//! in-memory provider; anything implementing [`WorldProvider`] will do.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::catalog::ContentCatalog;
use crate::entity::Entity;
use crate::player::Inventory;

/// Compass directions plus vertical exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    Up,
    Down,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Northeast => "northeast",
            Direction::Northwest => "northwest",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Full names and shorthand (`n`, `ne`, `u`, ...)
    pub fn from_word(word: &str) -> Option<Direction> {
        match word.to_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            "ne" | "northeast" => Some(Direction::Northeast),
            "nw" | "northwest" => Some(Direction::Northwest),
            "se" | "southeast" => Some(Direction::Southeast),
            "sw" | "southwest" => Some(Direction::Southwest),
            "u" | "up" => Some(Direction::Up),
            "d" | "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_word(s).ok_or(())
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A passage to another room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub to: String,
    #[serde(default)]
    pub locked: bool,
    /// Item id that unlocks this exit
    #[serde(default)]
    pub key: Option<String>,
}

impl Exit {
    pub fn open(to: &str) -> Self {
        Self {
            to: to.to_string(),
            locked: false,
            key: None,
        }
    }

    pub fn locked(to: &str, key: &str) -> Self {
        Self {
            to: to.to_string(),
            locked: true,
            key: Some(key.to_string()),
        }
    }
}

/// Someone to talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub lines: Vec<String>,
}

impl Npc {
    pub fn new(name: &str, lines: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// A room where the player may pay to rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inn {
    pub cost: u32,
    /// Flavor lines, one picked per rest
    #[serde(default)]
    pub lines: Vec<String>,
}

/// A merchant's wares: item id to price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub stock: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub exits: BTreeMap<Direction, Exit>,
    #[serde(default)]
    pub items: Inventory,
    #[serde(default)]
    pub enemies: Vec<Entity>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub inn: Option<Inn>,
    #[serde(default)]
    pub shop: Option<Shop>,
}

impl Room {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            exits: BTreeMap::new(),
            items: Inventory::new(),
            enemies: Vec::new(),
            npcs: Vec::new(),
            inn: None,
            shop: None,
        }
    }

    pub fn with_exit(mut self, direction: Direction, exit: Exit) -> Self {
        self.exits.insert(direction, exit);
        self
    }

    pub fn with_item(mut self, id: &str, quantity: u32) -> Self {
        self.items.add(id, quantity);
        self
    }

    pub fn with_enemy(mut self, enemy: Entity) -> Self {
        self.enemies.push(enemy);
        self
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.npcs.push(npc);
        self
    }

    pub fn with_inn(mut self, cost: u32, lines: &[&str]) -> Self {
        self.inn = Some(Inn {
            cost,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        });
        self
    }

    pub fn with_shop(mut self, name: &str, stock: &[(&str, u32)]) -> Self {
        self.shop = Some(Shop {
            name: name.to_string(),
            stock: stock.iter().map(|(id, price)| (id.to_string(), *price)).collect(),
        });
        self
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    /// Living enemy whose name matches `query` exactly, else by substring
    pub fn find_enemy(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        let living = || self.enemies.iter().enumerate().filter(|(_, e)| e.is_alive());
        living()
            .find(|(_, e)| e.name.to_lowercase() == query)
            .or_else(|| living().find(|(_, e)| e.name.to_lowercase().contains(&query)))
            .map(|(i, _)| i)
    }

    pub fn find_npc(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        self.npcs
            .iter()
            .position(|n| n.name.to_lowercase() == query)
            .or_else(|| {
                self.npcs
                    .iter()
                    .position(|n| n.name.to_lowercase().contains(&query))
            })
    }

    /// Full room description for `look`
    pub fn describe(&self, catalog: &dyn ContentCatalog) -> String {
        let mut lines = vec![self.name.clone(), self.description.clone()];

        if !self.items.is_empty() {
            let items: Vec<String> = self
                .items
                .iter()
                .map(|(id, qty)| match qty {
                    1 => catalog.display_name(id),
                    n => format!("{} x{}", catalog.display_name(id), n),
                })
                .collect();
            lines.push(format!("You see: {}", items.join(", ")));
        }

        let enemies: Vec<&str> = self.living_enemies().map(|e| e.name.as_str()).collect();
        if !enemies.is_empty() {
            lines.push(format!("Enemies: {}", enemies.join(", ")));
        }
        if !self.npcs.is_empty() {
            let npcs: Vec<&str> = self.npcs.iter().map(|n| n.name.as_str()).collect();
            lines.push(format!("Here: {}", npcs.join(", ")));
        }
        if let Some(inn) = &self.inn {
            lines.push(format!("An inn offers rest for {} coins.", inn.cost));
        }
        if let Some(shop) = &self.shop {
            lines.push(format!("{} is open for business.", shop.name));
        }

        if self.exits.is_empty() {
            lines.push("There are no obvious exits.".to_string());
        } else {
            let exits: Vec<String> = self
                .exits
                .iter()
                .map(|(dir, exit)| {
                    if exit.locked {
                        format!("{} (locked)", dir)
                    } else {
                        dir.to_string()
                    }
                })
                .collect();
            lines.push(format!("Exits: {}", exits.join(", ")));
        }
        lines.join("\n")
    }
}

/// Access to the player's location
pub trait WorldProvider: Send {
    fn current_room_id(&self) -> &str;
    fn room(&self, id: &str) -> Option<&Room>;
    fn room_mut(&mut self, id: &str) -> Option<&mut Room>;
    /// Move the player; false if the room does not exist
    fn set_current_room(&mut self, id: &str) -> bool;
    /// Put every room back the way it started
    fn reset(&mut self);
    /// Copies of every room, for saving
    fn export_rooms(&self) -> Vec<Room>;
    /// Overwrite rooms with saved copies; unknown ids are ignored
    fn import_rooms(&mut self, rooms: Vec<Room>);

    fn current_room(&self) -> Option<&Room> {
        let id = self.current_room_id().to_string();
        self.room(&id)
    }

    fn current_room_mut(&mut self) -> Option<&mut Room> {
        let id = self.current_room_id().to_string();
        self.room_mut(&id)
    }
}

/// In-memory world
#[derive(Debug, Clone)]
pub struct World {
    rooms: BTreeMap<String, Room>,
    current: String,
    start: String,
    pristine: BTreeMap<String, Room>,
}

impl World {
    pub fn new(start: &str) -> Self {
        Self {
            rooms: BTreeMap::new(),
            current: start.to_string(),
            start: start.to_string(),
            pristine: BTreeMap::new(),
        }
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.insert(room);
        self
    }

    pub fn insert(&mut self, room: Room) {
        self.pristine.insert(room.id.clone(), room.clone());
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl WorldProvider for World {
    fn current_room_id(&self) -> &str {
        &self.current
    }

    fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    fn room_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    fn set_current_room(&mut self, id: &str) -> bool {
        if !self.rooms.contains_key(id) {
            return false;
        }
        self.current = id.to_string();
        true
    }

    fn reset(&mut self) {
        self.rooms = self.pristine.clone();
        self.current = self.start.clone();
    }

    fn export_rooms(&self) -> Vec<Room> {
        self.rooms.values().cloned().collect()
    }

    fn import_rooms(&mut self, rooms: Vec<Room>) {
        for room in rooms {
            if let Some(slot) = self.rooms.get_mut(&room.id) {
                *slot = room;
            }
        }
    }
}
