//! Database models for stored games.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// A row of the `games` table.
///
/// `game_state` holds the JSON wire form of the game; decoding it is the
/// store's job, so a corrupted row still loads here.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    game_state: String,
    is_active: bool,
}

/// Insertable game row. Timestamps and `is_active` take column defaults.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    game_state: String,
}
