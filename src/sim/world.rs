//! Terrain streaming
//!
//! A fixed N×N pool of tiles is shuffled around the player's chunk so the
//! ground looks endless. Only tile positions live here; drawing them is the
//! renderer's job.

use glam::{IVec2, Vec2};

#[derive(Debug, Clone)]
pub struct WorldStreamer {
    tile_size: Vec2,
    span: u32,
    tiles: Vec<Vec2>,
    current_chunk: IVec2,
}

impl WorldStreamer {
    /// Lay out `span`×`span` tiles centred on chunk (0, 0), tracking the chunk at `player_pos`.
    ///
    /// `span` must be odd.
    pub fn new(tile_size: Vec2, span: u32, player_pos: Vec2) -> Self {
        let half = (span / 2) as i32;
        let mut tiles = Vec::with_capacity((span * span) as usize);
        for y in -half..=half {
            for x in -half..=half {
                tiles.push(Vec2::new(x as f32, y as f32) * tile_size);
            }
        }
        let mut streamer = Self {
            tile_size,
            span,
            tiles,
            current_chunk: IVec2::ZERO,
        };
        // Starting away from the origin re-centres right away
        streamer.update(player_pos);
        streamer
    }

    /// Chunk index containing `pos`
    pub fn chunk_of(&self, pos: Vec2) -> IVec2 {
        (pos / self.tile_size).floor().as_ivec2()
    }

    pub fn current_chunk(&self) -> IVec2 {
        self.current_chunk
    }

    pub fn tiles(&self) -> &[Vec2] {
        &self.tiles
    }

    /// Recycle tiles if the player crossed into a new chunk. Returns the new chunk if so.
    pub fn update(&mut self, player_pos: Vec2) -> Option<IVec2> {
        let chunk = self.chunk_of(player_pos);
        if chunk == self.current_chunk {
            return None;
        }
        self.recenter(chunk);
        self.current_chunk = chunk;
        Some(chunk)
    }

    fn recenter(&mut self, chunk: IVec2) {
        let center = chunk.as_vec2() * self.tile_size;
        // For a 3x3 pool: wrap past 1.5 tiles, jump by 3 tiles
        let span = self.span as f32;
        let threshold = self.tile_size * (span / 2.0);
        let shift = self.tile_size * span;

        for tile in &mut self.tiles {
            let mut offset = *tile - center;
            while offset.x < -threshold.x {
                tile.x += shift.x;
                offset.x += shift.x;
            }
            while offset.x > threshold.x {
                tile.x -= shift.x;
                offset.x -= shift.x;
            }
            while offset.y < -threshold.y {
                tile.y += shift.y;
                offset.y += shift.y;
            }
            while offset.y > threshold.y {
                tile.y -= shift.y;
                offset.y -= shift.y;
            }
        }
    }
}
