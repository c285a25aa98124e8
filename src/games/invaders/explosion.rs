use glam::Vec2;

pub const EXPLOSION_SIZE: f32 = 32.0;
pub const EXPLOSION_FRAMES: u32 = 7;
pub const EXPLOSION_FRAME_MS: i64 = 50;

/// A sprite-sheet animation that plays once. It may carry the screen to show
/// once it has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion<K> {
    pub pos: Vec2,
    pub frame: u32,
    pub max_frames: u32,
    frame_ms: i64,
    countdown: i64,
    pub next: Option<K>,
}

impl<K: Copy> Explosion<K> {
    pub fn new(pos: Vec2, next: Option<K>) -> Self {
        Self {
            pos,
            frame: 0,
            max_frames: EXPLOSION_FRAMES,
            frame_ms: EXPLOSION_FRAME_MS,
            countdown: EXPLOSION_FRAME_MS,
            next,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.max_frames
    }
}

#[derive(Debug, Clone)]
pub struct Explosions<K> {
    pub list: Vec<Explosion<K>>,
}

impl<K> Default for Explosions<K> {
    fn default() -> Self {
        Self { list: Vec::new() }
    }
}

impl<K: Copy> Explosions<K> {
    pub fn add(&mut self, pos: Vec2, next: Option<K>) {
        self.list.push(Explosion::new(pos, next));
    }

    /// Advance every explosion and drop the finished ones. Returns the
    /// follow-up screen of the first finished explosion that has one.
    pub fn update(&mut self, elapsed_ms: u32) -> Option<K> {
        for explosion in &mut self.list {
            explosion.countdown -= elapsed_ms as i64;
            if explosion.countdown < 0 {
                explosion.countdown += explosion.frame_ms;
                explosion.frame += 1;
            }
        }

        let next = self
            .list
            .iter()
            .filter(|e| e.is_finished())
            .find_map(|e| e.next);
        self.list.retain(|e| !e.is_finished());
        next
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
