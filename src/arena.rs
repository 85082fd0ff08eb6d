// 🏟️ Arena - a hero fights monsters that keep arriving on another thread
//
// Threads:
// - spawner: every `spawn_interval` pushes a random monster into the pool
// - main loop: every `poll_interval` takes the front monster and runs the
//   fight on its own thread, joined before the next poll
//
// The spawner watches a stop flag and is joined when the arena finishes.

use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::ArenaConfig;
use crate::entities::MonsterKind;
use crate::error::{GameError, GameResult};

/// Spawner stops adding monsters while this many are waiting
const POOL_CAPACITY: usize = 32;

// ============================================================================
// FIGHTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FighterStats {
    pub name: String,
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
}

impl fmt::Display for FighterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Health: {}, Attack: {}, Defense: {}",
            self.name, self.health, self.attack, self.defense
        )
    }
}

/// Fighter shared between threads; every read and write takes the lock
#[derive(Debug)]
pub struct ArenaFighter {
    stats: Mutex<FighterStats>,
}

impl ArenaFighter {
    pub fn new(name: impl Into<String>, health: i32, attack: i32, defense: i32) -> Self {
        ArenaFighter {
            stats: Mutex::new(FighterStats {
                name: name.into(),
                health: health.max(0),
                attack,
                defense,
            }),
        }
    }

    /// The arena's hero: 100 HP, 15 ATK, 5 DEF
    pub fn hero() -> Self {
        Self::new("Hero", 100, 15, 5)
    }

    fn lock(&self) -> MutexGuard<'_, FighterStats> {
        // Stats are plain numbers, still valid after a panic elsewhere
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `max(1, damage - defense)`; returns the damage dealt
    pub fn take_damage(&self, damage: i32) -> i32 {
        let mut stats = self.lock();
        let dealt = (damage - stats.defense).max(1);
        stats.health = (stats.health - dealt).max(0);
        dealt
    }

    pub fn is_alive(&self) -> bool {
        self.lock().health > 0
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn health(&self) -> i32 {
        self.lock().health
    }

    pub fn attack(&self) -> i32 {
        self.lock().attack
    }

    pub fn snapshot(&self) -> FighterStats {
        self.lock().clone()
    }
}

pub type MonsterPool = Arc<Mutex<VecDeque<Arc<ArenaFighter>>>>;

fn lock_pool(pool: &MonsterPool) -> MutexGuard<'_, VecDeque<Arc<ArenaFighter>>> {
    pool.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Health 30-100, attack 5-20, defense 1-10, named after a random kind
pub fn random_monster(rng: &mut impl Rng) -> ArenaFighter {
    let kind = MonsterKind::ALL[rng.gen_range(0..MonsterKind::ALL.len())];
    let health = rng.gen_range(30..=100);
    let attack = rng.gen_range(5..=20);
    let defense = rng.gen_range(1..=10);
    ArenaFighter::new(kind.as_str(), health, attack, defense)
}

// ============================================================================
// THREADS
// ============================================================================

/// Sleep for `total`, waking early if `stop` is raised
fn nap(stop: &AtomicBool, total: Duration) {
    let deadline = Instant::now() + total;
    loop {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(Duration::from_millis(50)));
    }
}

/// Keep the pool stocked until `stop` is raised; returns how many were made
fn spawn_monsters(pool: MonsterPool, interval: Duration, mut rng: StdRng, stop: Arc<AtomicBool>) -> usize {
    let mut spawned = 0;
    while !stop.load(Ordering::Relaxed) {
        nap(&stop, interval);
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let mut waiting = lock_pool(&pool);
        if waiting.len() >= POOL_CAPACITY {
            drop(waiting);
            thread::yield_now();
            continue;
        }

        let monster = random_monster(&mut rng);
        tracing::info!("New monster generated: {}", monster.snapshot());
        waiting.push_back(Arc::new(monster));
        spawned += 1;
    }
    tracing::debug!(spawned, "spawner stopped");
    spawned
}

/// Trade blows until one side drops; returns the narration
pub fn fight(hero: &ArenaFighter, monster: &ArenaFighter, round_pause: Duration) -> Vec<String> {
    let hero_name = hero.name();
    let monster_name = monster.name();
    let mut lines = Vec::new();

    while hero.is_alive() && monster.is_alive() {
        monster.take_damage(hero.attack());
        lines.push(format!("{} attacks {}!", hero_name, monster_name));

        if !monster.is_alive() {
            lines.push(format!("{} has been defeated!", monster_name));
            break;
        }

        hero.take_damage(monster.attack());
        lines.push(format!("{} attacks {}!", monster_name, hero_name));
        lines.push(hero.snapshot().to_string());
        lines.push(monster.snapshot().to_string());
        lines.push("----------------------".to_string());

        thread::sleep(round_pause);
    }

    if hero.is_alive() {
        lines.push(format!("{} won the battle!", hero_name));
    } else {
        lines.push(format!("{} has been defeated by {}!", hero_name, monster_name));
    }
    lines
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

// ============================================================================
// ARENA
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArenaSummary {
    pub battles: usize,
    pub monsters_defeated: usize,
    pub spawned: usize,
    pub hero_survived: bool,
}

pub struct Arena {
    hero: Arc<ArenaFighter>,
    pool: MonsterPool,
    config: ArenaConfig,
}

impl Arena {
    pub fn new(hero: ArenaFighter, config: ArenaConfig) -> Self {
        Arena {
            hero: Arc::new(hero),
            pool: Arc::new(Mutex::new(VecDeque::new())),
            config,
        }
    }

    pub fn hero(&self) -> &ArenaFighter {
        &self.hero
    }

    pub fn pool(&self) -> MonsterPool {
        Arc::clone(&self.pool)
    }

    /// Run until the hero dies or `max_battles` fights have happened
    pub fn run(&self, rng: StdRng, mut narrate: impl FnMut(&str)) -> GameResult<ArenaSummary> {
        let stop = Arc::new(AtomicBool::new(false));
        let spawner = {
            let pool = self.pool();
            let stop = Arc::clone(&stop);
            let interval = self.config.spawn_interval();
            thread::Builder::new()
                .name("monster-spawner".to_string())
                .spawn(move || spawn_monsters(pool, interval, rng, stop))?
        };

        narrate("Hero created:");
        narrate(&self.hero.snapshot().to_string());

        let result = self.battle_loop(&mut narrate);

        stop.store(true, Ordering::Relaxed);
        let spawned = spawner
            .join()
            .map_err(|payload| GameError::ThreadPanicked(panic_message(payload)))?;

        let mut summary = result?;
        summary.spawned = spawned;
        summary.hero_survived = self.hero.is_alive();
        tracing::info!(
            battles = summary.battles,
            defeated = summary.monsters_defeated,
            "arena closed"
        );
        Ok(summary)
    }

    fn battle_loop(&self, narrate: &mut impl FnMut(&str)) -> GameResult<ArenaSummary> {
        let mut summary = ArenaSummary::default();

        while self.hero.is_alive() && summary.battles < self.config.max_battles {
            thread::sleep(self.config.poll_interval());

            let Some(monster) = lock_pool(&self.pool).front().cloned() else {
                thread::yield_now();
                continue;
            };

            narrate("=== BATTLE START ===");
            narrate(&format!("{} vs {}", self.hero.name(), monster.name()));
            narrate(&self.hero.snapshot().to_string());
            narrate(&monster.snapshot().to_string());
            narrate("----------------------");

            let worker = {
                let hero = Arc::clone(&self.hero);
                let monster = Arc::clone(&monster);
                let pause = self.config.round_pause();
                thread::Builder::new()
                    .name("arena-battle".to_string())
                    .spawn(move || fight(&hero, &monster, pause))?
            };
            let lines = worker
                .join()
                .map_err(|payload| GameError::ThreadPanicked(panic_message(payload)))?;
            for line in &lines {
                narrate(line);
            }
            summary.battles += 1;

            let mut waiting = lock_pool(&self.pool);
            let front_is_dead = waiting
                .front()
                .map(|front| Arc::ptr_eq(front, &monster) && !front.is_alive())
                .unwrap_or(false);
            if front_is_dead {
                waiting.pop_front();
                summary.monsters_defeated += 1;
            }
        }

        Ok(summary)
    }
}
