//! Falling-item catch session
//!
//! Real-time state for the 20-second "catch the luck" game. The session is
//! advanced by two externally scheduled callbacks: a per-frame [`frame`]
//! update and a once-per-second [`second_tick`] countdown. Timestamps and
//! the viewport are injected so the logic can be driven deterministically.
//!
//! Fall speed is applied per frame while the spawn clock runs on wall-clock
//! milliseconds, so item density scales with the display refresh rate. The
//! tuning assumes ~60 Hz.
//!
//! [`frame`]: CatchSession::frame
//! [`second_tick`]: CatchSession::second_tick

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::scores::ScoreSink;

/// Lifecycle of a catch session. `Idle` doubles as the retry-ready state;
/// it looks like `Ended` without a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    RedPacket,
    Coin,
    Orange,
    Bomb,
}

/// Weighted spawn table: the red packet is listed twice, giving it double
/// the draw frequency of every other kind (2:1:1:1).
const SPAWN_TABLE: [ItemKind; 5] = [
    ItemKind::RedPacket,
    ItemKind::Coin,
    ItemKind::Orange,
    ItemKind::Bomb,
    ItemKind::RedPacket,
];

/// One item currently falling. Lives only inside the active session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingItem {
    pub id: u32,
    pub pos: Vec2,
    pub kind: ItemKind,
}

/// Current drawing-surface dimensions. Callers re-query this every frame
/// rather than caching it, so resizes take effect immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// All fast-changing state of one arcade session, owned in a single struct
/// so the update functions stay testable without a rendering harness.
#[derive(Debug, Clone)]
pub struct CatchSession {
    pub phase: SessionPhase,
    /// Countdown in whole seconds, driven by `second_tick`
    pub time_left: u32,
    pub score: u32,
    pub items: Vec<FallingItem>,
    /// Basket center, overwritten by the latest pointer/touch coordinate
    pub player_x: f32,
    last_spawn_ms: f64,
    next_item_id: u32,
    rng: Pcg32,
}

impl CatchSession {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: SessionPhase::Idle,
            time_left: GAME_DURATION_SECS,
            score: 0,
            items: Vec::new(),
            player_x: 0.0,
            last_spawn_ms: 0.0,
            next_item_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin (or retry) a session: score, items, countdown and spawn clock
    /// all reset. `now_ms` becomes the spawn-clock origin.
    pub fn start(&mut self, now_ms: f64) {
        self.score = 0;
        self.items.clear();
        self.time_left = GAME_DURATION_SECS;
        self.last_spawn_ms = now_ms;
        self.phase = SessionPhase::Playing;
        log::info!("catch session started");
    }

    /// Move the basket. Input is dropped unless a session is running.
    pub fn set_player_x(&mut self, x: f32) {
        if self.phase == SessionPhase::Playing {
            self.player_x = x;
        }
    }

    /// Per-frame update: spawn when the interval has elapsed, advance every
    /// item, resolve catches, cull what fell past the bottom. No-op outside
    /// `Playing`.
    pub fn frame(&mut self, now_ms: f64, view: Viewport) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        if now_ms - self.last_spawn_ms > SPAWN_INTERVAL_MS {
            self.spawn_item(now_ms, view);
        }

        for item in &mut self.items {
            item.pos.y += FALL_SPEED;
        }

        let band_top = view.height - CATCH_BAND_TOP;
        let band_bottom = view.height - CATCH_BAND_BOTTOM;
        let player_x = self.player_x;

        let mut caught: Vec<ItemKind> = Vec::new();
        self.items.retain(|item| {
            let in_band = item.pos.y > band_top && item.pos.y < band_bottom;
            if in_band && (item.pos.x - player_x).abs() < CATCH_RADIUS {
                caught.push(item.kind);
                false
            } else {
                // Uncaught items vanish below the viewport with no score effect
                item.pos.y <= view.height
            }
        });

        for kind in caught {
            self.score = match kind {
                ItemKind::Bomb => self.score.saturating_sub(BOMB_PENALTY),
                _ => self.score + CATCH_REWARD,
            };
        }
    }

    /// Once-per-second countdown. On reaching zero the session ends and the
    /// final score is reported exactly once (max-merge in the sink). Returns
    /// true at that transition so the caller can cancel both timers.
    pub fn second_tick(&mut self, sink: &mut dyn ScoreSink) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return false;
        }

        self.phase = SessionPhase::Ended;
        sink.report_catch_score(self.score);
        log::info!("catch session ended, score {}", self.score);
        true
    }

    fn spawn_item(&mut self, now_ms: f64, view: Viewport) {
        let kind = SPAWN_TABLE[self.rng.random_range(0..SPAWN_TABLE.len())];
        let max_x = (view.width - SPAWN_MARGIN_X).max(SPAWN_MARGIN_X + 1.0);
        let x = self.rng.random_range(SPAWN_MARGIN_X..max_x);

        let id = self.next_item_id;
        self.next_item_id += 1;
        self.items.push(FallingItem {
            id,
            pos: Vec2::new(x, SPAWN_Y),
            kind,
        });
        self.last_spawn_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 400.0,
        height: 600.0,
    };

    #[derive(Default)]
    struct CountingSink {
        catch_reports: Vec<u32>,
    }

    impl ScoreSink for CountingSink {
        fn report_catch_score(&mut self, value: u32) {
            self.catch_reports.push(value);
        }

        fn report_puzzle_solved(&mut self) {}
    }

    #[test]
    fn test_idle_session_ignores_frames_and_input() {
        let mut session = CatchSession::new(1);
        session.set_player_x(123.0);
        session.frame(1000.0, VIEW);

        assert_eq!(session.phase, SessionPhase::Idle);
        assert_eq!(session.player_x, 0.0);
        assert!(session.items.is_empty());
    }

    #[test]
    fn test_session_scenario_spawns_then_ends_with_zero() {
        let mut session = CatchSession::new(1);
        let mut sink = CountingSink::default();
        session.start(0.0);

        // Three spawn intervals elapse, basket far away from everything
        session.set_player_x(-1000.0);
        for i in 1..=3 {
            session.frame(i as f64 * (SPAWN_INTERVAL_MS + 1.0), VIEW);
        }
        assert_eq!(session.items.len(), 3);
        assert!(session.items.iter().all(|item| item.pos.y < VIEW.height));

        // Countdown runs out
        for _ in 0..GAME_DURATION_SECS - 1 {
            assert!(!session.second_tick(&mut sink));
        }
        assert!(session.second_tick(&mut sink));

        assert_eq!(session.phase, SessionPhase::Ended);
        assert_eq!(sink.catch_reports, vec![0]);

        // Once ended, nothing moves and nothing reports again
        session.frame(10_000.0, VIEW);
        assert!(!session.second_tick(&mut sink));
        assert_eq!(sink.catch_reports, vec![0]);
    }

    #[test]
    fn test_catch_rewards_lucky_item() {
        let mut session = CatchSession::new(2);
        session.start(0.0);
        session.set_player_x(200.0);
        session.items.push(FallingItem {
            id: 99,
            pos: Vec2::new(210.0, VIEW.height - CATCH_BAND_TOP),
            kind: ItemKind::Coin,
        });

        session.frame(10.0, VIEW);

        assert_eq!(session.score, CATCH_REWARD);
        assert!(session.items.is_empty());
    }

    #[test]
    fn test_bomb_penalty_clamps_at_zero() {
        let mut session = CatchSession::new(2);
        session.start(0.0);
        session.score = 5;
        session.set_player_x(200.0);
        session.items.push(FallingItem {
            id: 99,
            pos: Vec2::new(200.0, VIEW.height - CATCH_BAND_TOP),
            kind: ItemKind::Bomb,
        });

        session.frame(10.0, VIEW);

        assert_eq!(session.score, 0);
        assert!(session.items.is_empty());
    }

    #[test]
    fn test_missed_item_culls_without_score() {
        let mut session = CatchSession::new(3);
        session.start(0.0);
        session.set_player_x(-1000.0);
        session.items.push(FallingItem {
            id: 99,
            pos: Vec2::new(200.0, VIEW.height - 2.0),
            kind: ItemKind::RedPacket,
        });

        session.frame(10.0, VIEW);

        assert!(session.items.is_empty());
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_spawns_stay_inside_margins() {
        let mut session = CatchSession::new(4);
        session.start(0.0);
        session.set_player_x(-1000.0);

        for i in 1..=50 {
            session.frame(i as f64 * (SPAWN_INTERVAL_MS + 1.0), VIEW);
        }

        assert!(!session.items.is_empty());
        for item in &session.items {
            assert!(item.pos.x >= SPAWN_MARGIN_X);
            assert!(item.pos.x <= VIEW.width - SPAWN_MARGIN_X);
        }
    }

    #[test]
    fn test_determinism_same_seed_same_items() {
        let mut a = CatchSession::new(77);
        let mut b = CatchSession::new(77);
        a.start(0.0);
        b.start(0.0);

        for i in 1..=10 {
            let now = i as f64 * (SPAWN_INTERVAL_MS + 1.0);
            a.frame(now, VIEW);
            b.frame(now, VIEW);
        }

        assert_eq!(a.items, b.items);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut session = CatchSession::new(5);
        let mut sink = CountingSink::default();
        session.start(0.0);
        session.score = 40;
        session.items.push(FallingItem {
            id: 99,
            pos: Vec2::new(10.0, 10.0),
            kind: ItemKind::Orange,
        });
        for _ in 0..GAME_DURATION_SECS {
            session.second_tick(&mut sink);
        }
        assert_eq!(session.phase, SessionPhase::Ended);

        session.start(5000.0);
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.time_left, GAME_DURATION_SECS);
        assert!(session.items.is_empty());
    }
}
