//! Round lifecycle: level loading, digging, water flow, scoring, judgement
//!
//! `Game` owns the physics world, the scheduler and the session. Every
//! gameplay operation is a method here; [`super::tick`] drives them from
//! buffered input on a fixed timestep.

use glam::Vec2;

use super::body::{BodyId, BodyRole, Visual};
use super::layout::{build_level, water_particle};
use super::meter::{GoalBand, MeterReading, water_percentage};
use super::state::{EndMessage, GamePhase, GameSession, Outcome};
use super::timer::{Fired, Scheduler, TimerKind};
use super::world::{CollisionPair, PhysicsWorld};
use crate::settings::Tuning;

/// One playable level and everything that happens in it
pub struct Game<W: PhysicsWorld> {
    pub(super) world: W,
    tuning: Tuning,
    band: GoalBand,
    pub(super) scheduler: Scheduler,
    pub(super) session: GameSession,
    pot_sensor: BodyId,
    plant: BodyId,
}

impl<W: PhysicsWorld> Game<W> {
    /// Build the level into `world` and wait for the player
    pub fn new(world: W, tuning: Tuning) -> Self {
        let mut game = Self {
            world,
            band: tuning.goal_band(),
            session: GameSession::new(tuning.total_water_needed, Vec::new()),
            tuning,
            scheduler: Scheduler::new(),
            pot_sensor: BodyId(0),
            plant: BodyId(0),
        };
        game.load_level();
        game
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn meter(&self) -> MeterReading {
        self.session.meter
    }

    pub fn message(&self) -> Option<EndMessage> {
        self.session.message
    }

    pub fn start_enabled(&self) -> bool {
        self.session.start_enabled
    }

    pub fn water_in_pot(&self) -> u32 {
        self.session.water_in_pot
    }

    pub fn pot_sensor(&self) -> BodyId {
        self.pot_sensor
    }

    /// Simulation clock (milliseconds since the game was created)
    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Unclamped percentage used for judgement
    pub fn water_percentage(&self) -> f64 {
        water_percentage(self.session.water_in_pot, self.session.total_water_needed)
    }

    // --- Level loading ---

    /// Throw away the current round and lay the level out again
    pub fn load_level(&mut self) {
        // Invalidate emission, stop and end-check tasks before anything else
        self.scheduler.reset();
        self.world.clear();

        let level = build_level(&mut self.world);
        self.pot_sensor = level.pot_sensor;
        self.plant = level.plant;
        self.session = GameSession::new(self.tuning.total_water_needed, level.dirt);
        self.update_meter();

        log::info!(
            "Level loaded (generation {}, {} dirt blocks)",
            self.scheduler.generation(),
            self.session.dirt.len()
        );
    }

    /// Reset button
    pub fn reset(&mut self) {
        log::info!("Reset requested");
        self.load_level();
    }

    /// Next-level button. There is only one layout, so this reloads it.
    pub fn next_level(&mut self) {
        log::info!("Next level requested");
        self.load_level();
    }

    // --- Digging ---

    pub fn pointer_down(&mut self) {
        if !self.session.flowing {
            self.session.digging = true;
        }
    }

    pub fn pointer_up(&mut self) {
        self.session.digging = false;
    }

    /// Remove every tracked dirt block under `point` while digging.
    /// Samples only the current point; fast drags can skip cells.
    pub fn pointer_move(&mut self, point: Vec2) -> usize {
        if !self.session.digging || self.session.flowing {
            return 0;
        }

        let hits = self.world.query_point(point, &self.session.dirt);
        if hits.is_empty() {
            return 0;
        }

        for &id in &hits {
            self.world.remove_body(id);
        }
        self.session.dirt.retain(|id| !hits.contains(id));

        log::debug!(
            "Dug {} block(s) at ({:.0}, {:.0}), {} left",
            hits.len(),
            point.x,
            point.y,
            self.session.dirt.len()
        );
        hits.len()
    }

    // --- Water flow ---

    /// Open the faucet. Returns false if the round has ended or the start
    /// control is already disabled.
    pub fn start_flow(&mut self) -> bool {
        if self.session.is_ended() || !self.session.start_enabled {
            return false;
        }

        self.session.flowing = true;
        self.session.start_enabled = false;
        self.session.phase = GamePhase::Flowing;
        self.session.emission = Some(
            self.scheduler
                .schedule_every(self.tuning.emit_interval_ms, TimerKind::EmitWater),
        );
        self.scheduler
            .schedule_once(self.tuning.flow_duration_ms, TimerKind::StopFlow);

        log::info!(
            "Water flowing for {} ms (one particle every {} ms)",
            self.tuning.flow_duration_ms,
            self.tuning.emit_interval_ms
        );
        true
    }

    /// Dispatch a task that came due
    pub(super) fn run_timer(&mut self, fired: Fired) {
        if fired.generation != self.scheduler.generation() {
            log::debug!("Dropping stale {:?} from generation {}", fired.kind, fired.generation);
            return;
        }

        match fired.kind {
            TimerKind::EmitWater => self.emit_water(),
            TimerKind::StopFlow => self.stop_flow(),
            TimerKind::CheckEnd => {
                self.check_end_condition();
            }
        }
    }

    fn emit_water(&mut self) {
        if self.session.is_ended() {
            self.cancel_emission();
            return;
        }

        let id = self.world.add_body(water_particle());
        self.session.water.insert(id);
        self.session.particles_emitted += 1;
        log::trace!("Water particle {:?} emitted", id);
    }

    fn stop_flow(&mut self) {
        if self.session.is_ended() {
            return;
        }

        self.cancel_emission();
        self.session.phase = GamePhase::Settling;
        self.scheduler
            .schedule_once(self.tuning.settle_delay_ms, TimerKind::CheckEnd);

        log::info!(
            "Faucet off after {} particles, settling for {} ms",
            self.session.particles_emitted,
            self.tuning.settle_delay_ms
        );
    }

    fn cancel_emission(&mut self) {
        if let Some(id) = self.session.emission.take() {
            self.scheduler.cancel(id);
        }
    }

    // --- Scoring ---

    /// Count water particles that reached the pot sensor. Returns how many
    /// were scored from `pairs`.
    pub fn on_collision_start(&mut self, pairs: &[CollisionPair]) -> u32 {
        let mut scored = 0;

        for pair in pairs {
            let (Some(role_a), Some(role_b)) = (self.world.role(pair.a), self.world.role(pair.b))
            else {
                continue;
            };

            let water = match (role_a, role_b) {
                (BodyRole::Water, BodyRole::PotSensor) => pair.a,
                (BodyRole::PotSensor, BodyRole::Water) => pair.b,
                _ => continue,
            };

            // Untracked means already counted
            if !self.session.water.remove(&water) {
                continue;
            }
            self.world.remove_body(water);
            self.session.water_in_pot += 1;
            scored += 1;
            self.update_meter();
        }

        if scored > 0 {
            log::debug!(
                "{} particle(s) reached the pot, {} total ({:.1}%)",
                scored,
                self.session.water_in_pot,
                self.water_percentage()
            );
        }
        scored
    }

    /// Recompute the meter and push the plant sprite into the world
    fn update_meter(&mut self) {
        let reading = MeterReading::new(
            self.session.water_in_pot,
            self.session.total_water_needed,
            &self.band,
        );
        self.session.meter = reading;
        self.world.set_visual(self.plant, Visual::Plant(reading.plant));
    }

    // --- Judgement ---

    /// Judge the round from the current count. `None` if already ended.
    pub fn check_end_condition(&mut self) -> Option<Outcome> {
        if self.session.is_ended() {
            return None;
        }

        let outcome = Outcome::judge(self.water_percentage(), &self.band);
        self.end_game(outcome);
        Some(outcome)
    }

    /// Enter `Ended`. Returns false (and changes nothing) if already ended.
    pub fn end_game(&mut self, outcome: Outcome) -> bool {
        if self.session.is_ended() {
            return false;
        }

        self.session.phase = GamePhase::Ended(outcome);
        self.session.flowing = false;
        self.cancel_emission();
        let message = outcome.message();
        self.session.message = Some(message);

        log::info!(
            "Round over: {:?} at {:.1}% ({} of {} particles) - {}",
            outcome,
            self.water_percentage(),
            self.session.water_in_pot,
            self.session.total_water_needed,
            message.title
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::PlantState;
    use crate::sim::state::LoseReason;
    use crate::sim::testing::FakeWorld;

    fn new_game() -> Game<FakeWorld> {
        Game::new(FakeWorld::new(), Tuning::default())
    }

    #[test]
    fn test_new_game_is_loading_with_full_grid() {
        let game = new_game();
        assert_eq!(game.phase(), GamePhase::Loading);
        assert!(game.start_enabled());
        assert_eq!(game.session().dirt.len(), 760);
        assert!(game.session().water.is_empty());
        assert_eq!(game.water_in_pot(), 0);
        assert_eq!(game.meter(), MeterReading::default());
        assert_eq!(
            game.world().visual(game.plant),
            Some(Visual::Plant(PlantState::Wilting))
        );
    }

    #[test]
    fn test_dig_removes_block_under_pointer() {
        let mut game = new_game();
        let before = game.world().body_count();

        // Row 6, column 0: the first cell laid out
        let target = game.session().dirt[0];

        game.pointer_down();
        assert_eq!(game.pointer_move(Vec2::new(15.0, 135.0)), 1);
        assert_eq!(game.world().removed, vec![target]);
        assert!(!game.session().dirt.contains(&target));
        assert_eq!(game.session().dirt.len(), 759);
        assert_eq!(game.world().body_count(), before - 1);

        // Same cell again: already gone
        assert_eq!(game.pointer_move(Vec2::new(15.0, 135.0)), 0);
        // Above the soil band
        assert_eq!(game.pointer_move(Vec2::new(300.0, 60.0)), 0);
        assert_eq!(game.session().dirt.len(), 759);
        assert_eq!(game.world().removed, vec![target]);
    }

    #[test]
    fn test_dig_on_shared_edge_removes_both_cells() {
        let mut game = new_game();
        // Row 6, columns 1 and 2 meet at x = 40
        let left = game.session().dirt[1];
        let right = game.session().dirt[2];
        assert_eq!(game.world().desc(left).map(|d| d.position), Some(Vec2::new(30.0, 130.0)));
        assert_eq!(game.world().desc(right).map(|d| d.position), Some(Vec2::new(50.0, 130.0)));

        game.pointer_down();
        assert_eq!(game.pointer_move(Vec2::new(40.0, 135.0)), 2);
        assert_eq!(game.world().removed, vec![left, right]);
        assert!(!game.session().dirt.contains(&left));
        assert!(!game.session().dirt.contains(&right));
        assert_eq!(game.session().dirt.len(), 758);
    }

    #[test]
    fn test_dig_deeper_cell_leaves_neighbours() {
        let mut game = new_game();
        // Row 8, column 5
        let target = game.session().dirt[2 * 40 + 5];

        game.pointer_down();
        assert_eq!(game.pointer_move(Vec2::new(105.0, 165.0)), 1);
        assert_eq!(game.world().removed, vec![target]);
        assert_eq!(game.world().ids_with_role(BodyRole::Dirt).len(), 759);
        assert_eq!(game.world().ids_with_role(BodyRole::Dirt), game.session().dirt);
    }

    #[test]
    fn test_dig_needs_pointer_down() {
        let mut game = new_game();
        assert_eq!(game.pointer_move(Vec2::new(15.0, 135.0)), 0);

        game.pointer_down();
        game.pointer_up();
        assert_eq!(game.pointer_move(Vec2::new(15.0, 135.0)), 0);
        assert_eq!(game.session().dirt.len(), 760);
    }

    #[test]
    fn test_dig_is_noop_while_flowing() {
        let mut game = new_game();
        game.pointer_down();
        assert!(game.start_flow());

        assert_eq!(game.pointer_move(Vec2::new(15.0, 135.0)), 0);
        assert_eq!(game.session().dirt.len(), 760);

        // Pressing again while flowing does not arm digging either
        game.pointer_up();
        game.pointer_down();
        assert!(!game.session().digging);
    }

    #[test]
    fn test_start_flow_disables_start_and_rejects_reentry() {
        let mut game = new_game();
        assert!(game.start_flow());
        assert_eq!(game.phase(), GamePhase::Flowing);
        assert!(game.session().flowing);
        assert!(!game.start_enabled());
        let pending = game.scheduler.pending();

        assert!(!game.start_flow());
        assert_eq!(game.scheduler.pending(), pending);
    }

    #[test]
    fn test_start_flow_after_end_is_noop() {
        let mut game = new_game();
        game.end_game(Outcome::Win);
        assert!(!game.start_flow());
        assert!(!game.session().flowing);
        assert_eq!(game.scheduler.pending(), 0);
    }

    fn emit(game: &mut Game<FakeWorld>, count: usize) -> Vec<BodyId> {
        for _ in 0..count {
            game.emit_water();
        }
        game.session().water.iter().copied().collect()
    }

    #[test]
    fn test_scoring_counts_once_and_removes_particle() {
        let mut game = new_game();
        let water = emit(&mut game, 2);
        let sensor = game.pot_sensor();

        let pairs = [
            CollisionPair::new(water[0], sensor),
            // Same particle again in the same step
            CollisionPair::new(sensor, water[0]),
        ];
        assert_eq!(game.on_collision_start(&pairs), 1);
        assert_eq!(game.water_in_pot(), 1);
        assert!(!game.world().contains(water[0]));
        assert_eq!(game.world().removed, vec![water[0]]);
        assert!(!game.session().water.contains(&water[0]));

        // And again in a later step
        assert_eq!(
            game.on_collision_start(&[CollisionPair::new(water[0], sensor)]),
            0
        );

        // Reversed order counts the other particle
        assert_eq!(
            game.on_collision_start(&[CollisionPair::new(sensor, water[1])]),
            1
        );
        assert_eq!(game.water_in_pot(), 2);
    }

    #[test]
    fn test_scoring_ignores_other_pairs() {
        let mut game = new_game();
        let water = emit(&mut game, 2);
        let dirt = game.session().dirt[0];
        let sensor = game.pot_sensor();

        let pairs = [
            CollisionPair::new(water[0], dirt),
            CollisionPair::new(water[0], water[1]),
            CollisionPair::new(dirt, sensor),
            CollisionPair::new(BodyId(99_999), sensor),
        ];
        assert_eq!(game.on_collision_start(&pairs), 0);
        assert_eq!(game.water_in_pot(), 0);
        assert_eq!(game.session().water.len(), 2);
    }

    #[test]
    fn test_meter_follows_score() {
        let tuning = Tuning {
            total_water_needed: 4,
            ..Tuning::default()
        };
        let mut game = Game::new(FakeWorld::new(), tuning);
        let water = emit(&mut game, 4);
        let sensor = game.pot_sensor();

        game.on_collision_start(&[CollisionPair::new(water[0], sensor)]);
        assert_eq!(game.meter().percentage, 25.0);
        assert_eq!(game.meter().plant, PlantState::Wilting);

        game.on_collision_start(&[CollisionPair::new(water[1], sensor)]);
        assert_eq!(game.meter().plant, PlantState::Healthy);
        assert_eq!(
            game.world().visual(game.plant),
            Some(Visual::Plant(PlantState::Healthy))
        );

        game.on_collision_start(&[
            CollisionPair::new(water[2], sensor),
            CollisionPair::new(water[3], sensor),
        ]);
        assert_eq!(game.meter().percentage, 100.0);
        assert_eq!(game.meter().plant, PlantState::Drowning);
        assert_eq!(game.meter().color(), "#8B4513");
    }

    #[test]
    fn test_end_condition_examples() {
        for (count, expected) in [
            (70, Outcome::Win),
            (69, Outcome::Lose(LoseReason::UnderWatered)),
            (131, Outcome::Lose(LoseReason::OverIrrigated)),
            (130, Outcome::Win),
        ] {
            let mut game = new_game();
            game.session.water_in_pot = count;
            assert_eq!(game.check_end_condition(), Some(expected));
            assert_eq!(game.phase(), GamePhase::Ended(expected));
            assert_eq!(game.message(), Some(expected.message()));
        }
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut game = new_game();
        game.start_flow();

        assert!(game.end_game(Outcome::Win));
        let message = game.message();
        assert!(!game.end_game(Outcome::Lose(LoseReason::UnderWatered)));
        assert_eq!(game.message(), message);
        assert_eq!(game.phase(), GamePhase::Ended(Outcome::Win));
        assert_eq!(game.check_end_condition(), None);

        assert!(!game.session().flowing);
        assert!(game.session().emission.is_none());
    }

    #[test]
    fn test_emission_stops_once_ended() {
        let mut game = new_game();
        game.start_flow();
        game.end_game(Outcome::Win);
        game.emit_water();
        assert_eq!(game.session().particles_emitted, 0);
    }

    #[test]
    fn test_load_level_restores_everything() {
        let mut game = new_game();
        game.pointer_down();
        game.pointer_move(Vec2::new(15.0, 135.0));
        game.pointer_up();
        game.start_flow();
        let water = emit(&mut game, 3);
        game.on_collision_start(&[CollisionPair::new(water[0], game.pot_sensor())]);
        game.end_game(Outcome::Lose(LoseReason::UnderWatered));

        game.reset();

        assert_eq!(game.phase(), GamePhase::Loading);
        assert_eq!(game.session().dirt.len(), 760);
        assert!(game.session().water.is_empty());
        assert_eq!(game.water_in_pot(), 0);
        assert!(game.start_enabled());
        assert!(game.message().is_none());
        assert_eq!(game.scheduler.pending(), 0);
        assert_eq!(game.world().ids_with_role(BodyRole::Water).len(), 0);
        assert_eq!(game.world().body_count(), 7 + 760);
    }

    #[test]
    fn test_next_level_reloads_same_layout() {
        let mut game = new_game();
        let before: Vec<_> = game
            .world()
            .snapshot()
            .into_iter()
            .map(|s| (s.role, s.position))
            .collect();
        game.start_flow();
        game.next_level();
        let after: Vec<_> = game
            .world()
            .snapshot()
            .into_iter()
            .map(|s| (s.role, s.position))
            .collect();
        assert_eq!(before, after);
        assert_eq!(game.phase(), GamePhase::Loading);
    }
}
