//! The single owner of game state.
//!
//! Every mutation goes through [`GameStore::commit`], which swaps in a whole
//! new snapshot. Readers hold `Arc<GameState>` snapshots that never change
//! underneath them.

use crate::clock::{Clock, SystemClock};
use crate::notifications::NotificationCenter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{
    validate_state, ComponentCategory, ConfigError, CrewId, CrewMember, EconomyConfig, GameState,
    InvariantViolation, Legacy, Market, Notification, ResourceKind, Resources, Severity, Ship,
    StarSystem, TradeSide,
};
use sim_econ::ledger::{apply_saturating, DeltaMode};
use sim_econ::{execute, Action, TransactionError};
use std::sync::Arc;
use tracing::{error, info, trace};

/// Receives every committed snapshot, e.g. to autosave it.
pub trait SnapshotSink: Send {
    fn on_commit(&mut self, snapshot: &Arc<GameState>);
}

pub struct GameStore {
    config: EconomyConfig,
    state: Arc<GameState>,
    rng: ChaCha8Rng,
    notifications: NotificationCenter,
    clock: Arc<dyn Clock>,
    sinks: Vec<Box<dyn SnapshotSink>>,
    revision: u64,
}

impl GameStore {
    /// A new game with the configured opening position.
    pub fn new(config: EconomyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new_game(&config);
        validate_state(&state, &config.bounds)?;
        Ok(Self::with_state(config, state))
    }

    fn with_state(config: EconomyConfig, state: GameState) -> Self {
        Self {
            rng: seeded_rng(config.rng_seed, state.rng_cursor),
            notifications: NotificationCenter::new(config.notification_ttl_ms),
            state: Arc::new(state),
            config,
            clock: Arc::new(SystemClock),
            sinks: Vec::new(),
            revision: 0,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn SnapshotSink>) {
        self.sinks.push(sink);
    }

    /// Replace the whole game with a restored snapshot. The notification
    /// feed is cleared and the RNG resumes at the snapshot's cursor.
    pub fn restore(&mut self, state: GameState) -> Result<(), InvariantViolation> {
        validate_state(&state, &self.config.bounds)?;
        self.rng = seeded_rng(self.config.rng_seed, state.rng_cursor);
        self.notifications.clear();
        self.state = Arc::new(state);
        self.revision += 1;
        info!(ticks = self.state.ticks, "game restored");
        Ok(())
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    /// The current snapshot. Cheap to clone and safe to hand to other owners.
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn resources(&self) -> &Resources {
        &self.state.resources
    }

    pub fn generation_rates(&self) -> &Resources {
        &self.state.generation_rates
    }

    pub fn ship(&self) -> &Ship {
        &self.state.ship
    }

    pub fn crew(&self) -> &[CrewMember] {
        &self.state.crew
    }

    pub fn systems(&self) -> &[StarSystem] {
        &self.state.systems
    }

    pub fn selected_system(&self) -> Option<&StarSystem> {
        self.state.selected()
    }

    pub fn market(&self) -> &Market {
        &self.state.market
    }

    pub fn legacy(&self) -> &Legacy {
        &self.state.legacy
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    pub fn last_notification_id(&self) -> u64 {
        self.notifications.last_id()
    }

    /// Run one action. Exactly one notification is recorded for the outcome,
    /// except for successful system selection, which is a pointer move.
    pub fn dispatch(&mut self, action: Action) -> Result<String, TransactionError> {
        let now = self.clock.now();
        match execute(&self.state, &action, &self.config, &mut self.rng) {
            Ok(outcome) => {
                let mut next = outcome.fragments.apply_to(&self.state);
                next.rng_cursor = self.rng.get_word_pos();
                self.commit(next);
                info!(
                    action = action.label(),
                    revision = self.revision,
                    "{}",
                    outcome.message
                );
                if !matches!(action, Action::SelectSystem(_)) {
                    self.notifications
                        .push(outcome.message.clone(), Severity::Success, now);
                }
                Ok(outcome.message)
            }
            Err(err) => {
                self.notifications.push(err.to_string(), Severity::Error, now);
                Err(err)
            }
        }
    }

    pub fn train_crew(&mut self) -> Result<String, TransactionError> {
        self.dispatch(Action::TrainCrew)
    }

    pub fn boost_morale(&mut self) -> Result<String, TransactionError> {
        self.dispatch(Action::BoostMorale)
    }

    pub fn recruit_crew(&mut self) -> Result<String, TransactionError> {
        self.dispatch(Action::RecruitCrew)
    }

    pub fn explore_system(&mut self) -> Result<String, TransactionError> {
        self.dispatch(Action::ExploreSystem)
    }

    pub fn establish_colony(&mut self) -> Result<String, TransactionError> {
        self.dispatch(Action::EstablishColony)
    }

    pub fn purchase_component(
        &mut self,
        category: ComponentCategory,
        name: &str,
    ) -> Result<String, TransactionError> {
        self.dispatch(Action::PurchaseComponent {
            category,
            name: name.to_string(),
        })
    }

    pub fn trade(
        &mut self,
        resource: ResourceKind,
        side: TradeSide,
    ) -> Result<String, TransactionError> {
        self.dispatch(Action::Trade { resource, side })
    }

    pub fn select_heir(&mut self, id: &CrewId) -> Result<String, TransactionError> {
        self.dispatch(Action::SelectHeir(id.clone()))
    }

    pub fn select_system(&mut self, name: &str) -> Result<String, TransactionError> {
        self.dispatch(Action::SelectSystem(name.to_string()))
    }

    /// Apply one round of passive generation. Never fails; each resource
    /// saturates at its bound.
    pub fn tick(&mut self) -> Resources {
        let resources = apply_saturating(
            &self.state.resources,
            &self.state.generation_rates,
            DeltaMode::Add,
            &self.config.bounds,
        );
        let mut next = (*self.state).clone();
        next.resources = resources;
        next.ticks += 1;
        self.commit(next);
        trace!(ticks = self.state.ticks, credits = %resources.credits, "generation tick");
        resources
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        self.notifications.dismiss(id)
    }

    /// Drop notifications older than the configured lifetime.
    pub fn expire_notifications(&mut self) -> usize {
        let now = self.clock.now();
        self.notifications.expire(now)
    }

    fn commit(&mut self, next: GameState) {
        if let Err(violation) = validate_state(&next, &self.config.bounds) {
            error!(%violation, "refusing to commit corrupted state");
            panic!("game state invariant violated: {violation}");
        }
        self.state = Arc::new(next);
        self.revision += 1;
        for sink in &mut self.sinks {
            sink.on_commit(&self.state);
        }
    }
}

fn seeded_rng(seed: u64, cursor: u128) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_word_pos(cursor);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use sim_core::{CrewRole, SystemStatus, MAX_SKILL};
    use sim_econ::PreconditionFailure;
    use std::sync::Mutex;

    fn store() -> GameStore {
        GameStore::new(EconomyConfig::default()).unwrap()
    }

    #[test]
    fn four_trainings_leave_six_hundred_credits() {
        let mut s = store();
        for _ in 0..4 {
            s.train_crew().unwrap();
        }
        assert_eq!(s.resources().credits, Decimal::from(600));
        assert!(s.crew().iter().all(|c| c.skills.max_level() <= MAX_SKILL));
        assert_eq!(s.notifications().len(), 4);
        assert!(s.notifications().iter().all(|n| n.severity == Severity::Success));
    }

    #[test]
    fn explore_twice_only_first_succeeds() {
        let mut s = store();
        assert_eq!(s.resources().energy, Decimal::from(100));
        s.select_system("Alpha Centauri").unwrap();
        assert!(s.notifications().is_empty());
        s.explore_system().unwrap();
        assert_eq!(s.resources().energy, Decimal::from(50));
        assert_eq!(
            s.selected_system().unwrap().status,
            SystemStatus::Explored
        );
        let err = s.explore_system().unwrap_err();
        assert_eq!(
            err,
            TransactionError::Precondition(PreconditionFailure::AlreadyExplored(
                "Alpha Centauri".into()
            ))
        );
        assert_eq!(s.resources().energy, Decimal::from(50));
        let last = s.notifications().last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.message, "Alpha Centauri has already been explored");
    }

    #[test]
    fn failed_transaction_keeps_snapshot_identity() {
        let mut s = store();
        let before = s.snapshot();
        let rev = s.revision();
        assert!(s.establish_colony().is_err());
        assert!(Arc::ptr_eq(&before, &s.snapshot()));
        assert_eq!(s.revision(), rev);
        assert_eq!(s.notifications().len(), 1);
    }

    #[test]
    fn recruitment_at_capacity_fails_regardless_of_funds() {
        let mut s = store();
        let mut state = (*s.snapshot()).clone();
        state.resources.credits = Decimal::from(900_000);
        state.ship.stats.crew_capacity = state.crew.len() as u32;
        s.restore(state).unwrap();
        for _ in 0..3 {
            assert!(matches!(
                s.recruit_crew(),
                Err(TransactionError::Precondition(PreconditionFailure::CrewAtCapacity { .. }))
            ));
        }
    }

    #[test]
    fn heir_selection_is_exclusive_and_filtered() {
        let mut s = store();
        let captain = s
            .crew()
            .iter()
            .find(|c| c.role == CrewRole::Captain)
            .unwrap()
            .id
            .clone();
        assert!(s.select_heir(&captain).is_err());
        let ids: Vec<CrewId> = s
            .crew()
            .iter()
            .filter(|c| c.role != CrewRole::Captain)
            .map(|c| c.id.clone())
            .collect();
        s.select_heir(&ids[0]).unwrap();
        s.select_heir(&ids[1]).unwrap();
        let heirs: Vec<&CrewMember> = s.crew().iter().filter(|c| c.is_heir).collect();
        assert_eq!(heirs.len(), 1);
        assert_eq!(heirs[0].id, ids[1]);
    }

    #[test]
    fn colonizing_reduces_open_planets_by_one() {
        let mut s = store();
        let mut state = (*s.snapshot()).clone();
        state.resources = Resources::from_units(10_000, 1000, 2000, 100, 10);
        s.restore(state).unwrap();
        s.select_system("Vega").unwrap();
        s.explore_system().unwrap();
        let open = s.selected_system().unwrap().undeveloped_count();
        s.establish_colony().unwrap();
        assert_eq!(s.selected_system().unwrap().undeveloped_count(), open - 1);
    }

    #[test]
    fn tick_saturates_and_counts() {
        let mut s = store();
        let mut state = (*s.snapshot()).clone();
        state.resources.credits = Decimal::from(999_995);
        s.restore(state).unwrap();
        let r = s.tick();
        assert_eq!(r.credits, Decimal::from(1_000_000));
        assert_eq!(r.energy, Decimal::from(105));
        assert_eq!(s.snapshot().ticks, 1);
        assert!(s.notifications().is_empty());
    }

    #[test]
    fn notifications_expire_on_clock() {
        let start = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let mut s = store().with_clock(clock.clone());
        s.boost_morale().unwrap();
        clock.advance_ms(4_000);
        assert_eq!(s.expire_notifications(), 0);
        clock.advance_ms(1_000);
        assert_eq!(s.expire_notifications(), 1);
        assert!(s.notifications().is_empty());
    }

    #[test]
    fn restore_clears_notifications_and_rejects_corruption() {
        let mut s = store();
        s.boost_morale().unwrap();
        let mut bad = (*s.snapshot()).clone();
        bad.crew[1].is_heir = true;
        bad.crew[2].is_heir = true;
        assert!(s.restore(bad).is_err());
        assert_eq!(s.notifications().len(), 1);
        let good = (*s.snapshot()).clone();
        s.restore(good).unwrap();
        assert!(s.notifications().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_before_play() {
        let mut cfg = EconomyConfig::default();
        cfg.generation_rates.credits = Decimal::from(-5);
        assert!(matches!(GameStore::new(cfg), Err(ConfigError::NegativeRate(_))));

        let mut cfg = EconomyConfig::default();
        cfg.starting_resources.credits = Decimal::from(5_000_000);
        assert!(matches!(GameStore::new(cfg), Err(ConfigError::StartOutOfBounds(_))));
    }

    #[test]
    fn restored_game_continues_the_same_random_sequence() {
        let mut played = store();
        played.train_crew().unwrap();
        played.tick();
        let saved = (*played.snapshot()).clone();
        assert_ne!(saved.rng_cursor, 0);
        played.train_crew().unwrap();
        played.recruit_crew().unwrap();

        let mut loaded = store();
        loaded.restore(saved).unwrap();
        loaded.train_crew().unwrap();
        loaded.recruit_crew().unwrap();
        assert_eq!(loaded.crew(), played.crew());
        assert_eq!(loaded.snapshot().rng_cursor, played.snapshot().rng_cursor);
    }

    struct Recorder(Arc<Mutex<Vec<u64>>>);

    impl SnapshotSink for Recorder {
        fn on_commit(&mut self, snapshot: &Arc<GameState>) {
            self.0.lock().unwrap().push(snapshot.ticks);
        }
    }

    #[test]
    fn sinks_see_every_commit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut s = store();
        s.add_sink(Box::new(Recorder(seen.clone())));
        s.tick();
        s.train_crew().unwrap();
        let _ = s.explore_system();
        s.tick();
        assert_eq!(*seen.lock().unwrap(), vec![1, 1, 2]);
    }
}
