//! Rotation Service - schedule recalculation driver
//!
//! # Architecture
//! - Reads the registry snapshot, runs the pure rotation engine on a copy
//!   of the persisted state, and commits only after the store accepted it.
//! - Installs the resulting schedule through the publisher port and emits
//!   rotation events once the new state is durable.
//! - One recalculation at a time: the state lock is held for the whole run.

use crate::algorithms::{compute_rotation, PairTransition};
use crate::config::RotationConfig;
use crate::domain::{RankedProducerList, RotationPair, RotationState, Timestamp};
use crate::error::Result;
use crate::events::RotationEvent;
use crate::metrics;
use crate::ports::{
    ProducerRegistry, RotationApi, RotationEventSink, RotationStateStore, ScheduleUpdate,
    SchedulePublisher, SystemTimeSource, TimeSource,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Dependencies for RotationService
pub struct RotationDependencies<R, S, P, E>
where
    R: ProducerRegistry,
    S: RotationStateStore,
    P: SchedulePublisher,
    E: RotationEventSink,
{
    /// Producer registry / vote tally
    pub registry: Arc<R>,
    /// Rotation state persistence
    pub store: Arc<S>,
    /// Schedule installation hook
    pub publisher: Arc<P>,
    /// Rotation event sink
    pub events: Arc<E>,
}

struct ServiceState {
    rotation: RotationState,
    schedule_update_interval_secs: u64,
    last_recalculation: Option<Timestamp>,
}

impl ServiceState {
    fn recalculation_due(&self, now: Timestamp) -> bool {
        match self.last_recalculation {
            None => true,
            Some(_) if self.schedule_update_interval_secs == 0 => true,
            Some(last) => now >= last.saturating_add(self.schedule_update_interval_secs),
        }
    }
}

/// Producer Rotation Service
pub struct RotationService<R, S, P, E>
where
    R: ProducerRegistry,
    S: RotationStateStore,
    P: SchedulePublisher,
    E: RotationEventSink,
{
    registry: Arc<R>,
    store: Arc<S>,
    publisher: Arc<P>,
    events: Arc<E>,
    inner: Mutex<ServiceState>,
    time_source: Box<dyn TimeSource>,
}

impl<R, S, P, E> RotationService<R, S, P, E>
where
    R: ProducerRegistry,
    S: RotationStateStore,
    P: SchedulePublisher,
    E: RotationEventSink,
{
    /// Create the service, resuming the persisted state or creating genesis.
    ///
    /// A persisted state keeps its own rotation constants; `config` then
    /// only supplies the recalculation interval.
    pub fn new(deps: RotationDependencies<R, S, P, E>, config: RotationConfig) -> Result<Self> {
        config.validate()?;

        let rotation = match deps.store.load()? {
            Some(state) => {
                info!(
                    last_rotation_time = state.last_rotation_time(),
                    pair = ?state.pair(),
                    "[qc-18] Resumed persisted rotation state"
                );
                state
            }
            None => {
                let state = RotationState::genesis(&config);
                deps.store.save(&state)?;
                info!(
                    active_count = config.active_count,
                    standby_window = config.standby_window,
                    rotation_period_secs = config.rotation_period_secs,
                    "[qc-18] Rotation state initialised at genesis"
                );
                state
            }
        };

        Ok(Self {
            registry: deps.registry,
            store: deps.store,
            publisher: deps.publisher,
            events: deps.events,
            inner: Mutex::new(ServiceState {
                rotation,
                schedule_update_interval_secs: config.schedule_update_interval_secs,
                last_recalculation: None,
            }),
            time_source: Box::new(SystemTimeSource),
        })
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Box<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Recalculate at the time source's current time.
    pub fn tick(&self) -> Result<ScheduleUpdate> {
        self.recalculate_at(self.time_source.now())
    }

    fn recalculate_locked(&self, inner: &mut ServiceState, now: Timestamp) -> Result<ScheduleUpdate> {
        let ranked = RankedProducerList::from_snapshot(self.registry.ranked_snapshot()?);

        let mut next = inner.rotation.clone();
        let outcome = compute_rotation(&ranked, &mut next, now);

        self.store.save(&next)?;
        inner.rotation = next;
        inner.last_recalculation = Some(now);

        metrics::record_schedule_computed(outcome.schedule.len());
        match &outcome.transition {
            PairTransition::Advanced { .. } => metrics::record_pair_advanced(),
            PairTransition::Cleared { reason, .. } => metrics::record_pair_cleared(reason.as_str()),
            PairTransition::Unchanged => {}
        }
        // Pair events describe the committed state and fire even if the
        // install below fails; the next trigger re-proposes the schedule.
        if let Some(event) = RotationEvent::from_transition(&outcome.transition, now) {
            self.events.publish(event);
        }

        let installed_version = self.publisher.install_schedule(&outcome.schedule)?;
        if let Some(version) = installed_version {
            metrics::record_schedule_installed(version);

            let mut producers: Vec<_> = outcome
                .schedule
                .iter()
                .map(|k| k.producer.clone())
                .collect();
            producers.sort();
            self.events.publish(RotationEvent::ScheduleInstalled {
                version,
                producers,
                at: now,
            });
        }

        debug!(
            now,
            producers = outcome.schedule.len(),
            ?installed_version,
            "[qc-18] Schedule recalculated"
        );

        Ok(ScheduleUpdate {
            schedule: outcome.schedule,
            pair: inner.rotation.pair().cloned(),
            installed_version,
        })
    }
}

impl<R, S, P, E> RotationApi for RotationService<R, S, P, E>
where
    R: ProducerRegistry,
    S: RotationStateStore,
    P: SchedulePublisher,
    E: RotationEventSink,
{
    fn recalculate_at(&self, now: Timestamp) -> Result<ScheduleUpdate> {
        let mut inner = self.inner.lock();
        self.recalculate_locked(&mut inner, now)
    }

    fn on_block(&self, now: Timestamp) -> Result<Option<ScheduleUpdate>> {
        let mut inner = self.inner.lock();
        if !inner.recalculation_due(now) {
            return Ok(None);
        }
        self.recalculate_locked(&mut inner, now).map(Some)
    }

    fn current_pair(&self) -> Option<RotationPair> {
        self.inner.lock().rotation.pair().cloned()
    }

    fn state_snapshot(&self) -> RotationState {
        self.inner.lock().rotation.clone()
    }

    fn update_config(&self, config: RotationConfig) -> Result<()> {
        config.validate()?;

        let mut inner = self.inner.lock();
        let mut next = inner.rotation.clone();
        next.apply_config(&config);

        self.store.save(&next)?;
        inner.rotation = next;
        inner.schedule_update_interval_secs = config.schedule_update_interval_secs;

        info!(
            active_count = config.active_count,
            standby_window = config.standby_window,
            rotation_period_secs = config.rotation_period_secs,
            fresh_entrant_policy = ?config.fresh_entrant_policy,
            "[qc-18] Rotation constants updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryEventSink, InMemoryProducerRegistry, InMemorySchedulePublisher, InMemoryStateStore,
    };
    use crate::domain::{ProducerName, PublicKey};
    use crate::error::RotationError;
    use std::sync::atomic::{AtomicBool, Ordering};

    const T0: Timestamp = 1_700_000_000;

    type TestService = RotationService<
        InMemoryProducerRegistry,
        InMemoryStateStore,
        InMemorySchedulePublisher,
        InMemoryEventSink,
    >;

    struct Fixture {
        registry: Arc<InMemoryProducerRegistry>,
        store: Arc<InMemoryStateStore>,
        publisher: Arc<InMemorySchedulePublisher>,
        events: Arc<InMemoryEventSink>,
    }

    impl Fixture {
        fn new(active: usize, standby: usize) -> Self {
            let registry = InMemoryProducerRegistry::new();
            for i in 0..active {
                let name = ProducerName::new(format!("prod{:02}", i));
                registry
                    .register_producer(name.clone(), PublicKey::from_bytes([i as u8; 33]))
                    .unwrap();
                registry.set_votes(&name, 1_000 - i as u128).unwrap();
            }
            for i in 0..standby {
                let name = ProducerName::new(format!("runnerup{}", i + 1));
                registry
                    .register_producer(name.clone(), PublicKey::from_bytes([0xf0 + i as u8; 33]))
                    .unwrap();
                registry.set_votes(&name, 100 - i as u128).unwrap();
            }

            Self {
                registry: Arc::new(registry),
                store: Arc::new(InMemoryStateStore::new()),
                publisher: Arc::new(InMemorySchedulePublisher::new()),
                events: Arc::new(InMemoryEventSink::new()),
            }
        }

        fn deps(&self) -> RotationDependencies<
            InMemoryProducerRegistry,
            InMemoryStateStore,
            InMemorySchedulePublisher,
            InMemoryEventSink,
        > {
            RotationDependencies {
                registry: self.registry.clone(),
                store: self.store.clone(),
                publisher: self.publisher.clone(),
                events: self.events.clone(),
            }
        }

        fn service(&self, config: RotationConfig) -> TestService {
            RotationService::new(self.deps(), config).unwrap()
        }
    }

    struct FixedTimeSource(Timestamp);

    impl TimeSource for FixedTimeSource {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    /// Store whose writes can be switched off.
    struct FlakyStore {
        inner: InMemoryStateStore,
        fail: AtomicBool,
    }

    impl RotationStateStore for FlakyStore {
        fn load(&self) -> Result<Option<RotationState>> {
            self.inner.load()
        }

        fn save(&self, state: &RotationState) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RotationError::Storage("disk full".into()));
            }
            self.inner.save(state)
        }
    }

    #[test]
    fn test_genesis_state_is_persisted() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());

        let persisted = fixture.store.load().unwrap().unwrap();
        assert_eq!(persisted, service.state_snapshot());
        assert!(service.current_pair().is_none());
    }

    #[test]
    fn test_persisted_state_is_resumed() {
        let fixture = Fixture::new(21, 4);
        let first = fixture.service(RotationConfig::for_testing());
        first.recalculate_at(T0).unwrap();
        let pair = first.current_pair();
        assert!(pair.is_some());

        // a different config must not override persisted constants
        let config = RotationConfig {
            active_count: 5,
            ..RotationConfig::for_testing()
        };
        let second = fixture.service(config);

        assert_eq!(second.current_pair(), pair);
        assert_eq!(second.state_snapshot().active_count(), 21);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let fixture = Fixture::new(21, 4);
        let config = RotationConfig {
            rotation_period_secs: 0,
            ..RotationConfig::for_testing()
        };

        let result = RotationService::new(fixture.deps(), config);
        assert!(matches!(result, Err(RotationError::InvalidConfig(_))));
        assert!(fixture.store.row().is_none());
    }

    #[test]
    fn test_recalculate_installs_and_emits() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());

        let update = service.recalculate_at(T0).unwrap();

        assert_eq!(update.schedule.len(), 21);
        assert_eq!(update.installed_version, Some(1));
        assert_eq!(
            update.pair,
            Some(RotationPair::new("prod00".into(), "runnerup1".into()))
        );
        assert_eq!(fixture.publisher.version(), 1);

        let events = fixture.events.get_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "pair_advanced");
        match &events[1] {
            RotationEvent::ScheduleInstalled {
                version, producers, ..
            } => {
                assert_eq!(*version, 1);
                assert_eq!(producers.len(), 21);
                assert!(producers.windows(2).all(|w| w[0] < w[1]));
                assert!(!producers.contains(&"prod00".into()));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_unchanged_schedule_not_reinstalled() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());

        service.recalculate_at(T0).unwrap();
        fixture.events.drain();

        let update = service.recalculate_at(T0 + 1).unwrap();
        assert_eq!(update.installed_version, None);
        assert_eq!(fixture.publisher.version(), 1);
        assert_eq!(fixture.events.event_count(), 0);
    }

    #[test]
    fn test_on_block_honours_interval() {
        let fixture = Fixture::new(21, 4);
        let config = RotationConfig {
            schedule_update_interval_secs: 60,
            ..RotationConfig::for_testing()
        };
        let service = fixture.service(config);

        assert!(service.on_block(T0).unwrap().is_some());
        assert!(service.on_block(T0 + 30).unwrap().is_none());
        assert!(service.on_block(T0 + 59).unwrap().is_none());
        assert!(service.on_block(T0 + 60).unwrap().is_some());
    }

    #[test]
    fn test_on_block_zero_interval_runs_every_block() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());

        for offset in 0..5 {
            assert!(service.on_block(T0 + offset).unwrap().is_some());
        }
    }

    /// Publisher whose installs can be switched off.
    struct FlakyPublisher {
        inner: InMemorySchedulePublisher,
        fail: AtomicBool,
    }

    impl SchedulePublisher for FlakyPublisher {
        fn install_schedule(&self, schedule: &[crate::domain::ProducerKey]) -> Result<Option<u32>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RotationError::Storage("host rejected schedule".into()));
            }
            self.inner.install_schedule(schedule)
        }
    }

    #[test]
    fn test_failed_install_keeps_committed_state_and_retries() {
        let fixture = Fixture::new(21, 4);
        let publisher = Arc::new(FlakyPublisher {
            inner: InMemorySchedulePublisher::new(),
            fail: AtomicBool::new(true),
        });
        let service = RotationService::new(
            RotationDependencies {
                registry: fixture.registry.clone(),
                store: fixture.store.clone(),
                publisher: publisher.clone(),
                events: fixture.events.clone(),
            },
            RotationConfig::for_testing(),
        )
        .unwrap();

        let err = service.recalculate_at(T0).unwrap_err();
        assert!(matches!(err, RotationError::Storage(_)));

        // state is durable and the pair event already went out
        let persisted = fixture.store.load().unwrap().unwrap();
        assert_eq!(persisted.last_rotation_time(), T0);
        assert_eq!(
            persisted.pair(),
            Some(&RotationPair::new("prod00".into(), "runnerup1".into()))
        );
        assert_eq!(service.state_snapshot(), persisted);
        let kinds: Vec<_> = fixture.events.get_events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["pair_advanced"]);
        assert_eq!(publisher.inner.version(), 0);

        // next trigger proposes the same schedule and installs it
        publisher.fail.store(false, Ordering::SeqCst);
        let update = service.recalculate_at(T0 + 1).unwrap();

        assert_eq!(update.installed_version, Some(1));
        assert_eq!(update.pair, persisted.pair().cloned());
        assert_eq!(service.state_snapshot().last_rotation_time(), T0);
        let kinds: Vec<_> = fixture.events.get_events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["pair_advanced", "schedule_installed"]);
    }

    #[test]
    fn test_failed_save_leaves_state_untouched() {
        let fixture = Fixture::new(21, 4);
        let store = Arc::new(FlakyStore {
            inner: InMemoryStateStore::new(),
            fail: AtomicBool::new(false),
        });
        let service = RotationService::new(
            RotationDependencies {
                registry: fixture.registry.clone(),
                store: store.clone(),
                publisher: fixture.publisher.clone(),
                events: fixture.events.clone(),
            },
            RotationConfig::for_testing(),
        )
        .unwrap();

        store.fail.store(true, Ordering::SeqCst);
        let err = service.recalculate_at(T0).unwrap_err();

        assert!(err.is_recoverable());
        assert!(service.current_pair().is_none());
        assert_eq!(service.state_snapshot().last_rotation_time(), 0);
        assert_eq!(fixture.publisher.version(), 0);
        assert_eq!(fixture.events.event_count(), 0);

        store.fail.store(false, Ordering::SeqCst);
        assert!(service.recalculate_at(T0).unwrap().pair.is_some());
    }

    #[test]
    fn test_update_config() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());

        let config = RotationConfig {
            standby_window: 2,
            rotation_period_secs: 3600,
            ..RotationConfig::for_testing()
        };
        service.update_config(config).unwrap();

        let persisted = fixture.store.load().unwrap().unwrap();
        assert_eq!(persisted.standby_window(), 2);
        assert_eq!(persisted.rotation_period(), 3600);

        service.recalculate_at(T0).unwrap();
        assert_eq!(service.state_snapshot().standby_rotation_history().len(), 2);
    }

    #[test]
    fn test_update_config_rejects_invalid() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());

        let config = RotationConfig {
            active_count: 0,
            ..RotationConfig::for_testing()
        };
        assert!(matches!(
            service.update_config(config),
            Err(RotationError::InvalidConfig(_))
        ));
        assert_eq!(service.state_snapshot().active_count(), 21);
    }

    #[test]
    fn test_tick_uses_time_source() {
        let fixture = Fixture::new(21, 4);
        let service = fixture
            .service(RotationConfig::for_testing())
            .with_time_source(Box::new(FixedTimeSource(T0)));

        service.tick().unwrap();

        assert_eq!(service.state_snapshot().last_rotation_time(), T0);
    }

    #[test]
    fn test_votes_change_moves_schedule() {
        let fixture = Fixture::new(21, 4);
        let service = fixture.service(RotationConfig::for_testing());
        service.recalculate_at(T0).unwrap();

        // prod00 (current bp_out) loses all votes
        fixture.registry.set_votes(&"prod00".into(), 0).unwrap();
        let update = service.recalculate_at(T0 + 1).unwrap();

        assert!(update.pair.is_none());
        assert!(!update.schedule.iter().any(|k| k.producer.as_str() == "prod00"));
        // runnerup1 now holds the seat on its own votes: same set, no reinstall
        assert_eq!(update.installed_version, None);
        assert!(fixture
            .events
            .get_events()
            .iter()
            .any(|e| e.kind() == "pair_cleared"));
    }
}
