use crate::battle::items::ItemEffectStrategy;
use crate::battle::state::{
    BattleEvent, BattleMode, BattleSide, BattleState, EventBus, GameState, Side, TurnRng,
};
use crate::battle::turn_orchestrator::{resolve_turn, PlayerAction, TurnContext};
use crate::config::EngineConfig;
use crate::difficulty::{DifficultyFeed, OutcomeRecord};
use crate::encounter;
use crate::errors::{BattleEngineError, BattleResult, BattleStateError};
use crate::pokemon::PokemonInst;
use crate::reference::ReferenceData;
use crate::storage::{Inventory, RosterStore};
use log::{debug, info, warn};
use schema::{Ailment, Biome};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// Presentation collaborator. Receives the narrative of each action once it
/// has fully settled.
pub trait Presentation: Send {
    fn present(&mut self, events: &[BattleEvent]);
}

/// Writes every visible line to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn present(&mut self, events: &[BattleEvent]) {
        for line in events.iter().filter_map(BattleEvent::format) {
            info!("{}", line);
        }
    }
}

/// Everything the runner task owns for the lifetime of a session.
pub struct EngineServices {
    pub reference: Arc<ReferenceData>,
    pub config: EngineConfig,
    pub roster: Box<dyn RosterStore>,
    pub inventory: Box<dyn Inventory>,
    pub difficulty: Box<dyn DifficultyFeed>,
    pub items: Box<dyn ItemEffectStrategy>,
    pub presentation: Box<dyn Presentation>,
    pub rng: TurnRng,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Searching,
    InBattle,
}

/// Read-only view of one active Pokemon.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CombatantView {
    pub name: String,
    pub level: u8,
    pub current_hp: u16,
    pub max_hp: u16,
    pub ailment: Ailment,
    pub stages: [i8; 6],
}

impl CombatantView {
    fn of(side: &BattleSide) -> Self {
        let active = side.active();
        Self {
            name: active.pokemon.name.clone(),
            level: active.pokemon.level,
            current_hp: active.pokemon.current_hp(),
            max_hp: active.pokemon.max_hp(),
            ailment: active.pokemon.ailment(),
            stages: active.modifiers.stages(),
        }
    }
}

/// The read model published after every settled request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BattleSnapshot {
    pub phase: SessionPhase,
    pub game_state: Option<GameState>,
    pub turn_number: u32,
    pub player: Option<CombatantView>,
    pub opponent: Option<CombatantView>,
}

impl BattleSnapshot {
    pub fn searching() -> Self {
        Self {
            phase: SessionPhase::Searching,
            game_state: None,
            turn_number: 0,
            player: None,
            opponent: None,
        }
    }

    fn of(state: &BattleState) -> Self {
        Self {
            phase: SessionPhase::InBattle,
            game_state: Some(state.game_state),
            turn_number: state.turn_number,
            player: Some(CombatantView::of(&state.player)),
            opponent: Some(CombatantView::of(&state.opponent)),
        }
    }
}

type Reply = oneshot::Sender<BattleResult<Vec<BattleEvent>>>;

enum Request {
    StartEncounter {
        biome: Biome,
        depth: u32,
        play_time_ms: u64,
        reply: Reply,
    },
    StartTrainerBattle {
        trainer_name: String,
        biome: Biome,
        roster: Vec<PokemonInst>,
        reply: Reply,
    },
    Act {
        action: PlayerAction,
        reply: Reply,
    },
    EndSession {
        reply: Reply,
    },
}

/// Client side of the runner. Cheap to clone; every clone feeds the same queue.
#[derive(Clone)]
pub struct BattleHandle {
    requests: mpsc::UnboundedSender<Request>,
    snapshots: watch::Receiver<BattleSnapshot>,
}

impl BattleHandle {
    async fn send(
        &self,
        make: impl FnOnce(Reply) -> Request,
    ) -> BattleResult<Vec<BattleEvent>> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(make(reply))
            .map_err(|_| BattleEngineError::RunnerClosed)?;
        response.await.map_err(|_| BattleEngineError::RunnerClosed)?
    }

    pub async fn start_encounter(
        &self,
        biome: Biome,
        depth: u32,
        play_time_ms: u64,
    ) -> BattleResult<Vec<BattleEvent>> {
        self.send(|reply| Request::StartEncounter {
            biome,
            depth,
            play_time_ms,
            reply,
        })
        .await
    }

    pub async fn start_trainer_battle(
        &self,
        trainer_name: String,
        biome: Biome,
        roster: Vec<PokemonInst>,
    ) -> BattleResult<Vec<BattleEvent>> {
        self.send(|reply| Request::StartTrainerBattle {
            trainer_name,
            biome,
            roster,
            reply,
        })
        .await
    }

    pub async fn act(&self, action: PlayerAction) -> BattleResult<Vec<BattleEvent>> {
        self.send(|reply| Request::Act { action, reply }).await
    }

    /// Abandons the current battle, if any, and returns to searching.
    pub async fn end_session(&self) -> BattleResult<Vec<BattleEvent>> {
        self.send(|reply| Request::EndSession { reply }).await
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BattleSnapshot> {
        self.snapshots.clone()
    }
}

enum Phase {
    Searching,
    InBattle(Box<BattleState>),
}

/// Single-flight battle session. One task owns all state and works through
/// requests strictly in arrival order; a request runs to completion before
/// the next one starts.
pub struct BattleRunner {
    services: EngineServices,
    phase: Phase,
    battles_started: u64,
    snapshots: watch::Sender<BattleSnapshot>,
}

impl BattleRunner {
    pub fn spawn(services: EngineServices) -> (BattleHandle, JoinHandle<()>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(BattleSnapshot::searching());
        let runner = BattleRunner {
            services,
            phase: Phase::Searching,
            battles_started: 0,
            snapshots,
        };
        let task = tokio::spawn(runner.run(receiver));
        (
            BattleHandle {
                requests,
                snapshots: snapshot_rx,
            },
            task,
        )
    }

    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = receiver.recv().await {
            let (result, reply) = self.dispatch(request);
            self.publish();
            if reply.send(result).is_err() {
                debug!("Requester went away before the reply was sent");
            }
        }
        debug!("All battle handles dropped, runner stopping");
    }

    fn dispatch(&mut self, request: Request) -> (BattleResult<Vec<BattleEvent>>, Reply) {
        match request {
            Request::StartEncounter {
                biome,
                depth,
                play_time_ms,
                reply,
            } => {
                let result = self
                    .require_searching()
                    .and_then(|_| self.settle(|runner| runner.start_encounter(biome, depth, play_time_ms)));
                (result, reply)
            }
            Request::StartTrainerBattle {
                trainer_name,
                biome,
                roster,
                reply,
            } => {
                let result = self.require_searching().and_then(|_| {
                    self.settle(|runner| runner.start_trainer_battle(trainer_name, biome, roster))
                });
                (result, reply)
            }
            Request::Act { action, reply } => {
                let result = if matches!(self.phase, Phase::Searching) {
                    Err(BattleStateError::NoBattleInProgress.into())
                } else {
                    self.settle(|runner| runner.act(action))
                };
                (result, reply)
            }
            Request::EndSession { reply } => {
                if let Phase::InBattle(state) = &self.phase {
                    info!("Battle {} abandoned", state.battle_id);
                }
                self.phase = Phase::Searching;
                (Ok(Vec::new()), reply)
            }
        }
    }

    fn require_searching(&self) -> BattleResult<()> {
        match self.phase {
            Phase::Searching => Ok(()),
            Phase::InBattle(_) => Err(BattleStateError::BattleInProgress.into()),
        }
    }

    /// Runs one request body. On failure the in-flight battle is discarded,
    /// the session goes back to searching and the failure is presented as an
    /// unknown-error step.
    fn settle(
        &mut self,
        body: impl FnOnce(&mut Self) -> BattleResult<EventBus>,
    ) -> BattleResult<Vec<BattleEvent>> {
        match body(self) {
            Ok(bus) => {
                self.services.presentation.present(bus.events());
                Ok(bus.into_events())
            }
            Err(err) => {
                warn!("Resetting session after error: {}", err);
                self.phase = Phase::Searching;
                let event = BattleEvent::UnknownError {
                    message: err.to_string(),
                };
                self.services.presentation.present(std::slice::from_ref(&event));
                Err(err)
            }
        }
    }

    fn publish(&self) {
        let snapshot = match &self.phase {
            Phase::Searching => BattleSnapshot::searching(),
            Phase::InBattle(state) => BattleSnapshot::of(state),
        };
        self.snapshots.send_replace(snapshot);
    }

    fn next_battle_id(&mut self) -> String {
        self.battles_started += 1;
        format!("battle-{}", self.battles_started)
    }

    fn start_encounter(&mut self, biome: Biome, depth: u32, play_time_ms: u64) -> BattleResult<EventBus> {
        let roster = self.services.roster.load_roster()?;
        let recommendation = self.services.difficulty.recommendation();
        let wild = encounter::generate(
            &self.services.reference,
            &self.services.config.encounter,
            biome,
            depth,
            &recommendation,
            play_time_ms,
            &mut self.services.rng,
        )?;

        let player = BattleSide::new("Player".to_string(), Side::Player, roster)?;
        let opponent = BattleSide::new(format!("Wild {}", wild.name), Side::Opponent, vec![wild])?;
        let id = self.next_battle_id();
        let state = BattleState::new(id, BattleMode::Wild, biome, player, opponent, recommendation);
        Ok(self.begin(state))
    }

    fn start_trainer_battle(
        &mut self,
        trainer_name: String,
        biome: Biome,
        roster: Vec<PokemonInst>,
    ) -> BattleResult<EventBus> {
        let player_roster = self.services.roster.load_roster()?;
        let recommendation = self.services.difficulty.recommendation();
        let player = BattleSide::new("Player".to_string(), Side::Player, player_roster)?;
        let opponent = BattleSide::new(trainer_name, Side::Opponent, roster)?;
        let id = self.next_battle_id();
        let state = BattleState::new(id, BattleMode::Trainer, biome, player, opponent, recommendation);
        Ok(self.begin(state))
    }

    fn begin(&mut self, state: BattleState) -> EventBus {
        info!(
            "Battle {} started: {:?} vs {} in {}",
            state.battle_id, state.mode, state.opponent.name, state.biome
        );
        let mut bus = EventBus::new();
        bus.push(state.started_event());
        self.phase = Phase::InBattle(Box::new(state));
        bus
    }

    fn act(&mut self, action: PlayerAction) -> BattleResult<EventBus> {
        // Taking the state out means an error leaves the session searching.
        let Phase::InBattle(mut state) = std::mem::replace(&mut self.phase, Phase::Searching) else {
            return Err(BattleStateError::NoBattleInProgress.into());
        };

        let services = &mut self.services;
        let mut ctx = TurnContext {
            type_chart: services.reference.type_chart(),
            config: &services.config.battle,
            items: services.items.as_ref(),
            inventory: services.inventory.as_mut(),
        };
        let bus = resolve_turn(&mut state, action, &mut ctx, &mut services.rng)?;

        self.persist(&state)?;
        if state.game_state.is_over() {
            self.conclude(&state);
        } else {
            self.phase = Phase::InBattle(state);
        }
        Ok(bus)
    }

    /// Whole-roster save after every settled action. A caught Pokemon is
    /// always stored and joins the roster only while there is room.
    fn persist(&mut self, state: &BattleState) -> BattleResult<()> {
        let mut roster = state.player.roster();
        if state.game_state == GameState::Caught {
            let caught = state.opponent.active().pokemon.clone();
            if roster.len() < self.services.config.battle.max_roster_size {
                roster.push(caught.clone());
            } else {
                info!("Roster is full, {} goes to storage only", caught.name);
            }
            self.services.roster.store_caught(caught)?;
        }
        self.services.roster.save_roster(&roster)?;
        Ok(())
    }

    fn conclude(&mut self, state: &BattleState) {
        let player_active = &state.player.active().pokemon;
        let record = OutcomeRecord {
            species_id: state.opponent.active().pokemon.species_id,
            biome: state.biome,
            catch_attempted: state.catch_attempted,
            caught: state.game_state == GameState::Caught,
            won: state.game_state == GameState::Won,
            player_fainted: state.game_state == GameState::Lost || player_active.is_fainted(),
            remaining_hp_percent: player_active.hp_percent(),
        };
        self.services.difficulty.record_outcome(record);
        info!("Battle {} concluded, back to searching", state.battle_id);
    }
}
