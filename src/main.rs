use log::info;
use pokemon_code_quest::encounter;
use pokemon_code_quest::prefab_data::PIKACHU;
use pokemon_code_quest::{
    AdaptiveDifficulty, BattleEvent, BattleRunner, Biome, EngineConfig, EngineServices,
    InMemoryInventory, InMemoryStore, Item, PlayerAction, Presentation, ReferenceData,
    SessionPhase, StandardItemEffects, TurnRng,
};
use std::path::Path;
use std::sync::Arc;

const MAX_ACTIONS: usize = 30;
const THROW_BELOW_HP_PERCENT: f32 = 50.0;

/// Prints each narrative line to the terminal.
struct ConsolePresentation;

impl Presentation for ConsolePresentation {
    fn present(&mut self, events: &[BattleEvent]) {
        for line in events.iter().filter_map(BattleEvent::format) {
            println!("{}", line);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Optional first argument: a RON config file
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };
    let reference = Arc::new(ReferenceData::builtin());

    let mut rng = TurnRng::new_random();
    let starter = encounter::instantiate(
        &reference,
        &config.encounter,
        reference.species(PIKACHU)?,
        12,
        &mut rng,
    )?;
    let attack = starter
        .moves
        .first()
        .map(|m| m.move_id)
        .ok_or("starter knows no moves")?;
    info!("Starting with {} (Lv. {})", starter.name, starter.level);

    let services = EngineServices {
        reference: reference.clone(),
        roster: Box::new(InMemoryStore::new(&[starter])?),
        inventory: Box::new(
            InMemoryInventory::new()
                .with_item(Item::PokeBall, 5)
                .with_item(Item::Potion, 3),
        ),
        difficulty: Box::new(AdaptiveDifficulty::new(config.difficulty.clone())),
        items: Box::new(StandardItemEffects),
        presentation: Box::new(ConsolePresentation),
        rng,
        config,
    };
    let (handle, task) = BattleRunner::spawn(services);

    handle.start_encounter(Biome::Grassland, 1, 0).await?;

    for _ in 0..MAX_ACTIONS {
        let snapshot = handle.snapshot();
        if snapshot.phase == SessionPhase::Searching {
            break;
        }
        let opponent_hp = snapshot
            .opponent
            .as_ref()
            .map_or(100.0, |o| o.current_hp as f32 / o.max_hp.max(1) as f32 * 100.0);

        let action = if opponent_hp < THROW_BELOW_HP_PERCENT {
            PlayerAction::ThrowBall {
                ball: Item::PokeBall,
            }
        } else {
            PlayerAction::Attack { move_id: attack }
        };
        if let Err(err) = handle.act(action).await {
            println!("Action failed: {}", err);
        }
    }

    println!("{}", serde_json::to_string_pretty(&handle.snapshot())?);

    drop(handle);
    task.await?;
    Ok(())
}
